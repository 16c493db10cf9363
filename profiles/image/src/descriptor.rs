use keystone_early::{StaticDescriptor, SELF_TEST_KEY, SELF_TEST_VALUE, VECTOR_TABLE_KEY};

/// Where the ARM vector table is copied: the high-vectors page
pub const DEFAULT_VECTOR_ADDRESS: &str = "0xFFFF0000";

/// The board's device descriptor
pub static DESCRIPTOR: StaticDescriptor = StaticDescriptor::new(&[
    (SELF_TEST_KEY, SELF_TEST_VALUE),
    (VECTOR_TABLE_KEY, DEFAULT_VECTOR_ADDRESS),
]);

#[cfg(test)]
mod tests {
    use keystone_early::DeviceDescriptor;
    use keystone_runtime::{parse_address, NumberFlags, AUTO_BASE};

    use super::*;

    #[test]
    fn test_self_test_answers() {
        assert!(DESCRIPTOR.is_working());
    }

    #[test]
    fn test_vector_address_parses_cleanly() {
        let value = DESCRIPTOR.property(VECTOR_TABLE_KEY).unwrap();
        let parsed = parse_address(value.as_bytes(), AUTO_BASE);
        assert_eq!(parsed.as_address(), 0xFFFF_0000);
        assert_eq!(parsed.value.flags, NumberFlags::NON_NEGATIVE);
        assert_eq!(parsed.consumed, value.len());
    }
}
