//! # Device Descriptor
//!
//! A flat key/value table of hardware constants standing in for a device
//! tree. Keys are path-like, joined with [`KEY_SEPARATOR`]; values are
//! strings the caller interprets (addresses go through the numeral parser).

/// Separator between the components of a key
pub const KEY_SEPARATOR: &str = ":";

/// Build a descriptor key from its components at compile time
///
/// ```rust
/// use keystone_early::descriptor_key;
///
/// assert_eq!(descriptor_key!("interrupt", "vector", "default"), "interrupt:vector:default");
/// ```
#[macro_export]
macro_rules! descriptor_key {
    ($first:literal $(, $rest:literal)* $(,)?) => {
        concat!($first $(, ":", $rest)*)
    };
}

/// Key looked up by the self-test
pub const SELF_TEST_KEY: &str = descriptor_key!("testing", "lookup");

/// Value the self-test key must hold
pub const SELF_TEST_VALUE: &str = "working";

/// Key holding the runtime address of the interrupt vector table
pub const VECTOR_TABLE_KEY: &str = descriptor_key!("interrupt", "vector", "default");

/// Read access to the device descriptor
pub trait DeviceDescriptor {
    /// Value stored under `key`, if any
    fn property(&self, key: &str) -> Option<&str>;

    /// One known lookup, proving the table is reachable and intact
    fn is_working(&self) -> bool {
        self.property(SELF_TEST_KEY) == Some(SELF_TEST_VALUE)
    }
}

impl<T: DeviceDescriptor + ?Sized> DeviceDescriptor for &T {
    fn property(&self, key: &str) -> Option<&str> {
        (**self).property(key)
    }

    fn is_working(&self) -> bool {
        (**self).is_working()
    }
}

/// A descriptor backed by a table compiled into the image
#[derive(Debug, Clone, Copy)]
pub struct StaticDescriptor {
    entries: &'static [(&'static str, &'static str)],
}

impl StaticDescriptor {
    /// Wrap a `(key, value)` table; the first match wins on duplicate keys
    #[must_use]
    pub const fn new(entries: &'static [(&'static str, &'static str)]) -> Self {
        Self { entries }
    }

    /// The backing table
    #[must_use]
    pub const fn entries(&self) -> &'static [(&'static str, &'static str)] {
        self.entries
    }
}

impl DeviceDescriptor for StaticDescriptor {
    fn property(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(candidate, _)| *candidate == key)
            .map(|(_, value)| *value)
    }
}
