//! ASCII helpers for the numeral parser. Only the C locale exists here:
//! `0-9`, `a-z` and `A-Z` are assumed to be contiguous ranges.

use crate::{DECIMAL_BASE, MAX_BASE};

/// Whether `byte` is one of `\t \n \v \f \r` or a space
#[must_use]
#[inline]
pub const fn is_space(byte: u8) -> bool {
    matches!(byte, b'\t' | b'\n' | 0x0B | 0x0C | b'\r' | b' ')
}

/// Value of `byte` as a digit in `base`, if it is one
///
/// Letters of either case extend the digits past nine. Bases above 36 have no
/// letters left and are treated as 36.
#[must_use]
pub const fn digit_value(byte: u8, base: u32) -> Option<u32> {
    let value = match byte {
        b'0'..=b'9' => (byte - b'0') as u32,
        b'a'..=b'z' => (byte - b'a') as u32 + DECIMAL_BASE,
        b'A'..=b'Z' => (byte - b'A') as u32 + DECIMAL_BASE,
        _ => return None,
    };
    let limit = if base > MAX_BASE { MAX_BASE } else { base };
    if value < limit {
        Some(value)
    } else {
        None
    }
}

/// Lowercase digit character for `value` (`0-9`, then `a-z`)
///
/// `value` must be below 36.
#[must_use]
#[inline]
pub const fn digit_char(value: u32) -> u8 {
    if value < DECIMAL_BASE {
        b'0' + value as u8
    } else {
        b'a' + (value - DECIMAL_BASE) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spaces() {
        for byte in [b'\t', b'\n', 0x0B, 0x0C, b'\r', b' '] {
            assert!(is_space(byte));
        }
        assert!(!is_space(b'0'));
        assert!(!is_space(0));
        assert!(!is_space(0xA0));
    }

    #[test]
    fn test_digit_values() {
        assert_eq!(digit_value(b'7', 8), Some(7));
        assert_eq!(digit_value(b'8', 8), None);
        assert_eq!(digit_value(b'f', 16), Some(15));
        assert_eq!(digit_value(b'F', 16), Some(15));
        assert_eq!(digit_value(b'g', 16), None);
        assert_eq!(digit_value(b'z', 36), Some(35));
        assert_eq!(digit_value(b'Z', 36), Some(35));
        assert_eq!(digit_value(b'-', 36), None);
        assert_eq!(digit_value(b'1', 2), Some(1));
        assert_eq!(digit_value(b'2', 2), None);
    }

    #[test]
    fn test_digit_char() {
        assert_eq!(digit_char(0), b'0');
        assert_eq!(digit_char(9), b'9');
        assert_eq!(digit_char(10), b'a');
        assert_eq!(digit_char(35), b'z');
    }
}
