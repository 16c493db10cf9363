//! # Numeral Parsing
//!
//! A `strtoull`-style parser producing a [`SignedMagnitude`]. The sign is
//! reported through the flags instead of being folded into the value, and each
//! sign has its own ceiling, so one routine serves signed and unsigned callers.
//!
//! ## Grammar
//!
//! ```text
//! numeral  := space* sign? prefix? digit*
//! sign     := '+' | '-'
//! prefix   := '0x' | '0X'          (base 0 or 16 only)
//! ```
//!
//! With base 0 the base is detected: `0x`/`0X` selects 16, a bare leading `0`
//! selects 8, anything else selects 10. Any other base is used as given.
//! Accumulation goes through [`clamped_mul`] and [`clamped_add`]: once the
//! ceiling is hit the value stays pinned there, `OUT_OF_RANGE` is set, and the
//! remaining digits are still consumed.

use crate::arith::{clamped_add, clamped_mul};
use crate::ascii::{digit_value, is_space};
use crate::division::{NumberFlags, SignedMagnitude};
use crate::{string, AUTO_BASE, DECIMAL_BASE, HEXADECIMAL_BASE, MAX_BASE, MIN_BASE, OCTAL_BASE};

/// Outcome of a parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parsed {
    /// Clamped magnitude, sign and condition flags
    pub value: SignedMagnitude,
    /// Bytes consumed from the start of the input, up to the first byte that
    /// is not part of the numeral (zero when the base was rejected)
    pub consumed: usize,
}

impl Parsed {
    /// The value as a machine address
    ///
    /// Negative numerals yield the two's-complement negation of their
    /// magnitude, as C's unsigned conversions do.
    #[must_use]
    pub const fn as_address(&self) -> usize {
        let magnitude = self.value.magnitude as usize;
        if self.value.is_negative() {
            magnitude.wrapping_neg()
        } else {
            magnitude
        }
    }
}

/// Byte at `index`, or NUL past the end of the slice
#[inline]
fn byte_at(text: &[u8], index: usize) -> u8 {
    text.get(index).copied().unwrap_or(0)
}

/// Parse a numeral from the start of `text`
///
/// `max_positive` bounds non-negative numerals and `max_negative` bounds the
/// magnitude of negative ones. The end of the slice and an embedded NUL both
/// terminate the numeral.
///
/// # Example
///
/// ```rust
/// use keystone_runtime::parse_unsigned_with_sign;
///
/// let parsed = parse_unsigned_with_sign(b"  0x1Fg", 0, u64::MAX, u64::MAX);
/// assert_eq!(parsed.value.magnitude, 31);
/// assert!(!parsed.value.is_negative());
/// assert_eq!(parsed.consumed, 6);
/// ```
#[must_use]
pub fn parse_unsigned_with_sign(
    text: &[u8],
    base: u32,
    max_positive: u64,
    max_negative: u64,
) -> Parsed {
    let mut cursor = 0;
    while is_space(byte_at(text, cursor)) {
        cursor += 1;
    }

    let mut flags = NumberFlags::NON_NEGATIVE;
    let mut ceiling = max_positive;
    match byte_at(text, cursor) {
        b'-' => {
            flags.remove(NumberFlags::NON_NEGATIVE);
            ceiling = max_negative;
            cursor += 1;
        }
        b'+' => cursor += 1,
        _ => {}
    }

    let leading_zero = byte_at(text, cursor) == b'0';
    let has_hex_prefix = leading_zero && matches!(byte_at(text, cursor + 1), b'x' | b'X');
    let resolved = if has_hex_prefix && (base == AUTO_BASE || base == HEXADECIMAL_BASE) {
        cursor += 2;
        HEXADECIMAL_BASE
    } else if base == AUTO_BASE {
        if leading_zero {
            OCTAL_BASE
        } else {
            DECIMAL_BASE
        }
    } else {
        base
    };

    if !(MIN_BASE..=MAX_BASE).contains(&resolved) {
        return Parsed {
            value: SignedMagnitude {
                magnitude: 0,
                flags: flags | NumberFlags::INVALID_BASE,
            },
            consumed: 0,
        };
    }

    let mut accumulator = 0u64;
    while let Some(digit) = digit_value(byte_at(text, cursor), resolved) {
        let (scaled, mul_overflow) = clamped_mul(accumulator, u64::from(resolved), ceiling);
        let (sum, add_overflow) = clamped_add(scaled, u64::from(digit), ceiling);
        if mul_overflow || add_overflow {
            flags |= NumberFlags::OUT_OF_RANGE;
        }
        accumulator = sum;
        cursor += 1;
    }

    Parsed {
        value: SignedMagnitude {
            magnitude: accumulator,
            flags,
        },
        consumed: cursor,
    }
}

/// Parse a numeral from a NUL-terminated string
///
/// Same rules as [`parse_unsigned_with_sign`]. When `end` is given it receives
/// the address of the first byte after the numeral (the start of the string
/// when the base was rejected).
///
/// # Safety
///
/// `string` must point to a NUL-terminated byte sequence.
pub unsafe fn parse_c_string(
    string: *const u8,
    end: Option<&mut *const u8>,
    base: u32,
    max_positive: u64,
    max_negative: u64,
) -> SignedMagnitude {
    // SAFETY: the caller guarantees a terminator
    let text = unsafe { core::slice::from_raw_parts(string, string::length(string)) };
    let parsed = parse_unsigned_with_sign(text, base, max_positive, max_negative);
    if let Some(end) = end {
        // SAFETY: consumed never exceeds the string length
        *end = unsafe { string.add(parsed.consumed) };
    }
    parsed.value
}

/// Parse a numeral meant to be an address
///
/// Positive numerals are clamped at `usize::MAX`; negative numerals have a
/// ceiling of zero, so any nonzero negative value reports `OUT_OF_RANGE`. Use
/// [`Parsed::as_address`] for the resulting address.
#[must_use]
pub fn parse_address(text: &[u8], radix: u32) -> Parsed {
    parse_unsigned_with_sign(text, radix, usize::MAX as u64, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::NumeralWriter;

    fn parse(text: &str, base: u32) -> Parsed {
        parse_unsigned_with_sign(text.as_bytes(), base, u64::MAX, 1 << 63)
    }

    #[test]
    fn test_auto_base() {
        assert_eq!(parse("0x1F", 0).value, SignedMagnitude::positive(31));
        assert_eq!(parse("0X1f", 0).value, SignedMagnitude::positive(31));
        assert_eq!(parse("017", 0).value, SignedMagnitude::positive(15));
        assert_eq!(parse("19", 0).value, SignedMagnitude::positive(19));
        assert_eq!(parse("0", 0).value, SignedMagnitude::positive(0));
        assert_eq!(parse("0", 0).consumed, 1);
    }

    #[test]
    fn test_explicit_base() {
        assert_eq!(parse("0x10", 16).value.magnitude, 16);
        // Only bases 0 and 16 honour the prefix
        let parsed = parse("0x10", 10);
        assert_eq!(parsed.value.magnitude, 0);
        assert_eq!(parsed.consumed, 1);
        assert_eq!(parse("0123", 10).value.magnitude, 123);
        assert_eq!(parse("101", 2).value.magnitude, 5);
        assert_eq!(parse("zzz", 36).value.magnitude, 35 * 36 * 36 + 35 * 36 + 35);
    }

    #[test]
    fn test_sign_and_whitespace() {
        let parsed = parse("-42", 10);
        assert_eq!(parsed.value.magnitude, 42);
        assert!(parsed.value.is_negative());
        assert!(!parsed.value.out_of_range());

        let parsed = parse(" \t\n+7 ", 10);
        assert_eq!(parsed.value, SignedMagnitude::positive(7));
        assert_eq!(parsed.consumed, 5);
    }

    #[test]
    fn test_negative_ceiling() {
        let parsed = parse_unsigned_with_sign(b"-300", 10, 1000, 128);
        assert!(parsed.value.is_negative());
        assert!(parsed.value.out_of_range());
        assert_eq!(parsed.value.magnitude, 128);

        let parsed = parse_unsigned_with_sign(b"300", 10, 1000, 128);
        assert!(!parsed.value.out_of_range());
        assert_eq!(parsed.value.magnitude, 300);
    }

    #[test]
    fn test_overflow_clamps_and_consumes() {
        let parsed = parse("99999999999999999999999tail", 10);
        assert!(parsed.value.out_of_range());
        assert_eq!(parsed.value.magnitude, u64::MAX);
        assert_eq!(parsed.consumed, 23);

        let parsed = parse_unsigned_with_sign(b"256", 10, 255, 0);
        assert!(parsed.value.out_of_range());
        assert_eq!(parsed.value.magnitude, 255);

        let parsed = parse("18446744073709551615", 10);
        assert!(!parsed.value.out_of_range());
        assert_eq!(parsed.value.magnitude, u64::MAX);
    }

    #[test]
    fn test_invalid_base() {
        for base in [1, 37, 100] {
            let parsed = parse("123", base);
            assert!(parsed.value.invalid_base());
            assert_eq!(parsed.value.magnitude, 0);
            assert_eq!(parsed.consumed, 0);
        }
    }

    #[test]
    fn test_stops_at_nul_and_end() {
        let parsed = parse_unsigned_with_sign(b"12\x0034", 10, u64::MAX, 0);
        assert_eq!(parsed.value.magnitude, 12);
        assert_eq!(parsed.consumed, 2);
        assert_eq!(parse("", 10).value.magnitude, 0);
        assert_eq!(parse("-", 10).consumed, 1);
    }

    #[test]
    fn test_c_string_end_pointer() {
        let text = b"  0x7fz\0";
        let mut end = core::ptr::null();
        let value = unsafe { parse_c_string(text.as_ptr(), Some(&mut end), 0, u64::MAX, 0) };
        assert_eq!(value.magnitude, 0x7F);
        assert_eq!(end, unsafe { text.as_ptr().add(6) });

        let value = unsafe { parse_c_string(text.as_ptr(), None, 40, u64::MAX, 0) };
        assert!(value.invalid_base());
    }

    #[test]
    fn test_address() {
        let parsed = parse_address(b"0xFFFF0000", 0);
        assert_eq!(parsed.as_address(), 0xFFFF_0000);
        assert!(!parsed.value.out_of_range());

        let parsed = parse_address(b"-5", 10);
        assert!(parsed.value.out_of_range());
        assert_eq!(parsed.as_address(), 0);
    }

    #[test]
    fn test_round_trip_every_base() {
        let values = [0u64, 1, 35, 36, 255, 4096, 0xDEAD_BEEF, 1 << 63, u64::MAX];
        for base in MIN_BASE..=MAX_BASE {
            for value in values {
                let numeral = NumeralWriter::<64>::format(value, base).expect("fits");
                let parsed = parse_unsigned_with_sign(numeral.as_bytes(), base, u64::MAX, 0);
                assert_eq!(parsed.value, SignedMagnitude::positive(value), "{value} base {base}");
                assert_eq!(parsed.consumed, numeral.as_bytes().len());
            }
        }
    }
}
