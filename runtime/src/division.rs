//! # Signed-Magnitude Values and Long Division
//!
//! Some ARM cores have no integer divide instruction, and at this stage there
//! is no runtime library to fall back on. Division is therefore done the
//! schoolbook way, in binary, with nothing but shifts, compares and
//! subtractions.
//!
//! Values carry their sign out of band: a [`SignedMagnitude`] is an unsigned
//! magnitude plus [`NumberFlags`]. The same representation serves the numeral
//! parser, which reports range and base conditions through the same flags.
//! [`SignedMagnitude::from_i64`], [`SignedMagnitude::to_i128`] and
//! [`divide_signed`] bridge to native signed integers.
//!
//! ## Special cases
//!
//! Checked in this order before the general algorithm runs:
//!
//! | Denominator          | Quotient              | Remainder   |
//! |----------------------|-----------------------|-------------|
//! | `0`                  | `u64::MAX`, DIV0 flag | `0`         |
//! | `1`                  | numerator             | `0`         |
//! | equal to numerator   | `1`                   | `0`         |
//! | above numerator      | `0`                   | numerator   |
//!
//! The quotient sign is always the XNOR of the operand signs.

use bitflags::bitflags;
use static_assertions::const_assert_eq;

bitflags! {
    /// Sign and condition bits of a [`SignedMagnitude`]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NumberFlags: u32 {
        /// Set when the value is zero or positive
        const NON_NEGATIVE = 1 << 0;
        /// A division by zero produced this value
        const DIVIDE_BY_ZERO = 1 << 1;
        /// A parse exceeded its ceiling and was clamped
        const OUT_OF_RANGE = 1 << 2;
        /// A parse was asked for a base outside 2..=36
        const INVALID_BASE = 1 << 3;
    }
}

// The sign must stay in bit 0
const_assert_eq!(NumberFlags::NON_NEGATIVE.bits(), 1);

/// An unsigned magnitude with its sign and condition flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SignedMagnitude {
    /// Absolute value
    pub magnitude: u64,
    /// Sign bit and condition bits
    pub flags: NumberFlags,
}

impl SignedMagnitude {
    /// Zero, non-negative, no conditions
    pub const ZERO: Self = Self::positive(0);

    /// A non-negative value
    #[must_use]
    pub const fn positive(magnitude: u64) -> Self {
        Self {
            magnitude,
            flags: NumberFlags::NON_NEGATIVE,
        }
    }

    /// A negative value (a zero magnitude still reads as negative zero)
    #[must_use]
    pub const fn negative(magnitude: u64) -> Self {
        Self {
            magnitude,
            flags: NumberFlags::empty(),
        }
    }

    /// Convert from a native signed integer
    #[must_use]
    pub const fn from_i64(value: i64) -> Self {
        if value < 0 {
            Self::negative(value.unsigned_abs())
        } else {
            Self::positive(value as u64)
        }
    }

    /// Convert to a native signed integer
    ///
    /// Every magnitude fits in an `i128`, so this never fails.
    #[must_use]
    pub const fn to_i128(self) -> i128 {
        if self.is_negative() {
            -(self.magnitude as i128)
        } else {
            self.magnitude as i128
        }
    }

    /// Whether the sign bit marks this value negative
    #[must_use]
    #[inline]
    pub const fn is_negative(self) -> bool {
        !self.flags.contains(NumberFlags::NON_NEGATIVE)
    }

    /// Whether a division by zero produced this value
    #[must_use]
    #[inline]
    pub const fn divided_by_zero(self) -> bool {
        self.flags.contains(NumberFlags::DIVIDE_BY_ZERO)
    }

    /// Whether a parse clamped this value at its ceiling
    #[must_use]
    #[inline]
    pub const fn out_of_range(self) -> bool {
        self.flags.contains(NumberFlags::OUT_OF_RANGE)
    }

    /// Whether a parse rejected its base
    #[must_use]
    #[inline]
    pub const fn invalid_base(self) -> bool {
        self.flags.contains(NumberFlags::INVALID_BASE)
    }
}

impl Default for SignedMagnitude {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<i64> for SignedMagnitude {
    fn from(value: i64) -> Self {
        Self::from_i64(value)
    }
}

/// Quotient and remainder of a [`long_division`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Division {
    /// Signed quotient; carries `DIVIDE_BY_ZERO` when the denominator was zero
    pub quotient: SignedMagnitude,
    /// Always non-negative and below the denominator's magnitude
    pub remainder: u64,
}

/// Sign flag of a quotient: non-negative when both signs agree
#[inline]
const fn quotient_sign(numerator: SignedMagnitude, denominator: SignedMagnitude) -> NumberFlags {
    if numerator.is_negative() == denominator.is_negative() {
        NumberFlags::NON_NEGATIVE
    } else {
        NumberFlags::empty()
    }
}

/// Divide `numerator` by `denominator` without a hardware divide
///
/// See the module documentation for the special cases. Otherwise the
/// denominator is shifted left to the largest multiple of two not above the
/// numerator, and walked back down one bit at a time, subtracting whenever it
/// fits and shifting a quotient bit in on every step.
///
/// # Example
///
/// ```rust
/// use keystone_runtime::{long_division, SignedMagnitude};
///
/// let result = long_division(SignedMagnitude::positive(47), SignedMagnitude::negative(5));
/// assert_eq!(result.quotient.magnitude, 9);
/// assert!(result.quotient.is_negative());
/// assert_eq!(result.remainder, 2);
/// ```
#[must_use]
pub const fn long_division(numerator: SignedMagnitude, denominator: SignedMagnitude) -> Division {
    let sign = quotient_sign(numerator, denominator);
    let n = numerator.magnitude;
    let d = denominator.magnitude;

    if d == 0 {
        return Division {
            quotient: SignedMagnitude {
                magnitude: u64::MAX,
                flags: sign.union(NumberFlags::DIVIDE_BY_ZERO),
            },
            remainder: 0,
        };
    }
    if d == 1 {
        return Division {
            quotient: SignedMagnitude { magnitude: n, flags: sign },
            remainder: 0,
        };
    }
    if d == n {
        return Division {
            quotient: SignedMagnitude { magnitude: 1, flags: sign },
            remainder: 0,
        };
    }
    if d > n {
        return Division {
            quotient: SignedMagnitude { magnitude: 0, flags: sign },
            remainder: n,
        };
    }

    // Largest d * 2^k not above n; `<= n >> 1` keeps the shift from overflowing
    let mut shifted = d;
    let mut steps = 1u32;
    while shifted <= n >> 1 {
        shifted <<= 1;
        steps += 1;
    }

    let mut quotient = 0u64;
    let mut remainder = n;
    let mut step = 0;
    while step < steps {
        quotient <<= 1;
        if remainder >= shifted {
            remainder -= shifted;
            quotient += 1;
        }
        shifted >>= 1;
        step += 1;
    }

    Division {
        quotient: SignedMagnitude { magnitude: quotient, flags: sign },
        remainder,
    }
}

/// Divide two native signed integers with [`long_division`]
///
/// Returns `None` for a zero divisor and for a quotient that does not fit an
/// `i64` (`i64::MIN / -1`). The remainder takes the sign of the dividend, as
/// Rust's `%` does.
#[must_use]
pub fn divide_signed(numerator: i64, denominator: i64) -> Option<(i64, i64)> {
    let result = long_division(
        SignedMagnitude::from_i64(numerator),
        SignedMagnitude::from_i64(denominator),
    );
    if result.quotient.divided_by_zero() {
        return None;
    }
    let quotient = i64::try_from(result.quotient.to_i128()).ok()?;
    // remainder < |denominator| <= 2^63, so it always fits
    let remainder = result.remainder as i64;
    let remainder = if numerator < 0 { -remainder } else { remainder };
    Some((quotient, remainder))
}

/// 32-bit unsigned divide packed the way `__aeabi_uidivmod` returns it
///
/// The quotient lands in the low half (`r0`) and the remainder in the high
/// half (`r1`). A zero divisor yields an all-ones quotient and zero remainder.
#[must_use]
pub const fn packed_divmod(numerator: u32, denominator: u32) -> u64 {
    let result = long_division(
        SignedMagnitude::positive(numerator as u64),
        SignedMagnitude::positive(denominator as u64),
    );
    let quotient = result.quotient.magnitude as u32;
    let remainder = result.remainder as u32;
    ((remainder as u64) << 32) | quotient as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(v: u64) -> SignedMagnitude {
        SignedMagnitude::positive(v)
    }

    #[test]
    fn test_divide_by_zero() {
        for n in [0, 1, 7, u64::MAX] {
            let result = long_division(pos(n), pos(0));
            assert!(result.quotient.divided_by_zero());
            assert_eq!(result.quotient.magnitude, u64::MAX);
            assert_eq!(result.remainder, 0);
        }
    }

    #[test]
    fn test_divide_by_one() {
        for n in [0, 1, 2, 12345, u64::MAX] {
            let result = long_division(pos(n), pos(1));
            assert_eq!(result.quotient, pos(n));
            assert_eq!(result.remainder, 0);
        }
    }

    #[test]
    fn test_divide_by_self() {
        for n in [2, 3, 1000, u64::MAX] {
            let result = long_division(pos(n), pos(n));
            assert_eq!(result.quotient.magnitude, 1);
            assert_eq!(result.remainder, 0);
        }
    }

    #[test]
    fn test_larger_denominator() {
        let result = long_division(pos(5), pos(9));
        assert_eq!(result.quotient.magnitude, 0);
        assert_eq!(result.remainder, 5);
    }

    #[test]
    fn test_quotient_identity() {
        let samples = [
            (100u64, 7u64),
            (1 << 40, 3),
            (u64::MAX, 2),
            (u64::MAX, 3),
            (u64::MAX, u64::MAX - 1),
            (u64::MAX - 1, 1 << 63),
            (0xDEAD_BEEF_CAFE, 0x1234),
            (1_000_000_007, 97),
        ];
        for (n, d) in samples {
            let result = long_division(pos(n), pos(d));
            assert!(result.remainder < d, "{n} / {d}");
            assert_eq!(result.quotient.magnitude * d + result.remainder, n, "{n} / {d}");
            assert_eq!(result.quotient.magnitude, n / d);
        }
    }

    #[test]
    fn test_quotient_identity_sweep() {
        for n in 0u64..300 {
            for d in 2u64..40 {
                let result = long_division(pos(n), pos(d));
                assert_eq!(result.quotient.magnitude, n / d);
                assert_eq!(result.remainder, n % d);
            }
        }
    }

    #[test]
    fn test_sign_is_xnor() {
        let n = SignedMagnitude::negative(20);
        let d = SignedMagnitude::negative(3);
        assert!(!long_division(n, d).quotient.is_negative());
        assert!(long_division(n, pos(3)).quotient.is_negative());
        assert!(long_division(pos(20), d).quotient.is_negative());
        assert!(!long_division(pos(20), pos(3)).quotient.is_negative());
        // Every special case follows the same rule
        assert!(long_division(n, pos(0)).quotient.is_negative());
        assert!(long_division(n, pos(1)).quotient.is_negative());
        assert!(!long_division(n, SignedMagnitude::negative(20)).quotient.is_negative());
        assert!(long_division(n, pos(50)).quotient.is_negative());
    }

    #[test]
    fn test_native_conversions() {
        assert_eq!(SignedMagnitude::from_i64(-5).to_i128(), -5);
        assert_eq!(SignedMagnitude::from_i64(i64::MIN).magnitude, 1 << 63);
        assert_eq!(SignedMagnitude::from(42).to_i128(), 42);
        assert_eq!(SignedMagnitude::positive(u64::MAX).to_i128(), u64::MAX as i128);
    }

    #[test]
    fn test_divide_signed() {
        assert_eq!(divide_signed(47, 5), Some((9, 2)));
        assert_eq!(divide_signed(-47, 5), Some((-9, -2)));
        assert_eq!(divide_signed(47, -5), Some((-9, 2)));
        assert_eq!(divide_signed(-47, -5), Some((9, -2)));
        assert_eq!(divide_signed(i64::MIN, 2), Some((i64::MIN / 2, 0)));
        assert_eq!(divide_signed(i64::MIN, -1), None);
        assert_eq!(divide_signed(3, 0), None);
    }

    #[test]
    fn test_packed_divmod() {
        assert_eq!(packed_divmod(47, 5), (2 << 32) | 9);
        assert_eq!(packed_divmod(u32::MAX, 16), (15 << 32) | 0x0FFF_FFFF);
        assert_eq!(packed_divmod(3, 7), 3 << 32);
        assert_eq!(packed_divmod(9, 0), u64::from(u32::MAX));
    }
}
