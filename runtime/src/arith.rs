//! # Clamped Unsigned Arithmetic
//!
//! Addition and multiplication that never wrap. On overflow the result is
//! pinned to the caller's ceiling and the overflow is reported alongside it,
//! in the same shape as the `overflowing_*` family in `core`.

/// Add two values, clamping at `max`
///
/// Returns `(a + b, false)` when the sum fits under `max`, and `(max, true)`
/// otherwise. Overflow is detected as `a > max - b` so the check itself never
/// wraps.
///
/// # Example
///
/// ```rust
/// use keystone_runtime::clamped_add;
///
/// assert_eq!(clamped_add(2, 3, 10), (5, false));
/// assert_eq!(clamped_add(8, 3, 10), (10, true));
/// ```
#[must_use]
#[inline]
pub const fn clamped_add(a: u64, b: u64, max: u64) -> (u64, bool) {
    // b alone above the ceiling is an overflow too
    if b > max || a > max - b {
        return (max, true);
    }
    (a + b, false)
}

/// Multiply two values, clamping at `max`
///
/// Returns `(a * b, false)` when the product fits under `max`, and
/// `(max, true)` otherwise. Each operand is checked against `max` divided by
/// the other, skipping the division whenever the divisor is zero.
///
/// # Example
///
/// ```rust
/// use keystone_runtime::clamped_mul;
///
/// assert_eq!(clamped_mul(6, 7, 100), (42, false));
/// assert_eq!(clamped_mul(60, 7, 100), (100, true));
/// assert_eq!(clamped_mul(0, u64::MAX, 100), (0, false));
/// ```
#[must_use]
#[inline]
pub const fn clamped_mul(a: u64, b: u64, max: u64) -> (u64, bool) {
    if (b != 0 && a > max / b) || (a != 0 && b > max / a) {
        return (max, true);
    }
    (a * b, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_within_ceiling() {
        assert_eq!(clamped_add(0, 0, 0), (0, false));
        assert_eq!(clamped_add(40, 2, 42), (42, false));
        assert_eq!(clamped_add(u64::MAX - 1, 1, u64::MAX), (u64::MAX, false));
    }

    #[test]
    fn test_add_clamps() {
        assert_eq!(clamped_add(40, 3, 42), (42, true));
        assert_eq!(clamped_add(u64::MAX, 1, u64::MAX), (u64::MAX, true));
        assert_eq!(clamped_add(0, 50, 42), (42, true));
    }

    #[test]
    fn test_mul_zero_operands() {
        assert_eq!(clamped_mul(0, 0, 0), (0, false));
        assert_eq!(clamped_mul(0, 9, 1), (0, false));
        assert_eq!(clamped_mul(9, 0, 1), (0, false));
    }

    #[test]
    fn test_mul_clamps() {
        assert_eq!(clamped_mul(u64::MAX, 2, u64::MAX), (u64::MAX, true));
        assert_eq!(clamped_mul(1 << 32, 1 << 32, u64::MAX), (u64::MAX, true));
        assert_eq!(clamped_mul(11, 10, 100), (100, true));
        assert_eq!(clamped_mul(10, 10, 100), (100, false));
    }
}
