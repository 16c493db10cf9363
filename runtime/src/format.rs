//! Numeral formatting into a fixed buffer, digits produced by
//! [`long_division`] so the path stays free of hardware divides.

use crate::ascii::digit_char;
use crate::division::{long_division, SignedMagnitude};
use crate::{MAX_BASE, MIN_BASE};

/// A numeral rendered into an `N`-byte stack buffer
#[derive(Debug, Clone, Copy)]
pub struct NumeralWriter<const N: usize> {
    buffer: [u8; N],
    start: usize,
}

impl<const N: usize> NumeralWriter<N> {
    /// Render `value` in `base`, lowercase, without prefix or sign
    ///
    /// Returns `None` for a base outside 2..=36 or when the digits do not fit
    /// in `N` bytes.
    ///
    /// # Example
    ///
    /// ```rust
    /// use keystone_runtime::NumeralWriter;
    ///
    /// let numeral = NumeralWriter::<16>::format(0xBEEF, 16).unwrap();
    /// assert_eq!(numeral.as_str(), "beef");
    /// ```
    #[must_use]
    pub fn format(value: u64, base: u32) -> Option<Self> {
        if !(MIN_BASE..=MAX_BASE).contains(&base) {
            return None;
        }
        let mut writer = Self {
            buffer: [0; N],
            start: N,
        };
        let divisor = SignedMagnitude::positive(u64::from(base));
        let mut rest = value;
        loop {
            let step = long_division(SignedMagnitude::positive(rest), divisor);
            writer.start = writer.start.checked_sub(1)?;
            // remainder < base <= 36
            writer.buffer[writer.start] = digit_char(step.remainder as u32);
            rest = step.quotient.magnitude;
            if rest == 0 {
                return Some(writer);
            }
        }
    }

    /// The rendered digits
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer[self.start..]
    }

    /// The rendered digits as text
    #[must_use]
    pub fn as_str(&self) -> &str {
        // Only ASCII digits and letters are ever written
        core::str::from_utf8(self.as_bytes()).unwrap_or_default()
    }
}
