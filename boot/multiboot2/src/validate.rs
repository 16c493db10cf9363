//! # Handoff Validation
//!
//! The first look at what a Multiboot2 bootloader left in `eax`/`ebx`. Where
//! the information structure points relative to the kernel image is checked
//! by the caller, which knows the image bounds.

use core::fmt;
use core::ptr::NonNull;

use crate::BOOTLOADER_MAGIC;

// =============================================================================
// Error Types
// =============================================================================

/// Ways a Multiboot2 handoff can be malformed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandoffError {
    /// `eax` did not hold [`BOOTLOADER_MAGIC`]
    BadMagic {
        /// The value found instead
        found: u32,
    },

    /// `ebx` was zero
    NullPointer,
}

impl fmt::Display for HandoffError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadMagic { found } => write!(
                f,
                "bootloader magic {found:#010x} is not {BOOTLOADER_MAGIC:#010x}"
            ),
            Self::NullPointer => write!(f, "boot information pointer is null"),
        }
    }
}

// =============================================================================
// Result Type
// =============================================================================

/// Result type for handoff checks
pub type HandoffResult<T> = Result<T, HandoffError>;

// =============================================================================
// Validation Functions
// =============================================================================

/// Check the bootloader magic value
pub const fn validate_magic(magic: u32) -> HandoffResult<()> {
    if magic == BOOTLOADER_MAGIC {
        Ok(())
    } else {
        Err(HandoffError::BadMagic { found: magic })
    }
}

/// Check the registers a Multiboot2 bootloader hands over
///
/// Returns the information structure address as a non-null pointer.
pub fn validate_handoff(magic: u32, information: usize) -> HandoffResult<NonNull<u8>> {
    validate_magic(magic)?;
    NonNull::new(information as *mut u8).ok_or(HandoffError::NullPointer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_magic_and_pointer() {
        let pointer = validate_handoff(BOOTLOADER_MAGIC, 0x9000).unwrap();
        assert_eq!(pointer.as_ptr() as usize, 0x9000);
    }

    #[test]
    fn test_rejects_bad_magic_first() {
        assert_eq!(
            validate_handoff(0x2BAD_B002, 0),
            Err(HandoffError::BadMagic { found: 0x2BAD_B002 })
        );
        assert_eq!(validate_magic(0), Err(HandoffError::BadMagic { found: 0 }));
    }

    #[test]
    fn test_rejects_null() {
        assert_eq!(validate_handoff(BOOTLOADER_MAGIC, 0), Err(HandoffError::NullPointer));
    }

    #[test]
    fn test_display() {
        let message = HandoffError::BadMagic { found: 0x2BAD_B002 }.to_string();
        assert_eq!(message, "bootloader magic 0x2badb002 is not 0x36d76289");
    }
}
