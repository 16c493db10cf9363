//! # Boot Errors
//!
//! Every variant is fatal. The sequence hands the error to its failure
//! collaborator, which parks the CPU; nothing is retried.

use core::fmt;

use keystone_multiboot2::HandoffError;

// =============================================================================
// Error Types
// =============================================================================

/// Reasons the early boot sequence refuses to continue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum BootError {
    /// The bootloader magic register held the wrong value
    BadMagic {
        /// The value found instead
        found: u32,
    },

    /// The handoff pointer was null
    NullPointer,

    /// The handoff pointer lies inside the kernel image
    PointerInsideImage {
        /// The offending pointer
        address: usize,
        /// First byte of the image
        image_start: usize,
        /// Last byte of the image (inclusive bound)
        image_end: usize,
    },

    /// The device descriptor failed its self-test lookup
    DescriptorUnavailable,

    /// A required device descriptor property is absent
    MissingProperty {
        /// The key that was looked up
        key: &'static str,
    },
}

impl fmt::Display for BootError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadMagic { found } => {
                write!(f, "bootloader magic {found:#010x} not recognised")
            }

            Self::NullPointer => write!(f, "handoff pointer is null"),

            Self::PointerInsideImage {
                address,
                image_start,
                image_end,
            } => write!(
                f,
                "handoff pointer {address:#x} lies inside the image [{image_start:#x}, {image_end:#x}]"
            ),

            Self::DescriptorUnavailable => write!(f, "device descriptor self-test failed"),

            Self::MissingProperty { key } => {
                write!(f, "device descriptor has no property {key:?}")
            }
        }
    }
}

impl From<HandoffError> for BootError {
    fn from(error: HandoffError) -> Self {
        match error {
            HandoffError::BadMagic { found } => Self::BadMagic { found },
            HandoffError::NullPointer => Self::NullPointer,
        }
    }
}

// =============================================================================
// Result Type
// =============================================================================

/// Result type for boot checks
pub type BootResult<T> = Result<T, BootError>;
