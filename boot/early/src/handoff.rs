//! What the bootloader handed over, once validated. The value travels by
//! ownership from the boot sequence to the next stage; it never sits in a
//! global, so clearing `.bss` cannot lose it.

use core::ptr::NonNull;

/// Validated bootloader registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootHandoff {
    /// x86: address of the Multiboot2 information structure
    Multiboot2 {
        /// Boot information, outside the image and non-null
        information: NonNull<u8>,
    },

    /// ARM: machine type and the ATAGS/device tree blob address
    Atags {
        /// Board identifier from the bootloader
        machine: u32,
        /// Tag list, outside the image and non-null
        tags: NonNull<u8>,
    },
}

impl BootHandoff {
    /// The handed-over pointer, whatever the protocol
    #[must_use]
    pub const fn pointer(&self) -> NonNull<u8> {
        match *self {
            Self::Multiboot2 { information } => information,
            Self::Atags { tags, .. } => tags,
        }
    }

    /// Machine type, on protocols that pass one
    #[must_use]
    pub const fn machine(&self) -> Option<u32> {
        match *self {
            Self::Multiboot2 { .. } => None,
            Self::Atags { machine, .. } => Some(machine),
        }
    }
}
