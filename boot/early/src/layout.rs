//! # Image Layout
//!
//! Addresses the linker script exports about the running image. They are
//! plain numbers here: nothing in this crate dereferences them except the
//! `.bss` clear and the vector-table copy.

use crate::error::{BootError, BootResult};

/// Link-time bounds of the kernel image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageLayout {
    /// First byte of the image (`imageStart`)
    pub image_start: usize,
    /// End of the image (`imageEnd`), treated as an inclusive bound
    pub image_end: usize,
    /// First byte of `.bss` (`bssStart`)
    pub bss_start: usize,
    /// One past the last byte of `.bss` (`bssEnd`)
    pub bss_end: usize,
    /// One past the vector table (`vecend`), on images that carry one
    pub vectors_end: Option<usize>,
}

impl ImageLayout {
    /// Whether `address` falls in `[image_start, image_end]`
    #[must_use]
    pub const fn contains(&self, address: usize) -> bool {
        address >= self.image_start && address <= self.image_end
    }

    /// Reject a handoff pointer that points back into the image
    pub const fn check_outside(&self, address: usize) -> BootResult<()> {
        if self.contains(address) {
            Err(BootError::PointerInsideImage {
                address,
                image_start: self.image_start,
                image_end: self.image_end,
            })
        } else {
            Ok(())
        }
    }

    /// Size of `.bss` in bytes
    #[must_use]
    pub const fn bss_len(&self) -> usize {
        self.bss_end.abs_diff(self.bss_start)
    }

    /// Start and length of the vector table, which opens the image
    #[must_use]
    pub const fn vector_table(&self) -> Option<(usize, usize)> {
        match self.vectors_end {
            Some(end) => Some((self.image_start, end.saturating_sub(self.image_start))),
            None => None,
        }
    }

    /// Read the layout from the symbols the linker script defines
    #[cfg(target_os = "none")]
    #[must_use]
    pub fn from_linker() -> Self {
        use core::ptr::addr_of;

        #[allow(non_upper_case_globals)]
        extern "C" {
            static imageStart: u8;
            static imageEnd: u8;
            static bssStart: u8;
            static bssEnd: u8;
        }

        #[cfg(any(target_arch = "arm", target_arch = "aarch64"))]
        let vectors_end = {
            #[allow(non_upper_case_globals)]
            extern "C" {
                static vecend: u8;
            }
            // SAFETY: only the symbol address is taken
            Some(unsafe { addr_of!(vecend) } as usize)
        };
        #[cfg(not(any(target_arch = "arm", target_arch = "aarch64")))]
        let vectors_end = None;

        // SAFETY: only the symbol addresses are taken, never the contents
        unsafe {
            Self {
                image_start: addr_of!(imageStart) as usize,
                image_end: addr_of!(imageEnd) as usize,
                bss_start: addr_of!(bssStart) as usize,
                bss_end: addr_of!(bssEnd) as usize,
                vectors_end,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAYOUT: ImageLayout = ImageLayout {
        image_start: 0x10_0000,
        image_end: 0x14_0000,
        bss_start: 0x13_0000,
        bss_end: 0x14_0000,
        vectors_end: Some(0x10_0040),
    };

    #[test]
    fn test_containment_is_inclusive() {
        assert!(LAYOUT.contains(0x10_0000));
        assert!(LAYOUT.contains(0x14_0000));
        assert!(!LAYOUT.contains(0x0F_FFFF));
        assert!(!LAYOUT.contains(0x14_0001));
    }

    #[test]
    fn test_check_outside() {
        assert_eq!(LAYOUT.check_outside(0x9000), Ok(()));
        assert_eq!(
            LAYOUT.check_outside(0x12_0000),
            Err(BootError::PointerInsideImage {
                address: 0x12_0000,
                image_start: 0x10_0000,
                image_end: 0x14_0000,
            })
        );
    }

    #[test]
    fn test_sizes() {
        assert_eq!(LAYOUT.bss_len(), 0x1_0000);
        assert_eq!(LAYOUT.vector_table(), Some((0x10_0000, 0x40)));
        let without = ImageLayout {
            vectors_end: None,
            ..LAYOUT
        };
        assert_eq!(without.vector_table(), None);
    }
}
