//! Multiboot2 entry: `eax` holds the bootloader magic, `ebx` the boot
//! information address.

use keystone_multiboot2::validate_handoff;

use super::BootProtocol;
use crate::error::BootResult;
use crate::handoff::BootHandoff;
use crate::layout::ImageLayout;

/// `eax` and `ebx` at entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Multiboot2Registers {
    /// Bootloader magic
    pub magic: u32,
    /// Boot information address
    pub information: usize,
}

/// Multiboot2 handoff on x86
#[derive(Debug, Clone, Copy)]
pub struct Multiboot2Protocol;

impl BootProtocol for Multiboot2Protocol {
    type Registers = Multiboot2Registers;

    const NAME: &'static str = "multiboot2";

    const RELOCATES_VECTORS: bool = false;

    fn validate(registers: Self::Registers, layout: &ImageLayout) -> BootResult<BootHandoff> {
        let information = validate_handoff(registers.magic, registers.information)?;
        layout.check_outside(information.as_ptr() as usize)?;
        Ok(BootHandoff::Multiboot2 { information })
    }
}

#[cfg(test)]
mod tests {
    use keystone_multiboot2::BOOTLOADER_MAGIC;

    use super::*;
    use crate::error::BootError;

    const LAYOUT: ImageLayout = ImageLayout {
        image_start: 0x10_0000,
        image_end: 0x18_0000,
        bss_start: 0x17_0000,
        bss_end: 0x18_0000,
        vectors_end: None,
    };

    fn validate(magic: u32, information: usize) -> BootResult<BootHandoff> {
        Multiboot2Protocol::validate(Multiboot2Registers { magic, information }, &LAYOUT)
    }

    #[test]
    fn test_accepts_pointer_outside_image() {
        for information in [0x1000, 0x0F_FFFF, 0x18_0001, usize::MAX] {
            let handoff = validate(BOOTLOADER_MAGIC, information).unwrap();
            assert_eq!(handoff.pointer().as_ptr() as usize, information);
            assert_eq!(handoff.machine(), None);
        }
    }

    #[test]
    fn test_rejects_bad_magic() {
        assert_eq!(
            validate(0x2BAD_B002, 0x1000),
            Err(BootError::BadMagic { found: 0x2BAD_B002 })
        );
    }

    #[test]
    fn test_rejects_null() {
        assert_eq!(validate(BOOTLOADER_MAGIC, 0), Err(BootError::NullPointer));
    }

    #[test]
    fn test_rejects_image_bounds() {
        for information in [0x10_0000, 0x12_3456, 0x18_0000] {
            assert!(matches!(
                validate(BOOTLOADER_MAGIC, information),
                Err(BootError::PointerInsideImage { address, .. }) if address == information
            ));
        }
    }
}
