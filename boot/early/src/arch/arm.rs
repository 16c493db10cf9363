//! ARM entry: the machine type in `r0` and the ATAGS (or device tree)
//! address in `r1`. There is no magic value, so the pointer checks are the
//! whole validation.

use core::ptr::NonNull;

use super::BootProtocol;
use crate::error::{BootError, BootResult};
use crate::handoff::BootHandoff;
use crate::layout::ImageLayout;

/// `r0` and `r1` at entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtagsRegisters {
    /// Board machine type
    pub machine: u32,
    /// ATAGS or device tree address
    pub tags: usize,
}

/// ATAGS handoff on ARM
#[derive(Debug, Clone, Copy)]
pub struct AtagsProtocol;

impl BootProtocol for AtagsProtocol {
    type Registers = AtagsRegisters;

    const NAME: &'static str = "atags";

    const RELOCATES_VECTORS: bool = true;

    fn validate(registers: Self::Registers, layout: &ImageLayout) -> BootResult<BootHandoff> {
        let tags = NonNull::new(registers.tags as *mut u8).ok_or(BootError::NullPointer)?;
        layout.check_outside(registers.tags)?;
        Ok(BootHandoff::Atags {
            machine: registers.machine,
            tags,
        })
    }
}
