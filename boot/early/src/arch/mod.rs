//! # Boot Protocols
//!
//! One [`BootProtocol`] per architecture family, each turning raw entry
//! registers into a [`BootHandoff`] or a [`BootError`](crate::BootError).
//! Both implementations are plain logic and build everywhere; [`Native`]
//! picks the one matching the target.

use core::fmt::Debug;

use crate::error::BootResult;
use crate::handoff::BootHandoff;
use crate::layout::ImageLayout;

pub mod arm;
pub mod x86;

/// Entry register contract of a bootloader protocol
pub trait BootProtocol {
    /// Registers the startup assembly forwards, in entry order
    type Registers: Copy + Debug;

    /// Short protocol name for log records
    const NAME: &'static str;

    /// Whether images on this architecture relocate their vector table
    const RELOCATES_VECTORS: bool;

    /// Check the registers against the protocol and the image bounds
    fn validate(registers: Self::Registers, layout: &ImageLayout) -> BootResult<BootHandoff>;
}

cfg_if::cfg_if! {
    if #[cfg(any(target_arch = "x86", target_arch = "x86_64"))] {
        /// The protocol of the architecture being built for
        pub type Native = x86::Multiboot2Protocol;
    } else if #[cfg(any(target_arch = "arm", target_arch = "aarch64"))] {
        /// The protocol of the architecture being built for
        pub type Native = arm::AtagsProtocol;
    }
}
