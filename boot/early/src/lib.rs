//! # Keystone Early - Second-Stage Boot
//!
//! The first Rust code that runs. The startup assembly sets a stack and
//! forwards the bootloader's registers; from there this crate:
//!
//! 1. validates the registers against the architecture's [`BootProtocol`]
//!    (Multiboot2 magic and pointer on x86, ATAGS pointer on ARM),
//! 2. optionally checks that the [`DeviceDescriptor`] answers its self-test,
//! 3. clears `.bss`,
//! 4. on ARM, copies the vector table to the address the descriptor names,
//! 5. hands the validated [`BootHandoff`] to the next stage.
//!
//! Any failure goes to the caller's halt routine with nothing written.
//!
//! ## Example
//!
//! ```rust,no_run
//! use core::convert::Infallible;
//! use keystone_early::arch::x86::{Multiboot2Protocol, Multiboot2Registers};
//! use keystone_early::{BootConfig, BootSequence, ImageLayout, StaticDescriptor};
//!
//! static DESCRIPTOR: StaticDescriptor = StaticDescriptor::new(&[("testing:lookup", "working")]);
//!
//! fn second_entry(layout: ImageLayout, magic: u32, information: usize) -> ! {
//!     let sequence = BootSequence::<Multiboot2Protocol, _>::new(
//!         layout,
//!         &DESCRIPTOR,
//!         BootConfig::from_features(),
//!     );
//!     let registers = Multiboot2Registers { magic, information };
//!     let never: Infallible = unsafe {
//!         sequence.run(registers, |_error| loop {}, |_handoff| loop {})
//!     };
//!     match never {}
//! }
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

// =============================================================================
// Module Declarations
// =============================================================================

/// Per-architecture bootloader protocols
pub mod arch;

/// Optional sequence steps
pub mod config;

/// Device descriptor contract
pub mod descriptor;

/// Fatal boot errors
pub mod error;

/// Validated bootloader registers
pub mod handoff;

/// Linker-provided image bounds
pub mod layout;

/// The boot driver
pub mod sequence;

// =============================================================================
// Re-exports
// =============================================================================

pub use arch::BootProtocol;
pub use config::BootConfig;
pub use descriptor::{
    DeviceDescriptor, StaticDescriptor, KEY_SEPARATOR, SELF_TEST_KEY, SELF_TEST_VALUE,
    VECTOR_TABLE_KEY,
};
pub use error::{BootError, BootResult};
pub use handoff::BootHandoff;
pub use layout::ImageLayout;
pub use sequence::{BootPlan, BootSequence, VectorRelocation};

#[cfg(any(
    target_arch = "x86",
    target_arch = "x86_64",
    target_arch = "arm",
    target_arch = "aarch64"
))]
pub use arch::Native;
