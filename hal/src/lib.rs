//! # Keystone HAL - CPU Control
//!
//! The handful of processor operations the early boot stage needs before any
//! driver exists: masking interrupts, waiting for one, and parking the CPU for
//! good when boot cannot continue.
//!
//! Each architecture implements [`CpuControl`]; [`Native`] is the one for the
//! build target. Targets without an implementation fall back to a spin loop
//! so host builds and tests still link.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]

pub mod arch;
pub mod cpu;

pub use arch::Native;
pub use cpu::CpuControl;

/// Stop the current CPU forever with interrupts masked
///
/// This is the halt collaborator for boot failures. It writes no memory, so
/// it is safe to call before `.bss` is cleared.
pub fn park() -> ! {
    Native::park()
}
