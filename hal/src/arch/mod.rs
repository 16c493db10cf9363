//! # Architecture-Specific CPU Control
//!
//! Re-exports the [`CpuControl`](crate::CpuControl) implementation for the
//! target architecture as [`Native`].

cfg_if::cfg_if! {
    if #[cfg(any(target_arch = "x86", target_arch = "x86_64"))] {
        pub mod x86;
        /// CPU control for the build target
        pub type Native = x86::X86Cpu;
    } else if #[cfg(any(target_arch = "arm", target_arch = "aarch64"))] {
        pub mod arm;
        /// CPU control for the build target
        pub type Native = arm::ArmCpu;
    } else {
        pub mod spin;
        /// CPU control for the build target
        pub type Native = spin::SpinCpu;
    }
}
