//! Fallback for targets without a port: interrupts are left alone and the
//! CPU spins.

use crate::cpu::CpuControl;

/// Portable spinning CPU
#[derive(Debug, Clone, Copy)]
pub struct SpinCpu;

impl CpuControl for SpinCpu {
    const ARCH_NAME: &'static str = "portable";

    unsafe fn disable_interrupts() {}

    fn wait_for_interrupt() {
        core::hint::spin_loop();
    }
}
