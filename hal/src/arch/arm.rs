//! # CPU Control
//!
//! Interrupt masking and `wfi` for 32-bit ARM and AArch64.

use core::arch::asm;

use crate::cpu::CpuControl;

/// ARM CPU
#[derive(Debug, Clone, Copy)]
pub struct ArmCpu;

/// Mask IRQ and FIQ
#[cfg(target_arch = "arm")]
#[inline]
unsafe fn mask_exceptions() {
    // SAFETY: forwarded from the caller
    unsafe { asm!("cpsid if", options(nomem, nostack, preserves_flags)) };
}

/// Mask debug, SError, IRQ and FIQ
#[cfg(target_arch = "aarch64")]
#[inline]
unsafe fn mask_exceptions() {
    // SAFETY: forwarded from the caller
    unsafe { asm!("msr daifset, #0xf", options(nomem, nostack, preserves_flags)) };
}

impl CpuControl for ArmCpu {
    #[cfg(target_arch = "arm")]
    const ARCH_NAME: &'static str = "arm";
    #[cfg(target_arch = "aarch64")]
    const ARCH_NAME: &'static str = "aarch64";

    #[inline]
    unsafe fn disable_interrupts() {
        // SAFETY: forwarded from the caller
        unsafe { mask_exceptions() };
    }

    #[inline]
    fn wait_for_interrupt() {
        // SAFETY: wfi only idles the CPU
        unsafe { asm!("wfi", options(nomem, nostack, preserves_flags)) };
    }
}
