//! # CPU Control
//!
//! `cli`/`hlt` for 32- and 64-bit x86.

use core::arch::asm;

use crate::cpu::CpuControl;

/// x86 CPU
#[derive(Debug, Clone, Copy)]
pub struct X86Cpu;

impl CpuControl for X86Cpu {
    #[cfg(target_arch = "x86")]
    const ARCH_NAME: &'static str = "x86";
    #[cfg(target_arch = "x86_64")]
    const ARCH_NAME: &'static str = "x86_64";

    #[inline]
    unsafe fn disable_interrupts() {
        // SAFETY: forwarded from the caller
        unsafe { asm!("cli", options(nomem, nostack, preserves_flags)) };
    }

    #[inline]
    fn wait_for_interrupt() {
        // SAFETY: hlt only idles the CPU
        unsafe { asm!("hlt", options(nomem, nostack, preserves_flags)) };
    }
}
