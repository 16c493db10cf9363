//! # CPU Abstraction
//!
//! The processor operations the boot path relies on.

/// CPU control trait
///
/// Implemented once per architecture on a zero-sized marker type.
pub trait CpuControl {
    /// Architecture name
    const ARCH_NAME: &'static str;

    /// Mask maskable interrupts
    ///
    /// # Safety
    /// Code that expects to be interrupted (timers, preemption) stops working.
    unsafe fn disable_interrupts();

    /// Idle until the next interrupt or event
    fn wait_for_interrupt();

    /// Mask interrupts and idle forever
    fn park() -> ! {
        // SAFETY: nothing runs after this point
        unsafe { Self::disable_interrupts() };
        loop {
            Self::wait_for_interrupt();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Native;

    #[test]
    fn test_native_is_named() {
        assert!(!<Native as CpuControl>::ARCH_NAME.is_empty());
    }
}
