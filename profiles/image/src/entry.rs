//! Second-stage entry: the first Rust code on the target.

use core::convert::Infallible;
use core::panic::PanicInfo;

use keystone_early::{BootConfig, BootError, BootHandoff, BootSequence, ImageLayout, Native};
use log::info;

use crate::descriptor::DESCRIPTOR;

cfg_if::cfg_if! {
    if #[cfg(target_arch = "x86")] {
        use keystone_early::arch::x86::Multiboot2Registers;

        const fn registers(magic: u32, information: usize) -> Multiboot2Registers {
            Multiboot2Registers { magic, information }
        }
    } else {
        use keystone_early::arch::arm::AtagsRegisters;

        const fn registers(machine: u32, tags: usize) -> AtagsRegisters {
            AtagsRegisters { machine, tags }
        }
    }
}

/// Called by `_start` with the two entry registers
///
/// Never returns: the boot either reaches [`start`] or parks the CPU in
/// [`miserable_fail`].
#[no_mangle]
#[allow(non_snake_case)]
pub extern "C" fn secondEntryPoint(first: u32, second: usize) -> ! {
    let sequence = BootSequence::<Native, _>::new(
        ImageLayout::from_linker(),
        &DESCRIPTOR,
        BootConfig::from_features(),
    );

    // SAFETY: the layout comes from the linker script, which keeps the
    // stack out of .bss and the vector table at the image start
    let never: Infallible =
        unsafe { sequence.run(registers(first, second), miserable_fail, start) };
    match never {}
}

/// Halt after a failed validation
///
/// `.bss` has not been cleared, so nothing that relies on it may run here.
fn miserable_fail(_error: BootError) -> Infallible {
    keystone_hal::park()
}

/// Handoff point to the kernel proper
fn start(handoff: BootHandoff) -> Infallible {
    info!(
        "early boot done, handoff at {:p}",
        handoff.pointer().as_ptr()
    );
    keystone_hal::park()
}

#[panic_handler]
fn panic(_info: &PanicInfo<'_>) -> ! {
    keystone_hal::park()
}
