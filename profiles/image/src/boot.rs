//! Startup code: the first instructions after the bootloader jumps in.
//!
//! Nothing here touches `.bss`. The stack is the linker-reserved `.stack`
//! section, which sits outside it.

use core::arch::global_asm;

cfg_if::cfg_if! {
    if #[cfg(target_arch = "x86")] {
        keystone_multiboot2::place_multiboot2_header!(keystone_multiboot2::KERNEL_HEADER);

        // eax: bootloader magic, ebx: boot information address
        global_asm!(
            ".section .start, \"ax\"",
            ".global _start",
            "_start:",
            "    cli",
            "    cld",
            "    mov esp, offset stackTop",
            "    xor ebp, ebp",
            // cdecl wants esp 16-aligned at the call
            "    sub esp, 8",
            "    push ebx",
            "    push eax",
            "    call secondEntryPoint",
            ".Lpark:",
            "    cli",
            "    hlt",
            "    jmp .Lpark",
        );
    } else if #[cfg(target_arch = "arm")] {
        // Copied as a unit to the descriptor's vector address. Each branch
        // loads from its slot 32 bytes further on, so the table works
        // wherever it lands.
        global_asm!(
            ".section .vectors, \"ax\"",
            ".arm",
            ".global vectorTable",
            "vectorTable:",
            "    ldr pc, [pc, #24]",
            "    ldr pc, [pc, #24]",
            "    ldr pc, [pc, #24]",
            "    ldr pc, [pc, #24]",
            "    ldr pc, [pc, #24]",
            "    ldr pc, [pc, #24]",
            "    ldr pc, [pc, #24]",
            "    ldr pc, [pc, #24]",
            "    .word _start",
            "    .word exceptionPark",
            "    .word exceptionPark",
            "    .word exceptionPark",
            "    .word exceptionPark",
            "    .word exceptionPark",
            "    .word exceptionPark",
            "    .word exceptionPark",
        );

        // r1: machine type, r2: ATAGS address; forwarded as the first two
        // arguments
        global_asm!(
            ".section .start, \"ax\"",
            ".arm",
            ".global _start",
            "_start:",
            "    cpsid if",
            "    ldr sp, =stackTop",
            "    mov r0, r1",
            "    mov r1, r2",
            "    bl secondEntryPoint",
            ".global exceptionPark",
            "exceptionPark:",
            "    cpsid if",
            "3:  wfi",
            "    b 3b",
            ".ltorg",
        );
    } else {
        compile_error!("keystone-image boots 32-bit x86 (Multiboot2) and 32-bit ARM only");
    }
}
