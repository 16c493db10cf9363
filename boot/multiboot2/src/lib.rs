//! # Keystone Multiboot2 - Header Emitter and Handoff Check
//!
//! An x86 bootloader finds a Multiboot2 kernel by scanning the first 32 KiB of
//! the image for an 8-byte aligned header: four words (magic, architecture,
//! length, checksum) followed by a sequence of tags, each
//! `{type: u16, flags: u16, size: u32, payload}`, padded to 8 bytes and closed
//! by an end tag. This crate builds that byte image entirely in `const`
//! context, so a broken header fails the build instead of the boot.
//!
//! ## Quick Start
//!
//! ```rust
//! use keystone_multiboot2::header::{HeaderBuilder, Multiboot2Header, TagFlags};
//! use keystone_multiboot2::{tag_types, ARCHITECTURE_I386};
//!
//! static HEADER: Multiboot2Header = HeaderBuilder::new(ARCHITECTURE_I386)
//!     .information_request(TagFlags::empty(), &[tag_types::MEMORY_MAP])
//!     .module_align(TagFlags::empty())
//!     .build();
//!
//! assert!(HEADER.is_valid());
//! ```
//!
//! On the way back, the bootloader leaves [`BOOTLOADER_MAGIC`] in `eax` and the
//! information structure address in `ebx`; [`validate::validate_handoff`]
//! checks both before anything trusts them.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      KEYSTONE MULTIBOOT2 LAYERS                         │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │  validate: bootloader magic + information pointer check                 │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │  header:   HeaderBuilder (const) -> Multiboot2Header byte image         │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │  lib:      protocol constants, checksum, alignment                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// =============================================================================
// Module Declarations
// =============================================================================

/// Multiboot2 header generation (compile-time)
pub mod header;

/// Bootloader handoff validation
pub mod validate;

// =============================================================================
// Re-exports
// =============================================================================

pub use header::{HeaderBuilder, HeaderTag, Multiboot2Header, KERNEL_HEADER};
pub use validate::{validate_handoff, HandoffError, HandoffResult};

// =============================================================================
// Protocol Constants
// =============================================================================

/// Magic word opening the header in the kernel image
pub const HEADER_MAGIC: u32 = 0xE852_50D6;

/// Value a compliant bootloader leaves in `eax` when it enters the kernel
pub const BOOTLOADER_MAGIC: u32 = 0x36D7_6289;

/// Architecture field for 32-bit protected-mode i386 entry
pub const ARCHITECTURE_I386: u32 = 0;

/// Architecture field for 32-bit MIPS
pub const ARCHITECTURE_MIPS32: u32 = 4;

/// Alignment of the header and of every tag inside it
pub const TAG_ALIGNMENT: usize = 8;

/// The header must lie entirely within this many bytes of the image start
pub const HEADER_SEARCH_LIMIT: usize = 32 * 1024;

/// Size of the fixed part of the header: magic, architecture, length, checksum
pub const FIXED_HEADER_SIZE: usize = 16;

/// Size of a tag's `{type, flags, size}` prefix
pub const TAG_HEADER_SIZE: usize = 8;

// =============================================================================
// Information Request Types
// =============================================================================

/// Boot information tag types a kernel can ask for in an information request
pub mod tag_types {
    /// Boot command line
    pub const CMDLINE: u32 = 1;
    /// Bootloader name
    pub const BOOTLOADER_NAME: u32 = 2;
    /// Boot modules
    pub const MODULE: u32 = 3;
    /// Lower/upper memory sizes
    pub const BASIC_MEMINFO: u32 = 4;
    /// BIOS boot device
    pub const BOOT_DEVICE: u32 = 5;
    /// Memory map
    pub const MEMORY_MAP: u32 = 6;
    /// VBE control and mode information
    pub const VBE: u32 = 7;
    /// Framebuffer description
    pub const FRAMEBUFFER: u32 = 8;
    /// ELF section headers
    pub const ELF_SECTIONS: u32 = 9;
    /// APM table
    pub const APM: u32 = 10;
    /// 32-bit EFI system table pointer
    pub const EFI32_SYSTEM_TABLE: u32 = 11;
    /// 64-bit EFI system table pointer
    pub const EFI64_SYSTEM_TABLE: u32 = 12;
    /// SMBIOS tables
    pub const SMBIOS: u32 = 13;
    /// ACPI 1.0 RSDP copy
    pub const ACPI_OLD: u32 = 14;
    /// ACPI 2.0+ RSDP copy
    pub const ACPI_NEW: u32 = 15;
    /// DHCP ACK packet
    pub const NETWORK: u32 = 16;
    /// EFI memory map
    pub const EFI_MEMORY_MAP: u32 = 17;
    /// EFI boot services were not terminated
    pub const EFI_BOOT_SERVICES: u32 = 18;
    /// 32-bit EFI image handle
    pub const EFI32_IMAGE_HANDLE: u32 = 19;
    /// 64-bit EFI image handle
    pub const EFI64_IMAGE_HANDLE: u32 = 20;
    /// Physical load base of the image
    pub const LOAD_BASE_ADDR: u32 = 21;
}

// =============================================================================
// Utility Functions
// =============================================================================

/// Checksum word for a header
///
/// Chosen so that `magic + architecture + header_length + checksum` wraps to
/// zero, i.e. `0x1_0000_0000 - (magic + architecture + header_length)`.
#[must_use]
pub const fn calculate_checksum(magic: u32, architecture: u32, header_length: u32) -> u32 {
    magic
        .wrapping_add(architecture)
        .wrapping_add(header_length)
        .wrapping_neg()
}

/// Whether the four fixed header words sum to zero modulo 2^32
#[must_use]
pub const fn verify_checksum(
    magic: u32,
    architecture: u32,
    header_length: u32,
    checksum: u32,
) -> bool {
    magic
        .wrapping_add(architecture)
        .wrapping_add(header_length)
        .wrapping_add(checksum)
        == 0
}

/// Round `value` up to a multiple of `alignment` (a power of two)
#[must_use]
pub const fn align_up(value: usize, alignment: usize) -> usize {
    (value + alignment - 1) & !(alignment - 1)
}

// =============================================================================
// Compile-Time Assertions
// =============================================================================

const _: () = {
    assert!(TAG_ALIGNMENT.is_power_of_two());
    assert!(align_up(12, TAG_ALIGNMENT) == 16);
    assert!(align_up(24, TAG_ALIGNMENT) == 24);

    let checksum = calculate_checksum(HEADER_MAGIC, ARCHITECTURE_I386, 24);
    assert!(verify_checksum(HEADER_MAGIC, ARCHITECTURE_I386, 24, checksum));
};
