//! # Multiboot2 Header Generation
//!
//! [`HeaderBuilder`] serialises tags into a byte image in `const` context, and
//! [`Multiboot2Header`] is that image, ready for a `#[link_section]` static.
//!
//! ## Memory Layout
//!
//! ```text
//! ┌────────────────────────────────────┐
//! │ magic: u32          (0xE85250D6)   │ Offset 0
//! │ architecture: u32                  │ Offset 4
//! │ header_length: u32                 │ Offset 8
//! │ checksum: u32                      │ Offset 12
//! ├────────────────────────────────────┤
//! │ type: u16 │ flags: u16 │ size: u32 │ Offset 16 (each tag 8-aligned)
//! │ payload, zero-padded to 8 bytes    │
//! ├────────────────────────────────────┤
//! │ End Tag: type=0, flags=0, size=8   │
//! └────────────────────────────────────┘
//! ```
//!
//! A tag's `size` field records its unpadded size; the next tag starts at the
//! following 8-byte boundary. `header_length` covers everything up to and
//! including the end tag.

use bitflags::bitflags;
use static_assertions::{assert_eq_size, const_assert_eq};

use crate::{
    align_up, calculate_checksum, tag_types, verify_checksum, ARCHITECTURE_I386,
    FIXED_HEADER_SIZE, HEADER_MAGIC, HEADER_SEARCH_LIMIT, TAG_ALIGNMENT, TAG_HEADER_SIZE,
};

/// Bytes reserved for a serialised header
pub const HEADER_CAPACITY: usize = 256;

const_assert_eq!(HEADER_CAPACITY % TAG_ALIGNMENT, 0);

// =============================================================================
// Flags
// =============================================================================

bitflags! {
    /// The `flags` half-word of every header tag
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TagFlags: u16 {
        /// The bootloader may boot the image even if it cannot honour the tag
        const OPTIONAL = 1 << 0;
    }
}

bitflags! {
    /// Payload of the console flags tag
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ConsoleFlags: u32 {
        /// The image needs a console to be available
        const CONSOLE_REQUIRED = 1 << 0;
        /// The image can drive an EGA text console
        const EGA_TEXT_SUPPORTED = 1 << 1;
    }
}

/// Load address preference of a relocatable image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum LoadPreference {
    /// Anywhere in range
    None = 0,
    /// As low as possible
    Lowest = 1,
    /// As high as possible
    Highest = 2,
}

// =============================================================================
// Header Tag Types
// =============================================================================

/// Header tag type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum HeaderTag {
    /// End of tags
    End,
    /// Information request
    InformationRequest,
    /// Physical load addresses for a non-ELF image
    Address,
    /// Entry point address
    EntryAddress,
    /// Console flags
    ConsoleFlags,
    /// Framebuffer request
    Framebuffer,
    /// Page-align boot modules
    ModuleAlign,
    /// Keep EFI boot services running
    EfiBootServices,
    /// 32-bit EFI entry point
    EntryAddressEfi32,
    /// 64-bit EFI entry point
    EntryAddressEfi64,
    /// Relocatable image
    Relocatable,
    /// Unknown tag type
    Unknown(u16),
}

impl HeaderTag {
    /// Create from raw tag type value
    #[must_use]
    pub const fn from_type(tag_type: u16) -> Self {
        match tag_type {
            0 => Self::End,
            1 => Self::InformationRequest,
            2 => Self::Address,
            3 => Self::EntryAddress,
            4 => Self::ConsoleFlags,
            5 => Self::Framebuffer,
            6 => Self::ModuleAlign,
            7 => Self::EfiBootServices,
            8 => Self::EntryAddressEfi32,
            9 => Self::EntryAddressEfi64,
            10 => Self::Relocatable,
            other => Self::Unknown(other),
        }
    }

    /// Get raw tag type value
    #[must_use]
    pub const fn as_type(&self) -> u16 {
        match self {
            Self::End => 0,
            Self::InformationRequest => 1,
            Self::Address => 2,
            Self::EntryAddress => 3,
            Self::ConsoleFlags => 4,
            Self::Framebuffer => 5,
            Self::ModuleAlign => 6,
            Self::EfiBootServices => 7,
            Self::EntryAddressEfi32 => 8,
            Self::EntryAddressEfi64 => 9,
            Self::Relocatable => 10,
            Self::Unknown(t) => *t,
        }
    }

    /// Unpadded size the protocol declares for this tag
    ///
    /// `None` for the information request, whose size depends on how many
    /// types it asks for, and for unknown tags.
    #[must_use]
    pub const fn declared_size(&self) -> Option<usize> {
        match self {
            Self::End | Self::ModuleAlign | Self::EfiBootServices => Some(8),
            Self::EntryAddress
            | Self::ConsoleFlags
            | Self::EntryAddressEfi32
            | Self::EntryAddressEfi64 => Some(12),
            Self::Framebuffer => Some(20),
            Self::Address | Self::Relocatable => Some(24),
            Self::InformationRequest | Self::Unknown(_) => None,
        }
    }
}

/// Size of an information request asking for `count` types
#[must_use]
pub const fn information_request_size(count: usize) -> usize {
    TAG_HEADER_SIZE + count * 4
}

// =============================================================================
// Header Image
// =============================================================================

/// A serialised Multiboot2 header
///
/// Only the first [`header_length`](Self::header_length) bytes are
/// meaningful; the rest of the buffer is zero.
#[repr(C, align(8))]
#[derive(Clone, Copy)]
pub struct Multiboot2Header {
    bytes: [u8; HEADER_CAPACITY],
}

const_assert_eq!(core::mem::align_of::<Multiboot2Header>(), TAG_ALIGNMENT);
assert_eq_size!(Multiboot2Header, [u8; HEADER_CAPACITY]);

const fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

const fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

impl Multiboot2Header {
    /// Get the magic number
    #[must_use]
    pub const fn magic(&self) -> u32 {
        read_u32(&self.bytes, 0)
    }

    /// Get the architecture
    #[must_use]
    pub const fn architecture(&self) -> u32 {
        read_u32(&self.bytes, 4)
    }

    /// Get the header length, end tag included
    #[must_use]
    pub const fn header_length(&self) -> u32 {
        read_u32(&self.bytes, 8)
    }

    /// Get the checksum
    #[must_use]
    pub const fn checksum(&self) -> u32 {
        read_u32(&self.bytes, 12)
    }

    /// Magic, checksum and length all hold
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        let length = self.header_length() as usize;
        self.magic() == HEADER_MAGIC
            && verify_checksum(
                self.magic(),
                self.architecture(),
                self.header_length(),
                self.checksum(),
            )
            && length >= FIXED_HEADER_SIZE + TAG_HEADER_SIZE
            && length <= HEADER_CAPACITY
            && length % TAG_ALIGNMENT == 0
    }

    /// The meaningful bytes of the header
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        let length = (self.header_length() as usize).min(HEADER_CAPACITY);
        &self.bytes[..length]
    }

    /// Walk the tags in order, end tag included
    #[must_use]
    pub fn tags(&self) -> Tags<'_> {
        Tags {
            bytes: self.as_bytes(),
            offset: FIXED_HEADER_SIZE,
            finished: false,
        }
    }
}

/// One tag as found in a serialised header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawTag<'a> {
    /// Tag type
    pub kind: HeaderTag,
    /// Tag flags
    pub flags: TagFlags,
    /// Unpadded size, prefix included
    pub size: u32,
    /// Payload following the 8-byte prefix
    pub payload: &'a [u8],
}

impl RawTag<'_> {
    /// Little-endian word `index` of the payload
    #[must_use]
    pub fn word(&self, index: usize) -> Option<u32> {
        let start = index * 4;
        if start + 4 > self.payload.len() {
            return None;
        }
        Some(read_u32(self.payload, start))
    }
}

/// Iterator over the tags of a [`Multiboot2Header`]
#[derive(Debug, Clone)]
pub struct Tags<'a> {
    bytes: &'a [u8],
    offset: usize,
    finished: bool,
}

impl<'a> Iterator for Tags<'a> {
    type Item = RawTag<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished || self.offset + TAG_HEADER_SIZE > self.bytes.len() {
            return None;
        }
        let kind = HeaderTag::from_type(read_u16(self.bytes, self.offset));
        let flags = TagFlags::from_bits_retain(read_u16(self.bytes, self.offset + 2));
        let size = read_u32(self.bytes, self.offset + 4);
        let end = self.offset + size as usize;
        if (size as usize) < TAG_HEADER_SIZE || end > self.bytes.len() {
            self.finished = true;
            return None;
        }

        let tag = RawTag {
            kind,
            flags,
            size,
            payload: &self.bytes[self.offset + TAG_HEADER_SIZE..end],
        };
        self.finished = kind == HeaderTag::End;
        self.offset = align_up(end, TAG_ALIGNMENT);
        Some(tag)
    }
}

// =============================================================================
// Header Builder
// =============================================================================

/// Const builder for [`Multiboot2Header`]
///
/// Tags are written in call order. Each method panics when the tag would not
/// fit in [`HEADER_CAPACITY`], which in a `static` initialiser is a build
/// error.
///
/// # Example
///
/// ```rust
/// use keystone_multiboot2::header::{HeaderBuilder, TagFlags};
/// use keystone_multiboot2::ARCHITECTURE_I386;
///
/// let header = HeaderBuilder::new(ARCHITECTURE_I386)
///     .framebuffer(TagFlags::OPTIONAL, 1024, 768, 32)
///     .build();
/// assert_eq!(header.header_length(), 16 + 24 + 8);
/// ```
#[derive(Clone, Copy)]
pub struct HeaderBuilder {
    bytes: [u8; HEADER_CAPACITY],
    cursor: usize,
    architecture: u32,
}

impl HeaderBuilder {
    /// Start a header for `architecture`
    #[must_use]
    pub const fn new(architecture: u32) -> Self {
        Self {
            bytes: [0; HEADER_CAPACITY],
            cursor: FIXED_HEADER_SIZE,
            architecture,
        }
    }

    const fn put_u16(mut self, offset: usize, value: u16) -> Self {
        let bytes = value.to_le_bytes();
        self.bytes[offset] = bytes[0];
        self.bytes[offset + 1] = bytes[1];
        self
    }

    const fn put_u32(mut self, offset: usize, value: u32) -> Self {
        let bytes = value.to_le_bytes();
        let mut index = 0;
        while index < bytes.len() {
            self.bytes[offset + index] = bytes[index];
            index += 1;
        }
        self
    }

    /// Write the tag prefix at the cursor without advancing it
    const fn open_tag(self, tag: HeaderTag, flags: TagFlags, size: usize) -> Self {
        assert!(
            self.cursor + align_up(size, TAG_ALIGNMENT) + TAG_HEADER_SIZE <= HEADER_CAPACITY,
            "multiboot2 header tags exceed HEADER_CAPACITY"
        );
        let at = self.cursor;
        self.put_u16(at, tag.as_type())
            .put_u16(at + 2, flags.bits())
            .put_u32(at + 4, size as u32)
    }

    /// Advance the cursor past a tag of `size` bytes and its padding
    const fn close_tag(mut self, size: usize) -> Self {
        self.cursor += align_up(size, TAG_ALIGNMENT);
        self
    }

    /// Ask the bootloader for the given boot information tag types
    /// (see [`tag_types`])
    #[must_use]
    pub const fn information_request(self, flags: TagFlags, requests: &[u32]) -> Self {
        let size = information_request_size(requests.len());
        let payload = self.cursor + TAG_HEADER_SIZE;
        let mut builder = self.open_tag(HeaderTag::InformationRequest, flags, size);
        let mut index = 0;
        while index < requests.len() {
            builder = builder.put_u32(payload + index * 4, requests[index]);
            index += 1;
        }
        builder.close_tag(size)
    }

    /// Physical load addresses, for images the bootloader cannot parse as ELF
    #[must_use]
    pub const fn address(
        self,
        flags: TagFlags,
        header_addr: u32,
        load_addr: u32,
        load_end_addr: u32,
        bss_end_addr: u32,
    ) -> Self {
        const SIZE: usize = 24;
        let payload = self.cursor + TAG_HEADER_SIZE;
        self.open_tag(HeaderTag::Address, flags, SIZE)
            .put_u32(payload, header_addr)
            .put_u32(payload + 4, load_addr)
            .put_u32(payload + 8, load_end_addr)
            .put_u32(payload + 12, bss_end_addr)
            .close_tag(SIZE)
    }

    /// Physical address to jump to instead of the ELF entry
    #[must_use]
    pub const fn entry_address(self, flags: TagFlags, entry: u32) -> Self {
        self.entry_tag(HeaderTag::EntryAddress, flags, entry)
    }

    /// Entry point used on 32-bit EFI firmware
    #[must_use]
    pub const fn efi32_entry_address(self, flags: TagFlags, entry: u32) -> Self {
        self.entry_tag(HeaderTag::EntryAddressEfi32, flags, entry)
    }

    /// Entry point used on 64-bit EFI firmware
    #[must_use]
    pub const fn efi64_entry_address(self, flags: TagFlags, entry: u32) -> Self {
        self.entry_tag(HeaderTag::EntryAddressEfi64, flags, entry)
    }

    const fn entry_tag(self, tag: HeaderTag, flags: TagFlags, entry: u32) -> Self {
        const SIZE: usize = 12;
        let payload = self.cursor + TAG_HEADER_SIZE;
        self.open_tag(tag, flags, SIZE)
            .put_u32(payload, entry)
            .close_tag(SIZE)
    }

    /// Console requirements
    #[must_use]
    pub const fn console_flags(self, flags: TagFlags, console: ConsoleFlags) -> Self {
        const SIZE: usize = 12;
        let payload = self.cursor + TAG_HEADER_SIZE;
        self.open_tag(HeaderTag::ConsoleFlags, flags, SIZE)
            .put_u32(payload, console.bits())
            .close_tag(SIZE)
    }

    /// Preferred framebuffer mode; zero in a field means no preference
    #[must_use]
    pub const fn framebuffer(self, flags: TagFlags, width: u32, height: u32, depth: u32) -> Self {
        const SIZE: usize = 20;
        let payload = self.cursor + TAG_HEADER_SIZE;
        self.open_tag(HeaderTag::Framebuffer, flags, SIZE)
            .put_u32(payload, width)
            .put_u32(payload + 4, height)
            .put_u32(payload + 8, depth)
            .close_tag(SIZE)
    }

    /// Load boot modules on page boundaries
    #[must_use]
    pub const fn module_align(self, flags: TagFlags) -> Self {
        self.open_tag(HeaderTag::ModuleAlign, flags, TAG_HEADER_SIZE)
            .close_tag(TAG_HEADER_SIZE)
    }

    /// Enter the image with EFI boot services still running
    #[must_use]
    pub const fn efi_boot_services(self, flags: TagFlags) -> Self {
        self.open_tag(HeaderTag::EfiBootServices, flags, TAG_HEADER_SIZE)
            .close_tag(TAG_HEADER_SIZE)
    }

    /// Allow loading anywhere in `[min_addr, max_addr]` at `align`
    #[must_use]
    pub const fn relocatable(
        self,
        flags: TagFlags,
        min_addr: u32,
        max_addr: u32,
        align: u32,
        preference: LoadPreference,
    ) -> Self {
        const SIZE: usize = 24;
        let payload = self.cursor + TAG_HEADER_SIZE;
        self.open_tag(HeaderTag::Relocatable, flags, SIZE)
            .put_u32(payload, min_addr)
            .put_u32(payload + 4, max_addr)
            .put_u32(payload + 8, align)
            .put_u32(payload + 12, preference as u32)
            .close_tag(SIZE)
    }

    /// Append the end tag and fill in the fixed header words
    #[must_use]
    pub const fn build(self) -> Multiboot2Header {
        let end = self.cursor;
        let length = end + TAG_HEADER_SIZE;
        assert!(length <= HEADER_SEARCH_LIMIT);
        let length = length as u32;
        let builder = self
            .put_u16(end, HeaderTag::End.as_type())
            .put_u16(end + 2, 0)
            .put_u32(end + 4, TAG_HEADER_SIZE as u32)
            .put_u32(0, HEADER_MAGIC)
            .put_u32(4, self.architecture)
            .put_u32(8, length)
            .put_u32(
                12,
                calculate_checksum(HEADER_MAGIC, self.architecture, length),
            );
        Multiboot2Header {
            bytes: builder.bytes,
        }
    }
}

// =============================================================================
// Kernel Header
// =============================================================================

/// Boot information the kernel asks the bootloader for
pub const KERNEL_INFORMATION_REQUESTS: [u32; 12] = [
    tag_types::CMDLINE,
    tag_types::BOOTLOADER_NAME,
    tag_types::BASIC_MEMINFO,
    tag_types::BOOT_DEVICE,
    tag_types::MEMORY_MAP,
    tag_types::VBE,
    tag_types::FRAMEBUFFER,
    tag_types::APM,
    tag_types::ACPI_OLD,
    tag_types::ACPI_NEW,
    tag_types::NETWORK,
    tag_types::LOAD_BASE_ADDR,
];

/// The header the boot image carries in its `.multiboot2` section
///
/// ELF images need no address or entry tags, so they are left out.
pub const KERNEL_HEADER: Multiboot2Header = HeaderBuilder::new(ARCHITECTURE_I386)
    .information_request(TagFlags::empty(), &KERNEL_INFORMATION_REQUESTS)
    .console_flags(
        TagFlags::empty(),
        ConsoleFlags::CONSOLE_REQUIRED.union(ConsoleFlags::EGA_TEXT_SUPPORTED),
    )
    .framebuffer(TagFlags::OPTIONAL, 0, 0, 0)
    .module_align(TagFlags::empty())
    .build();

const _: () = {
    assert!(KERNEL_HEADER.is_valid(), "kernel header must be valid");
    // 16 fixed + 56 request + 16 console + 24 framebuffer + 8 align + 8 end
    assert!(KERNEL_HEADER.header_length() == 128);
};

/// Place a header in the `.multiboot2` section under a fixed symbol
///
/// ```rust,ignore
/// keystone_multiboot2::place_multiboot2_header!(keystone_multiboot2::KERNEL_HEADER);
/// ```
#[macro_export]
macro_rules! place_multiboot2_header {
    ($header:expr) => {
        #[used]
        #[no_mangle]
        #[link_section = ".multiboot2"]
        static MULTIBOOT2_HEADER: $crate::header::Multiboot2Header = $header;
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_header_is_just_end_tag() {
        let header = HeaderBuilder::new(ARCHITECTURE_I386).build();
        assert!(header.is_valid());
        assert_eq!(header.header_length(), 24);
        assert_eq!(&header.as_bytes()[16..], &[0, 0, 0, 0, 8, 0, 0, 0]);
        let tags: Vec<_> = header.tags().collect();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].kind, HeaderTag::End);
    }

    #[test]
    fn test_fixed_words_are_little_endian() {
        let bytes = KERNEL_HEADER.as_bytes();
        assert_eq!(&bytes[0..4], &[0xD6, 0x50, 0x52, 0xE8]);
        assert_eq!(&bytes[4..8], &[0, 0, 0, 0]);
        assert_eq!(&bytes[8..12], &128u32.to_le_bytes());
        let sum = bytes[..16]
            .chunks(4)
            .map(|word| u32::from_le_bytes(word.try_into().unwrap()))
            .fold(0u32, u32::wrapping_add);
        assert_eq!(sum, 0);
    }

    #[test]
    fn test_kernel_header_tags() {
        let tags: Vec<_> = KERNEL_HEADER.tags().collect();
        let kinds: Vec<_> = tags.iter().map(|tag| tag.kind).collect();
        assert_eq!(
            kinds,
            [
                HeaderTag::InformationRequest,
                HeaderTag::ConsoleFlags,
                HeaderTag::Framebuffer,
                HeaderTag::ModuleAlign,
                HeaderTag::End,
            ]
        );

        let request = &tags[0];
        assert_eq!(request.size, 56);
        let requested: Vec<_> = (0..12).filter_map(|i| request.word(i)).collect();
        assert_eq!(requested, KERNEL_INFORMATION_REQUESTS);

        assert_eq!(tags[1].word(0), Some(3));
        assert!(tags[1].flags.is_empty());
        assert_eq!(tags[2].flags, TagFlags::OPTIONAL);
        assert_eq!(tags[2].payload, &[0; 12]);
    }

    #[test]
    fn test_declared_sizes_and_padding() {
        let header = HeaderBuilder::new(ARCHITECTURE_I386)
            .address(TagFlags::empty(), 0x10_0000, 0x10_0000, 0x20_0000, 0x30_0000)
            .entry_address(TagFlags::empty(), 0x10_0040)
            .efi_boot_services(TagFlags::OPTIONAL)
            .efi32_entry_address(TagFlags::OPTIONAL, 0x10_0080)
            .efi64_entry_address(TagFlags::OPTIONAL, 0x10_00C0)
            .relocatable(TagFlags::empty(), 0x10_0000, 0xFFFF_FFFF, 0x1000, LoadPreference::Lowest)
            .build();
        assert!(header.is_valid());

        let mut offset = FIXED_HEADER_SIZE;
        for tag in header.tags() {
            assert_eq!(offset % TAG_ALIGNMENT, 0);
            assert_eq!(Some(tag.size as usize), tag.kind.declared_size(), "{:?}", tag.kind);
            offset += align_up(tag.size as usize, TAG_ALIGNMENT);
        }
        assert_eq!(offset, header.header_length() as usize);
        // 24 + 16 + 8 + 16 + 16 + 24 + 8
        assert_eq!(header.header_length(), 16 + 112);

        let entry = header.tags().nth(1).unwrap();
        assert_eq!(entry.word(0), Some(0x10_0040));
        // Padding after a 12-byte tag stays zero
        let at = FIXED_HEADER_SIZE + 24 + 12;
        assert_eq!(&header.as_bytes()[at..at + 4], &[0; 4]);

        let relocatable = header.tags().nth(5).unwrap();
        assert_eq!(relocatable.word(3), Some(1));
    }

    #[test]
    fn test_tag_type_round_trip() {
        for raw in 0..=12u16 {
            assert_eq!(HeaderTag::from_type(raw).as_type(), raw);
        }
        assert_eq!(HeaderTag::from_type(11), HeaderTag::Unknown(11));
    }
}
