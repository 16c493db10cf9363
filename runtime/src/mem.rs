//! # Memory Fill, Copy and Clear
//!
//! These are the real implementations behind the `memset` and `memcpy`
//! symbols, plus the `.bss` clearing routine. They deliberately carry other
//! names: the optimiser recognises fill and copy loops and rewrites them into
//! calls to `memset`/`memcpy`, which would turn the symbol's own body into an
//! infinite recursion. Every store is volatile for the same reason, which also
//! keeps the `.bss` clear from being elided.
//!
//! `fill` and `copy` share one shape:
//!
//! 1. byte loop until the address is a multiple of a whole batch, or the
//!    length runs out,
//! 2. unrolled batches of machine words,
//! 3. byte loop over the tail.

use core::mem::size_of;
use core::ptr;

use static_assertions::const_assert_eq;

use crate::FAILURE_SENTINEL;

/// Word moved by the batched loops
type Cell = u64;

/// Size of one [`Cell`] in bytes
const CELL_SIZE: usize = size_of::<Cell>();

/// Words per unrolled fill batch
pub const FILL_BATCH_WORDS: usize = 4;

/// Words per unrolled copy batch
pub const COPY_BATCH_WORDS: usize = 8;

/// Bytes per fill batch, also the alignment the byte loop aims for
const FILL_ALIGNMENT: usize = FILL_BATCH_WORDS * CELL_SIZE;

/// Bytes per copy batch, also the alignment the byte loop aims for
const COPY_ALIGNMENT: usize = COPY_BATCH_WORDS * CELL_SIZE;

const_assert_eq!(FILL_ALIGNMENT, 32);
const_assert_eq!(COPY_ALIGNMENT, 64);

// =============================================================================
// Clear
// =============================================================================

/// Zero every byte between two addresses, in either order
///
/// The range is `[min(origin, end), max(origin, end))`; equal addresses are a
/// no-op. Used for `.bss` before any static is trusted, so it touches nothing
/// but the range itself.
///
/// # Safety
///
/// The whole range must be valid for writes and must not hold anything the
/// caller still needs, including its own stack.
pub unsafe fn memory_clear(origin: *mut u8, end: *mut u8) {
    let (low, high) = if (origin as usize) < (end as usize) {
        (origin, end)
    } else {
        (end, origin)
    };
    let mut remaining = high as usize - low as usize;
    let mut cursor = low;
    while remaining != 0 {
        // SAFETY: cursor stays inside [low, high), which the caller vouches for
        unsafe {
            ptr::write_volatile(cursor, 0);
            cursor = cursor.add(1);
        }
        remaining -= 1;
    }
}

// =============================================================================
// Fill
// =============================================================================

/// Byte-fill until `buffer` sits on an `alignment` boundary with at least one
/// batch left, or until `length` runs out. Returns the bytes left over.
///
/// # Safety
///
/// `buffer..buffer + length` must be valid for writes.
#[inline(always)]
unsafe fn fill_unaligned(buffer: *mut u8, byte: u8, length: usize, alignment: usize) -> usize {
    let mut cursor = buffer;
    let mut remaining = length;
    while remaining > 0 {
        if cursor as usize % alignment == 0 && remaining >= alignment {
            break;
        }
        // SAFETY: remaining > 0, so cursor is inside the caller's range
        unsafe {
            ptr::write_volatile(cursor, byte);
            cursor = cursor.add(1);
        }
        remaining -= 1;
    }
    remaining
}

/// Fill `length` bytes at `buffer` with `byte`
///
/// Returns `buffer`, or [`FAILURE_SENTINEL`] as a pointer should the tail loop
/// ever leave bytes behind.
///
/// # Safety
///
/// `buffer..buffer + length` must be valid for writes.
pub unsafe fn fill(buffer: *mut u8, byte: u8, length: usize) -> *mut u8 {
    if length == 0 {
        return buffer;
    }

    // SAFETY: forwarded from the caller
    let mut remaining = unsafe { fill_unaligned(buffer, byte, length, FILL_ALIGNMENT) };
    // SAFETY: length - remaining bytes were consumed, still inside the range
    let mut words = unsafe { buffer.add(length - remaining) }.cast::<Cell>();

    if remaining >= FILL_ALIGNMENT {
        let pattern = Cell::from_ne_bytes([byte; CELL_SIZE]);
        while remaining >= FILL_ALIGNMENT {
            // SAFETY: words is batch-aligned with a full batch left in range
            unsafe {
                ptr::write_volatile(words, pattern);
                ptr::write_volatile(words.add(1), pattern);
                ptr::write_volatile(words.add(2), pattern);
                ptr::write_volatile(words.add(3), pattern);
                words = words.add(FILL_BATCH_WORDS);
            }
            remaining -= FILL_ALIGNMENT;
        }
    }

    // SAFETY: the tail is the last `remaining` bytes of the caller's range
    let leftover = unsafe { fill_unaligned(words.cast::<u8>(), byte, remaining, FILL_ALIGNMENT) };
    if leftover != 0 {
        return FAILURE_SENTINEL as *mut u8;
    }
    buffer
}

// =============================================================================
// Copy
// =============================================================================

/// Byte-copy until both pointers sit on an `alignment` boundary with at least
/// one batch left, or until `length` runs out. Pointers that can never align
/// together end up copied byte by byte in full. Returns the bytes left over.
///
/// # Safety
///
/// Both ranges must be valid for `length` bytes and must not overlap.
#[inline(always)]
unsafe fn copy_unaligned(
    destination: *mut u8,
    source: *const u8,
    length: usize,
    alignment: usize,
) -> usize {
    let mut to = destination;
    let mut from = source;
    let mut remaining = length;
    while remaining > 0 {
        if to as usize % alignment == 0 && from as usize % alignment == 0 && remaining >= alignment {
            break;
        }
        // SAFETY: remaining > 0, so both cursors are inside their ranges
        unsafe {
            ptr::write_volatile(to, ptr::read(from));
            to = to.add(1);
            from = from.add(1);
        }
        remaining -= 1;
    }
    remaining
}

/// Copy `length` bytes from `source` to `destination`
///
/// Returns `destination`, or [`FAILURE_SENTINEL`] as a pointer should the tail
/// loop ever leave bytes behind. Overlapping ranges are undefined behaviour,
/// as with C's `memcpy`.
///
/// # Safety
///
/// Both ranges must be valid for `length` bytes and must not overlap.
pub unsafe fn copy(destination: *mut u8, source: *const u8, length: usize) -> *mut u8 {
    if length == 0 {
        return destination;
    }

    // SAFETY: forwarded from the caller
    let mut remaining = unsafe { copy_unaligned(destination, source, length, COPY_ALIGNMENT) };
    let consumed = length - remaining;
    // SAFETY: consumed bytes are inside both ranges
    let mut to = unsafe { destination.add(consumed) }.cast::<Cell>();
    // SAFETY: as above
    let mut from = unsafe { source.add(consumed) }.cast::<Cell>();

    while remaining >= COPY_ALIGNMENT {
        // SAFETY: both cursors are batch-aligned with a full batch left
        unsafe {
            ptr::write_volatile(to, ptr::read(from));
            ptr::write_volatile(to.add(1), ptr::read(from.add(1)));
            ptr::write_volatile(to.add(2), ptr::read(from.add(2)));
            ptr::write_volatile(to.add(3), ptr::read(from.add(3)));
            ptr::write_volatile(to.add(4), ptr::read(from.add(4)));
            ptr::write_volatile(to.add(5), ptr::read(from.add(5)));
            ptr::write_volatile(to.add(6), ptr::read(from.add(6)));
            ptr::write_volatile(to.add(7), ptr::read(from.add(7)));
            to = to.add(COPY_BATCH_WORDS);
            from = from.add(COPY_BATCH_WORDS);
        }
        remaining -= COPY_ALIGNMENT;
    }

    // SAFETY: the tails are the last `remaining` bytes of both ranges
    let leftover =
        unsafe { copy_unaligned(to.cast::<u8>(), from.cast::<u8>(), remaining, COPY_ALIGNMENT) };
    if leftover != 0 {
        return FAILURE_SENTINEL as *mut u8;
    }
    destination
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Backing store with a known 64-byte alignment so offsets are exact
    #[repr(C, align(64))]
    struct Arena([u8; 512]);

    impl Arena {
        fn new(seed: u8) -> Box<Self> {
            let mut arena = Box::new(Arena([0; 512]));
            for (index, byte) in arena.0.iter_mut().enumerate() {
                *byte = seed.wrapping_add((index as u8).wrapping_mul(31));
            }
            arena
        }
    }

    #[test]
    fn test_clear_both_orders() {
        for reversed in [false, true] {
            let mut arena = Arena::new(7);
            let base = arena.0.as_mut_ptr();
            let (a, b) = unsafe { (base.add(10), base.add(300)) };
            unsafe {
                if reversed {
                    memory_clear(b, a);
                } else {
                    memory_clear(a, b);
                }
            }
            assert!(arena.0[10..300].iter().all(|&byte| byte == 0));
            assert_eq!(arena.0[9], Arena::new(7).0[9]);
            assert_eq!(arena.0[300], Arena::new(7).0[300]);
        }
    }

    #[test]
    fn test_clear_empty_range() {
        let mut arena = Arena::new(3);
        let reference = Arena::new(3);
        let at = unsafe { arena.0.as_mut_ptr().add(17) };
        unsafe { memory_clear(at, at) };
        assert_eq!(arena.0, reference.0);
    }

    #[test]
    fn test_fill_matches_bytewise() {
        for offset in 0..70 {
            for length in 0..200 {
                let mut arena = Arena::new(1);
                let mut expected = Arena::new(1);
                expected.0[offset..offset + length].fill(0xA5);

                let start = unsafe { arena.0.as_mut_ptr().add(offset) };
                let returned = unsafe { fill(start, 0xA5, length) };
                assert_eq!(returned, start);
                assert_eq!(arena.0, expected.0, "offset {offset} length {length}");
            }
        }
    }

    #[test]
    fn test_copy_matches_bytewise() {
        let source = Arena::new(99);
        for source_offset in [0, 1, 3, 8, 63] {
            for offset in 0..66 {
                for length in (0..190).step_by(7).chain([64, 128, 129]) {
                    let mut arena = Arena::new(5);
                    let mut expected = Arena::new(5);
                    expected.0[offset..offset + length]
                        .copy_from_slice(&source.0[source_offset..source_offset + length]);

                    let to = unsafe { arena.0.as_mut_ptr().add(offset) };
                    let from = unsafe { source.0.as_ptr().add(source_offset) };
                    let returned = unsafe { copy(to, from, length) };
                    assert_eq!(returned, to);
                    assert_eq!(
                        arena.0, expected.0,
                        "src+{source_offset} dst+{offset} length {length}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_zero_length_is_noop() {
        let mut arena = Arena::new(4);
        let reference = Arena::new(4);
        let start = arena.0.as_mut_ptr();
        assert_eq!(unsafe { fill(start, 0xFF, 0) }, start);
        assert_eq!(unsafe { copy(start, reference.0.as_ptr(), 0) }, start);
        assert_eq!(arena.0, reference.0);
    }
}
