//! NUL-terminated string primitives backing `strlen`, `strcmp`, `strcat` and
//! `strcpy`. Same contract as C: unterminated input is undefined behaviour.
//! Reads go through `read_volatile` so the scanning loops are never folded
//! back into the library calls they implement.

use core::cmp::Ordering;
use core::ptr;

use crate::mem;

/// Number of bytes before the first NUL
///
/// # Safety
///
/// `string` must point to a NUL-terminated byte sequence.
pub unsafe fn length(string: *const u8) -> usize {
    let mut count = 0;
    // SAFETY: every byte up to and including the terminator is readable
    while unsafe { ptr::read_volatile(string.add(count)) } != 0 {
        count += 1;
    }
    count
}

/// Compare two strings bytewise as unsigned values
///
/// Returns the difference of the first mismatching pair (negative, zero or
/// positive, like C's `strcmp`). Identical pointers compare equal without
/// being read.
///
/// # Safety
///
/// Both pointers must point to NUL-terminated byte sequences.
pub unsafe fn compare(first: *const u8, second: *const u8) -> i32 {
    if ptr::eq(first, second) {
        return 0;
    }
    let mut index = 0;
    loop {
        // SAFETY: index never passes either terminator
        let (a, b) = unsafe {
            (
                ptr::read_volatile(first.add(index)),
                ptr::read_volatile(second.add(index)),
            )
        };
        if a != b || a == 0 {
            return i32::from(a) - i32::from(b);
        }
        index += 1;
    }
}

/// [`compare`] as an [`Ordering`]
///
/// # Safety
///
/// Same as [`compare`].
pub unsafe fn ordering(first: *const u8, second: *const u8) -> Ordering {
    // SAFETY: forwarded from the caller
    unsafe { compare(first, second) }.cmp(&0)
}

/// Copy `source`, terminator included, to `destination`
///
/// Returns `destination`.
///
/// # Safety
///
/// `source` must be NUL-terminated, `destination` must have room for it, and
/// the two must not overlap.
pub unsafe fn copy_string(destination: *mut u8, source: *const u8) -> *mut u8 {
    // SAFETY: forwarded from the caller
    unsafe {
        let bytes = length(source) + 1;
        mem::copy(destination, source, bytes);
    }
    destination
}

/// Append `source` to the end of `destination`
///
/// Returns `destination`.
///
/// # Safety
///
/// Both strings must be NUL-terminated, `destination` must have room for the
/// result, and the two must not overlap.
pub unsafe fn concat(destination: *mut u8, source: *const u8) -> *mut u8 {
    // SAFETY: forwarded from the caller
    unsafe {
        let tail = destination.add(length(destination));
        copy_string(tail, source);
    }
    destination
}
