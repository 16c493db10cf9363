//! Unmangled C symbols. Each one forwards to a primitive with a different
//! name, so a loop the optimiser recognises inside the primitive can be
//! lowered into a call to `memset`/`memcpy` without ever reaching itself.

use core::ffi::{c_char, c_int, c_void};

use crate::{mem, string};

/// C `memset`
///
/// # Safety
///
/// `destination..destination + length` must be valid for writes.
#[no_mangle]
pub unsafe extern "C" fn memset(destination: *mut c_void, fill: c_int, length: usize) -> *mut c_void {
    // C converts the fill value to unsigned char
    let byte = fill as u8;
    // SAFETY: forwarded from the caller
    unsafe { mem::fill(destination.cast(), byte, length).cast() }
}

/// C `memcpy`
///
/// # Safety
///
/// Both ranges must be valid for `length` bytes and must not overlap.
#[no_mangle]
pub unsafe extern "C" fn memcpy(
    destination: *mut c_void,
    source: *const c_void,
    length: usize,
) -> *mut c_void {
    // SAFETY: forwarded from the caller
    unsafe { mem::copy(destination.cast(), source.cast(), length).cast() }
}

/// C `strcmp`
///
/// # Safety
///
/// Both arguments must be NUL-terminated.
#[no_mangle]
pub unsafe extern "C" fn strcmp(first: *const c_char, second: *const c_char) -> c_int {
    // SAFETY: forwarded from the caller
    unsafe { string::compare(first.cast(), second.cast()) }
}

/// C `strlen`
///
/// # Safety
///
/// `text` must be NUL-terminated.
#[no_mangle]
pub unsafe extern "C" fn strlen(text: *const c_char) -> usize {
    // SAFETY: forwarded from the caller
    unsafe { string::length(text.cast()) }
}

/// C `strcat`
///
/// # Safety
///
/// Both strings must be NUL-terminated, and `destination` must have room for
/// the result without overlapping `source`.
#[no_mangle]
pub unsafe extern "C" fn strcat(destination: *mut c_char, source: *const c_char) -> *mut c_char {
    // SAFETY: forwarded from the caller
    unsafe { string::concat(destination.cast(), source.cast()).cast() }
}

/// C `strcpy`
///
/// # Safety
///
/// `source` must be NUL-terminated, and `destination` must have room for it
/// without overlapping.
#[no_mangle]
pub unsafe extern "C" fn strcpy(destination: *mut c_char, source: *const c_char) -> *mut c_char {
    // SAFETY: forwarded from the caller
    unsafe { string::copy_string(destination.cast(), source.cast()).cast() }
}

/// ARM EABI unsigned divide with remainder, for cores without `udiv`
#[cfg(target_arch = "arm")]
#[no_mangle]
pub extern "C" fn __aeabi_uidivmod(numerator: u32, denominator: u32) -> u64 {
    crate::division::packed_divmod(numerator, denominator)
}
