//! # Keystone Runtime - Freestanding Primitives
//!
//! The routines in this crate run before anything else exists: no heap, no
//! allocator, no standard library, no exception handler. The compiler may also
//! call some of them implicitly (`memset`, `memcpy`, `strlen`, `strcmp`, and
//! `__aeabi_uidivmod` on ARM cores without a divide instruction), so every one
//! of them is written from scratch against raw bytes.
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  abi      unmangled C symbols (memset, memcpy, strcmp, strlen, ...) │
//! ├─────────────────────────────────────────────────────────────────────┤
//! │  parse / format   numerals <-> SignedMagnitude                     │
//! ├─────────────────────────────────────────────────────────────────────┤
//! │  mem / string     byte-loop primitives (uniquely named)            │
//! ├─────────────────────────────────────────────────────────────────────┤
//! │  arith / division clamped add/mul, shift-subtract long division    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The C symbols are thin wrappers over internal primitives with different
//! names, so the compiler can never lower a primitive's loop back into a call
//! to the symbol being defined.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

// =============================================================================
// Module Declarations
// =============================================================================

/// Overflow-clamping unsigned arithmetic
pub mod arith;

/// ASCII classification helpers
pub mod ascii;

/// Signed-magnitude values and long division
pub mod division;

/// Numeral formatting
pub mod format;

/// Memory fill, copy and clear
pub mod mem;

/// Numeral parsing
pub mod parse;

/// NUL-terminated string primitives
pub mod string;

/// Unmangled C ABI entry points
#[cfg(all(feature = "c-symbols", target_os = "none", not(test)))]
pub mod abi;

// =============================================================================
// Re-exports
// =============================================================================

pub use arith::{clamped_add, clamped_mul};
pub use division::{
    divide_signed, long_division, packed_divmod, Division, NumberFlags, SignedMagnitude,
};
pub use format::NumeralWriter;
pub use mem::{copy, fill, memory_clear};
pub use parse::{parse_address, parse_c_string, parse_unsigned_with_sign, Parsed};
pub use string::{compare, concat, copy_string, length};

// =============================================================================
// Constants
// =============================================================================

/// Smallest base accepted by the numeral parser and formatter
pub const MIN_BASE: u32 = 2;

/// Largest base accepted by the numeral parser and formatter (`0-9` + `a-z`)
pub const MAX_BASE: u32 = 36;

/// Base requesting prefix auto-detection in the parser
pub const AUTO_BASE: u32 = 0;

/// Octal base, selected by a bare leading `0` under auto-detection
pub const OCTAL_BASE: u32 = 8;

/// Decimal base, the auto-detection fallback
pub const DECIMAL_BASE: u32 = 10;

/// Hexadecimal base, selected by a `0x`/`0X` prefix
pub const HEXADECIMAL_BASE: u32 = 16;

/// Sentinel returned by `fill` and `copy` when the tail loop did not drain
///
/// Unreachable with correct arithmetic; kept as the documented failure value.
pub const FAILURE_SENTINEL: usize = usize::MAX;

const _: () = {
    assert!(MIN_BASE < DECIMAL_BASE);
    assert!(MAX_BASE == DECIMAL_BASE + 26);
};
