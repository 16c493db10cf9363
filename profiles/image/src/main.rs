//! # Keystone Image
//!
//! The bootable image. The startup assembly in [`boot`] points the stack at
//! the reserved `.stack` section and calls `secondEntryPoint` with the
//! bootloader's registers; [`entry`] runs the early boot sequence from
//! there and either hands off to [`entry::start`] or halts.
//!
//! Hosted builds compile to an empty program so the workspace still builds
//! and the descriptor table can be tested.

#![cfg_attr(target_os = "none", no_std, no_main)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]

// memset, memcpy and the rest of the C symbols codegen expects
use keystone_runtime as _;

#[cfg(target_os = "none")]
mod boot;

/// Properties this board exposes to the early boot code
#[cfg_attr(not(target_os = "none"), allow(dead_code))]
mod descriptor;

#[cfg(target_os = "none")]
mod entry;

#[cfg(not(target_os = "none"))]
fn main() {}
