use std::{env, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=linker");

    // Hosted builds link normally and get an empty main
    if env::var("CARGO_CFG_TARGET_OS").as_deref() != Ok("none") {
        return;
    }

    let arch = env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default();
    let script = match arch.as_str() {
        "x86" => "x86.ld",
        "arm" => "arm.ld",
        other => panic!("no linker script for target_arch {other:?}"),
    };

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let ld = manifest_dir.join("linker").join(script);
    println!("cargo:rerun-if-changed={}", ld.display());
    println!("cargo:rustc-link-arg-bins=-T{}", ld.display());
}
