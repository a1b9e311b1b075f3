// SPDX-FileCopyrightText: 2024 Foundation Devices, Inc. <hello@foundation.xyz>
// SPDX-License-Identifier: GPL-3.0-or-later

//! This build script writes the `memory.x` file into a directory where the
//! linker can always find it at build time, and asks Cargo to re-run it when
//! the chip feature changes.
//! No SoftDevice is flashed: the application owns the whole flash and RAM.

use std::env;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

fn main() {
    let out = &PathBuf::from(env::var_os("OUT_DIR").unwrap());

    // nRF52805: 192K flash, 24K RAM. nRF52832: 512K flash, 64K RAM.
    let (flash_kib, ram_kib) = if env::var_os("CARGO_FEATURE_NRF52832").is_some() {
        (512, 64)
    } else {
        (192, 24)
    };

    let memory_x_content = format!(
        r##"
        MEMORY
        {{
            /* NOTE 1 K = 1 KiBi = 1024 bytes */
            FLASH : ORIGIN = 0x00000000, LENGTH = {}K
            RAM : ORIGIN = 0x20000000, LENGTH = {}K
        }}
        "##,
        flash_kib, ram_kib
    );
    File::create(out.join("memory.x"))
        .unwrap()
        .write_all(memory_x_content.as_bytes())
        .unwrap();

    println!("cargo:rustc-link-search={}", out.display());
    println!("cargo:rerun-if-changed=build.rs");

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
}
