//! Build script generating `include/chrompeak.h` with cbindgen.
//!
//! The header covers the `#[repr(C)]` sample type and everything exported
//! from `src/ffi`.

use std::env;
use std::path::PathBuf;

const HEADER: &str = "chrompeak.h";

fn main() {
    let crate_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let include_dir = crate_dir.join("include");
    std::fs::create_dir_all(&include_dir).unwrap();

    let config = cbindgen::Config::from_file(crate_dir.join("cbindgen.toml")).unwrap_or_default();

    match cbindgen::generate_with_config(&crate_dir, config) {
        Ok(bindings) => {
            bindings.write_to_file(include_dir.join(HEADER));
        }
        Err(err) => panic!("Unable to generate {}: {}", HEADER, err),
    }

    println!("cargo:rerun-if-changed=src/ffi");
    println!("cargo:rerun-if-changed=src/data/sample.rs");
    println!("cargo:rerun-if-changed=cbindgen.toml");
}
