//! FFI (Foreign Function Interface) layer for C bindings.
//!
//! This module provides C-compatible functions that can be called from
//! Python via cffi, or from any other language that supports C FFI.
//! The header is generated into `include/chrompeak.h` by the build script.

pub mod detect;
pub mod types;

pub use detect::*;
pub use types::*;
