//! Program entry point
//!
//! Link `libtiger_start.a` together with the generated assembly to get an
//! executable. The generated code must define `Tiger_main`; use
//! `tigert link --entry` to alias another entry label to it.

#![allow(non_snake_case)]

use std::ffi::{c_char, c_int};

extern "C" {
    fn Tiger_main() -> c_int;
}

#[no_mangle]
pub extern "C" fn main(_argc: c_int, _argv: *const *const c_char) -> c_int {
    // SAFETY: `Tiger_main` is provided by the generated program.
    unsafe { tiger_rt::entry::run(Tiger_main) }
}
