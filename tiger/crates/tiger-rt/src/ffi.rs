//! C ABI exports called by generated code
//!
//! Symbol names and signatures are fixed by the code generator; see
//! [`crate::abi`]. Any runtime error at this boundary is fatal.

#![allow(non_snake_case)]

use std::ffi::{c_char, c_long, c_void};

use crate::output::c_str_bytes;
use crate::runtime::{fatal, Runtime};

/// `void *Tiger_new(long size, void *vtable)`
///
/// Allocates `size` bytes and stores `vtable` in the first word.
#[no_mangle]
pub extern "C" fn Tiger_new(size: c_long, vtable: *mut c_void) -> *mut c_void {
    match Runtime::global().new_object(i64::from(size), vtable) {
        Ok(object) => object.as_ptr(),
        Err(e) => fatal(e),
    }
}

/// `void Tiger_print(long n)`
#[no_mangle]
pub extern "C" fn Tiger_print(n: c_long) {
    Runtime::global().print_int(i64::from(n));
}

/// `void *Tiger_getVirtualMethod(void *obj, long vtable_offset, long method_offset)`
///
/// # Safety
/// `obj` must be an object returned by [`Tiger_new`] whose method table has
/// a slot at `method_offset`. With `TIGER_RT_CHECK_DISPATCH` set, null
/// pointers and bad offsets are reported instead of dereferenced.
#[no_mangle]
pub unsafe extern "C" fn Tiger_getVirtualMethod(
    obj: *mut c_void,
    vtable_offset: c_long,
    method_offset: c_long,
) -> *mut c_void {
    match Runtime::global().virtual_method(obj, i64::from(vtable_offset), i64::from(method_offset)) {
        Ok(target) => target as *mut c_void,
        Err(e) => fatal(e),
    }
}

/// `void Tiger_debugPrint(const char *s)`
///
/// # Safety
/// `text` must be null or point at a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn Tiger_debugPrint(text: *const c_char) {
    Runtime::global().print_debug(c_str_bytes(text));
}
