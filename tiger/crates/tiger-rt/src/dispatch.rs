//! Virtual method lookup
//!
//! Generated code passes the receiver, the byte offset of the method table
//! pointer inside the object, and the byte offset of the slot inside the
//! table. The result is the code address to call indirectly.

use std::ffi::c_void;

use crate::error::{Result, RtError};
use crate::object::{is_word_aligned, MethodTable, Object};

/// `*(*(obj + vtable_offset) + method_offset)` with no validation
///
/// # Safety
/// `obj` must point at a live object whose word at `vtable_offset` is a valid
/// method table holding a word at `method_offset`.
#[inline]
pub unsafe fn lookup_unchecked(obj: *const c_void, vtable_offset: i64, method_offset: i64) -> usize {
    let table = obj
        .cast::<u8>()
        .offset(vtable_offset as isize)
        .cast::<usize>()
        .read_unaligned();
    (table as *const u8)
        .offset(method_offset as isize)
        .cast::<usize>()
        .read_unaligned()
}

/// Same lookup, rejecting null pointers and bad offsets first
///
/// # Safety
/// Non-null pointers are still dereferenced; they must point at live memory.
pub unsafe fn lookup_checked(obj: *const c_void, vtable_offset: i64, method_offset: i64) -> Result<usize> {
    let object = Object::from_raw(obj).ok_or(RtError::NullObject)?;
    let vtable_offset = word_offset("vtable", vtable_offset)?;
    let method_offset = word_offset("method", method_offset)?;

    let table = MethodTable::from_raw(object.word_at(vtable_offset) as *const c_void).ok_or(
        RtError::NullMethodTable {
            object: object.addr(),
        },
    )?;
    Ok(table.entry_at(method_offset))
}

fn word_offset(what: &'static str, offset: i64) -> Result<usize> {
    match usize::try_from(offset) {
        Ok(off) if is_word_aligned(off) => Ok(off),
        _ => Err(RtError::InvalidOffset { what, offset }),
    }
}
