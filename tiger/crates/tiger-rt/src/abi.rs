//! Runtime ABI definitions shared by the code generator, the runtime and the
//! link driver. Values here must match the `#[no_mangle]` exports in
//! [`crate::ffi`] and the layout pass in [`crate::layout`].

use std::mem::size_of;

/// Machine word size in bytes.
pub const WORD_SIZE: usize = size_of::<usize>();

/// Byte offset of the method table pointer inside every object.
pub const VTABLE_PTR_OFFSET: usize = 0;

/// Name of the implicit root class.
pub const ROOT_CLASS: &str = "Object";

/// Name of the main class's entry method, which gets no method table slot.
pub const MAIN_METHOD: &str = "main";

/// Prefix of the data label holding a class's method table (`.V_Doit`).
pub const VTABLE_LABEL_PREFIX: &str = ".V_";

/// Entry routine emitted by the code generator and called from `main`.
pub const ENTRY_SYMBOL: &str = "Tiger_main";

/// Name of the static library that carries `main` plus the runtime.
pub const START_LIB: &str = "tiger_start";

/// Byte offset of field `index` (0-based) inside an object.
#[inline]
pub const fn field_offset(index: usize) -> usize {
    (index + 1) * WORD_SIZE
}

/// Byte offset of method slot `index` inside a method table.
#[inline]
pub const fn slot_offset(index: usize) -> usize {
    index * WORD_SIZE
}

/// Size in bytes of an object with `field_count` fields.
#[inline]
pub const fn object_size(field_count: usize) -> usize {
    (field_count + 1) * WORD_SIZE
}
