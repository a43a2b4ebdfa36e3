//! Object Module - views over heap objects and method tables
//!
//! A heap object is a run of machine words. Word 0 holds the method table
//! pointer, written once by [`Object::init`]; the rest are fields owned by
//! generated code. A method table is a run of code-address words.

use std::ffi::c_void;
use std::ptr::NonNull;

use crate::abi::{field_offset, VTABLE_PTR_OFFSET, WORD_SIZE};

/// Handle to a heap object
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Object(NonNull<u8>);

impl Object {
    /// Store the method table pointer into a fresh block
    ///
    /// # Safety
    /// `block` must be valid for writes of at least one word and word aligned.
    pub unsafe fn init(block: NonNull<u8>, vtable: *const c_void) -> Self {
        block
            .as_ptr()
            .add(VTABLE_PTR_OFFSET)
            .cast::<usize>()
            .write(vtable as usize);
        Self(block)
    }

    /// Wrap a pointer handed over by generated code
    pub fn from_raw(ptr: *const c_void) -> Option<Self> {
        NonNull::new(ptr as *mut u8).map(Self)
    }

    pub fn as_ptr(&self) -> *mut c_void {
        self.0.as_ptr().cast()
    }

    pub fn addr(&self) -> usize {
        self.0.as_ptr() as usize
    }

    /// Read the word at `byte_offset`
    ///
    /// # Safety
    /// The object must be live and at least `byte_offset + WORD_SIZE` bytes.
    #[inline]
    pub unsafe fn word_at(&self, byte_offset: usize) -> usize {
        self.0.as_ptr().add(byte_offset).cast::<usize>().read_unaligned()
    }

    /// Method table pointer stored at offset zero
    ///
    /// # Safety
    /// The object must be live.
    #[inline]
    pub unsafe fn method_table(&self) -> Option<MethodTable> {
        MethodTable::from_raw(self.word_at(VTABLE_PTR_OFFSET) as *const c_void)
    }

    /// Read field `index`
    ///
    /// # Safety
    /// The object must be live and have more than `index` fields.
    pub unsafe fn field(&self, index: usize) -> usize {
        self.word_at(field_offset(index))
    }

    /// Write field `index`
    ///
    /// # Safety
    /// The object must be live and have more than `index` fields.
    pub unsafe fn set_field(&self, index: usize, value: usize) {
        self.0
            .as_ptr()
            .add(field_offset(index))
            .cast::<usize>()
            .write_unaligned(value);
    }
}

/// Handle to a method table
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodTable(NonNull<u8>);

impl MethodTable {
    pub fn from_raw(ptr: *const c_void) -> Option<Self> {
        NonNull::new(ptr as *mut u8).map(Self)
    }

    pub fn addr(&self) -> usize {
        self.0.as_ptr() as usize
    }

    /// Code address stored `byte_offset` bytes into the table
    ///
    /// # Safety
    /// The table must hold a word at `byte_offset`.
    #[inline]
    pub unsafe fn entry_at(&self, byte_offset: usize) -> usize {
        self.0.as_ptr().add(byte_offset).cast::<usize>().read_unaligned()
    }
}

/// Whether `offset` is a whole number of words
#[inline]
pub fn is_word_aligned(offset: usize) -> bool {
    offset % WORD_SIZE == 0
}
