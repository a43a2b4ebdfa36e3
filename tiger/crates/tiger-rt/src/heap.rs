//! Heap Module - host allocator backend
//!
//! Objects come straight from the C heap (`malloc`/`calloc`). There is no
//! collector and no free routine exported to generated code, so every block
//! lives until the process exits.

use std::ptr::NonNull;

use crate::abi::WORD_SIZE;
use crate::error::{Result, RtError};

/// Source of raw object memory
///
/// Returned blocks must be at least word aligned and at least `size` bytes.
pub trait ObjectAllocator {
    /// Allocate `size` bytes, zeroed when `zeroed` is set
    fn allocate(&self, size: usize, zeroed: bool) -> Result<NonNull<u8>>;
}

/// Allocator backed by the host C library
#[derive(Debug, Default, Clone, Copy)]
pub struct HostHeap;

impl HostHeap {
    pub fn new() -> Self {
        Self
    }

    /// Return a block to the host allocator
    ///
    /// Not reachable from generated code; used by embedders and benches.
    ///
    /// # Safety
    /// `ptr` must come from [`HostHeap::allocate`] and must not be used again.
    pub unsafe fn release(&self, ptr: NonNull<u8>) {
        libc::free(ptr.as_ptr().cast());
    }
}

impl ObjectAllocator for HostHeap {
    fn allocate(&self, size: usize, zeroed: bool) -> Result<NonNull<u8>> {
        // SAFETY: plain C allocation; a null result is handled below.
        let raw = unsafe {
            if zeroed {
                libc::calloc(1, size)
            } else {
                libc::malloc(size)
            }
        };
        NonNull::new(raw.cast::<u8>()).ok_or(RtError::OutOfMemory { requested: size })
    }
}

/// Turn the size passed by generated code into a byte count to allocate
///
/// Negative sizes and sizes above `limit` are rejected. Anything smaller than
/// one word is rounded up so the method table store stays in bounds.
pub fn checked_object_size(requested: i64, limit: usize) -> Result<usize> {
    let size = usize::try_from(requested).map_err(|_| RtError::InvalidSize { size: requested })?;
    if size > limit {
        return Err(RtError::ObjectTooLarge {
            requested: size,
            limit,
        });
    }
    Ok(size.max(WORD_SIZE))
}
