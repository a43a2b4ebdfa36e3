//! Program output
//!
//! Formatting is kept separate from the stdout handle so it can be checked
//! against an in-memory writer.

use std::ffi::{c_char, CStr};
use std::io::{self, Write};

/// Text written for a null debug string, as glibc's `printf("%s")` does
pub const NULL_TEXT: &[u8] = b"(null)";

/// Write `n` in decimal followed by a newline
pub fn write_int<W: Write>(out: &mut W, n: i64) -> io::Result<()> {
    writeln!(out, "{}", n)
}

/// Write raw bytes followed by a newline; `None` prints `(null)`
pub fn write_debug_str<W: Write>(out: &mut W, text: Option<&[u8]>) -> io::Result<()> {
    out.write_all(text.unwrap_or(NULL_TEXT))?;
    out.write_all(b"\n")
}

/// Borrow the bytes of a NUL-terminated string, excluding the terminator
///
/// # Safety
/// A non-null `ptr` must point at a NUL-terminated string that outlives `'a`.
pub unsafe fn c_str_bytes<'a>(ptr: *const c_char) -> Option<&'a [u8]> {
    if ptr.is_null() {
        None
    } else {
        Some(CStr::from_ptr(ptr).to_bytes())
    }
}

/// Print to the process stdout
pub fn print_int(n: i64) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_int(&mut handle, n)
}

/// Print a debug string to the process stdout
pub fn print_debug_str(text: Option<&[u8]>) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_debug_str(&mut handle, text)
}

pub fn flush_stdout() -> io::Result<()> {
    io::stdout().flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_int(n: i64) -> String {
        let mut buf = Vec::new();
        write_int(&mut buf, n).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_int_formatting() {
        assert_eq!(render_int(5050), "5050\n");
        assert_eq!(render_int(0), "0\n");
        assert_eq!(render_int(-5), "-5\n");
        assert_eq!(render_int(i64::MIN), "-9223372036854775808\n");
    }

    #[test]
    fn test_debug_string() {
        let mut buf = Vec::new();
        write_debug_str(&mut buf, Some(b"hello")).unwrap();
        write_debug_str(&mut buf, None).unwrap();
        assert_eq!(buf, b"hello\n(null)\n");
    }

    #[test]
    fn test_debug_string_keeps_raw_bytes() {
        let mut buf = Vec::new();
        write_debug_str(&mut buf, Some(&[0xff, 0xfe])).unwrap();
        assert_eq!(buf, vec![0xff, 0xfe, b'\n']);
    }

    #[test]
    fn test_c_str_bytes() {
        let owned = std::ffi::CString::new("doit").unwrap();
        let bytes = unsafe { c_str_bytes(owned.as_ptr()) };
        assert_eq!(bytes, Some(&b"doit"[..]));
        assert_eq!(unsafe { c_str_bytes(std::ptr::null()) }, None);
    }
}
