//! The C ABI surface of the bridge.
//!
//! Conventions: freshly allocated objects cross the boundary as owning
//! boxes (`Box<T>` / `Option<Box<T>>`, null meaning absent); views into
//! existing objects cross as raw pointers or begin/end view structs and
//! have no release function. Every release function takes a pointer to the
//! caller's handle slot, drops the payload and nulls the slot, so a second
//! release of the same slot is a no-op.

use std::ffi::{c_char, c_void, CStr};
use std::io::{ErrorKind, Read, Write};
use std::mem::swap;
use std::ptr::{copy_nonoverlapping, slice_from_raw_parts, slice_from_raw_parts_mut};
use std::str::from_utf8_unchecked;
use static_assertions as sa;
use crate::error::Error;

mod block;
mod map;
mod nbt;
mod region;
mod schem;

/// A borrowed (begin, end) view over UTF-8 bytes owned by the engine.
/// Never NUL-terminated.
#[repr(C, align(8))]
#[derive(Debug, Clone, Copy)]
pub struct CStringView {
    begin: *const c_char,
    end: *const c_char,
}
sa::const_assert!(std::mem::size_of::<CStringView>() == 2 * std::mem::size_of::<usize>());

impl CStringView {
    pub fn from(src: &str) -> CStringView {
        let begin = src.as_ptr() as *const c_char;
        CStringView {
            begin,
            end: unsafe { begin.add(src.len()) },
        }
    }

    pub unsafe fn to_u8_slice(&self) -> &[u8] {
        let len = (self.end as usize) - (self.begin as usize);
        &*slice_from_raw_parts(self.begin as *const u8, len)
    }

    /// The caller guarantees the viewed bytes are valid UTF-8.
    pub unsafe fn to_str(&self) -> &str {
        from_utf8_unchecked(self.to_u8_slice())
    }

    pub unsafe fn to_string(&self) -> String {
        self.to_str().to_string()
    }
}

/// A borrowed (begin, end) view over a typed array.
#[repr(C)]
pub struct CArrayView<T> {
    begin: *mut T,
    end: *mut T,
}

impl<T> Clone for CArrayView<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for CArrayView<T> {}

impl<T> CArrayView<T> {
    pub fn from_slice(slice: &[T]) -> CArrayView<T> {
        let begin = slice.as_ptr() as *mut T;
        CArrayView {
            begin,
            end: unsafe { begin.add(slice.len()) },
        }
    }

    pub fn empty() -> CArrayView<T> {
        CArrayView {
            begin: std::ptr::null_mut(),
            end: std::ptr::null_mut(),
        }
    }

    pub unsafe fn to_slice(&self) -> &mut [T] {
        let len = self.end.offset_from(self.begin) as usize;
        &mut *slice_from_raw_parts_mut(self.begin, len)
    }

    pub unsafe fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        if self.begin.is_null() {
            return Vec::new();
        }
        self.to_slice().to_vec()
    }
}

pub type CByteArrayView = CArrayView<i8>;
pub type CIntArrayView = CArrayView<i32>;
pub type CLongArrayView = CArrayView<i64>;

#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct CPosInt {
    pub pos: [i32; 3],
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct CPosDouble {
    pub pos: [f64; 3],
}

/// Fixed-layout optional value; `has_value == false` means the payload is
/// a meaningless default.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct COption<T> {
    pub value: T,
    pub has_value: bool,
}

impl<T: Copy> COption<T> {
    pub fn to_option(&self) -> Option<T> {
        if self.has_value {
            Some(self.value)
        } else {
            None
        }
    }
}

impl<T: Default> From<Option<T>> for COption<T> {
    fn from(src: Option<T>) -> Self {
        match src {
            Some(value) => COption {
                value,
                has_value: true,
            },
            None => COption {
                value: T::default(),
                has_value: false,
            },
        }
    }
}

/// Copy a rendered string into a caller buffer under the buffer-growth
/// protocol: write as much as fits (always NUL-terminated) and report the
/// true required length, NUL included.
pub(crate) unsafe fn write_str_to_buffer(
    src: &str,
    dest: *mut c_char,
    capacity: usize,
    length: *mut usize,
) {
    if !length.is_null() {
        *length = src.len() + 1;
    }
    if dest.is_null() || capacity == 0 {
        return;
    }
    let copy_len = src.len().min(capacity - 1);
    copy_nonoverlapping(src.as_ptr() as *const c_char, dest, copy_len);
    *dest.add(copy_len) = 0;
}

// ---- version ----

#[no_mangle]
extern "C" fn MC_BRIDGE_version_string() -> CStringView {
    CStringView::from(env!("CARGO_PKG_VERSION"))
}

#[no_mangle]
extern "C" fn MC_BRIDGE_version_major() -> u16 {
    env!("CARGO_PKG_VERSION_MAJOR").parse().unwrap_or(0)
}

#[no_mangle]
extern "C" fn MC_BRIDGE_version_minor() -> u16 {
    env!("CARGO_PKG_VERSION_MINOR").parse().unwrap_or(0)
}

#[no_mangle]
extern "C" fn MC_BRIDGE_version_patch() -> u16 {
    env!("CARGO_PKG_VERSION_PATCH").parse().unwrap_or(0)
}

#[no_mangle]
extern "C" fn MC_BRIDGE_version_tweak() -> u16 {
    0
}

// ---- strings ----

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_string_unwrap(src: *const String) -> CStringView {
    CStringView::from(&*src)
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_string_set(dest: *mut String, src: CStringView) {
    *dest = src.to_string();
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_swap_string(a: *mut String, b: *mut String) {
    swap(&mut *a, &mut *b);
}

// ---- error handles ----

sa::const_assert!(std::mem::size_of::<Option<Box<Error>>>() == std::mem::size_of::<usize>());

pub(crate) fn error_to_box(err: Option<Error>) -> Option<Box<Error>> {
    err.map(Box::new)
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_release_error(error: *mut Option<Box<Error>>) {
    if let Some(slot) = error.as_mut() {
        slot.take();
    }
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_swap_error(a: *mut Error, b: *mut Error) {
    swap(&mut *a, &mut *b);
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_error_to_string(
    error: *const Error,
    dest: *mut c_char,
    capacity: usize,
    length: *mut usize,
) {
    let text = (*error).to_string();
    write_str_to_buffer(&text, dest, capacity, length);
}

#[no_mangle]
extern "C" fn MC_BRIDGE_error_test_none() -> Option<Box<Error>> {
    None
}

#[no_mangle]
extern "C" fn MC_BRIDGE_error_test_some() -> Option<Box<Error>> {
    error_to_box(Some(Error::PaletteTooLong(65537)))
}

// ---- reader / writer callbacks ----

const CALLBACK_ERROR_CAPACITY: usize = 1024;

pub type ReadFn = extern "C" fn(
    handle: *mut c_void,
    buffer: *mut u8,
    capacity: usize,
    ok: *mut bool,
    error: *mut c_char,
    error_capacity: usize,
) -> usize;

pub type WriteFn = extern "C" fn(
    handle: *mut c_void,
    buffer: *const u8,
    size: usize,
    ok: *mut bool,
    error: *mut c_char,
    error_capacity: usize,
) -> usize;

pub type FlushFn =
    extern "C" fn(handle: *mut c_void, ok: *mut bool, error: *mut c_char, error_capacity: usize);

/// A caller-supplied byte source. The callback reports failure through the
/// `ok` flag and a NUL-terminated message.
#[repr(C)]
pub struct CReader {
    pub handle: *mut c_void,
    pub read_fn: ReadFn,
}

/// A caller-supplied byte sink.
#[repr(C)]
pub struct CWriter {
    pub handle: *mut c_void,
    pub write_fn: WriteFn,
    pub flush_fn: FlushFn,
}

unsafe fn callback_error(buffer: &[c_char]) -> std::io::Error {
    let message = CStr::from_ptr(buffer.as_ptr())
        .to_string_lossy()
        .into_owned();
    std::io::Error::new(ErrorKind::Other, message)
}

impl Read for CReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let mut error_msg = [0 as c_char; CALLBACK_ERROR_CAPACITY];
        let mut ok = false;
        let read_bytes = (self.read_fn)(
            self.handle,
            buf.as_mut_ptr(),
            buf.len(),
            &mut ok,
            error_msg.as_mut_ptr(),
            error_msg.len(),
        );
        if ok {
            Ok(read_bytes)
        } else {
            Err(unsafe { callback_error(&error_msg) })
        }
    }
}

impl Write for CWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut error_msg = [0 as c_char; CALLBACK_ERROR_CAPACITY];
        let mut ok = false;
        let written = (self.write_fn)(
            self.handle,
            buf.as_ptr(),
            buf.len(),
            &mut ok,
            error_msg.as_mut_ptr(),
            error_msg.len(),
        );
        if ok {
            Ok(written)
        } else {
            Err(unsafe { callback_error(&error_msg) })
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        let mut error_msg = [0 as c_char; CALLBACK_ERROR_CAPACITY];
        let mut ok = false;
        (self.flush_fn)(self.handle, &mut ok, error_msg.as_mut_ptr(), error_msg.len());
        if ok {
            Ok(())
        } else {
            Err(unsafe { callback_error(&error_msg) })
        }
    }
}
