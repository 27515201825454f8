//! Plain C-ABI surface over [`qoi_codec`], for embedding in a wasm32
//! module. No trait objects or iterators cross this boundary — only raw
//! pointers, lengths, and flat structs, same as a C library.
//!
//! Every function here is built only for `target_arch = "wasm32"`: the
//! allocator-exposing pointer surface has no business existing in a
//! native build of this crate.

#![cfg(target_arch = "wasm32")]

use qoi_codec::{Channels, Colorspace, Header, RawBuffer};

/// An owned byte buffer handed back across the ABI boundary. A null
/// `buf` (with `len == 0`) signals failure; there is no room here for a
/// descriptive error.
#[repr(C)]
pub struct QoiBuffer {
    pub buf: *mut u8,
    pub len: u32,
}

impl QoiBuffer {
    const fn failure() -> Self {
        QoiBuffer {
            buf: std::ptr::null_mut(),
            len: 0,
        }
    }
}

/// Like [`QoiBuffer`], but carrying the decoded header alongside a flat
/// RGBA8 pixel buffer.
#[repr(C)]
pub struct QoiImageBuffer {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    pub colorspace: u8,
    pub buf: *mut u8,
    pub len: u32,
}

impl QoiImageBuffer {
    const fn failure() -> Self {
        QoiImageBuffer {
            width: 0,
            height: 0,
            channels: 0,
            colorspace: 0,
            buf: std::ptr::null_mut(),
            len: 0,
        }
    }
}

/// Allocates a `len`-byte buffer on the wasm heap and returns a pointer
/// to it, for a caller on the other side of the boundary to fill before
/// passing it to [`qoi_encode`].
///
/// # Safety
///
/// The returned pointer must eventually be passed to exactly one call
/// of [`qoi_free_buffer`] with the same `len`, or be consumed by a
/// function in this module that takes ownership of it.
#[no_mangle]
pub unsafe extern "C" fn qoi_allocate_buffer(len: usize) -> *mut u8 {
    let mut buf = vec![0u8; len];
    let ptr = buf.as_mut_ptr();
    std::mem::forget(buf);
    ptr
}

/// Frees a buffer previously returned by [`qoi_allocate_buffer`] or by
/// one of the `buf` fields in [`QoiBuffer`]/[`QoiImageBuffer`].
///
/// # Safety
///
/// `ptr` must have been allocated by this module with exactly `len`
/// bytes of capacity, and must not be used again after this call.
#[no_mangle]
pub unsafe extern "C" fn qoi_free_buffer(ptr: *mut u8, len: usize) {
    if ptr.is_null() {
        return;
    }
    drop(Vec::from_raw_parts(ptr, len, len));
}

/// Encodes a flat RGBA8 pixel buffer as QOI.
///
/// `rgba_ptr`/`rgba_len` must describe exactly `width * height * 4`
/// bytes. `channels` (3 or 4) controls which header value is written;
/// the source buffer is always read as RGBA8 regardless.
///
/// # Safety
///
/// `rgba_ptr` must be valid for reads of `rgba_len` bytes for the
/// duration of this call.
#[no_mangle]
pub unsafe extern "C" fn qoi_encode(
    width: u32,
    height: u32,
    channels: u8,
    colorspace: u8,
    rgba_ptr: *const u8,
    rgba_len: usize,
) -> QoiBuffer {
    let (channels, colorspace) = match (Channels::try_from(channels), Colorspace::try_from(colorspace)) {
        (Ok(c), Ok(cs)) => (c, cs),
        _ => return QoiBuffer::failure(),
    };

    if rgba_ptr.is_null() || rgba_len != width as usize * height as usize * 4 {
        return QoiBuffer::failure();
    }

    let rgba = std::slice::from_raw_parts(rgba_ptr, rgba_len);
    let header = Header::new(width, height, channels, colorspace);
    let source = RawBuffer::new(rgba, Channels::Rgba);

    let mut out = Vec::new();
    if qoi_codec::encode(&header, source, &mut out).is_err() {
        return QoiBuffer::failure();
    }

    let mut out = out.into_boxed_slice();
    let buf = out.as_mut_ptr();
    let len = out.len() as u32;
    std::mem::forget(out);
    QoiBuffer { buf, len }
}

/// Decodes a QOI byte stream into a flat RGBA8 pixel buffer.
///
/// # Safety
///
/// `ptr` must be valid for reads of `len` bytes for the duration of
/// this call.
#[no_mangle]
pub unsafe extern "C" fn qoi_decode(ptr: *const u8, len: usize) -> QoiImageBuffer {
    if ptr.is_null() {
        return QoiImageBuffer::failure();
    }

    let bytes = std::slice::from_raw_parts(ptr, len);
    let (header, pixels) = match qoi_codec::decode_strict(bytes) {
        Ok(result) => result,
        Err(_) => return QoiImageBuffer::failure(),
    };

    let rgba: Vec<u8> = pixels.into_iter().flat_map(|p| p.to_rgba_bytes()).collect();
    let mut rgba = rgba.into_boxed_slice();
    let buf = rgba.as_mut_ptr();
    let out_len = rgba.len() as u32;
    std::mem::forget(rgba);

    QoiImageBuffer {
        width: header.width,
        height: header.height,
        channels: header.channels as u8,
        colorspace: header.colorspace as u8,
        buf,
        len: out_len,
    }
}
