//! Bounds-checked big-endian primitive readers.
//!
//! The PSD format stores every multi-byte integer and IEEE-754 double in big-endian
//! byte order; there are no little-endian fields anywhere in the descriptor grammar.
//! This module provides the [`crate::file::io::PsdIO`] trait which abstracts the
//! conversion from fixed-size byte arrays to typed values, and the free functions
//! [`crate::file::io::read_be`] / [`crate::file::io::read_be_at`] which perform the
//! bounds check and (for the `_at` variant) advance the caller's offset.
//!
//! All functions return [`crate::Result`] and fail with [`crate::Error::OutOfBounds`]
//! when the buffer holds fewer bytes than the requested type needs.

use crate::{Error::OutOfBounds, Result};

/// Trait for type-specific safe big-endian reads.
///
/// Each implementation defines a `Bytes` associated type representing the fixed-size
/// byte array for that particular type (e.g. `[u8; 4]` for `u32`), plus the conversion
/// from that array. Implemented for the primitive types the PSD grammar actually uses.
pub trait PsdIO: Sized {
    /// Associated type representing the byte array type for this numeric type.
    type Bytes: Sized + for<'a> TryFrom<&'a [u8]>;

    /// Read `Self` from a byte buffer in big-endian order.
    fn from_be_bytes(bytes: Self::Bytes) -> Self;
}

impl PsdIO for u8 {
    type Bytes = [u8; 1];

    fn from_be_bytes(bytes: Self::Bytes) -> Self {
        bytes[0]
    }
}

impl PsdIO for i8 {
    type Bytes = [u8; 1];

    fn from_be_bytes(bytes: Self::Bytes) -> Self {
        i8::from_be_bytes(bytes)
    }
}

impl PsdIO for u16 {
    type Bytes = [u8; 2];

    fn from_be_bytes(bytes: Self::Bytes) -> Self {
        u16::from_be_bytes(bytes)
    }
}

impl PsdIO for i16 {
    type Bytes = [u8; 2];

    fn from_be_bytes(bytes: Self::Bytes) -> Self {
        i16::from_be_bytes(bytes)
    }
}

impl PsdIO for u32 {
    type Bytes = [u8; 4];

    fn from_be_bytes(bytes: Self::Bytes) -> Self {
        u32::from_be_bytes(bytes)
    }
}

impl PsdIO for i32 {
    type Bytes = [u8; 4];

    fn from_be_bytes(bytes: Self::Bytes) -> Self {
        i32::from_be_bytes(bytes)
    }
}

impl PsdIO for u64 {
    type Bytes = [u8; 8];

    fn from_be_bytes(bytes: Self::Bytes) -> Self {
        u64::from_be_bytes(bytes)
    }
}

impl PsdIO for i64 {
    type Bytes = [u8; 8];

    fn from_be_bytes(bytes: Self::Bytes) -> Self {
        i64::from_be_bytes(bytes)
    }
}

impl PsdIO for f64 {
    type Bytes = [u8; 8];

    fn from_be_bytes(bytes: Self::Bytes) -> Self {
        f64::from_be_bytes(bytes)
    }
}

/// Read a value of type `T` in big-endian format at the given offset, advancing it.
///
/// # Arguments
/// * `data` - The buffer to read from
/// * `offset` - Position to read at; advanced by `size_of::<T>()` on success
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if fewer than `size_of::<T>()` bytes remain.
pub fn read_be_at<T: PsdIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let len = std::mem::size_of::<T::Bytes>();
    if *offset + len > data.len() {
        return Err(OutOfBounds);
    }

    match T::Bytes::try_from(&data[*offset..*offset + len]) {
        Ok(bytes) => {
            *offset += len;
            Ok(T::from_be_bytes(bytes))
        }
        Err(_) => Err(OutOfBounds),
    }
}

/// Read a value of type `T` in big-endian format from the start of the buffer.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if the buffer is shorter than `size_of::<T>()`.
pub fn read_be<T: PsdIO>(data: &[u8]) -> Result<T> {
    let mut offset = 0;
    read_be_at(data, &mut offset)
}
