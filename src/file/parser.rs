//! Low-level byte stream parser for PSD metadata decoding.
//!
//! This module provides the [`crate::file::parser::Parser`] type, a cursor-based binary
//! reader designed for the descriptor and extra-data grammars. It offers bounds-checked
//! access to binary data with the reader set the PSD format requires: big-endian
//! integers and doubles, 4-byte OSType tags, Pascal strings (plain and 2-byte aligned),
//! and 16.16 fixed-point values.
//!
//! # Architecture
//!
//! The parser maintains a position within a byte slice. Every read validates data
//! availability before touching the buffer, so malformed counts and lengths surface as
//! [`crate::Error::OutOfBounds`] instead of panics. Seeking is permitted anywhere within
//! the buffer including one-past-the-end, which the extra-data walker relies on when
//! skipping a trailing record by its declared length.
//!
//! # Usage Examples
//!
//! ```rust
//! use psdscope::Parser;
//!
//! let data = [0x00, 0x00, 0x00, 0x07, b'l', b'o', b'n', b'g'];
//! let mut parser = Parser::new(&data);
//!
//! let value = parser.read_be::<u32>()?;
//! assert_eq!(value, 7);
//!
//! let key = parser.read_key()?;
//! assert_eq!(key, *b"long");
//! # Ok::<(), psdscope::Error>(())
//! ```

use crate::{
    descriptor::OsType,
    file::io::{read_be_at, PsdIO},
    Error::OutOfBounds,
    Result,
};

/// A cursor-based bounds-checked reader over an in-memory byte region.
///
/// `Parser` is handed to the decoder positioned by the outer PSD container parser at
/// the start of a descriptor or extra-data region. It tracks the current offset for
/// sequential parsing and provides random access for the save/restore discipline the
/// record walker uses (decode-for-display, then skip by declared length).
///
/// # Examples
///
/// ```rust
/// use psdscope::Parser;
///
/// let data = [0x40, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
/// let mut parser = Parser::new(&data);
/// assert_eq!(parser.read_be::<f64>()?, 3.0);
/// assert!(!parser.has_more_data());
/// # Ok::<(), psdscope::Error>(())
/// ```
pub struct Parser<'a> {
    /// The binary data being parsed
    data: &'a [u8],
    /// Current position within the data buffer
    position: usize,
}

impl<'a> Parser<'a> {
    /// Create a new [`Parser`] from a byte slice.
    ///
    /// # Arguments
    /// * `data` - The byte slice to read from
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Parser { data, position: 0 }
    }

    /// Returns the length of the underlying data buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the parser has no data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get the current position of the parser within the data buffer.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.position
    }

    /// Number of bytes between the current position and the end of the buffer.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// Returns `true` if there is more data available to parse.
    #[must_use]
    pub fn has_more_data(&self) -> bool {
        self.position < self.data.len()
    }

    /// Move the current position to the specified index.
    ///
    /// Positions up to and including the buffer length are valid; seeking to the
    /// length leaves the parser at end-of-data.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if `pos` is beyond the data length.
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(OutOfBounds);
        }

        self.position = pos;
        Ok(())
    }

    /// Move the position forward by the specified number of bytes.
    ///
    /// # Arguments
    /// * `step` - Amount of bytes to advance
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if advancing by `step` would exceed the
    /// data length.
    pub fn advance_by(&mut self, step: usize) -> Result<()> {
        if self.position + step > self.data.len() {
            return Err(OutOfBounds);
        }

        self.position += step;
        Ok(())
    }

    /// Read a value of type `T` in big-endian format, advancing the position.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if reading `T` would exceed the data length.
    pub fn read_be<T: PsdIO>(&mut self) -> Result<T> {
        read_be_at::<T>(self.data, &mut self.position)
    }

    /// Read a 4-byte OSType tag, advancing the position.
    ///
    /// Tags are case-sensitive ASCII and may carry trailing spaces as padding
    /// (e.g. `"hue "` versus `"hue2"`); no normalization is performed.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if fewer than 4 bytes remain.
    pub fn read_key(&mut self) -> Result<OsType> {
        if self.position + 4 > self.data.len() {
            return Err(OutOfBounds);
        }

        let mut key = [0u8; 4];
        key.copy_from_slice(&self.data[self.position..self.position + 4]);
        self.position += 4;
        Ok(OsType::new(key))
    }

    /// Borrow `count` raw bytes at the current position, advancing past them.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if fewer than `count` bytes remain.
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        if self.position + count > self.data.len() {
            return Err(OutOfBounds);
        }

        let slice = &self.data[self.position..self.position + count];
        self.position += count;
        Ok(slice)
    }

    /// Read a 32-bit big-endian 16.16 fixed-point value as a double.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if fewer than 4 bytes remain.
    pub fn read_fixed(&mut self) -> Result<f64> {
        Ok(f64::from(self.read_be::<i32>()?) / 65536.0)
    }

    /// Read a Pascal string: a length byte followed by that many bytes of text.
    ///
    /// Non-UTF-8 content is replaced lossily; the format predates any encoding
    /// declaration and in practice holds ASCII font and author names.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the declared length overruns the buffer.
    pub fn read_pascal_string(&mut self) -> Result<String> {
        let len = self.read_be::<u8>()? as usize;
        let bytes = self.read_bytes(len)?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    /// Read a Pascal string padded so that length byte plus text occupy an even
    /// number of bytes: when the declared length is even, one extra pad byte is
    /// consumed after the text.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the declared length overruns the buffer.
    pub fn read_pascal_string_padded(&mut self) -> Result<String> {
        let len = self.read_be::<u8>()? as usize;
        let padded = len + usize::from(len % 2 == 0);
        let bytes = self.read_bytes(padded)?;
        Ok(String::from_utf8_lossy(&bytes[..len]).into_owned())
    }
}
