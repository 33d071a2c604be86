#![doc(html_no_source)]
#![deny(missing_docs)]
#![allow(dead_code)]
#![allow(clippy::too_many_arguments)]

//! # psdscope
//!
//! A streaming decoder for the metadata layers of Adobe Photoshop PSD/PSB files:
//! Action Descriptor trees and the tagged "additional layer information" blocks,
//! rendered as an annotated XML document.
//!
//! `psdscope` does not read whole image files. It decodes the byte regions an
//! enclosing container parser hands it — a descriptor here, a run of `'8BIM'`
//! records there — and reports how many bytes each region consumed, so the
//! container can resume behind it. Pixel data, compositing and file-level
//! structure are out of scope.
//!
//! ## Features
//!
//! - **Complete descriptor grammar** - objects, lists, references, enumerations,
//!   unit floats, Unicode strings, aliases and engine data
//! - **Additional layer information** - effects layers, type tool records,
//!   annotations, metadata settings, fill sheets and the scalar records
//! - **Resilient by construction** - every record skip is driven by declared
//!   lengths; decoding a record cannot desynchronize the walk
//! - **Bounded** - all reads are bounds-checked and nesting depth is limited,
//!   so corrupt input fails with an error instead of a panic
//!
//! ## Decoding a descriptor
//!
//! ```rust
//! use psdscope::{descriptor_to_xml, DecodeOptions};
//!
//! // an empty descriptor of class 'null'
//! let mut data = Vec::new();
//! data.extend_from_slice(&0u32.to_be_bytes()); // class name: no characters
//! data.extend_from_slice(&0u32.to_be_bytes()); // class id given as a key
//! data.extend_from_slice(b"null");
//! data.extend_from_slice(&0u32.to_be_bytes()); // no items
//!
//! let mut out = Vec::new();
//! let consumed = descriptor_to_xml(&data, &mut out, DecodeOptions::default())?;
//! assert_eq!(consumed, data.len());
//!
//! let xml = String::from_utf8(out).unwrap();
//! assert!(xml.contains("<CLASS> <ID>null</ID> </CLASS>"));
//! assert!(xml.contains("<!--count:0-->"));
//! # Ok::<(), psdscope::Error>(())
//! ```
//!
//! ## Walking additional layer information
//!
//! ```rust
//! use psdscope::{additional_info_to_xml, DecodeOptions};
//!
//! // a single layer-ID record
//! let mut data = Vec::new();
//! data.extend_from_slice(b"8BIM");
//! data.extend_from_slice(b"lyid");
//! data.extend_from_slice(&4u32.to_be_bytes());
//! data.extend_from_slice(&291u32.to_be_bytes());
//!
//! let mut out = Vec::new();
//! let consumed = additional_info_to_xml(&data, &mut out, DecodeOptions::default())?;
//! assert_eq!(consumed, 16);
//! assert_eq!(String::from_utf8(out).unwrap(), "<LAYERID>291</LAYERID>\n");
//! # Ok::<(), psdscope::Error>(())
//! ```
//!
//! ## Output conventions
//!
//! The XML mirrors the stream: elements appear in stream order, indentation is
//! one tab per nesting level, counts and skipped payloads surface as comments
//! (`<!--count:3-->`, `<!-- 24 bytes alias data -->`), and known-but-undocumented
//! structures render as `<TAG /> <!-- not parsed -->` placeholders. Values are
//! preserved verbatim — a boolean byte of `0xff` renders as `255`.
//!
//! Diagnostics that are not part of the document (record headers, skipped-data
//! notices) go through the [`log`] crate, gated by [`Verbosity`].

#[macro_use]
pub(crate) mod error;

mod context;
pub(crate) mod file;
pub(crate) mod xml;

pub mod descriptor;
pub mod extra;
pub mod prelude;

use std::io::Write;

pub use context::{Context, DecodeOptions, Verbosity};
pub use descriptor::{DecodeFn, DictDecoder, DictEntry, OsType};
pub use error::Error;
pub use extra::effects::{layer_blend_mode, BlendModeInfo, LayerFlags};
pub use file::{io::PsdIO, Parser};

/// Convenience alias for operations that can fail with [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Decode one Action Descriptor from the start of `data`, writing XML to `out`.
///
/// Returns the number of bytes the descriptor occupied; the enclosing container
/// parser should resume at that offset.
///
/// # Errors
/// Returns [`Error::UnknownDescriptorTag`] on a type tag with no dictionary
/// entry, [`Error::OutOfBounds`] when a declared count or length overruns
/// `data`, [`Error::RecursionLimit`] on excessive nesting, and
/// [`Error::WriteError`] if the sink fails.
pub fn descriptor_to_xml(
    data: &[u8],
    out: &mut dyn Write,
    options: DecodeOptions,
) -> Result<usize> {
    let mut ctx = Context::new(data, out, options);
    descriptor::decode(&mut ctx, 0)?;
    Ok(ctx.pos())
}

/// Walk a region of additional layer information from the start of `data`,
/// writing XML to `out`.
///
/// The whole of `data` is taken as the region. Returns the number of bytes
/// consumed, counting skipped records at their declared sizes; a record with a
/// bad signature ends the walk early (see
/// [`extra::additional_info`]).
///
/// # Errors
/// Propagates decoder failures; see [`extra::additional_info`].
pub fn additional_info_to_xml(
    data: &[u8],
    out: &mut dyn Write,
    options: DecodeOptions,
) -> Result<u64> {
    let mut ctx = Context::new(data, out, options);
    extra::additional_info(&mut ctx, 0, data.len() as u64, true)
}
