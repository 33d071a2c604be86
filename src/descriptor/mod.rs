//! Action Descriptor decoding.
//!
//! Descriptors are the serialized property trees that actions, adjustment layers
//! and object-based effects carry: a class header, then a counted sequence of
//! key/value items where every value is introduced by a 4-byte type tag. This
//! module owns the [`OsType`] key type, the dictionary machinery
//! ([`DictEntry`]/[`DictDecoder`]) that maps tags to decoders, and the
//! recursive-descent decoder itself.
//!
//! [`decode`] is the standalone entry point for a byte region known to begin with
//! a descriptor; embedded descriptors inside extra-data records reach the same
//! decoder through their record tables.

pub(crate) mod decode;
pub(crate) mod dict;
mod ostype;

pub use dict::{DecodeFn, DictDecoder, DictEntry};
pub use ostype::OsType;

use crate::{context::Context, Result};

/// Decode one descriptor starting at the context's current position, emitting
/// XML at the given indentation level.
///
/// On success the context is positioned on the first byte after the descriptor;
/// pass the position back to the enclosing container via
/// [`Context::pos`](crate::Context::pos).
///
/// # Errors
/// Returns [`crate::Error::UnknownDescriptorTag`] when an item, reference or
/// unit-float type tag has no dictionary entry,
/// [`crate::Error::RecursionLimit`] when nesting exceeds the configured bound,
/// and [`crate::Error::OutOfBounds`] when a declared count or length runs past
/// the end of the region.
pub fn decode(ctx: &mut Context<'_, '_>, level: usize) -> Result<()> {
    decode::descriptor(ctx, level, true, &dict::ROOT)
}
