//! Byte-level access to PSD metadata regions.
//!
//! The outer PSD/PSB container parser hands this crate an in-memory byte region
//! positioned at the start of a descriptor or extra-data block; everything in this
//! module reads from such a region. [`parser::Parser`] is the cursor-based reader
//! used throughout the decoders, built on the bounds-checked big-endian primitives
//! in [`io`].

pub mod io;
pub mod parser;

pub use parser::Parser;
