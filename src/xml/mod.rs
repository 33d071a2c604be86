//! Annotated-XML output layer.
//!
//! See [`writer::XmlWriter`] for the streaming sink the decoders write through.

pub mod writer;

pub use writer::XmlWriter;
