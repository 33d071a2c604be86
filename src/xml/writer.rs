//! Streaming writer for the annotated XML output document.
//!
//! The decoders emit XML incrementally as they walk the byte stream; nothing is
//! buffered into a tree. [`XmlWriter`] owns the formatting primitives they share:
//! tab indentation (one tab per nesting level), text escaping, attribute emission,
//! comment nodes for counts and "not parsed" notices, and CDATA passthrough for raw
//! engine-data bytes.
//!
//! Escaping goes through [`quick_xml::escape`]: element text escapes `&`, `<` and
//! `>`, attribute values additionally escape quotes. Control characters that are
//! invalid in XML are dropped; all other code points, ASCII or not, pass through
//! as UTF-8.

use std::borrow::Cow;
use std::fmt;
use std::io::Write;

use quick_xml::escape::{escape, partial_escape};

use crate::Result;

/// Returns `true` for control characters that may not appear in an XML document.
fn invalid_in_xml(c: char) -> bool {
    c < '\u{20}' && !matches!(c, '\t' | '\n' | '\r')
}

/// Incremental XML sink over a caller-supplied [`std::io::Write`].
///
/// The writer performs no well-formedness tracking; the decoders are responsible
/// for pairing their open and close tags. All methods fail with
/// [`crate::Error::WriteError`] if the underlying sink fails.
pub struct XmlWriter<'w> {
    out: &'w mut dyn Write,
}

impl<'w> XmlWriter<'w> {
    /// Create a writer over the given output sink.
    pub fn new(out: &'w mut dyn Write) -> Self {
        XmlWriter { out }
    }

    /// Write a string verbatim, without escaping.
    pub fn raw(&mut self, s: &str) -> Result<()> {
        self.out.write_all(s.as_bytes())?;
        Ok(())
    }

    /// Write formatted output verbatim, without escaping.
    pub fn fmt(&mut self, args: fmt::Arguments<'_>) -> Result<()> {
        self.out.write_fmt(args)?;
        Ok(())
    }

    /// Write one tab per nesting level.
    pub fn indent(&mut self, level: usize) -> Result<()> {
        for _ in 0..level {
            self.out.write_all(b"\t")?;
        }
        Ok(())
    }

    /// Write element text, escaped and stripped of invalid control characters.
    pub fn text(&mut self, s: &str) -> Result<()> {
        let cleaned: Cow<'_, str> = if s.chars().any(invalid_in_xml) {
            Cow::Owned(s.chars().filter(|&c| !invalid_in_xml(c)).collect())
        } else {
            Cow::Borrowed(s)
        };
        self.out.write_all(partial_escape(cleaned.as_ref()).as_bytes())?;
        Ok(())
    }

    /// Write a single character as escaped element text.
    pub fn chr(&mut self, c: char) -> Result<()> {
        let mut buf = [0u8; 4];
        self.text(c.encode_utf8(&mut buf))
    }

    /// Write a single-quoted attribute, preceded by a space: ` NAME='value'`.
    pub fn attr(&mut self, name: &str, value: &str) -> Result<()> {
        self.out.write_all(b" ")?;
        self.out.write_all(name.as_bytes())?;
        self.out.write_all(b"='")?;
        self.out.write_all(escape(value).as_bytes())?;
        self.out.write_all(b"'")?;
        Ok(())
    }

    /// Write a comment node: `<!-- text -->`.
    pub fn comment(&mut self, text: &str) -> Result<()> {
        self.out.write_all(b"<!-- ")?;
        self.out.write_all(text.as_bytes())?;
        self.out.write_all(b" -->")?;
        Ok(())
    }

    /// Copy raw bytes into a CDATA section, unescaped and unvalidated.
    ///
    /// Used for the engine-data PDF-syntax blobs, which are emitted verbatim
    /// including any embedded UTF-16 literal strings.
    pub fn cdata(&mut self, bytes: &[u8]) -> Result<()> {
        self.out.write_all(b"<![CDATA[")?;
        self.out.write_all(bytes)?;
        self.out.write_all(b"]]>\n")?;
        Ok(())
    }
}
