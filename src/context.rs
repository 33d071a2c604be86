//! Decode-pass state: input cursor, output sink and configuration.
//!
//! Nothing here is process-wide: a [`Context`] bundles the [`Parser`](crate::Parser) over the input region, the
//! [`XmlWriter`](crate::xml::XmlWriter) over the output sink, the caller's
//! [`DecodeOptions`], and the recursion-depth counter that guards against
//! adversarial nesting. Decoders receive `&mut Context` and nothing else is shared.

use std::io::Write;

use strum::EnumIter;

use crate::{file::Parser, xml::XmlWriter, Error, Result};

/// How chatty the decode pass is on the `log` channel.
///
/// XML emission is controlled separately (by the `emit` flag threaded through the
/// decoders); verbosity only governs human-readable notes that are not part of
/// the document: record headers, skipped-data notices, non-XML summaries.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, EnumIter)]
pub enum Verbosity {
    /// No notes at all.
    Quiet,
    /// Summaries of records that were recognized but not rendered as XML.
    #[default]
    Normal,
    /// Additionally log every record header and skipped byte range.
    Verbose,
}

/// Configuration for one decode pass.
#[derive(Debug, Clone, Copy)]
pub struct DecodeOptions {
    /// Diagnostic chattiness; see [`Verbosity`].
    pub verbosity: Verbosity,
    /// Maximum nesting depth before decoding fails with
    /// [`Error::RecursionLimit`]. The format is a tree by
    /// construction, but corrupt input can claim unbounded nesting.
    pub max_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            verbosity: Verbosity::default(),
            max_depth: 64,
        }
    }
}

/// All state for a single decode pass over one byte region.
///
/// Transient by design: build one, run one entry point
/// ([`descriptor_to_xml`](crate::descriptor_to_xml) and
/// [`additional_info_to_xml`](crate::additional_info_to_xml) do this internally),
/// and read back the final stream position via [`Context::pos`]. Nothing is
/// retained between records and nothing is shared across threads.
pub struct Context<'a, 'w> {
    pub(crate) parser: Parser<'a>,
    pub(crate) xml: XmlWriter<'w>,
    options: DecodeOptions,
    depth: usize,
}

impl<'a, 'w> Context<'a, 'w> {
    /// Create a context decoding `data` into `out` under the given options.
    pub fn new(data: &'a [u8], out: &'w mut dyn Write, options: DecodeOptions) -> Self {
        Context {
            parser: Parser::new(data),
            xml: XmlWriter::new(out),
            options,
            depth: 0,
        }
    }

    /// Current byte offset within the input region.
    ///
    /// After a decode entry point returns, this is the position the outer
    /// container parser should resume from.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.parser.pos()
    }

    /// Enter one nesting level, failing once the configured bound is exceeded.
    pub(crate) fn enter(&mut self) -> Result<()> {
        if self.depth >= self.options.max_depth {
            return Err(Error::RecursionLimit(self.options.max_depth));
        }

        self.depth += 1;
        Ok(())
    }

    /// Leave one nesting level.
    pub(crate) fn leave(&mut self) {
        self.depth -= 1;
    }

    /// `true` when record headers and skip notices should be logged.
    pub(crate) fn verbose(&self) -> bool {
        self.options.verbosity >= Verbosity::Verbose
    }

    /// `true` unless the caller asked for complete silence.
    pub(crate) fn unquiet(&self) -> bool {
        self.options.verbosity >= Verbosity::Normal
    }
}
