//! Tag dictionaries and the dispatcher that drives them.
//!
//! Every parsing context in the descriptor and extra-data grammars — descriptor item
//! kinds, reference kinds, unit-float kinds, effect kinds, blend-mode names, top-level
//! record keys — is a finite, statically-known table of [`DictEntry`] values mapping a
//! 4-byte [`OsType`](crate::OsType) key to an output tag name, a human description and
//! a decoder. The tables are data, not code: dispatch is a first-match-wins linear
//! scan (tables are small; this is efficient enough in practice), and "known key,
//! structure undocumented" is the explicit [`DictDecoder::Unparsed`] variant rather
//! than a null function pointer.
//!
//! [`find_by_key`] locates the entry and [`enter_tag`] wraps the decoder call in the
//! entry's XML element, applying the two-level inline/block formatting protocol: an
//! entry's own `one_line` flag chooses its style, but an inline *parent* suppresses
//! the child's newlines regardless. When dispatching a top-level extra-data record,
//! the stream position is restored after the decoder runs — decoding there is purely
//! for XML emission, and the record walker advances the stream by the declared length
//! itself. Inside descriptor items no restore happens; consumption is authoritative
//! and cumulative.

use crate::{context::Context, descriptor::OsType, Result};

/// Signature shared by every registered decoder.
///
/// A decoder reads the bytes its value logically owns (leaving the stream positioned
/// exactly after them), emitting XML when `emit` is set. The final argument is the
/// entry being decoded; decoders consult its `one_line` flag when formatting values
/// they render themselves.
pub type DecodeFn = fn(&mut Context<'_, '_>, usize, bool, &DictEntry) -> Result<()>;

/// How the content behind a dictionary key is handled.
#[derive(Clone, Copy)]
pub enum DictDecoder {
    /// Structure is understood; this function decodes it.
    Parse(DecodeFn),
    /// Known key, but the structure is undocumented or unsupported: emit a
    /// placeholder element and let the caller skip past it by declared length.
    Unparsed,
}

/// One immutable entry of a tag dictionary.
pub struct DictEntry {
    /// The 4-byte key this entry matches, exactly and case-sensitively.
    pub key: OsType,
    /// XML element name emitted around the decoded content.
    pub tag: &'static str,
    /// Render on one line, inline with siblings, no indentation or newlines.
    pub one_line: bool,
    /// Human-readable description, used in diagnostics only.
    pub desc: &'static str,
    /// Decoder for the content behind the key.
    pub decoder: DictDecoder,
}

impl DictEntry {
    /// Entry rendered in block style (indented, newline-terminated).
    #[must_use]
    pub const fn block(key: [u8; 4], tag: &'static str, desc: &'static str, func: DecodeFn) -> Self {
        DictEntry {
            key: OsType::new(key),
            tag,
            one_line: false,
            desc,
            decoder: DictDecoder::Parse(func),
        }
    }

    /// Entry rendered inline: its value stays on one line with its siblings.
    #[must_use]
    pub const fn inline(key: [u8; 4], tag: &'static str, desc: &'static str, func: DecodeFn) -> Self {
        DictEntry {
            key: OsType::new(key),
            tag,
            one_line: true,
            desc,
            decoder: DictDecoder::Parse(func),
        }
    }

    /// Known key with no decoder; rendered as an empty placeholder element.
    #[must_use]
    pub const fn unparsed(key: [u8; 4], tag: &'static str, desc: &'static str) -> Self {
        DictEntry {
            key: OsType::new(key),
            tag,
            one_line: false,
            desc,
            decoder: DictDecoder::Unparsed,
        }
    }
}

/// Pseudo-entry standing in for the document root: block style, never matched.
///
/// Passed as the parent at every top-level dispatch so the formatting protocol has
/// a containing entry to consult.
pub(crate) static ROOT: DictEntry = DictEntry {
    key: OsType::new([0; 4]),
    tag: "",
    one_line: false,
    desc: "root",
    decoder: DictDecoder::Unparsed,
};

/// Locate `key` in `dict` and decode or placeholder its content.
///
/// Returns the matched entry, or `None` when the key is not in the dictionary —
/// the call site decides whether that is fatal (descriptor items, where the
/// remaining layout is undecidable) or skippable (extra-data records, which carry
/// a declared length).
///
/// # Arguments
/// * `ctx` - Decode state
/// * `level` - Current indentation level
/// * `dict` - The dictionary for this parsing context
/// * `parent` - The entry whose content is being dispatched (formatting protocol)
/// * `key` - The 4-byte tag read from the stream
/// * `emit` - Whether XML is written
/// * `reset_pos` - Restore the stream position after the decoder runs
///
/// # Errors
/// Propagates decoder failures, including
/// [`crate::Error::UnknownDescriptorTag`] from nested dispatches and
/// [`crate::Error::RecursionLimit`] when nesting exceeds the configured bound.
pub(crate) fn find_by_key(
    ctx: &mut Context<'_, '_>,
    level: usize,
    dict: &'static [DictEntry],
    parent: &DictEntry,
    key: OsType,
    emit: bool,
    reset_pos: bool,
) -> Result<Option<&'static DictEntry>> {
    for entry in dict {
        if entry.key != key {
            continue;
        }

        match entry.decoder {
            DictDecoder::Parse(func) => {
                enter_tag(ctx, level, parent, entry, func, emit, reset_pos)?;
            }
            DictDecoder::Unparsed => {
                // No decoder for this content. The tag emits nothing of its own,
                // so only the parent's one-line-ness matters here.
                if emit {
                    if parent.one_line {
                        ctx.xml.fmt(format_args!(" <{} /> <!-- not parsed --> ", entry.tag))?;
                    } else {
                        ctx.xml.indent(level)?;
                        ctx.xml.fmt(format_args!("<{} /> <!-- not parsed -->\n", entry.tag))?;
                    }
                }
            }
        }
        return Ok(Some(entry));
    }
    Ok(None)
}

/// Emit the wrapping element for `entry` and run its decoder on the content.
///
/// What precedes the open tag belongs to the parent, so the parent's one-line-ness
/// chooses between indentation and a single space; the entry's own flag chooses
/// whether its content is laid out on one line.
fn enter_tag(
    ctx: &mut Context<'_, '_>,
    level: usize,
    parent: &DictEntry,
    entry: &DictEntry,
    func: DecodeFn,
    emit: bool,
    reset_pos: bool,
) -> Result<()> {
    let saved = ctx.parser.pos();

    if emit {
        if parent.one_line {
            ctx.xml.raw(" ")?;
        } else {
            ctx.xml.indent(level)?;
        }
        ctx.xml.fmt(format_args!("<{}>", entry.tag))?;
        if !entry.one_line {
            ctx.xml.raw("\n")?;
        }
    }

    ctx.enter()?;
    let decoded = func(ctx, level + 1, emit, entry);
    ctx.leave();
    decoded?;

    if emit {
        if !entry.one_line {
            ctx.xml.indent(level)?;
        }
        ctx.xml.fmt(format_args!("</{}>", entry.tag))?;
        ctx.xml.raw(if parent.one_line { " " } else { "\n" })?;
    }

    if reset_pos {
        ctx.parser.seek(saved)?;
    }
    Ok(())
}
