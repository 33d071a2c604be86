//! Recursive-descent decoder for the Action Descriptor grammar.
//!
//! A descriptor is a self-describing tagged key/value tree: every value announces its
//! kind with a 4-byte OSType tag, and the layout of the bytes that follow depends
//! entirely on that tag. The decoder is state-machine-free — one function per value
//! kind, each leaving the stream positioned exactly after the bytes it owns:
//!
//! - [`descriptor`] - class header, explicit item count, then exactly that many items
//! - [`reference`] - counted sequence of reference-items, dispatched by kind
//! - [`list`] - counted sequence of recursively-typed items
//! - [`double`] / [`unit_float`] - 8-byte big-endian IEEE-754, optionally unit-tagged
//! - [`unicode_string`] - counted UTF-16BE code units, transcoded one unit at a time
//! - [`enumerated`] - TYPE and ENUM string-or-id pair
//! - [`integer`] / [`boolean`] - fixed-width scalars
//! - [`alias`] / [`engine_data`] - length-prefixed opaque blobs
//!
//! Because the grammar is fully tag-driven, an unrecognized tag makes the size of the
//! remaining stream undecidable: item, reference and unit-float dispatch all fail
//! with [`crate::Error::UnknownDescriptorTag`] and let the caller decide whether to
//! abandon the document or just the containing record. There is no generic skip.

use crate::{
    context::Context,
    descriptor::dict::{find_by_key, DictEntry, ROOT},
    Error, Result,
};

/// Kinds of descriptor item. Every conceivable type tag must carry a decoder here;
/// dispatch through this table is the "must parse completely" context.
static ITEM_DICT: &[DictEntry] = &[
    DictEntry::block(*b"obj ", "REFERENCE", "Reference", reference),
    DictEntry::block(*b"Objc", "DESCRIPTOR", "Descriptor", descriptor),
    DictEntry::block(*b"list", "LIST", "List", list), // not documented
    DictEntry::block(*b"VlLs", "LIST", "List", list),
    DictEntry::inline(*b"doub", "DOUBLE", "Double", double),
    DictEntry::inline(*b"UntF", "UNITFLOAT", "Unit float", unit_float),
    DictEntry::inline(*b"TEXT", "STRING", "String", unicode_string),
    DictEntry::block(*b"enum", "ENUMERATED", "Enumerated", enumerated),
    DictEntry::inline(*b"long", "INTEGER", "Integer", integer),
    DictEntry::inline(*b"bool", "BOOLEAN", "Boolean", boolean),
    DictEntry::block(*b"GlbO", "GLOBALOBJECT", "GlobalObject same as Descriptor", descriptor),
    DictEntry::block(*b"type", "CLASS", "Class", class),
    DictEntry::block(*b"GlbC", "CLASS", "Class", class),
    DictEntry::inline(*b"alis", "ALIAS", "Alias", alias),
    DictEntry::block(*b"tdta", "ENGINEDATA", "Engine Data", engine_data), // PDF syntax data
];

/// Kinds of reference-item. The value layout of Identifier/Index/Name is missing
/// from the vendor documentation; they stay as explicit unparsed placeholders.
static REF_DICT: &[DictEntry] = &[
    DictEntry::block(*b"prop", "PROPERTY", "Property", ref_property),
    DictEntry::block(*b"Clss", "CLASS", "Class", class),
    DictEntry::block(*b"Enmr", "ENUMREF", "Enumerated Reference", ref_enum),
    DictEntry::inline(*b"rele", "OFFSET", "Offset", ref_offset),
    DictEntry::unparsed(*b"Idnt", "IDENTIFIER", "Identifier"),
    DictEntry::unparsed(*b"indx", "INDEX", "Index"),
    DictEntry::unparsed(*b"name", "NAME", "Name"),
];

/// Kinds of unit float. Every kind delegates to the plain double reader; the unit
/// tag only picks the element name.
static UNIT_FLOAT_DICT: &[DictEntry] = &[
    DictEntry::inline(*b"#Ang", "ANGLE", "angle: base degrees", double),
    DictEntry::inline(*b"#Rsl", "DENSITY", "density: base per inch", double),
    DictEntry::inline(*b"#Rlt", "DISTANCE", "distance: base 72ppi", double),
    DictEntry::inline(*b"#Nne", "NONE", "none: coerced", double),
    DictEntry::inline(*b"#Prc", "PERCENT", "percent: tagged unit value", double),
    DictEntry::inline(*b"#Pxl", "PIXELS", "pixels: tagged unit value", double),
];

/// A counted run of single-byte characters: ` <STRING>…</STRING>`.
fn ascii_string(ctx: &mut Context<'_, '_>, count: usize) -> Result<()> {
    ctx.xml.raw(" <STRING>")?;
    let bytes = ctx.parser.read_bytes(count)?;
    for &b in bytes {
        ctx.xml.chr(char::from(b))?;
    }
    ctx.xml.raw("</STRING>")
}

/// A string-or-id field: a 4-byte count followed by either that many ASCII bytes
/// (count > 0) or a literal 4-byte id (count == 0).
fn string_or_id(ctx: &mut Context<'_, '_>, level: usize, tag: &str) -> Result<()> {
    let count = ctx.parser.read_be::<u32>()? as usize;
    ctx.xml.indent(level)?;
    ctx.xml.fmt(format_args!("<{tag}>"))?;
    if count > 0 {
        ascii_string(ctx, count)?;
    } else {
        let id = ctx.parser.read_key()?;
        ctx.xml.raw(" <ID>")?;
        ctx.xml.text(&id.to_string())?;
        ctx.xml.raw("</ID>")?;
    }
    ctx.xml.fmt(format_args!(" </{tag}>\n"))
}

/// Class header: a Unicode class name (possibly empty) then a string-or-id class ID.
pub(crate) fn class(
    ctx: &mut Context<'_, '_>,
    level: usize,
    emit: bool,
    parent: &DictEntry,
) -> Result<()> {
    unicode_string(ctx, level, emit, parent)?;
    string_or_id(ctx, level, "CLASS")
}

fn ref_property(
    ctx: &mut Context<'_, '_>,
    level: usize,
    emit: bool,
    parent: &DictEntry,
) -> Result<()> {
    class(ctx, level, emit, parent)?;
    string_or_id(ctx, level, "KEY")
}

fn ref_enum(
    ctx: &mut Context<'_, '_>,
    level: usize,
    emit: bool,
    parent: &DictEntry,
) -> Result<()> {
    class(ctx, level, emit, parent)?;
    enumerated(ctx, level, emit, parent)
}

fn ref_offset(
    ctx: &mut Context<'_, '_>,
    level: usize,
    emit: bool,
    parent: &DictEntry,
) -> Result<()> {
    class(ctx, level, emit, parent)?;
    integer(ctx, level, emit, parent)
}

/// One key/value item: a string-or-id key, then dispatch on the value's type tag.
///
/// # Errors
/// [`crate::Error::UnknownDescriptorTag`] if the type tag has no dictionary entry;
/// the remaining stream layout cannot be determined without it.
pub(crate) fn item(ctx: &mut Context<'_, '_>, level: usize) -> Result<()> {
    string_or_id(ctx, level, "KEY")?;
    let key = ctx.parser.read_key()?;
    let offset = ctx.parser.pos();
    match find_by_key(ctx, level, ITEM_DICT, &ROOT, key, true, false)? {
        Some(_) => Ok(()),
        None => Err(Error::UnknownDescriptorTag { key, offset }),
    }
}

/// Full descriptor: class header, declared item count, then exactly that many items.
pub(crate) fn descriptor(
    ctx: &mut Context<'_, '_>,
    level: usize,
    emit: bool,
    parent: &DictEntry,
) -> Result<()> {
    class(ctx, level, emit, parent)?;
    let count = ctx.parser.read_be::<u32>()?;
    ctx.xml.indent(level)?;
    ctx.xml.fmt(format_args!("<!--count:{count}-->\n"))?;
    for _ in 0..count {
        item(ctx, level)?;
    }
    Ok(())
}

fn reference(
    ctx: &mut Context<'_, '_>,
    level: usize,
    _emit: bool,
    parent: &DictEntry,
) -> Result<()> {
    let count = ctx.parser.read_be::<u32>()?;
    for _ in 0..count {
        let key = ctx.parser.read_key()?;
        let offset = ctx.parser.pos();
        if find_by_key(ctx, level, REF_DICT, parent, key, true, false)?.is_none() {
            return Err(Error::UnknownDescriptorTag { key, offset });
        }
    }
    Ok(())
}

fn list(ctx: &mut Context<'_, '_>, level: usize, _emit: bool, _parent: &DictEntry) -> Result<()> {
    let count = ctx.parser.read_be::<u32>()?;
    for _ in 0..count {
        item(ctx, level)?;
    }
    Ok(())
}

fn double(ctx: &mut Context<'_, '_>, _level: usize, _emit: bool, _parent: &DictEntry) -> Result<()> {
    let value = ctx.parser.read_be::<f64>()?;
    ctx.xml.fmt(format_args!("{value}"))
}

fn unit_float(
    ctx: &mut Context<'_, '_>,
    level: usize,
    _emit: bool,
    parent: &DictEntry,
) -> Result<()> {
    let key = ctx.parser.read_key()?;
    let offset = ctx.parser.pos();
    match find_by_key(ctx, level, UNIT_FLOAT_DICT, parent, key, true, false)? {
        Some(_) => Ok(()),
        None => Err(Error::UnknownDescriptorTag { key, offset }),
    }
}

/// Counted UTF-16BE code units (the count is characters, not bytes).
///
/// Each code unit is transcoded independently; surrogate pairs are NOT combined, so
/// supplementary characters come out as two replacement characters rather than one
/// reconstructed code point. This mirrors the long-standing output and is kept for
/// golden-file stability.
pub(crate) fn unicode_string(
    ctx: &mut Context<'_, '_>,
    level: usize,
    _emit: bool,
    parent: &DictEntry,
) -> Result<()> {
    let count = ctx.parser.read_be::<u32>()?;
    if parent.one_line {
        ctx.xml.raw(" ")?;
    } else {
        ctx.xml.indent(level)?;
    }
    ctx.xml.raw("<UNICODE>")?;
    for _ in 0..count {
        let unit = ctx.parser.read_be::<u16>()?;
        ctx.xml
            .chr(char::from_u32(u32::from(unit)).unwrap_or(char::REPLACEMENT_CHARACTER))?;
    }
    ctx.xml.raw("</UNICODE>")?;
    ctx.xml.raw(if parent.one_line { " " } else { "\n" })
}

fn enumerated(
    ctx: &mut Context<'_, '_>,
    level: usize,
    _emit: bool,
    _parent: &DictEntry,
) -> Result<()> {
    string_or_id(ctx, level, "TYPE")?;
    string_or_id(ctx, level, "ENUM")
}

pub(crate) fn integer(
    ctx: &mut Context<'_, '_>,
    _level: usize,
    _emit: bool,
    _parent: &DictEntry,
) -> Result<()> {
    let value = ctx.parser.read_be::<i32>()?;
    ctx.xml.fmt(format_args!(" <INTEGER>{value}</INTEGER> "))
}

/// The byte value is preserved verbatim — `0xff` renders as `255`, not coerced into
/// the boolean domain.
fn boolean(ctx: &mut Context<'_, '_>, _level: usize, _emit: bool, _parent: &DictEntry) -> Result<()> {
    let value = ctx.parser.read_be::<u8>()?;
    ctx.xml.fmt(format_args!(" <BOOLEAN>{value}</BOOLEAN> "))
}

/// Length-prefixed opaque alias record; skipped, length reported as a comment.
fn alias(ctx: &mut Context<'_, '_>, _level: usize, _emit: bool, _parent: &DictEntry) -> Result<()> {
    let count = ctx.parser.read_be::<u32>()? as usize;
    ctx.xml.fmt(format_args!(" <!-- {count} bytes alias data --> "))?;
    ctx.parser.advance_by(count)
}

/// Length-prefixed PDF-syntax blob, copied verbatim into a CDATA section.
///
/// The PDF content (including embedded UTF-16 literal strings) is not parsed.
fn engine_data(
    ctx: &mut Context<'_, '_>,
    _level: usize,
    _emit: bool,
    _parent: &DictEntry,
) -> Result<()> {
    let count = ctx.parser.read_be::<u32>()? as usize;
    let bytes = ctx.parser.read_bytes(count)?;
    ctx.xml.cdata(bytes)
}
