//! Annotation record decoding (`'Anno'`, text and sound notes).
//!
//! Each annotation is internally length-prefixed, so unknown content types can be
//! skipped cleanly. The documentation does not say how ASCII and Unicode text
//! content are distinguished, nor what the sound "length" field really means; the
//! text content is treated as UTF-16BE and the sound length rendered as a rate,
//! which matches observed files.

use log::info;
use widestring::U16String;

use crate::{
    context::Context, descriptor::dict::DictEntry, extra::effects::color_space, Result,
};

fn annotation(ctx: &mut Context<'_, '_>, level: usize) -> Result<()> {
    // the annotation's total length; the content length below is authoritative
    let _total = ctx.parser.read_be::<i32>()?;
    let kind = ctx.parser.read_key()?;
    let open = ctx.parser.read_be::<u8>()?;
    let flags = ctx.parser.read_be::<u8>()?;
    let _opt_blocks = ctx.parser.read_be::<i16>()?;
    let mut rects = [0i32; 8]; // icon and popup rectangles
    for r in &mut rects {
        *r = ctx.parser.read_be::<i32>()?;
    }
    // the color precedes the annotation's own element in the output
    color_space(ctx, level)?;

    ctx.xml.indent(level)?;
    if kind == *b"txtA" {
        ctx.xml.raw("<TEXT")?;
    } else if kind == *b"sndA" {
        ctx.xml.raw("<SOUND")?;
    } else {
        ctx.xml.raw("<UNKNOWN")?;
    }
    ctx.xml.fmt(format_args!(" OPEN='{open}' FLAGS='{flags}'"))?;
    let author = ctx.parser.read_pascal_string_padded()?;
    ctx.xml.attr("AUTHOR", &author)?;
    let name = ctx.parser.read_pascal_string_padded()?;
    ctx.xml.attr("NAME", &name)?;
    let mod_date = ctx.parser.read_pascal_string_padded()?;
    ctx.xml.attr("MODDATE", &mod_date)?;
    ctx.xml.fmt(format_args!(
        " ICONT='{}' ICONL='{}' ICONB='{}' ICONR='{}'",
        rects[0], rects[1], rects[2], rects[3]
    ))?;
    ctx.xml.fmt(format_args!(
        " POPUPT='{}' POPUPL='{}' POPUPB='{}' POPUPR='{}'",
        rects[4], rects[5], rects[6], rects[7]
    ))?;

    // bytes of annotation data left after its own length word
    let mut remaining = i64::from(ctx.parser.read_be::<i32>()?) - 12;
    let content_key = ctx.parser.read_key()?;
    let data_len = ctx.parser.read_be::<i32>()?;
    if content_key == *b"txtC" {
        ctx.xml.raw(">\n")?;
        ctx.xml.indent(level)?;
        ctx.xml.raw("\t<UNICODE>")?;
        let mut units = Vec::new();
        for _ in 0..data_len / 2 {
            let unit = ctx.parser.read_be::<u16>()?;
            units.push(unit);
            ctx.xml
                .chr(char::from_u32(u32::from(unit)).unwrap_or(char::REPLACEMENT_CHARACTER))?;
        }
        ctx.xml.raw("</UNICODE>\n")?;
        ctx.xml.indent(level)?;
        ctx.xml.raw("\t<STRING>")?;
        ctx.xml.text(&U16String::from_vec(units).to_string_lossy())?;
        ctx.xml.raw("</STRING>\n")?;
        ctx.xml.indent(level)?;
        ctx.xml.raw("</TEXT>\n")?;
        remaining -= i64::from(data_len);
    } else if content_key == *b"sndM" {
        // the "length" field behaves like a sampling rate here
        ctx.xml
            .fmt(format_args!(" RATE='{data_len}' BYTES='{remaining}' />\n"))?;
    } else {
        ctx.xml.raw(" /> <!-- don't know -->\n")?;
    }

    // skip whatever's left of this annotation's data
    let target = ctx.parser.pos() as i64 + remaining;
    let target = usize::try_from(target)
        .map_err(|_| malformed_error!("annotation content overruns its record"))?;
    ctx.parser.seek(target)
}

/// An annotation record: version, then a counted list of annotations.
pub(crate) fn annotations(
    ctx: &mut Context<'_, '_>,
    level: usize,
    emit: bool,
    parent: &DictEntry,
) -> Result<()> {
    let major = ctx.parser.read_be::<i16>()?;
    let minor = ctx.parser.read_be::<i16>()?;
    if !emit {
        if ctx.unquiet() {
            info!("({}, version = {}.{})", parent.desc, major, minor);
        }
        return Ok(());
    }

    ctx.xml.indent(level)?;
    ctx.xml
        .fmt(format_args!("<VERSION MAJOR='{major}' MINOR='{minor}' />\n"))?;
    let count = ctx.parser.read_be::<i32>()?;
    for _ in 0..count {
        annotation(ctx, level)?;
    }
    Ok(())
}
