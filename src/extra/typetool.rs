//! Type-tool record decoding (`'tySh'`, Photoshop 5/6 text layers).
//!
//! The record carries the text transform, per-face font information, style runs
//! and the text itself as styled UTF-16 characters. Which of the 32-bit fields
//! are 16.16 fixed point is not documented; the choices here reproduce values
//! that match what the application displays.
//!
//! Font-info versions above 6 use a different, descriptor-based layout that is
//! not decoded; the record renders a comment instead.

use log::info;
use widestring::U16String;

use crate::{
    context::Context, descriptor::dict::DictEntry, extra::effects::color_space, Result,
};

/// Transform coefficient names, in stream order.
static COEFF: [&str; 6] = ["XX", "XY", "YX", "YY", "TX", "TY"];

fn face(ctx: &mut Context<'_, '_>, level: usize) -> Result<()> {
    let mark = ctx.parser.read_be::<i16>()?;
    let face_type = ctx.parser.read_be::<i32>()?;
    ctx.xml.indent(level)?;
    ctx.xml.fmt(format_args!("<FACE MARK='{mark}' TYPE='{face_type}'"))?;
    let name = ctx.parser.read_pascal_string()?;
    ctx.xml.attr("FONTNAME", &name)?;
    let family = ctx.parser.read_pascal_string()?;
    ctx.xml.attr("FONTFAMILY", &family)?;
    let style = ctx.parser.read_pascal_string()?;
    ctx.xml.attr("FONTSTYLE", &style)?;
    let script = ctx.parser.read_be::<i16>()?;
    ctx.xml.fmt(format_args!(" SCRIPT='{script}'>\n"))?;

    ctx.xml.indent(level)?;
    ctx.xml.raw("\t<DESIGNVECTOR>")?;
    let axes = ctx.parser.read_be::<i32>()?;
    for _ in 0..axes {
        let axis = ctx.parser.read_be::<i32>()?;
        ctx.xml.fmt(format_args!(" <AXIS>{axis}</AXIS>"))?;
    }
    ctx.xml.raw(" </DESIGNVECTOR>\n")?;

    ctx.xml.indent(level)?;
    ctx.xml.raw("</FACE>\n")
}

fn style_run(ctx: &mut Context<'_, '_>, level: usize, info_version: i16) -> Result<()> {
    let mark = ctx.parser.read_be::<i16>()?;
    let face_mark = ctx.parser.read_be::<i16>()?;
    let size = ctx.parser.read_fixed()?;
    let tracking = ctx.parser.read_fixed()?;
    let kerning = ctx.parser.read_fixed()?;
    let leading = ctx.parser.read_fixed()?;
    let base_shift = ctx.parser.read_fixed()?;
    let auto_kern = ctx.parser.read_be::<u8>()?;
    ctx.xml.indent(level)?;
    ctx.xml.fmt(format_args!(
        "<STYLE MARK='{mark}' FACEMARK='{face_mark}' SIZE='{size}' TRACKING='{tracking}' KERNING='{kerning}' LEADING='{leading}' BASESHIFT='{base_shift}' AUTOKERN='{auto_kern}'"
    ))?;
    if info_version <= 5 {
        let extra = ctx.parser.read_be::<u8>()?;
        ctx.xml.fmt(format_args!(" EXTRA='{extra}'"))?;
    }
    let rotate = ctx.parser.read_be::<u8>()?;
    ctx.xml.fmt(format_args!(" ROTATE='{rotate}' />\n"))
}

fn text_line(ctx: &mut Context<'_, '_>, level: usize) -> Result<()> {
    let char_count = ctx.parser.read_be::<i32>()?;
    let orientation = ctx.parser.read_be::<i16>()?;
    let alignment = ctx.parser.read_be::<i16>()?;
    ctx.xml.indent(level)?;
    ctx.xml.fmt(format_args!(
        "\t<LINE ORIENTATION='{orientation}' ALIGNMENT='{alignment}'>\n"
    ))?;

    let mut units = Vec::new();
    for _ in 0..char_count {
        let unit = ctx.parser.read_be::<u16>()?;
        units.push(unit);
        let style = ctx.parser.read_be::<i16>()?;
        ctx.xml.indent(level)?;
        ctx.xml.fmt(format_args!("\t\t<UNICODE STYLE='{style}'>"))?;
        ctx.xml
            .chr(char::from_u32(u32::from(unit)).unwrap_or(char::REPLACEMENT_CHARACTER))?;
        ctx.xml.raw("</UNICODE>\n")?;
    }

    ctx.xml.indent(level)?;
    ctx.xml.raw("\t\t<STRING>")?;
    ctx.xml.text(&U16String::from_vec(units).to_string_lossy())?;
    ctx.xml.raw("</STRING>\n")?;
    ctx.xml.indent(level)?;
    ctx.xml.raw("\t</LINE>\n")
}

/// A type-tool record: transform, font info, style runs and styled text.
pub(crate) fn type_tool(
    ctx: &mut Context<'_, '_>,
    level: usize,
    emit: bool,
    parent: &DictEntry,
) -> Result<()> {
    let version = ctx.parser.read_be::<i16>()?;
    if !emit {
        if ctx.unquiet() {
            info!("({}, version = {})", parent.desc, version);
        }
        return Ok(());
    }

    ctx.xml.indent(level)?;
    ctx.xml.fmt(format_args!("<VERSION>{version}</VERSION>\n"))?;

    ctx.xml.indent(level)?;
    ctx.xml.raw("<TRANSFORM>")?;
    for coeff in COEFF {
        let value = ctx.parser.read_be::<f64>()?;
        ctx.xml.fmt(format_args!(" <{coeff}>{value}</{coeff}>"))?;
    }
    ctx.xml.raw(" </TRANSFORM>\n")?;

    let info_version = ctx.parser.read_be::<i16>()?;
    ctx.xml.indent(level)?;
    ctx.xml
        .fmt(format_args!("<FONTINFOVERSION>{info_version}</FONTINFOVERSION>\n"))?;
    if info_version > 6 {
        ctx.xml.indent(level)?;
        ctx.xml.raw("<!-- don't know how to parse this version -->\n")?;
        return Ok(());
    }

    let face_count = ctx.parser.read_be::<i16>()?;
    for _ in 0..face_count {
        face(ctx, level)?;
    }

    let style_count = ctx.parser.read_be::<i16>()?;
    for _ in 0..style_count {
        style_run(ctx, level, info_version)?;
    }

    let text_type = ctx.parser.read_be::<i16>()?;
    let scaling = ctx.parser.read_fixed()?;
    let char_count = ctx.parser.read_be::<i32>()?;
    let h_placement = ctx.parser.read_fixed()?;
    let v_placement = ctx.parser.read_fixed()?;
    let sel_start = ctx.parser.read_be::<i32>()?;
    let sel_end = ctx.parser.read_be::<i32>()?;
    let line_count = ctx.parser.read_be::<i16>()?;
    ctx.xml.indent(level)?;
    ctx.xml.fmt(format_args!(
        "<TEXT TYPE='{text_type}' SCALING='{scaling}' CHARCOUNT='{char_count}' HPLACEMENT='{h_placement}' VPLACEMENT='{v_placement}' SELSTART='{sel_start}' SELEND='{sel_end}'>\n"
    ))?;
    for _ in 0..line_count {
        text_line(ctx, level)?;
    }
    color_space(ctx, level + 1)?;
    let anti_alias = ctx.parser.read_be::<u8>()?;
    ctx.xml.indent(level)?;
    ctx.xml
        .fmt(format_args!("\t<ANTIALIAS>{anti_alias}</ANTIALIAS>\n"))?;

    ctx.xml.indent(level)?;
    ctx.xml.raw("</TEXT>\n")
}
