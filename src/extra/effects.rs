//! Effects-layer records and blend-mode rendering.
//!
//! An `'lrFX'` record is a version word plus a counted run of signature/key/length
//! sub-blocks, one per effect, using the same framing as the top-level records.
//! Several field interpretations here (which words are 16.16 fixed point, the
//! 0-255 opacity scale) come from observed files rather than the published
//! documentation, which is incomplete on all of them.
//!
//! [`color_space`] and the 8-byte inline blend-mode block are shared with the
//! type-tool and annotation decoders, which embed the same structures.

use bitflags::bitflags;
use log::debug;

use crate::{
    context::Context,
    descriptor::dict::{find_by_key, DictEntry, ROOT},
    extra::sig_key_block,
    OsType, Result,
};

/// Effect sub-block keys inside an effects-layer record.
static FX_DICT: &[DictEntry] = &[
    DictEntry::block(*b"cmnS", "COMMONSTATE", "common state", fx_common_state),
    DictEntry::block(*b"dsdw", "DROPSHADOW", "drop shadow", fx_shadow),
    DictEntry::block(*b"isdw", "INNERSHADOW", "inner shadow", fx_shadow),
    DictEntry::block(*b"oglw", "OUTERGLOW", "outer glow", fx_outer_glow),
    DictEntry::block(*b"iglw", "INNERGLOW", "inner glow", fx_inner_glow),
    DictEntry::block(*b"bevl", "BEVEL", "bevel", fx_bevel),
    DictEntry::block(*b"sofi", "SOLIDFILL", "solid fill", fx_solid_fill),
];

/// Blend-mode keys. The structure behind each key is empty; the key itself is
/// the value, so every entry renders as a placeholder element.
static BLEND_MODE_DICT: &[DictEntry] = &[
    DictEntry::unparsed(*b"norm", "NORMAL", "normal"),
    DictEntry::unparsed(*b"dark", "DARKEN", "darken"),
    DictEntry::unparsed(*b"lite", "LIGHTEN", "lighten"),
    DictEntry::unparsed(*b"hue ", "HUE", "hue"),
    DictEntry::unparsed(*b"sat ", "SATURATION", "saturation"),
    DictEntry::unparsed(*b"colr", "COLOR", "color"),
    DictEntry::unparsed(*b"lum ", "LUMINOSITY", "luminosity"),
    DictEntry::unparsed(*b"mul ", "MULTIPLY", "multiply"),
    DictEntry::unparsed(*b"scrn", "SCREEN", "screen"),
    DictEntry::unparsed(*b"diss", "DISSOLVE", "dissolve"),
    DictEntry::unparsed(*b"over", "OVERLAY", "overlay"),
    DictEntry::unparsed(*b"hLit", "HARDLIGHT", "hard light"),
    DictEntry::unparsed(*b"sLit", "SOFTLIGHT", "soft light"),
    DictEntry::unparsed(*b"diff", "DIFFERENCE", "difference"),
    DictEntry::unparsed(*b"smud", "EXCLUSION", "exclusion"),
    DictEntry::unparsed(*b"div ", "COLORDODGE", "color dodge"),
    DictEntry::unparsed(*b"idiv", "COLORBURN", "color burn"),
    DictEntry::unparsed(*b"lbrn", "LINEARBURN", "linear burn"),
    DictEntry::unparsed(*b"lddg", "LINEARDODGE", "linear dodge"),
    DictEntry::unparsed(*b"vLit", "VIVIDLIGHT", "vivid light"),
    DictEntry::unparsed(*b"lLit", "LINEARLIGHT", "linear light"),
    DictEntry::unparsed(*b"pLit", "PINLIGHT", "pin light"),
    DictEntry::unparsed(*b"hMix", "HARDMIX", "hard mix"),
];

/// Color-space names observed for the color-sampler space codes; assumed to
/// apply wherever a 2-byte space code precedes four color components.
static COLOR_SPACE_NAMES: [&str; 17] = [
    "kDummySpace", // space code -1
    "kRGBSpace",
    "kHSBSpace",
    "kCMYKSpace",
    "kPantoneSpace",
    "kFocoltoneSpace",
    "kTrumatchSpace",
    "kToyoSpace",
    "kLabSpace",
    "kGraySpace",
    "kWideCMYKSpace",
    "kHKSSpace",
    "kDICSpace",
    "kTotalInkSpace",
    "kMonitorRGBSpace",
    "kDuotoneSpace",
    "kOpacitySpace",
];

bitflags! {
    /// Flag byte of a layer record's blend-mode section.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LayerFlags: u8 {
        /// Transparency channel is locked.
        const TRANSPARENCY_PROTECTED = 1;
        /// Layer is visible.
        const VISIBLE = 2;
        /// The irrelevance bit below carries meaning.
        const BIT4_VALID = 8;
        /// Pixel data is irrelevant to the document's appearance.
        const PIXEL_DATA_IRRELEVANT = 16;
    }
}

/// The blend-mode section of a layer record, as read by the enclosing
/// layer parser.
#[derive(Debug, Clone, Copy)]
pub struct BlendModeInfo {
    /// Section signature; anything but `'8BIM'` suppresses rendering.
    pub sig: OsType,
    /// Blend-mode key.
    pub key: OsType,
    /// Opacity, 0-255 (rendered as a percentage).
    pub opacity: u8,
    /// 0 for base, 1 for non-base clipping.
    pub clipping: u8,
    /// Layer flag byte.
    pub flags: LayerFlags,
}

/// A 2-byte color-space code followed by four 16-bit color components.
pub(crate) fn color_space(ctx: &mut Context<'_, '_>, level: usize) -> Result<()> {
    let space = ctx.parser.read_be::<i16>()?;
    ctx.xml.indent(level)?;
    ctx.xml.fmt(format_args!("<COLOR SPACE='{space}'"))?;
    let index = space + 1;
    if index >= 0 && (index as usize) < COLOR_SPACE_NAMES.len() {
        ctx.xml.attr("NAME", COLOR_SPACE_NAMES[index as usize])?;
    }
    ctx.xml.raw(">")?;
    for i in 0..4 {
        let component = f64::from(ctx.parser.read_be::<u16>()?) / 65536.0;
        ctx.xml.fmt(format_args!(" <C{i}>{component}</C{i}>"))?;
    }
    ctx.xml.raw(" </COLOR>\n")
}

/// The 8-byte inline blend-mode block embedded in effect structures: signature
/// and key, rendered only when the signature checks out (the bytes are consumed
/// either way).
pub(crate) fn blend_mode(ctx: &mut Context<'_, '_>, level: usize, emit: bool) -> Result<()> {
    let sig = ctx.parser.read_key()?;
    let key = ctx.parser.read_key()?;
    if emit && sig == *b"8BIM" {
        ctx.xml.indent(level)?;
        ctx.xml.raw("<BLENDMODE>\n")?;
        find_by_key(ctx, level + 1, BLEND_MODE_DICT, &ROOT, key, emit, false)?;
        ctx.xml.indent(level)?;
        ctx.xml.raw("</BLENDMODE>\n")?;
    }
    Ok(())
}

/// Render the blend-mode section of a layer record, with opacity, clipping and
/// the flag bits as child elements.
///
/// The section bytes themselves were already read by the layer parser into
/// `bm`; this only renders (or, without emission, logs) them.
///
/// # Errors
/// Returns [`crate::Error::WriteError`] if the output sink fails.
pub fn layer_blend_mode(
    ctx: &mut Context<'_, '_>,
    level: usize,
    emit: bool,
    bm: &BlendModeInfo,
) -> Result<()> {
    if emit && bm.sig == *b"8BIM" {
        ctx.xml.indent(level)?;
        ctx.xml.fmt(format_args!(
            "<BLENDMODE OPACITY='{}' CLIPPING='{}'>\n",
            f64::from(bm.opacity) / 2.55,
            bm.clipping
        ))?;
        find_by_key(ctx, level + 1, BLEND_MODE_DICT, &ROOT, bm.key, emit, false)?;
        if bm.flags.contains(LayerFlags::TRANSPARENCY_PROTECTED) {
            ctx.xml.indent(level + 1)?;
            ctx.xml.raw("<TRANSPARENCYPROTECTED />\n")?;
        }
        if bm.flags.contains(LayerFlags::VISIBLE) {
            ctx.xml.indent(level + 1)?;
            ctx.xml.raw("<VISIBLE />\n")?;
        }
        // irrelevance is only meaningful when its validity bit is also set
        if bm
            .flags
            .contains(LayerFlags::BIT4_VALID | LayerFlags::PIXEL_DATA_IRRELEVANT)
        {
            ctx.xml.indent(level + 1)?;
            ctx.xml.raw("<PIXELDATAIRRELEVANT />\n")?;
        }
        ctx.xml.indent(level)?;
        ctx.xml.raw("</BLENDMODE>\n")?;
    } else if !emit && ctx.verbose() {
        let desc = BLEND_MODE_DICT
            .iter()
            .find(|e| e.key == bm.key)
            .map_or("???", |e| e.desc);
        debug!(
            "blending mode: sig='{}' key='{}'({}) opacity={}({}%) clipping={}({}) flags={:?}",
            bm.sig,
            bm.key,
            desc,
            bm.opacity,
            (u32::from(bm.opacity) * 100 + 127) / 255,
            bm.clipping,
            if bm.clipping != 0 { "non-base" } else { "base" },
            bm.flags
        );
    }
    Ok(())
}

fn fx_common_state(
    ctx: &mut Context<'_, '_>,
    level: usize,
    emit: bool,
    _parent: &DictEntry,
) -> Result<()> {
    if emit {
        let version = ctx.parser.read_be::<u32>()?;
        ctx.xml.indent(level)?;
        ctx.xml.fmt(format_args!("<VERSION>{version}</VERSION>\n"))?;
        let visible = ctx.parser.read_be::<u8>()?;
        ctx.xml.indent(level)?;
        ctx.xml.fmt(format_args!("<VISIBLE>{visible}</VISIBLE>\n"))?;
    }
    Ok(())
}

/// Drop shadow and inner shadow share one layout.
fn fx_shadow(
    ctx: &mut Context<'_, '_>,
    level: usize,
    emit: bool,
    _parent: &DictEntry,
) -> Result<()> {
    if !emit {
        return Ok(());
    }
    let version = ctx.parser.read_be::<u32>()?;
    ctx.xml.indent(level)?;
    ctx.xml.fmt(format_args!("<VERSION>{version}</VERSION>\n"))?;
    // the next four words are 16.16 fixed point (undocumented)
    for tag in ["BLUR", "INTENSITY", "ANGLE", "DISTANCE"] {
        let value = ctx.parser.read_fixed()?;
        ctx.xml.indent(level)?;
        ctx.xml.fmt(format_args!("<{tag}>{value}</{tag}>\n"))?;
    }
    color_space(ctx, level)?;
    blend_mode(ctx, level, emit)?;
    for tag in ["ENABLED", "USEANGLE"] {
        let value = ctx.parser.read_be::<u8>()?;
        ctx.xml.indent(level)?;
        ctx.xml.fmt(format_args!("<{tag}>{value}</{tag}>\n"))?;
    }
    // 0-255 despite the documentation calling it a percentage
    let opacity = f64::from(ctx.parser.read_be::<u8>()?) / 2.55;
    ctx.xml.indent(level)?;
    ctx.xml.fmt(format_args!("<OPACITY>{opacity}</OPACITY>\n"))?;
    color_space(ctx, level)
}

fn fx_outer_glow(
    ctx: &mut Context<'_, '_>,
    level: usize,
    emit: bool,
    _parent: &DictEntry,
) -> Result<()> {
    if !emit {
        return Ok(());
    }
    let version = ctx.parser.read_be::<u32>()?;
    ctx.xml.indent(level)?;
    ctx.xml.fmt(format_args!("<VERSION>{version}</VERSION>\n"))?;
    for tag in ["BLUR", "INTENSITY"] {
        let value = ctx.parser.read_fixed()?;
        ctx.xml.indent(level)?;
        ctx.xml.fmt(format_args!("<{tag}>{value}</{tag}>\n"))?;
    }
    color_space(ctx, level)?;
    blend_mode(ctx, level, emit)?;
    let enabled = ctx.parser.read_be::<u8>()?;
    ctx.xml.indent(level)?;
    ctx.xml.fmt(format_args!("<ENABLED>{enabled}</ENABLED>\n"))?;
    let opacity = f64::from(ctx.parser.read_be::<u8>()?) / 2.55;
    ctx.xml.indent(level)?;
    ctx.xml.fmt(format_args!("<OPACITY>{opacity}</OPACITY>\n"))?;
    color_space(ctx, level)
}

fn fx_inner_glow(
    ctx: &mut Context<'_, '_>,
    level: usize,
    emit: bool,
    _parent: &DictEntry,
) -> Result<()> {
    if !emit {
        return Ok(());
    }
    let version = ctx.parser.read_be::<u32>()?;
    ctx.xml.indent(level)?;
    ctx.xml.fmt(format_args!("<VERSION>{version}</VERSION>\n"))?;
    for tag in ["BLUR", "INTENSITY"] {
        let value = ctx.parser.read_fixed()?;
        ctx.xml.indent(level)?;
        ctx.xml.fmt(format_args!("<{tag}>{value}</{tag}>\n"))?;
    }
    color_space(ctx, level)?;
    blend_mode(ctx, level, emit)?;
    let enabled = ctx.parser.read_be::<u8>()?;
    ctx.xml.indent(level)?;
    ctx.xml.fmt(format_args!("<ENABLED>{enabled}</ENABLED>\n"))?;
    let opacity = f64::from(ctx.parser.read_be::<u8>()?) / 2.55;
    ctx.xml.indent(level)?;
    ctx.xml.fmt(format_args!("<OPACITY>{opacity}</OPACITY>\n"))?;
    if version == 2 {
        let invert = ctx.parser.read_be::<u8>()?;
        ctx.xml.indent(level)?;
        ctx.xml.fmt(format_args!("<INVERT>{invert}</INVERT>\n"))?;
    }
    color_space(ctx, level)
}

fn fx_bevel(
    ctx: &mut Context<'_, '_>,
    level: usize,
    emit: bool,
    _parent: &DictEntry,
) -> Result<()> {
    if !emit {
        return Ok(());
    }
    let version = ctx.parser.read_be::<u32>()?;
    ctx.xml.indent(level)?;
    ctx.xml.fmt(format_args!("<VERSION>{version}</VERSION>\n"))?;
    for tag in ["ANGLE", "STRENGTH", "BLUR"] {
        let value = ctx.parser.read_fixed()?;
        ctx.xml.indent(level)?;
        ctx.xml.fmt(format_args!("<{tag}>{value}</{tag}>\n"))?;
    }
    blend_mode(ctx, level, emit)?;
    blend_mode(ctx, level, emit)?;
    color_space(ctx, level)?;
    color_space(ctx, level)?;
    let style = ctx.parser.read_be::<u8>()?;
    ctx.xml.indent(level)?;
    ctx.xml.fmt(format_args!("<STYLE>{style}</STYLE>\n"))?;
    for tag in ["HIGHLIGHTOPACITY", "SHADOWOPACITY"] {
        let opacity = f64::from(ctx.parser.read_be::<u8>()?) / 2.55;
        ctx.xml.indent(level)?;
        ctx.xml.fmt(format_args!("<{tag}>{opacity}</{tag}>\n"))?;
    }
    for tag in ["ENABLED", "USEANGLE", "UPDOWN"] {
        let value = ctx.parser.read_be::<u8>()?;
        ctx.xml.indent(level)?;
        ctx.xml.fmt(format_args!("<{tag}>{value}</{tag}>\n"))?;
    }
    if version == 2 {
        color_space(ctx, level)?;
        color_space(ctx, level)?;
    }
    Ok(())
}

fn fx_solid_fill(
    ctx: &mut Context<'_, '_>,
    level: usize,
    emit: bool,
    _parent: &DictEntry,
) -> Result<()> {
    if !emit {
        return Ok(());
    }
    let version = ctx.parser.read_be::<u32>()?;
    ctx.xml.indent(level)?;
    ctx.xml.fmt(format_args!("<VERSION>{version}</VERSION>\n"))?;
    // the blend mode here is the usual 8 bytes; the documentation mentions 4
    blend_mode(ctx, level, emit)?;
    color_space(ctx, level)?;
    let opacity = f64::from(ctx.parser.read_be::<u8>()?) / 2.55;
    ctx.xml.indent(level)?;
    ctx.xml.fmt(format_args!("<OPACITY>{opacity}</OPACITY>\n"))?;
    let enabled = ctx.parser.read_be::<u8>()?;
    ctx.xml.indent(level)?;
    ctx.xml.fmt(format_args!("<ENABLED>{enabled}</ENABLED>\n"))?;
    color_space(ctx, level)
}

/// An effects-layer record: version, effect count, then per-effect sub-blocks
/// with the standard signature/key/length framing. A bad sub-block signature
/// ends the record.
pub(crate) fn layer_effects(
    ctx: &mut Context<'_, '_>,
    level: usize,
    emit: bool,
    _parent: &DictEntry,
) -> Result<()> {
    if emit {
        let version = ctx.parser.read_be::<i16>()?;
        ctx.xml.indent(level)?;
        ctx.xml.fmt(format_args!("<VERSION>{version}</VERSION>\n"))?;
        let count = ctx.parser.read_be::<i16>()?;
        for _ in 0..count {
            if sig_key_block(ctx, level, FX_DICT, emit)? == 0 {
                break;
            }
        }
    }
    Ok(())
}
