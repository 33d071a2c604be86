//! Additional layer information ("extra data") decoding.
//!
//! After a layer's fixed records, PSD and PSB files carry a run of tagged blocks:
//! `'8BIM'` signature, 4-byte key, 4-byte length, then payload. The blocks are
//! independent — every one declares its own length, so the walker can always skip
//! what it cannot parse. That makes errors here mostly recoverable, in contrast to
//! the descriptor grammar where an unknown tag is fatal:
//!
//! - a key with no table entry is skipped silently by its declared length;
//! - a key that is known but undocumented emits a `<TAG /> <!-- not parsed -->`
//!   placeholder and is skipped;
//! - a record whose signature is not `'8BIM'` ends the region — block boundaries
//!   can no longer be trusted, so the walker logs a warning and stops.
//!
//! [`additional_info`] walks the whole region and returns the bytes consumed;
//! [`sig_key_block`] handles a single block and is shared with the effects-layer
//! sub-blocks, which reuse the same signature/key/length framing.
//!
//! Payload decoding is for display only: after a block's decoder runs, the stream
//! is restored and the walker advances by the declared length. A decoder that
//! under- or over-reads its payload therefore cannot desynchronize the region.

pub(crate) mod annotation;
pub(crate) mod effects;
pub(crate) mod typetool;

use log::{debug, info, warn};
use widestring::U16String;

use crate::{
    context::Context,
    descriptor::{
        decode,
        dict::{find_by_key, DictDecoder, DictEntry, ROOT},
    },
    Result,
};

/// Additional-layer-information record keys.
///
/// Entries with no decoder are adjustment-layer and mask payloads whose internal
/// structure is undocumented; they render as placeholders and are skipped by
/// declared length.
static EXTRA_DICT: &[DictEntry] = &[
    DictEntry::unparsed(*b"levl", "LEVELS", "Levels"),
    DictEntry::unparsed(*b"curv", "CURVES", "Curves"),
    DictEntry::unparsed(*b"brit", "BRIGHTNESSCONTRAST", "Brightness/contrast"),
    DictEntry::unparsed(*b"blnc", "COLORBALANCE", "Color balance"),
    DictEntry::unparsed(*b"hue ", "HUESATURATION4", "Old Hue/saturation, Photoshop 4.0"),
    DictEntry::unparsed(*b"hue2", "HUESATURATION5", "New Hue/saturation, Photoshop 5.0"),
    DictEntry::unparsed(*b"selc", "SELECTIVECOLOR", "Selective color"),
    DictEntry::unparsed(*b"thrs", "THRESHOLD", "Threshold"),
    DictEntry::unparsed(*b"nvrt", "INVERT", "Invert"),
    DictEntry::unparsed(*b"post", "POSTERIZE", "Posterize"),
    DictEntry::block(*b"lrFX", "EFFECT", "Effects layer", effects::layer_effects),
    DictEntry::block(*b"tySh", "TYPETOOL5", "Type tool (5.0)", typetool::type_tool),
    DictEntry::inline(*b"luni", "UNICODENAME", "Unicode layer name", ed_unicode_name),
    DictEntry::inline(*b"lyid", "LAYERID", "Layer ID", ed_long),
    DictEntry::block(*b"lfx2", "OBJECTEFFECT", "Object based effects layer", ed_object_effects),
    DictEntry::unparsed(*b"Patt", "PATTERN", "Pattern"),
    DictEntry::unparsed(*b"Pat2", "PATTERNCS", "Pattern (CS)"),
    DictEntry::block(*b"Anno", "ANNOTATION", "Annotation", annotation::annotations),
    DictEntry::inline(*b"clbl", "BLENDCLIPPING", "Blend clipping", ed_byte),
    DictEntry::inline(*b"infx", "BLENDINTERIOR", "Blend interior", ed_byte),
    DictEntry::inline(*b"knko", "KNOCKOUT", "Knockout", ed_byte),
    DictEntry::inline(*b"lspf", "PROTECTED", "Protected", ed_long),
    DictEntry::unparsed(*b"lclr", "SHEETCOLOR", "Sheet color"),
    DictEntry::inline(*b"fxrp", "REFERENCEPOINT", "Reference point", ed_reference_point),
    DictEntry::unparsed(*b"grdm", "GRADIENT", "Gradient"),
    DictEntry::inline(*b"lsct", "SECTION", "Section divider", ed_long),
    DictEntry::block(*b"SoCo", "SOLIDCOLORSHEET", "Solid color sheet", ed_versioned_descriptor),
    DictEntry::block(*b"PtFl", "PATTERNFILL", "Pattern fill", ed_versioned_descriptor),
    DictEntry::block(*b"GdFl", "GRADIENTFILL", "Gradient fill", ed_versioned_descriptor),
    DictEntry::unparsed(*b"vmsk", "VECTORMASK", "Vector mask"),
    DictEntry::block(*b"TySh", "TYPETOOL6", "Type tool (6.0)", typetool::type_tool),
    DictEntry::inline(*b"ffxi", "FOREIGNEFFECTID", "Foreign effect ID", ed_long),
    DictEntry::inline(*b"lnsr", "LAYERNAMESOURCE", "Layer name source", ed_key),
    DictEntry::unparsed(*b"shpa", "PATTERNDATA", "Pattern data"),
    DictEntry::block(*b"shmd", "METADATASETTING", "Metadata setting", ed_metadata),
    DictEntry::unparsed(*b"brst", "BLENDINGRESTRICTIONS", "Channel blending restrictions"),
    DictEntry::inline(*b"lyvr", "LAYERVERSION", "Layer version", ed_long),
    DictEntry::inline(*b"tsly", "TRANSPARENCYSHAPES", "Transparency shapes layer", ed_byte),
    DictEntry::inline(*b"lmgm", "LAYERMASKASGLOBALMASK", "Layer mask as global mask", ed_byte),
    DictEntry::inline(*b"vmgm", "VECTORMASKASGLOBALMASK", "Vector mask as global mask", ed_byte),
    DictEntry::unparsed(*b"mixr", "CHANNELMIXER", "Channel mixer"),
    DictEntry::unparsed(*b"phfl", "PHOTOFILTER", "Photo Filter"),
];

/// Unsigned 32-bit payload (layer IDs, versions, section dividers).
fn ed_long(
    ctx: &mut Context<'_, '_>,
    _level: usize,
    emit: bool,
    parent: &DictEntry,
) -> Result<()> {
    let value = ctx.parser.read_be::<u32>()?;
    if emit {
        ctx.xml.fmt(format_args!("{value}"))?;
    } else if ctx.unquiet() {
        info!("({} = {})", parent.desc, value);
    }
    Ok(())
}

/// Single-byte flag payload, rendered verbatim.
fn ed_byte(
    ctx: &mut Context<'_, '_>,
    _level: usize,
    emit: bool,
    parent: &DictEntry,
) -> Result<()> {
    let value = ctx.parser.read_be::<u8>()?;
    if emit {
        ctx.xml.fmt(format_args!("{value}"))?;
    } else if ctx.unquiet() {
        info!("({} = {})", parent.desc, value);
    }
    Ok(())
}

/// 4-byte OSType payload.
fn ed_key(
    ctx: &mut Context<'_, '_>,
    _level: usize,
    emit: bool,
    parent: &DictEntry,
) -> Result<()> {
    let key = ctx.parser.read_key()?;
    if emit {
        ctx.xml.fmt(format_args!("{key}"))?;
    } else if ctx.unquiet() {
        info!("({} = '{}')", parent.desc, key);
    }
    Ok(())
}

/// Two big-endian doubles: the layer's reference point.
fn ed_reference_point(
    ctx: &mut Context<'_, '_>,
    _level: usize,
    emit: bool,
    parent: &DictEntry,
) -> Result<()> {
    let x = ctx.parser.read_be::<f64>()?;
    let y = ctx.parser.read_be::<f64>()?;
    if emit {
        ctx.xml.fmt(format_args!(" <X>{x}</X> <Y>{y}</Y> "))?;
    } else if ctx.unquiet() {
        info!("({} X={} Y={})", parent.desc, x, y);
    }
    Ok(())
}

/// Unicode layer name: a character count, then UTF-16BE code units.
///
/// The count is sanity-checked; layer names beyond 1023 characters only occur in
/// corrupt files, and a bogus count here would dump garbage into the output.
fn ed_unicode_name(
    ctx: &mut Context<'_, '_>,
    _level: usize,
    emit: bool,
    _parent: &DictEntry,
) -> Result<()> {
    let count = ctx.parser.read_be::<u32>()?;
    if count > 0 && count < 1024 {
        if emit {
            for _ in 0..count {
                let unit = ctx.parser.read_be::<u16>()?;
                ctx.xml
                    .chr(char::from_u32(u32::from(unit)).unwrap_or(char::REPLACEMENT_CHARACTER))?;
            }
        } else if ctx.unquiet() {
            let mut units = Vec::with_capacity(count as usize);
            for _ in 0..count {
                units.push(ctx.parser.read_be::<u16>()?);
            }
            info!(
                "(Unicode name = '{}')",
                U16String::from_vec(units).to_string_lossy()
            );
        }
    } else if ctx.verbose() {
        debug!("unicode name length {count} out of range, ignored");
    }
    Ok(())
}

/// Embedded descriptor; the XML-off pass does not decode it at all.
fn ed_descriptor(
    ctx: &mut Context<'_, '_>,
    level: usize,
    emit: bool,
    parent: &DictEntry,
) -> Result<()> {
    if emit {
        decode::descriptor(ctx, level, emit, parent)?;
    }
    Ok(())
}

/// Descriptor-version word, then the descriptor (solid color, pattern and
/// gradient fill sheets).
fn ed_versioned_descriptor(
    ctx: &mut Context<'_, '_>,
    level: usize,
    emit: bool,
    parent: &DictEntry,
) -> Result<()> {
    let version = ctx.parser.read_be::<u32>()?;
    if emit {
        ctx.xml.indent(level)?;
        ctx.xml
            .fmt(format_args!("<DESCRIPTORVERSION>{version}</DESCRIPTORVERSION>\n"))?;
    }
    ed_descriptor(ctx, level, emit, parent)
}

/// Object-based effects: an outer version word on top of the versioned descriptor.
fn ed_object_effects(
    ctx: &mut Context<'_, '_>,
    level: usize,
    emit: bool,
    parent: &DictEntry,
) -> Result<()> {
    let version = ctx.parser.read_be::<u32>()?;
    if emit {
        ctx.xml.indent(level)?;
        ctx.xml.fmt(format_args!("<VERSION>{version}</VERSION>\n"))?;
    }
    ed_versioned_descriptor(ctx, level, emit, parent)
}

/// One metadata sub-block: signature, key, copy-on-duplicate flag, 3 pad bytes,
/// then a length-prefixed payload whose structure is undocumented.
///
/// The payload is not consumed here; the enclosing record's declared length
/// covers it and the walker skips accordingly.
fn metadata_block(ctx: &mut Context<'_, '_>, level: usize, emit: bool) -> Result<()> {
    let sig = ctx.parser.read_key()?;
    let key = ctx.parser.read_key()?;
    let copy = ctx.parser.read_be::<u8>()?;
    ctx.parser.advance_by(3)?; // padding
    let len = ctx.parser.read_be::<u32>()?;
    if emit {
        ctx.xml.indent(level)?;
        ctx.xml.raw("<METADATA")?;
        ctx.xml.attr("SIG", &sig.to_string())?;
        ctx.xml.attr("KEY", &key.to_string())?;
        ctx.xml.raw(">\n")?;
        ctx.xml.indent(level + 1)?;
        ctx.xml.fmt(format_args!("<COPY>{copy}</COPY>\n"))?;
        ctx.xml.indent(level + 1)?;
        ctx.xml
            .fmt(format_args!("<!-- {len} bytes of undocumented data -->\n"))?;
        ctx.xml.indent(level)?;
        ctx.xml.raw("</METADATA>\n")?;
    } else if ctx.unquiet() {
        info!("(Metadata: sig='{sig}' key='{key}' {len} bytes)");
    }
    Ok(())
}

/// Counted metadata sub-blocks.
fn ed_metadata(
    ctx: &mut Context<'_, '_>,
    level: usize,
    emit: bool,
    _parent: &DictEntry,
) -> Result<()> {
    let count = ctx.parser.read_be::<u32>()?;
    for _ in 0..count {
        metadata_block(ctx, level, emit)?;
    }
    Ok(())
}

/// Decode one signature/key/length block against `dict`.
///
/// Returns the total bytes the block occupies (12-byte header plus declared
/// payload length), or 0 when the signature is not `'8BIM'` — the caller treats
/// that as the end of trustworthy data. The stream is left positioned after the
/// payload regardless of how much of it the decoder understood; a declared
/// length past the end of the region is clamped.
pub(crate) fn sig_key_block(
    ctx: &mut Context<'_, '_>,
    level: usize,
    dict: &'static [DictEntry],
    emit: bool,
) -> Result<u64> {
    let sig = ctx.parser.read_key()?;
    let key = ctx.parser.read_key()?;
    let len = ctx.parser.read_be::<u32>()?;

    if sig != *b"8BIM" {
        return Ok(0);
    }

    if !emit && ctx.verbose() {
        debug!("data block: key='{key}' length={len}");
    }

    let matched = find_by_key(ctx, level, dict, &ROOT, key, emit, true)?;
    if let Some(entry) = matched {
        if matches!(entry.decoder, DictDecoder::Unparsed) && !emit && ctx.unquiet() {
            info!("(data: {})", entry.desc);
        }
    }

    let declared = len as usize;
    let available = ctx.parser.remaining();
    if declared > available && ctx.verbose() {
        debug!(
            "block '{key}' declares {declared} bytes but only {available} remain, clamping"
        );
    }
    ctx.parser.advance_by(declared.min(available))?;

    Ok(12 + u64::from(len))
}

/// Walk a region of additional layer information, emitting XML for every block
/// that has a registered decoder.
///
/// `length` is the region size declared by the enclosing container. Walking
/// stops at the first block whose signature is not `'8BIM'` (with a warning), or
/// once fewer than 12 bytes remain — too small for another header. Returns the
/// number of bytes consumed, counting every skipped block at its declared size.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] when `length` overruns the supplied
/// region, and propagates decoder failures such as
/// [`crate::Error::UnknownDescriptorTag`] from embedded descriptors.
pub fn additional_info(
    ctx: &mut Context<'_, '_>,
    level: usize,
    mut length: u64,
    emit: bool,
) -> Result<u64> {
    if length > ctx.parser.remaining() as u64 {
        return Err(malformed_error!(
            "additional info length {} overruns region ({} bytes remain)",
            length,
            ctx.parser.remaining()
        ));
    }

    let mut consumed = 0u64;
    while length >= 12 {
        let block = sig_key_block(ctx, level, EXTRA_DICT, emit)?;
        if block == 0 {
            warn!("bad signature in layer's extra data, skipping the rest");
            break;
        }
        consumed += block;
        length = length.saturating_sub(block);
    }
    Ok(consumed)
}
