//! Integration tests for the additional-layer-information walker, driving the
//! public entry points with crafted byte streams.

use psdscope::{additional_info_to_xml, DecodeOptions, Error};

fn record(key: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(b"8BIM");
    buf.extend_from_slice(key);
    buf.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    buf.extend_from_slice(payload);
    buf
}

fn walk(data: &[u8]) -> (String, u64) {
    let mut out = Vec::new();
    let consumed = additional_info_to_xml(data, &mut out, DecodeOptions::default()).unwrap();
    (String::from_utf8(out).unwrap(), consumed)
}

#[test]
fn mixed_record_stream() {
    let mut name = 4u32.to_be_bytes().to_vec();
    for unit in [0x0042u16, 0x0061, 0x0073, 0x0065] {
        name.extend_from_slice(&unit.to_be_bytes());
    }
    let mut data = record(b"luni", &name);
    data.extend_from_slice(&record(b"lyid", &291u32.to_be_bytes()));
    data.extend_from_slice(&record(b"levl", &[0u8; 20]));
    data.extend_from_slice(&record(b"qqqq", &[0u8; 3])); // unknown, skipped

    let (xml, consumed) = walk(&data);
    assert_eq!(consumed, data.len() as u64);
    assert_eq!(
        xml,
        "<UNICODENAME>Base</UNICODENAME>\n\
         <LAYERID>291</LAYERID>\n\
         <LEVELS /> <!-- not parsed -->\n"
    );
}

#[test]
fn corruption_ends_walk_after_good_records() {
    let mut data = record(b"lyid", &7u32.to_be_bytes());
    data.extend_from_slice(b"BADXlyid");
    data.extend_from_slice(&4u32.to_be_bytes());
    data.extend_from_slice(&8u32.to_be_bytes());

    let (xml, consumed) = walk(&data);
    assert_eq!(consumed, 16);
    assert_eq!(xml, "<LAYERID>7</LAYERID>\n");
}

#[test]
fn region_longer_than_data_is_rejected() {
    let data = record(b"lyid", &7u32.to_be_bytes());
    let mut out = Vec::new();
    let mut ctx = psdscope::Context::new(&data, &mut out, DecodeOptions::default());
    assert!(matches!(
        psdscope::extra::additional_info(&mut ctx, 0, data.len() as u64 + 4, true),
        Err(Error::Malformed { .. })
    ));
}

#[test]
fn solid_color_record_with_descriptor() {
    let mut payload = 16u32.to_be_bytes().to_vec();
    payload.extend_from_slice(&0u32.to_be_bytes()); // class name
    payload.extend_from_slice(&0u32.to_be_bytes());
    payload.extend_from_slice(b"SoCo");
    payload.extend_from_slice(&1u32.to_be_bytes()); // one item
    payload.extend_from_slice(&0u32.to_be_bytes()); // key
    payload.extend_from_slice(b"Clr ");
    payload.extend_from_slice(b"doub");
    payload.extend_from_slice(&0.25f64.to_be_bytes());

    let data = record(b"SoCo", &payload);
    let (xml, consumed) = walk(&data);
    assert_eq!(consumed, data.len() as u64);
    assert!(xml.contains("<SOLIDCOLORSHEET>\n"));
    assert!(xml.contains("\t<DESCRIPTORVERSION>16</DESCRIPTORVERSION>\n"));
    assert!(xml.contains("\t<CLASS> <ID>SoCo</ID> </CLASS>\n"));
    assert!(xml.contains("\t<KEY> <ID>Clr </ID> </KEY>\n"));
    assert!(xml.contains("\t<DOUBLE>0.25</DOUBLE>\n"));
    assert!(xml.contains("</SOLIDCOLORSHEET>\n"));
}

#[test]
fn object_effects_record() {
    let mut payload = 0u32.to_be_bytes().to_vec(); // outer version
    payload.extend_from_slice(&16u32.to_be_bytes()); // descriptor version
    payload.extend_from_slice(&0u32.to_be_bytes()); // empty descriptor
    payload.extend_from_slice(&0u32.to_be_bytes());
    payload.extend_from_slice(b"null");
    payload.extend_from_slice(&0u32.to_be_bytes());

    let data = record(b"lfx2", &payload);
    let (xml, consumed) = walk(&data);
    assert_eq!(consumed, data.len() as u64);
    assert!(xml.contains("<OBJECTEFFECT>\n"));
    assert!(xml.contains("<VERSION>0</VERSION>"));
    assert!(xml.contains("<DESCRIPTORVERSION>16</DESCRIPTORVERSION>"));
}

#[test]
fn effects_layer_record() {
    let mut payload = 0i16.to_be_bytes().to_vec(); // version
    payload.extend_from_slice(&2i16.to_be_bytes()); // two effects
    // common state
    payload.extend_from_slice(b"8BIM");
    payload.extend_from_slice(b"cmnS");
    payload.extend_from_slice(&5u32.to_be_bytes());
    payload.extend_from_slice(&0u32.to_be_bytes());
    payload.push(1);
    // solid fill
    let mut sofi = 2u32.to_be_bytes().to_vec();
    sofi.extend_from_slice(b"8BIMnorm");
    sofi.extend_from_slice(&0i16.to_be_bytes());
    sofi.extend_from_slice(&[0u8; 8]);
    sofi.push(255); // opacity
    sofi.push(1); // enabled
    sofi.extend_from_slice(&0i16.to_be_bytes());
    sofi.extend_from_slice(&[0u8; 8]);
    payload.extend_from_slice(b"8BIM");
    payload.extend_from_slice(b"sofi");
    payload.extend_from_slice(&(sofi.len() as u32).to_be_bytes());
    payload.extend_from_slice(&sofi);

    let data = record(b"lrFX", &payload);
    let (xml, consumed) = walk(&data);
    assert_eq!(consumed, data.len() as u64);
    assert!(xml.contains("<EFFECT>\n"));
    assert!(xml.contains("<COMMONSTATE>\n"));
    assert!(xml.contains("<VISIBLE>1</VISIBLE>"));
    assert!(xml.contains("<SOLIDFILL>\n"));
    assert!(xml.contains("<NORMAL /> <!-- not parsed -->"));
    assert!(xml.contains("<OPACITY>100</OPACITY>"));
}

#[test]
fn type_tool_record() {
    let mut payload = 1i16.to_be_bytes().to_vec();
    for v in [1.0f64, 0.0, 0.0, 1.0, 0.0, 0.0] {
        payload.extend_from_slice(&v.to_be_bytes());
    }
    payload.extend_from_slice(&50i16.to_be_bytes()); // unparsed font info version

    let data = record(b"TySh", &payload);
    let (xml, consumed) = walk(&data);
    assert_eq!(consumed, data.len() as u64);
    assert!(xml.contains("<TYPETOOL6>\n"));
    assert!(xml.contains("<TRANSFORM> <XX>1</XX>"));
    assert!(xml.contains("<!-- don't know how to parse this version -->"));
}

#[test]
fn metadata_record() {
    let mut payload = 2u32.to_be_bytes().to_vec();
    for key in [b"mlst", b"cust"] {
        payload.extend_from_slice(b"8BIM");
        payload.extend_from_slice(key);
        payload.push(0);
        payload.extend_from_slice(&[0, 0, 0]);
        payload.extend_from_slice(&0u32.to_be_bytes());
    }

    let data = record(b"shmd", &payload);
    let (xml, consumed) = walk(&data);
    assert_eq!(consumed, data.len() as u64);
    assert!(xml.contains("<METADATA SIG='8BIM' KEY='mlst'>"));
    assert!(xml.contains("<METADATA SIG='8BIM' KEY='cust'>"));
    assert!(xml.contains("<!-- 0 bytes of undocumented data -->"));
}

#[test]
fn annotation_record() {
    let mut payload = Vec::new();
    payload.extend_from_slice(&2i16.to_be_bytes());
    payload.extend_from_slice(&1i16.to_be_bytes());
    payload.extend_from_slice(&1i32.to_be_bytes()); // one annotation
    payload.extend_from_slice(&0i32.to_be_bytes()); // total length, unused
    payload.extend_from_slice(b"txtA");
    payload.push(0); // open
    payload.push(0); // flags
    payload.extend_from_slice(&0i16.to_be_bytes());
    for _ in 0..8 {
        payload.extend_from_slice(&0i32.to_be_bytes());
    }
    payload.extend_from_slice(&0i16.to_be_bytes()); // color space
    payload.extend_from_slice(&[0u8; 8]);
    payload.extend_from_slice(&[3, b'a', b'n', b'n']); // author
    payload.extend_from_slice(&[1, b'x']); // name
    payload.extend_from_slice(&[1, b'y']); // mod date
    payload.extend_from_slice(&16i32.to_be_bytes());
    payload.extend_from_slice(b"txtC");
    payload.extend_from_slice(&4i32.to_be_bytes());
    payload.extend_from_slice(&(b'o' as u16).to_be_bytes());
    payload.extend_from_slice(&(b'k' as u16).to_be_bytes());

    let data = record(b"Anno", &payload);
    let (xml, consumed) = walk(&data);
    assert_eq!(consumed, data.len() as u64);
    assert!(xml.contains("<ANNOTATION>\n"));
    assert!(xml.contains("<VERSION MAJOR='2' MINOR='1' />"));
    assert!(xml.contains("AUTHOR='ann'"));
    assert!(xml.contains("<STRING>ok</STRING>"));
}

#[test]
fn descriptor_error_inside_record_propagates() {
    // a SoCo record whose embedded descriptor uses an unknown type tag
    let mut payload = 16u32.to_be_bytes().to_vec();
    payload.extend_from_slice(&0u32.to_be_bytes());
    payload.extend_from_slice(&0u32.to_be_bytes());
    payload.extend_from_slice(b"SoCo");
    payload.extend_from_slice(&1u32.to_be_bytes());
    payload.extend_from_slice(&0u32.to_be_bytes());
    payload.extend_from_slice(b"Clr ");
    payload.extend_from_slice(b"????");

    let data = record(b"SoCo", &payload);
    let mut out = Vec::new();
    assert!(matches!(
        additional_info_to_xml(&data, &mut out, DecodeOptions::default()),
        Err(Error::UnknownDescriptorTag { .. })
    ));
}
