//! Integration tests for the Action Descriptor decoder, driving the public
//! entry points with crafted byte streams.

use psdscope::{descriptor_to_xml, DecodeOptions, Error};

fn u32be(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_be_bytes());
}

/// Empty Unicode class name, class id given as a 4-byte key, declared item count.
fn class_header(buf: &mut Vec<u8>, id: &[u8; 4], count: u32) {
    u32be(buf, 0);
    u32be(buf, 0);
    buf.extend_from_slice(id);
    u32be(buf, count);
}

fn item_header(buf: &mut Vec<u8>, key: &[u8; 4], type_tag: &[u8; 4]) {
    u32be(buf, 0);
    buf.extend_from_slice(key);
    buf.extend_from_slice(type_tag);
}

fn decode(data: &[u8]) -> (String, usize) {
    let mut out = Vec::new();
    let consumed = descriptor_to_xml(data, &mut out, DecodeOptions::default()).unwrap();
    (String::from_utf8(out).unwrap(), consumed)
}

#[test]
fn integer_item_document() {
    let mut data = Vec::new();
    class_header(&mut data, b"abcd", 1);
    item_header(&mut data, b"xyzz", b"long");
    u32be(&mut data, 7);

    let (xml, consumed) = decode(&data);
    assert_eq!(consumed, data.len());
    assert_eq!(
        xml,
        "<UNICODE></UNICODE>\n\
         <CLASS> <ID>abcd</ID> </CLASS>\n\
         <!--count:1-->\n\
         <KEY> <ID>xyzz</ID> </KEY>\n\
         <INTEGER> <INTEGER>7</INTEGER> </INTEGER>\n"
    );
}

#[test]
fn named_class_and_string_key() {
    let mut data = Vec::new();
    u32be(&mut data, 3); // class name "Doc"
    for unit in [0x0044u16, 0x006f, 0x0063] {
        data.extend_from_slice(&unit.to_be_bytes());
    }
    u32be(&mut data, 4); // class id as a string
    data.extend_from_slice(b"Dcmn");
    u32be(&mut data, 1);
    u32be(&mut data, 5); // item key as a string
    data.extend_from_slice(b"Title");
    data.extend_from_slice(b"bool");
    data.push(1);

    let (xml, consumed) = decode(&data);
    assert_eq!(consumed, data.len());
    assert!(xml.contains("<UNICODE>Doc</UNICODE>"));
    assert!(xml.contains("<CLASS> <STRING>Dcmn</STRING> </CLASS>"));
    assert!(xml.contains("<KEY> <STRING>Title</STRING> </KEY>"));
    assert!(xml.contains("<BOOLEAN> <BOOLEAN>1</BOOLEAN> </BOOLEAN>"));
}

#[test]
fn declared_item_count_governs() {
    let mut data = Vec::new();
    class_header(&mut data, b"clss", 4);
    for key in [b"aaaa", b"bbbb", b"cccc", b"dddd"] {
        item_header(&mut data, key, b"long");
        u32be(&mut data, 1);
    }

    let (xml, consumed) = decode(&data);
    assert_eq!(consumed, data.len());
    assert!(xml.contains("<!--count:4-->"));
    assert_eq!(xml.matches("<KEY>").count(), 4);
}

#[test]
fn nested_list_of_doubles() {
    let mut data = Vec::new();
    class_header(&mut data, b"clss", 1);
    item_header(&mut data, b"vals", b"VlLs");
    u32be(&mut data, 2);
    u32be(&mut data, 0); // first element key
    data.extend_from_slice(b"elm0");
    data.extend_from_slice(b"doub");
    data.extend_from_slice(&3.25f64.to_be_bytes());
    u32be(&mut data, 0); // second element key
    data.extend_from_slice(b"elm1");
    data.extend_from_slice(b"doub");
    data.extend_from_slice(&f64::to_be_bytes(-0.5));

    let (xml, consumed) = decode(&data);
    assert_eq!(consumed, data.len());
    assert!(xml.contains("<LIST>\n"));
    assert!(xml.contains("\t<KEY> <ID>elm0</ID> </KEY>\n"));
    assert!(xml.contains("\t<DOUBLE>3.25</DOUBLE>\n"));
    assert!(xml.contains("\t<DOUBLE>-0.5</DOUBLE>\n"));
    assert!(xml.contains("</LIST>\n"));
}

#[test]
fn nested_descriptor_item() {
    let mut data = Vec::new();
    class_header(&mut data, b"outr", 1);
    item_header(&mut data, b"chld", b"Objc");
    class_header(&mut data, b"innr", 1);
    item_header(&mut data, b"leaf", b"long");
    u32be(&mut data, 9);

    let (xml, consumed) = decode(&data);
    assert_eq!(consumed, data.len());
    assert!(xml.contains("<DESCRIPTOR>\n"));
    assert!(xml.contains("\t<CLASS> <ID>innr</ID> </CLASS>\n"));
    assert!(xml.contains("\t<!--count:1-->\n"));
    assert!(xml.contains("\t<INTEGER> <INTEGER>9</INTEGER> </INTEGER>\n"));
}

#[test]
fn unit_float_renders_like_double() {
    for (unit, tag) in [
        (b"#Ang", "ANGLE"),
        (b"#Rsl", "DENSITY"),
        (b"#Rlt", "DISTANCE"),
        (b"#Nne", "NONE"),
        (b"#Prc", "PERCENT"),
        (b"#Pxl", "PIXELS"),
    ] {
        let mut data = Vec::new();
        class_header(&mut data, b"clss", 1);
        item_header(&mut data, b"valu", b"UntF");
        data.extend_from_slice(unit);
        data.extend_from_slice(&72.5f64.to_be_bytes());

        let (xml, consumed) = decode(&data);
        assert_eq!(consumed, data.len());
        assert!(
            xml.contains(&format!("<UNITFLOAT> <{tag}>72.5</{tag}> </UNITFLOAT>")),
            "unit {}: {xml}",
            String::from_utf8_lossy(unit)
        );
    }
}

#[test]
fn enumerated_item() {
    let mut data = Vec::new();
    class_header(&mut data, b"clss", 1);
    item_header(&mut data, b"Md  ", b"enum");
    u32be(&mut data, 0);
    data.extend_from_slice(b"BlnM");
    u32be(&mut data, 0);
    data.extend_from_slice(b"Nrml");

    let (xml, consumed) = decode(&data);
    assert_eq!(consumed, data.len());
    assert!(xml.contains("<ENUMERATED>\n"));
    assert!(xml.contains("\t<TYPE> <ID>BlnM</ID> </TYPE>\n"));
    assert!(xml.contains("\t<ENUM> <ID>Nrml</ID> </ENUM>\n"));
}

#[test]
fn boolean_preserves_raw_byte() {
    for (byte, rendered) in [(0u8, "0"), (1, "1"), (0xff, "255")] {
        let mut data = Vec::new();
        class_header(&mut data, b"clss", 1);
        item_header(&mut data, b"flag", b"bool");
        data.push(byte);

        let (xml, consumed) = decode(&data);
        assert_eq!(consumed, data.len());
        assert!(xml.contains(&format!("<BOOLEAN>{rendered}</BOOLEAN>")));
    }
}

#[test]
fn alias_skips_payload_by_length() {
    let mut data = Vec::new();
    class_header(&mut data, b"clss", 2);
    item_header(&mut data, b"fref", b"alis");
    u32be(&mut data, 8);
    data.extend_from_slice(&[0xab; 8]);
    item_header(&mut data, b"next", b"long");
    u32be(&mut data, 1);

    let (xml, consumed) = decode(&data);
    assert_eq!(consumed, data.len());
    assert!(xml.contains("<ALIAS> <!-- 8 bytes alias data --> </ALIAS>"));
    assert!(xml.contains("<INTEGER>1</INTEGER>"));
}

#[test]
fn engine_data_copied_into_cdata() {
    let payload = b"<< /EngineDict << >> >>";
    let mut data = Vec::new();
    class_header(&mut data, b"clss", 1);
    item_header(&mut data, b"Txt ", b"tdta");
    u32be(&mut data, payload.len() as u32);
    data.extend_from_slice(payload);

    let (xml, consumed) = decode(&data);
    assert_eq!(consumed, data.len());
    assert!(xml.contains("<ENGINEDATA>\n"));
    assert!(xml.contains("<![CDATA[<< /EngineDict << >> >>]]>"));
}

#[test]
fn reference_with_property_and_offset() {
    let mut data = Vec::new();
    class_header(&mut data, b"clss", 1);
    item_header(&mut data, b"null", b"obj ");
    u32be(&mut data, 2);
    // property reference
    data.extend_from_slice(b"prop");
    u32be(&mut data, 0); // class name
    u32be(&mut data, 0);
    data.extend_from_slice(b"Lyr ");
    u32be(&mut data, 0); // property key
    data.extend_from_slice(b"Opct");
    // offset reference
    data.extend_from_slice(b"rele");
    u32be(&mut data, 0);
    u32be(&mut data, 0);
    data.extend_from_slice(b"Lyr ");
    u32be(&mut data, 2);

    let (xml, consumed) = decode(&data);
    assert_eq!(consumed, data.len());
    assert!(xml.contains("<REFERENCE>\n"));
    assert!(xml.contains("<PROPERTY>\n"));
    assert!(xml.contains("<KEY> <ID>Opct</ID> </KEY>"));
    assert!(xml.contains("<OFFSET>"));
    assert!(xml.contains("<INTEGER>2</INTEGER>"));
}

#[test]
fn unknown_type_tag_reports_key_and_offset() {
    let mut data = Vec::new();
    class_header(&mut data, b"clss", 1);
    item_header(&mut data, b"what", b"ZZZZ");
    let tag_end = data.len();
    data.extend_from_slice(&[0u8; 16]);

    let mut out = Vec::new();
    match descriptor_to_xml(&data, &mut out, DecodeOptions::default()) {
        Err(Error::UnknownDescriptorTag { key, offset }) => {
            assert_eq!(key, *b"ZZZZ");
            assert_eq!(offset, tag_end);
        }
        other => panic!("expected UnknownDescriptorTag, got {other:?}"),
    }
}

#[test]
fn truncated_stream_is_out_of_bounds() {
    let mut data = Vec::new();
    class_header(&mut data, b"clss", 1);
    item_header(&mut data, b"valu", b"long");
    data.extend_from_slice(&[0u8; 2]); // integer cut short

    let mut out = Vec::new();
    assert!(matches!(
        descriptor_to_xml(&data, &mut out, DecodeOptions::default()),
        Err(Error::OutOfBounds)
    ));
}

#[test]
fn unicode_text_item() {
    let mut data = Vec::new();
    class_header(&mut data, b"clss", 1);
    item_header(&mut data, b"Nm  ", b"TEXT");
    u32be(&mut data, 3);
    for unit in [0x0041u16, 0x0042, 0x0043] {
        data.extend_from_slice(&unit.to_be_bytes());
    }

    let (xml, consumed) = decode(&data);
    assert_eq!(consumed, data.len());
    assert!(xml.contains("<STRING> <UNICODE>ABC</UNICODE> </STRING>"));
}

#[test]
fn markup_in_strings_is_escaped() {
    let mut data = Vec::new();
    u32be(&mut data, 0);
    u32be(&mut data, 3);
    data.extend_from_slice(b"a<b");
    u32be(&mut data, 0);

    let (xml, consumed) = decode(&data);
    assert_eq!(consumed, data.len());
    assert!(xml.contains("<CLASS> <STRING>a&lt;b</STRING> </CLASS>"));
}

#[test]
fn recursion_limit_stops_unbounded_nesting() {
    let mut data = Vec::new();
    for _ in 0..100 {
        class_header(&mut data, b"nest", 1);
        item_header(&mut data, b"chld", b"Objc");
    }
    class_header(&mut data, b"leaf", 0);

    let mut out = Vec::new();
    let options = DecodeOptions {
        max_depth: 16,
        ..DecodeOptions::default()
    };
    assert!(matches!(
        descriptor_to_xml(&data, &mut out, options),
        Err(Error::RecursionLimit(16))
    ));
}
