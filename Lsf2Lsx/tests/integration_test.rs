use byteorder::{LittleEndian, WriteBytesExt};
use lsf2lsx::converter::{convert_lsf_to_lsx, convert_lsf_to_writer, lsf_bytes_to_lsx};
use lsf2lsx::formats::lsf;
use lsf2lsx::prelude::*;
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::tempdir;

const ENGINE_4_7_1_42: u64 = (4 << 55) | (7 << 47) | (1 << 31) | 42;

/// In-memory LSF writer for building test inputs.
struct LsfBuilder {
    version: u32,
    engine_version: u64,
    method: u8,
    buckets: Vec<Vec<String>>,
    nodes: Vec<(u32, i32, i32)>,
    attributes: Vec<(u32, u32, i32, u32)>,
    values: Vec<u8>,
    keys: Vec<(u32, u32)>,
}

impl LsfBuilder {
    fn new(method: u8) -> Self {
        LsfBuilder {
            version: 7,
            engine_version: ENGINE_4_7_1_42,
            method,
            buckets: vec![Vec::new(), Vec::new(), Vec::new()],
            nodes: Vec::new(),
            attributes: Vec::new(),
            values: Vec::new(),
            keys: Vec::new(),
        }
    }

    fn name(&mut self, s: &str) -> u32 {
        for (bucket, list) in self.buckets.iter().enumerate() {
            if let Some(offset) = list.iter().position(|n| n == s) {
                return ((bucket as u32) << 16) | offset as u32;
            }
        }
        let bucket = s.len() % self.buckets.len();
        self.buckets[bucket].push(s.to_string());
        ((bucket as u32) << 16) | (self.buckets[bucket].len() as u32 - 1)
    }

    fn node(&mut self, name: &str, parent: i32) -> i32 {
        let name = self.name(name);
        self.nodes.push((name, parent, -1));
        self.nodes.len() as i32 - 1
    }

    fn key(&mut self, node: i32, key: &str) {
        let key = self.name(key);
        self.keys.push((node as u32, key));
    }

    /// Add a raw attribute value. New attributes are linked at the head of
    /// the node's chain.
    fn attr(&mut self, node: i32, name: &str, type_id: u32, value: &[u8]) {
        let name = self.name(name);
        let offset = self.values.len() as u32;
        self.values.extend_from_slice(value);

        let entry = &mut self.nodes[node as usize];
        let next = entry.2;
        entry.2 = self.attributes.len() as i32;
        self.attributes
            .push((name, ((value.len() as u32) << 6) | type_id, next, offset));
    }

    fn attr_int(&mut self, node: i32, name: &str, value: i32) {
        self.attr(node, name, 4, &value.to_le_bytes());
    }

    fn attr_string(&mut self, node: i32, name: &str, type_id: u32, value: &str) {
        let mut bytes = value.as_bytes().to_vec();
        bytes.push(0);
        self.attr(node, name, type_id, &bytes);
    }

    fn attr_translated(&mut self, node: i32, name: &str, version: u16, handle: &str) {
        let mut bytes = Vec::new();
        bytes.write_u16::<LittleEndian>(version).unwrap();
        write_prefixed(&mut bytes, handle);
        self.attr(node, name, 28, &bytes);
    }

    fn build(&self) -> Vec<u8> {
        let mut names = Vec::new();
        names.write_u32::<LittleEndian>(self.buckets.len() as u32).unwrap();
        for bucket in &self.buckets {
            names.write_u16::<LittleEndian>(bucket.len() as u16).unwrap();
            for s in bucket {
                names.write_u16::<LittleEndian>(s.len() as u16).unwrap();
                names.extend_from_slice(s.as_bytes());
            }
        }

        let mut nodes = Vec::new();
        for &(name, parent, first_attr) in &self.nodes {
            nodes.write_u32::<LittleEndian>(name).unwrap();
            nodes.write_i32::<LittleEndian>(parent).unwrap();
            nodes.write_i32::<LittleEndian>(-1).unwrap();
            nodes.write_i32::<LittleEndian>(first_attr).unwrap();
        }

        let mut attributes = Vec::new();
        for &(name, type_and_length, next, offset) in &self.attributes {
            attributes.write_u32::<LittleEndian>(name).unwrap();
            attributes.write_u32::<LittleEndian>(type_and_length).unwrap();
            attributes.write_i32::<LittleEndian>(next).unwrap();
            attributes.write_u32::<LittleEndian>(offset).unwrap();
        }

        let mut keys = Vec::new();
        for &(node, name) in &self.keys {
            keys.write_u32::<LittleEndian>(node).unwrap();
            keys.write_u32::<LittleEndian>(name).unwrap();
        }

        let sections = [
            (self.compress(&names, false), names.len()),
            (self.compress(&nodes, true), nodes.len()),
            (self.compress(&attributes, true), attributes.len()),
            (self.compress(&self.values, true), self.values.len()),
            (self.compress(&keys, true), keys.len()),
        ];
        let [names_s, nodes_s, attrs_s, values_s, keys_s] = &sections;

        let mut data = Vec::new();
        data.extend_from_slice(b"LSOF");
        data.write_u32::<LittleEndian>(self.version).unwrap();
        data.write_u64::<LittleEndian>(self.engine_version).unwrap();
        for (body, uncompressed) in [names_s, keys_s, nodes_s, attrs_s, values_s] {
            data.write_u32::<LittleEndian>(*uncompressed as u32).unwrap();
            data.write_u32::<LittleEndian>(body.len() as u32).unwrap();
        }
        data.write_u8(0x20 | self.method).unwrap();
        data.write_u8(0).unwrap();
        data.write_u16::<LittleEndian>(0).unwrap();
        data.write_u32::<LittleEndian>(u32::from(!self.keys.is_empty())).unwrap();
        assert_eq!(data.len(), 64);

        for (body, _) in [names_s, nodes_s, attrs_s, values_s, keys_s] {
            data.extend_from_slice(body);
        }
        data
    }

    fn compress(&self, data: &[u8], chunked: bool) -> Vec<u8> {
        if data.is_empty() {
            return Vec::new();
        }
        match self.method {
            0 => data.to_vec(),
            1 => {
                let mut encoder =
                    flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
                encoder.write_all(data).unwrap();
                encoder.finish().unwrap()
            }
            2 if chunked => {
                let mut encoder = lz4_flex::frame::FrameEncoder::new(Vec::new());
                encoder.write_all(data).unwrap();
                encoder.finish().unwrap()
            }
            2 => lz4_flex::block::compress(data),
            3 => zstd::encode_all(data, 3).unwrap(),
            other => panic!("no encoder for method {other}"),
        }
    }
}

fn write_prefixed(out: &mut Vec<u8>, s: &str) {
    out.write_i32::<LittleEndian>(s.len() as i32 + 1).unwrap();
    out.extend_from_slice(s.as_bytes());
    out.push(0);
}

/// Root region with three same-named children, written in the given order.
fn objects_in_order(order: &[&str], method: u8) -> Vec<u8> {
    let mut lsf = LsfBuilder::new(method);
    let root = lsf.node("Root", -1);
    for name in order {
        let obj = lsf.node("Object", root);
        lsf.attr_string(obj, "Name", 22, name);
        lsf.attr_int(obj, "Level", name.len() as i32);
    }
    let config = lsf.node("Config", -1);
    lsf.attr_int(config, "Size", 3);
    lsf.build()
}

#[test]
fn test_root_with_child() {
    let mut lsf = LsfBuilder::new(2);
    let root = lsf.node("Root", -1);
    lsf.node("Child", root);

    let xml = lsf_bytes_to_lsx(&lsf.build()).unwrap();
    let expected = "<?xml version=\"1.0\" encoding=\"utf-8\"?>
<save>
\t<version major=\"4\" minor=\"7\" revision=\"1\" build=\"42\" />
\t<region id=\"Root\">
\t\t<node id=\"Root\">
\t\t\t<children>
\t\t\t\t<node id=\"Child\" />
\t\t\t</children>
\t\t</node>
\t</region>
</save>
";
    assert_eq!(xml, expected);
}

#[test]
fn test_resource_structure() {
    let mut lsf = LsfBuilder::new(1);
    let root = lsf.node("Root", -1);
    let child = lsf.node("Child", root);
    lsf.node("Leaf", child);

    let resource = lsf::parse_lsf_bytes(&lsf.build()).unwrap();
    assert_eq!(resource.version.to_string(), "4.7.1.42");
    assert_eq!(resource.regions.len(), 1);
    assert_eq!(resource.node_count(), 3);

    let mut edges = Vec::new();
    resource.visit(|node, parent| edges.push((parent.map(|p| p.name.clone()), node.name.clone())));
    assert_eq!(
        edges,
        vec![
            (None, "Root".to_string()),
            (Some("Root".to_string()), "Child".to_string()),
            (Some("Child".to_string()), "Leaf".to_string()),
        ]
    );
}

#[test]
fn test_unsupported_version_writes_nothing() {
    let mut lsf = LsfBuilder::new(0);
    lsf.node("Root", -1);
    lsf.version = 3;

    let dir = tempdir().unwrap();
    let source = dir.path().join("old.lsf");
    let dest = dir.path().join("old.lsx");
    std::fs::write(&source, lsf.build()).unwrap();

    let err = convert_lsf_to_lsx(&source, &dest).unwrap_err();
    assert!(matches!(err, Error::UnsupportedVersion { version: 3 }));
    assert!(!dest.exists());
}

#[test]
fn test_bad_magic() {
    let mut data = objects_in_order(&["a"], 0);
    data[..4].copy_from_slice(b"LSFM");
    let err = lsf_bytes_to_lsx(&data).unwrap_err();
    assert!(matches!(err, Error::MalformedMagic { .. }));
}

#[test]
fn test_guid_rendering() {
    let mut lsf = LsfBuilder::new(3);
    let root = lsf.node("Root", -1);
    let bytes: Vec<u8> = (0u8..16).map(|i| i * 0x11).collect();
    lsf.attr(root, "MapKey", 31, &bytes);

    let xml = lsf_bytes_to_lsx(&lsf.build()).unwrap();
    assert!(xml.contains(
        "<attribute id=\"MapKey\" type=\"guid\" value=\"33221100-5544-7766-9988-aabbccddeeff\" />"
    ));
}

#[test]
fn test_same_named_siblings_sorted_by_content() {
    let xml = lsf_bytes_to_lsx(&objects_in_order(&["ccc", "a", "bb"], 2)).unwrap();

    let a = xml.find("value=\"a\"").unwrap();
    let b = xml.find("value=\"bb\"").unwrap();
    let c = xml.find("value=\"ccc\"").unwrap();
    assert!(a < b && b < c, "{xml}");

    // Regions sorted by name
    let config = xml.find("<region id=\"Config\">").unwrap();
    let root = xml.find("<region id=\"Root\">").unwrap();
    assert!(config < root);

    // Attributes sorted by name within a node
    let level = xml.find("id=\"Level\"").unwrap();
    let name = xml.find("id=\"Name\"").unwrap();
    assert!(level < name);
}

#[test]
fn test_output_independent_of_table_order() {
    let first = lsf_bytes_to_lsx(&objects_in_order(&["ccc", "a", "bb"], 1)).unwrap();
    let second = lsf_bytes_to_lsx(&objects_in_order(&["bb", "ccc", "a"], 1)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_conversion_is_deterministic() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("objects.lsf");
    std::fs::write(&source, objects_in_order(&["x", "yy", "z"], 3)).unwrap();

    let first = dir.path().join("first.lsx");
    let second = dir.path().join("second.lsx");
    convert_lsf_to_lsx(&source, &first).unwrap();
    convert_lsf_to_lsx(&source, &second).unwrap();

    let first = std::fs::read(first).unwrap();
    assert_eq!(first, std::fs::read(second).unwrap());

    let mut out = Vec::new();
    convert_lsf_to_writer(&source, &mut out).unwrap();
    assert_eq!(first, out);
}

#[test]
fn test_all_compression_methods_agree() {
    let outputs: Vec<String> = (0..=3)
        .map(|method| lsf_bytes_to_lsx(&objects_in_order(&["a", "bb"], method)).unwrap())
        .collect();
    for output in &outputs[1..] {
        assert_eq!(&outputs[0], output);
    }
}

#[test]
fn test_keys_and_translated_strings() {
    let mut lsf = LsfBuilder::new(2);
    let root = lsf.node("Templates", -1);
    let item = lsf.node("GameObjects", root);
    lsf.attr_string(item, "MapKey", 22, "ItemA");
    lsf.attr_translated(item, "DisplayName", 1, "h0123");
    lsf.key(item, "MapKey");

    let mut fs = Vec::new();
    fs.write_u16::<LittleEndian>(1).unwrap();
    write_prefixed(&mut fs, "outer");
    fs.write_i32::<LittleEndian>(1).unwrap();
    write_prefixed(&mut fs, "Damage");
    fs.write_u16::<LittleEndian>(0).unwrap();
    write_prefixed(&mut fs, "inner");
    fs.write_i32::<LittleEndian>(0).unwrap();
    write_prefixed(&mut fs, "1d6");
    lsf.attr(item, "Description", 33, &fs);

    let xml = lsf_bytes_to_lsx(&lsf.build()).unwrap();
    assert!(xml.contains("<node id=\"GameObjects\" key=\"MapKey\">"), "{xml}");
    assert!(xml.contains(
        "<attribute id=\"DisplayName\" type=\"TranslatedString\" handle=\"h0123\" version=\"1\" />"
    ));
    assert!(xml.contains(
        "<attribute id=\"Description\" type=\"TranslatedFSString\" value=\"\" handle=\"outer\" arguments=\"1\">"
    ));
    assert!(xml.contains("<argument key=\"Damage\" value=\"1d6\">"));
    assert!(xml.contains("<string value=\"\" handle=\"inner\" arguments=\"0\" />"));
}

#[test]
fn test_all_scalar_types_render() {
    let mut lsf = LsfBuilder::new(0);
    let root = lsf.node("Root", -1);
    lsf.attr(root, "U8", 1, &[200]);
    lsf.attr(root, "I8", 27, &[0xFE]);
    lsf.attr(root, "Flag", 19, &[1]);
    lsf.attr(root, "F", 6, &1.5f32.to_le_bytes());
    lsf.attr(root, "U64", 24, &u64::MAX.to_le_bytes());
    lsf.attr(root, "Buf", 25, &[1, 2, 3]);
    let mut vec3 = Vec::new();
    for v in [1.0f32, -2.5, 0.0] {
        vec3.write_f32::<LittleEndian>(v).unwrap();
    }
    lsf.attr(root, "Pos", 12, &vec3);

    let resource = lsf::parse_lsf_bytes(&lsf.build()).unwrap();
    let attrs = &resource.regions["Root"].node.attributes;
    assert_eq!(attrs["I8"], AttributeValue::Int8(-2));
    assert_eq!(attrs["Flag"].attribute_type(), AttributeType::Bool);

    let xml = lsf2lsx::converter::to_lsx(&resource).unwrap();
    for expected in [
        "<attribute id=\"Buf\" type=\"ScratchBuffer\" value=\"010203\" />",
        "<attribute id=\"F\" type=\"float\" value=\"1.5\" />",
        "<attribute id=\"Flag\" type=\"bool\" value=\"True\" />",
        "<attribute id=\"I8\" type=\"int8\" value=\"-2\" />",
        "<attribute id=\"Pos\" type=\"fvec3\" value=\"1 -2.5 0\" />",
        "<attribute id=\"U64\" type=\"uint64\" value=\"18446744073709551615\" />",
        "<attribute id=\"U8\" type=\"uint8\" value=\"200\" />",
    ] {
        assert!(xml.contains(expected), "missing {expected} in {xml}");
    }
}

#[test]
fn test_zero_engine_version_uses_fallback() {
    let mut lsf = LsfBuilder::new(0);
    lsf.node("Root", -1);
    lsf.engine_version = 0;
    let xml = lsf_bytes_to_lsx(&lsf.build()).unwrap();
    assert!(xml.contains("<version major=\"4\" minor=\"0\" revision=\"9\" build=\"0\" />"));
}

#[test]
fn test_declared_size_mismatch() {
    let data = objects_in_order(&["a", "bb"], 3);
    let mut patched = data.clone();
    // nodes section uncompressed size lives at byte 32
    let declared = u32::from_le_bytes(patched[32..36].try_into().unwrap());
    patched[32..36].copy_from_slice(&(declared + 16).to_le_bytes());

    let err = lsf_bytes_to_lsx(&patched).unwrap_err();
    assert!(matches!(
        err,
        Error::DecompressionSizeMismatch {
            section: "nodes",
            ..
        }
    ));
}

#[test]
fn test_truncated_file() {
    let data = objects_in_order(&["a", "bb"], 1);
    let err = lsf_bytes_to_lsx(&data[..data.len() - 5]).unwrap_err();
    assert!(matches!(err, Error::TruncatedInput { .. }));

    let err = lsf_bytes_to_lsx(&data[..20]).unwrap_err();
    assert!(matches!(err, Error::TruncatedInput { context: "header", .. }));
}

#[test]
fn test_dangling_name_reference() {
    let mut lsf = LsfBuilder::new(0);
    lsf.node("Root", -1);
    lsf.nodes[0].0 = 0x0009_0000;
    let err = lsf_bytes_to_lsx(&lsf.build()).unwrap_err();
    assert!(matches!(err, Error::DanglingReference(_)));
}

#[test]
fn test_unknown_attribute_type_fails() {
    let mut lsf = LsfBuilder::new(0);
    let root = lsf.node("Root", -1);
    lsf.attr(root, "Mystery", 50, &[0, 0, 0, 0]);
    let err = lsf_bytes_to_lsx(&lsf.build()).unwrap_err();
    assert!(matches!(err, Error::UnsupportedAttributeType(50)));
}

/// A single region whose nodes each hold the next as their only child.
fn nested_chain(depth: usize) -> Vec<u8> {
    let mut lsf = LsfBuilder::new(2);
    let mut parent = lsf.node("Root", -1);
    for _ in 1..depth {
        parent = lsf.node("Level", parent);
    }
    lsf.attr_int(parent, "Depth", depth as i32);
    lsf.build()
}

#[test]
fn test_deep_nesting_renders_within_limit() {
    let xml = lsf_bytes_to_lsx(&nested_chain(100)).unwrap();
    assert_eq!(xml.matches("<node id=\"Level\"").count(), 99);
    assert!(xml.contains("<attribute id=\"Depth\" type=\"int32\" value=\"100\" />"));
    assert!(xml.ends_with("</save>\n"));
}

#[test]
fn test_deep_parent_chain_is_rejected() {
    let err = lsf_bytes_to_lsx(&nested_chain(lsf::MAX_TREE_DEPTH + 1)).unwrap_err();
    assert!(matches!(err, Error::NestingTooDeep { context: "node tree", .. }));

    let err = lsf_bytes_to_lsx(&nested_chain(20_000)).unwrap_err();
    assert!(matches!(
        err,
        Error::NestingTooDeep {
            limit: lsf::MAX_TREE_DEPTH,
            ..
        }
    ));
}

#[test]
fn test_float_and_buffer_text() {
    let mut lsf = LsfBuilder::new(0);
    let root = lsf.node("Root", -1);
    lsf.attr(root, "Small", 6, &1e-5f32.to_le_bytes());
    lsf.attr(root, "Large", 7, &1e7f64.to_le_bytes());
    lsf.attr(root, "Max", 6, &f32::MAX.to_le_bytes());
    lsf.attr(root, "Inf", 6, &f32::INFINITY.to_le_bytes());

    let xml = lsf_bytes_to_lsx(&lsf.build()).unwrap();
    for expected in [
        "<attribute id=\"Inf\" type=\"float\" value=\"+Inf\" />",
        "<attribute id=\"Large\" type=\"double\" value=\"1e+07\" />",
        "<attribute id=\"Max\" type=\"float\" value=\"3.4028235e+38\" />",
        "<attribute id=\"Small\" type=\"float\" value=\"1e-05\" />",
    ] {
        assert!(xml.contains(expected), "missing {expected} in\n{xml}");
    }
}
