//! LSX file writing
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`, 2015 Norbyte (`LSLib`, MIT)
//!
//! SPDX-License-Identifier: MIT

use super::document::{LsxAttribute, LsxDocument, LsxNode};
use crate::error::Result;
use crate::formats::common::{AttributeValue, TranslatedFSString, TranslatedFSStringArgument};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use std::io::Write;

/// Serialize LSX document to XML string
///
/// # Errors
/// Returns an error if XML serialization fails.
pub fn serialize_lsx(doc: &LsxDocument) -> Result<String> {
    let mut output = Vec::new();
    let mut writer = Writer::new_with_indent(&mut output, b'\t', 1);

    // XML declaration
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    // <save>
    writer.write_event(Event::Start(BytesStart::new("save")))?;

    // <version>
    let mut version = BytesStart::new("version");
    version.push_attribute(("major", doc.major.to_string().as_str()));
    version.push_attribute(("minor", doc.minor.to_string().as_str()));
    version.push_attribute(("revision", doc.revision.to_string().as_str()));
    version.push_attribute(("build", doc.build.to_string().as_str()));
    writer.write_event(Event::Empty(version))?;

    for region in &doc.regions {
        let mut region_start = BytesStart::new("region");
        region_start.push_attribute(("id", region.id.as_str()));
        writer.write_event(Event::Start(region_start))?;

        write_node(&mut writer, &region.node)?;

        writer.write_event(Event::End(BytesEnd::new("region")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("save")))?;

    let mut xml = String::from_utf8(output)?;
    // Fix spacing before self-closing tags
    xml = xml.replace("/>", " />");
    // Add trailing newline
    xml.push('\n');
    Ok(xml)
}

fn write_node<W: Write>(writer: &mut Writer<W>, node: &LsxNode) -> Result<()> {
    let mut node_start = BytesStart::new("node");
    node_start.push_attribute(("id", node.id.as_str()));
    if let Some(key) = &node.key {
        node_start.push_attribute(("key", key.as_str()));
    }

    if node.attributes.is_empty() && node.children.is_empty() {
        writer.write_event(Event::Empty(node_start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(node_start))?;

    for attr in &node.attributes {
        write_attribute(writer, attr)?;
    }

    if !node.children.is_empty() {
        writer.write_event(Event::Start(BytesStart::new("children")))?;
        for child in &node.children {
            write_node(writer, child)?;
        }
        writer.write_event(Event::End(BytesEnd::new("children")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("node")))?;
    Ok(())
}

fn write_attribute<W: Write>(writer: &mut Writer<W>, attr: &LsxAttribute) -> Result<()> {
    let mut attr_start = BytesStart::new("attribute");
    attr_start.push_attribute(("id", attr.id.as_str()));
    attr_start.push_attribute(("type", attr.type_name()));

    match &attr.value {
        // TranslatedString has special format: handle and version instead of value
        AttributeValue::TranslatedString(ts) => {
            if !ts.handle.is_empty() {
                attr_start.push_attribute(("handle", ts.handle.as_str()));
            }
            if ts.value.is_empty() {
                attr_start.push_attribute(("version", ts.version.to_string().as_str()));
            } else {
                attr_start.push_attribute(("value", ts.value.as_str()));
            }
        }
        AttributeValue::TranslatedFSString(fs) => {
            push_fs_string_attributes(&mut attr_start, fs);
            if !fs.arguments.is_empty() {
                writer.write_event(Event::Start(attr_start))?;
                write_arguments(writer, &fs.arguments)?;
                writer.write_event(Event::End(BytesEnd::new("attribute")))?;
                return Ok(());
            }
        }
        value => {
            // Remove bogus 0x1F characters
            let text: String = value.to_text().chars().filter(|&c| c != '\u{1F}').collect();
            attr_start.push_attribute(("value", text.as_str()));
        }
    }

    writer.write_event(Event::Empty(attr_start))?;
    Ok(())
}

fn push_fs_string_attributes(start: &mut BytesStart<'_>, fs: &TranslatedFSString) {
    start.push_attribute(("value", fs.value.as_str()));
    start.push_attribute(("handle", fs.handle.as_str()));
    start.push_attribute(("arguments", fs.arguments.len().to_string().as_str()));
}

fn write_arguments<W: Write>(
    writer: &mut Writer<W>,
    arguments: &[TranslatedFSStringArgument],
) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("arguments")))?;

    for arg in arguments {
        let mut arg_start = BytesStart::new("argument");
        arg_start.push_attribute(("key", arg.key.as_str()));
        arg_start.push_attribute(("value", arg.value.as_str()));
        writer.write_event(Event::Start(arg_start))?;

        let mut string_start = BytesStart::new("string");
        push_fs_string_attributes(&mut string_start, &arg.string);
        if arg.string.arguments.is_empty() {
            writer.write_event(Event::Empty(string_start))?;
        } else {
            writer.write_event(Event::Start(string_start))?;
            write_arguments(writer, &arg.string.arguments)?;
            writer.write_event(Event::End(BytesEnd::new("string")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("argument")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("arguments")))?;
    Ok(())
}
