//! Attribute value decoding from the value blob
//!
//! Fixed-width types go through [`read_primitive`]; strings, buffers, and
//! translated strings are length-prefixed and handled here.

use super::cursor::ByteCursor;
use super::primitive::read_primitive;
use crate::error::{Error, Result};
use crate::formats::common::{
    AttributeType, AttributeValue, TranslatedFSString, TranslatedFSStringArgument,
    TranslatedString,
};

/// Deepest argument nesting accepted inside a `TranslatedFSString`.
pub const MAX_FS_STRING_DEPTH: usize = 64;

/// Decode one attribute value at the cursor.
///
/// `length` is the byte length from the attribute record; strings and
/// buffers use it, translated strings carry their own length prefixes.
///
/// # Errors
/// Returns [`Error::UnsupportedAttributeType`] for tags without a decoder,
/// [`Error::TruncatedInput`] if the value runs past the blob, and
/// [`Error::InvalidLength`] for negative inner length prefixes, and
/// [`Error::NestingTooDeep`] for translated strings nested past
/// [`MAX_FS_STRING_DEPTH`].
pub fn read_attribute_value(
    attr_type: AttributeType,
    length: usize,
    cursor: &mut ByteCursor<'_>,
) -> Result<AttributeValue> {
    match attr_type {
        t if t.is_string() => AttributeValue::from_string(t, read_string(cursor, length)?),
        AttributeType::TranslatedString => {
            Ok(AttributeValue::TranslatedString(read_translated_string(cursor)?))
        }
        AttributeType::TranslatedFSString => Ok(AttributeValue::TranslatedFSString(
            read_translated_fs_string(cursor, 1)?,
        )),
        AttributeType::ScratchBuffer => Ok(AttributeValue::ScratchBuffer(cursor.read_bytes(length)?)),
        other => read_primitive(other, cursor),
    }
}

/// Read a string whose declared length includes one terminator byte.
///
/// Extra trailing NULs in the payload are dropped. The terminator itself is
/// consumed without checking that it is zero.
pub fn read_string(cursor: &mut ByteCursor<'_>, length: usize) -> Result<String> {
    if length == 0 {
        return Ok(String::new());
    }
    cursor.require(length)?;

    let mut bytes = cursor.read_bytes(length - 1)?;
    while bytes.last() == Some(&0) {
        bytes.pop();
    }
    let _terminator = cursor.read_u8()?;

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn read_length(cursor: &mut ByteCursor<'_>, context: &'static str) -> Result<usize> {
    let length = cursor.read_i32()?;
    usize::try_from(length).map_err(|_| Error::InvalidLength { context, length })
}

fn read_prefixed_string(cursor: &mut ByteCursor<'_>, context: &'static str) -> Result<String> {
    let length = read_length(cursor, context)?;
    read_string(cursor, length)
}

/// BG3 layout: `u16` version, then the handle. No literal value is stored.
fn read_translated_string(cursor: &mut ByteCursor<'_>) -> Result<TranslatedString> {
    let version = cursor.read_u16()?;
    let handle = read_prefixed_string(cursor, "translated string handle")?;
    Ok(TranslatedString {
        version,
        handle,
        value: String::new(),
    })
}

fn read_translated_fs_string(
    cursor: &mut ByteCursor<'_>,
    depth: usize,
) -> Result<TranslatedFSString> {
    if depth > MAX_FS_STRING_DEPTH {
        return Err(Error::NestingTooDeep {
            context: "translated string arguments",
            limit: MAX_FS_STRING_DEPTH,
        });
    }
    let version = cursor.read_u16()?;
    let handle = read_prefixed_string(cursor, "translated string handle")?;

    let arg_count = read_length(cursor, "translated string argument count")?;
    // Each argument needs at least three length prefixes plus a nested header.
    let mut arguments = Vec::with_capacity(arg_count.min(cursor.remaining() / 18));
    for _ in 0..arg_count {
        let key = read_prefixed_string(cursor, "translated string argument key")?;
        let string = read_translated_fs_string(cursor, depth + 1)?;
        let value = read_prefixed_string(cursor, "translated string argument value")?;
        arguments.push(TranslatedFSStringArgument { key, value, string });
    }

    Ok(TranslatedFSString {
        version,
        handle,
        value: String::new(),
        arguments,
    })
}
