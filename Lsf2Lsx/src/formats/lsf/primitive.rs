//! Fixed-width attribute value decoding

use super::cursor::ByteCursor;
use crate::error::{Error, Result};
use crate::formats::common::{AttributeType, AttributeValue};

fn read_i32s<const N: usize>(cursor: &mut ByteCursor<'_>) -> Result<[i32; N]> {
    let mut values = [0i32; N];
    for value in &mut values {
        *value = cursor.read_i32()?;
    }
    Ok(values)
}

fn read_f32s<const N: usize>(cursor: &mut ByteCursor<'_>) -> Result<[f32; N]> {
    let mut values = [0f32; N];
    for value in &mut values {
        *value = cursor.read_f32()?;
    }
    Ok(values)
}

/// Decode a scalar, vector, matrix, or GUID value and advance by its width.
///
/// Matrices are stored row-major as a flat run of `f32`s.
///
/// # Errors
/// Returns [`Error::UnsupportedAttributeType`] for string, buffer, and
/// translated-string types, which are not fixed-width, and
/// [`Error::TruncatedInput`] if the value runs past the blob.
pub fn read_primitive(attr_type: AttributeType, cursor: &mut ByteCursor<'_>) -> Result<AttributeValue> {
    if let Some(width) = attr_type.fixed_width() {
        cursor.require(width)?;
    }

    Ok(match attr_type {
        AttributeType::None => AttributeValue::None,
        AttributeType::Byte => AttributeValue::Byte(cursor.read_u8()?),
        AttributeType::Int8 => AttributeValue::Int8(cursor.read_i8()?),
        AttributeType::Bool => AttributeValue::Bool(cursor.read_u8()? != 0),
        AttributeType::Short => AttributeValue::Short(cursor.read_i16()?),
        AttributeType::UShort => AttributeValue::UShort(cursor.read_u16()?),
        AttributeType::Int => AttributeValue::Int(cursor.read_i32()?),
        AttributeType::UInt => AttributeValue::UInt(cursor.read_u32()?),
        AttributeType::Float => AttributeValue::Float(cursor.read_f32()?),
        AttributeType::Double => AttributeValue::Double(cursor.read_f64()?),
        AttributeType::ULongLong => AttributeValue::ULongLong(cursor.read_u64()?),
        AttributeType::Long => AttributeValue::Long(cursor.read_i64()?),
        AttributeType::Int64 => AttributeValue::Int64(cursor.read_i64()?),
        AttributeType::IVec2 => AttributeValue::IVec2(read_i32s(cursor)?),
        AttributeType::IVec3 => AttributeValue::IVec3(read_i32s(cursor)?),
        AttributeType::IVec4 => AttributeValue::IVec4(read_i32s(cursor)?),
        AttributeType::Vec2 => AttributeValue::Vec2(read_f32s(cursor)?),
        AttributeType::Vec3 => AttributeValue::Vec3(read_f32s(cursor)?),
        AttributeType::Vec4 => AttributeValue::Vec4(read_f32s(cursor)?),
        AttributeType::Mat2 => AttributeValue::Mat2(read_f32s(cursor)?),
        AttributeType::Mat3 => AttributeValue::Mat3(read_f32s(cursor)?),
        AttributeType::Mat3x4 => AttributeValue::Mat3x4(read_f32s(cursor)?),
        AttributeType::Mat4x3 => AttributeValue::Mat4x3(read_f32s(cursor)?),
        AttributeType::Mat4 => AttributeValue::Mat4(read_f32s(cursor)?),
        AttributeType::Uuid => AttributeValue::Uuid(cursor.read_array::<16>()?),
        other => return Err(Error::UnsupportedAttributeType(other.id())),
    })
}
