//! Attribute types and values shared by the LSF reader and LSX writer
//!
//! SPDX-License-Identifier: MIT

use crate::error::{Error, Result};
use std::fmt::Write as _;

/// Raw type tag as stored in the low 6 bits of an attribute record.
pub type TypeId = u32;

/// The closed set of attribute type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum AttributeType {
    None = 0,
    Byte = 1,
    Short = 2,
    UShort = 3,
    Int = 4,
    UInt = 5,
    Float = 6,
    Double = 7,
    IVec2 = 8,
    IVec3 = 9,
    IVec4 = 10,
    Vec2 = 11,
    Vec3 = 12,
    Vec4 = 13,
    Mat2 = 14,
    Mat3 = 15,
    Mat3x4 = 16,
    Mat4x3 = 17,
    Mat4 = 18,
    Bool = 19,
    String = 20,
    Path = 21,
    FixedString = 22,
    LSString = 23,
    ULongLong = 24,
    ScratchBuffer = 25,
    Long = 26,
    Int8 = 27,
    TranslatedString = 28,
    WString = 29,
    LSWString = 30,
    Uuid = 31,
    Int64 = 32,
    TranslatedFSString = 33,
}

impl AttributeType {
    /// Map a raw tag to its type.
    ///
    /// # Errors
    /// Returns [`Error::UnsupportedAttributeType`] for tags outside 0..=33.
    pub fn from_id(type_id: TypeId) -> Result<Self> {
        Ok(match type_id {
            0 => Self::None,
            1 => Self::Byte,
            2 => Self::Short,
            3 => Self::UShort,
            4 => Self::Int,
            5 => Self::UInt,
            6 => Self::Float,
            7 => Self::Double,
            8 => Self::IVec2,
            9 => Self::IVec3,
            10 => Self::IVec4,
            11 => Self::Vec2,
            12 => Self::Vec3,
            13 => Self::Vec4,
            14 => Self::Mat2,
            15 => Self::Mat3,
            16 => Self::Mat3x4,
            17 => Self::Mat4x3,
            18 => Self::Mat4,
            19 => Self::Bool,
            20 => Self::String,
            21 => Self::Path,
            22 => Self::FixedString,
            23 => Self::LSString,
            24 => Self::ULongLong,
            25 => Self::ScratchBuffer,
            26 => Self::Long,
            27 => Self::Int8,
            28 => Self::TranslatedString,
            29 => Self::WString,
            30 => Self::LSWString,
            31 => Self::Uuid,
            32 => Self::Int64,
            33 => Self::TranslatedFSString,
            other => return Err(Error::UnsupportedAttributeType(other)),
        })
    }

    #[must_use]
    pub fn id(self) -> TypeId {
        self as TypeId
    }

    /// The LSX `type` attribute for this tag.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Byte => "uint8",
            Self::Short => "int16",
            Self::UShort => "uint16",
            Self::Int => "int32",
            Self::UInt => "uint32",
            Self::Float => "float",
            Self::Double => "double",
            Self::IVec2 => "ivec2",
            Self::IVec3 => "ivec3",
            Self::IVec4 => "ivec4",
            Self::Vec2 => "fvec2",
            Self::Vec3 => "fvec3",
            Self::Vec4 => "fvec4",
            Self::Mat2 => "mat2x2",
            Self::Mat3 => "mat3x3",
            Self::Mat3x4 => "mat3x4",
            Self::Mat4x3 => "mat4x3",
            Self::Mat4 => "mat4x4",
            Self::Bool => "bool",
            Self::String => "string",
            Self::Path => "path",
            Self::FixedString => "FixedString",
            Self::LSString => "LSString",
            Self::ULongLong => "uint64",
            Self::ScratchBuffer => "ScratchBuffer",
            Self::Long => "old_int64",
            Self::Int8 => "int8",
            Self::TranslatedString => "TranslatedString",
            Self::WString => "WString",
            Self::LSWString => "LSWString",
            Self::Uuid => "guid",
            Self::Int64 => "int64",
            Self::TranslatedFSString => "TranslatedFSString",
        }
    }

    /// Null-terminated string types read with the blob string convention.
    #[must_use]
    pub fn is_string(self) -> bool {
        matches!(
            self,
            Self::String
                | Self::Path
                | Self::FixedString
                | Self::LSString
                | Self::WString
                | Self::LSWString
        )
    }

    /// Encoded width of fixed-size types; `None` for variable-length ones.
    #[must_use]
    pub fn fixed_width(self) -> Option<usize> {
        match self {
            Self::None => Some(0),
            Self::Byte | Self::Int8 | Self::Bool => Some(1),
            Self::Short | Self::UShort => Some(2),
            Self::Int | Self::UInt | Self::Float => Some(4),
            Self::Double | Self::ULongLong | Self::Long | Self::Int64 => Some(8),
            Self::IVec2 | Self::Vec2 => Some(8),
            Self::IVec3 | Self::Vec3 => Some(12),
            Self::IVec4 | Self::Vec4 | Self::Mat2 | Self::Uuid => Some(16),
            Self::Mat3 => Some(36),
            Self::Mat3x4 | Self::Mat4x3 => Some(48),
            Self::Mat4 => Some(64),
            _ => None,
        }
    }
}

/// A localized string reference.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TranslatedString {
    pub version: u16,
    pub handle: String,
    /// Literal text; empty in BG3 files, which only carry the handle.
    pub value: String,
}

/// A localized format string with nested arguments.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TranslatedFSString {
    pub version: u16,
    pub handle: String,
    pub value: String,
    /// Arguments in source order.
    pub arguments: Vec<TranslatedFSStringArgument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TranslatedFSStringArgument {
    pub key: String,
    pub value: String,
    pub string: TranslatedFSString,
}

/// A decoded attribute value. The variant is the type tag.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    None,
    Byte(u8),
    Short(i16),
    UShort(u16),
    Int(i32),
    UInt(u32),
    Float(f32),
    Double(f64),
    IVec2([i32; 2]),
    IVec3([i32; 3]),
    IVec4([i32; 4]),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    Mat2([f32; 4]),
    Mat3([f32; 9]),
    Mat3x4([f32; 12]),
    Mat4x3([f32; 12]),
    Mat4([f32; 16]),
    Bool(bool),
    String(String),
    Path(String),
    FixedString(String),
    LSString(String),
    ULongLong(u64),
    ScratchBuffer(Vec<u8>),
    Long(i64),
    Int8(i8),
    TranslatedString(TranslatedString),
    WString(String),
    LSWString(String),
    Uuid([u8; 16]),
    Int64(i64),
    TranslatedFSString(TranslatedFSString),
}

impl AttributeValue {
    /// The type tag this value was decoded as.
    #[must_use]
    pub fn attribute_type(&self) -> AttributeType {
        match self {
            Self::None => AttributeType::None,
            Self::Byte(_) => AttributeType::Byte,
            Self::Short(_) => AttributeType::Short,
            Self::UShort(_) => AttributeType::UShort,
            Self::Int(_) => AttributeType::Int,
            Self::UInt(_) => AttributeType::UInt,
            Self::Float(_) => AttributeType::Float,
            Self::Double(_) => AttributeType::Double,
            Self::IVec2(_) => AttributeType::IVec2,
            Self::IVec3(_) => AttributeType::IVec3,
            Self::IVec4(_) => AttributeType::IVec4,
            Self::Vec2(_) => AttributeType::Vec2,
            Self::Vec3(_) => AttributeType::Vec3,
            Self::Vec4(_) => AttributeType::Vec4,
            Self::Mat2(_) => AttributeType::Mat2,
            Self::Mat3(_) => AttributeType::Mat3,
            Self::Mat3x4(_) => AttributeType::Mat3x4,
            Self::Mat4x3(_) => AttributeType::Mat4x3,
            Self::Mat4(_) => AttributeType::Mat4,
            Self::Bool(_) => AttributeType::Bool,
            Self::String(_) => AttributeType::String,
            Self::Path(_) => AttributeType::Path,
            Self::FixedString(_) => AttributeType::FixedString,
            Self::LSString(_) => AttributeType::LSString,
            Self::ULongLong(_) => AttributeType::ULongLong,
            Self::ScratchBuffer(_) => AttributeType::ScratchBuffer,
            Self::Long(_) => AttributeType::Long,
            Self::Int8(_) => AttributeType::Int8,
            Self::TranslatedString(_) => AttributeType::TranslatedString,
            Self::WString(_) => AttributeType::WString,
            Self::LSWString(_) => AttributeType::LSWString,
            Self::Uuid(_) => AttributeType::Uuid,
            Self::Int64(_) => AttributeType::Int64,
            Self::TranslatedFSString(_) => AttributeType::TranslatedFSString,
        }
    }

    /// Wrap a decoded string in the variant for `attr_type`.
    ///
    /// # Errors
    /// Returns [`Error::UnsupportedAttributeType`] if `attr_type` is not a string type.
    pub fn from_string(attr_type: AttributeType, value: String) -> Result<Self> {
        Ok(match attr_type {
            AttributeType::String => Self::String(value),
            AttributeType::Path => Self::Path(value),
            AttributeType::FixedString => Self::FixedString(value),
            AttributeType::LSString => Self::LSString(value),
            AttributeType::WString => Self::WString(value),
            AttributeType::LSWString => Self::LSWString(value),
            other => return Err(Error::UnsupportedAttributeType(other.id())),
        })
    }

    /// Textual form used both for the LSX `value` attribute and for content hashing.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::None => String::new(),
            Self::Byte(v) => v.to_string(),
            Self::Short(v) => v.to_string(),
            Self::UShort(v) => v.to_string(),
            Self::Int(v) => v.to_string(),
            Self::UInt(v) => v.to_string(),
            Self::Float(v) => format_float(&format!("{v:e}")),
            Self::Double(v) => format_float(&format!("{v:e}")),
            Self::IVec2(v) => join_values(v),
            Self::IVec3(v) => join_values(v),
            Self::IVec4(v) => join_values(v),
            Self::Vec2(v) => join_floats(v),
            Self::Vec3(v) => join_floats(v),
            Self::Vec4(v) => join_floats(v),
            Self::Mat2(v) => join_floats(v),
            Self::Mat3(v) => join_floats(v),
            Self::Mat3x4(v) | Self::Mat4x3(v) => join_floats(v),
            Self::Mat4(v) => join_floats(v),
            Self::Bool(v) => if *v { "True" } else { "False" }.to_string(),
            Self::String(s)
            | Self::Path(s)
            | Self::FixedString(s)
            | Self::LSString(s)
            | Self::WString(s)
            | Self::LSWString(s) => s.clone(),
            Self::ULongLong(v) => v.to_string(),
            Self::ScratchBuffer(bytes) => hex::encode(bytes),
            Self::Long(v) | Self::Int64(v) => v.to_string(),
            Self::Int8(v) => v.to_string(),
            Self::TranslatedString(ts) => format!("{};{};{}", ts.handle, ts.version, ts.value),
            Self::Uuid(bytes) => format_uuid(bytes),
            Self::TranslatedFSString(fs) => fs_string_text(fs),
        }
    }
}

fn join_values<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

fn join_floats(values: &[f32]) -> String {
    values
        .iter()
        .map(|v| format_float(&format!("{v:e}")))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render the shortest round-trip digits of a float in `%g` style.
///
/// `scientific` is the `{:e}` form of the value. Exponents below -4 or from 6
/// up keep the exponent form with a signed, two-digit minimum exponent; the
/// rest are written positionally. Infinities carry an explicit sign.
fn format_float(scientific: &str) -> String {
    match scientific {
        "NaN" => return "NaN".to_string(),
        "inf" => return "+Inf".to_string(),
        "-inf" => return "-Inf".to_string(),
        _ => {}
    }
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific.to_string();
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return scientific.to_string();
    };
    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };

    if !(-4..6).contains(&exponent) {
        let exp_sign = if exponent < 0 { '-' } else { '+' };
        return format!("{sign}{mantissa}e{exp_sign}{:02}", exponent.unsigned_abs());
    }

    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    if exponent < 0 {
        let zeros = "0".repeat(exponent.unsigned_abs() as usize - 1);
        return format!("{sign}0.{zeros}{digits}");
    }
    let point = exponent as usize + 1;
    if digits.len() <= point {
        format!("{sign}{digits}{}", "0".repeat(point - digits.len()))
    } else {
        format!("{sign}{}.{}", &digits[..point], &digits[point..])
    }
}

fn fs_string_text(fs: &TranslatedFSString) -> String {
    let mut text = format!("{};{};{}", fs.handle, fs.version, fs.value);
    for arg in &fs.arguments {
        let _ = write!(text, "[{}={}:{}]", arg.key, arg.value, fs_string_text(&arg.string));
    }
    text
}

/// Format a GUID with the Windows byte order used by Larian files.
///
/// The first three groups are stored little-endian and the fourth group has
/// its two bytes swapped; the last six bytes are printed as stored.
#[must_use]
pub fn format_uuid(bytes: &[u8; 16]) -> String {
    format!(
        "{:02x}{:02x}{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
        bytes[3], bytes[2], bytes[1], bytes[0],
        bytes[5], bytes[4],
        bytes[7], bytes[6],
        bytes[9], bytes[8],
        bytes[10], bytes[11], bytes[12], bytes[13], bytes[14], bytes[15]
    )
}
