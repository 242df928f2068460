//! Tag bytes and class tables.
//!
//! Every encoded value starts with a tag byte: the low 5 bits carry the
//! class code, the high 3 bits the size format. The tables here are shared
//! by the encoder, both decoders, and the skip walker.

use crate::error::CodecError;
use crate::types::{CharData, NumericData, Value};

/// Wire format version, the high byte of the signature word.
pub const FORMAT_VERSION: u8 = 240;

/// Default application signature, the low byte of the signature word.
pub const DEFAULT_SIGNATURE: u8 = 42;

/// Highest permitted application signature byte. Keeping every signature
/// below [`FORMAT_VERSION`] is what makes byte-order detection unambiguous.
pub const MAX_SIGNATURE: u8 = FORMAT_VERSION - 1;

const CLASS_MASK: u8 = 0x1F;
const FORMAT_SHIFT: u8 = 5;

/// Class codes, the low 5 bits of a tag byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ClassId {
    /// 8-byte IEEE 754 float.
    Float64 = 1,
    /// 4-byte IEEE 754 float.
    Float32 = 2,
    /// 1-byte signed integer.
    Int8 = 3,
    /// 1-byte unsigned integer.
    Uint8 = 4,
    /// 2-byte signed integer.
    Int16 = 5,
    /// 2-byte unsigned integer.
    Uint16 = 6,
    /// 4-byte signed integer.
    Int32 = 7,
    /// 4-byte unsigned integer.
    Uint32 = 8,
    /// 8-byte signed integer.
    Int64 = 9,
    /// 8-byte unsigned integer.
    Uint64 = 10,
    /// 1-byte boolean.
    Bool = 11,
    /// 1-byte character.
    Char8 = 12,
    /// 2-byte character.
    Char16 = 13,
    /// Heterogeneous container; children follow recursively.
    Cell = 14,
    /// Record array; a field-name cell and per-field children follow.
    Struct = 15,
    /// Sparse array; an index vector and a value vector follow.
    Sparse = 16,
    /// Complex numeric array; an inner real-class tag and two element runs
    /// follow.
    Complex = 17,
}

impl ClassId {
    /// The wire code.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Looks up a class by wire code.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Float64),
            2 => Some(Self::Float32),
            3 => Some(Self::Int8),
            4 => Some(Self::Uint8),
            5 => Some(Self::Int16),
            6 => Some(Self::Uint16),
            7 => Some(Self::Int32),
            8 => Some(Self::Uint32),
            9 => Some(Self::Int64),
            10 => Some(Self::Uint64),
            11 => Some(Self::Bool),
            12 => Some(Self::Char8),
            13 => Some(Self::Char16),
            14 => Some(Self::Cell),
            15 => Some(Self::Struct),
            16 => Some(Self::Sparse),
            17 => Some(Self::Complex),
            _ => None,
        }
    }

    /// Bytes per element for the fixed-width classes; `None` for the
    /// recursive classes (cell, struct, sparse, complex).
    #[must_use]
    pub const fn element_size(self) -> Option<u64> {
        match self {
            Self::Int8 | Self::Uint8 | Self::Bool | Self::Char8 => Some(1),
            Self::Int16 | Self::Uint16 | Self::Char16 => Some(2),
            Self::Float32 | Self::Int32 | Self::Uint32 => Some(4),
            Self::Float64 | Self::Int64 | Self::Uint64 => Some(8),
            Self::Cell | Self::Struct | Self::Sparse | Self::Complex => None,
        }
    }

    /// Whether this is one of the ten real numeric classes.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        (self as u8) <= Self::Uint64 as u8
    }
}

/// Size formats, the high 3 bits of a tag byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SizeFormat {
    /// Shape `1x1`; no prefix bytes.
    Scalar = 0,
    /// Column vector `Mx1`, `M < 256`; one prefix byte.
    Column = 1,
    /// Row vector `1xN`, `N < 256`; one prefix byte.
    Row = 2,
    /// Matrix `MxN`, both `< 256`; two prefix bytes.
    Matrix = 3,
    /// Normalized empty `0x0`; no prefix bytes.
    Empty = 4,
    /// General shape, dimensions as `u8`.
    Dims8 = 5,
    /// General shape, dimensions as `u16`.
    Dims16 = 6,
    /// General shape, dimensions as `u32`.
    Dims32 = 7,
}

impl SizeFormat {
    /// Decodes the high tag bits. All eight values are defined, so this
    /// cannot fail.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x07 {
            0 => Self::Scalar,
            1 => Self::Column,
            2 => Self::Row,
            3 => Self::Matrix,
            4 => Self::Empty,
            5 => Self::Dims8,
            6 => Self::Dims16,
            _ => Self::Dims32,
        }
    }
}

/// Packs a class and size format into one tag byte.
#[must_use]
pub(crate) const fn pack_tag(class: ClassId, fmt: SizeFormat) -> u8 {
    ((fmt as u8) << FORMAT_SHIFT) | class.code()
}

/// Splits a tag byte into class and size format.
///
/// # Errors
///
/// Returns [`CodecError::InvalidTag`] for class codes outside the universe.
pub(crate) fn unpack_tag(byte: u8) -> Result<(ClassId, SizeFormat), CodecError> {
    let class = ClassId::from_code(byte & CLASS_MASK).ok_or(CodecError::InvalidTag)?;
    Ok((class, SizeFormat::from_bits(byte >> FORMAT_SHIFT)))
}

impl NumericData {
    /// The wire class of this element width.
    #[must_use]
    pub fn class_id(&self) -> ClassId {
        match self {
            Self::F64(_) => ClassId::Float64,
            Self::F32(_) => ClassId::Float32,
            Self::I8(_) => ClassId::Int8,
            Self::U8(_) => ClassId::Uint8,
            Self::I16(_) => ClassId::Int16,
            Self::U16(_) => ClassId::Uint16,
            Self::I32(_) => ClassId::Int32,
            Self::U32(_) => ClassId::Uint32,
            Self::I64(_) => ClassId::Int64,
            Self::U64(_) => ClassId::Uint64,
        }
    }
}

impl Value {
    /// The wire class this value encodes under.
    ///
    /// Character arrays report the class of their stored width; note that
    /// the encoder narrows wide data to [`ClassId::Char8`] when every code
    /// unit fits a byte.
    #[must_use]
    pub fn class_id(&self) -> ClassId {
        match self {
            Self::Numeric(a) => a.data().class_id(),
            Self::Complex(_) => ClassId::Complex,
            Self::Bool(_) => ClassId::Bool,
            Self::Char(a) => match a.data() {
                CharData::Latin(_) => ClassId::Char8,
                CharData::Wide(_) => ClassId::Char16,
            },
            Self::Cell(_) => ClassId::Cell,
            Self::Struct(_) => ClassId::Struct,
            Self::Sparse(_) => ClassId::Sparse,
        }
    }
}
