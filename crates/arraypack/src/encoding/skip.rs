//! Skip walker: advances past one encoded value without materializing it.
//!
//! Template-mode decoding uses this to tolerate record fields it does not
//! know about. The walker validates structure (tags, nesting, byte counts)
//! but never interprets payload bytes.

use crate::error::CodecError;
use crate::encoding::decode::read_tag;
use crate::encoding::reader::Reader;
use crate::encoding::tag::{unpack_tag, ClassId};

/// What class the next encoded value is required to carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Expect {
    /// Any class.
    Any,
    /// A cell (the field-name table of a record).
    Cell,
    /// An unsigned integer index vector of a sparse array.
    SparseIndex,
    /// The value vector of a sparse array.
    SparseValues,
}

impl Expect {
    fn admits(self, class: ClassId) -> bool {
        match self {
            Self::Any => true,
            Self::Cell => class == ClassId::Cell,
            Self::SparseIndex => {
                matches!(class, ClassId::Uint8 | ClassId::Uint16 | ClassId::Uint32)
            }
            Self::SparseValues => {
                matches!(class, ClassId::Float64 | ClassId::Bool | ClassId::Complex)
            }
        }
    }
}

/// Skips one encoded value, returning its element count.
///
/// # Errors
///
/// Returns [`CodecError::CorruptBuf`] when the value's class falls outside
/// `expect`, when nested classes are inconsistent, or when the payload runs
/// past the buffer end.
pub(crate) fn skip_value(r: &mut Reader<'_>, expect: Expect) -> Result<u64, CodecError> {
    let (class, shape) = read_tag(r)?;
    if !expect.admits(class) {
        return Err(CodecError::CorruptBuf);
    }
    let numel = shape.numel();
    match class {
        ClassId::Cell => {
            for _ in 0..numel {
                skip_value(r, Expect::Any)?;
            }
        }
        ClassId::Struct => {
            let field_count = skip_value(r, Expect::Cell)?;
            for _ in 0..field_count.saturating_mul(numel) {
                skip_value(r, Expect::Any)?;
            }
        }
        ClassId::Sparse => {
            skip_value(r, Expect::SparseIndex)?;
            skip_value(r, Expect::SparseValues)?;
        }
        ClassId::Complex => {
            let (inner, _) = unpack_tag(r.read_u8()?)?;
            let Some(size) = inner.element_size() else {
                return Err(CodecError::CorruptBuf);
            };
            r.skip(numel.saturating_mul(2).saturating_mul(size))?;
        }
        fixed => {
            // Numeric, boolean, and character classes all have a fixed
            // element size.
            let Some(size) = fixed.element_size() else {
                return Err(CodecError::CorruptBuf);
            };
            r.skip(numel.saturating_mul(size))?;
        }
    }
    Ok(numel)
}
