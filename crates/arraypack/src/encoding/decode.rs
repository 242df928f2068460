//! Buffer preflight and the dynamic-mode decoder.
//!
//! Dynamic mode reconstructs a value whose class and shape come entirely
//! from the buffer. The preflight and tag parser here are shared with the
//! template decoder and the skip walker.

use tracing::trace;

use crate::error::CodecError;
use crate::encoding::reader::Reader;
use crate::encoding::tag::{
    unpack_tag, ClassId, SizeFormat, DEFAULT_SIGNATURE, FORMAT_VERSION, MAX_SIGNATURE,
};
use crate::encoding::writer::Endianness;
use crate::types::{
    BoolArray, CellArray, CharArray, CharData, ComplexArray, NumericArray, NumericData, Shape,
    SparseArray, SparseData, StructArray, Value, MAX_FIELD_NAME_LEN,
};

/// Decodes a buffer produced with the default signature.
///
/// # Errors
///
/// Returns an error from the taxonomy in [`CodecError`] when the buffer is
/// malformed; see [`decode_with`].
///
/// # Example
///
/// ```
/// use arraypack::{decode, encode, Value};
///
/// let value: Value = 2.5f64.into();
/// let bytes = encode(&value).unwrap();
/// assert_eq!(decode(&bytes).unwrap(), value);
/// ```
pub fn decode(bytes: &[u8]) -> Result<Value, CodecError> {
    decode_with(bytes, DEFAULT_SIGNATURE)
}

/// Decodes a buffer, checking it against an explicit application signature.
///
/// The byte order is detected from the signature word, so buffers from
/// either endianness decode on any host.
///
/// # Errors
///
/// Returns [`CodecError::InvalidBuf`] for an empty or misaligned buffer,
/// [`CodecError::InvalidPad`] for malformed padding,
/// [`CodecError::InvalidSig`] for a signature mismatch, and the structural
/// errors of the taxonomy for a corrupt value region.
pub fn decode_with(bytes: &[u8], signature: u8) -> Result<Value, CodecError> {
    let mut r = preflight(bytes, signature)?;
    let value = decode_value(&mut r)?;
    if !r.at_end() {
        return Err(CodecError::CorruptBuf);
    }
    Ok(value)
}

/// Validates the framing of a buffer and returns a reader positioned at the
/// start of the value region.
pub(crate) fn preflight(bytes: &[u8], signature: u8) -> Result<Reader<'_>, CodecError> {
    if signature > MAX_SIGNATURE {
        return Err(CodecError::InvalidSig);
    }
    if bytes.is_empty() || bytes.len() % 4 != 0 {
        return Err(CodecError::InvalidBuf);
    }

    let marker = bytes[bytes.len() - 1];
    let pad = usize::from(!marker);
    if !(1..=4).contains(&pad) {
        return Err(CodecError::InvalidPad);
    }
    if bytes[bytes.len() - pad..].iter().any(|&b| b != marker) {
        return Err(CodecError::InvalidPad);
    }
    let end = bytes.len() - pad;
    if end < 2 {
        return Err(CodecError::InvalidBuf);
    }

    // Whichever signature byte equals the version constant is the high
    // byte, which fixes the buffer's byte order.
    let order = if bytes[0] == signature && bytes[1] == FORMAT_VERSION {
        Endianness::Little
    } else if bytes[0] == FORMAT_VERSION && bytes[1] == signature {
        Endianness::Big
    } else {
        return Err(CodecError::InvalidSig);
    };

    trace!(len = bytes.len(), pad, ?order, "buffer preflight passed");
    Ok(Reader::new(bytes, 2, end, order))
}

/// Reads a tag byte and reconstructs the shape its size format describes.
pub(crate) fn read_tag(r: &mut Reader<'_>) -> Result<(ClassId, Shape), CodecError> {
    let (class, fmt) = unpack_tag(r.read_u8()?)?;
    let shape = match fmt {
        SizeFormat::Scalar => Shape::scalar(),
        SizeFormat::Empty => Shape::empty(),
        SizeFormat::Column => {
            let m = r.read_u8()?;
            Shape::matrix(u32::from(m), 1)?
        }
        SizeFormat::Row => {
            let n = r.read_u8()?;
            Shape::matrix(1, u32::from(n))?
        }
        SizeFormat::Matrix => {
            let m = r.read_u8()?;
            let n = r.read_u8()?;
            Shape::matrix(u32::from(m), u32::from(n))?
        }
        SizeFormat::Dims8 | SizeFormat::Dims16 | SizeFormat::Dims32 => {
            let ndims = r.read_u8()?;
            if ndims < 2 {
                return Err(CodecError::CorruptBuf);
            }
            let mut dims = Vec::with_capacity(usize::from(ndims));
            for _ in 0..ndims {
                dims.push(match fmt {
                    SizeFormat::Dims8 => u32::from(r.read_u8()?),
                    SizeFormat::Dims16 => u32::from(r.read_u16()?),
                    _ => r.read_u32()?,
                });
            }
            Shape::from_dims(dims)?
        }
    };
    Ok((class, shape))
}

/// Decodes one value, advancing the reader past it.
pub(crate) fn decode_value(r: &mut Reader<'_>) -> Result<Value, CodecError> {
    let (class, shape) = read_tag(r)?;
    decode_body(r, class, shape)
}

fn decode_body(r: &mut Reader<'_>, class: ClassId, shape: Shape) -> Result<Value, CodecError> {
    let numel = usize::try_from(shape.numel()).map_err(|_| CodecError::NumelLimit)?;
    match class {
        c if c.is_numeric() => {
            let data = read_numeric_data(r, c, numel)?;
            Ok(Value::Numeric(NumericArray::new(shape, data)?))
        }
        ClassId::Bool => {
            let data = r.take(numel)?.iter().map(|&b| b != 0).collect();
            Ok(Value::Bool(BoolArray::new(shape, data)?))
        }
        ClassId::Char8 => {
            let data = CharData::Latin(r.take(numel)?.to_vec());
            Ok(Value::Char(CharArray::new(shape, data)?))
        }
        ClassId::Char16 => {
            let mut units = Vec::with_capacity(numel.min(r.remaining() / 2));
            for _ in 0..numel {
                units.push(r.read_u16()?);
            }
            Ok(Value::Char(CharArray::new(shape, CharData::Wide(units))?))
        }
        ClassId::Cell => {
            // Each child costs at least a tag byte, which bounds the
            // up-front allocation for hostile element counts.
            let mut elems = Vec::with_capacity(numel.min(r.remaining()));
            for _ in 0..numel {
                elems.push(decode_value(r)?);
            }
            Ok(Value::Cell(CellArray::new(shape, elems)?))
        }
        ClassId::Struct => decode_struct(r, shape),
        ClassId::Sparse => decode_sparse(r, shape),
        ClassId::Complex => {
            let (inner, _) = unpack_tag(r.read_u8()?)?;
            if !inner.is_numeric() {
                return Err(CodecError::CorruptBuf);
            }
            let real = read_numeric_data(r, inner, numel)?;
            let imag = read_numeric_data(r, inner, numel)?;
            Ok(Value::Complex(ComplexArray::new(shape, real, imag)?))
        }
        _ => Err(CodecError::UnsupportedClass),
    }
}

pub(crate) fn read_numeric_data(
    r: &mut Reader<'_>,
    class: ClassId,
    numel: usize,
) -> Result<NumericData, CodecError> {
    Ok(match class {
        ClassId::Float64 => {
            let mut v = Vec::with_capacity(numel.min(r.remaining() / 8));
            for _ in 0..numel {
                v.push(r.read_f64()?);
            }
            NumericData::F64(v)
        }
        ClassId::Float32 => {
            let mut v = Vec::with_capacity(numel.min(r.remaining() / 4));
            for _ in 0..numel {
                v.push(r.read_f32()?);
            }
            NumericData::F32(v)
        }
        ClassId::Int8 => NumericData::I8(r.take(numel)?.iter().map(|&b| b as i8).collect()),
        ClassId::Uint8 => NumericData::U8(r.take(numel)?.to_vec()),
        ClassId::Int16 => {
            let mut v = Vec::with_capacity(numel.min(r.remaining() / 2));
            for _ in 0..numel {
                v.push(r.read_u16()? as i16);
            }
            NumericData::I16(v)
        }
        ClassId::Uint16 => {
            let mut v = Vec::with_capacity(numel.min(r.remaining() / 2));
            for _ in 0..numel {
                v.push(r.read_u16()?);
            }
            NumericData::U16(v)
        }
        ClassId::Int32 => {
            let mut v = Vec::with_capacity(numel.min(r.remaining() / 4));
            for _ in 0..numel {
                v.push(r.read_u32()? as i32);
            }
            NumericData::I32(v)
        }
        ClassId::Uint32 => {
            let mut v = Vec::with_capacity(numel.min(r.remaining() / 4));
            for _ in 0..numel {
                v.push(r.read_u32()?);
            }
            NumericData::U32(v)
        }
        ClassId::Int64 => {
            let mut v = Vec::with_capacity(numel.min(r.remaining() / 8));
            for _ in 0..numel {
                v.push(r.read_u64()? as i64);
            }
            NumericData::I64(v)
        }
        ClassId::Uint64 => {
            let mut v = Vec::with_capacity(numel.min(r.remaining() / 8));
            for _ in 0..numel {
                v.push(r.read_u64()?);
            }
            NumericData::U64(v)
        }
        _ => return Err(CodecError::CorruptBuf),
    })
}

/// Decodes the field-name cell of a record and returns the names.
pub(crate) fn decode_field_names(r: &mut Reader<'_>) -> Result<Vec<String>, CodecError> {
    let Value::Cell(names_cell) = decode_value(r)? else {
        return Err(CodecError::CorruptBuf);
    };
    let mut names = Vec::with_capacity(names_cell.elems().len());
    for elem in names_cell.elems() {
        let Value::Char(chars) = elem else {
            return Err(CodecError::CorruptBuf);
        };
        let CharData::Latin(bytes) = chars.data() else {
            return Err(CodecError::CorruptBuf);
        };
        if bytes.is_empty() || bytes.len() > MAX_FIELD_NAME_LEN {
            return Err(CodecError::InvalidStruct);
        }
        names.push(bytes.iter().map(|&b| char::from(b)).collect());
    }
    Ok(names)
}

fn decode_struct(r: &mut Reader<'_>, shape: Shape) -> Result<Value, CodecError> {
    let numel = shape.numel();
    let names = decode_field_names(r)?;
    let mut record = StructArray::new(shape);
    for name in names {
        let count = usize::try_from(numel).map_err(|_| CodecError::NumelLimit)?;
        let mut values = Vec::with_capacity(count.min(r.remaining()));
        for _ in 0..count {
            values.push(decode_value(r)?);
        }
        record = record.with_field(name, values)?;
    }
    Ok(Value::Struct(record))
}

fn decode_sparse(r: &mut Reader<'_>, shape: Shape) -> Result<Value, CodecError> {
    let indices = match decode_value(r)? {
        Value::Numeric(a) => match a.data() {
            NumericData::U8(v) => v.iter().map(|&i| u64::from(i)).collect::<Vec<_>>(),
            NumericData::U16(v) => v.iter().map(|&i| u64::from(i)).collect(),
            NumericData::U32(v) => v.iter().map(|&i| u64::from(i)).collect(),
            _ => return Err(CodecError::CorruptBuf),
        },
        _ => return Err(CodecError::CorruptBuf),
    };

    let data = match decode_value(r)? {
        Value::Numeric(a) => match a.data() {
            NumericData::F64(v) => SparseData::Real(v.clone()),
            _ => return Err(CodecError::CorruptBuf),
        },
        Value::Bool(a) => SparseData::Bool(a.data().to_vec()),
        Value::Complex(a) => match (a.real(), a.imag()) {
            (NumericData::F64(re), NumericData::F64(im)) => {
                SparseData::Complex { re: re.clone(), im: im.clone() }
            }
            _ => return Err(CodecError::CorruptBuf),
        },
        _ => return Err(CodecError::CorruptBuf),
    };

    SparseArray::new(shape, indices, data)
        .map(Value::Sparse)
        .map_err(|_| CodecError::CorruptBuf)
}
