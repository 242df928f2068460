//! Encoder: signature word, recursive value encoding, trailing padding.

use crate::error::CodecError;
use crate::encoding::tag::{
    pack_tag, ClassId, SizeFormat, DEFAULT_SIGNATURE, FORMAT_VERSION, MAX_SIGNATURE,
};
use crate::encoding::writer::{ByteOrder, Endianness, Writer};
use crate::types::{
    BoolArray, CharArray, CharData, NumericArray, NumericData, Shape, SparseData, StructArray,
    Value,
};

/// Encodes a value with the default signature and the host byte order.
///
/// # Errors
///
/// Returns [`CodecError::BufLimit`] if the output would exceed the maximum
/// buffer length.
///
/// # Example
///
/// ```
/// use arraypack::{decode, encode, Value};
///
/// let value: Value = 42i32.into();
/// let bytes = encode(&value).unwrap();
/// assert_eq!(bytes.len() % 4, 0);
/// assert_eq!(decode(&bytes).unwrap(), value);
/// ```
pub fn encode(value: &Value) -> Result<Vec<u8>, CodecError> {
    encode_with(value, DEFAULT_SIGNATURE, ByteOrder::Native)
}

/// Encodes a value with an explicit application signature and byte order.
///
/// # Errors
///
/// Returns [`CodecError::InvalidSig`] if `signature` is not below the format
/// version, and [`CodecError::BufLimit`] if the output would exceed the
/// maximum buffer length.
pub fn encode_with(
    value: &Value,
    signature: u8,
    order: ByteOrder,
) -> Result<Vec<u8>, CodecError> {
    if signature > MAX_SIGNATURE {
        return Err(CodecError::InvalidSig);
    }
    let endian = order.resolve();
    let mut w = Writer::new(endian);

    // The signature word (version << 8) | signature, in the chosen order.
    match endian {
        Endianness::Little => {
            w.put_u8(signature)?;
            w.put_u8(FORMAT_VERSION)?;
        }
        Endianness::Big => {
            w.put_u8(FORMAT_VERSION)?;
            w.put_u8(signature)?;
        }
    }

    encode_value(&mut w, value)?;

    // 1..=4 pad bytes, each the complement of the pad count, rounding the
    // buffer up to a whole number of words.
    let pad = 4 - (w.len() % 4);
    let marker = !(pad as u8);
    for _ in 0..pad {
        w.put_u8(marker)?;
    }
    Ok(w.finish())
}

fn encode_value(w: &mut Writer, value: &Value) -> Result<(), CodecError> {
    match value {
        Value::Numeric(a) => {
            write_tag(w, a.data().class_id(), a.shape())?;
            write_numeric(w, a.data())
        }
        Value::Complex(a) => {
            write_tag(w, ClassId::Complex, a.shape())?;
            // Inner tag names the real element class; its format bits are
            // ignored by readers and written as scalar.
            w.put_u8(pack_tag(a.real().class_id(), SizeFormat::Scalar))?;
            write_numeric(w, a.real())?;
            write_numeric(w, a.imag())
        }
        Value::Bool(a) => {
            write_tag(w, ClassId::Bool, a.shape())?;
            for &b in a.data() {
                w.put_u8(u8::from(b))?;
            }
            Ok(())
        }
        Value::Char(a) => encode_char(w, a),
        Value::Cell(a) => {
            write_tag(w, ClassId::Cell, a.shape())?;
            for elem in a.elems() {
                encode_value(w, elem)?;
            }
            Ok(())
        }
        Value::Struct(a) => encode_struct(w, a),
        Value::Sparse(a) => encode_sparse(w, a),
    }
}

/// Writes the tag byte and shape prefix, choosing the most compact size
/// format the shape admits.
fn write_tag(w: &mut Writer, class: ClassId, shape: &Shape) -> Result<(), CodecError> {
    if shape.numel() == 1 {
        return w.put_u8(pack_tag(class, SizeFormat::Scalar));
    }
    if shape.is_normalized_empty() {
        return w.put_u8(pack_tag(class, SizeFormat::Empty));
    }
    if shape.is_matrix() && shape.max_dim() < 256 {
        let (m, n) = (shape.dims()[0], shape.dims()[1]);
        if n == 1 {
            w.put_u8(pack_tag(class, SizeFormat::Column))?;
            return w.put_u8(m as u8);
        }
        if m == 1 {
            w.put_u8(pack_tag(class, SizeFormat::Row))?;
            return w.put_u8(n as u8);
        }
        w.put_u8(pack_tag(class, SizeFormat::Matrix))?;
        w.put_u8(m as u8)?;
        return w.put_u8(n as u8);
    }

    // General form: narrowest dimension width that covers the largest
    // extent. The dimension count always fits one byte (shapes are capped
    // at 255 dimensions).
    let max = shape.max_dim();
    let ndims = shape.ndims() as u8;
    if max <= u32::from(u8::MAX) {
        w.put_u8(pack_tag(class, SizeFormat::Dims8))?;
        w.put_u8(ndims)?;
        for &d in shape.dims() {
            w.put_u8(d as u8)?;
        }
    } else if max <= u32::from(u16::MAX) {
        w.put_u8(pack_tag(class, SizeFormat::Dims16))?;
        w.put_u8(ndims)?;
        for &d in shape.dims() {
            w.put_u16(d as u16)?;
        }
    } else {
        w.put_u8(pack_tag(class, SizeFormat::Dims32))?;
        w.put_u8(ndims)?;
        for &d in shape.dims() {
            w.put_u32(d)?;
        }
    }
    Ok(())
}

fn write_numeric(w: &mut Writer, data: &NumericData) -> Result<(), CodecError> {
    match data {
        NumericData::F64(v) => {
            for &x in v {
                w.put_f64(x)?;
            }
        }
        NumericData::F32(v) => {
            for &x in v {
                w.put_f32(x)?;
            }
        }
        NumericData::I8(v) => {
            for &x in v {
                w.put_u8(x as u8)?;
            }
        }
        NumericData::U8(v) => w.put_bytes(v)?,
        NumericData::I16(v) => {
            for &x in v {
                w.put_u16(x as u16)?;
            }
        }
        NumericData::U16(v) => {
            for &x in v {
                w.put_u16(x)?;
            }
        }
        NumericData::I32(v) => {
            for &x in v {
                w.put_u32(x as u32)?;
            }
        }
        NumericData::U32(v) => {
            for &x in v {
                w.put_u32(x)?;
            }
        }
        NumericData::I64(v) => {
            for &x in v {
                w.put_u64(x as u64)?;
            }
        }
        NumericData::U64(v) => {
            for &x in v {
                w.put_u64(x)?;
            }
        }
    }
    Ok(())
}

fn encode_char(w: &mut Writer, a: &CharArray) -> Result<(), CodecError> {
    match a.data() {
        CharData::Latin(bytes) => {
            write_tag(w, ClassId::Char8, a.shape())?;
            w.put_bytes(bytes)
        }
        CharData::Wide(units) => {
            // Narrow to one byte per character when the data allows it.
            if units.iter().all(|&u| u <= u16::from(u8::MAX)) {
                write_tag(w, ClassId::Char8, a.shape())?;
                for &u in units {
                    w.put_u8(u as u8)?;
                }
                Ok(())
            } else {
                write_tag(w, ClassId::Char16, a.shape())?;
                for &u in units {
                    w.put_u16(u)?;
                }
                Ok(())
            }
        }
    }
}

fn encode_struct(w: &mut Writer, a: &StructArray) -> Result<(), CodecError> {
    write_tag(w, ClassId::Struct, a.shape())?;

    // Field-name table: a cell of 8-bit character rows. Names travel in the
    // explicit row form even at length one, so every entry is tag, length,
    // bytes.
    let count = u32::try_from(a.fields().len()).map_err(|_| CodecError::NumelLimit)?;
    let cell_shape = if count == 0 { Shape::empty() } else { Shape::row(count)? };
    write_tag(w, ClassId::Cell, &cell_shape)?;
    for field in a.fields() {
        let name: Vec<u8> = field.name().chars().map(|c| c as u8).collect();
        w.put_u8(pack_tag(ClassId::Char8, SizeFormat::Row))?;
        w.put_u8(name.len() as u8)?;
        w.put_bytes(&name)?;
    }

    for field in a.fields() {
        for v in field.values() {
            encode_value(w, v)?;
        }
    }
    Ok(())
}

fn encode_sparse(w: &mut Writer, a: &crate::types::SparseArray) -> Result<(), CodecError> {
    write_tag(w, ClassId::Sparse, a.shape())?;

    // Index vector in the narrowest unsigned width covering the largest
    // index. Indices were validated against the shape, so they fit u32.
    let indices = a.indices();
    let max = indices.iter().copied().max().unwrap_or(0);
    let idx_data = if max <= u64::from(u8::MAX) {
        NumericData::U8(indices.iter().map(|&i| i as u8).collect())
    } else if max <= u64::from(u16::MAX) {
        NumericData::U16(indices.iter().map(|&i| i as u16).collect())
    } else {
        NumericData::U32(indices.iter().map(|&i| i as u32).collect())
    };
    encode_value(w, &Value::Numeric(NumericArray::column(idx_data)?))?;

    match a.data() {
        SparseData::Real(v) => {
            encode_value(w, &Value::Numeric(NumericArray::column(v.clone())?))
        }
        SparseData::Bool(v) => {
            let shape = column_shape(v.len())?;
            encode_value(w, &Value::Bool(BoolArray::new(shape, v.clone())?))
        }
        SparseData::Complex { re, im } => {
            let shape = column_shape(re.len())?;
            encode_value(w, &Value::Complex(crate::types::ComplexArray::new(
                shape,
                re.clone(),
                im.clone(),
            )?))
        }
    }
}

fn column_shape(len: usize) -> Result<Shape, CodecError> {
    let m = u32::try_from(len).map_err(|_| CodecError::NumelLimit)?;
    if m == 0 {
        Ok(Shape::empty())
    } else {
        Shape::column(m)
    }
}
