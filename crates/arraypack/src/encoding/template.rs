//! Template-mode decoder.
//!
//! In template mode the caller supplies a value whose classes, shape
//! categories, and record layout constrain what the buffer may contain; the
//! buffer supplies only data. Decoding overlays the buffer onto the
//! template in place, which is what lets generated hosts with fixed-layout
//! state consume evolving producers: unknown record fields in the buffer
//! are skipped, missing ones keep their template values.

use crate::error::CodecError;
use crate::encoding::decode::{decode_field_names, preflight, read_tag};
use crate::encoding::reader::Reader;
use crate::encoding::skip::{skip_value, Expect};
use crate::encoding::tag::{unpack_tag, ClassId, DEFAULT_SIGNATURE};
use crate::types::{
    BoolArray, CellArray, CharArray, CharData, ComplexArray, NumericArray, Shape, StructArray,
    Value,
};

/// Upper bounds on decoded element counts in template mode.
///
/// The bounds stand in for the fixed capacities of a generated host's
/// state: one limit for numeric and boolean payloads, a tighter one for
/// characters, cells, and records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateBounds {
    /// Largest element count accepted for numeric, boolean, and complex
    /// values.
    pub max_numeric: u32,
    /// Largest element count accepted for character, cell, and record
    /// values.
    pub max_aggregate: u32,
}

impl Default for TemplateBounds {
    fn default() -> Self {
        Self { max_numeric: 4096, max_aggregate: 128 }
    }
}

impl TemplateBounds {
    /// Bounds with explicit limits.
    #[must_use]
    pub const fn new(max_numeric: u32, max_aggregate: u32) -> Self {
        Self { max_numeric, max_aggregate }
    }
}

/// Decodes a buffer onto a template with the default signature and bounds.
///
/// # Errors
///
/// See [`decode_into_with`].
///
/// # Example
///
/// ```
/// use arraypack::{decode_into, encode, Value};
///
/// let bytes = encode(&Value::from(7.5f64)).unwrap();
/// let mut slot: Value = 0.0f64.into();
/// decode_into(&bytes, &mut slot).unwrap();
/// assert_eq!(slot, 7.5f64.into());
/// ```
pub fn decode_into(bytes: &[u8], template: &mut Value) -> Result<(), CodecError> {
    decode_into_with(bytes, DEFAULT_SIGNATURE, template, TemplateBounds::default())
}

/// Decodes a buffer onto a template, with an explicit signature and bounds.
///
/// The template is mutated in place; when an error is returned it may be
/// partially overlaid. Template mode accepts 2-D values only.
///
/// # Errors
///
/// In addition to the framing errors of
/// [`decode_with`](crate::encoding::decode_with):
/// [`CodecError::ClassMismatch`] when a decoded class does not match its
/// template slot (sparse buffers never match),
/// [`CodecError::NdimsLimit`] for higher-dimensional buffers,
/// [`CodecError::NumelLimit`] when a bound is exceeded,
/// [`CodecError::SizeMismatch`] when a non-scalar arrives for a scalar
/// slot, [`CodecError::EmptyValue`] for an empty template cell or record,
/// and [`CodecError::InvalidStruct`] when no record field matches.
pub fn decode_into_with(
    bytes: &[u8],
    signature: u8,
    template: &mut Value,
    bounds: TemplateBounds,
) -> Result<(), CodecError> {
    let mut r = preflight(bytes, signature)?;
    decode_slot(&mut r, template, bounds)?;
    if !r.at_end() {
        return Err(CodecError::CorruptBuf);
    }
    Ok(())
}

fn decode_slot(
    r: &mut Reader<'_>,
    slot: &mut Value,
    bounds: TemplateBounds,
) -> Result<(), CodecError> {
    let (class, shape) = read_tag(r)?;
    if shape.ndims() > 2 {
        return Err(CodecError::NdimsLimit);
    }
    let numel = shape.numel();

    match slot {
        Value::Numeric(t) => {
            if class != t.data().class_id() {
                return Err(CodecError::ClassMismatch);
            }
            check_bound(numel, bounds.max_numeric)?;
            let fitted = fit_shape(t.shape(), &shape, numel)?;
            let count = usize::try_from(numel).map_err(|_| CodecError::NumelLimit)?;
            let data = super::decode::read_numeric_data(r, class, count)?;
            *t = NumericArray::new(fitted, data)?;
        }
        Value::Complex(t) => {
            if class != ClassId::Complex {
                return Err(CodecError::ClassMismatch);
            }
            let (inner, _) = unpack_tag(r.read_u8()?)?;
            if inner != t.real().class_id() {
                return Err(CodecError::ClassMismatch);
            }
            check_bound(numel, bounds.max_numeric)?;
            let fitted = fit_shape(t.shape(), &shape, numel)?;
            let count = usize::try_from(numel).map_err(|_| CodecError::NumelLimit)?;
            let real = super::decode::read_numeric_data(r, inner, count)?;
            let imag = super::decode::read_numeric_data(r, inner, count)?;
            *t = ComplexArray::new(fitted, real, imag)?;
        }
        Value::Bool(t) => {
            if class != ClassId::Bool {
                return Err(CodecError::ClassMismatch);
            }
            check_bound(numel, bounds.max_numeric)?;
            let fitted = fit_shape(t.shape(), &shape, numel)?;
            let count = usize::try_from(numel).map_err(|_| CodecError::NumelLimit)?;
            let data = r.take(count)?.iter().map(|&b| b != 0).collect();
            *t = BoolArray::new(fitted, data)?;
        }
        Value::Char(t) => {
            // Both character widths satisfy a char template.
            if class != ClassId::Char8 && class != ClassId::Char16 {
                return Err(CodecError::ClassMismatch);
            }
            check_bound(numel, bounds.max_aggregate)?;
            let fitted = fit_shape(t.shape(), &shape, numel)?;
            let count = usize::try_from(numel).map_err(|_| CodecError::NumelLimit)?;
            let data = if class == ClassId::Char8 {
                CharData::Latin(r.take(count)?.to_vec())
            } else {
                let mut units = Vec::with_capacity(count.min(r.remaining() / 2));
                for _ in 0..count {
                    units.push(r.read_u16()?);
                }
                CharData::Wide(units)
            };
            *t = CharArray::new(fitted, data)?;
        }
        Value::Cell(t) => {
            if class != ClassId::Cell {
                return Err(CodecError::ClassMismatch);
            }
            check_bound(numel, bounds.max_aggregate)?;
            let proto = t.elems().first().cloned().ok_or(CodecError::EmptyValue)?;
            let fitted = fit_shape(t.shape(), &shape, numel)?;
            let count = usize::try_from(numel).map_err(|_| CodecError::NumelLimit)?;
            let mut elems = Vec::with_capacity(count.min(r.remaining()));
            for _ in 0..count {
                let mut child = proto.clone();
                decode_slot(r, &mut child, bounds)?;
                elems.push(child);
            }
            *t = CellArray::new(fitted, elems)?;
        }
        Value::Struct(t) => {
            if class != ClassId::Struct {
                return Err(CodecError::ClassMismatch);
            }
            check_bound(numel, bounds.max_aggregate)?;
            if t.numel() == 0 {
                return Err(CodecError::EmptyValue);
            }
            let fitted = fit_shape(t.shape(), &shape, numel)?;
            decode_struct_slot(r, t, numel, fitted, bounds)?;
        }
        Value::Sparse(_) => {
            // Template mode carries dense state only.
            return Err(CodecError::ClassMismatch);
        }
    }
    Ok(())
}

fn decode_struct_slot(
    r: &mut Reader<'_>,
    t: &mut StructArray,
    numel: u64,
    fitted: Shape,
    bounds: TemplateBounds,
) -> Result<(), CodecError> {
    let names = decode_field_names(r)?;
    let count = usize::try_from(numel).map_err(|_| CodecError::NumelLimit)?;

    // Prototype elements are captured before any overlay so a repeated
    // buffer field cannot observe its own partially written slot. A field
    // with no element to decode against (a template left inconsistent by an
    // earlier failed overlay) cannot serve as a template.
    let protos: Vec<Value> = t
        .fields()
        .iter()
        .map(|f| f.values.first().cloned())
        .collect::<Option<Vec<_>>>()
        .ok_or(CodecError::EmptyValue)?;

    let mut matched = vec![false; t.fields().len()];
    let mut any_match = false;
    for name in &names {
        match t.field_index(name) {
            Some(i) => {
                let proto = protos[i].clone();
                let mut values = Vec::with_capacity(count.min(r.remaining()));
                for _ in 0..count {
                    let mut child = proto.clone();
                    decode_slot(r, &mut child, bounds)?;
                    values.push(child);
                }
                t.fields_mut()[i].values = values;
                matched[i] = true;
                any_match = true;
            }
            None => {
                // Unknown producer field: walk past its values.
                for _ in 0..count {
                    skip_value(r, Expect::Any)?;
                }
            }
        }
    }

    if !any_match && !(t.fields().is_empty() && names.is_empty()) {
        return Err(CodecError::InvalidStruct);
    }

    // Fields the producer no longer sends keep their template values,
    // resized to the decoded element count.
    for (i, was_matched) in matched.iter().enumerate() {
        if !was_matched {
            let field = &mut t.fields_mut()[i];
            if field.values.len() != count {
                field.values.resize(count, protos[i].clone());
            }
        }
    }
    t.set_shape(fitted);
    Ok(())
}

fn check_bound(numel: u64, bound: u32) -> Result<(), CodecError> {
    if numel > u64::from(bound) {
        return Err(CodecError::NumelLimit);
    }
    Ok(())
}

/// Reconciles the decoded shape with the template's shape category.
fn fit_shape(template: &Shape, decoded: &Shape, numel: u64) -> Result<Shape, CodecError> {
    if template.is_scalar() {
        if numel != 1 {
            return Err(CodecError::SizeMismatch);
        }
        return Ok(Shape::scalar());
    }
    // numel was bounds-checked, so it fits u32.
    let n = u32::try_from(numel).map_err(|_| CodecError::NumelLimit)?;
    if template.is_column() {
        return Shape::from_dims(vec![n, 1]);
    }
    if template.is_row() {
        return Shape::from_dims(vec![1, n]);
    }
    Ok(decoded.clone())
}
