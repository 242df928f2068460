//! Values that can travel through the codec.
//!
//! This module provides the [`Value`] enum, the closed universe of types the
//! wire format can carry: real and complex numeric arrays, booleans, 8- and
//! 16-bit character arrays, heterogeneous cells, record arrays with named
//! fields, and sparse arrays. Values nest to arbitrary depth through cells
//! and records.
//!
//! # Example
//!
//! ```
//! use arraypack::{CellArray, CharArray, Shape, StructArray, Value};
//!
//! // Scalars convert directly.
//! let pi: Value = 3.14f64.into();
//! let flag: Value = true.into();
//!
//! // A 1x2 record array with two named fields.
//! let record = StructArray::new(Shape::row(2).unwrap())
//!     .with_field("id", vec![1i32.into(), 2i32.into()])
//!     .unwrap()
//!     .with_field("score", vec![0.5f64.into(), 0.9f64.into()])
//!     .unwrap();
//!
//! let cell = CellArray::row(vec![
//!     pi,
//!     flag,
//!     Value::Char(CharArray::from_text("label").unwrap()),
//!     Value::Struct(record),
//! ])
//! .unwrap();
//! assert_eq!(cell.numel(), 4);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::CodecError;
use crate::types::{ComplexArray, NumericArray, Shape, SparseArray};

/// Maximum byte length of a record field name.
pub const MAX_FIELD_NAME_LEN: usize = 63;

/// A value in the codec's type universe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Real numeric array, one of ten element widths.
    Numeric(NumericArray),
    /// Complex numeric array.
    Complex(ComplexArray),
    /// Boolean array.
    Bool(BoolArray),
    /// Character array, 8- or 16-bit.
    Char(CharArray),
    /// Heterogeneous ordered container of child values.
    Cell(CellArray),
    /// Record array with named fields.
    Struct(StructArray),
    /// Sparse array of nonzero entries.
    Sparse(SparseArray),
}

impl Value {
    /// The value's shape.
    #[must_use]
    pub fn shape(&self) -> &Shape {
        match self {
            Self::Numeric(a) => a.shape(),
            Self::Complex(a) => a.shape(),
            Self::Bool(a) => a.shape(),
            Self::Char(a) => a.shape(),
            Self::Cell(a) => a.shape(),
            Self::Struct(a) => a.shape(),
            Self::Sparse(a) => a.shape(),
        }
    }

    /// Number of elements.
    #[must_use]
    pub fn numel(&self) -> u64 {
        self.shape().numel()
    }

    /// Whether this is a real numeric array.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Numeric(_))
    }

    /// Whether this is a complex array.
    #[must_use]
    pub const fn is_complex(&self) -> bool {
        matches!(self, Self::Complex(_))
    }

    /// Whether this is a boolean array.
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Self::Bool(_))
    }

    /// Whether this is a character array.
    #[must_use]
    pub const fn is_char(&self) -> bool {
        matches!(self, Self::Char(_))
    }

    /// Whether this is a cell.
    #[must_use]
    pub const fn is_cell(&self) -> bool {
        matches!(self, Self::Cell(_))
    }

    /// Whether this is a record array.
    #[must_use]
    pub const fn is_struct(&self) -> bool {
        matches!(self, Self::Struct(_))
    }

    /// Whether this is a sparse array.
    #[must_use]
    pub const fn is_sparse(&self) -> bool {
        matches!(self, Self::Sparse(_))
    }

    /// The numeric array, if this is one.
    #[must_use]
    pub fn as_numeric(&self) -> Option<&NumericArray> {
        match self {
            Self::Numeric(a) => Some(a),
            _ => None,
        }
    }

    /// The complex array, if this is one.
    #[must_use]
    pub fn as_complex(&self) -> Option<&ComplexArray> {
        match self {
            Self::Complex(a) => Some(a),
            _ => None,
        }
    }

    /// The boolean array, if this is one.
    #[must_use]
    pub fn as_bool(&self) -> Option<&BoolArray> {
        match self {
            Self::Bool(a) => Some(a),
            _ => None,
        }
    }

    /// The character array, if this is one.
    #[must_use]
    pub fn as_char(&self) -> Option<&CharArray> {
        match self {
            Self::Char(a) => Some(a),
            _ => None,
        }
    }

    /// The cell, if this is one.
    #[must_use]
    pub fn as_cell(&self) -> Option<&CellArray> {
        match self {
            Self::Cell(a) => Some(a),
            _ => None,
        }
    }

    /// The record array, if this is one.
    #[must_use]
    pub fn as_struct(&self) -> Option<&StructArray> {
        match self {
            Self::Struct(a) => Some(a),
            _ => None,
        }
    }

    /// The sparse array, if this is one.
    #[must_use]
    pub fn as_sparse(&self) -> Option<&SparseArray> {
        match self {
            Self::Sparse(a) => Some(a),
            _ => None,
        }
    }
}

macro_rules! value_from_scalar {
    ($($ty:ty),* $(,)?) => {
        $(impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                // A one-element vector always satisfies the scalar shape.
                #[allow(clippy::unwrap_used)]
                let array = NumericArray::scalar(vec![v]).unwrap();
                Self::Numeric(array)
            }
        })*
    };
}

value_from_scalar!(f64, f32, i8, u8, i16, u16, i32, u32, i64, u64);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(BoolArray::scalar(v))
    }
}

/// A boolean array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoolArray {
    shape: Shape,
    data: Vec<bool>,
}

impl BoolArray {
    /// Builds a boolean array from a shape and matching data.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::SizeMismatch`] if the data length differs from
    /// the shape's element count.
    pub fn new(shape: Shape, data: Vec<bool>) -> Result<Self, CodecError> {
        if data.len() as u64 != shape.numel() {
            return Err(CodecError::SizeMismatch);
        }
        Ok(Self { shape, data })
    }

    /// A `1x1` boolean.
    #[must_use]
    pub fn scalar(v: bool) -> Self {
        Self { shape: Shape::scalar(), data: vec![v] }
    }

    /// A `1xN` row of booleans.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::NumelLimit`] if the length exceeds `i32::MAX`.
    pub fn row(data: Vec<bool>) -> Result<Self, CodecError> {
        let n = u32::try_from(data.len()).map_err(|_| CodecError::NumelLimit)?;
        let shape = if n == 0 { Shape::empty() } else { Shape::row(n)? };
        Self::new(shape, data)
    }

    /// The array's shape.
    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// The elements.
    #[must_use]
    pub fn data(&self) -> &[bool] {
        &self.data
    }
}

/// Character storage: 8-bit code points or 16-bit code units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CharData {
    /// One byte per character, code points 0..=255.
    Latin(Vec<u8>),
    /// Two bytes per character, UTF-16 code units.
    Wide(Vec<u16>),
}

impl CharData {
    /// Number of characters.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Latin(v) => v.len(),
            Self::Wide(v) => v.len(),
        }
    }

    /// Whether the data holds no characters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A character array.
///
/// Text built with [`CharArray::from_text`] stores 8-bit data whenever every
/// code point fits a byte, and 16-bit code units otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharArray {
    shape: Shape,
    data: CharData,
}

impl CharArray {
    /// Builds a character array from a shape and matching data.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::SizeMismatch`] if the data length differs from
    /// the shape's element count.
    pub fn new(shape: Shape, data: CharData) -> Result<Self, CodecError> {
        if data.len() as u64 != shape.numel() {
            return Err(CodecError::SizeMismatch);
        }
        Ok(Self { shape, data })
    }

    /// A row vector over the text's characters; empty text becomes the
    /// normalized empty `0x0`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::NumelLimit`] if the character count exceeds
    /// `i32::MAX`.
    pub fn from_text(s: &str) -> Result<Self, CodecError> {
        let data = if s.chars().all(|c| (c as u32) < 256) {
            CharData::Latin(s.chars().map(|c| c as u8).collect())
        } else {
            CharData::Wide(s.encode_utf16().collect())
        };
        let n = u32::try_from(data.len()).map_err(|_| CodecError::NumelLimit)?;
        let shape = if n == 0 { Shape::empty() } else { Shape::row(n)? };
        Ok(Self { shape, data })
    }

    /// Converts the characters back to a `String`, replacing unpaired
    /// surrogates in 16-bit data.
    #[must_use]
    pub fn to_text(&self) -> String {
        match &self.data {
            CharData::Latin(v) => v.iter().map(|&b| char::from(b)).collect(),
            CharData::Wide(v) => String::from_utf16_lossy(v),
        }
    }

    /// The array's shape.
    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// The character data.
    #[must_use]
    pub fn data(&self) -> &CharData {
        &self.data
    }
}

/// A heterogeneous ordered container of child values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellArray {
    shape: Shape,
    elems: Vec<Value>,
}

impl CellArray {
    /// Builds a cell from a shape and matching children.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::SizeMismatch`] if the child count differs from
    /// the shape's element count.
    pub fn new(shape: Shape, elems: Vec<Value>) -> Result<Self, CodecError> {
        if elems.len() as u64 != shape.numel() {
            return Err(CodecError::SizeMismatch);
        }
        Ok(Self { shape, elems })
    }

    /// A `1xN` cell over the given children; no children yields the
    /// normalized empty `0x0`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::NumelLimit`] if the child count exceeds
    /// `i32::MAX`.
    pub fn row(elems: Vec<Value>) -> Result<Self, CodecError> {
        let n = u32::try_from(elems.len()).map_err(|_| CodecError::NumelLimit)?;
        let shape = if n == 0 { Shape::empty() } else { Shape::row(n)? };
        Self::new(shape, elems)
    }

    /// The cell's shape.
    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// The children, in column-major element order.
    #[must_use]
    pub fn elems(&self) -> &[Value] {
        &self.elems
    }

    /// Number of elements.
    #[must_use]
    pub fn numel(&self) -> u64 {
        self.shape.numel()
    }
}

/// One named field of a [`StructArray`]: a name plus one child value per
/// record element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub(crate) name: String,
    pub(crate) values: Vec<Value>,
}

impl Field {
    /// The field's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// One value per record element, in column-major element order.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

/// A record array: a shape plus ordered named fields, each holding one value
/// per element.
///
/// Field names are 1 to [`MAX_FIELD_NAME_LEN`] bytes and must be
/// representable in 8-bit characters. A record with no fields is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructArray {
    shape: Shape,
    fields: Vec<Field>,
}

impl StructArray {
    /// An empty record array over the given shape.
    #[must_use]
    pub fn new(shape: Shape) -> Self {
        Self { shape, fields: Vec::new() }
    }

    /// A `1x1` record.
    #[must_use]
    pub fn scalar() -> Self {
        Self::new(Shape::scalar())
    }

    /// Appends a field, consuming and returning the record.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidStruct`] for an empty, over-long,
    /// non-8-bit, or duplicate name, and [`CodecError::SizeMismatch`] if the
    /// value count differs from the record's element count.
    pub fn with_field(
        mut self,
        name: impl Into<String>,
        values: Vec<Value>,
    ) -> Result<Self, CodecError> {
        let name = name.into();
        if name.is_empty()
            || name.chars().count() > MAX_FIELD_NAME_LEN
            || name.chars().any(|c| (c as u32) > 255)
            || self.field(&name).is_some()
        {
            return Err(CodecError::InvalidStruct);
        }
        if values.len() as u64 != self.shape.numel() {
            return Err(CodecError::SizeMismatch);
        }
        self.fields.push(Field { name, values });
        Ok(self)
    }

    /// The record's shape.
    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// The fields, in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Position of a field by name.
    #[must_use]
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Number of record elements.
    #[must_use]
    pub fn numel(&self) -> u64 {
        self.shape.numel()
    }

    pub(crate) fn set_shape(&mut self, shape: Shape) {
        self.shape = shape;
    }

    pub(crate) fn fields_mut(&mut self) -> &mut [Field] {
        &mut self.fields
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn scalar_conversions() {
        let v: Value = 7u16.into();
        assert!(v.is_numeric());
        assert!(v.shape().is_scalar());

        let b: Value = false.into();
        assert_eq!(b.as_bool().unwrap().data(), &[false]);
    }

    #[test]
    fn text_narrows_to_latin() {
        let c = CharArray::from_text("hello").unwrap();
        assert_eq!(c.data(), &CharData::Latin(b"hello".to_vec()));
        assert_eq!(c.shape().dims(), &[1, 5]);
        assert_eq!(c.to_text(), "hello");

        let wide = CharArray::from_text("héllo\u{0416}").unwrap();
        assert!(matches!(wide.data(), CharData::Wide(_)));
        assert_eq!(wide.to_text(), "héllo\u{0416}");

        let empty = CharArray::from_text("").unwrap();
        assert!(empty.shape().is_normalized_empty());
    }

    #[test]
    fn cell_child_count_must_match() {
        let err = CellArray::new(Shape::row(2).unwrap(), vec![1.0f64.into()]);
        assert_eq!(err.unwrap_err(), CodecError::SizeMismatch);
    }

    #[test]
    fn struct_field_rules() {
        let s = StructArray::scalar()
            .with_field("a", vec![1.0f64.into()])
            .unwrap();

        // Duplicate name.
        let dup = s.clone().with_field("a", vec![2.0f64.into()]);
        assert_eq!(dup.unwrap_err(), CodecError::InvalidStruct);

        // Wrong value count.
        let short = s.clone().with_field("b", vec![]);
        assert_eq!(short.unwrap_err(), CodecError::SizeMismatch);

        // Name too long.
        let long = "x".repeat(MAX_FIELD_NAME_LEN + 1);
        let err = StructArray::scalar().with_field(long, vec![1.0f64.into()]);
        assert_eq!(err.unwrap_err(), CodecError::InvalidStruct);

        // Name outside the 8-bit range.
        let err = StructArray::scalar().with_field("поле", vec![1.0f64.into()]);
        assert_eq!(err.unwrap_err(), CodecError::InvalidStruct);

        assert_eq!(s.field("a").unwrap().values().len(), 1);
        assert_eq!(s.field_index("a"), Some(0));
        assert!(s.field("missing").is_none());
    }

    #[test]
    fn empty_struct_is_valid() {
        let s = StructArray::scalar();
        assert!(s.fields().is_empty());
        assert_eq!(s.numel(), 1);
    }
}
