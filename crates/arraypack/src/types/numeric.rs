//! Real and complex numeric arrays.
//!
//! [`NumericData`] holds the elements of a real numeric array in one of the
//! ten supported widths. [`NumericArray`] pairs element data with a
//! [`Shape`]; [`ComplexArray`] pairs two equally sized real parts of the
//! same width.

use serde::{Deserialize, Serialize};

use crate::error::CodecError;
use crate::types::Shape;

/// Element storage for a real numeric array.
///
/// One variant per supported element width. Elements are stored in
/// column-major order, matching the wire layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NumericData {
    /// 64-bit IEEE 754 floating point.
    F64(Vec<f64>),
    /// 32-bit IEEE 754 floating point.
    F32(Vec<f32>),
    /// 8-bit signed integer.
    I8(Vec<i8>),
    /// 8-bit unsigned integer.
    U8(Vec<u8>),
    /// 16-bit signed integer.
    I16(Vec<i16>),
    /// 16-bit unsigned integer.
    U16(Vec<u16>),
    /// 32-bit signed integer.
    I32(Vec<i32>),
    /// 32-bit unsigned integer.
    U32(Vec<u32>),
    /// 64-bit signed integer.
    I64(Vec<i64>),
    /// 64-bit unsigned integer.
    U64(Vec<u64>),
}

impl NumericData {
    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::F64(v) => v.len(),
            Self::F32(v) => v.len(),
            Self::I8(v) => v.len(),
            Self::U8(v) => v.len(),
            Self::I16(v) => v.len(),
            Self::U16(v) => v.len(),
            Self::I32(v) => v.len(),
            Self::U32(v) => v.len(),
            Self::I64(v) => v.len(),
            Self::U64(v) => v.len(),
        }
    }

    /// Whether the data holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether two data values hold the same element width.
    #[must_use]
    pub fn same_width(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

macro_rules! numeric_data_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(impl From<Vec<$ty>> for NumericData {
            fn from(v: Vec<$ty>) -> Self {
                Self::$variant(v)
            }
        })*
    };
}

numeric_data_from! {
    f64 => F64, f32 => F32,
    i8 => I8, u8 => U8, i16 => I16, u16 => U16,
    i32 => I32, u32 => U32, i64 => I64, u64 => U64,
}

/// A real numeric array: a [`Shape`] plus element data of one width.
///
/// # Example
///
/// ```
/// use arraypack::{NumericArray, NumericData};
///
/// let v = NumericArray::row(vec![1.0f64, 2.0, 3.0]).unwrap();
/// assert_eq!(v.shape().dims(), &[1, 3]);
/// assert_eq!(v.data(), &NumericData::F64(vec![1.0, 2.0, 3.0]));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericArray {
    shape: Shape,
    data: NumericData,
}

impl NumericArray {
    /// Builds an array from a shape and matching element data.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::SizeMismatch`] if the data length differs from
    /// the shape's element count.
    pub fn new(shape: Shape, data: impl Into<NumericData>) -> Result<Self, CodecError> {
        let data = data.into();
        if data.len() as u64 != shape.numel() {
            return Err(CodecError::SizeMismatch);
        }
        Ok(Self { shape, data })
    }

    /// A `1x1` array holding one element.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::SizeMismatch`] if the data does not hold
    /// exactly one element.
    pub fn scalar(data: impl Into<NumericData>) -> Result<Self, CodecError> {
        Self::new(Shape::scalar(), data)
    }

    /// A `1xN` row vector over the given elements.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::NumelLimit`] if the length exceeds `i32::MAX`.
    pub fn row(data: impl Into<NumericData>) -> Result<Self, CodecError> {
        let data = data.into();
        let n = u32::try_from(data.len()).map_err(|_| CodecError::NumelLimit)?;
        let shape = if n == 0 { Shape::empty() } else { Shape::row(n)? };
        Self::new(shape, data)
    }

    /// An `Mx1` column vector over the given elements.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::NumelLimit`] if the length exceeds `i32::MAX`.
    pub fn column(data: impl Into<NumericData>) -> Result<Self, CodecError> {
        let data = data.into();
        let m = u32::try_from(data.len()).map_err(|_| CodecError::NumelLimit)?;
        let shape = if m == 0 { Shape::empty() } else { Shape::column(m)? };
        Self::new(shape, data)
    }

    /// An `MxN` matrix over column-major element data.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::NumelLimit`] for oversized dimensions and
    /// [`CodecError::SizeMismatch`] if the data length is not `m * n`.
    pub fn matrix(m: u32, n: u32, data: impl Into<NumericData>) -> Result<Self, CodecError> {
        Self::new(Shape::matrix(m, n)?, data)
    }

    /// The array's shape.
    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// The element data.
    #[must_use]
    pub fn data(&self) -> &NumericData {
        &self.data
    }

    /// Number of elements.
    #[must_use]
    pub fn numel(&self) -> u64 {
        self.shape.numel()
    }
}

/// A complex numeric array: real and imaginary parts of the same width and
/// length, sharing one [`Shape`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexArray {
    shape: Shape,
    real: NumericData,
    imag: NumericData,
}

impl ComplexArray {
    /// Builds a complex array from a shape and two matching parts.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::ClassMismatch`] if the parts have different
    /// element widths, and [`CodecError::SizeMismatch`] if their lengths
    /// differ from each other or from the shape's element count.
    pub fn new(
        shape: Shape,
        real: impl Into<NumericData>,
        imag: impl Into<NumericData>,
    ) -> Result<Self, CodecError> {
        let real = real.into();
        let imag = imag.into();
        if !real.same_width(&imag) {
            return Err(CodecError::ClassMismatch);
        }
        if real.len() != imag.len() || real.len() as u64 != shape.numel() {
            return Err(CodecError::SizeMismatch);
        }
        Ok(Self { shape, real, imag })
    }

    /// A `1x1` complex scalar.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::SizeMismatch`] if a part does not hold exactly
    /// one element.
    pub fn scalar(re: f64, im: f64) -> Result<Self, CodecError> {
        Self::new(Shape::scalar(), vec![re], vec![im])
    }

    /// The array's shape.
    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// The real part.
    #[must_use]
    pub fn real(&self) -> &NumericData {
        &self.real
    }

    /// The imaginary part.
    #[must_use]
    pub fn imag(&self) -> &NumericData {
        &self.imag
    }

    /// Number of elements.
    #[must_use]
    pub fn numel(&self) -> u64 {
        self.shape.numel()
    }
}
