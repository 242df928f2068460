//! Sparse arrays.
//!
//! A [`SparseArray`] stores only the nonzero entries of a numeric, boolean,
//! or complex array: a list of 1-based column-major linear positions plus
//! the values at those positions. The declared [`Shape`] preserves the full
//! extent of the array.

use serde::{Deserialize, Serialize};

use crate::error::CodecError;
use crate::types::{NumericArray, NumericData, Shape, Value};

/// Nonzero-value storage for a sparse array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SparseData {
    /// 64-bit floating point values.
    Real(Vec<f64>),
    /// Boolean values (every stored entry is `true` in a well-formed
    /// sparse, but the representation does not insist on it).
    Bool(Vec<bool>),
    /// Complex 64-bit floating point values.
    Complex {
        /// Real parts.
        re: Vec<f64>,
        /// Imaginary parts, same length as `re`.
        im: Vec<f64>,
    },
}

impl SparseData {
    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Real(v) => v.len(),
            Self::Bool(v) => v.len(),
            Self::Complex { re, .. } => re.len(),
        }
    }

    /// Whether no entries are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A sparse array: declared shape, 1-based linear indices of the nonzero
/// entries, and the entries themselves.
///
/// # Example
///
/// ```
/// use arraypack::{Shape, SparseArray, SparseData};
///
/// let s = SparseArray::new(
///     Shape::matrix(255, 255).unwrap(),
///     vec![255],
///     SparseData::Real(vec![1.0]),
/// )
/// .unwrap();
/// assert_eq!(s.nnz(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparseArray {
    shape: Shape,
    indices: Vec<u64>,
    data: SparseData,
}

impl SparseArray {
    /// Builds a sparse array.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::SizeMismatch`] if the index and value counts
    /// differ, if the complex parts have unequal lengths, or if an index is
    /// zero or beyond the shape's element count.
    pub fn new(shape: Shape, indices: Vec<u64>, data: SparseData) -> Result<Self, CodecError> {
        if let SparseData::Complex { re, im } = &data {
            if re.len() != im.len() {
                return Err(CodecError::SizeMismatch);
            }
        }
        if indices.len() != data.len() {
            return Err(CodecError::SizeMismatch);
        }
        let numel = shape.numel();
        if indices.iter().any(|&i| i == 0 || i > numel) {
            return Err(CodecError::SizeMismatch);
        }
        Ok(Self { shape, indices, data })
    }

    /// Builds a sparse array by scanning a dense value for nonzero entries.
    ///
    /// Accepts 64-bit float, boolean, and complex 64-bit float arrays. A
    /// floating point entry counts as nonzero when it is not `+0.0`/`-0.0`,
    /// so NaN entries are kept.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::ClassMismatch`] for any other value class.
    pub fn from_dense(dense: &Value) -> Result<Self, CodecError> {
        match dense {
            Value::Numeric(a) => {
                let NumericData::F64(elems) = a.data() else {
                    return Err(CodecError::ClassMismatch);
                };
                let mut indices = Vec::new();
                let mut values = Vec::new();
                for (i, &v) in elems.iter().enumerate() {
                    if v != 0.0 || v.is_nan() {
                        indices.push(i as u64 + 1);
                        values.push(v);
                    }
                }
                Self::new(a.shape().clone(), indices, SparseData::Real(values))
            }
            Value::Bool(a) => {
                let indices = a
                    .data()
                    .iter()
                    .enumerate()
                    .filter(|&(_, &v)| v)
                    .map(|(i, _)| i as u64 + 1)
                    .collect::<Vec<_>>();
                let values = vec![true; indices.len()];
                Self::new(a.shape().clone(), indices, SparseData::Bool(values))
            }
            Value::Complex(a) => {
                let (NumericData::F64(re), NumericData::F64(im)) = (a.real(), a.imag()) else {
                    return Err(CodecError::ClassMismatch);
                };
                let mut indices = Vec::new();
                let mut res = Vec::new();
                let mut ims = Vec::new();
                for (i, (&r, &m)) in re.iter().zip(im.iter()).enumerate() {
                    if r != 0.0 || r.is_nan() || m != 0.0 || m.is_nan() {
                        indices.push(i as u64 + 1);
                        res.push(r);
                        ims.push(m);
                    }
                }
                Self::new(a.shape().clone(), indices, SparseData::Complex { re: res, im: ims })
            }
            _ => Err(CodecError::ClassMismatch),
        }
    }

    /// Expands the sparse array back to its dense form.
    ///
    /// The shape was validated at construction, so the expansion is at most
    /// `i32::MAX` elements.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn to_dense(&self) -> Value {
        match &self.data {
            SparseData::Real(values) => {
                let mut dense = vec![0.0f64; self.shape.numel() as usize];
                for (&i, &v) in self.indices.iter().zip(values.iter()) {
                    dense[(i - 1) as usize] = v;
                }
                Value::Numeric(NumericArray::new(self.shape.clone(), dense).unwrap())
            }
            SparseData::Bool(values) => {
                let mut dense = vec![false; self.shape.numel() as usize];
                for (&i, &v) in self.indices.iter().zip(values.iter()) {
                    dense[(i - 1) as usize] = v;
                }
                Value::Bool(crate::types::BoolArray::new(self.shape.clone(), dense).unwrap())
            }
            SparseData::Complex { re, im } => {
                let n = self.shape.numel() as usize;
                let mut dre = vec![0.0f64; n];
                let mut dim = vec![0.0f64; n];
                for (k, &i) in self.indices.iter().enumerate() {
                    dre[(i - 1) as usize] = re[k];
                    dim[(i - 1) as usize] = im[k];
                }
                Value::Complex(
                    crate::types::ComplexArray::new(self.shape.clone(), dre, dim).unwrap(),
                )
            }
        }
    }

    /// The declared shape.
    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// The 1-based linear indices of the stored entries.
    #[must_use]
    pub fn indices(&self) -> &[u64] {
        &self.indices
    }

    /// The stored entries.
    #[must_use]
    pub fn data(&self) -> &SparseData {
        &self.data
    }

    /// Number of stored entries.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }
}
