//! Array shapes.
//!
//! Every value in the codec carries a [`Shape`]: an ordered list of
//! dimensions whose product is the value's element count. Shapes are always
//! at least two-dimensional; the scalar convention is `1x1` and the
//! normalized empty is `0x0`.

use serde::{Deserialize, Serialize};

use crate::error::CodecError;

/// Maximum number of dimensions a shape may carry.
pub const MAX_NDIMS: usize = 255;

/// Maximum element count, and maximum extent of a single dimension.
pub(crate) const MAX_NUMEL: u64 = i32::MAX as u64;

/// An ordered list of array dimensions.
///
/// Construction validates the format's limits: between 2 and 255 dimensions,
/// no dimension above `i32::MAX`, and an element count (for empty shapes,
/// the product of the nonzero dimensions) no larger than `i32::MAX`.
///
/// # Example
///
/// ```
/// use arraypack::Shape;
///
/// let m = Shape::matrix(3, 4).unwrap();
/// assert_eq!(m.numel(), 12);
/// assert!(Shape::scalar().is_scalar());
/// assert!(Shape::empty().is_normalized_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    dims: Vec<u32>,
}

impl Shape {
    /// The scalar shape, `1x1`.
    #[must_use]
    pub fn scalar() -> Self {
        Self { dims: vec![1, 1] }
    }

    /// The normalized empty shape, `0x0`.
    #[must_use]
    pub fn empty() -> Self {
        Self { dims: vec![0, 0] }
    }

    /// A row vector shape, `1xN`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::NumelLimit`] if `n` exceeds `i32::MAX`.
    pub fn row(n: u32) -> Result<Self, CodecError> {
        Self::from_dims(vec![1, n])
    }

    /// A column vector shape, `Mx1`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::NumelLimit`] if `m` exceeds `i32::MAX`.
    pub fn column(m: u32) -> Result<Self, CodecError> {
        Self::from_dims(vec![m, 1])
    }

    /// A matrix shape, `MxN`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::NumelLimit`] if a dimension or the element
    /// count exceeds `i32::MAX`.
    pub fn matrix(m: u32, n: u32) -> Result<Self, CodecError> {
        Self::from_dims(vec![m, n])
    }

    /// Builds a shape from an explicit dimension list.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::NdimsLimit`] if the list has fewer than 2 or
    /// more than 255 entries, and [`CodecError::NumelLimit`] if a dimension
    /// or the element count exceeds `i32::MAX`. For empty shapes the product
    /// of the nonzero dimensions is held to the same limit, so that an empty
    /// value can never imply an oversized reshape.
    pub fn from_dims(dims: Vec<u32>) -> Result<Self, CodecError> {
        if dims.len() < 2 || dims.len() > MAX_NDIMS {
            return Err(CodecError::NdimsLimit);
        }
        let mut nonzero: u64 = 1;
        for &d in &dims {
            if u64::from(d) > MAX_NUMEL {
                return Err(CodecError::NumelLimit);
            }
            if d != 0 {
                nonzero = nonzero
                    .checked_mul(u64::from(d))
                    .ok_or(CodecError::NumelLimit)?;
                if nonzero > MAX_NUMEL {
                    return Err(CodecError::NumelLimit);
                }
            }
        }
        Ok(Self { dims })
    }

    /// The dimension list.
    #[must_use]
    pub fn dims(&self) -> &[u32] {
        &self.dims
    }

    /// Number of dimensions.
    #[must_use]
    pub fn ndims(&self) -> usize {
        self.dims.len()
    }

    /// Total element count, the product of all dimensions.
    #[must_use]
    pub fn numel(&self) -> u64 {
        if self.dims.contains(&0) {
            0
        } else {
            // Bounded by MAX_NUMEL at construction, so the product fits.
            self.dims.iter().map(|&d| u64::from(d)).product()
        }
    }

    /// Whether this shape holds exactly one element.
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        self.numel() == 1
    }

    /// Whether this shape is exactly `0x0`.
    #[must_use]
    pub fn is_normalized_empty(&self) -> bool {
        self.dims == [0, 0]
    }

    /// Whether this shape holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.numel() == 0
    }

    /// Whether this shape has exactly two dimensions.
    #[must_use]
    pub fn is_matrix(&self) -> bool {
        self.dims.len() == 2
    }

    /// Whether this is a column vector, `Mx1`.
    #[must_use]
    pub fn is_column(&self) -> bool {
        self.dims.len() == 2 && self.dims[1] == 1
    }

    /// Whether this is a row vector, `1xN`.
    #[must_use]
    pub fn is_row(&self) -> bool {
        self.dims.len() == 2 && self.dims[0] == 1
    }

    /// The largest dimension.
    pub(crate) fn max_dim(&self) -> u32 {
        self.dims.iter().copied().max().unwrap_or(0)
    }
}
