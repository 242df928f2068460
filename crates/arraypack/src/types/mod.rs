//! Core data types for the codec.
//!
//! This module defines the value universe the wire format can carry: shapes,
//! real and complex numeric arrays, booleans, character arrays, cells,
//! record arrays, and sparse arrays.

mod numeric;
mod shape;
mod sparse;
mod value;

pub use numeric::{ComplexArray, NumericArray, NumericData};
pub use shape::{Shape, MAX_NDIMS};
pub use sparse::{SparseArray, SparseData};
pub use value::{
    BoolArray, CellArray, CharArray, CharData, Field, StructArray, Value, MAX_FIELD_NAME_LEN,
};
