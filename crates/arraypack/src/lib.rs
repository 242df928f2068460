//! arraypack
//!
//! A self-describing binary codec for heterogeneous, possibly nested,
//! numerically oriented values: real and complex numeric arrays in ten
//! element widths, booleans, 8- and 16-bit character arrays, sparse arrays,
//! heterogeneous cells, and record arrays with named fields.
//!
//! The encoder produces a compact buffer carrying a two-byte signature, a
//! recursive tagged encoding of the value, and word-rounding padding. The
//! decoder recovers either an exact copy ([`decode`], dynamic mode) or
//! overlays the payload onto a caller-provided template
//! ([`decode_into`], template mode), tolerating record fields known to only
//! one side. Buffers self-describe their byte order, so little- and
//! big-endian producers interoperate without negotiation.
//!
//! # Example
//!
//! ```
//! use arraypack::{decode, encode, NumericArray, Shape, StructArray, Value};
//!
//! let sample = StructArray::scalar()
//!     .with_field("temperature", vec![21.5f64.into()])
//!     .unwrap()
//!     .with_field("channel", vec![3u8.into()])
//!     .unwrap();
//!
//! let bytes = encode(&Value::Struct(sample.clone())).unwrap();
//! assert_eq!(bytes.len() % 4, 0);
//!
//! let back = decode(&bytes).unwrap();
//! assert_eq!(back, Value::Struct(sample));
//! ```
//!
//! # Modules
//!
//! - [`types`] - the value universe ([`Value`], [`Shape`], array types)
//! - [`encoding`] - wire format, encoder, both decoders
//! - [`error`] - the error taxonomy ([`CodecError`])

pub mod encoding;
pub mod error;
pub mod types;

pub use encoding::{
    decode, decode_into, decode_into_with, decode_with, encode, encode_with, ByteOrder, ClassId,
    SizeFormat, TemplateBounds, DEFAULT_SIGNATURE, FORMAT_VERSION, MAX_SIGNATURE,
};
pub use error::CodecError;
pub use types::{
    BoolArray, CellArray, CharArray, CharData, ComplexArray, Field, NumericArray, NumericData,
    Shape, SparseArray, SparseData, StructArray, Value, MAX_FIELD_NAME_LEN, MAX_NDIMS,
};
