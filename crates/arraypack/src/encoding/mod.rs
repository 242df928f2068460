//! The wire format: encoder, decoders, and shared tag tables.
//!
//! A buffer is the concatenation of three regions:
//!
//! ```text
//! [signature: 2 bytes][value: recursive tagged encoding][padding: 1-4 bytes]
//! ```
//!
//! # Signature
//!
//! The signature word is `(version << 8) | app_signature` with version 240
//! and the application signature below 240 (default 42). Little-endian
//! buffers open with `(sig, 240)`, big-endian with `(240, sig)`; since only
//! the version byte can be 240 or above, the decoder recovers the byte
//! order from two bytes.
//!
//! # Value
//!
//! Every value opens with a tag byte: class code in the low 5 bits, size
//! format in the high 3 bits.
//!
//! | Fmt | Shape | Prefix bytes after the tag |
//! |-----|------------------------|-----------------------------|
//! | 0 | scalar `1x1` | none |
//! | 1 | column `Mx1`, `M < 256`| `M` as u8 |
//! | 2 | row `1xN`, `N < 256` | `N` as u8 |
//! | 3 | matrix, both `< 256` | `M`, `N` as u8 |
//! | 4 | normalized empty `0x0` | none |
//! | 5 | general, dims fit u8 | ndims as u8, dims as u8 |
//! | 6 | general, dims fit u16 | ndims as u8, dims as u16 |
//! | 7 | general, dims fit u32 | ndims as u8, dims as u32 |
//!
//! The payload follows the shape prefix. Fixed-width classes store raw
//! elements in column-major order and the buffer's byte order. Cells store
//! one encoded child per element. Records store an encoded cell of 8-bit
//! field-name rows, then for each field one encoded child per record
//! element. Sparse arrays store an unsigned index vector and a value
//! vector, both themselves encoded values. Complex arrays store an inner
//! tag naming the real element class, then the real and imaginary element
//! runs.
//!
//! # Padding
//!
//! One to four trailing bytes, each the bitwise complement of the pad
//! count, round the buffer up to a whole number of 32-bit words. The final
//! byte therefore always names the pad length.
//!
//! # Decoding modes
//!
//! [`decode`] reconstructs a value driven purely by the buffer.
//! [`decode_into`] overlays the buffer onto a caller-provided template,
//! validating classes and shapes against it and tolerating record fields
//! that only one side knows (see [`TemplateBounds`]).

mod decode;
mod encode;
mod reader;
mod skip;
mod tag;
mod template;
mod writer;


pub use decode::{decode, decode_with};
pub use encode::{encode, encode_with};
pub use tag::{ClassId, SizeFormat, DEFAULT_SIGNATURE, FORMAT_VERSION, MAX_SIGNATURE};
pub use template::{decode_into, decode_into_with, TemplateBounds};
pub use writer::ByteOrder;
