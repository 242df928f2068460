//! Error types for the codec.

use thiserror::Error;

/// Errors produced while building values, encoding, or decoding.
///
/// Every variant carries a stable, wire-visible identifier (see
/// [`CodecError::identifier`]) so that peers written in other languages can
/// report the same condition under the same name.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    /// The buffer is empty, too short, or its length is not a multiple of
    /// four bytes.
    #[error("buffer is empty or not a whole number of four-byte words")]
    InvalidBuf,

    /// The trailing padding bytes are inconsistent with the padding marker.
    #[error("malformed trailing padding")]
    InvalidPad,

    /// The signature word does not match the expected application signature
    /// and format version, or a supplied signature byte is out of range.
    #[error("signature mismatch or signature byte out of range")]
    InvalidSig,

    /// A tag byte carries a class code outside the supported range.
    #[error("tag byte carries an unknown class code")]
    InvalidTag,

    /// A record's field table is malformed: a name is empty, longer than
    /// [`MAX_FIELD_NAME_LEN`](crate::types::MAX_FIELD_NAME_LEN) bytes, not
    /// representable in 8-bit characters, duplicated, or no buffer field
    /// matched the template.
    #[error("malformed or unmatched record fields")]
    InvalidStruct,

    /// A shape carries more dimensions than the format can express, or a
    /// multi-dimensional value was offered to the 2-D template decoder.
    #[error("dimension count outside the supported range")]
    NdimsLimit,

    /// An element count, dimension, or template bound was exceeded.
    #[error("element count or dimension exceeds the supported limit")]
    NumelLimit,

    /// The encoded output would exceed the maximum buffer length.
    #[error("encoded buffer would exceed the maximum length")]
    BufLimit,

    /// The decoded class does not match the class required by the template.
    #[error("decoded class does not match the template class")]
    ClassMismatch,

    /// Array lengths are inconsistent, or a decoded element count cannot be
    /// reconciled with the template's shape.
    #[error("array size incompatible with the expected shape")]
    SizeMismatch,

    /// The template slot is empty and offers no element to decode against.
    #[error("template value is empty")]
    EmptyValue,

    /// Wide (16-bit) character data reached a receiver without wide
    /// character support. Kept for wire compatibility; this implementation
    /// always accepts wide characters.
    #[error("16-bit character data is not supported by the receiver")]
    UnicodeChar,

    /// A class code is recognized by the format but carries no decode rule
    /// in the receiving build. Kept for wire compatibility; this
    /// implementation handles all classes.
    #[error("value class is not supported")]
    UnsupportedClass,

    /// A byte-order selector was not one of `native`, `little`, or `big`.
    #[error("unrecognized byte-order selector")]
    InvalidByteOrder,

    /// The buffer violates the format's structural rules: truncated payload,
    /// inconsistent nested classes, or trailing bytes after the value.
    #[error("buffer structure is corrupt")]
    CorruptBuf,
}

impl CodecError {
    /// Returns the stable identifier shared with implementations in other
    /// languages.
    #[must_use]
    pub const fn identifier(self) -> &'static str {
        match self {
            Self::InvalidBuf => "invalidBuf",
            Self::InvalidPad => "invalidPad",
            Self::InvalidSig => "invalidSig",
            Self::InvalidTag => "invalidTag",
            Self::InvalidStruct => "invalidStruct",
            Self::NdimsLimit => "ndimsLimit",
            Self::NumelLimit => "numelLimit",
            Self::BufLimit => "bufLimit",
            Self::ClassMismatch => "classMismatch",
            Self::SizeMismatch => "sizeMismatch",
            Self::EmptyValue => "emptyValue",
            Self::UnicodeChar => "unicodeChar",
            Self::UnsupportedClass => "unsupportedClass",
            Self::InvalidByteOrder => "invalidByteOrder",
            Self::CorruptBuf => "corruptBuf",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_are_stable() {
        assert_eq!(CodecError::InvalidBuf.identifier(), "invalidBuf");
        assert_eq!(CodecError::CorruptBuf.identifier(), "corruptBuf");
        assert_eq!(CodecError::NdimsLimit.identifier(), "ndimsLimit");
        assert_eq!(CodecError::UnicodeChar.identifier(), "unicodeChar");
    }

    #[test]
    fn display_is_human_readable() {
        let msg = CodecError::InvalidPad.to_string();
        assert!(msg.contains("padding"));
    }
}
