//! Byte-exact integration tests for the wire format.

#![allow(clippy::unwrap_used)]

use arraypack::{
    decode, decode_with, encode, encode_with, ByteOrder, CellArray, CharArray, CodecError,
    NumericArray, NumericData, Shape, SparseArray, SparseData, StructArray, Value,
    DEFAULT_SIGNATURE,
};

#[test]
fn scalar_f64_encodes_to_twelve_bytes() {
    let bytes = encode_with(&0.0f64.into(), DEFAULT_SIGNATURE, ByteOrder::Little).unwrap();
    assert_eq!(bytes.len(), 12);
    // Signature, scalar float64 tag, eight zero bytes, one pad byte.
    assert_eq!(bytes[..3], [0x2A, 0xF0, 0x01]);
    assert_eq!(bytes[11], 0xFE);
    assert_eq!(decode(&bytes).unwrap(), 0.0f64.into());
}

#[test]
fn normalized_empty_encodes_to_four_bytes() {
    let empty = Value::Numeric(NumericArray::new(Shape::empty(), Vec::<f64>::new()).unwrap());
    let bytes = encode_with(&empty, DEFAULT_SIGNATURE, ByteOrder::Little).unwrap();
    assert_eq!(bytes, [0x2A, 0xF0, 0x81, 0xFE]);

    let back = decode(&bytes).unwrap();
    let array = back.as_numeric().unwrap();
    assert!(array.shape().is_normalized_empty());
    assert_eq!(array.data(), &NumericData::F64(vec![]));
}

#[test]
fn u8_row_encodes_to_eight_bytes() {
    let row = Value::Numeric(NumericArray::row(vec![10u8, 20, 30]).unwrap());
    let bytes = encode_with(&row, DEFAULT_SIGNATURE, ByteOrder::Little).unwrap();
    assert_eq!(bytes, [0x2A, 0xF0, 0x44, 3, 10, 20, 30, 0xFE]);
    assert_eq!(decode(&bytes).unwrap(), row);
}

#[test]
fn two_field_record_layout() {
    let record = StructArray::scalar()
        .with_field("a", vec![1.0f64.into()])
        .unwrap()
        .with_field("b", vec![2.0f64.into()])
        .unwrap();
    let value = Value::Struct(record);
    let bytes = encode_with(&value, DEFAULT_SIGNATURE, ByteOrder::Little).unwrap();

    // signature(2) + struct tag(1) + name cell [tag(1) + count(1)
    // + 2 * (char8 row tag(1) + len(1) + name(1))] + 2 * (scalar f64
    // tag(1) + 8) + padding(3)
    assert_eq!(bytes.len(), 32);
    let expected_prefix = [
        0x2A, 0xF0, // signature
        0x0F, // struct, scalar
        0x4E, 2,    // cell, row of 2
        0x4C, 1, b'a', // "a"
        0x4C, 1, b'b', // "b"
        0x01, // float64 scalar for field a
    ];
    assert_eq!(&bytes[..expected_prefix.len()], &expected_prefix);
    assert_eq!(decode(&bytes).unwrap(), value);
}

#[test]
fn sparse_index_uses_narrowest_width() {
    let sparse = SparseArray::new(
        Shape::matrix(255, 255).unwrap(),
        vec![255],
        SparseData::Real(vec![1.0]),
    )
    .unwrap();
    let bytes = encode_with(&Value::Sparse(sparse), DEFAULT_SIGNATURE, ByteOrder::Little).unwrap();

    // sparse tag in matrix form with both extents of 255, then a scalar
    // uint8 index of 0xFF, then a scalar float64 value.
    assert_eq!(&bytes[2..7], &[0x70, 255, 255, 0x04, 0xFF]);
    assert_eq!(bytes[7], 0x01);

    let back = decode(&bytes).unwrap();
    let sparse = back.as_sparse().unwrap();
    assert_eq!(sparse.indices(), &[255]);
    assert_eq!(sparse.data(), &SparseData::Real(vec![1.0]));
    assert_eq!(sparse.shape().dims(), &[255, 255]);
}

#[test]
fn signature_bytes_identify_byte_order() {
    let value: Value = 1.5f64.into();
    let little = encode_with(&value, DEFAULT_SIGNATURE, ByteOrder::Little).unwrap();
    let big = encode_with(&value, DEFAULT_SIGNATURE, ByteOrder::Big).unwrap();

    assert_eq!(&little[..2], &[0x2A, 0xF0]);
    assert_eq!(&big[..2], &[0xF0, 0x2A]);
    assert_ne!(little, big);

    assert_eq!(decode(&little).unwrap(), value);
    assert_eq!(decode(&big).unwrap(), value);
}

#[test]
fn custom_signature_round_trip() {
    let value: Value = 9u64.into();
    let bytes = encode_with(&value, 17, ByteOrder::Native).unwrap();
    assert_eq!(decode_with(&bytes, 17).unwrap(), value);
    assert_eq!(decode(&bytes).unwrap_err(), CodecError::InvalidSig);
}

#[test]
fn whole_universe_round_trip() {
    let record = StructArray::new(Shape::row(2).unwrap())
        .with_field("gain", vec![0.5f64.into(), 2.0f64.into()])
        .unwrap()
        .with_field(
            "label",
            vec![
                Value::Char(CharArray::from_text("lo").unwrap()),
                Value::Char(CharArray::from_text("hi").unwrap()),
            ],
        )
        .unwrap();

    let sparse = SparseArray::new(
        Shape::column(1000).unwrap(),
        vec![1, 999],
        SparseData::Complex { re: vec![1.0, 0.0], im: vec![0.0, -4.5] },
    )
    .unwrap();

    let value = Value::Cell(
        CellArray::row(vec![
            Value::Struct(record),
            Value::Sparse(sparse),
            Value::Numeric(
                NumericArray::new(Shape::from_dims(vec![2, 3, 2]).unwrap(), vec![0i8; 12])
                    .unwrap(),
            ),
            Value::Bool(arraypack::BoolArray::row(vec![true, false, true]).unwrap()),
            Value::Char(CharArray::from_text("\u{0416}uk").unwrap()),
        ])
        .unwrap(),
    );

    for order in [ByteOrder::Native, ByteOrder::Little, ByteOrder::Big] {
        let bytes = encode_with(&value, DEFAULT_SIGNATURE, order).unwrap();
        assert_eq!(bytes.len() % 4, 0);
        assert_eq!(decode(&bytes).unwrap(), value, "order {order:?}");
    }
}

#[test]
fn char16_payload_width() {
    let text = Value::Char(CharArray::from_text("\u{0416}a").unwrap());
    let bytes = encode_with(&text, DEFAULT_SIGNATURE, ByteOrder::Little).unwrap();
    // char16 row of 2: tag, count, then two 2-byte units.
    assert_eq!(&bytes[2..8], &[0x4D, 2, 0x16, 0x04, b'a', 0x00]);

    let big = encode_with(&text, DEFAULT_SIGNATURE, ByteOrder::Big).unwrap();
    assert_eq!(&big[2..8], &[0x4D, 2, 0x04, 0x16, 0x00, b'a']);
}

#[test]
fn wide_dimension_uses_sixteen_bit_prefix() {
    let v = Value::Numeric(NumericArray::row(vec![7u8; 300]).unwrap());
    let bytes = encode_with(&v, DEFAULT_SIGNATURE, ByteOrder::Little).unwrap();
    assert_eq!(&bytes[2..8], &[0xC4, 2, 1, 0, 44, 1]);
    assert_eq!(decode(&bytes).unwrap(), v);
}

#[test]
fn empty_record_round_trip() {
    let value = Value::Struct(StructArray::scalar());
    let bytes = encode(&value).unwrap();
    assert_eq!(decode(&bytes).unwrap(), value);
}

#[test]
fn oversized_dimension_is_rejected() {
    // General 32-bit form declaring a dimension beyond i32::MAX.
    let bytes = [
        0x2A, 0xF0, // signature, little-endian
        0xE4, 2,    // uint8, general u32 dims, ndims 2
        0xFF, 0xFF, 0xFF, 0xFF, // dim 0
        0x02, 0x00, 0x00, 0x00, // dim 1
        0xFB, 0xFB, 0xFB, 0xFB, // padding
    ];
    assert_eq!(decode(&bytes).unwrap_err(), CodecError::NumelLimit);
}

#[test]
fn oversized_element_count_is_rejected() {
    // Each dimension fits, but the product does not.
    let bytes = [
        0x2A, 0xF0, 0xE4, 2, // uint8, general u32 dims, ndims 2
        0x00, 0x00, 0x01, 0x00, // dim 0 = 65536
        0x00, 0x00, 0x01, 0x00, // dim 1 = 65536
        0xFB, 0xFB, 0xFB, 0xFB,
    ];
    assert_eq!(decode(&bytes).unwrap_err(), CodecError::NumelLimit);
}

#[test]
fn decoder_rejects_tampered_padding() {
    let mut bytes = encode(&Value::from(5u8)).unwrap();
    let last = bytes.len() - 1;
    bytes[last] = 0x00;
    assert_eq!(decode(&bytes).unwrap_err(), CodecError::InvalidPad);
}
