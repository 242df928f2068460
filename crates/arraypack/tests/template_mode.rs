//! Integration tests for template-guided decoding and record evolution.

#![allow(clippy::unwrap_used)]

use arraypack::{
    decode_into, decode_into_with, encode, encode_with, ByteOrder, CellArray, CharArray,
    CodecError, Shape, StructArray, TemplateBounds, Value, DEFAULT_SIGNATURE,
};

fn scalar_record(fields: &[(&str, f64)]) -> Value {
    let mut record = StructArray::scalar();
    for &(name, v) in fields {
        record = record.with_field(name, vec![v.into()]).unwrap();
    }
    Value::Struct(record)
}

#[test]
fn matching_record_overlays_all_fields() {
    let bytes = encode(&scalar_record(&[("x", 1.0), ("y", 2.0)])).unwrap();
    let mut template = scalar_record(&[("x", 0.0), ("y", 0.0)]);
    decode_into(&bytes, &mut template).unwrap();
    assert_eq!(template, scalar_record(&[("x", 1.0), ("y", 2.0)]));
}

#[test]
fn producer_superset_fields_are_skipped() {
    // The producer grew a field the consumer does not know.
    let bytes = encode(&scalar_record(&[("x", 1.0), ("added", 99.0), ("y", 2.0)])).unwrap();
    let mut template = scalar_record(&[("x", 0.0), ("y", 0.0)]);
    decode_into(&bytes, &mut template).unwrap();
    assert_eq!(template, scalar_record(&[("x", 1.0), ("y", 2.0)]));
}

#[test]
fn consumer_superset_fields_are_untouched() {
    // The consumer knows a field the producer no longer sends.
    let bytes = encode(&scalar_record(&[("x", 1.0)])).unwrap();
    let mut template = scalar_record(&[("x", 0.0), ("retired", 7.0)]);
    decode_into(&bytes, &mut template).unwrap();
    assert_eq!(template, scalar_record(&[("x", 1.0), ("retired", 7.0)]));
}

#[test]
fn reordered_fields_match_by_name() {
    let bytes = encode(&scalar_record(&[("b", 2.0), ("a", 1.0)])).unwrap();
    let mut template = scalar_record(&[("a", 0.0), ("b", 0.0)]);
    decode_into(&bytes, &mut template).unwrap();
    assert_eq!(template, scalar_record(&[("a", 1.0), ("b", 2.0)]));
}

#[test]
fn disjoint_fields_are_invalid() {
    let bytes = encode(&scalar_record(&[("p", 1.0)])).unwrap();
    let mut template = scalar_record(&[("q", 0.0)]);
    assert_eq!(
        decode_into(&bytes, &mut template).unwrap_err(),
        CodecError::InvalidStruct
    );
}

#[test]
fn fieldless_record_matches_fieldless_template() {
    let bytes = encode(&Value::Struct(StructArray::scalar())).unwrap();
    let mut template = Value::Struct(StructArray::scalar());
    decode_into(&bytes, &mut template).unwrap();
    assert_eq!(template, Value::Struct(StructArray::scalar()));

    // A producer with fields cannot land in a fieldless template.
    let bytes = encode(&scalar_record(&[("x", 1.0)])).unwrap();
    let mut template = Value::Struct(StructArray::scalar());
    assert_eq!(
        decode_into(&bytes, &mut template).unwrap_err(),
        CodecError::InvalidStruct
    );
}

#[test]
fn empty_record_template_is_rejected() {
    let bytes = encode(&scalar_record(&[("x", 1.0)])).unwrap();
    let mut template = Value::Struct(
        StructArray::new(Shape::empty()).with_field("x", vec![]).unwrap(),
    );
    assert_eq!(
        decode_into(&bytes, &mut template).unwrap_err(),
        CodecError::EmptyValue
    );
}

#[test]
fn vector_record_overlays_every_element() {
    let record = StructArray::new(Shape::row(3).unwrap())
        .with_field("v", vec![1.0f64.into(), 2.0f64.into(), 3.0f64.into()])
        .unwrap();
    let bytes = encode(&Value::Struct(record.clone())).unwrap();

    // A row-category template; one element would mean scalar.
    let template_record = StructArray::new(Shape::row(2).unwrap())
        .with_field("v", vec![0.0f64.into(), 0.0f64.into()])
        .unwrap()
        .with_field("legacy", vec![5u8.into(), 5u8.into()])
        .unwrap();
    let mut template = Value::Struct(template_record);
    decode_into(&bytes, &mut template).unwrap();

    let got = template.as_struct().unwrap();
    assert_eq!(got.shape().dims(), &[1, 3]);
    assert_eq!(
        got.field("v").unwrap().values(),
        &[1.0f64.into(), 2.0f64.into(), 3.0f64.into()]
    );
    // The unmatched field keeps its template value in every element.
    assert_eq!(
        got.field("legacy").unwrap().values(),
        &[5u8.into(), 5u8.into(), 5u8.into()]
    );
}

#[test]
fn nested_record_fields_decode_against_their_templates() {
    let inner = scalar_record(&[("gain", 0.25)]);
    let outer = StructArray::scalar()
        .with_field("cfg", vec![inner])
        .unwrap()
        .with_field("seq", vec![4u32.into()])
        .unwrap();
    let bytes = encode(&Value::Struct(outer.clone())).unwrap();

    let inner_template = scalar_record(&[("gain", 0.0)]);
    let mut template = Value::Struct(
        StructArray::scalar()
            .with_field("cfg", vec![inner_template])
            .unwrap()
            .with_field("seq", vec![0u32.into()])
            .unwrap(),
    );
    decode_into(&bytes, &mut template).unwrap();
    assert_eq!(template, Value::Struct(outer));
}

#[test]
fn aggregate_bound_applies_to_records() {
    let record = StructArray::new(Shape::row(3).unwrap())
        .with_field("v", vec![1u8.into(), 2u8.into(), 3u8.into()])
        .unwrap();
    let bytes = encode(&Value::Struct(record)).unwrap();

    let mut template = Value::Struct(
        StructArray::new(Shape::row(1).unwrap())
            .with_field("v", vec![0u8.into()])
            .unwrap(),
    );
    let bounds = TemplateBounds::new(4096, 2);
    assert_eq!(
        decode_into_with(&bytes, DEFAULT_SIGNATURE, &mut template, bounds).unwrap_err(),
        CodecError::NumelLimit
    );
}

#[test]
fn homogeneous_cell_bound_and_overlay() {
    let cell = Value::Cell(
        CellArray::row((0..5).map(|i| Value::from(f64::from(i))).collect()).unwrap(),
    );
    let bytes = encode(&cell).unwrap();

    let mut template =
        Value::Cell(CellArray::row(vec![0.0f64.into(), 0.0f64.into()]).unwrap());
    decode_into(&bytes, &mut template).unwrap();
    assert_eq!(template, cell);

    let mut template =
        Value::Cell(CellArray::row(vec![0.0f64.into(), 0.0f64.into()]).unwrap());
    let bounds = TemplateBounds::new(4096, 4);
    assert_eq!(
        decode_into_with(&bytes, DEFAULT_SIGNATURE, &mut template, bounds).unwrap_err(),
        CodecError::NumelLimit
    );
}

#[test]
fn skipped_fields_may_hold_any_class() {
    // The unknown field carries a nested cell of mixed values; the skip
    // walker must advance past all of it.
    let unknown = Value::Cell(
        CellArray::row(vec![
            Value::Char(CharArray::from_text("meta").unwrap()),
            Value::from(true),
            scalar_record(&[("deep", 8.0)]),
        ])
        .unwrap(),
    );
    let produced = StructArray::scalar()
        .with_field("noise", vec![unknown])
        .unwrap()
        .with_field("x", vec![3.5f64.into()])
        .unwrap();
    let bytes = encode(&Value::Struct(produced)).unwrap();

    let mut template = scalar_record(&[("x", 0.0)]);
    decode_into(&bytes, &mut template).unwrap();
    assert_eq!(template, scalar_record(&[("x", 3.5)]));
}

#[test]
fn template_mode_works_from_either_byte_order() {
    let value = scalar_record(&[("x", -12.5)]);
    for order in [ByteOrder::Little, ByteOrder::Big] {
        let bytes = encode_with(&value, DEFAULT_SIGNATURE, order).unwrap();
        let mut template = scalar_record(&[("x", 0.0)]);
        decode_into(&bytes, &mut template).unwrap();
        assert_eq!(template, value, "order {order:?}");
    }
}

#[test]
fn char_template_accepts_both_widths() {
    // Two placeholder characters make this a row template, not a scalar.
    let mut template = Value::Char(CharArray::from_text("  ").unwrap());
    let bytes = encode(&Value::Char(CharArray::from_text("wide \u{0416}").unwrap())).unwrap();
    decode_into(&bytes, &mut template).unwrap();
    assert_eq!(template.as_char().unwrap().to_text(), "wide \u{0416}");

    let bytes = encode(&Value::Char(CharArray::from_text("narrow").unwrap())).unwrap();
    decode_into(&bytes, &mut template).unwrap();
    assert_eq!(template.as_char().unwrap().to_text(), "narrow");
}

#[test]
fn numeric_template_mismatch_reports_class() {
    let bytes = encode(&Value::from(1u8)).unwrap();
    let mut template: Value = 0i8.into();
    assert_eq!(
        decode_into(&bytes, &mut template).unwrap_err(),
        CodecError::ClassMismatch
    );
}

#[test]
fn partially_overlaid_template_on_error() {
    // First field decodes, then the buffer ends in a field the template
    // types differently, leaving the first overlay in place.
    let produced = StructArray::scalar()
        .with_field("a", vec![6.0f64.into()])
        .unwrap()
        .with_field("b", vec![1u8.into()])
        .unwrap();
    let bytes = encode(&Value::Struct(produced)).unwrap();

    let mut template = Value::Struct(
        StructArray::scalar()
            .with_field("a", vec![0.0f64.into()])
            .unwrap()
            .with_field("b", vec![0i16.into()])
            .unwrap(),
    );
    assert_eq!(
        decode_into(&bytes, &mut template).unwrap_err(),
        CodecError::ClassMismatch
    );
    let got = template.as_struct().unwrap();
    assert_eq!(got.field("a").unwrap().values(), &[6.0f64.into()]);
}
