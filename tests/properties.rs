//! Property-based tests for the testable invariants: round-trip identity,
//! byte-size exactness, document equality as name-map equality, numeric
//! coercion monotonicity, and optional/null symmetry.

use bson_values::{
    bson::Bson,
    codec::{
        primitive::{Int32Handler, StringHandler},
        DocumentReader, DocumentWriter,
    },
    derive::record::{build_reader, build_writer, keyed_field, keyed_field_writer, optional_field},
    document::Document,
};
use proptest::prelude::*;

#[derive(Clone, Debug, PartialEq)]
struct Point {
    x: i32,
    y: i32,
}

fn point_reader() -> impl DocumentReader<Point> {
    build_reader(
        (keyed_field("x", Int32Handler), keyed_field("y", Int32Handler)),
        |(x, y)| Point { x, y },
    )
}

fn point_writer() -> impl DocumentWriter<Point> {
    build_writer((
        keyed_field_writer("x", Int32Handler, |p: &Point| p.x),
        keyed_field_writer("y", Int32Handler, |p: &Point| p.y),
    ))
}

proptest! {
    /// Invariant 1: round-trip identity for a derived record handler.
    #[test]
    fn round_trip_identity_for_derived_records(x in any::<i32>(), y in any::<i32>()) {
        let point = Point { x, y };
        let doc = point_writer().write_document(&point).unwrap();
        prop_assert_eq!(point_reader().read_document(&doc).unwrap(), point);
    }

    /// Invariant 2: a string's byte size is always 5 (length prefix + nul
    /// terminator) plus its UTF-8 byte length.
    #[test]
    fn string_byte_size_matches_wire_formula(s in ".*") {
        let expected = 5 + s.len() as i32;
        prop_assert_eq!(Bson::String(s).byte_size(), expected);
    }

    /// Invariant 2: an array's byte size accounts for every element's own
    /// byte size plus its type tag and stringified-index cstring name.
    #[test]
    fn array_byte_size_accounts_for_every_element(values in proptest::collection::vec(any::<i32>(), 0..8)) {
        let arr: Vec<Bson> = values.iter().copied().map(Bson::Int32).collect();
        let expected: i32 = 5 + arr
            .iter()
            .enumerate()
            .map(|(i, v)| 1 + i.to_string().len() as i32 + 1 + v.byte_size())
            .sum::<i32>();
        prop_assert_eq!(Bson::Array(arr).byte_size(), expected);
    }

    /// Invariant 3: two documents built from the same name->value pairs in
    /// different orders compare equal.
    #[test]
    fn document_equality_ignores_element_order(a in any::<i32>(), b in any::<i32>()) {
        let forward = Document::new().append("a", a).append("b", b);
        let backward = Document::new().append("b", b).append("a", a);
        prop_assert_eq!(forward, backward);
    }

    /// Invariant 4: a whole number within `i32` range encoded as Int32,
    /// Int64, or Double all coerce back to the same `i32`.
    #[test]
    fn numeric_coercion_agrees_across_whole_number_representations(n in any::<i32>()) {
        let as_i32 = Bson::Int32(n).to_i32_exact();
        let as_i64 = Bson::Int64(i64::from(n)).to_i32_exact();
        let as_double = Bson::Double(f64::from(n)).to_i32_exact();
        prop_assert_eq!(as_i32, Some(n));
        prop_assert_eq!(as_i64, Some(n));
        prop_assert_eq!(as_double, Some(n));
    }

    /// Invariant 5: an optional field decodes to `None` from an absent key
    /// or a `Null`, and to `Some` from any legitimately present value.
    #[test]
    fn optional_field_null_symmetry(value in proptest::option::of(any::<String>())) {
        let reader = build_reader(optional_field("value", StringHandler), |v| v);

        let absent = Document::new();
        prop_assert_eq!(reader.read_document(&absent).unwrap(), None);

        let null = Document::new().append("value", Bson::Null);
        prop_assert_eq!(reader.read_document(&null).unwrap(), None);

        if let Some(s) = value {
            let present = Document::new().append("value", s.clone());
            prop_assert_eq!(reader.read_document(&present).unwrap(), Some(s));
        }
    }
}
