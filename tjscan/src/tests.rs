//! Integration tests exercising the scenario table and invariants
//! (spec.md §8) end to end through [`crate::parse_str`].

extern crate alloc;

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec;

use jschema::{ArrayState, RecordType, Type, Value};

use crate::{parse_str, ErrorKind, ParserConfig};

fn cfg() -> ParserConfig {
    ParserConfig::default()
}

fn field(name: &str, ty: Type, required: bool) -> (String, Type, bool) {
    (String::from(name), ty, required)
}

// S1: {"a":1,"b":"x"} against record { int a; string b; }
#[test]
fn s1_record_of_scalars() {
    let target = Type::record(RecordType::new(
        "pkg",
        "R",
        vec![field("a", Type::Int, true), field("b", Type::String, true)],
        None,
        true,
        false,
    ));
    let value = parse_str(r#"{"a":1,"b":"x"}"#, &target, cfg()).unwrap();
    let map = value.as_map().unwrap();
    assert_eq!(map.get("a"), Some(&Value::Int(1)));
    assert_eq!(map.get("b"), Some(&Value::Str(String::from("x"))));
}

// S2: [1, "two", true] against a (int, string, boolean) tuple
#[test]
fn s2_tuple_of_mixed_types() {
    let target = Type::tuple(vec![Type::Int, Type::String, Type::Boolean], None);
    let value = parse_str(r#"[1, "two", true]"#, &target, cfg()).unwrap();
    let list = value.as_list().unwrap();
    assert_eq!(list.get(0), Some(&Value::Int(1)));
    assert_eq!(list.get(1), Some(&Value::Str(String::from("two"))));
    assert_eq!(list.get(2), Some(&Value::Bool(true)));
}

// S3: {"k":"v"} against a sealed record with no field named "k"
#[test]
fn s3_unknown_field_on_sealed_record_errors() {
    let target = Type::record(RecordType::new(
        "pkg",
        "R",
        vec![field("k", Type::Int, false)],
        None,
        true,
        false,
    ));
    let err = parse_str(r#"{"k":"v"}"#, &target, cfg()).unwrap_err();
    // "k" is declared, so the sealed-record rejection doesn't trigger here;
    // the mismatch instead surfaces once the string value is attached
    // against an int field.
    assert!(matches!(err.kind, ErrorKind::StringExpected));
}

#[test]
fn s3_unsealed_field_name_rejected_when_sealed() {
    let target = Type::record(RecordType::new(
        "pkg",
        "R",
        vec![field("k", Type::Int, false)],
        None,
        true,
        false,
    ));
    let err = parse_str(r#"{"other":1}"#, &target, cfg()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::FieldCannotBeAdded { .. }));
}

// S4: {"a":1} against record { int a; int b; } with b required
#[test]
fn s4_missing_required_field_errors() {
    let target = Type::record(RecordType::new(
        "pkg",
        "R",
        vec![field("a", Type::Int, true), field("b", Type::Int, true)],
        None,
        true,
        false,
    ));
    let err = parse_str(r#"{"a":1}"#, &target, cfg()).unwrap_err();
    match err.kind {
        ErrorKind::MissingRequiredField { field, record } => {
            assert_eq!(field, "b");
            assert_eq!(record, "R");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

// S5: {"a":{"x":1}} against a union of a map-holding record and a
// record-holding record; the map-branch wins because it's listed first.
#[test]
fn s5_union_map_branch_wins_when_listed_first() {
    let map_branch = Type::record(RecordType::new(
        "pkg",
        "WithMap",
        vec![field("a", Type::Map(Box::new(Type::Int)), true)],
        None,
        true,
        false,
    ));
    let record_branch = Type::record(RecordType::new(
        "pkg",
        "WithRecord",
        vec![field(
            "a",
            Type::record(RecordType::new(
                "pkg",
                "Inner",
                vec![field("x", Type::Int, true)],
                None,
                true,
                false,
            )),
            true,
        )],
        None,
        true,
        false,
    ));
    let target = Type::Union(vec![map_branch, record_branch]);
    let value = parse_str(r#"{"a":{"x":1}}"#, &target, cfg()).unwrap();
    let record = value.as_map().unwrap();
    assert_eq!(record.identity(), Some(("pkg", "WithMap")));
    let inner = record.get("a").unwrap().as_map().unwrap();
    assert_eq!(inner.get("x"), Some(&Value::Int(1)));
}

#[test]
fn s5_union_falls_through_to_record_branch_when_map_branch_cannot_fit() {
    // Swap the declared order: a record branch with a string field first,
    // then the record-of-record branch; only the second can fit {"x":1}.
    let string_branch = Type::record(RecordType::new(
        "pkg",
        "WithString",
        vec![field("a", Type::String, true)],
        None,
        true,
        false,
    ));
    let record_branch = Type::record(RecordType::new(
        "pkg",
        "WithRecord",
        vec![field(
            "a",
            Type::record(RecordType::new(
                "pkg",
                "Inner",
                vec![field("x", Type::Int, true)],
                None,
                true,
                false,
            )),
            true,
        )],
        None,
        true,
        false,
    ));
    let target = Type::Union(vec![string_branch, record_branch]);
    let value = parse_str(r#"{"a":{"x":1}}"#, &target, cfg()).unwrap();
    let record = value.as_map().unwrap();
    assert_eq!(record.identity(), Some(("pkg", "WithRecord")));
}

// S6: [1,2,3] against int[4] with hasFillerValue=true
#[test]
fn s6_closed_array_with_filler_pads_missing_tail() {
    let target = Type::array(Type::Int, 4, ArrayState::Closed, true);
    let value = parse_str("[1,2,3]", &target, cfg()).unwrap();
    let list = value.as_list().unwrap();
    assert_eq!(list.len(), 4);
    assert_eq!(list.get(3), Some(&Value::Int(0)));
}

// invariant 8: closed array over-supplied with no filler is rejected
#[test]
fn closed_array_over_capacity_without_filler_errors() {
    let target = Type::array(Type::Int, 2, ArrayState::Closed, false);
    let err = parse_str("[1,2,3]", &target, cfg()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ArraySizeNotEnough));
}

// S7: "é" against string
#[test]
fn s7_unicode_escape_decodes_bmp_char() {
    let value = parse_str(r#""é""#, &Type::String, cfg()).unwrap();
    assert_eq!(value, Value::Str(String::from("\u{e9}")));
}

// invariant 9: supplementary character via surrogate pair
#[test]
fn surrogate_pair_decodes_to_supplementary_character() {
    let value = parse_str(r#""😀""#, &Type::String, cfg()).unwrap();
    assert_eq!(value, Value::Str(String::from("\u{1F600}")));
}

#[test]
fn ascii_unicode_escape_matches_plain_ascii() {
    let value = parse_str(r#""A""#, &Type::String, cfg()).unwrap();
    assert_eq!(value, Value::Str(String::from("A")));
}

// invariant 10: `-0` under an explicit decimal target stays decimal; under
// `json` it becomes a double.
#[test]
fn negative_zero_under_json_target_is_float() {
    let value = parse_str("-0", &Type::Json, cfg()).unwrap();
    assert_eq!(value, Value::Float(-0.0));
}

#[test]
fn negative_zero_under_decimal_field_stays_decimal() {
    let target = Type::record(RecordType::new(
        "pkg",
        "R",
        vec![field("d", Type::Decimal, true)],
        None,
        true,
        false,
    ));
    let value = parse_str(r#"{"d":-0}"#, &target, cfg()).unwrap();
    let decimal = value.as_map().unwrap().get("d").unwrap();
    assert!(matches!(decimal, Value::Decimal(_)));
}

// invariant 3 (indirectly): a fresh Parser instance can be reused for a
// second, unrelated parse after an error, since `parse()` resets
// regardless of outcome.
#[test]
fn parser_instance_is_reusable_after_an_error() {
    use crate::parser::embedded_io_adapters_stub::SliceCursor;
    use crate::Parser;

    let bad_target = Type::record(RecordType::new(
        "pkg",
        "R",
        vec![field("a", Type::Int, true), field("b", Type::Int, true)],
        None,
        true,
        false,
    ));
    let mut parser = Parser::new(cfg());
    let mut bad_input = SliceCursor::new(r#"{"a":1}"#.as_bytes());
    assert!(parser.parse(&mut bad_input, &bad_target).is_err());

    let good_target = Type::Int;
    let mut good_input = SliceCursor::new("42".as_bytes());
    let value = parser.parse(&mut good_input, &good_target).unwrap();
    assert_eq!(value, Value::Int(42));
}

// Nested json-typed field stages and parses generically, independent of
// the surrounding record's own declared fields.
#[test]
fn explicit_json_field_accepts_arbitrary_shape() {
    let target = Type::record(RecordType::new(
        "pkg",
        "R",
        vec![field("payload", Type::Json, true)],
        None,
        true,
        false,
    ));
    let value = parse_str(r#"{"payload":{"a":[1,2,"three"]}}"#, &target, cfg()).unwrap();
    let payload = value.as_map().unwrap().get("payload").unwrap();
    let inner = payload.as_map().unwrap().get("a").unwrap();
    let list = inner.as_list().unwrap();
    assert_eq!(list.get(0), Some(&Value::Int(1)));
    assert_eq!(list.get(2), Some(&Value::Str(String::from("three"))));
}

#[test]
fn max_depth_rejects_excess_nesting() {
    let target = Type::Json;
    let mut config = cfg();
    config.max_depth = Some(1);
    let err = parse_str(r#"{"a":{"b":1}}"#, &target, config).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MaxDepthExceeded));
}

// A string value bound to a json-typed field/rest-field is accepted
// (spec.md §4.4: JSON is open-ended and assignable from STRING), matching
// the already-correct ArrayElement path.
#[test]
fn string_into_json_field_is_accepted() {
    let target = Type::record(RecordType::new(
        "pkg",
        "R",
        vec![field("payload", Type::Json, true)],
        None,
        true,
        false,
    ));
    let value = parse_str(r#"{"payload":"hi"}"#, &target, cfg()).unwrap();
    let payload = value.as_map().unwrap().get("payload").unwrap();
    assert_eq!(payload, &Value::Str(String::from("hi")));
}

#[test]
fn string_into_map_of_json_is_accepted() {
    let target = Type::Map(Box::new(Type::Json));
    let value = parse_str(r#"{"k":"v"}"#, &target, cfg()).unwrap();
    assert_eq!(
        value.as_map().unwrap().get("k"),
        Some(&Value::Str(String::from("v")))
    );
}

// A root-level UNION target with a non-string literal tries each member
// in declared order, first success wins (spec.md §4.5 UNION/VALUE).
#[test]
fn root_union_with_non_string_literal_matches_first_member() {
    let target = Type::Union(vec![Type::Int, Type::String]);
    let value = parse_str("42", &target, cfg()).unwrap();
    assert_eq!(value, Value::Int(42));
}

#[test]
fn root_union_with_non_string_literal_falls_through_to_later_member() {
    let target = Type::Union(vec![Type::Boolean, Type::Int]);
    let value = parse_str("42", &target, cfg()).unwrap();
    assert_eq!(value, Value::Int(42));
}

#[test]
fn root_union_with_no_matching_member_errors() {
    let target = Type::Union(vec![Type::Boolean, Type::Null]);
    let err = parse_str("42", &target, cfg()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::NoMatchingType));
}
