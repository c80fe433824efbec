use alloc::{string::ToString, vec, vec::Vec};

use rstest::rstest;

use crate::{
    NumberKind, OwnedValue, ParserOptions, Value, ValueKind, parse, parse_with_options,
};

fn strict() -> ParserOptions {
    ParserOptions {
        panic_on_error: true,
        ..ParserOptions::default()
    }
}

fn owned(input: &str) -> OwnedValue {
    parse_with_options(input.as_bytes(), strict())
        .unwrap()
        .root()
        .to_owned_value()
}

fn nested_arrays(depth: usize) -> Vec<u8> {
    let mut input = vec![b'['; depth];
    input.extend(core::iter::repeat_n(b']', depth));
    input
}

#[test]
fn parses_reference_document() {
    let doc = parse_with_options(br#"{"a":1,"b":[2,3,{"c":null}]}"#, strict()).unwrap();
    let root = doc.root().as_object().unwrap();

    let keys: Vec<&str> = root.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, ["a", "b"]);
    assert_eq!(root.get("a").unwrap().as_number().unwrap().as_u64(), Some(1));

    let b = root.get("b").unwrap().as_array().unwrap();
    assert_eq!(b.len(), 3);
    assert_eq!(b.get(0).unwrap().as_number().unwrap().lexeme(), "2");
    assert_eq!(b.get(1).unwrap().as_number().unwrap().lexeme(), "3");
    let c = b.get(2).unwrap().as_object().unwrap();
    assert_eq!(c.len(), 1);
    assert_eq!(c.key(0), Some("c"));
    assert!(c.get("c").unwrap().is_null());

    assert_eq!(doc.value_count(), 7);
    assert_eq!(doc.end_offset(), 28);
}

#[test]
fn index_accessors_agree_with_views() {
    let doc = parse(br#"{"xs":[true,false],"s":"hi"}"#).unwrap();
    let Value::Object(root) = doc.root().value() else {
        panic!("expected object root");
    };
    assert_eq!(doc.object_len(root), 2);
    assert_eq!(doc.object_key(root, 1), Some("s"));
    assert_eq!(doc.object_key(root, 2), None);

    let xs = doc.object_value(root, 0).unwrap();
    let Some(Value::Array(xs)) = doc.value(xs) else {
        panic!("expected array");
    };
    assert_eq!(doc.array_len(xs), 2);
    let second = doc.array_element(xs, 1).unwrap();
    assert_eq!(doc.value(second), Some(Value::Bool(false)));
    assert_eq!(doc.array_element(xs, 2), None);

    let s = doc.object_value(root, 1).unwrap();
    let Some(Value::String(s)) = doc.value(s) else {
        panic!("expected string");
    };
    assert_eq!(doc.str(s), Some("hi"));
    assert_eq!(s.len(), 2);
}

#[test]
fn children_precede_their_container() {
    let doc = parse(br#"[[1,[2]],{"k":[3]}]"#).unwrap();
    let mut pending = vec![doc.root()];
    let mut visited = 0;
    while let Some(value) = pending.pop() {
        visited += 1;
        let children: Vec<_> = match value.kind() {
            ValueKind::Array => value.as_array().unwrap().iter().collect(),
            ValueKind::Object => value.as_object().unwrap().iter().map(|(_, v)| v).collect(),
            _ => continue,
        };
        for child in children {
            assert!(child.index() < value.index());
            pending.push(child);
        }
    }
    assert_eq!(visited, doc.value_count());
    assert_eq!(doc.root_index().index(), doc.value_count() - 1);
}

#[rstest]
#[case::empty_object("{}", OwnedValue::Object(vec![]))]
#[case::empty_array("[]", OwnedValue::Array(vec![]))]
#[case::padded_empty_object(" { \n } ", OwnedValue::Object(vec![]))]
#[case::padded_empty_array("[\t\r\n]", OwnedValue::Array(vec![]))]
#[case::nested_empties("[[],{}]", OwnedValue::Array(vec![OwnedValue::Array(vec![]), OwnedValue::Object(vec![])]))]
fn empty_containers(#[case] input: &str, #[case] expected: OwnedValue) {
    assert_eq!(owned(input), expected);
}

#[rstest]
#[case::null("null", OwnedValue::Null)]
#[case::true_("true", OwnedValue::Boolean(true))]
#[case::false_(" false ", OwnedValue::Boolean(false))]
#[case::string("\"hello\"", OwnedValue::from("hello"))]
#[case::integer("42", OwnedValue::from(42_u64))]
#[case::negative("-7", OwnedValue::from(-7_i64))]
fn top_level_scalars(#[case] input: &str, #[case] expected: OwnedValue) {
    assert_eq!(owned(input), expected);
}

#[rstest]
#[case::quote(r#""\"""#, "\"")]
#[case::backslash(r#""\\""#, "\\")]
#[case::solidus(r#""\/""#, "/")]
#[case::controls(r#""\b\f\n\r\t""#, "\u{8}\u{c}\n\r\t")]
#[case::bmp(r#""\u00e9t\u00e9""#, "été")]
#[case::surrogate_pair(r#""\ud83d\ude00""#, "😀")]
#[case::nul(r#""a\u0000b""#, "a\0b")]
#[case::raw_utf8("\"añ😀\"", "añ😀")]
#[case::mixed(r#""x\ty\"z""#, "x\ty\"z")]
fn string_escapes(#[case] input: &str, #[case] expected: &str) {
    let doc = parse_with_options(input.as_bytes(), strict()).unwrap();
    assert_eq!(doc.root().as_str(), Some(expected));
}

#[rstest]
#[case("0", NumberKind::Integer)]
#[case("-0", NumberKind::Integer)]
#[case("123456789012345678901234567890", NumberKind::Integer)]
#[case("0.5", NumberKind::Float)]
#[case("-12.5e3", NumberKind::Float)]
#[case("1E+2", NumberKind::Float)]
#[case("1e-2", NumberKind::Float)]
fn numbers_keep_their_lexeme(#[case] input: &str, #[case] kind: NumberKind) {
    let doc = parse_with_options(input.as_bytes(), strict()).unwrap();
    let n = doc.root().as_number().unwrap();
    assert_eq!(n.lexeme(), input);
    assert_eq!(n.kind(), kind);
}

#[test]
fn number_conversions() {
    let doc = parse(b"[18446744073709551615, -9223372036854775808, 2.5, 1e400, 7]").unwrap();
    let xs: Vec<_> = doc
        .root()
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_number().unwrap())
        .collect();

    assert_eq!(xs[0].as_u64(), Some(u64::MAX));
    assert_eq!(xs[0].as_i64(), None);
    assert_eq!(xs[1].as_i64(), Some(i64::MIN));
    assert_eq!(xs[1].as_u64(), None);
    assert_eq!(xs[2].as_i64(), None);
    assert!((xs[2].as_f64() - 2.5).abs() < f64::EPSILON);
    assert_eq!(xs[3].as_f64(), f64::INFINITY);
    assert_eq!(xs[4].as_i64(), Some(7));
    assert!(xs[4].is_integer());
}

#[test]
fn duplicate_keys_are_kept_and_last_wins() {
    let doc = parse(br#"{"k":1,"other":true,"k":2}"#).unwrap();
    let obj = doc.root().as_object().unwrap();
    assert_eq!(obj.len(), 3);
    let keys: Vec<&str> = obj.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, ["k", "other", "k"]);
    assert_eq!(obj.get("k").unwrap().as_number().unwrap().as_u64(), Some(2));
    assert_eq!(obj.get("missing").map(|v| v.kind()), None);
}

#[test]
fn depth_exactly_at_limit_is_accepted() {
    let options = ParserOptions {
        max_depth: 5,
        ..strict()
    };
    let doc = parse_with_options(&nested_arrays(5), options).unwrap();
    assert_eq!(doc.value_count(), 5);

    let default_limit = nested_arrays(crate::DEFAULT_MAX_DEPTH);
    parse_with_options(&default_limit, strict()).unwrap();
}

#[test]
fn deep_nesting_does_not_recurse() {
    let depth = if cfg!(miri) { 64 } else { 100_000 };
    let options = ParserOptions {
        max_depth: depth,
        ..strict()
    };
    let input = nested_arrays(depth);
    let doc = parse_with_options(&input, options).unwrap();
    assert_eq!(doc.value_count(), depth);
    assert_eq!(doc.end_offset(), input.len());
}

#[test]
fn deep_documents_format_without_recursing() {
    let depth = if cfg!(miri) { 64 } else { 100_000 };
    let options = ParserOptions {
        max_depth: depth,
        ..strict()
    };
    let input = nested_arrays(depth);
    let doc = parse_with_options(&input, options).unwrap();

    let debug = alloc::format!("{doc:?}");
    assert!(debug.contains("root_kind: Array"), "{debug}");
    assert!(debug.contains(&alloc::format!("values: {depth}")), "{debug}");
    assert_eq!(doc.to_string().as_bytes(), input.as_slice());
}

#[test]
fn document_display_matches_owned_rendering() {
    let input = r#" {"s":"tab\there \"q\" \/","n":[1.50,-0,{"k":null,"k":true}],"e":{},"a":[]} "#;
    let doc = parse_with_options(input.as_bytes(), strict()).unwrap();
    let rendered = doc.to_string();
    assert_eq!(rendered, doc.root().to_owned_value().to_string());
    assert_eq!(
        rendered,
        r#"{"s":"tab\there \"q\" /","n":[1.50,-0,{"k":null,"k":true}],"e":{},"a":[]}"#
    );
}

#[test]
fn foreign_string_refs_resolve_to_none() {
    let long = parse(br#""a string from another document""#).unwrap();
    let short = parse(br#"["x"]"#).unwrap();
    let Value::String(s) = long.root().value() else {
        panic!("expected string root");
    };
    assert_eq!(long.str(s), Some("a string from another document"));
    assert_eq!(short.str(s), None);

    // 0..1 splits the two-byte `é` held by the other document
    let ascii = parse(br#""a""#).unwrap();
    let accented = parse("\"é\"".as_bytes()).unwrap();
    let Value::String(a) = ascii.root().value() else {
        panic!("expected string root");
    };
    assert_eq!(accented.str(a), None);
}

#[test]
fn zero_depth_still_accepts_scalars() {
    let options = ParserOptions {
        max_depth: 0,
        ..strict()
    };
    let doc = parse_with_options(b"\"flat\"", options).unwrap();
    assert_eq!(doc.root().as_str(), Some("flat"));
}

#[test]
fn value_limit_counts_containers() {
    let options = ParserOptions {
        max_values: 3,
        ..strict()
    };
    let doc = parse_with_options(b"[1,2]", options).unwrap();
    assert_eq!(doc.value_count(), 3);
}

#[test]
fn trailing_content_allowed_when_configured() {
    let options = ParserOptions {
        allow_trailing_content: true,
        ..strict()
    };
    let input = br#"{"a":1} garbage"#;
    let doc = parse_with_options(input, options).unwrap();
    assert_eq!(doc.end_offset(), 7);
    assert_eq!(&input[doc.end_offset()..], b" garbage");
    assert_eq!(
        doc.root().to_owned_value(),
        OwnedValue::Object(vec![("a".to_string(), OwnedValue::from(1_u64))])
    );
}

#[test]
fn surrounding_whitespace_is_ignored() {
    let doc = parse_with_options(b" \t\r\n[ 1 , \"a\" ]\n\n", strict()).unwrap();
    assert_eq!(doc.end_offset(), 15);
    assert_eq!(doc.root().to_owned_value().to_string(), r#"[1,"a"]"#);
}

#[test]
fn canonical_rendering_reparses_to_same_tree() {
    let input = r#" { "name" : "jasn\n" , "list" : [ 1.50 , -0 , 2e10 , null ] , "name" : {} } "#;
    let first = owned(input);
    let rendered = first.to_string();
    assert_eq!(
        rendered,
        r#"{"name":"jasn\n","list":[1.50,-0,2e10,null],"name":{}}"#
    );
    assert_eq!(owned(&rendered), first);
}

#[test]
fn debug_output_shows_structure() {
    let doc = parse(br#"{"a":[1,"x",null]}"#).unwrap();
    assert_eq!(
        alloc::format!("{:?}", doc.root()),
        r#"{"a": [Number("1"), String("x"), Null]}"#
    );
}
