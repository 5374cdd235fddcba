//! Reconstruct nested values out of a flat [`ParameterStream`].
//!
//! # Matching rules
//!
//! - A scalar named `name` claims the first unconsumed pair whose key is exactly `name`.
//! - A list named `name` claims, one element at a time, the unconsumed pairs whose key
//!   starts with `name[]`. Once at least one element has been collected, the first
//!   unconsumed pair with a different key ends the list: the members of a list are
//!   expected to be contiguous.
//! - A record named `name` assigns each unconsumed pair whose key starts with
//!   `name[field]` to the first matching field. If that field has already been
//!   populated, the pair belongs to the next record in the enclosing list and the
//!   record is complete.
//!
//! Every pair is consumed at most once, across all the decode calls issued
//! against the same stream.
use std::str::FromStr;

use crate::descriptor::{RecordDescriptor, ScalarKind, TypeDescriptor};
use crate::errors::{DecodeError, InvalidLiteral, UnsupportedSchema};
use crate::key;
use crate::stream::ParameterStream;
use crate::value::{Record, Value};

/// Decode a value with the `descriptor` shape, stored under `name`.
///
/// Scanning starts at `offset`: top-level callers should pass `0`.
///
/// # Example
///
/// ```rust
/// use nestform::{ParameterStream, TypeDescriptor, Value, decode::decode};
///
/// let mut stream: ParameterStream = [("items[]", "1"), ("items[]", "2")].into_iter().collect();
/// let items = decode(&TypeDescriptor::list(TypeDescriptor::int32()), "items", &mut stream, 0)?;
/// assert_eq!(items, Value::List(vec![Value::Int32(1), Value::Int32(2)]));
/// # Ok::<(), nestform::DecodeError>(())
/// ```
pub fn decode(
    descriptor: &TypeDescriptor,
    name: &str,
    stream: &mut ParameterStream,
    offset: usize,
) -> Result<Value, DecodeError> {
    match descriptor {
        TypeDescriptor::Scalar(kind) => decode_scalar(*kind, name, stream, offset),
        TypeDescriptor::Optional(inner) => decode_optional(inner, name, stream, offset),
        TypeDescriptor::List(inner) => decode_list(inner, name, stream, offset),
        TypeDescriptor::Record(record) => decode_record(record, name, stream, offset),
    }
}

fn decode_scalar(
    kind: ScalarKind,
    name: &str,
    stream: &mut ParameterStream,
    offset: usize,
) -> Result<Value, DecodeError> {
    let raw = take_raw(name, stream, offset)?;
    let value = match kind {
        ScalarKind::String => return Ok(Value::String(raw)),
        ScalarKind::Int32 => parse_integer(&raw).map(Value::Int32),
        ScalarKind::Int64 => parse_integer(&raw).map(Value::Int64),
        ScalarKind::Bool => parse_bool(&raw).map(Value::Bool),
    };
    value.ok_or_else(|| {
        InvalidLiteral {
            kind,
            raw_value: raw,
            path: name.to_owned(),
        }
        .into()
    })
}

/// Consume the first unconsumed pair keyed exactly `name`, from `offset` onward.
fn take_raw(
    name: &str,
    stream: &mut ParameterStream,
    offset: usize,
) -> Result<String, DecodeError> {
    let value = stream
        .find_unconsumed(name, offset)
        .and_then(|position| stream.mark_consumed(position))
        .ok_or_else(|| DecodeError::key_not_found(name))?;
    Ok(value.to_owned())
}

fn parse_integer<T: FromStr>(raw: &str) -> Option<T> {
    raw.trim_ascii().parse().ok()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

fn decode_optional(
    inner: &TypeDescriptor,
    name: &str,
    stream: &mut ParameterStream,
    offset: usize,
) -> Result<Value, DecodeError> {
    if inner.is_optional() {
        return Err(UnsupportedSchema::new(format!(
            "`{name}` is an optional parameter wrapping another optional parameter"
        ))
        .into());
    }
    match decode(inner, name, stream, offset) {
        Ok(value) => Ok(Value::some(value)),
        Err(e) if e.is_key_not_found() => Ok(Value::none()),
        Err(e) => Err(e),
    }
}

fn decode_list(
    inner: &TypeDescriptor,
    name: &str,
    stream: &mut ParameterStream,
    offset: usize,
) -> Result<Value, DecodeError> {
    let prefix = key::list_element(name);
    let mut items = Vec::new();
    let mut position = offset;
    while let Some(pair) = stream.peek(position) {
        if !pair.is_consumed() {
            if pair.key().starts_with(&prefix) {
                items.push(decode(inner, &prefix, stream, position)?);
            } else if !items.is_empty() {
                break;
            }
        }
        position = stream.position_after(position);
    }
    Ok(Value::List(items))
}

fn decode_record(
    record: &RecordDescriptor,
    name: &str,
    stream: &mut ParameterStream,
    offset: usize,
) -> Result<Value, DecodeError> {
    let fields = record.fields();
    let field_keys: Vec<String> = fields
        .iter()
        .map(|field| key::record_field(name, field.name()))
        .collect();
    let mut slots: Vec<Option<Value>> = vec![None; fields.len()];

    let mut position = offset;
    while let Some(pair) = stream.peek(position) {
        if !pair.is_consumed() {
            let matched = field_keys
                .iter()
                .position(|field_key| pair.key().starts_with(field_key.as_str()));
            if let Some(index) = matched {
                if slots[index].is_some() {
                    // The field repeats: this pair belongs to the next record.
                    break;
                }
                let field = &fields[index];
                let value = decode(field.descriptor(), &field_keys[index], stream, position)?;
                slots[index] = Some(value);
            }
        }
        position = stream.position_after(position);
    }

    let mut decoded = Record::default();
    for ((field, field_key), slot) in fields.iter().zip(field_keys).zip(slots) {
        let value = match slot {
            Some(value) => value,
            None if field.descriptor().is_optional() => Value::none(),
            None if field.descriptor().is_list() => Value::List(Vec::new()),
            None => return Err(DecodeError::key_not_found(field_key)),
        };
        decoded.insert(field.name().to_owned(), value);
    }
    Ok(Value::Record(decoded))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(pairs: &[(&str, &str)]) -> ParameterStream {
        pairs.iter().copied().collect()
    }

    fn s(v: &str) -> Value {
        Value::String(v.to_owned())
    }

    fn record(fields: &[(&str, Value)]) -> Value {
        Value::Record(
            fields
                .iter()
                .map(|(name, value)| (name.to_string(), value.clone()))
                .collect(),
        )
    }

    #[test]
    fn string_scalar() {
        let mut stream = stream(&[("name", "John")]);
        let value = decode(&TypeDescriptor::string(), "name", &mut stream, 0).unwrap();
        assert_eq!(value, s("John"));
    }

    #[test]
    fn strings_are_returned_verbatim() {
        let mut stream = stream(&[("name", "  John ")]);
        let value = decode(&TypeDescriptor::string(), "name", &mut stream, 0).unwrap();
        assert_eq!(value, s("  John "));
    }

    #[test]
    fn a_pair_is_consumed_at_most_once() {
        let mut stream = stream(&[("name", "John")]);
        decode(&TypeDescriptor::string(), "name", &mut stream, 0).unwrap();
        let err = decode(&TypeDescriptor::string(), "name", &mut stream, 0).unwrap_err();
        assert_eq!(err, DecodeError::key_not_found("name"));
    }

    #[test]
    fn repeated_keys_are_claimed_in_order() {
        let mut stream = stream(&[("id", "1"), ("id", "2")]);
        let first = decode(&TypeDescriptor::int32(), "id", &mut stream, 0).unwrap();
        let second = decode(&TypeDescriptor::int32(), "id", &mut stream, 0).unwrap();
        assert_eq!((first, second), (Value::Int32(1), Value::Int32(2)));
    }

    #[test]
    fn scanning_starts_at_the_offset() {
        let mut stream = stream(&[("id", "1"), ("id", "2")]);
        let value = decode(&TypeDescriptor::int32(), "id", &mut stream, 1).unwrap();
        assert_eq!(value, Value::Int32(2));
        assert!(!stream.peek(0).unwrap().is_consumed());
    }

    #[test]
    fn integers() {
        let mut stream = stream(&[("a", "-42"), ("b", " 7 "), ("c", "9000000000"), ("d", "+3")]);
        assert_eq!(
            decode(&TypeDescriptor::int32(), "a", &mut stream, 0).unwrap(),
            Value::Int32(-42)
        );
        assert_eq!(
            decode(&TypeDescriptor::int32(), "b", &mut stream, 0).unwrap(),
            Value::Int32(7)
        );
        assert_eq!(
            decode(&TypeDescriptor::int64(), "c", &mut stream, 0).unwrap(),
            Value::Int64(9_000_000_000)
        );
        assert_eq!(
            decode(&TypeDescriptor::int64(), "d", &mut stream, 0).unwrap(),
            Value::Int64(3)
        );
    }

    #[test]
    fn integer_overflow_is_an_invalid_literal() {
        let mut stream = stream(&[("n", "9000000000")]);
        let err = decode(&TypeDescriptor::int32(), "n", &mut stream, 0).unwrap_err();
        insta::assert_snapshot!(err, @"`n` is set to `9000000000`, which we can't parse as a `i32`");
    }

    #[test]
    fn booleans() {
        let mut stream = stream(&[("a", "true"), ("b", "1"), ("c", "false"), ("d", "0")]);
        let expected = [("a", true), ("b", true), ("c", false), ("d", false)];
        for (name, expected) in expected {
            let value = decode(&TypeDescriptor::bool(), name, &mut stream, 0).unwrap();
            assert_eq!(value, Value::Bool(expected));
        }
    }

    #[test]
    fn non_canonical_booleans_are_rejected() {
        for raw in ["maybe", "", "True", "yes", " true"] {
            let mut stream = stream(&[("key", raw)]);
            let err = decode(&TypeDescriptor::bool(), "key", &mut stream, 0).unwrap_err();
            let DecodeError::InvalidLiteral(e) = err else {
                panic!("Expected an invalid literal for `{raw}`");
            };
            assert_eq!(e.kind(), ScalarKind::Bool);
            assert_eq!(e.raw_value(), raw);
            assert_eq!(e.path(), "key");
        }
    }

    #[test]
    fn optional_absence_is_not_an_error() {
        let mut stream = stream(&[]);
        let descriptor = TypeDescriptor::optional(TypeDescriptor::int32()).unwrap();
        let value = decode(&descriptor, "number", &mut stream, 0).unwrap();
        assert_eq!(value, Value::none());
    }

    #[test]
    fn optional_does_not_swallow_malformed_values() {
        let mut stream = stream(&[("number", "ten")]);
        let descriptor = TypeDescriptor::optional(TypeDescriptor::int32()).unwrap();
        let err = decode(&descriptor, "number", &mut stream, 0).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidLiteral(_)));
    }

    #[test]
    fn optional_present() {
        let mut stream = stream(&[("number", "10")]);
        let descriptor = TypeDescriptor::optional(TypeDescriptor::int32()).unwrap();
        let value = decode(&descriptor, "number", &mut stream, 0).unwrap();
        assert_eq!(value, Value::some(Value::Int32(10)));
    }

    #[test]
    fn hand_built_double_optional_is_rejected_at_decode_time() {
        let mut stream = stream(&[("n", "1")]);
        let descriptor = TypeDescriptor::Optional(Box::new(TypeDescriptor::Optional(Box::new(
            TypeDescriptor::int32(),
        ))));
        let err = decode(&descriptor, "n", &mut stream, 0).unwrap_err();
        assert!(matches!(err, DecodeError::UnsupportedSchema(_)));
    }

    #[test]
    fn list_preserves_order() {
        let mut stream = stream(&[("items[]", "1"), ("items[]", "2")]);
        let descriptor = TypeDescriptor::list(TypeDescriptor::int32());
        let value = decode(&descriptor, "items", &mut stream, 0).unwrap();
        assert_eq!(value, Value::List(vec![Value::Int32(1), Value::Int32(2)]));
    }

    #[test]
    fn empty_list_is_not_an_error() {
        let mut stream = stream(&[("other", "1")]);
        let descriptor = TypeDescriptor::list(TypeDescriptor::int32());
        let value = decode(&descriptor, "items", &mut stream, 0).unwrap();
        assert_eq!(value, Value::List(vec![]));
        assert!(!stream.peek(0).unwrap().is_consumed());
    }

    #[test]
    fn list_matching_requires_the_exact_bracket_prefix() {
        let mut stream = stream(&[
            ("key[]", "match"),
            ("key[0]", "nomatch"),
            ("keys[]", "nomatch"),
        ]);
        let value =
            decode(&TypeDescriptor::list(TypeDescriptor::string()), "key", &mut stream, 0).unwrap();
        assert_eq!(value, Value::List(vec![s("match")]));
    }

    #[test]
    fn a_foreign_key_ends_a_non_empty_list() {
        let mut stream = stream(&[("a[]", "1"), ("b", "x"), ("a[]", "2")]);
        let value =
            decode(&TypeDescriptor::list(TypeDescriptor::int32()), "a", &mut stream, 0).unwrap();
        assert_eq!(value, Value::List(vec![Value::Int32(1)]));
        assert!(!stream.peek(2).unwrap().is_consumed());
    }

    #[test]
    fn foreign_keys_ahead_of_the_first_element_are_skipped() {
        let mut stream = stream(&[("b", "x"), ("a[]", "1"), ("a[]", "2")]);
        let value =
            decode(&TypeDescriptor::list(TypeDescriptor::int32()), "a", &mut stream, 0).unwrap();
        assert_eq!(value, Value::List(vec![Value::Int32(1), Value::Int32(2)]));
    }

    #[test]
    fn consumed_pairs_do_not_end_a_list() {
        let mut stream = stream(&[("a[]", "1"), ("b", "x"), ("a[]", "2")]);
        decode(&TypeDescriptor::string(), "b", &mut stream, 0).unwrap();
        let value =
            decode(&TypeDescriptor::list(TypeDescriptor::int32()), "a", &mut stream, 0).unwrap();
        assert_eq!(value, Value::List(vec![Value::Int32(1), Value::Int32(2)]));
    }

    #[test]
    fn nested_lists() {
        let mut stream = stream(&[("m[][]", "1"), ("m[][]", "2")]);
        let descriptor = TypeDescriptor::list(TypeDescriptor::list(TypeDescriptor::int32()));
        let value = decode(&descriptor, "m", &mut stream, 0).unwrap();
        assert_eq!(
            value,
            Value::List(vec![Value::List(vec![Value::Int32(1), Value::Int32(2)])])
        );
    }

    #[test]
    fn list_element_errors_propagate() {
        let mut stream = stream(&[("items[]", "1"), ("items[]", "two")]);
        let err = decode(&TypeDescriptor::list(TypeDescriptor::int32()), "items", &mut stream, 0)
            .unwrap_err();
        insta::assert_snapshot!(err, @"`items[]` is set to `two`, which we can't parse as a `i32`");
    }

    #[test]
    fn single_field_record() {
        let mut stream = stream(&[("item[foo]", "bar")]);
        let descriptor = TypeDescriptor::record([("foo", TypeDescriptor::string())]).unwrap();
        let value = decode(&descriptor, "item", &mut stream, 0).unwrap();
        assert_eq!(value, record(&[("foo", s("bar"))]));
    }

    #[test]
    fn record_fields_keep_their_declaration_order() {
        let mut stream = stream(&[("u[b]", "2"), ("u[a]", "1")]);
        let descriptor = TypeDescriptor::record([
            ("a", TypeDescriptor::int32()),
            ("b", TypeDescriptor::int32()),
        ])
        .unwrap();
        let value = decode(&descriptor, "u", &mut stream, 0).unwrap();
        let fields: Vec<_> = value.as_record().unwrap().iter().map(|(k, _)| k.clone()).collect();
        assert_eq!(fields, vec!["a", "b"]);
    }

    #[test]
    fn missing_required_field() {
        let mut stream = stream(&[("key[name]", "value1")]);
        let descriptor = TypeDescriptor::record([
            ("name", TypeDescriptor::string()),
            ("age", TypeDescriptor::int32()),
        ])
        .unwrap();
        let err = decode(&descriptor, "key", &mut stream, 0).unwrap_err();
        assert_eq!(err, DecodeError::key_not_found("key[age]"));
    }

    #[test]
    fn absent_optional_and_list_fields_have_defaults() {
        let mut stream = stream(&[("user[name]", "Ann")]);
        let descriptor = TypeDescriptor::record([
            ("name", TypeDescriptor::string()),
            ("nickname", TypeDescriptor::optional(TypeDescriptor::string()).unwrap()),
            ("tags", TypeDescriptor::list(TypeDescriptor::string())),
        ])
        .unwrap();
        let value = decode(&descriptor, "user", &mut stream, 0).unwrap();
        assert_eq!(
            value,
            record(&[
                ("name", s("Ann")),
                ("nickname", Value::none()),
                ("tags", Value::List(vec![])),
            ])
        );
    }

    #[test]
    fn nested_records() {
        let mut stream = stream(&[("user[address][city]", "Rome"), ("user[name]", "Ann")]);
        let address = TypeDescriptor::record([("city", TypeDescriptor::string())]).unwrap();
        let descriptor = TypeDescriptor::record([
            ("name", TypeDescriptor::string()),
            ("address", address),
        ])
        .unwrap();
        let value = decode(&descriptor, "user", &mut stream, 0).unwrap();
        assert_eq!(
            value,
            record(&[
                ("name", s("Ann")),
                ("address", record(&[("city", s("Rome"))])),
            ])
        );
    }

    #[test]
    fn list_of_records_with_repeated_fields() {
        let mut stream = stream(&[
            ("items[][id]", "1"),
            ("items[][quantity]", "2"),
            ("items[][id]", "3"),
            ("items[][quantity]", "4"),
        ]);
        let line = TypeDescriptor::record([
            ("id", TypeDescriptor::int32()),
            ("quantity", TypeDescriptor::int32()),
        ])
        .unwrap();
        let value = decode(&TypeDescriptor::list(line), "items", &mut stream, 0).unwrap();
        assert_eq!(
            value,
            Value::List(vec![
                record(&[("id", Value::Int32(1)), ("quantity", Value::Int32(2))]),
                record(&[("id", Value::Int32(3)), ("quantity", Value::Int32(4))]),
            ])
        );
        assert_eq!(stream.unconsumed().count(), 0);
    }

    #[test]
    fn list_of_records_with_optional_fields() {
        let mut stream = stream(&[
            ("items[][id]", "1"),
            ("items[][id]", "2"),
            ("items[][note]", "fragile"),
        ]);
        let line = TypeDescriptor::record([
            ("id", TypeDescriptor::int32()),
            ("note", TypeDescriptor::optional(TypeDescriptor::string()).unwrap()),
        ])
        .unwrap();
        let value = decode(&TypeDescriptor::list(line), "items", &mut stream, 0).unwrap();
        assert_eq!(
            value,
            Value::List(vec![
                record(&[("id", Value::Int32(1)), ("note", Value::none())]),
                record(&[
                    ("id", Value::Int32(2)),
                    ("note", Value::some(s("fragile")))
                ]),
            ])
        );
    }

    #[test]
    fn list_of_records_with_list_fields() {
        let mut stream = stream(&[
            ("items[][id]", "1"),
            ("items[][tags][]", "a"),
            ("items[][tags][]", "b"),
            ("items[][id]", "2"),
            ("items[][tags][]", "c"),
        ]);
        let line = TypeDescriptor::record([
            ("id", TypeDescriptor::int32()),
            ("tags", TypeDescriptor::list(TypeDescriptor::string())),
        ])
        .unwrap();
        let value = decode(&TypeDescriptor::list(line), "items", &mut stream, 0).unwrap();
        assert_eq!(
            value,
            Value::List(vec![
                record(&[
                    ("id", Value::Int32(1)),
                    ("tags", Value::List(vec![s("a"), s("b")]))
                ]),
                record(&[("id", Value::Int32(2)), ("tags", Value::List(vec![s("c")]))]),
            ])
        );
    }

    #[test]
    fn any_repeated_field_ends_a_record() {
        let mut stream = stream(&[
            ("i[][b]", "1"),
            ("i[][a]", "2"),
            ("i[][b]", "3"),
            ("i[][a]", "4"),
        ]);
        let element = TypeDescriptor::record([
            ("a", TypeDescriptor::int32()),
            ("b", TypeDescriptor::int32()),
        ])
        .unwrap();
        let value = decode(&TypeDescriptor::list(element), "i", &mut stream, 0).unwrap();
        assert_eq!(
            value,
            Value::List(vec![
                record(&[("a", Value::Int32(2)), ("b", Value::Int32(1))]),
                record(&[("a", Value::Int32(4)), ("b", Value::Int32(3))]),
            ])
        );
        assert_eq!(stream.unconsumed().count(), 0);
    }

    #[test]
    fn records_skip_pairs_that_match_no_field() {
        let mut stream = stream(&[("u[a]", "1"), ("x", "y"), ("u[b]", "2")]);
        let descriptor = TypeDescriptor::record([
            ("a", TypeDescriptor::int32()),
            ("b", TypeDescriptor::int32()),
        ])
        .unwrap();
        let value = decode(&descriptor, "u", &mut stream, 0).unwrap();
        assert_eq!(value, record(&[("a", Value::Int32(1)), ("b", Value::Int32(2))]));
        let unconsumed: Vec<_> = stream.unconsumed().map(|pair| pair.key()).collect();
        assert_eq!(unconsumed, vec!["x"]);
    }

    #[test]
    fn missing_field_in_a_list_element() {
        let mut stream = stream(&[
            ("items[][id]", "1"),
            ("items[][id]", "2"),
            ("items[][quantity]", "4"),
        ]);
        let line = TypeDescriptor::record([
            ("id", TypeDescriptor::int32()),
            ("quantity", TypeDescriptor::int32()),
        ])
        .unwrap();
        let err = decode(&TypeDescriptor::list(line), "items", &mut stream, 0).unwrap_err();
        assert_eq!(err, DecodeError::key_not_found("items[][quantity]"));
    }
}
