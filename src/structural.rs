//! JSON-Schema-shaped maps → [`Schema`].
//!
//! Every key must be a recognized JSON Schema keyword. [`slot`] is the field
//! table: it maps a keyword to a typed mutable slot of the schema under
//! construction, and [`assign`] checks the value against the slot's expected
//! shape before storing it. The first failure aborts the whole conversion.
use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::{Location, PicoError, Result};
use crate::schema::{AdditionalProperties, Schema, SchemaType};

/// A typed destination inside a [`Schema`], one variant per expected shape.
enum Slot<'a> {
    Opaque(&'a mut Option<Value>),
    Values(&'a mut Option<Vec<Value>>),
    Str(&'a mut Option<String>),
    Type(&'a mut Option<SchemaType>),
    Unsigned(&'a mut Option<u64>),
    Bool(&'a mut Option<bool>),
    Strings(&'a mut Vec<String>),
    Nested(&'a mut Option<Box<Schema>>),
    NestedList(&'a mut Option<Vec<Schema>>),
    NestedMap(&'a mut Option<IndexMap<String, Schema>>),
    Additional(&'a mut Option<AdditionalProperties>),
}

fn slot<'a>(s: &'a mut Schema, name: &str) -> Option<Slot<'a>> {
    Some(match name {
        "$schema" => Slot::Str(&mut s.version),
        "$id" => Slot::Str(&mut s.id),
        "$anchor" => Slot::Str(&mut s.anchor),
        "$ref" => Slot::Str(&mut s.reference),
        "$dynamicRef" => Slot::Str(&mut s.dynamic_ref),
        "$defs" => Slot::NestedMap(&mut s.defs),
        "$comment" => Slot::Str(&mut s.comment),

        "allOf" => Slot::NestedList(&mut s.all_of),
        "anyOf" => Slot::NestedList(&mut s.any_of),
        "oneOf" => Slot::NestedList(&mut s.one_of),
        "not" => Slot::Nested(&mut s.not),
        "if" => Slot::Nested(&mut s.if_),
        "then" => Slot::Nested(&mut s.then),
        "else" => Slot::Nested(&mut s.else_),
        "dependentSchemas" => Slot::NestedMap(&mut s.dependent_schemas),

        "prefixItems" => Slot::NestedList(&mut s.prefix_items),
        "items" => Slot::Nested(&mut s.items),
        "contains" => Slot::Nested(&mut s.contains),

        "properties" => Slot::NestedMap(&mut s.properties),
        "patternProperties" => Slot::NestedMap(&mut s.pattern_properties),
        "additionalProperties" => Slot::Additional(&mut s.additional_properties),
        "propertyNames" => Slot::Nested(&mut s.property_names),

        "type" => Slot::Type(&mut s.type_),
        "enum" => Slot::Values(&mut s.enum_),
        "const" => Slot::Opaque(&mut s.const_),
        "multipleOf" => Slot::Opaque(&mut s.multiple_of),
        "maximum" => Slot::Opaque(&mut s.maximum),
        "exclusiveMaximum" => Slot::Opaque(&mut s.exclusive_maximum),
        "minimum" => Slot::Opaque(&mut s.minimum),
        "exclusiveMinimum" => Slot::Opaque(&mut s.exclusive_minimum),
        "maxLength" => Slot::Unsigned(&mut s.max_length),
        "minLength" => Slot::Unsigned(&mut s.min_length),
        "pattern" => Slot::Str(&mut s.pattern),
        "maxItems" => Slot::Unsigned(&mut s.max_items),
        "minItems" => Slot::Unsigned(&mut s.min_items),
        "uniqueItems" => Slot::Bool(&mut s.unique_items),
        "maxContains" => Slot::Unsigned(&mut s.max_contains),
        "minContains" => Slot::Unsigned(&mut s.min_contains),
        "maxProperties" => Slot::Unsigned(&mut s.max_properties),
        "minProperties" => Slot::Unsigned(&mut s.min_properties),
        "required" => Slot::Strings(&mut s.required),

        "format" => Slot::Str(&mut s.format),
        "contentEncoding" => Slot::Str(&mut s.content_encoding),
        "contentMediaType" => Slot::Str(&mut s.content_media_type),
        "contentSchema" => Slot::Nested(&mut s.content_schema),
        "title" => Slot::Str(&mut s.title),
        "description" => Slot::Str(&mut s.description),
        "default" => Slot::Opaque(&mut s.default),
        "deprecated" => Slot::Bool(&mut s.deprecated),
        "readOnly" => Slot::Bool(&mut s.read_only),
        "writeOnly" => Slot::Bool(&mut s.write_only),
        "examples" => Slot::Values(&mut s.examples),

        _ => return None,
    })
}

/// Convert a JSON-Schema-shaped map, validating every field.
pub fn from_map(map: &Map<String, Value>) -> Result<Schema> {
    map_fields(map, false)
}

/// Like [`from_map`], but the result is always typed `object`. Any `type`
/// string in the map is replaced, so it need not name a known type.
pub fn from_object_map(map: &Map<String, Value>) -> Result<Schema> {
    map_fields(map, true)
}

fn map_fields(map: &Map<String, Value>, force_object: bool) -> Result<Schema> {
    let mut schema = Schema::default();
    for (key, value) in map {
        if force_object && key == "type" {
            expect_str(key, value)?;
            continue;
        }
        let Some(slot) = slot(&mut schema, key) else {
            return Err(PicoError::UnrecognizedField(key.clone()));
        };
        assign(slot, key, value)?;
    }
    if force_object {
        schema.type_ = Some(SchemaType::Object);
    }
    Ok(schema)
}

fn assign(slot: Slot<'_>, field: &str, value: &Value) -> Result<()> {
    match slot {
        Slot::Opaque(dst) => *dst = Some(value.clone()),

        Slot::Values(dst) => {
            let values = value.as_array().ok_or_else(|| PicoError::mismatch(field, "an array", value))?;
            *dst = Some(values.clone());
        }

        Slot::Str(dst) => *dst = Some(expect_str(field, value)?.to_string()),

        Slot::Type(dst) => {
            let name = expect_str(field, value)?;
            let type_ = SchemaType::from_name(name).ok_or_else(|| PicoError::UnknownSchemaType(name.to_string()))?;
            *dst = Some(type_);
        }

        Slot::Unsigned(dst) => {
            let n = as_unsigned(value).ok_or_else(|| PicoError::mismatch(field, "a non-negative integer", value))?;
            *dst = Some(n);
        }

        Slot::Bool(dst) => {
            let b = value.as_bool().ok_or_else(|| PicoError::mismatch(field, "a boolean", value))?;
            *dst = Some(b);
        }

        Slot::Strings(dst) => {
            let items = value.as_array().ok_or_else(|| PicoError::mismatch(field, "an array", value))?;
            let mut strings = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                let s = item.as_str().ok_or_else(|| PicoError::element_mismatch(field, i, "a string", item))?;
                strings.push(s.to_string());
            }
            *dst = strings;
        }

        Slot::Nested(dst) => {
            let map = expect_map(field, value)?;
            let schema = from_map(map).map_err(|e| e.in_field(field, None))?;
            *dst = Some(Box::new(schema));
        }

        Slot::NestedList(dst) => {
            let items = value.as_array().ok_or_else(|| PicoError::mismatch(field, "an array of objects", value))?;
            let mut schemas = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                let map = item
                    .as_object()
                    .ok_or_else(|| PicoError::element_mismatch(field, i, "an object", item))?;
                let schema = from_map(map).map_err(|e| e.in_field(field, Some(Location::Index(i))))?;
                schemas.push(schema);
            }
            *dst = Some(schemas);
        }

        Slot::NestedMap(dst) => {
            let entries = expect_map(field, value)?;
            let mut schemas = IndexMap::with_capacity(entries.len());
            for (key, entry) in entries {
                let at = || Some(Location::Key(key.clone()));
                let map = entry
                    .as_object()
                    .ok_or_else(|| PicoError::mismatch(field, "an object", entry).in_field(field, at()))?;
                let schema = from_map(map).map_err(|e| e.in_field(field, at()))?;
                schemas.insert(key.clone(), schema);
            }
            *dst = Some(schemas);
        }

        Slot::Additional(dst) => {
            *dst = Some(match value {
                Value::Bool(false) => AdditionalProperties::Forbidden,
                Value::Bool(true) => AdditionalProperties::Schema(Box::default()),
                Value::Object(map) => {
                    let schema = from_map(map).map_err(|e| e.in_field(field, None))?;
                    AdditionalProperties::Schema(Box::new(schema))
                }
                other => return Err(PicoError::mismatch(field, "an object or boolean", other)),
            });
        }
    }
    Ok(())
}

fn expect_str<'v>(field: &str, value: &'v Value) -> Result<&'v str> {
    value.as_str().ok_or_else(|| PicoError::mismatch(field, "a string", value))
}

fn expect_map<'v>(field: &str, value: &'v Value) -> Result<&'v Map<String, Value>> {
    value.as_object().ok_or_else(|| PicoError::mismatch(field, "an object", value))
}

// Whole, non-negative numbers only; YAML may hand us `3.0` for `3`.
fn as_unsigned(value: &Value) -> Option<u64> {
    let Value::Number(n) = value else {
        return None;
    };
    if let Some(u) = n.as_u64() {
        return Some(u);
    }
    let f = n.as_f64()?;
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f < u64::MAX as f64 {
        Some(f as u64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValueKind;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(m) => m,
            _ => panic!("fixture is not an object"),
        }
    }

    #[test]
    fn maps_common_keywords() {
        let schema = from_map(&map(json!({
            "type": "object",
            "title": "Person",
            "properties": {
                "name": {"type": "string", "minLength": 1},
                "age": {"type": "integer", "minimum": 0, "maximum": 150},
                "tags": {"type": "array", "items": {"type": "string"}, "uniqueItems": true},
            },
            "required": ["name"],
            "additionalProperties": false,
        })))
        .unwrap();

        assert_eq!(schema.type_, Some(SchemaType::Object));
        assert_eq!(schema.title.as_deref(), Some("Person"));
        assert_eq!(schema.required, ["name"]);
        assert_eq!(schema.additional_properties, Some(AdditionalProperties::Forbidden));

        let props = schema.properties.as_ref().unwrap();
        assert_eq!(props.keys().collect::<Vec<_>>(), ["name", "age", "tags"]);
        assert_eq!(props["name"].min_length, Some(1));
        assert_eq!(props["age"].maximum, Some(json!(150)));
        assert_eq!(props["tags"].unique_items, Some(true));
        assert_eq!(props["tags"].items.as_deref().and_then(|s| s.type_), Some(SchemaType::String));
    }

    #[test]
    fn opaque_and_value_list_fields() {
        let schema = from_map(&map(json!({
            "default": {"anything": [1, null]},
            "const": null,
            "enum": ["a", 1, null],
            "examples": [{"x": 1}],
        })))
        .unwrap();
        assert_eq!(schema.default, Some(json!({"anything": [1, null]})));
        assert_eq!(schema.const_, Some(Value::Null));
        assert_eq!(schema.enum_, Some(vec![json!("a"), json!(1), Value::Null]));
        assert_eq!(schema.examples, Some(vec![json!({"x": 1})]));
    }

    #[test]
    fn combinators_and_conditionals() {
        let schema = from_map(&map(json!({
            "anyOf": [{"type": "string"}, {"type": "null"}],
            "if": {"properties": {"kind": {"const": "a"}}},
            "then": {"required": ["a"]},
            "$defs": {"id": {"type": "string", "format": "uuid"}},
        })))
        .unwrap();
        assert_eq!(schema.any_of.as_ref().map(Vec::len), Some(2));
        assert_eq!(schema.then.as_ref().unwrap().required, ["a"]);
        assert_eq!(schema.defs.as_ref().unwrap()["id"].format.as_deref(), Some("uuid"));
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = from_map(&map(json!({"type": "string", "nullable": true}))).unwrap_err();
        assert!(matches!(err, PicoError::UnrecognizedField(ref k) if k == "nullable"), "{err}");
    }

    #[test]
    fn shape_mismatches() {
        let err = from_map(&map(json!({"title": 7}))).unwrap_err();
        assert!(matches!(
            err,
            PicoError::FieldTypeMismatch { ref field, index: None, found: ValueKind::Number, .. } if field == "title"
        ));

        for bad in [json!(-1), json!(1.5), json!("3")] {
            let err = from_map(&map(json!({"maxItems": bad}))).unwrap_err();
            assert!(matches!(err, PicoError::FieldTypeMismatch { .. }), "{err}");
        }

        let err = from_map(&map(json!({"required": ["a", 2]}))).unwrap_err();
        assert!(matches!(err, PicoError::FieldTypeMismatch { index: Some(1), .. }), "{err}");

        let err = from_map(&map(json!({"items": ["string"]}))).unwrap_err();
        assert!(matches!(err, PicoError::FieldTypeMismatch { found: ValueKind::Array, .. }), "{err}");
    }

    #[test]
    fn whole_floats_count_as_unsigned() {
        let schema = from_map(&map(json!({"minItems": 2.0}))).unwrap();
        assert_eq!(schema.min_items, Some(2));
    }

    #[test]
    fn floats_past_u64_range_are_rejected() {
        let err = from_map(&map(json!({"maxLength": 18446744073709551616.0_f64}))).unwrap_err();
        assert!(matches!(err, PicoError::FieldTypeMismatch { ref field, .. } if field == "maxLength"), "{err}");
    }

    #[test]
    fn object_map_replaces_any_type_string() {
        let schema = from_object_map(&map(json!({
            "type": "any",
            "properties": {"a": {"type": "string"}},
        })))
        .unwrap();
        assert_eq!(schema.type_, Some(SchemaType::Object));
        assert_eq!(schema.properties.as_ref().map(IndexMap::len), Some(1));

        let err = from_object_map(&map(json!({"type": 3, "properties": {}}))).unwrap_err();
        assert!(matches!(err, PicoError::FieldTypeMismatch { ref field, .. } if field == "type"), "{err}");

        let err = from_object_map(&map(json!({"properties": {"a": {"type": "date"}}}))).unwrap_err();
        assert!(matches!(err.root_cause(), PicoError::UnknownSchemaType(t) if t == "date"), "{err}");
    }

    #[test]
    fn unknown_type_name() {
        let err = from_map(&map(json!({"type": "date"}))).unwrap_err();
        assert!(matches!(err, PicoError::UnknownSchemaType(ref t) if t == "date"));
    }

    #[test]
    fn nested_errors_name_the_chain() {
        let err = from_map(&map(json!({
            "properties": {"name": {"type": "string"}, "age": {"type": "integer", "bogus": 1}},
        })))
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"in field "properties" key "age": unrecognized JSON schema field name "bogus""#
        );

        let err = from_map(&map(json!({"oneOf": [{"type": "string"}, {"minLength": "x"}]}))).unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"in field "oneOf" element 1: found string for field "minLength", want a non-negative integer"#
        );

        let err = from_map(&map(json!({"properties": {"name": "string"}}))).unwrap_err();
        assert!(matches!(err.root_cause(), PicoError::FieldTypeMismatch { found: ValueKind::String, .. }));
    }

    #[test]
    fn additional_properties_accepts_schema_or_bool() {
        let schema = from_map(&map(json!({"additionalProperties": {"type": "number"}}))).unwrap();
        assert_eq!(
            schema.additional_properties,
            Some(AdditionalProperties::Schema(Box::new(Schema::of_type(Some(SchemaType::Number)))))
        );
        let err = from_map(&map(json!({"additionalProperties": "number"}))).unwrap_err();
        assert!(matches!(err, PicoError::FieldTypeMismatch { .. }));
    }
}
