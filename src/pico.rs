//! Picoschema shorthand → [`Schema`].
//!
//! The grammar is driven by the kind of the dynamic value:
//! - a string is a scalar token (`type[, description]`), see [`scalar`];
//! - an array is an enumeration of literal values;
//! - an object is an object schema whose keys carry the property name, an
//!   optional `?` marker and an optional `(modifier[, description])`, see [`key`].
//!
//! Objects forbid additional properties unless a wildcard entry (`*` or `(*)`)
//! supplies a catch-all schema.
pub mod key;
pub mod scalar;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::{PicoError, Result};
use crate::schema::{AdditionalProperties, Schema, SchemaType};

pub use key::{Modifier, PropertyKey};
pub use scalar::ScalarToken;

/// Parse picoschema from the decoded document.
pub fn parse(value: &Value) -> Result<Schema> {
    match value {
        Value::String(token) => scalar::parse(token),
        Value::Array(values) if values.is_empty() => Err(PicoError::EmptyEnum),
        Value::Array(values) => Ok(Schema::enumeration(values.clone())),
        Value::Object(entries) => parse_object(entries),
        other => Err(PicoError::unsupported_kind(other)),
    }
}

fn parse_object(entries: &Map<String, Value>) -> Result<Schema> {
    let mut properties = IndexMap::with_capacity(entries.len());
    let mut required: Vec<String> = Vec::new();
    let mut additional = AdditionalProperties::Forbidden;

    for (raw_key, raw_value) in entries {
        let key = PropertyKey::parse(raw_key);
        let property = parse(raw_value).map_err(|e| e.in_property(raw_key))?;

        let property = match key.modifier {
            None => property,
            Some(_) if key.is_wildcard() => {
                tracing::trace!(key = %raw_key, "wildcard entry sets additionalProperties");
                additional = AdditionalProperties::Schema(Box::new(property));
                continue;
            }
            Some(modifier) => {
                apply_modifier(property, modifier, key.optional).map_err(|e| e.in_property(raw_key))?
            }
        };

        if key.is_required() && !required.iter().any(|name| name == key.name) {
            required.push(key.name.to_string());
        }
        properties.insert(key.name.to_string(), property);
    }

    tracing::trace!(properties = properties.len(), required = required.len(), "parsed shorthand object");
    Ok(Schema {
        type_: Some(SchemaType::Object),
        properties: Some(properties),
        required,
        additional_properties: Some(additional),
        ..Schema::default()
    })
}

fn apply_modifier(property: Schema, modifier: Modifier<'_>, optional: bool) -> Result<Schema> {
    let mut property = match modifier.keyword {
        "array" => Schema::array_of(property),
        "object" => property,
        "enum" => {
            let mut property = property;
            let Some(values) = property.enum_.as_mut() else {
                return Err(PicoError::MalformedEnum { value: describe(&property) });
            };
            if optional {
                values.push(Value::Null);
            }
            property
        }
        other => return Err(PicoError::UnknownModifier(other.to_string())),
    };
    // The parenthetical description wins over one from the scalar token.
    if let Some(description) = modifier.description {
        property.description = scalar::non_empty(description);
    }
    Ok(property)
}

fn describe(schema: &Schema) -> String {
    serde_json::to_string(schema).unwrap_or_else(|_| format!("{schema:?}"))
}
