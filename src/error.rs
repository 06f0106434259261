//! Translation errors.
//!
//! Every failure is fatal to the whole conversion. Nested failures are wrapped
//! with the property (shorthand) or field (structural) they occurred under, so
//! the rendered message reads outside-in: `in field "properties" key "name":
//! found number for field "title", want a string`.
use std::fmt;

use serde_json::Value;
use thiserror::Error;

pub type Result<T, E = PicoError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum PicoError {
    #[error("value {value} of kind {kind} is not an object, array or string")]
    UnsupportedValueKind { kind: ValueKind, value: String },

    #[error("unsupported scalar type {0:?}")]
    UnsupportedScalarType(String),

    #[error("enum value {value} is not an array")]
    MalformedEnum { value: String },

    #[error("enum has no values")]
    EmptyEnum,

    #[error("parenthetical type {0:?} is none of [\"object\", \"array\", \"enum\", \"*\"]")]
    UnknownModifier(String),

    #[error("unrecognized JSON schema field name {0:?}")]
    UnrecognizedField(String),

    #[error("unknown JSON schema type {0:?}")]
    UnknownSchemaType(String),

    #[error("found {found} for field {field:?}{}, want {want}", element_suffix(.index))]
    FieldTypeMismatch {
        field: String,
        index: Option<usize>,
        want: &'static str,
        found: ValueKind,
    },

    #[error("in property {property:?}: {source}")]
    InProperty {
        property: String,
        source: Box<PicoError>,
    },

    #[error("in field {field:?}{}: {source}", location_suffix(.at))]
    InField {
        field: String,
        at: Option<Location>,
        source: Box<PicoError>,
    },

    #[error("failed to encode schema: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Position inside a structural field that holds several sub-schemas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Key(String),
    Index(usize),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Key(key) => write!(f, "key {key:?}"),
            Location::Index(index) => write!(f, "element {index}"),
        }
    }
}

fn element_suffix(index: &Option<usize>) -> String {
    match index {
        Some(i) => format!(" element {i}"),
        None => String::new(),
    }
}

fn location_suffix(at: &Option<Location>) -> String {
    match at {
        Some(location) => format!(" {location}"),
        None => String::new(),
    }
}

impl PicoError {
    pub fn unsupported_kind(value: &Value) -> Self {
        PicoError::UnsupportedValueKind {
            kind: ValueKind::of(value),
            value: value.to_string(),
        }
    }

    pub fn mismatch(field: &str, want: &'static str, found: &Value) -> Self {
        PicoError::FieldTypeMismatch {
            field: field.to_string(),
            index: None,
            want,
            found: ValueKind::of(found),
        }
    }

    pub fn element_mismatch(field: &str, index: usize, want: &'static str, found: &Value) -> Self {
        PicoError::FieldTypeMismatch {
            field: field.to_string(),
            index: Some(index),
            want,
            found: ValueKind::of(found),
        }
    }

    pub fn in_property(self, property: &str) -> Self {
        PicoError::InProperty {
            property: property.to_string(),
            source: Box::new(self),
        }
    }

    pub fn in_field(self, field: &str, at: Option<Location>) -> Self {
        PicoError::InField {
            field: field.to_string(),
            at,
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping property/field context wrappers.
    pub fn root_cause(&self) -> &PicoError {
        let mut current = self;
        while let PicoError::InProperty { source, .. } | PicoError::InField { source, .. } = current {
            current = &**source;
        }
        current
    }
}

/// Coarse kind of a dynamic value, used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Boolean,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Boolean => "boolean",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_messages_read_outside_in() {
        let leaf = PicoError::mismatch("title", "a string", &json!(3));
        let err = leaf
            .in_field("properties", Some(Location::Key("name".into())))
            .in_field("items", None);
        assert_eq!(
            err.to_string(),
            r#"in field "items": in field "properties" key "name": found number for field "title", want a string"#
        );
        assert!(matches!(err.root_cause(), PicoError::FieldTypeMismatch { field, .. } if field == "title"));
    }

    #[test]
    fn element_mismatch_names_the_index() {
        let err = PicoError::element_mismatch("required", 2, "a string", &json!(null));
        assert_eq!(err.to_string(), r#"found null for field "required" element 2, want a string"#);
    }
}
