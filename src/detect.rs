//! Decide whether a decoded document is already JSON Schema or picoschema.
use serde_json::{Map, Value};

use crate::schema::SchemaType;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Route<'a> {
    /// `null` input: there is no schema.
    Absent,
    /// JSON Schema shaped; `force_object` when only `properties` gave it away.
    Structural { map: &'a Map<String, Value>, force_object: bool },
    Shorthand(&'a Value),
}

pub fn detect(value: &Value) -> Route<'_> {
    let map = match value {
        Value::Null => return Route::Absent,
        Value::Object(map) => map,
        other => return Route::Shorthand(other),
    };

    // A `type` naming a JSON Schema type wins, even though `type: string`
    // would also parse as a shorthand property called "type".
    if let Some(name) = map.get("type").and_then(Value::as_str) {
        if SchemaType::from_name(name).is_some() {
            return Route::Structural { map, force_object: false };
        }
    }
    if map.get("properties").is_some_and(Value::is_object) {
        return Route::Structural { map, force_object: true };
    }
    Route::Shorthand(value)
}
