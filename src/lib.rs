//! Picoschema → JSON Schema.
//!
//! Picoschema is a compact, YAML-friendly notation for object shapes:
//!
//! ```yaml
//! name: string, the user's full name
//! age?: integer
//! tags(array, free-form labels): string
//! status(enum): [active, suspended]
//! (*): string
//! ```
//!
//! [`to_schema`] takes the decoded document (a `serde_json::Value` with
//! preserved key order) and returns a [`Schema`]. Documents that already look
//! like JSON Schema are mapped field by field instead of parsed as shorthand.
//! [`to_canonical_value`] produces an order-insensitive value for comparisons.
pub mod canonical;
pub mod detect;
pub mod error;
pub mod path_de;
pub mod pico;
pub mod schema;
pub mod structural;

use serde_json::Value;

pub use canonical::to_canonical_value;
pub use detect::{Route, detect};
pub use error::{Location, PicoError, Result, ValueKind};
pub use schema::{AdditionalProperties, Schema, SchemaType};

/// Convert a decoded document into a schema. `null` yields `Ok(None)`.
pub fn to_schema(value: &Value) -> Result<Option<Schema>> {
    match detect(value) {
        Route::Absent => Ok(None),
        Route::Structural { map, force_object } => {
            tracing::debug!(fields = map.len(), force_object, "mapping JSON schema document");
            let schema = if force_object {
                structural::from_object_map(map)?
            } else {
                structural::from_map(map)?
            };
            Ok(Some(schema))
        }
        Route::Shorthand(value) => {
            tracing::debug!(kind = %ValueKind::of(value), "parsing picoschema");
            pico::parse(value).map(Some)
        }
    }
}
