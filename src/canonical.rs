//! Canonical, comparable form of a [`Schema`].
//!
//! Objects compare by key regardless of order, but `required` is a list whose
//! order follows authoring. Sorting it makes two equivalent schemas encode to
//! equal values. Only use this for comparison: emitted schemas should keep the
//! author's order.
use serde_json::Value;

use crate::error::Result;
use crate::schema::Schema;

/// Sort `required` lexicographically here and in every `properties` and `items` child.
pub fn normalize(schema: &mut Schema) {
    schema.required.sort_unstable();
    if let Some(properties) = schema.properties.as_mut() {
        for child in properties.values_mut() {
            normalize(child);
        }
    }
    if let Some(items) = schema.items.as_mut() {
        normalize(items);
    }
}

/// Normalize a copy of `schema` and round-trip it through JSON text.
pub fn to_canonical_value(schema: &Schema) -> Result<Value> {
    let mut schema = schema.clone();
    normalize(&mut schema);
    let encoded = serde_json::to_vec(&schema)?;
    Ok(serde_json::from_slice(&encoded)?)
}
