//! Scalar tokens: `type` or `type, description`.
use crate::error::{PicoError, Result};
use crate::schema::{Schema, SchemaType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScalarToken<'a> {
    pub type_name: &'a str,
    pub description: Option<&'a str>, // trimmed; `Some("")` for a bare trailing comma
}

/// Split at the first comma. Nothing here is validated.
pub fn lex(token: &str) -> ScalarToken<'_> {
    match token.split_once(',') {
        Some((type_name, description)) => ScalarToken {
            type_name: type_name.trim(),
            description: Some(description.trim()),
        },
        None => ScalarToken { type_name: token.trim(), description: None },
    }
}

/// `any` has no type tag; every other accepted name maps onto its [`SchemaType`].
pub fn scalar_type(name: &str) -> Result<Option<SchemaType>> {
    match name {
        "any" => Ok(None),
        "string" | "boolean" | "null" | "number" | "integer" => Ok(SchemaType::from_name(name)),
        _ => Err(PicoError::UnsupportedScalarType(name.to_string())),
    }
}

pub fn parse(token: &str) -> Result<Schema> {
    let lexed = lex(token);
    let mut schema = Schema::of_type(scalar_type(lexed.type_name)?);
    schema.description = lexed.description.and_then(non_empty);
    Ok(schema)
}

pub(crate) fn non_empty(text: &str) -> Option<String> {
    if text.is_empty() { None } else { Some(text.to_string()) }
}
