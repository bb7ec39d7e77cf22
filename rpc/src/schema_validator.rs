//! Recursive validation of a JSON value against a [`procd_types::Schema`].
//!
//! Validation is depth-first, left-to-right, and stops at the first
//! violation — it never collects every error in a value, and it never
//! mutates the value being checked.

use procd_types::Schema;
use serde_json::Value;

use crate::error::SchemaViolation;

pub struct SchemaValidator;

impl SchemaValidator {
    /// Validates `value` against `schema`, returning the first violation
    /// encountered (if any) with a `path` describing where it occurred.
    pub fn validate(schema: &Schema, value: &Value) -> Result<(), SchemaViolation> {
        Self::validate_at(schema, value, "$")
    }

    fn validate_at(schema: &Schema, value: &Value, path: &str) -> Result<(), SchemaViolation> {
        match schema {
            Schema::String => {
                if value.is_string() {
                    Ok(())
                } else {
                    Err(SchemaViolation::InvalidType { path: path.to_string(), expected: "string" })
                }
            }
            Schema::Number => {
                if value.is_i64() || value.is_u64() || value.is_f64() {
                    Ok(())
                } else {
                    Err(SchemaViolation::InvalidType { path: path.to_string(), expected: "number" })
                }
            }
            Schema::Object { required, properties, additional_properties } => {
                let object = match value.as_object() {
                    Some(o) => o,
                    None => return Err(SchemaViolation::ExpectedObject(path.to_string())),
                };

                for name in required {
                    if !object.contains_key(name) {
                        return Err(SchemaViolation::MissingRequiredProperty(name.clone()));
                    }
                }

                for (key, child) in object {
                    let child_path = format!("{path}.{key}");
                    match properties.get(key) {
                        Some(child_schema) => Self::validate_at(child_schema, child, &child_path)?,
                        None if *additional_properties => {}
                        None => return Err(SchemaViolation::UnknownProperty(key.clone())),
                    }
                }

                Ok(())
            }
        }
    }
}
