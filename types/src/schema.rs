//! The input/output schema tree a procedure may register.
//!
//! This only describes the tree shape; validating a JSON value against it
//! is the `rpc` crate's `SchemaValidator`, since that is where the
//! recursive-validation algorithm and its error taxonomy live.

use std::collections::BTreeMap;

/// A schema node. Arrays, booleans, and nulls are not modeled — this is a
/// deliberately small schema language, not a JSON Schema implementation.
#[derive(Clone, Debug, PartialEq)]
pub enum Schema {
    String,
    Number,
    Object {
        required: Vec<String>,
        properties: BTreeMap<String, Schema>,
        additional_properties: bool,
    },
}

impl Schema {
    /// Convenience constructor for the common case of an object schema
    /// with a fixed property set and `additional_properties: false`.
    pub fn object(required: &[&str], properties: Vec<(&str, Schema)>) -> Self {
        Schema::Object {
            required: required.iter().map(|s| s.to_string()).collect(),
            properties: properties.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
            additional_properties: false,
        }
    }
}
