//! Procedure registry: name → `{handler, input_schema?, output_schema?}`.
//!
//! Registration only happens through a [`RegistryBuilder`], consumed once
//! by `Server::listen`. The resulting [`Registry`] exposes only `lookup`,
//! so there is nothing to synchronize once the server is running — the
//! REDESIGN FLAG in the spec's §9 asks for exactly this shape instead of
//! a mutable router threaded through every caller.

use std::collections::HashMap;
use std::sync::Arc;

use procd_types::Schema;
use serde_json::Value;
use thiserror::Error;

use crate::context::Context;
use crate::error::HandlerError;

/// A registered procedure's handler function.
pub type Handler = Arc<dyn Fn(&Context, Option<Value>) -> Result<Value, HandlerError> + Send + Sync>;

/// A procedure as stored in the registry: its handler plus optional
/// input/output schemas.
pub struct Procedure {
    pub name: String,
    pub handler: Handler,
    pub input_schema: Option<Schema>,
    pub output_schema: Option<Schema>,
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("procedure already registered: {0}")]
    ProcedureAlreadyExists(String),
}

/// Builder consumed by `Server::listen`. Registration is only valid
/// before the server starts accepting connections.
#[derive(Default)]
pub struct RegistryBuilder {
    procedures: HashMap<String, Procedure>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self { procedures: HashMap::new() }
    }

    /// Registers a procedure under `name`. Fails if `name` is already
    /// taken — re-registering a name is a programming error, not a
    /// runtime condition to tolerate.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        handler: Handler,
        input_schema: Option<Schema>,
        output_schema: Option<Schema>,
    ) -> Result<&mut Self, RegistryError> {
        let name = name.into();
        if self.procedures.contains_key(&name) {
            return Err(RegistryError::ProcedureAlreadyExists(name));
        }
        self.procedures.insert(
            name.clone(),
            Procedure { name, handler, input_schema, output_schema },
        );
        Ok(self)
    }

    /// Freezes the builder into a read-only [`Registry`].
    pub fn build(self) -> Registry {
        Registry { procedures: self.procedures }
    }
}

/// The immutable-after-`listen` map from procedure name to definition.
/// `lookup` never mutates and is safe to call concurrently from every
/// connection worker without any locking.
pub struct Registry {
    procedures: HashMap<String, Procedure>,
}

impl Registry {
    pub fn lookup(&self, name: &str) -> Option<&Procedure> {
        self.procedures.get(name)
    }

    pub fn len(&self) -> usize {
        self.procedures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.procedures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn identity_handler() -> Handler {
        Arc::new(|_ctx, params| Ok(params.unwrap_or(Value::Null)))
    }

    #[test]
    fn register_then_lookup_finds_procedure() {
        let mut builder = RegistryBuilder::new();
        builder.register("echo", identity_handler(), None, None).unwrap();
        let registry = builder.build();
        assert!(registry.lookup("echo").is_some());
        assert!(registry.lookup("missing").is_none());
    }

    #[test]
    fn duplicate_registration_fails() {
        let mut builder = RegistryBuilder::new();
        builder.register("echo", identity_handler(), None, None).unwrap();
        let err = builder.register("echo", identity_handler(), None, None).unwrap_err();
        assert!(matches!(err, RegistryError::ProcedureAlreadyExists(name) if name == "echo"));
    }

    #[test]
    fn handler_runs_through_registry_entry() {
        let mut builder = RegistryBuilder::new();
        builder.register("echo", identity_handler(), None, None).unwrap();
        let registry = builder.build();
        let procedure = registry.lookup("echo").unwrap();
        let arena = bumpalo::Bump::new();
        let ctx = Context::new(&arena, "echo", b"{}");
        let result = (procedure.handler)(&ctx, Some(json!({"a": 1}))).unwrap();
        assert_eq!(result, json!({"a": 1}));
    }
}
