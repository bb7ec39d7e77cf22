//! Parses a JSON-RPC envelope, resolves the procedure, validates input,
//! invokes the handler, validates output, and assembles the response
//! envelope — success or a gRPC-status error, per the dispatch algorithm.

use bumpalo::Bump;
use procd_types::{GrpcStatus, JsonRpcId, JsonRpcResponse};
use serde_json::Value;

use crate::context::Context;
use crate::error::DispatchError;
use crate::registry::Registry;
use crate::schema_validator::SchemaValidator;

pub struct Dispatcher;

impl Dispatcher {
    /// Runs the full dispatch algorithm over one request body. `arena` is
    /// owned by the caller (the connection worker) and lives for the
    /// duration of this one request.
    pub fn dispatch(registry: &Registry, compressed: bool, body: &[u8], arena: &Bump) -> JsonRpcResponse {
        if compressed {
            let err = DispatchError::CompressionNotSupported;
            return JsonRpcResponse::error(None, GrpcStatus::Unimplemented.code(), err.to_string());
        }

        if body.is_empty() {
            let err = DispatchError::EmptyBody;
            return JsonRpcResponse::error(None, GrpcStatus::InvalidArgument.code(), err.to_string());
        }

        let parsed: Value = match serde_json::from_slice(body) {
            Ok(v) => v,
            Err(_) => {
                let err = DispatchError::InvalidJson;
                return JsonRpcResponse::error(None, GrpcStatus::InvalidArgument.code(), err.to_string());
            }
        };

        let object = match parsed.as_object() {
            Some(o) => o,
            None => {
                let err = DispatchError::RequestNotObject;
                return JsonRpcResponse::error(None, GrpcStatus::InvalidArgument.code(), err.to_string());
            }
        };

        // Envelope parse errors (including a malformed `id`) short-circuit
        // before method lookup, so they never echo an `id` they failed to
        // read cleanly.
        let id = match JsonRpcId::from_value(object.get("id")) {
            Ok(id) => id,
            Err(()) => {
                let err = DispatchError::InvalidId;
                return JsonRpcResponse::error(None, GrpcStatus::InvalidArgument.code(), err.to_string());
            }
        };

        let method = match object.get("method") {
            None => {
                let err = DispatchError::MissingMethod;
                return JsonRpcResponse::error(id, GrpcStatus::InvalidArgument.code(), err.to_string());
            }
            Some(Value::String(s)) => s.clone(),
            Some(_) => {
                let err = DispatchError::InvalidMethodType;
                return JsonRpcResponse::error(id, GrpcStatus::InvalidArgument.code(), err.to_string());
            }
        };

        let procedure = match registry.lookup(&method) {
            Some(p) => p,
            None => {
                let err = DispatchError::MethodNotFound(method);
                return JsonRpcResponse::error(id, GrpcStatus::InvalidArgument.code(), err.to_string());
            }
        };

        let params = object.get("params").cloned();

        if let Some(schema) = &procedure.input_schema {
            match &params {
                None => {
                    let err = DispatchError::MissingParams(method.clone());
                    return JsonRpcResponse::error(id, GrpcStatus::InvalidContent.code(), err.to_string());
                }
                Some(value) => {
                    if let Err(violation) = SchemaValidator::validate(schema, value) {
                        let err = DispatchError::InputValidation { procedure: method.clone(), violation };
                        return JsonRpcResponse::error(id, GrpcStatus::InvalidContent.code(), err.to_string());
                    }
                }
            }
        }

        let ctx = Context::new(arena, &method, body);
        let outcome = (procedure.handler)(&ctx, params);

        match outcome {
            Err(handler_err) => {
                let err = DispatchError::Handler(handler_err);
                let (status, message) = err.to_grpc_status();
                JsonRpcResponse::error(id, status.code(), message)
            }
            Ok(result) => {
                if let Some(output_schema) = &procedure.output_schema {
                    if let Err(violation) = SchemaValidator::validate(output_schema, &result) {
                        let err = DispatchError::OutputValidation { procedure: method.clone(), violation };
                        let (status, message) = err.to_grpc_status();
                        return JsonRpcResponse::error(id, status.code(), message);
                    }
                }
                JsonRpcResponse::success(id, result)
            }
        }
    }
}
