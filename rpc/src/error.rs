use thiserror::Error;

use procd_types::GrpcStatus;

/// A schema validation failure, produced by [`crate::schema_validator`]
/// against either a procedure's input or output schema. Input failures
/// are surfaced to the caller as `InvalidContent`; output failures
/// indicate a bug in the handler and are surfaced as `Internal`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaViolation {
    #[error("expected {expected}, got a different JSON type at `{path}`")]
    InvalidType { path: String, expected: &'static str },

    #[error("missing required property `{0}`")]
    MissingRequiredProperty(String),

    #[error("unknown property `{0}`")]
    UnknownProperty(String),

    #[error("expected a JSON object at `{0}`")]
    ExpectedObject(String),
}

/// The error a procedure handler returns. The dispatcher maps every
/// variant to a fixed `Internal` message via the kind-to-message table in
/// [`DispatchError::to_grpc_status`]; handlers never control their own
/// wire-visible error message, including `Other`, whose payload is for
/// local logging only and is never put on the wire.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("Invalid input parameters")]
    InvalidInput,
    #[error("Invalid parameter type")]
    InvalidType,
    #[error("Missing required property")]
    MissingRequiredProperty,
    #[error("{0}")]
    Other(String),
}

/// Every way a single dispatch can fail, already tagged with the
/// `GrpcStatus` and message the caller sees. Parse/lookup/validation
/// failures are constructed directly; handler failures funnel through
/// [`HandlerError`].
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Invalid JSON request: malformed JSON data")]
    InvalidJson,

    #[error("Request body must be a JSON object")]
    RequestNotObject,

    #[error("Missing method field in request")]
    MissingMethod,

    #[error("Invalid method type: expected string")]
    InvalidMethodType,

    #[error("Invalid request id: expected a string or integer")]
    InvalidId,

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Compression not supported")]
    CompressionNotSupported,

    #[error("Empty request body")]
    EmptyBody,

    #[error("Missing required input parameters for `{0}`")]
    MissingParams(String),

    #[error("Invalid input parameters for `{procedure}`: {violation}")]
    InputValidation { procedure: String, violation: SchemaViolation },

    #[error("{0}")]
    Handler(#[from] HandlerError),

    #[error("Invalid response type produced by `{procedure}`: {violation}")]
    OutputValidation { procedure: String, violation: SchemaViolation },

    #[error("Invalid response type produced by `{0}`")]
    OutputNotSerializable(String),
}

impl DispatchError {
    /// Maps this error to the gRPC status code and message the client
    /// sees on the wire. Kept as one function so the mapping table in the
    /// dispatch algorithm has exactly one source of truth.
    ///
    /// `Handler` is special-cased: its message is never `self.to_string()`,
    /// because `HandlerError::Other`'s `Display` carries whatever free-form
    /// text the handler passed in, and that text must never reach the
    /// wire. Every `HandlerError` variant maps to one of the fixed strings
    /// in the kind-to-message table instead.
    pub fn to_grpc_status(&self) -> (GrpcStatus, String) {
        if let DispatchError::Handler(handler_err) = self {
            let message = match handler_err {
                HandlerError::InvalidInput => "Invalid input parameters",
                HandlerError::InvalidType => "Invalid parameter type",
                HandlerError::MissingRequiredProperty => "Missing required property",
                HandlerError::Other(_) => "Internal server error",
            };
            return (GrpcStatus::Internal, message.to_string());
        }

        if let DispatchError::OutputValidation { procedure, violation } = self {
            let message = match violation {
                SchemaViolation::MissingRequiredProperty(_) => {
                    format!("Missing required property in response produced by `{procedure}`: {violation}")
                }
                _ => format!("Invalid response type produced by `{procedure}`: {violation}"),
            };
            return (GrpcStatus::Internal, message);
        }

        let status = match self {
            DispatchError::InvalidJson
            | DispatchError::RequestNotObject
            | DispatchError::MissingMethod
            | DispatchError::InvalidMethodType
            | DispatchError::InvalidId
            | DispatchError::MethodNotFound(_)
            | DispatchError::EmptyBody => GrpcStatus::InvalidArgument,

            DispatchError::CompressionNotSupported => GrpcStatus::Unimplemented,

            DispatchError::MissingParams(_) | DispatchError::InputValidation { .. } => {
                GrpcStatus::InvalidContent
            }

            DispatchError::OutputValidation { .. } | DispatchError::OutputNotSerializable(_) => {
                GrpcStatus::Internal
            }

            DispatchError::Handler(_) => unreachable!("handled above"),
        };
        (status, self.to_string())
    }
}
