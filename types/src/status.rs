//! gRPC status codes used on the wire. Only the subset this engine emits
//! is modeled; the integers match the gRPC status registry so a
//! gRPC-aware client can interpret them even though this engine does not
//! speak HTTP/2.

/// A gRPC status code this engine can produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GrpcStatus {
    Ok,
    InvalidArgument,
    DeadlineExceeded,
    InvalidContent,
    Unimplemented,
    Internal,
}

impl GrpcStatus {
    pub const fn code(self) -> i32 {
        match self {
            GrpcStatus::Ok => 0,
            GrpcStatus::InvalidArgument => 3,
            GrpcStatus::DeadlineExceeded => 4,
            GrpcStatus::InvalidContent => 9,
            GrpcStatus::Unimplemented => 12,
            GrpcStatus::Internal => 13,
        }
    }
}
