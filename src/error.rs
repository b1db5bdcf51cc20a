use serde::Serialize;
use strum_macros::{AsRefStr, Display};
use utoipa::ToSchema;

/// Failure classes surfaced at the service boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, AsRefStr, ToSchema)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed or out-of-range request data. Nothing was mutated.
    InvalidInput,
    /// Unknown satellite or shield identifier.
    NotFound,
    /// A domain rule rejected the operation.
    PolicyViolation,
    /// Catalog or orbital state cannot be produced right now; safe to retry.
    Unavailable,
}
