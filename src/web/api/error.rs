use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::catalog::CatalogError;
use crate::error::ErrorKind;
use crate::orbit::OrbitError;
use crate::shield::ShieldError;
use crate::visibility::VisibilityError;

#[derive(Debug)]
pub struct ApiError {
    kind: ErrorKind,
    code: &'static str,
    message: String,
}

impl ApiError {
    pub fn new(kind: ErrorKind, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind,
            code,
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, "validation_failed", message)
    }

    #[cfg(test)]
    fn kind(&self) -> ErrorKind {
        self.kind
    }

    fn status(&self) -> StatusCode {
        match self.kind {
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::PolicyViolation => StatusCode::CONFLICT,
            ErrorKind::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(e: CatalogError) -> Self {
        let code = match &e {
            CatalogError::NotFound(_) => "satellite_not_found",
            CatalogError::EmptyQuery => "validation_failed",
            _ => "catalog_unavailable",
        };
        ApiError::new(e.kind(), code, e.to_string())
    }
}

impl From<OrbitError> for ApiError {
    fn from(e: OrbitError) -> Self {
        let code = match &e {
            OrbitError::ObjectNotFound(_) => "satellite_not_found",
            OrbitError::InvalidElements(_) => "invalid_elements",
            OrbitError::Propagation { .. } | OrbitError::Unavailable(_) => "propagation_failed",
        };
        ApiError::new(e.kind(), code, e.to_string())
    }
}

impl From<VisibilityError> for ApiError {
    fn from(e: VisibilityError) -> Self {
        let code = match e {
            VisibilityError::Catalog(e) => return e.into(),
            VisibilityError::Orbit(e) => return e.into(),
            VisibilityError::InvalidObservation(_) => "invalid_coordinates",
            VisibilityError::InvalidRadius(_) => "invalid_radius",
        };
        ApiError::new(e.kind(), code, e.to_string())
    }
}

impl From<ShieldError> for ApiError {
    fn from(e: ShieldError) -> Self {
        ApiError::new(e.kind(), e.code(), e.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        ApiError::invalid_input(e.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(e: QueryRejection) -> Self {
        ApiError::invalid_input(e.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(e: PathRejection) -> Self {
        ApiError::invalid_input(e.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::warn!("{}: {}", self.code, self.message);
        }
        (
            status,
            Json(ErrorResponse::with_message(self.code, &self.message)),
        )
            .into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn with_message(error: &str, message: &str) -> Self {
        ErrorResponse {
            error: error.to_string(),
            message: Some(message.to_string()),
        }
    }
}
