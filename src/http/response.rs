//! Response mapping.
//!
//! # Responsibilities
//! - Render the derived endpoint as the success body
//! - Map reconciliation and control plane errors to HTTP status codes
//!
//! # Design Decisions
//! - Merge conflicts are the caller's problem: 409 Conflict
//! - Control plane failures are upstream problems: 502 Bad Gateway
//! - Error bodies are plain text

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::control_plane::ControlPlaneError;
use crate::reconcile::MergeConflict;

/// Why a reconciliation request failed.
#[derive(Debug, Error)]
pub enum UpdateError {
    #[error(transparent)]
    Conflict(#[from] MergeConflict),

    #[error(transparent)]
    ControlPlane(#[from] ControlPlaneError),
}

impl UpdateError {
    pub fn status(&self) -> StatusCode {
        match self {
            UpdateError::Conflict(_) => StatusCode::CONFLICT,
            UpdateError::ControlPlane(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Metrics label.
    pub fn outcome(&self) -> &'static str {
        match self {
            UpdateError::Conflict(_) => "conflict",
            UpdateError::ControlPlane(_) => "control_plane_error",
        }
    }
}

impl IntoResponse for UpdateError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

/// Success body: `hostname:port` as `text/html`.
pub fn endpoint_response(endpoint: String) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        endpoint,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_maps_to_409() {
        let err = UpdateError::from(MergeConflict { path: "lbConfig.hostname".into() });
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.to_string(), "Conflict at lbConfig.hostname");
    }

    #[test]
    fn test_control_plane_maps_to_502() {
        let err = UpdateError::from(ControlPlaneError::Timeout(10));
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }
}
