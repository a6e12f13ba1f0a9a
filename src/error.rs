use actix_web::{HttpResponse, http::StatusCode};
use sea_orm::DbErr;
use thiserror::Error;

use crate::gateways::GatewayError;

/// Error type shared by every handler and service in the crate.
///
/// Each variant maps to one HTTP status so handlers can simply return
/// `Result<HttpResponse, ApiError>` and let actix render the response.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Forbidden(String),

    /// The gateway explicitly reported the payment as not (yet) complete.
    /// Nothing was mutated; the caller should poll again later.
    #[error("payment not completed")]
    PaymentNotCompleted,

    /// Attempted transition violates the contract/bid state machine.
    #[error("{0}")]
    StateTransition(String),

    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("database error: {0}")]
    Database(DbErr),
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        // Query helpers signal missing rows the SeaORM way; surface them
        // as 404s instead of opaque 500s.
        match err {
            DbErr::RecordNotFound(msg) => ApiError::NotFound(msg),
            other => ApiError::Database(other),
        }
    }
}

impl actix_web::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::PaymentNotCompleted => StatusCode::BAD_REQUEST,
            ApiError::StateTransition(_) => StatusCode::CONFLICT,
            ApiError::Gateway(GatewayError::Timeout) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Gateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    #[test]
    fn status_codes_follow_the_taxonomy() {
        assert_eq!(
            ApiError::Validation("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound("missing".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Conflict("dup".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::PaymentNotCompleted.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::StateTransition("no".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Gateway(GatewayError::Timeout).status_code(),
            StatusCode::GATEWAY_TIMEOUT
        );
    }

    #[test]
    fn record_not_found_becomes_404() {
        let err: ApiError = DbErr::RecordNotFound("Contract not found".to_string()).into();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
