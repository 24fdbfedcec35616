use crate::logic::{FieldErrors, LoginError, MatchError, ScoringError, TrackingError};
use crate::store::StoreError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

const ACCESS_DENIED: &str = "Access Denied";
pub const PAGE_DENIED: &str = "Please contact admin to get permission for this page.";
const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn login_required() -> Self {
        ApiError::Unauthorized("Please log in".to_string())
    }

    pub fn page_denied() -> Self {
        ApiError::Forbidden(PAGE_DENIED.to_string())
    }

    pub fn not_found(what: &str) -> Self {
        ApiError::NotFound(format!("{} not found", what))
    }

    /// Poisoned lock or other server-side failure; details stay in the log.
    pub fn internal() -> Self {
        ApiError::Internal(GENERIC_FAILURE.to_string())
    }
}

#[derive(Serialize)]
struct ErrorResponse<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
}

#[derive(Serialize)]
struct ValidationResponse<'a> {
    errors: &'a FieldErrors,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut res = HttpResponse::build(self.status_code());
        match self {
            ApiError::Validation(errors) => res.json(ValidationResponse { errors }),
            ApiError::Forbidden(message) => res.json(ErrorResponse {
                error: ACCESS_DENIED,
                message: Some(message),
            }),
            ApiError::Unauthorized(m)
            | ApiError::NotFound(m)
            | ApiError::BadRequest(m)
            | ApiError::Conflict(m)
            | ApiError::Internal(m) => res.json(ErrorResponse {
                error: m,
                message: None,
            }),
        }
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<LoginError> for ApiError {
    fn from(e: LoginError) -> Self {
        match e {
            LoginError::MissingCredentials => ApiError::BadRequest(e.to_string()),
            LoginError::InvalidCredentials
            | LoginError::RoleMismatch
            | LoginError::AccountInactive => ApiError::Unauthorized(e.to_string()),
        }
    }
}

impl From<MatchError> for ApiError {
    fn from(e: MatchError) -> Self {
        match e {
            MatchError::AdminOnly | MatchError::Forbidden => ApiError::Forbidden(e.to_string()),
            MatchError::InvalidTransition { .. } | MatchError::ClockNotLive => {
                ApiError::Conflict(e.to_string())
            }
        }
    }
}

impl From<ScoringError> for ApiError {
    fn from(e: ScoringError) -> Self {
        match e {
            ScoringError::MatchNotLive => ApiError::Conflict(e.to_string()),
            ScoringError::TeamNotInMatch(_) | ScoringError::PlayerNotInTeam(_) => {
                ApiError::BadRequest(e.to_string())
            }
            ScoringError::Forbidden => ApiError::Forbidden(e.to_string()),
            ScoringError::Store(_) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<TrackingError> for ApiError {
    fn from(e: TrackingError) -> Self {
        match e {
            TrackingError::BadTimeFormat => {
                let mut errors = FieldErrors::new();
                errors.add("time", e.to_string());
                ApiError::Validation(errors)
            }
            TrackingError::NoData => ApiError::NotFound(e.to_string()),
            TrackingError::Export(ref detail) => {
                log::error!("CSV export failed: {}", detail);
                ApiError::Internal("Failed to export tracking data".to_string())
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        log::error!("Store error: {}", e);
        ApiError::internal()
    }
}
