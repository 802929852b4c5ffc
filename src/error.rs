use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use mongodb::bson;
use serde::Serialize;

pub type StoreResult<T> = Result<T, StoreError>;

/// Faults raised by a `BookStore`. Absence is never an error.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database failure: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("invalid book id {0:?}")]
    InvalidId(String),

    #[error("cannot cast {field}: {reason}")]
    Cast { field: String, reason: String },

    #[error("failed to serialize document: {0}")]
    Serialization(#[from] bson::ser::Error),
}

impl StoreError {
    pub(crate) fn cast(field: &str, reason: impl Into<String>) -> Self {
        StoreError::Cast {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub error: &'a str,
}

/// Errors surfaced at the HTTP boundary. Only the fixed message reaches the client.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    BadRequest(&'static str),

    #[error("{message}")]
    Fault {
        message: &'static str,
        #[source]
        source: StoreError,
    },
}

impl ApiError {
    /// Builds a `map_err` adapter that logs the store fault and hides its detail.
    pub fn fault(message: &'static str) -> impl FnOnce(StoreError) -> ApiError {
        move |source| {
            log::error!("{}: {}", message, source);
            ApiError::Fault { message, source }
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Fault { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = self.to_string();
        HttpResponse::build(self.status_code()).json(ErrorBody { error: &message })
    }
}
