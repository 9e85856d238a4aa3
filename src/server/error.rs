use crate::store::StoreError;
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("not found")]
    NotFound,
    #[error("internal server error")]
    Internal,
}

#[derive(Serialize)]
struct ApiErrBody {
    error: String,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ApiErrBody {
            error: self.to_string(),
        })
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::InvalidPath(_) | StoreError::InvalidProjectId(_) => {
                ApiError::BadRequest(e.to_string())
            }
            StoreError::NotFound(_) => ApiError::NotFound,
            StoreError::Io { .. } | StoreError::Parse { .. } => {
                log::error!("storage error: {e}");
                ApiError::Internal
            }
        }
    }
}
