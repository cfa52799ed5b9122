use std::error::Error as _;

use actix_web::{error::JsonPayloadError, http::StatusCode, HttpResponse, ResponseError};
use common::store::StoreError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed payload")]
    MalformedPayload(#[from] JsonPayloadError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            AppError::Store(StoreError::Validation) => StatusCode::BAD_REQUEST,
            AppError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
            AppError::Store(StoreError::Io { .. } | StoreError::Parse(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self.source() {
            Some(details) => json!({ "error": self.to_string(), "details": details.to_string() }),
            None => json!({ "error": self.to_string() }),
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}
