use actix_web::{body::BoxBody, http::StatusCode, HttpResponse};
use error_stack::Report;
use serde_json::json;

use super::Error;
use crate::database::{self, ErrorExt2};
use crate::schema::comment::WriteError as CommentWriteError;
use crate::schema::follow::FollowError;
use crate::schema::like::LikeError;
use crate::types::Error as ErrorType;

impl actix_web::ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self.error_type {
            ErrorType::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorType::InvalidFormBody(..) => StatusCode::BAD_REQUEST,
            ErrorType::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorType::Forbidden => StatusCode::FORBIDDEN,
            ErrorType::NotFound => StatusCode::NOT_FOUND,
            ErrorType::SelfFollow => StatusCode::BAD_REQUEST,
            ErrorType::AlreadyLiked => StatusCode::BAD_REQUEST,
            ErrorType::ReadonlyMode => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        let status = self.status_code();
        if status.is_server_error() {
            // The report never reaches the client; this is its only exit.
            tracing::error!("request failed: {self}");
        }

        let mut body = match serde_json::to_value(&self.error_type) {
            Ok(value) => value,
            Err(..) => json!({ "type": "internal" }),
        };
        if let serde_json::Value::Object(map) = &mut body {
            map.insert("message".into(), json!(self.error_type.to_string()));
        }

        HttpResponse::build(status).json(body)
    }
}

impl From<Report<database::Error>> for Error {
    fn from(value: Report<database::Error>) -> Self {
        if value.is_readonly() {
            Error::from_report(ErrorType::ReadonlyMode, value)
        } else {
            Error::from_report(ErrorType::Internal, value)
        }
    }
}

impl From<validator::ValidateError> for Error {
    fn from(value: validator::ValidateError) -> Self {
        #[derive(Debug, thiserror::Error)]
        #[error("Validation error occurred")]
        struct ValidateError;
        Error::from_context(ErrorType::InvalidFormBody(value), ValidateError)
    }
}

impl From<Report<FollowError>> for Error {
    fn from(value: Report<FollowError>) -> Self {
        let error_type = match value.current_context() {
            FollowError::SelfFollow => ErrorType::SelfFollow,
            FollowError::Database if value.is_readonly() => ErrorType::ReadonlyMode,
            FollowError::Database => ErrorType::Internal,
        };
        Error::from_report(error_type, value)
    }
}

impl From<Report<LikeError>> for Error {
    fn from(value: Report<LikeError>) -> Self {
        let error_type = match value.current_context() {
            LikeError::AlreadyLiked => ErrorType::AlreadyLiked,
            LikeError::Database if value.is_readonly() => ErrorType::ReadonlyMode,
            LikeError::Database => ErrorType::Internal,
        };
        Error::from_report(error_type, value)
    }
}

impl From<Report<CommentWriteError>> for Error {
    fn from(value: Report<CommentWriteError>) -> Self {
        let error_type = match value.current_context() {
            CommentWriteError::NotFound => ErrorType::NotFound,
            CommentWriteError::NotOwner => ErrorType::Forbidden,
            CommentWriteError::Database if value.is_readonly() => ErrorType::ReadonlyMode,
            CommentWriteError::Database => ErrorType::Internal,
        };
        Error::from_report(error_type, value)
    }
}
