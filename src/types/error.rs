use serde::{Deserialize, Serialize};
use std::fmt::Display;
use validator::ValidateError;

/// Client-visible error taxonomy. Serialized into every non-2xx
/// response body; the [`Display`] text becomes the `message` field.
#[derive(Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Error {
    Internal,
    InvalidFormBody(ValidateError),
    Unauthorized,
    Forbidden,
    NotFound,
    SelfFollow,
    AlreadyLiked,
    ReadonlyMode,
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Internal => f.write_str("Internal server error"),
            Error::InvalidFormBody(..) => f.write_str("Request performed with invalid body"),
            Error::Unauthorized => f.write_str("Authentication required"),
            Error::Forbidden => f.write_str("You do not own this resource"),
            Error::NotFound => f.write_str("Resource not found"),
            Error::SelfFollow => f.write_str("You cannot follow yourself"),
            Error::AlreadyLiked => f.write_str("Already liked this post"),
            Error::ReadonlyMode => f.write_str("Attempt to write read-only database"),
        }
    }
}
