use serde::{Deserialize, Serialize};
use validator::{extras, Validate, ValidateError};

use crate::util::validation;

pub mod write {
    use super::*;

    /// Shared by comment creation and comment edits, both of which
    /// carry a single `content` field.
    #[derive(Debug, Deserialize, Serialize)]
    pub struct Request {
        pub content: String,
    }

    impl Validate for Request {
        fn validate(&self) -> Result<(), ValidateError> {
            let mut fields = ValidateError::field_builder();
            fields.insert("content", {
                let mut error = ValidateError::msg_builder();
                if !extras::validate_length(&self.content, Some(1), Some(validation::CONTENT_MAX)) {
                    error.insert("Comment content is required");
                }
                error.build()
            });
            fields.build().into_result()
        }
    }
}
