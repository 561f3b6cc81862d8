use serde::{Deserialize, Serialize};
use validator::{extras, Validate, ValidateError};

use crate::util::validation;

fn validate_content(content: &str) -> ValidateError {
    let mut error = ValidateError::msg_builder();
    if !extras::validate_length(content, Some(1), Some(validation::CONTENT_MAX)) {
        error.insert("Content must be 1 to 1000 characters long");
    }
    error.build()
}

fn validate_media_url(media_url: &str) -> ValidateError {
    let mut error = ValidateError::msg_builder();
    if !extras::validate_url(media_url)
        || !extras::validate_length(media_url, None, Some(validation::MEDIA_URL_MAX))
    {
        error.insert("Invalid media URL");
    }
    error.build()
}

pub mod publish {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    pub struct Request {
        pub content: String,
        pub media_url: Option<String>,
        #[serde(default = "Request::default_comments_enabled")]
        pub comments_enabled: bool,
    }

    impl Request {
        // Required by serde
        const fn default_comments_enabled() -> bool {
            true
        }
    }

    impl Validate for Request {
        fn validate(&self) -> Result<(), ValidateError> {
            let mut fields = ValidateError::field_builder();
            fields.insert("content", validate_content(&self.content));
            if let Some(media_url) = self.media_url.as_deref() {
                fields.insert("media_url", validate_media_url(media_url));
            }
            fields.build().into_result()
        }
    }
}

pub mod edit {
    use super::*;

    #[derive(Debug, Default, Deserialize, Serialize)]
    pub struct Request {
        pub content: Option<String>,
        pub media_url: Option<String>,
        pub comments_enabled: Option<bool>,
    }

    impl Validate for Request {
        fn validate(&self) -> Result<(), ValidateError> {
            let mut fields = ValidateError::field_builder();
            if let Some(content) = self.content.as_deref() {
                fields.insert("content", validate_content(content));
            }
            if let Some(media_url) = self.media_url.as_deref() {
                fields.insert("media_url", validate_media_url(media_url));
            }
            fields.build().into_result()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_content_bounds() {
        let form = publish::Request {
            content: String::new(),
            media_url: None,
            comments_enabled: true,
        };
        assert!(form.validate().is_err());

        let form = publish::Request {
            content: "n".repeat(validation::CONTENT_MAX + 1),
            media_url: None,
            comments_enabled: true,
        };
        assert!(form.validate().is_err());

        let form = publish::Request {
            content: "I'm a weirdo. #weirdo".into(),
            media_url: None,
            comments_enabled: true,
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_publish_media_url() {
        let form = publish::Request {
            content: "cat tax".into(),
            media_url: Some("not a url".into()),
            comments_enabled: true,
        };
        assert!(form.validate().is_err());

        let form = publish::Request {
            content: "cat tax".into(),
            media_url: Some("https://example.com/cat.png".into()),
            comments_enabled: true,
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_publish_comments_enabled_defaults_to_true() {
        let form: publish::Request = serde_json::from_str(r#"{"content": "hello"}"#).unwrap();
        assert!(form.comments_enabled);
    }

    #[test]
    fn test_edit_is_partial() {
        assert!(edit::Request::default().validate().is_ok());

        let form = edit::Request {
            content: Some(String::new()),
            ..Default::default()
        };
        assert!(form.validate().is_err());

        let form = edit::Request {
            comments_enabled: Some(false),
            ..Default::default()
        };
        assert!(form.validate().is_ok());
    }
}
