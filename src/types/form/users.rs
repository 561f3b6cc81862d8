use serde::{Deserialize, Serialize};
use validator::{extras, Validate, ValidateError};

use crate::types::id::UserId;
use crate::util::validation::{self, is_valid_email, is_valid_username};
use crate::util::Sensitive;

pub mod register {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    pub struct Request {
        pub username: Sensitive<String>,
        pub email: Sensitive<String>,
        pub password: Sensitive<String>,
        pub confirm_password: Sensitive<String>,
        pub full_name: String,
    }

    impl Validate for Request {
        fn validate(&self) -> Result<(), ValidateError> {
            let mut fields = ValidateError::field_builder();
            fields.insert("username", {
                let mut error = ValidateError::msg_builder();
                if !is_valid_username(self.username.as_str()) {
                    error.insert("Invalid username");
                }
                error.build()
            });

            fields.insert("email", {
                let mut error = ValidateError::msg_builder();
                if !is_valid_email(self.email.as_str()) {
                    error.insert("Invalid e-mail address");
                }
                error.build()
            });

            fields.insert("password", {
                // All passwords must have no trailing or leading whitespaces
                let mut error = ValidateError::msg_builder();
                let password = self.password.as_str().trim();
                if self.password.as_str().len() != password.len() {
                    error.insert("Passwords must not start or end with spaces");
                } else if !validation::is_valid_password(self.password.as_str()) {
                    error.insert("Passwords must be 6 to 128 characters long");
                }
                error.build()
            });

            if self.password.as_str() != self.confirm_password.as_str() {
                let mut error = ValidateError::msg_builder();
                error.insert("Unmatched password");
                fields.insert("confirm_password", error.build());
            }

            fields.insert("full_name", {
                let mut error = ValidateError::msg_builder();
                if !extras::validate_length(&self.full_name, Some(1), Some(validation::FULL_NAME_MAX)) {
                    error.insert("Full name must be 1 to 100 characters long");
                }
                error.build()
            });

            fields.build().into_result()
        }
    }

    #[derive(Debug, Deserialize, Serialize)]
    pub struct Response {
        pub id: UserId,
        pub token: Sensitive<String>,
    }
}

pub mod login {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    pub struct Request {
        pub username_or_email: Sensitive<String>,
        pub password: Sensitive<String>,
    }

    impl Validate for Request {
        fn validate(&self) -> Result<(), ValidateError> {
            let mut fields = ValidateError::field_builder();
            fields.insert("username_or_email", {
                let mut error = ValidateError::msg_builder();
                if !extras::validate_length(&self.username_or_email, Some(1), Some(254)) {
                    error.insert("Must not be empty");
                }
                error.build()
            });
            fields.insert("password", {
                let mut error = ValidateError::msg_builder();
                if !extras::validate_length(&self.password, Some(1), Some(validation::PASSWORD_MAX)) {
                    error.insert("Must not be empty");
                }
                error.build()
            });
            fields.build().into_result()
        }
    }

    #[derive(Debug, Deserialize, Serialize)]
    pub struct Response {
        pub id: UserId,
        pub token: Sensitive<String>,
    }
}

pub mod update_profile {
    use super::*;

    #[derive(Debug, Default, Deserialize, Serialize)]
    pub struct Request {
        pub username: Option<Sensitive<String>>,
        pub email: Option<Sensitive<String>>,
        pub full_name: Option<String>,
        pub password: Option<Sensitive<String>>,
    }

    impl Validate for Request {
        fn validate(&self) -> Result<(), ValidateError> {
            let mut fields = ValidateError::field_builder();

            if let Some(username) = self.username.as_ref() {
                fields.insert("username", {
                    let mut error = ValidateError::msg_builder();
                    if !is_valid_username(username.as_str()) {
                        error.insert("Invalid username");
                    }
                    error.build()
                });
            }

            if let Some(email) = self.email.as_ref() {
                fields.insert("email", {
                    let mut error = ValidateError::msg_builder();
                    if !is_valid_email(email.as_str()) {
                        error.insert("Invalid e-mail address");
                    }
                    error.build()
                });
            }

            if let Some(full_name) = self.full_name.as_ref() {
                fields.insert("full_name", {
                    let mut error = ValidateError::msg_builder();
                    if !extras::validate_length(full_name, Some(1), Some(validation::FULL_NAME_MAX)) {
                        error.insert("Full name must be 1 to 100 characters long");
                    }
                    error.build()
                });
            }

            if let Some(password) = self.password.as_ref() {
                fields.insert("password", {
                    let mut error = ValidateError::msg_builder();
                    if !validation::is_valid_password(password.as_str()) {
                        error.insert("Passwords must be 6 to 128 characters long");
                    }
                    error.build()
                });
            }

            fields.build().into_result()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[track_caller]
    fn must_fail<T: Validate>(value: &T, args: std::fmt::Arguments<'_>) {
        if value.validate().is_ok() {
            panic!("expected to fail but passed (entry = {args})");
        }
    }

    fn register_form(password: &str, confirm: &str) -> register::Request {
        register::Request {
            username: "memothelemo".to_string().into(),
            email: "memo@example.com".to_string().into(),
            password: password.to_string().into(),
            confirm_password: confirm.to_string().into(),
            full_name: "Memo Thelemo".into(),
        }
    }

    #[test]
    fn test_register_password_fields() {
        static INVALID_PASSWORDS: &[&str] = &[
            "\thelloworld",
            "    hello",
            "world    ",
            "short",
            "we_dont_accept_tabs\t",
        ];

        for combination in INVALID_PASSWORDS {
            must_fail(&register_form(combination, combination), format_args!("{combination:?}"));
        }

        assert!(register_form("wrong_password", "wrong_password1").validate().is_err());
        assert!(register_form("wrong_password", "wrong_password").validate().is_ok());
    }

    #[test]
    fn test_register_identity_fields() {
        let mut form = register_form("hunter2345", "hunter2345");
        form.username = "pretty ugly".to_string().into();
        must_fail(&form, format_args!("invalid username"));

        let mut form = register_form("hunter2345", "hunter2345");
        form.email = "nada_neutho".to_string().into();
        must_fail(&form, format_args!("invalid email"));

        let mut form = register_form("hunter2345", "hunter2345");
        form.full_name = String::new();
        must_fail(&form, format_args!("empty full name"));
    }

    #[test]
    fn test_update_profile_is_partial() {
        let form = update_profile::Request::default();
        assert!(form.validate().is_ok());

        let form = update_profile::Request {
            username: Some("pretty ugly".to_string().into()),
            ..Default::default()
        };
        must_fail(&form, format_args!("invalid username"));

        let form = update_profile::Request {
            full_name: Some("Memo".into()),
            ..Default::default()
        };
        assert!(form.validate().is_ok());
    }
}
