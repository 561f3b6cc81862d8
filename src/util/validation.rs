use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9-]+(?:\.[a-zA-Z0-9-]+)*$")
        .expect("compile email regex")
});

static USERNAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9\.\-_]*[A-Za-z0-9]$").expect("compile username regex"));

pub const USERNAME_MAX: usize = 30;
pub const PASSWORD_MIN: usize = 6;
pub const PASSWORD_MAX: usize = 128;
pub const FULL_NAME_MAX: usize = 100;
pub const CONTENT_MAX: usize = 1000;
pub const MEDIA_URL_MAX: usize = 2048;

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email) && email.len() <= 254
}

pub fn is_valid_password(pass: &str) -> bool {
    let len = pass.len();
    (PASSWORD_MIN..=PASSWORD_MAX).contains(&len)
}

pub fn is_valid_username(name: &str) -> bool {
    USERNAME_REGEX.is_match(name) && name.len() <= USERNAME_MAX
}

#[cfg(test)]
mod tests {
    use super::{is_valid_email, is_valid_password, is_valid_username};

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("gush@gmail.com"));
        assert!(is_valid_email("with.dots@sub.example.org"));
        assert!(!is_valid_email("nada_neutho"));
        assert!(!is_valid_email("@example.com"));
    }

    #[test]
    fn test_is_valid_username() {
        assert!(is_valid_username("memothelemo"));
        assert!(is_valid_username("mark.robes"));
        assert!(is_valid_username("salmon-ella"));
        assert!(is_valid_username("crossword_puzzle"));
        assert!(is_valid_username("2pac"));
        assert!(is_valid_username("_apple"));

        assert!(!is_valid_username("overlover_underscore_"));
        assert!(!is_valid_username("pretty ugly"));
        assert!(!is_valid_username("a"));
    }

    #[test]
    fn test_is_valid_password() {
        assert!(is_valid_password("hunter22"));
        assert!(!is_valid_password("short"));
        assert!(!is_valid_password(&"n".repeat(129)));
    }
}
