use once_cell::sync::Lazy;
use regex::Regex;
// An extension trait to provide the `graphemes` method on `String` and `&str`
use unicode_segmentation::UnicodeSegmentation;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

// Either international (+1234567890) or dashed local (123-456-7890).
static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\+[0-9]{7,15}|[0-9]{3}-[0-9]{3}-[0-9]{4})$").expect("valid phone regex")
});

#[derive(Debug)]
pub struct UserName(String);

impl UserName {
    pub fn parse(s: String) -> std::result::Result<UserName, String> {
        let is_empty_or_whitespace = s.trim().is_empty();
        let is_too_long = s.graphemes(true).count() > 150;
        let forbidden_characters = ['/', '(', ')', '"', '<', '>', '\\', '{', '}'];
        let contains_forbidden_characters = s.chars().any(|c| forbidden_characters.contains(&c));

        if is_empty_or_whitespace || is_too_long || contains_forbidden_characters {
            Err(format!("{} is not a valid username.", s))
        } else {
            Ok(Self(s))
        }
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug)]
pub struct UserEmail(String);

impl UserEmail {
    pub fn parse(s: String) -> std::result::Result<UserEmail, String> {
        if s.len() <= 254 && EMAIL_REGEX.is_match(&s) {
            Ok(Self(s))
        } else {
            Err(format!("{} is not a valid email address.", s))
        }
    }
}

impl AsRef<str> for UserEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug)]
pub struct CustomerPhone(String);

impl CustomerPhone {
    pub fn parse(s: String) -> std::result::Result<CustomerPhone, String> {
        if PHONE_REGEX.is_match(&s) {
            Ok(Self(s))
        } else {
            Err(format!(
                "{} is not a valid phone number (expected +1234567890 or 123-456-7890).",
                s
            ))
        }
    }
}

impl AsRef<str> for CustomerPhone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Trims optional free-text fields, treating blank values as absent.
pub fn optional_text(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
