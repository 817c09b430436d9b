use std::sync::OnceLock;
use regex::Regex;

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MIN_NAME_LEN: usize = 2;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
    })
}

fn url_regex() -> &'static Regex {
    static URL: OnceLock<Regex> = OnceLock::new();
    URL.get_or_init(|| {
        Regex::new(r"^https?://[^\s/$.?#][^\s]*$").expect("url pattern is valid")
    })
}

pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email.trim())
}

pub fn is_valid_url(url: &str) -> bool {
    url_regex().is_match(url.trim())
}

/// Login and registration password rule.
pub fn check_password(password: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(format!("Password must be at least {} characters", MIN_PASSWORD_LEN));
    }
    Ok(())
}

pub fn check_email(email: &str) -> Result<(), String> {
    if !is_valid_email(email) {
        return Err("Invalid email address".to_string());
    }
    Ok(())
}

pub fn check_name(name: &str) -> Result<(), String> {
    if name.trim().chars().count() < MIN_NAME_LEN {
        return Err(format!("Name must be at least {} characters", MIN_NAME_LEN));
    }
    Ok(())
}

/// Optional photo URL: blank means "not provided".
pub fn normalize_photo_url(photo_url: Option<&str>) -> Result<Option<String>, String> {
    match photo_url.map(str::trim) {
        None | Some("") => Ok(None),
        Some(url) if is_valid_url(url) => Ok(Some(url.to_string())),
        Some(_) => Err("Invalid URL".to_string()),
    }
}

/// Empty filter strings mean "no filter".
pub fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
