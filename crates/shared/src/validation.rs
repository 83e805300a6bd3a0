//! Registration input validation.
//!
//! Email shape and domain checks gate who may register; password rules are
//! evaluated in a fixed order so the first failing rule is always the one
//! reported.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use validator::ValidationError;

/// Minimum password length in characters.
pub const MIN_PASSWORD_LENGTH: usize = 8;

lazy_static! {
    static ref EMAIL_SHAPE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();

    /// Consumer webmail and disposable-mail domains that cannot register.
    static ref PERSONAL_EMAIL_DOMAINS: HashSet<&'static str> = [
        // Google
        "gmail.com", "googlemail.com",
        // Yahoo
        "yahoo.com", "yahoo.co.uk", "yahoo.fr", "yahoo.de", "yahoo.es", "yahoo.it",
        "yahoo.com.vn", "yahoo.com.au", "yahoo.ca", "rocketmail.com",
        // Microsoft
        "hotmail.com", "hotmail.co.uk", "hotmail.fr", "hotmail.de", "hotmail.it",
        "hotmail.es", "hotmail.com.vn", "outlook.com", "outlook.fr", "outlook.de",
        "outlook.es", "outlook.com.vn", "live.com", "live.co.uk", "live.fr", "live.com.vn",
        // Apple
        "icloud.com", "me.com", "mac.com",
        // AOL
        "aol.com", "aol.co.uk", "aim.com",
        // Privacy-focused
        "protonmail.com", "proton.me", "pm.me", "tutanota.com", "tutamail.com", "hey.com",
        "fastmail.com", "fastmail.fm",
        // Generic providers
        "mail.com", "email.com", "zoho.com", "inbox.com", "gmx.com", "gmx.de", "gmx.net",
        "web.de", "yandex.com", "yandex.ru", "mail.ru", "list.ru", "bk.ru", "inbox.ru",
        // China
        "qq.com", "163.com", "126.com", "sina.com", "sina.cn", "sohu.com",
        // France, Italy, India
        "laposte.net", "free.fr", "orange.fr", "wanadoo.fr", "libero.it", "rediffmail.com",
        // Disposable
        "trashmail.com", "guerrillamail.com", "guerrillamailblock.com", "mailinator.com",
        "tempmail.com", "sharklasers.com", "grr.la", "spam4.me",
    ]
    .into_iter()
    .collect();
}

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Trims and lowercases an email address.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validates the basic `local@domain.tld` shape.
pub fn validate_email_shape(email: &str) -> Result<(), ValidationError> {
    if EMAIL_SHAPE.is_match(email) {
        Ok(())
    } else {
        Err(error("email_format", "Invalid email address"))
    }
}

/// Returns the part after the last `@`, lowercased.
pub fn email_domain(email: &str) -> Option<String> {
    email
        .rsplit_once('@')
        .map(|(_, domain)| domain.to_lowercase())
        .filter(|domain| !domain.is_empty())
}

/// Whether the domain belongs to a consumer or disposable mailbox provider.
pub fn is_personal_email_domain(domain: &str) -> bool {
    PERSONAL_EMAIL_DOMAINS.contains(domain.to_lowercase().as_str())
}

/// Number of denylisted domains.
pub fn personal_email_domain_count() -> usize {
    PERSONAL_EMAIL_DOMAINS.len()
}

/// Checks password strength: length, uppercase, lowercase, digit, special.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(error(
            "password_length",
            "Password must be at least 8 characters",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(error(
            "password_uppercase",
            "Password must contain at least one uppercase letter",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(error(
            "password_lowercase",
            "Password must contain at least one lowercase letter",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(error(
            "password_digit",
            "Password must contain at least one digit",
        ));
    }
    if password.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(error(
            "password_special",
            "Password must contain at least one special character",
        ));
    }
    Ok(())
}
