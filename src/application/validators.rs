use validator::ValidateEmail;

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MAX_KEY_NAME_LEN: usize = 100;
pub const MAX_EXPIRES_IN_DAYS: i64 = 3650;

/// Validates that the input looks like a valid email address
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    !email.is_empty() && email.validate_email()
}

/// Validates a username.
/// Rules:
/// - 3-50 characters
/// - Only ASCII letters, numbers, dots, hyphens, underscores
pub fn is_valid_username(username: &str) -> bool {
    if username.len() < 3 || username.len() > 50 {
        return false;
    }

    username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_')
}

pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}
