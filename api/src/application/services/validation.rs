use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)+$")
        .expect("email regex")
});

static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+?[0-9]{7,11}$").expect("phone regex"));

pub const NAME_MAX: usize = 50;
pub const EMAIL_MAX: usize = 120;
pub const PASSWORD_MIN: usize = 8;
pub const PASSWORD_MAX: usize = 250;

pub fn email(value: &str) -> Result<(), String> {
    if value.chars().count() > EMAIL_MAX {
        return Err(format!("email must be at most {EMAIL_MAX} characters"));
    }
    if !EMAIL_RE.is_match(value) {
        return Err("email is not a valid email address".into());
    }
    Ok(())
}

pub fn phone(value: &str) -> Result<(), String> {
    if !PHONE_RE.is_match(value) {
        return Err("phone must be 7 to 11 digits with an optional leading +".into());
    }
    Ok(())
}

pub fn name(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} must not be empty"));
    }
    if value.chars().count() > NAME_MAX {
        return Err(format!("{field} must be at most {NAME_MAX} characters"));
    }
    Ok(())
}

/// Length ceiling without a minimum, for login input.
pub fn password_max_len(value: &str) -> Result<(), String> {
    if value.chars().count() > PASSWORD_MAX {
        return Err(format!("password must be at most {PASSWORD_MAX} characters"));
    }
    Ok(())
}

pub fn password(value: &str) -> Result<(), String> {
    let len = value.chars().count();
    if len < PASSWORD_MIN {
        return Err(format!("password must be at least {PASSWORD_MIN} characters"));
    }
    if len > PASSWORD_MAX {
        return Err(format!("password must be at most {PASSWORD_MAX} characters"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emails() {
        assert!(email("john.doe@example.com").is_ok());
        assert!(email("invalid-email").is_err());
        assert!(email("a@localhost").is_err());
        assert!(email(&format!("{}@example.com", "a".repeat(120))).is_err());
    }

    #[test]
    fn phones() {
        assert!(phone("+1234567890").is_ok());
        assert!(phone("1234567").is_ok());
        assert!(phone("invalid-phone").is_err());
        assert!(phone("+123456789012").is_err());
    }

    #[test]
    fn passwords_and_names() {
        assert!(password("short").is_err());
        assert!(password("password123").is_ok());
        assert!(password(&"x".repeat(251)).is_err());
        assert!(password_max_len("short").is_ok());
        assert!(password_max_len(&"x".repeat(250)).is_ok());
        assert!(password_max_len(&"x".repeat(251)).is_err());
        assert!(name("first_name", " ").is_err());
        assert!(name("first_name", &"n".repeat(51)).is_err());
        assert!(name("first_name", "John").is_ok());
    }
}
