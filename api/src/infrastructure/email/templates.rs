use crate::application::ports::email_sender::EmailMessage;

/// Plain-text body for a templated message.
pub fn render_body(message: &EmailMessage) -> String {
    let field = |key: &str| {
        message
            .context
            .get(key)
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string()
    };
    let first_name = field("first_name");
    let host = field("host");
    let token = field("token");
    match message.template.as_str() {
        "verify_email" => format!(
            "Hi {first_name},\n\nThanks for signing up. Confirm your email address by opening:\n\nhttp://{host}/api/auth/verify/{token}\n"
        ),
        "reset_password" => format!(
            "Hi {first_name},\n\nA password reset was requested for your account. Use this token to set a new password:\n\nhttp://{host}/api/auth/set-password/{token}\n\nIf you did not request it, ignore this email.\n"
        ),
        other => format!("{other}: {}", message.context),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn verification_body_contains_link() {
        let msg = EmailMessage {
            to: "john.doe@example.com".into(),
            subject: "Welcome to Contacts".into(),
            template: "verify_email".into(),
            context: json!({"token": "abc", "host": "localhost:8000", "first_name": "John"}),
        };
        let body = render_body(&msg);
        assert!(body.starts_with("Hi John,"));
        assert!(body.contains("http://localhost:8000/api/auth/verify/abc"));
    }

    #[test]
    fn reset_body_contains_token() {
        let msg = EmailMessage {
            to: "john.doe@example.com".into(),
            subject: "Reset password".into(),
            template: "reset_password".into(),
            context: json!({"token": "t0k", "host": "example.com", "first_name": "John"}),
        };
        assert!(render_body(&msg).contains("/api/auth/set-password/t0k"));
    }
}
