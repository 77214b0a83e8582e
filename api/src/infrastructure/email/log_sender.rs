use async_trait::async_trait;
use tracing::info;

use crate::application::ports::email_sender::{EmailMessage, EmailSender};
use crate::infrastructure::email::templates::render_body;

/// Sender that writes messages to the log instead of delivering them.
#[derive(Clone, Debug)]
pub struct LogEmailSender {
    pub from: String,
    pub from_name: String,
}

impl LogEmailSender {
    pub fn new(from: impl Into<String>, from_name: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            from_name: from_name.into(),
        }
    }
}

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send(&self, message: &EmailMessage) -> anyhow::Result<()> {
        let body = render_body(message);
        info!(
            from = %format!("{} <{}>", self.from_name, self.from),
            to = %message.to,
            subject = %message.subject,
            template = %message.template,
            body = %body,
            "email send stub"
        );
        Ok(())
    }
}
