use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub template: String,
    pub context: serde_json::Value,
}

/// Outgoing mail delivery. Implementations decide the transport.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> anyhow::Result<()>;
}
