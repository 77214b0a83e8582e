mod log_sender;
pub mod templates;

pub use log_sender::LogEmailSender;
