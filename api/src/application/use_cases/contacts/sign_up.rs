use chrono::NaiveDate;
use serde_json::json;

use crate::application::errors::{AppError, AppResult};
use crate::application::ports::contact_repository::{ContactRepository, CreateContactError};
use crate::application::ports::email_sender::{EmailMessage, EmailSender};
use crate::application::services::{gravatar, passwords, tokens};
use crate::domain::contacts::contact::{Contact, NewContact, UserRole};

pub struct SignUp<'a, R, M>
where
    R: ContactRepository + ?Sized,
    M: EmailSender + ?Sized,
{
    pub repo: &'a R,
    pub mailer: &'a M,
    pub host: &'a str,
}

#[derive(Debug, Clone)]
pub struct SignUpRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub role: UserRole,
    pub birth_day: NaiveDate,
    pub data: Option<serde_json::Value>,
    pub password: String,
}

impl<'a, R, M> SignUp<'a, R, M>
where
    R: ContactRepository + ?Sized,
    M: EmailSender + ?Sized,
{
    pub async fn execute(&self, req: SignUpRequest) -> AppResult<Contact> {
        if self.repo.find_by_email(&req.email).await?.is_some() {
            return Err(AppError::Conflict("Contact already exists".into()));
        }
        let password_hash = passwords::hash_password(&req.password)?;
        let new = NewContact {
            avatar: Some(gravatar::gravatar_url(&req.email)),
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            phone: req.phone,
            role: req.role,
            birth_day: req.birth_day,
            data: req.data,
            password_hash,
            verification_token: tokens::random_token(),
        };
        // A concurrent signup can still win between the lookup and the insert.
        let contact = match self.repo.create(&new).await {
            Ok(contact) => contact,
            Err(CreateContactError::DuplicateEmail) => {
                return Err(AppError::Conflict("Contact already exists".into()));
            }
            Err(CreateContactError::Other(err)) => return Err(err.into()),
        };
        tracing::info!(contact_id = contact.id, "contact_signed_up");

        let message = EmailMessage {
            to: contact.email.clone(),
            subject: "Welcome to Contacts".into(),
            template: "verify_email".into(),
            context: json!({
                "token": contact.verification_token,
                "host": self.host,
                "first_name": contact.first_name,
            }),
        };
        if let Err(err) = self.mailer.send(&message).await {
            tracing::warn!(contact_id = contact.id, error = ?err, "verification_email_failed");
        }
        Ok(contact)
    }
}
