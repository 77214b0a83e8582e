use crate::application::errors::{AppError, AppResult};
use crate::application::ports::contact_repository::ContactRepository;
use crate::application::services::passwords;
use crate::application::services::tokens::JwtKeys;

pub struct Login<'a, R: ContactRepository + ?Sized> {
    pub repo: &'a R,
    pub keys: &'a JwtKeys,
}

#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: String,
    pub token_type: &'static str,
}

impl<'a, R: ContactRepository + ?Sized> Login<'a, R> {
    pub async fn execute(&self, req: &LoginRequest) -> AppResult<IssuedToken> {
        let rejected = || AppError::bad_request("Incorrect email or password");
        let contact = match self.repo.find_by_email(&req.email).await? {
            Some(c) if c.verified => c,
            _ => return Err(rejected()),
        };
        if !passwords::verify_password(&req.password, &contact.password_hash) {
            return Err(rejected());
        }
        let access_token = self.keys.issue(&contact.email)?;
        tracing::debug!(contact_id = contact.id, "login_succeeded");
        Ok(IssuedToken {
            access_token,
            token_type: "bearer",
        })
    }
}
