use crate::application::errors::{AppError, AppResult};
use crate::application::ports::contact_repository::ContactRepository;
use crate::domain::contacts::contact::Contact;

pub struct GetContact<'a, R: ContactRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: ContactRepository + ?Sized> GetContact<'a, R> {
    pub async fn execute(&self, id: i32) -> AppResult<Contact> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(AppError::contact_not_found)
    }
}
