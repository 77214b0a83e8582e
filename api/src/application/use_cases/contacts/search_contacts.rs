use crate::application::errors::{AppError, AppResult};
use crate::application::ports::contact_repository::ContactRepository;
use crate::domain::contacts::contact::{Contact, ContactFilter};

pub struct SearchContacts<'a, R: ContactRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: ContactRepository + ?Sized> SearchContacts<'a, R> {
    pub async fn execute(&self, filter: &ContactFilter) -> AppResult<Vec<Contact>> {
        if filter.is_empty() {
            return Err(AppError::bad_request("No search parameters provided"));
        }
        Ok(self.repo.search(filter).await?)
    }
}
