use crate::application::errors::AppResult;
use crate::application::ports::contact_repository::ContactRepository;
use crate::domain::contacts::contact::Contact;

pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

pub struct ListContacts<'a, R: ContactRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: ContactRepository + ?Sized> ListContacts<'a, R> {
    pub async fn execute(&self, skip: i64, limit: i64) -> AppResult<Vec<Contact>> {
        let skip = skip.max(0);
        let limit = limit.clamp(0, MAX_LIMIT);
        if limit == 0 {
            return Ok(Vec::new());
        }
        Ok(self.repo.list(skip, limit).await?)
    }
}
