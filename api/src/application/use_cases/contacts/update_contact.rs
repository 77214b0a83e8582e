use crate::application::errors::{AppError, AppResult};
use crate::application::ports::contact_repository::ContactRepository;
use crate::application::ports::user_cache::UserCache;
use crate::domain::contacts::contact::{Contact, ContactPatch};

pub struct UpdateContact<'a, R, C>
where
    R: ContactRepository + ?Sized,
    C: UserCache + ?Sized,
{
    pub repo: &'a R,
    pub cache: &'a C,
}

impl<'a, R, C> UpdateContact<'a, R, C>
where
    R: ContactRepository + ?Sized,
    C: UserCache + ?Sized,
{
    pub async fn execute(&self, actor: &Contact, id: i32, patch: &ContactPatch) -> AppResult<Contact> {
        if actor.id != id {
            return Err(AppError::Forbidden);
        }
        let updated = self
            .repo
            .update(id, patch)
            .await?
            .ok_or_else(AppError::contact_not_found)?;
        super::forget_cached(self.cache, &updated.email).await;
        Ok(updated)
    }
}
