use crate::application::errors::{AppError, AppResult};
use crate::application::ports::contact_repository::ContactRepository;
use crate::application::ports::user_cache::UserCache;
use crate::domain::contacts::contact::Contact;

pub struct DeleteContact<'a, R, C>
where
    R: ContactRepository + ?Sized,
    C: UserCache + ?Sized,
{
    pub repo: &'a R,
    pub cache: &'a C,
}

impl<'a, R, C> DeleteContact<'a, R, C>
where
    R: ContactRepository + ?Sized,
    C: UserCache + ?Sized,
{
    pub async fn execute(&self, actor: &Contact, id: i32) -> AppResult<()> {
        if actor.id != id {
            return Err(AppError::Forbidden);
        }
        let deleted = self
            .repo
            .delete(id)
            .await?
            .ok_or_else(AppError::contact_not_found)?;
        super::forget_cached(self.cache, &deleted.email).await;
        tracing::info!(contact_id = id, "contact_deleted");
        Ok(())
    }
}
