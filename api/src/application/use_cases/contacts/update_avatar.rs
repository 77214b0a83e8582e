use crate::application::errors::{AppError, AppResult};
use crate::application::ports::avatar_storage::AvatarStorage;
use crate::application::ports::contact_repository::ContactRepository;
use crate::application::ports::user_cache::UserCache;
use crate::domain::contacts::contact::Contact;

pub struct UpdateAvatar<'a, R, S, C>
where
    R: ContactRepository + ?Sized,
    S: AvatarStorage + ?Sized,
    C: UserCache + ?Sized,
{
    pub repo: &'a R,
    pub storage: &'a S,
    pub cache: &'a C,
}

pub struct AvatarUpload {
    pub bytes: Vec<u8>,
    pub filename: Option<String>,
    pub content_type: Option<String>,
}

impl<'a, R, S, C> UpdateAvatar<'a, R, S, C>
where
    R: ContactRepository + ?Sized,
    S: AvatarStorage + ?Sized,
    C: UserCache + ?Sized,
{
    pub async fn execute(&self, actor: &Contact, upload: AvatarUpload) -> AppResult<Contact> {
        if !actor.is_admin() {
            return Err(AppError::Forbidden);
        }
        if upload.bytes.is_empty() {
            return Err(AppError::validation("file must not be empty"));
        }
        let is_image = upload
            .content_type
            .as_deref()
            .map(|ct| ct.starts_with("image/"))
            .unwrap_or(false);
        if !is_image {
            return Err(AppError::validation("file must be an image"));
        }

        let stored = self
            .storage
            .store_avatar(
                actor.id,
                upload.filename.as_deref(),
                upload.content_type.as_deref(),
                &upload.bytes,
            )
            .await
            .map_err(|err| {
                tracing::error!(error = ?err, contact_id = actor.id, "store_avatar_failed");
                err
            })?;

        let updated = self
            .repo
            .update_avatar(actor.id, &stored.url)
            .await?
            .ok_or_else(AppError::contact_not_found)?;
        super::forget_cached(self.cache, &updated.email).await;
        Ok(updated)
    }
}
