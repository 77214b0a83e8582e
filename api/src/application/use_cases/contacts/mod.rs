pub mod delete_contact;
pub mod get_contact;
pub mod list_contacts;
pub mod request_password_reset;
pub mod search_contacts;
pub mod sign_up;
pub mod update_avatar;
pub mod update_contact;
pub mod upcoming_birthdays;

use crate::application::ports::user_cache::UserCache;

/// Drops the cached profile after a write. Cache failures are only logged.
pub(crate) async fn forget_cached<C: UserCache + ?Sized>(cache: &C, email: &str) {
    if let Err(err) = cache.invalidate(email).await {
        tracing::warn!(error = ?err, "profile_cache_invalidate_failed");
    }
}
