use async_trait::async_trait;

use crate::domain::contacts::contact::ContactProfile;

#[async_trait]
pub trait UserCache: Send + Sync {
    async fn get(&self, email: &str) -> anyhow::Result<Option<ContactProfile>>;
    async fn put(&self, profile: &ContactProfile) -> anyhow::Result<()>;
    async fn invalidate(&self, email: &str) -> anyhow::Result<()>;
}

pub fn cache_key(email: &str) -> String {
    format!("current_user_{email}")
}
