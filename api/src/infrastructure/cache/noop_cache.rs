use async_trait::async_trait;

use crate::application::ports::user_cache::UserCache;
use crate::domain::contacts::contact::ContactProfile;

/// Used when no redis is configured: every lookup misses.
#[derive(Debug, Clone, Default)]
pub struct NoopUserCache;

#[async_trait]
impl UserCache for NoopUserCache {
    async fn get(&self, _email: &str) -> anyhow::Result<Option<ContactProfile>> {
        Ok(None)
    }

    async fn put(&self, _profile: &ContactProfile) -> anyhow::Result<()> {
        Ok(())
    }

    async fn invalidate(&self, _email: &str) -> anyhow::Result<()> {
        Ok(())
    }
}
