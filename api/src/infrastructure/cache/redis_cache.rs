use anyhow::Context;
use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

use crate::application::ports::user_cache::{UserCache, cache_key};
use crate::domain::contacts::contact::ContactProfile;

/// Profile cache stored as JSON strings under `current_user_{email}`.
#[derive(Clone)]
pub struct RedisUserCache {
    conn: ConnectionManager,
    ttl_secs: u64,
}

impl RedisUserCache {
    pub async fn connect(redis_url: &str, ttl_secs: u64) -> anyhow::Result<Self> {
        let client = redis::Client::open(redis_url)?;
        let conn = ConnectionManager::new(client)
            .await
            .context("redis_connection_manager")?;
        Ok(Self {
            conn,
            ttl_secs: ttl_secs.max(1),
        })
    }
}

#[async_trait]
impl UserCache for RedisUserCache {
    async fn get(&self, email: &str) -> anyhow::Result<Option<ContactProfile>> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn
            .get(cache_key(email))
            .await
            .context("redis_get_profile")?;
        match raw {
            Some(json) => match serde_json::from_str(&json) {
                Ok(profile) => Ok(Some(profile)),
                Err(err) => {
                    tracing::warn!(error = ?err, "discarding_unreadable_cached_profile");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    async fn put(&self, profile: &ContactProfile) -> anyhow::Result<()> {
        let mut conn = self.conn.clone();
        let json = serde_json::to_string(profile)?;
        let _: () = conn
            .set_ex(cache_key(&profile.email), json, self.ttl_secs)
            .await
            .context("redis_set_profile")?;
        Ok(())
    }

    async fn invalidate(&self, email: &str) -> anyhow::Result<()> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .del(cache_key(email))
            .await
            .context("redis_del_profile")?;
        Ok(())
    }
}
