use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;

use crate::application::ports::avatar_storage::{AvatarStorage, StoredAvatar};
use crate::infrastructure::storage::{avatar_relative_path, local_avatar_url};

/// Writes avatars under `uploads_root`; the API serves that directory at
/// `/api/uploads`.
pub struct FsAvatarStorage {
    pub uploads_root: PathBuf,
    pub public_base_url: Option<String>,
}

impl FsAvatarStorage {
    pub fn new(uploads_root: impl Into<PathBuf>, public_base_url: Option<String>) -> Self {
        Self {
            uploads_root: uploads_root.into(),
            public_base_url,
        }
    }
}

#[async_trait]
impl AvatarStorage for FsAvatarStorage {
    async fn store_avatar(
        &self,
        contact_id: i32,
        original_filename: Option<&str>,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> anyhow::Result<StoredAvatar> {
        use tokio::fs;

        let relative = avatar_relative_path(contact_id, original_filename, content_type);
        let full = self.uploads_root.join(&relative);
        if let Some(dir) = full.parent() {
            fs::create_dir_all(dir)
                .await
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }
        fs::write(&full, bytes)
            .await
            .with_context(|| format!("failed to write {}", full.display()))?;
        tracing::debug!(contact_id, path = %relative, size = bytes.len(), "avatar_stored");
        Ok(StoredAvatar {
            url: local_avatar_url(self.public_base_url.as_deref(), &relative),
            relative_path: relative,
            size: bytes.len() as i64,
        })
    }
}
