use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct StoredAvatar {
    /// Path relative to the storage root, always `/`-separated.
    pub relative_path: String,
    /// Where clients fetch the stored image.
    pub url: String,
    pub size: i64,
}

#[async_trait]
pub trait AvatarStorage: Send + Sync {
    async fn store_avatar(
        &self,
        contact_id: i32,
        original_filename: Option<&str>,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> anyhow::Result<StoredAvatar>;
}
