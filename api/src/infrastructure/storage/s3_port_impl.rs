use std::path::PathBuf;

use anyhow::{Context, anyhow};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::operation::create_bucket::CreateBucketError;
use aws_sdk_s3::operation::head_bucket::HeadBucketError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::{Client, error::SdkError};

use crate::application::ports::avatar_storage::{AvatarStorage, StoredAvatar};
use crate::bootstrap::config::Config;
use crate::infrastructure::storage::{avatar_relative_path, normalize_prefix, s3_bucket_origin};

pub struct S3AvatarStorage {
    client: Client,
    bucket: String,
    root_prefix: String,
    public_origin: String,
}

impl S3AvatarStorage {
    pub async fn new(cfg: &Config) -> anyhow::Result<Self> {
        let bucket = cfg
            .s3_bucket
            .clone()
            .context("S3 bucket must be configured when using S3 storage backend")?;

        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(region) = &cfg.s3_region {
            loader = loader.region(Region::new(region.clone()));
        }

        let shared_config = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared_config);

        if let (Some(access), Some(secret)) = (&cfg.s3_access_key, &cfg.s3_secret_key) {
            let creds = Credentials::new(
                access.clone(),
                secret.clone(),
                None,
                None,
                "contacts-s3-static",
            );
            builder = builder.credentials_provider(creds);
        }

        if let Some(endpoint) = &cfg.s3_endpoint {
            builder = builder.endpoint_url(endpoint.clone());
        }

        if cfg.s3_use_path_style {
            builder = builder.force_path_style(true);
        }

        let client = Client::from_conf(builder.build());
        let root_prefix = normalize_prefix(&PathBuf::from(&cfg.storage_root));
        let public_origin = s3_bucket_origin(
            cfg.s3_endpoint.as_deref(),
            cfg.s3_region.as_deref(),
            &bucket,
            cfg.s3_use_path_style,
        );

        ensure_bucket(&client, &bucket).await?;

        Ok(Self {
            client,
            bucket,
            root_prefix,
            public_origin,
        })
    }

    fn relative_to_key(&self, relative: &str) -> String {
        let rel = relative.trim_start_matches('/');
        if self.root_prefix.is_empty() {
            rel.to_string()
        } else {
            format!("{}/{}", self.root_prefix, rel)
        }
    }
}

#[async_trait]
impl AvatarStorage for S3AvatarStorage {
    async fn store_avatar(
        &self,
        contact_id: i32,
        original_filename: Option<&str>,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> anyhow::Result<StoredAvatar> {
        let relative = avatar_relative_path(contact_id, original_filename, content_type);
        let key = self.relative_to_key(&relative);

        let mut put = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(bytes.to_vec()));
        if let Some(ct) = content_type {
            put = put.content_type(ct);
        }
        put.send()
            .await
            .with_context(|| format!("failed to upload object {key}"))?;

        Ok(StoredAvatar {
            url: format!("{}/{}", self.public_origin, key),
            relative_path: relative,
            size: bytes.len() as i64,
        })
    }
}

async fn ensure_bucket(client: &Client, bucket: &str) -> anyhow::Result<()> {
    match client.head_bucket().bucket(bucket).send().await {
        Ok(_) => return Ok(()),
        Err(SdkError::ServiceError(service_err)) => {
            if !matches!(service_err.err(), HeadBucketError::NotFound(_)) {
                return Err(anyhow!(service_err.err().to_string()));
            }
        }
        Err(err) => return Err(anyhow!(err.to_string())),
    }

    match client.create_bucket().bucket(bucket).send().await {
        Ok(_) => Ok(()),
        Err(SdkError::ServiceError(service_err)) => match service_err.err() {
            CreateBucketError::BucketAlreadyOwnedByYou(_) => Ok(()),
            CreateBucketError::BucketAlreadyExists(_) => Ok(()),
            other => Err(anyhow!(other.to_string())),
        },
        Err(err) => Err(anyhow!(err.to_string())),
    }
}
