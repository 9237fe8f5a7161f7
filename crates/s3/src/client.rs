//! S3 client implementation
//!
//! Wraps aws-sdk-s3 and implements the ObjectStore trait from sk-core.
//! One client owns one authenticated session bound to one bucket for the
//! lifetime of the invocation; retries and timeouts stay inside the SDK.

use async_trait::async_trait;

use sk_core::{Error, ListPage, ListRequest, ObjectEntry, ObjectStore, Result, StorageSettings};

/// S3 client bound to a single bucket
#[derive(Debug)]
pub struct S3Client {
    inner: aws_sdk_s3::Client,
    bucket: String,
}

impl S3Client {
    /// Create a new client from validated storage settings
    pub async fn connect(settings: &StorageSettings) -> Result<Self> {
        settings.validate()?;

        let credentials = aws_credential_types::Credentials::new(
            settings.access_key.clone(),
            settings.secret_key.clone(),
            None, // session token
            None, // expiry
            "s3keep-static-credentials",
        );

        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(aws_config::Region::new(settings.region.clone()))
            .endpoint_url(settings.endpoint_url())
            .load()
            .await;

        let s3_config = aws_sdk_s3::config::Builder::from(&config)
            .force_path_style(settings.path_style)
            .build();

        Ok(Self {
            inner: aws_sdk_s3::Client::from_conf(s3_config),
            bucket: settings.bucket.clone(),
        })
    }

    /// Get the underlying aws-sdk-s3 client
    pub fn inner(&self) -> &aws_sdk_s3::Client {
        &self.inner
    }
}

#[async_trait]
impl ObjectStore for S3Client {
    async fn list_page(&self, request: ListRequest) -> Result<ListPage> {
        let mut builder = self
            .inner
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(&request.prefix);

        if let Some(delimiter) = &request.delimiter {
            builder = builder.delimiter(delimiter);
        }
        if let Some(token) = &request.continuation_token {
            builder = builder.continuation_token(token);
        }

        let response = builder.send().await.map_err(|e| Error::List {
            prefix: request.prefix.clone(),
            message: e.to_string(),
        })?;

        let entries = response
            .contents()
            .iter()
            .map(|object| ObjectEntry {
                key: object.key().unwrap_or_default().to_string(),
                size: object.size().unwrap_or(0),
                last_modified: object
                    .last_modified()
                    .and_then(|t| jiff::Timestamp::from_second(t.secs()).ok()),
            })
            .collect();

        let common_prefixes = response
            .common_prefixes()
            .iter()
            .filter_map(|p| p.prefix().map(|s| s.to_string()))
            .collect();

        Ok(ListPage {
            entries,
            common_prefixes,
            next_token: response.next_continuation_token().map(|s| s.to_string()),
            is_truncated: response.is_truncated().unwrap_or(false),
        })
    }

    async fn put_object(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<()> {
        let body = aws_sdk_s3::primitives::ByteStream::from(data);

        let mut builder = self
            .inner
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body);

        if let Some(ct) = content_type {
            builder = builder.content_type(ct);
        }

        builder.send().await.map_err(|e| Error::Transfer {
            key: key.to_string(),
            message: format!("unable to upload to bucket {}: {e}", self.bucket),
        })?;

        tracing::debug!(key, bucket = %self.bucket, "upload completed");
        Ok(())
    }

    async fn get_object(&self, key: &str) -> Result<Vec<u8>> {
        let response = self
            .inner
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| Error::Transfer {
                key: key.to_string(),
                message: format!("unable to download from bucket {}: {e}", self.bucket),
            })?;

        let data = response
            .body
            .collect()
            .await
            .map_err(|e| Error::Transfer {
                key: key.to_string(),
                message: e.to_string(),
            })?
            .into_bytes()
            .to_vec();

        Ok(data)
    }

    async fn bucket_exists(&self) -> Result<bool> {
        match self.inner.head_bucket().bucket(&self.bucket).send().await {
            Ok(_) => Ok(true),
            Err(e) => {
                let err_str = e.to_string();
                if err_str.contains("NotFound") || err_str.contains("NoSuchBucket") {
                    Ok(false)
                } else {
                    Err(Error::Connectivity(err_str))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use sk_core::StorageSettings;

    fn settings() -> StorageSettings {
        StorageSettings {
            endpoint: "localhost:9000".into(),
            region: "us-east-1".into(),
            bucket: "backups".into(),
            access_key: "ak".into(),
            secret_key: "sk".into(),
            path_style: true,
            no_tls: true,
        }
    }

    #[tokio::test]
    async fn test_connect_rejects_invalid_settings() {
        let mut s = settings();
        s.secret_key.clear();
        let err = super::S3Client::connect(&s).await.unwrap_err();
        assert!(matches!(err, sk_core::Error::Config(_)));
    }
}
