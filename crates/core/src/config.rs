//! Invocation configuration
//!
//! Two explicit structs instead of ambient environment lookups: the CLI
//! resolves flags and environment variables into typed values once, and
//! the engine only ever sees these. `StorageSettings` describes the
//! endpoint and credentials; `TransferConfig` describes one backup or
//! restore invocation and is read-only after construction.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::path::{split_file_override, strip_leading_slash, trim_trailing_slash};

/// Default endpoint when none is configured
const AWS_S3_URL: &str = "https://s3.amazonaws.com";

/// Connection settings for one S3-compatible endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Endpoint URL; scheme optional, resolved by [`endpoint_url`](Self::endpoint_url)
    pub endpoint: String,

    /// Region name
    pub region: String,

    /// Bucket all operations are bound to
    pub bucket: String,

    /// Access key ID
    pub access_key: String,

    /// Secret access key
    pub secret_key: String,

    /// Use path-style addressing (required by MinIO and most self-hosted
    /// backends)
    pub path_style: bool,

    /// Use plain HTTP when the endpoint carries no scheme
    pub no_tls: bool,
}

impl StorageSettings {
    /// Check that every required field is present.
    ///
    /// The messages name the environment variable the CLI reads as a
    /// fallback for each field.
    pub fn validate(&self) -> Result<()> {
        if self.region.is_empty() {
            return Err(Error::Config(
                "region is required, set AWS_REGION or pass --region".into(),
            ));
        }
        if self.bucket.is_empty() {
            return Err(Error::Config(
                "bucket is required, set AWS_BUCKET or pass --bucket".into(),
            ));
        }
        if self.access_key.is_empty() {
            return Err(Error::Config(
                "access key is required, set AWS_ACCESS_KEY_ID or pass --access-key".into(),
            ));
        }
        if self.secret_key.is_empty() {
            return Err(Error::Config(
                "secret key is required, set AWS_SECRET_KEY or pass --secret-key".into(),
            ));
        }
        Ok(())
    }

    /// Resolve the endpoint to a full URL.
    ///
    /// An empty endpoint falls back to AWS S3. An endpoint without a
    /// scheme gets one according to the TLS setting; an explicit scheme
    /// always wins.
    pub fn endpoint_url(&self) -> String {
        if self.endpoint.is_empty() {
            return AWS_S3_URL.to_string();
        }
        if self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://") {
            return self.endpoint.clone();
        }
        let scheme = if self.no_tls { "http" } else { "https" };
        format!("{scheme}://{}", self.endpoint)
    }
}

/// Per-invocation transfer configuration.
///
/// Constructed once from CLI flags, normalized, then never mutated.
#[derive(Debug, Clone, Default)]
pub struct TransferConfig {
    /// Source path (backup) or source prefix (restore)
    pub path: String,

    /// Destination prefix (backup) or destination directory (restore)
    pub dest: String,

    /// Single-file override; transfers exactly one file when set
    pub file: Option<String>,

    /// Backup the whole tree as one gzip-compressed tar archive
    pub compress: bool,

    /// Decompress downloaded files detected as archives
    pub decompress: bool,

    /// Embed a timestamp in the generated archive name
    pub timestamp: bool,

    /// Descend into subdirectories / nested prefixes
    pub recursive: bool,

    /// Overwrite existing local files on restore
    pub force: bool,

    /// Keep restoring remaining items after a per-item failure
    pub ignore_errors: bool,

    /// Base names excluded from transfer, matched case-sensitively
    pub exclude: Vec<String>,
}

impl TransferConfig {
    /// Canonicalize paths for a backup invocation: trailing slashes are
    /// stripped from both ends and any directory component of the file
    /// override is folded into the source path.
    pub fn normalized(mut self) -> Self {
        self.path = trim_trailing_slash(&self.path).to_string();
        self.dest = trim_trailing_slash(&self.dest).to_string();

        if let Some(file) = self.file.take() {
            let (path, file) = split_file_override(&self.path, &file);
            self.path = path;
            self.file = if file.is_empty() { None } else { Some(file) };
        }

        self
    }

    /// Canonicalize paths for a restore invocation: everything
    /// [`normalized`](Self::normalized) does, and the source prefix also
    /// loses its leading slash, since object keys never begin with one.
    pub fn normalized_for_restore(mut self) -> Self {
        self = self.normalized();
        self.path = strip_leading_slash(&self.path).to_string();
        self
    }

    /// Whether a base name is on the exclusion list
    pub fn is_excluded(&self, base_name: &str) -> bool {
        self.exclude.iter().any(|e| e == base_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> StorageSettings {
        StorageSettings {
            endpoint: "minio.local:9000".into(),
            region: "us-east-1".into(),
            bucket: "backups".into(),
            access_key: "ak".into(),
            secret_key: "sk".into(),
            path_style: true,
            no_tls: false,
        }
    }

    #[test]
    fn test_validate_ok() {
        assert!(settings().validate().is_ok());
    }

    #[test]
    fn test_validate_missing_bucket() {
        let mut s = settings();
        s.bucket.clear();
        let err = s.validate().unwrap_err();
        assert!(err.to_string().contains("AWS_BUCKET"));
    }

    #[test]
    fn test_endpoint_url_scheme_resolution() {
        let mut s = settings();
        assert_eq!(s.endpoint_url(), "https://minio.local:9000");

        s.no_tls = true;
        assert_eq!(s.endpoint_url(), "http://minio.local:9000");

        s.endpoint = "https://example.com".into();
        assert_eq!(s.endpoint_url(), "https://example.com");

        s.endpoint.clear();
        assert_eq!(s.endpoint_url(), "https://s3.amazonaws.com");
    }

    #[test]
    fn test_normalized_strips_trailing_slashes() {
        let config = TransferConfig {
            path: "/data/".into(),
            dest: "backups/daily/".into(),
            ..Default::default()
        }
        .normalized();

        assert_eq!(config.path, "/data");
        assert_eq!(config.dest, "backups/daily");
    }

    #[test]
    fn test_normalized_splits_file_override() {
        let config = TransferConfig {
            path: "/data".into(),
            file: Some("sub/notes.txt".into()),
            ..Default::default()
        }
        .normalized();

        assert_eq!(config.path, "/data/sub");
        assert_eq!(config.file.as_deref(), Some("notes.txt"));
    }

    #[test]
    fn test_normalized_for_restore_strips_leading_slash() {
        let config = TransferConfig {
            path: "/backups/daily".into(),
            dest: "/restore".into(),
            ..Default::default()
        }
        .normalized_for_restore();

        assert_eq!(config.path, "backups/daily");
        assert_eq!(config.dest, "/restore");
    }

    #[test]
    fn test_is_excluded() {
        let config = TransferConfig {
            exclude: vec!["tmp".into(), ".git".into()],
            ..Default::default()
        };
        assert!(config.is_excluded(".git"));
        assert!(!config.is_excluded("data"));
        // Case-sensitive
        assert!(!config.is_excluded("TMP"));
    }
}
