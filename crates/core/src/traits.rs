//! ObjectStore trait definition
//!
//! The interface the transfer engine requires from an S3-compatible
//! backend. Keeping it here decouples sk-core from the AWS SDK and lets
//! the orchestrator and lister be tested against an in-memory fake.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One addressable unit discovered by a listing: a local file or
/// directory, or a remote object or pseudo-directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Relative path or object key; unique within one listing
    pub key: String,

    /// Modification time; `None` for pseudo-directories, which the store
    /// does not track
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<jiff::Timestamp>,

    /// True for local directories, zero-size keys ending in `/`, and
    /// common-prefix entries
    pub is_dir: bool,
}

impl Item {
    /// Item for a regular file or object
    pub fn file(key: impl Into<String>, last_modified: Option<jiff::Timestamp>) -> Self {
        Self {
            key: key.into(),
            last_modified,
            is_dir: false,
        }
    }

    /// Item for a directory or pseudo-directory prefix
    pub fn dir(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            last_modified: None,
            is_dir: true,
        }
    }

    /// Final path segment of the key, used for exclusion matching
    pub fn base_name(&self) -> &str {
        let trimmed = self.key.trim_end_matches('/');
        trimmed.rsplit('/').next().unwrap_or(trimmed)
    }
}

/// Raw listing entry as reported by the store, before the lister decides
/// whether it is content or a pseudo-directory marker
#[derive(Debug, Clone)]
pub struct ObjectEntry {
    /// Object key
    pub key: String,

    /// Object size in bytes
    pub size: i64,

    /// Last modified time, when the store reports one
    pub last_modified: Option<jiff::Timestamp>,
}

/// One page of a paginated listing
#[derive(Debug, Clone, Default)]
pub struct ListPage {
    /// Objects on this page
    pub entries: Vec<ObjectEntry>,

    /// Pseudo-directories reported when a delimiter was requested
    pub common_prefixes: Vec<String>,

    /// Token for the next page, when truncated
    pub next_token: Option<String>,

    /// Whether more pages follow
    pub is_truncated: bool,
}

/// Request parameters for one listing page
#[derive(Debug, Clone, Default)]
pub struct ListRequest {
    /// Key prefix scoping the listing
    pub prefix: String,

    /// Path delimiter; `Some("/")` groups children into common prefixes,
    /// `None` returns every key under the prefix flat
    pub delimiter: Option<String>,

    /// Continuation token from the previous page
    pub continuation_token: Option<String>,
}

/// Capability surface the engine requires from an object-store backend.
///
/// One authenticated session bound to one bucket. The engine issues one
/// operation at a time; implementations need no internal locking on its
/// behalf. Retries, timeouts, and authentication live behind this trait.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch one listing page
    async fn list_page(&self, request: ListRequest) -> Result<ListPage>;

    /// Upload a whole object
    async fn put_object(&self, key: &str, data: Vec<u8>, content_type: Option<&str>)
        -> Result<()>;

    /// Download a whole object
    async fn get_object(&self, key: &str) -> Result<Vec<u8>>;

    /// Check that the bound bucket exists and is reachable
    async fn bucket_exists(&self) -> Result<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_file() {
        let item = Item::file("sub/a.txt", None);
        assert_eq!(item.key, "sub/a.txt");
        assert!(!item.is_dir);
        assert!(item.last_modified.is_none());
    }

    #[test]
    fn test_item_dir() {
        let item = Item::dir("backups/daily/");
        assert!(item.is_dir);
        assert!(item.last_modified.is_none());
    }

    #[test]
    fn test_base_name() {
        assert_eq!(Item::file("a/b/c.txt", None).base_name(), "c.txt");
        assert_eq!(Item::dir("a/b/").base_name(), "b");
        assert_eq!(Item::file("c.txt", None).base_name(), "c.txt");
    }
}
