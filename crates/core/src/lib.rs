//! sk-core: Transfer engine for the s3keep backup tool
//!
//! This crate provides the core functionality for s3keep, including:
//! - Path and prefix normalization
//! - Local tree walking and remote prefix listing
//! - The tar.gz archive codec
//! - The backup/restore transfer orchestrator
//! - The ObjectStore trait the S3 adapter implements
//!
//! The crate is independent of any specific S3 SDK; everything here is
//! exercised in tests against an in-memory store fake.

pub mod archive;
pub mod config;
pub mod error;
pub mod lister;
pub mod path;
pub mod traits;
pub mod transfer;
pub mod walker;

pub use config::{StorageSettings, TransferConfig};
pub use error::{Error, Result};
pub use traits::{Item, ListPage, ListRequest, ObjectEntry, ObjectStore};
pub use transfer::{ensure_bucket, Backup, ErrorPolicy, Restore};
