//! sk-s3: AWS SDK adapter for s3keep
//!
//! This crate implements the ObjectStore trait from sk-core using
//! aws-sdk-s3. It is the only crate that directly depends on the AWS
//! SDK.

pub mod client;

pub use client::S3Client;
