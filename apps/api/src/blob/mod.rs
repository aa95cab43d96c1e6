//! Blob store port. Resolves an external audio reference into bytes for the
//! archive builder.

use async_trait::async_trait;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("not a blob reference: {0}")]
    UnsupportedReference(String),

    #[error("S3 error: {0}")]
    S3(String),
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn fetch(&self, reference: &str) -> Result<Bytes, BlobError>;
}

/// Location named by a stored reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobLocation<'a> {
    pub bucket: Option<&'a str>,
    pub key: &'a str,
}

/// `s3://bucket/key` names both parts. Anything with another scheme is not
/// ours. A bare path is a key in the default bucket.
pub fn parse_reference(reference: &str) -> Option<BlobLocation<'_>> {
    let reference = reference.trim();
    if let Some(rest) = reference.strip_prefix("s3://") {
        let (bucket, key) = rest.split_once('/')?;
        if bucket.is_empty() || key.is_empty() {
            return None;
        }
        return Some(BlobLocation {
            bucket: Some(bucket),
            key,
        });
    }
    if reference.is_empty() || reference.contains("://") || reference.starts_with("data:") {
        return None;
    }
    Some(BlobLocation {
        bucket: None,
        key: reference.trim_start_matches('/'),
    })
}

/// Blob store over S3 / MinIO.
#[derive(Clone)]
pub struct S3BlobStore {
    client: S3Client,
    default_bucket: String,
}

impl S3BlobStore {
    pub fn new(client: S3Client, default_bucket: String) -> Self {
        Self {
            client,
            default_bucket,
        }
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn fetch(&self, reference: &str) -> Result<Bytes, BlobError> {
        let location = parse_reference(reference)
            .ok_or_else(|| BlobError::UnsupportedReference(reference.to_string()))?;
        let bucket = location.bucket.unwrap_or(&self.default_bucket);

        let object = self
            .client
            .get_object()
            .bucket(bucket)
            .key(location.key)
            .send()
            .await
            .map_err(|e| BlobError::S3(e.to_string()))?;

        let data = object
            .body
            .collect()
            .await
            .map_err(|e| BlobError::S3(e.to_string()))?
            .into_bytes();

        debug!("Fetched {} bytes from s3://{bucket}/{}", data.len(), location.key);
        Ok(data)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_s3_reference() {
        let loc = parse_reference("s3://media/audio/abc.mp3").unwrap();
        assert_eq!(loc.bucket, Some("media"));
        assert_eq!(loc.key, "audio/abc.mp3");
    }

    #[test]
    fn test_bare_key_uses_default_bucket() {
        let loc = parse_reference("/audio/abc.mp3").unwrap();
        assert_eq!(loc.bucket, None);
        assert_eq!(loc.key, "audio/abc.mp3");
    }

    #[test]
    fn test_other_schemes_rejected() {
        assert!(parse_reference("https://cdn.example.com/a.mp3").is_none());
        assert!(parse_reference("data:audio/mp3;base64,AAAA").is_none());
        assert!(parse_reference("s3://bucket-only").is_none());
    }
}
