//! # URI Resolution
//!
//! Rewrites cloud-storage references in task payloads (`s3://bucket/key`,
//! `gs://bucket/key`) into signed, time-limited HTTPS URLs. Values that are not
//! storage references, including URLs this resolver produced earlier, are left
//! alone, so resolving a task twice is harmless.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::errors::{DataManagerError, DmResult};
use crate::record::Task;

/// Storage URI schemes recognised in task payloads
pub const STORAGE_SCHEMES: [&str; 2] = ["s3://", "gs://"];

/// Replaces external blob references in a task with accessible URIs
pub trait UriResolver {
    /// Must be idempotent and leave unrecognised fields untouched
    fn resolve(&self, task: Task) -> DmResult<Task>;
}

impl<R: UriResolver + ?Sized> UriResolver for Box<R> {
    fn resolve(&self, task: Task) -> DmResult<Task> {
        (**self).resolve(task)
    }
}

/// Resolver that returns tasks unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughResolver;

impl UriResolver for PassthroughResolver {
    fn resolve(&self, task: Task) -> DmResult<Task> {
        Ok(task)
    }
}

/// A parsed `scheme://bucket/path` reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageRef<'a> {
    pub bucket: &'a str,
    pub path: &'a str,
}

impl<'a> StorageRef<'a> {
    /// Parses a storage reference; `None` for anything else
    pub fn parse(value: &'a str) -> Option<Self> {
        let rest = STORAGE_SCHEMES
            .iter()
            .find_map(|scheme| value.strip_prefix(scheme))?;
        let (bucket, path) = rest.split_once('/')?;
        if bucket.is_empty() || path.is_empty() {
            return None;
        }
        Some(Self { bucket, path })
    }
}

/// Signs storage references with a shared secret
#[derive(Debug, Clone)]
pub struct SignedUrlResolver {
    base_url: String,
    secret: Vec<u8>,
    ttl: Duration,
}

impl SignedUrlResolver {
    /// Create a new resolver
    pub fn new(base_url: impl Into<String>, secret: &[u8], ttl: Duration) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            secret: secret.to_vec(),
            ttl,
        }
    }

    /// Signed URL for a reference expiring at `expires_at`
    pub fn sign_url(&self, reference: &StorageRef<'_>, expires_at: DateTime<Utc>) -> String {
        let expires_ts = expires_at.timestamp();
        format!(
            "{}/storage/v1/object/sign/{}/{}?token={}&expires={}",
            self.base_url,
            reference.bucket,
            reference.path,
            self.sign(reference.bucket, reference.path, expires_ts),
            expires_ts
        )
    }

    /// Checks a token produced by [`Self::sign_url`]
    pub fn verify(&self, bucket: &str, path: &str, expires_ts: i64, token: &str) -> bool {
        Utc::now().timestamp() <= expires_ts && self.sign(bucket, path, expires_ts) == token
    }

    fn sign(&self, bucket: &str, path: &str, expires_ts: i64) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.secret);
        hasher.update(format!("{}/{}/{}", bucket, path, expires_ts).as_bytes());
        URL_SAFE_NO_PAD.encode(hasher.finalize())
    }
}

impl UriResolver for SignedUrlResolver {
    fn resolve(&self, mut task: Task) -> DmResult<Task> {
        let expires_at = Utc::now().checked_add_signed(self.ttl).ok_or_else(|| {
            DataManagerError::UriResolution(format!("url expiry overflows with ttl {}", self.ttl))
        })?;
        for value in task.data.values_mut() {
            let signed = match value {
                Value::String(raw) => StorageRef::parse(raw).map(|r| self.sign_url(&r, expires_at)),
                _ => None,
            };
            if let Some(url) = signed {
                *value = Value::String(url);
            }
        }
        Ok(task)
    }
}
