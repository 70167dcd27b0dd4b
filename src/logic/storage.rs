// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Storage bucket collaborator that receives the avatar after validation.
//!
//! The rest of the app only sees [`AvatarStore`]: a destination key and a
//! binary payload go in, success or failure comes out. The shipped
//! implementation talks to a Supabase-style object endpoint over blocking
//! HTTP, which suits the worker threads that run commands.

use anyhow::{Context, Result, anyhow};
use url::Url;

/// Environment variable naming the storage endpoint (http/https base URL).
pub const ENV_STORAGE_URL: &str = "SIGNUPFORM_STORAGE_URL";
/// Environment variable naming the bucket objects are stored in.
pub const ENV_STORAGE_BUCKET: &str = "SIGNUPFORM_STORAGE_BUCKET";
/// Environment variable holding the optional bearer key.
pub const ENV_STORAGE_KEY: &str = "SIGNUPFORM_STORAGE_KEY";

const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:54321";
const DEFAULT_BUCKET: &str = "avatars";

/// Where uploads land: object endpoint, bucket, optional API key.
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub endpoint: Url,
    pub bucket: String,
    pub api_key: Option<String>,
}

impl StorageConfig {
    /// Read the configuration from the environment, with local-development
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        let raw_endpoint =
            std::env::var(ENV_STORAGE_URL).unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());
        let endpoint = Url::parse(&raw_endpoint)
            .with_context(|| format!("{ENV_STORAGE_URL} is not a valid URL: {raw_endpoint}"))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(anyhow!(
                "{ENV_STORAGE_URL} must be an http/https URL, got: {raw_endpoint}"
            ));
        }

        let bucket =
            std::env::var(ENV_STORAGE_BUCKET).unwrap_or_else(|_| DEFAULT_BUCKET.to_string());
        let api_key = std::env::var(ENV_STORAGE_KEY)
            .ok()
            .filter(|key| !key.trim().is_empty());

        Ok(Self {
            endpoint,
            bucket,
            api_key,
        })
    }

    /// Local Supabase defaults, used when the environment is unusable.
    pub fn local_default() -> Self {
        Self {
            // The literal is a compile-time constant; parsing cannot fail.
            endpoint: Url::parse(DEFAULT_ENDPOINT).unwrap_or_else(|_| {
                unreachable!("default storage endpoint is a valid URL")
            }),
            bucket: DEFAULT_BUCKET.to_string(),
            api_key: None,
        }
    }
}

/// Seam between the submit flow and the network, so tests can swap it out.
pub trait AvatarStore: Send + Sync {
    /// Store `bytes` under `key`; the engine never looks past success/failure.
    fn upload(&self, key: &str, mime: &str, bytes: &[u8]) -> Result<()>;
}

/// HTTP client for a Supabase-style storage API.
pub struct BucketClient {
    config: StorageConfig,
    agent: ureq::Agent,
}

impl BucketClient {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            agent: ureq::Agent::new(),
        }
    }

    /// Full object URL for a destination key.
    fn object_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.config.endpoint.as_str().trim_end_matches('/'),
            self.config.bucket,
            key
        )
    }
}

impl AvatarStore for BucketClient {
    fn upload(&self, key: &str, mime: &str, bytes: &[u8]) -> Result<()> {
        let url = self.object_url(key);
        log::info!("uploading {} byte(s) to {url}", bytes.len());

        let mut request = self.agent.post(&url).set("Content-Type", mime);
        if let Some(api_key) = &self.config.api_key {
            request = request.set("Authorization", &format!("Bearer {api_key}"));
        }

        let response = request
            .send_bytes(bytes)
            .map_err(|err| anyhow!("Upload request failed: {err}"))?;

        if response.status() >= 300 {
            return Err(anyhow!(
                "Storage service answered HTTP {}: {}",
                response.status(),
                response.status_text()
            ));
        }

        log::info!("stored object '{key}' in bucket '{}'", self.config.bucket);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{BucketClient, StorageConfig};
    use url::Url;

    fn config(endpoint: &str, bucket: &str) -> StorageConfig {
        StorageConfig {
            endpoint: Url::parse(endpoint).unwrap(),
            bucket: bucket.into(),
            api_key: None,
        }
    }

    // Object URLs follow the Supabase storage layout.
    #[test]
    fn object_url_joins_endpoint_bucket_and_key() {
        let client = BucketClient::new(config("http://127.0.0.1:54321", "avatars"));

        assert_eq!(
            client.object_url("me.png"),
            "http://127.0.0.1:54321/storage/v1/object/avatars/me.png"
        );
    }

    // A trailing slash on the endpoint must not double up in the URL.
    #[test]
    fn object_url_tolerates_trailing_slash() {
        let client = BucketClient::new(config("https://proj.supabase.co/", "forms-react"));

        assert_eq!(
            client.object_url("me.png"),
            "https://proj.supabase.co/storage/v1/object/forms-react/me.png"
        );
    }

    #[test]
    fn local_default_points_at_localhost() {
        let config = StorageConfig::local_default();

        assert_eq!(config.endpoint.scheme(), "http");
        assert_eq!(config.bucket, "avatars");
        assert!(config.api_key.is_none());
    }
}
