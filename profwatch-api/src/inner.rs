use std::time::Duration;

use reqwest::Url;
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::model::monitor::{MonitorRequest, MonitorStatus};
use crate::model::profile_record::{DetectRequest, ProfileRecord};
use crate::ApiError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

const DETECT_PATH: &str = "api/detect_profile";
const MONITOR_PATH: &str = "monitor";

#[derive(Debug, Clone)]
pub struct API {
    client: reqwest::Client,
    base_url: Url,
}

impl API {
    pub fn try_default() -> Result<Self, ApiError> {
        Self::try_with_base_url(DEFAULT_BASE_URL)
    }

    pub fn try_with_base_url(base_url: &str) -> Result<Self, ApiError> {
        Self::try_with_options(base_url, None)
    }

    /// `timeout` bounds the whole request; `None` waits as long as the
    /// backend takes.
    pub fn try_with_options(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut url = Url::parse(base_url).map_err(|e| ApiError::InvalidBaseUrl {
            url: base_url.into(),
            reason: e.to_string(),
        })?;
        if url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl {
                url: base_url.into(),
                reason: "not a hierarchical url".into(),
            });
        }
        // joined paths must land under the prefix, not replace its last segment
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ApiError::Client)?;

        Ok(API {
            client,
            base_url: url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        debug!("POST {url}");

        let resp = self
            .client
            .post(url.clone())
            .json(body)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.to_string(),
                source,
            })?;
        if !resp.status().is_success() {
            return Err(ApiError::Status {
                url: url.to_string(),
                status: resp.status(),
            });
        }

        let bytes = resp.bytes().await.map_err(|source| ApiError::Transport {
            url: url.to_string(),
            source,
        })?;
        serde_json::from_slice(&bytes).map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })
    }

    /// Every record the backend returns; the detector only ever reads the
    /// first one.
    #[tracing::instrument(skip(self, req), fields(username = %req.username))]
    pub async fn detect_profile(&self, req: &DetectRequest) -> Result<Vec<ProfileRecord>, ApiError> {
        self.post_json(DETECT_PATH, req).await
    }

    #[tracing::instrument(skip(self, req), fields(profiles = req.profiles.len()))]
    pub async fn monitor(&self, req: &MonitorRequest) -> Result<Vec<MonitorStatus>, ApiError> {
        self.post_json(MONITOR_PATH, req).await
    }
}
