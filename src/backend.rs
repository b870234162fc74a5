#![cfg(feature = "web")]
//! Client for the external cleaning/summary service.
//!
//! The service takes a JSON array of row objects on `POST /clean` and answers
//! with an object holding at least `cleaned_data`, optionally `describe` and
//! `numeric_stats`. Anything else in the reply is kept and passed through.

use crate::row::{Dataset, Row};
use crate::session::Summary;
use log::{debug, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("cleaning service unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("cleaning service error ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("cleaning service reply could not be read: {0}")]
    Decode(String),
}

/// Reply of the cleaning service.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CleanResponse {
    #[serde(default)]
    pub cleaned_data: Dataset,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub describe: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeric_stats: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl CleanResponse {
    pub fn summary(&self) -> Summary {
        Summary {
            describe: self.describe.clone(),
            numeric_stats: self.numeric_stats.clone(),
        }
    }
}

/// HTTP client for the cleaning service
pub struct CleaningClient {
    http_client: Client,
    base_url: String,
}

impl CleaningClient {
    /// Create a client for the service rooted at `base_url`
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send rows for cleaning and summarisation
    pub async fn clean(&self, rows: &[Row]) -> Result<CleanResponse, ServiceError> {
        let url = format!("{}/clean", self.base_url);
        debug!("Sending {} rows to {}", rows.len(), url);

        let response = self.http_client.post(&url).json(rows).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("Cleaning service error: {} - {}", status, body);
            return Err(ServiceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let reply: CleanResponse =
            serde_json::from_slice(&bytes).map_err(|e| ServiceError::Decode(e.to_string()))?;

        debug!(
            "Cleaning service returned {} rows",
            reply.cleaned_data.len()
        );
        Ok(reply)
    }
}
