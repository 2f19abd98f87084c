//! HTTP-backed ASR engine
//!
//! Posts normalized samples to a recognition sidecar and reads back the
//! transcript. The wire contract is `{"samples": [...]}` in,
//! `{"text": "..."}` out.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::base::{AsrEngine, AsrError, AsrResult};

#[derive(Serialize)]
struct TranscribeRequest<'a> {
    samples: &'a [f32],
}

#[derive(Deserialize)]
struct TranscribeResponse {
    text: String,
}

/// ASR engine talking to an HTTP recognition service
pub struct HttpAsrEngine {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpAsrEngine {
    pub fn new(endpoint: String, request_timeout: Duration) -> AsrResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| AsrError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl AsrEngine for HttpAsrEngine {
    async fn transcribe(&self, samples: &[f32]) -> AsrResult<String> {
        debug!("sending {} samples to ASR engine", samples.len());

        let response = self
            .client
            .post(&self.endpoint)
            .json(&TranscribeRequest { samples })
            .send()
            .await
            .map_err(|e| AsrError::Network(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AsrError::Provider(format!("API error ({status}): {body}")));
        }

        let parsed: TranscribeResponse = response
            .json()
            .await
            .map_err(|e| AsrError::Provider(format!("malformed engine response: {e}")))?;

        Ok(parsed.text)
    }
}
