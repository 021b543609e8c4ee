// src/backend/http.rs
// HTTP adapter for the DeepRecall processing service

use super::types::{
    BackendError, HighlightRequest, HighlightResponse, ProcessResponse, SearchRequest,
    SearchResponse,
};
use super::ProcessingBackend;
use crate::config::ServiceConfig;
use async_trait::async_trait;
use reqwest::multipart;
use std::time::Duration;

const PROCESS_PATH: &str = "/process_video";
const SEARCH_PATH: &str = "/search";
const HIGHLIGHTS_PATH: &str = "/highlights";
const UPLOAD_MIME: &str = "video/mp4";

pub struct HttpBackend {
    base_url: String,
    upload_timeout: Duration,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(config: &ServiceConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.query_timeout)
            .build()
            .expect("Failed to create HTTP client");

        tracing::info!("HTTP backend initialized: {}", config.server_url);

        Self {
            base_url: config.server_url.clone(),
            upload_timeout: config.upload_timeout,
            client,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read_json<T: serde::de::DeserializeOwned>(
        response: Result<reqwest::Response, reqwest::Error>,
    ) -> Result<T, BackendError> {
        match response {
            Ok(resp) => {
                let status = resp.status();

                if status.is_success() {
                    resp.json::<T>()
                        .await
                        .map_err(|e| BackendError::Protocol(e.to_string()))
                } else {
                    let body = resp.text().await.unwrap_or_default();
                    Err(BackendError::Http {
                        status: status.as_u16(),
                        body,
                    })
                }
            }
            Err(e) => {
                if e.is_timeout() {
                    Err(BackendError::Timeout)
                } else {
                    Err(BackendError::Network(e.to_string()))
                }
            }
        }
    }
}

#[async_trait]
impl ProcessingBackend for HttpBackend {
    async fn process_video(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<ProcessResponse, BackendError> {
        tracing::info!("Uploading {} ({} bytes) for processing...", file_name, bytes.len());

        let file_part = multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(UPLOAD_MIME)
            .map_err(|e| BackendError::Protocol(e.to_string()))?;

        let form = multipart::Form::new().part("file", file_part);

        let response = self
            .client
            .post(self.endpoint(PROCESS_PATH))
            .timeout(self.upload_timeout)
            .multipart(form)
            .send()
            .await;

        let parsed: ProcessResponse = Self::read_json(response).await?;

        tracing::info!(
            "Processing finished: {} segments, {} embeddings",
            parsed.transcript.len(),
            parsed.embeddings.len()
        );

        Ok(parsed)
    }

    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, BackendError> {
        tracing::info!(
            "Search request over {} indexed segments",
            request.search_index.len()
        );

        let response = self
            .client
            .post(self.endpoint(SEARCH_PATH))
            .json(request)
            .send()
            .await;

        Self::read_json(response).await
    }

    async fn highlights(
        &self,
        request: &HighlightRequest,
    ) -> Result<HighlightResponse, BackendError> {
        tracing::info!(
            "Highlight request: {} keywords over {} segments",
            request.keywords.len(),
            request.transcript.len()
        );

        let response = self
            .client
            .post(self.endpoint(HIGHLIGHTS_PATH))
            .json(request)
            .send()
            .await;

        Self::read_json(response).await
    }

    fn name(&self) -> &str {
        "DeepRecall HTTP"
    }
}
