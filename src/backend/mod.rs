// src/backend/mod.rs
// Processing service adapters

mod http;
mod types;

pub use http::HttpBackend;
pub use types::{
    BackendError, HighlightRequest, HighlightResponse, ProcessResponse, SearchRequest,
    SearchResponse, Summary, TranscriptSegment,
};

use async_trait::async_trait;

/// Contract with the remote processing service. The session drives these
/// calls; implementations carry no session state of their own.
#[async_trait]
pub trait ProcessingBackend: Send + Sync {
    /// Upload a video and wait for its transcript, embeddings and summary.
    async fn process_video(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<ProcessResponse, BackendError>;

    /// Semantic search over a processed transcript.
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, BackendError>;

    /// Keyword highlight extraction over a processed transcript.
    async fn highlights(
        &self,
        request: &HighlightRequest,
    ) -> Result<HighlightResponse, BackendError>;

    /// Get backend name
    fn name(&self) -> &str;
}
