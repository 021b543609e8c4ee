// src/backend/types.rs
// Wire types for the DeepRecall processing service

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One timed span of spoken text, offsets in seconds from video start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub start: f32,
    pub end: f32,
    pub text: String,
}

/// Summary pair generated once per processed video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Brief high-level summary
    pub short: String,
    /// Structured section-by-section summary
    pub detailed: String,
}

/// Successful `POST /process_video` response body.
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessResponse {
    pub summary: Summary,
    pub transcript: Vec<TranscriptSegment>,
    pub embeddings: Vec<Vec<f32>>,
}

/// `POST /search` request body. `search_index` and `embeddings` must come
/// from the same store snapshot and have equal length.
#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest {
    pub query: String,
    pub search_index: Vec<String>,
    pub embeddings: Vec<Vec<f32>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub result: String,
}

/// `POST /highlights` request body.
#[derive(Debug, Clone, Serialize)]
pub struct HighlightRequest {
    pub transcript: Vec<TranscriptSegment>,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HighlightResponse {
    pub highlights: Vec<TranscriptSegment>,
}

/// Processing service error types
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timeout")]
    Timeout,

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Failed to read media file: {0}")]
    Io(#[from] std::io::Error),
}
