use crate::backend::{Summary, TranscriptSegment};
use std::sync::Arc;
use thiserror::Error;

/// Immutable view of one processed video: the ordered transcript, the
/// index-aligned embedding vectors, and the generated summary.
#[derive(Debug)]
pub struct Snapshot {
    pub transcript: Vec<TranscriptSegment>,
    pub embeddings: Vec<Vec<f32>>,
    pub summary: Summary,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Transcript/embedding mismatch: {transcript_len} segments, {embedding_len} vectors")]
pub struct IntegrityError {
    pub transcript_len: usize,
    pub embedding_len: usize,
}

/// Holds the artifacts of the current asset. Written only by the processing
/// session; everyone else reads `Arc` snapshots, so an install can never tear
/// a snapshot handed out earlier.
#[derive(Debug, Default)]
pub struct TranscriptStore {
    current: Option<Arc<Snapshot>>,
}

impl TranscriptStore {
    /// Install all artifacts of one processed video as a unit. Fails without
    /// touching the previous contents when the embedding vectors do not line
    /// up one-to-one with the transcript segments.
    pub fn install(
        &mut self,
        transcript: Vec<TranscriptSegment>,
        embeddings: Vec<Vec<f32>>,
        summary: Summary,
    ) -> Result<(), IntegrityError> {
        if transcript.len() != embeddings.len() {
            return Err(IntegrityError {
                transcript_len: transcript.len(),
                embedding_len: embeddings.len(),
            });
        }

        self.current = Some(Arc::new(Snapshot {
            transcript,
            embeddings,
            summary,
        }));

        Ok(())
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.current.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }
}
