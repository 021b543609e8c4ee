pub mod backend;
pub mod client;
pub mod config;
pub mod media;
pub mod present;
pub mod session;

pub use backend::{BackendError, HttpBackend, ProcessingBackend, Summary, TranscriptSegment};
pub use client::RecallClient;
pub use config::ServiceConfig;
pub use media::{select, PendingAsset, RejectionReason};
pub use session::{
    Applied, ProcessingSession, RequestToken, SessionError, SessionState, Snapshot,
    TranscriptStore,
};
