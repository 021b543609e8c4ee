use crate::backend::{HttpBackend, ProcessingBackend, TranscriptSegment};
use crate::config::ServiceConfig;
use crate::media::PendingAsset;
use crate::session::{Applied, ProcessingSession, SessionError, SessionState};
use std::sync::Arc;
use tokio::sync::Mutex as TokioMutex;

/// Async driver around the session state machine: submits uploads and
/// dispatches queries, applying each response only while its token is still
/// current. The session lock is never held across a network call, so a new
/// upload can supersede one that is still in flight.
pub struct RecallClient {
    session: Arc<TokioMutex<ProcessingSession>>,
    backend: Arc<dyn ProcessingBackend>,
}

impl RecallClient {
    pub fn new(backend: Arc<dyn ProcessingBackend>) -> Self {
        tracing::info!("Recall client initialized: backend={}", backend.name());

        Self {
            session: Arc::new(TokioMutex::new(ProcessingSession::new())),
            backend,
        }
    }

    /// Build a client talking to the HTTP service configured in the
    /// environment.
    pub fn from_env() -> Self {
        let config = ServiceConfig::from_env();
        Self::new(Arc::new(HttpBackend::new(&config)))
    }

    pub async fn state(&self) -> SessionState {
        self.session.lock().await.state()
    }

    /// Shared handle to the underlying session, for layers that render its
    /// state.
    pub fn session(&self) -> Arc<TokioMutex<ProcessingSession>> {
        self.session.clone()
    }

    /// Upload a selected asset and install the processing result.
    pub async fn upload(&self, asset: PendingAsset) -> Result<Applied<()>, SessionError> {
        let token = {
            let mut session = self.session.lock().await;
            session.begin_upload(&asset)
        };

        let outcome = match tokio::fs::read(&asset.path).await {
            Ok(bytes) => self.backend.process_video(&asset.file_name, bytes).await,
            Err(e) => Err(e.into()),
        };

        let mut session = self.session.lock().await;
        session.complete_upload(token, outcome)
    }

    /// Semantic search over the current transcript.
    pub async fn search(&self, query: &str) -> Result<Applied<String>, SessionError> {
        let (token, request) = {
            let mut session = self.session.lock().await;
            session.begin_search(query)?
        };

        let outcome = self.backend.search(&request).await;

        let mut session = self.session.lock().await;
        session.complete_search(token, outcome)
    }

    /// Keyword highlight extraction over the current transcript.
    pub async fn highlight(
        &self,
        keywords: &str,
    ) -> Result<Applied<Vec<TranscriptSegment>>, SessionError> {
        let (token, request) = {
            let mut session = self.session.lock().await;
            session.begin_highlight(keywords)?
        };

        let outcome = self.backend.highlights(&request).await;

        let mut session = self.session.lock().await;
        session.complete_highlight(token, outcome)
    }
}
