use crate::backend::{
    BackendError, HighlightRequest, HighlightResponse, ProcessResponse, SearchRequest,
    SearchResponse, TranscriptSegment,
};
use crate::media::PendingAsset;
use serde::Serialize;
use std::sync::Arc;

pub mod store;

pub use store::{IntegrityError, Snapshot, TranscriptStore};

/// Lifecycle of the current asset; decides which operations are legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionState {
    Empty,
    Uploading,
    Ready,
    UploadFailed,
}

/// Issued per request from a monotonic counter. A response whose token is no
/// longer the current one for its operation is dropped on arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Search query is empty")]
    EmptyQuery,

    #[error("No keywords provided")]
    EmptyKeywords,

    #[error("No processed video available")]
    NoData,

    #[error("Processing service error: {0}")]
    Transport(#[from] BackendError),

    #[error(transparent)]
    Integrity(#[from] IntegrityError),
}

/// Outcome of applying a response: either it was still current, or a newer
/// request superseded it and the response was dropped without touching state.
#[derive(Debug, Clone, PartialEq)]
pub enum Applied<T> {
    Current(T),
    Superseded,
}

/// State machine coordinating one upload and the queries derived from it.
/// Purely synchronous; the async driver in `client` calls `begin_*` before a
/// network request and `complete_*` with the response.
pub struct ProcessingSession {
    state: SessionState,
    store: TranscriptStore,
    next_token: u64,
    upload_token: Option<RequestToken>,
    search_token: Option<RequestToken>,
    highlight_token: Option<RequestToken>,
    search_result: Option<String>,
    highlights: Vec<TranscriptSegment>,
    current_asset: Option<String>,
}

impl ProcessingSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::Empty,
            store: TranscriptStore::default(),
            next_token: 0,
            upload_token: None,
            search_token: None,
            highlight_token: None,
            search_result: None,
            highlights: Vec::new(),
            current_asset: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Start uploading a new asset. Everything derived from the previous
    /// asset is invalidated immediately, before the request goes out, so a
    /// query can never observe stale data during the upload. A still-running
    /// upload is superseded; its response will arrive with a stale token.
    pub fn begin_upload(&mut self, asset: &PendingAsset) -> RequestToken {
        if self.state == SessionState::Uploading {
            tracing::info!("Superseding in-flight upload with {}", asset.file_name);
        }

        self.store.clear();
        self.search_result = None;
        self.highlights.clear();
        self.search_token = None;
        self.highlight_token = None;

        let token = self.issue_token();
        self.upload_token = Some(token);
        self.current_asset = Some(asset.id.clone());
        self.state = SessionState::Uploading;

        tracing::info!("Upload started: {} (token {})", asset.file_name, token.0);
        token
    }

    /// Apply the outcome of an upload round trip. Installs summary,
    /// transcript and embeddings as one unit, or records the failure; a
    /// superseded upload's response is dropped silently.
    pub fn complete_upload(
        &mut self,
        token: RequestToken,
        outcome: Result<ProcessResponse, BackendError>,
    ) -> Result<Applied<()>, SessionError> {
        if self.upload_token != Some(token) {
            tracing::debug!("Dropping superseded upload response (token {})", token.0);
            return Ok(Applied::Superseded);
        }
        self.upload_token = None;

        match outcome {
            Ok(response) => {
                let installed = self.store.install(
                    response.transcript,
                    response.embeddings,
                    response.summary,
                );

                match installed {
                    Ok(()) => {
                        self.state = SessionState::Ready;
                        tracing::info!("Processing complete, session ready");
                        Ok(Applied::Current(()))
                    }
                    Err(e) => {
                        self.state = SessionState::UploadFailed;
                        tracing::error!("Rejected processing response: {}", e);
                        Err(e.into())
                    }
                }
            }
            Err(e) => {
                self.state = SessionState::UploadFailed;
                tracing::error!("Upload failed: {}", e);
                Err(e.into())
            }
        }
    }

    /// Acknowledge a failed upload and return to the empty state.
    pub fn reset(&mut self) {
        if self.state == SessionState::UploadFailed {
            self.state = SessionState::Empty;
            self.current_asset = None;
        }
    }

    /// Validate a search and stage its request from one store snapshot, so
    /// `search_index` and `embeddings` always line up.
    pub fn begin_search(
        &mut self,
        query: &str,
    ) -> Result<(RequestToken, SearchRequest), SessionError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SessionError::EmptyQuery);
        }

        let snapshot = self.ready_snapshot()?;
        if snapshot.embeddings.is_empty() {
            return Err(SessionError::NoData);
        }

        let request = SearchRequest {
            query: query.to_string(),
            search_index: snapshot
                .transcript
                .iter()
                .map(|seg| seg.text.clone())
                .collect(),
            embeddings: snapshot.embeddings.clone(),
        };

        let token = self.issue_token();
        self.search_token = Some(token);
        Ok((token, request))
    }

    /// Record a search answer, unless a newer upload or search superseded the
    /// request. A failed search leaves the session `Ready`.
    pub fn complete_search(
        &mut self,
        token: RequestToken,
        outcome: Result<SearchResponse, BackendError>,
    ) -> Result<Applied<String>, SessionError> {
        if self.search_token != Some(token) {
            tracing::debug!("Dropping superseded search response (token {})", token.0);
            return Ok(Applied::Superseded);
        }
        self.search_token = None;

        match outcome {
            Ok(response) => {
                self.search_result = Some(response.result.clone());
                Ok(Applied::Current(response.result))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Validate a highlight query and stage its request. Keywords are the
    /// trimmed, de-duplicated comma-separated tokens of the input.
    pub fn begin_highlight(
        &mut self,
        keywords: &str,
    ) -> Result<(RequestToken, HighlightRequest), SessionError> {
        let keywords = parse_keywords(keywords);
        if keywords.is_empty() {
            return Err(SessionError::EmptyKeywords);
        }

        let snapshot = self.ready_snapshot()?;
        if snapshot.transcript.is_empty() {
            return Err(SessionError::NoData);
        }

        let request = HighlightRequest {
            transcript: snapshot.transcript.clone(),
            keywords,
        };

        let token = self.issue_token();
        self.highlight_token = Some(token);
        Ok((token, request))
    }

    /// Record highlight matches in the order the service returned them,
    /// unless the request was superseded.
    pub fn complete_highlight(
        &mut self,
        token: RequestToken,
        outcome: Result<HighlightResponse, BackendError>,
    ) -> Result<Applied<Vec<TranscriptSegment>>, SessionError> {
        if self.highlight_token != Some(token) {
            tracing::debug!("Dropping superseded highlight response (token {})", token.0);
            return Ok(Applied::Superseded);
        }
        self.highlight_token = None;

        match outcome {
            Ok(response) => {
                self.highlights = response.highlights.clone();
                Ok(Applied::Current(response.highlights))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.store.snapshot()
    }

    pub fn search_result(&self) -> Option<&str> {
        self.search_result.as_deref()
    }

    pub fn highlights(&self) -> &[TranscriptSegment] {
        &self.highlights
    }

    /// Id of the asset the session currently describes, if any.
    pub fn current_asset(&self) -> Option<&str> {
        self.current_asset.as_deref()
    }

    fn ready_snapshot(&self) -> Result<Arc<Snapshot>, SessionError> {
        if self.state != SessionState::Ready {
            return Err(SessionError::NoData);
        }
        self.store.snapshot().ok_or(SessionError::NoData)
    }

    fn issue_token(&mut self) -> RequestToken {
        self.next_token += 1;
        RequestToken(self.next_token)
    }
}

impl Default for ProcessingSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Split comma-separated keyword input into trimmed, de-duplicated tokens,
/// dropping empty ones: `"cat,  dog ,"` becomes `["cat", "dog"]`.
pub fn parse_keywords(input: &str) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::new();

    for token in input.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        if !keywords.iter().any(|k| k == token) {
            keywords.push(token.to_string());
        }
    }

    keywords
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Summary;
    use std::path::Path;

    fn asset(name: &str) -> PendingAsset {
        crate::media::select(Path::new(name)).unwrap()
    }

    fn response(n: usize) -> ProcessResponse {
        ProcessResponse {
            summary: Summary {
                short: "short".to_string(),
                detailed: "detailed".to_string(),
            },
            transcript: (0..n)
                .map(|i| TranscriptSegment {
                    start: i as f32 * 5.0,
                    end: i as f32 * 5.0 + 5.0,
                    text: format!("segment {}", i),
                })
                .collect(),
            embeddings: (0..n).map(|i| vec![i as f32]).collect(),
        }
    }

    fn ready_session(n: usize) -> ProcessingSession {
        let mut session = ProcessingSession::new();
        let token = session.begin_upload(&asset("a.mp4"));
        session.complete_upload(token, Ok(response(n))).unwrap();
        session
    }

    #[test]
    fn test_upload_success_reaches_ready() {
        let mut session = ProcessingSession::new();
        assert_eq!(session.state(), SessionState::Empty);

        let token = session.begin_upload(&asset("a.mp4"));
        assert_eq!(session.state(), SessionState::Uploading);

        let applied = session.complete_upload(token, Ok(response(3))).unwrap();
        assert_eq!(applied, Applied::Current(()));
        assert_eq!(session.state(), SessionState::Ready);

        let snapshot = session.snapshot().unwrap();
        assert_eq!(snapshot.transcript.len(), snapshot.embeddings.len());
    }

    #[test]
    fn test_upload_failure_installs_nothing() {
        let mut session = ProcessingSession::new();
        let token = session.begin_upload(&asset("a.mp4"));

        let err = session
            .complete_upload(token, Err(BackendError::Timeout))
            .unwrap_err();
        assert!(matches!(err, SessionError::Transport(_)));
        assert_eq!(session.state(), SessionState::UploadFailed);
        assert!(session.snapshot().is_none());
    }

    #[test]
    fn test_length_mismatch_is_an_integrity_failure() {
        let mut session = ProcessingSession::new();
        let token = session.begin_upload(&asset("a.mp4"));

        let mut bad = response(3);
        bad.embeddings.pop();

        let err = session.complete_upload(token, Ok(bad)).unwrap_err();
        assert!(matches!(err, SessionError::Integrity(_)));
        assert_eq!(session.state(), SessionState::UploadFailed);
        assert!(session.snapshot().is_none());
    }

    #[test]
    fn test_failed_upload_does_not_restore_prior_ready_state() {
        let mut session = ready_session(3);

        let token = session.begin_upload(&asset("b.mp4"));
        // Prior artifacts are gone the moment the new upload starts
        assert!(session.snapshot().is_none());

        session
            .complete_upload(token, Err(BackendError::Timeout))
            .unwrap_err();
        assert_eq!(session.state(), SessionState::UploadFailed);
        assert!(session.snapshot().is_none());
    }

    #[test]
    fn test_reset_returns_to_empty_only_after_failure() {
        let mut session = ready_session(2);
        session.reset();
        assert_eq!(session.state(), SessionState::Ready);

        let token = session.begin_upload(&asset("b.mp4"));
        assert!(session.current_asset().is_some());

        session
            .complete_upload(token, Err(BackendError::Timeout))
            .unwrap_err();
        session.reset();
        assert_eq!(session.state(), SessionState::Empty);
        assert_eq!(session.current_asset(), None);
    }

    #[test]
    fn test_superseded_upload_response_is_dropped() {
        let mut session = ProcessingSession::new();
        let token_a = session.begin_upload(&asset("a.mp4"));
        let token_b = session.begin_upload(&asset("b.mp4"));

        // B wins and installs
        let applied = session.complete_upload(token_b, Ok(response(5))).unwrap();
        assert_eq!(applied, Applied::Current(()));

        // A's response arrives late and must not overwrite B's install
        let applied = session.complete_upload(token_a, Ok(response(3))).unwrap();
        assert_eq!(applied, Applied::Superseded);
        assert_eq!(session.snapshot().unwrap().transcript.len(), 5);
        assert_eq!(session.state(), SessionState::Ready);
    }

    #[test]
    fn test_late_failure_of_superseded_upload_is_silent() {
        let mut session = ProcessingSession::new();
        let token_a = session.begin_upload(&asset("a.mp4"));
        let token_b = session.begin_upload(&asset("b.mp4"));

        let applied = session
            .complete_upload(token_a, Err(BackendError::Timeout))
            .unwrap();
        assert_eq!(applied, Applied::Superseded);
        assert_eq!(session.state(), SessionState::Uploading);

        session.complete_upload(token_b, Ok(response(1))).unwrap();
        assert_eq!(session.state(), SessionState::Ready);
    }

    #[test]
    fn test_search_requires_ready_state() {
        let mut session = ProcessingSession::new();
        let err = session.begin_search("intro").unwrap_err();
        assert!(matches!(err, SessionError::NoData));

        session.begin_upload(&asset("a.mp4"));
        let err = session.begin_search("intro").unwrap_err();
        assert!(matches!(err, SessionError::NoData));
    }

    #[test]
    fn test_search_rejects_empty_query() {
        let mut session = ready_session(3);
        let err = session.begin_search("   ").unwrap_err();
        assert!(matches!(err, SessionError::EmptyQuery));
    }

    #[test]
    fn test_search_request_is_consistent_with_one_snapshot() {
        let mut session = ready_session(3);
        let (token, request) = session.begin_search("intro").unwrap();

        assert_eq!(request.query, "intro");
        assert_eq!(request.search_index.len(), request.embeddings.len());
        assert_eq!(request.search_index[0], "segment 0");

        let applied = session
            .complete_search(
                token,
                Ok(SearchResponse {
                    result: "segment 1".to_string(),
                }),
            )
            .unwrap();
        assert_eq!(applied, Applied::Current("segment 1".to_string()));
        assert_eq!(session.search_result(), Some("segment 1"));

        // Searching never mutates the installed artifacts
        assert_eq!(session.snapshot().unwrap().transcript.len(), 3);
    }

    #[test]
    fn test_search_failure_leaves_session_ready() {
        let mut session = ready_session(3);
        let (token, _) = session.begin_search("intro").unwrap();

        let err = session
            .complete_search(token, Err(BackendError::Timeout))
            .unwrap_err();
        assert!(matches!(err, SessionError::Transport(_)));
        assert_eq!(session.state(), SessionState::Ready);
        assert!(session.snapshot().is_some());
    }

    #[test]
    fn test_new_upload_invalidates_pending_search() {
        let mut session = ready_session(3);
        let (search_token, _) = session.begin_search("intro").unwrap();

        let upload_token = session.begin_upload(&asset("b.mp4"));
        session
            .complete_upload(upload_token, Ok(response(5)))
            .unwrap();

        let applied = session
            .complete_search(
                search_token,
                Ok(SearchResponse {
                    result: "stale answer".to_string(),
                }),
            )
            .unwrap();
        assert_eq!(applied, Applied::Superseded);
        assert_eq!(session.search_result(), None);
        assert_eq!(session.snapshot().unwrap().transcript.len(), 5);
    }

    #[test]
    fn test_highlight_round_trip() {
        let mut session = ready_session(3);
        let (token, request) = session.begin_highlight("cat,  dog ,").unwrap();
        assert_eq!(request.keywords, vec!["cat", "dog"]);
        assert_eq!(request.transcript.len(), 3);

        let matched = vec![TranscriptSegment {
            start: 5.0,
            end: 10.0,
            text: "segment 1".to_string(),
        }];
        let applied = session
            .complete_highlight(
                token,
                Ok(HighlightResponse {
                    highlights: matched.clone(),
                }),
            )
            .unwrap();
        assert_eq!(applied, Applied::Current(matched));
        assert_eq!(session.highlights().len(), 1);
    }

    #[test]
    fn test_highlight_requires_keywords_and_ready_state() {
        let mut session = ProcessingSession::new();
        assert!(matches!(
            session.begin_highlight("cat").unwrap_err(),
            SessionError::NoData
        ));

        let mut session = ready_session(3);
        assert!(matches!(
            session.begin_highlight(" , ,").unwrap_err(),
            SessionError::EmptyKeywords
        ));
    }

    #[test]
    fn test_rejected_selection_leaves_session_empty() {
        let session = ProcessingSession::new();

        let result = crate::media::select(Path::new("clip.avi"));
        assert!(result.is_err());

        // A rejected file never reaches the session
        assert_eq!(session.state(), SessionState::Empty);
        assert_eq!(session.current_asset(), None);
    }

    #[test]
    fn test_parse_keywords() {
        assert_eq!(parse_keywords("cat,  dog ,"), vec!["cat", "dog"]);
        assert_eq!(parse_keywords("cat,cat, CAT"), vec!["cat", "CAT"]);
        assert!(parse_keywords("  ,, ").is_empty());
    }
}
