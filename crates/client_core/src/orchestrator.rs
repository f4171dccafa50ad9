//! Top-level command surface composing the registry, conversation and viewer.
//!
//! State lives behind one mutex that is never held across a network call, so
//! uploads, deletes, queries and document loads can interleave while each
//! category stays single-flight. The work after a command is accepted runs in
//! a spawned task: dropping the caller's future cannot leave a flag raised.

use std::{future::Future, sync::Arc};

use shared::domain::{Document, SourceCitation, Turn};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use crate::{
    conversation::Conversation,
    error::ClientError,
    pdf,
    registry::{Confirmation, DocumentRegistry, DocumentUpload},
    viewer::ViewerState,
    DocumentService,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    UploadFailed,
    DeleteFailed,
    RefreshFailed,
    /// The backend stored the file but produced no index chunks for it.
    NotIndexed,
}

/// Interrupting notification for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum AppEvent {
    RegistryChanged {
        documents: Vec<String>,
        uploading: bool,
        deleting: bool,
    },
    /// Fired whenever the transcript or the in-flight indicator changes; the
    /// front end scrolls to the newest turn on it.
    TranscriptChanged { len: usize, querying: bool },
    ViewerChanged(ViewerState),
    Notice(Notice),
}

#[derive(Debug, Clone)]
pub struct AppSnapshot {
    pub documents: Vec<Document>,
    pub uploading: bool,
    pub deleting: bool,
    pub transcript: Vec<Turn>,
    pub querying: bool,
    pub draft: String,
    pub viewer: ViewerState,
}

#[derive(Debug, Default)]
struct AppState {
    registry: DocumentRegistry,
    conversation: Conversation,
    viewer: ViewerState,
}

pub struct Orchestrator {
    service: Arc<dyn DocumentService>,
    state: Mutex<AppState>,
    events: broadcast::Sender<AppEvent>,
}

async fn run_detached<F>(task: F) -> Result<(), ClientError>
where
    F: Future<Output = Result<(), ClientError>> + Send + 'static,
{
    tokio::spawn(task)
        .await
        .unwrap_or_else(|err| Err(ClientError::Task(err.to_string())))
}

impl Orchestrator {
    pub fn new(service: Arc<dyn DocumentService>) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            service,
            state: Mutex::new(AppState::default()),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<AppEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> AppSnapshot {
        let state = self.state.lock().await;
        AppSnapshot {
            documents: state.registry.documents().to_vec(),
            uploading: state.registry.is_uploading(),
            deleting: state.registry.is_deleting(),
            transcript: state.conversation.transcript().to_vec(),
            querying: state.conversation.is_querying(),
            draft: state.conversation.draft().to_string(),
            viewer: state.viewer.clone(),
        }
    }

    fn emit(&self, event: AppEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    fn emit_registry(&self, registry: &DocumentRegistry) {
        self.emit(AppEvent::RegistryChanged {
            documents: registry.names(),
            uploading: registry.is_uploading(),
            deleting: registry.is_deleting(),
        });
    }

    fn emit_transcript(&self, conversation: &Conversation) {
        self.emit(AppEvent::TranscriptChanged {
            len: conversation.transcript().len(),
            querying: conversation.is_querying(),
        });
    }

    fn emit_viewer(&self, viewer: &ViewerState) {
        self.emit(AppEvent::ViewerChanged(viewer.clone()));
    }

    fn open_in_viewer(&self, state: &mut AppState, source: SourceCitation) {
        let generation = state.viewer.open_at(source);
        debug!(generation = generation.0, "viewer opened");
        self.emit_viewer(&state.viewer);
    }

    fn notify(&self, notice: Notice) {
        self.emit(AppEvent::Notice(notice));
    }

    /// Replaces the document list with the backend's. On failure the cached
    /// list is left as it was.
    pub async fn refresh(&self) -> Result<Vec<String>, ClientError> {
        let names = self.service.list_documents().await?;
        let mut state = self.state.lock().await;
        state.registry.replace(names);
        self.emit_registry(&state.registry);
        Ok(state.registry.names())
    }

    async fn refresh_after_mutation(&self) {
        if let Err(err) = self.refresh().await {
            warn!("document list refresh failed: {err}");
            self.notify(Notice::new(
                NoticeKind::RefreshFailed,
                format!("Could not refresh documents: {err}"),
            ));
        }
    }

    pub async fn upload(self: &Arc<Self>, upload: DocumentUpload) -> Result<(), ClientError> {
        {
            let mut state = self.state.lock().await;
            state.registry.begin_upload(&upload)?;
            self.emit_registry(&state.registry);
        }

        let this = Arc::clone(self);
        run_detached(async move {
            let result = this.perform_upload(upload).await;
            let mut state = this.state.lock().await;
            state.registry.finish_upload();
            this.emit_registry(&state.registry);
            result
        })
        .await
    }

    async fn perform_upload(&self, upload: DocumentUpload) -> Result<(), ClientError> {
        let filename = upload.filename.clone();
        info!(filename = %filename, bytes = upload.bytes.len(), "uploading document");
        match self.service.upload(upload).await {
            Ok(receipt) => {
                if let Some(receipt) = receipt.filter(|receipt| !receipt.was_indexed()) {
                    self.notify(Notice::new(
                        NoticeKind::NotIndexed,
                        format!("{} was stored but not indexed: {}", filename, receipt.message),
                    ));
                }
                self.refresh_after_mutation().await;
                Ok(())
            }
            Err(err) => {
                warn!(filename = %filename, "upload failed: {err}");
                self.notify(Notice::new(NoticeKind::UploadFailed, "Upload failed"));
                Err(err)
            }
        }
    }

    /// Deletes `filename` from the backend. Nothing is sent unless
    /// `confirmation` is [`Confirmation::Confirmed`].
    pub async fn remove(
        self: &Arc<Self>,
        filename: &str,
        confirmation: Confirmation,
    ) -> Result<(), ClientError> {
        {
            let mut state = self.state.lock().await;
            state.registry.begin_delete(filename, confirmation)?;
            self.emit_registry(&state.registry);
        }

        let this = Arc::clone(self);
        let filename = filename.to_string();
        run_detached(async move {
            let result = this.perform_remove(&filename).await;
            let mut state = this.state.lock().await;
            state.registry.finish_delete();
            this.emit_registry(&state.registry);
            result
        })
        .await
    }

    async fn perform_remove(&self, filename: &str) -> Result<(), ClientError> {
        info!(filename = %filename, "deleting document");
        match self.service.remove(filename).await {
            Ok(()) => {
                self.refresh_after_mutation().await;
                Ok(())
            }
            Err(err) => {
                warn!(filename = %filename, "delete failed: {err}");
                self.notify(Notice::new(NoticeKind::DeleteFailed, "Delete failed"));
                Err(err)
            }
        }
    }

    pub async fn set_draft(&self, text: impl Into<String>) {
        self.state.lock().await.conversation.set_draft(text);
    }

    pub async fn submit_draft(self: &Arc<Self>) -> Result<(), ClientError> {
        let draft = self.state.lock().await.conversation.draft().to_string();
        self.ask(&draft).await
    }

    /// Asks `question`. Transport failures become an apology turn in the
    /// transcript rather than an error; only local rejections are returned.
    pub async fn ask(self: &Arc<Self>, question: &str) -> Result<(), ClientError> {
        let ticket = {
            let mut state = self.state.lock().await;
            let ticket = state.conversation.begin(question)?;
            self.emit_transcript(&state.conversation);
            ticket
        };

        let this = Arc::clone(self);
        run_detached(async move {
            debug!(question = %ticket.question, "sending question");
            let outcome = this.service.ask(&ticket.question).await;

            let mut state = this.state.lock().await;
            // The turn and the auto-opened citation land under the same lock.
            if let Some(first) = state.conversation.complete(ticket, outcome) {
                this.open_in_viewer(&mut state, first);
            }
            this.emit_transcript(&state.conversation);
            Ok(())
        })
        .await
    }

    pub async fn open_source(&self, source: SourceCitation) {
        let mut state = self.state.lock().await;
        self.open_in_viewer(&mut state, source);
    }

    /// Re-opens a citation attached to an earlier assistant turn.
    pub async fn open_citation(
        &self,
        turn_index: usize,
        citation_index: usize,
    ) -> Result<(), ClientError> {
        let mut state = self.state.lock().await;
        let source = state
            .conversation
            .citation(turn_index, citation_index)
            .cloned()
            .ok_or_else(|| {
                ClientError::validation(format!(
                    "turn {turn_index} has no citation {citation_index}"
                ))
            })?;
        self.open_in_viewer(&mut state, source);
        Ok(())
    }

    /// Re-opens the last active source; false when there is nothing to reopen.
    pub async fn reopen(&self) -> bool {
        let mut state = self.state.lock().await;
        let reopened = state.viewer.reopen().is_some();
        if reopened {
            self.emit_viewer(&state.viewer);
        }
        reopened
    }

    pub async fn close_viewer(&self) {
        let mut state = self.state.lock().await;
        state.viewer.close();
        self.emit_viewer(&state.viewer);
    }

    pub async fn next_page(&self) -> bool {
        self.update_viewer(ViewerState::next_page).await
    }

    pub async fn prev_page(&self) -> bool {
        self.update_viewer(ViewerState::prev_page).await
    }

    pub async fn zoom_in(&self) -> bool {
        self.update_viewer(ViewerState::zoom_in).await
    }

    pub async fn zoom_out(&self) -> bool {
        self.update_viewer(ViewerState::zoom_out).await
    }

    async fn update_viewer(&self, op: fn(&mut ViewerState) -> bool) -> bool {
        let mut state = self.state.lock().await;
        let changed = op(&mut state.viewer);
        if changed {
            self.emit_viewer(&state.viewer);
        }
        changed
    }

    /// Fetches the active document and records its page count. A load that
    /// finishes after the viewer moved to another source is discarded.
    pub async fn load_active_document(&self) -> Result<(), ClientError> {
        let Some(pending) = self.state.lock().await.viewer.pending_load() else {
            return Ok(());
        };

        debug!(
            filename = %pending.filename,
            generation = pending.generation.0,
            "loading document for viewer"
        );
        let page_count = match self.service.fetch_document(&pending.filename).await {
            Ok(bytes) => pdf::count_pages(&bytes),
            Err(err) => Err(err),
        };

        let mut state = self.state.lock().await;
        let applied = match page_count {
            Ok(pages) => state.viewer.document_loaded(pages, pending.generation),
            Err(err) => {
                warn!(filename = %pending.filename, "document load failed: {err}");
                let reason = format!("Could not load {}: {err}", pending.filename);
                state.viewer.load_failed(reason, pending.generation)
            }
        };

        match applied {
            Ok(()) => {
                self.emit_viewer(&state.viewer);
                Ok(())
            }
            Err(ClientError::StaleResponse { received, current }) => {
                debug!(received, current, "dropping stale document load");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
#[path = "tests/orchestrator_tests.rs"]
mod tests;
