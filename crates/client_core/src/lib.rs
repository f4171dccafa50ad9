use async_trait::async_trait;
use shared::protocol::{ChatResponse, UploadResponse};

pub mod config;
pub mod conversation;
pub mod error;
pub mod orchestrator;
pub mod pdf;
pub mod registry;
pub mod transport;
pub mod viewer;

pub use config::{load_settings, Settings};
pub use conversation::{Conversation, QueryTicket, FALLBACK_ANSWER};
pub use error::{ClientError, RequestKind, TransportError};
pub use orchestrator::{AppEvent, AppSnapshot, Notice, NoticeKind, Orchestrator};
pub use registry::{Confirmation, DocumentRegistry, DocumentUpload};
pub use transport::HttpDocumentService;
pub use viewer::{GenerationToken, PendingLoad, ViewerState};

/// The backend contract: document registry, question answering and raw
/// document bytes for rendering.
#[async_trait]
pub trait DocumentService: Send + Sync {
    async fn list_documents(&self) -> Result<Vec<String>, ClientError>;
    /// Returns the backend's indexing receipt when the response carried one.
    async fn upload(&self, upload: DocumentUpload) -> Result<Option<UploadResponse>, ClientError>;
    async fn remove(&self, filename: &str) -> Result<(), ClientError>;
    async fn ask(&self, question: &str) -> Result<ChatResponse, ClientError>;
    async fn fetch_document(&self, filename: &str) -> Result<Vec<u8>, ClientError>;
}
