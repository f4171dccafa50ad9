use serde::{Deserialize, Serialize};

use crate::domain::SourceCitation;

/// Body of `GET /files`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileListResponse {
    pub files: Vec<String>,
}

/// Body of a successful `POST /upload`. Clients must tolerate its absence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub filename: String,
    pub chunks_count: u64,
    #[serde(default)]
    pub message: String,
}

impl UploadResponse {
    pub fn was_indexed(&self) -> bool {
        self.chunks_count > 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub question: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
    #[serde(default)]
    pub sources: Vec<SourceCitation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_response_defaults_missing_page_number_to_first_page() {
        let raw = r#"{"answer":"42","sources":[{"filename":"a.pdf","text":"x"}]}"#;
        let parsed: ChatResponse = serde_json::from_str(raw).expect("parse");
        assert_eq!(parsed.sources[0].page_number, 1);
    }

    #[test]
    fn chat_response_without_sources_is_empty() {
        let parsed: ChatResponse = serde_json::from_str(r#"{"answer":"none"}"#).expect("parse");
        assert!(parsed.sources.is_empty());
    }

    #[test]
    fn chat_response_rejects_missing_answer() {
        assert!(serde_json::from_str::<ChatResponse>(r#"{"sources":[]}"#).is_err());
    }

    #[test]
    fn upload_response_reports_unindexed_files() {
        let parsed: UploadResponse = serde_json::from_str(
            r#"{"filename":"notes.txt","chunks_count":0,"message":"Not a PDF"}"#,
        )
        .expect("parse");
        assert!(!parsed.was_indexed());
    }
}
