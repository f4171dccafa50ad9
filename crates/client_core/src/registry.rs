//! Local snapshot of the documents indexed by the backend.
//!
//! The list is only ever replaced wholesale by an authoritative refresh;
//! uploads and deletes never edit it optimistically.

use std::collections::HashSet;

use shared::domain::Document;

use crate::error::{ClientError, RequestKind};

/// Explicit user answer to "Delete <file>?".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

impl From<bool> for Confirmation {
    fn from(value: bool) -> Self {
        if value {
            Self::Confirmed
        } else {
            Self::Declined
        }
    }
}

/// File bytes selected for upload.
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl DocumentUpload {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }

    pub fn mime_type(&self) -> String {
        mime_guess::from_path(&self.filename)
            .first_or_octet_stream()
            .essence_str()
            .to_string()
    }

    fn validate(&self) -> Result<(), ClientError> {
        if self.filename.trim().is_empty() {
            return Err(ClientError::validation("no file selected"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct DocumentRegistry {
    documents: Vec<Document>,
    uploading: bool,
    deleting: bool,
}

impl DocumentRegistry {
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn names(&self) -> Vec<String> {
        self.documents.iter().map(|doc| doc.name.clone()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.documents.iter().any(|doc| doc.name == name)
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    pub fn is_deleting(&self) -> bool {
        self.deleting
    }

    /// Replaces the snapshot. Duplicate names keep their first position.
    pub fn replace(&mut self, names: Vec<String>) {
        let mut seen = HashSet::new();
        self.documents = names
            .into_iter()
            .filter(|name| seen.insert(name.clone()))
            .map(Document::new)
            .collect();
    }

    pub fn begin_upload(&mut self, upload: &DocumentUpload) -> Result<(), ClientError> {
        if self.uploading {
            return Err(ClientError::Busy(RequestKind::Upload));
        }
        upload.validate()?;
        self.uploading = true;
        Ok(())
    }

    pub fn finish_upload(&mut self) {
        self.uploading = false;
    }

    pub fn begin_delete(
        &mut self,
        filename: &str,
        confirmation: Confirmation,
    ) -> Result<(), ClientError> {
        if filename.trim().is_empty() {
            return Err(ClientError::validation("no file selected"));
        }
        if confirmation != Confirmation::Confirmed {
            return Err(ClientError::Unconfirmed(filename.to_string()));
        }
        if self.deleting {
            return Err(ClientError::Busy(RequestKind::Delete));
        }
        self.deleting = true;
        Ok(())
    }

    pub fn finish_delete(&mut self) {
        self.deleting = false;
    }
}

#[cfg(test)]
#[path = "tests/registry_tests.rs"]
mod tests;
