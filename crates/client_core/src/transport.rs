//! `DocumentService` over the backend's HTTP API.

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, Response,
};
use serde::de::DeserializeOwned;
use shared::{
    error::ApiError,
    protocol::{ChatRequest, ChatResponse, FileListResponse, UploadResponse},
};
use tracing::{debug, info};
use url::Url;

use crate::{
    config::Settings,
    error::{ClientError, TransportError},
    registry::DocumentUpload,
    DocumentService,
};

pub struct HttpDocumentService {
    http: Client,
    base_url: Url,
}

impl HttpDocumentService {
    pub fn new(settings: &Settings) -> Result<Self, ClientError> {
        let mut builder = Client::builder();
        if let Some(timeout) = settings.request_timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            base_url: settings.api_url.clone(),
        })
    }

    /// Appends percent-encoded path segments to the base url.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::validation(format!("{} cannot be a base url", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn check_status(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(TransportError::Status {
            status: status.as_u16(),
            message: ApiError::message_from_body(&body),
        }
        .into())
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes)
            .map_err(|err| TransportError::Malformed(err.to_string()).into())
    }
}

#[async_trait]
impl DocumentService for HttpDocumentService {
    async fn list_documents(&self) -> Result<Vec<String>, ClientError> {
        let response = self.http.get(self.endpoint(&["files"])?).send().await?;
        let body: FileListResponse = Self::read_json(Self::check_status(response).await?).await?;
        debug!(count = body.files.len(), "listed documents");
        Ok(body.files)
    }

    async fn upload(&self, upload: DocumentUpload) -> Result<Option<UploadResponse>, ClientError> {
        let mime_type = upload.mime_type();
        let part = Part::bytes(upload.bytes)
            .file_name(upload.filename.clone())
            .mime_str(&mime_type)?;
        let response = self
            .http
            .post(self.endpoint(&["upload"])?)
            .multipart(Form::new().part("file", part))
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        // Any 2xx counts as success; the receipt is informational.
        let bytes = response.bytes().await?;
        let receipt = serde_json::from_slice::<UploadResponse>(&bytes).ok();
        if let Some(receipt) = &receipt {
            info!(
                filename = %receipt.filename,
                chunks = receipt.chunks_count,
                "backend indexed upload"
            );
        }
        Ok(receipt)
    }

    async fn remove(&self, filename: &str) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(self.endpoint(&["files", filename])?)
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn ask(&self, question: &str) -> Result<ChatResponse, ClientError> {
        let response = self
            .http
            .post(self.endpoint(&["chat"])?)
            .json(&ChatRequest {
                question: question.to_string(),
            })
            .send()
            .await?;
        Self::read_json(Self::check_status(response).await?).await
    }

    async fn fetch_document(&self, filename: &str) -> Result<Vec<u8>, ClientError> {
        let response = self
            .http
            .get(self.endpoint(&["static", filename])?)
            .send()
            .await?;
        let bytes = Self::check_status(response).await?.bytes().await?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
