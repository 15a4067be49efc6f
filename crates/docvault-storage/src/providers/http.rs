//! JSON-over-HTTP client for the document-storage API.

use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use docvault_core::config::ApiConfig;
use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;
use docvault_core::types::{ArchiveId, FolderId};
use docvault_entity::folder::{Folder, FolderPayload};
use docvault_entity::upload::{UploadFile, UploadResponse};

use crate::api::DocumentApi;

/// HTTP document API client.
#[derive(Debug, Clone)]
pub struct HttpDocumentApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDocumentApi {
    /// Build a client from configuration.
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &config.bearer_token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| AppError::configuration(format!("Invalid bearer token: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .default_headers(headers)
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    format!("Failed to build HTTP client: {e}"),
                    e,
                )
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends a request and decodes a JSON body, mapping non-2xx to errors.
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        operation: &str,
    ) -> AppResult<T> {
        let response = request.send().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ExternalService,
                format!("{operation} request failed: {e}"),
                e,
            )
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(operation, status = status.as_u16(), body = %body, "Document API rejected request");
            return Err(AppError::api_rejected(
                status.as_u16(),
                format!("{operation} rejected with {status}: {body}"),
            ));
        }

        response.json::<T>().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Serialization,
                format!("{operation} returned an unreadable body: {e}"),
                e,
            )
        })
    }

    /// Uploads one file. Never fails: transport errors become status 0.
    async fn upload_one(&self, url: &str, file: UploadFile) -> UploadResponse {
        let name = file.name.clone();
        let mut part = Part::bytes(file.data.to_vec()).file_name(file.name);
        if let Some(mime) = &file.mime_type {
            part = match part.mime_str(mime) {
                Ok(p) => p,
                Err(e) => {
                    return UploadResponse::new(name, 0)
                        .with_message(format!("Invalid MIME type '{mime}': {e}"));
                }
            };
        }
        let form = Form::new().part("file", part);

        match self.client.post(url).multipart(form).send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                debug!(file = %name, status, "File upload answered");
                let upload = UploadResponse::new(name, status);
                if response.status().is_success() {
                    upload
                } else {
                    let body = response.text().await.unwrap_or_default();
                    upload.with_message(body)
                }
            }
            Err(e) => {
                warn!(file = %name, error = %e, "File upload failed to send");
                UploadResponse::new(name, 0).with_message(e.to_string())
            }
        }
    }

    async fn upload_all(&self, url: String, files: Vec<UploadFile>) -> Vec<UploadResponse> {
        join_all(files.into_iter().map(|file| self.upload_one(&url, file))).await
    }
}

#[async_trait]
impl DocumentApi for HttpDocumentApi {
    fn provider_type(&self) -> &str {
        "http"
    }

    async fn create_folder(&self, archive_id: ArchiveId, payload: FolderPayload) -> AppResult<Folder> {
        let url = self.url(&format!("/archives/{archive_id}/folders"));
        self.send_json(self.client.post(url).json(&payload), "create folder")
            .await
    }

    async fn rename_folder(
        &self,
        archive_id: ArchiveId,
        folder_id: FolderId,
        payload: FolderPayload,
    ) -> AppResult<Folder> {
        let url = self.url(&format!("/archives/{archive_id}/folders/{folder_id}"));
        self.send_json(self.client.put(url).json(&payload), "rename folder")
            .await
    }

    async fn rename_archive(&self, archive_id: ArchiveId, name: &str) -> AppResult<bool> {
        let url = self.url(&format!("/archives/{archive_id}"));
        let body = serde_json::json!({ "name": name });
        self.send_json(self.client.put(url).json(&body), "rename archive")
            .await
    }

    async fn delete_folder(&self, archive_id: ArchiveId, folder_id: FolderId) -> AppResult<bool> {
        let url = self.url(&format!("/archives/{archive_id}/folders/{folder_id}"));
        self.send_json(self.client.delete(url), "delete folder").await
    }

    async fn delete_archive(&self, archive_id: ArchiveId) -> AppResult<bool> {
        let url = self.url(&format!("/archives/{archive_id}"));
        self.send_json(self.client.delete(url), "delete archive").await
    }

    async fn move_folder(
        &self,
        dest_archive_id: ArchiveId,
        folder_id: FolderId,
        payload: FolderPayload,
    ) -> AppResult<Folder> {
        let url = self.url(&format!("/archives/{dest_archive_id}/folders/{folder_id}/move"));
        self.send_json(self.client.post(url).json(&payload), "move folder")
            .await
    }

    async fn copy_folder(
        &self,
        src_archive_id: ArchiveId,
        folder_id: FolderId,
        payload: FolderPayload,
    ) -> AppResult<Folder> {
        let url = self.url(&format!("/archives/{src_archive_id}/folders/{folder_id}/copy"));
        self.send_json(self.client.post(url).json(&payload), "copy folder")
            .await
    }

    async fn upload_files_to_archive(
        &self,
        archive_id: ArchiveId,
        files: Vec<UploadFile>,
    ) -> AppResult<Vec<UploadResponse>> {
        let url = self.url(&format!("/archives/{archive_id}/files"));
        Ok(self.upload_all(url, files).await)
    }

    async fn upload_files_to_folder(
        &self,
        archive_id: ArchiveId,
        folder_id: FolderId,
        files: Vec<UploadFile>,
    ) -> AppResult<Vec<UploadResponse>> {
        let url = self.url(&format!("/archives/{archive_id}/folders/{folder_id}/files"));
        Ok(self.upload_all(url, files).await)
    }
}
