//! Remote mirror of saved notes.
//!
//! The local store is authoritative. Everything here is best-effort: a
//! failure is logged by the caller and the local write stands.

mod firebase;

pub use firebase::FirebaseRemote;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::entity::Note;
use crate::error::RemoteSyncError;

/// Identity used for blob paths when anonymous sign-in fails.
pub const PLACEHOLDER_UID: &str = "anonymous";

/// Document written to the remote store for one note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotePayload {
    pub content: String,
    pub tags: Vec<String>,
    pub attachments: Vec<String>,
    pub created_at: String,
}

impl NotePayload {
    pub fn from_note(note: &Note) -> Self {
        Self {
            content: note.content.clone(),
            tags: note.tags.clone(),
            attachments: note.attachments.clone(),
            created_at: note.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Upsert-by-title document store.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn upsert_note(&self, title: &str, payload: &NotePayload) -> Result<(), RemoteSyncError>;

    /// Every stored document as (id, payload). Diagnostic only.
    async fn fetch_all(&self) -> Result<Vec<(String, NotePayload)>, RemoteSyncError>;
}

/// Named blob storage handing back publicly retrievable URLs.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), RemoteSyncError>;

    async fn download_url(&self, path: &str) -> Result<String, RemoteSyncError>;
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Establish an anonymous session and return its user id.
    async fn sign_in_anonymously(&self) -> Result<String, RemoteSyncError>;
}

/// Sequential, best-effort mirroring of notes and their attachments.
pub struct RemoteSync {
    documents: Arc<dyn DocumentStore>,
    blobs: Arc<dyn BlobStore>,
    uid: String,
    blob_root: String,
}

impl RemoteSync {
    /// Sign in once. A failed sign-in is logged and the placeholder identity
    /// is used instead; it never blocks anything else.
    pub async fn connect(
        documents: Arc<dyn DocumentStore>,
        blobs: Arc<dyn BlobStore>,
        identity: Arc<dyn IdentityProvider>,
        blob_root: &str,
    ) -> Self {
        let uid = match identity.sign_in_anonymously().await {
            Ok(uid) => {
                debug!(%uid, "signed in anonymously");
                uid
            }
            Err(e) => {
                warn!(error = %e, "anonymous sign-in failed, using placeholder identity");
                PLACEHOLDER_UID.to_string()
            }
        };

        Self {
            documents,
            blobs,
            uid,
            blob_root: blob_root.to_string(),
        }
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    /// Upload the content blob and each attachment file, appending their URLs
    /// to `note.attachments`, then upsert the note document.
    ///
    /// Steps run one at a time and the first failure stops the rest. URLs
    /// obtained before the failure stay on the note.
    pub async fn mirror(&self, title: &str, note: &mut Note, files: &[PathBuf]) -> Result<(), RemoteSyncError> {
        let timestamp = Utc::now().timestamp_millis();

        if !note.content.is_empty() {
            let path = format!("{}/{}/{}_{}.txt", self.blob_root, self.uid, title, timestamp);
            let url = self
                .upload(&path, note.content.clone().into_bytes(), "text/plain")
                .await?;
            note.attachments.push(url);
        }

        for file in files {
            let name = file_name(file);
            let bytes = tokio::fs::read(file)
                .await
                .map_err(|source| RemoteSyncError::Attachment {
                    name: name.clone(),
                    source,
                })?;
            let content_type = mime_guess::from_path(file).first_or_octet_stream();
            let path = format!(
                "{}/{}/attachments/{}_{}",
                self.blob_root, self.uid, timestamp, name
            );
            let url = self.upload(&path, bytes, content_type.essence_str()).await?;
            note.attachments.push(url);
        }

        self.documents
            .upsert_note(title, &NotePayload::from_note(note))
            .await
    }

    /// Fetch and log every remote document. Failures are logged and yield
    /// an empty list.
    pub async fn log_all(&self) -> Vec<(String, NotePayload)> {
        match self.documents.fetch_all().await {
            Ok(docs) => {
                for (id, data) in &docs {
                    info!(note_id = %id, data = ?data, "remote note");
                }
                docs
            }
            Err(e) => {
                warn!(error = %e, "error fetching notes from remote store");
                Vec::new()
            }
        }
    }

    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, RemoteSyncError> {
        self.blobs.upload(path, bytes, content_type).await?;
        let url = self.blobs.download_url(path).await?;
        debug!(%path, %url, "uploaded blob");
        Ok(url)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
