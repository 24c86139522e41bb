//! Firebase REST client: anonymous auth, Firestore documents and Cloud
//! Storage blobs.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::sync::RwLock;

use super::{BlobStore, DocumentStore, IdentityProvider, NotePayload};
use crate::config::RemoteConfig;
use crate::error::RemoteSyncError;

pub struct FirebaseRemote {
    client: Client,
    api_key: String,
    project_id: String,
    bucket: String,
    collection: String,
    auth_url: String,
    firestore_url: String,
    storage_url: String,
    id_token: RwLock<Option<String>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignUpResponse {
    local_id: String,
    id_token: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<FirestoreDocument>,
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
struct FirestoreDocument {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectMetadata {
    download_tokens: Option<String>,
}

impl FirebaseRemote {
    pub fn new(config: &RemoteConfig) -> Result<Self, RemoteSyncError> {
        let required = |value: &Option<String>, field: &str| {
            value
                .clone()
                .filter(|v| !v.is_empty())
                .ok_or_else(|| RemoteSyncError::NotConfigured(format!("remote.{} is missing", field)))
        };

        Ok(Self {
            client: Client::new(),
            api_key: required(&config.api_key, "api_key")?,
            project_id: required(&config.project_id, "project_id")?,
            bucket: required(&config.storage_bucket, "storage_bucket")?,
            collection: config.collection.clone(),
            auth_url: config.auth_url.clone(),
            firestore_url: config.firestore_url.clone(),
            storage_url: config.storage_url.clone(),
            id_token: RwLock::new(None),
        })
    }

    fn documents_url(&self, title: Option<&str>) -> Result<Url, RemoteSyncError> {
        let mut segments = vec![
            "v1",
            "projects",
            self.project_id.as_str(),
            "databases",
            "(default)",
            "documents",
            self.collection.as_str(),
        ];
        segments.extend(title);
        let mut url = build_url(&self.firestore_url, &segments)?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }

    fn object_url(&self, path: &str) -> Result<Url, RemoteSyncError> {
        build_url(&self.storage_url, &["v0", "b", self.bucket.as_str(), "o", path])
    }

    async fn authorized(&self, request: RequestBuilder, scheme: &str) -> RequestBuilder {
        match self.id_token.read().await.as_deref() {
            Some(token) => request.header(AUTHORIZATION, format!("{} {}", scheme, token)),
            None => request,
        }
    }
}

#[async_trait]
impl IdentityProvider for FirebaseRemote {
    async fn sign_in_anonymously(&self) -> Result<String, RemoteSyncError> {
        let mut url = build_url(&self.auth_url, &["v1", "accounts:signUp"])?;
        url.query_pairs_mut().append_pair("key", &self.api_key);

        let response = self
            .client
            .post(url)
            .json(&json!({ "returnSecureToken": true }))
            .send()
            .await?;
        let body: SignUpResponse = check("anonymous sign-in", response).await?.json().await?;

        *self.id_token.write().await = Some(body.id_token);
        Ok(body.local_id)
    }
}

#[async_trait]
impl DocumentStore for FirebaseRemote {
    async fn upsert_note(&self, title: &str, payload: &NotePayload) -> Result<(), RemoteSyncError> {
        let url = self.documents_url(Some(title))?;
        let request = self.client.patch(url).json(&encode_document(payload));
        let response = self.authorized(request, "Bearer").await.send().await?;
        check("document write", response).await?;
        Ok(())
    }

    async fn fetch_all(&self) -> Result<Vec<(String, NotePayload)>, RemoteSyncError> {
        let mut notes = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = self.documents_url(None)?;
            if let Some(ref token) = page_token {
                url.query_pairs_mut().append_pair("pageToken", token);
            }

            let request = self.client.get(url);
            let response = self.authorized(request, "Bearer").await.send().await?;
            let page: ListDocumentsResponse = check("document list", response).await?.json().await?;

            for doc in page.documents {
                let id = doc.name.rsplit('/').next().unwrap_or_default().to_string();
                notes.push((id, decode_fields(&doc.fields)));
            }

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(notes)
    }
}

#[async_trait]
impl BlobStore for FirebaseRemote {
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), RemoteSyncError> {
        let mut url = build_url(&self.storage_url, &["v0", "b", self.bucket.as_str(), "o"])?;
        url.query_pairs_mut()
            .append_pair("uploadType", "media")
            .append_pair("name", path);

        let request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, content_type)
            .body(bytes);
        let response = self.authorized(request, "Firebase").await.send().await?;
        check("blob upload", response).await?;
        Ok(())
    }

    async fn download_url(&self, path: &str) -> Result<String, RemoteSyncError> {
        let url = self.object_url(path)?;
        let request = self.client.get(url.clone());
        let response = self.authorized(request, "Firebase").await.send().await?;
        let metadata: ObjectMetadata = check("blob metadata", response).await?.json().await?;

        let token = metadata
            .download_tokens
            .as_deref()
            .and_then(|tokens| tokens.split(',').next())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| RemoteSyncError::MissingDownloadToken(path.to_string()))?;

        Ok(media_url(url, token).to_string())
    }
}

/// Append path segments to a base URL. Each segment is percent-encoded, so a
/// blob path with slashes stays a single segment.
fn build_url(base: &str, segments: &[&str]) -> Result<Url, RemoteSyncError> {
    let mut url =
        Url::parse(base).map_err(|e| RemoteSyncError::InvalidUrl(format!("{}: {}", base, e)))?;
    url.path_segments_mut()
        .map_err(|_| RemoteSyncError::InvalidUrl(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn media_url(mut object_url: Url, token: &str) -> Url {
    object_url
        .query_pairs_mut()
        .append_pair("alt", "media")
        .append_pair("token", token);
    object_url
}

async fn check(operation: &'static str, response: Response) -> Result<Response, RemoteSyncError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(RemoteSyncError::Status {
        operation,
        status: status.as_u16(),
        body,
    })
}

fn string_value(s: &str) -> Value {
    json!({ "stringValue": s })
}

fn array_value(items: &[String]) -> Value {
    if items.is_empty() {
        return json!({ "arrayValue": {} });
    }
    let values: Vec<Value> = items.iter().map(|s| string_value(s)).collect();
    json!({ "arrayValue": { "values": values } })
}

/// Firestore typed-field document body for a note.
fn encode_document(payload: &NotePayload) -> Value {
    json!({
        "fields": {
            "content": string_value(&payload.content),
            "tags": array_value(&payload.tags),
            "attachments": array_value(&payload.attachments),
            "createdAt": string_value(&payload.created_at),
        }
    })
}

fn decode_string(fields: &Map<String, Value>, key: &str) -> String {
    fields
        .get(key)
        .and_then(|v| v.get("stringValue"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn decode_strings(fields: &Map<String, Value>, key: &str) -> Vec<String> {
    fields
        .get(key)
        .and_then(|v| v.get("arrayValue"))
        .and_then(|v| v.get("values"))
        .and_then(Value::as_array)
        .map(|values| {
            values
                .iter()
                .filter_map(|v| v.get("stringValue").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn decode_fields(fields: &Map<String, Value>) -> NotePayload {
    NotePayload {
        content: decode_string(fields, "content"),
        tags: decode_strings(fields, "tags"),
        attachments: decode_strings(fields, "attachments"),
        created_at: decode_string(fields, "createdAt"),
    }
}
