use log::{debug, warn};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::note::{Note, NoteStats};

/// `{success, data|error}` wrapper the backend puts around every response.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    data: Option<T>,
    error: Option<String>,
    message: Option<String>,
    count: Option<usize>,
}

#[derive(Debug, Serialize)]
struct ContentBody<'a> {
    content: &'a str,
}

/// Thin async wrapper around the notes REST API.
///
/// Every method issues exactly one request. There is no retry, caching or
/// timeout handling; content is sent as given.
#[derive(Debug, Clone)]
pub struct NotesClient {
    http: Client,
    api_base: String,
}

impl NotesClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        NotesClient {
            http,
            api_base: format!("{}/api", base_url.trim_end_matches('/')),
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// GET /api/notes, in whatever order the server returns them.
    pub async fn list_notes(&self) -> Result<Vec<Note>, ApiError> {
        let envelope: Envelope<Vec<Note>> = self.send(self.http.get(self.notes_url())).await?;
        if let Some(count) = envelope.count {
            debug!("event=list_notes module=api status=ok count={}", count);
        }
        envelope.data.ok_or(ApiError::MissingPayload)
    }

    /// GET /api/notes/{id}
    pub async fn get_note(&self, id: u64) -> Result<Note, ApiError> {
        let envelope: Envelope<Note> = self.send(self.http.get(self.note_url(id))).await?;
        envelope.data.ok_or(ApiError::MissingPayload)
    }

    /// POST /api/notes
    pub async fn create_note(&self, content: &str) -> Result<Note, ApiError> {
        let request = self
            .http
            .post(self.notes_url())
            .json(&ContentBody { content });
        let envelope: Envelope<Note> = self.send(request).await?;
        envelope.data.ok_or(ApiError::MissingPayload)
    }

    /// PUT /api/notes/{id}
    pub async fn update_note(&self, id: u64, content: &str) -> Result<Note, ApiError> {
        let request = self
            .http
            .put(self.note_url(id))
            .json(&ContentBody { content });
        let envelope: Envelope<Note> = self.send(request).await?;
        envelope.data.ok_or(ApiError::MissingPayload)
    }

    /// DELETE /api/notes/{id}, returning the server's acknowledgment text.
    pub async fn delete_note(&self, id: u64) -> Result<String, ApiError> {
        let envelope: Envelope<serde_json::Value> =
            self.send(self.http.delete(self.note_url(id))).await?;
        Ok(envelope
            .message
            .unwrap_or_else(|| "Note deleted successfully".to_string()))
    }

    /// GET /api/stats
    pub async fn stats(&self) -> Result<NoteStats, ApiError> {
        let url = format!("{}/stats", self.api_base);
        let envelope: Envelope<NoteStats> = self.send(self.http.get(url)).await?;
        envelope.data.ok_or(ApiError::MissingPayload)
    }

    fn notes_url(&self) -> String {
        format!("{}/notes", self.api_base)
    }

    fn note_url(&self, id: u64) -> String {
        format!("{}/notes/{}", self.api_base, id)
    }

    /// Send `request` and unwrap the envelope.
    ///
    /// The body is decoded whatever the HTTP status is, since the backend
    /// reports 400/404 failures as JSON envelopes too.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<Envelope<T>, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        let envelope: Envelope<T> = match serde_json::from_slice(&body) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(
                    "event=decode_response module=api status=error http_status={} error={}",
                    status.as_u16(),
                    e
                );
                return Err(ApiError::UnexpectedResponse {
                    status: status.as_u16(),
                });
            }
        };

        if !envelope.success {
            let message = envelope
                .error
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
            debug!(
                "event=api_call module=api status=error http_status={} error={}",
                status.as_u16(),
                message
            );
            return Err(ApiError::Server(message));
        }

        debug!(
            "event=api_call module=api status=ok http_status={}",
            status.as_u16()
        );
        Ok(envelope)
    }
}
