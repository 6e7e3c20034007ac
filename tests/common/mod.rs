#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Json;
use chrono::{Duration, NaiveDate};
use serde_json::{Value, json};

use notedeck::api::Note;

/// In-process stand-in for the notes backend, following the same envelope
/// and status-code conventions.
pub struct MockBackend {
    pub base_url: String,
    state: Arc<MockState>,
}

#[derive(Default)]
struct MockState {
    notes: Mutex<BTreeMap<u64, Note>>,
    next_id: AtomicU64,
    clock: AtomicU64,
    requests: AtomicUsize,
    list_failing: AtomicBool,
}

impl MockState {
    fn timestamp(&self) -> String {
        let tick = self.clock.fetch_add(1, Ordering::SeqCst) as i64;
        let base = NaiveDate::from_ymd_opt(2024, 5, 1)
            .and_then(|d| d.and_hms_opt(10, 0, 0))
            .unwrap();
        (base + Duration::seconds(tick))
            .format("%Y-%m-%dT%H:%M:%S%.6f")
            .to_string()
    }

    fn insert(&self, content: &str) -> Note {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let now = self.timestamp();
        let note = Note {
            id,
            content: content.to_string(),
            created_at: now.clone(),
            updated_at: now,
        };
        self.notes.lock().unwrap().insert(id, note.clone());
        note
    }

    fn hit(&self) {
        self.requests.fetch_add(1, Ordering::SeqCst);
    }
}

impl MockBackend {
    pub async fn start() -> Self {
        Self::start_with(&[]).await
    }

    /// Start with notes pre-created in the given order (ids 1, 2, ...).
    pub async fn start_with(contents: &[&str]) -> Self {
        let state = Arc::new(MockState::default());
        for content in contents {
            state.insert(content);
        }

        let api = Router::new()
            .route("/notes", get(list_notes).post(create_note))
            .route(
                "/notes/:id",
                get(get_note).put(update_note).delete(delete_note),
            )
            .route("/stats", get(stats))
            .with_state(state.clone());
        let app = Router::new()
            .nest("/api", api)
            .route("/broken/api/notes", get(broken));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        MockBackend {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    /// Number of API requests served so far.
    pub fn requests(&self) -> usize {
        self.state.requests.load(Ordering::SeqCst)
    }

    pub fn note(&self, id: u64) -> Option<Note> {
        self.state.notes.lock().unwrap().get(&id).cloned()
    }

    pub fn note_count(&self) -> usize {
        self.state.notes.lock().unwrap().len()
    }

    /// Make `GET /api/notes` answer 500 from now on.
    pub fn fail_listing(&self) {
        self.state.list_failing.store(true, Ordering::SeqCst);
    }

    /// Change a note behind the client's back.
    pub fn insert_directly(&self, content: &str) -> Note {
        self.state.insert(content)
    }
}

fn failure(status: StatusCode, error: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "success": false, "error": error })))
}

fn check_content(body: &Value) -> Result<String, (StatusCode, Json<Value>)> {
    let Some(content) = body.get("content").and_then(Value::as_str) else {
        return Err(failure(StatusCode::BAD_REQUEST, "Content is required"));
    };
    if content.trim().is_empty() {
        return Err(failure(StatusCode::BAD_REQUEST, "Note content cannot be empty"));
    }
    if content.chars().count() > 300 {
        return Err(failure(
            StatusCode::BAD_REQUEST,
            "Note content cannot exceed 300 characters",
        ));
    }
    Ok(content.trim().to_string())
}

async fn list_notes(State(state): State<Arc<MockState>>) -> impl IntoResponse {
    state.hit();
    if state.list_failing.load(Ordering::SeqCst) {
        return failure(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
    }
    // ascending id, so the client has to do the reordering itself
    let notes: Vec<Note> = state.notes.lock().unwrap().values().cloned().collect();
    let count = notes.len();
    (
        StatusCode::OK,
        Json(json!({ "success": true, "data": notes, "count": count })),
    )
}

async fn get_note(State(state): State<Arc<MockState>>, Path(id): Path<u64>) -> impl IntoResponse {
    state.hit();
    let notes = state.notes.lock().unwrap();
    match notes.get(&id) {
        Some(note) => (StatusCode::OK, Json(json!({ "success": true, "data": note }))),
        None => failure(StatusCode::NOT_FOUND, "Note not found"),
    }
}

async fn create_note(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> impl IntoResponse {
    state.hit();
    match check_content(&body) {
        Ok(content) => {
            let note = state.insert(&content);
            (
                StatusCode::CREATED,
                Json(json!({
                    "success": true,
                    "message": "Note created successfully",
                    "data": note,
                })),
            )
        }
        Err(response) => response,
    }
}

async fn update_note(
    State(state): State<Arc<MockState>>,
    Path(id): Path<u64>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    state.hit();
    let content = match check_content(&body) {
        Ok(content) => content,
        Err(response) => return response,
    };
    let now = state.timestamp();
    let mut notes = state.notes.lock().unwrap();
    match notes.get_mut(&id) {
        Some(note) => {
            note.content = content;
            note.updated_at = now;
            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "message": "Note updated successfully",
                    "data": note,
                })),
            )
        }
        None => failure(StatusCode::NOT_FOUND, "Note not found"),
    }
}

async fn delete_note(State(state): State<Arc<MockState>>, Path(id): Path<u64>) -> impl IntoResponse {
    state.hit();
    let removed = state.notes.lock().unwrap().remove(&id);
    match removed {
        Some(_) => (
            StatusCode::OK,
            Json(json!({ "success": true, "message": "Note deleted successfully" })),
        ),
        None => failure(StatusCode::NOT_FOUND, "Note not found"),
    }
}

async fn stats(State(state): State<Arc<MockState>>) -> impl IntoResponse {
    state.hit();
    let total = state.notes.lock().unwrap().len();
    Json(json!({ "success": true, "data": { "total_notes": total, "max_length": 300 } }))
}

async fn broken() -> impl IntoResponse {
    (StatusCode::INTERNAL_SERVER_ERROR, "<html>Internal Server Error</html>")
}
