use notedeck::api::{ApiError, NotesClient};

use crate::common::MockBackend;

mod common;

#[tokio::test]
async fn create_then_fetch_round_trip() {
    let backend = MockBackend::start().await;
    let client = NotesClient::new(&backend.base_url);

    let created = client.create_note("first note").await.unwrap();
    assert_eq!(created.id, 1);
    assert!(!created.is_edited());

    let fetched = client.get_note(created.id).await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn list_returns_server_order() {
    let backend = MockBackend::start_with(&["a", "b", "c"]).await;
    let client = NotesClient::new(&backend.base_url);

    let ids: Vec<u64> = client.list_notes().await.unwrap().iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn update_bumps_updated_at_only() {
    let backend = MockBackend::start_with(&["draft"]).await;
    let client = NotesClient::new(&backend.base_url);

    let before = client.get_note(1).await.unwrap();
    let after = client.update_note(1, "final").await.unwrap();
    assert_eq!(after.content, "final");
    assert_eq!(after.created_at, before.created_at);
    assert!(after.is_edited());
}

#[tokio::test]
async fn missing_note_surfaces_server_message() {
    let backend = MockBackend::start().await;
    let client = NotesClient::new(&backend.base_url);

    for err in [
        client.get_note(99).await.unwrap_err(),
        client.update_note(99, "x").await.unwrap_err(),
        client.delete_note(99).await.unwrap_err(),
    ] {
        match err {
            ApiError::Server(message) => assert_eq!(message, "Note not found"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

#[tokio::test]
async fn server_side_rejection_is_reported() {
    let backend = MockBackend::start().await;
    let client = NotesClient::new(&backend.base_url);

    // the client sends whatever it is given; the server refuses it
    let err = client.create_note("   ").await.unwrap_err();
    assert_eq!(err.to_string(), "Note content cannot be empty");
    assert_eq!(backend.note_count(), 0);
}

#[tokio::test]
async fn delete_returns_acknowledgment() {
    let backend = MockBackend::start_with(&["bye"]).await;
    let client = NotesClient::new(&backend.base_url);

    let message = client.delete_note(1).await.unwrap();
    assert_eq!(message, "Note deleted successfully");
    assert!(backend.note(1).is_none());
}

#[tokio::test]
async fn stats_reports_total_and_limit() {
    let backend = MockBackend::start_with(&["a", "b"]).await;
    let client = NotesClient::new(&backend.base_url);

    let stats = client.stats().await.unwrap();
    assert_eq!(stats.total_notes, 2);
    assert_eq!(stats.max_length, 300);
}

#[tokio::test]
async fn non_json_body_is_unexpected_response() {
    let backend = MockBackend::start().await;
    let client = NotesClient::new(format!("{}/broken", backend.base_url));

    match client.list_notes().await.unwrap_err() {
        ApiError::UnexpectedResponse { status } => assert_eq!(status, 500),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_backend_is_http_error() {
    // bind then drop to get a port nobody listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = NotesClient::new(format!("http://{}", addr));
    assert!(matches!(client.list_notes().await, Err(ApiError::Http(_))));
}
