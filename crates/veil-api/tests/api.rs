use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use veil_api::state::AppStateInner;

fn test_app() -> Router {
    let db = veil_db::Database::open_in_memory().expect("in-memory db");
    veil_api::router(Arc::new(AppStateInner { db }))
}

async fn call(app: &Router, method: &str, path: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(path);
    let request = match body {
        Some(v) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_poll(app: &Router, poll_id: &str, options: Value) -> (StatusCode, Value) {
    call(
        app,
        "POST",
        "/api/poll/create",
        Some(json!({
            "pollId": poll_id,
            "question": "Proceed?",
            "options": options,
            "creatorAddress": "aleo1creator",
            "endBlock": 500_000,
            "txId": format!("tx-{poll_id}"),
        })),
    )
    .await
}

async fn cast_vote(app: &Router, poll_id: &str, body: Value) -> (StatusCode, Value) {
    call(app, "POST", &format!("/api/poll/{poll_id}/vote"), Some(body)).await
}

#[tokio::test]
async fn health_reports_ok() {
    let app = test_app();
    let (status, body) = call(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn user_upsert_is_idempotent() {
    let app = test_app();
    let payload = json!({ "address": "aleo1alice" });

    let (status, first) = call(&app, "POST", "/api/user", Some(payload.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["address"], "aleo1alice");

    let (status, second) = call(&app, "POST", "/api/user", Some(payload)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["id"], first["id"]);
}

#[tokio::test]
async fn message_to_unknown_recipient_creates_user_and_message() {
    let app = test_app();

    let (status, message) = call(
        &app,
        "POST",
        "/api/message/send",
        Some(json!({
            "messageId": "msg_001",
            "recipientAddress": "aleo1bob",
            "senderHash": "3f9a...field",
            "txId": "tx-msg-1",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(message["messageId"], "msg_001");
    // Omitted encryptedContent defaults to empty
    assert_eq!(message["encryptedContent"], "");

    // The lazily created recipient is the same row the user upsert returns
    let (_, user) = call(&app, "POST", "/api/user", Some(json!({ "address": "aleo1bob" }))).await;
    assert_eq!(user["id"], message["recipientId"]);

    let (status, inbox) = call(&app, "GET", "/api/message/inbox/aleo1bob", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(inbox.as_array().unwrap().len(), 1);
    assert_eq!(inbox[0]["messageId"], "msg_001");
}

#[tokio::test]
async fn inbox_for_unknown_address_is_empty() {
    let app = test_app();
    let (status, inbox) = call(&app, "GET", "/api/message/inbox/aleo1nobody", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(inbox, json!([]));
}

#[tokio::test]
async fn duplicate_message_id_is_conflict() {
    let app = test_app();
    let payload = json!({
        "messageId": "msg_001",
        "recipientAddress": "aleo1bob",
        "senderHash": "aaaa",
        "encryptedContent": "cipher",
        "txId": "tx-1",
    });

    let (status, _) = call(&app, "POST", "/api/message/send", Some(payload.clone())).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call(&app, "POST", "/api/message/send", Some(payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Message already recorded");
}

#[tokio::test]
async fn poll_tallies_match_recorded_votes() {
    let app = test_app();

    let (status, poll) = create_poll(&app, "poll_001", json!(["A", "B"])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(poll["options"], json!(["A", "B"]));

    let (status, detail) = call(&app, "GET", "/api/poll/poll_001", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["voteCounts"], json!([0, 0]));
    assert_eq!(detail["totalVotes"], 0);

    for (index, (voter, nullifier)) in
        [("aleo1dave", "null-1"), ("aleo1erin", "null-2")].iter().enumerate()
    {
        let (status, vote) = cast_vote(
            &app,
            "poll_001",
            json!({
                "voterAddress": voter,
                "optionIndex": index,
                "nullifier": nullifier,
                "txId": format!("tx-vote-{index}"),
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(vote["optionIndex"], index);
        assert_eq!(vote["nullifier"], *nullifier);
    }

    let (status, detail) = call(&app, "GET", "/api/poll/poll_001", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["voteCounts"], json!([1, 1]));
    assert_eq!(detail["totalVotes"], 2);
}

#[tokio::test]
async fn duplicate_nullifier_is_rejected() {
    let app = test_app();
    create_poll(&app, "poll_001", json!(["A", "B"])).await;

    let (status, _) = cast_vote(
        &app,
        "poll_001",
        json!({
            "voterAddress": "aleo1dave",
            "optionIndex": 0,
            "nullifier": "null-1",
            "txId": "tx-1",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Same nullifier, different voter and option: still a double vote
    let (status, body) = cast_vote(
        &app,
        "poll_001",
        json!({
            "voterAddress": "aleo1erin",
            "optionIndex": 1,
            "nullifier": "null-1",
            "txId": "tx-2",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Already voted on this poll");

    let (_, detail) = call(&app, "GET", "/api/poll/poll_001", None).await;
    assert_eq!(detail["totalVotes"], 1);
}

#[tokio::test]
async fn vote_with_bad_option_index_is_rejected() {
    let app = test_app();
    create_poll(&app, "poll_001", json!(["A", "B"])).await;

    // Missing index
    let (status, body) = cast_vote(
        &app,
        "poll_001",
        json!({ "voterAddress": "aleo1dave", "nullifier": "null-1", "txId": "tx-1" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid option index");

    // Negative index
    let (status, _) = cast_vote(
        &app,
        "poll_001",
        json!({
            "voterAddress": "aleo1dave",
            "optionIndex": -1,
            "nullifier": "null-1",
            "txId": "tx-1",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Index past the option count
    let (status, _) = cast_vote(
        &app,
        "poll_001",
        json!({
            "voterAddress": "aleo1dave",
            "optionIndex": 2,
            "nullifier": "null-1",
            "txId": "tx-1",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // None of the rejected votes were recorded
    let (_, detail) = call(&app, "GET", "/api/poll/poll_001", None).await;
    assert_eq!(detail["totalVotes"], 0);
}

#[tokio::test]
async fn vote_on_unknown_poll_is_not_found() {
    let app = test_app();
    let (status, body) = cast_vote(
        &app,
        "poll_missing",
        json!({
            "voterAddress": "aleo1dave",
            "optionIndex": 0,
            "nullifier": "null-1",
            "txId": "tx-1",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Poll not found");
}

#[tokio::test]
async fn unknown_poll_is_not_found() {
    let app = test_app();
    let (status, _) = call(&app, "GET", "/api/poll/poll_missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn polls_list_is_newest_first_without_tallies() {
    let app = test_app();
    create_poll(&app, "poll_001", json!(["A"])).await;
    create_poll(&app, "poll_002", json!(["A", "B"])).await;

    let (status, polls) = call(&app, "GET", "/api/polls", None).await;
    assert_eq!(status, StatusCode::OK);

    let polls = polls.as_array().unwrap();
    assert_eq!(polls.len(), 2);
    assert_eq!(polls[0]["pollId"], "poll_002");
    assert_eq!(polls[1]["pollId"], "poll_001");
    assert_eq!(polls[0]["options"], json!(["A", "B"]));
    // Tallies are only computed on the single-poll endpoint
    assert!(polls[0].get("voteCounts").is_none());
}

#[tokio::test]
async fn duplicate_poll_id_is_conflict() {
    let app = test_app();
    let (status, _) = create_poll(&app, "poll_001", json!(["A"])).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = create_poll(&app, "poll_001", json!(["A"])).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Poll already recorded");
}

#[tokio::test]
async fn note_lifecycle() {
    let app = test_app();

    let (status, note) = call(
        &app,
        "POST",
        "/api/notes/create",
        Some(json!({ "noteId": "note_001", "ownerAddress": "aleo1erin", "txId": "tx-1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(note["isPinned"], false);

    // Pin it
    let (status, updated) = call(
        &app,
        "PUT",
        "/api/notes/note_001",
        Some(json!({ "isPinned": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["isPinned"], true);
    assert_eq!(updated["txId"], "tx-1");

    // The pin state is visible in the owner's list
    let (_, notes) = call(&app, "GET", "/api/notes/aleo1erin", None).await;
    assert_eq!(notes[0]["isPinned"], true);

    // Empty txId is treated as absent
    let (_, updated) = call(
        &app,
        "PUT",
        "/api/notes/note_001",
        Some(json!({ "txId": "" })),
    )
    .await;
    assert_eq!(updated["txId"], "tx-1");

    // A real txId replaces the old one
    let (_, updated) = call(
        &app,
        "PUT",
        "/api/notes/note_001",
        Some(json!({ "txId": "tx-2" })),
    )
    .await;
    assert_eq!(updated["txId"], "tx-2");
    assert_eq!(updated["isPinned"], true);

    let (status, body) = call(&app, "DELETE", "/api/notes/note_001", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, _) = call(&app, "GET", "/api/notes/get/note_001", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app, "DELETE", "/api/notes/note_001", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn notes_list_is_newest_first_and_empty_for_strangers() {
    let app = test_app();
    for note_id in ["note_001", "note_002"] {
        call(
            &app,
            "POST",
            "/api/notes/create",
            Some(json!({ "noteId": note_id, "ownerAddress": "aleo1erin", "txId": "tx" })),
        )
        .await;
    }

    let (status, notes) = call(&app, "GET", "/api/notes/aleo1erin", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(notes[0]["noteId"], "note_002");
    assert_eq!(notes[1]["noteId"], "note_001");

    let (status, notes) = call(&app, "GET", "/api/notes/aleo1stranger", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(notes, json!([]));
}

#[tokio::test]
async fn updating_unknown_note_is_not_found() {
    let app = test_app();
    let (status, body) = call(
        &app,
        "PUT",
        "/api/notes/note_missing",
        Some(json!({ "isPinned": true })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Note not found");
}

#[tokio::test]
async fn duplicate_note_id_is_conflict() {
    let app = test_app();
    let payload = json!({ "noteId": "note_001", "ownerAddress": "aleo1erin", "txId": "tx-1" });

    let (status, _) = call(&app, "POST", "/api/notes/create", Some(payload.clone())).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call(&app, "POST", "/api/notes/create", Some(payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Note already recorded");
}
