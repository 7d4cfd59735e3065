pub mod error;
pub mod health;
pub mod messages;
pub mod notes;
pub mod polls;
pub mod state;
pub mod users;
mod util;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Record-service route table. Transport-level layers (CORS, request
/// tracing) are added by the server binary.
///
/// The notes sub-resource keys GET by owner address but PUT/DELETE by
/// noteId; the router can only give the segment one name, so handlers read
/// the raw path parameter and interpret it themselves.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/user", post(users::create_user))
        .route("/api/message/send", post(messages::send_message))
        .route("/api/message/inbox/{address}", get(messages::get_inbox))
        .route("/api/poll/create", post(polls::create_poll))
        .route("/api/poll/{poll_id}", get(polls::get_poll))
        .route("/api/poll/{poll_id}/vote", post(polls::cast_vote))
        .route("/api/polls", get(polls::list_polls))
        .route("/api/notes/create", post(notes::create_note))
        .route("/api/notes/get/{note_id}", get(notes::get_note))
        .route(
            "/api/notes/{key}",
            get(notes::list_notes).put(notes::update_note).delete(notes::delete_note),
        )
        .with_state(state)
}
