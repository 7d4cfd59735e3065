use serde::{Deserialize, Serialize};

use crate::models::Poll;

// -- Users --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub address: String,
}

// -- Messages --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub message_id: String,
    pub recipient_address: String,
    pub sender_hash: String,
    /// Optional ciphertext produced client-side; defaults to empty.
    pub encrypted_content: Option<String>,
    pub tx_id: String,
}

// -- Polls --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct CreatePollRequest {
    pub poll_id: String,
    pub question: String,
    pub options: Vec<String>,
    pub creator_address: String,
    pub end_block: i64,
    pub tx_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct CastVoteRequest {
    pub voter_address: String,
    /// Option<_> so a missing index is distinguishable from zero.
    pub option_index: Option<i64>,
    pub nullifier: String,
    pub tx_id: String,
}

/// Single-poll response: the poll plus tallies derived from its votes.
/// The list endpoint returns plain `Poll`s without tallies.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollDetail {
    #[serde(flatten)]
    pub poll: Poll,
    pub vote_counts: Vec<usize>,
    pub total_votes: usize,
}

// -- Notes --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct CreateNoteRequest {
    pub note_id: String,
    pub owner_address: String,
    pub tx_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct UpdateNoteRequest {
    pub is_pinned: Option<bool>,
    pub tx_id: Option<String>,
}
