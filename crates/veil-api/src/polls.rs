use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use uuid::Uuid;

use veil_db::models::{PollRow, VoteRow};
use veil_types::api::{CastVoteRequest, CreatePollRequest, PollDetail};
use veil_types::models::{Poll, Vote};

use crate::error::ApiError;
use crate::state::AppState;
use crate::util::{parse_db_timestamp, parse_db_uuid};

/// Deserializes the options column; fails on a corrupt row.
fn poll_from_row(row: PollRow) -> anyhow::Result<Poll> {
    let options: Vec<String> = serde_json::from_str(&row.options)?;
    Ok(Poll {
        id: parse_db_uuid(&row.id),
        poll_id: row.poll_id,
        question: row.question,
        options,
        creator_id: parse_db_uuid(&row.creator_id),
        end_block: row.end_block,
        tx_id: row.tx_id,
        created_at: parse_db_timestamp(&row.created_at),
    })
}

fn vote_from_row(row: VoteRow) -> Vote {
    Vote {
        id: parse_db_uuid(&row.id),
        poll_db_id: parse_db_uuid(&row.poll_db_id),
        voter_id: parse_db_uuid(&row.voter_id),
        option_index: row.option_index,
        nullifier: row.nullifier,
        tx_id: row.tx_id,
        created_at: parse_db_timestamp(&row.created_at),
    }
}

/// POST /api/poll/create
pub async fn create_poll(
    State(state): State<AppState>,
    Json(req): Json<CreatePollRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let poll_pk = Uuid::new_v4();
    let creator_pk = Uuid::new_v4();

    let options_json = serde_json::to_string(&req.options)
        .map_err(|e| ApiError::internal("Failed to create poll")(e.into()))?;

    let db = state.clone();
    let row = tokio::task::spawn_blocking(move || {
        let creator = db.db.ensure_user(&creator_pk.to_string(), &req.creator_address)?;
        db.db.insert_poll(
            &poll_pk.to_string(),
            &req.poll_id,
            &req.question,
            &options_json,
            &creator.id,
            req.end_block,
            &req.tx_id,
        )
    })
    .await
    .map_err(ApiError::join("Failed to create poll"))?
    .map_err(|e| {
        if veil_db::is_unique_violation(&e) {
            ApiError::Conflict("Poll already recorded".to_string())
        } else {
            ApiError::internal("Failed to create poll")(e)
        }
    })?;

    let poll = poll_from_row(row).map_err(ApiError::internal("Failed to create poll"))?;
    Ok(Json(poll))
}

/// GET /api/poll/{poll_id}. The poll plus per-option tallies. Counting
/// filters the vote list per index on every read; there are no maintained
/// counters. Votes recorded with an index outside the option range (never
/// produced by this service, but the column is client-shaped data) show up
/// in totalVotes only.
pub async fn get_poll(
    State(state): State<AppState>,
    Path(poll_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let found = tokio::task::spawn_blocking(
        move || -> anyhow::Result<Option<(PollRow, Vec<VoteRow>)>> {
            let Some(poll) = db.db.get_poll_by_poll_id(&poll_id)? else {
                return Ok(None);
            };
            let votes = db.db.votes_for_poll(&poll.id)?;
            Ok(Some((poll, votes)))
        },
    )
    .await
    .map_err(ApiError::join("Failed to get poll"))?
    .map_err(ApiError::internal("Failed to get poll"))?;

    let (poll_row, vote_rows) = found.ok_or(ApiError::NotFound("Poll not found"))?;
    let poll = poll_from_row(poll_row).map_err(ApiError::internal("Failed to get poll"))?;

    let vote_counts: Vec<usize> = (0..poll.options.len())
        .map(|i| vote_rows.iter().filter(|v| v.option_index == i as i64).count())
        .collect();
    let total_votes = vote_rows.len();

    Ok(Json(PollDetail {
        poll,
        vote_counts,
        total_votes,
    }))
}

/// GET /api/polls. Newest first, options deserialized. No tallies here;
/// only the single-poll endpoint computes them.
pub async fn list_polls(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.list_polls())
        .await
        .map_err(ApiError::join("Failed to get polls"))?
        .map_err(ApiError::internal("Failed to get polls"))?;

    let polls: Vec<Poll> = rows
        .into_iter()
        .map(poll_from_row)
        .collect::<anyhow::Result<_>>()
        .map_err(ApiError::internal("Failed to get polls"))?;

    Ok(Json(polls))
}

/// POST /api/poll/{poll_id}/vote. The nullifier is the sole double-vote
/// guard: the pre-check rejects a known duplicate, and a unique-constraint
/// failure from a concurrent duplicate must resolve to the same "already
/// voted" answer, not a generic error.
pub async fn cast_vote(
    State(state): State<AppState>,
    Path(poll_id): Path<String>,
    Json(req): Json<CastVoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let option_index = match req.option_index {
        Some(i) if i >= 0 => i,
        _ => return Err(ApiError::Validation("Invalid option index".to_string())),
    };

    let vote_pk = Uuid::new_v4();
    let voter_pk = Uuid::new_v4();

    let db = state.clone();
    let row = tokio::task::spawn_blocking(move || -> Result<VoteRow, ApiError> {
        let poll = db
            .db
            .get_poll_by_poll_id(&poll_id)
            .map_err(ApiError::internal("Failed to record vote"))?
            .ok_or(ApiError::NotFound("Poll not found"))?;

        let options: Vec<String> = serde_json::from_str(&poll.options)
            .map_err(|e| ApiError::internal("Failed to record vote")(e.into()))?;
        if option_index as usize >= options.len() {
            return Err(ApiError::Validation("Invalid option index".to_string()));
        }

        if db
            .db
            .find_vote_by_nullifier(&req.nullifier)
            .map_err(ApiError::internal("Failed to record vote"))?
            .is_some()
        {
            return Err(ApiError::Validation("Already voted on this poll".to_string()));
        }

        let voter = db
            .db
            .ensure_user(&voter_pk.to_string(), &req.voter_address)
            .map_err(ApiError::internal("Failed to record vote"))?;

        db.db
            .insert_vote(
                &vote_pk.to_string(),
                &poll.id,
                &voter.id,
                option_index,
                &req.nullifier,
                &req.tx_id,
            )
            .map_err(|e| {
                if veil_db::is_unique_violation(&e) {
                    // Lost the race to a concurrent duplicate
                    ApiError::Validation("Already voted on this poll".to_string())
                } else {
                    ApiError::internal("Failed to record vote")(e)
                }
            })
    })
    .await
    .map_err(ApiError::join("Failed to record vote"))??;

    Ok(Json(vote_from_row(row)))
}
