use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 =
        conn.query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        conn.execute_batch(
            "
            CREATE TABLE users (
                id          TEXT PRIMARY KEY,
                address     TEXT NOT NULL UNIQUE,
                created_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE messages (
                id                TEXT PRIMARY KEY,
                message_id        TEXT NOT NULL UNIQUE,
                recipient_id      TEXT NOT NULL REFERENCES users(id),
                sender_hash       TEXT NOT NULL,
                encrypted_content TEXT NOT NULL DEFAULT '',
                tx_id             TEXT NOT NULL,
                created_at        TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX idx_messages_recipient
                ON messages(recipient_id, created_at);

            CREATE TABLE polls (
                id          TEXT PRIMARY KEY,
                poll_id     TEXT NOT NULL UNIQUE,
                question    TEXT NOT NULL,
                options     TEXT NOT NULL,
                creator_id  TEXT NOT NULL REFERENCES users(id),
                end_block   INTEGER NOT NULL,
                tx_id       TEXT NOT NULL,
                created_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE votes (
                id            TEXT PRIMARY KEY,
                poll_db_id    TEXT NOT NULL REFERENCES polls(id),
                voter_id      TEXT NOT NULL REFERENCES users(id),
                option_index  INTEGER NOT NULL,
                nullifier     TEXT NOT NULL UNIQUE,
                tx_id         TEXT NOT NULL,
                created_at    TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX idx_votes_poll
                ON votes(poll_db_id);

            CREATE TABLE notes (
                id          TEXT PRIMARY KEY,
                note_id     TEXT NOT NULL UNIQUE,
                owner_id    TEXT NOT NULL REFERENCES users(id),
                is_pinned   INTEGER NOT NULL DEFAULT 0,
                tx_id       TEXT NOT NULL,
                created_at  TEXT NOT NULL DEFAULT (datetime('now')),
                updated_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX idx_notes_owner
                ON notes(owner_id, created_at);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    Ok(())
}
