use rusqlite::{Connection, Result};

/// Initialise the course catalog table. Idempotent.
///
/// Topics (with their videos and quiz banks) are stored inline as JSON; a
/// course is authored and read as a whole document.
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS courses (
            id              TEXT PRIMARY KEY NOT NULL,
            title           TEXT NOT NULL,
            description     TEXT NOT NULL DEFAULT '',
            category        TEXT NOT NULL,
            difficulty      TEXT NOT NULL DEFAULT 'beginner',
            required_score  INTEGER NOT NULL DEFAULT 80,
            reward_coins    INTEGER NOT NULL DEFAULT 100,
            topics          TEXT NOT NULL DEFAULT '[]',  -- JSON array
            created_at      TEXT NOT NULL,
            updated_at      TEXT NOT NULL
        );",
    )
}
