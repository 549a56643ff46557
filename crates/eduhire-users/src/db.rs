use rusqlite::{Connection, Result};

/// Initialise the users table. Safe to call on every startup
/// (CREATE IF NOT EXISTS).
///
/// Skills, completions and attempt counters are nested collections of the
/// user document and live in JSON columns on the same row, so any change to
/// them is a single-row update.
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS users (
            id                  TEXT PRIMARY KEY NOT NULL,
            name                TEXT NOT NULL,
            email               TEXT NOT NULL UNIQUE,
            password_hash       TEXT NOT NULL,
            role                TEXT NOT NULL DEFAULT 'student',
            skills              TEXT NOT NULL DEFAULT '[]',  -- JSON array
            coins               INTEGER NOT NULL DEFAULT 0,
            completed_courses   TEXT NOT NULL DEFAULT '[]',  -- JSON array
            completed_topics    TEXT NOT NULL DEFAULT '[]',  -- JSON array
            attempts            TEXT NOT NULL DEFAULT '[]',  -- JSON array
            created_at          TEXT NOT NULL,
            updated_at          TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_users_coins
            ON users (coins DESC);",
    )
}
