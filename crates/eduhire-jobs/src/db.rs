use rusqlite::{Connection, Result};

/// Initialise job and application tables. Idempotent.
pub fn init_db(conn: &Connection) -> Result<()> {
    create_jobs_table(conn)?;
    create_applications_table(conn)?;
    Ok(())
}

fn create_jobs_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS jobs (
            id                      TEXT PRIMARY KEY NOT NULL,
            title                   TEXT NOT NULL,
            company                 TEXT NOT NULL,
            description             TEXT NOT NULL,
            requirements            TEXT NOT NULL DEFAULT '[]',  -- JSON array
            skills_required         TEXT NOT NULL DEFAULT '[]',  -- JSON array
            location                TEXT,
            job_type                TEXT NOT NULL DEFAULT 'full-time',
            salary                  TEXT,                        -- JSON object
            application_deadline    TEXT,
            is_active               INTEGER NOT NULL DEFAULT 1,
            posted_by               TEXT NOT NULL,
            requires_verification   INTEGER NOT NULL DEFAULT 0,
            created_at              TEXT NOT NULL,
            updated_at              TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_jobs_active
            ON jobs (is_active, created_at DESC);",
    )
}

fn create_applications_table(conn: &Connection) -> Result<()> {
    // UNIQUE(job_id, user_id): one application per user per job, even when
    // two apply requests race past the pre-check.
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS applications (
            id              TEXT PRIMARY KEY NOT NULL,
            job_id          TEXT NOT NULL REFERENCES jobs(id),
            user_id         TEXT NOT NULL,
            status          TEXT NOT NULL DEFAULT 'pending',
            cover_letter    TEXT,
            resume_url      TEXT,
            skills_match    TEXT NOT NULL DEFAULT '[]',  -- JSON array, frozen at apply time
            is_verified     INTEGER NOT NULL DEFAULT 0,
            created_at      TEXT NOT NULL,
            updated_at      TEXT NOT NULL,
            UNIQUE(job_id, user_id)
        );
        CREATE INDEX IF NOT EXISTS idx_applications_user
            ON applications (user_id, created_at DESC);",
    )
}
