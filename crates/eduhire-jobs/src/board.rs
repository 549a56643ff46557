use std::sync::{Arc, Mutex};

use eduhire_core::types::{new_id, now_rfc3339};
use eduhire_users::UserStore;
use rusqlite::{params, Connection, ErrorCode};
use serde::de::DeserializeOwned;
use tracing::{info, instrument};

use crate::error::{JobError, Result};
use crate::matching;
use crate::types::{
    Application, ApplicationDraft, ApplicationStatus, ApplicationWithJob, Job, JobDraft,
};

const JOB_COLUMNS: &str = "id, title, company, description, requirements, skills_required,
     location, job_type, salary, application_deadline, is_active, posted_by,
     requires_verification, created_at, updated_at";

const APPLICATION_COLUMNS: &str = "id, job_id, user_id, status, cover_letter, resume_url,
     skills_match, is_verified, created_at, updated_at";

/// Job postings and applications. Reads the user ledger but never writes it.
pub struct JobBoard {
    db: Mutex<Connection>,
    users: Arc<UserStore>,
}

impl JobBoard {
    pub fn new(conn: Connection, users: Arc<UserStore>) -> Self {
        Self {
            db: Mutex::new(conn),
            users,
        }
    }

    /// Publish a job. Only employers may post.
    #[instrument(skip(self, draft), fields(title = %draft.title))]
    pub fn post_job(&self, poster_id: &str, draft: JobDraft) -> Result<Job> {
        let poster = self.users.require(poster_id)?;
        if !poster.role.is_employer() {
            return Err(JobError::Forbidden(
                "only employers can post jobs".to_string(),
            ));
        }
        for (field, value) in [
            ("title", &draft.title),
            ("company", &draft.company),
            ("description", &draft.description),
        ] {
            if value.trim().is_empty() {
                return Err(JobError::InvalidInput(format!("{field} is required")));
            }
        }

        let now = now_rfc3339();
        let job = Job {
            id: new_id(),
            title: draft.title,
            company: draft.company,
            description: draft.description,
            requirements: draft.requirements,
            skills_required: draft.skills_required,
            location: draft.location,
            job_type: draft.job_type,
            salary: draft.salary,
            application_deadline: draft.application_deadline,
            is_active: true,
            posted_by: poster.id,
            requires_verification: draft.requires_verification,
            created_at: now.clone(),
            updated_at: now,
        };

        let db = self.db.lock().expect("jobs db poisoned");
        db.execute(
            "INSERT INTO jobs
                (id, title, company, description, requirements, skills_required, location,
                 job_type, salary, application_deadline, is_active, posted_by,
                 requires_verification, created_at, updated_at)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15)",
            params![
                job.id,
                job.title,
                job.company,
                job.description,
                to_json(&job.requirements)?,
                to_json(&job.skills_required)?,
                job.location,
                job.job_type.to_string(),
                job.salary.as_ref().map(to_json).transpose()?,
                job.application_deadline,
                job.is_active as i32,
                job.posted_by,
                job.requires_verification as i32,
                job.created_at,
                job.updated_at,
            ],
        )?;
        info!(job_id = %job.id, posted_by = %job.posted_by, "job posted");
        Ok(job)
    }

    pub fn get(&self, job_id: &str) -> Result<Option<Job>> {
        let db = self.db.lock().expect("jobs db poisoned");
        load_job(&db, job_id)
    }

    pub fn require(&self, job_id: &str) -> Result<Job> {
        self.get(job_id)?
            .ok_or_else(|| JobError::JobNotFound(job_id.to_string()))
    }

    /// Active postings, newest first.
    pub fn list_active(&self) -> Result<Vec<Job>> {
        let db = self.db.lock().expect("jobs db poisoned");
        let mut stmt = db.prepare(&format!(
            "SELECT {JOB_COLUMNS} FROM jobs WHERE is_active = 1 ORDER BY created_at DESC"
        ))?;
        let rows = stmt.query_map([], row_to_job)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Take a job offline or back online. Only the posting employer may.
    pub fn set_active(&self, employer_id: &str, job_id: &str, active: bool) -> Result<Job> {
        let job = self.require(job_id)?;
        if job.posted_by != employer_id {
            return Err(JobError::Forbidden(
                "only the posting employer can change this job".to_string(),
            ));
        }
        let db = self.db.lock().expect("jobs db poisoned");
        db.execute(
            "UPDATE jobs SET is_active = ?2, updated_at = ?3 WHERE id = ?1",
            params![job_id, active as i32, now_rfc3339()],
        )?;
        load_job(&db, job_id)?.ok_or_else(|| JobError::JobNotFound(job_id.to_string()))
    }

    /// Apply `user_id` to `job_id`, freezing the skill match vector into the
    /// application. A second application for the same pair is rejected.
    #[instrument(skip(self, draft))]
    pub fn apply(&self, job_id: &str, user_id: &str, draft: ApplicationDraft) -> Result<Application> {
        let job = self.require(job_id)?;
        let user = self.users.require(user_id)?;

        let db = self.db.lock().expect("jobs db poisoned");
        let exists = db
            .prepare("SELECT 1 FROM applications WHERE job_id = ?1 AND user_id = ?2")?
            .exists(params![job_id, user_id])?;
        if exists {
            return Err(already_applied(job_id, user_id));
        }

        let eval = matching::evaluate(&job.skills_required, job.requires_verification, &user);
        let now = now_rfc3339();
        let application = Application {
            id: new_id(),
            job_id: job.id,
            user_id: user.id,
            status: ApplicationStatus::Pending,
            cover_letter: draft.cover_letter,
            resume_url: draft.resume_url,
            skills_match: eval.skills_match,
            is_verified: eval.is_verified,
            created_at: now.clone(),
            updated_at: now,
        };

        let inserted = db.execute(
            "INSERT INTO applications
                (id, job_id, user_id, status, cover_letter, resume_url, skills_match,
                 is_verified, created_at, updated_at)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10)",
            params![
                application.id,
                application.job_id,
                application.user_id,
                application.status.to_string(),
                application.cover_letter,
                application.resume_url,
                to_json(&application.skills_match)?,
                application.is_verified as i32,
                application.created_at,
                application.updated_at,
            ],
        );
        match inserted {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => return Err(already_applied(job_id, user_id)),
            Err(e) => return Err(e.into()),
        }

        info!(
            application_id = %application.id,
            is_verified = application.is_verified,
            "application submitted"
        );
        Ok(application)
    }

    /// The user's applications, newest first, each with its job.
    pub fn applications_for_user(&self, user_id: &str) -> Result<Vec<ApplicationWithJob>> {
        let db = self.db.lock().expect("jobs db poisoned");
        let mut stmt = db.prepare(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications
             WHERE user_id = ?1 ORDER BY created_at DESC"
        ))?;
        let applications = stmt
            .query_map(params![user_id], row_to_application)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut out = Vec::with_capacity(applications.len());
        for application in applications {
            let job = load_job(&db, &application.job_id)?;
            out.push(ApplicationWithJob { application, job });
        }
        Ok(out)
    }
}

fn already_applied(job_id: &str, user_id: &str) -> JobError {
    JobError::AlreadyApplied {
        job_id: job_id.to_string(),
        user_id: user_id.to_string(),
    }
}

fn load_job(conn: &Connection, job_id: &str) -> Result<Option<Job>> {
    let mut stmt = conn.prepare(&format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = ?1"))?;
    match stmt.query_row(params![job_id], row_to_job) {
        Ok(j) => Ok(Some(j)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(JobError::Database(e)),
    }
}

fn row_to_job(row: &rusqlite::Row<'_>) -> rusqlite::Result<Job> {
    let job_type: String = row.get(7)?;
    let salary: Option<String> = row.get(8)?;
    let salary = match salary {
        Some(raw) => Some(serde_json::from_str(&raw).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(8, rusqlite::types::Type::Text, Box::new(e))
        })?),
        None => None,
    };
    Ok(Job {
        id: row.get(0)?,
        title: row.get(1)?,
        company: row.get(2)?,
        description: row.get(3)?,
        requirements: json_column(row, 4)?,
        skills_required: json_column(row, 5)?,
        location: row.get(6)?,
        job_type: job_type.parse().unwrap_or_default(),
        salary,
        application_deadline: row.get(9)?,
        is_active: row.get::<_, i32>(10)? != 0,
        posted_by: row.get(11)?,
        requires_verification: row.get::<_, i32>(12)? != 0,
        created_at: row.get(13)?,
        updated_at: row.get(14)?,
    })
}

fn row_to_application(row: &rusqlite::Row<'_>) -> rusqlite::Result<Application> {
    let status: String = row.get(3)?;
    Ok(Application {
        id: row.get(0)?,
        job_id: row.get(1)?,
        user_id: row.get(2)?,
        status: status.parse().unwrap_or_default(),
        cover_letter: row.get(4)?,
        resume_url: row.get(5)?,
        skills_match: json_column(row, 6)?,
        is_verified: row.get::<_, i32>(7)? != 0,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

fn json_column<T: DeserializeOwned>(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn to_json<T: serde::Serialize>(value: &T) -> rusqlite::Result<String> {
    serde_json::to_string(value).map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == ErrorCode::ConstraintViolation
                && (e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn foreign_key_failure_is_not_a_duplicate() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys=ON;").unwrap();
        crate::db::init_db(&conn).unwrap();

        let err = conn
            .execute(
                "INSERT INTO applications
                    (id, job_id, user_id, status, skills_match, is_verified, created_at, updated_at)
                 VALUES ('a1', 'no-such-job', 'u1', 'pending', '[]', 0, '', '')",
                [],
            )
            .unwrap_err();
        assert!(!is_unique_violation(&err));
    }
}
