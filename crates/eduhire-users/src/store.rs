use std::sync::Mutex;

use eduhire_core::types::{new_id, now_rfc3339};
use rusqlite::{params, Connection, ErrorCode, TransactionBehavior};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};

use crate::error::{Result, UserError};
use crate::password;
use crate::types::{AttemptLedger, LeaderboardEntry, NewUser, SkillEntry, User};

/// Column order shared by every SELECT in this module; see `row_to_user`.
const USER_COLUMNS: &str = "id, name, email, password_hash, role, skills, coins,
     completed_courses, completed_topics, attempts, created_at, updated_at";

/// Owns the user ledger.
///
/// Every mutation of a user document goes through [`UserStore::modify`], which
/// performs the read-modify-write inside one IMMEDIATE transaction. Two quiz
/// submissions racing for the same user therefore serialize instead of losing
/// an update.
pub struct UserStore {
    db: Mutex<Connection>,
}

impl UserStore {
    /// Wrap an already-open (and `init_db`-initialised) connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Mutex::new(conn),
        }
    }

    /// Create a new account. Emails are unique; a duplicate is reported as
    /// `AlreadyExists` whether caught by the pre-check or by the index.
    #[instrument(skip(self, new_user), fields(email = %new_user.email))]
    pub fn register(&self, new_user: NewUser) -> Result<User> {
        let name = new_user.name.trim();
        let email = new_user.email.trim().to_lowercase();
        if name.is_empty() {
            return Err(UserError::InvalidInput("name is required".to_string()));
        }
        if !email.contains('@') {
            return Err(UserError::InvalidInput(format!("invalid email: {email}")));
        }
        if new_user.password.is_empty() {
            return Err(UserError::InvalidInput("password is required".to_string()));
        }

        let now = now_rfc3339();
        let user = User {
            id: new_id(),
            name: name.to_string(),
            email,
            password_hash: password::hash_password(&new_user.password)?,
            role: new_user.role,
            skills: vec![],
            coins: 0,
            completed_courses: vec![],
            completed_topics: vec![],
            attempts: AttemptLedger::default(),
            created_at: now.clone(),
            updated_at: now,
        };

        let db = self.db.lock().expect("users db poisoned");
        let taken = db
            .prepare("SELECT 1 FROM users WHERE email = ?1")?
            .exists(params![user.email])?;
        if taken {
            return Err(UserError::AlreadyExists(user.email));
        }
        match insert_user_row(&db, &user) {
            Ok(()) => {}
            Err(UserError::DatabaseError(e)) if is_unique_violation(&e) => {
                return Err(UserError::AlreadyExists(user.email));
            }
            Err(e) => return Err(e),
        }
        info!(user_id = %user.id, role = %user.role, "user registered");
        Ok(user)
    }

    /// Check a login attempt. Returns the user only when the password matches.
    pub fn verify_password(&self, email: &str, password: &str) -> Result<Option<User>> {
        let email = email.trim().to_lowercase();
        let db = self.db.lock().expect("users db poisoned");
        let user = query_one(
            &db,
            &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
            &email,
        )?;
        Ok(user.filter(|u| password::verify_password(password, &u.password_hash)))
    }

    /// Load a user by primary key. Returns None instead of an error when absent
    /// so callers decide whether missing is exceptional in their context.
    pub fn get(&self, user_id: &str) -> Result<Option<User>> {
        let db = self.db.lock().expect("users db poisoned");
        load_user(&db, user_id)
    }

    pub fn require(&self, user_id: &str) -> Result<User> {
        self.get(user_id)?
            .ok_or_else(|| UserError::NotFound(user_id.to_string()))
    }

    /// Atomic read-modify-write of one user document.
    ///
    /// `f` sees the freshly loaded document. If it returns `Err` the
    /// transaction is rolled back and nothing it changed is persisted;
    /// otherwise the whole document is written back and committed before this
    /// returns.
    #[instrument(skip(self, f))]
    pub fn modify<T, E, F>(&self, user_id: &str, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&mut User) -> std::result::Result<T, E>,
        E: From<UserError>,
    {
        let mut db = self.db.lock().expect("users db poisoned");
        let tx = db
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(UserError::from)?;

        let mut user =
            load_user(&tx, user_id)?.ok_or_else(|| UserError::NotFound(user_id.to_string()))?;

        // Dropping `tx` on the error path rolls back.
        let out = f(&mut user)?;

        user.updated_at = now_rfc3339();
        write_user_row(&tx, &user)?;
        tx.commit().map_err(UserError::from)?;
        debug!(user_id, coins = user.coins, "user document committed");
        Ok(out)
    }

    /// Top users by coin balance, highest first.
    pub fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>> {
        let db = self.db.lock().expect("users db poisoned");
        let mut stmt = db.prepare(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY coins DESC, created_at ASC LIMIT ?1"
        ))?;
        let rows = stmt.query_map(params![limit as i64], row_to_user)?;
        let mut entries = Vec::new();
        for row in rows {
            let u = row?;
            entries.push(LeaderboardEntry {
                id: u.id,
                name: u.name,
                coins: u.coins,
                completed_courses: u.completed_courses.len(),
                skills: u.skills,
            });
        }
        Ok(entries)
    }

    pub fn skills(&self, user_id: &str) -> Result<Vec<SkillEntry>> {
        Ok(self.require(user_id)?.skills)
    }
}

fn load_user(conn: &Connection, user_id: &str) -> Result<Option<User>> {
    query_one(
        conn,
        &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
        user_id,
    )
}

fn query_one(conn: &Connection, sql: &str, arg: &str) -> Result<Option<User>> {
    let mut stmt = conn.prepare(sql)?;
    match stmt.query_row(params![arg], row_to_user) {
        Ok(u) => Ok(Some(u)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(UserError::DatabaseError(e)),
    }
}

fn insert_user_row(conn: &Connection, user: &User) -> Result<()> {
    conn.execute(
        "INSERT INTO users
            (id, name, email, password_hash, role, skills, coins, completed_courses,
             completed_topics, attempts, created_at, updated_at)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12)",
        params![
            user.id,
            user.name,
            user.email,
            user.password_hash,
            user.role.to_string(),
            to_json(&user.skills)?,
            user.coins,
            to_json(&user.completed_courses)?,
            to_json(&user.completed_topics)?,
            to_json(&user.attempts)?,
            user.created_at,
            user.updated_at,
        ],
    )?;
    Ok(())
}

/// Persist every mutable field of the document in one statement.
fn write_user_row(conn: &Connection, user: &User) -> Result<()> {
    let rows = conn.execute(
        "UPDATE users SET
            name=?2, role=?3, skills=?4, coins=?5, completed_courses=?6,
            completed_topics=?7, attempts=?8, updated_at=?9
         WHERE id=?1",
        params![
            user.id,
            user.name,
            user.role.to_string(),
            to_json(&user.skills)?,
            user.coins,
            to_json(&user.completed_courses)?,
            to_json(&user.completed_topics)?,
            to_json(&user.attempts)?,
            user.updated_at,
        ],
    )?;
    if rows == 0 {
        return Err(UserError::NotFound(user.id.clone()));
    }
    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| {
        UserError::DatabaseError(rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
    })
}

/// Map a SELECT row (column order from USER_COLUMNS) to a User.
///
/// A corrupt JSON column is an error, not an empty default: writing the
/// defaulted document back would silently drop the user's ledger.
fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    let role: String = row.get(4)?;
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        role: role.parse().unwrap_or_default(),
        skills: json_column(row, 5)?,
        coins: row.get(6)?,
        completed_courses: json_column(row, 7)?,
        completed_topics: json_column(row, 8)?,
        attempts: json_column(row, 9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

fn json_column<T: DeserializeOwned>(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
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
    use crate::types::AttemptKey;
    use eduhire_core::types::UserRole;

    fn store() -> UserStore {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::init_db(&conn).unwrap();
        UserStore::new(conn)
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Ada".to_string(),
            email: email.to_string(),
            password: "hunter2".to_string(),
            role: UserRole::Student,
        }
    }

    #[test]
    fn register_and_load() {
        let store = store();
        let user = store.register(new_user("Ada@Example.com")).unwrap();
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.coins, 0);

        let loaded = store.require(&user.id).unwrap();
        assert_eq!(loaded.name, "Ada");
        assert_eq!(loaded.role, UserRole::Student);
        assert!(loaded.skills.is_empty());
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let store = store();
        store.register(new_user("ada@example.com")).unwrap();
        let err = store.register(new_user("ADA@example.com")).unwrap_err();
        assert!(matches!(err, UserError::AlreadyExists(_)));
    }

    #[test]
    fn register_validates_fields() {
        let store = store();
        let mut bad = new_user("no-at-sign");
        assert!(matches!(
            store.register(bad.clone()).unwrap_err(),
            UserError::InvalidInput(_)
        ));
        bad.email = "ok@example.com".into();
        bad.password.clear();
        assert!(matches!(
            store.register(bad).unwrap_err(),
            UserError::InvalidInput(_)
        ));
    }

    #[test]
    fn password_check() {
        let store = store();
        store.register(new_user("ada@example.com")).unwrap();
        assert!(store
            .verify_password("ada@example.com", "hunter2")
            .unwrap()
            .is_some());
        assert!(store
            .verify_password("ada@example.com", "wrong")
            .unwrap()
            .is_none());
        assert!(store
            .verify_password("nobody@example.com", "hunter2")
            .unwrap()
            .is_none());
    }

    #[test]
    fn modify_persists_whole_document() {
        let store = store();
        let user = store.register(new_user("ada@example.com")).unwrap();
        store
            .modify(&user.id, |u| {
                u.coins += 25;
                u.attempts.increment(AttemptKey::new("c1", "t1"));
                Ok::<_, UserError>(())
            })
            .unwrap();

        let loaded = store.require(&user.id).unwrap();
        assert_eq!(loaded.coins, 25);
        assert_eq!(loaded.attempts.count(&AttemptKey::new("c1", "t1")), 1);
    }

    #[test]
    fn failed_modify_leaves_no_partial_update() {
        let store = store();
        let user = store.register(new_user("ada@example.com")).unwrap();
        let res: std::result::Result<(), UserError> = store.modify(&user.id, |u| {
            u.coins += 100;
            Err(UserError::InvalidInput("abort".into()))
        });
        assert!(res.is_err());
        assert_eq!(store.require(&user.id).unwrap().coins, 0);
    }

    #[test]
    fn modify_unknown_user_is_not_found() {
        let store = store();
        let res = store.modify("missing", |_| Ok::<_, UserError>(()));
        assert!(matches!(res, Err(UserError::NotFound(_))));
    }

    #[test]
    fn leaderboard_orders_by_coins() {
        let store = store();
        let a = store.register(new_user("a@example.com")).unwrap();
        let b = store.register(new_user("b@example.com")).unwrap();
        store
            .modify(&b.id, |u| {
                u.coins = 50;
                Ok::<_, UserError>(())
            })
            .unwrap();

        let board = store.leaderboard(10).unwrap();
        assert_eq!(board.len(), 2);
        assert_eq!(board[0].id, b.id);
        assert_eq!(board[1].id, a.id);
        assert_eq!(store.leaderboard(1).unwrap().len(), 1);
    }

    #[test]
    fn only_duplicate_keys_count_as_unique_violations() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (id TEXT PRIMARY KEY, v TEXT NOT NULL UNIQUE)")
            .unwrap();
        conn.execute("INSERT INTO t VALUES ('a', 'x')", []).unwrap();

        let dup_key = conn.execute("INSERT INTO t VALUES ('a', 'y')", []).unwrap_err();
        assert!(is_unique_violation(&dup_key));
        let dup_value = conn.execute("INSERT INTO t VALUES ('b', 'x')", []).unwrap_err();
        assert!(is_unique_violation(&dup_value));
        let null = conn.execute("INSERT INTO t VALUES ('c', NULL)", []).unwrap_err();
        assert!(!is_unique_violation(&null));
    }
}
