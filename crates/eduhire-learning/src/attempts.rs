use eduhire_users::{AttemptKey, User, UserError, UserStore};
use tracing::debug;

/// Record one failed quiz attempt on the user document. Returns the new count.
///
/// The count is stored but does not feed back into style selection or cap
/// retries.
pub fn record_failure(user: &mut User, course_id: &str, topic_id: &str) -> u32 {
    user.attempts.increment(AttemptKey::new(course_id, topic_id))
}

/// Persist a failed attempt. The write is committed before this returns.
pub fn commit_failure(
    store: &UserStore,
    user_id: &str,
    course_id: &str,
    topic_id: &str,
) -> Result<u32, UserError> {
    let count = store.modify(user_id, |u| {
        Ok::<_, UserError>(record_failure(u, course_id, topic_id))
    })?;
    debug!(user_id, course_id, topic_id, count, "quiz failure recorded");
    Ok(count)
}

/// Failures recorded so far for one topic; zero when none.
pub fn failures(user: &User, course_id: &str, topic_id: &str) -> u32 {
    user.attempts.count(&AttemptKey::new(course_id, topic_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use eduhire_core::UserRole;
    use eduhire_users::NewUser;
    use rusqlite::Connection;

    fn store_with_user() -> (UserStore, String) {
        let conn = Connection::open_in_memory().unwrap();
        eduhire_users::db::init_db(&conn).unwrap();
        let store = UserStore::new(conn);
        let user = store
            .register(NewUser {
                name: "Ada".into(),
                email: "ada@example.com".into(),
                password: "pw".into(),
                role: UserRole::Student,
            })
            .unwrap();
        (store, user.id)
    }

    #[test]
    fn failures_accumulate_per_topic() {
        let (store, id) = store_with_user();
        assert_eq!(commit_failure(&store, &id, "c1", "t1").unwrap(), 1);
        assert_eq!(commit_failure(&store, &id, "c1", "t1").unwrap(), 2);
        assert_eq!(commit_failure(&store, &id, "c1", "t2").unwrap(), 1);

        let user = store.require(&id).unwrap();
        assert_eq!(failures(&user, "c1", "t1"), 2);
        assert_eq!(failures(&user, "c1", "t2"), 1);
        assert_eq!(failures(&user, "c2", "t1"), 0);
    }

    #[test]
    fn unknown_user_is_reported() {
        let (store, _) = store_with_user();
        let err = commit_failure(&store, "ghost", "c1", "t1").unwrap_err();
        assert!(matches!(err, UserError::NotFound(_)));
    }
}
