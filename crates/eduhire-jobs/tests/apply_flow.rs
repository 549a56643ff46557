// Posting and applying against in-memory SQLite, including the frozen match
// vector and the one-application-per-pair rule.

use std::sync::Arc;

use eduhire_core::{EduhireError, UserRole};
use eduhire_jobs::{ApplicationDraft, JobBoard, JobDraft, JobError, SkillMatch};
use eduhire_users::{NewUser, SkillEntry, UserError, UserStore};
use rusqlite::Connection;

struct Fixture {
    board: JobBoard,
    users: Arc<UserStore>,
    employer: String,
    student: String,
}

fn setup() -> Fixture {
    let users_conn = Connection::open_in_memory().unwrap();
    eduhire_users::db::init_db(&users_conn).unwrap();
    let users = Arc::new(UserStore::new(users_conn));

    let jobs_conn = Connection::open_in_memory().unwrap();
    eduhire_jobs::db::init_db(&jobs_conn).unwrap();
    let board = JobBoard::new(jobs_conn, Arc::clone(&users));

    let register = |email: &str, role| {
        users
            .register(NewUser {
                name: email.split('@').next().unwrap().to_string(),
                email: email.to_string(),
                password: "pw".to_string(),
                role,
            })
            .unwrap()
            .id
    };
    let employer = register("hr@acme.test", UserRole::Employer);
    let student = register("sam@example.com", UserRole::Student);

    Fixture {
        board,
        users,
        employer,
        student,
    }
}

fn web_job(requires_verification: bool) -> JobDraft {
    serde_json::from_value(serde_json::json!({
        "title": "Junior Web Developer",
        "company": "Acme",
        "description": "Build pages",
        "skills_required": ["HTML", "CSS"],
        "requires_verification": requires_verification
    }))
    .unwrap()
}

fn grant_verified(users: &UserStore, user_id: &str, skill: &str) {
    users
        .modify(user_id, |u| {
            u.skills.push(SkillEntry {
                skill: skill.to_string(),
                level: 1,
                verified: true,
                completed_date: None,
            });
            Ok::<_, UserError>(())
        })
        .unwrap();
}

#[test]
fn only_employers_post() {
    let fx = setup();
    let err = fx.board.post_job(&fx.student, web_job(true)).unwrap_err();
    assert!(matches!(err, JobError::Forbidden(_)));
    assert_eq!(EduhireError::from(err).code(), "FORBIDDEN");

    let job = fx.board.post_job(&fx.employer, web_job(true)).unwrap();
    assert!(job.is_active);
    assert_eq!(job.posted_by, fx.employer);
    assert_eq!(fx.board.list_active().unwrap().len(), 1);
}

#[test]
fn partial_skills_apply_unverified_then_conflict() {
    let fx = setup();
    let job = fx.board.post_job(&fx.employer, web_job(true)).unwrap();
    grant_verified(&fx.users, &fx.student, "HTML");

    let app = fx
        .board
        .apply(&job.id, &fx.student, ApplicationDraft::default())
        .unwrap();
    assert_eq!(
        app.skills_match,
        vec![
            SkillMatch { skill: "HTML".into(), matched: true },
            SkillMatch { skill: "CSS".into(), matched: false },
        ]
    );
    assert!(!app.is_verified);

    let err = fx
        .board
        .apply(&job.id, &fx.student, ApplicationDraft::default())
        .unwrap_err();
    assert!(matches!(err, JobError::AlreadyApplied { .. }));
    assert_eq!(EduhireError::from(err).code(), "CONFLICT");
    assert_eq!(fx.board.applications_for_user(&fx.student).unwrap().len(), 1);
}

#[test]
fn match_vector_is_frozen_at_apply_time() {
    let fx = setup();
    let job = fx.board.post_job(&fx.employer, web_job(true)).unwrap();
    fx.board
        .apply(
            &job.id,
            &fx.student,
            ApplicationDraft {
                cover_letter: Some("hello".into()),
                resume_url: None,
            },
        )
        .unwrap();

    grant_verified(&fx.users, &fx.student, "HTML");
    grant_verified(&fx.users, &fx.student, "CSS");

    let listed = fx.board.applications_for_user(&fx.student).unwrap();
    assert_eq!(listed.len(), 1);
    let app = &listed[0].application;
    assert!(app.skills_match.iter().all(|m| !m.matched));
    assert!(!app.is_verified);
    assert_eq!(app.cover_letter.as_deref(), Some("hello"));
    assert_eq!(listed[0].job.as_ref().map(|j| j.id.as_str()), Some(job.id.as_str()));
}

#[test]
fn no_verification_required_is_always_verified() {
    let fx = setup();
    let job = fx.board.post_job(&fx.employer, web_job(false)).unwrap();
    let app = fx
        .board
        .apply(&job.id, &fx.student, ApplicationDraft::default())
        .unwrap();
    assert!(app.is_verified);
}

#[test]
fn unknown_job_or_user_is_not_found() {
    let fx = setup();
    let err = fx
        .board
        .apply("missing", &fx.student, ApplicationDraft::default())
        .unwrap_err();
    assert_eq!(EduhireError::from(err).code(), "NOT_FOUND");

    let job = fx.board.post_job(&fx.employer, web_job(true)).unwrap();
    let err = fx
        .board
        .apply(&job.id, "ghost", ApplicationDraft::default())
        .unwrap_err();
    assert_eq!(EduhireError::from(err).code(), "NOT_FOUND");
}

#[test]
fn deactivated_jobs_leave_the_listing() {
    let fx = setup();
    let job = fx.board.post_job(&fx.employer, web_job(true)).unwrap();

    let err = fx.board.set_active(&fx.student, &job.id, false).unwrap_err();
    assert!(matches!(err, JobError::Forbidden(_)));

    let closed = fx.board.set_active(&fx.employer, &job.id, false).unwrap();
    assert!(!closed.is_active);
    assert!(fx.board.list_active().unwrap().is_empty());
    assert!(fx.board.get(&job.id).unwrap().is_some());
}
