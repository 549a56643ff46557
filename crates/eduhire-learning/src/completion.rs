//! Completion bookkeeping on a user document.
//!
//! These functions only mutate the in-memory `User`; the engine runs them
//! inside `UserStore::modify` so the completion record, skill upgrade and coin
//! grant land in one committed write or not at all.

use eduhire_users::{CompletedCourse, CompletedTopic, SkillEntry, User};

use crate::error::{LearningError, Result};
use crate::types::{Course, CourseCompletion, TopicCompletion};

/// Mark a topic complete and grant `reward` coins, once.
///
/// A repeat completion of the same (course, topic) is a successful no-op.
pub fn record_topic(
    user: &mut User,
    course_id: &str,
    topic_id: &str,
    reward: i64,
    now: &str,
) -> TopicCompletion {
    if user.has_completed_topic(course_id, topic_id) {
        return TopicCompletion {
            newly_completed: false,
            coins_earned: 0,
        };
    }
    user.completed_topics.push(CompletedTopic {
        course_id: course_id.to_string(),
        topic_id: topic_id.to_string(),
        completed_at: now.to_string(),
    });
    grant_coins(user, reward);
    TopicCompletion {
        newly_completed: true,
        coins_earned: reward.max(0),
    }
}

/// Record a course completion, upgrade the course's skill and grant the
/// course reward. Fails without touching `user` if the course was already
/// completed.
pub fn record_course(
    user: &mut User,
    course: &Course,
    score: u32,
    now: &str,
) -> Result<CourseCompletion> {
    if user.has_completed_course(&course.id) {
        return Err(LearningError::AlreadyCompleted {
            course_id: course.id.clone(),
        });
    }

    user.completed_courses.push(CompletedCourse {
        course_id: course.id.clone(),
        completed_at: now.to_string(),
        score,
    });
    let skill_level = upgrade_skill(user, &course.category, now);
    grant_coins(user, course.reward_coins);

    Ok(CourseCompletion {
        course_id: course.id.clone(),
        coins_earned: course.reward_coins.max(0),
        skill: course.category.clone(),
        skill_level,
    })
}

/// Level up (or create at level 1) the named skill and mark it verified.
/// Returns the resulting level.
pub fn upgrade_skill(user: &mut User, skill: &str, now: &str) -> u32 {
    match user.skill_mut(skill) {
        Some(entry) => {
            entry.level = entry.level.saturating_add(1);
            entry.verified = true;
            entry.completed_date = Some(now.to_string());
            entry.level
        }
        None => {
            user.skills.push(SkillEntry {
                skill: skill.to_string(),
                level: 1,
                verified: true,
                completed_date: Some(now.to_string()),
            });
            1
        }
    }
}

/// Coin balances never go down through rewards; a negative configured reward
/// grants nothing.
fn grant_coins(user: &mut User, amount: i64) {
    user.coins = user.coins.saturating_add(amount.max(0));
}

#[cfg(test)]
mod tests {
    use super::*;
    use eduhire_core::UserRole;
    use eduhire_users::AttemptLedger;

    const NOW: &str = "2026-01-01T00:00:00+00:00";

    fn student() -> User {
        User {
            id: "u1".into(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password_hash: String::new(),
            role: UserRole::Student,
            skills: vec![],
            coins: 0,
            completed_courses: vec![],
            completed_topics: vec![],
            attempts: AttemptLedger::default(),
            created_at: NOW.into(),
            updated_at: NOW.into(),
        }
    }

    fn course(id: &str, category: &str) -> Course {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "title": format!("{category} course"),
            "category": category,
        }))
        .unwrap()
    }

    #[test]
    fn topic_reward_granted_once() {
        let mut u = student();
        let first = record_topic(&mut u, "c1", "t1", 10, NOW);
        assert!(first.newly_completed);
        assert_eq!(first.coins_earned, 10);

        let again = record_topic(&mut u, "c1", "t1", 10, "2026-02-02T00:00:00+00:00");
        assert!(!again.newly_completed);
        assert_eq!(again.coins_earned, 0);

        assert_eq!(u.coins, 10);
        assert_eq!(u.completed_topics.len(), 1);
        assert_eq!(u.completed_topics[0].completed_at, NOW);
    }

    #[test]
    fn same_topic_id_in_another_course_is_distinct() {
        let mut u = student();
        record_topic(&mut u, "c1", "t1", 10, NOW);
        assert!(record_topic(&mut u, "c2", "t1", 10, NOW).newly_completed);
        assert_eq!(u.coins, 20);
    }

    #[test]
    fn first_course_creates_verified_skill() {
        let mut u = student();
        let done = record_course(&mut u, &course("c1", "HTML"), 100, NOW).unwrap();
        assert_eq!(done.skill, "HTML");
        assert_eq!(done.skill_level, 1);
        assert_eq!(done.coins_earned, 100);

        let skill = u.skill("HTML").unwrap();
        assert_eq!(skill.level, 1);
        assert!(skill.verified);
        assert_eq!(skill.completed_date.as_deref(), Some(NOW));
        assert_eq!(u.coins, 100);
        assert_eq!(u.completed_courses[0].score, 100);
    }

    #[test]
    fn second_course_in_category_levels_up() {
        let mut u = student();
        record_course(&mut u, &course("c1", "HTML"), 100, NOW).unwrap();
        let done = record_course(&mut u, &course("c2", "HTML"), 90, NOW).unwrap();
        assert_eq!(done.skill_level, 2);
        assert_eq!(u.skills.len(), 1);
        assert_eq!(u.coins, 200);
    }

    #[test]
    fn non_ascii_category_levels_existing_skill() {
        let mut u = student();
        record_course(&mut u, &course("c1", "Ñandú Studies"), 100, NOW).unwrap();
        let done = record_course(&mut u, &course("c2", "ñandú studies"), 100, NOW).unwrap();
        assert_eq!(done.skill_level, 2);
        assert_eq!(u.skills.len(), 1);
        assert_eq!(u.skills[0].skill, "Ñandú Studies");
    }

    #[test]
    fn upgrade_verifies_self_reported_skill() {
        let mut u = student();
        u.skills.push(SkillEntry {
            skill: "css".into(),
            level: 3,
            verified: false,
            completed_date: None,
        });
        assert_eq!(upgrade_skill(&mut u, "CSS", NOW), 4);
        assert!(u.skills[0].verified);
        assert_eq!(u.skills[0].skill, "css");
    }

    #[test]
    fn repeat_course_is_rejected_and_unchanged() {
        let mut u = student();
        let c = course("c1", "HTML");
        record_course(&mut u, &c, 100, NOW).unwrap();
        let before = (u.coins, u.skills.clone(), u.completed_courses.len());

        let err = record_course(&mut u, &c, 100, NOW).unwrap_err();
        assert!(matches!(err, LearningError::AlreadyCompleted { .. }));
        assert_eq!((u.coins, u.skills.clone(), u.completed_courses.len()), before);
    }
}
