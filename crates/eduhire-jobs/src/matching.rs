use eduhire_users::User;

use crate::types::SkillMatch;

/// Outcome of comparing a job's required skills with an applicant's ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchEvaluation {
    pub skills_match: Vec<SkillMatch>,
    pub is_verified: bool,
}

/// Build the match vector for `required` against the user's verified skills.
///
/// Names compare case-insensitively; unverified (self-reported) skills never
/// match. The application counts as verified when every required skill
/// matched, or when the job does not ask for verification at all.
pub fn evaluate(required: &[String], requires_verification: bool, user: &User) -> MatchEvaluation {
    let skills_match: Vec<SkillMatch> = required
        .iter()
        .map(|skill| SkillMatch {
            skill: skill.clone(),
            matched: user
                .verified_skills()
                .any(|s| s.is_named(skill)),
        })
        .collect();

    let all_matched = skills_match.iter().all(|m| m.matched);
    MatchEvaluation {
        is_verified: all_matched || !requires_verification,
        skills_match,
    }
}
