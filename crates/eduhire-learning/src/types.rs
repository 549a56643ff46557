use eduhire_core::types::{new_id, now_rfc3339};
use serde::{Deserialize, Serialize};

pub const DEFAULT_REQUIRED_SCORE: u32 = 80;
pub const DEFAULT_REWARD_COINS: i64 = 100;

/// Presentation variant of the same topic content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VideoStyle {
    #[default]
    Visual,
    Practical,
    Theoretical,
}

impl std::fmt::Display for VideoStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VideoStyle::Visual => write!(f, "visual"),
            VideoStyle::Practical => write!(f, "practical"),
            VideoStyle::Theoretical => write!(f, "theoretical"),
        }
    }
}

impl std::str::FromStr for VideoStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "visual" => Ok(VideoStyle::Visual),
            "practical" => Ok(VideoStyle::Practical),
            "theoretical" => Ok(VideoStyle::Theoretical),
            other => Err(format!("unknown video style: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Beginner => write!(f, "beginner"),
            Difficulty::Intermediate => write!(f, "intermediate"),
            Difficulty::Advanced => write!(f, "advanced"),
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// A course document. Authored outside this service (see the `seed`
/// command) and read-only to the progression engine.
///
/// Every id and most fields default, so a hand-written JSON course only needs
/// a title, a category and its topics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    #[serde(default = "new_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Skill granted on completion, e.g. "HTML".
    pub category: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub topics: Vec<Topic>,
    /// Percentage needed to pass a topic quiz.
    #[serde(default = "default_required_score")]
    pub required_score: u32,
    #[serde(default = "default_reward_coins")]
    pub reward_coins: i64,
    #[serde(default = "now_rfc3339")]
    pub created_at: String,
    #[serde(default = "now_rfc3339")]
    pub updated_at: String,
}

impl Course {
    pub fn topic(&self, topic_id: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| t.id == topic_id)
    }

    pub fn summary(&self) -> CourseSummary {
        CourseSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            difficulty: self.difficulty,
            reward_coins: self.reward_coins,
        }
    }
}

fn default_required_score() -> u32 {
    DEFAULT_REQUIRED_SCORE
}
fn default_reward_coins() -> i64 {
    DEFAULT_REWARD_COINS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    #[serde(default = "new_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// The same lesson recorded in several teaching styles.
    #[serde(default)]
    pub videos: Vec<Video>,
    /// Ordered; answers are graded positionally against this list.
    #[serde(default)]
    pub quizzes: Vec<QuizQuestion>,
    #[serde(default)]
    pub order: u32,
}

impl Topic {
    /// First video recorded in `style`, by `order`.
    pub fn video_for(&self, style: VideoStyle) -> Option<&Video> {
        self.videos
            .iter()
            .filter(|v| v.style == style)
            .min_by_key(|v| v.order)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    #[serde(default = "new_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub video_url: String,
    #[serde(default)]
    pub style: VideoStyle,
    /// Seconds.
    pub duration: Option<u32>,
    #[serde(default)]
    pub order: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizQuestion {
    #[serde(default = "new_id")]
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    /// Zero-based index into `options`.
    pub correct_answer: u32,
    pub explanation: Option<String>,
}

/// Catalog listing row; topics are omitted.
#[derive(Debug, Clone, Serialize)]
pub struct CourseSummary {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub difficulty: Difficulty,
    pub reward_coins: i64,
}

/// Result of grading one quiz submission.
#[derive(Debug, Clone, Serialize)]
pub struct QuizOutcome {
    pub passed: bool,
    /// Rounded percentage.
    pub score: u32,
    pub score_percent: f64,
    pub correct: usize,
    pub total: usize,
    /// Only set on failure.
    pub next_video_style: Option<VideoStyle>,
    /// The topic's video in `next_video_style`, when one exists.
    pub next_video: Option<Video>,
    /// Failures recorded for this topic so far, including this one.
    pub attempts: u32,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicCompletion {
    /// False when the topic had already been completed; nothing was granted.
    pub newly_completed: bool,
    pub coins_earned: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseCompletion {
    pub course_id: String,
    pub coins_earned: i64,
    pub skill: String,
    pub skill_level: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_course_json_fills_defaults() {
        let json = r#"{
            "title": "HTML Basics",
            "category": "HTML",
            "topics": [{
                "title": "Tags",
                "videos": [{"title": "Tags", "video_url": "https://cdn/v1.mp4", "style": "practical"}],
                "quizzes": [{"question": "?", "options": ["a", "b"], "correct_answer": 1}]
            }]
        }"#;
        let course: Course = serde_json::from_str(json).unwrap();
        assert_eq!(course.required_score, 80);
        assert_eq!(course.reward_coins, 100);
        assert_eq!(course.difficulty, Difficulty::Beginner);
        assert!(!course.id.is_empty());

        let topic = &course.topics[0];
        assert!(!topic.id.is_empty());
        assert_eq!(topic.quizzes[0].correct_answer, 1);
        assert!(topic.video_for(VideoStyle::Practical).is_some());
        assert!(topic.video_for(VideoStyle::Visual).is_none());
    }

    #[test]
    fn style_parse_is_case_insensitive() {
        assert_eq!("Visual".parse::<VideoStyle>().unwrap(), VideoStyle::Visual);
        assert!("kinesthetic".parse::<VideoStyle>().is_err());
    }
}
