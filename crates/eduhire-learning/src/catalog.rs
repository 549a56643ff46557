use std::sync::Mutex;

use eduhire_core::types::now_rfc3339;
use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use tracing::{info, instrument};

use crate::error::{LearningError, Result};
use crate::types::{Course, CourseSummary, Topic};

const COURSE_COLUMNS: &str = "id, title, description, category, difficulty, required_score,
     reward_coins, topics, created_at, updated_at";

/// Course documents. Written only by authoring tools (`upsert`); the engine
/// and HTTP layer read them.
pub struct CourseCatalog {
    db: Mutex<Connection>,
}

impl CourseCatalog {
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Mutex::new(conn),
        }
    }

    /// Insert or replace a course by id.
    #[instrument(skip(self, course), fields(course_id = %course.id))]
    pub fn upsert(&self, mut course: Course) -> Result<Course> {
        validate(&course)?;
        course.updated_at = now_rfc3339();
        let topics = serde_json::to_string(&course.topics)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let db = self.db.lock().expect("catalog db poisoned");
        db.execute(
            "INSERT INTO courses
                (id, title, description, category, difficulty, required_score,
                 reward_coins, topics, created_at, updated_at)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10)
             ON CONFLICT(id) DO UPDATE SET
                title=excluded.title, description=excluded.description,
                category=excluded.category, difficulty=excluded.difficulty,
                required_score=excluded.required_score, reward_coins=excluded.reward_coins,
                topics=excluded.topics, updated_at=excluded.updated_at",
            params![
                course.id,
                course.title,
                course.description,
                course.category,
                course.difficulty.to_string(),
                course.required_score,
                course.reward_coins,
                topics,
                course.created_at,
                course.updated_at,
            ],
        )?;
        info!(title = %course.title, topics = course.topics.len(), "course stored");
        Ok(course)
    }

    pub fn get(&self, course_id: &str) -> Result<Option<Course>> {
        let db = self.db.lock().expect("catalog db poisoned");
        let mut stmt = db.prepare(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE id = ?1"
        ))?;
        match stmt.query_row(params![course_id], row_to_course) {
            Ok(c) => Ok(Some(c)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(LearningError::Database(e)),
        }
    }

    pub fn require(&self, course_id: &str) -> Result<Course> {
        self.get(course_id)?
            .ok_or_else(|| LearningError::CourseNotFound(course_id.to_string()))
    }

    /// Look up one topic of a course.
    pub fn topic(&self, course_id: &str, topic_id: &str) -> Result<Topic> {
        self.require(course_id)?
            .topic(topic_id)
            .cloned()
            .ok_or_else(|| LearningError::TopicNotFound {
                course_id: course_id.to_string(),
                topic_id: topic_id.to_string(),
            })
    }

    /// All courses, oldest first, without topics.
    pub fn list(&self) -> Result<Vec<CourseSummary>> {
        let db = self.db.lock().expect("catalog db poisoned");
        let mut stmt = db.prepare(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses ORDER BY created_at ASC"
        ))?;
        let rows = stmt.query_map([], row_to_course)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?.summary());
        }
        Ok(out)
    }
}

fn validate(course: &Course) -> Result<()> {
    if course.title.trim().is_empty() {
        return Err(LearningError::InvalidInput("course title is required".into()));
    }
    if course.category.trim().is_empty() {
        return Err(LearningError::InvalidInput(format!(
            "course {} has no category",
            course.id
        )));
    }
    if course.required_score > 100 {
        return Err(LearningError::InvalidInput(format!(
            "required_score {} exceeds 100",
            course.required_score
        )));
    }
    for topic in &course.topics {
        for (i, q) in topic.quizzes.iter().enumerate() {
            if q.correct_answer as usize >= q.options.len() {
                return Err(LearningError::InvalidInput(format!(
                    "topic {} question {}: correct_answer {} out of range",
                    topic.id, i, q.correct_answer
                )));
            }
        }
    }
    Ok(())
}

fn row_to_course(row: &rusqlite::Row<'_>) -> rusqlite::Result<Course> {
    let difficulty: String = row.get(4)?;
    Ok(Course {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        category: row.get(3)?,
        difficulty: difficulty.parse().unwrap_or_default(),
        required_score: row.get(5)?,
        reward_coins: row.get(6)?,
        topics: json_column(row, 7)?,
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
