//! `eduhire seed <file.json>`: load courses into the catalog.
//!
//! The file holds either a bare array of courses or `{"courses": [...]}`.
//! Existing courses with the same id are replaced.

use std::path::Path;

use eduhire_learning::{Course, CourseCatalog};
use serde::Deserialize;
use tracing::info;

#[derive(Deserialize)]
#[serde(untagged)]
enum SeedFile {
    Bare(Vec<Course>),
    Wrapped { courses: Vec<Course> },
}

impl SeedFile {
    fn into_courses(self) -> Vec<Course> {
        match self {
            SeedFile::Bare(courses) | SeedFile::Wrapped { courses } => courses,
        }
    }
}

/// Parse seed JSON into courses.
pub fn parse(raw: &str) -> serde_json::Result<Vec<Course>> {
    Ok(serde_json::from_str::<SeedFile>(raw)?.into_courses())
}

/// Read `path` and upsert every course. Returns how many were stored.
pub fn seed_file(catalog: &CourseCatalog, path: &Path) -> anyhow::Result<usize> {
    let raw = std::fs::read_to_string(path)?;
    let courses = parse(&raw)?;
    let count = courses.len();
    for course in courses {
        catalog.upsert(course)?;
    }
    info!(path = %path.display(), count, "catalog seeded");
    Ok(count)
}
