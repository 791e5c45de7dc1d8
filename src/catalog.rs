use crate::model::Course;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

#[async_trait]
pub trait CourseCatalog: Send + Sync {
    async fn list_courses(&self) -> anyhow::Result<Vec<Course>>;
}

/// Fixed four-course catalog behind a simulated network delay.
#[derive(Debug, Clone)]
pub struct MockCourseCatalog {
    latency: Duration,
}

impl MockCourseCatalog {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl CourseCatalog for MockCourseCatalog {
    async fn list_courses(&self) -> anyhow::Result<Vec<Course>> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        debug!(latency_ms = self.latency.as_millis() as u64, "course catalog served");
        Ok(reference_courses())
    }
}

pub fn reference_courses() -> Vec<Course> {
    vec![
        Course::new(1, "HTML Basics"),
        Course::new(2, "CSS Mastery"),
        Course::new(3, "JavaScript Pro"),
        Course::new(4, "React In Depth"),
    ]
}

/// Name snapshot for `course_id`; empty when the catalog has no such course
/// (or has not loaded yet).
pub fn course_name_for(courses: &[Course], course_id: i64) -> String {
    courses
        .iter()
        .find(|c| c.id == course_id)
        .map(|c| c.name.clone())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn mock_catalog_waits_then_returns_reference_courses() {
        let catalog = MockCourseCatalog::new(Duration::from_millis(800));
        let started = tokio::time::Instant::now();
        let courses = catalog.list_courses().await.expect("catalog");
        assert!(started.elapsed() >= Duration::from_millis(800));

        let names: Vec<&str> = courses.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["HTML Basics", "CSS Mastery", "JavaScript Pro", "React In Depth"]
        );
        assert_eq!(courses.iter().map(|c| c.id).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn course_name_falls_back_to_empty() {
        let courses = reference_courses();
        assert_eq!(course_name_for(&courses, 3), "JavaScript Pro");
        assert_eq!(course_name_for(&courses, 42), "");
        assert_eq!(course_name_for(&[], 1), "");
    }
}
