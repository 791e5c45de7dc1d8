use crate::ipc::error::err;
use crate::ipc::types::{AppState, Request};
use crate::model::{Course, Student};
use serde_json::json;
use tracing::warn;

pub fn required_str(req: &Request, key: &str) -> Result<String, serde_json::Value> {
    req.params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|v| v.to_string())
        .ok_or_else(|| err(&req.id, "bad_params", format!("missing {}", key), None))
}

/// Catalog for course-name resolution. Served from cache once a fetch has
/// succeeded; a failed fetch is logged and treated as an empty catalog.
pub async fn loaded_courses(state: &mut AppState) -> Vec<Course> {
    if let Some(courses) = &state.courses {
        return courses.clone();
    }
    match state.catalog.list_courses().await {
        Ok(courses) => {
            state.courses = Some(courses.clone());
            courses
        }
        Err(e) => {
            warn!(error = %e, "failed to load courses");
            Vec::new()
        }
    }
}

pub fn students_json<'a, I>(students: I) -> Vec<serde_json::Value>
where
    I: IntoIterator<Item = &'a Student>,
{
    students.into_iter().map(|s| json!(s)).collect()
}
