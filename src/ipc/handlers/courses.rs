use crate::ipc::error::ok;
use crate::ipc::helpers::loaded_courses;
use crate::ipc::types::{AppState, Request};
use serde_json::json;

async fn handle_courses_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let courses = loaded_courses(state).await;
    ok(&req.id, json!({ "courses": courses }))
}

/// Per-course headcount for the filter chips.
async fn handle_courses_enrollment(state: &mut AppState, req: &Request) -> serde_json::Value {
    let courses = loaded_courses(state).await;
    let rows: Vec<serde_json::Value> = courses
        .iter()
        .map(|c| {
            json!({
                "id": c.id,
                "name": c.name,
                "studentCount": state.roster.enrollment_for_course(c.id),
            })
        })
        .collect();
    ok(&req.id, json!({ "courses": rows }))
}

pub async fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "courses.list" => Some(handle_courses_list(state, req).await),
        "courses.enrollment" => Some(handle_courses_enrollment(state, req).await),
        _ => None,
    }
}
