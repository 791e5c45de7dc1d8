use crate::ipc::error::ok;
use crate::ipc::helpers::students_json;
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_analytics_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(&req.id, json!(state.roster.analytics()))
}

/// Everything the dashboard renders, read in one step so the pieces agree.
fn handle_roster_snapshot(state: &mut AppState, req: &Request) -> serde_json::Value {
    let roster = &state.roster;
    ok(
        &req.id,
        json!({
            "students": students_json(roster.students()),
            "allStudents": students_json(roster.all_students()),
            "analytics": roster.analytics(),
            "selectedCourseId": roster.selected_course_id(),
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "analytics.get" => Some(handle_analytics_get(state, req)),
        "roster.snapshot" => Some(handle_roster_snapshot(state, req)),
        _ => None,
    }
}
