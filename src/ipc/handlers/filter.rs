use crate::ipc::error::{err, ok};
use crate::ipc::helpers::students_json;
use crate::ipc::types::{AppState, Request};
use serde_json::json;
use tracing::debug;

fn handle_filter_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({ "selectedCourseId": state.roster.selected_course_id() }),
    )
}

fn handle_filter_set(state: &mut AppState, req: &Request) -> serde_json::Value {
    let course_id = match req.params.get("courseId") {
        None => return err(&req.id, "bad_params", "missing courseId", None),
        Some(v) if v.is_null() => None,
        Some(v) => match v.as_i64() {
            Some(n) => Some(n),
            None => {
                return err(
                    &req.id,
                    "bad_params",
                    "courseId must be integer or null",
                    None,
                )
            }
        },
    };

    state.roster.set_selected_course_id(course_id);
    debug!(?course_id, "course filter set");

    ok(
        &req.id,
        json!({
            "selectedCourseId": course_id,
            "students": students_json(state.roster.students()),
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "filter.get" => Some(handle_filter_get(state, req)),
        "filter.set" => Some(handle_filter_set(state, req)),
        _ => None,
    }
}
