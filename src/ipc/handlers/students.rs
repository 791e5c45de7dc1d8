use crate::form::{self, FormError, ImageFile, StudentFormData};
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{loaded_courses, required_str, students_json};
use crate::ipc::types::{AppState, Request};
use crate::model::Student;
use base64::Engine;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct FormParams {
    student_id: String,
    name: String,
    email: String,
    phone: String,
    /// The UI sends the select value as a string; numbers are accepted too.
    course_id: serde_json::Value,
    profile_image: Option<ImageParams>,
    is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageParams {
    #[serde(default)]
    file_name: String,
    #[serde(default)]
    content_type: String,
    data_base64: String,
}

fn parse_form(req: &Request) -> Result<StudentFormData, serde_json::Value> {
    let Some(raw) = req.params.get("form") else {
        return Err(err(&req.id, "bad_params", "missing form", None));
    };
    let params: FormParams = serde_json::from_value(raw.clone())
        .map_err(|e| err(&req.id, "bad_params", format!("invalid form: {e}"), None))?;

    let course_id = match params.course_id {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        _ => String::new(),
    };

    let profile_image = match params.profile_image {
        None => None,
        Some(img) => {
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(img.data_base64.trim())
                .map_err(|e| {
                    err(
                        &req.id,
                        "bad_params",
                        format!("form.profileImage.dataBase64: {e}"),
                        None,
                    )
                })?;
            Some(ImageFile {
                file_name: img.file_name,
                content_type: img.content_type,
                bytes,
            })
        }
    };

    Ok(StudentFormData {
        student_id: params.student_id,
        name: params.name,
        email: params.email,
        phone: params.phone,
        course_id,
        profile_image,
        is_active: params.is_active.unwrap_or(true),
    })
}

fn form_error(req: &Request, e: FormError) -> serde_json::Value {
    match &e {
        FormError::Invalid(fields) => err(
            &req.id,
            "validation_failed",
            e.to_string(),
            Some(json!({ "fieldErrors": fields })),
        ),
        FormError::Upload(_) => err(&req.id, "upload_failed", e.to_string(), None),
    }
}

fn parse_student(req: &Request, raw: serde_json::Value) -> Result<Student, serde_json::Value> {
    serde_json::from_value(raw)
        .map_err(|e| err(&req.id, "bad_params", format!("invalid student: {e}"), None))
}

fn handle_students_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let scope = req
        .params
        .get("scope")
        .and_then(|v| v.as_str())
        .unwrap_or("filtered");
    let students = match scope {
        "filtered" => students_json(state.roster.students()),
        "all" => students_json(state.roster.all_students()),
        other => {
            return err(
                &req.id,
                "bad_params",
                format!("scope must be 'filtered' or 'all', got '{other}'"),
                None,
            )
        }
    };
    ok(
        &req.id,
        json!({
            "students": students,
            "selectedCourseId": state.roster.selected_course_id(),
        }),
    )
}

fn handle_students_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    let student_id = match required_str(req, "studentId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match state.roster.student(&student_id) {
        Some(s) => ok(&req.id, json!({ "student": s })),
        None => err(&req.id, "not_found", "student not found", None),
    }
}

async fn handle_students_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let form_data = match parse_form(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let courses = loaded_courses(state).await;
    let id = state.roster.next_student_id();
    let student = match form::assemble_new_student(
        &form_data,
        id,
        &courses,
        state.uploader.as_ref(),
        Utc::now(),
    )
    .await
    {
        Ok(s) => s,
        Err(e) => return form_error(req, e),
    };

    info!(id = %student.id, course_id = student.course_id, "student registered");
    state.roster.add_student(student.clone());
    ok(&req.id, json!({ "student": student }))
}

async fn handle_students_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let student_id = match required_str(req, "studentId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let form_data = match parse_form(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let Some(original) = state.roster.student(&student_id).cloned() else {
        return ok(&req.id, json!({ "updated": false, "student": null }));
    };

    let courses = loaded_courses(state).await;
    let edited = match form::assemble_updated_student(
        &original,
        &form_data,
        &courses,
        state.uploader.as_ref(),
    )
    .await
    {
        Ok(s) => s,
        Err(e) => return form_error(req, e),
    };

    let updated = state.roster.update_student(edited.clone());
    info!(id = %edited.id, updated, "student edited");
    ok(&req.id, json!({ "updated": updated, "student": edited }))
}

/// Raw append of a complete record. A missing, null or blank `id` is filled
/// in by the store.
fn handle_students_add(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(mut raw) = req.params.get("student").cloned() else {
        return err(&req.id, "bad_params", "missing student", None);
    };
    let Some(obj) = raw.as_object_mut() else {
        return err(&req.id, "bad_params", "student must be an object", None);
    };
    // Only an absent, null or blank id is filled; any other non-string is
    // left for `parse_student` to reject.
    let needs_id = match obj.get("id") {
        None | Some(serde_json::Value::Null) => true,
        Some(serde_json::Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    };
    if needs_id {
        obj.insert("id".into(), json!(state.roster.next_student_id()));
    }

    let student = match parse_student(req, raw) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    state.roster.add_student(student.clone());
    ok(&req.id, json!({ "student": student }))
}

fn handle_students_replace(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(raw) = req.params.get("student").cloned() else {
        return err(&req.id, "bad_params", "missing student", None);
    };
    let student = match parse_student(req, raw) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let updated = state.roster.update_student(student);
    ok(&req.id, json!({ "updated": updated }))
}

fn handle_students_toggle_status(state: &mut AppState, req: &Request) -> serde_json::Value {
    let student_id = match required_str(req, "studentId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let is_active = state.roster.toggle_student_status(&student_id);
    ok(
        &req.id,
        json!({ "studentId": student_id, "isActive": is_active }),
    )
}

pub async fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "students.list" => Some(handle_students_list(state, req)),
        "students.get" => Some(handle_students_get(state, req)),
        "students.create" => Some(handle_students_create(state, req).await),
        "students.update" => Some(handle_students_update(state, req).await),
        "students.add" => Some(handle_students_add(state, req)),
        "students.replace" => Some(handle_students_replace(state, req)),
        "students.toggleStatus" => Some(handle_students_toggle_status(state, req)),
        _ => None,
    }
}
