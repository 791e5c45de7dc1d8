use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_rosterd");
    let mut child = Command::new(exe)
        .env("ROSTERD_CONFIG", "/nonexistent/rosterd.toml")
        .env("ROSTERD_CATALOG_LATENCY_MS", "0")
        .env("ROSTERD_UPLOAD_LATENCY_MS", "0")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn rosterd");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    assert!(!line.trim().is_empty(), "empty response for {}", method);
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    assert!(
        value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "{} failed: {}",
        method,
        value
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|v| v.as_str())
            .unwrap_or("unknown error")
    );
    value.get("result").cloned().unwrap_or_else(|| json!({}))
}


fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    serde_json::from_str(line.trim()).expect("parse response json")
}

// PNG signature bytes.
const TINY_PNG_B64: &str = "iVBORw0KGgo=";

fn valid_form() -> serde_json::Value {
    json!({
        "studentId": "STU010",
        "name": "Grace Hopper",
        "email": "grace.hopper@email.com",
        "phone": "+1 (555) 456-7890",
        "courseId": "1",
        "isActive": true,
        "profileImage": {
            "fileName": "grace.png",
            "contentType": "image/png",
            "dataBase64": TINY_PNG_B64
        }
    })
}

#[test]
fn create_resolves_course_name_and_appends() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let created = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "students.create",
        json!({ "form": valid_form() }),
    );
    let student = &created["student"];
    assert_eq!(student["courseId"], json!(1));
    assert_eq!(student["courseName"], json!("HTML Basics"));
    assert_eq!(student["name"], json!("Grace Hopper"));
    assert_eq!(student["isActive"], json!(true));
    assert!(student["profileImage"]
        .as_str()
        .unwrap_or("")
        .starts_with("blob:rosterd/"));
    let enrolled = student["enrollmentDate"].as_str().expect("enrollmentDate");
    assert!(enrolled.ends_with('Z'), "{}", enrolled);
    assert!(chrono::DateTime::parse_from_rfc3339(enrolled).is_ok());
    let new_id = student["id"].as_str().expect("id").to_string();
    assert_ne!(new_id, "1");
    assert_ne!(new_id, "2");

    let all = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "students.list",
        json!({ "scope": "all" }),
    );
    let list = all["students"].as_array().cloned().unwrap_or_default();
    assert_eq!(list.len(), 3);
    assert_eq!(list[2]["id"], json!(new_id));

    let analytics = request_ok(&mut stdin, &mut reader, "3", "analytics.get", json!({}));
    assert_eq!(analytics["courseStats"]["HTML Basics"], json!(1));
    assert_eq!(analytics["totalStudents"], json!(3));

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn invalid_form_reports_field_errors_and_changes_nothing() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let mut form = valid_form();
    form["email"] = json!("grace at email");
    form["phone"] = json!("0123");
    form["courseId"] = json!("");
    form["profileImage"]["contentType"] = json!("text/plain");

    let resp = request(
        &mut stdin,
        &mut reader,
        "1",
        "students.create",
        json!({ "form": form }),
    );
    assert_eq!(resp["ok"], json!(false));
    assert_eq!(resp["error"]["code"], json!("validation_failed"));
    assert_eq!(
        resp["error"]["details"]["fieldErrors"],
        json!({
            "email": "Please enter a valid email address",
            "phone": "Please enter a valid phone number",
            "courseId": "Please select a course",
            "profileImage": "Please select an image file"
        })
    );

    let resp = request(
        &mut stdin,
        &mut reader,
        "2",
        "students.create",
        json!({ "form": { "studentId": "  " } }),
    );
    let fields = &resp["error"]["details"]["fieldErrors"];
    assert_eq!(fields["studentId"], json!("Student ID is required"));
    assert_eq!(fields["profileImage"], json!("Profile picture is required"));

    let resp = request(
        &mut stdin,
        &mut reader,
        "3",
        "students.create",
        json!({ "form": { "profileImage": { "dataBase64": "%%%" } } }),
    );
    assert_eq!(resp["error"]["code"], json!("bad_params"));

    let analytics = request_ok(&mut stdin, &mut reader, "4", "analytics.get", json!({}));
    assert_eq!(analytics["totalStudents"], json!(2));

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn edit_keeps_identity_enrollment_and_picture() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let original = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "students.get",
        json!({ "studentId": "2" }),
    )["student"]
        .clone();

    let mut form = valid_form();
    form["name"] = json!("Michael T. Chen");
    form["courseId"] = json!(4);
    form["isActive"] = json!(false);
    form.as_object_mut().expect("form").remove("profileImage");

    let edited = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "students.update",
        json!({ "studentId": "2", "form": form }),
    );
    assert_eq!(edited["updated"], json!(true));
    let s = &edited["student"];
    assert_eq!(s["id"], original["id"]);
    assert_eq!(s["enrollmentDate"], original["enrollmentDate"]);
    assert_eq!(s["profileImage"], original["profileImage"]);
    assert_eq!(s["name"], json!("Michael T. Chen"));
    assert_eq!(s["courseName"], json!("React In Depth"));
    assert_eq!(s["isActive"], json!(false));

    let all = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "students.list",
        json!({ "scope": "all" }),
    );
    let list = all["students"].as_array().cloned().unwrap_or_default();
    assert_eq!(list.len(), 2);
    assert_eq!(list[1]["name"], json!("Michael T. Chen"));

    let analytics = request_ok(&mut stdin, &mut reader, "4", "analytics.get", json!({}));
    assert_eq!(analytics["courseStats"], json!({ "React In Depth": 2 }));
    assert_eq!(analytics["inactiveStudents"], json!(1));

    let missing = request_ok(
        &mut stdin,
        &mut reader,
        "5",
        "students.update",
        json!({ "studentId": "ghost", "form": valid_form() }),
    );
    assert_eq!(missing, json!({ "updated": false, "student": null }));

    drop(stdin);
    let _ = child.wait();
}
