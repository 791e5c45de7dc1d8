use crate::catalog::course_name_for;
use crate::model::{Course, Student};
use crate::upload::ImageUploader;
use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::warn;

pub const MAX_PROFILE_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Field name (camelCase, as the UI knows it) to message.
pub type FieldErrors = BTreeMap<String, String>;

#[derive(Debug, Clone)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Raw form input. `course_id` stays a string until validated, the same way
/// the select control hands it over.
#[derive(Debug, Clone)]
pub struct StudentFormData {
    pub student_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub course_id: String,
    pub profile_image: Option<ImageFile>,
    pub is_active: bool,
}

impl Default for StudentFormData {
    fn default() -> Self {
        Self {
            student_id: String::new(),
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            course_id: String::new(),
            profile_image: None,
            is_active: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum FormError {
    #[error("{} field(s) failed validation", .0.len())]
    Invalid(FieldErrors),
    #[error("profile image upload failed: {0}")]
    Upload(String),
}

pub fn parse_course_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

/// Checks applied when a file is picked, before the form is submitted.
pub fn validate_image_file(file: &ImageFile) -> Option<&'static str> {
    if file.bytes.len() > MAX_PROFILE_IMAGE_BYTES {
        return Some("File size must be less than 5MB");
    }
    if !file.content_type.starts_with("image/") {
        return Some("Please select an image file");
    }
    None
}

/// Empty map means the form may be submitted. A profile image is only
/// required when creating.
pub fn validate_form(form: &StudentFormData, is_edit: bool) -> FieldErrors {
    let mut errors = FieldErrors::new();
    let mut reject = |field: &str, message: &str| {
        errors.insert(field.to_string(), message.to_string());
    };

    if form.student_id.trim().is_empty() {
        reject("studentId", "Student ID is required");
    }

    if form.name.trim().is_empty() {
        reject("name", "Name is required");
    }

    if form.email.trim().is_empty() {
        reject("email", "Email is required");
    } else if !is_valid_email(&form.email) {
        reject("email", "Please enter a valid email address");
    }

    if form.phone.trim().is_empty() {
        reject("phone", "Phone number is required");
    } else {
        let compact: String = form.phone.chars().filter(|c| !c.is_whitespace()).collect();
        if !is_valid_phone(&compact) {
            reject("phone", "Please enter a valid phone number");
        }
    }

    if parse_course_id(&form.course_id).is_none() {
        reject("courseId", "Please select a course");
    }

    match &form.profile_image {
        Some(file) => {
            if let Some(message) = validate_image_file(file) {
                reject("profileImage", message);
            }
        }
        None if !is_edit => reject("profileImage", "Profile picture is required"),
        None => {}
    }

    errors
}

/// `local@domain.tld`: no whitespace, exactly one `@`, and a dot inside the
/// domain that is neither its first nor last character.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Optional `+`, a leading digit 1-9, then at least 8 of digits `-` `(` `)`.
/// Expects whitespace already stripped.
fn is_valid_phone(phone: &str) -> bool {
    let rest = phone.strip_prefix('+').unwrap_or(phone);
    let mut chars = rest.chars();
    match chars.next() {
        Some(c) if ('1'..='9').contains(&c) => {}
        _ => return false,
    }
    let tail: Vec<char> = chars.collect();
    tail.len() >= 8
        && tail
            .iter()
            .all(|c| c.is_ascii_digit() || matches!(c, '-' | '(' | ')'))
}

async fn upload_if_present(
    form: &StudentFormData,
    uploader: &dyn ImageUploader,
) -> Result<Option<String>, FormError> {
    let Some(file) = &form.profile_image else {
        return Ok(None);
    };
    match uploader.upload_image(&file.bytes, &file.content_type).await {
        Ok(handle) => Ok(Some(handle)),
        Err(e) => {
            warn!(file_name = %file.file_name, error = %e, "profile image upload failed");
            Err(FormError::Upload(e.to_string()))
        }
    }
}

/// Validates, uploads the picture, and builds a record ready for
/// `RosterStore::add_student`.
pub async fn assemble_new_student(
    form: &StudentFormData,
    id: String,
    courses: &[Course],
    uploader: &dyn ImageUploader,
    enrolled_at: DateTime<Utc>,
) -> Result<Student, FormError> {
    let errors = validate_form(form, false);
    if !errors.is_empty() {
        return Err(FormError::Invalid(errors));
    }

    let profile_image = upload_if_present(form, uploader).await?.unwrap_or_default();
    let course_id = parse_course_id(&form.course_id).unwrap_or_default();

    Ok(Student {
        id,
        student_id: form.student_id.clone(),
        name: form.name.clone(),
        email: form.email.clone(),
        phone: form.phone.clone(),
        course_id,
        course_name: course_name_for(courses, course_id),
        profile_image,
        is_active: form.is_active,
        enrollment_date: enrolled_at.to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

/// Merges an edit form over `original`. Identity and enrollment date carry
/// over; the picture is replaced only when a new one was supplied.
pub async fn assemble_updated_student(
    original: &Student,
    form: &StudentFormData,
    courses: &[Course],
    uploader: &dyn ImageUploader,
) -> Result<Student, FormError> {
    let errors = validate_form(form, true);
    if !errors.is_empty() {
        return Err(FormError::Invalid(errors));
    }

    let uploaded = upload_if_present(form, uploader).await?;
    let course_id = parse_course_id(&form.course_id).unwrap_or_default();

    Ok(Student {
        student_id: form.student_id.clone(),
        name: form.name.clone(),
        email: form.email.clone(),
        phone: form.phone.clone(),
        course_id,
        course_name: course_name_for(courses, course_id),
        profile_image: uploaded.unwrap_or_else(|| original.profile_image.clone()),
        is_active: form.is_active,
        ..original.clone()
    })
}
