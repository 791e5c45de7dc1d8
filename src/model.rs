use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub name: String,
}

impl Course {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// One roster record.
///
/// `course_name` is a snapshot taken when the course was assigned; it is not
/// re-read from the catalog afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub student_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub course_id: i64,
    pub course_name: String,
    pub profile_image: String,
    pub is_active: bool,
    pub enrollment_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub total_students: usize,
    pub active_students: usize,
    pub inactive_students: usize,
    /// Keyed by denormalized course name, so ids sharing a name share a
    /// bucket. Buckets keep the roster order in which each name first appears.
    pub course_stats: IndexMap<String, usize>,
}
