use crate::model::{Analytics, Student};
use indexmap::IndexMap;
use tracing::{debug, warn};
use uuid::Uuid;

/// In-memory roster: the student list plus the course filter cursor.
///
/// Insertion order is display order. Every read of [`RosterStore::students`]
/// and [`RosterStore::analytics`] is derived from the current list, so there
/// is nothing to invalidate after a mutation.
#[derive(Debug, Clone, Default)]
pub struct RosterStore {
    students: Vec<Student>,
    selected_course_id: Option<i64>,
}

impl RosterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_students(students: Vec<Student>) -> Self {
        Self {
            students,
            selected_course_id: None,
        }
    }

    /// Store preloaded with the two demo records.
    pub fn seeded() -> Self {
        Self::with_students(seed_students())
    }

    /// Issues an identity for a new record. Random 128-bit, so rapid
    /// successive adds cannot collide the way clock-derived ids do.
    pub fn next_student_id(&self) -> String {
        Uuid::new_v4().to_string()
    }

    /// Appends without validation. A duplicate `id` is a caller bug; it is
    /// logged and the record is still appended.
    pub fn add_student(&mut self, student: Student) {
        if self.students.iter().any(|s| s.id == student.id) {
            warn!(id = %student.id, "adding student with an id already on the roster");
        }
        debug!(id = %student.id, course_id = student.course_id, "student added");
        self.students.push(student);
    }

    /// Overwrites the record with the same `id` in place. Unknown ids are a
    /// no-op. Returns whether a record was replaced.
    pub fn update_student(&mut self, student: Student) -> bool {
        match self.students.iter_mut().find(|s| s.id == student.id) {
            Some(slot) => {
                debug!(id = %student.id, "student updated");
                *slot = student;
                true
            }
            None => {
                debug!(id = %student.id, "update ignored, no such student");
                false
            }
        }
    }

    /// Flips `is_active`. Returns the new value, or `None` when the id is
    /// not on the roster (nothing changes in that case).
    pub fn toggle_student_status(&mut self, id: &str) -> Option<bool> {
        let student = self.students.iter_mut().find(|s| s.id == id)?;
        student.is_active = !student.is_active;
        debug!(id, is_active = student.is_active, "student status toggled");
        Some(student.is_active)
    }

    pub fn set_selected_course_id(&mut self, course_id: Option<i64>) {
        self.selected_course_id = course_id;
    }

    pub fn selected_course_id(&self) -> Option<i64> {
        self.selected_course_id
    }

    pub fn all_students(&self) -> &[Student] {
        &self.students
    }

    /// Filtered view: everything when no course is selected, otherwise the
    /// in-order subsequence enrolled in the selected course.
    pub fn students(&self) -> Vec<&Student> {
        match self.selected_course_id {
            None => self.students.iter().collect(),
            Some(course_id) => self
                .students
                .iter()
                .filter(|s| s.course_id == course_id)
                .collect(),
        }
    }

    pub fn student(&self, id: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    pub fn enrollment_for_course(&self, course_id: i64) -> usize {
        self.students
            .iter()
            .filter(|s| s.course_id == course_id)
            .count()
    }

    /// Always computed from the full roster; the cursor has no effect.
    pub fn analytics(&self) -> Analytics {
        let total_students = self.students.len();
        let active_students = self.students.iter().filter(|s| s.is_active).count();

        let mut course_stats: IndexMap<String, usize> = IndexMap::new();
        for s in &self.students {
            *course_stats.entry(s.course_name.clone()).or_insert(0) += 1;
        }

        Analytics {
            total_students,
            active_students,
            inactive_students: total_students - active_students,
            course_stats,
        }
    }
}

fn seed_students() -> Vec<Student> {
    vec![
        Student {
            id: "1".into(),
            student_id: "STU001".into(),
            name: "Sarah Johnson".into(),
            email: "sarah.johnson@email.com".into(),
            phone: "+1 (555) 123-4567".into(),
            course_id: 4,
            course_name: "React In Depth".into(),
            profile_image: "https://images.pexels.com/photos/774909/pexels-photo-774909.jpeg?auto=compress&cs=tinysrgb&w=150&h=150&fit=crop".into(),
            is_active: true,
            enrollment_date: "2024-01-15".into(),
        },
        Student {
            id: "2".into(),
            student_id: "STU002".into(),
            name: "Michael Chen".into(),
            email: "michael.chen@email.com".into(),
            phone: "+1 (555) 234-5678".into(),
            course_id: 3,
            course_name: "JavaScript Pro".into(),
            profile_image: "https://images.pexels.com/photos/1239291/pexels-photo-1239291.jpeg?auto=compress&cs=tinysrgb&w=150&h=150&fit=crop".into(),
            is_active: true,
            enrollment_date: "2024-02-01".into(),
        },
    ]
}
