use std::fmt;

use serde::{Deserialize, Serialize};

pub type EntityId = i64;

/// Anything kept in an [`crate::store::EntityStore`] is addressed by the
/// identity the remote store assigned to it.
pub trait Record: Clone {
    fn id(&self) -> EntityId;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: EntityId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: String,
}

impl Student {
    pub fn full_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.first_name, self.last_name)
    }
}

impl Record for Student {
    fn id(&self) -> EntityId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: EntityId,
    pub name: String,
    /// Server-side denormalization, display only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub students: Option<Vec<Student>>,
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl Record for Subject {
    fn id(&self) -> EntityId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grade {
    pub id: EntityId,
    pub student_id: EntityId,
    pub subject_id: EntityId,
    pub grade: f64,
}

impl Grade {
    pub fn matches(&self, student_id: EntityId, subject_id: EntityId) -> bool {
        self.student_id == student_id && self.subject_id == subject_id
    }
}

impl Record for Grade {
    fn id(&self) -> EntityId {
        self.id
    }
}

// --- request payloads ---

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStudent {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewSubject {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectUpdate {
    pub id: EntityId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGrade {
    pub value: f64,
    pub student_id: EntityId,
    pub subject_id: EntityId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeUpdate {
    pub id: EntityId,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub subject_id: EntityId,
    pub student_ids: Vec<EntityId>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct IdBody {
    pub id: EntityId,
}

// --- response payloads ---

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn student_uses_camel_case_on_the_wire() {
        let student: Student = serde_json::from_str(
            r#"{"id":3,"firstName":"Ada","lastName":"Lovelace","email":"ada@example.com"}"#,
        )
        .unwrap();
        assert_eq!(student.first_name, "Ada");
        assert_eq!(student.full_name(), "Ada Lovelace");
    }

    #[test]
    fn subject_without_embedded_students_decodes() {
        let subject: Subject = serde_json::from_str(r#"{"id":10,"name":"Math"}"#).unwrap();
        assert!(subject.students.is_none());
    }

    #[test]
    fn new_grade_body_carries_value_and_foreign_keys() {
        let body = serde_json::to_value(NewGrade { value: 4.5, student_id: 1, subject_id: 10 }).unwrap();
        assert_eq!(body, serde_json::json!({"value": 4.5, "studentId": 1, "subjectId": 10}));
    }
}
