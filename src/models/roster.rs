//! Teacher-side records: students, authoring requests and the gradebook

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::serde_helpers::{null_as_default, optional_timestamp};
use super::subject::Subject;
use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    #[serde(default)]
    pub teacher_id: Option<String>,
    #[serde(default, deserialize_with = "optional_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewStudent {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub password: String,
}

impl NewStudent {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let fields = [&self.first_name, &self.last_name, &self.username, &self.password];
        if fields.iter().any(|f| f.trim().is_empty()) {
            return Err(ValidationError::MissingFields { form: "student" });
        }
        Ok(())
    }
}

/// `POST /assignments/generate`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignmentRequest {
    pub subject: String,
    pub grade_level: String,
    pub topic: String,
    /// 1–4, only for Learn to Code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coding_level: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube_url: Option<String>,
}

impl AssignmentRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let fields = [&self.subject, &self.grade_level, &self.topic];
        if fields.iter().any(|f| f.trim().is_empty()) {
            return Err(ValidationError::MissingFields { form: "assignment" });
        }
        let needs_level = Subject::find(&self.subject).is_some_and(Subject::requires_coding_level);
        if needs_level && !matches!(self.coding_level, Some(1..=4)) {
            return Err(ValidationError::MissingCodingLevel);
        }
        Ok(())
    }
}

/// `POST /assignments/assign`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignRequest {
    pub assignment_id: String,
    pub student_ids: Vec<String>,
}

impl AssignRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.student_ids.is_empty() {
            return Err(ValidationError::NoStudentsSelected);
        }
        Ok(())
    }
}

/// One student's row in the gradebook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradebookEntry {
    pub student: Student,
    #[serde(default, deserialize_with = "null_as_default")]
    pub assignments: Vec<GradedAssignment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradedAssignment {
    pub assignment_title: String,
    pub subject: String,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default, deserialize_with = "optional_timestamp")]
    pub submitted_at: Option<DateTime<Utc>>,
}
