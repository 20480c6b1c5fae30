//! Lesson plans a teacher generates for their own preparation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::serde_helpers::optional_timestamp;
use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonPlan {
    pub id: String,
    pub title: String,
    pub subject: String,
    pub grade_level: String,
    pub topic: String,
    /// Free-form text produced by the backend
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub teacher_id: Option<String>,
    #[serde(default, deserialize_with = "optional_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

/// `POST /lesson-plans/generate`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LessonPlanRequest {
    pub subject: String,
    pub grade_level: String,
    pub topic: String,
}

impl LessonPlanRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let fields = [&self.subject, &self.grade_level, &self.topic];
        if fields.iter().any(|f| f.trim().is_empty()) {
            return Err(ValidationError::MissingFields { form: "lesson plan" });
        }
        Ok(())
    }
}
