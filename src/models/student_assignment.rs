use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::assignment::Assignment;
use super::serde_helpers::optional_timestamp;

/// An assignment bound to one student
///
/// Moves from assigned to completed exactly once, through a single submit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentAssignment {
    pub student_assignment_id: String,
    pub assignment: Assignment,
    #[serde(default)]
    pub completed: bool,
    /// 0–100, `None` until completed
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default, deserialize_with = "optional_timestamp")]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "optional_timestamp")]
    pub assigned_at: Option<DateTime<Utc>>,

    // Stored answers, echoed by the backend for completed work
    #[serde(default)]
    pub answers: Option<Vec<i64>>,
    #[serde(default)]
    pub coding_answers: Option<Vec<String>>,
    #[serde(default)]
    pub drag_drop_answer: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub interactive_word_answers: Option<Vec<String>>,
    #[serde(default)]
    pub spelling_answers: Option<Vec<String>>,
}

impl StudentAssignment {
    pub fn id(&self) -> &str {
        &self.student_assignment_id
    }

    pub fn title(&self) -> &str {
        &self.assignment.title
    }

    /// Submit is only offered while not completed
    pub fn is_submittable(&self) -> bool {
        !self.completed
    }

    /// Local transition after the backend accepted a submit
    ///
    /// A completed assignment keeps its original score and timestamp.
    pub fn mark_completed(&mut self, score: f64, submitted_at: DateTime<Utc>) {
        if self.completed {
            return;
        }
        self.completed = true;
        self.score = Some(score);
        self.submitted_at = Some(submitted_at);
    }

    pub fn has_stored_answers(&self) -> bool {
        self.answers.is_some()
            || self.coding_answers.is_some()
            || self.drag_drop_answer.is_some()
            || self.interactive_word_answers.is_some()
            || self.spelling_answers.is_some()
    }
}

/// Backend reply to a submit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub score: f64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub correct_answers: Option<u32>,
    #[serde(default)]
    pub total_questions: Option<u32>,
}
