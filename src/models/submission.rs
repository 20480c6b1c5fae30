use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Body of `POST /student/assignments/submit`
///
/// Sections the assignment does not have are sent as explicit `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub student_assignment_id: String,
    /// One option index per question, `-1` for unanswered
    pub answers: Option<Vec<i64>>,
    pub coding_answers: Option<Vec<String>>,
    /// zone id → item id
    pub drag_drop_answer: Option<BTreeMap<String, String>>,
    pub interactive_word_answers: Option<Vec<String>>,
    pub spelling_answers: Option<Vec<String>>,
}

/// Generic `{message}` acknowledgement
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub message: Option<String>,
}
