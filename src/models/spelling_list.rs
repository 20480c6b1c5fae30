use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::serde_helpers::{null_as_default, optional_timestamp};
use crate::error::ValidationError;

/// Words per list
pub const WORDS_PER_LIST: usize = 10;

/// Weekly spelling words for one student
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpellingWordList {
    pub id: String,
    pub student_id: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub words: Vec<String>,
    #[serde(default)]
    pub student_name: Option<String>,
    #[serde(default, deserialize_with = "optional_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpellingWordListDraft {
    pub student_id: String,
    pub name: String,
    pub words: Vec<String>,
}

impl SpellingWordListDraft {
    /// Words are trimmed; exactly ten non-blank words are required
    pub fn new(student_id: impl Into<String>, name: impl Into<String>, words: Vec<String>) -> Self {
        Self {
            student_id: student_id.into(),
            name: name.into(),
            words: words.into_iter().map(|w| w.trim().to_string()).collect(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.student_id.trim().is_empty() || self.name.trim().is_empty() {
            return Err(ValidationError::MissingFields {
                form: "spelling word list",
            });
        }
        if self.words.len() != WORDS_PER_LIST || self.words.iter().any(|w| w.is_empty()) {
            return Err(ValidationError::WordListSize {
                expected: WORDS_PER_LIST,
            });
        }
        Ok(())
    }
}
