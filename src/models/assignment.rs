use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use super::serde_helpers::{null_as_default, optional_timestamp};
use super::subject::Subject;

/// Teacher-authored exercise bundle
///
/// Immutable from the student's side. Every exercise collection is optional;
/// missing or `null` collections come back empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub subject: String,
    pub grade_level: String,
    pub topic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading_passage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "optional_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub questions: Vec<Question>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub coding_exercises: Vec<CodingExercise>,
    #[serde(default)]
    pub drag_drop_puzzle: Option<DragDropPuzzle>,
    #[serde(default)]
    pub learn_to_read_content: Option<LearnToReadContent>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub spelling_exercises: Vec<SpellingExercise>,
}

/// Multiple-choice question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    pub options: Vec<String>,
    /// Index into `options`
    pub correct_answer: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodingExercise {
    pub prompt: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub starter_code: Option<String>,
    /// Reference solution, revealed after completion
    #[serde(default)]
    pub correct_answer: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
}

fn default_language() -> String {
    "python".to_string()
}

/// Items are dropped into labeled zones
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragDropPuzzle {
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<DragItem>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub zones: Vec<DropZone>,
    #[serde(default)]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragItem {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropZone {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub correct_item_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnToReadContent {
    #[serde(default)]
    pub passage: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub activities: Vec<WordActivity>,
}

/// "Click the word that ..." activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordActivity {
    pub instruction: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub words: Vec<String>,
    pub correct_word: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpellingExerciseType {
    /// Pick the correct spelling among options
    MultipleChoice,
    /// Type the word that was read out
    TypeWord,
    /// Complete the sentence
    FillBlank,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpellingExercise {
    pub exercise_type: SpellingExerciseType,
    #[serde(default)]
    pub word: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub options: Vec<String>,
    pub correct_answer: String,
}

impl Assignment {
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// Zones declared by the drag-drop puzzle (0 without one)
    pub fn zone_count(&self) -> usize {
        self.drag_drop_puzzle.as_ref().map_or(0, |p| p.zones.len())
    }

    pub fn read_activity_count(&self) -> usize {
        self.learn_to_read_content.as_ref().map_or(0, |c| c.activities.len())
    }

    /// True when there is nothing to answer at all
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
            && self.coding_exercises.is_empty()
            && self.zone_count() == 0
            && self.read_activity_count() == 0
            && self.spelling_exercises.is_empty()
    }

    pub fn subject_kind(&self) -> Option<Subject> {
        Subject::find(&self.subject)
    }

    /// Embeddable form of `youtube_url` (`watch?v=ID` and `youtu.be/ID` → `embed/ID`)
    pub fn youtube_embed_url(&self) -> Option<String> {
        let url = self.youtube_url.as_deref()?.trim();
        if url.is_empty() {
            return None;
        }
        let id = youtube_id_pattern()
            .and_then(|re| re.captures(url))
            .and_then(|c| c.get(1));
        match id {
            Some(id) => Some(format!("https://www.youtube.com/embed/{}", id.as_str())),
            None => Some(url.to_string()),
        }
    }
}

fn youtube_id_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(
                r"(?:youtube\.com/watch\?(?:.*&)?v=|youtu\.be/|youtube\.com/embed/)([A-Za-z0-9_-]{6,})",
            )
            .ok()
        })
        .as_ref()
}

impl SpellingExercise {
    /// Prompt shown to the student
    pub fn display_prompt(&self) -> String {
        match (&self.prompt, &self.word, self.exercise_type) {
            (Some(prompt), _, _) => prompt.clone(),
            (None, Some(word), SpellingExerciseType::TypeWord) => {
                format!("Spell the word: {}", word)
            }
            (None, _, SpellingExerciseType::MultipleChoice) => {
                "Choose the correct spelling".to_string()
            }
            _ => "Spell the word".to_string(),
        }
    }
}
