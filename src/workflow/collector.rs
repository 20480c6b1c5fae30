//! Answer collector
//!
//! Holds the student's in-progress answers for one assignment. Every
//! mutation is rejected (returns `false`) once the collector is locked, and
//! out-of-range indices or unknown ids are ignored.

use std::collections::BTreeMap;
use std::mem;

use crate::error::{AppError, AppResult, ValidationError};
use crate::models::{AnswerSheet, Assignment, DragItem, StudentAssignment};

/// Sparse answers keyed by exercise index (or drop-zone id)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSet {
    /// question index → option index
    pub choices: BTreeMap<usize, usize>,
    /// coding exercise index → source
    pub code: BTreeMap<usize, String>,
    /// zone id → item id
    pub placements: BTreeMap<String, String>,
    /// read activity index → chosen word
    pub words: BTreeMap<usize, String>,
    /// spelling exercise index → typed or chosen spelling
    pub spelling: BTreeMap<usize, String>,
}

impl AnswerSet {
    /// Rebuilds answers from what the backend stored for a completed assignment
    ///
    /// `-1` choices and blank strings are gaps.
    pub fn from_stored(stored: &StudentAssignment) -> Self {
        let mut set = AnswerSet::default();
        if let Some(answers) = &stored.answers {
            for (index, &choice) in answers.iter().enumerate() {
                if let Ok(choice) = usize::try_from(choice) {
                    set.choices.insert(index, choice);
                }
            }
        }
        set.code = dense_to_sparse(stored.coding_answers.as_deref());
        if let Some(placements) = &stored.drag_drop_answer {
            set.placements = placements.clone();
        }
        set.words = dense_to_sparse(stored.interactive_word_answers.as_deref());
        set.spelling = dense_to_sparse(stored.spelling_answers.as_deref());
        set
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
            && self.code.is_empty()
            && self.placements.is_empty()
            && self.words.is_empty()
            && self.spelling.is_empty()
    }
}

fn dense_to_sparse(values: Option<&[String]>) -> BTreeMap<usize, String> {
    values
        .unwrap_or_default()
        .iter()
        .enumerate()
        .filter(|(_, value)| !value.trim().is_empty())
        .map(|(index, value)| (index, value.clone()))
        .collect()
}

/// In-progress answers bound to one assignment
#[derive(Debug, Clone)]
pub struct AnswerCollector {
    assignment: Assignment,
    answers: AnswerSet,
    locked: bool,
}

impl AnswerCollector {
    /// # Arguments
    /// - `assignment`: shape the answers are checked against
    /// - `completed`: a completed assignment starts locked
    pub fn new(assignment: &Assignment, completed: bool) -> Self {
        Self {
            assignment: assignment.clone(),
            answers: AnswerSet::default(),
            locked: completed,
        }
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Last selection wins
    pub fn select_option(&mut self, question: usize, option: usize) -> bool {
        if self.locked {
            return false;
        }
        match self.assignment.questions.get(question) {
            Some(q) if option < q.options.len() => {
                self.answers.choices.insert(question, option);
                true
            }
            _ => false,
        }
    }

    pub fn set_code(&mut self, exercise: usize, source: impl Into<String>) -> bool {
        if self.locked || exercise >= self.assignment.coding_exercises.len() {
            return false;
        }
        self.answers.code.insert(exercise, source.into());
        true
    }

    /// Effective source: the student's edit, else the starter code, else empty
    pub fn code_for(&self, exercise: usize) -> Option<&str> {
        let starter = &self.assignment.coding_exercises.get(exercise)?.starter_code;
        Some(
            self.answers
                .code
                .get(&exercise)
                .map(String::as_str)
                .or(starter.as_deref())
                .unwrap_or(""),
        )
    }

    /// Places `item_id` in `zone_id`, taking it out of any other zone
    ///
    /// An item the zone already holds is a no-op (`false`). An item
    /// previously in the target zone goes back to the pool.
    pub fn drop_item(&mut self, zone_id: &str, item_id: &str) -> bool {
        if self.locked {
            return false;
        }
        let Some(puzzle) = &self.assignment.drag_drop_puzzle else {
            return false;
        };
        let zone_known = puzzle.zones.iter().any(|z| z.id == zone_id);
        let item_known = puzzle.items.iter().any(|i| i.id == item_id);
        if !zone_known || !item_known {
            return false;
        }
        if self.answers.placements.get(zone_id).map(String::as_str) == Some(item_id) {
            return false;
        }
        self.answers.placements.retain(|_, placed| placed != item_id);
        self.answers
            .placements
            .insert(zone_id.to_string(), item_id.to_string());
        true
    }

    pub fn remove_item(&mut self, zone_id: &str) -> bool {
        if self.locked {
            return false;
        }
        self.answers.placements.remove(zone_id).is_some()
    }

    pub fn item_in(&self, zone_id: &str) -> Option<&str> {
        self.answers.placements.get(zone_id).map(String::as_str)
    }

    /// Items not placed in any zone, in puzzle order
    pub fn unplaced_items(&self) -> Vec<&DragItem> {
        let Some(puzzle) = &self.assignment.drag_drop_puzzle else {
            return Vec::new();
        };
        puzzle
            .items
            .iter()
            .filter(|item| !self.answers.placements.values().any(|placed| placed == &item.id))
            .collect()
    }

    /// Blank input clears the activity
    pub fn select_word(&mut self, activity: usize, word: &str) -> bool {
        if self.locked || activity >= self.assignment.read_activity_count() {
            return false;
        }
        set_or_clear(&mut self.answers.words, activity, word);
        true
    }

    /// Blank input clears the exercise
    pub fn set_spelling(&mut self, exercise: usize, text: &str) -> bool {
        if self.locked || exercise >= self.assignment.spelling_exercises.len() {
            return false;
        }
        set_or_clear(&mut self.answers.spelling, exercise, text);
        true
    }

    pub fn answered_questions(&self) -> usize {
        self.answers.choices.len()
    }

    pub fn answered_coding(&self) -> usize {
        self.answers.code.len()
    }

    pub fn placed_zones(&self) -> usize {
        self.answers.placements.len()
    }

    pub fn answered_words(&self) -> usize {
        self.answers.words.len()
    }

    pub fn answered_spelling(&self) -> usize {
        self.answers.spelling.len()
    }

    /// Hands the answers over and leaves the collector empty
    pub fn take(&mut self) -> AnswerSet {
        mem::take(&mut self.answers)
    }

    pub fn clear(&mut self) {
        self.answers = AnswerSet::default();
    }

    /// Applies an answer sheet through the regular mutators
    ///
    /// # Returns
    /// Number of answers applied; any entry the assignment cannot take is an error
    pub fn apply_sheet(&mut self, sheet: &AnswerSheet) -> AppResult<usize> {
        if self.locked {
            return Ok(0);
        }
        let mut applied = 0;

        for (question, option) in AnswerSheet::positions("choices", &sheet.choices)? {
            applied += require(self.select_option(question, option), "choices", question)?;
        }
        for (exercise, source) in AnswerSheet::positions("code", &sheet.code)? {
            applied += require(self.set_code(exercise, source), "code", exercise)?;
        }
        for (zone, item) in &sheet.placements {
            let placed = self.drop_item(zone, item) || self.item_in(zone) == Some(item.as_str());
            if !placed {
                return Err(invalid_sheet(format!(
                    "[placements] cannot put '{}' in zone '{}'",
                    item, zone
                )));
            }
            applied += 1;
        }
        for (activity, word) in AnswerSheet::positions("words", &sheet.words)? {
            applied += require(self.select_word(activity, &word), "words", activity)?;
        }
        for (exercise, text) in AnswerSheet::positions("spelling", &sheet.spelling)? {
            applied += require(self.set_spelling(exercise, &text), "spelling", exercise)?;
        }

        Ok(applied)
    }
}

fn require(accepted: bool, section: &str, index: usize) -> AppResult<usize> {
    if accepted {
        Ok(1)
    } else {
        Err(invalid_sheet(format!(
            "[{}] entry {} does not match the assignment",
            section,
            index + 1
        )))
    }
}

fn set_or_clear(map: &mut BTreeMap<usize, String>, index: usize, value: &str) {
    let value = value.trim();
    if value.is_empty() {
        map.remove(&index);
    } else {
        map.insert(index, value.to_string());
    }
}

fn invalid_sheet(detail: String) -> AppError {
    ValidationError::InvalidAnswerSheet { detail }.into()
}
