//! Submission validator
//!
//! Pure completeness checks, run before anything is serialized or sent.

use std::fmt;

use crate::error::{AppResult, BusinessError, ValidationError};
use crate::models::{Assignment, StudentAssignment};
use crate::workflow::collector::AnswerSet;

/// Answered vs. expected for one exercise collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub answered: usize,
    pub total: usize,
}

impl Progress {
    /// Counts the answered positions that fall inside `0..total`
    fn of<'a>(answered: impl Iterator<Item = &'a usize>, total: usize) -> Self {
        Self {
            answered: answered.filter(|&&i| i < total).count(),
            total,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.answered >= self.total
    }
}

/// Per-collection progress of an in-progress assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Readiness {
    pub questions: Progress,
    pub coding: Progress,
    pub puzzle: Progress,
    pub reading: Progress,
    pub spelling: Progress,
}

impl Readiness {
    /// Counts only entries the assignment actually declares
    pub fn measure(assignment: &Assignment, answers: &AnswerSet) -> Self {
        let zones: Vec<&str> = assignment
            .drag_drop_puzzle
            .as_ref()
            .map(|p| p.zones.iter().map(|z| z.id.as_str()).collect())
            .unwrap_or_default();

        Self {
            questions: Progress::of(answers.choices.keys(), assignment.question_count()),
            coding: Progress::of(answers.code.keys(), assignment.coding_exercises.len()),
            puzzle: Progress {
                answered: zones.iter().filter(|z| answers.placements.contains_key(**z)).count(),
                total: zones.len(),
            },
            reading: Progress::of(answers.words.keys(), assignment.read_activity_count()),
            spelling: Progress::of(answers.spelling.keys(), assignment.spelling_exercises.len()),
        }
    }

    /// First incomplete collection, in display order
    pub fn check(&self) -> Result<(), ValidationError> {
        let Readiness {
            questions,
            coding,
            puzzle,
            reading,
            spelling,
        } = *self;

        if !questions.is_complete() {
            return Err(ValidationError::IncompleteQuestions {
                answered: questions.answered,
                total: questions.total,
            });
        }
        if !coding.is_complete() {
            return Err(ValidationError::IncompleteCoding {
                answered: coding.answered,
                total: coding.total,
            });
        }
        if !puzzle.is_complete() {
            return Err(ValidationError::IncompletePuzzle {
                placed: puzzle.answered,
                total: puzzle.total,
            });
        }
        if !reading.is_complete() {
            return Err(ValidationError::IncompleteReading {
                answered: reading.answered,
                total: reading.total,
            });
        }
        if !spelling.is_complete() {
            return Err(ValidationError::IncompleteSpelling {
                answered: spelling.answered,
                total: spelling.total,
            });
        }
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.check().is_ok()
    }
}

impl fmt::Display for Readiness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = [
            ("Questions", self.questions),
            ("Coding exercises", self.coding),
            ("Drop zones", self.puzzle),
            ("Reading activities", self.reading),
            ("Spelling exercises", self.spelling),
        ];
        for (label, progress) in rows.iter().filter(|(_, p)| p.total > 0) {
            let mark = if progress.is_complete() { "✓" } else { "…" };
            writeln!(f, "{} {}: {}/{}", mark, label, progress.answered, progress.total)?;
        }
        Ok(())
    }
}

/// Validates a submit attempt
///
/// A completed assignment is rejected before any completeness check.
pub fn validate(student_assignment: &StudentAssignment, answers: &AnswerSet) -> AppResult<()> {
    if student_assignment.completed {
        return Err(BusinessError::AlreadySubmitted {
            id: student_assignment.id().to_string(),
        }
        .into());
    }
    Readiness::measure(&student_assignment.assignment, answers).check()?;
    Ok(())
}
