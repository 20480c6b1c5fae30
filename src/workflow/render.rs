//! Result renderer
//!
//! Produces read-only views of a student assignment. Rendering is a pure
//! function of its input.

use chrono::{DateTime, Utc};
use std::fmt;

use crate::models::{display_score, Assignment, LetterGrade, StudentAssignment, Subject};
use crate::workflow::collector::AnswerSet;
use crate::workflow::validator::Readiness;

/// What the assignment screen shows
#[derive(Debug, Clone, PartialEq)]
pub enum AssignmentView {
    /// Unknown id; offers the way back to the list
    NotFound { assignment_id: String },
    InProgress(InProgressView),
    Completed(CompletedReport),
}

impl AssignmentView {
    pub fn not_found(assignment_id: impl Into<String>) -> Self {
        AssignmentView::NotFound {
            assignment_id: assignment_id.into(),
        }
    }

    /// Completed assignments render as a report, the rest as a worksheet
    ///
    /// # Arguments
    /// - `student_assignment`: latest known state
    /// - `answers`: the collector's answers, or the submitted snapshot
    pub fn render(student_assignment: &StudentAssignment, answers: &AnswerSet) -> Self {
        if student_assignment.completed {
            AssignmentView::Completed(CompletedReport::build(student_assignment, answers))
        } else {
            AssignmentView::InProgress(InProgressView::build(student_assignment, answers))
        }
    }
}

/// Answers to annotate a completed assignment with
///
/// Answers stored by the backend win over the local snapshot.
pub fn completed_answers(
    student_assignment: &StudentAssignment,
    snapshot: Option<&AnswerSet>,
) -> AnswerSet {
    if student_assignment.has_stored_answers() {
        AnswerSet::from_stored(student_assignment)
    } else {
        snapshot.cloned().unwrap_or_default()
    }
}

// ========== In progress ==========

#[derive(Debug, Clone, PartialEq)]
pub struct InProgressView {
    pub header: Header,
    pub readiness: Readiness,
    pub questions: Vec<QuestionPrompt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuestionPrompt {
    pub prompt: String,
    pub options: Vec<String>,
    pub selected: Option<usize>,
}

impl InProgressView {
    fn build(student_assignment: &StudentAssignment, answers: &AnswerSet) -> Self {
        let assignment = &student_assignment.assignment;
        Self {
            header: Header::build(student_assignment),
            readiness: Readiness::measure(assignment, answers),
            questions: assignment
                .questions
                .iter()
                .enumerate()
                .map(|(i, q)| QuestionPrompt {
                    prompt: q.question.clone(),
                    options: q.options.clone(),
                    selected: answers.choices.get(&i).copied(),
                })
                .collect(),
        }
    }
}

/// Title block shared by both modes
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub title: String,
    pub subject: String,
    pub grade_level: String,
    pub video: Option<String>,
    /// (heading, text)
    pub passage: Option<(String, String)>,
}

impl Header {
    fn build(student_assignment: &StudentAssignment) -> Self {
        let assignment = &student_assignment.assignment;
        let heading = assignment
            .subject_kind()
            .map_or("Reading Passage", Subject::passage_heading);
        Self {
            title: assignment.title.clone(),
            subject: assignment.subject.clone(),
            grade_level: assignment.grade_level.clone(),
            video: assignment.youtube_embed_url(),
            passage: passage_text(assignment).map(|text| (heading.to_string(), text)),
        }
    }
}

fn passage_text(assignment: &Assignment) -> Option<String> {
    assignment
        .reading_passage
        .clone()
        .or_else(|| assignment.learn_to_read_content.as_ref()?.passage.clone())
        .filter(|text| !text.trim().is_empty())
}

// ========== Completed ==========

/// How one option is shown after submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionMark {
    Correct,
    SelectedIncorrect,
    Neutral,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuestionReport {
    pub prompt: String,
    pub options: Vec<(String, OptionMark)>,
    pub selected: Option<usize>,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CodingReport {
    pub prompt: String,
    pub submitted: String,
    pub reference: Option<String>,
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ZoneReport {
    pub label: String,
    /// Text of the item placed there
    pub placed: Option<String>,
    pub expected: Option<String>,
    /// `None` when the zone declares no correct item
    pub is_correct: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PuzzleReport {
    pub zones: Vec<ZoneReport>,
    pub explanation: Option<String>,
}

/// Word activity or spelling exercise outcome
#[derive(Debug, Clone, PartialEq)]
pub struct WordReport {
    pub prompt: String,
    pub answer: Option<String>,
    pub target: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletedReport {
    pub header: Header,
    pub score: Option<f64>,
    pub grade: Option<LetterGrade>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub questions: Vec<QuestionReport>,
    pub coding: Vec<CodingReport>,
    pub puzzle: Option<PuzzleReport>,
    pub words: Vec<WordReport>,
    pub spelling: Vec<WordReport>,
}

impl CompletedReport {
    pub fn build(student_assignment: &StudentAssignment, answers: &AnswerSet) -> Self {
        let assignment = &student_assignment.assignment;

        let questions = assignment
            .questions
            .iter()
            .enumerate()
            .map(|(i, q)| {
                let selected = answers.choices.get(&i).copied();
                let options = q
                    .options
                    .iter()
                    .enumerate()
                    .map(|(o, text)| {
                        let mark = if o == q.correct_answer {
                            OptionMark::Correct
                        } else if Some(o) == selected {
                            OptionMark::SelectedIncorrect
                        } else {
                            OptionMark::Neutral
                        };
                        (text.clone(), mark)
                    })
                    .collect();
                QuestionReport {
                    prompt: q.question.clone(),
                    options,
                    selected,
                    is_correct: selected == Some(q.correct_answer),
                }
            })
            .collect();

        let coding = assignment
            .coding_exercises
            .iter()
            .enumerate()
            .map(|(i, ex)| CodingReport {
                prompt: ex.prompt.clone(),
                submitted: answers.code.get(&i).cloned().unwrap_or_default(),
                reference: ex.correct_answer.clone(),
                explanation: ex.explanation.clone(),
            })
            .collect();

        let puzzle = assignment.drag_drop_puzzle.as_ref().map(|puzzle| {
            let item_text = |id: &str| {
                puzzle
                    .items
                    .iter()
                    .find(|item| item.id == id)
                    .map_or_else(|| id.to_string(), |item| item.text.clone())
            };
            PuzzleReport {
                zones: puzzle
                    .zones
                    .iter()
                    .map(|zone| {
                        let placed_id = answers.placements.get(&zone.id);
                        ZoneReport {
                            label: zone.label.clone(),
                            placed: placed_id.map(|id| item_text(id.as_str())),
                            expected: zone.correct_item_id.as_deref().map(item_text),
                            is_correct: zone
                                .correct_item_id
                                .as_ref()
                                .map(|expected| placed_id == Some(expected)),
                        }
                    })
                    .collect(),
                explanation: puzzle.explanation.clone(),
            }
        });

        let words = assignment
            .learn_to_read_content
            .iter()
            .flat_map(|content| content.activities.iter())
            .enumerate()
            .map(|(i, activity)| {
                word_report(&activity.instruction, answers.words.get(&i), &activity.correct_word)
            })
            .collect();

        let spelling = assignment
            .spelling_exercises
            .iter()
            .enumerate()
            .map(|(i, ex)| {
                word_report(&ex.display_prompt(), answers.spelling.get(&i), &ex.correct_answer)
            })
            .collect();

        Self {
            header: Header::build(student_assignment),
            score: student_assignment.score,
            grade: student_assignment.score.map(LetterGrade::from_score),
            submitted_at: student_assignment.submitted_at,
            questions,
            coding,
            puzzle,
            words,
            spelling,
        }
    }

    pub fn correct_questions(&self) -> usize {
        self.questions.iter().filter(|q| q.is_correct).count()
    }
}

fn word_report(prompt: &str, answer: Option<&String>, target: &str) -> WordReport {
    WordReport {
        prompt: prompt.to_string(),
        answer: answer.cloned(),
        target: target.to_string(),
        is_correct: answer.is_some_and(|a| words_match(a, target)),
    }
}

/// Case-insensitive comparison ignoring surrounding whitespace
pub fn words_match(answer: &str, target: &str) -> bool {
    answer.trim().to_lowercase() == target.trim().to_lowercase()
}

// ========== Text output ==========

impl fmt::Display for AssignmentView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssignmentView::NotFound { assignment_id } => {
                writeln!(f, "Assignment not found ({}).", assignment_id)?;
                writeln!(f, "Run `homeschool assignments` to go back to your assignment list.")
            }
            AssignmentView::InProgress(view) => write!(f, "{}", view),
            AssignmentView::Completed(report) => write!(f, "{}", report),
        }
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "📘 {}", self.title)?;
        writeln!(f, "   {} · Grade {}", self.subject, self.grade_level)?;
        if let Some(video) = &self.video {
            writeln!(f, "   Video: {}", video)?;
        }
        if let Some((heading, text)) = &self.passage {
            writeln!(f, "\n{}\n{}", heading, text)?;
        }
        Ok(())
    }
}

impl fmt::Display for InProgressView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.header)?;
        for (i, q) in self.questions.iter().enumerate() {
            writeln!(f, "\n{}. {}", i + 1, q.prompt)?;
            for (o, option) in q.options.iter().enumerate() {
                let marker = if q.selected == Some(o) { "(•)" } else { "( )" };
                writeln!(f, "   {} {}. {}", marker, o, option)?;
            }
        }
        writeln!(f)?;
        write!(f, "{}", self.readiness)?;
        if self.readiness.is_ready() {
            writeln!(f, "Ready to submit. Answers cannot be changed after submitting.")?;
        }
        Ok(())
    }
}

impl fmt::Display for CompletedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.header)?;
        match (self.score, self.grade) {
            (Some(score), Some(grade)) => writeln!(
                f,
                "\n🏆 Score: {}% ({}, {})",
                display_score(score),
                grade,
                grade.remark()
            )?,
            _ => writeln!(f, "\n🏆 Score: pending")?,
        }
        if let Some(at) = self.submitted_at {
            writeln!(f, "   Submitted on {}", at.format("%Y-%m-%d at %H:%M"))?;
        }

        for (i, q) in self.questions.iter().enumerate() {
            writeln!(f, "\n{} {}. {}", tick(q.is_correct), i + 1, q.prompt)?;
            for (text, mark) in &q.options {
                let marker = match mark {
                    OptionMark::Correct => "✓",
                    OptionMark::SelectedIncorrect => "✗",
                    OptionMark::Neutral => " ",
                };
                writeln!(f, "   [{}] {}", marker, text)?;
            }
        }

        for (i, ex) in self.coding.iter().enumerate() {
            writeln!(f, "\n💻 Exercise {}: {}", i + 1, ex.prompt)?;
            writeln!(f, "   Your code:\n{}", indent(&ex.submitted))?;
            if let Some(reference) = &ex.reference {
                writeln!(f, "   Reference solution:\n{}", indent(reference))?;
            }
            if let Some(explanation) = &ex.explanation {
                writeln!(f, "   {}", explanation)?;
            }
        }

        if let Some(puzzle) = &self.puzzle {
            writeln!(f, "\n🧩 Puzzle")?;
            for zone in &puzzle.zones {
                let placed = zone.placed.as_deref().unwrap_or("(empty)");
                match (zone.is_correct, &zone.expected) {
                    (Some(true), _) => writeln!(f, "   ✓ {}: {}", zone.label, placed)?,
                    (Some(false), Some(expected)) => {
                        writeln!(f, "   ✗ {}: {} (expected {})", zone.label, placed, expected)?
                    }
                    _ => writeln!(f, "   • {}: {}", zone.label, placed)?,
                }
            }
            if let Some(explanation) = &puzzle.explanation {
                writeln!(f, "   {}", explanation)?;
            }
        }

        write_words(f, "📖 Reading", &self.words)?;
        write_words(f, "🔤 Spelling", &self.spelling)
    }
}

fn write_words(f: &mut fmt::Formatter<'_>, title: &str, reports: &[WordReport]) -> fmt::Result {
    if reports.is_empty() {
        return Ok(());
    }
    writeln!(f, "\n{}", title)?;
    for report in reports {
        let answer = report.answer.as_deref().unwrap_or("(no answer)");
        if report.is_correct {
            writeln!(f, "   ✓ {}: {}", report.prompt, answer)?;
        } else {
            writeln!(f, "   ✗ {}: {} (correct: {})", report.prompt, answer, report.target)?;
        }
    }
    Ok(())
}

fn tick(correct: bool) -> &'static str {
    if correct {
        "✓"
    } else {
        "✗"
    }
}

fn indent(text: &str) -> String {
    text.lines().map(|line| format!("      {}", line)).collect::<Vec<_>>().join("\n")
}
