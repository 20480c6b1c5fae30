//! Submission serializer
//!
//! Turns sparse answers into the dense wire arrays the backend expects.

use std::collections::BTreeMap;

use crate::models::{Assignment, SubmissionPayload};
use crate::workflow::collector::AnswerSet;

/// Placeholder for an unanswered question
pub const UNANSWERED: i64 = -1;

/// Builds the submit body
///
/// Every array has exactly the length of its source collection. Sections the
/// assignment lacks are `None` (sent as `null`).
pub fn serialize(
    student_assignment_id: &str,
    assignment: &Assignment,
    answers: &AnswerSet,
) -> SubmissionPayload {
    let choices = (!assignment.questions.is_empty()).then(|| {
        (0..assignment.questions.len())
            .map(|i| {
                answers
                    .choices
                    .get(&i)
                    .and_then(|&choice| i64::try_from(choice).ok())
                    .unwrap_or(UNANSWERED)
            })
            .collect()
    });

    let coding = (!assignment.coding_exercises.is_empty())
        .then(|| dense_strings(&answers.code, assignment.coding_exercises.len()));

    let placements = assignment.drag_drop_puzzle.as_ref().map(|puzzle| {
        puzzle
            .zones
            .iter()
            .filter_map(|zone| {
                answers
                    .placements
                    .get(&zone.id)
                    .map(|item| (zone.id.clone(), item.clone()))
            })
            .collect::<BTreeMap<_, _>>()
    });

    let words = assignment
        .learn_to_read_content
        .as_ref()
        .map(|content| dense_strings(&answers.words, content.activities.len()));

    let spelling = (!assignment.spelling_exercises.is_empty())
        .then(|| dense_strings(&answers.spelling, assignment.spelling_exercises.len()));

    SubmissionPayload {
        student_assignment_id: student_assignment_id.to_string(),
        answers: choices,
        coding_answers: coding,
        drag_drop_answer: placements,
        interactive_word_answers: words,
        spelling_answers: spelling,
    }
}

fn dense_strings(sparse: &BTreeMap<usize, String>, len: usize) -> Vec<String> {
    (0..len)
        .map(|i| sparse.get(&i).cloned().unwrap_or_default())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn assignment(value: serde_json::Value) -> Assignment {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn arrays_match_collection_lengths() {
        let assignment = assignment(json!({
            "id": "a", "title": "T", "subject": "Math", "grade_level": "2", "topic": "t",
            "questions": [
                {"question": "1", "options": ["a", "b"], "correct_answer": 0},
                {"question": "2", "options": ["a", "b"], "correct_answer": 1},
                {"question": "3", "options": ["a", "b"], "correct_answer": 1}
            ],
            "coding_exercises": [{"prompt": "x"}, {"prompt": "y"}]
        }));
        let mut answers = AnswerSet::default();
        answers.choices.insert(2, 1);
        answers.code.insert(1, "print(2)".into());

        let payload = serialize("sa-9", &assignment, &answers);
        assert_eq!(payload.student_assignment_id, "sa-9");
        assert_eq!(payload.answers, Some(vec![-1, -1, 1]));
        assert_eq!(payload.coding_answers, Some(vec![String::new(), "print(2)".to_string()]));
        assert_eq!(payload.drag_drop_answer, None);
        assert_eq!(payload.spelling_answers, None);
    }

    #[test]
    fn empty_collections_become_null() {
        let assignment = assignment(json!({
            "id": "a", "title": "T", "subject": "Spelling", "grade_level": "1", "topic": "t",
            "spelling_exercises": [
                {"exercise_type": "multiple_choice", "options": ["cat", "cot"], "correct_answer": "cat"}
            ]
        }));
        let mut answers = AnswerSet::default();
        answers.spelling.insert(0, "cot".into());

        let json = serde_json::to_value(serialize("sa", &assignment, &answers)).unwrap();
        assert!(json["answers"].is_null());
        assert!(json["coding_answers"].is_null());
        assert_eq!(json["spelling_answers"], json!(["cot"]));
    }

    #[test]
    fn only_declared_zones_are_sent() {
        let assignment = assignment(json!({
            "id": "a", "title": "T", "subject": "Science", "grade_level": "3", "topic": "t",
            "drag_drop_puzzle": {
                "items": [{"id": "i1", "text": "x"}],
                "zones": [{"id": "z1", "label": "one"}]
            }
        }));
        let mut answers = AnswerSet::default();
        answers.placements.insert("z1".into(), "i1".into());
        answers.placements.insert("stale".into(), "i9".into());

        let payload = serialize("sa", &assignment, &answers);
        let placements = payload.drag_drop_answer.unwrap();
        assert_eq!(placements.len(), 1);
        assert_eq!(placements.get("z1").map(String::as_str), Some("i1"));
    }

    #[test]
    fn same_input_same_payload() {
        let assignment = assignment(json!({
            "id": "a", "title": "T", "subject": "Math", "grade_level": "2", "topic": "t",
            "questions": [{"question": "1", "options": ["a", "b"], "correct_answer": 0}]
        }));
        let mut answers = AnswerSet::default();
        answers.choices.insert(0, 0);
        assert_eq!(serialize("sa", &assignment, &answers), serialize("sa", &assignment, &answers));
    }
}
