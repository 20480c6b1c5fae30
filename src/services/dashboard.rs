//! Dashboard summary
//!
//! One summary type for both roles: a student's assignment list and a
//! teacher's gradebook are both lists of scored work.

use chrono::{DateTime, Utc};
use std::fmt;

use crate::clients::ApiClient;
use crate::error::{AppResult, AuthError};
use crate::models::{display_score, GradedAssignment, LetterGrade, Role, StudentAssignment};

/// Anything that can be completed and scored
pub trait Scored {
    fn label(&self) -> &str;
    fn is_completed(&self) -> bool;
    fn score(&self) -> Option<f64>;
    fn completed_at(&self) -> Option<DateTime<Utc>>;
}

impl Scored for StudentAssignment {
    fn label(&self) -> &str {
        self.title()
    }

    fn is_completed(&self) -> bool {
        self.completed
    }

    fn score(&self) -> Option<f64> {
        self.score
    }

    fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.submitted_at
    }
}

impl Scored for GradedAssignment {
    fn label(&self) -> &str {
        &self.assignment_title
    }

    fn is_completed(&self) -> bool {
        self.score.is_some() || self.submitted_at.is_some()
    }

    fn score(&self) -> Option<f64> {
        self.score
    }

    fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.submitted_at
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecentResult {
    pub label: String,
    pub score: Option<f64>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Counts and averages over scored work
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardSummary {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// Mean over completed work with a score
    pub average_score: Option<f64>,
    pub grade: Option<LetterGrade>,
    /// Most recently completed first
    pub recent: Vec<RecentResult>,
}

impl DashboardSummary {
    pub fn summarize<'a, T, I>(items: I, recent_limit: usize) -> Self
    where
        T: Scored + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        let items: Vec<&T> = items.into_iter().collect();
        let done: Vec<&T> = items.iter().copied().filter(|i| i.is_completed()).collect();
        let scores: Vec<f64> = done.iter().filter_map(|i| i.score()).collect();
        let average_score =
            (!scores.is_empty()).then(|| scores.iter().sum::<f64>() / scores.len() as f64);

        let mut recent: Vec<RecentResult> = done
            .iter()
            .map(|i| RecentResult {
                label: i.label().to_string(),
                score: i.score(),
                completed_at: i.completed_at(),
            })
            .collect();
        recent.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        recent.truncate(recent_limit);

        Self {
            total: items.len(),
            completed: done.len(),
            pending: items.len() - done.len(),
            average_score,
            grade: average_score.map(LetterGrade::from_score),
            recent,
        }
    }
}

/// Role-specific figures shown next to the summary
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardExtras {
    Student { points: i64 },
    Teacher { students: usize, class_points: i64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub role: Role,
    pub summary: DashboardSummary,
    pub extras: DashboardExtras,
}

const RECENT_LIMIT: usize = 5;

/// Builds the dashboard for whoever is logged in
pub async fn load(client: &ApiClient) -> AppResult<Dashboard> {
    let role = client.session().role().ok_or(AuthError::NotLoggedIn)?;
    match role {
        Role::Student => {
            let (assignments, points) =
                futures::try_join!(client.list_student_assignments(), client.student_points())?;
            Ok(Dashboard {
                role,
                summary: DashboardSummary::summarize(&assignments, RECENT_LIMIT),
                extras: DashboardExtras::Student {
                    points: points.total_points,
                },
            })
        }
        Role::Teacher => {
            let (gradebook, points) =
                futures::try_join!(client.gradebook(), client.teacher_student_points())?;
            let graded = gradebook.iter().flat_map(|entry| entry.assignments.iter());
            Ok(Dashboard {
                role,
                summary: DashboardSummary::summarize(graded, RECENT_LIMIT),
                extras: DashboardExtras::Teacher {
                    students: gradebook.len(),
                    class_points: points.iter().map(|p| p.total_points).sum(),
                },
            })
        }
    }
}

impl fmt::Display for Dashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.summary;
        writeln!(f, "📊 Dashboard ({})", self.role)?;
        writeln!(
            f,
            "   Assignments: {} total, {} completed, {} pending",
            s.total, s.completed, s.pending
        )?;
        match (s.average_score, s.grade) {
            (Some(avg), Some(grade)) => {
                writeln!(f, "   Average score: {}% ({})", display_score(avg), grade)?
            }
            _ => writeln!(f, "   Average score: -")?,
        }
        match self.extras {
            DashboardExtras::Student { points } => writeln!(f, "   Points: {}", points)?,
            DashboardExtras::Teacher { students, class_points } => {
                writeln!(f, "   Students: {} (class points: {})", students, class_points)?
            }
        }
        if !s.recent.is_empty() {
            writeln!(f, "   Recent:")?;
            for item in &s.recent {
                let score = item
                    .score
                    .map_or("-".to_string(), |v| format!("{}%", display_score(v)));
                writeln!(f, "     • {} {}", item.label, score)?;
            }
        }
        Ok(())
    }
}
