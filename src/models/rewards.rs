//! Rewards and points ledger types
//!
//! The ledger lives on the server; these types only mirror what it returns
//! and what the client may ask it to do.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::serde_helpers::{null_as_default, optional_timestamp};
use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reward {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub points_cost: i64,
    #[serde(default)]
    pub teacher_id: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default, deserialize_with = "optional_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

impl Reward {
    /// Display-side check only; the server decides redemptions
    pub fn affordable_with(&self, balance: i64) -> bool {
        self.active && balance >= self.points_cost
    }

    /// Icon picked from the title
    pub fn icon(&self) -> &'static str {
        let title = self.title.to_lowercase();
        if title.contains("game") {
            "🎮"
        } else if title.contains("coke") {
            "🥤"
        } else if title.contains("tv") {
            "📺"
        } else if title.contains("day off") {
            "🏖️"
        } else {
            "🎁"
        }
    }
}

/// Create / update body for a reward
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RewardDraft {
    pub title: String,
    pub description: String,
    pub points_cost: i64,
}

impl RewardDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() || self.description.trim().is_empty() {
            return Err(ValidationError::MissingFields { form: "reward" });
        }
        if self.points_cost <= 0 {
            return Err(ValidationError::InvalidPoints {
                value: self.points_cost,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Awarded for a high-scoring submission
    Earned,
    Redeemed,
    ManualAdd,
    ManualSubtract,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointsTransaction {
    pub id: String,
    pub student_id: String,
    /// Negative for deductions
    pub points: i64,
    pub transaction_type: TransactionType,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "optional_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl PointsTransaction {
    /// `+5` / `-50`
    pub fn signed_points(&self) -> String {
        if self.points > 0 {
            format!("+{}", self.points)
        } else {
            self.points.to_string()
        }
    }
}

/// `GET /student/points`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentPoints {
    #[serde(default)]
    pub total_points: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub transactions: Vec<PointsTransaction>,
}

/// One row of `GET /teacher/student-points`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentPointsSummary {
    pub student_id: String,
    #[serde(default)]
    pub student_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub total_points: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub transactions: Vec<PointsTransaction>,
}

/// Teacher-issued manual adjustment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointsAdjustment {
    pub student_id: String,
    /// May be negative
    pub points: i64,
    pub description: String,
}

impl PointsAdjustment {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.student_id.trim().is_empty() || self.description.trim().is_empty() {
            return Err(ValidationError::MissingFields {
                form: "points adjustment",
            });
        }
        if self.points == 0 {
            return Err(ValidationError::InvalidPoints { value: 0 });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AdjustmentResult {
    pub new_total: i64,
    #[serde(default)]
    pub points_adjusted: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RedemptionResult {
    #[serde(default)]
    pub message: Option<String>,
    pub remaining_points: i64,
}
