use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::serde_helpers::optional_timestamp;

/// Account type, fixed by the login endpoint that issued the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Teacher,
    Student,
}

impl Role {
    /// Path segment of the matching login endpoint
    pub fn login_path(self) -> &'static str {
        match self {
            Role::Teacher => "/auth/teacher/login",
            Role::Student => "/auth/student/login",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Teacher => write!(f, "teacher"),
            Role::Student => write!(f, "student"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "teacher" => Ok(Role::Teacher),
            "student" => Ok(Role::Student),
            other => Err(format!("unknown role '{}', expected teacher or student", other)),
        }
    }
}

/// Cached profile of the logged-in user
///
/// Teachers carry an email, students a username and their teacher's id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "optional_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name, self.last_name);
        let name = name.trim();
        if name.is_empty() {
            self.username
                .clone()
                .or_else(|| self.email.clone())
                .unwrap_or_else(|| self.id.clone())
        } else {
            name.to_string()
        }
    }
}

/// Login / registration reply
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    pub user: UserProfile,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeacherCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentCredentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeacherRegistration {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}
