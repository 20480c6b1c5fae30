use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::serde_helpers::optional_timestamp;
use super::user::Role;
use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub sender_id: String,
    pub recipient_id: String,
    pub content: String,
    #[serde(default, deserialize_with = "optional_timestamp")]
    pub sent_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub read: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub role: Role,
}

/// Contact plus the latest message exchanged with them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub contact: Contact,
    #[serde(default)]
    pub last_message: Option<Message>,
}

impl Conversation {
    /// Unread when the last message came from the contact and is not read yet
    pub fn has_unread(&self) -> bool {
        self.last_message
            .as_ref()
            .is_some_and(|m| !m.read && m.sender_id == self.contact.id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewMessage {
    pub recipient_id: String,
    pub content: String,
}

impl NewMessage {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.content.trim().is_empty() {
            return Err(ValidationError::EmptyMessage);
        }
        if self.recipient_id.trim().is_empty() {
            return Err(ValidationError::MissingFields { form: "message" });
        }
        Ok(())
    }
}
