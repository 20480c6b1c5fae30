//! Messaging between a teacher and their students

use crate::clients::ApiClient;
use crate::error::{AuthError, AppResult};
use crate::models::{Conversation, Message, NewMessage};

#[derive(Debug, Clone)]
pub struct MessageService {
    client: ApiClient,
}

impl MessageService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Contacts with their latest message, unread first
    pub async fn conversations(&self) -> AppResult<Vec<Conversation>> {
        self.ensure_logged_in()?;
        let mut conversations = self.client.conversations().await?;
        conversations.sort_by_key(|c| !c.has_unread());
        Ok(conversations)
    }

    pub async fn thread(&self, contact_id: &str) -> AppResult<Vec<Message>> {
        self.ensure_logged_in()?;
        self.client.thread(contact_id).await
    }

    pub async fn send(&self, recipient_id: &str, content: &str) -> AppResult<Message> {
        self.ensure_logged_in()?;
        let message = NewMessage {
            recipient_id: recipient_id.to_string(),
            content: content.trim().to_string(),
        };
        message.validate()?;
        self.client.send_message(&message).await
    }

    fn ensure_logged_in(&self) -> AppResult<()> {
        if !self.client.session().is_authenticated() {
            return Err(AuthError::NotLoggedIn.into());
        }
        Ok(())
    }
}
