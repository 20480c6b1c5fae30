//! Spelling word lists - business capability layer

use tracing::info;

use crate::clients::ApiClient;
use crate::error::AppResult;
use crate::models::{Role, SpellingWordList, SpellingWordListDraft};

/// Weekly word lists a teacher keeps per student
#[derive(Debug, Clone)]
pub struct SpellingService {
    client: ApiClient,
}

impl SpellingService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn lists(&self) -> AppResult<Vec<SpellingWordList>> {
        self.client.session().require(Role::Teacher)?;
        self.client.list_spelling_lists().await
    }

    /// The ten-word rule is checked before anything is sent
    pub async fn create(&self, draft: &SpellingWordListDraft) -> AppResult<SpellingWordList> {
        self.client.session().require(Role::Teacher)?;
        draft.validate()?;
        let list = self.client.create_spelling_list(draft).await?;
        info!("🔤 Saved word list \"{}\"", list.name);
        Ok(list)
    }

    pub async fn update(
        &self,
        id: &str,
        draft: &SpellingWordListDraft,
    ) -> AppResult<SpellingWordList> {
        self.client.session().require(Role::Teacher)?;
        draft.validate()?;
        self.client.update_spelling_list(id, draft).await
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.client.session().require(Role::Teacher)?;
        self.client.delete_spelling_list(id).await?;
        Ok(())
    }
}
