use crate::error::{AppError, AppResult, ValidationError};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tokio::fs;

/// Answers prepared offline in a TOML file
///
/// Keys are 1-based positions as displayed ("1" is the first question);
/// `placements` maps drop-zone ids to item ids.
///
/// ```toml
/// [choices]
/// "1" = 2
///
/// [code]
/// "1" = "print('hello')"
///
/// [placements]
/// roots = "item-water"
///
/// [spelling]
/// "1" = "cat"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnswerSheet {
    /// question → 0-based option index
    pub choices: BTreeMap<String, usize>,
    pub code: BTreeMap<String, String>,
    pub placements: BTreeMap<String, String>,
    pub words: BTreeMap<String, String>,
    pub spelling: BTreeMap<String, String>,
}

impl AnswerSheet {
    pub fn parse(content: &str) -> AppResult<Self> {
        toml::from_str(content).map_err(|e| {
            AppError::from(ValidationError::InvalidAnswerSheet {
                detail: e.to_string(),
            })
        })
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
            && self.code.is_empty()
            && self.placements.is_empty()
            && self.words.is_empty()
            && self.spelling.is_empty()
    }

    /// Converts 1-based string keys to 0-based positions
    pub fn positions<V: Clone>(
        section: &str,
        map: &BTreeMap<String, V>,
    ) -> AppResult<Vec<(usize, V)>> {
        map.iter()
            .map(|(key, value)| match key.trim().parse::<usize>() {
                Ok(position) if position >= 1 => Ok((position - 1, value.clone())),
                _ => Err(AppError::from(ValidationError::InvalidAnswerSheet {
                    detail: format!("[{}] key '{}' is not a position starting at 1", section, key),
                })),
            })
            .collect()
    }
}

/// Loads an answer sheet from disk
pub async fn load_answer_sheet(path: &Path) -> AppResult<AnswerSheet> {
    let content = fs::read_to_string(path).await.map_err(|e| {
        AppError::from(ValidationError::InvalidAnswerSheet {
            detail: format!("cannot read {}: {}", path.display(), e),
        })
    })?;

    let sheet = AnswerSheet::parse(&content)?;
    tracing::debug!(
        "Loaded answer sheet {} ({} choices, {} code answers)",
        path.display(),
        sheet.choices.len(),
        sheet.code.len()
    );
    Ok(sheet)
}
