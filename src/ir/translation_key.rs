//! Translation keys known to the tr8n service.

use serde::Serialize;

use crate::api::types::TranslationKeyRow;

/// A translation key returned by the lookup endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslationKey {
    /// The primary string argument of a translation call.
    pub label: String,
    /// Optional context for translators; empty when absent.
    pub description: String,
    /// Number of existing translations, used only for display.
    pub rank: u32,
}

impl TranslationKey {
    #[must_use]
    pub const fn new(label: String, description: String, rank: u32) -> Self {
        Self { label, description, rank }
    }

    /// Quick-pick row shown by the host editor.
    #[must_use]
    pub fn option(&self) -> Vec<String> {
        if self.description.is_empty() {
            vec![self.label.clone(), "No description".to_string(), format!("Rank: {}", self.rank)]
        } else {
            vec![self.label.clone(), self.description.clone()]
        }
    }
}

impl From<TranslationKeyRow> for TranslationKey {
    #[allow(clippy::cast_possible_truncation)] // 翻訳数が u32 を超えることはない
    fn from(row: TranslationKeyRow) -> Self {
        Self {
            label: row.label,
            description: row.description.unwrap_or_default(),
            rank: row.translations.len() as u32,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn option_without_description_shows_rank() {
        let key = TranslationKey::new("Hello".to_string(), String::new(), 3);

        assert_that!(
            key.option(),
            eq(vec!["Hello".to_string(), "No description".to_string(), "Rank: 3".to_string()])
        );
    }

    #[rstest]
    fn option_with_description_shows_it() {
        let key = TranslationKey::new("Hello".to_string(), "Greeting".to_string(), 3);

        assert_that!(key.option(), eq(vec!["Hello".to_string(), "Greeting".to_string()]));
    }

    #[rstest]
    fn from_row_counts_translations_as_rank() {
        let row: TranslationKeyRow = serde_json::from_str(
            r#"{"label": "Hello", "description": null, "translations": [{}, {}]}"#,
        )
        .unwrap();

        let key = TranslationKey::from(row);

        assert_that!(key.label, eq("Hello"));
        assert_that!(key.description, eq(""));
        assert_that!(key.rank, eq(2));
    }
}
