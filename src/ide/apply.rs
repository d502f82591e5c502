//! Applies a chosen translation key back into the document.

use tower_lsp::lsp_types::TextEdit;

use super::state::EditTarget;
use crate::ir::TranslationKey;

/// Builds the text that replaces the detected call span or selection.
///
/// A key with a description expands to both string arguments of the call
/// site, `label","description`; otherwise the label alone.
#[must_use]
pub fn replacement_text(key: &TranslationKey) -> String {
    if key.description.is_empty() {
        key.label.clone()
    } else {
        format!("{}\",\"{}", key.label, key.description)
    }
}

/// Builds the single edit overwriting exactly the target region.
#[must_use]
pub fn edit_for(target: &EditTarget, key: &TranslationKey) -> TextEdit {
    TextEdit { range: target.range.into(), new_text: replacement_text(key) }
}
