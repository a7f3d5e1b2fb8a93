use crate::extract::extract_overrides;
use diagsync_document::{l5x, Element};
use diagsync_model::{BitKey, DiagConfig, DiagnosticTemplate};
use serde::Serialize;

/// What one gap-fill run changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GapFillOutcome {
    /// (word, bit) slots that received template text
    pub filled: usize,
    /// Slots already carrying non-empty local text, left untouched
    pub already_present: usize,
    /// Slots in the fixed matrix without a template entry, skipped
    pub no_template_entry: usize,
}

/// Ensure every bit of the fixed diagnostic matrix has a local comment,
/// injecting template defaults where text is entirely absent.
///
/// Used when propagating a fully-specified master instance onto a fresh
/// copy. Walks all `gap_fill_words` x 32 slots regardless of how many
/// bits the template defines; a slot counts as present when any language
/// already carries non-empty local text, and such slots are never
/// overwritten. Slots the template has no entry for are skipped and
/// logged, never an error.
pub fn gap_fill(
    tag: &mut Element,
    template: &DiagnosticTemplate,
    cfg: &DiagConfig,
) -> GapFillOutcome {
    let mut outcome = GapFillOutcome::default();

    let local = extract_overrides(tag, cfg);
    let tag_name = tag.attr("Name").unwrap_or_default().to_string();
    let comments = l5x::ensure_comments(tag);

    for word in 0..cfg.gap_fill_words {
        for bit in 0..32 {
            let Some(key) = BitKey::new(word, bit) else {
                continue;
            };
            if local.bit(key).is_some_and(|text| text.has_any_text()) {
                outcome.already_present += 1;
                continue;
            }
            let Some(template_text) = template.bit(key) else {
                log::debug!(
                    "gap-fill '{tag_name}': template '{}' has no entry for {key}, skipping",
                    template.name
                );
                outcome.no_template_entry += 1;
                continue;
            };

            let operand = key.operand();
            let exists = l5x::comment_for_operand(comments, &operand).is_some();
            if exists {
                // comment exists but all texts are empty: fill it in
                // place instead of growing a duplicate
                let comment =
                    l5x::comment_for_operand_mut(comments, &operand).expect("just checked");
                for lang in &cfg.languages {
                    l5x::set_localized_text(comment, lang, template_text.get_or_empty(lang));
                }
            } else {
                let mut comment = l5x::new_comment(&operand);
                for lang in &cfg.languages {
                    l5x::set_localized_text(&mut comment, lang, template_text.get_or_empty(lang));
                }
                comments.push_element(comment);
            }
            outcome.filled += 1;
        }
    }

    if outcome.no_template_entry > 0 {
        log::warn!(
            "gap-fill '{tag_name}': {} slots had no template entry in '{}'",
            outcome.no_template_entry,
            template.name
        );
    }
    outcome
}
