use crate::classify::classify;
use crate::extract::extract_overrides;
use diagsync_document::{l5x, Document, Element};
use diagsync_model::{Catalog, DiagConfig, DiagnosticTemplate};
use serde::Serialize;

/// What one `repair_instance` run changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RepairOutcome {
    /// Bits that had no local comment at all and were created
    pub bits_created: usize,
    /// Supported-language entries created on existing comments
    pub languages_filled: usize,
    /// Existing entries overwritten with template text
    pub languages_overwritten: usize,
    /// Entries removed because their language is unsupported
    pub unsupported_removed: usize,
}

impl RepairOutcome {
    #[must_use]
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }
}

/// Summary of a bulk repair pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkRepairOutcome {
    /// Instances repaired (aggregate status was OK)
    pub repaired: Vec<String>,
    /// Instances refused because they carry unresolved conflicts
    pub skipped: Vec<String>,
}

/// Synchronize one instance's local diagnostic text with its template.
///
/// Conservative by construction: it only ever
/// - creates a comment for a template bit that has none, with the full
///   template text per supported language,
/// - strips entries in unsupported languages,
/// - fills supported languages that have no local entry,
/// - overwrites an existing entry when the template text is a disallowed
///   placeholder, the template type prefix is unrecognized, or the
///   current local text is empty.
///
/// Everything else is presumed an intentional customization and left
/// alone. Bits absent from the template are never touched. Idempotent.
pub fn repair_instance(
    tag: &mut Element,
    template: &DiagnosticTemplate,
    cfg: &DiagConfig,
) -> RepairOutcome {
    let mut outcome = RepairOutcome::default();
    if template.bits.is_empty() {
        return outcome;
    }

    let comments = l5x::ensure_comments(tag);
    for (key, template_text) in &template.bits {
        let operand = key.operand();
        let exists = l5x::comment_for_operand(comments, &operand).is_some();
        if exists {
            let comment =
                l5x::comment_for_operand_mut(comments, &operand).expect("just checked");
            let before = comment.children_named("LocalizedComment").count();
            l5x::retain_languages(comment, |lang| cfg.is_supported_language(lang));
            outcome.unsupported_removed +=
                before - comment.children_named("LocalizedComment").count();

            for lang in &cfg.languages {
                let text = template_text.get_or_empty(lang);
                match l5x::localized_text(comment, lang) {
                    None => {
                        l5x::set_localized_text(comment, lang, text);
                        outcome.languages_filled += 1;
                    }
                    Some(current) => {
                        let overwrite = cfg.is_disallowed_placeholder(text)
                            || !cfg.has_known_type_prefix(text)
                            || current.is_empty();
                        if overwrite && current != text {
                            l5x::set_localized_text(comment, lang, text);
                            outcome.languages_overwritten += 1;
                        }
                    }
                }
            }
        } else {
            let mut comment = l5x::new_comment(&operand);
            for lang in &cfg.languages {
                l5x::set_localized_text(&mut comment, lang, template_text.get_or_empty(lang));
            }
            comments.push_element(comment);
            outcome.bits_created += 1;
        }
    }

    outcome
}

/// Repair every instance whose current aggregate status is OK.
///
/// Instances with a red bit are refused, not repaired: blind sync there
/// could destroy the very text someone needs to inspect. They are
/// reported in the outcome and must be handled individually.
pub fn repair_all_eligible(
    doc: &mut Document,
    catalog: &Catalog,
    cfg: &DiagConfig,
) -> BulkRepairOutcome {
    let mut outcome = BulkRepairOutcome::default();

    for tag in l5x::controller_tags_mut(doc) {
        let Some(template) = tag.attr("DataType").and_then(|dt| catalog.get(dt)) else {
            continue;
        };
        let Some(name) = tag.attr("Name").map(String::from) else {
            continue;
        };

        let local = extract_overrides(tag, cfg);
        let classification = classify(template, &local, cfg);
        if !classification.is_ok() {
            log::warn!("skipping '{name}': unresolved conflicts, repair it individually");
            outcome.skipped.push(name);
            continue;
        }

        let repair = repair_instance(tag, template, cfg);
        if !repair.is_noop() {
            log::info!(
                "repaired '{name}': {} bits created, {} languages filled, {} overwritten, {} unsupported removed",
                repair.bits_created,
                repair.languages_filled,
                repair.languages_overwritten,
                repair.unsupported_removed
            );
        }
        outcome.repaired.push(name);
    }

    outcome
}

/// Repair one named instance regardless of its current status — the
/// manual path for instances the bulk pass refused.
pub fn repair_named(
    doc: &mut Document,
    catalog: &Catalog,
    cfg: &DiagConfig,
    name: &str,
) -> crate::Result<RepairOutcome> {
    let tag = l5x::controller_tags_mut(doc)
        .into_iter()
        .find(|tag| tag.attr("Name") == Some(name))
        .ok_or_else(|| crate::EngineError::UnknownInstance(name.to_string()))?;

    let data_type = tag.attr("DataType").unwrap_or_default().to_string();
    let template = catalog
        .get(&data_type)
        .ok_or(crate::EngineError::UnknownTemplate(data_type))?;

    Ok(repair_instance(tag, template, cfg))
}
