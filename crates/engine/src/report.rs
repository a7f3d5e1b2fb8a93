use crate::classify::{classify, Classification};
use crate::extract::extract_overrides;
use diagsync_document::{l5x, Document};
use diagsync_model::{BitKey, BitStatus, Catalog, DiagConfig, InstanceStatus};
use serde::Serialize;
use std::collections::BTreeSet;

/// One (bit, language) row of an instance report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BitRow {
    pub operand: String,
    pub word: u8,
    pub bit: u8,
    pub language: String,
    /// Local text; `None` when the instance has no entry for this
    /// language (distinct from an empty entry)
    pub local: Option<String>,
    /// Template default, empty when the template has none
    pub template: String,
    pub status: BitStatus,
}

/// Consistency report for one instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstanceReport {
    pub name: String,
    pub data_type: String,
    pub status: InstanceStatus,
    pub rows: Vec<BitRow>,
}

impl InstanceReport {
    #[must_use]
    pub fn worst_bit(&self) -> BitStatus {
        self.rows
            .iter()
            .map(|r| r.status)
            .max()
            .unwrap_or_default()
    }
}

/// Classify every instance of a diagnostic-capable type in the document.
///
/// Read-only: the document is not mutated. Tags whose `DataType` has no
/// catalog template are not diagnostic instances and are skipped.
pub fn report_document(doc: &Document, catalog: &Catalog, cfg: &DiagConfig) -> Vec<InstanceReport> {
    let mut reports = Vec::new();

    for tag in l5x::controller_tags(doc) {
        let (Some(name), Some(data_type)) = (tag.attr("Name"), tag.attr("DataType")) else {
            continue;
        };
        let Some(template) = catalog.get(data_type) else {
            continue;
        };

        let local = extract_overrides(tag, cfg);
        let classification = classify(template, &local, cfg);

        let mut rows = Vec::new();
        let keys: BTreeSet<BitKey> = template
            .bits
            .keys()
            .chain(local.bits.keys())
            .copied()
            .collect();
        for key in keys {
            let template_text = template.bit(key);
            let local_text = local.bit(key);
            let langs: BTreeSet<&str> = template_text
                .into_iter()
                .flat_map(|t| t.languages())
                .chain(local_text.into_iter().flat_map(|t| t.languages()))
                .collect();
            for lang in langs {
                rows.push(BitRow {
                    operand: key.operand(),
                    word: key.word,
                    bit: key.bit,
                    language: lang.to_string(),
                    local: local_text.and_then(|t| t.get(lang)).map(String::from),
                    template: template_text
                        .map(|t| t.get_or_empty(lang).to_string())
                        .unwrap_or_default(),
                    status: classification.status_of(key, lang),
                });
            }
        }

        reports.push(InstanceReport {
            name: name.to_string(),
            data_type: data_type.to_string(),
            status: classification.status,
            rows,
        });
    }

    log::info!(
        "classified {} instances, {} with issues",
        reports.len(),
        reports
            .iter()
            .filter(|r| r.status == InstanceStatus::Issue)
            .count()
    );
    reports
}

/// Classification for one tag element, shared by the report and repair
/// paths.
pub fn classify_tag(
    tag: &diagsync_document::Element,
    catalog: &Catalog,
    cfg: &DiagConfig,
) -> Option<Classification> {
    let template = catalog.get(tag.attr("DataType")?)?;
    let local = extract_overrides(tag, cfg);
    Some(classify(template, &local, cfg))
}
