use crate::{BitKey, BitText};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default diagnostic text of one AOI template.
///
/// Built once when a controller document is loaded and immutable
/// afterwards; instances only read it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticTemplate {
    /// AOI type name
    pub name: String,
    /// Template revision as recorded in the document
    pub revision: Option<String>,
    /// Default text per bit, supported languages only
    pub bits: BTreeMap<BitKey, BitText>,
}

impl DiagnosticTemplate {
    #[must_use]
    pub fn new(name: impl Into<String>, revision: Option<String>) -> Self {
        Self {
            name: name.into(),
            revision,
            bits: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn bit(&self, key: BitKey) -> Option<&BitText> {
        self.bits.get(&key)
    }
}

/// All diagnostic-capable templates of one loaded document, keyed by AOI
/// type name. One catalog per document; rebuilt on every load, never
/// shared globally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub templates: BTreeMap<String, DiagnosticTemplate>,
}

impl Catalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, aoi_type: &str) -> Option<&DiagnosticTemplate> {
        self.templates.get(aoi_type)
    }

    #[must_use]
    pub fn contains(&self, aoi_type: &str) -> bool {
        self.templates.contains_key(aoi_type)
    }

    pub fn insert(&mut self, template: DiagnosticTemplate) {
        self.templates.insert(template.name.clone(), template);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Sparse local overrides of one instance: only bits with an actual
/// comment in the document appear. Absence of a key is meaningful — it
/// is what the repair engine fills in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceOverride {
    pub bits: BTreeMap<BitKey, BitText>,
}

impl InstanceOverride {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn bit(&self, key: BitKey) -> Option<&BitText> {
        self.bits.get(&key)
    }

    pub fn insert(&mut self, key: BitKey, text: BitText) {
        self.bits.insert(key, text);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }
}
