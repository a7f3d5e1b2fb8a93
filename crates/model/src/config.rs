use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Standard user-text slots follow `<type prefix>_<two-digit index>`,
/// index 00..=63 (`UF_03`, `SW_17`, ...). The prefix itself is validated
/// against the configured set separately.
static STANDARD_SLOT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Z]{2})_([0-5][0-9]|6[0-3])$").unwrap());

/// Site policy for diagnostic-text reconciliation.
///
/// The defaults mirror the production constants; a deployment can
/// override them through a TOML file at the CLI boundary. All engine
/// entry points take a `&DiagConfig` — no process-wide state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagConfig {
    /// Supported language codes; anything else is a classification and
    /// repair trigger, not a crash
    pub languages: Vec<String>,

    /// Number of diagnostic words a template may declare (`iDiagnostic1`
    /// up to `iDiagnostic<word_limit>`)
    pub word_limit: u8,

    /// Words covered by the gap-fill matrix (fixed, regardless of how
    /// many bits a template actually defines)
    pub gap_fill_words: u8,

    /// Parameter name marking a template as a device-style component
    pub device_marker_param: String,

    /// Abstract base type excluded from the catalog even when it carries
    /// the device marker (all device types derive from it)
    pub excluded_base_type: String,

    /// Template texts meaning "no description written yet"; must never
    /// survive into a finished instance unchanged
    pub disallowed_placeholders: Vec<String>,

    /// Reserved marker sequence; local text containing it is invalid
    pub unresolved_marker: String,

    /// Recognized two-letter diagnostic type prefixes
    pub type_prefixes: Vec<String>,
}

impl Default for DiagConfig {
    fn default() -> Self {
        Self {
            languages: vec!["en-GB".into(), "sv-SE".into()],
            word_limit: 5,
            gap_fill_words: 3,
            device_marker_param: "cDeviceID".into(),
            excluded_base_type: "MCP_Device".into(),
            disallowed_placeholders: vec!["DO NOT USE".into(), "ANVÄND EJ".into()],
            unresolved_marker: "<@".into(),
            type_prefixes: vec![
                "UF".into(),
                "UW".into(),
                "UM".into(),
                "SF".into(),
                "SW".into(),
                "SM".into(),
            ],
        }
    }
}

impl DiagConfig {
    #[must_use]
    pub fn is_supported_language(&self, lang: &str) -> bool {
        self.languages.iter().any(|l| l == lang)
    }

    #[must_use]
    pub fn is_disallowed_placeholder(&self, text: &str) -> bool {
        self.disallowed_placeholders.iter().any(|p| p == text)
    }

    #[must_use]
    pub fn contains_unresolved_marker(&self, text: &str) -> bool {
        !self.unresolved_marker.is_empty() && text.contains(&self.unresolved_marker)
    }

    /// True when the text's two-letter prefix is a recognized diagnostic
    /// type code.
    #[must_use]
    pub fn has_known_type_prefix(&self, text: &str) -> bool {
        let prefix = text.get(..2).unwrap_or("");
        self.type_prefixes.iter().any(|p| p == prefix)
    }

    /// True when the text is exactly a standard user-text slot
    /// (`UF_03`-style: known prefix, underscore, two-digit index 00..=63).
    #[must_use]
    pub fn is_standard_slot(&self, text: &str) -> bool {
        STANDARD_SLOT_RE
            .captures(text)
            .is_some_and(|caps| self.type_prefixes.iter().any(|p| p == &caps[1]))
    }

    /// Parameter name of a diagnostic word ordinal (`0` → `iDiagnostic1`).
    #[must_use]
    pub fn diagnostic_word_name(&self, word: u8) -> String {
        format!("iDiagnostic{}", word + 1)
    }

    /// Word ordinal for a parameter name, `None` when the parameter is
    /// not a diagnostic word or exceeds the configured limit.
    #[must_use]
    pub fn word_for_param(&self, param_name: &str) -> Option<u8> {
        let rest = param_name
            .get(..11)
            .filter(|head| head.eq_ignore_ascii_case("iDiagnostic"))
            .map(|_| &param_name[11..])?;
        let ordinal: u8 = rest.parse().ok()?;
        (1..=self.word_limit).contains(&ordinal).then(|| ordinal - 1)
    }
}
