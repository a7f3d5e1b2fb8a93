use serde::{Deserialize, Serialize};

/// Consistency verdict for one (bit, language) pair.
///
/// Classification ambiguity is surfaced as a value, never as an error.
/// Variants are declared in ascending severity so the derived `Ord`
/// implements worst-status-wins aggregation directly: everything above
/// [`BitStatus::MissingLocal`] is a "red" status that forces the owning
/// instance to [`InstanceStatus::Issue`], while `MissingLocal` alone only
/// degrades display.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum BitStatus {
    /// Local text matches the template, or differs in a legitimate way
    #[default]
    Ok,
    /// Local text is empty; repair will fill it from the template
    MissingLocal,
    /// Template slot is non-standard, or a standard user-text slot was
    /// overridden with a different type prefix
    TypeMismatch,
    /// Template text is a reserved "do not use" placeholder that the
    /// instance has not replaced with a real description
    DisallowedTemplateText,
    /// Override is half-localized: some languages overridden, others not
    InconsistentOverride,
    /// Local text contains the reserved unresolved-placeholder marker
    InvalidMarker,
    /// Language code outside the supported set
    UnsupportedLanguage,
}

impl BitStatus {
    /// True for statuses that require manual attention and make the
    /// instance ineligible for bulk repair.
    #[must_use]
    pub fn is_red(self) -> bool {
        self > Self::MissingLocal
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::MissingLocal => "missing_local",
            Self::TypeMismatch => "type_mismatch",
            Self::DisallowedTemplateText => "disallowed_template_text",
            Self::InconsistentOverride => "inconsistent_override",
            Self::InvalidMarker => "invalid_marker",
            Self::UnsupportedLanguage => "unsupported_language",
        }
    }
}

/// Aggregate verdict for one instance.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum InstanceStatus {
    #[default]
    Ok,
    Issue,
}

impl InstanceStatus {
    /// Fold one bit status into the aggregate.
    #[must_use]
    pub fn absorb(self, bit: BitStatus) -> Self {
        if bit.is_red() {
            Self::Issue
        } else {
            self
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Issue => "ISSUE",
        }
    }
}
