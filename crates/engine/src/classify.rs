use diagsync_model::{
    BitKey, BitStatus, BitText, DiagConfig, DiagnosticTemplate, InstanceOverride, InstanceStatus,
};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Per-language verdicts for one bit, plus the worst of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BitClassification {
    pub languages: BTreeMap<String, BitStatus>,
    pub worst: BitStatus,
}

/// Result of classifying one instance against its template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub bits: BTreeMap<BitKey, BitClassification>,
    pub status: InstanceStatus,
}

impl Classification {
    /// Verdict for one (bit, language) pair; `Ok` when the pair was not
    /// part of the classified union.
    #[must_use]
    pub fn status_of(&self, key: BitKey, lang: &str) -> BitStatus {
        self.bits
            .get(&key)
            .and_then(|bit| bit.languages.get(lang).copied())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn worst_of(&self, key: BitKey) -> BitStatus {
        self.bits.get(&key).map(|bit| bit.worst).unwrap_or_default()
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == InstanceStatus::Ok
    }
}

/// Classify every (bit, language) pair of an instance against the
/// template defaults.
///
/// Pure and deterministic: same inputs, same verdicts, no mutation. This
/// is the single source of truth for consistency rules — the repair,
/// bulk-repair and reporting paths all call it instead of re-deriving
/// comparisons.
///
/// Iterates the union of bits on both sides (a bit may exist in only
/// one), and per bit the union of template and local languages. The
/// first matching rule wins:
///
/// 1. unsupported language
/// 2. local text carries the unresolved-placeholder marker
/// 3. local equals template (verbatim match short-circuits everything,
///    including the disallowed-placeholder check)
/// 4. half-localized override (some languages overridden, some not)
/// 5. local empty
/// 6. template text is a disallowed placeholder
/// 7. template type prefix unrecognized
/// 8. standard template slot overridden under a different type prefix
/// 9. legitimate specialization
#[must_use]
pub fn classify(
    template: &DiagnosticTemplate,
    local: &InstanceOverride,
    cfg: &DiagConfig,
) -> Classification {
    let mut result = Classification::default();

    let keys: BTreeSet<BitKey> = template
        .bits
        .keys()
        .chain(local.bits.keys())
        .copied()
        .collect();

    for key in keys {
        let template_text = template.bit(key);
        let local_text = local.bit(key);
        let langs = language_union(template_text, local_text);

        let consistent = is_consistent(&langs, template_text, local_text);

        let mut bit = BitClassification::default();
        for lang in &langs {
            let status = classify_language(lang, template_text, local_text, consistent, cfg);
            bit.worst = bit.worst.max(status);
            result.status = result.status.absorb(status);
            bit.languages.insert(lang.clone(), status);
        }
        result.bits.insert(key, bit);
    }

    result
}

fn language_union(template: Option<&BitText>, local: Option<&BitText>) -> BTreeSet<String> {
    template
        .into_iter()
        .flat_map(BitText::languages)
        .chain(local.into_iter().flat_map(BitText::languages))
        .map(String::from)
        .collect()
}

/// The "both languages exist" rule: an override must either touch every
/// language of the bit or none of them. Counts languages whose local
/// text is non-empty and differs from the template; 0 or all is
/// consistent, anything in between is a half-localized override.
fn is_consistent(
    langs: &BTreeSet<String>,
    template: Option<&BitText>,
    local: Option<&BitText>,
) -> bool {
    let Some(local) = local else {
        // no local entry at all: nothing overridden, trivially consistent
        return true;
    };
    let overridden = langs
        .iter()
        .filter(|lang| {
            let local_text = local.get_or_empty(lang);
            let template_text = template.map_or("", |t| t.get_or_empty(lang));
            !local_text.is_empty() && local_text != template_text
        })
        .count();
    overridden == 0 || overridden == langs.len()
}

fn classify_language(
    lang: &str,
    template: Option<&BitText>,
    local: Option<&BitText>,
    consistent: bool,
    cfg: &DiagConfig,
) -> BitStatus {
    let local_text = local.map_or("", |t| t.get_or_empty(lang));
    let template_text = template.map_or("", |t| t.get_or_empty(lang));

    if !cfg.is_supported_language(lang) {
        return BitStatus::UnsupportedLanguage;
    }
    if cfg.contains_unresolved_marker(local_text) {
        return BitStatus::InvalidMarker;
    }
    if local_text == template_text {
        return BitStatus::Ok;
    }
    if !consistent {
        return BitStatus::InconsistentOverride;
    }
    if local_text.is_empty() {
        return BitStatus::MissingLocal;
    }
    if cfg.is_disallowed_placeholder(template_text) {
        return BitStatus::DisallowedTemplateText;
    }
    if !cfg.has_known_type_prefix(template_text) {
        return BitStatus::TypeMismatch;
    }
    if cfg.is_standard_slot(template_text) && local_text.get(..2) != template_text.get(..2) {
        return BitStatus::TypeMismatch;
    }
    BitStatus::Ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use diagsync_model::DiagnosticTemplate;
    use pretty_assertions::assert_eq;

    fn key(word: u8, bit: u8) -> BitKey {
        BitKey::new(word, bit).unwrap()
    }

    fn template_with(bits: &[(BitKey, &[(&str, &str)])]) -> DiagnosticTemplate {
        let mut template = DiagnosticTemplate::new("MCP_Valve", None);
        for (k, texts) in bits {
            template
                .bits
                .insert(*k, texts.iter().copied().collect::<BitText>());
        }
        template
    }

    fn override_with(bits: &[(BitKey, &[(&str, &str)])]) -> InstanceOverride {
        let mut ov = InstanceOverride::new();
        for (k, texts) in bits {
            ov.insert(*k, texts.iter().copied().collect::<BitText>());
        }
        ov
    }

    #[test]
    fn exact_match_is_ok_for_every_language() {
        let cfg = DiagConfig::default();
        let texts: &[(&str, &str)] = &[("en-GB", "UF_03 Sensor fault"), ("sv-SE", "UF_03 Sensorfel")];
        let template = template_with(&[(key(0, 3), texts)]);
        let local = override_with(&[(key(0, 3), texts)]);

        let cls = classify(&template, &local, &cfg);
        assert_eq!(cls.status_of(key(0, 3), "en-GB"), BitStatus::Ok);
        assert_eq!(cls.status_of(key(0, 3), "sv-SE"), BitStatus::Ok);
        assert_eq!(cls.status, InstanceStatus::Ok);
    }

    #[test]
    fn missing_override_is_missing_local_not_issue() {
        let cfg = DiagConfig::default();
        let template = template_with(&[(
            key(0, 3),
            &[("en-GB", "UF_03 Sensor fault"), ("sv-SE", "UF_03 Sensorfel")],
        )]);
        let cls = classify(&template, &InstanceOverride::new(), &cfg);

        assert_eq!(cls.status_of(key(0, 3), "en-GB"), BitStatus::MissingLocal);
        assert_eq!(cls.worst_of(key(0, 3)), BitStatus::MissingLocal);
        assert_eq!(cls.status, InstanceStatus::Ok);
    }

    #[test]
    fn verbatim_disallowed_match_short_circuits() {
        let cfg = DiagConfig::default();
        let texts: &[(&str, &str)] = &[("en-GB", "DO NOT USE"), ("sv-SE", "ANVÄND EJ")];
        let template = template_with(&[(key(0, 5), texts)]);
        let local = override_with(&[(key(0, 5), texts)]);

        let cls = classify(&template, &local, &cfg);
        assert_eq!(cls.status_of(key(0, 5), "en-GB"), BitStatus::Ok);
        assert!(cls.is_ok());
    }

    #[test]
    fn near_miss_on_disallowed_template_is_flagged() {
        let cfg = DiagConfig::default();
        let template = template_with(&[(
            key(0, 5),
            &[("en-GB", "DO NOT USE"), ("sv-SE", "ANVÄND EJ")],
        )]);
        let local = override_with(&[(
            key(0, 5),
            &[("en-GB", "Do not use"), ("sv-SE", "Använd ej")],
        )]);

        let cls = classify(&template, &local, &cfg);
        assert_eq!(
            cls.status_of(key(0, 5), "en-GB"),
            BitStatus::DisallowedTemplateText
        );
        assert_eq!(cls.status, InstanceStatus::Issue);
    }

    #[test]
    fn half_localized_override_is_inconsistent_in_both_languages() {
        let cfg = DiagConfig::default();
        let template = template_with(&[(
            key(0, 7),
            &[("en-GB", "UF_07 Default"), ("sv-SE", "UF_07 Standard")],
        )]);
        let local = override_with(&[(
            key(0, 7),
            &[("en-GB", "UF_07 Custom text"), ("sv-SE", "")],
        )]);

        let cls = classify(&template, &local, &cfg);
        assert_eq!(
            cls.status_of(key(0, 7), "en-GB"),
            BitStatus::InconsistentOverride
        );
        assert_eq!(
            cls.status_of(key(0, 7), "sv-SE"),
            BitStatus::InconsistentOverride
        );
        assert_eq!(cls.status, InstanceStatus::Issue);
    }

    #[test]
    fn full_override_in_both_languages_is_legitimate() {
        let cfg = DiagConfig::default();
        let template = template_with(&[(
            key(0, 7),
            &[("en-GB", "UF_07"), ("sv-SE", "UF_07")],
        )]);
        let local = override_with(&[(
            key(0, 7),
            &[("en-GB", "UF_12 Custom fault"), ("sv-SE", "UF_12 Eget fel")],
        )]);

        let cls = classify(&template, &local, &cfg);
        assert_eq!(cls.status_of(key(0, 7), "en-GB"), BitStatus::Ok);
        assert!(cls.is_ok());
    }

    #[test]
    fn standard_slot_with_foreign_prefix_is_type_mismatch() {
        let cfg = DiagConfig::default();
        let template = template_with(&[(
            key(0, 7),
            &[("en-GB", "UF_07"), ("sv-SE", "UF_07")],
        )]);
        let local = override_with(&[(
            key(0, 7),
            &[("en-GB", "SW_02 Warning"), ("sv-SE", "SW_02 Varning")],
        )]);

        let cls = classify(&template, &local, &cfg);
        assert_eq!(cls.status_of(key(0, 7), "en-GB"), BitStatus::TypeMismatch);
        assert_eq!(cls.status, InstanceStatus::Issue);
    }

    #[test]
    fn non_standard_template_prefix_is_type_mismatch() {
        let cfg = DiagConfig::default();
        let template = template_with(&[(
            key(1, 2),
            &[("en-GB", "Reserved slot"), ("sv-SE", "Reserverad")],
        )]);
        let local = override_with(&[(
            key(1, 2),
            &[("en-GB", "My alarm"), ("sv-SE", "Mitt larm")],
        )]);

        let cls = classify(&template, &local, &cfg);
        assert_eq!(cls.status_of(key(1, 2), "en-GB"), BitStatus::TypeMismatch);
    }

    #[test]
    fn unsupported_language_is_flagged_before_anything_else() {
        let cfg = DiagConfig::default();
        let template = template_with(&[(
            key(0, 0),
            &[("en-GB", "UF_00"), ("sv-SE", "UF_00")],
        )]);
        let local = override_with(&[(
            key(0, 0),
            &[
                ("en-GB", "UF_00"),
                ("sv-SE", "UF_00"),
                ("de-DE", "UF_00 Sensorfehler"),
            ],
        )]);

        let cls = classify(&template, &local, &cfg);
        assert_eq!(
            cls.status_of(key(0, 0), "de-DE"),
            BitStatus::UnsupportedLanguage
        );
        assert_eq!(cls.status_of(key(0, 0), "en-GB"), BitStatus::Ok);
        assert_eq!(cls.worst_of(key(0, 0)), BitStatus::UnsupportedLanguage);
        assert_eq!(cls.status, InstanceStatus::Issue);
    }

    #[test]
    fn unresolved_marker_in_local_text() {
        let cfg = DiagConfig::default();
        let template = template_with(&[(
            key(0, 1),
            &[("en-GB", "UF_01 Fault"), ("sv-SE", "UF_01 Fel")],
        )]);
        let local = override_with(&[(
            key(0, 1),
            &[("en-GB", "UF_01 <@tagref> lost"), ("sv-SE", "UF_01 Fel")],
        )]);

        let cls = classify(&template, &local, &cfg);
        assert_eq!(cls.status_of(key(0, 1), "en-GB"), BitStatus::InvalidMarker);
        assert_eq!(cls.status_of(key(0, 1), "sv-SE"), BitStatus::Ok);
    }

    #[test]
    fn local_only_bit_is_still_classified() {
        let cfg = DiagConfig::default();
        let template = DiagnosticTemplate::new("MCP_Valve", None);
        let local = override_with(&[(
            key(2, 9),
            &[("en-GB", "UF_09 Stray"), ("sv-SE", "UF_09 Kvar")],
        )]);

        let cls = classify(&template, &local, &cfg);
        // overridden in every language of the union, template side empty:
        // consistent, non-empty, template text "" has no known prefix
        assert_eq!(cls.status_of(key(2, 9), "en-GB"), BitStatus::TypeMismatch);
    }

    #[test]
    fn classification_is_pure() {
        let cfg = DiagConfig::default();
        let template = template_with(&[(
            key(0, 3),
            &[("en-GB", "UF_03"), ("sv-SE", "UF_03")],
        )]);
        let local = override_with(&[(key(0, 3), &[("en-GB", "other"), ("sv-SE", "")])]);

        let first = classify(&template, &local, &cfg);
        let second = classify(&template, &local, &cfg);
        assert_eq!(first, second);
    }
}
