use diagsync_document::{l5x, Element};
use diagsync_model::{BitKey, BitText, DiagConfig, InstanceOverride};

/// Read an instance's local diagnostic overrides from its tag element.
///
/// Comments whose operand does not address a diagnostic word belong to
/// other bits and are ignored. Unlike the catalog builder, text is kept
/// for *all* observed language codes, so the classifier can flag
/// unsupported ones. A tag without a `Comments` element yields an empty
/// override — absence is meaningful.
pub fn extract_overrides(tag: &Element, cfg: &DiagConfig) -> InstanceOverride {
    let mut overrides = InstanceOverride::new();
    let Some(comments) = l5x::comments(tag) else {
        return overrides;
    };

    for comment in comments.children_named("Comment") {
        let Some(key) = comment
            .attr("Operand")
            .and_then(BitKey::parse_operand)
            .filter(|key| key.word < cfg.word_limit)
        else {
            continue;
        };
        let mut text: BitText = cfg
            .languages
            .iter()
            .map(|lang| (lang.clone(), String::new()))
            .collect();
        for (lang, value) in l5x::localized_texts(comment) {
            text.set(lang, value);
        }
        overrides.insert(key, text);
    }

    overrides
}
