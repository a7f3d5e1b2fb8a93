use diagsync_document::{l5x, Document, Element};
use diagsync_model::{BitKey, BitText, Catalog, DiagConfig, DiagnosticTemplate};

/// Build the diagnostic catalog from a loaded document.
///
/// A definition qualifies only when it declares the device discriminator
/// parameter and is not the excluded abstract base type (all device
/// types derive from it; counting it would double every bit). For each
/// `iDiagnostic<N>` parameter, bit comments are read with text for the
/// supported languages only — other language codes are not template
/// defects and are dropped here. Definitions missing expected structure
/// are skipped, never fatal.
pub fn build_catalog(doc: &Document, cfg: &DiagConfig) -> Catalog {
    let mut catalog = Catalog::new();

    for definition in l5x::definitions(doc) {
        let Some(name) = definition.attr("Name") else {
            log::debug!("skipping definition without Name attribute");
            continue;
        };
        if !is_diagnostic_capable(definition, cfg) {
            continue;
        }

        let mut template =
            DiagnosticTemplate::new(name, definition.attr("Revision").map(String::from));
        let Some(parameters) = definition.child("Parameters") else {
            log::debug!("definition '{name}' has no Parameters element, skipping");
            continue;
        };

        for param in parameters.elements() {
            let Some(word) = param.attr("Name").and_then(|n| cfg.word_for_param(n)) else {
                continue;
            };
            let Some(comments) = l5x::comments(param) else {
                continue;
            };
            for comment in comments.children_named("Comment") {
                let Some(key) = comment
                    .attr("Operand")
                    .and_then(|op| BitKey::parse_bit_operand(word, op))
                else {
                    continue;
                };
                template.bits.insert(key, template_bit_text(comment, cfg));
            }
        }

        log::debug!(
            "catalog: template '{}' with {} bits",
            template.name,
            template.bits.len()
        );
        catalog.insert(template);
    }

    log::info!("built diagnostic catalog: {} templates", catalog.len());
    catalog
}

fn is_diagnostic_capable(definition: &Element, cfg: &DiagConfig) -> bool {
    if definition.attr("Name") == Some(cfg.excluded_base_type.as_str()) {
        return false;
    }
    definition
        .child("Parameters")
        .map(|params| {
            params
                .elements()
                .any(|p| p.attr("Name") == Some(cfg.device_marker_param.as_str()))
        })
        .unwrap_or(false)
}

/// Template text for one bit: every supported language is present, empty
/// when the definition carries no text for it; unsupported codes are
/// silently dropped.
fn template_bit_text(comment: &Element, cfg: &DiagConfig) -> BitText {
    let mut text: BitText = cfg
        .languages
        .iter()
        .map(|lang| (lang.clone(), String::new()))
        .collect();
    for (lang, value) in l5x::localized_texts(comment) {
        if cfg.is_supported_language(&lang) {
            text.set(lang, value);
        }
    }
    text
}
