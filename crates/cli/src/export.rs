//! CSV exports: AOI inventory over a directory tree, and the alarm list
//! of one document. Thin wrappers around the catalog and extractor.

use anyhow::{Context, Result};
use diagsync_document::{l5x, Document, Element};
use diagsync_engine::{build_catalog, extract_overrides};
use diagsync_model::DiagConfig;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use walkdir::WalkDir;

fn csv_writer(output: Option<&Path>) -> Result<csv::Writer<Box<dyn Write>>> {
    let inner: Box<dyn Write> = match output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("cannot create {}", path.display()))?,
        ),
        None => Box::new(io::stdout()),
    };
    Ok(csv::Writer::from_writer(inner))
}

/// Crawl `dir` for L5X files and export one row per AOI definition:
/// file, AOI name, revision, instance count. Internal definitions
/// (names starting with `_`) are skipped.
pub fn run_inventory(dir: impl AsRef<Path>, output: Option<&Path>) -> Result<()> {
    let mut writer = csv_writer(output)?;
    writer.write_record(["file", "aoi", "revision", "instances"])?;

    let mut files = 0usize;
    for entry in WalkDir::new(dir.as_ref())
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_file())
    {
        let is_l5x = entry
            .path()
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("l5x"));
        if !is_l5x {
            continue;
        }

        let doc = match Document::parse_file(entry.path()) {
            Ok(doc) => doc,
            Err(err) => {
                log::warn!("skipping {}: {err}", entry.path().display());
                continue;
            }
        };
        files += 1;
        let stem = entry
            .path()
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        for definition in l5x::definitions(&doc) {
            let Some(name) = definition.attr("Name") else {
                continue;
            };
            if name.starts_with('_') {
                continue;
            }
            let revision = definition.attr("Revision").unwrap_or_default();
            let instances = count_instances(&doc, name);
            writer.write_record([&stem, name, revision, &instances.to_string()])?;
        }
    }

    writer.flush()?;
    log::info!("inventoried {files} files");
    Ok(())
}

/// Instances of one AOI type: controller-scoped tags plus tags of every
/// program.
fn count_instances(doc: &Document, aoi: &str) -> usize {
    let controller = l5x::controller_tags(doc)
        .into_iter()
        .filter(|t| t.attr("DataType") == Some(aoi))
        .count();
    let program = program_tags(doc)
        .into_iter()
        .filter(|t| t.attr("DataType") == Some(aoi))
        .count();
    controller + program
}

fn program_tags(doc: &Document) -> Vec<&Element> {
    doc.root
        .child("Controller")
        .and_then(|c| c.child("Programs"))
        .map(|programs| {
            programs
                .children_named("Program")
                .filter_map(|p| p.child("Tags"))
                .flat_map(|tags| tags.children_named("Tag"))
                .collect()
        })
        .unwrap_or_default()
}

/// Export the alarm list of one document: per instance, template rows
/// and local override rows with per-language text. Bare standard slots
/// (short texts like `UF_03`) are skipped unless requested, matching
/// how the inventory reports have always been filtered.
pub fn run_alarms(
    file: &Path,
    output: Option<&Path>,
    include_bare_slots: bool,
    cfg: &DiagConfig,
) -> Result<()> {
    let doc = Document::parse_file(file).with_context(|| format!("cannot load {}", file.display()))?;
    let catalog = build_catalog(&doc, cfg);

    let mut writer = csv_writer(output)?;
    let mut header = vec![
        "instance".to_string(),
        "aoi".to_string(),
        "operand".to_string(),
        "user_defined".to_string(),
    ];
    header.extend(cfg.languages.iter().cloned());
    header.push("other".to_string());
    writer.write_record(&header)?;

    let mut rows = 0usize;
    for tag in l5x::controller_tags(&doc) {
        let (Some(name), Some(data_type)) = (tag.attr("Name"), tag.attr("DataType")) else {
            continue;
        };
        let Some(template) = catalog.get(data_type) else {
            continue;
        };

        for (key, text) in &template.bits {
            let primary = cfg
                .languages
                .first()
                .map_or("", |lang| text.get_or_empty(lang));
            if !include_bare_slots && primary.len() <= 5 {
                continue;
            }
            let mut record = vec![
                name.to_string(),
                data_type.to_string(),
                key.operand(),
                "false".to_string(),
            ];
            for lang in &cfg.languages {
                record.push(text.get_or_empty(lang).to_string());
            }
            record.push(String::new());
            writer.write_record(&record)?;
            rows += 1;
        }

        let local = extract_overrides(tag, cfg);
        for (key, text) in &local.bits {
            let primary = cfg
                .languages
                .first()
                .map_or("", |lang| text.get_or_empty(lang));
            if !include_bare_slots && primary.len() <= 5 {
                continue;
            }
            let mut record = vec![
                name.to_string(),
                data_type.to_string(),
                key.operand(),
                "true".to_string(),
            ];
            for lang in &cfg.languages {
                record.push(text.get_or_empty(lang).to_string());
            }
            let other: Vec<String> = text
                .iter()
                .filter(|(lang, _)| !cfg.is_supported_language(lang))
                .map(|(lang, value)| format!("{lang}-{value}"))
                .collect();
            record.push(other.join(";"));
            writer.write_record(&record)?;
            rows += 1;
        }
    }

    writer.flush()?;
    log::info!("exported {rows} alarm rows");
    Ok(())
}
