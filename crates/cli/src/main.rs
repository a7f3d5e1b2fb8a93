use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use diagsync_document::Document;
use diagsync_engine::{build_catalog, gap_fill, repair_all_eligible, repair_named, report_document};
use diagsync_model::{DiagConfig, InstanceStatus};
use std::fs;
use std::path::{Path, PathBuf};

mod export;
mod render;

#[derive(Parser)]
#[command(name = "diagsync")]
#[command(about = "Reconcile localized diagnostic text between AOI templates and their instances in L5X controller exports", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON/CSV)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// TOML file overriding the default site policy (languages,
    /// placeholders, type prefixes, ...)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify every instance and print a consistency report
    Report(ReportArgs),

    /// Repair one named instance toward its template, then save
    Fix(FixArgs),

    /// Repair all instances whose status is OK; conflicted ones are skipped
    #[command(name = "fix-all")]
    FixAll(FixAllArgs),

    /// Gap-fill the full 3x32 diagnostic matrix of every instance
    #[command(name = "copy-diag")]
    CopyDiag(CopyDiagArgs),

    /// Crawl a directory of L5X files and export an AOI inventory CSV
    Inventory(InventoryArgs),

    /// Export the alarm list of one document as CSV
    Alarms(AlarmsArgs),
}

#[derive(Args)]
struct ReportArgs {
    /// L5X controller export
    file: PathBuf,

    /// Output JSON instead of text
    #[arg(long)]
    json: bool,

    /// Show only instances with issues
    #[arg(long)]
    only_issues: bool,
}

#[derive(Args)]
struct FixArgs {
    /// L5X controller export
    file: PathBuf,

    /// Instance (controller tag) name to repair
    #[arg(long, short = 'i')]
    instance: String,

    /// Output path; the input file is rewritten in place when omitted
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct FixAllArgs {
    /// L5X controller export
    file: PathBuf,

    /// Output path; the input file is rewritten in place when omitted
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct CopyDiagArgs {
    /// L5X controller export
    file: PathBuf,

    /// Output path; the input file is rewritten in place when omitted
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct InventoryArgs {
    /// Directory to crawl for .L5X files
    dir: PathBuf,

    /// Output CSV path (stdout when omitted)
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct AlarmsArgs {
    /// L5X controller export
    file: PathBuf,

    /// Output CSV path (stdout when omitted)
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Include bare standard slots (UF_03-style texts) normally skipped
    #[arg(long)]
    include_bare_slots: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let cfg = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Report(args) => run_report(args, &cfg),
        Commands::Fix(args) => run_fix(args, &cfg),
        Commands::FixAll(args) => run_fix_all(args, &cfg),
        Commands::CopyDiag(args) => run_copy_diag(args, &cfg),
        Commands::Inventory(args) => export::run_inventory(args.dir, args.output.as_deref()),
        Commands::Alarms(args) => export::run_alarms(
            &args.file,
            args.output.as_deref(),
            args.include_bare_slots,
            &cfg,
        ),
    }
}

fn load_config(path: Option<&Path>) -> Result<DiagConfig> {
    let Some(path) = path else {
        return Ok(DiagConfig::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("cannot read config {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("invalid config {}", path.display()))
}

fn load_document(path: &Path) -> Result<Document> {
    Document::parse_file(path).with_context(|| format!("cannot load {}", path.display()))
}

fn save_document(doc: &Document, input: &Path, output: Option<&Path>) -> Result<()> {
    let target = output.unwrap_or(input);
    doc.save_file(target)
        .with_context(|| format!("cannot write {}", target.display()))?;
    log::info!("wrote {}", target.display());
    Ok(())
}

fn run_report(args: ReportArgs, cfg: &DiagConfig) -> Result<()> {
    let doc = load_document(&args.file)?;
    let catalog = build_catalog(&doc, cfg);
    let mut reports = report_document(&doc, &catalog, cfg);
    if args.only_issues {
        reports.retain(|r| r.status == InstanceStatus::Issue);
    }

    let has_issues = reports.iter().any(|r| r.status == InstanceStatus::Issue);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        print!("{}", render::render_reports(&reports));
    }

    // non-zero exit lets CI gates fail on unresolved conflicts
    if has_issues {
        std::process::exit(1);
    }
    Ok(())
}

fn run_fix(args: FixArgs, cfg: &DiagConfig) -> Result<()> {
    let mut doc = load_document(&args.file)?;
    let catalog = build_catalog(&doc, cfg);
    let outcome = repair_named(&mut doc, &catalog, cfg, &args.instance)
        .with_context(|| format!("cannot repair '{}'", args.instance))?;

    if outcome.is_noop() {
        log::info!("'{}' already in sync, nothing to do", args.instance);
    } else {
        log::info!(
            "'{}': {} bits created, {} languages filled, {} overwritten, {} unsupported removed",
            args.instance,
            outcome.bits_created,
            outcome.languages_filled,
            outcome.languages_overwritten,
            outcome.unsupported_removed
        );
    }
    save_document(&doc, &args.file, args.output.as_deref())
}

fn run_fix_all(args: FixAllArgs, cfg: &DiagConfig) -> Result<()> {
    let mut doc = load_document(&args.file)?;
    let catalog = build_catalog(&doc, cfg);
    let outcome = repair_all_eligible(&mut doc, &catalog, cfg);

    log::info!(
        "repaired {} instances, skipped {}",
        outcome.repaired.len(),
        outcome.skipped.len()
    );
    for name in &outcome.skipped {
        println!("skipped {name}: resolve its conflicts, then run `diagsync fix -i {name}`");
    }
    save_document(&doc, &args.file, args.output.as_deref())
}

fn run_copy_diag(args: CopyDiagArgs, cfg: &DiagConfig) -> Result<()> {
    let mut doc = load_document(&args.file)?;
    let catalog = build_catalog(&doc, cfg);

    let mut filled = 0usize;
    let mut instances = 0usize;
    for tag in diagsync_document::l5x::controller_tags_mut(&mut doc) {
        let Some(template) = tag.attr("DataType").and_then(|dt| catalog.get(dt)) else {
            continue;
        };
        let outcome = gap_fill(tag, template, cfg);
        filled += outcome.filled;
        instances += 1;
    }

    log::info!("gap-filled {filled} slots across {instances} instances");
    save_document(&doc, &args.file, args.output.as_deref())
}
