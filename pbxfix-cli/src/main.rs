mod config;
mod discover;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use config::{CliOverrides, ConfigMerger};
use pbxfix_edit::{patch_manifest, PatchError, PatchOptions};
use pbxfix_render::{render_md, render_text};
use pbxfix_types::report::ToolInfo;
use pbxfix_types::rules::TieBreak;
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "pbxfix",
    version,
    about = "Remove stray Info.plist resources and duplicate source registrations from an Xcode project."
)]
struct Cli {
    /// project.pbxproj, an .xcodeproj directory, or a directory holding one (default: current directory).
    path: Option<Utf8PathBuf>,

    /// Config file (default: ./pbxfix.toml if present).
    #[arg(long)]
    config: Option<Utf8PathBuf>,

    /// File whose `in Resources` build-file lines are removed.
    #[arg(long)]
    resource_file: Option<String>,

    /// File whose duplicate `in Sources` references are collapsed.
    #[arg(long)]
    source_file: Option<String>,

    /// Which duplicates to remove: remove-first, keep-last, keep-first.
    #[arg(long)]
    tie_break: Option<TieBreak>,

    /// Suffix appended to the manifest path for the backup copy.
    #[arg(long)]
    backup_suffix: Option<String>,

    /// Report what would change without writing anything.
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Print a unified diff of the change.
    #[arg(long, default_value_t = false)]
    diff: bool,

    /// Output format (text, json, md).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Md,
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        error!("{:?}", e);
        let code = e
            .downcast_ref::<PatchError>()
            .map(PatchError::exit_code)
            .unwrap_or(1);
        return ExitCode::from(code);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let file_config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => config::load_or_default(Utf8Path::new(".")).context("load pbxfix.toml config")?,
    };
    let merged = ConfigMerger::new(file_config).merge(CliOverrides {
        resource_file: cli.resource_file,
        source_file: cli.source_file,
        tie_break: cli.tie_break,
        backup_suffix: cli.backup_suffix,
    });

    debug!(
        "merged config: resource={}, source={}, tie_break={}, backup_suffix={}",
        merged.rules.resource.file_name,
        merged.rules.source.file_name,
        merged.rules.source.tie_break,
        merged.backup_suffix
    );

    let manifest = discover::resolve_manifest(cli.path.as_deref())?;
    let opts = PatchOptions {
        dry_run: cli.dry_run,
        backup_suffix: merged.backup_suffix,
    };
    let (report, patch) = patch_manifest(&manifest, &merged.rules, tool_info(), &opts)?;

    match cli.format {
        OutputFormat::Text => print!("{}", render_text(&report)),
        OutputFormat::Md => print!("{}", render_md(&report)),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report).context("serialize report")?;
            println!("{}", json);
        }
    }

    let show_patch = cli.diff || cli.dry_run;
    if show_patch && !patch.is_empty() && !matches!(cli.format, OutputFormat::Json) {
        println!();
        print!("{}", patch);
    }

    Ok(())
}

fn tool_info() -> ToolInfo {
    ToolInfo {
        name: "pbxfix".to_string(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    }
}
