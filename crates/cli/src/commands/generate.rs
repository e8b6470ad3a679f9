use crate::commands::common::CommandContext;
use crate::progress::maybe_spinner;
use crate::report::{diagnostic_json, print_diagnostic};
use crate::{OutputFormat, OutputOptions};
use anyhow::{Context, Result};
use colored::Colorize;
use gql_typegen_codegen::ProjectionOptions;
use gql_typegen_config::PluginConfig;
use gql_typegen_dts::{write_dts_file, FileRecord, Registry};
use gql_typegen_extract::{
    collect_sources, extract_queries, read_source, ErrorMode, ExtractError, WalkContext,
};
use gql_typegen_introspect::{FetchSchema, SchemaRef};
use gql_typegen_types::{FileId, Language};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// What happened to one file.
#[derive(Debug)]
pub enum FileOutcome {
    /// The file imports the query module; `queries` distinct literals
    Projected { queries: usize },
    /// The file does not parse or never imports the query module
    Skipped,
    Failed { source: String, error: ExtractError },
}

#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: FileOutcome,
}

#[derive(Debug, Default)]
pub struct GenerateReport {
    pub registry: Registry,
    pub files: Vec<FileReport>,
}

impl GenerateReport {
    pub fn failures(&self) -> usize {
        self.files
            .iter()
            .filter(|file| matches!(file.outcome, FileOutcome::Failed { .. }))
            .count()
    }
}

/// Project every query call of `files` with errors fatal per file.
///
/// A failing file is reported and left out of the registry; the remaining
/// files are still projected. Unreadable files abort the run.
pub fn project_files(
    files: &[PathBuf],
    schema: &SchemaRef,
    config: &PluginConfig,
) -> Result<GenerateReport> {
    let options = ProjectionOptions::from_config(config);
    let context = WalkContext {
        schema,
        options: &options,
        mode: ErrorMode::Fatal,
    };

    let mut report = GenerateReport::default();
    for path in files {
        let Some(language) = Language::from_path(path) else {
            continue;
        };
        let source = read_source(path)?;

        let outcome = match extract_queries(&source, language, &config.module_id, &context, false)
        {
            Ok(Some(output)) => {
                let queries = output.queries.len();
                report
                    .registry
                    .insert(FileId::from_path(path), FileRecord::new(output.queries, schema.clone()));
                FileOutcome::Projected { queries }
            }
            Ok(None) => FileOutcome::Skipped,
            Err(error) => FileOutcome::Failed { source, error },
        };
        report.files.push(FileReport {
            path: path.clone(),
            outcome,
        });
    }

    Ok(report)
}

#[tracing::instrument(skip_all, fields(patterns = ?globs))]
pub async fn run(
    config_path: Option<PathBuf>,
    globs: Vec<String>,
    out_file: Option<PathBuf>,
    schema_file: Option<PathBuf>,
    format: OutputFormat,
    output_opts: OutputOptions,
) -> Result<()> {
    let start_time = Instant::now();
    let human = format == OutputFormat::Human;

    let ctx = CommandContext::load(config_path)?;
    let out_file = ctx.require_out_file(out_file)?;
    let files = collect_sources(&globs).context("Failed to expand --from-glob patterns")?;
    if files.is_empty() && human && output_opts.show_info {
        println!("{} No source files matched {}", "!".yellow(), globs.join(", "));
    }

    let spinner = maybe_spinner(human && output_opts.show_progress, "Loading schema...");
    let schema = ctx.fetcher(schema_file).fetch().await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    let schema = schema.context("Failed to load the GraphQL schema")?;

    let report = project_files(&files, &schema, &ctx.config)?;
    let failures = report.failures();

    if human {
        print_human(&report, output_opts);
    }

    let changed = if failures == 0 {
        Some(
            write_dts_file(&ctx.config.module_id, &report.registry, &out_file)
                .await
                .with_context(|| format!("Failed to write {}", out_file.display()))?,
        )
    } else {
        None
    };

    if !human {
        print_json(&report, &out_file, changed, start_time);
    } else if let Some(changed) = changed {
        if output_opts.show_info {
            let note = if changed { "" } else { " (unchanged)" };
            println!(
                "{} Types written to {}{}",
                "✓".green(),
                out_file.display().to_string().cyan(),
                note.dimmed()
            );
            println!("  {} {:.2}s", "⏱".dimmed(), start_time.elapsed().as_secs_f64());
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} file(s) failed to project; declarations were not written");
    }
    Ok(())
}

fn print_human(report: &GenerateReport, output_opts: OutputOptions) {
    for file in &report.files {
        match &file.outcome {
            FileOutcome::Projected { .. } => {
                if output_opts.show_info {
                    println!("- {} {}", display_path(&file.path), "✓".green());
                }
            }
            FileOutcome::Skipped => {}
            FileOutcome::Failed { source, error } => {
                println!("- {} {}", display_path(&file.path), "✗".red());
                print_diagnostic(&file.path, source, &error.to_diagnostic());
            }
        }
    }
}

fn print_json(
    report: &GenerateReport,
    out_file: &Path,
    changed: Option<bool>,
    start_time: Instant,
) {
    let files: Vec<_> = report
        .files
        .iter()
        .filter_map(|file| match &file.outcome {
            FileOutcome::Projected { queries } => Some(serde_json::json!({
                "file": display_path(&file.path),
                "status": "ok",
                "queries": queries,
            })),
            FileOutcome::Skipped => None,
            FileOutcome::Failed { source, error } => Some(serde_json::json!({
                "file": display_path(&file.path),
                "status": "error",
                "diagnostic": diagnostic_json(&file.path, source, &error.to_diagnostic()),
            })),
        })
        .collect();

    println!(
        "{}",
        serde_json::json!({
            "type": "result",
            "files": files,
            "outFile": out_file.display().to_string(),
            "written": changed.is_some(),
            "changed": changed.unwrap_or(false),
            "duration_ms": start_time.elapsed().as_millis(),
        })
    );
}

fn display_path(path: &Path) -> String {
    path.display().to_string()
}
