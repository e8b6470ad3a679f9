//! Watch mode infrastructure.
//!
//! A [`WatchSession`] feeds changed files through the plugin transform so the
//! declaration aggregator keeps the output file current. [`FileWatcher`] drives
//! a session from `notify` events, debouncing bursts of changes.

use crate::report::{clock_now, print_diagnostic};
use crate::OutputOptions;
use anyhow::{Context, Result};
use colored::Colorize;
use gql_typegen_extract::collect_sources;
use gql_typegen_introspect::FetchSchema;
use gql_typegen_plugin::GqlPlugin;
use gql_typegen_types::{Diagnostic, Language};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Debounce duration for file changes (milliseconds)
const DEBOUNCE_MS: u64 = 100;

/// Decides which changed paths are sources of the session.
#[derive(Debug)]
pub struct SourceMatcher {
    patterns: Vec<glob::Pattern>,
    exclude: Option<PathBuf>,
}

impl SourceMatcher {
    /// Compile `globs`, anchoring relative patterns at `base_dir`.
    pub fn new(globs: &[String], base_dir: &Path, exclude: Option<PathBuf>) -> Result<Self> {
        let patterns = globs
            .iter()
            .map(|pattern| {
                let anchored = absolute(Path::new(pattern), base_dir);
                glob::Pattern::new(&anchored.to_string_lossy())
                    .with_context(|| format!("Invalid glob pattern '{pattern}'"))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns, exclude })
    }

    pub fn matches(&self, path: &Path) -> bool {
        if self.exclude.as_deref() == Some(path) || Language::from_path(path).is_none() {
            return false;
        }
        if path
            .components()
            .any(|component| component.as_os_str() == "node_modules")
        {
            return false;
        }
        self.patterns
            .iter()
            .any(|pattern| pattern.matches_path(path))
    }
}

/// Directories to watch for `globs`: the longest glob-free prefix of each
/// pattern that exists, falling back to `base_dir`.
pub fn watch_roots(globs: &[String], base_dir: &Path) -> BTreeSet<PathBuf> {
    let mut roots = BTreeSet::new();

    for pattern in globs {
        let anchored = absolute(Path::new(pattern), base_dir);
        let mut root = PathBuf::new();
        for component in anchored.components() {
            let literal = !component
                .as_os_str()
                .to_string_lossy()
                .contains(['*', '?', '[', ']']);
            if !literal {
                break;
            }
            root.push(component);
        }
        while !root.is_dir() {
            if !root.pop() {
                break;
            }
        }
        if root.is_dir() {
            roots.insert(root);
        }
    }

    if roots.is_empty() {
        roots.insert(base_dir.to_path_buf());
    }
    roots
}

fn absolute(path: &Path, base_dir: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    };
    // drop `.` so patterns line up with the paths notify reports
    joined
        .components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect()
}

/// Outcome of one pass over changed files.
#[derive(Debug, Default)]
pub struct PassResult {
    pub transformed: usize,
    pub warnings: usize,
    pub errors: usize,
    pub changed_files: Vec<PathBuf>,
    pub declarations_changed: bool,
    pub duration: Duration,
}

/// Plugin state for a development session over a set of globs.
pub struct WatchSession<F: FetchSchema> {
    plugin: GqlPlugin<F>,
    globs: Vec<String>,
    base_dir: PathBuf,
    matcher: SourceMatcher,
}

impl<F: FetchSchema> WatchSession<F> {
    /// `plugin` must be in development mode with `build_start` called.
    pub fn new(plugin: GqlPlugin<F>, globs: Vec<String>, base_dir: &Path) -> Result<Self> {
        let out_file = plugin
            .config()
            .out_file
            .as_deref()
            .map(|path| absolute(path, base_dir));
        let matcher = SourceMatcher::new(&globs, base_dir, out_file)?;
        Ok(Self {
            plugin,
            globs,
            base_dir: base_dir.to_path_buf(),
            matcher,
        })
    }

    pub fn matcher(&self) -> &SourceMatcher {
        &self.matcher
    }

    pub fn globs(&self) -> &[String] {
        &self.globs
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Transform every file the globs match.
    pub async fn initial_pass(&self) -> Result<PassResult> {
        let anchored: Vec<String> = self
            .globs
            .iter()
            .map(|pattern| {
                absolute(Path::new(pattern), &self.base_dir)
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        let mut files =
            collect_sources(&anchored).context("Failed to expand --from-glob patterns")?;
        files.retain(|path| self.matcher.matches(path));
        let mut result = self.process(&files).await?;
        result.changed_files.clear();
        Ok(result)
    }

    /// Re-transform changed files; files that no longer exist are dropped
    /// from the declarations.
    pub async fn process(&self, changed: &[PathBuf]) -> Result<PassResult> {
        let start = Instant::now();
        let mut result = PassResult::default();

        for path in changed {
            let id = path.display().to_string();
            let code = match std::fs::read_to_string(path) {
                Ok(code) => code,
                Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                    tracing::debug!(file = %id, "Source removed");
                    self.plugin.remove_file(&id).await?;
                    continue;
                }
                Err(error) => {
                    eprintln!("{} {}: {error}", "✗".red(), path.display());
                    result.errors += 1;
                    continue;
                }
            };

            match self.plugin.transform(&code, &id).await {
                Ok(Some(output)) => {
                    result.transformed += 1;
                    result.warnings += output.warnings.len();
                    for warning in &output.warnings {
                        print_diagnostic(path, &code, warning);
                    }
                }
                // the file may have dropped its import
                Ok(None) => self.plugin.remove_file(&id).await?,
                Err(error) => {
                    result.errors += 1;
                    print_diagnostic(
                        path,
                        &code,
                        &Diagnostic::error(error.to_string(), error.offset()),
                    );
                }
            }
        }

        result.declarations_changed = self
            .plugin
            .flush_declarations()
            .await
            .context("Failed to write declarations")?;
        result.changed_files = changed.to_vec();
        result.duration = start.elapsed();
        Ok(result)
    }
}

/// Runs a [`WatchSession`] on file system events.
pub struct FileWatcher<F: FetchSchema> {
    session: WatchSession<F>,
    watcher: RecommendedWatcher,
    events: mpsc::UnboundedReceiver<notify::Result<Event>>,
    roots: BTreeSet<PathBuf>,
}

impl<F: FetchSchema> FileWatcher<F> {
    pub fn new(session: WatchSession<F>) -> Result<Self> {
        let roots = watch_roots(session.globs(), session.base_dir());

        let (tx, events) = mpsc::unbounded_channel();
        let watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })
        .context("Failed to create file watcher")?;

        Ok(Self {
            session,
            watcher,
            events,
            roots,
        })
    }

    /// Start watching for file changes
    pub fn start(&mut self) -> Result<()> {
        for root in &self.roots {
            self.watcher
                .watch(root, RecursiveMode::Recursive)
                .with_context(|| format!("Failed to watch path: {}", root.display()))?;
        }
        Ok(())
    }

    /// Run the watch loop until the event stream closes.
    pub async fn run(&mut self, output_opts: OutputOptions) -> Result<()> {
        if output_opts.show_info {
            self.print_header();
        }

        let result = self.session.initial_pass().await?;
        print_result(&result, true, output_opts);

        let debounce = Duration::from_millis(DEBOUNCE_MS);
        let mut pending: BTreeSet<PathBuf> = BTreeSet::new();
        let mut last_change: Option<Instant> = None;

        loop {
            let wait = if last_change.is_some() {
                debounce
            } else {
                Duration::from_secs(60)
            };

            match tokio::time::timeout(wait, self.events.recv()).await {
                Ok(Some(Ok(event))) => {
                    if matches!(event.kind, EventKind::Access(_)) {
                        continue;
                    }
                    for path in event.paths {
                        if self.session.matcher().matches(&path) {
                            pending.insert(path);
                            last_change = Some(Instant::now());
                        }
                    }
                }
                Ok(Some(Err(e))) => {
                    eprintln!("{} {}", "Watch error:".red(), e);
                }
                Ok(None) => break,
                Err(_elapsed) => {
                    let Some(last) = last_change else { continue };
                    if last.elapsed() < debounce || pending.is_empty() {
                        continue;
                    }
                    let changed: Vec<PathBuf> = std::mem::take(&mut pending).into_iter().collect();
                    last_change = None;

                    let result = self.session.process(&changed).await?;
                    print_result(&result, false, output_opts);
                }
            }
        }

        Ok(())
    }

    fn print_header(&self) {
        println!();
        println!(
            "{} Watching for changes... (press {} to stop)",
            "●".cyan(),
            "Ctrl+C".bold()
        );
        for root in &self.roots {
            println!("  {}", root.display().to_string().dimmed());
        }
        println!();
    }
}

fn print_result(result: &PassResult, is_initial: bool, output_opts: OutputOptions) {
    if !output_opts.show_info && result.errors == 0 {
        return;
    }
    let timestamp = format!("[{}]", clock_now()).dimmed();

    if !is_initial {
        for file in &result.changed_files {
            println!(
                "{} {} changed",
                timestamp,
                file.file_name()
                    .map_or_else(
                        || file.display().to_string(),
                        |n| n.to_string_lossy().to_string(),
                    )
                    .cyan()
            );
        }
    }

    let summary = format!("{} file(s) transformed", result.transformed);
    if result.errors > 0 {
        println!(
            "{} {}",
            timestamp,
            format!("✗ {summary}, {} error(s)", result.errors).red()
        );
    } else if result.warnings > 0 {
        println!(
            "{} {}",
            timestamp,
            format!("✓ {summary}, {} warning(s)", result.warnings)
                .yellow()
                .bold()
        );
    } else {
        println!("{} {}", timestamp, format!("✓ {summary}").green().bold());
    }
    if result.declarations_changed {
        println!("  {} declarations updated", "↻".cyan());
    }
    println!("  {} {:.2}s", "⏱".dimmed(), result.duration.as_secs_f64());
}
