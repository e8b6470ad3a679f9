mod commands;
mod exit_code;
mod progress;
mod report;
mod watch;

pub use exit_code::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gql-typegen")]
#[command(about = "Typed GraphQL query calls for TypeScript and JavaScript", long_about = None)]
#[command(version)]
#[allow(clippy::struct_excessive_bools)]
struct Cli {
    /// Path to the gql-typegen config file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Force colored output even when not a TTY
    #[arg(long, global = true, conflicts_with = "no_color")]
    color: bool,

    /// Disable colored output
    #[arg(long, global = true, conflicts_with = "color")]
    no_color: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Suppress progress indicators (spinners)
    #[arg(long, global = true)]
    no_progress: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Output verbosity options
#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    /// Whether to show progress indicators (spinners)
    pub show_progress: bool,
    /// Whether to show informational output (success messages, summaries)
    pub show_info: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Project every query call in the matched files and write the declaration file
    Generate {
        /// Glob patterns selecting the source files (repeatable)
        #[arg(long = "from-glob", value_name = "GLOB", required = true, num_args = 1..)]
        from_glob: Vec<String>,

        /// Declaration file to write (overrides `outFile` from the config)
        #[arg(short, long, value_name = "FILE")]
        out_file: Option<PathBuf>,

        /// Read the schema from an SDL file instead of introspecting the endpoint
        #[arg(long, value_name = "FILE")]
        schema: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// Rewrite the query calls of one file and print the result
    Transform {
        /// The file to transform
        file: PathBuf,

        /// Production behaviour: projection errors fail the transform
        #[arg(long)]
        build: bool,

        /// Write the rewritten code to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Read the schema from an SDL file instead of introspecting the endpoint
        #[arg(long, value_name = "FILE")]
        schema: Option<PathBuf>,
    },

    /// Keep the declaration file up to date while files change
    ///
    /// Polls the schema when `watchSchema.interval` is configured and
    /// re-projects every query whenever it changes.
    Watch {
        /// Glob patterns selecting the source files (repeatable)
        #[arg(long = "from-glob", value_name = "GLOB", required = true, num_args = 1..)]
        from_glob: Vec<String>,

        /// Read the schema from an SDL file instead of introspecting the endpoint
        #[arg(long, value_name = "FILE")]
        schema: Option<PathBuf>,
    },

    /// Schema-related commands (download, etc.)
    Schema {
        #[command(subcommand)]
        command: commands::schema::SchemaCommands,
    },

    /// Print the runtime module served for the query module id
    Runtime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Human,
    /// JSON output for tooling
    Json,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing();
    configure_colors(cli.color, cli.no_color);

    let output_opts = OutputOptions {
        show_progress: !cli.quiet && !cli.no_progress,
        show_info: !cli.quiet,
    };

    let result = match cli.command {
        Commands::Generate {
            from_glob,
            out_file,
            schema,
            format,
        } => {
            commands::generate::run(cli.config, from_glob, out_file, schema, format, output_opts)
                .await
        }
        Commands::Transform {
            file,
            build,
            output,
            schema,
        } => commands::transform::run(cli.config, file, build, output, schema, output_opts).await,
        Commands::Watch { from_glob, schema } => {
            commands::watch::run(cli.config, from_glob, schema, output_opts).await
        }
        Commands::Schema { command } => {
            commands::schema::run(cli.config, command, output_opts).await
        }
        Commands::Runtime => commands::runtime::run(cli.config),
    };

    if let Err(error) = result {
        eprintln!("{} {error:#}", "✗".red().bold());
        ExitCode::for_error(&error).exit();
    }
}

/// Initialize tracing; silent unless `RUST_LOG` is set
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("off")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Configure colored output based on flags and environment variables.
///
/// Priority order (highest to lowest):
/// 1. `--color` flag (force colors on)
/// 2. `--no-color` flag (force colors off)
/// 3. `NO_COLOR` environment variable (if set to any value, disable colors)
/// 4. `CLICOLOR_FORCE` environment variable (if set to non-zero, force colors)
/// 5. `CLICOLOR` environment variable (if set to "0", disable colors)
/// 6. Default: colors enabled if stdout is a TTY (handled by `colored` crate)
///
/// See: <https://no-color.org/> and <https://bixense.com/clicolors/>
fn configure_colors(force_color: bool, no_color: bool) {
    use colored::control;

    if force_color {
        control::set_override(true);
    } else if no_color {
        control::set_override(false);
    } else if std::env::var_os("NO_COLOR").is_some() {
        control::set_override(false);
    } else if let Ok(val) = std::env::var("CLICOLOR_FORCE") {
        if !val.is_empty() && val != "0" {
            control::set_override(true);
        }
    } else if let Ok(val) = std::env::var("CLICOLOR") {
        if val == "0" {
            control::set_override(false);
        }
    }
}
