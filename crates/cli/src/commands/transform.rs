use crate::commands::common::CommandContext;
use crate::report::print_diagnostic;
use crate::OutputOptions;
use anyhow::{Context, Result};
use colored::Colorize;
use gql_typegen_config::PluginConfig;
use gql_typegen_introspect::FetchSchema;
use gql_typegen_plugin::GqlPlugin;
use gql_typegen_types::Diagnostic;
use std::io::Write;
use std::path::{Path, PathBuf};

/// The rewritten code of one file plus its warnings.
#[derive(Debug)]
pub struct Transformed {
    pub code: String,
    pub rewritten: bool,
    pub warnings: Vec<Diagnostic>,
}

/// Run the plugin transform over `code` the way a bundler would.
///
/// Outside a build, declarations are written when the config names an output
/// file.
pub async fn transform_source<F: FetchSchema>(
    plugin: &mut GqlPlugin<F>,
    code: &str,
    id: &str,
    is_build: bool,
) -> Result<Transformed> {
    if !is_build {
        plugin.build_start();
    }
    let output = plugin.transform(code, id).await;

    let transformed = match output {
        Ok(Some(output)) => Transformed {
            code: output.code,
            rewritten: true,
            warnings: output.warnings,
        },
        Ok(None) => Transformed {
            code: code.to_string(),
            rewritten: false,
            warnings: Vec::new(),
        },
        Err(error) => {
            if let Some(offset) = error.offset() {
                print_diagnostic(
                    Path::new(id),
                    code,
                    &Diagnostic::error(error.to_string(), Some(offset)),
                );
            }
            return Err(error.into());
        }
    };

    plugin
        .flush_declarations()
        .await
        .context("Failed to write declarations")?;
    Ok(transformed)
}

/// Development transforms keep the declaration file only when one is
/// configured.
fn session_config(ctx: &CommandContext, is_build: bool) -> PluginConfig {
    let mut config = ctx.config.clone();
    config.out_file = ctx.out_file(None);
    if !is_build && config.out_file.is_none() {
        config.automatically_generate_types = false;
    }
    config
}

#[tracing::instrument(skip(config_path, output_opts), fields(file = %file.display()))]
pub async fn run(
    config_path: Option<PathBuf>,
    file: PathBuf,
    build: bool,
    output: Option<PathBuf>,
    schema_file: Option<PathBuf>,
    output_opts: OutputOptions,
) -> Result<()> {
    let ctx = CommandContext::load(config_path)?;
    let code = std::fs::read_to_string(&file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let fetcher = ctx.fetcher(schema_file);
    let mut plugin = GqlPlugin::with_fetcher(session_config(&ctx, build), fetcher, build)?;
    let id = file.display().to_string();
    let transformed = transform_source(&mut plugin, &code, &id, build).await?;

    for warning in &transformed.warnings {
        print_diagnostic(&file, &code, warning);
    }

    if let Some(path) = output {
        std::fs::write(&path, &transformed.code)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        if output_opts.show_info {
            println!(
                "{} Transformed {} into {}",
                "✓".green(),
                file.display().to_string().cyan(),
                path.display().to_string().cyan()
            );
        }
    } else {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(transformed.code.as_bytes())
            .context("Failed to write to stdout")?;
    }

    if !transformed.rewritten && output_opts.show_info {
        eprintln!(
            "{} {} does not import {}",
            "!".yellow(),
            file.display(),
            ctx.config.module_id
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gql_typegen_introspect::SdlFileFetcher;
    use gql_typegen_test_utils::fixtures::{SWAPI_SCHEMA, TS_SOURCE};
    use tempfile::TempDir;

    struct Project {
        dir: TempDir,
        ctx: CommandContext,
    }

    impl Project {
        fn new(config: &str) -> Self {
            let dir = TempDir::new().unwrap();
            std::fs::write(dir.path().join("schema.graphql"), SWAPI_SCHEMA).unwrap();
            let config_path = dir.path().join("gql-typegen.yml");
            std::fs::write(&config_path, config).unwrap();
            let ctx = CommandContext::from_path(&config_path).unwrap();
            Self { dir, ctx }
        }

        fn plugin(&self, is_build: bool) -> GqlPlugin<SdlFileFetcher> {
            let fetcher = SdlFileFetcher::new(self.dir.path().join("schema.graphql"));
            GqlPlugin::with_fetcher(session_config(&self.ctx, is_build), fetcher, is_build)
                .unwrap()
        }
    }

    #[tokio::test]
    async fn test_dev_transform_writes_configured_declarations() {
        let project = Project::new("url: https://swapi.example/graphql\noutFile: gql.d.ts\n");
        let mut plugin = project.plugin(false);

        let transformed = transform_source(&mut plugin, TS_SOURCE, "src/main.ts", false)
            .await
            .unwrap();

        assert!(transformed.rewritten);
        assert!(transformed.warnings.is_empty());
        let declarations = std::fs::read_to_string(project.dir.path().join("gql.d.ts")).unwrap();
        assert!(declarations.contains("declare module '$gql' {"));
    }

    #[tokio::test]
    async fn test_dev_transform_without_out_file() {
        let project = Project::new("url: https://swapi.example/graphql\n");
        let mut plugin = project.plugin(false);

        let transformed = transform_source(&mut plugin, TS_SOURCE, "src/main.ts", false)
            .await
            .unwrap();
        assert!(transformed.rewritten);
        assert!(!project.dir.path().join("gql.d.ts").exists());
    }

    #[tokio::test]
    async fn test_build_transform_fails_on_projection_error() {
        let project = Project::new("url: https://swapi.example/graphql\n");
        let mut plugin = project.plugin(true);

        let source = "import gql from '$gql';\ngql(`{ film { rating } }`);\n";
        let error = transform_source(&mut plugin, source, "src/broken.ts", true)
            .await
            .unwrap_err();
        assert_eq!(
            crate::ExitCode::for_error(&error),
            crate::ExitCode::ValidationError
        );
    }

    #[tokio::test]
    async fn test_untouched_file_is_echoed() {
        let project = Project::new("url: https://swapi.example/graphql\n");
        let mut plugin = project.plugin(true);

        let transformed = transform_source(&mut plugin, "export const x = 1;\n", "src/x.ts", true)
            .await
            .unwrap();
        assert!(!transformed.rewritten);
        assert_eq!(transformed.code, "export const x = 1;\n");
    }
}
