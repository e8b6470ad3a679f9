//! End-to-end tests of the plugin hooks against an SDL file schema.

use gql_typegen_config::PluginConfig;
use gql_typegen_introspect::SdlFileFetcher;
use gql_typegen_plugin::{GqlPlugin, PluginError};
use gql_typegen_test_utils::fixtures::{SWAPI_SCHEMA, TS_SOURCE};
use gql_typegen_test_utils::format_diagnostic_messages;
use std::path::PathBuf;
use tempfile::TempDir;

struct Project {
    dir: TempDir,
}

impl Project {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("schema.graphql"), SWAPI_SCHEMA).unwrap();
        Self { dir }
    }

    fn out_file(&self) -> PathBuf {
        self.dir.path().join("src/gql.d.ts")
    }

    fn config(&self) -> PluginConfig {
        let mut config = PluginConfig::new("https://swapi.example/graphql");
        config.out_file = Some(self.out_file());
        config
    }

    fn plugin(&self, config: PluginConfig, is_build: bool) -> GqlPlugin<SdlFileFetcher> {
        let fetcher = SdlFileFetcher::new(self.dir.path().join("schema.graphql"));
        GqlPlugin::with_fetcher(config, fetcher, is_build).unwrap()
    }

    fn declarations(&self) -> String {
        std::fs::read_to_string(self.out_file()).unwrap()
    }
}

#[tokio::test]
async fn test_dev_transform_writes_declarations() {
    let project = Project::new();
    let mut plugin = project.plugin(project.config(), false);
    plugin.build_start();

    let output = plugin
        .transform(TS_SOURCE, "/project/src/main.ts")
        .await
        .unwrap()
        .unwrap();

    assert!(output.warnings.is_empty());
    assert!(output
        .code
        .contains(r#"gql("\"query{allFilms{films{title director}}}\"")"#));

    plugin.flush_declarations().await.unwrap();
    let declarations = project.declarations();
    assert!(declarations.contains("declare module '$gql' {"));
    assert!(declarations.contains(
        r#"export default function gql(query: "query ($id: ID!) { starship(id: $id) { name id } }", variables: { "id": string }): Promise<{ "starship": { "name": string | null; "id": string } | null } | null>;"#
    ));
}

#[tokio::test]
async fn test_dev_errors_are_deferred() {
    let project = Project::new();
    let mut plugin = project.plugin(project.config(), false);
    plugin.build_start();

    let source = "import gql from '$gql';\nexport const q = gql(`{ film { rating } }`);\n";
    let output = plugin
        .transform(source, "/project/src/broken.ts")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(
        format_diagnostic_messages(&output.warnings),
        "[1] Property 'rating' does not exist on type Film"
    );
    assert_eq!(output.warnings[0].offset, source.find("rating"));
    assert!(output.code.contains("throw new Error("));

    plugin.flush_declarations().await.unwrap();
    assert!(project
        .declarations()
        .contains("/** @deprecated Property 'rating' does not exist on type Film */"));
}

#[tokio::test]
async fn test_removed_file_leaves_declarations() {
    let project = Project::new();
    let mut plugin = project.plugin(project.config(), false);
    plugin.build_start();

    plugin
        .transform(TS_SOURCE, "/project/src/main.ts?t=1")
        .await
        .unwrap();
    plugin.flush_declarations().await.unwrap();
    assert!(project.declarations().contains("allFilms"));

    plugin.remove_file("/project/src/main.ts").await.unwrap();
    plugin.flush_declarations().await.unwrap();
    assert!(!project.declarations().contains("allFilms"));
}

#[tokio::test]
async fn test_dropped_import_removes_overloads() {
    let project = Project::new();
    let mut plugin = project.plugin(project.config(), false);
    plugin.build_start();

    plugin
        .transform(TS_SOURCE, "/project/src/main.ts")
        .await
        .unwrap();
    plugin.flush_declarations().await.unwrap();
    assert!(project.declarations().contains("allFilms"));

    let output = plugin
        .transform("export const films = [];\n", "/project/src/main.ts?t=2")
        .await
        .unwrap();
    assert!(output.is_none());
    plugin.flush_declarations().await.unwrap();
    assert!(!project.declarations().contains("allFilms"));
}

#[tokio::test]
async fn test_build_errors_are_fatal() {
    let project = Project::new();
    let mut plugin = project.plugin(project.config(), true);
    plugin.build_start();

    let source = "import gql from '$gql';\ngql(`{ film { rating } }`);\n";
    let err = plugin
        .transform(source, "/project/src/broken.ts")
        .await
        .unwrap_err();

    assert!(matches!(err, PluginError::Transform { .. }));
    assert_eq!(err.offset(), source.find("rating"));
    assert!(!plugin.flush_declarations().await.unwrap());
    assert!(!project.out_file().exists());
}

#[tokio::test]
async fn test_files_without_import_pass_through() {
    let project = Project::new();
    let plugin = project.plugin(project.config(), false);

    let untouched = plugin
        .transform("export const x = 1;", "/project/src/other.ts")
        .await
        .unwrap();
    assert!(untouched.is_none());

    let unparseable = plugin
        .transform("import gql from '$gql';\ngql(`{`", "/project/src/bad.ts")
        .await
        .unwrap();
    assert!(unparseable.is_none());

    let stylesheet = plugin
        .transform("body {}", "/project/src/app.css")
        .await
        .unwrap();
    assert!(stylesheet.is_none());
}

#[tokio::test]
async fn test_query_suffix_on_id() {
    let project = Project::new();
    let plugin = project.plugin(project.config(), true);

    let output = plugin
        .transform(TS_SOURCE, "/project/src/main.ts?v=123")
        .await
        .unwrap();
    assert!(output.is_some());
}

#[test]
fn test_virtual_module() {
    let project = Project::new();
    let mut config = project.config();
    config.module_id = "virtual:gql".to_string();
    let plugin = project.plugin(config, false);

    assert_eq!(plugin.resolve_id("virtual:gql").as_deref(), Some("\0virtual:gql"));
    assert_eq!(plugin.resolve_id("$gql"), None);

    let module = plugin.load("\0virtual:gql").unwrap();
    assert!(module.contains(r#"fetch("https://swapi.example/graphql""#));
    assert!(module.contains(r#"{"Content-Type":"application/json"}"#));
    assert_eq!(plugin.load("virtual:gql"), None);
}

#[test]
fn test_out_file_required_in_dev() {
    let project = Project::new();
    let mut config = project.config();
    config.out_file = None;

    let fetcher = SdlFileFetcher::new(project.dir.path().join("schema.graphql"));
    let Err(err) = GqlPlugin::with_fetcher(config.clone(), fetcher.clone(), false) else {
        panic!("expected a configuration error");
    };
    assert!(matches!(err, PluginError::Config(_)));

    // builds never write declarations
    assert!(GqlPlugin::with_fetcher(config.clone(), fetcher.clone(), true).is_ok());

    config.automatically_generate_types = false;
    assert!(GqlPlugin::with_fetcher(config, fetcher, false).is_ok());
}

#[test]
fn test_invalid_module_id() {
    let project = Project::new();
    let mut config = project.config();
    config.module_id = "it's".to_string();

    let fetcher = SdlFileFetcher::new(project.dir.path().join("schema.graphql"));
    let Err(err) = GqlPlugin::with_fetcher(config, fetcher, true) else {
        panic!("expected a configuration error");
    };
    assert_eq!(err.to_string(), "Invalid configuration: Invalid moduleId: it's");
}
