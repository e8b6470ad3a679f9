use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use gql_typegen_codegen::{project_query, ProjectionOptions};
use gql_typegen_dts::{render_declarations, FileRecord, Registry};
use gql_typegen_extract::{extract_queries, ErrorMode, WalkContext};
use gql_typegen_test_utils::fixtures::{ALL_FILMS_QUERY, STARSHIP_QUERY, TS_SOURCE};
use gql_typegen_test_utils::swapi_schema;
use gql_typegen_types::{FileId, Language};
use std::hint::black_box;

// Nested selection with a union, enum and custom scalar
const SEARCH_QUERY: &str = r"
query Search($text: String!) {
  search(text: $text) {
    ... on Film { title episode releaseDate starships { name costInCredits } }
    ... on Starship { name model }
  }
}
";

/// Projection benchmarks
fn bench_project_simple(c: &mut Criterion) {
    let schema = swapi_schema();
    let options = ProjectionOptions::default();

    c.bench_function("project_all_films", |b| {
        b.iter(|| black_box(project_query(ALL_FILMS_QUERY, &schema, &options)));
    });
    c.bench_function("project_with_variables", |b| {
        b.iter(|| black_box(project_query(STARSHIP_QUERY, &schema, &options)));
    });
}

fn bench_project_union(c: &mut Criterion) {
    let schema = swapi_schema();
    let options = ProjectionOptions::default();

    c.bench_function("project_union_selection", |b| {
        b.iter(|| black_box(project_query(SEARCH_QUERY, &schema, &options)));
    });
}

/// File transform benchmarks
fn bench_transform_file(c: &mut Criterion) {
    let schema = swapi_schema();
    let options = ProjectionOptions::default();
    let context = WalkContext {
        schema: &schema,
        options: &options,
        mode: ErrorMode::Deferred,
    };

    c.bench_function("transform_file", |b| {
        b.iter(|| {
            black_box(extract_queries(
                TS_SOURCE,
                Language::TypeScript,
                "$gql",
                &context,
                true,
            ))
        });
    });

    // a file that never imports the query module is the common case
    let untouched = "export function add(a: number, b: number) { return a + b; }\n".repeat(50);
    c.bench_function("transform_untouched_file", |b| {
        b.iter(|| {
            black_box(extract_queries(
                &untouched,
                Language::TypeScript,
                "$gql",
                &context,
                true,
            ))
        });
    });
}

/// Declaration rendering over many files
fn bench_render_declarations(c: &mut Criterion) {
    let schema = swapi_schema();
    let options = ProjectionOptions::default();
    let context = WalkContext {
        schema: &schema,
        options: &options,
        mode: ErrorMode::Deferred,
    };

    c.bench_function("render_declarations_100_files", |b| {
        b.iter_batched(
            || {
                let mut registry = Registry::new();
                for i in 0..100 {
                    let source = TS_SOURCE.replace("allFilms {", &format!("allFilms(first: {i}) {{"));
                    if let Ok(Some(output)) =
                        extract_queries(&source, Language::TypeScript, "$gql", &context, false)
                    {
                        registry.insert(
                            FileId::new(format!("src/file{i}.ts")),
                            FileRecord::new(output.queries, schema.clone()),
                        );
                    }
                }
                registry
            },
            |registry| black_box(render_declarations("$gql", &registry)),
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    benches,
    bench_project_simple,
    bench_project_union,
    bench_transform_file,
    bench_render_declarations,
);

criterion_main!(benches);
