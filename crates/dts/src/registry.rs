use gql_typegen_codegen::{project_query, Projection, ProjectionOptions};
use gql_typegen_introspect::SchemaRef;
use gql_typegen_types::FileId;
use std::collections::BTreeMap;
use std::sync::Arc;

/// The projections of one file, all made against the same schema.
#[derive(Debug, Clone)]
pub struct FileRecord {
    pub queries: BTreeMap<String, Projection>,
    pub schema: SchemaRef,
}

impl FileRecord {
    #[must_use]
    pub fn new(queries: BTreeMap<String, Projection>, schema: SchemaRef) -> Self {
        Self { queries, schema }
    }

    #[must_use]
    pub fn is_projected_against(&self, schema: &SchemaRef) -> bool {
        Arc::ptr_eq(&self.schema, schema)
    }

    /// Project every query of this record again against `schema`.
    #[must_use]
    pub fn reproject(&self, schema: &SchemaRef, options: &ProjectionOptions) -> Self {
        let queries = self
            .queries
            .keys()
            .map(|query| (query.clone(), project_query(query, schema, options).into()))
            .collect();
        Self {
            queries,
            schema: schema.clone(),
        }
    }
}

/// Every file seen so far with its latest record.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    files: BTreeMap<FileId, FileRecord>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the record of `file`.
    pub fn insert(&mut self, file: FileId, record: FileRecord) -> Option<FileRecord> {
        self.files.insert(file, record)
    }

    pub fn remove(&mut self, file: &FileId) -> Option<FileRecord> {
        self.files.remove(file)
    }

    #[must_use]
    pub fn get(&self, file: &FileId) -> Option<&FileRecord> {
        self.files.get(file)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FileId, &FileRecord)> {
        self.files.iter()
    }

    /// Distinct query literals across all files, in literal order. When two
    /// files hold the same literal the first file's projection is used.
    #[must_use]
    pub fn queries(&self) -> BTreeMap<&str, &Projection> {
        let mut queries = BTreeMap::new();
        for record in self.files.values() {
            for (query, projection) in &record.queries {
                queries.entry(query.as_str()).or_insert(projection);
            }
        }
        queries
    }

    /// A new registry with every record projected against `schema`.
    #[must_use]
    pub fn reproject(&self, schema: &SchemaRef, options: &ProjectionOptions) -> Self {
        Self {
            files: self
                .files
                .iter()
                .map(|(file, record)| (file.clone(), record.reproject(schema, options)))
                .collect(),
        }
    }
}
