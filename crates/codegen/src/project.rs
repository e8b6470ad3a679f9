//! Projection of a GraphQL operation onto TypeScript types.

use crate::render::{self, Rendered};
use crate::{ProjectionError, ProjectionErrorKind, Result, ScalarMap, TypeInfo};
use apollo_compiler::ast::{self, Definition, NamedType, OperationType, Selection};
use apollo_compiler::parser::SourceSpan;
use apollo_compiler::schema::{EnumType, ExtendedType, InterfaceType, ObjectType, UnionType};
use apollo_compiler::{Node, Schema};
use gql_typegen_config::{NullabilityPolicy, PluginConfig};
use gql_typegen_types::LineIndex;
use serde::Serialize;

/// Inputs of a projection besides the query and the schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectionOptions {
    pub scalars: ScalarMap,
    pub nullability: NullabilityPolicy,
}

impl ProjectionOptions {
    #[must_use]
    pub fn from_config(config: &PluginConfig) -> Self {
        Self {
            scalars: ScalarMap::with_custom(&config.custom_scalars),
            nullability: config.nullability,
        }
    }
}

/// The TypeScript types of one operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryTypes {
    /// `None` when the operation declares no variables
    pub variables: Option<String>,
    pub return_type: String,
}

/// Project `query` against `schema`.
///
/// The query must hold exactly one operation. Its variables become an object
/// type keyed by variable name and its selection set becomes the return type;
/// the root itself is treated as nullable.
#[tracing::instrument(level = "debug", skip_all, fields(query_len = query.len()))]
pub fn project_query(
    query: &str,
    schema: &Schema,
    options: &ProjectionOptions,
) -> Result<QueryTypes> {
    let projector = Projector {
        schema,
        options,
        lines: LineIndex::new(query),
    };

    if query.trim().is_empty() {
        return Err(projector.error(ProjectionErrorKind::Structure, "Expected a query", None));
    }

    let document = ast::Document::parse(query, "query.graphql").map_err(|with_errors| {
        use apollo_compiler::diagnostic::ToCliReport;
        let (message, location) = with_errors
            .errors
            .iter()
            .next()
            .map_or_else(
                || ("Syntax error".to_string(), None),
                |diagnostic| (diagnostic.error.to_string(), diagnostic.error.location()),
            );
        projector.error(ProjectionErrorKind::Parse, message, location)
    })?;

    let definition = match document.definitions.as_slice() {
        [] => {
            return Err(projector.error(ProjectionErrorKind::Structure, "Expected a query", None))
        }
        [definition] => definition,
        [_, second, ..] => {
            return Err(projector.error(
                ProjectionErrorKind::Structure,
                format!(
                    "Expected a single query, got {}",
                    document.definitions.len()
                ),
                second.location(),
            ))
        }
    };

    let Definition::OperationDefinition(operation) = definition else {
        return Err(projector.error(
            ProjectionErrorKind::Structure,
            format!("Expected an operation, got {}", definition_kind(definition)),
            definition.location(),
        ));
    };

    let root = schema.root_operation(operation.operation_type).ok_or_else(|| {
        projector.error(
            ProjectionErrorKind::Structure,
            format!(
                "Schema doesn't contain any {} operations",
                operation_kind(operation.operation_type)
            ),
            operation.location(),
        )
    })?;

    let variables = projector.variables(&operation.variables)?;
    let return_type = Rendered {
        ty: projector.output(root, &operation.selection_set, operation.location())?,
        nullable: true,
    }
    .into_value();

    tracing::trace!(?variables, %return_type, "Projected operation");
    Ok(QueryTypes {
        variables,
        return_type,
    })
}

/// An object or interface whose fields are being selected.
#[derive(Clone, Copy)]
enum Parent<'s> {
    Object(&'s ObjectType),
    Interface(&'s InterfaceType),
}

impl<'s> Parent<'s> {
    fn name(self) -> &'s str {
        match self {
            Self::Object(object) => object.name.as_str(),
            Self::Interface(interface) => interface.name.as_str(),
        }
    }

    fn field_type(self, field: &str) -> Option<&'s ast::Type> {
        match self {
            Self::Object(object) => object.fields.get(field).map(|definition| &definition.ty),
            Self::Interface(interface) => {
                interface.fields.get(field).map(|definition| &definition.ty)
            }
        }
    }

    /// Type of `__typename`: the name itself on an object, any name on an
    /// interface.
    fn typename(self) -> String {
        match self {
            Self::Object(object) => render::quote(object.name.as_str()),
            Self::Interface(_) => "string".to_string(),
        }
    }
}

struct Projector<'a> {
    schema: &'a Schema,
    options: &'a ProjectionOptions,
    lines: LineIndex,
}

impl Projector<'_> {
    fn error(
        &self,
        kind: ProjectionErrorKind,
        message: impl Into<String>,
        span: Option<SourceSpan>,
    ) -> ProjectionError {
        let location = span.map(|span| self.lines.line_column(span.offset()));
        ProjectionError::new(kind, message, location)
    }

    fn policy(&self) -> NullabilityPolicy {
        self.options.nullability
    }

    /// Project an output type's selection set. Returns the named type without
    /// its wrappers.
    fn output(
        &self,
        name: &NamedType,
        selections: &[Selection],
        span: Option<SourceSpan>,
    ) -> Result<String> {
        match self.schema.types.get(name) {
            Some(ExtendedType::Object(object)) => self.fields(Parent::Object(object), selections),
            Some(ExtendedType::Interface(interface)) => {
                self.fields(Parent::Interface(interface), selections)
            }
            Some(ExtendedType::Union(union)) => self.union(union, selections),
            Some(ExtendedType::Enum(enum_type)) => Ok(enum_values(enum_type)),
            Some(ExtendedType::Scalar(_)) => self.scalar(name, span),
            Some(ExtendedType::InputObject(_)) => Err(self.error(
                ProjectionErrorKind::UnsupportedType,
                format!("Input type '{name}' cannot be selected"),
                span,
            )),
            None => Err(self.error(
                ProjectionErrorKind::UnsupportedType,
                format!("Unknown type '{name}'"),
                span,
            )),
        }
    }

    fn fields(&self, parent: Parent<'_>, selections: &[Selection]) -> Result<String> {
        // fields sharing a response key merge, keeping the first position
        let mut grouped: Vec<(&str, &Node<ast::Field>, Vec<Selection>)> = Vec::new();
        for selection in selections {
            let field = match selection {
                Selection::Field(field) => field,
                Selection::FragmentSpread(_) | Selection::InlineFragment(_) => {
                    return Err(self.error(
                        ProjectionErrorKind::Structure,
                        format!("Expected a field, got {}", selection_kind(selection)),
                        selection_location(selection),
                    ))
                }
            };
            let key = field.alias.as_ref().unwrap_or(&field.name).as_str();
            match grouped.iter_mut().find(|(existing, ..)| *existing == key) {
                Some((_, _, merged)) => merged.extend(field.selection_set.iter().cloned()),
                None => grouped.push((key, field, field.selection_set.clone())),
            }
        }

        let mut properties = Vec::with_capacity(grouped.len());
        for (key, field, selection_set) in grouped {
            if field.name.as_str() == "__typename" {
                properties.push((key.to_string(), Rendered::non_null(parent.typename())));
                continue;
            }

            let ty = parent.field_type(field.name.as_str()).ok_or_else(|| {
                self.error(
                    ProjectionErrorKind::FieldNotFound,
                    format!(
                        "Property '{}' does not exist on type {}",
                        field.name,
                        parent.name()
                    ),
                    field.location(),
                )
            })?;
            let info = TypeInfo::from(ty);
            let named = self.output(&info.base_type, &selection_set, field.location())?;
            properties.push((key.to_string(), Rendered::wrap(named, &info)));
        }

        Ok(render::object(properties, self.policy()))
    }

    fn union(&self, union: &UnionType, selections: &[Selection]) -> Result<String> {
        let mut members = Vec::with_capacity(selections.len());

        for selection in selections {
            let Selection::InlineFragment(fragment) = selection else {
                return Err(self.error(
                    ProjectionErrorKind::UnionMember,
                    format!("Expected an inline fragment, got {}", selection_kind(selection)),
                    selection_location(selection),
                ));
            };
            let Some(condition) = &fragment.type_condition else {
                return Err(self.error(
                    ProjectionErrorKind::UnionMember,
                    format!(
                        "Inline fragments on union type '{}' need a type condition",
                        union.name
                    ),
                    fragment.location(),
                ));
            };
            let member = union
                .members
                .iter()
                .any(|member| member.name == *condition)
                .then(|| self.schema.get_object(condition))
                .flatten()
                .ok_or_else(|| {
                    self.error(
                        ProjectionErrorKind::UnionMember,
                        format!(
                            "Union type '{}' does not contain member '{condition}'",
                            union.name
                        ),
                        fragment.location(),
                    )
                })?;
            members.push(self.fields(Parent::Object(member), &fragment.selection_set)?);
        }

        Ok(render::alternation(members))
    }

    fn scalar(&self, name: &NamedType, span: Option<SourceSpan>) -> Result<String> {
        self.options
            .scalars
            .get(name.as_str())
            .map(str::to_string)
            .ok_or_else(|| {
                self.error(
                    ProjectionErrorKind::UnknownScalar,
                    format!(
                        "Unknown scalar type '{name}' (add it to the 'customScalars' option in your config)"
                    ),
                    span,
                )
            })
    }

    fn variables(&self, variables: &[Node<ast::VariableDefinition>]) -> Result<Option<String>> {
        if variables.is_empty() {
            return Ok(None);
        }

        let mut properties = Vec::with_capacity(variables.len());
        for variable in variables {
            let info = TypeInfo::from(&*variable.ty);
            let rendered = if self.schema.types.contains_key(&info.base_type) {
                let mut expanding = Vec::new();
                let named = self.input(&info.base_type, variable.location(), &mut expanding)?;
                Rendered::wrap(named, &info)
            } else {
                Rendered::non_null("unknown")
            };
            properties.push((variable.name.to_string(), rendered));
        }

        Ok(Some(render::object(properties, self.policy())))
    }

    /// Project an input type. `expanding` holds the input objects currently
    /// being expanded; re-entering one of them yields `unknown`.
    fn input(
        &self,
        name: &NamedType,
        span: Option<SourceSpan>,
        expanding: &mut Vec<NamedType>,
    ) -> Result<String> {
        match self.schema.types.get(name) {
            Some(ExtendedType::Scalar(_)) => self.scalar(name, span),
            Some(ExtendedType::Enum(enum_type)) => Ok(enum_values(enum_type)),
            Some(ExtendedType::InputObject(input)) => {
                if expanding.contains(name) {
                    return Ok("unknown".to_string());
                }
                expanding.push(name.clone());
                let mut properties = Vec::with_capacity(input.fields.len());
                for (field_name, field) in &input.fields {
                    let info = TypeInfo::from(&*field.ty);
                    let named = self.input(&info.base_type, span, expanding)?;
                    properties.push((field_name.to_string(), Rendered::wrap(named, &info)));
                }
                expanding.pop();
                Ok(render::object(properties, self.policy()))
            }
            Some(
                ExtendedType::Object(_) | ExtendedType::Interface(_) | ExtendedType::Union(_),
            ) => Err(self.error(
                ProjectionErrorKind::UnsupportedType,
                format!("Output type '{name}' cannot be used as an input"),
                span,
            )),
            None => Ok("unknown".to_string()),
        }
    }
}

fn enum_values(enum_type: &EnumType) -> String {
    render::alternation(
        enum_type
            .values
            .keys()
            .map(|value| render::quote(value.as_str())),
    )
}

fn operation_kind(operation_type: OperationType) -> &'static str {
    match operation_type {
        OperationType::Query => "query",
        OperationType::Mutation => "mutation",
        OperationType::Subscription => "subscription",
    }
}

fn selection_kind(selection: &Selection) -> &'static str {
    match selection {
        Selection::Field(_) => "Field",
        Selection::FragmentSpread(_) => "FragmentSpread",
        Selection::InlineFragment(_) => "InlineFragment",
    }
}

fn selection_location(selection: &Selection) -> Option<SourceSpan> {
    match selection {
        Selection::Field(node) => node.location(),
        Selection::FragmentSpread(node) => node.location(),
        Selection::InlineFragment(node) => node.location(),
    }
}

fn definition_kind(definition: &Definition) -> &'static str {
    match definition {
        Definition::OperationDefinition(_) => "OperationDefinition",
        Definition::FragmentDefinition(_) => "FragmentDefinition",
        Definition::DirectiveDefinition(_) => "DirectiveDefinition",
        Definition::SchemaDefinition(_) => "SchemaDefinition",
        Definition::ScalarTypeDefinition(_) => "ScalarTypeDefinition",
        Definition::ObjectTypeDefinition(_) => "ObjectTypeDefinition",
        Definition::InterfaceTypeDefinition(_) => "InterfaceTypeDefinition",
        Definition::UnionTypeDefinition(_) => "UnionTypeDefinition",
        Definition::EnumTypeDefinition(_) => "EnumTypeDefinition",
        Definition::InputObjectTypeDefinition(_) => "InputObjectTypeDefinition",
        Definition::SchemaExtension(_) => "SchemaExtension",
        Definition::ScalarTypeExtension(_) => "ScalarTypeExtension",
        Definition::ObjectTypeExtension(_) => "ObjectTypeExtension",
        Definition::InterfaceTypeExtension(_) => "InterfaceTypeExtension",
        Definition::UnionTypeExtension(_) => "UnionTypeExtension",
        Definition::EnumTypeExtension(_) => "EnumTypeExtension",
        Definition::InputObjectTypeExtension(_) => "InputObjectTypeExtension",
    }
}
