//! SDL rendering of an introspected schema.

use crate::types::{FullType, InputValue, IntrospectionSchema, TypeKind};
use std::fmt::{self, Write};

/// Scalars every schema defines implicitly.
const BUILTIN_SCALARS: &[&str] = &["Int", "Float", "String", "Boolean", "ID"];

/// Directives every schema defines implicitly.
const BUILTIN_DIRECTIVES: &[&str] = &["skip", "include", "deprecated", "specifiedBy", "oneOf"];

/// Converts an introspected schema to SDL.
///
/// Builtin scalars and directives and the `__` introspection types are left
/// out. A `schema { ... }` block is written only when a root type has a
/// non-default name.
#[must_use]
#[tracing::instrument(skip(schema), fields(types = schema.types.len()))]
pub fn introspection_to_sdl(schema: &IntrospectionSchema) -> String {
    let sdl = Sdl(schema).to_string();
    tracing::debug!(sdl_length = sdl.len(), "SDL generation complete");
    sdl
}

struct Sdl<'a>(&'a IntrospectionSchema);

impl fmt::Display for Sdl<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let schema = self.0;
        let mut blocks = Blocks { f, first: true };

        let roots = [
            ("query", schema.query_type.as_ref(), "Query"),
            ("mutation", schema.mutation_type.as_ref(), "Mutation"),
            ("subscription", schema.subscription_type.as_ref(), "Subscription"),
        ];
        if roots
            .iter()
            .any(|(_, root, default)| root.is_some_and(|root| root.name != *default))
        {
            let f = blocks.next()?;
            f.write_str("schema {\n")?;
            for (operation, root, _) in roots {
                if let Some(root) = root {
                    writeln!(f, "  {operation}: {}", root.name)?;
                }
            }
            f.write_char('}')?;
        }

        for directive in &schema.directives {
            if BUILTIN_DIRECTIVES.contains(&directive.name.as_str()) {
                continue;
            }
            let f = blocks.next()?;
            write_description(f, directive.description.as_deref(), "")?;
            write!(f, "directive @{}", directive.name)?;
            write_arguments(f, &directive.args)?;
            write!(f, " on {}", directive.locations.join(" | "))?;
        }

        for ty in &schema.types {
            if ty.name.starts_with("__") || BUILTIN_SCALARS.contains(&ty.name.as_str()) {
                continue;
            }
            write_type(blocks.next()?, ty)?;
        }

        Ok(())
    }
}

/// Separates top-level definitions with a blank line.
struct Blocks<'f, 'a> {
    f: &'f mut fmt::Formatter<'a>,
    first: bool,
}

impl<'a> Blocks<'_, 'a> {
    fn next(&mut self) -> Result<&mut fmt::Formatter<'a>, fmt::Error> {
        if !std::mem::take(&mut self.first) {
            self.f.write_str("\n\n")?;
        }
        Ok(&mut *self.f)
    }
}

fn write_type(f: &mut fmt::Formatter<'_>, ty: &FullType) -> fmt::Result {
    write_description(f, ty.description.as_deref(), "")?;
    match ty.kind {
        TypeKind::Scalar => write!(f, "scalar {}", ty.name),
        TypeKind::Object | TypeKind::Interface => {
            let keyword = if ty.kind == TypeKind::Object {
                "type"
            } else {
                "interface"
            };
            write!(f, "{keyword} {}", ty.name)?;
            let interfaces: Vec<&str> = ty.interface_names().collect();
            if !interfaces.is_empty() {
                write!(f, " implements {}", interfaces.join(" & "))?;
            }
            f.write_str(" {\n")?;
            for field in ty.fields.as_deref().unwrap_or_default() {
                write_description(f, field.description.as_deref(), "  ")?;
                write!(f, "  {}", field.name)?;
                write_arguments(f, &field.args)?;
                write!(f, ": {}", field.type_ref)?;
                write_deprecation(f, field.is_deprecated, field.deprecation_reason.as_deref())?;
                f.write_char('\n')?;
            }
            f.write_char('}')
        }
        TypeKind::Union => {
            let members: Vec<&str> = ty.member_names().collect();
            write!(f, "union {} = {}", ty.name, members.join(" | "))
        }
        TypeKind::Enum => {
            writeln!(f, "enum {} {{", ty.name)?;
            for value in ty.enum_values.as_deref().unwrap_or_default() {
                write_description(f, value.description.as_deref(), "  ")?;
                write!(f, "  {}", value.name)?;
                write_deprecation(f, value.is_deprecated, value.deprecation_reason.as_deref())?;
                f.write_char('\n')?;
            }
            f.write_char('}')
        }
        TypeKind::InputObject => {
            writeln!(f, "input {} {{", ty.name)?;
            for field in ty.input_fields.as_deref().unwrap_or_default() {
                write_description(f, field.description.as_deref(), "  ")?;
                f.write_str("  ")?;
                write_input_value(f, field)?;
                f.write_char('\n')?;
            }
            f.write_char('}')
        }
        // wrappers never appear as named types
        TypeKind::List | TypeKind::NonNull => Ok(()),
    }
}

fn write_arguments(f: &mut fmt::Formatter<'_>, args: &[InputValue]) -> fmt::Result {
    if args.is_empty() {
        return Ok(());
    }
    f.write_char('(')?;
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write_input_value(f, arg)?;
    }
    f.write_char(')')
}

fn write_input_value(f: &mut fmt::Formatter<'_>, value: &InputValue) -> fmt::Result {
    write!(f, "{}: {}", value.name, value.type_ref)?;
    if let Some(default) = &value.default_value {
        write!(f, " = {default}")?;
    }
    Ok(())
}

fn write_deprecation(
    f: &mut fmt::Formatter<'_>,
    is_deprecated: bool,
    reason: Option<&str>,
) -> fmt::Result {
    match (is_deprecated, reason) {
        (false, _) => Ok(()),
        (true, Some(reason)) => write!(f, " @deprecated(reason: {})", quote(reason)),
        (true, None) => f.write_str(" @deprecated"),
    }
}

fn write_description(f: &mut fmt::Formatter<'_>, description: Option<&str>, indent: &str) -> fmt::Result {
    match description {
        Some(text) if text.contains('\n') => writeln!(
            f,
            "{indent}\"\"\"\n{}\n{indent}\"\"\"",
            text.replace("\"\"\"", "\\\"\"\"")
        ),
        Some(text) => writeln!(f, "{indent}{}", quote(text)),
        None => Ok(()),
    }
}

/// A GraphQL string literal.
fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            other => quoted.push(other),
        }
    }
    quoted.push('"');
    quoted
}
