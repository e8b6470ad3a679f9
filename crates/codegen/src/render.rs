//! TypeScript type expression rendering.

use crate::TypeInfo;
use gql_typegen_config::NullabilityPolicy;

/// A rendered type and whether its outermost position admits `null`.
///
/// The `null` is kept apart until the position is known: a nullable property
/// may become optional instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Rendered {
    pub ty: String,
    pub nullable: bool,
}

impl Rendered {
    pub fn non_null(ty: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            nullable: false,
        }
    }

    /// Re-apply the wrappers of `info` around a rendered named type,
    /// innermost first.
    pub fn wrap(named: String, info: &TypeInfo) -> Self {
        let mut ty = named;
        let mut nullable = info.is_nullable;
        for &list_nullable in info.lists.iter().rev() {
            ty = format!("Array<{}>", value(ty, nullable));
            nullable = list_nullable;
        }
        Self { ty, nullable }
    }

    /// The type in a non-property position.
    pub fn into_value(self) -> String {
        value(self.ty, self.nullable)
    }
}

fn value(ty: String, nullable: bool) -> String {
    if nullable {
        format!("{ty} | null")
    } else {
        ty
    }
}

/// `{ "a": A; "b"?: B }`, or `{}` when there are no properties.
pub(crate) fn object(
    properties: impl IntoIterator<Item = (String, Rendered)>,
    policy: NullabilityPolicy,
) -> String {
    let properties: Vec<String> = properties
        .into_iter()
        .map(|(key, rendered)| {
            let key = quote(&key);
            match (rendered.nullable, policy) {
                (true, NullabilityPolicy::Optional) => format!("{key}?: {}", rendered.ty),
                _ => format!("{key}: {}", rendered.into_value()),
            }
        })
        .collect();

    if properties.is_empty() {
        "{}".to_string()
    } else {
        format!("{{ {} }}", properties.join("; "))
    }
}

/// Alternation of already rendered types; `never` when empty.
pub(crate) fn alternation(members: impl IntoIterator<Item = String>) -> String {
    let members: Vec<String> = members.into_iter().collect();
    if members.is_empty() {
        "never".to_string()
    } else {
        members.join(" | ")
    }
}

/// A JSON string literal, which is also a valid TypeScript string literal.
/// `text` as a double-quoted JSON string, which is also a valid TypeScript
/// string literal type.
#[must_use]
pub fn quote(text: &str) -> String {
    serde_json::Value::String(text.to_string()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use apollo_compiler::name;

    fn info(is_nullable: bool, lists: Vec<bool>) -> TypeInfo {
        TypeInfo {
            base_type: name!("Film"),
            is_nullable,
            lists,
        }
    }

    #[test]
    fn test_wrap_named() {
        let rendered = Rendered::wrap("string".to_string(), &info(true, vec![]));
        assert_eq!(rendered.clone().into_value(), "string | null");
        assert!(rendered.nullable);

        let rendered = Rendered::wrap("string".to_string(), &info(false, vec![]));
        assert_eq!(rendered.into_value(), "string");
    }

    #[test]
    fn test_wrap_lists() {
        // [T]
        let rendered = Rendered::wrap("T".to_string(), &info(true, vec![true]));
        assert_eq!(rendered.into_value(), "Array<T | null> | null");

        // [T!]!
        let rendered = Rendered::wrap("T".to_string(), &info(false, vec![false]));
        assert_eq!(rendered.into_value(), "Array<T>");

        // [[T]!]
        let rendered = Rendered::wrap("T".to_string(), &info(true, vec![true, false]));
        assert_eq!(rendered.into_value(), "Array<Array<T | null>> | null");
    }

    #[test]
    fn test_object_policies() {
        let properties = || {
            vec![
                ("a".to_string(), Rendered::non_null("string")),
                (
                    "b".to_string(),
                    Rendered {
                        ty: "number".to_string(),
                        nullable: true,
                    },
                ),
            ]
        };
        assert_eq!(
            object(properties(), NullabilityPolicy::NullUnion),
            r#"{ "a": string; "b": number | null }"#
        );
        assert_eq!(
            object(properties(), NullabilityPolicy::Optional),
            r#"{ "a": string; "b"?: number }"#
        );
        assert_eq!(object(Vec::new(), NullabilityPolicy::NullUnion), "{}");
    }

    #[test]
    fn test_alternation() {
        assert_eq!(alternation(Vec::new()), "never");
        assert_eq!(
            alternation(vec![quote("A"), quote("B")]),
            r#""A" | "B""#
        );
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("say \"hi\""), r#""say \"hi\"""#);
    }
}
