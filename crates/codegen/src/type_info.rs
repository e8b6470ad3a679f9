use apollo_compiler::ast::{NamedType, Type};

/// A GraphQL type reference with its wrappers unwrapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeInfo {
    pub base_type: NamedType,
    /// Whether the named type itself may be null
    pub is_nullable: bool,
    /// Nullability of each list layer, outermost first
    pub lists: Vec<bool>,
}

impl TypeInfo {
    #[must_use]
    pub fn is_list(&self) -> bool {
        !self.lists.is_empty()
    }
}

impl From<&Type> for TypeInfo {
    fn from(ty: &Type) -> Self {
        let mut lists = Vec::new();
        let mut current = ty;
        loop {
            match current {
                Type::Named(name) => {
                    return Self {
                        base_type: name.clone(),
                        is_nullable: true,
                        lists,
                    }
                }
                Type::NonNullNamed(name) => {
                    return Self {
                        base_type: name.clone(),
                        is_nullable: false,
                        lists,
                    }
                }
                Type::List(inner) => {
                    lists.push(true);
                    current = inner;
                }
                Type::NonNullList(inner) => {
                    lists.push(false);
                    current = inner;
                }
            }
        }
    }
}
