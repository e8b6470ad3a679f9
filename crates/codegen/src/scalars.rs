use std::collections::BTreeMap;

/// Builtin scalar to TypeScript mappings.
const BUILTIN_SCALARS: &[(&str, &str)] = &[
    ("Int", "number"),
    ("Float", "number"),
    ("String", "string"),
    ("Boolean", "boolean"),
    ("ID", "string"),
    ("URL", "string"),
    ("Decimal", "number"),
];

/// GraphQL scalar name to TypeScript type expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarMap {
    types: BTreeMap<String, String>,
}

impl Default for ScalarMap {
    fn default() -> Self {
        Self {
            types: BUILTIN_SCALARS
                .iter()
                .map(|(scalar, typescript)| ((*scalar).to_string(), (*typescript).to_string()))
                .collect(),
        }
    }
}

impl ScalarMap {
    /// The builtin table with `custom` entries added or overriding.
    #[must_use]
    pub fn with_custom(custom: &BTreeMap<String, String>) -> Self {
        let mut map = Self::default();
        map.types
            .extend(custom.iter().map(|(k, v)| (k.clone(), v.clone())));
        map
    }

    #[must_use]
    pub fn get(&self, scalar: &str) -> Option<&str> {
        self.types.get(scalar).map(String::as_str)
    }

    pub fn insert(&mut self, scalar: impl Into<String>, typescript: impl Into<String>) {
        self.types.insert(scalar.into(), typescript.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins() {
        let map = ScalarMap::default();
        assert_eq!(map.get("Int"), Some("number"));
        assert_eq!(map.get("Boolean"), Some("boolean"));
        assert_eq!(map.get("ID"), Some("string"));
        assert_eq!(map.get("Decimal"), Some("number"));
        assert_eq!(map.get("Date"), None);
    }

    #[test]
    fn test_custom_overrides() {
        let custom = BTreeMap::from([
            ("Date".to_string(), "string".to_string()),
            ("ID".to_string(), "number".to_string()),
        ]);
        let map = ScalarMap::with_custom(&custom);
        assert_eq!(map.get("Date"), Some("string"));
        assert_eq!(map.get("ID"), Some("number"));
        assert_eq!(map.get("String"), Some("string"));
    }
}
