use crate::{ProjectionError, QueryTypes};
use serde::Serialize;

/// The stored outcome of projecting one query: either its types or the
/// message explaining why it has none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Projection {
    Success {
        variables: Option<String>,
        return_type: String,
    },
    Error {
        error: String,
    },
}

impl Projection {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

impl From<QueryTypes> for Projection {
    fn from(types: QueryTypes) -> Self {
        Self::Success {
            variables: types.variables,
            return_type: types.return_type,
        }
    }
}

impl From<&ProjectionError> for Projection {
    fn from(error: &ProjectionError) -> Self {
        Self::error(error.message.clone())
    }
}

impl From<crate::Result<QueryTypes>> for Projection {
    fn from(result: crate::Result<QueryTypes>) -> Self {
        match result {
            Ok(types) => types.into(),
            Err(error) => (&error).into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProjectionErrorKind;

    #[test]
    fn test_from_result() {
        let ok: Projection = Ok(QueryTypes {
            variables: None,
            return_type: "{} | null".to_string(),
        })
        .into();
        assert!(!ok.is_error());

        let err: Projection = Err(ProjectionError::new(
            ProjectionErrorKind::Structure,
            "Expected a query",
            None,
        ))
        .into();
        assert_eq!(err, Projection::error("Expected a query"));
    }

    #[test]
    fn test_serialized_shape() {
        let projection = Projection::Success {
            variables: Some(r#"{ "id": string }"#.to_string()),
            return_type: "{} | null".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&projection).unwrap(),
            serde_json::json!({
                "status": "success",
                "variables": "{ \"id\": string }",
                "return_type": "{} | null",
            })
        );

        let projection = Projection::error("Expected a query");
        assert_eq!(
            serde_json::to_value(&projection).unwrap(),
            serde_json::json!({ "status": "error", "error": "Expected a query" })
        );
    }
}
