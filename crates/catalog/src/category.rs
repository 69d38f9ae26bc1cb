use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{CategoryId, DomainResult, FieldErrors};

/// A product category.
///
/// A category holding one or more products cannot be deleted; the store
/// checks the product count before removal and reports a user-facing
/// constraint violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Validated input for creating or renaming a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDraft {
    pub name: String,
}

impl CategoryDraft {
    pub fn validate(name: &str) -> DomainResult<Self> {
        let mut errors = FieldErrors::new();

        let name = name.trim();
        if name.is_empty() {
            errors.push("name", "must not be empty");
        }

        errors.into_result()?;

        Ok(Self {
            name: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_trims_the_name() {
        let draft = CategoryDraft::validate(" Electronics ").unwrap();
        assert_eq!(draft.name, "Electronics");
    }

    #[test]
    fn draft_rejects_blank_names() {
        assert!(CategoryDraft::validate("   ").is_err());
    }
}
