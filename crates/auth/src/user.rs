//! User identity model.
//!
//! Authentication (passwords, sessions, token issuance) is an external
//! collaborator; this service only records who a user is and which role
//! they hold. The JWT issuer is trusted to have verified credentials.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{DomainResult, FieldErrors, UserId};

use crate::Role;

/// A user known to the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Validated input for creating or updating a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl UserDraft {
    /// Validate raw form input into a draft, reporting per-field errors.
    pub fn validate(name: &str, email: &str, role: Role) -> DomainResult<Self> {
        let mut errors = FieldErrors::new();

        let name = name.trim();
        if name.is_empty() {
            errors.push("name", "must not be empty");
        }

        let email = email.trim();
        if email.is_empty() {
            errors.push("email", "must not be empty");
        } else if !email.contains('@') {
            errors.push("email", "must be a valid email address");
        }

        errors.into_result()?;

        Ok(Self {
            name: name.to_string(),
            email: email.to_lowercase(),
            role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_core::DomainError;

    #[test]
    fn valid_input_is_normalized() {
        let draft = UserDraft::validate("  Admin  ", " Admin@Example.com ", Role::Admin).unwrap();
        assert_eq!(draft.name, "Admin");
        assert_eq!(draft.email, "admin@example.com");
    }

    #[test]
    fn blank_name_and_bad_email_are_both_reported() {
        let err = UserDraft::validate("  ", "not-an-email", Role::Manager).unwrap_err();
        match err {
            DomainError::Validation(errors) => {
                let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
                assert_eq!(fields, vec!["name", "email"]);
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }
}
