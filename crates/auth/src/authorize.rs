use thiserror::Error;

use crate::{Capability, Role};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: missing capability '{0}'")]
    Forbidden(Capability),
}

/// The capability table: everything a role may do, in one place.
///
/// - Admin holds every capability.
/// - Manager holds everything except user management.
/// - Stock workers can adjust stock and browse the catalog.
///
/// Every authenticated role can view products.
pub fn grants(role: Role) -> &'static [Capability] {
    match role {
        Role::Admin => &[
            Capability::AdjustStock,
            Capability::ManageProducts,
            Capability::ManageCategories,
            Capability::ManageUsers,
            Capability::ViewProducts,
            Capability::ViewReports,
        ],
        Role::Manager => &[
            Capability::AdjustStock,
            Capability::ManageProducts,
            Capability::ManageCategories,
            Capability::ViewProducts,
            Capability::ViewReports,
        ],
        Role::StockWorker => &[Capability::AdjustStock, Capability::ViewProducts],
    }
}

/// Authorize a role against a required capability.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
pub fn authorize(role: Role, required: Capability) -> Result<(), AuthzError> {
    if grants(role).contains(&required) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(required))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_holds_every_capability() {
        for cap in Capability::ALL {
            assert_eq!(authorize(Role::Admin, cap), Ok(()));
        }
    }

    #[test]
    fn manager_holds_everything_except_user_management() {
        for cap in Capability::ALL {
            let result = authorize(Role::Manager, cap);
            if cap == Capability::ManageUsers {
                assert_eq!(result, Err(AuthzError::Forbidden(cap)));
            } else {
                assert_eq!(result, Ok(()));
            }
        }
    }

    #[test]
    fn stock_worker_is_limited_to_adjusting_and_viewing() {
        for cap in Capability::ALL {
            let result = authorize(Role::StockWorker, cap);
            match cap {
                Capability::AdjustStock | Capability::ViewProducts => {
                    assert_eq!(result, Ok(()))
                }
                _ => assert_eq!(result, Err(AuthzError::Forbidden(cap))),
            }
        }
    }

    #[test]
    fn every_role_can_view_products() {
        for role in Role::ALL {
            assert_eq!(authorize(role, Capability::ViewProducts), Ok(()));
        }
    }
}
