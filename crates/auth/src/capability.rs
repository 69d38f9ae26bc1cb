use serde::{Deserialize, Serialize};

/// A named permission checked before an operation proceeds.
///
/// Capabilities form a closed set, mirroring the operations the service
/// exposes. Serialized in kebab-case (`adjust-stock`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    AdjustStock,
    ManageProducts,
    ManageCategories,
    ManageUsers,
    ViewProducts,
    ViewReports,
}

impl Capability {
    pub const ALL: [Capability; 6] = [
        Capability::AdjustStock,
        Capability::ManageProducts,
        Capability::ManageCategories,
        Capability::ManageUsers,
        Capability::ViewProducts,
        Capability::ViewReports,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::AdjustStock => "adjust-stock",
            Capability::ManageProducts => "manage-products",
            Capability::ManageCategories => "manage-categories",
            Capability::ManageUsers => "manage-users",
            Capability::ViewProducts => "view-products",
            Capability::ViewReports => "view-reports",
        }
    }
}

impl core::fmt::Display for Capability {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
