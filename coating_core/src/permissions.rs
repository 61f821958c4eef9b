//! # Role Permissions
//!
//! Static role → permission table deciding which navigation items and actions
//! a user is shown. This is advisory UI gating only; the data platform's
//! row-level security is what actually restricts access.
//!
//! ## Example
//!
//! ```rust
//! use coating_core::permissions::{has_permission, Permission, Role, User};
//!
//! let sales = User::new("u-7", "Dewi", Role::Sales);
//! assert!(has_permission(&sales, Permission::ManageLeads));
//! assert!(!has_permission(&sales, Permission::ManageUsers));
//!
//! let admin = User::new("u-1", "Budi", Role::Admin);
//! assert!(has_permission(&admin, Permission::ManageUsers));
//! ```

use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CalcError;

/// User roles within an organization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Manager,
    Sales,
    Estimator,
    Viewer,
}

impl Role {
    pub const ALL: [Role; 5] = [Role::Admin, Role::Manager, Role::Sales, Role::Estimator, Role::Viewer];

    /// Stable name used in stored profiles
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Sales => "sales",
            Role::Estimator => "estimator",
            Role::Viewer => "viewer",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CalcError::invalid_input("role", s, "Unknown role"))
    }
}

/// Named permissions checked by the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ViewDashboard,
    ManageLeads,
    ManageCustomers,
    ManageProjects,
    UseCalculator,
    ManageQuotes,
    ManageMaterials,
    ViewReports,
    ExportData,
    ManageUsers,
    ManageSettings,
}

impl Permission {
    pub const ALL: [Permission; 11] = [
        Permission::ViewDashboard,
        Permission::ManageLeads,
        Permission::ManageCustomers,
        Permission::ManageProjects,
        Permission::UseCalculator,
        Permission::ManageQuotes,
        Permission::ManageMaterials,
        Permission::ViewReports,
        Permission::ExportData,
        Permission::ManageUsers,
        Permission::ManageSettings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::ViewDashboard => "view_dashboard",
            Permission::ManageLeads => "manage_leads",
            Permission::ManageCustomers => "manage_customers",
            Permission::ManageProjects => "manage_projects",
            Permission::UseCalculator => "use_calculator",
            Permission::ManageQuotes => "manage_quotes",
            Permission::ManageMaterials => "manage_materials",
            Permission::ViewReports => "view_reports",
            Permission::ExportData => "export_data",
            Permission::ManageUsers => "manage_users",
            Permission::ManageSettings => "manage_settings",
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|p| p.as_str() == s.trim())
            .ok_or_else(|| CalcError::invalid_input("permission", s, "Unknown permission"))
    }
}

// Admin is absent: it short-circuits in `has_permission`.
static ROLE_PERMISSIONS: Lazy<HashMap<Role, HashSet<Permission>>> = Lazy::new(|| {
    use Permission::*;

    let mut table = HashMap::new();
    table.insert(
        Role::Manager,
        HashSet::from([
            ViewDashboard,
            ManageLeads,
            ManageCustomers,
            ManageProjects,
            UseCalculator,
            ManageQuotes,
            ManageMaterials,
            ViewReports,
            ExportData,
        ]),
    );
    table.insert(
        Role::Sales,
        HashSet::from([
            ViewDashboard,
            ManageLeads,
            ManageCustomers,
            UseCalculator,
            ManageQuotes,
        ]),
    );
    table.insert(
        Role::Estimator,
        HashSet::from([ViewDashboard, ManageProjects, UseCalculator, ManageQuotes, ManageMaterials]),
    );
    table.insert(Role::Viewer, HashSet::from([ViewDashboard, ViewReports]));
    table
});

/// A signed-in user as far as UI gating is concerned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub organization_id: Option<Uuid>,
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        User {
            id: id.into(),
            name: name.into(),
            role,
            organization_id: None,
        }
    }

    /// Scope the user to an organization (builder pattern)
    pub fn in_organization(mut self, organization_id: Uuid) -> Self {
        self.organization_id = Some(organization_id);
        self
    }
}

/// Whether a role grants a permission. Admin grants everything.
pub fn role_has_permission(role: Role, permission: Permission) -> bool {
    if role == Role::Admin {
        return true;
    }
    ROLE_PERMISSIONS
        .get(&role)
        .is_some_and(|granted| granted.contains(&permission))
}

/// Whether the UI should show `permission`-gated elements to `user`
pub fn has_permission(user: &User, permission: Permission) -> bool {
    role_has_permission(user.role, permission)
}

/// Every permission a role grants, in declaration order
pub fn permissions_for(role: Role) -> Vec<Permission> {
    Permission::ALL
        .into_iter()
        .filter(|p| role_has_permission(role, *p))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_has_everything() {
        let admin = User::new("1", "Admin", Role::Admin);
        for p in Permission::ALL {
            assert!(has_permission(&admin, p));
        }
        assert_eq!(permissions_for(Role::Admin).len(), Permission::ALL.len());
    }

    #[test]
    fn test_viewer_is_read_only() {
        assert_eq!(
            permissions_for(Role::Viewer),
            vec![Permission::ViewDashboard, Permission::ViewReports]
        );
    }

    #[test]
    fn test_only_admin_manages_users_and_settings() {
        for role in Role::ALL {
            let expected = role == Role::Admin;
            assert_eq!(role_has_permission(role, Permission::ManageUsers), expected);
            assert_eq!(role_has_permission(role, Permission::ManageSettings), expected);
        }
    }

    #[test]
    fn test_calculator_roles() {
        assert!(role_has_permission(Role::Estimator, Permission::UseCalculator));
        assert!(role_has_permission(Role::Sales, Permission::UseCalculator));
        assert!(!role_has_permission(Role::Viewer, Permission::UseCalculator));
    }

    #[test]
    fn test_parsing() {
        assert_eq!("Estimator".parse::<Role>().unwrap(), Role::Estimator);
        assert_eq!("manage_quotes".parse::<Permission>().unwrap(), Permission::ManageQuotes);
        assert!("superuser".parse::<Role>().is_err());
        assert_eq!(serde_json::to_string(&Permission::ExportData).unwrap(), "\"export_data\"");
    }
}
