//! Role types and role-claim normalization.

use serde::{Deserialize, Serialize};

/// The role a principal acts under.
///
/// Closed set. The engine assumes no privilege order between roles
/// except what each role's explicit permission set encodes; the only
/// structural special case is [`Role::Super`], which bypasses resource
/// membership checks.
///
/// | Role | Claim name | Typical holder |
/// |------|------------|----------------|
/// | `Base` | `resident` | Resident of a house |
/// | `Manager` | `admin` | House administrator |
/// | `Super` | `super_admin` | Platform operator |
///
/// # Example
///
/// ```
/// use roost_auth::Role;
///
/// assert_eq!(Role::from_claim("admin"), Some(Role::Manager));
/// assert_eq!(Role::from_claim("manager"), Some(Role::Manager));
/// assert_eq!(Role::from_claim("owner"), None);
/// assert_eq!(Role::Super.claim_name(), "super_admin");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Lowest-privilege role.
    #[serde(alias = "resident")]
    Base,
    /// Administers specific houses.
    #[serde(alias = "admin")]
    Manager,
    /// Platform-wide operator. Bypasses resource membership checks.
    #[serde(alias = "super_admin")]
    Super,
}

impl Role {
    /// All roles, in declaration order.
    pub const ALL: [Role; 3] = [Role::Base, Role::Manager, Role::Super];

    /// Parses a raw role claim.
    ///
    /// Accepts the claim names issued by the identity store
    /// (`resident`, `admin`, `super_admin`) and the canonical names
    /// (`base`, `manager`, `super`). Matching is exact after trimming;
    /// claims are machine-issued, so case-folding would only hide bugs.
    #[must_use]
    pub fn from_claim(claim: &str) -> Option<Self> {
        match claim.trim() {
            "resident" | "base" => Some(Self::Base),
            "admin" | "manager" => Some(Self::Manager),
            "super_admin" | "super" => Some(Self::Super),
            _ => None,
        }
    }

    /// Canonical name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Manager => "manager",
            Self::Super => "super",
        }
    }

    /// Name used in identity-store claims.
    #[must_use]
    pub fn claim_name(self) -> &'static str {
        match self {
            Self::Base => "resident",
            Self::Manager => "admin",
            Self::Super => "super_admin",
        }
    }

    /// Returns `true` for the role that bypasses resource checks.
    #[must_use]
    pub fn bypasses_resource_checks(self) -> bool {
        matches!(self, Self::Super)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to do with an absent or unrecognized role claim.
///
/// Both policies are fail-closed; they differ in whether a principal
/// with a bad claim can still reach routes that only require
/// authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownRolePolicy {
    /// Treat the principal as [`Role::Base`].
    #[default]
    LowestPrivilege,
    /// Treat the principal as unauthenticated.
    Deny,
}

impl UnknownRolePolicy {
    /// Parses a policy name (`lowest_privilege` or `deny`).
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "lowest_privilege" | "lowest-privilege" => Some(Self::LowestPrivilege),
            "deny" => Some(Self::Deny),
            _ => None,
        }
    }
}

/// Normalizes a raw role claim into a [`Role`].
///
/// Returns `None` only under [`UnknownRolePolicy::Deny`], meaning the
/// caller must not build a principal at all.
///
/// # Example
///
/// ```
/// use roost_auth::{normalize_role_claim, Role, UnknownRolePolicy};
///
/// let lenient = UnknownRolePolicy::LowestPrivilege;
/// assert_eq!(normalize_role_claim(Some("admin"), lenient), Some(Role::Manager));
/// assert_eq!(normalize_role_claim(None, lenient), Some(Role::Base));
/// assert_eq!(normalize_role_claim(Some("root"), lenient), Some(Role::Base));
///
/// let strict = UnknownRolePolicy::Deny;
/// assert_eq!(normalize_role_claim(Some("root"), strict), None);
/// ```
#[must_use]
pub fn normalize_role_claim(claim: Option<&str>, policy: UnknownRolePolicy) -> Option<Role> {
    match claim.and_then(Role::from_claim) {
        Some(role) => Some(role),
        None => match policy {
            UnknownRolePolicy::LowestPrivilege => Some(Role::Base),
            UnknownRolePolicy::Deny => None,
        },
    }
}
