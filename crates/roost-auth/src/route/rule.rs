//! Authored route rules.

use crate::{Permission, ResourceType};
use serde::{Deserialize, Serialize};

/// One hand-authored entry of the route table.
///
/// Rules are data, reviewed like code: reordering them or changing a
/// `fallback_path` changes who can see what.
///
/// | Field | Meaning |
/// |-------|---------|
/// | `path_pattern` | `/literal`, `/:param`, trailing `/*` |
/// | `is_public` | reachable without a session |
/// | `required_permission` | base permission, checked against the role |
/// | `fallback_path` | redirect target on denial |
/// | `requires_resource_check` | also require membership of the resource |
/// | `resource_type` | type of that resource |
/// | `resource_param` | which `:param` holds its id (default: first) |
///
/// # Example
///
/// ```
/// use roost_auth::{Permission, ResourceType, RouteRule};
///
/// let rule = RouteRule::protected("/admin/:houseId/residents")
///     .requires(Permission::ManageResidents)
///     .scoped_to(ResourceType::House)
///     .fallback("/dashboard");
///
/// assert!(!rule.is_public);
/// assert!(rule.requires_resource_check);
/// assert_eq!(rule.fallback_path.as_deref(), Some("/dashboard"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteRule {
    /// The path pattern.
    pub path_pattern: String,

    /// Reachable without authentication.
    #[serde(default)]
    pub is_public: bool,

    /// Base permission required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_permission: Option<Permission>,

    /// Redirect target when access is denied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_path: Option<String>,

    /// Whether membership of a resource is required in addition to the
    /// base permission.
    #[serde(default)]
    pub requires_resource_check: bool,

    /// Type of the checked resource.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<ResourceType>,

    /// Name of the `:param` carrying the resource id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_param: Option<String>,
}

impl RouteRule {
    /// A public rule.
    #[must_use]
    pub fn public(path_pattern: impl Into<String>) -> Self {
        Self {
            is_public: true,
            ..Self::protected(path_pattern)
        }
    }

    /// A protected rule that only requires authentication.
    #[must_use]
    pub fn protected(path_pattern: impl Into<String>) -> Self {
        Self {
            path_pattern: path_pattern.into(),
            is_public: false,
            required_permission: None,
            fallback_path: None,
            requires_resource_check: false,
            resource_type: None,
            resource_param: None,
        }
    }

    /// Requires `permission`.
    #[must_use]
    pub fn requires(mut self, permission: Permission) -> Self {
        self.required_permission = Some(permission);
        self
    }

    /// Requires membership of a resource of `resource_type`, identified by
    /// the first `:param` of the pattern.
    #[must_use]
    pub fn scoped_to(mut self, resource_type: ResourceType) -> Self {
        self.requires_resource_check = true;
        self.resource_type = Some(resource_type);
        self
    }

    /// Like [`scoped_to`](Self::scoped_to), with an explicit id parameter.
    #[must_use]
    pub fn scoped_to_param(mut self, resource_type: ResourceType, param: impl Into<String>) -> Self {
        self.resource_param = Some(param.into());
        self.scoped_to(resource_type)
    }

    /// Sets the redirect target on denial.
    #[must_use]
    pub fn fallback(mut self, path: impl Into<String>) -> Self {
        self.fallback_path = Some(path.into());
        self
    }
}
