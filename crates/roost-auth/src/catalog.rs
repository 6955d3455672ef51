//! Role → permission catalog.
//!
//! Each role's grant is written out in full. There is no inheritance:
//! when a permission is added to the catalog, every role that should hold
//! it has to list it here, and the route-table validator refuses tokens
//! that no role holds.
//!
//! | Permission | base | manager | super |
//! |------------|:----:|:-------:|:-----:|
//! | view_house | ✓ | ✓ | ✓ |
//! | manage_house | | ✓ | ✓ |
//! | view_residents | ✓ | ✓ | ✓ |
//! | manage_residents | | ✓ | ✓ |
//! | view_events | ✓ | ✓ | ✓ |
//! | register_events | ✓ | | |
//! | manage_events | | ✓ | ✓ |
//! | submit_application | ✓ | | |
//! | manage_applications | | ✓ | ✓ |
//! | submit_maintenance | ✓ | ✓ | |
//! | manage_maintenance | | ✓ | ✓ |
//! | manage_finance | | ✓ | ✓ |
//! | view_analytics | | ✓ | ✓ |
//! | manage_all_houses | | | ✓ |
//! | manage_admins | | | ✓ |
//! | view_platform_analytics | | | ✓ |

use crate::{Permission, PermissionCategory, PermissionSet, Principal, Role};
use std::collections::BTreeMap;

const BASE: PermissionSet = PermissionSet::VIEW_HOUSE
    .union(PermissionSet::VIEW_RESIDENTS)
    .union(PermissionSet::VIEW_EVENTS)
    .union(PermissionSet::REGISTER_EVENTS)
    .union(PermissionSet::SUBMIT_APPLICATION)
    .union(PermissionSet::SUBMIT_MAINTENANCE);

const MANAGER: PermissionSet = PermissionSet::VIEW_HOUSE
    .union(PermissionSet::MANAGE_HOUSE)
    .union(PermissionSet::VIEW_RESIDENTS)
    .union(PermissionSet::MANAGE_RESIDENTS)
    .union(PermissionSet::VIEW_EVENTS)
    .union(PermissionSet::MANAGE_EVENTS)
    .union(PermissionSet::MANAGE_APPLICATIONS)
    .union(PermissionSet::SUBMIT_MAINTENANCE)
    .union(PermissionSet::MANAGE_MAINTENANCE)
    .union(PermissionSet::MANAGE_FINANCE)
    .union(PermissionSet::VIEW_ANALYTICS);

const SUPER: PermissionSet = PermissionSet::VIEW_HOUSE
    .union(PermissionSet::MANAGE_HOUSE)
    .union(PermissionSet::VIEW_RESIDENTS)
    .union(PermissionSet::MANAGE_RESIDENTS)
    .union(PermissionSet::VIEW_EVENTS)
    .union(PermissionSet::MANAGE_EVENTS)
    .union(PermissionSet::MANAGE_APPLICATIONS)
    .union(PermissionSet::MANAGE_MAINTENANCE)
    .union(PermissionSet::MANAGE_FINANCE)
    .union(PermissionSet::VIEW_ANALYTICS)
    .union(PermissionSet::MANAGE_ALL_HOUSES)
    .union(PermissionSet::MANAGE_ADMINS)
    .union(PermissionSet::VIEW_PLATFORM_ANALYTICS);

/// The permission set granted to `role`.
#[must_use]
pub const fn permissions_for(role: Role) -> PermissionSet {
    match role {
        Role::Base => BASE,
        Role::Manager => MANAGER,
        Role::Super => SUPER,
    }
}

/// The permission set for a raw role claim.
///
/// A claim outside the closed role set yields the empty set. This does
/// not default to any role; defaulting happens at the session boundary.
#[must_use]
pub fn permissions_for_claim(claim: &str) -> PermissionSet {
    Role::from_claim(claim).map_or(PermissionSet::empty(), permissions_for)
}

/// Returns `true` if the principal's role grants `permission`.
#[must_use]
pub fn has_permission(principal: &Principal, permission: Permission) -> bool {
    permissions_for(principal.role()).allows(permission)
}

/// Returns `true` if at least one role grants `permission`.
///
/// Used by route-table validation: a route guarded by a permission no role
/// holds can never be reached.
#[must_use]
pub fn is_grantable(permission: Permission) -> bool {
    Role::ALL
        .into_iter()
        .any(|role| permissions_for(role).allows(permission))
}

/// Every permission in the catalog.
///
/// Documentation/UI only; never consult this in a decision.
#[must_use]
pub fn all_permissions() -> &'static [Permission] {
    &Permission::ALL
}

/// Permissions grouped by category.
///
/// Documentation/UI only; never consult this in a decision.
#[must_use]
pub fn permissions_by_category() -> BTreeMap<PermissionCategory, Vec<Permission>> {
    let mut grouped: BTreeMap<PermissionCategory, Vec<Permission>> = BTreeMap::new();
    for permission in Permission::ALL {
        grouped
            .entry(permission.category())
            .or_default()
            .push(permission);
    }
    grouped
}
