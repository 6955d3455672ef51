//! Permission tokens and permission sets.
//!
//! A [`Permission`] is an opaque capability token from a closed catalog.
//! Permissions are never hierarchical: holding `manage_house` says nothing
//! about `view_house`. A role's grant is a [`PermissionSet`], which is a
//! bitflags set of independent permission bits.
//!
//! # Example
//!
//! ```
//! use roost_auth::{Permission, PermissionSet};
//!
//! let set = PermissionSet::VIEW_HOUSE | PermissionSet::VIEW_EVENTS;
//! assert!(set.allows(Permission::ViewHouse));
//! assert!(!set.allows(Permission::ManageHouse));
//!
//! assert_eq!(Permission::parse("manage_events"), Some(Permission::ManageEvents));
//! assert_eq!(Permission::ManageEvents.as_str(), "manage_events");
//! ```

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// A single permission token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// See a house's private pages.
    ViewHouse,
    /// Edit a house's settings and listing.
    ManageHouse,
    /// See the resident directory of a house.
    ViewResidents,
    /// Add, remove and change residents.
    ManageResidents,
    /// See a house's events.
    ViewEvents,
    /// Sign up for events.
    RegisterEvents,
    /// Create and edit events.
    ManageEvents,
    /// Apply to join a house.
    SubmitApplication,
    /// Review applications to a house.
    ManageApplications,
    /// File maintenance requests.
    SubmitMaintenance,
    /// Triage and close maintenance requests.
    ManageMaintenance,
    /// Rent, deposits and expenses.
    ManageFinance,
    /// Per-house analytics.
    ViewAnalytics,
    /// Create, archive and reassign any house.
    ManageAllHouses,
    /// Appoint and remove house administrators.
    ManageAdmins,
    /// Cross-house analytics.
    ViewPlatformAnalytics,
}

/// Grouping used for documentation and admin UIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionCategory {
    House,
    Residents,
    Events,
    Applications,
    Maintenance,
    Finance,
    Analytics,
    Platform,
}

impl Permission {
    /// Every permission in the catalog, in declaration order.
    pub const ALL: [Permission; 16] = [
        Permission::ViewHouse,
        Permission::ManageHouse,
        Permission::ViewResidents,
        Permission::ManageResidents,
        Permission::ViewEvents,
        Permission::RegisterEvents,
        Permission::ManageEvents,
        Permission::SubmitApplication,
        Permission::ManageApplications,
        Permission::SubmitMaintenance,
        Permission::ManageMaintenance,
        Permission::ManageFinance,
        Permission::ViewAnalytics,
        Permission::ManageAllHouses,
        Permission::ManageAdmins,
        Permission::ViewPlatformAnalytics,
    ];

    /// The token as it appears in route tables and logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ViewHouse => "view_house",
            Self::ManageHouse => "manage_house",
            Self::ViewResidents => "view_residents",
            Self::ManageResidents => "manage_residents",
            Self::ViewEvents => "view_events",
            Self::RegisterEvents => "register_events",
            Self::ManageEvents => "manage_events",
            Self::SubmitApplication => "submit_application",
            Self::ManageApplications => "manage_applications",
            Self::SubmitMaintenance => "submit_maintenance",
            Self::ManageMaintenance => "manage_maintenance",
            Self::ManageFinance => "manage_finance",
            Self::ViewAnalytics => "view_analytics",
            Self::ManageAllHouses => "manage_all_houses",
            Self::ManageAdmins => "manage_admins",
            Self::ViewPlatformAnalytics => "view_platform_analytics",
        }
    }

    /// Parses a token. Exact match only.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == token)
    }

    /// The single-bit set for this permission.
    #[must_use]
    pub const fn flag(self) -> PermissionSet {
        match self {
            Self::ViewHouse => PermissionSet::VIEW_HOUSE,
            Self::ManageHouse => PermissionSet::MANAGE_HOUSE,
            Self::ViewResidents => PermissionSet::VIEW_RESIDENTS,
            Self::ManageResidents => PermissionSet::MANAGE_RESIDENTS,
            Self::ViewEvents => PermissionSet::VIEW_EVENTS,
            Self::RegisterEvents => PermissionSet::REGISTER_EVENTS,
            Self::ManageEvents => PermissionSet::MANAGE_EVENTS,
            Self::SubmitApplication => PermissionSet::SUBMIT_APPLICATION,
            Self::ManageApplications => PermissionSet::MANAGE_APPLICATIONS,
            Self::SubmitMaintenance => PermissionSet::SUBMIT_MAINTENANCE,
            Self::ManageMaintenance => PermissionSet::MANAGE_MAINTENANCE,
            Self::ManageFinance => PermissionSet::MANAGE_FINANCE,
            Self::ViewAnalytics => PermissionSet::VIEW_ANALYTICS,
            Self::ManageAllHouses => PermissionSet::MANAGE_ALL_HOUSES,
            Self::ManageAdmins => PermissionSet::MANAGE_ADMINS,
            Self::ViewPlatformAnalytics => PermissionSet::VIEW_PLATFORM_ANALYTICS,
        }
    }

    /// Documentation category.
    #[must_use]
    pub fn category(self) -> PermissionCategory {
        match self {
            Self::ViewHouse | Self::ManageHouse => PermissionCategory::House,
            Self::ViewResidents | Self::ManageResidents => PermissionCategory::Residents,
            Self::ViewEvents | Self::RegisterEvents | Self::ManageEvents => {
                PermissionCategory::Events
            }
            Self::SubmitApplication | Self::ManageApplications => PermissionCategory::Applications,
            Self::SubmitMaintenance | Self::ManageMaintenance => PermissionCategory::Maintenance,
            Self::ManageFinance => PermissionCategory::Finance,
            Self::ViewAnalytics => PermissionCategory::Analytics,
            Self::ManageAllHouses | Self::ManageAdmins | Self::ViewPlatformAnalytics => {
                PermissionCategory::Platform
            }
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Permission {
    type Err = UnknownPermission;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownPermission(s.to_string()))
    }
}

/// A token that is not in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown permission '{0}'")]
pub struct UnknownPermission(pub String);

bitflags! {
    /// A set of permissions, one bit per [`Permission`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct PermissionSet: u32 {
        const VIEW_HOUSE              = 1 << 0;
        const MANAGE_HOUSE            = 1 << 1;
        const VIEW_RESIDENTS          = 1 << 2;
        const MANAGE_RESIDENTS        = 1 << 3;
        const VIEW_EVENTS             = 1 << 4;
        const REGISTER_EVENTS         = 1 << 5;
        const MANAGE_EVENTS           = 1 << 6;
        const SUBMIT_APPLICATION      = 1 << 7;
        const MANAGE_APPLICATIONS     = 1 << 8;
        const SUBMIT_MAINTENANCE      = 1 << 9;
        const MANAGE_MAINTENANCE      = 1 << 10;
        const MANAGE_FINANCE          = 1 << 11;
        const VIEW_ANALYTICS          = 1 << 12;
        const MANAGE_ALL_HOUSES       = 1 << 13;
        const MANAGE_ADMINS           = 1 << 14;
        const VIEW_PLATFORM_ANALYTICS = 1 << 15;
    }
}

impl PermissionSet {
    /// Returns `true` if `permission` is in the set.
    #[must_use]
    pub fn allows(self, permission: Permission) -> bool {
        self.contains(permission.flag())
    }

    /// The permissions in the set, in catalog order.
    pub fn permissions(self) -> impl Iterator<Item = Permission> {
        Permission::ALL
            .into_iter()
            .filter(move |p| self.contains(p.flag()))
    }

    /// Token names of the permissions in the set.
    #[must_use]
    pub fn names(self) -> Vec<&'static str> {
        self.permissions().map(Permission::as_str).collect()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::empty(), |set, p| set.union(p.flag()))
    }
}
