//! Protected resources and the membership-oracle boundary.
//!
//! A [`Resource`] names a thing; it carries no ownership data. Whether a
//! principal is attached to it is answered by a [`MembershipOracle`], one
//! per [`ResourceType`], registered by the host application.
//!
//! ```text
//! MembershipOracle trait (roost-auth)        ← definition
//!          │
//!          ├── house oracle (host app)        ← admin assignment / active residency
//!          ├── maintenance oracle (host app)  ← original submitter
//!          └── ...
//! ```

use crate::{LookupError, Role};
use async_trait::async_trait;
use roost_types::{IdError, PrincipalId, ResourceId, TryNew};
use serde::{Deserialize, Serialize};

/// Kind of a protected resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    House,
    Event,
    Resident,
    Application,
    Maintenance,
}

impl ResourceType {
    /// All resource types.
    pub const ALL: [ResourceType; 5] = [
        ResourceType::House,
        ResourceType::Event,
        ResourceType::Resident,
        ResourceType::Application,
        ResourceType::Maintenance,
    ];

    /// Lowercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::House => "house",
            Self::Event => "event",
            Self::Resident => "resident",
            Self::Application => "application",
            Self::Maintenance => "maintenance",
        }
    }

    /// Parses a lowercase name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed resource reference.
///
/// One variant per [`ResourceType`], each carrying only what its oracle
/// needs to answer.
///
/// # Example
///
/// ```
/// use roost_auth::{Resource, ResourceType};
///
/// let house = Resource::new(ResourceType::House, "H1").unwrap();
/// assert_eq!(house.resource_type(), ResourceType::House);
/// assert_eq!(house.id().as_str(), "H1");
/// assert_eq!(house.to_string(), "house:H1");
///
/// assert!(Resource::new(ResourceType::Event, "").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Resource {
    House { house_id: ResourceId },
    Event { event_id: ResourceId },
    Resident { resident_id: ResourceId },
    Application { application_id: ResourceId },
    Maintenance { request_id: ResourceId },
}

impl Resource {
    /// Builds a resource of `resource_type` from a raw id.
    ///
    /// # Errors
    ///
    /// Returns [`IdError`] if `id` is empty or contains `/`.
    pub fn new(resource_type: ResourceType, id: impl Into<String>) -> Result<Self, IdError> {
        let id = ResourceId::try_new(id.into())?;
        Ok(Self::from_id(resource_type, id))
    }

    /// Builds a resource of `resource_type` from a validated id.
    #[must_use]
    pub fn from_id(resource_type: ResourceType, id: ResourceId) -> Self {
        match resource_type {
            ResourceType::House => Self::House { house_id: id },
            ResourceType::Event => Self::Event { event_id: id },
            ResourceType::Resident => Self::Resident { resident_id: id },
            ResourceType::Application => Self::Application { application_id: id },
            ResourceType::Maintenance => Self::Maintenance { request_id: id },
        }
    }

    /// The resource's type.
    #[must_use]
    pub fn resource_type(&self) -> ResourceType {
        match self {
            Self::House { .. } => ResourceType::House,
            Self::Event { .. } => ResourceType::Event,
            Self::Resident { .. } => ResourceType::Resident,
            Self::Application { .. } => ResourceType::Application,
            Self::Maintenance { .. } => ResourceType::Maintenance,
        }
    }

    /// The resource's id.
    #[must_use]
    pub fn id(&self) -> &ResourceId {
        match self {
            Self::House { house_id: id }
            | Self::Event { event_id: id }
            | Self::Resident { resident_id: id }
            | Self::Application { application_id: id }
            | Self::Maintenance { request_id: id } => id,
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.resource_type(), self.id())
    }
}

/// Answers whether a principal has an active relationship to a resource.
///
/// "Active" is type-specific and entirely the implementor's business; for
/// example, for houses a manager needs an admin assignment while a base
/// principal needs a residency whose status is `active`.
///
/// Implementations may retry internally. The engine never retries, and it
/// treats `Err`, a panic, or a timeout as "no membership".
#[async_trait]
pub trait MembershipOracle: Send + Sync + std::fmt::Debug {
    /// Returns `Ok(true)` iff an active membership record exists.
    async fn has_active_membership(
        &self,
        principal: &PrincipalId,
        role: Role,
        resource: &Resource,
    ) -> Result<bool, LookupError>;
}
