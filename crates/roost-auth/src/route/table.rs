//! The validated route table and matcher.
//!
//! # Matching
//!
//! 1. A rule whose pattern string equals the path wins outright,
//!    wherever it sits in the table.
//! 2. Otherwise rules are tried in declared order; the first whose
//!    pattern accepts the path wins.
//! 3. No match is `None`, which callers must treat as "authenticated,
//!    no specific permission". Never as public.
//!
//! Rule 1 lets an operator carve an exact override out of a wildcard
//! rule without reordering; rule 2 means specific patterns must be
//! declared before the general patterns that would shadow them.

use super::{RouteParams, RoutePattern, RouteRule};
use crate::{catalog, Permission, Resource, RouteConfigError};
use roost_types::{IdError, TryNew};
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct CompiledRoute {
    rule: RouteRule,
    pattern: RoutePattern,
    resource_param: Option<String>,
}

/// An ordered, validated set of [`RouteRule`]s.
///
/// Built once at startup via [`TryNew`]; every configuration error is
/// reported then, never at request time. Read-only afterwards.
///
/// # Example
///
/// ```
/// use roost_auth::{Permission, ResourceType, RouteRule, RouteTable};
/// use roost_types::TryNew;
///
/// let table = RouteTable::try_new(vec![
///     RouteRule::public("/houses"),
///     RouteRule::protected("/admin/expansion").requires(Permission::ManageAllHouses),
///     RouteRule::protected("/admin/:houseId")
///         .requires(Permission::ManageHouse)
///         .scoped_to(ResourceType::House),
/// ])
/// .unwrap();
///
/// let m = table.match_path("/admin/expansion").unwrap();
/// assert_eq!(m.rule().path_pattern, "/admin/expansion");
///
/// let m = table.match_path("/admin/H1").unwrap();
/// assert_eq!(m.params().get("houseId"), Some("H1"));
///
/// assert!(table.match_path("/totally/unknown/path").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<CompiledRoute>,
    exact: HashMap<String, usize>,
}

impl TryNew for RouteTable {
    type Error = RouteConfigError;
    type Args = Vec<RouteRule>;

    fn try_new(rules: Vec<RouteRule>) -> Result<Self, Self::Error> {
        let mut routes = Vec::with_capacity(rules.len());
        let mut exact = HashMap::with_capacity(rules.len());

        for (index, rule) in rules.into_iter().enumerate() {
            let compiled = compile_rule(rule)?;
            if exact
                .insert(compiled.rule.path_pattern.clone(), index)
                .is_some()
            {
                return Err(RouteConfigError::DuplicatePattern {
                    pattern: compiled.rule.path_pattern,
                });
            }
            routes.push(compiled);
        }

        Ok(Self { routes, exact })
    }
}

fn compile_rule(rule: RouteRule) -> Result<CompiledRoute, RouteConfigError> {
    let pattern = RoutePattern::try_new(rule.path_pattern.clone())?;
    let raw = rule.path_pattern.as_str();

    if let Some(fallback) = &rule.fallback_path {
        if !is_local_path(fallback) {
            return Err(RouteConfigError::InvalidFallback {
                pattern: raw.to_string(),
                fallback: fallback.clone(),
            });
        }
    }

    if rule.is_public && (rule.required_permission.is_some() || rule.requires_resource_check) {
        return Err(RouteConfigError::PublicWithRequirements {
            pattern: raw.to_string(),
        });
    }

    if let Some(permission) = rule.required_permission {
        if !catalog::is_grantable(permission) {
            return Err(RouteConfigError::UnreachablePermission {
                pattern: raw.to_string(),
                permission,
            });
        }
    }

    let resource_param = if rule.requires_resource_check {
        if rule.resource_type.is_none() {
            return Err(RouteConfigError::incomplete_resource_check(
                raw,
                "resource_type is not set",
            ));
        }
        if rule.required_permission.is_none() {
            return Err(RouteConfigError::incomplete_resource_check(
                raw,
                "required_permission is not set",
            ));
        }
        let param = match &rule.resource_param {
            Some(name) => {
                if !pattern.param_names().any(|p| p == name) {
                    return Err(RouteConfigError::incomplete_resource_check(
                        raw,
                        format!("':{name}' is not a parameter of the pattern"),
                    ));
                }
                name.clone()
            }
            None => match pattern.param_names().next() {
                Some(first) => first.to_string(),
                None => {
                    return Err(RouteConfigError::incomplete_resource_check(
                        raw,
                        "the pattern has no ':param' to take the resource id from",
                    ))
                }
            },
        };
        Some(param)
    } else {
        if rule.resource_type.is_some() || rule.resource_param.is_some() {
            return Err(RouteConfigError::incomplete_resource_check(
                raw,
                "resource fields are set but requires_resource_check is false",
            ));
        }
        None
    };

    Ok(CompiledRoute {
        rule,
        pattern,
        resource_param,
    })
}

/// Absolute in-app path: starts with a single `/`.
fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.contains('\\')
}

impl RouteTable {
    /// Resolves `path` to its rule and bindings.
    ///
    /// Bindings are extracted only for the winning rule.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<RouteMatch<'_>> {
        let index = self
            .exact
            .get(path)
            .copied()
            .or_else(|| self.routes.iter().position(|r| r.pattern.matches(path)))?;
        let route = &self.routes[index];
        Some(RouteMatch {
            rule: &route.rule,
            pattern: &route.pattern,
            resource_param: route.resource_param.as_deref(),
            params: route.pattern.extract_params(path),
        })
    }

    /// The rule declared with exactly this pattern string.
    #[must_use]
    pub fn get(&self, path_pattern: &str) -> Option<&RouteRule> {
        self.exact.get(path_pattern).map(|&i| &self.routes[i].rule)
    }

    /// Rules in declared order.
    pub fn rules(&self) -> impl Iterator<Item = &RouteRule> {
        self.routes.iter().map(|r| &r.rule)
    }

    /// Permissions referenced by the table, deduplicated, in catalog order.
    #[must_use]
    pub fn referenced_permissions(&self) -> Vec<Permission> {
        let set: crate::PermissionSet = self
            .routes
            .iter()
            .filter_map(|r| r.rule.required_permission)
            .collect();
        set.permissions().collect()
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if the table has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// A matched rule plus the bindings of the matched path.
#[derive(Debug, Clone)]
pub struct RouteMatch<'t> {
    rule: &'t RouteRule,
    pattern: &'t RoutePattern,
    resource_param: Option<&'t str>,
    params: RouteParams,
}

impl<'t> RouteMatch<'t> {
    /// The matched rule.
    #[must_use]
    pub fn rule(&self) -> &'t RouteRule {
        self.rule
    }

    /// The compiled pattern of the matched rule.
    #[must_use]
    pub fn pattern(&self) -> &'t RoutePattern {
        self.pattern
    }

    /// Named bindings of the path.
    #[must_use]
    pub fn params(&self) -> &RouteParams {
        &self.params
    }

    /// Returns `true` if the rule is public.
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.rule.is_public
    }

    /// The resource this request targets, if the rule checks one.
    ///
    /// # Errors
    ///
    /// Returns [`IdError`] if the bound segment is not a valid resource id.
    pub fn resource(&self) -> Result<Option<Resource>, IdError> {
        let (Some(resource_type), Some(param)) = (self.rule.resource_type, self.resource_param)
        else {
            return Ok(None);
        };
        let id = self.params.get(param).ok_or(IdError::Empty {
            kind: "resource id",
        })?;
        Resource::new(resource_type, id).map(Some)
    }

    /// Where to send a denied principal.
    #[must_use]
    pub fn redirect_target<'a>(&'a self, default_fallback: &'a str) -> &'a str {
        self.rule.fallback_path.as_deref().unwrap_or(default_fallback)
    }
}
