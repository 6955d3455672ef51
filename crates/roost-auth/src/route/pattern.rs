//! Compiled path patterns.
//!
//! | Segment | Matches | Captured |
//! |---------|---------|----------|
//! | `houses` | exactly `houses` | no |
//! | `:houseId` | any one non-empty segment | as `houseId` |
//! | `*` (last only) | the rest of the path, zero or more segments | no |

use super::RouteParams;
use crate::RouteConfigError;
use roost_types::TryNew;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
    Rest,
}

/// A validated, segment-wise path pattern.
///
/// # Example
///
/// ```
/// use roost_auth::RoutePattern;
/// use roost_types::TryNew;
///
/// let pattern = RoutePattern::try_new("/admin/:houseId/events/*".to_string()).unwrap();
/// assert!(pattern.matches("/admin/H1/events"));
/// assert!(pattern.matches("/admin/H1/events/E7/edit"));
/// assert!(!pattern.matches("/admin//events"));
///
/// let params = pattern.extract_params("/admin/H1/events/E7");
/// assert_eq!(params.get("houseId"), Some("H1"));
/// assert_eq!(params.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<Segment>,
}

impl TryNew for RoutePattern {
    type Error = RouteConfigError;
    type Args = String;

    fn try_new(raw: String) -> Result<Self, Self::Error> {
        let Some(body) = raw.strip_prefix('/') else {
            return Err(RouteConfigError::invalid_pattern(&raw, "must start with '/'"));
        };

        let mut segments = Vec::new();
        if !body.is_empty() {
            let parts: Vec<&str> = body.split('/').collect();
            let last = parts.len() - 1;
            for (i, part) in parts.into_iter().enumerate() {
                segments.push(compile_segment(&raw, part, i == last)?);
            }
        }

        let mut seen: Vec<&str> = Vec::new();
        for seg in &segments {
            if let Segment::Param(name) = seg {
                if seen.contains(&name.as_str()) {
                    return Err(RouteConfigError::DuplicateParam {
                        pattern: raw.clone(),
                        name: name.clone(),
                    });
                }
                seen.push(name);
            }
        }

        Ok(Self { raw, segments })
    }
}

fn compile_segment(raw: &str, part: &str, is_last: bool) -> Result<Segment, RouteConfigError> {
    if part.is_empty() {
        return Err(RouteConfigError::invalid_pattern(
            raw,
            "empty segment (double or trailing slash)",
        ));
    }
    if part == "*" {
        if !is_last {
            return Err(RouteConfigError::invalid_pattern(
                raw,
                "'*' is only allowed as the last segment",
            ));
        }
        return Ok(Segment::Rest);
    }
    if part.contains('*') {
        return Err(RouteConfigError::invalid_pattern(
            raw,
            format!("'*' must be a whole segment, found '{part}'"),
        ));
    }
    if let Some(name) = part.strip_prefix(':') {
        if name.is_empty() {
            return Err(RouteConfigError::invalid_pattern(raw, "parameter name is empty"));
        }
        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(RouteConfigError::invalid_pattern(
                raw,
                format!("parameter name ':{name}' must be alphanumeric or '_'"),
            ));
        }
        return Ok(Segment::Param(name.to_string()));
    }
    Ok(Segment::Literal(part.to_string()))
}

impl RoutePattern {
    /// The pattern as authored.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns `true` if the pattern has no dynamic segments.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.segments
            .iter()
            .all(|s| matches!(s, Segment::Literal(_)))
    }

    /// Names of the `:param` segments, in order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) => Some(name.as_str()),
            _ => None,
        })
    }

    /// Returns `true` if the pattern accepts `path`. Does not allocate.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        self.walk(path, |_, _| {})
    }

    /// Named bindings of `path` against this pattern.
    ///
    /// Empty if the pattern does not match.
    #[must_use]
    pub fn extract_params(&self, path: &str) -> RouteParams {
        let mut params = RouteParams::default();
        if !self.walk(path, |name, value| params.insert(name, value)) {
            return RouteParams::default();
        }
        params
    }

    fn walk<'p>(&self, path: &'p str, mut bind: impl FnMut(&str, &'p str)) -> bool {
        let Some(body) = path.strip_prefix('/') else {
            return false;
        };
        // "/" has zero segments, not one empty one.
        let mut parts = (!body.is_empty())
            .then(|| body.split('/'))
            .into_iter()
            .flatten();

        for seg in &self.segments {
            match seg {
                Segment::Rest => return true,
                Segment::Literal(lit) => match parts.next() {
                    Some(part) if part == lit => {}
                    _ => return false,
                },
                Segment::Param(name) => match parts.next() {
                    Some(part) if !part.is_empty() => bind(name, part),
                    _ => return false,
                },
            }
        }
        parts.next().is_none()
    }
}

impl std::fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}
