//! Redirect targets.

use crate::config::GateConfig;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters escaped in the return-target query value. `/` and `:` stay
/// readable.
const QUERY_VALUE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'<')
    .add(b'=')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Where the gate sends people.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectTargets {
    login_path: String,
    redirect_param: String,
    default_fallback: String,
}

impl RedirectTargets {
    /// Creates targets from explicit paths.
    #[must_use]
    pub fn new(
        login_path: impl Into<String>,
        redirect_param: impl Into<String>,
        default_fallback: impl Into<String>,
    ) -> Self {
        Self {
            login_path: login_path.into(),
            redirect_param: redirect_param.into(),
            default_fallback: default_fallback.into(),
        }
    }

    /// Takes the targets from `config`.
    #[must_use]
    pub fn from_config(config: &GateConfig) -> Self {
        Self::new(
            config.login_path.clone(),
            config.redirect_param.clone(),
            config.default_fallback.clone(),
        )
    }

    /// The landing path for denied rules without a fallback.
    #[must_use]
    pub fn default_fallback(&self) -> &str {
        &self.default_fallback
    }

    /// The login path carrying `original` as its return target.
    ///
    /// # Example
    ///
    /// ```
    /// use roost_runtime::enforcement::RedirectTargets;
    ///
    /// let targets = RedirectTargets::new("/login", "redirectTo", "/dashboard");
    /// assert_eq!(
    ///     targets.login("/admin/H1/residents"),
    ///     "/login?redirectTo=/admin/H1/residents"
    /// );
    /// assert_eq!(
    ///     targets.login("/search?q=a b&x=1"),
    ///     "/login?redirectTo=/search%3Fq%3Da%20b%26x%3D1"
    /// );
    /// ```
    #[must_use]
    pub fn login(&self, original: &str) -> String {
        format!(
            "{}?{}={}",
            self.login_path,
            self.redirect_param,
            utf8_percent_encode(original, QUERY_VALUE_SET)
        )
    }
}

impl Default for RedirectTargets {
    fn default() -> Self {
        Self::from_config(&GateConfig::default())
    }
}
