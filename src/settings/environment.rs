//! Host environment detection and classification.
//!
//! The deployment environment is read from the host once and threaded into
//! the loader; classification never touches process state after that, so
//! tests construct [`HostEnvironment`] values directly.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Deployment environment type reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentType {
    Development,
    Staging,
    /// The host default when nothing else is declared.
    #[default]
    Production,
    /// Any unrecognized environment name.
    Other,
}

impl fmt::Display for EnvironmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EnvironmentType::Development => "development",
            EnvironmentType::Staging => "staging",
            EnvironmentType::Production => "production",
            EnvironmentType::Other => "other",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for EnvironmentType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "development" => EnvironmentType::Development,
            "staging" => EnvironmentType::Staging,
            "production" => EnvironmentType::Production,
            _ => EnvironmentType::Other,
        })
    }
}

/// Signals the host exposes about where the process is running.
///
/// The classifications below are intended to be mutually exclusive but are
/// not enforced as such; the loader applies their forced settings in a fixed
/// order (development, production, staging) and lets the last applicable one
/// win per key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostEnvironment {
    /// Declared environment type.
    pub environment: EnvironmentType,
    /// Public URL of the site, when the host knows one.
    pub site_url: Option<String>,
    /// Host-level debug flag.
    pub debug: bool,
    /// Explicit development override baked into the build.
    pub force_development: bool,
    /// Explicit staging override baked into the build.
    pub force_staging: bool,
}

impl Default for HostEnvironment {
    fn default() -> Self {
        Self {
            environment: EnvironmentType::default(),
            site_url: None,
            debug: false,
            force_development: false,
            force_staging: false,
        }
    }
}

impl HostEnvironment {
    /// Probe the running process for environment signals.
    ///
    /// Reads `OPTSTACK_ENVIRONMENT` (absent → production) and
    /// `OPTSTACK_SITE_URL` from the process environment; the debug flag
    /// follows the build profile, and the force flags come from the
    /// `OPTSTACK_DEVELOPMENT` / `OPTSTACK_STAGING` build-time constants.
    pub fn detect() -> Self {
        let environment = std::env::var("OPTSTACK_ENVIRONMENT")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default();
        let site_url = std::env::var("OPTSTACK_SITE_URL").ok();

        Self {
            environment,
            site_url,
            debug: cfg!(debug_assertions),
            force_development: option_env!("OPTSTACK_DEVELOPMENT").is_some(),
            force_staging: option_env!("OPTSTACK_STAGING").is_some(),
        }
    }

    /// Whether the site URL looks like a local development host.
    fn url_is_local(&self) -> bool {
        match &self.site_url {
            Some(url) => url.contains("localhost") || url.contains(".local"),
            None => false,
        }
    }

    /// Development: host debug is on and something marks the deployment as
    /// local (explicit override, declared type, or a local-looking URL).
    pub fn is_development(&self) -> bool {
        self.debug
            && (self.force_development
                || self.environment == EnvironmentType::Development
                || self.url_is_local())
    }

    /// Production: declared production with host debug off.
    pub fn is_production(&self) -> bool {
        self.environment == EnvironmentType::Production && !self.debug
    }

    /// Staging: declared staging or the explicit staging override.
    pub fn is_staging(&self) -> bool {
        self.environment == EnvironmentType::Staging || self.force_staging
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> HostEnvironment {
        HostEnvironment::default()
    }

    #[test]
    fn environment_type_parses_known_names() {
        assert_eq!(
            "development".parse::<EnvironmentType>().unwrap(),
            EnvironmentType::Development
        );
        assert_eq!(
            "STAGING".parse::<EnvironmentType>().unwrap(),
            EnvironmentType::Staging
        );
        assert_eq!(
            "weird".parse::<EnvironmentType>().unwrap(),
            EnvironmentType::Other
        );
    }

    #[test]
    fn development_requires_host_debug() {
        let mut env = base();
        env.environment = EnvironmentType::Development;
        assert!(!env.is_development());
        env.debug = true;
        assert!(env.is_development());
    }

    #[test]
    fn local_looking_urls_count_as_development() {
        let mut env = base();
        env.debug = true;
        env.site_url = Some("http://localhost:8080".to_string());
        assert!(env.is_development());

        env.site_url = Some("https://myapp.local".to_string());
        assert!(env.is_development());

        env.site_url = Some("https://example.com".to_string());
        assert!(!env.is_development());
    }

    #[test]
    fn force_development_flag_wins_with_debug_on() {
        let mut env = base();
        env.debug = true;
        env.force_development = true;
        assert!(env.is_development());
    }

    #[test]
    fn production_requires_debug_off() {
        let mut env = base();
        assert!(env.is_production());
        env.debug = true;
        assert!(!env.is_production());
    }

    #[test]
    fn staging_by_declaration_or_override() {
        let mut env = base();
        assert!(!env.is_staging());
        env.environment = EnvironmentType::Staging;
        assert!(env.is_staging());

        let mut env = base();
        env.force_staging = true;
        assert!(env.is_staging());
    }

    #[test]
    fn classifications_can_overlap() {
        // Declared staging with debug on and a local URL: development and
        // staging both report true; the loader's ordering resolves it.
        let mut env = base();
        env.environment = EnvironmentType::Staging;
        env.debug = true;
        env.site_url = Some("http://localhost".to_string());
        assert!(env.is_development());
        assert!(env.is_staging());
        assert!(!env.is_production());
    }
}
