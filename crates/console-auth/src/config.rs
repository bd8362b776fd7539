//! Auth configuration from the environment

use std::env;

use serde::Serialize;

pub const DEFAULT_AUTH_SERVICE_URL: &str = "https://auth-svc.carteracredit.workers.dev";
pub const DEFAULT_AUTH_APP_URL: &str = "https://auth.carteracredit.workers.dev";
pub const DEFAULT_PUBLIC_URL: &str = "http://localhost:3000";

/// Marker in the auth service URL of production deployments
const PRODUCTION_DOMAIN: &str = ".carteracredit.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Dev,
    Prod,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Dev => write!(f, "dev"),
            Environment::Prod => write!(f, "prod"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    /// Auth microservice (session and token endpoints)
    pub service_url: String,
    /// Auth frontend (login and logout pages)
    pub app_url: String,
    /// `Origin` header sent to the auth service
    pub origin: String,
    /// External base URL of this console, used when the request carries no host
    pub public_url: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl AuthConfig {
    /// Read `AUTH_SERVICE_URL`, `AUTH_APP_URL`, `AUTH_ORIGIN` and
    /// `CONSOLE_PUBLIC_URL`, falling back to the dev deployment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let service_url = read("AUTH_SERVICE_URL", DEFAULT_AUTH_SERVICE_URL);
        let app_url = read("AUTH_APP_URL", DEFAULT_AUTH_APP_URL);
        let origin = read("AUTH_ORIGIN", &app_url);
        let public_url = read("CONSOLE_PUBLIC_URL", DEFAULT_PUBLIC_URL);

        Self {
            service_url,
            app_url,
            origin,
            public_url,
        }
    }

    pub fn environment(&self) -> Environment {
        if self.service_url.contains(PRODUCTION_DOMAIN) {
            Environment::Prod
        } else {
            Environment::Dev
        }
    }

    pub fn session_endpoint(&self) -> String {
        format!("{}/api/auth/get-session", self.service_url)
    }

    pub fn token_endpoint(&self) -> String {
        format!("{}/api/auth/token", self.service_url)
    }

    /// Auth app login page that sends the user back to `return_to` afterwards
    pub fn login_url(&self, return_to: &str) -> String {
        format!(
            "{}/login?redirect_to={}",
            self.app_url,
            urlencoding::encode(return_to)
        )
    }

    pub fn logout_url(&self) -> String {
        format!("{}/logout", self.app_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> AuthConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AuthConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.service_url, DEFAULT_AUTH_SERVICE_URL);
        assert_eq!(config.app_url, DEFAULT_AUTH_APP_URL);
        assert_eq!(config.origin, DEFAULT_AUTH_APP_URL);
        assert_eq!(config.public_url, DEFAULT_PUBLIC_URL);
        assert_eq!(config.environment(), Environment::Dev);
    }

    #[test]
    fn test_overrides_and_trailing_slash() {
        let config = config(&[
            ("AUTH_SERVICE_URL", "https://auth-svc.carteracredit.com/"),
            ("AUTH_APP_URL", "https://auth.carteracredit.com"),
            ("AUTH_ORIGIN", "  "),
        ]);
        assert_eq!(config.service_url, "https://auth-svc.carteracredit.com");
        assert_eq!(config.origin, "https://auth.carteracredit.com");
        assert_eq!(config.environment(), Environment::Prod);
        assert_eq!(
            config.session_endpoint(),
            "https://auth-svc.carteracredit.com/api/auth/get-session"
        );
    }

    #[test]
    fn test_login_url_encodes_return_path() {
        let config = AuthConfig::default();
        assert_eq!(
            config.login_url("https://forms.cartera.credit/preview/abc?x=1"),
            "https://auth.carteracredit.workers.dev/login?redirect_to=https%3A%2F%2Fforms.cartera.credit%2Fpreview%2Fabc%3Fx%3D1"
        );
        assert_eq!(config.logout_url(), "https://auth.carteracredit.workers.dev/logout");
    }
}
