//! Language and theme preference cookies
//!
//! The cookies are shared with the other Cartera apps, so they are scoped
//! to the parent domain of the deployment the request arrived on.

use axum::http::{header::ACCEPT_LANGUAGE, HeaderMap};
use forms_core::Language;
use serde::{Deserialize, Serialize};

use crate::request::{cookie_value, request_host};

pub const LANGUAGE_COOKIE: &str = "cartera-lang";
pub const THEME_COOKIE: &str = "cartera-theme";

/// One year
const MAX_AGE_SECS: u64 = 31_536_000;

const PRODUCTION_DOMAIN: &str = "cartera.credit";
const WORKERS_DOMAIN: &str = "carteracredit.workers.dev";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    System,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            "system" => Some(Theme::System),
            _ => None,
        }
    }
}

/// Deployment a hostname belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deployment {
    Local,
    Production,
    Dev,
    /// `pr-*` preview builds on workers.dev
    Preview,
}

impl Deployment {
    pub fn detect(host: Option<&str>) -> Self {
        let Some(host) = host else {
            return Deployment::Local;
        };
        if host == "localhost" || host == "127.0.0.1" {
            return Deployment::Local;
        }
        if host == PRODUCTION_DOMAIN || host.ends_with(&format!(".{}", PRODUCTION_DOMAIN)) {
            return Deployment::Production;
        }
        if host.ends_with(WORKERS_DOMAIN) {
            if host.starts_with("pr-") {
                return Deployment::Preview;
            }
            return Deployment::Dev;
        }
        Deployment::Local
    }

    pub fn cookie_domain(&self) -> Option<String> {
        match self {
            Deployment::Local => None,
            Deployment::Production => Some(format!(".{}", PRODUCTION_DOMAIN)),
            Deployment::Dev | Deployment::Preview => Some(format!(".{}", WORKERS_DOMAIN)),
        }
    }
}

fn cookie_attributes(headers: &HeaderMap, max_age: u64) -> String {
    let host = request_host(headers);
    let mut attrs = format!("path=/; max-age={}; samesite=lax", max_age);
    if let Some(domain) = Deployment::detect(host.as_deref()).cookie_domain() {
        attrs.push_str("; domain=");
        attrs.push_str(&domain);
    }
    attrs
}

/// `Set-Cookie` value storing a preference for a year
pub fn set_cookie(headers: &HeaderMap, name: &str, value: &str) -> String {
    format!("{}={}; {}", name, value, cookie_attributes(headers, MAX_AGE_SECS))
}

/// `Set-Cookie` value removing a preference
pub fn delete_cookie(headers: &HeaderMap, name: &str) -> String {
    format!("{}=; {}", name, cookie_attributes(headers, 0))
}

/// Language for this request: cookie, then `Accept-Language`, then Spanish.
pub fn resolve_language(headers: &HeaderMap) -> Language {
    if let Some(language) = cookie_value(headers, LANGUAGE_COOKIE).and_then(Language::from_tag) {
        return language;
    }
    headers
        .get(ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok())
        .and_then(|accept| accept.split(',').next())
        .and_then(|tag| Language::from_tag(tag.split(';').next().unwrap_or(tag).trim()))
        .unwrap_or_default()
}

pub fn resolve_theme(headers: &HeaderMap) -> Option<Theme> {
    cookie_value(headers, THEME_COOKIE).and_then(Theme::parse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use pretty_assertions::assert_eq;

    fn with_header(name: &'static str, value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_detect_deployment() {
        assert_eq!(Deployment::detect(Some("localhost")), Deployment::Local);
        assert_eq!(Deployment::detect(Some("127.0.0.1")), Deployment::Local);
        assert_eq!(Deployment::detect(None), Deployment::Local);
        assert_eq!(Deployment::detect(Some("forms.cartera.credit")), Deployment::Production);
        assert_eq!(Deployment::detect(Some("cartera.credit")), Deployment::Production);
        assert_eq!(
            Deployment::detect(Some("forms.carteracredit.workers.dev")),
            Deployment::Dev
        );
        assert_eq!(
            Deployment::detect(Some("pr-123-forms.carteracredit.workers.dev")),
            Deployment::Preview
        );
        assert_eq!(Deployment::detect(Some("notcartera.credit.evil.com")), Deployment::Local);
    }

    #[test]
    fn test_cookie_domain() {
        assert_eq!(Deployment::Local.cookie_domain(), None);
        assert_eq!(
            Deployment::Production.cookie_domain().as_deref(),
            Some(".cartera.credit")
        );
        assert_eq!(
            Deployment::Preview.cookie_domain().as_deref(),
            Some(".carteracredit.workers.dev")
        );
    }

    #[test]
    fn test_set_and_delete_cookie() {
        let local = with_header("host", "localhost:3000");
        assert_eq!(
            set_cookie(&local, THEME_COOKIE, "dark"),
            "cartera-theme=dark; path=/; max-age=31536000; samesite=lax"
        );

        let prod = with_header("host", "forms.cartera.credit");
        let deleted = delete_cookie(&prod, LANGUAGE_COOKIE);
        assert!(deleted.starts_with("cartera-lang=;"));
        assert!(deleted.contains("max-age=0"));
        assert!(deleted.ends_with("domain=.cartera.credit"));
    }

    #[test]
    fn test_resolve_language() {
        assert_eq!(resolve_language(&HeaderMap::new()), Language::Es);
        assert_eq!(
            resolve_language(&with_header("accept-language", "en-US,en;q=0.9")),
            Language::En
        );
        assert_eq!(
            resolve_language(&with_header("accept-language", "fr-FR,fr;q=0.9")),
            Language::Es
        );

        let mut headers = with_header("accept-language", "en-US");
        headers.insert("cookie", HeaderValue::from_static("cartera-lang=es"));
        assert_eq!(resolve_language(&headers), Language::Es);
    }

    #[test]
    fn test_theme_cookie() {
        assert_eq!(
            resolve_theme(&with_header("cookie", "cartera-theme=Dark")),
            Some(Theme::Dark)
        );
        assert_eq!(resolve_theme(&with_header("cookie", "cartera-theme=pink")), None);
    }
}
