//! Bilingual display text
//!
//! Forms carry English text plus an optional Spanish translation. Everything
//! that picks between the two goes through [`LocalizedText::resolve`].

use serde::{Deserialize, Serialize};

/// Display language of the console
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    #[default]
    Es,
}

impl Language {
    /// Parse a language tag such as `en`, `en-US` or `es-MX`.
    ///
    /// Only the primary subtag matters; anything that is neither English nor
    /// Spanish yields `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim().to_ascii_lowercase();
        if tag.starts_with("en") {
            Some(Language::En)
        } else if tag.starts_with("es") {
            Some(Language::Es)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// English text with an optional Spanish variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalizedText<'a> {
    pub primary: &'a str,
    pub secondary: Option<&'a str>,
}

impl<'a> LocalizedText<'a> {
    pub fn new(primary: &'a str, secondary: Option<&'a str>) -> Self {
        Self { primary, secondary }
    }

    /// Text to show for `language`. Spanish falls back to English when the
    /// translation is missing or empty.
    pub fn resolve(&self, language: Language) -> &'a str {
        match (language, self.secondary) {
            (Language::Es, Some(es)) if !es.is_empty() => es,
            _ => self.primary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_prefers_spanish_when_present() {
        let text = LocalizedText::new("Full name", Some("Nombre completo"));
        assert_eq!(text.resolve(Language::Es), "Nombre completo");
        assert_eq!(text.resolve(Language::En), "Full name");
    }

    #[test]
    fn test_resolve_falls_back_to_english() {
        assert_eq!(LocalizedText::new("Email", None).resolve(Language::Es), "Email");
        assert_eq!(
            LocalizedText::new("Email", Some("")).resolve(Language::Es),
            "Email"
        );
    }

    #[test]
    fn test_language_from_tag() {
        assert_eq!(Language::from_tag("en-US"), Some(Language::En));
        assert_eq!(Language::from_tag("ES-mx"), Some(Language::Es));
        assert_eq!(Language::from_tag("fr"), None);
        assert_eq!(Language::default(), Language::Es);
    }
}
