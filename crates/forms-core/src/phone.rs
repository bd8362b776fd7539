//! Phone number formatting for phone fields
//!
//! Values are stored as `"{dial code} {national number}"`, e.g.
//! `"+1 (555) 123-4567"`. The national part is always rendered with the
//! `(ddd) ddd-dddd` mask regardless of country.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::localized::{Language, LocalizedText};

lazy_static! {
    static ref NON_DIGIT: Regex = Regex::new(r"[^0-9]").unwrap();
}

/// Longest national number accepted by the mask
pub const MAX_DIGITS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    pub code: &'static str,
    pub dial_code: &'static str,
    pub name: &'static str,
    pub name_es: &'static str,
}

impl Country {
    pub fn display_name(&self, language: Language) -> &'static str {
        LocalizedText::new(self.name, Some(self.name_es)).resolve(language)
    }
}

/// Selectable countries; the first entry is the default.
pub const COUNTRIES: [Country; 15] = [
    Country { code: "US", dial_code: "+1", name: "United States", name_es: "Estados Unidos" },
    Country { code: "GB", dial_code: "+44", name: "United Kingdom", name_es: "Reino Unido" },
    Country { code: "CA", dial_code: "+1", name: "Canada", name_es: "Canadá" },
    Country { code: "AU", dial_code: "+61", name: "Australia", name_es: "Australia" },
    Country { code: "DE", dial_code: "+49", name: "Germany", name_es: "Alemania" },
    Country { code: "FR", dial_code: "+33", name: "France", name_es: "Francia" },
    Country { code: "ES", dial_code: "+34", name: "Spain", name_es: "España" },
    Country { code: "IT", dial_code: "+39", name: "Italy", name_es: "Italia" },
    Country { code: "JP", dial_code: "+81", name: "Japan", name_es: "Japón" },
    Country { code: "CN", dial_code: "+86", name: "China", name_es: "China" },
    Country { code: "IN", dial_code: "+91", name: "India", name_es: "India" },
    Country { code: "BR", dial_code: "+55", name: "Brazil", name_es: "Brasil" },
    Country { code: "MX", dial_code: "+52", name: "Mexico", name_es: "México" },
    Country { code: "KR", dial_code: "+82", name: "South Korea", name_es: "Corea del Sur" },
    Country { code: "RU", dial_code: "+7", name: "Russia", name_es: "Rusia" },
];

pub fn default_country() -> &'static Country {
    &COUNTRIES[0]
}

pub fn country_by_code(code: &str) -> Option<&'static Country> {
    COUNTRIES.iter().find(|c| c.code.eq_ignore_ascii_case(code))
}

/// First country in table order whose dial code prefixes `value`.
///
/// Shared dial codes resolve to the earlier entry (`+1` is always US).
pub fn detect_country(value: &str) -> Option<&'static Country> {
    let value = value.trim_start();
    COUNTRIES.iter().find(|c| value.starts_with(c.dial_code))
}

/// Mask the digits of `input`: `ddd`, `(ddd) ddd`, `(ddd) ddd-dddd`.
/// Non-digits are dropped and anything past ten digits is cut off.
pub fn format_national(input: &str) -> String {
    let digits: String = NON_DIGIT
        .replace_all(input, "")
        .chars()
        .take(MAX_DIGITS)
        .collect();

    match digits.len() {
        0..=3 => digits,
        4..=6 => format!("({}) {}", &digits[..3], &digits[3..]),
        _ => format!("({}) {}-{}", &digits[..3], &digits[3..6], &digits[6..]),
    }
}

/// Full stored value for `country` and the typed national number.
pub fn compose(country: &Country, input: &str) -> String {
    format!("{} {}", country.dial_code, format_national(input))
}

/// Re-format a stored or typed phone value, keeping its dial code.
/// Values without a recognised dial code are treated as US numbers.
pub fn normalize(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    match detect_country(trimmed) {
        Some(country) => compose(country, &trimmed[country.dial_code.len()..]),
        None => compose(default_country(), trimmed),
    }
}
