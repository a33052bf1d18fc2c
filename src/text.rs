//! Small text helpers shared by the extractor, writer and crawl code.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

/// Slug used when a title produces no usable characters.
pub const FALLBACK_SLUG: &str = "opskrift";

static NON_SLUG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9\s-]").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static HYPHEN_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-{2,}").unwrap());
static ISO_DURATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^P(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?)?$").unwrap());
static LEADING_DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*(\d+)").unwrap());
static INGREDIENT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d+(?:[.,]\d+)?)\s*([a-zA-ZæøåÆØÅ%]+)?\s+(.*)$").unwrap()
});

/// Turns a title into a filesystem-safe lowercase slug.
///
/// Only the three Danish vowels are transliterated; any other non-ASCII
/// character is dropped. An empty result falls back to [`FALLBACK_SLUG`].
pub fn slugify(text: &str) -> String {
    let mut slug = text.trim().to_lowercase();
    for (from, to) in [("æ", "ae"), ("ø", "oe"), ("å", "aa")] {
        slug = slug.replace(from, to);
    }
    let slug = NON_SLUG.replace_all(&slug, "");
    let slug = WHITESPACE.replace_all(slug.trim(), "-");
    let slug = HYPHEN_RUN.replace_all(&slug, "-");
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug.to_string()
    }
}

/// Parses a restricted ISO-8601 duration (`PT2H30M`, hours/minutes/seconds
/// only) into whole minutes.
///
/// Leftover seconds round up to one extra minute. A total of zero is
/// indistinguishable from "unknown" and yields `None`.
pub fn duration_to_minutes(iso: &str) -> Option<u32> {
    let normalized = iso.trim().to_uppercase();
    let caps = ISO_DURATION.captures(&normalized)?;
    let part = |i: usize| -> u32 {
        caps.get(i)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0)
    };
    let total = part(1) * 60 + part(2) + u32::from(part(3) > 0);
    (total > 0).then_some(total)
}

/// Collapses whitespace runs to single spaces and trims the ends.
/// A blank result yields `None`.
pub fn clean_space(text: &str) -> Option<String> {
    let cleaned = WHITESPACE.replace_all(text, " ").trim().to_string();
    (!cleaned.is_empty()).then_some(cleaned)
}

/// Loosely coerces a JSON value to a non-negative integer.
///
/// Floats truncate toward zero; strings contribute their leading digit run
/// ("4 personer" -> 4). Anything else is `None`.
pub fn coerce_int(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                u32::try_from(i).ok()
            } else {
                n.as_f64()
                    .filter(|f| *f >= 0.0)
                    .map(|f| f.trunc() as u32)
            }
        }
        Value::String(s) => LEADING_DIGITS
            .captures(s)
            .and_then(|caps| caps[1].parse().ok()),
        _ => None,
    }
}

/// One ingredient line split into quantity, unit and free-text name.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedIngredient {
    pub amount: Option<f64>,
    pub unit: Option<String>,
    pub name: String,
}

/// Splits an ingredient line like `"200 g mel"` into its parts.
///
/// The quantity accepts both `.` and `,` as decimal separator and the unit
/// token covers the Danish vowels ("spsk", "dl", "æsker"). Lines without a
/// leading quantity come back whole as the name.
pub fn parse_ingredient_line(line: &str) -> ParsedIngredient {
    let trimmed = line.trim();
    if let Some(caps) = INGREDIENT_LINE.captures(trimmed) {
        ParsedIngredient {
            amount: caps[1].replace(',', ".").parse().ok(),
            unit: caps.get(2).map(|m| m.as_str().to_string()),
            name: caps[3].trim().to_string(),
        }
    } else {
        ParsedIngredient {
            amount: None,
            unit: None,
            name: trimmed.to_string(),
        }
    }
}
