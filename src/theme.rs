//! Design token storage: compiled-in defaults merged with `theme.extend`.

use indexmap::IndexMap;
use serde_json::Value;

use crate::errors::{Error, Result};

/// Category name → token name → resolved CSS value.
pub type TokenMap = IndexMap<String, IndexMap<String, String>>;

/// Tailwind v3 palette subset. `DEFAULT` keys resolve the bare utility name.
const COLORS: &[(&str, &str)] = &[
    ("inherit", "inherit"),
    ("current", "currentColor"),
    ("transparent", "transparent"),
    ("black", "#000"),
    ("white", "#fff"),
    // Gray
    ("gray-50", "#f9fafb"),
    ("gray-100", "#f3f4f6"),
    ("gray-200", "#e5e7eb"),
    ("gray-300", "#d1d5db"),
    ("gray-400", "#9ca3af"),
    ("gray-500", "#6b7280"),
    ("gray-600", "#4b5563"),
    ("gray-700", "#374151"),
    ("gray-800", "#1f2937"),
    ("gray-900", "#111827"),
    // Red
    ("red-50", "#fef2f2"),
    ("red-100", "#fee2e2"),
    ("red-200", "#fecaca"),
    ("red-300", "#fca5a5"),
    ("red-400", "#f87171"),
    ("red-500", "#ef4444"),
    ("red-600", "#dc2626"),
    ("red-700", "#b91c1c"),
    ("red-800", "#991b1b"),
    ("red-900", "#7f1d1d"),
    // Green
    ("green-50", "#f0fdf4"),
    ("green-100", "#dcfce7"),
    ("green-200", "#bbf7d0"),
    ("green-300", "#86efac"),
    ("green-400", "#4ade80"),
    ("green-500", "#22c55e"),
    ("green-600", "#16a34a"),
    ("green-700", "#15803d"),
    ("green-800", "#166534"),
    ("green-900", "#14532d"),
    // Blue
    ("blue-50", "#eff6ff"),
    ("blue-100", "#dbeafe"),
    ("blue-200", "#bfdbfe"),
    ("blue-300", "#93c5fd"),
    ("blue-400", "#60a5fa"),
    ("blue-500", "#3b82f6"),
    ("blue-600", "#2563eb"),
    ("blue-700", "#1d4ed8"),
    ("blue-800", "#1e40af"),
    ("blue-900", "#1e3a8a"),
];

const FONT_FAMILY: &[(&str, &str)] = &[
    (
        "sans",
        "ui-sans-serif, system-ui, sans-serif, \"Apple Color Emoji\", \"Segoe UI Emoji\"",
    ),
    (
        "serif",
        "ui-serif, Georgia, Cambria, \"Times New Roman\", Times, serif",
    ),
    (
        "mono",
        "ui-monospace, SFMono-Regular, Menlo, Monaco, Consolas, \"Liberation Mono\", monospace",
    ),
];

const FONT_SIZE: &[(&str, &str)] = &[
    ("xs", "0.75rem"),
    ("sm", "0.875rem"),
    ("base", "1rem"),
    ("lg", "1.125rem"),
    ("xl", "1.25rem"),
    ("2xl", "1.5rem"),
    ("3xl", "1.875rem"),
    ("4xl", "2.25rem"),
    ("5xl", "3rem"),
    ("6xl", "3.75rem"),
    ("7xl", "4.5rem"),
    ("8xl", "6rem"),
    ("9xl", "8rem"),
];

const FONT_WEIGHT: &[(&str, &str)] = &[
    ("thin", "100"),
    ("extralight", "200"),
    ("light", "300"),
    ("normal", "400"),
    ("medium", "500"),
    ("semibold", "600"),
    ("bold", "700"),
    ("extrabold", "800"),
    ("black", "900"),
];

/// Keyword entries only. Numeric steps are derived at 0.25rem per step.
const SPACING: &[(&str, &str)] = &[("0", "0px"), ("px", "1px"), ("auto", "auto")];

const WIDTH: &[(&str, &str)] = &[
    ("auto", "auto"),
    ("full", "100%"),
    ("screen", "100vw"),
    ("min", "min-content"),
    ("max", "max-content"),
    ("fit", "fit-content"),
];

const HEIGHT: &[(&str, &str)] = &[
    ("auto", "auto"),
    ("full", "100%"),
    ("screen", "100vh"),
    ("min", "min-content"),
    ("max", "max-content"),
    ("fit", "fit-content"),
];

const BORDER_RADIUS: &[(&str, &str)] = &[
    ("none", "0px"),
    ("sm", "0.125rem"),
    ("DEFAULT", "0.25rem"),
    ("md", "0.375rem"),
    ("lg", "0.5rem"),
    ("xl", "0.75rem"),
    ("2xl", "1rem"),
    ("3xl", "1.5rem"),
    ("full", "9999px"),
];

/// Shorthand values follow the four-field form the animation registry parses.
const ANIMATION: &[(&str, &str)] = &[
    ("spin", "spin 1s linear infinite"),
    ("ping", "ping 1s cubic-bezier(0,0,0.2,1) infinite"),
    ("pulse", "pulse 2s cubic-bezier(0.4,0,0.6,1) infinite"),
    ("bounce", "bounce 1s linear infinite"),
];

const DEFAULT_CATEGORIES: &[(&str, &[(&str, &str)])] = &[
    ("colors", COLORS),
    ("fontFamily", FONT_FAMILY),
    ("fontSize", FONT_SIZE),
    ("fontWeight", FONT_WEIGHT),
    ("spacing", SPACING),
    ("width", WIDTH),
    ("height", HEIGHT),
    ("borderRadius", BORDER_RADIUS),
    ("animation", ANIMATION),
];

/// Categories whose numeric keys map onto the 0.25rem spacing scale.
const SCALED_CATEGORIES: &[&str] = &["spacing", "width", "height"];

/// Immutable set of design tokens for one generation run.
///
/// Categories are open-ended: `theme.extend` may add names the defaults
/// never mention, and lookups against unknown categories simply miss.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenSet {
    categories: TokenMap,
}

impl TokenSet {
    /// The token set compiled into the binary.
    pub fn defaults() -> Self {
        let mut categories = TokenMap::new();
        for (category, entries) in DEFAULT_CATEGORIES {
            let tokens = entries
                .iter()
                .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
                .collect();
            categories.insert((*category).to_string(), tokens);
        }
        TokenSet { categories }
    }

    /// Returns a new set with `extension` laid over `self`.
    ///
    /// Keys present in both sides take the extension's value; everything
    /// else is preserved. Unknown categories are created as given.
    pub fn merge(&self, extension: &IndexMap<String, Value>) -> Result<TokenSet> {
        let mut merged = self.clone();
        for (category, tokens) in extension {
            let entries = match tokens {
                Value::Object(entries) => entries,
                _ => {
                    return Err(Error::Config {
                        message: format!(
                            "theme.extend.{category} must be an object mapping token names to values"
                        ),
                    })
                }
            };
            let slot = merged.categories.entry(category.clone()).or_default();
            for (name, raw) in entries {
                slot.insert(name.clone(), coerce_token(category, name, raw)?);
            }
        }
        Ok(merged)
    }

    /// Direct lookup, no scale derivation.
    pub fn get(&self, category: &str, name: &str) -> Option<&str> {
        self.categories
            .get(category)?
            .get(name)
            .map(String::as_str)
    }

    /// Lookup with the numeric fallback for scaled categories, so `p-4`
    /// resolves to `1rem` without a table entry for every step.
    pub fn lookup(&self, category: &str, name: &str) -> Option<String> {
        if let Some(value) = self.get(category, name) {
            return Some(value.to_string());
        }
        if SCALED_CATEGORIES.contains(&category) {
            return scale_step(name);
        }
        None
    }

    /// All tokens of one category, in insertion order.
    pub fn category(&self, name: &str) -> Option<&IndexMap<String, String>> {
        self.categories.get(name)
    }
}

/// `"4"` → `"1rem"`, `"1.5"` → `"0.375rem"`. Digits and at most one dot;
/// anything else is not a scale step.
fn scale_step(name: &str) -> Option<String> {
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return None;
    }
    let steps: f64 = name.parse().ok()?;
    if steps == 0.0 {
        return Some("0px".to_string());
    }
    Some(format!("{}rem", steps * 0.25))
}

fn coerce_token(category: &str, name: &str, raw: &Value) -> Result<String> {
    match raw {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Array(items) => {
            let mut parts = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(text) => parts.push(text.as_str()),
                    other => {
                        return Err(Error::Config {
                            message: format!(
                                "theme.extend.{category}.{name}: array entries must be strings, got {}",
                                value_kind(other)
                            ),
                        })
                    }
                }
            }
            Ok(parts.join(", "))
        }
        other => Err(Error::Config {
            message: format!(
                "theme.extend.{category}.{name}: expected a string, number, or array of strings, got {}",
                value_kind(other)
            ),
        }),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
