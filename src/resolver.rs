//! Candidate resolution: class name in, CSS rule out.
//!
//! Resolution is the strict half of the extract/resolve pair. A candidate
//! either maps onto a known utility with a known token value, or it yields
//! `None` and is dropped without a diagnostic.

use phf::phf_map;

use crate::animation::AnimationRegistry;
use crate::theme::TokenSet;

/// One CSS property/value pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
}

impl Declaration {
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        Declaration {
            property: property.into(),
            value: value.into(),
        }
    }
}

/// A utility class resolved to its emitted form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRule {
    /// Class name exactly as written, variants included.
    pub class_name: String,
    /// Selector with the class escaped and pseudo-class variants applied.
    pub selector: String,
    /// Media query condition wrapping the rule, if any variant needs one.
    pub media: Option<String>,
    pub declarations: Vec<Declaration>,
    /// Keyframe base name this rule depends on, for `animate-*` utilities.
    pub keyframes: Option<String>,
}

/// Utilities contributed through `Plugin::register_utilities`, keyed by the
/// full base name. Consulted before the compiled-in tables.
#[derive(Debug, Default)]
pub struct UtilityRegistry {
    customs: indexmap::IndexMap<String, Vec<Declaration>>,
}

impl UtilityRegistry {
    pub fn add(&mut self, class: impl Into<String>, declarations: Vec<Declaration>) {
        self.customs.insert(class.into(), declarations);
    }

    pub fn get(&self, class: &str) -> Option<&[Declaration]> {
        self.customs.get(class).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.customs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customs.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
enum Variant {
    Media(&'static str),
    Pseudo(&'static str),
}

/// Responsive breakpoints, the dark-scheme variant, and state pseudo-classes.
static VARIANTS: phf::Map<&'static str, Variant> = phf_map! {
    "sm" => Variant::Media("(min-width: 640px)"),
    "md" => Variant::Media("(min-width: 768px)"),
    "lg" => Variant::Media("(min-width: 1024px)"),
    "xl" => Variant::Media("(min-width: 1280px)"),
    "2xl" => Variant::Media("(min-width: 1536px)"),
    "dark" => Variant::Media("(prefers-color-scheme: dark)"),
    "hover" => Variant::Pseudo(":hover"),
    "focus" => Variant::Pseudo(":focus"),
    "focus-within" => Variant::Pseudo(":focus-within"),
    "focus-visible" => Variant::Pseudo(":focus-visible"),
    "active" => Variant::Pseudo(":active"),
    "disabled" => Variant::Pseudo(":disabled"),
};

/// Valueless utilities with fixed declarations.
static STATIC_UTILITIES: phf::Map<&'static str, &'static [(&'static str, &'static str)]> = phf_map! {
    // Display
    "block" => &[("display", "block")],
    "inline-block" => &[("display", "inline-block")],
    "inline" => &[("display", "inline")],
    "flex" => &[("display", "flex")],
    "inline-flex" => &[("display", "inline-flex")],
    "grid" => &[("display", "grid")],
    "inline-grid" => &[("display", "inline-grid")],
    "contents" => &[("display", "contents")],
    "flow-root" => &[("display", "flow-root")],
    "hidden" => &[("display", "none")],
    // Position
    "static" => &[("position", "static")],
    "fixed" => &[("position", "fixed")],
    "absolute" => &[("position", "absolute")],
    "relative" => &[("position", "relative")],
    "sticky" => &[("position", "sticky")],
    // Flexbox
    "flex-row" => &[("flex-direction", "row")],
    "flex-row-reverse" => &[("flex-direction", "row-reverse")],
    "flex-col" => &[("flex-direction", "column")],
    "flex-col-reverse" => &[("flex-direction", "column-reverse")],
    "flex-wrap" => &[("flex-wrap", "wrap")],
    "flex-wrap-reverse" => &[("flex-wrap", "wrap-reverse")],
    "flex-nowrap" => &[("flex-wrap", "nowrap")],
    "items-start" => &[("align-items", "flex-start")],
    "items-end" => &[("align-items", "flex-end")],
    "items-center" => &[("align-items", "center")],
    "items-baseline" => &[("align-items", "baseline")],
    "items-stretch" => &[("align-items", "stretch")],
    "justify-start" => &[("justify-content", "flex-start")],
    "justify-end" => &[("justify-content", "flex-end")],
    "justify-center" => &[("justify-content", "center")],
    "justify-between" => &[("justify-content", "space-between")],
    "justify-around" => &[("justify-content", "space-around")],
    "justify-evenly" => &[("justify-content", "space-evenly")],
    // Typography
    "text-left" => &[("text-align", "left")],
    "text-center" => &[("text-align", "center")],
    "text-right" => &[("text-align", "right")],
    "text-justify" => &[("text-align", "justify")],
    "italic" => &[("font-style", "italic")],
    "not-italic" => &[("font-style", "normal")],
    "uppercase" => &[("text-transform", "uppercase")],
    "lowercase" => &[("text-transform", "lowercase")],
    "capitalize" => &[("text-transform", "capitalize")],
    "normal-case" => &[("text-transform", "none")],
    "underline" => &[("text-decoration-line", "underline")],
    "overline" => &[("text-decoration-line", "overline")],
    "line-through" => &[("text-decoration-line", "line-through")],
    "no-underline" => &[("text-decoration-line", "none")],
    "truncate" => &[
        ("overflow", "hidden"),
        ("text-overflow", "ellipsis"),
        ("white-space", "nowrap"),
    ],
    // Borders
    "border" => &[("border-width", "1px")],
    // Overflow
    "overflow-auto" => &[("overflow", "auto")],
    "overflow-hidden" => &[("overflow", "hidden")],
    "overflow-visible" => &[("overflow", "visible")],
    "overflow-scroll" => &[("overflow", "scroll")],
};

type Family = &'static [(&'static str, &'static [&'static str])];

/// Value-taking utility families. Each maps to an ordered chain of
/// (token category, CSS properties) pairs; the first category containing
/// the key wins, so `text-xl` hits `fontSize` while `text-white` falls
/// through to `colors`.
static FAMILIES: phf::Map<&'static str, Family> = phf_map! {
    "bg" => &[("colors", &["background-color"])],
    "text" => &[("fontSize", &["font-size"]), ("colors", &["color"])],
    "border" => &[("colors", &["border-color"])],
    "font" => &[("fontFamily", &["font-family"]), ("fontWeight", &["font-weight"])],
    "p" => &[("spacing", &["padding"])],
    "px" => &[("spacing", &["padding-left", "padding-right"])],
    "py" => &[("spacing", &["padding-top", "padding-bottom"])],
    "pt" => &[("spacing", &["padding-top"])],
    "pr" => &[("spacing", &["padding-right"])],
    "pb" => &[("spacing", &["padding-bottom"])],
    "pl" => &[("spacing", &["padding-left"])],
    "m" => &[("spacing", &["margin"])],
    "mx" => &[("spacing", &["margin-left", "margin-right"])],
    "my" => &[("spacing", &["margin-top", "margin-bottom"])],
    "mt" => &[("spacing", &["margin-top"])],
    "mr" => &[("spacing", &["margin-right"])],
    "mb" => &[("spacing", &["margin-bottom"])],
    "ml" => &[("spacing", &["margin-left"])],
    "gap" => &[("spacing", &["gap"])],
    "gap-x" => &[("spacing", &["column-gap"])],
    "gap-y" => &[("spacing", &["row-gap"])],
    "w" => &[("width", &["width"]), ("spacing", &["width"])],
    "h" => &[("height", &["height"]), ("spacing", &["height"])],
    "rounded" => &[("borderRadius", &["border-radius"])],
};

/// Resolves one candidate against the run's tokens, animations, and
/// plugin-registered utilities. `None` means the candidate is not a
/// recognized utility; callers drop it silently.
pub fn resolve(
    candidate: &str,
    tokens: &TokenSet,
    animations: &AnimationRegistry,
    utilities: &UtilityRegistry,
) -> Option<ResolvedRule> {
    let (variants, base) = split_variants(candidate);

    let mut media_terms: Vec<&str> = Vec::new();
    let mut pseudo = String::new();
    for variant in variants {
        match *VARIANTS.get(variant)? {
            Variant::Media(condition) => media_terms.push(condition),
            Variant::Pseudo(suffix) => pseudo.push_str(suffix),
        }
    }

    let (declarations, keyframes) = resolve_base(base, tokens, animations, utilities)?;

    let selector = format!(".{}{}", escape_class(candidate), pseudo);
    let media = if media_terms.is_empty() {
        None
    } else {
        Some(media_terms.join(" and "))
    };

    Some(ResolvedRule {
        class_name: candidate.to_string(),
        selector,
        media,
        declarations,
        keyframes,
    })
}

fn split_variants(candidate: &str) -> (Vec<&str>, &str) {
    let mut variants = Vec::new();
    let mut rest = candidate;
    while let Some(at) = rest.find(':') {
        variants.push(&rest[..at]);
        rest = &rest[at + 1..];
    }
    (variants, rest)
}

fn resolve_base(
    base: &str,
    tokens: &TokenSet,
    animations: &AnimationRegistry,
    utilities: &UtilityRegistry,
) -> Option<(Vec<Declaration>, Option<String>)> {
    if base.is_empty() {
        return None;
    }

    if let Some(declarations) = utilities.get(base) {
        return Some((declarations.to_vec(), None));
    }

    if let Some(entries) = STATIC_UTILITIES.get(base) {
        let declarations = entries
            .iter()
            .map(|(property, value)| Declaration::new(*property, *value))
            .collect();
        return Some((declarations, None));
    }

    if let Some(alias) = base.strip_prefix("animate-") {
        let definition = animations.get(alias)?;
        // A missing keyframe body drops the rule rather than emitting a
        // dangling animation reference.
        if !animations.has_keyframes(&definition.keyframes) {
            return None;
        }
        let declarations = vec![Declaration::new("animation", definition.shorthand())];
        return Some((declarations, Some(definition.keyframes.clone())));
    }

    // Longest family prefix first: `gap-x-4` is `gap-x` + `4`, not
    // `gap` + `x-4`.
    let mut split = base.len();
    while let Some(at) = base[..split].rfind('-') {
        let prefix = &base[..at];
        let key = &base[at + 1..];
        if let Some(family) = FAMILIES.get(prefix) {
            if let Some(declarations) = resolve_family(family, key, tokens) {
                return Some((declarations, None));
            }
        }
        split = at;
    }

    // Bare family name resolves its DEFAULT token (`rounded`).
    if let Some(family) = FAMILIES.get(base) {
        if let Some(declarations) = resolve_family(family, "DEFAULT", tokens) {
            return Some((declarations, None));
        }
    }

    None
}

fn resolve_family(family: Family, key: &str, tokens: &TokenSet) -> Option<Vec<Declaration>> {
    for (category, properties) in family {
        if let Some(value) = tokens.lookup(category, key) {
            return Some(
                properties
                    .iter()
                    .map(|property| Declaration::new(*property, value.clone()))
                    .collect(),
            );
        }
    }
    None
}

/// CSS-escapes a class name for use in a selector. Within the candidate
/// alphabet only `:` and a leading digit ever need escaping, but escape
/// anything outside the safe set.
fn escape_class(name: &str) -> String {
    let mut escaped = String::with_capacity(name.len() + 2);
    let mut chars = name.chars();
    if let Some(first) = chars.next() {
        if first.is_ascii_digit() {
            // `.2xl\:flex` is invalid CSS; a leading digit takes the hex
            // escape form `\32 xl...`.
            escaped.push_str("\\3");
            escaped.push(first);
            escaped.push(' ');
        } else {
            escape_char(&mut escaped, first);
        }
    }
    for ch in chars {
        escape_char(&mut escaped, ch);
    }
    escaped
}

fn escape_char(escaped: &mut String, ch: char) {
    if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
        escaped.push(ch);
    } else {
        escaped.push('\\');
        escaped.push(ch);
    }
}
