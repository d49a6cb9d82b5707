//! Animation aliases and keyframe bodies.
//!
//! `theme.extend.animation` values are compact shorthands, one per alias:
//! `<keyframes> <duration> <timing-function> <iteration-count>`. The alias
//! becomes the `animate-*` utility name; the first field names the keyframe
//! body the emitter must include.

use indexmap::IndexMap;
use phf::phf_map;

use crate::errors::{Error, Result};
use crate::resolver::Declaration;
use crate::theme::TokenSet;
use crate::Plugin;

type StaticFrame = (&'static str, &'static [(&'static str, &'static str)]);

/// Compiled-in keyframe bodies for the stock animations.
static KEYFRAMES: phf::Map<&'static str, &'static [StaticFrame]> = phf_map! {
    "spin" => &[("to", &[("transform", "rotate(360deg)")])],
    "ping" => &[("75%, 100%", &[("transform", "scale(2)"), ("opacity", "0")])],
    "pulse" => &[("50%", &[("opacity", ".5")])],
    "bounce" => &[
        (
            "0%, 100%",
            &[
                ("transform", "translateY(-25%)"),
                ("animation-timing-function", "cubic-bezier(0.8, 0, 1, 1)"),
            ],
        ),
        (
            "50%",
            &[
                ("transform", "none"),
                ("animation-timing-function", "cubic-bezier(0, 0, 0.2, 1)"),
            ],
        ),
    ],
};

/// One `@keyframes` body: frame selector plus its declarations, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyframeBody {
    pub frames: Vec<(String, Vec<Declaration>)>,
}

impl KeyframeBody {
    fn from_static(frames: &[StaticFrame]) -> Self {
        KeyframeBody {
            frames: frames
                .iter()
                .map(|(selector, declarations)| {
                    (
                        (*selector).to_string(),
                        declarations
                            .iter()
                            .map(|(property, value)| Declaration::new(*property, *value))
                            .collect(),
                    )
                })
                .collect(),
        }
    }
}

/// Keyframe bodies contributed through `Plugin::register_animations`.
#[derive(Debug, Default)]
pub struct KeyframeTable {
    bodies: IndexMap<String, KeyframeBody>,
}

impl KeyframeTable {
    pub fn add(&mut self, name: impl Into<String>, body: KeyframeBody) {
        self.bodies.insert(name.into(), body);
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

/// A parsed animation alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationDefinition {
    /// Alias as written in the theme, e.g. `spin-slow`.
    pub name: String,
    /// Keyframe base name, e.g. `spin`.
    pub keyframes: String,
    pub duration: String,
    pub timing: String,
    pub iterations: String,
}

impl AnimationDefinition {
    /// The value of the `animation` CSS property for this alias.
    pub fn shorthand(&self) -> String {
        format!(
            "{} {} {} {}",
            self.keyframes, self.duration, self.timing, self.iterations
        )
    }

    fn parse(name: &str, raw: &str) -> Result<Self> {
        let fields: Vec<&str> = raw.split_whitespace().collect();
        if fields.len() != 4 {
            return Err(Error::Config {
                message: format!(
                    "animation '{name}': expected '<keyframes> <duration> <timing-function> <iteration-count>', got '{raw}'"
                ),
            });
        }
        if !is_keyframes_name(fields[0]) {
            return Err(Error::Config {
                message: format!(
                    "animation '{name}': '{}' is not a valid keyframes name",
                    fields[0]
                ),
            });
        }
        Ok(AnimationDefinition {
            name: name.to_string(),
            keyframes: fields[0].to_string(),
            duration: fields[1].to_string(),
            timing: fields[2].to_string(),
            iterations: fields[3].to_string(),
        })
    }
}

fn is_keyframes_name(name: &str) -> bool {
    let mut bytes = name.bytes();
    match bytes.next() {
        Some(b) if b.is_ascii_alphabetic() => {}
        _ => return false,
    }
    bytes.all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// All animation aliases known to a run, parsed up front so malformed
/// shorthands fail before any file is scanned.
#[derive(Debug, Default)]
pub struct AnimationRegistry {
    definitions: IndexMap<String, AnimationDefinition>,
    custom_keyframes: IndexMap<String, KeyframeBody>,
}

impl AnimationRegistry {
    pub fn from_tokens(tokens: &TokenSet, plugins: &[Box<dyn Plugin>]) -> Result<Self> {
        let mut definitions = IndexMap::new();
        if let Some(entries) = tokens.category("animation") {
            for (name, raw) in entries {
                definitions.insert(name.clone(), AnimationDefinition::parse(name, raw)?);
            }
        }
        let mut table = KeyframeTable::default();
        for plugin in plugins {
            plugin.register_animations(&mut table);
        }
        Ok(AnimationRegistry {
            definitions,
            custom_keyframes: table.bodies,
        })
    }

    /// Definition for an alias, if the theme declares one.
    pub fn get(&self, alias: &str) -> Option<&AnimationDefinition> {
        self.definitions.get(alias)
    }

    /// Whether a keyframe body exists for `base`. Rules referencing a base
    /// with no body are dropped at resolution instead of emitting a dangling
    /// animation reference.
    pub fn has_keyframes(&self, base: &str) -> bool {
        self.custom_keyframes.contains_key(base) || KEYFRAMES.contains_key(base)
    }

    /// Body for `base`. Plugin-registered bodies shadow the compiled-in set.
    pub fn keyframes_for(&self, base: &str) -> Option<KeyframeBody> {
        if let Some(body) = self.custom_keyframes.get(base) {
            return Some(body.clone());
        }
        KEYFRAMES.get(base).map(|frames| KeyframeBody::from_static(frames))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use serde_json::{json, Value};

    fn registry_with(extend: Value) -> Result<AnimationRegistry> {
        let extension: IndexMap<String, Value> = serde_json::from_value(extend).unwrap();
        let tokens = TokenSet::defaults().merge(&extension).unwrap();
        AnimationRegistry::from_tokens(&tokens, &[])
    }

    #[test]
    fn parses_the_stock_aliases() {
        let registry = AnimationRegistry::from_tokens(&TokenSet::defaults(), &[]).unwrap();
        let spin = registry.get("spin").unwrap();
        assert_eq!(spin.keyframes, "spin");
        assert_eq!(spin.duration, "1s");
        assert_eq!(spin.timing, "linear");
        assert_eq!(spin.iterations, "infinite");
        assert_eq!(spin.shorthand(), "spin 1s linear infinite");
    }

    #[test]
    fn extended_alias_reuses_a_stock_keyframe_base() {
        let registry =
            registry_with(json!({ "animation": { "spin-slow": "spin 60s linear infinite" } }))
                .unwrap();
        let slow = registry.get("spin-slow").unwrap();
        assert_eq!(slow.keyframes, "spin");
        assert_eq!(slow.duration, "60s");
        assert!(registry.has_keyframes("spin"));
    }

    #[test]
    fn wrong_arity_is_a_config_error() {
        let err = registry_with(json!({ "animation": { "fast": "spin 1s" } })).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        assert!(err.to_string().contains("fast"));

        let err =
            registry_with(json!({ "animation": { "odd": "spin 1s linear infinite extra" } }))
                .unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn rejects_invalid_keyframes_names() {
        let err = registry_with(json!({ "animation": { "bad": "2fast 1s linear infinite" } }))
            .unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn unknown_base_has_no_keyframes() {
        let registry =
            registry_with(json!({ "animation": { "wiggle": "wiggle 1s ease-in-out infinite" } }))
                .unwrap();
        assert!(registry.get("wiggle").is_some());
        assert!(!registry.has_keyframes("wiggle"));
        assert!(registry.keyframes_for("wiggle").is_none());
    }

    #[test]
    fn stock_bodies_are_compiled_in() {
        let registry = AnimationRegistry::default();
        let spin = registry.keyframes_for("spin").unwrap();
        assert_eq!(spin.frames.len(), 1);
        assert_eq!(spin.frames[0].0, "to");
        let bounce = registry.keyframes_for("bounce").unwrap();
        assert_eq!(bounce.frames.len(), 2);
    }
}
