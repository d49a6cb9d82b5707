//! Deterministic CSS emission.
//!
//! Identical rule sets produce byte-identical stylesheets regardless of the
//! order candidates were resolved in: duplicates collapse to the first
//! occurrence, rules sort by class name, and referenced keyframe blocks
//! follow, sorted by base name and emitted exactly once.

use std::collections::BTreeSet;

use indexmap::IndexMap;

use crate::animation::{AnimationRegistry, KeyframeBody};
use crate::resolver::{Declaration, ResolvedRule};

#[derive(Debug, Clone, Default)]
pub struct EmitOptions {
    pub minify: bool,
}

/// Renders resolved rules and their keyframe dependencies to CSS text.
/// Never fails; an empty rule set yields an empty string.
pub fn emit(rules: &[ResolvedRule], animations: &AnimationRegistry, options: &EmitOptions) -> String {
    let mut unique: IndexMap<&str, &ResolvedRule> = IndexMap::new();
    for rule in rules {
        unique.entry(rule.class_name.as_str()).or_insert(rule);
    }

    let mut ordered: Vec<&ResolvedRule> = unique.into_values().collect();
    ordered.sort_by(|a, b| a.class_name.cmp(&b.class_name));

    let mut referenced: BTreeSet<&str> = BTreeSet::new();
    for rule in &ordered {
        if let Some(base) = rule.keyframes.as_deref() {
            referenced.insert(base);
        }
    }

    let mut out = String::new();
    for rule in &ordered {
        write_rule(&mut out, rule, options);
    }
    for base in referenced {
        if let Some(body) = animations.keyframes_for(base) {
            write_keyframes(&mut out, base, &body, options);
        }
    }
    out
}

fn write_rule(out: &mut String, rule: &ResolvedRule, options: &EmitOptions) {
    match (&rule.media, options.minify) {
        (Some(media), true) => {
            out.push_str("@media ");
            out.push_str(media);
            out.push('{');
            write_block_min(out, &rule.selector, &rule.declarations);
            out.push('}');
        }
        (Some(media), false) => {
            out.push_str("@media ");
            out.push_str(media);
            out.push_str(" {\n");
            write_block(out, &rule.selector, &rule.declarations, 1);
            out.push_str("}\n");
        }
        (None, true) => write_block_min(out, &rule.selector, &rule.declarations),
        (None, false) => write_block(out, &rule.selector, &rule.declarations, 0),
    }
}

fn write_keyframes(out: &mut String, base: &str, body: &KeyframeBody, options: &EmitOptions) {
    if options.minify {
        out.push_str("@keyframes ");
        out.push_str(base);
        out.push('{');
        for (selector, declarations) in &body.frames {
            write_block_min(out, selector, declarations);
        }
        out.push('}');
    } else {
        out.push_str("@keyframes ");
        out.push_str(base);
        out.push_str(" {\n");
        for (selector, declarations) in &body.frames {
            write_block(out, selector, declarations, 1);
        }
        out.push_str("}\n");
    }
}

fn write_block(out: &mut String, selector: &str, declarations: &[Declaration], level: usize) {
    let pad = "  ".repeat(level);
    out.push_str(&pad);
    out.push_str(selector);
    out.push_str(" {\n");
    for declaration in declarations {
        out.push_str(&pad);
        out.push_str("  ");
        out.push_str(&declaration.property);
        out.push_str(": ");
        out.push_str(&declaration.value);
        out.push_str(";\n");
    }
    out.push_str(&pad);
    out.push_str("}\n");
}

fn write_block_min(out: &mut String, selector: &str, declarations: &[Declaration]) {
    out.push_str(selector);
    out.push('{');
    for (index, declaration) in declarations.iter().enumerate() {
        if index > 0 {
            out.push(';');
        }
        out.push_str(&declaration.property);
        out.push(':');
        out.push_str(&declaration.value);
    }
    out.push('}');
}
