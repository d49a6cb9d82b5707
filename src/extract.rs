//! Candidate class-name extraction from raw text.
//!
//! Extraction is deliberately permissive: any token shaped like a utility
//! class is a candidate, whatever context it appears in. Resolution is the
//! authoritative filter, so picking up stray identifiers here is harmless.

use regex::Regex;

/// Candidates longer than this are never real utility classes.
const MAX_CANDIDATE_LEN: usize = 128;

/// Scans text for tokens matching the utility-class shape:
/// zero or more colon-terminated variant prefixes, then a base name of
/// letters, digits, and hyphens starting with a letter.
pub struct Extractor {
    pattern: Regex,
}

impl Extractor {
    pub fn new() -> Self {
        // Variant prefixes may start with a digit (`2xl:`); base names may not.
        let pattern = Regex::new(r"(?:[A-Za-z0-9][A-Za-z0-9-]*:)*[A-Za-z][A-Za-z0-9-]*")
            .expect("candidate pattern is a valid regex");
        Extractor { pattern }
    }

    /// All candidates in `text`, in document order, duplicates included.
    /// The yielded slices borrow from `text` alone, so they stay usable
    /// after the extractor is gone.
    pub fn candidates<'s, 't>(
        &'s self,
        text: &'t str,
    ) -> impl Iterator<Item = &'t str> + use<'s, 't> {
        self.pattern.find_iter(text).filter_map(move |found| {
            if found.as_str().len() > MAX_CANDIDATE_LEN {
                return None;
            }
            // A token preceded by `-` is the tail of a longer identifier
            // (`-mt-8`, `--custom-prop`), not a class name.
            if found.start() > 0 && text.as_bytes()[found.start() - 1] == b'-' {
                return None;
            }
            Some(found.as_str())
        })
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}
