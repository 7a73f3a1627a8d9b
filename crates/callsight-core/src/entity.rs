//! Entity extractor: pull repeated `**Brand N:**` / `**Retailer N:**` blocks out of
//! the competitive-intelligence section body.
//!
//! Identity is array position, not the printed ordinal: the extractor trusts
//! document order, keeps the label as metadata, and never merges two blocks even
//! when they name the same brand (the conversation may reference a brand in more
//! than one context).

use crate::taxonomy::{is_canonical_category, EntityKind};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Catch-all field for unrecognized keys and keyless lines inside an entity block.
pub const NOTES_FIELD: &str = "Notes";

/// One competitor brand or online retailer block.
///
/// `fields` preserves insertion order and may repeat a key if the model printed it
/// twice; [`BrandEntity::field`] returns the first occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandEntity {
    pub kind: EntityKind,
    /// The 1-based ordinal printed in the marker ("**Brand 2:**" → 2). Metadata
    /// only; array position is canonical.
    pub label_ordinal: u32,
    /// (key, value) pairs in document order. Keys are canonicalized against the
    /// kind's vocabulary; everything else accumulates under [`NOTES_FIELD`].
    pub fields: Vec<(String, String)>,
}

impl BrandEntity {
    fn new(kind: EntityKind, label_ordinal: u32) -> Self {
        Self {
            kind,
            label_ordinal,
            fields: Vec::new(),
        }
    }

    /// First value stored under `key` (case-sensitive; keys are canonical spellings).
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The `Category` value, for competitor brands that carry one.
    pub fn category(&self) -> Option<&str> {
        self.field("Category")
    }

    /// `Some(false)` when a category is present but outside the closed vocabulary.
    pub fn category_conforms(&self) -> Option<bool> {
        self.category().map(is_canonical_category)
    }

    fn push_note(&mut self, text: &str) {
        if let Some((_, v)) = self.fields.iter_mut().find(|(k, _)| k == NOTES_FIELD) {
            v.push('\n');
            v.push_str(text);
        } else {
            self.fields.push((NOTES_FIELD.to_string(), text.to_string()));
        }
    }
}

/// Entity-start marker: optional list bullet, then a bolded known label plus a
/// 1-based ordinal. Tolerates the colon inside or outside the bold run and trailing
/// text on the marker line.
static MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:[-*]\s+)?\*\*\s*(?P<label>Brand|Retailer)\s+(?P<ord>\d+)\s*:?\s*\*\*\s*:?\s*(?P<rest>.*)$")
        .expect("entity marker regex")
});

/// Extract all entities of `kind` from one section body.
///
/// A marker for *any* known label closes the currently open entity, so interleaved
/// Brand/Retailer groups never bleed field lines into each other. Blank lines are
/// skipped; lines before the first marker belong to no entity and are ignored here
/// (they remain in the section body).
pub fn extract_entities(kind: EntityKind, body: &[String]) -> Vec<BrandEntity> {
    let mut entities: Vec<BrandEntity> = Vec::new();
    let mut current: Option<BrandEntity> = None;

    for line in body {
        if line.trim().is_empty() {
            continue;
        }
        if let Some(caps) = MARKER_RE.captures(line) {
            if let Some(done) = current.take() {
                entities.push(done);
            }
            let label = &caps["label"];
            if label.eq_ignore_ascii_case(kind.marker_label()) {
                let ordinal: u32 = caps["ord"].parse().unwrap_or(0);
                let mut entity = BrandEntity::new(kind, ordinal);
                let rest = caps["rest"].trim();
                if !rest.is_empty() {
                    entity.push_note(rest);
                }
                current = Some(entity);
            }
            continue;
        }
        let Some(entity) = current.as_mut() else {
            continue;
        };
        match split_field_line(line) {
            Some((raw_key, value)) => match kind.resolve_field(raw_key) {
                Some(canonical) => entity.fields.push((canonical.to_string(), value.to_string())),
                None => entity.push_note(line.trim()),
            },
            None => entity.push_note(line.trim()),
        }
    }
    if let Some(done) = current.take() {
        entities.push(done);
    }
    entities
}

/// Split `- **Key:** value` / `- Key: value` into (key, value) at the first colon.
/// Bold markers and a leading bullet are stripped from the key. Returns `None` when
/// the line has no colon or an empty key.
fn split_field_line(line: &str) -> Option<(&str, &str)> {
    let t = line.trim();
    let t = t.strip_prefix("- ").or_else(|| t.strip_prefix("* ")).unwrap_or(t);
    let idx = t.find(':')?;
    let key = t[..idx].trim_matches(|c: char| c == '*' || c.is_whitespace());
    if key.is_empty() {
        return None;
    }
    let value = t[idx + 1..]
        .trim_matches(|c: char| c == '*' || c.is_whitespace());
    Some((key, value))
}
