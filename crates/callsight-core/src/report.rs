//! Report assembler: compose segmented sections, extracted entities, and the
//! scorecard into one normalized document.
//!
//! Dual output by design: the generic ordered section list is lossless (every
//! line of the model's markdown lands in some section body, so rendering and
//! export never drop information), while the typed views expose machine-usable
//! structure wherever the taxonomy was recognized. Unrecognized headings stay in
//! the generic list and are annotated, never discarded.

use crate::annotation::ParseAnnotation;
use crate::entity::{extract_entities, BrandEntity};
use crate::score::{parse_scorecard, ScoreCard};
use crate::segment::{segment, Section};
use crate::taxonomy::{CanonicalSection, EntityKind};
use serde::{Deserialize, Serialize};

/// The assembled analysis of one sales call. Pure function of the raw markdown:
/// assembling the same text twice yields structurally identical reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Every section in document order, preamble included. Lossless.
    pub sections: Vec<Section>,
    /// Competitor-brand blocks in document order.
    pub competitor_brands: Vec<BrandEntity>,
    /// Online-retailer blocks in document order.
    pub online_retailers: Vec<BrandEntity>,
    /// Weighted effectiveness scores; empty and incomplete when the score section
    /// is missing.
    pub scorecard: ScoreCard,
    /// Non-fatal anomalies observed while parsing.
    pub annotations: Vec<ParseAnnotation>,
}

impl Report {
    /// Parse raw model markdown into a report. Never fails: malformed shapes
    /// degrade into emptier typed views plus annotations.
    pub fn assemble(raw_text: &str) -> Report {
        let sections = segment(raw_text);
        let mut competitor_brands = Vec::new();
        let mut online_retailers = Vec::new();
        let mut scorecard = ScoreCard::empty();
        let mut annotations = Vec::new();
        let mut saw_score_section = false;

        for section in &sections {
            match section.matched() {
                Some(CanonicalSection::CompetitiveIntelligence) => {
                    competitor_brands
                        .extend(extract_entities(EntityKind::CompetitorBrand, &section.body));
                    online_retailers
                        .extend(extract_entities(EntityKind::OnlineRetailer, &section.body));
                }
                Some(CanonicalSection::EffectivenessScore) => {
                    // First score section wins; a restated heading later in the
                    // document must not clobber the parsed card.
                    if !saw_score_section {
                        saw_score_section = true;
                        let (card, score_annotations) = parse_scorecard(&section.body);
                        scorecard = card;
                        annotations.extend(score_annotations);
                    }
                }
                Some(_) => {}
                None => {
                    if let Some(title) = &section.title {
                        annotations.push(ParseAnnotation::UnrecognizedSection {
                            title: title.clone(),
                        });
                    }
                }
            }
        }

        if !saw_score_section {
            annotations.push(ParseAnnotation::ScoreCardIncomplete { found: 0 });
        }

        for (index, brand) in competitor_brands.iter().enumerate() {
            if brand.category_conforms() == Some(false) {
                annotations.push(ParseAnnotation::NonConformingCategory {
                    entity_index: index,
                    value: brand.category().unwrap_or_default().to_string(),
                });
            }
        }

        tracing::debug!(
            sections = sections.len(),
            brands = competitor_brands.len(),
            retailers = online_retailers.len(),
            annotations = annotations.len(),
            "report assembled"
        );

        Report {
            sections,
            competitor_brands,
            online_retailers,
            scorecard,
            annotations,
        }
    }

    /// Flat heading → body-text mapping, one entry per heading in document order
    /// (`serde_json` is built with `preserve_order`). Body lines are trimmed and
    /// blanks dropped, matching the simple downstream form; the preamble has no
    /// heading and is omitted. A restated duplicate heading replaces the earlier
    /// entry.
    pub fn flat_sections(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut map = serde_json::Map::new();
        for section in &self.sections {
            let Some(title) = &section.title else {
                continue;
            };
            let text: Vec<&str> = section
                .body
                .iter()
                .map(|l| l.trim())
                .filter(|l| !l.is_empty())
                .collect();
            map.insert(
                title.clone(),
                serde_json::Value::String(text.join("\n")),
            );
        }
        map
    }

    /// Re-render the report as markdown: headings reconstructed at their recorded
    /// depth, bodies verbatim. Round-trips the original text for heading lines that
    /// were well-formed.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        for section in &self.sections {
            if let Some(title) = &section.title {
                out.push_str(&"#".repeat(section.level as usize));
                out.push(' ');
                out.push_str(title);
                out.push('\n');
            }
            for line in &section.body {
                out.push_str(line);
                out.push('\n');
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_score_section_yields_incomplete_annotation() {
        let report = Report::assemble("# 1. Conversation Summary\n- brief\n");
        assert!(!report.scorecard.is_complete());
        assert!(report
            .annotations
            .iter()
            .any(|a| matches!(a, ParseAnnotation::ScoreCardIncomplete { found: 0 })));
    }

    #[test]
    fn unrecognized_heading_is_annotated_but_retained() {
        let report = Report::assemble("# Executive Overview\nsome text\n");
        assert_eq!(report.sections.len(), 1);
        assert_eq!(
            report.sections[0].title.as_deref(),
            Some("Executive Overview")
        );
        assert!(report.annotations.iter().any(|a| matches!(
            a,
            ParseAnnotation::UnrecognizedSection { title } if title == "Executive Overview"
        )));
    }

    #[test]
    fn flat_map_skips_preamble_and_blank_lines() {
        let report = Report::assemble("preamble text\n# 1. Conversation Summary\n\n- a\n- b\n");
        let flat = report.flat_sections();
        assert_eq!(flat.len(), 1);
        assert_eq!(
            flat.get("1. Conversation Summary").and_then(|v| v.as_str()),
            Some("- a\n- b")
        );
    }

    #[test]
    fn duplicate_heading_replaces_flat_entry() {
        let report = Report::assemble("# Same\nfirst\n# Same\nsecond\n");
        let flat = report.flat_sections();
        assert_eq!(flat.len(), 1);
        assert_eq!(flat.get("Same").and_then(|v| v.as_str()), Some("second"));
        // The generic list still holds both.
        assert_eq!(report.sections.len(), 2);
    }

    #[test]
    fn to_markdown_reconstructs_headings_at_depth() {
        let report = Report::assemble("## Two\nbody\n");
        assert_eq!(report.to_markdown(), "## Two\nbody\n");
    }
}
