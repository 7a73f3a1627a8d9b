//! Report taxonomy: the canonical section titles, entity field vocabularies, and
//! scoring criteria the analysis prompt instructs the model to emit.
//!
//! The prompt template (`prompts::sales_analysis`) and this module are two views of
//! one contract. Renaming a section or field here without updating the template (or
//! vice versa) breaks the parser's typed views, so changes must land in lockstep.

use serde::{Deserialize, Serialize};

// -----------------------------------------------------------------------------
// Canonical sections
// -----------------------------------------------------------------------------

/// The fixed set of report sections the prompt mandates. A model heading binds to
/// one of these via [`CanonicalSection::resolve`]; headings that match nothing stay
/// in the generic section list only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CanonicalSection {
    /// "Brand & Product Mapping" — the unnumbered preface block.
    BrandProductMapping,
    /// "1. Conversation Summary"
    ConversationSummary,
    /// "2. Sales Matrix"
    SalesMatrix,
    /// "3. Customer Buying Patterns"
    CustomerBuyingPatterns,
    /// "4. Competitive Intelligence & Customer Psychology" — holds Brand/Retailer blocks.
    CompetitiveIntelligence,
    /// "5. Salesperson Effectiveness Score" — holds the weighted score lines.
    EffectivenessScore,
    /// "6. Salesperson Ability Analysis"
    AbilityAnalysis,
    /// "7. Product Price Analysis"
    PriceAnalysis,
    /// "8. Salesperson Strengths"
    Strengths,
    /// "9. Areas for Improvement"
    Improvements,
}

impl CanonicalSection {
    pub const ALL: [CanonicalSection; 10] = [
        CanonicalSection::BrandProductMapping,
        CanonicalSection::ConversationSummary,
        CanonicalSection::SalesMatrix,
        CanonicalSection::CustomerBuyingPatterns,
        CanonicalSection::CompetitiveIntelligence,
        CanonicalSection::EffectivenessScore,
        CanonicalSection::AbilityAnalysis,
        CanonicalSection::PriceAnalysis,
        CanonicalSection::Strengths,
        CanonicalSection::Improvements,
    ];

    /// Canonical heading text, without the numbering prefix.
    pub fn title(&self) -> &'static str {
        match self {
            CanonicalSection::BrandProductMapping => "Brand & Product Mapping",
            CanonicalSection::ConversationSummary => "Conversation Summary",
            CanonicalSection::SalesMatrix => "Sales Matrix",
            CanonicalSection::CustomerBuyingPatterns => "Customer Buying Patterns",
            CanonicalSection::CompetitiveIntelligence => {
                "Competitive Intelligence & Customer Psychology"
            }
            CanonicalSection::EffectivenessScore => "Salesperson Effectiveness Score",
            CanonicalSection::AbilityAnalysis => "Salesperson Ability Analysis",
            CanonicalSection::PriceAnalysis => "Product Price Analysis",
            CanonicalSection::Strengths => "Salesperson Strengths",
            CanonicalSection::Improvements => "Areas for Improvement",
        }
    }

    /// Match a raw heading against the canonical set. Case-insensitive; ignores a
    /// leading ordinal/punctuation prefix ("4.", "4)", stray "#") and a trailing colon.
    pub fn resolve(raw_title: &str) -> Option<Self> {
        let stripped = strip_ordinal_prefix(raw_title);
        let stripped = stripped.trim_end_matches(':').trim();
        if stripped.is_empty() {
            return None;
        }
        Self::ALL
            .iter()
            .copied()
            .find(|s| stripped.eq_ignore_ascii_case(s.title()))
    }
}

/// Drop a leading "4.", "4)", "#", or similar ordinal/punctuation run from a heading.
fn strip_ordinal_prefix(title: &str) -> &str {
    title
        .trim()
        .trim_start_matches(|c: char| c.is_ascii_digit() || matches!(c, '#' | '.' | ')' | '-'))
        .trim_start()
}

// -----------------------------------------------------------------------------
// Entity kinds and field vocabularies
// -----------------------------------------------------------------------------

/// Kind of repeated sub-entity block inside the competitive-intelligence section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    /// "**Brand N:**" blocks — one competitor brand each.
    CompetitorBrand,
    /// "**Retailer N:**" blocks — one online retailer each.
    OnlineRetailer,
}

impl EntityKind {
    /// The bolded label that opens a block of this kind.
    pub fn marker_label(&self) -> &'static str {
        match self {
            EntityKind::CompetitorBrand => "Brand",
            EntityKind::OnlineRetailer => "Retailer",
        }
    }

    /// Recognized field keys for this kind, in prompt order. Anything else lands in
    /// the notes bucket.
    pub fn field_vocabulary(&self) -> &'static [&'static str] {
        match self {
            EntityKind::CompetitorBrand => &[
                "Brand Name",
                "Products",
                "Customer's Current Status",
                "Reasons for Preference",
                "Category",
            ],
            EntityKind::OnlineRetailer => &[
                "Name",
                "Product Range",
                "Pricing Strategy",
                "Customer Perception",
                "Unique Selling Points",
            ],
        }
    }

    /// Resolve a raw field key against the vocabulary (case-insensitive). Returns the
    /// canonical spelling so field keys are stable across model runs.
    pub fn resolve_field(&self, raw_key: &str) -> Option<&'static str> {
        let key = raw_key.trim();
        self.field_vocabulary()
            .iter()
            .copied()
            .find(|k| key.eq_ignore_ascii_case(k))
    }
}

/// Closed vocabulary for the competitor-brand `Category` field. The prompt instructs
/// the model to pick exactly one; anything else is kept verbatim but flagged.
pub const BRAND_CATEGORIES: [&str; 5] = [
    "Price Concern",
    "Discount Concern",
    "Product Variety",
    "Product Package Size",
    "Other factors",
];

/// True when `value` is one of the five canonical categories (case-insensitive).
pub fn is_canonical_category(value: &str) -> bool {
    let v = value.trim();
    BRAND_CATEGORIES.iter().any(|c| v.eq_ignore_ascii_case(c))
}

// -----------------------------------------------------------------------------
// Scoring criteria
// -----------------------------------------------------------------------------

/// The four weighted effectiveness criteria. Weights are fixed by the rubric and
/// sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoreCriterion {
    ProductPromotion,
    SchemeLeverage,
    CompetitorHandling,
    CustomerPsychology,
}

impl ScoreCriterion {
    pub const ALL: [ScoreCriterion; 4] = [
        ScoreCriterion::ProductPromotion,
        ScoreCriterion::SchemeLeverage,
        ScoreCriterion::CompetitorHandling,
        ScoreCriterion::CustomerPsychology,
    ];

    /// Label as printed in the score section.
    pub fn label(&self) -> &'static str {
        match self {
            ScoreCriterion::ProductPromotion => "Product promotion",
            ScoreCriterion::SchemeLeverage => "Scheme leverage",
            ScoreCriterion::CompetitorHandling => "Competitor handling",
            ScoreCriterion::CustomerPsychology => "Customer psychology understanding",
        }
    }

    /// Fixed weight for the criterion.
    pub fn weight(&self) -> f64 {
        match self {
            ScoreCriterion::ProductPromotion => 0.30,
            ScoreCriterion::SchemeLeverage => 0.20,
            ScoreCriterion::CompetitorHandling => 0.25,
            ScoreCriterion::CustomerPsychology => 0.25,
        }
    }

    /// Match a printed criterion name (case-insensitive, tolerant of the shorter
    /// "Customer psychology" the model sometimes emits).
    pub fn resolve(raw_name: &str) -> Option<Self> {
        let name = raw_name.trim().trim_end_matches(':').trim();
        Self::ALL.iter().copied().find(|c| {
            name.eq_ignore_ascii_case(c.label())
                || (*c == ScoreCriterion::CustomerPsychology
                    && name.eq_ignore_ascii_case("Customer psychology"))
        })
    }
}

/// Maximum score for any single criterion; also the effective score under the
/// N/A-full-credit rule.
pub const MAX_CRITERION_SCORE: f64 = 10.0;
