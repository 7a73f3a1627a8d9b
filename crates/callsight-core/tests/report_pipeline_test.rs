//! Integration test: full markdown-to-report pipeline — verifies that the parser
//! decomposes a realistic model response into sections, entities, and scores while
//! losing nothing and degrading gracefully on malformed shapes.
//!
//! ## Scenarios
//! 1. Content preservation: bodies concatenated in order reproduce the input minus
//!    heading lines.
//! 2. Heading-free input parses as a single preamble without raising.
//! 3. A full well-formed response yields typed brands, retailers, and a complete
//!    scorecard.
//! 4. The N/A-full-credit rule flows through to the assembled report.
//! 5. Non-conforming categories are kept verbatim and annotated.
//! 6. Renamed (drifted) sections stay in the generic list and empty the typed views.
//! 7. Parsing is deterministic: two runs over the same text produce equal reports.
//! 8. The flat map holds one entry per heading in document order.

use callsight_core::{
    CanonicalSection, ParseAnnotation, Report, ScoreCriterion, Section,
};

/// A realistic, well-formed model response covering all nine sections.
const FULL_RESPONSE: &str = "\
# Brand & Product Mapping

A. Naga Brand Products
- Turmeric powder
- Chilli powder

B. Competitor Brands Mentioned
- Shakti: Masala powders
- Aachi: Spice mixes

# 1. Conversation Summary
- Salesperson pitched the new turmeric pack to a retail store owner.
- Customer currently stocks Shakti and is price sensitive.
- Two schemes were offered; customer accepted one bulk order.

# 2. Sales Matrix

**Naga Products Performance**
- Products promoted: Turmeric powder, chilli powder
- Schemes offered: 10% discount on 5kg turmeric packs

**Sales Barriers**
- Objections raised: Shelf space already committed to Shakti

# 3. Customer Buying Patterns

A. Regularly buying products
    - Turmeric powder

B. Scheme Based Orders
    - Chilli powder (took 5kg after hearing the discount)

# 4. Competitive Intelligence & Customer Psychology

A. Competitor Brand Analysis

**Brand 1:**
- Brand Name: Shakti
- Products: Masala powders
- Customer's Current Status: Stocks 20kg monthly
- Reasons for Preference: Cheaper per kg and strong local demand
- Category: Price Concern

**Brand 2:**
- Brand Name: Aachi
- Products: Spice mixes
- Customer's Current Status: Occasional orders
- Reasons for Preference: Wider range of blends
- Category: Product Variety

B. Online Retailers Mentioned

**Retailer 1:**
- Name: BigBasket
- Product Range: Full grocery line
- Pricing Strategy: Undercuts shop prices during festival sales
- Customer Perception: Convenient but impersonal
- Unique Selling Points: Doorstep delivery

C. Customer Buying Psychology
- What truly drives purchase decisions: Price, then customer demand

# 5. Salesperson Effectiveness Score

**Product promotion (30% weight):** 8/10
**Scheme leverage (20% weight):** 6/10
**Competitor handling (25% weight):** 7/10
**Customer psychology understanding (25% weight):** 9/10

**Final Score Calculation:**
(8 x 0.3) + (6 x 0.2) + (7 x 0.25) + (9 x 0.25) = 7.5/10

# 6. Salesperson Ability Analysis
- Handled price objections directly; missed the shelf-space concern.

# 7. Product Price Analysis
- Customer finds the 1kg turmeric pack costly at the quoted rate.

# 8. Salesperson Strengths
- Clear scheme explanations
- Good product knowledge

# 9. Areas for Improvement
- Address competitor shelf-space commitments
- Probe stock rotation preferences
";

fn reconstruct_bodies(sections: &[Section]) -> Vec<String> {
    sections.iter().flat_map(|s| s.body.iter().cloned()).collect()
}

// ===========================================================================
// Scenario 1: content preservation round-trip
// ===========================================================================

#[test]
fn bodies_reproduce_input_minus_heading_lines() {
    let report = Report::assemble(FULL_RESPONSE);
    let expected: Vec<String> = FULL_RESPONSE
        .lines()
        .filter(|line| {
            let t = line.trim_start();
            // Heading lines per the segmenter contract: '#' run, whitespace, text.
            let hashes = t.chars().take_while(|c| *c == '#').count();
            !(hashes > 0
                && t[hashes..].starts_with(char::is_whitespace)
                && !t[hashes..].trim().is_empty())
        })
        .map(str::to_string)
        .collect();
    assert_eq!(reconstruct_bodies(&report.sections), expected);
}

// ===========================================================================
// Scenario 2: heading-free input
// ===========================================================================

#[test]
fn heading_free_input_is_one_preamble() {
    let report = Report::assemble("The model ignored the format.\nJust prose.\n");
    assert_eq!(report.sections.len(), 1);
    assert!(report.sections[0].is_preamble());
    assert!(report.competitor_brands.is_empty());
    assert!(report.online_retailers.is_empty());
    assert!(!report.scorecard.is_complete());
}

// ===========================================================================
// Scenario 3: full well-formed response
// ===========================================================================

#[test]
fn full_response_yields_typed_structures() {
    let report = Report::assemble(FULL_RESPONSE);

    assert_eq!(report.competitor_brands.len(), 2);
    assert_eq!(report.competitor_brands[0].field("Brand Name"), Some("Shakti"));
    assert_eq!(report.competitor_brands[0].category(), Some("Price Concern"));
    assert_eq!(report.competitor_brands[1].field("Brand Name"), Some("Aachi"));

    assert_eq!(report.online_retailers.len(), 1);
    assert_eq!(report.online_retailers[0].field("Name"), Some("BigBasket"));
    assert_eq!(
        report.online_retailers[0].field("Unique Selling Points"),
        Some("Doorstep delivery")
    );

    let final_score = report.scorecard.final_score.unwrap();
    assert!((final_score - 7.5).abs() < 1e-9);
    assert_eq!(report.scorecard.printed_final, Some(7.5));
    assert!(report.annotations.is_empty());

    // Every numbered section resolved against the taxonomy.
    let matched: Vec<CanonicalSection> =
        report.sections.iter().filter_map(|s| s.matched()).collect();
    assert_eq!(matched.len(), CanonicalSection::ALL.len());
}

// ===========================================================================
// Scenario 4: N/A full credit end to end
// ===========================================================================

#[test]
fn na_criterion_awards_full_credit_in_assembled_report() {
    let text = "\
# 5. Salesperson Effectiveness Score
**Product promotion (30% weight):** 8/10
**Scheme leverage (20% weight):** 7/10
**Competitor handling (25% weight):** N/A
**Customer psychology understanding (25% weight):** 6.5/10
";
    let report = Report::assemble(text);
    let card = &report.scorecard;
    assert_eq!(
        card.component(ScoreCriterion::CompetitorHandling).unwrap().score,
        None
    );
    let expected = 0.3 * 8.0 + 0.2 * 7.0 + 0.25 * 10.0 + 0.25 * 6.5;
    assert!((card.final_score.unwrap() - expected).abs() < 1e-9);
}

// ===========================================================================
// Scenario 5: non-conforming category
// ===========================================================================

#[test]
fn non_conforming_category_is_annotated_not_rewritten() {
    let text = "\
# 4. Competitive Intelligence & Customer Psychology
**Brand 1:**
- Brand Name: Nandi
- Category: Brand Loyalty
";
    let report = Report::assemble(text);
    assert_eq!(report.competitor_brands[0].category(), Some("Brand Loyalty"));
    assert!(report.annotations.iter().any(|a| matches!(
        a,
        ParseAnnotation::NonConformingCategory { entity_index: 0, value } if value == "Brand Loyalty"
    )));
}

// ===========================================================================
// Scenario 6: taxonomy drift
// ===========================================================================

#[test]
fn renamed_section_keeps_content_but_empties_typed_views() {
    let text = "\
# 4. Competitor Landscape
**Brand 1:**
- Brand Name: Shakti
";
    let report = Report::assemble(text);
    // The drifted heading is retained verbatim for rendering/export.
    assert_eq!(
        report.sections[0].title.as_deref(),
        Some("4. Competitor Landscape")
    );
    // But it binds to nothing typed.
    assert!(report.competitor_brands.is_empty());
    assert!(report.annotations.iter().any(|a| matches!(
        a,
        ParseAnnotation::UnrecognizedSection { title } if title == "4. Competitor Landscape"
    )));
}

// ===========================================================================
// Scenario 7: determinism
// ===========================================================================

#[test]
fn repeated_assembly_is_deterministic() {
    let first = Report::assemble(FULL_RESPONSE);
    let second = Report::assemble(FULL_RESPONSE);
    assert_eq!(first, second);
}

// ===========================================================================
// Scenario 8: flat map order and shape
// ===========================================================================

#[test]
fn flat_map_has_one_entry_per_heading_in_document_order() {
    let report = Report::assemble(FULL_RESPONSE);
    let flat = report.flat_sections();
    let titles: Vec<&String> = flat.keys().collect();
    assert_eq!(titles.first().map(|s| s.as_str()), Some("Brand & Product Mapping"));
    assert_eq!(titles.last().map(|s| s.as_str()), Some("9. Areas for Improvement"));
    assert_eq!(flat.len(), 10);
    let summary = flat.get("1. Conversation Summary").and_then(|v| v.as_str()).unwrap();
    assert!(summary.starts_with("- Salesperson pitched"));
    assert!(!summary.contains("\n\n"), "blank lines are dropped in the flat form");
}
