//! Score normalizer: parse the weighted effectiveness lines and recompute the
//! final score.
//!
//! The rubric's N/A rule is deliberate product policy, not a default: a criterion
//! that does not apply contributes its full weight × 10 to the weighted sum. An
//! out-of-range printed score (the model occasionally overshoots) is demoted to
//! N/A rather than clamped, so a formatting glitch never understates effectiveness.

use crate::annotation::ParseAnnotation;
use crate::taxonomy::{ScoreCriterion, MAX_CRITERION_SCORE};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Printed-vs-derived final scores closer than this are considered in agreement.
pub const FINAL_SCORE_TOLERANCE: f64 = 0.05;

/// One parsed criterion line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub criterion: ScoreCriterion,
    /// Parsed numeric score in [0, 10], or `None` for N/A (including demoted
    /// out-of-range values).
    pub score: Option<f64>,
}

impl ScoreComponent {
    /// Score used in the weighted sum: the numeric value, or full credit for N/A.
    pub fn effective_score(&self) -> f64 {
        self.score.unwrap_or(MAX_CRITERION_SCORE)
    }

    pub fn weight(&self) -> f64 {
        self.criterion.weight()
    }
}

/// The four weighted criteria plus the derived final score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreCard {
    /// Components in document order. At most one per criterion; the first
    /// occurrence wins when the model repeats a line.
    pub components: Vec<ScoreComponent>,
    /// Recomputed weighted sum. `None` when fewer than four criteria were found —
    /// never computed from partial weights.
    pub final_score: Option<f64>,
    /// The final score the model printed, when one was found. Informational; the
    /// derived value is authoritative.
    pub printed_final: Option<f64>,
}

impl ScoreCard {
    /// An empty, incomplete card (score section missing entirely).
    pub fn empty() -> Self {
        Self {
            components: Vec::new(),
            final_score: None,
            printed_final: None,
        }
    }

    /// True when all four criteria were found and a final score was derived.
    pub fn is_complete(&self) -> bool {
        self.final_score.is_some()
    }

    pub fn component(&self, criterion: ScoreCriterion) -> Option<&ScoreComponent> {
        self.components.iter().find(|c| c.criterion == criterion)
    }
}

/// `**<criterion> (<weight>% weight):** <score>/10` with N/A accepted in place of
/// the number; tolerant of whitespace, a colon inside or outside the bold run, and
/// a missing `/10` suffix.
static COMPONENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\*\*\s*(?P<name>[^*(]+?)\s*\(\s*\d+(?:\.\d+)?\s*%\s*weight\s*\)\s*:?\s*\*\*\s*:?\s*(?P<score>N/?A|-?\d+(?:\.\d+)?)\s*(?:/\s*10)?",
    )
    .expect("score component regex")
});

/// `<value>/10` occurrences, used to pick up the printed final score.
static FINAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?P<value>-?\d+(?:\.\d+)?)\s*/\s*10").expect("final score regex")
});

/// Parse the effectiveness-score section body into a [`ScoreCard`], collecting
/// degrade annotations. Criteria may appear in any order; unknown criterion names
/// are ignored.
pub fn parse_scorecard(body: &[String]) -> (ScoreCard, Vec<ParseAnnotation>) {
    let mut card = ScoreCard::empty();
    let mut annotations = Vec::new();

    for line in body {
        let Some(caps) = COMPONENT_RE.captures(line) else {
            continue;
        };
        let Some(criterion) = ScoreCriterion::resolve(&caps["name"]) else {
            continue;
        };
        if card.component(criterion).is_some() {
            continue;
        }
        let raw_score = &caps["score"];
        let score = if raw_score.eq_ignore_ascii_case("N/A") || raw_score.eq_ignore_ascii_case("NA")
        {
            None
        } else {
            match raw_score.parse::<f64>() {
                Ok(v) if (0.0..=MAX_CRITERION_SCORE).contains(&v) => Some(v),
                Ok(v) => {
                    tracing::warn!(
                        criterion = criterion.label(),
                        printed = v,
                        "score out of range; demoting to N/A (full credit)"
                    );
                    annotations.push(ParseAnnotation::ScoreOutOfRange {
                        criterion: criterion.label().to_string(),
                        printed: v,
                    });
                    None
                }
                Err(_) => None,
            }
        };
        card.components.push(ScoreComponent { criterion, score });
    }

    card.printed_final = find_printed_final(body);

    if card.components.len() == ScoreCriterion::ALL.len() {
        let derived: f64 = card
            .components
            .iter()
            .map(|c| c.weight() * c.effective_score())
            .sum();
        card.final_score = Some(derived);
        if let Some(printed) = card.printed_final {
            if (printed - derived).abs() > FINAL_SCORE_TOLERANCE {
                annotations.push(ParseAnnotation::FinalScoreMismatch { printed, derived });
            }
        }
    } else {
        annotations.push(ParseAnnotation::ScoreCardIncomplete {
            found: card.components.len(),
        });
    }

    (card, annotations)
}

/// The last `<value>/10` on a line mentioning the final score (or the line after,
/// where the model sometimes puts the computed value).
fn find_printed_final(body: &[String]) -> Option<f64> {
    let mut printed = None;
    let mut take_next = false;
    for line in body {
        let mentions_final = line.to_ascii_lowercase().contains("final score");
        if mentions_final || take_next {
            // Skip criterion lines so "8/10" on a component is never mistaken for the final.
            if !COMPONENT_RE.is_match(line) {
                if let Some(caps) = FINAL_RE.captures_iter(line).last() {
                    printed = caps["value"].parse::<f64>().ok().or(printed);
                }
            }
            take_next = mentions_final && printed.is_none();
        }
    }
    printed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(str::to_string).collect()
    }

    const FULL_SECTION: &str = "\
**Product promotion (30% weight):** 8/10
**Scheme leverage (20% weight):** 6/10
**Competitor handling (25% weight):** 7/10
**Customer psychology understanding (25% weight):** 9/10

**Final Score Calculation:**
(8 x 0.3) + (6 x 0.2) + (7 x 0.25) + (9 x 0.25) = 7.6/10";

    #[test]
    fn all_numeric_components_compute_weighted_final() {
        let (card, annotations) = parse_scorecard(&lines(FULL_SECTION));
        assert_eq!(card.components.len(), 4);
        let derived = card.final_score.unwrap();
        assert!((derived - 7.5).abs() < 1e-9);
        // Model printed 7.6; derived 7.5 wins and the drift is annotated.
        assert_eq!(card.printed_final, Some(7.6));
        assert!(annotations
            .iter()
            .any(|a| matches!(a, ParseAnnotation::FinalScoreMismatch { .. })));
    }

    #[test]
    fn na_component_contributes_full_credit() {
        let body = lines(
            "**Product promotion (30% weight):** 8/10\n\
             **Scheme leverage (20% weight):** 7/10\n\
             **Competitor handling (25% weight):** N/A\n\
             **Customer psychology understanding (25% weight):** 6.5/10",
        );
        let (card, _) = parse_scorecard(&body);
        let expected = 0.3 * 8.0 + 0.2 * 7.0 + 0.25 * 10.0 + 0.25 * 6.5;
        assert!((card.final_score.unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn out_of_range_score_demotes_to_full_credit() {
        let body = lines(
            "**Product promotion (30% weight):** 12/10\n\
             **Scheme leverage (20% weight):** 7/10\n\
             **Competitor handling (25% weight):** 6/10\n\
             **Customer psychology understanding (25% weight):** 6/10",
        );
        let (card, annotations) = parse_scorecard(&body);
        let promo = card
            .component(ScoreCriterion::ProductPromotion)
            .unwrap();
        assert_eq!(promo.score, None);
        assert!((promo.effective_score() - 10.0).abs() < 1e-9);
        assert!(annotations.iter().any(|a| matches!(
            a,
            ParseAnnotation::ScoreOutOfRange { printed, .. } if *printed == 12.0
        )));
    }

    #[test]
    fn incomplete_card_has_no_final_score() {
        let body = lines("**Product promotion (30% weight):** 8/10");
        let (card, annotations) = parse_scorecard(&body);
        assert_eq!(card.components.len(), 1);
        assert!(!card.is_complete());
        assert!(annotations
            .iter()
            .any(|a| matches!(a, ParseAnnotation::ScoreCardIncomplete { found: 1 })));
    }

    #[test]
    fn criteria_order_does_not_matter() {
        let body = lines(
            "**Customer psychology understanding (25% weight):** 9/10\n\
             **Competitor handling (25% weight):** 7/10\n\
             **Scheme leverage (20% weight):** 6/10\n\
             **Product promotion (30% weight):** 8/10",
        );
        let (card, _) = parse_scorecard(&body);
        assert!((card.final_score.unwrap() - 7.5).abs() < 1e-9);
    }

    #[test]
    fn printed_final_found_on_line_after_calculation_heading() {
        let body = lines(
            "**Product promotion (30% weight):** 8/10\n\
             **Scheme leverage (20% weight):** 6/10\n\
             **Competitor handling (25% weight):** 7/10\n\
             **Customer psychology understanding (25% weight):** 9/10\n\
             **Final Score Calculation:**\n\
             = 7.5/10",
        );
        let (card, annotations) = parse_scorecard(&body);
        assert_eq!(card.printed_final, Some(7.5));
        assert!(annotations.is_empty());
    }

    #[test]
    fn colon_variants_on_component_lines() {
        let body = lines(
            "- **Product promotion (30% weight)**: 8 / 10\n\
             **Scheme leverage (20% weight):** 6\n\
             **Competitor handling (25% weight):** NA\n\
             **Customer psychology understanding (25% weight):** 9/10",
        );
        let (card, _) = parse_scorecard(&body);
        assert_eq!(card.components.len(), 4);
        assert_eq!(
            card.component(ScoreCriterion::CompetitorHandling).unwrap().score,
            None
        );
    }
}
