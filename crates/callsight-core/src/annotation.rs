//! Non-fatal parse annotations: every degrade-gracefully path records what happened
//! instead of raising. Transport failures are typed errors; everything the parser
//! tolerates ends up here, attached to the report.

use serde::{Deserialize, Serialize};

/// One anomaly observed while parsing the model's markdown. Collecting these keeps
/// the pipeline total: malformed shapes degrade the typed views, never the parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseAnnotation {
    /// A heading did not match any canonical section title; its content stays in
    /// the generic section list only.
    UnrecognizedSection { title: String },
    /// A competitor brand's `Category` value is outside the closed vocabulary.
    /// The value is kept verbatim on the entity.
    NonConformingCategory { entity_index: usize, value: String },
    /// A criterion score was outside [0, 10]; the component was demoted to N/A
    /// (full credit) rather than clamped.
    ScoreOutOfRange { criterion: String, printed: f64 },
    /// Fewer than the four expected criteria were found; no final score computed.
    ScoreCardIncomplete { found: usize },
    /// The model's printed final score disagrees with the recomputed value beyond
    /// tolerance. The derived value is authoritative.
    FinalScoreMismatch { printed: f64, derived: f64 },
}
