//! callsight-core: sales-call analysis library.
//!
//! One pipeline per request, strictly one-way: prompt + audio → Gemini →
//! raw markdown → segmented sections → entity/score extraction → assembled
//! [`Report`]. The model invocation is the only stage that can fail; every
//! parsing stage is pure, total, and annotates anomalies instead of raising.
//! The pipeline holds no state across invocations, so concurrent callers run
//! independent instances.

mod annotation;
mod config;
mod entity;
mod error;
mod gemini_service;
mod report;
mod score;
mod segment;
mod taxonomy;
pub mod prompts;

pub use annotation::ParseAnnotation;
pub use config::{UserConfig, DEFAULT_COMPANY};
pub use entity::{extract_entities, BrandEntity, NOTES_FIELD};
pub use error::AnalysisError;
pub use gemini_service::GeminiBridge;
pub use report::Report;
pub use score::{parse_scorecard, ScoreCard, ScoreComponent, FINAL_SCORE_TOLERANCE};
pub use segment::{segment, Section, MAX_HEADING_DEPTH};
pub use taxonomy::{
    is_canonical_category, CanonicalSection, EntityKind, ScoreCriterion, BRAND_CATEGORIES,
    MAX_CRITERION_SCORE,
};

/// Run the full analysis pipeline against one audio file: build the prompt from
/// the configured company identity, invoke the model, and parse the response.
///
/// Transport failures propagate as [`AnalysisError`] with no partial report;
/// parsing anomalies surface as [`ParseAnnotation`]s on the returned [`Report`].
pub async fn analyze_call(
    bridge: &GeminiBridge,
    config: &UserConfig,
    audio: &[u8],
    mime_type: &str,
) -> Result<(Report, String), AnalysisError> {
    let prompt =
        prompts::sales_analysis_prompt(&config.get_company(), &config.get_representative());
    let raw = bridge.analyze_audio(&prompt, audio, mime_type).await?;
    let report = Report::assemble(&raw);
    Ok((report, raw))
}
