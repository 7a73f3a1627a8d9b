//! Error taxonomy for the analysis pipeline.
//!
//! Only the model invocation and audio retrieval can fail; every parsing-stage
//! anomaly degrades gracefully and is reported as a [`crate::ParseAnnotation`]
//! instead. A failed request never produces a partial report.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Downloading the source audio failed (URL-mode ingestion).
    #[error("audio fetch failed: {0}")]
    AudioFetch(String),

    /// The model endpoint was unreachable or the request could not complete
    /// (includes caller-level timeouts).
    #[error("model request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The model endpoint answered with a non-success status.
    #[error("model API error {status}: {body}")]
    ModelStatus { status: u16, body: String },

    /// The response decoded but carried no text content.
    #[error("model response contained no text")]
    EmptyResponse,

    /// Missing or unusable configuration (e.g. no API key).
    #[error("configuration error: {0}")]
    Config(String),
}
