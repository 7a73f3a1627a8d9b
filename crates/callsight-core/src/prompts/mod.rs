//! Prompt templates: the single source of truth both the gateway and library
//! callers build model instructions from.
//!
//! The sales-analysis template and `taxonomy` describe the same contract; section
//! titles, entity markers, field labels, and the scoring rubric must stay in
//! lockstep between the two.

mod sales_analysis;

pub use sales_analysis::{sales_analysis_prompt, SALES_ANALYSIS_TEMPLATE};
