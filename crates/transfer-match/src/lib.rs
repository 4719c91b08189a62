//! Recommendation engine for college-transfer planning.
//!
//! The engine turns a student profile, a questionnaire, and an optional
//! free-text query into a ranked, explained list of college matches. It is
//! organized as a pipeline: preference-weight derivation, deterministic
//! per-college scoring, and an AI-factor blend over the top candidates, with
//! structured empty-state reasons whenever zero results can be explained.
//!
//! Collaborators (the college-data provider and the text-completion provider)
//! sit behind traits so the pipeline can be exercised against fixtures, a
//! cache, or live services without code changes.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
