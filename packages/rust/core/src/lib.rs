//! End-to-end fetch pipeline for SkillPress.

pub mod pipeline;

pub use pipeline::{FetchSummary, ProgressReporter, SilentProgress, UrlOutcome, run_fetch};
