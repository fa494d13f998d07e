//! Secondary recommendation path. Scores raw menu rows without the
//! constraint pipeline, so it keeps working when the rows or the
//! preferences are too incomplete for the primary engine.

mod scoring;

pub use scoring::{FallbackScorer, ScoreBreakdown, ScoredItem};
