// src/services/mod.rs

pub mod evaluation;
pub mod queries;
pub mod recorder;
pub mod retention;
pub mod scoring;

pub use evaluation::{EvaluationOutcome, QuizEvaluator};
pub use queries::AttemptQueryService;
pub use recorder::AttemptRecorder;
pub use retention::HistoryRetentionPolicy;
