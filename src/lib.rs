//! Automatic quality metrics for free-form question answering.
//!
//! Joins questions, human reference answers, and model predictions by id,
//! scores every query with a learned regression scorer (LERC), BLEU-1, and
//! METEOR, aggregates per dataset with a macro average across datasets, and
//! writes a JSON report.

pub mod aggregate;
pub mod bleu;
pub mod lerc;
pub mod load;
pub mod meteor;
pub mod pipeline;
pub mod report;
pub mod tokenize;
pub mod types;

pub use lerc::{Lerc, LercInput, RemoteLerc};
pub use load::EvalInputs;
pub use pipeline::{calculate_metrics, compute_metrics};
