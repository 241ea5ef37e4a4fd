use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata attached to a question. Only `dataset` is required; anything
/// else the benchmark ships alongside it is kept as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionMetadata {
    pub dataset: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: String,
    pub context: String,
    pub question: String,
    pub metadata: QuestionMetadata,
}

/// Human reference answers for one question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub id: String,
    pub references: Vec<String>,
}

/// A system-generated candidate answer being scored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub id: String,
    pub candidate: String,
}
