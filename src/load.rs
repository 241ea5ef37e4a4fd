use crate::types::{AnswerRecord, PredictionRecord, QuestionRecord};
use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// A record that carries its own join key.
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for QuestionRecord {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for AnswerRecord {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for PredictionRecord {
    fn key(&self) -> &str {
        &self.id
    }
}

/// Parses newline-delimited JSON records. Blank lines are skipped; a
/// malformed line fails the whole read with its line number.
pub fn read_jsonl<T: DeserializeOwned, R: BufRead>(reader: R) -> Result<Vec<T>> {
    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line)
            .with_context(|| format!("malformed JSON record on line {}", idx + 1))?;
        records.push(record);
    }
    Ok(records)
}

/// Keys records by id, rejecting duplicates.
pub fn index_by_id<T: Keyed>(records: Vec<T>) -> Result<HashMap<String, T>> {
    let mut map = HashMap::with_capacity(records.len());
    for record in records {
        let id = record.key().to_string();
        if map.insert(id.clone(), record).is_some() {
            bail!("duplicate id {id:?}");
        }
    }
    Ok(map)
}

fn load_file<T: DeserializeOwned + Keyed>(path: &Path) -> Result<HashMap<String, T>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let records = read_jsonl(BufReader::new(file))
        .with_context(|| format!("reading {}", path.display()))?;
    index_by_id(records)
}

/// The three input sets joined by id. Answers are mandatory for every
/// question; predictions may be a partial subset.
#[derive(Debug)]
pub struct EvalInputs {
    pub questions: HashMap<String, QuestionRecord>,
    pub answers: HashMap<String, AnswerRecord>,
    pub predictions: HashMap<String, PredictionRecord>,
}

impl EvalInputs {
    pub fn load(
        questions_file: &Path,
        answers_file: &Path,
        predictions_file: &Path,
    ) -> Result<Self> {
        Self::from_parts(
            load_file(questions_file)?,
            load_file(answers_file)?,
            load_file(predictions_file)?,
        )
    }

    pub fn from_parts(
        questions: HashMap<String, QuestionRecord>,
        answers: HashMap<String, AnswerRecord>,
        predictions: HashMap<String, PredictionRecord>,
    ) -> Result<Self> {
        let inputs = Self {
            questions,
            answers,
            predictions,
        };
        inputs.validate()?;
        Ok(inputs)
    }

    /// Missing answer is fatal; missing prediction scores 0 for every
    /// metric, so only warn.
    fn validate(&self) -> Result<()> {
        for id in self.sorted_query_ids() {
            if !self.answers.contains_key(id) {
                bail!("entry in answers file not found for query {id:?}");
            }
            if !self.predictions.contains_key(id) {
                tracing::warn!(query_id = %id, "missing prediction, assigning a score of 0");
            }
        }
        Ok(())
    }

    /// Question ids in a stable order, for deterministic batching.
    pub fn sorted_query_ids(&self) -> Vec<&String> {
        let mut ids: Vec<&String> = self.questions.keys().collect();
        ids.sort_unstable();
        ids
    }
}
