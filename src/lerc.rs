use crate::load::EvalInputs;
use anyhow::{ensure, Result};
use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Archive the scoring service loads the regression model from.
pub const LERC_MODEL_URL: &str =
    "https://storage.googleapis.com/allennlp-public-models/lerc-2020-11-18.tar.gz";

/// One (reference, candidate) pair to score.
#[derive(Debug, Clone, Serialize)]
pub struct LercInput {
    pub context: String,
    pub question: String,
    pub reference: String,
    pub candidate: String,
}

#[derive(Debug, Deserialize)]
struct LercOutput {
    pred_score: f64,
}

/// Batch-capable regression scorer. The real implementation talks to an
/// inference service; tests substitute fakes.
#[async_trait]
pub trait Lerc: Send + Sync {
    /// Returns one native-range score per input, in input order.
    async fn predict_batch(&self, inputs: Vec<LercInput>) -> Result<Vec<f64>>;
}

#[derive(Serialize)]
struct PredictRequest<'a> {
    model: &'a str,
    cuda_device: i32,
    max_length: usize,
    inputs: &'a [LercInput],
}

/// HTTP client for a LERC inference service. Device and input length are
/// pass-throughs; a failed call aborts the run, no retries.
pub struct RemoteLerc {
    http: reqwest::Client,
    base_url: String,
    device: i32,
    max_length: usize,
}

impl RemoteLerc {
    pub fn new(base_url: impl Into<String>, device: i32, max_length: usize) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(600))
            .build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            http,
            base_url,
            device,
            max_length,
        })
    }
}

#[async_trait]
impl Lerc for RemoteLerc {
    async fn predict_batch(&self, inputs: Vec<LercInput>) -> Result<Vec<f64>> {
        let request = PredictRequest {
            model: LERC_MODEL_URL,
            cuda_device: self.device,
            max_length: self.max_length,
            inputs: &inputs,
        };
        let outputs: Vec<LercOutput> = self
            .http
            .post(format!("{}/predict_batch_json", self.base_url))
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        ensure!(
            outputs.len() == inputs.len(),
            "scorer returned {} scores for {} inputs",
            outputs.len(),
            inputs.len()
        );
        Ok(outputs.into_iter().map(|o| o.pred_score).collect())
    }
}

/// Squashes the model's native 1-5 range to [0,1]. Scores outside the
/// nominal range clamp to the nearest bound.
pub fn rescale(score: f64) -> f64 {
    ((score - 1.0) / 4.0).clamp(0.0, 1.0)
}

/// Raw LERC score per query id: batched inference over every
/// (reference, candidate) pair, rescaled, max over references. Batch size
/// only affects throughput, never the resulting scores.
pub async fn lerc_raw_scores(
    scorer: &dyn Lerc,
    inputs: &EvalInputs,
    batch_size: usize,
) -> Result<HashMap<String, f64>> {
    let batch_size = batch_size.max(1);
    let query_ids = inputs.sorted_query_ids();

    let bar = ProgressBar::new(query_ids.len().div_ceil(batch_size) as u64);
    bar.set_style(
        ProgressStyle::with_template("{msg} [{bar:40}] {pos}/{len} batches")
            .unwrap()
            .progress_chars("=> "),
    );
    bar.set_message("LERC");

    let mut best: HashMap<String, f64> = HashMap::new();
    for chunk in query_ids.chunks(batch_size) {
        let mut batch_ids = Vec::new();
        let mut batch_inputs = Vec::new();
        for &id in chunk {
            let Some(prediction) = inputs.predictions.get(id) else {
                continue;
            };
            let Some(answer) = inputs.answers.get(id) else {
                continue;
            };
            let Some(question) = inputs.questions.get(id) else {
                continue;
            };
            for reference in &answer.references {
                batch_ids.push(id.clone());
                batch_inputs.push(LercInput {
                    context: question.context.clone(),
                    question: question.question.clone(),
                    reference: reference.clone(),
                    candidate: prediction.candidate.clone(),
                });
            }
        }

        if !batch_inputs.is_empty() {
            let expected = batch_inputs.len();
            let scores = scorer.predict_batch(batch_inputs).await?;
            ensure!(
                scores.len() == expected,
                "scorer returned {} scores for {} inputs",
                scores.len(),
                expected
            );
            for (id, score) in batch_ids.into_iter().zip(scores) {
                let score = rescale(score);
                let entry = best.entry(id).or_insert(score);
                if score > *entry {
                    *entry = score;
                }
            }
        }
        bar.inc(1);
    }
    bar.finish_and_clear();
    Ok(best)
}
