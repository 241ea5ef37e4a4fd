use crate::aggregate::aggregate_raw_metrics;
use crate::lerc::{self, Lerc};
use crate::load::EvalInputs;
use crate::report;
use crate::{bleu, meteor};
use anyhow::Result;
use std::collections::BTreeMap;
use std::path::Path;

/// Computes all three metrics over the joined inputs. LERC batches go
/// through `scorer` serially; BLEU-1 and METEOR are local.
pub async fn compute_metrics(
    inputs: &EvalInputs,
    scorer: &dyn Lerc,
    batch_size: usize,
) -> Result<BTreeMap<String, f64>> {
    let raw_lerc = lerc::lerc_raw_scores(scorer, inputs, batch_size).await?;
    let raw_bleu = bleu::bleu1_raw_scores(inputs);
    let raw_meteor = meteor::meteor_raw_scores(inputs);

    Ok(report::merge_metrics(vec![
        aggregate_raw_metrics(&inputs.questions, &raw_lerc, "lerc"),
        aggregate_raw_metrics(&inputs.questions, &raw_bleu, "bleu1"),
        aggregate_raw_metrics(&inputs.questions, &raw_meteor, "meteor"),
    ]))
}

/// Single forward pass: score, aggregate, write the report.
pub async fn calculate_metrics(
    inputs: &EvalInputs,
    scorer: &dyn Lerc,
    batch_size: usize,
    metrics_file: &Path,
) -> Result<()> {
    let metrics = compute_metrics(inputs, scorer, batch_size).await?;
    tracing::info!(
        metrics = metrics.len(),
        path = %metrics_file.display(),
        "writing metrics report"
    );
    report::write_metrics(metrics_file, &metrics)
}
