use crate::types::QuestionRecord;
use std::collections::{BTreeMap, HashMap};

/// Bins raw per-query scores by the dataset in each question's metadata,
/// means each bin under `"<dataset>_<metric>"`, and adds the macro average
/// of those means under `"avg_<metric>"`. A query id absent from `raw`
/// contributes 0 to its dataset.
pub fn aggregate_raw_metrics(
    questions: &HashMap<String, QuestionRecord>,
    raw: &HashMap<String, f64>,
    metric_name: &str,
) -> BTreeMap<String, f64> {
    let mut bins: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for (id, question) in questions {
        let score = raw.get(id).copied().unwrap_or(0.0);
        bins.entry(format!("{}_{}", question.metadata.dataset, metric_name))
            .or_default()
            .push(score);
    }

    let mut metrics: BTreeMap<String, f64> = bins
        .into_iter()
        .map(|(key, scores)| {
            let mean = scores.iter().sum::<f64>() / scores.len() as f64;
            (key, mean)
        })
        .collect();

    if !metrics.is_empty() {
        let avg = metrics.values().sum::<f64>() / metrics.len() as f64;
        metrics.insert(format!("avg_{metric_name}"), avg);
    }
    metrics
}
