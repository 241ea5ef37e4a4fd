use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Merges per-metric maps into one report. Metric-name suffixes keep the
/// key spaces disjoint.
pub fn merge_metrics(parts: Vec<BTreeMap<String, f64>>) -> BTreeMap<String, f64> {
    let mut merged = BTreeMap::new();
    for part in parts {
        merged.extend(part);
    }
    merged
}

/// Writes the report as JSON with 4-space indentation, overwriting any
/// existing file.
pub fn write_metrics(path: &Path, metrics: &BTreeMap<String, f64>) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
    metrics
        .serialize(&mut serializer)
        .with_context(|| format!("serializing metrics to {}", path.display()))?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_keeps_all_keys() {
        let a: BTreeMap<String, f64> = [("x_lerc".to_string(), 0.5)].into_iter().collect();
        let b: BTreeMap<String, f64> = [("x_bleu1".to_string(), 0.25)].into_iter().collect();
        let merged = merge_metrics(vec![a, b]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn writes_four_space_indented_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics.json");
        let metrics: BTreeMap<String, f64> = [("avg_lerc".to_string(), 0.5)].into_iter().collect();
        write_metrics(&path, &metrics).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("\n    \"avg_lerc\": 0.5"));
        let parsed: BTreeMap<String, f64> = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, metrics);
    }

    #[test]
    fn overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics.json");
        std::fs::write(&path, "stale").unwrap();
        write_metrics(&path, &BTreeMap::new()).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }
}
