use crate::load::EvalInputs;
use crate::tokenize::word_tokens;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashMap;

/// Unigram alignment between candidate and reference: exact matches first,
/// then Porter-stem matches on whatever is left. Pairs are
/// (candidate index, reference index), sorted by candidate index.
fn align(candidate: &[String], reference: &[String]) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    let mut cand_used = vec![false; candidate.len()];
    let mut ref_used = vec![false; reference.len()];

    for (i, word) in candidate.iter().enumerate() {
        if let Some(j) = (0..reference.len()).find(|&j| !ref_used[j] && reference[j] == *word) {
            cand_used[i] = true;
            ref_used[j] = true;
            pairs.push((i, j));
        }
    }

    let stemmer = Stemmer::create(Algorithm::English);
    let cand_stems: Vec<String> = candidate.iter().map(|w| stemmer.stem(w).into_owned()).collect();
    let ref_stems: Vec<String> = reference.iter().map(|w| stemmer.stem(w).into_owned()).collect();
    for i in 0..candidate.len() {
        if cand_used[i] {
            continue;
        }
        if let Some(j) = (0..reference.len()).find(|&j| !ref_used[j] && ref_stems[j] == cand_stems[i]) {
            cand_used[i] = true;
            ref_used[j] = true;
            pairs.push((i, j));
        }
    }

    pairs.sort_unstable();
    pairs
}

/// Number of maximal runs of matches that are contiguous in both strings.
fn chunk_count(pairs: &[(usize, usize)]) -> usize {
    if pairs.is_empty() {
        return 0;
    }
    let mut chunks = 1;
    for window in pairs.windows(2) {
        let (c0, r0) = window[0];
        let (c1, r1) = window[1];
        if c1 != c0 + 1 || r1 != r0 + 1 {
            chunks += 1;
        }
    }
    chunks
}

/// METEOR against a single reference: recall-weighted harmonic mean of
/// unigram precision and recall, discounted by a fragmentation penalty.
pub fn meteor(reference: &str, candidate: &str) -> f64 {
    let reference = word_tokens(reference);
    let candidate = word_tokens(candidate);
    if reference.is_empty() || candidate.is_empty() {
        return 0.0;
    }

    let pairs = align(&candidate, &reference);
    let matches = pairs.len() as f64;
    if matches == 0.0 {
        return 0.0;
    }

    let precision = matches / candidate.len() as f64;
    let recall = matches / reference.len() as f64;
    let f_mean = (10.0 * precision * recall) / (recall + 9.0 * precision);
    let fragmentation = chunk_count(&pairs) as f64 / matches;
    let penalty = 0.5 * fragmentation.powi(3);
    f_mean * (1.0 - penalty)
}

/// Best METEOR over all references for one candidate.
pub fn meteor_max(references: &[String], candidate: &str) -> f64 {
    references
        .iter()
        .map(|reference| meteor(reference, candidate))
        .fold(0.0, f64::max)
}

/// Raw METEOR per query id, max over references. Queries without a
/// prediction are left out and default to 0 at aggregation time.
pub fn meteor_raw_scores(inputs: &EvalInputs) -> HashMap<String, f64> {
    let mut raw = HashMap::new();
    for id in inputs.sorted_query_ids() {
        let Some(prediction) = inputs.predictions.get(id) else {
            continue;
        };
        let Some(answer) = inputs.answers.get(id) else {
            continue;
        };
        raw.insert(id.clone(), meteor_max(&answer.references, &prediction.candidate));
    }
    raw
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_sentences_score_near_one() {
        // Three matches in one chunk: penalty = 0.5 * (1/3)^3.
        let score = meteor("the cat sat", "the cat sat");
        let expected = 1.0 - 0.5 / 27.0;
        assert!((score - expected).abs() < 1e-12);
    }

    #[test]
    fn single_word_exact_match_scores_half() {
        // One match, one chunk: penalty = 0.5.
        assert!((meteor("cat", "cat") - 0.5).abs() < 1e-12);
    }

    #[test]
    fn stem_match_counts_as_a_match() {
        // "cats" and "cat" align via the stem stage.
        assert!((meteor("cat", "cats") - 0.5).abs() < 1e-12);
    }

    #[test]
    fn no_overlap_scores_zero() {
        assert_eq!(meteor("alpha beta", "gamma delta"), 0.0);
    }

    #[test]
    fn fragmentation_lowers_the_score() {
        // Same matched words; scrambled order splits the single chunk.
        let contiguous = meteor("the quick brown fox", "the quick brown fox");
        let scrambled = meteor("the quick brown fox", "fox brown quick the");
        assert!(scrambled < contiguous);
    }

    #[test]
    fn max_over_references_takes_the_best() {
        let references = vec!["nothing shared here".to_string(), "the cat sat".to_string()];
        let best = meteor_max(&references, "the cat sat");
        assert!((best - (1.0 - 0.5 / 27.0)).abs() < 1e-12);
    }
}
