use crate::load::EvalInputs;
use crate::tokenize::word_tokens;
use std::collections::HashMap;

fn unigram_counts(tokens: &[String]) -> HashMap<&str, usize> {
    let mut counts = HashMap::new();
    for tok in tokens {
        *counts.entry(tok.as_str()).or_insert(0) += 1;
    }
    counts
}

/// Order-1 BLEU of a candidate against all references jointly.
///
/// Matches corpus-BLEU reference merging: candidate unigram counts are
/// clipped against the element-wise max over all references, the effective
/// reference length is the shortest reference, and a brevity penalty of
/// exp(1 - r/c) applies when the candidate is shorter. This is deliberately
/// NOT a max-over-references score, unlike LERC and METEOR.
pub fn bleu1(references: &[String], candidate: &str) -> f64 {
    let candidate = word_tokens(candidate);
    if candidate.is_empty() {
        return 0.0;
    }
    let references: Vec<Vec<String>> = references.iter().map(|r| word_tokens(r)).collect();
    let reference_len = match references.iter().map(|r| r.len()).min() {
        Some(len) => len,
        None => return 0.0,
    };

    let mut merged: HashMap<&str, usize> = HashMap::new();
    for reference in &references {
        for (tok, count) in unigram_counts(reference) {
            let entry = merged.entry(tok).or_insert(0);
            *entry = (*entry).max(count);
        }
    }

    let mut overlap = 0usize;
    for (tok, count) in unigram_counts(&candidate) {
        if let Some(&clip) = merged.get(tok) {
            overlap += count.min(clip);
        }
    }

    let precision = overlap as f64 / candidate.len() as f64;
    if precision == 0.0 {
        return 0.0;
    }
    let brevity_penalty = if candidate.len() >= reference_len {
        1.0
    } else {
        (1.0 - reference_len as f64 / candidate.len() as f64).exp()
    };
    precision * brevity_penalty
}

/// Raw BLEU-1 per query id. Queries without a prediction are left out and
/// default to 0 at aggregation time.
pub fn bleu1_raw_scores(inputs: &EvalInputs) -> HashMap<String, f64> {
    let mut raw = HashMap::new();
    for id in inputs.sorted_query_ids() {
        let Some(prediction) = inputs.predictions.get(id) else {
            continue;
        };
        let Some(answer) = inputs.answers.get(id) else {
            continue;
        };
        raw.insert(id.clone(), bleu1(&answer.references, &prediction.candidate));
    }
    raw
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn exact_match_scores_one() {
        assert_eq!(bleu1(&refs(&["the cat sat"]), "The cat sat."), 1.0);
    }

    #[test]
    fn disjoint_tokens_score_zero() {
        assert_eq!(bleu1(&refs(&["a b c"]), "x y z"), 0.0);
    }

    #[test]
    fn references_are_scored_jointly_not_max() {
        // Each reference alone covers half the candidate; merged they cover
        // all of it, so the joint score exceeds every single-reference score.
        let joint = bleu1(&refs(&["alpha x", "beta y"]), "alpha beta");
        let single_best = bleu1(&refs(&["alpha x"]), "alpha beta")
            .max(bleu1(&refs(&["beta y"]), "alpha beta"));
        assert_eq!(joint, 1.0);
        assert!(joint > single_best);
    }

    #[test]
    fn clipping_caps_repeated_tokens() {
        // "the the the" against "the cat": only one "the" is creditable.
        let score = bleu1(&refs(&["the cat sat"]), "the the the");
        let expected = (1.0 / 3.0) * 1.0;
        assert!((score - expected).abs() < 1e-12);
    }

    #[test]
    fn brevity_penalty_applies_to_short_candidates() {
        // precision 1, candidate length 1, shortest reference length 2.
        let score = bleu1(&refs(&["the cat"]), "the");
        let expected = (1.0_f64 - 2.0).exp();
        assert!((score - expected).abs() < 1e-12);
    }

    #[test]
    fn empty_candidate_scores_zero() {
        assert_eq!(bleu1(&refs(&["the cat"]), ""), 0.0);
    }
}
