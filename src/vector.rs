//! TF-IDF vector space and cosine similarity.
//!
//! Term statistics are rebuilt from scratch on every call: the corpus for
//! an IDF computation is exactly the set of token lists passed in, which
//! may include the query itself. There is no persistent inverted index and
//! no cache, so identical terms can legitimately carry different weights in
//! different calls.

use std::collections::HashMap;

/// Sparse term-weight vector, built fresh per document per call.
pub type TermVector = HashMap<String, f64>;

/// Compute term frequency: `count(t) / len(tokens)`.
///
/// An empty token list yields an empty map, not an error.
pub fn term_frequency(tokens: &[String]) -> TermVector {
    let total = tokens.len();
    if total == 0 {
        return TermVector::new();
    }
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for token in tokens {
        *counts.entry(token.as_str()).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(term, count)| (term.to_string(), count as f64 / total as f64))
        .collect()
}

/// Compute inverse document frequency over a set of token lists.
///
/// For corpus size `N` (the number of lists passed), `idf(t) = ln(N / df(t))`
/// where `df(t)` counts the lists containing `t` at least once. A term
/// present in every list gets weight `0`.
pub fn inverse_document_frequency(token_lists: &[Vec<String>]) -> TermVector {
    let total = token_lists.len();
    if total == 0 {
        return TermVector::new();
    }

    let mut doc_freq: HashMap<&str, usize> = HashMap::new();
    for tokens in token_lists {
        let mut seen: Vec<&str> = tokens.iter().map(|t| t.as_str()).collect();
        seen.sort_unstable();
        seen.dedup();
        for term in seen {
            *doc_freq.entry(term).or_insert(0) += 1;
        }
    }

    doc_freq
        .into_iter()
        .map(|(term, df)| (term.to_string(), (total as f64 / df as f64).ln()))
        .collect()
}

/// Compute a TF-IDF vector: elementwise product restricted to the terms
/// present in `tf`. Terms absent from `idf` weigh `0`.
pub fn tfidf_vector(tf: &TermVector, idf: &TermVector) -> TermVector {
    tf.iter()
        .map(|(term, tf_val)| {
            let idf_val = idf.get(term).copied().unwrap_or(0.0);
            (term.clone(), tf_val * idf_val)
        })
        .collect()
}

/// Cosine similarity between two sparse vectors, in `[0.0, 1.0]`.
///
/// The dot product runs over the key intersection only. Returns `0.0` when
/// either vector is empty, either magnitude is zero, or the vectors share
/// no terms — this function never divides by zero.
pub fn cosine_similarity(v1: &TermVector, v2: &TermVector) -> f64 {
    if v1.is_empty() || v2.is_empty() {
        return 0.0;
    }

    // Iterate the smaller vector over the intersection.
    let (small, large) = if v1.len() <= v2.len() { (v1, v2) } else { (v2, v1) };
    let dot: f64 = small
        .iter()
        .filter_map(|(term, w)| large.get(term).map(|other| w * other))
        .sum();

    if dot == 0.0 {
        return 0.0;
    }

    let magnitude1 = v1.values().map(|w| w * w).sum::<f64>().sqrt();
    let magnitude2 = v2.values().map(|w| w * w).sum::<f64>().sqrt();
    if magnitude1 == 0.0 || magnitude2 == 0.0 {
        return 0.0;
    }

    dot / (magnitude1 * magnitude2)
}
