//! Term-frequency / inverse-document-frequency vectorization.
//!
//! Conventions:
//! - tokens are lowercased runs of two or more word characters, English stop words removed
//! - terms found in more than `max_df` of the documents are dropped
//! - idf is smoothed: `ln((1 + n) / (1 + df)) + 1`
//! - every document vector is L2-normalized, so a dot product is a cosine similarity

use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use regex::Regex;

use crate::services::stop_words::is_stop_word;

static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("valid token pattern"));

/// Default document frequency ceiling
pub const DEFAULT_MAX_DF: f64 = 0.85;

/// Sparse document vector, entries sorted by term index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    fn from_map(weights: HashMap<usize, f64>) -> Self {
        let mut entries: Vec<(usize, f64)> = weights.into_iter().collect();
        entries.sort_unstable_by_key(|(index, _)| *index);
        Self { entries }
    }

    pub fn is_zero(&self) -> bool {
        self.entries.iter().all(|(_, weight)| *weight == 0.0)
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }

    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut total = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (a_index, a_weight) = self.entries[i];
            let (b_index, b_weight) = other.entries[j];
            match a_index.cmp(&b_index) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    total += a_weight * b_weight;
                    i += 1;
                    j += 1;
                }
            }
        }
        total
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }
}

/// Vector space fit over one batch of documents
#[derive(Debug, Clone, Default)]
pub struct TfidfMatrix {
    pub vocabulary: BTreeMap<String, usize>,
    pub rows: Vec<SparseVector>,
}

impl TfidfMatrix {
    pub fn row(&self, index: usize) -> Option<&SparseVector> {
        self.rows.get(index)
    }
}

#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    max_df: f64,
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DF)
    }
}

impl TfidfVectorizer {
    /// `max_df` is the fraction of documents above which a term is dropped
    pub fn new(max_df: f64) -> Self {
        Self { max_df }
    }

    /// Lowercased tokens of a document with stop words removed
    pub fn tokenize(&self, document: &str) -> Vec<String> {
        let lowered = document.to_lowercase();
        TOKEN_PATTERN
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|token| !is_stop_word(token))
            .map(str::to_string)
            .collect()
    }

    /// Fits the vocabulary and idf weights on `documents` and returns one row per document
    ///
    /// An empty vocabulary yields all-zero rows. In a two-document batch the ceiling drops
    /// every shared term, so when it would remove every term there it is skipped and two
    /// identical documents still compare as 1.0. Larger batches always apply it.
    pub fn fit_transform(&self, documents: &[String]) -> TfidfMatrix {
        let n_docs = documents.len();
        let counts: Vec<HashMap<String, usize>> = documents
            .iter()
            .map(|doc| {
                let mut tf = HashMap::new();
                for token in self.tokenize(doc) {
                    *tf.entry(token).or_insert(0) += 1;
                }
                tf
            })
            .collect();

        let mut document_frequency: BTreeMap<&str, usize> = BTreeMap::new();
        for tf in &counts {
            for term in tf.keys() {
                *document_frequency.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        let max_doc_count = self.max_df * n_docs as f64;
        let mut kept: Vec<(&str, usize)> = document_frequency
            .iter()
            .filter(|(_, df)| (**df as f64) <= max_doc_count)
            .map(|(term, df)| (*term, *df))
            .collect();

        if kept.is_empty() && !document_frequency.is_empty() && n_docs == 2 {
            tracing::debug!(
                terms = document_frequency.len(),
                max_df = self.max_df,
                "Document frequency ceiling removes every term; keeping full vocabulary"
            );
            kept = document_frequency
                .iter()
                .map(|(term, df)| (*term, *df))
                .collect();
        }

        let vocabulary: BTreeMap<String, usize> = kept
            .iter()
            .enumerate()
            .map(|(index, (term, _))| (term.to_string(), index))
            .collect();

        let idf: Vec<f64> = kept
            .iter()
            .map(|(_, df)| ((1.0 + n_docs as f64) / (1.0 + *df as f64)).ln() + 1.0)
            .collect();

        let rows = counts
            .iter()
            .map(|tf| {
                let mut weights: HashMap<usize, f64> = tf
                    .iter()
                    .filter_map(|(term, count)| {
                        vocabulary
                            .get(term)
                            .map(|index| (*index, *count as f64 * idf[*index]))
                    })
                    .collect();

                let norm = weights.values().map(|w| w * w).sum::<f64>().sqrt();
                if norm > 0.0 {
                    for weight in weights.values_mut() {
                        *weight /= norm;
                    }
                }
                SparseVector::from_map(weights)
            })
            .collect();

        TfidfMatrix { vocabulary, rows }
    }
}
