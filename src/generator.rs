// src/generator.rs
use std::fmt;

/// A fully-qualified hostname to probe.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Candidate(String);

impl Candidate {
    pub fn new(label: &str, domain: &str) -> Self {
        Self(format!("{}.{}", label, domain))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Candidates for one label: `label.domain`, then `label0.domain` through
/// `label9.domain` when `numeric_variants` is set.
pub fn generate_candidates(domain: &str, label: &str, numeric_variants: bool) -> Vec<Candidate> {
    let mut candidates = Vec::with_capacity(if numeric_variants { 11 } else { 1 });
    candidates.push(Candidate::new(label, domain));

    if numeric_variants {
        for digit in 0..=9 {
            candidates.push(Candidate::new(&format!("{}{}", label, digit), domain));
        }
    }

    candidates
}

/// Expands a whole wordlist in label order. No deduplication.
pub fn expand_wordlist(domain: &str, labels: &[String], numeric_variants: bool) -> Vec<Candidate> {
    labels
        .iter()
        .flat_map(|label| generate_candidates(domain, label, numeric_variants))
        .collect()
}
