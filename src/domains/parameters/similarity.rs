//! String similarity used for fuzzy parameter matching.
//!
//! The metric is normalized Levenshtein similarity over Unicode scalar
//! values of the normalized strings:
//!
//! ```text
//! similarity(a, b) = 1 - lev(a, b) / max(len(a), len(b))
//! ```
//!
//! It is 1.0 for identical strings and 0.0 for strings with nothing in
//! common. A fuzzy match is accepted only when the best candidate scores
//! strictly above [`ACCEPTANCE_THRESHOLD`] and no other parameter is a
//! plausible alternative (see [`FuzzyThresholds::decide`]).

/// Minimum similarity (exclusive) for a fuzzy match to be considered.
///
/// At 0.80 a ten-character name tolerates one typo, while `age` vs `stage`
/// (0.60) is refused.
pub const ACCEPTANCE_THRESHOLD: f64 = 0.80;

/// Minimum lead the best candidate must have over the runner-up.
pub const AMBIGUITY_MARGIN: f64 = 0.10;

/// Lowercase and fold separators (`-`, space, `.`) into `_`.
pub fn normalize_key(key: &str) -> String {
    key.trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            '-' | ' ' | '.' => '_',
            other => other,
        })
        .collect::<String>()
        .trim_matches('_')
        .to_string()
}

/// Levenshtein edit distance between `a` and `b`.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            let insertion = current[j] + 1;
            let deletion = previous[j + 1] + 1;
            current[j + 1] = substitution.min(insertion).min(deletion);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

/// Normalized similarity in `[0.0, 1.0]` between two keys.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = normalize_key(a);
    let b = normalize_key(b);
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - levenshtein(&a, &b) as f64 / longest as f64
}

/// A parameter scored against a supplied key.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub canonical_name: String,
    /// The canonical name or alias that produced the score.
    pub matched_name: String,
    pub similarity: f64,
}

/// Result of a fuzzy decision.
#[derive(Debug, Clone, PartialEq)]
pub enum FuzzyDecision {
    Accept(Candidate),
    Ambiguous(Vec<Candidate>),
    NoMatch,
}

/// Acceptance and ambiguity thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzyThresholds {
    pub acceptance: f64,
    pub ambiguity_margin: f64,
}

impl Default for FuzzyThresholds {
    fn default() -> Self {
        Self {
            acceptance: ACCEPTANCE_THRESHOLD,
            ambiguity_margin: AMBIGUITY_MARGIN,
        }
    }
}

impl FuzzyThresholds {
    /// Decide on candidates ranked best first (one entry per parameter).
    ///
    /// The best candidate is accepted only if it clears the threshold and the
    /// runner-up neither clears the threshold itself nor sits within the
    /// ambiguity margin.
    pub fn decide(&self, ranked: &[Candidate]) -> FuzzyDecision {
        let Some(best) = ranked.first() else {
            return FuzzyDecision::NoMatch;
        };
        if best.similarity <= self.acceptance {
            return FuzzyDecision::NoMatch;
        }

        let is_rival = |c: &Candidate| {
            c.similarity > self.acceptance
                || best.similarity - c.similarity < self.ambiguity_margin
        };

        let rivals: Vec<Candidate> = ranked.iter().skip(1).filter(|c| is_rival(c)).cloned().collect();
        if rivals.is_empty() {
            FuzzyDecision::Accept(best.clone())
        } else {
            let mut candidates = vec![best.clone()];
            candidates.extend(rivals);
            FuzzyDecision::Ambiguous(candidates)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn candidate(name: &str, similarity: f64) -> Candidate {
        Candidate {
            canonical_name: name.to_string(),
            matched_name: name.to_string(),
            similarity,
        }
    }

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein("", ""), 0);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("age", "stage"), 2);
        assert_eq!(levenshtein("hemoglobn", "hemoglobin"), 1);
    }

    #[test]
    fn test_similarity_normalizes() {
        assert_eq!(similarity("Serum-Creatinine", "serum_creatinine"), 1.0);
        assert!((similarity("age", "stage") - 0.6).abs() < 1e-9);
        assert!((similarity("hemoglobn", "hemoglobin") - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_age_is_never_stage() {
        let ranked = vec![candidate("stage", similarity("age", "stage"))];
        assert_eq!(FuzzyThresholds::default().decide(&ranked), FuzzyDecision::NoMatch);
    }

    #[test]
    fn test_clear_winner_accepted() {
        let ranked = vec![candidate("hemoglobin", 0.9), candidate("hematocrit", 0.5)];
        assert!(matches!(
            FuzzyThresholds::default().decide(&ranked),
            FuzzyDecision::Accept(c) if c.canonical_name == "hemoglobin"
        ));
    }

    #[test]
    fn test_two_close_candidates_are_ambiguous() {
        let ranked = vec![candidate("hdl_cholesterol", 0.93), candidate("ldl_cholesterol", 0.93)];
        match FuzzyThresholds::default().decide(&ranked) {
            FuzzyDecision::Ambiguous(c) => assert_eq!(c.len(), 2),
            other => panic!("expected ambiguity, got {:?}", other),
        }
    }

    #[test]
    fn test_runner_up_above_threshold_is_ambiguous() {
        let ranked = vec![candidate("a", 1.0), candidate("b", 0.85)];
        assert!(matches!(
            FuzzyThresholds::default().decide(&ranked),
            FuzzyDecision::Ambiguous(_)
        ));
    }

    #[test]
    fn test_runner_up_within_margin_is_ambiguous() {
        let ranked = vec![candidate("a", 0.82), candidate("b", 0.75)];
        assert!(matches!(
            FuzzyThresholds::default().decide(&ranked),
            FuzzyDecision::Ambiguous(_)
        ));
    }

    proptest! {
        #[test]
        fn prop_similarity_bounded_and_symmetric(a in "[a-z_]{0,12}", b in "[a-z_]{0,12}") {
            let s = similarity(&a, &b);
            prop_assert!((0.0..=1.0).contains(&s));
            prop_assert!((s - similarity(&b, &a)).abs() < 1e-12);
        }

        #[test]
        fn prop_identical_keys_are_perfect(a in "[a-z]{1,12}") {
            prop_assert_eq!(similarity(&a, &a), 1.0);
        }
    }
}
