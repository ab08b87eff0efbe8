use std::cmp::Ordering;

/// Number of top-ranked labels examined when deriving the verdict.
pub const VERDICT_TOP_K: usize = 4;

/// Keyword matched (case-insensitive substring) against the ranked labels.
pub const VERDICT_KEYWORD: &str = "cat";

/// One label with its confidence.
#[derive(Clone, Debug, PartialEq)]
pub struct Classification {
    pub label: String,
    /// Confidence in [0, 1].
    pub confidence: f32,
}

impl Classification {
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}

/// Ranked classification output for one frame, descending by confidence.
///
/// Produced once per processed frame and consumed once. The sort is stable,
/// so entries with equal confidence keep the model's output order.
#[derive(Clone, Debug, Default)]
pub struct ClassificationResult {
    ranked: Vec<Classification>,
}

impl ClassificationResult {
    /// Build from labels in model output order, ranking by descending
    /// confidence.
    pub fn from_model_output(mut labels: Vec<Classification>) -> Self {
        labels.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
        });
        Self { ranked: labels }
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    /// The top `k` ranked entries (fewer when the result is shorter).
    pub fn top(&self, k: usize) -> &[Classification] {
        &self.ranked[..k.min(self.ranked.len())]
    }

    pub fn best(&self) -> Option<&Classification> {
        self.ranked.first()
    }

    pub fn ranked(&self) -> &[Classification] {
        &self.ranked
    }
}

/// Binary verdict derived from a classification result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Cat,
    NotCat,
}

impl Verdict {
    /// Positive iff any of the top `VERDICT_TOP_K` labels contains
    /// `VERDICT_KEYWORD`, matched case-insensitively.
    pub fn from_ranked(result: &ClassificationResult) -> Self {
        let hit = result
            .top(VERDICT_TOP_K)
            .iter()
            .any(|c| c.label.to_lowercase().contains(VERDICT_KEYWORD));
        if hit {
            Verdict::Cat
        } else {
            Verdict::NotCat
        }
    }

    pub fn is_cat(self) -> bool {
        matches!(self, Verdict::Cat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(labels: &[(&str, f32)]) -> ClassificationResult {
        ClassificationResult::from_model_output(
            labels
                .iter()
                .map(|(label, confidence)| Classification::new(*label, *confidence))
                .collect(),
        )
    }

    #[test]
    fn ranks_descending_by_confidence() {
        let result = result(&[("dog", 0.1), ("tabby", 0.7), ("tree", 0.2)]);
        let labels: Vec<&str> = result.ranked().iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["tabby", "tree", "dog"]);
    }

    #[test]
    fn ties_keep_model_output_order() {
        let result = result(&[("first", 0.5), ("second", 0.5), ("third", 0.5)]);
        let labels: Vec<&str> = result.ranked().iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["first", "second", "third"]);
    }

    #[test]
    fn tabby_cat_in_top_four_is_positive() {
        let result = result(&[("Tabby_Cat", 0.9), ("dog", 0.05)]);
        assert_eq!(Verdict::from_ranked(&result), Verdict::Cat);
        assert!(Verdict::from_ranked(&result).is_cat());
    }

    #[test]
    fn no_cat_label_is_negative() {
        let result = result(&[("dog", 0.8), ("car", 0.1), ("tree", 0.05), ("chair", 0.05)]);
        assert_eq!(Verdict::from_ranked(&result), Verdict::NotCat);
    }

    #[test]
    fn cat_outside_top_four_is_negative() {
        let result = result(&[
            ("dog", 0.5),
            ("car", 0.2),
            ("tree", 0.1),
            ("chair", 0.08),
            ("tomcat", 0.05),
        ]);
        assert_eq!(Verdict::from_ranked(&result), Verdict::NotCat);
    }

    #[test]
    fn keyword_match_is_substring_and_case_insensitive() {
        let egyptian = result(&[("Egyptian CAT", 0.4)]);
        assert_eq!(Verdict::from_ranked(&egyptian), Verdict::Cat);

        let result = result(&[("catamaran", 0.4)]);
        // Substring policy: any label containing "cat" counts.
        assert_eq!(Verdict::from_ranked(&result), Verdict::Cat);
    }

    #[test]
    fn top_handles_short_results() {
        let result = result(&[("dog", 0.8)]);
        assert_eq!(result.top(VERDICT_TOP_K).len(), 1);
        assert_eq!(result.best().map(|c| c.label.as_str()), Some("dog"));
    }
}
