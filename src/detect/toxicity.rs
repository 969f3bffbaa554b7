//! Lexical threat/harassment classifier.
//!
//! Stands in for a transformer toxicity model behind the same [`Detector`]
//! contract: the score imitates a positive-class probability, driven by a
//! weighted lexicon of violent and harassing phrases.

use super::{Detector, DetectorKind, DetectorSignal};
use crate::source::Post;

/// Phrases scored as direct threats or harassment, strongest first.
/// Multi-word entries are matched as substrings of the lowercased content.
const THREAT_LEXICON: &[(&str, f64)] = &[
    ("murder", 0.95),
    ("kill", 0.9),
    ("make them pay", 0.85),
    ("won't get away", 0.8),
    ("going to find", 0.8),
    ("should die", 0.9),
    ("die", 0.7),
    ("teach them a lesson", 0.75),
    ("threaten", 0.8),
    ("deserves to be hurt", 0.8),
    ("hurt", 0.6),
    ("harm", 0.6),
    ("attack", 0.65),
    ("destroy", 0.6),
];

/// Stacking bonus per additional matched phrase beyond the strongest.
const STACK_BONUS: f64 = 0.05;

pub struct ToxicityDetector;

#[async_trait::async_trait]
impl Detector for ToxicityDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::Toxicity
    }

    async fn analyze(&self, post: &Post) -> DetectorSignal {
        let content = post.content.to_lowercase();
        if content.trim().is_empty() {
            return DetectorSignal::unavailable(self.kind());
        }

        let mut matched: Vec<&str> = Vec::new();
        let mut top = 0.0_f64;
        for (phrase, weight) in THREAT_LEXICON {
            if content.contains(phrase) {
                matched.push(phrase);
                top = top.max(*weight);
            }
        }

        if matched.is_empty() {
            return DetectorSignal::new(self.kind(), 0.0, "no threat language detected");
        }

        let score = top + STACK_BONUS * (matched.len() as f64 - 1.0);
        let evidence = format!("threat language: {}", matched.join(", "));
        DetectorSignal::new(self.kind(), score, evidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Platform;
    use chrono::Utc;

    fn post(content: &str) -> Post {
        Post {
            platform: Platform::Twitter,
            author: "someone".into(),
            content: content.into(),
            url: String::new(),
            posted_at: Utc::now(),
            author_metadata: None,
            image_ref: None,
        }
    }

    #[tokio::test]
    async fn test_violent_post_scores_high() {
        let d = ToxicityDetector;
        let signal = d
            .analyze(&post("They should die. I'll make sure of it."))
            .await;
        assert_eq!(signal.kind, DetectorKind::Toxicity);
        assert!(signal.score >= 0.85, "score was {}", signal.score);
        assert!(signal.evidence.contains("die"));
    }

    #[tokio::test]
    async fn test_benign_post_scores_zero() {
        let d = ToxicityDetector;
        let signal = d.analyze(&post("Loved the new movie, what a performance!")).await;
        assert_eq!(signal.score, 0.0);
    }

    #[tokio::test]
    async fn test_empty_content_degrades() {
        let d = ToxicityDetector;
        let signal = d.analyze(&post("   ")).await;
        assert_eq!(signal.score, 0.0);
        assert_eq!(signal.evidence, "unavailable");
    }

    #[tokio::test]
    async fn test_stacked_phrases_raise_score() {
        let d = ToxicityDetector;
        let single = d.analyze(&post("I will hurt them")).await;
        let stacked = d.analyze(&post("I will hurt them and attack and destroy")).await;
        assert!(stacked.score > single.score);
    }
}
