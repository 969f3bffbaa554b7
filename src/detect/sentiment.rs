//! Negative-polarity classifier. Secondary signal: strong negativity raises
//! suspicion but is never sufficient to alert on its own (fusion weights it
//! lowest).

use super::{Detector, DetectorKind, DetectorSignal};
use crate::source::Post;

const NEGATIVE_LEXICON: &[(&str, f64)] = &[
    ("hate", 0.7),
    ("disgusting", 0.7),
    ("awful", 0.65),
    ("terrible", 0.65),
    ("worst", 0.6),
    ("pathetic", 0.6),
    ("overrated", 0.5),
    ("annoying", 0.5),
    ("nobody likes", 0.55),
];

pub struct SentimentDetector;

#[async_trait::async_trait]
impl Detector for SentimentDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::Sentiment
    }

    async fn analyze(&self, post: &Post) -> DetectorSignal {
        let content = post.content.to_lowercase();
        if content.trim().is_empty() {
            return DetectorSignal::unavailable(self.kind());
        }

        let mut matched: Vec<&str> = Vec::new();
        let mut top = 0.0_f64;
        for (term, weight) in NEGATIVE_LEXICON {
            if content.contains(term) {
                matched.push(term);
                top = top.max(*weight);
            }
        }

        if matched.is_empty() {
            DetectorSignal::new(self.kind(), 0.0, "neutral or positive sentiment")
        } else {
            let score = top + 0.05 * (matched.len() as f64 - 1.0);
            DetectorSignal::new(
                self.kind(),
                score,
                format!("negative sentiment: {}", matched.join(", ")),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Platform;
    use chrono::Utc;

    fn post(content: &str) -> Post {
        Post {
            platform: Platform::Facebook,
            author: "critic".into(),
            content: content.into(),
            url: String::new(),
            posted_at: Utc::now(),
            author_metadata: None,
            image_ref: None,
        }
    }

    #[tokio::test]
    async fn test_negative_post_scores() {
        let d = SentimentDetector;
        let signal = d.analyze(&post("I hate this, worst acting ever")).await;
        assert!(signal.score >= 0.7);
        assert!(signal.evidence.contains("hate"));
    }

    #[tokio::test]
    async fn test_positive_post_scores_zero() {
        let d = SentimentDetector;
        let signal = d.analyze(&post("Amazing performance, loved it")).await;
        assert_eq!(signal.score, 0.0);
    }
}
