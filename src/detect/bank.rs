//! Runs the full detector set concurrently over one post.

use futures::future::join_all;

use super::account::FakeAccountDetector;
use super::image::ImageMisuseDetector;
use super::sentiment::SentimentDetector;
use super::toxicity::ToxicityDetector;
use super::{Detector, DetectorSignal};
use crate::source::Post;

/// The detector bank. Detectors are pure functions of the post, so the
/// bank may evaluate them in any order or in parallel; fusion keys on
/// signal kind, never on completion order.
pub struct DetectorBank {
    detectors: Vec<Box<dyn Detector>>,
}

impl DetectorBank {
    /// The standard four-detector bank.
    pub fn standard<I, S>(official_image_refs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            detectors: vec![
                Box::new(ToxicityDetector),
                Box::new(SentimentDetector),
                Box::new(FakeAccountDetector),
                Box::new(ImageMisuseDetector::new(official_image_refs)),
            ],
        }
    }

    /// Evaluate every detector against `post`, concurrently.
    pub async fn analyze(&self, post: &Post) -> Vec<DetectorSignal> {
        join_all(self.detectors.iter().map(|d| d.analyze(post))).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::DetectorKind;
    use crate::source::Platform;
    use chrono::Utc;

    fn bare_post() -> Post {
        Post {
            platform: Platform::Twitter,
            author: "someone".into(),
            content: "hello world".into(),
            url: String::new(),
            posted_at: Utc::now(),
            author_metadata: None,
            image_ref: None,
        }
    }

    #[tokio::test]
    async fn test_bank_emits_all_four_kinds() {
        let bank = DetectorBank::standard(Vec::<String>::new());
        let signals = bank.analyze(&bare_post()).await;
        assert_eq!(signals.len(), 4);
        for kind in [
            DetectorKind::Toxicity,
            DetectorKind::Sentiment,
            DetectorKind::FakeAccount,
            DetectorKind::ImageMisuse,
        ] {
            assert!(signals.iter().any(|s| s.kind == kind), "missing {}", kind);
        }
    }

    #[tokio::test]
    async fn test_bare_post_degrades_never_errors() {
        // No metadata, no image: fake-account and image-misuse must be
        // zero-score signals, not failures.
        let bank = DetectorBank::standard(Vec::<String>::new());
        let signals = bank.analyze(&bare_post()).await;
        let fake = signals.iter().find(|s| s.kind == DetectorKind::FakeAccount).unwrap();
        let image = signals.iter().find(|s| s.kind == DetectorKind::ImageMisuse).unwrap();
        assert_eq!(fake.score, 0.0);
        assert_eq!(image.score, 0.0);
    }
}
