//! Image-misuse heuristic.
//!
//! Compares a post's image reference against the set of official VIP
//! imagery references. A third-party account reusing official imagery is an
//! impersonation signal. Degrades to zero when the post carries no image.

use std::collections::HashSet;

use super::{Detector, DetectorKind, DetectorSignal};
use crate::source::Post;

/// Score assigned when a post reuses an official reference.
const REUSE_SCORE: f64 = 0.9;

pub struct ImageMisuseDetector {
    official_refs: HashSet<String>,
}

impl ImageMisuseDetector {
    pub fn new<I, S>(official_refs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            official_refs: official_refs.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait::async_trait]
impl Detector for ImageMisuseDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::ImageMisuse
    }

    async fn analyze(&self, post: &Post) -> DetectorSignal {
        let image_ref = match &post.image_ref {
            Some(r) if !r.is_empty() => r,
            _ => return DetectorSignal::unavailable(self.kind()),
        };

        if self.official_refs.contains(image_ref) {
            DetectorSignal::new(
                self.kind(),
                REUSE_SCORE,
                format!("reuses official imagery ({})", image_ref),
            )
        } else {
            DetectorSignal::new(self.kind(), 0.0, "no official-image reuse detected")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Platform;
    use chrono::Utc;

    fn post(image_ref: Option<&str>) -> Post {
        Post {
            platform: Platform::Instagram,
            author: "poster".into(),
            content: "look at this".into(),
            url: String::new(),
            posted_at: Utc::now(),
            author_metadata: None,
            image_ref: image_ref.map(String::from),
        }
    }

    fn detector() -> ImageMisuseDetector {
        ImageMisuseDetector::new(["img:official-headshot-2024"])
    }

    #[tokio::test]
    async fn test_no_image_scores_zero() {
        let signal = detector().analyze(&post(None)).await;
        assert_eq!(signal.score, 0.0);
        assert_eq!(signal.evidence, "unavailable");
    }

    #[tokio::test]
    async fn test_official_reuse_flagged() {
        let signal = detector()
            .analyze(&post(Some("img:official-headshot-2024")))
            .await;
        assert_eq!(signal.score, REUSE_SCORE);
        assert!(signal.evidence.contains("official imagery"));
    }

    #[tokio::test]
    async fn test_unrelated_image_scores_zero() {
        let signal = detector().analyze(&post(Some("img:cat-photo"))).await;
        assert_eq!(signal.score, 0.0);
    }
}
