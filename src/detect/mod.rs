//! Detector bank -- independent per-post scoring signals.
//!
//! Each detector maps a post to one [`DetectorSignal`] and nothing else:
//! detectors never see each other's output, never retain state between
//! posts, and never fail -- a detector that cannot evaluate a post returns
//! a zero score with evidence `"unavailable"`.

pub mod account;
pub mod bank;
pub mod image;
pub mod sentiment;
pub mod toxicity;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::source::Post;

pub use bank::DetectorBank;

/// The four signal families contributed to fusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectorKind {
    Toxicity,
    Sentiment,
    FakeAccount,
    ImageMisuse,
}

impl fmt::Display for DetectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectorKind::Toxicity => write!(f, "toxicity"),
            DetectorKind::Sentiment => write!(f, "sentiment"),
            DetectorKind::FakeAccount => write!(f, "fake_account"),
            DetectorKind::ImageMisuse => write!(f, "image_misuse"),
        }
    }
}

/// One detector's partial verdict on a post. Higher score = more concerning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorSignal {
    pub kind: DetectorKind,
    pub score: f64,
    pub evidence: String,
}

/// Evidence string marking a signal whose detector could not evaluate the
/// post at all. Fusion excludes such signals from weight normalization.
pub const UNAVAILABLE_EVIDENCE: &str = "unavailable";

impl DetectorSignal {
    pub fn new(kind: DetectorKind, score: f64, evidence: impl Into<String>) -> Self {
        Self {
            kind,
            score: score.clamp(0.0, 1.0),
            evidence: evidence.into(),
        }
    }

    /// The degraded signal a detector emits when it cannot evaluate a post.
    pub fn unavailable(kind: DetectorKind) -> Self {
        Self::new(kind, 0.0, UNAVAILABLE_EVIDENCE)
    }

    /// Whether the detector actually evaluated the post, as opposed to
    /// degrading on missing input.
    pub fn is_available(&self) -> bool {
        self.evidence != UNAVAILABLE_EVIDENCE
    }
}

/// A single independent scoring function.
///
/// `analyze` is infallible by contract: malformed or partial input degrades
/// to [`DetectorSignal::unavailable`], never an error.
#[async_trait::async_trait]
pub trait Detector: Send + Sync {
    fn kind(&self) -> DetectorKind;

    async fn analyze(&self, post: &Post) -> DetectorSignal;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_score_is_clamped() {
        let high = DetectorSignal::new(DetectorKind::Toxicity, 3.5, "x");
        assert_eq!(high.score, 1.0);
        let low = DetectorSignal::new(DetectorKind::Sentiment, -0.2, "x");
        assert_eq!(low.score, 0.0);
    }

    #[test]
    fn test_unavailable_signal() {
        let s = DetectorSignal::unavailable(DetectorKind::ImageMisuse);
        assert_eq!(s.score, 0.0);
        assert_eq!(s.evidence, "unavailable");
    }
}
