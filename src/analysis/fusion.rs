//! Signal fusion policy.
//!
//! Weights, floors, and the alert threshold are tunable policy, not
//! structure; defaults live in configuration and are non-normative.

use serde::{Deserialize, Serialize};

use super::{ThreatLevel, ThreatVerdict};
use crate::assess::SemanticAssessment;
use crate::detect::{DetectorKind, DetectorSignal};

/// Reason recorded when no individual detector triggered but the fused
/// score still cleared the alert threshold.
const GENERAL_CONCERN: &str = "General Concern";

/// Reason recorded when only the semantic assessor pushed the score up.
const ASSESSOR_ESCALATION: &str = "Escalated by semantic assessment";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FusionPolicy {
    /// Per-kind fusion weights. Toxicity and fake-account dominate,
    /// sentiment is the weakest contributor.
    pub toxicity_weight: f64,
    pub sentiment_weight: f64,
    pub fake_account_weight: f64,
    pub image_misuse_weight: f64,
    /// Minimum assessor confidence for its severity to participate in
    /// fusion at all.
    pub confidence_floor: f64,
    /// Fused score at or above which a verdict becomes an alert.
    pub alert_threshold: f64,
}

impl Default for FusionPolicy {
    fn default() -> Self {
        Self {
            toxicity_weight: 0.35,
            sentiment_weight: 0.15,
            fake_account_weight: 0.30,
            image_misuse_weight: 0.20,
            confidence_floor: 0.5,
            alert_threshold: 0.3,
        }
    }
}

impl FusionPolicy {
    fn weight(&self, kind: DetectorKind) -> f64 {
        match kind {
            DetectorKind::Toxicity => self.toxicity_weight,
            DetectorKind::Sentiment => self.sentiment_weight,
            DetectorKind::FakeAccount => self.fake_account_weight,
            DetectorKind::ImageMisuse => self.image_misuse_weight,
        }
    }

    /// Per-detector floor above which a signal's evidence enters `reason`.
    fn trigger_floor(kind: DetectorKind) -> f64 {
        match kind {
            DetectorKind::Toxicity => 0.7,
            DetectorKind::Sentiment => 0.6,
            DetectorKind::FakeAccount => 0.6,
            DetectorKind::ImageMisuse => 0.5,
        }
    }

    /// Fuse detector signals and an optional semantic assessment into one
    /// verdict. Never fails: missing signals simply contribute nothing,
    /// and an all-zero input classifies as `low`.
    ///
    /// Weights are renormalized over the signals that actually evaluated
    /// the post, so a detector that degraded on missing input (no author
    /// metadata, no image) does not dilute the ones that ran.
    pub fn classify(
        &self,
        signals: &[DetectorSignal],
        assessment: Option<&SemanticAssessment>,
    ) -> ThreatVerdict {
        let mut weighted = 0.0;
        let mut total_weight = 0.0;
        for signal in signals.iter().filter(|s| s.is_available()) {
            let w = self.weight(signal.kind);
            weighted += signal.score.clamp(0.0, 1.0) * w;
            total_weight += w;
        }
        let detector_score = if total_weight > 0.0 {
            weighted / total_weight
        } else {
            0.0
        };

        // The assessor may escalate a verdict the detectors missed, but a
        // low-confidence assessment never suppresses a detector-driven one.
        let mut score = detector_score;
        let mut assessor_escalated = false;
        if let Some(a) = assessment {
            if a.confidence >= self.confidence_floor && a.severity > detector_score {
                score = a.severity;
                assessor_escalated = true;
            }
        }
        let score = score.clamp(0.0, 1.0);

        let triggered: Vec<&str> = signals
            .iter()
            .filter(|s| s.score >= Self::trigger_floor(s.kind))
            .map(|s| s.evidence.as_str())
            .collect();

        let reason = if !triggered.is_empty() {
            triggered.join("; ")
        } else if assessor_escalated {
            ASSESSOR_ESCALATION.to_string()
        } else {
            GENERAL_CONCERN.to_string()
        };

        let ai_analysis = assessment
            .map(|a| a.narrative.clone())
            .unwrap_or_default();

        ThreatVerdict {
            score,
            level: ThreatLevel::from_score(score),
            reason,
            ai_analysis,
        }
    }
}
