//! Per-post analysis pipeline: detector bank, then semantic assessor, then
//! fusion. Shared by the scan loop, the `analyze` CLI command, and the
//! mock-alert endpoint.

use std::sync::Arc;

use tracing::{debug, warn};

use super::{FusionPolicy, ThreatVerdict};
use crate::assess::{AssessorError, SemanticAssessor};
use crate::detect::DetectorBank;
use crate::source::Post;

pub struct ThreatPipeline {
    bank: DetectorBank,
    assessor: Arc<dyn SemanticAssessor>,
    policy: FusionPolicy,
}

impl ThreatPipeline {
    pub fn new(bank: DetectorBank, assessor: Arc<dyn SemanticAssessor>, policy: FusionPolicy) -> Self {
        Self {
            bank,
            assessor,
            policy,
        }
    }

    pub fn policy(&self) -> &FusionPolicy {
        &self.policy
    }

    /// Analyze one post. Never fails: detector failures degrade to zero
    /// signals and an unavailable assessor leaves the verdict detector-only.
    pub async fn analyze(&self, post: &Post) -> ThreatVerdict {
        let signals = self.bank.analyze(post).await;

        let assessment = match self.assessor.assess(post, &signals).await {
            Ok(a) => Some(a),
            Err(AssessorError::Disabled) => {
                debug!("semantic assessor disabled, scoring on detectors alone");
                None
            }
            Err(e) => {
                warn!(error = %e, author = %post.author, "semantic assessment unavailable");
                None
            }
        };

        let verdict = self.policy.classify(&signals, assessment.as_ref());
        debug!(
            platform = %post.platform,
            author = %post.author,
            score = verdict.score,
            level = %verdict.level,
            "post classified"
        );
        verdict
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assess::DisabledAssessor;
    use crate::source::{AuthorMetadata, Platform, Post};
    use crate::analysis::ThreatLevel;
    use chrono::Utc;

    fn pipeline() -> ThreatPipeline {
        ThreatPipeline::new(
            DetectorBank::standard(Vec::<String>::new()),
            Arc::new(DisabledAssessor),
            FusionPolicy::default(),
        )
    }

    fn threatening_post() -> Post {
        Post {
            platform: Platform::Twitter,
            author: "angry_user_789".into(),
            content: "They deserve to be hurt. Someone should teach them a lesson.".into(),
            url: "https://twitter.com/angry_user_789/status/1".into(),
            posted_at: Utc::now(),
            author_metadata: Some(AuthorMetadata {
                account_age_days: 3,
                follower_count: 1,
                verified: false,
            }),
            image_ref: None,
        }
    }

    #[tokio::test]
    async fn test_threatening_post_crosses_alert_threshold() {
        let p = pipeline();
        let verdict = p.analyze(&threatening_post()).await;
        assert!(verdict.score >= p.policy().alert_threshold);
        assert!(verdict.level >= ThreatLevel::Medium);
        assert!(verdict.ai_analysis.is_empty());
    }

    #[tokio::test]
    async fn test_benign_post_stays_below_threshold() {
        let p = pipeline();
        let post = Post {
            platform: Platform::Instagram,
            author: "movie_lover_42".into(),
            content: "What a wonderful performance, congratulations!".into(),
            url: String::new(),
            posted_at: Utc::now(),
            author_metadata: Some(AuthorMetadata {
                account_age_days: 1500,
                follower_count: 2300,
                verified: false,
            }),
            image_ref: None,
        };
        let verdict = p.analyze(&post).await;
        assert!(verdict.score < p.policy().alert_threshold);
        assert_eq!(verdict.level, ThreatLevel::Low);
    }

    #[tokio::test]
    async fn test_detector_only_verdict_is_deterministic() {
        // With the assessor unavailable, repeated analysis of the same post
        // must produce the identical verdict.
        let p = pipeline();
        let post = threatening_post();
        let first = p.analyze(&post).await;
        let second = p.analyze(&post).await;
        assert_eq!(first.score, second.score);
        assert_eq!(first.level, second.level);
        assert_eq!(first.reason, second.reason);
    }
}
