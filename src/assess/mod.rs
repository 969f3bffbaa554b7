//! Semantic assessor -- the higher-latency, context-aware second opinion.
//!
//! Wraps one external reasoning call per post. The assessor is an
//! enrichment, never a hard dependency: on timeout or provider failure the
//! pipeline proceeds on detector signals alone, and no retry happens until
//! the next scan cycle naturally revisits the feed.

pub mod remote;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::detect::DetectorSignal;
use crate::source::Post;

pub use remote::RemoteAssessor;

/// A qualitative severity estimate with its own confidence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticAssessment {
    pub severity: f64,
    pub narrative: String,
    pub confidence: f64,
}

#[derive(Debug, Error)]
pub enum AssessorError {
    #[error("assessor call timed out after {0}s")]
    Timeout(u64),
    #[error("assessor provider error: {0}")]
    Provider(String),
    #[error("no assessor configured")]
    Disabled,
}

/// Capability-typed reasoning backend. Any provider honoring the contract
/// substitutes without touching classification logic.
#[async_trait::async_trait]
pub trait SemanticAssessor: Send + Sync {
    async fn assess(
        &self,
        post: &Post,
        signals: &[DetectorSignal],
    ) -> Result<SemanticAssessment, AssessorError>;
}

/// Assessor used when no endpoint is configured: always unavailable,
/// keeping verdicts deterministic and detector-only.
pub struct DisabledAssessor;

#[async_trait::async_trait]
impl SemanticAssessor for DisabledAssessor {
    async fn assess(
        &self,
        _post: &Post,
        _signals: &[DetectorSignal],
    ) -> Result<SemanticAssessment, AssessorError> {
        Err(AssessorError::Disabled)
    }
}
