//! HTTP-backed semantic assessor.
//!
//! One POST per post under a bounded timeout. The request carries the post
//! content plus a compact summary of detector findings; the response is a
//! `{severity, narrative, confidence}` document. Nothing is retained
//! between calls.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{AssessorError, SemanticAssessment, SemanticAssessor};
use crate::detect::DetectorSignal;
use crate::source::Post;

#[derive(Debug, Serialize)]
struct AssessRequest<'a> {
    content: &'a str,
    author: &'a str,
    platform: String,
    signals: Vec<SignalSummary<'a>>,
}

#[derive(Debug, Serialize)]
struct SignalSummary<'a> {
    kind: String,
    score: f64,
    evidence: &'a str,
}

#[derive(Debug, Deserialize)]
struct AssessResponse {
    severity: f64,
    #[serde(default)]
    narrative: String,
    confidence: f64,
}

pub struct RemoteAssessor {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    timeout_secs: u64,
}

impl RemoteAssessor {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        timeout_secs: u64,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key,
            timeout_secs,
        })
    }
}

#[async_trait::async_trait]
impl SemanticAssessor for RemoteAssessor {
    async fn assess(
        &self,
        post: &Post,
        signals: &[DetectorSignal],
    ) -> Result<SemanticAssessment, AssessorError> {
        let body = AssessRequest {
            content: &post.content,
            author: &post.author,
            platform: post.platform.to_string(),
            signals: signals
                .iter()
                .map(|s| SignalSummary {
                    kind: s.kind.to_string(),
                    score: s.score,
                    evidence: &s.evidence,
                })
                .collect(),
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        // The reqwest client already carries a timeout; the outer guard
        // bounds connect stalls and slow bodies with one deadline.
        let outcome = tokio::time::timeout(
            Duration::from_secs(self.timeout_secs),
            request.send(),
        )
        .await;

        let response = match outcome {
            Err(_) => return Err(AssessorError::Timeout(self.timeout_secs)),
            Ok(Err(e)) if e.is_timeout() => {
                return Err(AssessorError::Timeout(self.timeout_secs))
            }
            Ok(Err(e)) => return Err(AssessorError::Provider(e.to_string())),
            Ok(Ok(r)) => r,
        };

        if !response.status().is_success() {
            return Err(AssessorError::Provider(format!(
                "endpoint returned {}",
                response.status()
            )));
        }

        let parsed: AssessResponse = response
            .json()
            .await
            .map_err(|e| AssessorError::Provider(format!("bad response body: {}", e)))?;

        debug!(
            severity = parsed.severity,
            confidence = parsed.confidence,
            "semantic assessment received"
        );

        Ok(SemanticAssessment {
            severity: parsed.severity.clamp(0.0, 1.0),
            narrative: parsed.narrative,
            confidence: parsed.confidence.clamp(0.0, 1.0),
        })
    }
}
