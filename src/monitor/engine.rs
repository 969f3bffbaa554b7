//! The periodic scan loop.
//!
//! One cycle: for each monitored platform, pull a batch from the post
//! source, analyze every post through the pipeline (posts within a batch
//! run concurrently), persist qualifying alerts in verdict-finalization
//! order, then stamp `last_check`. Cycles never overlap -- the next tick
//! waits for the previous cycle, including its assessor calls, to finish.

use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use super::Inner;
use crate::storage::Alert;

pub(crate) async fn run_scan_loop(inner: Arc<Inner>) {
    info!("scan loop started");

    let mut ticker = tokio::time::interval(inner.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        // stop() flips the flag; the check here makes cancellation take
        // effect between cycles, never inside one.
        if !inner.is_running() {
            break;
        }

        run_scan_cycle(&inner).await;
        inner.mark_checked(Utc::now());
    }

    info!("scan loop stopped");
}

/// One pass over all monitored platforms. Per-platform failures are
/// isolated: a dead feed is logged and the cycle continues.
async fn run_scan_cycle(inner: &Inner) {
    for platform in inner.platforms() {
        let posts = match inner.source.fetch_batch(platform, inner.batch_size).await {
            Ok(posts) => posts,
            Err(e) => {
                warn!(platform = %platform, error = %e, "post source unavailable, skipping platform");
                continue;
            }
        };

        if posts.is_empty() {
            continue;
        }
        debug!(platform = %platform, count = posts.len(), "analyzing batch");

        // Detector evaluation is pure per post, so the whole batch can run
        // concurrently; join_all preserves input order for persistence.
        let verdicts = join_all(posts.iter().map(|p| inner.pipeline.analyze(p))).await;

        for (post, verdict) in posts.iter().zip(verdicts) {
            if verdict.score < inner.pipeline.policy().alert_threshold {
                continue;
            }

            let alert = Alert::from_verdict(post, &verdict);
            info!(
                platform = %platform,
                author = %post.author,
                level = %verdict.level,
                score = verdict.score,
                "threat alert"
            );
            if let Err(e) = inner.record_alert(&alert) {
                // The verdict is lost for this post; the rest of the batch
                // still gets persisted.
                error!(platform = %platform, author = %post.author, error = %e, "failed to persist alert");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{FusionPolicy, ThreatPipeline};
    use crate::assess::DisabledAssessor;
    use crate::detect::DetectorBank;
    use crate::monitor::{MonitorController, MonitoringState};
    use crate::source::{AuthorMetadata, Platform, Post, PostSource, SourceError};
    use crate::storage::{open_pool, AlertStore};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Source that serves one threatening post per platform, once.
    struct OneShotSource {
        served: Mutex<Vec<Platform>>,
    }

    #[async_trait::async_trait]
    impl PostSource for OneShotSource {
        async fn fetch_batch(
            &self,
            platform: Platform,
            _limit: usize,
        ) -> Result<Vec<Post>, SourceError> {
            let mut served = self.served.lock().unwrap();
            if served.contains(&platform) {
                return Ok(Vec::new());
            }
            served.push(platform);

            if platform == Platform::Facebook {
                // Exercise per-platform failure isolation.
                return Err(SourceError::Unavailable {
                    platform,
                    reason: "rate limited".into(),
                });
            }

            Ok(vec![Post {
                platform,
                author: "violent_user".into(),
                content: "They should die. I'll make sure of it.".into(),
                url: format!("https://example.com/{}/1", platform),
                posted_at: Utc::now(),
                author_metadata: Some(AuthorMetadata {
                    account_age_days: 2,
                    follower_count: 0,
                    verified: false,
                }),
                image_ref: None,
            }])
        }
    }

    async fn wait_for<F: Fn(&MonitoringState) -> bool>(
        ctrl: &MonitorController,
        pred: F,
    ) -> MonitoringState {
        for _ in 0..200 {
            let status = ctrl.status();
            if pred(&status) {
                return status;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("condition not reached; status = {:?}", ctrl.status());
    }

    #[tokio::test]
    async fn test_cycle_persists_alerts_and_isolates_failures() {
        let dir = tempfile::TempDir::new().unwrap();
        let pool = open_pool(dir.path().join("t.db").to_str().unwrap()).unwrap();
        let store = AlertStore::new(pool);
        let pipeline = Arc::new(ThreatPipeline::new(
            DetectorBank::standard(Vec::<String>::new()),
            Arc::new(DisabledAssessor),
            FusionPolicy::default(),
        ));
        let ctrl = MonitorController::new(
            store.clone(),
            pipeline,
            Arc::new(OneShotSource {
                served: Mutex::new(Vec::new()),
            }),
            Platform::ALL.to_vec(),
            Duration::from_millis(50),
            10,
        )
        .unwrap();

        ctrl.start();
        // Twitter and Instagram each serve one threatening post; Facebook
        // errors. The cycle must complete and count exactly two alerts.
        let status = wait_for(&ctrl, |s| s.alerts_count >= 2 && s.last_check.is_some()).await;
        ctrl.stop();

        assert_eq!(status.alerts_count, 2);
        assert_eq!(store.count().unwrap(), 2);
        let alerts = store.list(100).unwrap();
        assert!(alerts.iter().all(|a| a.platform != Platform::Facebook));
    }

    #[tokio::test]
    async fn test_last_check_advances_even_without_alerts() {
        struct Silent;
        #[async_trait::async_trait]
        impl PostSource for Silent {
            async fn fetch_batch(
                &self,
                _platform: Platform,
                _limit: usize,
            ) -> Result<Vec<Post>, SourceError> {
                Ok(Vec::new())
            }
        }

        let dir = tempfile::TempDir::new().unwrap();
        let pool = open_pool(dir.path().join("t.db").to_str().unwrap()).unwrap();
        let pipeline = Arc::new(ThreatPipeline::new(
            DetectorBank::standard(Vec::<String>::new()),
            Arc::new(DisabledAssessor),
            FusionPolicy::default(),
        ));
        let ctrl = MonitorController::new(
            AlertStore::new(pool),
            pipeline,
            Arc::new(Silent),
            vec![Platform::Twitter],
            Duration::from_millis(20),
            10,
        )
        .unwrap();

        ctrl.start();
        let status = wait_for(&ctrl, |s| s.last_check.is_some()).await;
        ctrl.stop();

        assert_eq!(status.alerts_count, 0);
    }
}
