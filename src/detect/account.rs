//! Fake-account heuristic over author metadata.
//!
//! New, unverified accounts with few followers and throwaway-looking handles
//! score high. Degrades to zero when the feed exposes no metadata -- an
//! absent profile is not evidence of anything.

use super::{Detector, DetectorKind, DetectorSignal};
use crate::source::Post;

/// Handle fragments common to throwaway and bot accounts.
const SUSPICIOUS_HANDLE_PATTERNS: &[&str] =
    &["bot", "fake", "spam", "temp", "random", "anon", "burner"];

const NEW_ACCOUNT_DAYS: u32 = 30;
const YOUNG_ACCOUNT_DAYS: u32 = 180;
const LOW_FOLLOWERS: u64 = 10;
const MODEST_FOLLOWERS: u64 = 100;

pub struct FakeAccountDetector;

impl FakeAccountDetector {
    fn handle_looks_suspicious(author: &str) -> bool {
        let lower = author.to_lowercase();
        if SUSPICIOUS_HANDLE_PATTERNS.iter().any(|p| lower.contains(p)) {
            return true;
        }
        // Trailing digit runs ("user12345") are a bot-farm signature.
        let trailing_digits = lower.chars().rev().take_while(|c| c.is_ascii_digit()).count();
        trailing_digits >= 3
    }
}

#[async_trait::async_trait]
impl Detector for FakeAccountDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::FakeAccount
    }

    async fn analyze(&self, post: &Post) -> DetectorSignal {
        let meta = match &post.author_metadata {
            Some(m) => m,
            None => return DetectorSignal::unavailable(self.kind()),
        };

        let mut score = 0.0;
        let mut factors: Vec<&str> = Vec::new();

        if meta.account_age_days < NEW_ACCOUNT_DAYS {
            score += 0.35;
            factors.push("account created within 30 days");
        } else if meta.account_age_days < YOUNG_ACCOUNT_DAYS {
            score += 0.15;
            factors.push("account younger than 6 months");
        }

        if meta.follower_count < LOW_FOLLOWERS {
            score += 0.3;
            factors.push("fewer than 10 followers");
        } else if meta.follower_count < MODEST_FOLLOWERS {
            score += 0.15;
            factors.push("fewer than 100 followers");
        }

        if !meta.verified {
            score += 0.1;
            factors.push("unverified");
        }

        if Self::handle_looks_suspicious(&post.author) {
            score += 0.25;
            factors.push("suspicious username pattern");
        }

        if factors.is_empty() {
            DetectorSignal::new(self.kind(), 0.0, "account looks established")
        } else {
            DetectorSignal::new(self.kind(), score, factors.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{AuthorMetadata, Platform};
    use chrono::Utc;

    fn post(author: &str, metadata: Option<AuthorMetadata>) -> Post {
        Post {
            platform: Platform::Twitter,
            author: author.into(),
            content: "whatever".into(),
            url: String::new(),
            posted_at: Utc::now(),
            author_metadata: metadata,
            image_ref: None,
        }
    }

    #[tokio::test]
    async fn test_missing_metadata_scores_zero() {
        let d = FakeAccountDetector;
        let signal = d.analyze(&post("bot_user_123", None)).await;
        assert_eq!(signal.score, 0.0);
        assert_eq!(signal.evidence, "unavailable");
    }

    #[tokio::test]
    async fn test_burner_account_scores_high() {
        let d = FakeAccountDetector;
        let meta = AuthorMetadata {
            account_age_days: 4,
            follower_count: 2,
            verified: false,
        };
        let signal = d.analyze(&post("bot_user_123", Some(meta))).await;
        assert!(signal.score >= 0.9, "score was {}", signal.score);
        assert!(signal.evidence.contains("suspicious username"));
    }

    #[tokio::test]
    async fn test_established_verified_account_scores_zero() {
        let d = FakeAccountDetector;
        let meta = AuthorMetadata {
            account_age_days: 2000,
            follower_count: 50_000,
            verified: true,
        };
        let signal = d.analyze(&post("real_journalist", Some(meta))).await;
        assert_eq!(signal.score, 0.0);
    }

    #[test]
    fn test_trailing_digit_run_detection() {
        assert!(FakeAccountDetector::handle_looks_suspicious("user48291"));
        assert!(!FakeAccountDetector::handle_looks_suspicious("agent99"));
    }
}
