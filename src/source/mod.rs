//! Post sources -- per-platform feeds of candidate posts.
//!
//! A [`PostSource`] produces raw post records for a platform. The observed
//! deployment runs against [`mock::MockFeed`]; a live feed client implements
//! the same trait.

pub mod mock;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Platforms the monitor can scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    Twitter,
    Facebook,
    Instagram,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Twitter, Platform::Facebook, Platform::Instagram];
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Twitter => write!(f, "Twitter"),
            Platform::Facebook => write!(f, "Facebook"),
            Platform::Instagram => write!(f, "Instagram"),
        }
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "twitter" | "x" => Ok(Platform::Twitter),
            "facebook" => Ok(Platform::Facebook),
            "instagram" => Ok(Platform::Instagram),
            other => Err(format!("unknown platform '{}'", other)),
        }
    }
}

/// Account details attached to a post, when the feed exposes them.
/// Consumed by the fake-account detector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorMetadata {
    pub account_age_days: u32,
    pub follower_count: u64,
    pub verified: bool,
}

/// A raw social-media post referencing the VIP. Immutable once read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub platform: Platform,
    pub author: String,
    pub content: String,
    pub url: String,
    pub posted_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_metadata: Option<AuthorMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("feed unavailable for {platform}: {reason}")]
    Unavailable { platform: Platform, reason: String },
}

/// A per-platform feed of candidate posts.
///
/// Fetch failures are isolated per platform by the scan cycle; an error here
/// never aborts the other platforms.
#[async_trait::async_trait]
pub trait PostSource: Send + Sync {
    /// Pull up to `limit` new posts for `platform`.
    async fn fetch_batch(&self, platform: Platform, limit: usize)
        -> Result<Vec<Post>, SourceError>;
}
