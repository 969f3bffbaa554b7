//! SQLite storage layer -- pool setup, migrations, and the alert store.

pub mod schema;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use r2d2::Pool as R2D2Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::{ThreatLevel, ThreatVerdict};
use crate::source::{Platform, Post};

/// Connection Pool type
pub type Pool = R2D2Pool<SqliteConnectionManager>;

/// Open (or create) the SQLite database and return a connection pool.
pub fn open_pool(path: &str) -> Result<Pool> {
    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create data directory {}", parent.display()))?;
        }
    }

    let manager = SqliteConnectionManager::file(path).with_init(|c| {
        c.execute_batch(
            "PRAGMA journal_mode = WAL;
                 PRAGMA synchronous = NORMAL;
                 PRAGMA temp_store = MEMORY;
                 PRAGMA foreign_keys = ON;
                 PRAGMA busy_timeout = 5000;",
        )
    });

    let pool = R2D2Pool::new(manager)?;

    // Run migrations on a single connection
    let conn = pool.get()?;
    schema::migrate(&conn)?;

    Ok(pool)
}

/// A persisted threat alert. Created only for verdicts that met the alert
/// threshold (the force-persist test endpoint excepted); `timestamp` is
/// detection time, not post time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: Uuid,
    pub platform: Platform,
    pub author: String,
    pub content: String,
    pub url: String,
    pub timestamp: DateTime<Utc>,
    pub score: f64,
    pub threat_level: ThreatLevel,
    pub reason: String,
    pub ai_analysis: String,
}

impl Alert {
    /// Build the alert record for a finalized verdict.
    pub fn from_verdict(post: &Post, verdict: &ThreatVerdict) -> Self {
        Self {
            id: Uuid::new_v4(),
            platform: post.platform,
            author: post.author.clone(),
            content: post.content.clone(),
            url: post.url.clone(),
            timestamp: Utc::now(),
            score: verdict.score,
            threat_level: verdict.level,
            reason: verdict.reason.clone(),
            ai_analysis: verdict.ai_analysis.clone(),
        }
    }
}

/// Append-mostly store of emitted alerts, queryable by recency.
#[derive(Clone)]
pub struct AlertStore {
    pool: Pool,
}

impl AlertStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    pub fn insert(&self, alert: &Alert) -> Result<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO alerts (id, platform, author, content, url, timestamp,
                                 score, threat_level, reason, ai_analysis)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                alert.id.to_string(),
                alert.platform.to_string(),
                alert.author,
                alert.content,
                alert.url,
                alert.timestamp.to_rfc3339(),
                alert.score,
                alert.threat_level.as_str(),
                alert.reason,
                alert.ai_analysis,
            ],
        )
        .context("failed to insert alert")?;
        Ok(())
    }

    /// All alerts, newest first.
    pub fn list(&self, limit: usize) -> Result<Vec<Alert>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, platform, author, content, url, timestamp,
                    score, threat_level, reason, ai_analysis
             FROM alerts ORDER BY timestamp DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map([limit], row_to_alert)?;

        let mut alerts = Vec::new();
        for r in rows {
            alerts.push(r?);
        }
        Ok(alerts)
    }

    /// Alerts detected within the last `hours` hours, newest first.
    pub fn list_recent(&self, hours: i64, limit: usize) -> Result<Vec<Alert>> {
        let cutoff = (Utc::now() - Duration::hours(hours)).to_rfc3339();
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, platform, author, content, url, timestamp,
                    score, threat_level, reason, ai_analysis
             FROM alerts WHERE timestamp >= ?1 ORDER BY timestamp DESC LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![cutoff, limit], row_to_alert)?;

        let mut alerts = Vec::new();
        for r in rows {
            alerts.push(r?);
        }
        Ok(alerts)
    }

    /// Remove every alert. Returns how many were deleted.
    pub fn clear(&self) -> Result<usize> {
        let conn = self.pool.get()?;
        let removed = conn.execute("DELETE FROM alerts", [])?;
        Ok(removed)
    }

    pub fn count(&self) -> Result<u64> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM alerts", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

fn row_to_alert(row: &rusqlite::Row<'_>) -> rusqlite::Result<Alert> {
    let id_str: String = row.get(0)?;
    let platform_str: String = row.get(1)?;
    let timestamp_str: String = row.get(5)?;
    let level_str: String = row.get(7)?;

    Ok(Alert {
        id: Uuid::parse_str(&id_str).unwrap_or_default(),
        platform: platform_str.parse().unwrap_or(Platform::Twitter),
        author: row.get(2)?,
        content: row.get(3)?,
        url: row.get(4)?,
        timestamp: DateTime::parse_from_rfc3339(&timestamp_str)
            .unwrap_or_default()
            .with_timezone(&Utc),
        score: row.get(6)?,
        threat_level: level_str.parse().unwrap_or(ThreatLevel::Low),
        reason: row.get(8)?,
        ai_analysis: row.get(9)?,
    })
}
