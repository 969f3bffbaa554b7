//! Fusion and classification -- detector signals plus the optional semantic
//! assessment become one continuous score and a discrete threat level.

pub mod fusion;
pub mod pipeline;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use fusion::FusionPolicy;
pub use pipeline::ThreatPipeline;

/// Discrete threat classification, monotonic in the fused score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreatLevel {
    Low,
    Medium,
    High,
    Critical,
}

/// Fixed level cut-points. Total over [0,1]: every score maps to exactly
/// one level.
const MEDIUM_FLOOR: f64 = 0.35;
const HIGH_FLOOR: f64 = 0.6;
const CRITICAL_FLOOR: f64 = 0.85;

impl ThreatLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= CRITICAL_FLOOR {
            ThreatLevel::Critical
        } else if score >= HIGH_FLOOR {
            ThreatLevel::High
        } else if score >= MEDIUM_FLOOR {
            ThreatLevel::Medium
        } else {
            ThreatLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ThreatLevel::Low => "low",
            ThreatLevel::Medium => "medium",
            ThreatLevel::High => "high",
            ThreatLevel::Critical => "critical",
        }
    }
}

impl fmt::Display for ThreatLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ThreatLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(ThreatLevel::Low),
            "medium" => Ok(ThreatLevel::Medium),
            "high" => Ok(ThreatLevel::High),
            "critical" => Ok(ThreatLevel::Critical),
            other => Err(format!("unknown threat level '{}'", other)),
        }
    }
}

/// The fused classification of one post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreatVerdict {
    pub score: f64,
    pub level: ThreatLevel,
    pub reason: String,
    pub ai_analysis: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_mapping_is_total_and_monotonic() {
        let mut last = ThreatLevel::Low;
        let mut i = 0;
        while i <= 1000 {
            let score = i as f64 / 1000.0;
            let level = ThreatLevel::from_score(score);
            assert!(level >= last, "level decreased at score {}", score);
            last = level;
            i += 1;
        }
    }

    #[test]
    fn test_level_boundaries() {
        assert_eq!(ThreatLevel::from_score(0.0), ThreatLevel::Low);
        assert_eq!(ThreatLevel::from_score(0.349), ThreatLevel::Low);
        assert_eq!(ThreatLevel::from_score(0.35), ThreatLevel::Medium);
        assert_eq!(ThreatLevel::from_score(0.6), ThreatLevel::High);
        assert_eq!(ThreatLevel::from_score(0.85), ThreatLevel::Critical);
        assert_eq!(ThreatLevel::from_score(1.0), ThreatLevel::Critical);
    }

    #[test]
    fn test_level_string_roundtrip() {
        for level in [
            ThreatLevel::Low,
            ThreatLevel::Medium,
            ThreatLevel::High,
            ThreatLevel::Critical,
        ] {
            let parsed: ThreatLevel = level.as_str().parse().unwrap();
            assert_eq!(parsed, level);
        }
    }
}
