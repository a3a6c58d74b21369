//! Risk tolerance categories and their cash caps.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// How aggressively the liquidity score is converted to a cash allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTolerance {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid risk tolerance '{0}': choose from 'high', 'medium', or 'low'")]
pub struct InvalidRiskTolerance(pub String);

impl RiskTolerance {
    /// All categories, in the order the allocator reports them.
    pub const ALL: [RiskTolerance; 3] = [Self::High, Self::Medium, Self::Low];

    /// Maximum cash percentage for this category (reached at score 0).
    pub fn cap(self) -> f64 {
        match self {
            Self::High => 20.0,
            Self::Medium => 30.0,
            Self::Low => 50.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Capitalized label used in chart titles and log lines.
    pub fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl fmt::Display for RiskTolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskTolerance {
    type Err = InvalidRiskTolerance;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(InvalidRiskTolerance(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_three_categories() {
        assert_eq!("high".parse::<RiskTolerance>().unwrap(), RiskTolerance::High);
        assert_eq!("medium".parse::<RiskTolerance>().unwrap(), RiskTolerance::Medium);
        assert_eq!("low".parse::<RiskTolerance>().unwrap(), RiskTolerance::Low);
    }

    #[test]
    fn rejects_unknown_category() {
        let err = "extreme".parse::<RiskTolerance>().unwrap_err();
        assert_eq!(err, InvalidRiskTolerance("extreme".into()));
        assert!(err.to_string().contains("'high', 'medium', or 'low'"));
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert!("High".parse::<RiskTolerance>().is_err());
    }

    #[test]
    fn caps() {
        assert_eq!(RiskTolerance::High.cap(), 20.0);
        assert_eq!(RiskTolerance::Medium.cap(), 30.0);
        assert_eq!(RiskTolerance::Low.cap(), 50.0);
    }
}
