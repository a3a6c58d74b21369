//! Policy rates from the scraped central bank table.

use crate::domain::{PolicyRates, PolicyRow};
use thiserror::Error;

pub const REPO_RATE_ROW: &str = "Policy Repo Rate";
pub const REVERSE_REPO_RATE_ROW: &str = "Fixed Reverse Repo Rate";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeatureError {
    #[error("no policy row containing '{0}'")]
    MissingPolicy(String),
}

/// First run of digits and dots in the cell, as a number. `NaN` when there is
/// no such run or it does not parse (a lone `.`).
pub fn extract_rate(cell: &str) -> f64 {
    let run: String = cell
        .chars()
        .skip_while(|c| !(c.is_ascii_digit() || *c == '.'))
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    run.parse::<f64>().unwrap_or(f64::NAN)
}

fn find_rate(rows: &[PolicyRow], pattern: &str) -> Result<f64, FeatureError> {
    let needle = pattern.to_lowercase();
    rows.iter()
        .find(|r| r.policy.to_lowercase().contains(&needle))
        .map(|r| extract_rate(&r.rate))
        .ok_or_else(|| FeatureError::MissingPolicy(pattern.to_string()))
}

/// Repo and reverse repo rates from the first matching rows (case-insensitive).
pub fn policy_rates(rows: &[PolicyRow]) -> Result<PolicyRates, FeatureError> {
    Ok(PolicyRates {
        repo_rate: find_rate(rows, REPO_RATE_ROW)?,
        reverse_repo_rate: find_rate(rows, REVERSE_REPO_RATE_ROW)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(policy: &str, rate: &str) -> PolicyRow {
        PolicyRow {
            policy: policy.into(),
            rate: rate.into(),
        }
    }

    #[test]
    fn extracts_first_numeric_run() {
        assert_eq!(extract_rate(": 6.50%"), 6.5);
        assert_eq!(extract_rate("3.35 % (w.e.f. 2022)"), 3.35);
        assert!(extract_rate("n/a").is_nan());
        assert!(extract_rate("").is_nan());
    }

    #[test]
    fn finds_rows_case_insensitively() {
        let rows = vec![
            row("0", "1"),
            row("POLICY REPO RATE", ": 6.50%"),
            row("Standing Deposit Facility Rate", ": 6.25%"),
            row("Fixed Reverse Repo Rate", ": 3.35%"),
        ];
        let rates = policy_rates(&rows).unwrap();
        assert_eq!(rates.repo_rate, 6.5);
        assert_eq!(rates.reverse_repo_rate, 3.35);
    }

    #[test]
    fn missing_row_is_an_error() {
        let rows = vec![row("Policy Repo Rate", "6.50%")];
        assert_eq!(
            policy_rates(&rows).unwrap_err(),
            FeatureError::MissingPolicy(REVERSE_REPO_RATE_ROW.into())
        );
    }
}
