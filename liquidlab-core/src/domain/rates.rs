use serde::{Deserialize, Serialize};

/// Central bank policy rates, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolicyRates {
    #[serde(rename = "Repo Rate")]
    pub repo_rate: f64,
    #[serde(rename = "Reverse Repo Rate")]
    pub reverse_repo_rate: f64,
}
