use serde::{Deserialize, Serialize};

/// Net institutional transactions for one month, in INR crore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstitutionalFlow {
    pub month: String,
    pub fii_net: f64,
    pub dii_net: f64,
}

/// One row of the scraped policy-rate table, as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyRow {
    pub policy: String,
    pub rate: String,
}
