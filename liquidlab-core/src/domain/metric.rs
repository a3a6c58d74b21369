use serde::{Deserialize, Serialize};

/// A single observation of an indicator. `key` is a date or a month label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricPoint {
    pub key: String,
    pub value: f64,
}

/// Ordered observations of one named indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSeries {
    pub name: String,
    pub points: Vec<MetricPoint>,
}

impl MetricSeries {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            points: Vec::new(),
        }
    }

    pub fn from_values<K: ToString>(
        name: impl Into<String>,
        keys: impl IntoIterator<Item = K>,
        values: impl IntoIterator<Item = f64>,
    ) -> Self {
        let points = keys
            .into_iter()
            .zip(values)
            .map(|(key, value)| MetricPoint {
                key: key.to_string(),
                value,
            })
            .collect();
        Self {
            name: name.into(),
            points,
        }
    }

    pub fn push(&mut self, key: impl Into<String>, value: f64) {
        self.points.push(MetricPoint {
            key: key.into(),
            value,
        });
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn keys(&self) -> Vec<String> {
        self.points.iter().map(|p| p.key.clone()).collect()
    }

    /// Most recent observation, if any.
    pub fn latest(&self) -> Option<f64> {
        self.points.last().map(|p| p.value)
    }

    /// Same keys, values replaced positionally.
    pub fn with_values(&self, values: &[f64]) -> Self {
        Self::from_values(self.name.clone(), self.keys(), values.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_is_last_point() {
        let s = MetricSeries::from_values("vol", ["a", "b", "c"], [1.0, 2.0, 3.0]);
        assert_eq!(s.latest(), Some(3.0));
        assert_eq!(s.len(), 3);
    }

    #[test]
    fn empty_series_has_no_latest() {
        assert_eq!(MetricSeries::new("vol").latest(), None);
    }

    #[test]
    fn with_values_keeps_keys() {
        let s = MetricSeries::from_values("vol", ["a", "b"], [1.0, 2.0]);
        let t = s.with_values(&[0.0, 1.0]);
        assert_eq!(t.keys(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(t.values(), vec![0.0, 1.0]);
        assert_eq!(t.name, "vol");
    }
}
