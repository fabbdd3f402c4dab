use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// One flattened observation row. `values` holds the statistic columns plus
/// their optional `<col>:outlierness` sidecars.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Row {
    pub location: String,
    pub location_type: String,
    pub timestamp: String,
    pub timestamp_type: String,
    #[serde(default)]
    pub agent: String,
    #[serde(default)]
    pub agent_type: String,
    #[serde(default)]
    pub values: BTreeMap<String, f64>,
}

/// Narrow contract over a pre-loaded dataset. The pipeline only ever needs
/// the whole table or a predicate-filtered subset.
pub trait DataStore: Send + Sync {
    fn all(&self) -> Vec<Row>;

    fn query(&self, predicate: &dyn Fn(&Row) -> bool) -> Vec<Row>;

    /// Distinct locations present in the data, for discovery endpoints.
    fn locations(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for row in self.all() {
            if !seen.contains(&row.location) {
                seen.push(row.location);
            }
        }
        seen
    }
}

/// In-memory dataset, loaded once before the pipeline runs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    rows: Vec<Row>,
}

impl InMemoryStore {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Load rows from a JSON file (an array of row objects).
    pub fn from_json_file(path: &Path) -> Result<Self, DataError> {
        let content = std::fs::read_to_string(path).map_err(|e| DataError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        let rows: Vec<Row> = serde_json::from_str(&content)?;
        Ok(Self { rows })
    }

    /// A small built-in consumer-price-index sample, enough to generate a
    /// demo article without any external data.
    pub fn sample(reference_year: i32) -> Self {
        let year = reference_year.to_string();
        let prev_year = (reference_year - 1).to_string();
        let mut rows = Vec::new();

        let countries = [("FI", 102.3, 1.9), ("SE", 104.1, 0.4), ("DE", 101.7, 1.1)];
        for (country, index, outlierness) in countries {
            let mut values = BTreeMap::new();
            values.insert("cphi:hicp2015:cp-hi00".to_string(), index);
            values.insert("cphi:hicp2015:cp-hi00:outlierness".to_string(), outlierness);
            values.insert("cphi:hicp2015:cp-hi00:rt12".to_string(), index - 100.0);
            values.insert(
                "cphi:hicp2015:cp-hi00:rt12:outlierness".to_string(),
                outlierness * 0.8,
            );
            values.insert("cphi:hicp2015:cp-hi00:comp_eu".to_string(), index - 102.0);
            values.insert(
                "cphi:hicp2015:cp-hi00:comp_eu:outlierness".to_string(),
                outlierness * 0.6,
            );
            rows.push(Row {
                location: country.to_string(),
                location_type: "C".to_string(),
                timestamp: year.clone(),
                timestamp_type: "year".to_string(),
                agent: String::new(),
                agent_type: String::new(),
                values: values.clone(),
            });

            let mut prev_values = values;
            for v in prev_values.values_mut() {
                *v *= 0.97;
            }
            rows.push(Row {
                location: country.to_string(),
                location_type: "C".to_string(),
                timestamp: prev_year.clone(),
                timestamp_type: "year".to_string(),
                agent: String::new(),
                agent_type: String::new(),
                values: prev_values,
            });

            let mut month_values = BTreeMap::new();
            month_values.insert("cphi:hicp2015:cp-hi00".to_string(), index + 0.4);
            month_values.insert(
                "cphi:hicp2015:cp-hi00:outlierness".to_string(),
                outlierness * 1.2,
            );
            rows.push(Row {
                location: country.to_string(),
                location_type: "C".to_string(),
                timestamp: format!("{}M04", year),
                timestamp_type: "month".to_string(),
                agent: String::new(),
                agent_type: String::new(),
                values: month_values,
            });
        }

        Self { rows }
    }
}

impl DataStore for InMemoryStore {
    fn all(&self) -> Vec<Row> {
        self.rows.clone()
    }

    fn query(&self, predicate: &dyn Fn(&Row) -> bool) -> Vec<Row> {
        self.rows
            .iter()
            .filter(|row| predicate(row))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_filters_rows() {
        let store = InMemoryStore::sample(2020);
        let finnish = store.query(&|row| row.location == "FI");
        assert!(!finnish.is_empty());
        assert!(finnish.iter().all(|row| row.location == "FI"));
        assert!(finnish.len() < store.all().len());
    }

    #[test]
    fn test_locations_are_distinct() {
        let store = InMemoryStore::sample(2020);
        let locations = store.locations();
        assert_eq!(locations, vec!["FI", "SE", "DE"]);
    }
}
