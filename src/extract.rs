use tracing::{debug, info};

use crate::data::{DataStore, Row};
use crate::error::DataError;
use crate::model::{Fact, FieldValue, Message};

/// Turns dataset rows into candidate messages. Facts about the queried
/// location form the core pool; facts about every other location form the
/// expanded pool, available as supporting material.
#[derive(Debug, Clone)]
pub struct MessageExtractor {
    reference_year: i32,
}

impl MessageExtractor {
    pub fn new(reference_year: i32) -> Self {
        Self { reference_year }
    }

    /// Extract `(core, expanded)` message pools for a location query. The
    /// special location `"all"` puts every row in the core pool.
    pub fn extract(
        &self,
        store: &dyn DataStore,
        location: &str,
    ) -> Result<(Vec<Message>, Vec<Message>), DataError> {
        let (core_rows, expanded_rows) = if location == "all" {
            (store.all(), Vec::new())
        } else {
            let location_owned = location.to_string();
            let core = store.query(&|row: &Row| row.location == location_owned);
            let expanded = store.query(&|row: &Row| row.location != location_owned);
            (core, expanded)
        };

        let mut core_messages = Vec::new();
        for row in &core_rows {
            self.messages_from_row(row, &mut core_messages);
        }
        let mut expanded_messages = Vec::new();
        for row in &expanded_rows {
            self.messages_from_row(row, &mut expanded_messages);
        }

        info!(
            "Extracted {} core and {} expanded messages for location '{}'",
            core_messages.len(),
            expanded_messages.len(),
            location
        );

        if core_messages.is_empty() {
            return Err(DataError::NoCandidateMessages {
                location: location.to_string(),
            });
        }

        Ok((core_messages, expanded_messages))
    }

    fn messages_from_row(&self, row: &Row, messages: &mut Vec<Message>) {
        if self.is_stale(row) {
            debug!(
                "Skipping stale row {} {}",
                row.location, row.timestamp
            );
            return;
        }

        for (column, value) in &row.values {
            if column.contains(":outlierness") {
                continue;
            }
            if value.is_nan() {
                continue;
            }

            let outlierness = row
                .values
                .get(&format!("{}:outlierness", column))
                .or_else(|| {
                    row.values
                        .get(&format!("{}:grouped_by_time:outlierness", column))
                })
                .copied()
                .unwrap_or(1.0);

            let fact = Fact {
                location: format!("[ENTITY:{}:{}]", row.location_type, row.location),
                location_type: row.location_type.clone(),
                value: FieldValue::Num(*value),
                value_type: column.clone(),
                agent: row.agent.clone(),
                agent_type: row.agent_type.clone(),
                timestamp: row.timestamp.clone(),
                timestamp_type: row.timestamp_type.clone(),
                outlierness,
            };
            messages.push(Message::new(fact));
        }
    }

    /// Monthly data older than last year and yearly data older than three
    /// years is not news.
    fn is_stale(&self, row: &Row) -> bool {
        match row.timestamp_type.as_str() {
            "month" => match row.timestamp.split('M').next().and_then(|y| y.parse::<i32>().ok()) {
                Some(year) => year < self.reference_year - 1,
                None => false,
            },
            "year" => match row.timestamp.parse::<i32>() {
                Ok(year) => year < self.reference_year - 3,
                Err(_) => false,
            },
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::InMemoryStore;
    use std::collections::BTreeMap;

    fn row(location: &str, timestamp: &str, timestamp_type: &str, values: &[(&str, f64)]) -> Row {
        Row {
            location: location.to_string(),
            location_type: "C".to_string(),
            timestamp: timestamp.to_string(),
            timestamp_type: timestamp_type.to_string(),
            agent: String::new(),
            agent_type: String::new(),
            values: values
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn test_core_and_expanded_split() {
        let store = InMemoryStore::new(vec![
            row("FI", "2020", "year", &[("cphi:hicp2015:cp-hi00", 102.3)]),
            row("SE", "2020", "year", &[("cphi:hicp2015:cp-hi00", 104.1)]),
        ]);
        let extractor = MessageExtractor::new(2020);
        let (core, expanded) = extractor.extract(&store, "FI").unwrap();
        assert_eq!(core.len(), 1);
        assert_eq!(expanded.len(), 1);
        assert_eq!(core[0].main_fact().location, "[ENTITY:C:FI]");
    }

    #[test]
    fn test_all_locations_go_to_core() {
        let store = InMemoryStore::new(vec![
            row("FI", "2020", "year", &[("a:b", 1.0)]),
            row("SE", "2020", "year", &[("a:b", 2.0)]),
        ]);
        let extractor = MessageExtractor::new(2020);
        let (core, expanded) = extractor.extract(&store, "all").unwrap();
        assert_eq!(core.len(), 2);
        assert!(expanded.is_empty());
    }

    #[test]
    fn test_outlierness_sidecar_is_attached_not_extracted() {
        let store = InMemoryStore::new(vec![row(
            "FI",
            "2020",
            "year",
            &[("a:b", 1.0), ("a:b:outlierness", 3.5)],
        )]);
        let extractor = MessageExtractor::new(2020);
        let (core, _) = extractor.extract(&store, "FI").unwrap();
        assert_eq!(core.len(), 1);
        assert_eq!(core[0].main_fact().outlierness, 3.5);
    }

    #[test]
    fn test_grouped_by_time_fallback() {
        let store = InMemoryStore::new(vec![row(
            "FI",
            "2020",
            "year",
            &[("a:b", 1.0), ("a:b:grouped_by_time:outlierness", 2.5)],
        )]);
        let extractor = MessageExtractor::new(2020);
        let (core, _) = extractor.extract(&store, "FI").unwrap();
        assert_eq!(core[0].main_fact().outlierness, 2.5);
    }

    #[test]
    fn test_stale_rows_skipped() {
        let store = InMemoryStore::new(vec![
            row("FI", "2015", "year", &[("a:b", 1.0)]),
            row("FI", "2018M05", "month", &[("a:b", 1.0)]),
            row("FI", "2020", "year", &[("a:b", 2.0)]),
        ]);
        let extractor = MessageExtractor::new(2020);
        let (core, _) = extractor.extract(&store, "FI").unwrap();
        assert_eq!(core.len(), 1);
        assert_eq!(core[0].main_fact().timestamp, "2020");
    }

    #[test]
    fn test_no_candidates_is_an_error() {
        let store = InMemoryStore::new(vec![]);
        let extractor = MessageExtractor::new(2020);
        assert!(matches!(
            extractor.extract(&store, "FI"),
            Err(DataError::NoCandidateMessages { .. })
        ));
    }
}
