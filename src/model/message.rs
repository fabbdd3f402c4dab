use super::{Fact, Template};

/// Wraps one or more facts together with the values the pipeline computes
/// for them: the newsworthiness score, an externally supplied importance
/// coefficient, the polarity of the described change, and (once the
/// selector has run) the template used to express the facts.
#[derive(Debug, Clone)]
pub struct Message {
    facts: Vec<Fact>,
    pub importance_coefficient: f64,
    pub score: f64,
    pub polarity: f64,
    pub prevent_aggregation: bool,
    pub template: Option<Template>,
}

impl Message {
    pub fn new(fact: Fact) -> Self {
        Self::with_facts(vec![fact])
    }

    /// The first fact is the primary one. Panics on an empty list only in
    /// debug builds; callers always construct from at least one fact.
    pub fn with_facts(facts: Vec<Fact>) -> Self {
        debug_assert!(!facts.is_empty());
        Self {
            facts,
            importance_coefficient: 1.0,
            score: 0.0,
            polarity: 0.0,
            prevent_aggregation: false,
            template: None,
        }
    }

    pub fn main_fact(&self) -> &Fact {
        &self.facts[0]
    }

    pub fn facts(&self) -> &[Fact] {
        &self.facts
    }

    /// Replace the fact list, keeping the first entry as the new primary.
    pub fn set_facts(&mut self, facts: Vec<Fact>) {
        if !facts.is_empty() {
            self.facts = facts;
        }
    }

    /// The colon-delimited topic prefix of the primary fact's value type,
    /// truncated to `segments` segments. Used for thematic grouping.
    pub fn topic(&self, segments: usize) -> String {
        self.main_fact()
            .value_type
            .split(':')
            .take(segments)
            .collect::<Vec<_>>()
            .join(":")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FieldValue;

    fn fact(value_type: &str) -> Fact {
        Fact {
            location: "[ENTITY:C:FI]".to_string(),
            location_type: "C".to_string(),
            value: FieldValue::Num(1.0),
            value_type: value_type.to_string(),
            agent: String::new(),
            agent_type: String::new(),
            timestamp: "2020".to_string(),
            timestamp_type: "year".to_string(),
            outlierness: 1.0,
        }
    }

    #[test]
    fn test_topic_prefix() {
        let m = Message::new(fact("cphi:hicp2015:cp-hi00:rank"));
        assert_eq!(m.topic(3), "cphi:hicp2015:cp-hi00");
        assert_eq!(m.topic(1), "cphi");
    }

    #[test]
    fn test_topic_shorter_than_requested() {
        let m = Message::new(fact("health:cost"));
        assert_eq!(m.topic(3), "health:cost");
    }
}
