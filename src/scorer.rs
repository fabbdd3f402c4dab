use std::cmp::Ordering;

use chrono::Datelike;
use tracing::debug;

use crate::model::Message;

/// Value-type fragments that mark a fact as uninteresting for a general
/// news article. Mostly fine-grained age buckets.
const ZEROED_FRAGMENTS: &[&str] = &[
    "y-lt6", "y6-10", "y6-11", "y11-15", "y12-17", "y-lt16", "y16-24", "y16-64", "y-ge16",
    "y-lt18",
];

/// Assigns a newsworthiness score to each message. Pure function of the
/// value type, timestamp, outlierness and importance coefficient; the only
/// ambient input is the reference year for recency decay.
#[derive(Debug, Clone)]
pub struct ImportanceScorer {
    reference_year: i32,
}

impl ImportanceScorer {
    pub fn new() -> Self {
        Self {
            reference_year: chrono::Utc::now().year(),
        }
    }

    pub fn with_reference_year(reference_year: i32) -> Self {
        Self { reference_year }
    }

    pub fn reference_year(&self) -> i32 {
        self.reference_year
    }

    /// Score all messages in place and sort them into descending score
    /// order. Ties keep their extraction order.
    pub fn score(&self, messages: &mut Vec<Message>) {
        for message in messages.iter_mut() {
            message.score = self.score_single(message);
            debug!(
                "Scored {} {} at {}",
                message.main_fact().value_type,
                message.main_fact().timestamp,
                message.score
            );
        }
        messages.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    }

    pub fn score_single(&self, message: &Message) -> f64 {
        let fact = message.main_fact();
        let value_type = fact.value_type.as_str();

        let mut outlier_score = if fact.outlierness == 0.0 {
            1.0
        } else {
            fact.outlierness
        };
        if outlier_score.is_nan() {
            outlier_score = 0.0;
        }

        let mut value_type_score = 1.0;
        if value_type.contains("_trend") {
            value_type_score *= 500.0;
        }

        // National currencies are not comparable across countries.
        if value_type.contains("_nac") {
            return 0.0;
        } else if value_type.contains("_pps") {
            value_type_score *= 10.0;
        } else if value_type.contains("_eur") {
            value_type_score *= 40.0;
        }

        if ZEROED_FRAGMENTS.iter().any(|f| value_type.contains(f)) {
            return 0.0;
        }

        if value_type.contains("_t_") {
            return 0.0;
        }

        let what_score = value_type_score * outlier_score;
        let timestamp_score = 20.0 * self.recency_weight(fact.timestamp_type.as_str(), &fact.timestamp);

        let mut score = what_score * timestamp_score;

        if value_type.contains("_rank") {
            if let Some(rank) = fact.value.as_f64() {
                score *= 0.7_f64.powf(rank - 1.0);
            }
        }

        if value_type.contains("_reverse") {
            if value_type.contains("_change") {
                score *= 0.7;
            } else {
                score *= 0.25;
            }
        }

        score * message.importance_coefficient
    }

    /// Inverse-square decay on calendar distance. Month-granularity facts
    /// interpolate between the decay bands of their year and the previous
    /// year on a 13-month scale, which leaves the bare year slightly more
    /// salient than its December.
    fn recency_weight(&self, timestamp_type: &str, timestamp: &str) -> f64 {
        match timestamp_type {
            "year" => match timestamp.parse::<i32>() {
                Ok(year) => 2.0 * self.year_decay(year),
                Err(_) => 1.0,
            },
            "month" => {
                let mut parts = timestamp.split('M');
                let year = parts.next().and_then(|y| y.parse::<i32>().ok());
                let month = parts.next().and_then(|m| m.parse::<i32>().ok());
                match (year, month) {
                    (Some(year), Some(month)) => {
                        let this_year = self.year_decay(year);
                        let prev_year = self.year_decay(year - 1);
                        let delta_per_month = (this_year - prev_year) / 13.0;
                        this_year - delta_per_month * (13 - month) as f64
                    }
                    _ => 1.0,
                }
            }
            _ => 1.0,
        }
    }

    fn year_decay(&self, year: i32) -> f64 {
        let distance = (self.reference_year + 1 - year) as f64;
        (1.0 / (distance * distance)).min(1.0)
    }
}

impl Default for ImportanceScorer {
    fn default() -> Self {
        Self::new()
    }
}
