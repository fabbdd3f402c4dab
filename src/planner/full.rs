use rand::rngs::StdRng;
use tracing::debug;

use super::strategy::PlannerStrategy;
use crate::config::PlannerConfig;
use crate::model::Message;

/// Number of colon-delimited segments that make up "the topic" of a value
/// type for coverage bookkeeping.
const TOPIC_SEGMENTS: usize = 3;

/// The context-aware planner: prefers nuclei on uncovered topic+location
/// combinations and grows paragraphs by rescoring candidates against both
/// the nucleus and the most recently added satellite.
#[derive(Debug, Clone, Copy)]
pub struct FullStrategy;

impl PlannerStrategy for FullStrategy {
    fn select_next_nucleus(
        &self,
        config: &PlannerConfig,
        available: &[Message],
        selected_nuclei: &[Message],
        _rng: &mut StdRng,
    ) -> Option<(usize, f64)> {
        if selected_nuclei.len() >= config.max_paragraphs {
            debug!("max_paragraphs reached, stopping");
            return None;
        }

        let covered: Vec<(String, String)> = selected_nuclei
            .iter()
            .map(|n| (n.topic(TOPIC_SEGMENTS), n.main_fact().location.clone()))
            .collect();

        let mut candidates: Vec<usize> = available
            .iter()
            .enumerate()
            .filter(|(_, m)| {
                !covered.contains(&(m.topic(TOPIC_SEGMENTS), m.main_fact().location.clone()))
            })
            .map(|(i, _)| i)
            .collect();

        if candidates.is_empty() {
            if covered.len() > 1 {
                // Several topics already covered and nothing new left: this
                // is an overview document and it is finished.
                debug!("No new topics and more than one covered, stopping early");
                return None;
            }
            // Only one topic ever seen: an in-depth document. Relax the
            // thematic-novelty requirement and allow repeats.
            debug!("Single topic covered so far, relaxing novelty criteria");
            candidates = (0..available.len()).collect();
        }

        let best = candidates
            .into_iter()
            .fold(None::<(usize, f64)>, |best, idx| {
                let score = available[idx].score;
                match best {
                    Some((_, top)) if score <= top => best,
                    _ => Some((idx, score)),
                }
            });
        if let Some((idx, score)) = best {
            debug!(
                "Most interesting candidate is {} (score {})",
                available[idx].main_fact().value_type,
                score
            );
        }
        best
    }

    fn new_paragraph_relative_threshold(
        &self,
        config: &PlannerConfig,
        selected_nuclei: &[Message],
    ) -> f64 {
        relative_threshold(config, selected_nuclei)
    }

    fn select_satellites_for_nucleus(
        &self,
        config: &PlannerConfig,
        nucleus: &Message,
        available_core: &mut Vec<Message>,
        available_expanded: &mut Vec<Message>,
        _rng: &mut StdRng,
    ) -> Vec<Message> {
        select_satellites(config, nucleus, available_core, available_expanded)
    }
}

/// The first paragraph always happens; a second is strongly encouraged;
/// from the third on the nucleus must hold its own against the first.
pub(super) fn relative_threshold(config: &PlannerConfig, selected_nuclei: &[Message]) -> f64 {
    match selected_nuclei.len() {
        0 => f64::NEG_INFINITY,
        1 => config.second_paragraph_factor * selected_nuclei[0].score,
        _ => config.later_paragraph_factor * selected_nuclei[0].score,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pool {
    Core,
    Expanded,
}

fn select_satellites(
    config: &PlannerConfig,
    nucleus: &Message,
    available_core: &mut Vec<Message>,
    available_expanded: &mut Vec<Message>,
) -> Vec<Message> {
    debug!(
        "Selecting satellites from {} core and {} expanded messages",
        available_core.len(),
        available_expanded.len()
    );

    let mut satellites: Vec<Message> = Vec::new();
    let mut previous = nucleus.clone();
    let mut dist_from_prev_core: usize = 1;

    loop {
        // Expanded-pool messages fade with distance from the last core
        // message, to keep other locations from dominating a paragraph.
        let mut scored: Vec<(f64, Pool, usize)> = Vec::new();
        for (idx, message) in available_core.iter().enumerate() {
            if message.score > 0.0 {
                scored.push((message.score, Pool::Core, idx));
            }
        }
        for (idx, message) in available_expanded.iter().enumerate() {
            if message.score > 0.0 {
                scored.push((
                    message.score / (dist_from_prev_core + 1) as f64,
                    Pool::Expanded,
                    idx,
                ));
            }
        }

        let rescored: Vec<(f64, Pool, usize)> = scored
            .into_iter()
            .map(|(score, pool, idx)| {
                let message = match pool {
                    Pool::Core => &available_core[idx],
                    Pool::Expanded => &available_expanded[idx],
                };
                let v_nucleus =
                    context_weight(topic_weight(score, message, nucleus), message, nucleus);
                let v_previous =
                    context_weight(topic_weight(score, message, &previous), message, &previous);
                let w = config.nucleus_weight;
                ((w * v_nucleus + v_previous) / (w + 1.0), pool, idx)
            })
            .collect();

        let filtered: Vec<(f64, Pool, usize)> = rescored
            .iter()
            .filter(|(score, _, _)| {
                *score > config.satellite_relative_threshold * nucleus.score
                    || *score > config.satellite_absolute_threshold
            })
            .copied()
            .collect();

        let pick_from = if !filtered.is_empty() {
            filtered
        } else if satellites.len() >= config.min_satellites_per_nucleus {
            debug!("No candidate passes thresholds, minimum reached, done");
            return satellites;
        } else if !rescored.is_empty() {
            debug!("Under the satellite minimum, retrying without thresholds");
            rescored
        } else {
            debug!("Ran out of satellite candidates");
            return satellites;
        };

        if satellites.len() >= config.max_satellites_per_nucleus {
            debug!("Satellite maximum reached");
            return satellites;
        }

        let mut best: Option<(f64, Pool, usize)> = None;
        for candidate in pick_from {
            match best {
                Some((top, _, _)) if candidate.0 <= top => {}
                _ => best = Some(candidate),
            }
        }
        let (score, pool, idx) = match best {
            Some(found) => found,
            None => return satellites,
        };

        let chosen = match pool {
            Pool::Core => {
                dist_from_prev_core = 1;
                available_core.remove(idx)
            }
            Pool::Expanded => {
                dist_from_prev_core += 1;
                available_expanded.remove(idx)
            }
        };
        debug!(
            "Added satellite {} {} (rescored {})",
            chosen.main_fact().location,
            chosen.main_fact().value_type,
            score
        );
        previous = chosen.clone();
        satellites.push(chosen);
    }
}

/// Weight by thematic similarity to `previous`: a paragraph sticks to one
/// general topic, and within it, value types sharing a longer prefix with
/// the previous message score higher. The n'th-longest shared prefix is
/// penalized by 1/(n+1); no shared prefix zeroes the candidate.
fn topic_weight(score: f64, message: &Message, previous: &Message) -> f64 {
    if message.topic(TOPIC_SEGMENTS) != previous.topic(TOPIC_SEGMENTS) {
        return 0.0;
    }

    let fragments: Vec<&str> = previous.main_fact().value_type.split(':').collect();
    for n in 0..fragments.len() {
        let prefix = fragments[..fragments.len() - n].join(":");
        if message.main_fact().value_type.starts_with(&prefix) {
            return score / (n + 1) as f64;
        }
    }
    0.0
}

/// Weight by shared context: same location doubles, same timestamp adds
/// half again, and differing in both disqualifies the candidate outright.
fn context_weight(score: f64, message: &Message, previous: &Message) -> f64 {
    let m = message.main_fact();
    let p = previous.main_fact();

    if p.location != m.location && p.timestamp != m.timestamp {
        return 0.0;
    }
    let mut score = score;
    if p.location == m.location {
        score *= 2.0;
    }
    if p.timestamp == m.timestamp {
        score *= 1.5;
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Fact, FieldValue};
    use rand::SeedableRng;

    fn message(value_type: &str, location: &str, timestamp: &str, score: f64) -> Message {
        let mut m = Message::new(Fact {
            location: format!("[ENTITY:C:{}]", location),
            location_type: "C".to_string(),
            value: FieldValue::Num(1.0),
            value_type: value_type.to_string(),
            agent: String::new(),
            agent_type: String::new(),
            timestamp: timestamp.to_string(),
            timestamp_type: "year".to_string(),
            outlierness: 1.0,
        });
        m.score = score;
        m
    }

    #[test]
    fn test_topic_weight_prefix_decay() {
        let previous = message("a:b:c:d", "FI", "2020", 1.0);
        let exact = message("a:b:c:d", "FI", "2020", 1.0);
        let sibling = message("a:b:c:e", "FI", "2020", 1.0);
        let other_topic = message("x:y:z", "FI", "2020", 1.0);

        assert_eq!(topic_weight(8.0, &exact, &previous), 8.0);
        // "a:b:c:e" matches the second-longest prefix "a:b:c" -> 1/2.
        assert_eq!(topic_weight(8.0, &sibling, &previous), 4.0);
        assert_eq!(topic_weight(8.0, &other_topic, &previous), 0.0);
    }

    #[test]
    fn test_context_weight_boosts_and_zeroes() {
        let previous = message("a:b:c", "FI", "2020", 1.0);
        let same_both = message("a:b:c", "FI", "2020", 1.0);
        let same_loc = message("a:b:c", "FI", "2019", 1.0);
        let same_time = message("a:b:c", "SE", "2020", 1.0);
        let neither = message("a:b:c", "SE", "2019", 1.0);

        assert_eq!(context_weight(1.0, &same_both, &previous), 3.0);
        assert_eq!(context_weight(1.0, &same_loc, &previous), 2.0);
        assert_eq!(context_weight(1.0, &same_time, &previous), 1.5);
        assert_eq!(context_weight(1.0, &neither, &previous), 0.0);
    }

    #[test]
    fn test_nucleus_prefers_uncovered_topic() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = PlannerConfig::default();
        let selected = vec![message("a:b:c", "FI", "2020", 10.0)];
        let available = vec![
            message("a:b:c:d", "FI", "2020", 9.0),
            message("x:y:z", "FI", "2020", 5.0),
        ];
        // "a:b:c:d" shares the covered topic "a:b:c" for FI, so the lower
        // scoring but uncovered "x:y:z" wins.
        let (idx, score) = FullStrategy
            .select_next_nucleus(&config, &available, &selected, &mut rng)
            .unwrap();
        assert_eq!(idx, 1);
        assert_eq!(score, 5.0);
    }

    #[test]
    fn test_overview_document_stops_when_topics_exhausted() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = PlannerConfig::default();
        let selected = vec![
            message("a:b:c", "FI", "2020", 10.0),
            message("x:y:z", "FI", "2020", 8.0),
        ];
        let available = vec![message("a:b:c", "FI", "2020", 9.0)];
        assert!(FullStrategy
            .select_next_nucleus(&config, &available, &selected, &mut rng)
            .is_none());
    }

    #[test]
    fn test_in_depth_document_relaxes_on_single_topic() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = PlannerConfig::default();
        let selected = vec![message("a:b:c", "FI", "2020", 10.0)];
        let available = vec![message("a:b:c", "FI", "2020", 9.0)];
        let (idx, _) = FullStrategy
            .select_next_nucleus(&config, &available, &selected, &mut rng)
            .unwrap();
        assert_eq!(idx, 0);
    }

    #[test]
    fn test_satellites_stay_within_bounds_and_leave_pool() {
        let config = PlannerConfig::default();
        let nucleus = message("a:b:c", "FI", "2020", 10.0);
        let mut core = vec![
            message("a:b:c:d", "FI", "2020", 9.0),
            message("a:b:c:e", "FI", "2020", 8.0),
            message("a:b:c:f", "FI", "2020", 7.0),
            message("a:b:c:g", "FI", "2020", 6.5),
            message("a:b:c:h", "FI", "2020", 6.0),
            message("a:b:c:i", "FI", "2020", 5.5),
            message("a:b:c:j", "FI", "2020", 5.0),
        ];
        let mut expanded = Vec::new();
        let satellites = select_satellites(&config, &nucleus, &mut core, &mut expanded);

        assert!(satellites.len() <= config.max_satellites_per_nucleus);
        assert_eq!(core.len() + satellites.len(), 7);
    }

    #[test]
    fn test_minimum_retry_without_thresholds() {
        let mut config = PlannerConfig::default();
        config.satellite_absolute_threshold = 100.0;
        config.satellite_relative_threshold = 100.0;
        let nucleus = message("a:b:c", "FI", "2020", 10.0);
        // Both candidates fail the thresholds, but the minimum forces them in.
        let mut core = vec![
            message("a:b:c:d", "FI", "2020", 0.5),
            message("a:b:c:e", "FI", "2020", 0.4),
        ];
        let mut expanded = Vec::new();
        let satellites = select_satellites(&config, &nucleus, &mut core, &mut expanded);
        assert_eq!(satellites.len(), 2);
    }
}
