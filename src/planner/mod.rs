//! Document planning: select and order messages into paragraphs.
//!
//! Two entry points share the same strategy interface: the headline planner
//! picks a single top message, the body planner iteratively builds
//! paragraphs of one nucleus plus a handful of satellites. The strategies
//! differ only in how they pick nuclei and satellites; the surrounding
//! state machines live here.

mod full;
mod strategy;
mod variants;

pub use full::FullStrategy;
pub use strategy::PlannerStrategy;
pub use variants::{EarlyStopStrategy, RandomStrategy, ScoreStrategy};

use rand::rngs::StdRng;
use tracing::debug;

use crate::config::{PlannerConfig, PlannerKind};
use crate::error::PlanError;
use crate::model::{Message, PlanNode};

/// Resolve a planner kind to its strategy. The random strategy ignores the
/// absolute paragraph threshold, so its config copy clears it.
pub fn strategy_for(kind: PlannerKind, config: &PlannerConfig) -> (Box<dyn PlannerStrategy>, PlannerConfig) {
    match kind {
        PlannerKind::Full => (Box::new(FullStrategy), config.clone()),
        PlannerKind::Score => (Box::new(ScoreStrategy), config.clone()),
        PlannerKind::EarlyStop => (Box::new(EarlyStopStrategy), config.clone()),
        PlannerKind::Random => {
            let mut config = config.clone();
            config.new_paragraph_absolute_threshold = 0.0;
            (Box::new(RandomStrategy), config)
        }
    }
}

/// Wrap the single most newsworthy message into a one-sentence plan.
pub fn headline_plan(
    strategy: &dyn PlannerStrategy,
    config: &PlannerConfig,
    core: Vec<Message>,
    rng: &mut StdRng,
) -> Result<PlanNode, PlanError> {
    debug!("Creating headline document plan");
    let (index, _) = strategy
        .select_next_nucleus(config, &core, &[], rng)
        .ok_or(PlanError::NoHeadlineMessage)?;
    let mut core = core;
    let nucleus = core.swap_remove(index);
    Ok(PlanNode::sequence(vec![PlanNode::sequence(vec![
        PlanNode::leaf(nucleus),
    ])]))
}

/// Build the body plan: repeatedly pick a nucleus, stop when scores fall
/// under the absolute or relative thresholds, and grow each paragraph with
/// satellites pulled from the remaining pools.
pub fn body_plan(
    strategy: &dyn PlannerStrategy,
    config: &PlannerConfig,
    core: Vec<Message>,
    expanded: Vec<Message>,
    rng: &mut StdRng,
) -> Result<PlanNode, PlanError> {
    debug!("Creating body document plan");

    let mut available_core = core;
    let mut available_expanded = expanded;
    let mut selected_nuclei: Vec<Message> = Vec::new();
    let mut paragraphs: Vec<PlanNode> = Vec::new();

    loop {
        let selection = strategy.select_next_nucleus(config, &available_core, &selected_nuclei, rng);
        let (index, score) = match selection {
            Some(found) => found,
            None => break,
        };
        if score < config.new_paragraph_absolute_threshold
            || score < strategy.new_paragraph_relative_threshold(config, &selected_nuclei)
        {
            debug!("Next nucleus score {} below thresholds, stopping", score);
            break;
        }

        let nucleus = available_core.remove(index);
        debug!(
            "Nucleus: {} {} {}",
            nucleus.main_fact().location,
            nucleus.main_fact().timestamp,
            nucleus.main_fact().value_type
        );
        selected_nuclei.push(nucleus.clone());

        let satellites = strategy.select_satellites_for_nucleus(
            config,
            &nucleus,
            &mut available_core,
            &mut available_expanded,
            rng,
        );

        let mut children = vec![PlanNode::leaf(nucleus)];
        children.extend(satellites.into_iter().map(PlanNode::leaf));
        paragraphs.push(PlanNode::sequence(children));
    }

    if selected_nuclei.is_empty() {
        return Err(PlanError::NoViableNucleus);
    }
    Ok(PlanNode::sequence(paragraphs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Fact, FieldValue};
    use rand::SeedableRng;

    fn message(value_type: &str, location: &str, score: f64) -> Message {
        let mut m = Message::new(Fact {
            location: format!("[ENTITY:C:{}]", location),
            location_type: "C".to_string(),
            value: FieldValue::Num(1.0),
            value_type: value_type.to_string(),
            agent: String::new(),
            agent_type: String::new(),
            timestamp: "2020".to_string(),
            timestamp_type: "year".to_string(),
            outlierness: 1.0,
        });
        m.score = score;
        m
    }

    fn pool() -> Vec<Message> {
        vec![
            message("cphi:hicp2015:cp-hi00", "FI", 10.0),
            message("cphi:hicp2015:cp-hi00:comp_eu", "FI", 8.0),
            message("cphi:rt12:cp-hi00", "FI", 6.0),
            message("cphi:rt12:cp-hi01", "FI", 5.0),
            message("health:cost:total", "FI", 4.0),
            message("health:cost:public", "FI", 3.0),
            message("health:cost:private", "FI", 2.5),
        ]
    }

    #[test]
    fn test_headline_takes_top_message() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = PlannerConfig::default();
        let plan = headline_plan(&FullStrategy, &config, pool(), &mut rng).unwrap();
        let leaves = plan.leaves();
        assert_eq!(leaves.len(), 1);
        assert_eq!(leaves[0].score, 10.0);
    }

    #[test]
    fn test_headline_fails_on_empty_pool() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = PlannerConfig::default();
        assert!(matches!(
            headline_plan(&FullStrategy, &config, Vec::new(), &mut rng),
            Err(PlanError::NoHeadlineMessage)
        ));
    }

    #[test]
    fn test_body_plan_terminates_and_never_repeats() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = PlannerConfig::default();
        let plan = body_plan(&FullStrategy, &config, pool(), Vec::new(), &mut rng).unwrap();

        assert!(plan.children().len() <= config.max_paragraphs);

        let leaves = plan.leaves();
        for (i, a) in leaves.iter().enumerate() {
            for b in leaves.iter().skip(i + 1) {
                assert!(
                    a.main_fact() != b.main_fact(),
                    "message placed twice in the plan"
                );
            }
        }
    }

    #[test]
    fn test_body_plan_with_no_messages_is_fatal() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = PlannerConfig::default();
        assert!(matches!(
            body_plan(&FullStrategy, &config, Vec::new(), Vec::new(), &mut rng),
            Err(PlanError::NoViableNucleus)
        ));
    }

    #[test]
    fn test_body_plan_zero_scores_is_fatal() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = PlannerConfig::default();
        let zeroed: Vec<Message> = pool()
            .into_iter()
            .map(|mut m| {
                m.score = 0.0;
                m
            })
            .collect();
        assert!(matches!(
            body_plan(&FullStrategy, &config, zeroed, Vec::new(), &mut rng),
            Err(PlanError::NoViableNucleus)
        ));
    }

    #[test]
    fn test_score_strategy_fills_paragraphs_by_rank() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = PlannerConfig::default();
        let plan = body_plan(&ScoreStrategy, &config, pool(), Vec::new(), &mut rng).unwrap();
        let first_paragraph = plan.children()[0].leaves();
        assert_eq!(first_paragraph[0].score, 10.0);
        // Satellites are the next best scores in order.
        assert!(first_paragraph[1].score >= first_paragraph[2].score);
    }

    #[test]
    fn test_random_strategy_is_seed_deterministic() {
        let config = PlannerConfig::default();

        let mut rng_a = StdRng::seed_from_u64(7);
        let plan_a = body_plan(&RandomStrategy, &config, pool(), Vec::new(), &mut rng_a).unwrap();
        let mut rng_b = StdRng::seed_from_u64(7);
        let plan_b = body_plan(&RandomStrategy, &config, pool(), Vec::new(), &mut rng_b).unwrap();

        let types =
            |plan: &PlanNode| -> Vec<String> {
                plan.leaves()
                    .iter()
                    .map(|m| m.main_fact().value_type.clone())
                    .collect()
            };
        assert_eq!(types(&plan_a), types(&plan_b));
    }
}
