use rand::rngs::StdRng;
use rand::Rng;
use tracing::debug;

use super::full::relative_threshold;
use super::strategy::{argmax_by_score, PlannerStrategy};
use crate::config::PlannerConfig;
use crate::model::Message;

/// Newsworthiness-only planning: best score wins, no thematic bookkeeping,
/// no relative paragraph threshold.
#[derive(Debug, Clone, Copy)]
pub struct ScoreStrategy;

impl PlannerStrategy for ScoreStrategy {
    fn select_next_nucleus(
        &self,
        config: &PlannerConfig,
        available: &[Message],
        selected_nuclei: &[Message],
        _rng: &mut StdRng,
    ) -> Option<(usize, f64)> {
        select_top_scoring(config, available, selected_nuclei)
    }

    fn new_paragraph_relative_threshold(
        &self,
        _config: &PlannerConfig,
        _selected_nuclei: &[Message],
    ) -> f64 {
        f64::NEG_INFINITY
    }

    fn select_satellites_for_nucleus(
        &self,
        config: &PlannerConfig,
        _nucleus: &Message,
        available_core: &mut Vec<Message>,
        available_expanded: &mut Vec<Message>,
        _rng: &mut StdRng,
    ) -> Vec<Message> {
        // Both pools compete purely on score.
        let mut satellites = Vec::new();
        while satellites.len() < config.max_satellites_per_nucleus {
            let core_best = argmax_by_score(available_core);
            let expanded_best = argmax_by_score(available_expanded);
            let take_core = match (core_best, expanded_best) {
                (Some(c), Some(e)) => available_core[c].score >= available_expanded[e].score,
                (Some(_), None) => true,
                (None, Some(_)) => false,
                (None, None) => break,
            };
            let chosen = if take_core {
                available_core.remove(core_best.unwrap_or_default())
            } else {
                available_expanded.remove(expanded_best.unwrap_or_default())
            };
            satellites.push(chosen);
        }
        satellites
    }
}

/// Score-ranked satellites from the core pool only, with a stricter
/// second-paragraph threshold. Stops early rather than reaching for
/// supporting material from other locations.
#[derive(Debug, Clone, Copy)]
pub struct EarlyStopStrategy;

impl PlannerStrategy for EarlyStopStrategy {
    fn select_next_nucleus(
        &self,
        config: &PlannerConfig,
        available: &[Message],
        selected_nuclei: &[Message],
        _rng: &mut StdRng,
    ) -> Option<(usize, f64)> {
        select_top_scoring(config, available, selected_nuclei)
    }

    fn new_paragraph_relative_threshold(
        &self,
        config: &PlannerConfig,
        selected_nuclei: &[Message],
    ) -> f64 {
        if selected_nuclei.len() == 1 {
            return 0.1 * selected_nuclei[0].score;
        }
        relative_threshold(config, selected_nuclei)
    }

    fn select_satellites_for_nucleus(
        &self,
        config: &PlannerConfig,
        _nucleus: &Message,
        available_core: &mut Vec<Message>,
        _available_expanded: &mut Vec<Message>,
        _rng: &mut StdRng,
    ) -> Vec<Message> {
        let mut satellites = Vec::new();
        while satellites.len() < config.max_satellites_per_nucleus {
            match argmax_by_score(available_core) {
                Some(idx) => satellites.push(available_core.remove(idx)),
                None => break,
            }
        }
        satellites
    }
}

/// Baseline planner: uniformly random nuclei and satellites. Useful for
/// evaluating how much the scoring actually buys.
#[derive(Debug, Clone, Copy)]
pub struct RandomStrategy;

impl PlannerStrategy for RandomStrategy {
    fn select_next_nucleus(
        &self,
        config: &PlannerConfig,
        available: &[Message],
        selected_nuclei: &[Message],
        rng: &mut StdRng,
    ) -> Option<(usize, f64)> {
        if selected_nuclei.len() >= config.max_paragraphs || available.is_empty() {
            debug!("max_paragraphs reached or pool empty, stopping");
            return None;
        }
        let idx = rng.gen_range(0..available.len());
        Some((idx, available[idx].score))
    }

    fn new_paragraph_relative_threshold(
        &self,
        _config: &PlannerConfig,
        _selected_nuclei: &[Message],
    ) -> f64 {
        f64::NEG_INFINITY
    }

    fn select_satellites_for_nucleus(
        &self,
        config: &PlannerConfig,
        _nucleus: &Message,
        available_core: &mut Vec<Message>,
        available_expanded: &mut Vec<Message>,
        rng: &mut StdRng,
    ) -> Vec<Message> {
        let mut satellites = Vec::new();
        while satellites.len() < config.max_satellites_per_nucleus
            && (!available_core.is_empty() || !available_expanded.is_empty())
        {
            let total = available_core.len() + available_expanded.len();
            let pick = rng.gen_range(0..total);
            let chosen = if pick < available_core.len() {
                available_core.remove(pick)
            } else {
                available_expanded.remove(pick - available_core.len())
            };
            satellites.push(chosen);
        }
        satellites
    }
}

fn select_top_scoring(
    config: &PlannerConfig,
    available: &[Message],
    selected_nuclei: &[Message],
) -> Option<(usize, f64)> {
    if selected_nuclei.len() >= config.max_paragraphs {
        debug!("max_paragraphs reached, stopping");
        return None;
    }
    argmax_by_score(available).map(|idx| (idx, available[idx].score))
}
