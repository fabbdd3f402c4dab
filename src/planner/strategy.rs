use rand::rngs::StdRng;

use crate::config::PlannerConfig;
use crate::model::Message;

/// The three decisions a document planner variant makes. Implementations
/// are stateless values; all working state lives in the planner loop.
pub trait PlannerStrategy: Send + Sync {
    /// Pick the next nucleus from the available pool. Returns the index
    /// into `available` and the score used for threshold checks, or `None`
    /// when no further paragraph should be started.
    fn select_next_nucleus(
        &self,
        config: &PlannerConfig,
        available: &[Message],
        selected_nuclei: &[Message],
        rng: &mut StdRng,
    ) -> Option<(usize, f64)>;

    /// The score a new nucleus must beat, as a function of the nuclei
    /// selected so far.
    fn new_paragraph_relative_threshold(
        &self,
        config: &PlannerConfig,
        selected_nuclei: &[Message],
    ) -> f64;

    /// Grow the satellite list for a nucleus, removing every chosen message
    /// from its pool.
    fn select_satellites_for_nucleus(
        &self,
        config: &PlannerConfig,
        nucleus: &Message,
        available_core: &mut Vec<Message>,
        available_expanded: &mut Vec<Message>,
        rng: &mut StdRng,
    ) -> Vec<Message>;
}

/// Index of the best-scoring message, first among equals.
pub(super) fn argmax_by_score(messages: &[Message]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, message) in messages.iter().enumerate() {
        match best {
            Some((_, score)) if message.score <= score => {}
            _ => best = Some((idx, message.score)),
        }
    }
    best.map(|(idx, _)| idx)
}
