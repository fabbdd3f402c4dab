//! Template selection: attach a template to every message in the document
//! plan, respecting contextual continuity with the preceding sentence.

mod checker;

pub use checker::TemplateChecker;

use rand::rngs::StdRng;
use rand::Rng;
use tracing::{debug, warn};

use crate::error::SelectError;
use crate::model::{Message, PlanNode, Template};

/// Sibling context carried across messages while walking the plan.
#[derive(Debug, Clone)]
struct PrevContext {
    timestamp: String,
    timestamp_type: String,
    location: String,
    location_type: String,
    value_type: String,
}

impl PrevContext {
    fn of(message: &Message) -> Self {
        let fact = message.main_fact();
        Self {
            timestamp: fact.timestamp.clone(),
            timestamp_type: fact.timestamp_type.clone(),
            location: fact.location.clone(),
            location_type: fact.location_type.clone(),
            value_type: fact.value_type.clone(),
        }
    }
}

/// Walk the plan in document order and bind a template to every message.
/// `pool` is the full candidate message list; secondary template rules may
/// consume facts from it.
pub fn select_templates(
    plan: &mut PlanNode,
    templates: &[Template],
    pool: &[Message],
    rng: &mut StdRng,
) -> Result<(), SelectError> {
    let mut checker = TemplateChecker::new();
    let mut context: Option<PrevContext> = None;
    recurse(plan, templates, pool, &mut checker, &mut context, rng)
}

fn recurse(
    node: &mut PlanNode,
    templates: &[Template],
    pool: &[Message],
    checker: &mut TemplateChecker,
    context: &mut Option<PrevContext>,
    rng: &mut StdRng,
) -> Result<(), SelectError> {
    let children = match node {
        PlanNode::Branch { children, .. } => children,
        // A bare message outside any branch has no sibling context.
        PlanNode::Leaf(message) => {
            attach_template(message, templates, pool, checker, context, true, rng)?;
            return Ok(());
        }
    };

    for (idx, child) in children.iter_mut().enumerate() {
        match child {
            PlanNode::Leaf(message) => {
                attach_template(message, templates, pool, checker, context, idx == 0, rng)?;
            }
            PlanNode::Branch { .. } => {
                recurse(child, templates, pool, checker, context, rng)?;
            }
        }
    }
    Ok(())
}

fn attach_template(
    message: &mut Message,
    templates: &[Template],
    pool: &[Message],
    checker: &mut TemplateChecker,
    context: &mut Option<PrevContext>,
    is_first: bool,
    rng: &mut StdRng,
) -> Result<(), SelectError> {
    let candidates = checker.applicable(templates, message, pool);
    if candidates.is_empty() {
        // The planner should never place a message no template can express;
        // reaching this point is a template-authoring gap.
        return Err(SelectError::NoTemplateForMessage {
            value_type: message.main_fact().value_type.clone(),
        });
    }

    let candidates = filter_by_context(templates, candidates, context.as_ref(), message, is_first);
    let chosen = candidates[rng.gen_range(0..candidates.len())];

    let mut template = templates[chosen].clone();
    let used_facts = template.fill(message, pool);
    if used_facts.is_empty() {
        // Filling is expected to succeed after a positive check; trade this
        // one sentence for pipeline survival.
        warn!(
            "Selected template '{}' could not be filled, substituting an empty one",
            template.display()
        );
        template = Template::canned("");
    } else {
        message.set_facts(used_facts);
    }
    message.template = Some(template);
    *context = Some(PrevContext::of(message));
    Ok(())
}

/// Keep templates whose time/location/value-type slots agree with what the
/// reader already knows from the preceding sentence. Each filter is skipped
/// when it would eliminate every candidate.
fn filter_by_context(
    templates: &[Template],
    mut candidates: Vec<usize>,
    context: Option<&PrevContext>,
    message: &Message,
    is_first: bool,
) -> Vec<usize> {
    let fact = message.main_fact();

    let same_time = context
        .map(|c| c.timestamp == fact.timestamp && c.timestamp_type == fact.timestamp_type)
        .unwrap_or(false);
    candidates = apply_slot_filter(templates, candidates, "time", !same_time);

    let same_location = context
        .map(|c| c.location == fact.location && c.location_type == fact.location_type)
        .unwrap_or(false);
    candidates = apply_slot_filter(templates, candidates, "location", !same_location);

    let similar_value_type = context
        .map(|c| value_type_is_substantially_similar(&c.value_type, &fact.value_type))
        .unwrap_or(false);
    let want_value_type = !(similar_value_type && !is_first);
    candidates = apply_slot_filter(templates, candidates, "value_type", want_value_type);

    candidates
}

fn apply_slot_filter(
    templates: &[Template],
    candidates: Vec<usize>,
    slot_type: &str,
    want_present: bool,
) -> Vec<usize> {
    let proposed: Vec<usize> = candidates
        .iter()
        .copied()
        .filter(|&idx| templates[idx].has_slot_of_type(slot_type) == want_present)
        .collect();
    if proposed.is_empty() {
        debug!(
            "Filter on slot '{}' (present={}) would empty the candidate set, skipping",
            slot_type, want_present
        );
        candidates
    } else {
        proposed
    }
}

/// Two value types are close enough to elide repeating the type in text if
/// they agree after stripping a `:comp_*` comparison suffix.
fn value_type_is_substantially_similar(first: &str, second: &str) -> bool {
    strip_comparison(first) == strip_comparison(second)
}

fn strip_comparison(value_type: &str) -> &str {
    match value_type.find(":comp_") {
        Some(pos) => &value_type[..pos],
        None => value_type,
    }
}
