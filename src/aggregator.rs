//! Sentence aggregation: merge adjacent sibling messages whose templates
//! share a literal prefix, to avoid "In 2020 X was 1. In 2020 Y was 2."
//! style repetition.

use tracing::{debug, warn};

use crate::model::{Fact, Message, PlanNode, Relation, Template, TemplateComponent};
use crate::registry::ConjunctionTable;

/// Rewrite the tree bottom-up, merging where allowed. Only SEQUENCE-related
/// siblings have aggregation semantics; other relations are passed through
/// with their children visited individually.
pub fn aggregate(node: PlanNode, conjunctions: &ConjunctionTable) -> PlanNode {
    match node {
        PlanNode::Leaf(_) => node,
        PlanNode::Branch { relation, children } => match relation {
            Relation::Elaboration | Relation::List => {
                warn!(
                    "Aggregation over {:?} relations is not implemented, passing through",
                    relation
                );
                PlanNode::Branch {
                    relation,
                    children: children
                        .into_iter()
                        .map(|c| aggregate(c, conjunctions))
                        .collect(),
                }
            }
            _ => aggregate_sequence(relation, children, conjunctions),
        },
    }
}

fn aggregate_sequence(
    relation: Relation,
    children: Vec<PlanNode>,
    conjunctions: &ConjunctionTable,
) -> PlanNode {
    let mut new_children: Vec<PlanNode> = Vec::new();

    for child in children {
        let current = match child {
            PlanNode::Branch { .. } => {
                // Not a message: recurse, never aggregate across the boundary.
                new_children.push(aggregate(child, conjunctions));
                continue;
            }
            PlanNode::Leaf(message) => message,
        };

        let previous = match new_children.last() {
            Some(PlanNode::Leaf(message)) => Some(message),
            _ => None,
        };

        let merged = match previous {
            None => None,
            Some(previous) => {
                if previous.prevent_aggregation || current.prevent_aggregation {
                    debug!("Aggregation prevented by flag");
                    None
                } else if !same_prefix(previous, &current) {
                    debug!("No shared prefix, not aggregating");
                    None
                } else if !has_implicit_time(previous) && has_implicit_time(&current) {
                    // The current sentence leaves its time implicit; putting
                    // the explicit-time sentence first anchors the reference,
                    // so the two swap places inside the merge.
                    debug!("Swapping fragments so the explicit time comes first");
                    Some(combine(&current, previous, conjunctions))
                } else if has_implicit_time(previous) && !has_implicit_time(&current) {
                    // Merging would make the implicit reference bind to the
                    // newly introduced explicit time. Keep them apart.
                    debug!("Implicit time followed by explicit time, not combining");
                    None
                } else {
                    Some(combine(previous, &current, conjunctions))
                }
            }
        };

        match merged {
            Some(message) => {
                let last = new_children.len() - 1;
                new_children[last] = PlanNode::Leaf(message);
            }
            None => new_children.push(PlanNode::Leaf(current)),
        }
    }

    PlanNode::Branch {
        relation,
        children: new_children,
    }
}

/// The shared-prefix heuristic: aggregation is considered only when the
/// first components render identically.
fn same_prefix(first: &Message, second: &Message) -> bool {
    match (&first.template, &second.template) {
        (Some(a), Some(b)) => match (a.components.first(), b.components.first()) {
            (Some(ca), Some(cb)) => ca.value() == cb.value(),
            _ => false,
        },
        _ => false,
    }
}

/// A message with no time slot understands its time from context.
fn has_implicit_time(message: &Message) -> bool {
    message
        .template
        .as_ref()
        .map(|t| !t.has_slot_of_type("time"))
        .unwrap_or(true)
}

/// Merge two messages: keep the common component prefix once, join with a
/// polarity-appropriate conjunction, then append the second message's tail.
fn combine(first: &Message, second: &Message, conjunctions: &ConjunctionTable) -> Message {
    let empty: &[TemplateComponent] = &[];
    let first_components = first
        .template
        .as_ref()
        .map(|t| t.components.as_slice())
        .unwrap_or(empty);
    let second_components = second
        .template
        .as_ref()
        .map(|t| t.components.as_slice())
        .unwrap_or(empty);

    let mut divergence = 0;
    while divergence < first_components.len().min(second_components.len())
        && are_same(&first_components[divergence], &second_components[divergence])
    {
        divergence += 1;
    }

    let mut combined: Vec<TemplateComponent> = first_components.to_vec();
    let conjunction = if first.polarity != second.polarity {
        &conjunctions.inverse_combiner
    } else {
        &conjunctions.default_combiner
    };
    combined.push(TemplateComponent::literal(conjunction.clone()));
    combined.extend(second_components[divergence..].to_vec());

    debug!(
        "Combined into {}",
        combined
            .iter()
            .map(|c| c.value())
            .collect::<Vec<_>>()
            .join(" ")
    );

    let mut facts: Vec<Fact> = first.facts().to_vec();
    for fact in second.facts() {
        if !facts.contains(fact) {
            facts.push(fact.clone());
        }
    }

    let mut message = Message::with_facts(facts);
    message.importance_coefficient = first.importance_coefficient;
    message.template = Some(Template::new(combined, Vec::new()));
    // One merge per sentence: the result never chains into a third message.
    message.prevent_aggregation = true;
    message
}

/// Component equality for prefix sharing. Values must render identically;
/// slots bound to facts additionally compare the underlying field (value
/// slots are never identical, two equal totals may group different sets),
/// and the `case` attribute must agree.
fn are_same(c1: &TemplateComponent, c2: &TemplateComponent) -> bool {
    if c1.value() != c2.value() {
        return false;
    }

    if let (Some(s1), Some(s2)) = (c1.as_slot(), c2.as_slot()) {
        if let (Some(f1), Some(f2)) = (&s1.fact, &s2.fact) {
            if s1.slot_type() == "value" {
                return false;
            }
            if Fact::is_field(s1.slot_type()) && Fact::is_field(s2.slot_type()) {
                let v1 = f1.field(s1.slot_type());
                let v2 = f2.field(s2.slot_type());
                if v1 != v2 {
                    return false;
                }
            }
        }
    }

    c1.case_attribute() == c2.case_attribute()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldValue, Slot, SlotSource};

    fn conjunctions() -> ConjunctionTable {
        ConjunctionTable {
            default_combiner: "and".to_string(),
            inverse_combiner: "but".to_string(),
            subord_clause_start: ", which is".to_string(),
            comparator: "than".to_string(),
        }
    }

    fn fact(value_type: &str, value: f64, timestamp: &str) -> Fact {
        Fact {
            location: "[ENTITY:C:FI]".to_string(),
            location_type: "C".to_string(),
            value: FieldValue::Num(value),
            value_type: value_type.to_string(),
            agent: String::new(),
            agent_type: String::new(),
            timestamp: timestamp.to_string(),
            timestamp_type: "year".to_string(),
            outlierness: 1.0,
        }
    }

    fn bound_slot(field: &str, fact: &Fact) -> TemplateComponent {
        let mut slot = Slot::new(SlotSource::Field(field.to_string()));
        slot.fact = Some(fact.clone());
        TemplateComponent::slot(slot)
    }

    /// "{location} {value_type} {value}" with optional leading time slot.
    fn templated_message(value_type: &str, value: f64, with_time: bool) -> Message {
        let f = fact(value_type, value, "2020");
        let mut components = Vec::new();
        components.push(bound_slot("location", &f));
        if with_time {
            let mut slot = Slot::new(SlotSource::Time);
            slot.fact = Some(f.clone());
            components.push(TemplateComponent::slot(slot));
        }
        components.push(bound_slot("value_type", &f));
        components.push(bound_slot("value", &f));
        let mut message = Message::new(f);
        message.template = Some(Template::new(components, Vec::new()));
        message
    }

    fn paragraph(messages: Vec<Message>) -> PlanNode {
        PlanNode::sequence(vec![PlanNode::sequence(
            messages.into_iter().map(PlanNode::leaf).collect(),
        )])
    }

    fn sentence_count(plan: &PlanNode) -> usize {
        plan.leaves().len()
    }

    #[test]
    fn test_shared_prefix_merges_with_conjunction() {
        let first = templated_message("cphi:hicp2015:cp-hi00", 1.0, false);
        let second = templated_message("cphi:hicp2015:cp-hi00", 2.0, false);
        let plan = paragraph(vec![first, second]);

        let result = aggregate(plan, &conjunctions());
        assert_eq!(sentence_count(&result), 1);

        let merged = result.leaves()[0];
        let rendered: Vec<String> = merged
            .template
            .as_ref()
            .unwrap()
            .components
            .iter()
            .map(|c| c.value())
            .collect();
        // Shared prefix once, then "and", then the diverging tail. The
        // value slots differ, so divergence starts at the value.
        assert_eq!(
            rendered,
            vec![
                "[ENTITY:C:FI]",
                "cphi:hicp2015:cp-hi00",
                "1",
                "and",
                "2",
            ]
        );
        assert!(merged.prevent_aggregation);
        assert_eq!(merged.facts().len(), 2);
    }

    #[test]
    fn test_differing_prefix_does_not_merge() {
        let mut first = templated_message("cphi:hicp2015:cp-hi00", 1.0, false);
        // Different first component value
        first.template.as_mut().unwrap().components[0] = TemplateComponent::literal("elsewhere");
        let second = templated_message("cphi:hicp2015:cp-hi00", 2.0, false);
        let plan = paragraph(vec![first, second]);

        let result = aggregate(plan, &conjunctions());
        assert_eq!(sentence_count(&result), 2);
    }

    #[test]
    fn test_prevent_aggregation_respected() {
        let first = templated_message("cphi:hicp2015:cp-hi00", 1.0, false);
        let mut second = templated_message("cphi:hicp2015:cp-hi00", 2.0, false);
        second.prevent_aggregation = true;
        let plan = paragraph(vec![first, second]);

        let result = aggregate(plan, &conjunctions());
        assert_eq!(sentence_count(&result), 2);
    }

    #[test]
    fn test_no_triple_chaining() {
        let first = templated_message("cphi:hicp2015:cp-hi00", 1.0, false);
        let second = templated_message("cphi:hicp2015:cp-hi00", 2.0, false);
        let third = templated_message("cphi:hicp2015:cp-hi00", 3.0, false);
        let plan = paragraph(vec![first, second, third]);

        let result = aggregate(plan, &conjunctions());
        // First two merge; the merged message blocks the third.
        assert_eq!(sentence_count(&result), 2);
    }

    #[test]
    fn test_explicit_then_implicit_swaps_order() {
        let explicit = templated_message("cphi:hicp2015:cp-hi00", 1.0, true);
        let implicit = templated_message("cphi:hicp2015:cp-hi00", 2.0, false);
        let plan = paragraph(vec![explicit, implicit]);

        let result = aggregate(plan, &conjunctions());
        assert_eq!(sentence_count(&result), 1);

        let merged = result.leaves()[0];
        let rendered: Vec<String> = merged
            .template
            .as_ref()
            .unwrap()
            .components
            .iter()
            .map(|c| c.value())
            .collect();
        // The implicit-time message leads; the explicit tail follows the
        // conjunction, carrying its time tag.
        let and_pos = rendered.iter().position(|v| v == "and").unwrap();
        assert!(rendered[and_pos + 1..].iter().any(|v| v.starts_with("[TIME:")));
        assert!(!rendered[..and_pos].iter().any(|v| v.starts_with("[TIME:")));
    }

    #[test]
    fn test_implicit_then_explicit_refuses_merge() {
        let implicit = templated_message("cphi:hicp2015:cp-hi00", 1.0, false);
        let explicit = templated_message("cphi:hicp2015:cp-hi00", 2.0, true);
        let plan = paragraph(vec![implicit, explicit]);

        let result = aggregate(plan, &conjunctions());
        assert_eq!(sentence_count(&result), 2);
    }

    #[test]
    fn test_value_slots_never_identical() {
        let f1 = fact("cphi:hicp2015:cp-hi00", 5.0, "2020");
        let f2 = fact("cphi:rt12:cp-hi00", 5.0, "2020");
        // Same rendered value "5", but numeric identity of two different
        // groupings must not be asserted.
        assert!(!are_same(&bound_slot("value", &f1), &bound_slot("value", &f2)));
    }

    #[test]
    fn test_case_attribute_must_agree() {
        let f = fact("cphi:hicp2015:cp-hi00", 5.0, "2020");
        let plain = bound_slot("location", &f);
        let mut genitive_slot = Slot::new(SlotSource::Field("location".to_string()));
        genitive_slot.fact = Some(f.clone());
        genitive_slot
            .attributes
            .insert("case".to_string(), "gen".to_string());
        let genitive = TemplateComponent::slot(genitive_slot);

        assert!(!are_same(&plain, &genitive));
        assert!(are_same(&plain, &bound_slot("location", &f)));
    }

    #[test]
    fn test_opposite_polarity_uses_inverse_combiner() {
        let mut first = templated_message("cphi:hicp2015:cp-hi00", 1.0, false);
        first.polarity = 1.0;
        let mut second = templated_message("cphi:hicp2015:cp-hi00", 2.0, false);
        second.polarity = -1.0;
        let plan = paragraph(vec![first, second]);

        let result = aggregate(plan, &conjunctions());
        let merged = result.leaves()[0];
        assert!(merged
            .template
            .as_ref()
            .unwrap()
            .components
            .iter()
            .any(|c| c.value() == "but"));
    }
}
