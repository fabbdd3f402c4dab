//! Ordinal realization: slots carrying the `ord` attribute are rewritten
//! into language-specific ordinal words ("3" -> "third"). Rank 1 renders as
//! empty in suffix-style languages: "highest" reads better than "1st
//! highest".

use tracing::error;

use crate::model::{PlanNode, TemplateComponent};
use crate::registry::{OrdinalStyle, OrdinalTable};

pub struct OrdinalRealizer;

impl OrdinalRealizer {
    pub fn realize(&self, plan: &mut PlanNode, table: Option<&OrdinalTable>) {
        for message in plan.leaves_mut() {
            let template = match message.template.as_mut() {
                Some(template) => template,
                None => continue,
            };
            for component in template.components.iter_mut() {
                let slot = match component {
                    TemplateComponent::Slot(slot) => slot,
                    TemplateComponent::Literal(_) => continue,
                };
                if slot.attributes.get("ord").is_none() {
                    continue;
                }
                match table {
                    Some(table) => {
                        let value = slot.value();
                        slot.set_value(ordinal_form(table, &value));
                    }
                    None => {
                        error!("Wanted to realize '{}' as ordinal but found no table", slot.value());
                    }
                }
            }
        }
    }
}

fn ordinal_form(table: &OrdinalTable, value: &str) -> String {
    if table.style == OrdinalStyle::EnglishSuffix && value == "1" {
        return String::new();
    }
    if let Some(word) = table.small.get(value) {
        return word.clone();
    }
    match table.style {
        OrdinalStyle::EnglishSuffix => format!("{}{}", value, english_suffix(value)),
        OrdinalStyle::TrailingDot => format!("{}.", value),
    }
}

fn english_suffix(value: &str) -> &'static str {
    if matches!(value, "11" | "12" | "13") {
        return "th";
    }
    match value.chars().last() {
        Some('1') => "st",
        Some('2') => "nd",
        Some('3') => "rd",
        _ => "th",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Fact, FieldValue, Message, Slot, SlotSource, Template};
    use std::collections::HashMap;

    fn english_table() -> OrdinalTable {
        let small: HashMap<String, String> = [
            ("2", "second"),
            ("3", "third"),
            ("4", "fourth"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        OrdinalTable {
            small,
            style: OrdinalStyle::EnglishSuffix,
        }
    }

    fn rank_message(rank: f64) -> Message {
        let fact = Fact {
            location: "[ENTITY:C:FI]".to_string(),
            location_type: "C".to_string(),
            value: FieldValue::Num(rank),
            value_type: "cphi:hicp2015:rank".to_string(),
            agent: String::new(),
            agent_type: String::new(),
            timestamp: "2020".to_string(),
            timestamp_type: "year".to_string(),
            outlierness: 1.0,
        };
        let mut slot = Slot::with_attributes(
            SlotSource::Field("value".to_string()),
            [("ord", "true")],
        );
        slot.fact = Some(fact.clone());
        let mut message = Message::new(fact);
        message.template = Some(Template::new(
            vec![TemplateComponent::slot(slot)],
            Vec::new(),
        ));
        message
    }

    fn realized_value(rank: f64) -> String {
        let mut plan =
            PlanNode::sequence(vec![PlanNode::sequence(vec![PlanNode::leaf(rank_message(rank))])]);
        OrdinalRealizer.realize(&mut plan, Some(&english_table()));
        plan.leaves()[0].template.as_ref().unwrap().components[0].value()
    }

    #[test]
    fn test_small_ordinals_from_table() {
        assert_eq!(realized_value(3.0), "third");
    }

    #[test]
    fn test_rank_one_renders_empty() {
        assert_eq!(realized_value(1.0), "");
    }

    #[test]
    fn test_large_ordinals_use_suffix() {
        assert_eq!(realized_value(21.0), "21st");
        assert_eq!(realized_value(12.0), "12th");
        assert_eq!(realized_value(23.0), "23rd");
    }

    #[test]
    fn test_missing_table_passes_through() {
        let mut plan =
            PlanNode::sequence(vec![PlanNode::sequence(vec![PlanNode::leaf(rank_message(3.0))])]);
        OrdinalRealizer.realize(&mut plan, None);
        assert_eq!(
            plan.leaves()[0].template.as_ref().unwrap().components[0].value(),
            "3"
        );
    }
}
