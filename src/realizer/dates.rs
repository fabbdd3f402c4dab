//! Date realization: rewrites `[TIME:year:Y]` and `[TIME:month:YMM]` tags
//! into language-specific phrasings, tracking the previously realized tag
//! so repeated or same-year references can be shortened.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use regex::Regex;
use tracing::{debug, error};

use crate::model::{PlanNode, TemplateComponent};
use crate::registry::DateVocab;

pub struct DateRealizer {
    month_tag: Regex,
    year_tag: Regex,
}

impl DateRealizer {
    pub fn new() -> Result<Self, crate::error::ConfigError> {
        Ok(Self {
            month_tag: Regex::new(r"^\[TIME:month:(\d+)M(\d+)\]$")?,
            year_tag: Regex::new(r"^\[TIME:year:(\d+)\]$")?,
        })
    }

    /// One in-order pass over the whole document. The previously realized
    /// tag carries across sentence and paragraph boundaries.
    pub fn realize(&self, plan: &mut PlanNode, vocab: &DateVocab, rng: &mut StdRng) {
        let mut previous: Option<String> = None;

        for message in plan.leaves_mut() {
            let template = match message.template.as_mut() {
                Some(template) => template,
                None => continue,
            };

            let mut idx = 0;
            while idx < template.components.len() {
                let slot = match &template.components[idx] {
                    TemplateComponent::Slot(slot) => slot,
                    TemplateComponent::Literal(_) => {
                        idx += 1;
                        continue;
                    }
                };
                let tag = slot.value();
                if !tag.starts_with("[TIME:") {
                    idx += 1;
                    continue;
                }

                let phrasings = if self.month_tag.is_match(&tag) {
                    self.realize_month(&tag, previous.as_deref(), vocab)
                } else if self.year_tag.is_match(&tag) {
                    self.realize_year(&tag, previous.as_deref(), vocab)
                } else {
                    error!("Unrealizable time tag '{}'", tag);
                    idx += 1;
                    continue;
                };

                let phrase = match phrasings.choose(rng) {
                    Some(phrase) => phrase.clone(),
                    None => {
                        idx += 1;
                        continue;
                    }
                };
                debug!("Realized '{}' as '{}'", tag, phrase);

                let timestamp_type = if self.month_tag.is_match(&tag) {
                    "month"
                } else {
                    "year"
                };
                let keep_positions = vocab
                    .attach_attributes
                    .as_ref()
                    .and_then(|map| map.get(timestamp_type));

                let original = slot.clone();
                let new_components: Vec<TemplateComponent> = phrase
                    .split_whitespace()
                    .enumerate()
                    .map(|(token_idx, token)| {
                        let mut new_slot = original.clone();
                        if let Some(positions) = keep_positions {
                            if !positions.contains(&token_idx) {
                                new_slot.attributes.clear();
                            }
                        }
                        new_slot.set_value(token);
                        TemplateComponent::Slot(new_slot)
                    })
                    .collect();

                let count = new_components.len();
                template.components.splice(idx..=idx, new_components);
                idx += count;
                previous = Some(tag);
            }
        }
    }

    fn realize_month(&self, tag: &str, previous: Option<&str>, vocab: &DateVocab) -> Vec<String> {
        let (year, month) = match self.month_tag.captures(tag) {
            Some(captures) => (captures[1].to_string(), captures[2].to_string()),
            None => return Vec::new(),
        };
        let month_name = vocab
            .months
            .get(&month)
            .cloned()
            .unwrap_or_else(|| month.clone());

        let previous = match previous {
            Some(previous) => previous,
            None => {
                return vec![expand(&vocab.month_year_expression, &month_name, &year)];
            }
        };

        if tag == previous {
            return vocab.month_reference_options.clone();
        }

        let previous_year = self
            .month_tag
            .captures(previous)
            .map(|c| c[1].to_string())
            .or_else(|| self.year_tag.captures(previous).map(|c| c[1].to_string()));

        if previous_year.as_deref() == Some(year.as_str()) {
            vec![expand(&vocab.month_expression, &month_name, &year)]
        } else {
            vec![expand(&vocab.month_year_expression, &month_name, &year)]
        }
    }

    fn realize_year(&self, tag: &str, previous: Option<&str>, vocab: &DateVocab) -> Vec<String> {
        if previous == Some(tag) {
            return vocab.year_reference_options.clone();
        }
        let year = match self.year_tag.captures(tag) {
            Some(captures) => captures[1].to_string(),
            None => return Vec::new(),
        };
        vec![expand(&vocab.year_expression, "", &year)]
    }
}

fn expand(expression: &str, month: &str, year: &str) -> String {
    expression.replace("{month}", month).replace("{year}", year)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Fact, FieldValue, Message, Slot, SlotSource, Template};
    use rand::SeedableRng;
    use std::collections::HashMap;

    fn english_vocab() -> DateVocab {
        let months: HashMap<String, String> = [
            ("01", "January"),
            ("04", "April"),
            ("06", "June"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        DateVocab {
            months,
            month_reference_options: vec!["the same month".to_string()],
            year_reference_options: vec!["the same year".to_string()],
            month_expression: "{month}".to_string(),
            month_year_expression: "{month} {year}".to_string(),
            year_expression: "{year}".to_string(),
            attach_attributes: None,
        }
    }

    fn time_message(timestamp: &str, timestamp_type: &str) -> Message {
        let fact = Fact {
            location: "[ENTITY:C:FI]".to_string(),
            location_type: "C".to_string(),
            value: FieldValue::Num(1.0),
            value_type: "cphi:hicp2015".to_string(),
            agent: String::new(),
            agent_type: String::new(),
            timestamp: timestamp.to_string(),
            timestamp_type: timestamp_type.to_string(),
            outlierness: 1.0,
        };
        let mut slot = Slot::new(SlotSource::Time);
        slot.fact = Some(fact.clone());
        let mut message = Message::new(fact);
        message.template = Some(Template::new(
            vec![TemplateComponent::slot(slot)],
            Vec::new(),
        ));
        message
    }

    fn plan(messages: Vec<Message>) -> PlanNode {
        PlanNode::sequence(vec![PlanNode::sequence(
            messages.into_iter().map(PlanNode::leaf).collect(),
        )])
    }

    fn rendered(plan: &PlanNode) -> Vec<String> {
        plan.leaves()
            .iter()
            .map(|m| {
                m.template
                    .as_ref()
                    .unwrap()
                    .components
                    .iter()
                    .map(|c| c.value())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect()
    }

    #[test]
    fn test_first_month_mention_includes_year() {
        let mut p = plan(vec![time_message("2020M04", "month")]);
        let mut rng = StdRng::seed_from_u64(1);
        DateRealizer::new().unwrap().realize(&mut p, &english_vocab(), &mut rng);
        assert_eq!(rendered(&p), vec!["April 2020"]);
    }

    #[test]
    fn test_repeated_tag_uses_reference_phrase() {
        let mut p = plan(vec![
            time_message("2020M04", "month"),
            time_message("2020M04", "month"),
        ]);
        let mut rng = StdRng::seed_from_u64(1);
        DateRealizer::new().unwrap().realize(&mut p, &english_vocab(), &mut rng);
        assert_eq!(rendered(&p), vec!["April 2020", "the same month"]);
    }

    #[test]
    fn test_same_year_elides_year() {
        let mut p = plan(vec![
            time_message("2020M04", "month"),
            time_message("2020M06", "month"),
        ]);
        let mut rng = StdRng::seed_from_u64(1);
        DateRealizer::new().unwrap().realize(&mut p, &english_vocab(), &mut rng);
        assert_eq!(rendered(&p), vec!["April 2020", "June"]);
    }

    #[test]
    fn test_year_change_repeats_year() {
        let mut p = plan(vec![
            time_message("2019M04", "month"),
            time_message("2020M06", "month"),
        ]);
        let mut rng = StdRng::seed_from_u64(1);
        DateRealizer::new().unwrap().realize(&mut p, &english_vocab(), &mut rng);
        assert_eq!(rendered(&p), vec!["April 2019", "June 2020"]);
    }

    #[test]
    fn test_year_realization_and_reference() {
        let mut p = plan(vec![
            time_message("2020", "year"),
            time_message("2020", "year"),
        ]);
        let mut rng = StdRng::seed_from_u64(1);
        DateRealizer::new().unwrap().realize(&mut p, &english_vocab(), &mut rng);
        assert_eq!(rendered(&p), vec!["2020", "the same year"]);
    }

    #[test]
    fn test_non_time_slots_untouched() {
        let mut message = time_message("2020", "year");
        message
            .template
            .as_mut()
            .unwrap()
            .components
            .push(TemplateComponent::literal("unchanged"));
        let mut p = plan(vec![message]);
        let mut rng = StdRng::seed_from_u64(1);
        DateRealizer::new().unwrap().realize(&mut p, &english_vocab(), &mut rng);
        assert_eq!(rendered(&p), vec!["2020 unchanged"]);
    }
}
