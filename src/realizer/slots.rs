//! Fixed-point slot realization. Each pass walks every slot under every
//! message and offers it to the registered realizer components in priority
//! order; a successful component replaces the slot with zero or more new
//! components. Passes repeat until nothing changes, because a realization
//! can expose values (category keys, unit tags) that another component
//! knows how to rewrite.

use std::collections::{BTreeMap, HashMap};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use regex::Regex;
use tracing::debug;

use crate::model::{PlanNode, Slot, TemplateComponent};

/// A single slot-rewriting strategy. Returning `None` is a silent miss;
/// the next component gets its turn.
pub trait SlotRealizerComponent: Send + Sync {
    fn supports(&self, language: &str) -> bool;

    fn realize(&self, slot: &Slot, rng: &mut StdRng) -> Option<Vec<TemplateComponent>>;
}

/// Run the registered components plus the universal number realizer over
/// the tree until a full pass makes no further changes.
pub fn realize_slots(
    plan: &mut PlanNode,
    language: &str,
    components: &[Box<dyn SlotRealizerComponent>],
    rng: &mut StdRng,
) {
    let number_realizer = NumberRealizer;
    let language = language.split('-').next().unwrap_or(language);

    loop {
        let mut changed = false;
        for message in plan.leaves_mut() {
            let template = match message.template.as_mut() {
                Some(template) => template,
                None => continue,
            };

            let mut idx = 0;
            while idx < template.components.len() {
                let slot = match &template.components[idx] {
                    TemplateComponent::Slot(slot) => slot.clone(),
                    TemplateComponent::Literal(_) => {
                        idx += 1;
                        continue;
                    }
                };

                let mut replacement: Option<Vec<TemplateComponent>> = None;
                for component in components {
                    if !component.supports(language) {
                        continue;
                    }
                    if let Some(result) = component.realize(&slot, rng) {
                        replacement = Some(result);
                        break;
                    }
                }
                if replacement.is_none() {
                    replacement = number_realizer.realize(&slot, rng);
                }

                match replacement {
                    Some(new_components) => {
                        if !is_noop(&slot, &new_components) {
                            changed = true;
                        }
                        let count = new_components.len();
                        template.components.splice(idx..=idx, new_components);
                        idx += count;
                    }
                    None => idx += 1,
                }
            }
        }
        if !changed {
            break;
        }
    }
}

/// A replacement that reproduces the slot's value and attributes is not a
/// change; treating it as one would keep the pass loop spinning.
fn is_noop(original: &Slot, replacement: &[TemplateComponent]) -> bool {
    if replacement.len() != 1 {
        return false;
    }
    match &replacement[0] {
        TemplateComponent::Slot(slot) => {
            slot.value() == original.value() && slot.attributes == original.attributes
        }
        TemplateComponent::Literal(lit) => lit.text == original.value(),
    }
}

/// Universal numeric formatting: integers render bare, floats are rounded
/// to the first non-zero decimal beyond two places. The `abs` attribute
/// strips the sign first.
pub struct NumberRealizer;

impl SlotRealizerComponent for NumberRealizer {
    fn supports(&self, _language: &str) -> bool {
        true
    }

    fn realize(&self, slot: &Slot, _rng: &mut StdRng) -> Option<Vec<TemplateComponent>> {
        let mut value: f64 = slot.value().parse().ok()?;

        if slot.attributes.get("abs").is_some() {
            value = value.abs();
        }

        let mut realized = slot.clone();
        if value.fract() == 0.0 {
            realized.set_value(format!("{}", value as i64));
            return Some(vec![TemplateComponent::Slot(realized)]);
        }

        for rounding in 0..5 {
            if round_to(value, rounding) != 0.0 {
                realized.set_value(format!("{}", round_to(value, rounding + 2)));
                return Some(vec![TemplateComponent::Slot(realized)]);
            }
        }

        Some(vec![TemplateComponent::Slot(realized)])
    }
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Substitute `{0}`, `{1}`, ... with captured groups.
fn format_groups(template: &str, groups: &[&str]) -> String {
    let mut out = template.to_string();
    for (idx, group) in groups.iter().enumerate() {
        out = out.replace(&format!("{{{}}}", idx), group);
    }
    out
}

/// Split a realized phrase into one component per word, propagating the
/// original slot's attributes only to the designated token positions and
/// merging in any per-position additions.
fn tokenize_into_slots(
    original: &Slot,
    phrase: &str,
    attach_attributes_to: &[usize],
    add_attributes: &HashMap<usize, BTreeMap<String, String>>,
) -> Vec<TemplateComponent> {
    phrase
        .split_whitespace()
        .enumerate()
        .map(|(idx, token)| {
            let mut slot = original.clone();
            if !attach_attributes_to.contains(&idx) {
                slot.attributes.clear();
            }
            if let Some(extra) = add_attributes.get(&idx) {
                for (key, value) in extra {
                    slot.attributes.insert(key.clone(), value.clone());
                }
            }
            slot.set_value(token);
            TemplateComponent::Slot(slot)
        })
        .collect()
}

/// Rewrites slots whose string value matches a pattern, rendering one of a
/// set of phrase templates chosen at random.
pub struct RegexRealizer {
    languages: Vec<String>,
    pattern: Regex,
    templates: Vec<String>,
    group_requirements: Option<fn(&[&str]) -> bool>,
    slot_requirements: Option<fn(&Slot) -> bool>,
    attach_attributes_to: Vec<usize>,
    add_attributes: HashMap<usize, BTreeMap<String, String>>,
}

impl RegexRealizer {
    pub fn new(
        languages: &[&str],
        pattern: Regex,
        templates: &[&str],
    ) -> Self {
        Self {
            languages: languages.iter().map(|s| s.to_string()).collect(),
            pattern,
            templates: templates.iter().map(|s| s.to_string()).collect(),
            group_requirements: None,
            slot_requirements: None,
            attach_attributes_to: Vec::new(),
            add_attributes: HashMap::new(),
        }
    }

    pub fn with_group_requirements(mut self, requirements: fn(&[&str]) -> bool) -> Self {
        self.group_requirements = Some(requirements);
        self
    }

    pub fn with_slot_requirements(mut self, requirements: fn(&Slot) -> bool) -> Self {
        self.slot_requirements = Some(requirements);
        self
    }

    pub fn with_attach_attributes_to(mut self, positions: &[usize]) -> Self {
        self.attach_attributes_to = positions.to_vec();
        self
    }

    pub fn with_add_attributes(
        mut self,
        position: usize,
        attributes: &[(&str, &str)],
    ) -> Self {
        self.add_attributes.insert(
            position,
            attributes
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        );
        self
    }
}

impl SlotRealizerComponent for RegexRealizer {
    fn supports(&self, language: &str) -> bool {
        self.languages.iter().any(|l| l == language || l == "ANY")
    }

    fn realize(&self, slot: &Slot, rng: &mut StdRng) -> Option<Vec<TemplateComponent>> {
        let value = slot.value();
        let captures = self.pattern.captures(&value)?;
        // Full match only
        if captures.get(0).map(|m| m.as_str()) != Some(value.as_str()) {
            return None;
        }

        let groups: Vec<&str> = (1..captures.len())
            .map(|i| captures.get(i).map(|m| m.as_str()).unwrap_or(""))
            .collect();

        if let Some(requirements) = self.group_requirements {
            if !requirements(&groups) {
                return None;
            }
        }
        if let Some(requirements) = self.slot_requirements {
            if !requirements(slot) {
                return None;
            }
        }

        let template = self.templates.choose(rng)?;
        let phrase = format_groups(template, &groups);
        debug!("Realized '{}' as '{}'", value, phrase);

        Some(tokenize_into_slots(
            slot,
            &phrase,
            &self.attach_attributes_to,
            &self.add_attributes,
        ))
    }
}

/// Rewrites slots by exact dictionary lookup on their string value.
pub struct LookupRealizer {
    languages: Vec<String>,
    dictionary: HashMap<String, String>,
    attach_attributes_to: Vec<usize>,
}

impl LookupRealizer {
    pub fn new(languages: &[&str], entries: &[(&str, &str)]) -> Self {
        Self {
            languages: languages.iter().map(|s| s.to_string()).collect(),
            dictionary: entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            attach_attributes_to: Vec::new(),
        }
    }

    pub fn with_attach_attributes_to(mut self, positions: &[usize]) -> Self {
        self.attach_attributes_to = positions.to_vec();
        self
    }
}

impl SlotRealizerComponent for LookupRealizer {
    fn supports(&self, language: &str) -> bool {
        self.languages.iter().any(|l| l == language || l == "ANY")
    }

    fn realize(&self, slot: &Slot, _rng: &mut StdRng) -> Option<Vec<TemplateComponent>> {
        let phrase = self.dictionary.get(&slot.value())?.clone();
        debug!("Looked up '{}' as '{}'", slot.value(), phrase);
        Some(tokenize_into_slots(
            slot,
            &phrase,
            &self.attach_attributes_to,
            &HashMap::new(),
        ))
    }
}
