//! Morphological realization sits behind a narrow capability interface:
//! a real analyzer, a model, or a dictionary can all hide behind it. The
//! built-in English capability only handles the genitive; languages
//! without a capability pass through with a warning.

use tracing::warn;

use crate::model::{PlanNode, Slot, TemplateComponent};

/// Per-language inflection capability. Returning `None` leaves the slot
/// untouched.
pub trait MorphologicalCapability: Send + Sync {
    fn realize(&self, slot: &Slot) -> Option<String>;
}

pub struct MorphologicalRealizer;

impl MorphologicalRealizer {
    pub fn realize(
        &self,
        plan: &mut PlanNode,
        language: &str,
        capability: Option<&dyn MorphologicalCapability>,
    ) {
        let capability = match capability {
            Some(capability) => capability,
            None => {
                warn!("No morphological realizer for language '{}'", language);
                return;
            }
        };

        for message in plan.leaves_mut() {
            let template = match message.template.as_mut() {
                Some(template) => template,
                None => continue,
            };
            for component in template.components.iter_mut() {
                if let TemplateComponent::Slot(slot) = component {
                    if let Some(inflected) = capability.realize(slot) {
                        slot.set_value(inflected);
                    }
                }
            }
        }
    }
}

/// Suffix-based English inflection, enough for the case attributes the
/// built-in templates use.
pub struct EnglishMorphology;

impl MorphologicalCapability for EnglishMorphology {
    fn realize(&self, slot: &Slot) -> Option<String> {
        let case = slot.attributes.get("case")?;
        let value = slot.value();
        if value.is_empty() {
            return None;
        }
        match case.as_str() {
            "gen" => {
                if value.ends_with('s') {
                    Some(format!("{}'", value))
                } else {
                    Some(format!("{}'s", value))
                }
            }
            _ => None,
        }
    }
}

/// Placeholder for languages whose analyzer is not wired in; values pass
/// through uninflected.
pub struct PassthroughMorphology;

impl MorphologicalCapability for PassthroughMorphology {
    fn realize(&self, _slot: &Slot) -> Option<String> {
        None
    }
}
