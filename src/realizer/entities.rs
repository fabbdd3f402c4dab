//! Entity name resolution: rewrites `[ENTITY:type:id]` tags into surface
//! names, choosing between full name, short name and pronoun based on what
//! the reader has already seen. First mention gets the full name; a repeat
//! mention of an entity seen earlier gets the short form; an immediate
//! repeat of the same entity gets a pronoun. State resets per document.

use std::collections::{HashMap, HashSet};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use regex::Regex;
use tracing::{debug, error};

use crate::model::PlanNode;
use crate::registry::{NameVariantSource, Registry};

pub struct EntityNameResolver {
    tag: Regex,
}

impl EntityNameResolver {
    pub fn new() -> Result<Self, crate::error::ConfigError> {
        Ok(Self {
            tag: Regex::new(r"^\[ENTITY:([^:]+):([^\]]+)\]$")?,
        })
    }

    pub fn realize(
        &self,
        plan: &mut PlanNode,
        registry: &Registry,
        language: &str,
        rng: &mut StdRng,
    ) {
        // Reference state is keyed per entity type and lives for exactly
        // one document.
        let mut previous: HashMap<String, String> = HashMap::new();
        let mut encountered: HashSet<String> = HashSet::new();

        for message in plan.leaves_mut() {
            let template = match message.template.as_mut() {
                Some(template) => template,
                None => continue,
            };

            for component in template.components.iter_mut() {
                let slot = match component {
                    crate::model::TemplateComponent::Slot(slot) => slot,
                    crate::model::TemplateComponent::Literal(_) => continue,
                };
                let value = slot.value();
                let captures = match self.tag.captures(&value) {
                    Some(captures) => captures,
                    None => continue,
                };
                let entity_type = captures[1].to_string();
                let entity = captures[2].to_string();

                let name_type = if previous.get(&entity_type) == Some(&entity) {
                    "pronoun"
                } else if encountered.contains(&entity) {
                    "short"
                } else {
                    encountered.insert(entity.clone());
                    "full"
                };
                debug!(
                    "Entity '{}' of type '{}' referenced as {}",
                    entity, entity_type, name_type
                );

                slot.attributes
                    .insert("name_type".to_string(), name_type.to_string());
                slot.attributes
                    .insert("entity_type".to_string(), entity_type.clone());

                match registry.entity_names_for(language, &entity_type) {
                    Some(names) => {
                        let source = match name_type {
                            "pronoun" => &names.pronoun,
                            "short" => &names.short,
                            _ => &names.full,
                        };
                        let surface = resolve_surface(source, &entity, rng);
                        debug!("Resolved '{}' as '{}'", entity, surface);
                        slot.set_value(surface);
                    }
                    None => {
                        error!(
                            "No entity name table for language '{}' and type '{}'",
                            language, entity_type
                        );
                    }
                }

                previous.insert(entity_type, entity);
            }
        }
    }
}

fn resolve_surface(source: &NameVariantSource, entity: &str, rng: &mut StdRng) -> String {
    match source {
        NameVariantSource::Dictionary(dictionary) => dictionary
            .get(entity)
            .cloned()
            .unwrap_or_else(|| format!("UNKNOWN-ENTITY:{}", entity)),
        NameVariantSource::Options(options) => options
            .choose(rng)
            .cloned()
            .unwrap_or_else(|| format!("UNKNOWN-ENTITY:{}", entity)),
    }
}
