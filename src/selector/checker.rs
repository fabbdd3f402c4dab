use std::collections::HashMap;

use crate::model::{Message, Template};

/// Caches template applicability checks for the duration of one document
/// generation run. The cache is scoped to the run on purpose: facts do not
/// change within a run, so entries cannot go stale, and dropping the
/// checker drops the cache.
#[derive(Debug, Default)]
pub struct TemplateChecker {
    cache: HashMap<(String, usize), bool>,
}

impl TemplateChecker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Indices of the templates able to express `message` given the pool.
    pub fn applicable(
        &mut self,
        templates: &[Template],
        message: &Message,
        pool: &[Message],
    ) -> Vec<usize> {
        let message_key = Self::message_key(message);
        templates
            .iter()
            .enumerate()
            .filter(|(idx, template)| {
                *self
                    .cache
                    .entry((message_key.clone(), *idx))
                    .or_insert_with(|| !template.check(message, pool).is_empty())
            })
            .map(|(idx, _)| idx)
            .collect()
    }

    fn message_key(message: &Message) -> String {
        let fact = message.main_fact();
        format!(
            "{}|{}|{}|{}",
            fact.value_type, fact.location, fact.timestamp, fact.value
        )
    }
}
