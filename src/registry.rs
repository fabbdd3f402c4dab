use std::collections::HashMap;

use crate::model::Template;
use crate::realizer::morphology::MorphologicalCapability;
use crate::realizer::slots::SlotRealizerComponent;

/// Connective words the aggregator splices between merged sentences.
#[derive(Debug, Clone)]
pub struct ConjunctionTable {
    pub default_combiner: String,
    pub inverse_combiner: String,
    pub subord_clause_start: String,
    pub comparator: String,
}

impl ConjunctionTable {
    /// Loud placeholders for languages without a table; generation keeps
    /// going but the gap is visible in the output.
    pub fn missing() -> Self {
        Self {
            default_combiner: "MISSING-DEFAULT-CONJUNCTION".to_string(),
            inverse_combiner: "MISSING-INVERSE-CONJUNCTION".to_string(),
            subord_clause_start: String::new(),
            comparator: String::new(),
        }
    }
}

/// Canned user-facing strings for degraded output.
#[derive(Debug, Clone)]
pub struct ErrorStrings {
    pub no_messages_for_selection: String,
    pub general_error: String,
    pub no_template: String,
}

impl ErrorStrings {
    pub fn fallback() -> Self {
        Self {
            no_messages_for_selection: "<p>We are unable to write an article on your selection.</p>"
                .to_string(),
            general_error: "<p>Something went wrong. Please try again later.</p>".to_string(),
            no_template: String::new(),
        }
    }
}

/// Month names and phrasing patterns for date realization. Expressions use
/// `{month}` and `{year}` placeholders.
#[derive(Debug, Clone)]
pub struct DateVocab {
    pub months: HashMap<String, String>,
    pub month_reference_options: Vec<String>,
    pub year_reference_options: Vec<String>,
    pub month_expression: String,
    pub month_year_expression: String,
    pub year_expression: String,
    /// Token positions that keep the original slot attributes per
    /// timestamp type; unset keeps attributes on every token.
    pub attach_attributes: Option<HashMap<String, Vec<usize>>>,
}

/// How to render one entity name variant.
#[derive(Debug, Clone)]
pub enum NameVariantSource {
    Dictionary(HashMap<String, String>),
    Options(Vec<String>),
}

/// Per-entity-type tables for the three reference forms.
#[derive(Debug, Clone)]
pub struct EntityNames {
    pub full: NameVariantSource,
    pub short: NameVariantSource,
    pub pronoun: NameVariantSource,
}

/// Ordinal word tables, keyed by the stringified number.
#[derive(Debug, Clone, Default)]
pub struct OrdinalTable {
    pub small: HashMap<String, String>,
    /// Rendering for numbers beyond the table: "4." style or st/nd/rd/th.
    pub style: OrdinalStyle,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrdinalStyle {
    #[default]
    EnglishSuffix,
    TrailingDot,
}

/// Read-only bundle of every per-language resource the pipeline consumes.
/// Built once, shared by every generation run; templates are cloned out
/// before being filled.
#[derive(Default)]
pub struct Registry {
    templates: HashMap<String, Vec<Template>>,
    slot_realizers: Vec<Box<dyn SlotRealizerComponent>>,
    conjunctions: HashMap<String, ConjunctionTable>,
    errors: HashMap<String, ErrorStrings>,
    date_vocabs: HashMap<String, DateVocab>,
    entity_names: HashMap<(String, String), EntityNames>,
    ordinals: HashMap<String, OrdinalTable>,
    morphologies: HashMap<String, Box<dyn MorphologicalCapability>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_templates(&mut self, language: &str, templates: Vec<Template>) {
        self.templates
            .entry(language.to_string())
            .or_default()
            .extend(templates);
    }

    pub fn templates_for(&self, language: &str) -> Option<&[Template]> {
        self.templates.get(language).map(|t| t.as_slice())
    }

    /// Languages with a registered body template set.
    pub fn languages(&self) -> Vec<String> {
        let mut languages: Vec<String> = self
            .templates
            .keys()
            .filter(|k| !k.ends_with("-head"))
            .cloned()
            .collect();
        languages.sort();
        languages
    }

    pub fn register_slot_realizer(&mut self, realizer: Box<dyn SlotRealizerComponent>) {
        self.slot_realizers.push(realizer);
    }

    pub fn slot_realizers(&self) -> &[Box<dyn SlotRealizerComponent>] {
        &self.slot_realizers
    }

    pub fn register_conjunctions(&mut self, language: &str, table: ConjunctionTable) {
        self.conjunctions.insert(language.to_string(), table);
    }

    pub fn conjunctions_for(&self, language: &str) -> Option<&ConjunctionTable> {
        self.conjunctions.get(language)
    }

    pub fn register_errors(&mut self, language: &str, strings: ErrorStrings) {
        self.errors.insert(language.to_string(), strings);
    }

    pub fn errors_for(&self, language: &str) -> Option<&ErrorStrings> {
        self.errors.get(language)
    }

    pub fn register_date_vocab(&mut self, language: &str, vocab: DateVocab) {
        self.date_vocabs.insert(language.to_string(), vocab);
    }

    pub fn date_vocab_for(&self, language: &str) -> Option<&DateVocab> {
        self.date_vocabs.get(language)
    }

    pub fn register_entity_names(&mut self, language: &str, entity_type: &str, names: EntityNames) {
        self.entity_names
            .insert((language.to_string(), entity_type.to_string()), names);
    }

    pub fn entity_names_for(&self, language: &str, entity_type: &str) -> Option<&EntityNames> {
        self.entity_names
            .get(&(language.to_string(), entity_type.to_string()))
    }

    pub fn register_ordinals(&mut self, language: &str, table: OrdinalTable) {
        self.ordinals.insert(language.to_string(), table);
    }

    pub fn ordinals_for(&self, language: &str) -> Option<&OrdinalTable> {
        self.ordinals.get(language)
    }

    pub fn register_morphology(&mut self, language: &str, capability: Box<dyn MorphologicalCapability>) {
        self.morphologies.insert(language.to_string(), capability);
    }

    pub fn morphology_for(&self, language: &str) -> Option<&dyn MorphologicalCapability> {
        self.morphologies.get(language).map(|m| m.as_ref())
    }
}
