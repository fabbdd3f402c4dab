//! Built-in language packs: pre-parsed template sets, slot realizer
//! components, and vocabulary tables. The raw template text syntax lives
//! outside the pipeline; packs construct `Template` values directly
//! through the small builder below.

mod english;
mod finnish;

use crate::error::ConfigError;
use crate::model::{
    LhsExpr, Matcher, MatcherOp, RhsValue, Rule, Slot, SlotSource, Template, TemplateComponent,
};
use crate::registry::Registry;

/// Assemble the registry with every built-in pack.
pub fn standard_registry() -> Result<Registry, ConfigError> {
    let mut registry = Registry::new();
    english::register(&mut registry)?;
    finnish::register(&mut registry)?;
    Ok(registry)
}

/// Accumulates components and remembers which of them are slots to be
/// filled by the template's primary rule.
pub(crate) struct TemplateBuilder {
    components: Vec<TemplateComponent>,
    slot_indices: Vec<usize>,
}

impl TemplateBuilder {
    pub fn new() -> Self {
        Self {
            components: Vec::new(),
            slot_indices: Vec::new(),
        }
    }

    /// Append literal words, one component per whitespace-separated token.
    pub fn lit(mut self, text: &str) -> Self {
        for word in text.split_whitespace() {
            self.components.push(TemplateComponent::literal(word));
        }
        self
    }

    pub fn slot(self, source: SlotSource) -> Self {
        self.slot_with(source, &[])
    }

    pub fn slot_with(mut self, source: SlotSource, attributes: &[(&str, &str)]) -> Self {
        self.slot_indices.push(self.components.len());
        self.components.push(TemplateComponent::slot(
            Slot::with_attributes(source, attributes.iter().copied()),
        ));
        self
    }

    /// Finish with a single rule over the accumulated slots.
    pub fn build(self, matchers: Vec<Matcher>) -> Template {
        Template::new(
            self.components,
            vec![Rule {
                matchers,
                slot_indices: self.slot_indices,
            }],
        )
    }
}

pub(crate) fn field(name: &str) -> SlotSource {
    SlotSource::Field(name.to_string())
}

pub(crate) fn vt_matches(pattern: &str) -> Result<Matcher, ConfigError> {
    Matcher::new(
        LhsExpr::Field("value_type".to_string()),
        MatcherOp::Eq,
        RhsValue::Text(pattern.to_string()),
    )
}

pub(crate) fn vt_differs(pattern: &str) -> Result<Matcher, ConfigError> {
    Matcher::new(
        LhsExpr::Field("value_type".to_string()),
        MatcherOp::Ne,
        RhsValue::Text(pattern.to_string()),
    )
}

pub(crate) fn value_compares(op: MatcherOp, rhs: f64) -> Result<Matcher, ConfigError> {
    Matcher::new(
        LhsExpr::Field("value".to_string()),
        op,
        RhsValue::Num(rhs),
    )
}

/// Expand a sentence body into its four prefix variants: with and without
/// the leading "[in {time},]" and "[in {location},]" segments. `in_word`
/// is the language's preposition for the prefix phrases; an empty string
/// omits it.
pub(crate) fn prefix_variants(
    in_word: &str,
    body: impl Fn(TemplateBuilder) -> TemplateBuilder,
    matchers: &[Matcher],
) -> Vec<Template> {
    let mut templates = Vec::new();
    for with_time in [true, false] {
        for with_location in [true, false] {
            let mut builder = TemplateBuilder::new();
            if with_time {
                if !in_word.is_empty() {
                    builder = builder.lit(in_word);
                }
                builder = builder.slot(SlotSource::Time).lit(",");
            }
            if with_location {
                if !in_word.is_empty() {
                    builder = builder.lit(in_word);
                }
                builder = builder.slot(field("location")).lit(",");
            }
            templates.push(body(builder).build(matchers.to_vec()));
        }
    }
    templates
}
