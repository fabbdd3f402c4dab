use std::collections::BTreeMap;

use super::{Fact, Matcher, Message};

/// How a slot pulls its display value from the bound fact.
#[derive(Debug, Clone)]
pub enum SlotSource {
    /// Project a named fact field.
    Field(String),
    /// Ignore the fact and produce a fixed string.
    Literal(String),
    /// Render the fact's timestamp as a `[TIME:type:value]` tag for the
    /// date realizer.
    Time,
    /// Render the fact's value type as a `[UNIT:...]` tag for the unit
    /// realizers.
    Unit,
}

impl SlotSource {
    pub fn field_name(&self) -> &str {
        match self {
            SlotSource::Field(name) => name,
            SlotSource::Literal(_) => "literal",
            SlotSource::Time => "time",
            SlotSource::Unit => "unit",
        }
    }
}

/// A template placeholder. Starts out unresolved (value computed from the
/// source and the bound fact); realizers overwrite it with rendered text.
#[derive(Debug, Clone)]
pub struct Slot {
    pub source: SlotSource,
    pub attributes: BTreeMap<String, String>,
    pub fact: Option<Fact>,
    resolved: Option<String>,
}

impl Slot {
    pub fn new(source: SlotSource) -> Self {
        Self {
            source,
            attributes: BTreeMap::new(),
            fact: None,
            resolved: None,
        }
    }

    pub fn with_attributes<I, K, V>(source: SlotSource, attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            source,
            attributes: attributes
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            fact: None,
            resolved: None,
        }
    }

    /// The underlying field name, used for type-based filtering and for the
    /// aggregation prefix comparison.
    pub fn slot_type(&self) -> &str {
        self.source.field_name()
    }

    /// Current display value. Realized text wins; otherwise the value is
    /// computed from the source and the bound fact. An unbound field slot
    /// renders as empty.
    pub fn value(&self) -> String {
        if let Some(text) = &self.resolved {
            return text.clone();
        }
        match (&self.source, &self.fact) {
            (SlotSource::Literal(text), _) => text.clone(),
            (SlotSource::Field(name), Some(fact)) => fact
                .field(name)
                .map(|v| v.to_string())
                .unwrap_or_default(),
            (SlotSource::Time, Some(fact)) => {
                format!("[TIME:{}:{}]", fact.timestamp_type, fact.timestamp)
            }
            (SlotSource::Unit, Some(fact)) => format!("[UNIT:{}]", fact.value_type),
            (_, None) => String::new(),
        }
    }

    /// Overwrite the display value with realized text.
    pub fn set_value(&mut self, text: impl Into<String>) {
        self.resolved = Some(text.into());
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }
}

/// A literal token in a template.
#[derive(Debug, Clone)]
pub struct Literal {
    pub text: String,
}

#[derive(Debug, Clone)]
pub enum TemplateComponent {
    Literal(Literal),
    Slot(Slot),
}

impl TemplateComponent {
    pub fn literal(text: impl Into<String>) -> Self {
        TemplateComponent::Literal(Literal { text: text.into() })
    }

    pub fn slot(slot: Slot) -> Self {
        TemplateComponent::Slot(slot)
    }

    pub fn value(&self) -> String {
        match self {
            TemplateComponent::Literal(lit) => lit.text.clone(),
            TemplateComponent::Slot(slot) => slot.value(),
        }
    }

    pub fn as_slot(&self) -> Option<&Slot> {
        match self {
            TemplateComponent::Slot(slot) => Some(slot),
            TemplateComponent::Literal(_) => None,
        }
    }

    /// The `case` attribute if this is a slot carrying one; literals have
    /// no attributes.
    pub fn case_attribute(&self) -> &str {
        match self {
            TemplateComponent::Slot(slot) => slot
                .attributes
                .get("case")
                .map(|s| s.as_str())
                .unwrap_or(""),
            TemplateComponent::Literal(_) => "",
        }
    }
}

/// One fact-matching rule: a conjunction of matchers plus the indices of
/// the components (slots) filled by the matching fact.
#[derive(Debug, Clone)]
pub struct Rule {
    pub matchers: Vec<Matcher>,
    pub slot_indices: Vec<usize>,
}

/// An ordered sequence of components plus the rules describing which facts
/// the template can express. Registered templates are shared blueprints;
/// they are cloned before being filled for a particular message.
#[derive(Debug, Clone)]
pub struct Template {
    pub components: Vec<TemplateComponent>,
    pub rules: Vec<Rule>,
}

impl Template {
    pub fn new(components: Vec<TemplateComponent>, rules: Vec<Rule>) -> Self {
        Self { components, rules }
    }

    /// A canned single-literal template, used as the fallback when filling
    /// unexpectedly fails after selection.
    pub fn canned(text: impl Into<String>) -> Self {
        Self {
            components: vec![TemplateComponent::literal(text)],
            rules: Vec::new(),
        }
    }

    pub fn has_slot_of_type(&self, slot_type: &str) -> bool {
        self.components
            .iter()
            .filter_map(|c| c.as_slot())
            .any(|s| s.slot_type() == slot_type)
    }

    /// Whether this template can express `primary`, given the other
    /// available messages. Returns the facts each rule consumed, in rule
    /// order, or an empty list when some rule cannot be satisfied.
    /// Side-effect free: no slot is bound.
    pub fn check(&self, primary: &Message, pool: &[Message]) -> Vec<Fact> {
        match self.match_rules(primary, pool) {
            Some((facts, _)) => facts,
            None => Vec::new(),
        }
    }

    /// Like `check`, but additionally binds the matched facts into the
    /// slots named by each rule. Returns the consumed facts, or an empty
    /// list (and no bindings) when the rules cannot be satisfied.
    pub fn fill(&mut self, primary: &Message, pool: &[Message]) -> Vec<Fact> {
        let (facts, bindings) = match self.match_rules(primary, pool) {
            Some(result) => result,
            None => return Vec::new(),
        };
        for (idx, fact) in bindings {
            if let Some(TemplateComponent::Slot(slot)) = self.components.get_mut(idx) {
                slot.fact = Some(fact);
            }
        }
        facts
    }

    /// The shared matching engine. The first rule must match the primary
    /// fact; each later rule takes the first pool message whose primary
    /// fact satisfies it, with facts consumed by earlier rules visible to
    /// referential constraints. A fact already consumed is not repeated in
    /// the result but may still satisfy a later rule.
    fn match_rules(
        &self,
        primary: &Message,
        pool: &[Message],
    ) -> Option<(Vec<Fact>, Vec<(usize, Fact)>)> {
        let first_rule = self.rules.first()?;
        let primary_fact = primary.main_fact();

        let mut used: Vec<Fact> = Vec::new();
        let mut bindings: Vec<(usize, Fact)> = Vec::new();

        if !first_rule
            .matchers
            .iter()
            .all(|m| m.matches(primary_fact, &used))
        {
            return None;
        }
        for &idx in &first_rule.slot_indices {
            bindings.push((idx, primary_fact.clone()));
        }
        used.push(primary_fact.clone());

        for rule in &self.rules[1..] {
            let mut matched = false;
            for candidate in pool {
                let fact = candidate.main_fact();
                if rule.matchers.iter().all(|m| m.matches(fact, &used)) {
                    for &idx in &rule.slot_indices {
                        bindings.push((idx, fact.clone()));
                    }
                    if !used.contains(fact) {
                        used.push(fact.clone());
                    }
                    matched = true;
                    break;
                }
            }
            if !matched {
                return None;
            }
        }

        Some((used, bindings))
    }

    /// Space-joined component values, mainly for logging.
    pub fn display(&self) -> String {
        self.components
            .iter()
            .map(|c| c.value())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
