use serde::{Deserialize, Serialize};

/// A single cell value pulled out of the tabular data. Statistic columns are
/// numeric; identifiers such as timestamps and entity tags are text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Num(f64),
    Text(String),
}

impl FieldValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Num(n) => Some(*n),
            FieldValue::Text(s) => s.parse().ok(),
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // Integral values render without a trailing ".0"
            FieldValue::Num(n) if n.fract() == 0.0 && n.is_finite() => {
                write!(f, "{}", *n as i64)
            }
            FieldValue::Num(n) => write!(f, "{}", n),
            FieldValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Num(n)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

/// One observed statistic. Immutable once extracted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fact {
    pub location: String,
    pub location_type: String,
    pub value: FieldValue,
    pub value_type: String,
    pub agent: String,
    pub agent_type: String,
    pub timestamp: String,
    pub timestamp_type: String,
    pub outlierness: f64,
}

impl Fact {
    /// Project a named field as a display value. Returns `None` for names
    /// that are not fields of a fact.
    pub fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "location" => Some(FieldValue::Text(self.location.clone())),
            "location_type" => Some(FieldValue::Text(self.location_type.clone())),
            "value" => Some(self.value.clone()),
            "value_type" => Some(FieldValue::Text(self.value_type.clone())),
            "agent" => Some(FieldValue::Text(self.agent.clone())),
            "agent_type" => Some(FieldValue::Text(self.agent_type.clone())),
            "timestamp" => Some(FieldValue::Text(self.timestamp.clone())),
            "timestamp_type" => Some(FieldValue::Text(self.timestamp_type.clone())),
            "outlierness" => Some(FieldValue::Num(self.outlierness)),
            _ => None,
        }
    }

    pub fn is_field(name: &str) -> bool {
        matches!(
            name,
            "location"
                | "location_type"
                | "value"
                | "value_type"
                | "agent"
                | "agent_type"
                | "timestamp"
                | "timestamp_type"
                | "outlierness"
        )
    }
}
