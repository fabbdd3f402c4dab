mod fact;
mod matcher;
mod message;
mod plan;
mod template;

pub use fact::{Fact, FieldValue};
pub use matcher::{LhsExpr, Matcher, MatcherOp, RhsValue};
pub use message::Message;
pub use plan::{PlanNode, Relation};
pub use template::{Literal, Rule, Slot, SlotSource, Template, TemplateComponent};
