use super::Message;

/// Relation holding between the children of a document plan branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Elaboration,
    Exemplification,
    Contrast,
    Sequence,
    List,
}

/// A node in the document plan. The root is a `Branch` whose children are
/// the paragraphs; each paragraph is a `Branch` whose children are the
/// nucleus message followed by its satellites.
#[derive(Debug, Clone)]
pub enum PlanNode {
    Branch {
        relation: Relation,
        children: Vec<PlanNode>,
    },
    Leaf(Message),
}

impl PlanNode {
    pub fn sequence(children: Vec<PlanNode>) -> Self {
        PlanNode::Branch {
            relation: Relation::Sequence,
            children,
        }
    }

    pub fn leaf(message: Message) -> Self {
        PlanNode::Leaf(message)
    }

    /// All message leaves in document order.
    pub fn leaves(&self) -> Vec<&Message> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a Message>) {
        match self {
            PlanNode::Leaf(message) => out.push(message),
            PlanNode::Branch { children, .. } => {
                for child in children {
                    child.collect_leaves(out);
                }
            }
        }
    }

    /// All message leaves in document order, mutable. Realizers use this to
    /// rewrite templates in place while threading state across sentences.
    pub fn leaves_mut(&mut self) -> Vec<&mut Message> {
        let mut out = Vec::new();
        self.collect_leaves_mut(&mut out);
        out
    }

    fn collect_leaves_mut<'a>(&'a mut self, out: &mut Vec<&'a mut Message>) {
        match self {
            PlanNode::Leaf(message) => out.push(message),
            PlanNode::Branch { children, .. } => {
                for child in children {
                    child.collect_leaves_mut(out);
                }
            }
        }
    }

    /// Direct children if this is a branch, otherwise empty.
    pub fn children(&self) -> &[PlanNode] {
        match self {
            PlanNode::Branch { children, .. } => children,
            PlanNode::Leaf(_) => &[],
        }
    }
}
