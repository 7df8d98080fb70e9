use std::error;
use std::fmt;

use dataset::Document;

pub use self::build::TreeBuilder;
pub use self::node::{Arena, Form, NodeId, Prop, SpanNode};

mod build;
mod node;

/// One constituent of the flat bracketing representation: the EDU span, the
/// nuclearity role and the relation to the parent.
pub type Bracket = ((usize, usize), Prop, Option<String>);

#[derive(Debug)]
pub enum Error {
    Syntax(String),
    UnknownLabel(String),
    MissingChild,
    BadNuclearity(String),
    UnderivableRelation(String),
    MissingEdu(usize),
    Incomplete,
}

impl Error {
    pub fn as_str(&self) -> &'static str {
        match *self {
            Error::Syntax(_) => "malformed bracket structure",
            Error::UnknownLabel(_) => "unrecognized bracket label",
            Error::MissingChild => "node has exactly one child",
            Error::BadNuclearity(_) => "illegal nuclearity combination",
            Error::UnderivableRelation(_) => "cannot derive relation for node",
            Error::MissingEdu(_) => "EDU is missing from the token collection",
            Error::Incomplete => "node metadata has not been propagated",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Syntax(ref detail) |
            Error::BadNuclearity(ref detail) |
            Error::UnderivableRelation(ref detail) => {
                write!(f, "{}: {}", self.as_str(), detail)
            }
            Error::UnknownLabel(ref label) => write!(f, "{}: {}", self.as_str(), label),
            Error::MissingEdu(index) => write!(f, "{}: {}", self.as_str(), index),
            _ => write!(f, "{}", self.as_str()),
        }
    }
}

impl error::Error for Error {
    fn description(&self) -> &str {
        self.as_str()
    }
}

/// An RST discourse tree over an arena of span nodes.
///
/// A finalized tree (built by [`TreeBuilder`] or returned by a parse) is
/// treated as immutable by downstream readers.
#[derive(Debug)]
pub struct RstTree {
    pub(crate) arena: Arena,
    pub(crate) root: NodeId,
}

impl RstTree {
    pub(crate) fn new(arena: Arena, root: NodeId) -> Self {
        RstTree {
            arena: arena,
            root: root,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn node(&self, id: NodeId) -> &SpanNode {
        &self.arena[id]
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Breadth-first traversal over the binary tree.
    pub fn bft(&self) -> Vec<NodeId> {
        let mut queue = vec![self.root];
        let mut order = vec![];
        let mut head = 0;
        while head < queue.len() {
            let id = queue[head];
            head += 1;
            order.push(id);
            if let Some(lnode) = self.arena[id].lnode {
                queue.push(lnode);
            }
            if let Some(rnode) = self.arena[id].rnode {
                queue.push(rnode);
            }
        }
        order
    }

    /// Post-order traversal over the binary tree.
    pub fn postorder(&self) -> Vec<NodeId> {
        let mut order = vec![];
        self.collect_postorder(self.root, &mut order);
        order
    }

    fn collect_postorder(&self, id: NodeId, order: &mut Vec<NodeId>) {
        if let Some(lnode) = self.arena[id].lnode {
            self.collect_postorder(lnode, order);
        }
        if let Some(rnode) = self.arena[id].rnode {
            self.collect_postorder(rnode, order);
        }
        order.push(id);
    }

    /// EDU leaves in reading order.
    pub fn edu_nodes(&self) -> Vec<NodeId> {
        self.postorder()
            .into_iter()
            .filter(|&id| self.arena[id].is_leaf())
            .collect()
    }

    /// Flat constituent list for structural evaluation, excluding the root.
    pub fn bracketing(&self) -> Result<Vec<Bracket>, Error> {
        let mut order = self.postorder();
        order.pop();
        let mut brackets = Vec::with_capacity(order.len());
        for id in order {
            let node = &self.arena[id];
            let eduspan = node.eduspan.ok_or(Error::Incomplete)?;
            let prop = node.prop.ok_or(Error::Incomplete)?;
            brackets.push((eduspan, prop, node.relation.clone()));
        }
        Ok(brackets)
    }

    /// Renders the tree back into the bracketed annotation grammar.
    pub fn to_text(&self, doc: &Document) -> String {
        let mut out = String::new();
        self.write_node(self.root, doc, 0, &mut out);
        out
    }

    fn write_node(&self, id: NodeId, doc: &Document, indent: usize, out: &mut String) {
        let node = &self.arena[id];
        let prefix = "  ".repeat(indent);
        let prop = node.prop.unwrap_or(Prop::Root);
        out.push_str(&format!("{}({}\n", prefix, prop));
        if let Some((begin, end)) = node.eduspan {
            if node.is_leaf() {
                out.push_str(&format!("{}  (leaf {})\n", prefix, begin));
            } else {
                out.push_str(&format!("{}  (span {} {})\n", prefix, begin, end));
            }
        }
        if let Some(ref relation) = node.relation {
            out.push_str(&format!("{}  (rel2par {})\n", prefix, relation));
        }
        if let Some(lnode) = node.lnode {
            self.write_node(lnode, doc, indent + 1, out);
        }
        if let Some(rnode) = node.rnode {
            self.write_node(rnode, doc, indent + 1, out);
        }
        if node.is_leaf() {
            let words: Vec<&str> = node.text
                .iter()
                .filter_map(|&gidx| doc.token(gidx).map(|t| t.word()))
                .collect();
            out.push_str(&format!("{}  (text _!{}_!)\n", prefix, words.join(" ")));
        }
        out.push_str(&format!("{})\n", prefix));
    }
}
