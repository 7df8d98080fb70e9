use std::collections::VecDeque;
use std::str::FromStr;

use slog::Logger;

use dataset::Document;
use super::{Error, RstTree};
use super::node::{Arena, Form, NodeId, Prop, SpanNode};

static TEXT_MARKER: &'static str = "_!";
static ESCAPED_LEFT_BRACKET: &'static str = "-LB-";
static ESCAPED_RIGHT_BRACKET: &'static str = "-RB-";

/// The closed set of labels of the bracketed annotation grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Label {
    Root,
    Nucleus,
    Satellite,
    Span,
    Leaf,
    Rel2Par,
    Text,
}

impl FromStr for Label {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Root" => Ok(Label::Root),
            "Nucleus" => Ok(Label::Nucleus),
            "Satellite" => Ok(Label::Satellite),
            "span" => Ok(Label::Span),
            "leaf" => Ok(Label::Leaf),
            "rel2par" => Ok(Label::Rel2Par),
            "text" => Ok(Label::Text),
            _ => Err(Error::UnknownLabel(s.to_string())),
        }
    }
}

/// A parsed value on the builder stack.
#[derive(Debug)]
enum Value {
    Open,
    Word(String),
    Node(NodeId),
    Span(usize, usize),
    Leaf(usize),
    Relation(String),
    Text(String),
}

/// Builds binary RST trees from bracketed annotation text.
#[derive(Debug)]
pub struct TreeBuilder {
    logger: Logger,
}

impl TreeBuilder {
    pub fn new(logger: Logger) -> Self {
        TreeBuilder { logger: logger }
    }

    /// Parses the annotation, binarizes the tree, aligns it with the token
    /// collection and propagates span metadata from the leaves to the root.
    pub fn build(&self, dis: &str, doc: &mut Document) -> Result<RstTree, Error> {
        let mut tree = self.parse(dis)?;
        tree.binarize();
        self.sync(&tree, doc);
        tree.backprop(doc)?;
        Ok(tree)
    }

    /// Parses the annotation into a general (n-ary) tree.
    pub fn parse(&self, dis: &str) -> Result<RstTree, Error> {
        let tokens = tokenize(dis);
        let mut arena = Arena::new();
        let mut stack: Vec<Value> = vec![];
        for token in tokens {
            match token.as_str() {
                "(" => stack.push(Value::Open),
                ")" => reduce(&mut stack, &mut arena)?,
                _ => stack.push(Value::Word(token)),
            }
        }
        if stack.len() != 1 {
            return Err(Error::Syntax(
                format!("unbalanced brackets, {} values left", stack.len()),
            ));
        }
        match stack.pop() {
            Some(Value::Node(root)) => Ok(RstTree::new(arena, root)),
            other => Err(Error::Syntax(format!("no tree at top level: {:?}", other))),
        }
    }

    /// Walks EDU leaves left to right and assigns consecutive global token
    /// indices to each EDU, checking the annotation text against the token
    /// collection. Mismatches are logged, never fatal.
    fn sync(&self, tree: &RstTree, doc: &mut Document) {
        let mut gidx = 0;
        for id in tree.edu_nodes() {
            let node = tree.node(id);
            let (eduidx, raw_text) = match (node.nucedu, node.raw_text.as_ref()) {
                (Some(eduidx), Some(raw_text)) => (eduidx, raw_text),
                _ => continue,
            };
            for word in raw_text.split_whitespace() {
                match doc.token(gidx) {
                    Some(token) => {
                        if word.to_lowercase() != token.word().to_lowercase() {
                            warn!(
                                self.logger, "different tokens";
                                "annotation" => word, "document" => token.word(),
                                "gidx" => gidx
                            );
                        }
                    }
                    None => {
                        warn!(
                            self.logger, "annotation token beyond end of document";
                            "annotation" => word, "gidx" => gidx
                        );
                    }
                }
                doc.push_edu_token(eduidx, gidx);
                gidx += 1;
            }
        }
        if gidx != doc.num_tokens() {
            error!(
                self.logger, "different number of tokens in annotation and document";
                "annotation" => gidx, "document" => doc.num_tokens()
            );
        }
    }
}

fn tokenize(dis: &str) -> Vec<String> {
    let padded = dis.trim()
        .replace('\n', " ")
        .replace('(', " ( ")
        .replace(')', " ) ");
    let mut tokens: Vec<String> = padded.split_whitespace().map(|s| s.to_string()).collect();
    escape_text_brackets(&mut tokens);
    tokens
}

/// Replaces literal parentheses occurring between text markers with escape
/// placeholders so they are not taken for tree brackets.
fn escape_text_brackets(tokens: &mut [String]) {
    let mut within_text = false;
    for token in tokens.iter_mut() {
        if token.matches(TEXT_MARKER).count() % 2 == 1 {
            within_text = !within_text;
        }
        if within_text {
            if token.contains('(') {
                *token = token.replace('(', ESCAPED_LEFT_BRACKET);
            }
            if token.contains(')') {
                *token = token.replace(')', ESCAPED_RIGHT_BRACKET);
            }
        }
    }
}

/// Pops values back to the matching open bracket and dispatches on the label.
fn reduce(stack: &mut Vec<Value>, arena: &mut Arena) -> Result<(), Error> {
    let mut content: Vec<Value> = vec![];
    loop {
        match stack.pop() {
            Some(Value::Open) => break,
            Some(value) => content.push(value),
            None => {
                return Err(Error::Syntax("unmatched closing bracket".to_string()));
            }
        }
    }
    content.reverse();
    if content.len() < 2 {
        return Err(Error::Syntax(format!("bracket content too short: {:?}", content)));
    }
    let label = match content.remove(0) {
        Value::Word(word) => Label::from_str(&word)?,
        other => {
            return Err(Error::Syntax(format!("expected a label, found {:?}", other)));
        }
    };
    let value = match label {
        Label::Root => create_node(Prop::Root, content, arena)?,
        Label::Nucleus => create_node(Prop::Nucleus, content, arena)?,
        Label::Satellite => create_node(Prop::Satellite, content, arena)?,
        Label::Span => {
            let (begin, end) = expect_index_pair(label, content)?;
            Value::Span(begin, end)
        }
        Label::Leaf => Value::Leaf(expect_index(label, content)?),
        Label::Rel2Par => Value::Relation(expect_word(label, content)?),
        Label::Text => Value::Text(create_text(content)?),
    };
    stack.push(value);
    Ok(())
}

/// Builds a span node absorbing already parsed children and markers.
fn create_node(prop: Prop, content: Vec<Value>, arena: &mut Arena) -> Result<Value, Error> {
    let id = arena.alloc(SpanNode::new(Some(prop)));
    for value in content {
        match value {
            Value::Node(child) => {
                arena[id].nodelist.push(child);
                arena[child].pnode = Some(id);
            }
            Value::Span(begin, end) => {
                arena[id].eduspan = Some((begin, end));
            }
            Value::Leaf(eduidx) => {
                arena[id].eduspan = Some((eduidx, eduidx));
                arena[id].nucspan = Some((eduidx, eduidx));
                arena[id].nucedu = Some(eduidx);
            }
            Value::Relation(relation) => {
                arena[id].relation = Some(relation);
            }
            Value::Text(text) => {
                arena[id].raw_text = Some(text);
            }
            other => {
                return Err(Error::Syntax(
                    format!("unexpected value under {}: {:?}", prop, other),
                ));
            }
        }
    }
    Ok(Value::Node(id))
}

/// Joins text tokens, strips the escape markers and lower-cases.
fn create_text(content: Vec<Value>) -> Result<String, Error> {
    let mut words = Vec::with_capacity(content.len());
    for value in content {
        match value {
            Value::Word(word) => words.push(word.replace(TEXT_MARKER, "")),
            other => {
                return Err(Error::Syntax(format!("unexpected value in text: {:?}", other)));
            }
        }
    }
    Ok(words.join(" ").to_lowercase())
}

fn expect_index(label: Label, content: Vec<Value>) -> Result<usize, Error> {
    let mut indices = expect_indices(label, content, 1)?;
    Ok(indices.remove(0))
}

fn expect_index_pair(label: Label, content: Vec<Value>) -> Result<(usize, usize), Error> {
    let indices = expect_indices(label, content, 2)?;
    Ok((indices[0], indices[1]))
}

fn expect_indices(label: Label, content: Vec<Value>, num: usize) -> Result<Vec<usize>, Error> {
    if content.len() != num {
        return Err(Error::Syntax(
            format!("{:?} expects {} values, found {:?}", label, num, content),
        ));
    }
    let mut indices = Vec::with_capacity(num);
    for value in content {
        match value {
            Value::Word(word) => {
                indices.push(word.parse::<usize>().map_err(|e| {
                    Error::Syntax(format!("{:?} index {:?}: {}", label, word, e))
                })?);
            }
            other => {
                return Err(Error::Syntax(
                    format!("{:?} expects an index, found {:?}", label, other),
                ));
            }
        }
    }
    Ok(indices)
}

fn expect_word(label: Label, content: Vec<Value>) -> Result<String, Error> {
    if content.len() != 1 {
        return Err(Error::Syntax(
            format!("{:?} expects one value, found {:?}", label, content),
        ));
    }
    match content.into_iter().next() {
        Some(Value::Word(word)) => Ok(word),
        other => Err(Error::Syntax(
            format!("{:?} expects a word, found {:?}", label, other),
        )),
    }
}

impl RstTree {
    /// Converts the general tree to binary form in place, splitting nodes
    /// with more than two children right-branching. A synthetic node takes
    /// the nuclearity of its first absorbed child and is re-split until
    /// binary.
    pub fn binarize(&mut self) {
        let mut queue = VecDeque::new();
        queue.push_back(self.root);
        while let Some(id) = queue.pop_front() {
            let children = self.arena[id].nodelist.clone();
            for &child in &children {
                queue.push_back(child);
            }
            if children.len() == 2 {
                self.arena[id].lnode = Some(children[0]);
                self.arena[id].rnode = Some(children[1]);
                self.arena[children[0]].pnode = Some(id);
                self.arena[children[1]].pnode = Some(id);
            } else if children.len() > 2 {
                let synthetic_prop = self.arena[children[1]].prop;
                let synthetic = self.arena.alloc(SpanNode::new(synthetic_prop));
                self.arena[synthetic].nodelist = children[1..].to_vec();
                self.arena[id].lnode = Some(children[0]);
                self.arena[id].rnode = Some(synthetic);
                self.arena[children[0]].pnode = Some(id);
                self.arena[synthetic].pnode = Some(id);
                // Keep branching until the synthetic node has two children.
                queue.push_front(synthetic);
            }
            self.arena[id].nodelist.clear();
        }
    }

    /// Propagates metadata from the leaves to the root in reverse
    /// breadth-first order.
    pub fn backprop(&mut self, doc: &Document) -> Result<(), Error> {
        let mut order = self.bft();
        order.reverse();
        for id in order {
            let (lnode, rnode) = (self.arena[id].lnode, self.arena[id].rnode);
            match (lnode, rnode) {
                (Some(lnode), Some(rnode)) => {
                    self.backprop_internal(id, lnode, rnode, doc)?;
                }
                (None, None) => {
                    let eduspan = self.arena[id].eduspan.ok_or(Error::Incomplete)?;
                    self.arena[id].text = collect_text(doc, eduspan)?;
                }
                _ => return Err(Error::MissingChild),
            }
        }
        Ok(())
    }

    fn backprop_internal(
        &mut self,
        id: NodeId,
        lnode: NodeId,
        rnode: NodeId,
        doc: &Document,
    ) -> Result<(), Error> {
        let lspan = self.arena[lnode].eduspan.ok_or(Error::Incomplete)?;
        let rspan = self.arena[rnode].eduspan.ok_or(Error::Incomplete)?;
        let eduspan = (lspan.0, rspan.1);
        self.arena[id].eduspan = Some(eduspan);
        self.arena[id].text = collect_text(doc, eduspan)?;
        if self.arena[id].relation.is_none() && self.arena[id].prop != Some(Prop::Root) {
            let relation = derive_relation(&self.arena[lnode], &self.arena[rnode])?;
            self.arena[id].relation = relation;
        }
        let (form, nucspan, nucedu) = derive_form(&self.arena[lnode], &self.arena[rnode])?;
        self.arena[id].form = Some(form);
        self.arena[id].nucspan = Some(nucspan);
        self.arena[id].nucedu = nucedu;
        Ok(())
    }
}

/// Concatenates the token indices of all EDUs within the span.
fn collect_text(doc: &Document, eduspan: (usize, usize)) -> Result<Vec<usize>, Error> {
    let mut text = vec![];
    for eduidx in eduspan.0..eduspan.1 + 1 {
        let tokens = doc.edu(eduidx).ok_or(Error::MissingEdu(eduidx))?;
        text.extend_from_slice(tokens);
    }
    Ok(text)
}

/// Takes the relation of the nucleus child; for two nuclei, the left one.
fn derive_relation(lnode: &SpanNode, rnode: &SpanNode) -> Result<Option<String>, Error> {
    match (lnode.prop, rnode.prop) {
        (Some(Prop::Nucleus), Some(Prop::Nucleus)) |
        (Some(Prop::Nucleus), Some(Prop::Satellite)) => Ok(lnode.relation.clone()),
        (Some(Prop::Satellite), Some(Prop::Nucleus)) => Ok(rnode.relation.clone()),
        (lprop, rprop) => Err(Error::UnderivableRelation(format!(
            "lnode.prop = {:?}, lnode.eduspan = {:?}, rnode.prop = {:?}, rnode.eduspan = {:?}",
            lprop, lnode.eduspan, rprop, rnode.eduspan,
        ))),
    }
}

fn derive_form(
    lnode: &SpanNode,
    rnode: &SpanNode,
) -> Result<(Form, (usize, usize), Option<usize>), Error> {
    let lspan = lnode.eduspan.ok_or(Error::Incomplete)?;
    let rspan = rnode.eduspan.ok_or(Error::Incomplete)?;
    match (lnode.prop, rnode.prop) {
        (Some(Prop::Nucleus), Some(Prop::Satellite)) => Ok((Form::NS, lspan, lnode.nucedu)),
        (Some(Prop::Satellite), Some(Prop::Nucleus)) => Ok((Form::SN, rspan, rnode.nucedu)),
        (Some(Prop::Nucleus), Some(Prop::Nucleus)) => {
            Ok((Form::NN, (lspan.0, rspan.1), lnode.nucedu))
        }
        (lprop, rprop) => Err(Error::BadNuclearity(
            format!("lnode.prop = {:?}, rnode.prop = {:?}", lprop, rprop),
        )),
    }
}
