use std::collections::VecDeque;
use std::error;
use std::fmt;
use std::str::FromStr;

use dataset::Document;
use tree::{Arena, Form, NodeId, Prop, RstTree, SpanNode};

/// A shift-reduce parsing action.
///
/// A reduce action carries the nuclearity form of the merged span and the
/// discourse relation assigned to its satellite (or, for `NN`, to both
/// children).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Shift,
    Reduce(Form, String),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Action::Shift => write!(f, "shift"),
            Action::Reduce(form, ref relation) => write!(f, "reduce-{}-{}", form, relation),
        }
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let items: Vec<&str> = s.splitn(3, '-').collect();
        match items.len() {
            1 if items[0] == "shift" => Ok(Action::Shift),
            3 if items[0] == "reduce" => {
                let form = Form::from_str(items[1])?;
                Ok(Action::Reduce(form, items[2].to_string()))
            }
            _ => Err(format!("unrecognized action label: {}", s)),
        }
    }
}

#[derive(Debug)]
pub enum Error {
    /// Shift with an empty queue; recoverable.
    EmptyQueue,
    /// Reduce with fewer than two spans on the stack; recoverable.
    StackExhausted,
    /// Both stack and queue empty outside the terminal state.
    IllegalState,
    /// A node on the stack is missing derived metadata.
    Corrupted,
    /// No candidate action was legal in the current state.
    NoAction,
    /// The tree cannot be decoded into an action sequence.
    Undecodable,
}

impl Error {
    pub fn as_str(&self) -> &'static str {
        match *self {
            Error::EmptyQueue => "shift action with an empty queue",
            Error::StackExhausted => "reduce action with fewer than two spans",
            Error::IllegalState => "illegal stack/queue status",
            Error::Corrupted => "span node metadata is missing",
            Error::NoAction => "no action could be performed",
            Error::Undecodable => "cannot decode shift-reduce actions",
        }
    }

    /// Whether the parse loop may fall back to another candidate action.
    pub fn is_recoverable(&self) -> bool {
        match *self {
            Error::EmptyQueue | Error::StackExhausted => true,
            _ => false,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl error::Error for Error {
    fn description(&self) -> &str {
        self.as_str()
    }
}

/// A state snapshot handed to the model and the feature extractor: the two
/// topmost stack spans, the queue head and the document they belong to.
#[derive(Debug, Clone, Copy)]
pub struct Sample<'a> {
    pub stack1: Option<&'a SpanNode>,
    pub stack2: Option<&'a SpanNode>,
    pub queue1: Option<&'a SpanNode>,
    pub doc: &'a Document,
}

/// The mutable state of one shift-reduce parse.
///
/// The stack and queue together always partition the EDU leaves of the
/// document. Each parse owns its state exclusively.
#[derive(Debug)]
pub struct State {
    arena: Arena,
    stack: Vec<NodeId>,
    queue: VecDeque<NodeId>,
    actions: Vec<Action>,
}

impl State {
    /// Creates a state whose queue holds the given EDU leaves in order.
    pub fn new(leaves: Vec<SpanNode>) -> Self {
        let num_leaves = leaves.len();
        let mut arena = Arena::new();
        let mut queue = VecDeque::with_capacity(num_leaves);
        for leaf in leaves {
            queue.push_back(arena.alloc(leaf));
        }
        State {
            arena: arena,
            stack: Vec::with_capacity(num_leaves),
            queue: queue,
            actions: Vec::with_capacity(estimate_num_actions(num_leaves)),
        }
    }

    pub fn stack_size(&self) -> usize {
        self.stack.len()
    }

    pub fn queue_size(&self) -> usize {
        self.queue.len()
    }

    /// The node at `position` from the top of the stack (0 = topmost).
    pub fn stack(&self, position: usize) -> Option<&SpanNode> {
        let stack_size = self.stack.len();
        if position < stack_size {
            self.stack.get(stack_size - 1 - position).map(
                |&id| &self.arena[id],
            )
        } else {
            None
        }
    }

    pub fn stack_top(&self) -> Option<&SpanNode> {
        self.stack(0)
    }

    pub fn queue_head(&self) -> Option<&SpanNode> {
        self.queue.front().map(|&id| &self.arena[id])
    }

    pub(crate) fn stack_id(&self, position: usize) -> Option<NodeId> {
        let stack_size = self.stack.len();
        if position < stack_size {
            self.stack.get(stack_size - 1 - position).map(|&id| id)
        } else {
            None
        }
    }

    pub(crate) fn queue_head_id(&self) -> Option<NodeId> {
        self.queue.front().map(|&id| id)
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub(crate) fn into_arena(self) -> Arena {
        self.arena
    }

    /// Actions applied so far, in order.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// The current state snapshot.
    pub fn sample<'a>(&'a self, doc: &'a Document) -> Sample<'a> {
        Sample {
            stack1: self.stack(0),
            stack2: self.stack(1),
            queue1: self.queue_head(),
            doc: doc,
        }
    }

    pub fn is_allowed(&self, action: &Action) -> bool {
        match *action {
            Action::Shift => !self.queue.is_empty(),
            Action::Reduce(..) => self.stack.len() >= 2,
        }
    }

    /// Whether parsing is finished: a single span on the stack and an empty
    /// queue. An empty stack with an empty queue signals corrupted state.
    pub fn is_terminal(&self) -> Result<bool, Error> {
        if self.queue.is_empty() {
            match self.stack.len() {
                1 => Ok(true),
                0 => Err(Error::IllegalState),
                _ => Ok(false),
            }
        } else {
            Ok(false)
        }
    }

    /// Applies one action. Recoverable errors leave the state untouched.
    pub fn operate(&mut self, action: &Action) -> Result<(), Error> {
        match *action {
            Action::Shift => {
                let id = self.queue.pop_front().ok_or(Error::EmptyQueue)?;
                self.stack.push(id);
            }
            Action::Reduce(form, ref relation) => {
                self.reduce(form, relation)?;
            }
        }
        self.actions.push(action.clone());
        Ok(())
    }

    fn reduce(&mut self, form: Form, relation: &str) -> Result<(), Error> {
        if self.stack.len() < 2 {
            return Err(Error::StackExhausted);
        }
        let rnode = self.stack[self.stack.len() - 1];
        let lnode = self.stack[self.stack.len() - 2];
        let lspan = self.arena[lnode].eduspan.ok_or(Error::Corrupted)?;
        let rspan = self.arena[rnode].eduspan.ok_or(Error::Corrupted)?;

        let mut node = SpanNode::new(None);
        node.lnode = Some(lnode);
        node.rnode = Some(rnode);
        node.eduspan = Some((lspan.0, rspan.1));
        node.form = Some(form);
        node.text = self.arena[lnode].text.clone();
        node.text.extend_from_slice(&self.arena[rnode].text);
        let (lprop, lrel, rprop, rrel) = match form {
            Form::NN => {
                node.nucspan = Some((lspan.0, rspan.1));
                node.nucedu = self.arena[lnode].nucedu;
                (Prop::Nucleus, relation, Prop::Nucleus, relation)
            }
            Form::NS => {
                node.nucspan = Some(lspan);
                node.nucedu = self.arena[lnode].nucedu;
                (Prop::Nucleus, "span", Prop::Satellite, relation)
            }
            Form::SN => {
                node.nucspan = Some(rspan);
                node.nucedu = self.arena[rnode].nucedu;
                (Prop::Satellite, relation, Prop::Nucleus, "span")
            }
        };
        let id = self.arena.alloc(node);
        self.stack.pop();
        self.stack.pop();
        {
            let lchild = &mut self.arena[lnode];
            lchild.prop = Some(lprop);
            lchild.relation = Some(lrel.to_string());
            lchild.pnode = Some(id);
        }
        {
            let rchild = &mut self.arena[rnode];
            rchild.prop = Some(rprop);
            rchild.relation = Some(rrel.to_string());
            rchild.pnode = Some(id);
        }
        self.stack.push(id);
        Ok(())
    }

    /// Consumes a terminal state and returns the parse tree.
    pub fn into_tree(self) -> Result<RstTree, Error> {
        if self.queue.is_empty() && self.stack.len() == 1 {
            let root = self.stack[0];
            Ok(RstTree::new(self.arena, root))
        } else {
            Err(Error::IllegalState)
        }
    }
}

/// A parse over `n` EDUs takes exactly `n` shifts and `n - 1` reduces.
pub fn estimate_num_actions(num_edus: usize) -> usize {
    if num_edus == 0 { 0 } else { 2 * num_edus - 1 }
}
