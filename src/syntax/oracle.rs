//! Gold action decoding and training-sample generation.

use dataset::Document;
use tree::{Arena, Form, NodeId, RstTree, SpanNode};
use syntax::transition::{Action, Error, Sample, State};

/// Reads the gold shift-reduce action sequence off a binary tree.
///
/// Post-order traversal: a leaf yields a shift; an internal node yields a
/// reduce whose relation is taken from the nucleus child (the right child
/// for `NN` and `NS`, the left child for `SN`), mirroring the reduce
/// semantics so that replaying the sequence reconstructs the same tree.
pub fn decode_actions(tree: &RstTree) -> Result<Vec<Action>, Error> {
    let order = tree.postorder();
    let mut actions = Vec::with_capacity(order.len());
    for id in order {
        let node = tree.node(id);
        match (node.lnode, node.rnode) {
            (None, None) => actions.push(Action::Shift),
            (Some(lnode), Some(rnode)) => {
                let form = node.form.ok_or(Error::Undecodable)?;
                let relation_node = match form {
                    Form::NN | Form::NS => tree.node(rnode),
                    Form::SN => tree.node(lnode),
                };
                let relation = relation_node.relation.clone().ok_or(Error::Undecodable)?;
                actions.push(Action::Reduce(form, relation));
            }
            _ => return Err(Error::Undecodable),
        }
    }
    Ok(actions)
}

/// The state snapshot recorded before one gold action, as indices into the
/// replay arena of a [`SampleSet`].
#[derive(Debug, Clone, Copy)]
pub struct Snapshot {
    pub stack1: Option<NodeId>,
    pub stack2: Option<NodeId>,
    pub queue1: Option<NodeId>,
}

/// Gold actions paired with the state snapshots observed before each of
/// them; the supervised training signal for the model.
#[derive(Debug)]
pub struct SampleSet {
    arena: Arena,
    actions: Vec<Action>,
    snapshots: Vec<Snapshot>,
}

impl SampleSet {
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Resolves the `index`-th snapshot against the replay arena.
    pub fn sample<'a>(&'a self, index: usize, doc: &'a Document) -> Option<Sample<'a>> {
        self.snapshots.get(index).map(|snapshot| {
            Sample {
                stack1: snapshot.stack1.and_then(|id| self.arena.get(id)),
                stack2: snapshot.stack2.and_then(|id| self.arena.get(id)),
                queue1: snapshot.queue1.and_then(|id| self.arena.get(id)),
                doc: doc,
            }
        })
    }
}

/// Replays a gold binary tree through a fresh transition state and records
/// one `(snapshot, action)` pair per step.
pub fn generate_samples(tree: &RstTree) -> Result<SampleSet, Error> {
    let actions = decode_actions(tree)?;
    let leaves = tree.edu_nodes()
        .into_iter()
        .map(|id| detach(tree.node(id)))
        .collect();
    let mut state = State::new(leaves);
    let mut snapshots = Vec::with_capacity(actions.len());
    for action in &actions {
        snapshots.push(Snapshot {
            stack1: state.stack_id(0),
            stack2: state.stack_id(1),
            queue1: state.queue_head_id(),
        });
        state.operate(action)?;
    }
    Ok(SampleSet {
        arena: state.into_arena(),
        actions: actions,
        snapshots: snapshots,
    })
}

/// Clones a leaf out of the gold tree, dropping its links so the replay
/// state owns an independent copy.
fn detach(node: &SpanNode) -> SpanNode {
    let mut leaf = node.clone();
    leaf.lnode = None;
    leaf.rnode = None;
    leaf.pnode = None;
    leaf.nodelist.clear();
    leaf
}
