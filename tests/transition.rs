extern crate rhetoric;

mod test_utils;

use std::str::FromStr;

use rhetoric::syntax::oracle;
use rhetoric::syntax::transition::{estimate_num_actions, Action, Error, State};
use rhetoric::tree::{Form, Prop, SpanNode};

fn reduce(form: Form, relation: &str) -> Action {
    Action::Reduce(form, relation.to_string())
}

fn leaves(num: usize) -> Vec<SpanNode> {
    (0..num).map(SpanNode::leaf).collect()
}

#[test]
fn test_action_labels() {
    assert_eq!(Action::Shift.to_string(), "shift");
    assert_eq!(
        reduce(Form::NS, "elaboration").to_string(),
        "reduce-NS-elaboration"
    );
    assert_eq!(Action::from_str("shift").unwrap(), Action::Shift);
    assert_eq!(
        Action::from_str("reduce-NN-List").unwrap(),
        reduce(Form::NN, "List")
    );
    assert!(Action::from_str("reduce-XX-foo").is_err());
    assert!(Action::from_str("swap").is_err());
}

#[test]
fn test_estimate_num_actions() {
    assert_eq!(estimate_num_actions(0), 0);
    assert_eq!(estimate_num_actions(1), 1);
    assert_eq!(estimate_num_actions(4), 7);
}

#[test]
fn test_parse_three_edus() {
    let mut state = State::new(leaves(3));
    let actions = [
        Action::Shift,
        Action::Shift,
        reduce(Form::NS, "elaboration"),
        Action::Shift,
        reduce(Form::NN, "joint"),
    ];
    for action in &actions {
        assert_eq!(state.is_terminal().unwrap(), false);
        state.operate(action).unwrap();
    }
    assert!(state.is_terminal().unwrap());
    assert_eq!(state.actions().len(), estimate_num_actions(3));

    let tree = state.into_tree().unwrap();
    let root = tree.node(tree.root());
    assert_eq!(root.eduspan, Some((0, 2)));
    assert_eq!(root.form, Some(Form::NN));
    assert_eq!(root.nucspan, Some((0, 2)));
    assert_eq!(root.nucedu, Some(0));

    let left = tree.node(root.lnode.unwrap());
    assert_eq!(left.eduspan, Some((0, 1)));
    assert_eq!(left.form, Some(Form::NS));
    assert_eq!(left.prop, Some(Prop::Nucleus));
    assert_eq!(left.relation.as_ref().map(|s| s.as_str()), Some("joint"));
    assert_eq!(left.nucspan, Some((0, 0)));

    let inner_left = tree.node(left.lnode.unwrap());
    assert_eq!(inner_left.prop, Some(Prop::Nucleus));
    assert_eq!(inner_left.relation.as_ref().map(|s| s.as_str()), Some("span"));
    let inner_right = tree.node(left.rnode.unwrap());
    assert_eq!(inner_right.prop, Some(Prop::Satellite));
    assert_eq!(
        inner_right.relation.as_ref().map(|s| s.as_str()),
        Some("elaboration")
    );

    let right = tree.node(root.rnode.unwrap());
    assert_eq!(right.eduspan, Some((2, 2)));
    assert_eq!(right.prop, Some(Prop::Nucleus));
    assert_eq!(right.relation.as_ref().map(|s| s.as_str()), Some("joint"));
}

#[test]
fn test_reduce_sn_assigns_roles() {
    let mut state = State::new(leaves(2));
    state.operate(&Action::Shift).unwrap();
    state.operate(&Action::Shift).unwrap();
    state.operate(&reduce(Form::SN, "background")).unwrap();
    let tree = state.into_tree().unwrap();
    let root = tree.node(tree.root());
    assert_eq!(root.nucspan, Some((1, 1)));
    assert_eq!(root.nucedu, Some(1));
    let left = tree.node(root.lnode.unwrap());
    assert_eq!(left.prop, Some(Prop::Satellite));
    assert_eq!(left.relation.as_ref().map(|s| s.as_str()), Some("background"));
    let right = tree.node(root.rnode.unwrap());
    assert_eq!(right.prop, Some(Prop::Nucleus));
    assert_eq!(right.relation.as_ref().map(|s| s.as_str()), Some("span"));
}

#[test]
fn test_illegal_actions_are_recoverable() {
    let mut state = State::new(leaves(1));
    match state.operate(&reduce(Form::NN, "joint")) {
        Err(ref e) if e.is_recoverable() => {}
        other => panic!("unexpected result: {:?}", other),
    }
    state.operate(&Action::Shift).unwrap();
    match state.operate(&Action::Shift) {
        Err(Error::EmptyQueue) => {}
        other => panic!("unexpected result: {:?}", other),
    }
    // The failed actions must not have changed the state.
    assert_eq!(state.stack_size(), 1);
    assert_eq!(state.queue_size(), 0);
    assert_eq!(state.actions().len(), 1);
    assert!(state.is_terminal().unwrap());
}

#[test]
fn test_empty_state_is_illegal() {
    let state = State::new(vec![]);
    match state.is_terminal() {
        Err(Error::IllegalState) => {}
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_is_allowed() {
    let mut state = State::new(leaves(2));
    assert!(state.is_allowed(&Action::Shift));
    assert!(!state.is_allowed(&reduce(Form::NN, "joint")));
    state.operate(&Action::Shift).unwrap();
    state.operate(&Action::Shift).unwrap();
    assert!(!state.is_allowed(&Action::Shift));
    assert!(state.is_allowed(&reduce(Form::NN, "joint")));
}

#[test]
fn test_decode_actions() {
    let (tree, _) = test_utils::mock_tree();
    let actions = oracle::decode_actions(&tree).unwrap();
    let expected = vec![
        Action::Shift,
        Action::Shift,
        reduce(Form::NS, "elaboration"),
        Action::Shift,
        Action::Shift,
        reduce(Form::NN, "List"),
        reduce(Form::NS, "elaboration"),
    ];
    assert_eq!(actions, expected);
}

#[test]
fn test_decoded_actions_rebuild_the_tree() {
    let (tree, _) = test_utils::mock_tree();
    let actions = oracle::decode_actions(&tree).unwrap();
    let leaves: Vec<SpanNode> = tree.edu_nodes()
        .into_iter()
        .map(|id| {
            let mut leaf = tree.node(id).clone();
            leaf.lnode = None;
            leaf.rnode = None;
            leaf.pnode = None;
            leaf
        })
        .collect();
    let mut state = State::new(leaves);
    for action in &actions {
        state.operate(action).unwrap();
    }
    let replayed = state.into_tree().unwrap();
    assert_eq!(replayed.bracketing().unwrap(), tree.bracketing().unwrap());
    assert_eq!(
        replayed.node(replayed.root()).form,
        tree.node(tree.root()).form
    );
    assert_eq!(
        replayed.node(replayed.root()).eduspan,
        tree.node(tree.root()).eduspan
    );
}

#[test]
fn test_generate_samples() {
    let (tree, doc) = test_utils::mock_tree();
    let set = oracle::generate_samples(&tree).unwrap();
    assert_eq!(set.len(), estimate_num_actions(4));
    assert_eq!(set.actions(), &oracle::decode_actions(&tree).unwrap()[..]);
    assert_eq!(set.snapshots().len(), set.len());

    let first = set.sample(0, &doc).unwrap();
    assert!(first.stack1.is_none());
    assert!(first.stack2.is_none());
    assert_eq!(first.queue1.unwrap().eduspan, Some((1, 1)));

    // Before the first reduce two leaves sit on the stack.
    let third = set.sample(2, &doc).unwrap();
    assert_eq!(third.stack1.unwrap().eduspan, Some((2, 2)));
    assert_eq!(third.stack2.unwrap().eduspan, Some((1, 1)));
    assert_eq!(third.queue1.unwrap().eduspan, Some((3, 3)));

    // Before the final reduce the queue is exhausted.
    let last = set.sample(set.len() - 1, &doc).unwrap();
    assert_eq!(last.stack1.unwrap().eduspan, Some((3, 4)));
    assert_eq!(last.stack2.unwrap().eduspan, Some((1, 2)));
    assert!(last.queue1.is_none());

    assert!(set.sample(set.len(), &doc).is_none());
}

#[test]
fn test_decode_requires_derived_metadata() {
    // A tree straight out of the annotation parser has no forms yet.
    let builder = rhetoric::tree::TreeBuilder::new(rhetoric::logging::null_logger());
    let mut tree = builder.parse(test_utils::MOCK_DIS).unwrap();
    tree.binarize();
    match oracle::decode_actions(&tree) {
        Err(Error::Undecodable) => {}
        other => panic!("unexpected result: {:?}", other),
    }
}
