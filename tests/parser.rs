extern crate rhetoric;
extern crate serde;
#[macro_use]
extern crate serde_derive;
extern crate tempfile;

mod test_utils;

use std::cell::RefCell;
use std::collections::VecDeque;

use rhetoric::logging::null_logger;
use rhetoric::syntax::oracle;
use rhetoric::syntax::transition::{Action, Error, Sample};
use rhetoric::syntax::{Model, ShiftReduceParser};
use rhetoric::tree::Form;

/// Replays a fixed action sequence one prediction at a time.
struct ScriptedModel {
    script: RefCell<VecDeque<Vec<Action>>>,
}

impl ScriptedModel {
    fn new(script: Vec<Vec<Action>>) -> Self {
        ScriptedModel { script: RefCell::new(script.into_iter().collect()) }
    }
}

impl Model for ScriptedModel {
    fn predict(&self, _sample: &Sample) -> Vec<Action> {
        self.script.borrow_mut().pop_front().unwrap_or_default()
    }

    fn train(&mut self, _samples: &[Sample], _actions: &[Action]) {}
}

#[derive(Default)]
struct RecordingModel {
    num_samples: usize,
    num_actions: usize,
}

impl Model for RecordingModel {
    fn predict(&self, _sample: &Sample) -> Vec<Action> {
        vec![]
    }

    fn train(&mut self, samples: &[Sample], actions: &[Action]) {
        self.num_samples = samples.len();
        self.num_actions = actions.len();
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct WeightedModel {
    weight: f32,
}

impl Model for WeightedModel {
    fn predict(&self, _sample: &Sample) -> Vec<Action> {
        vec![Action::Shift]
    }

    fn train(&mut self, _samples: &[Sample], _actions: &[Action]) {}
}

#[test]
fn test_parse_with_scripted_model() {
    let (tree, doc) = test_utils::mock_tree();
    let script = oracle::decode_actions(&tree)
        .unwrap()
        .into_iter()
        .map(|action| vec![action])
        .collect();
    let parser = ShiftReduceParser::new(ScriptedModel::new(script), null_logger());
    let parsed = parser.parse(&doc).unwrap();
    assert_eq!(parsed.bracketing().unwrap(), tree.bracketing().unwrap());
    assert_eq!(parsed.node(parsed.root()).eduspan, Some((1, 4)));
}

#[test]
fn test_parse_falls_back_to_next_candidate() {
    let (tree, doc) = test_utils::mock_tree();
    let mut script: Vec<Vec<Action>> = oracle::decode_actions(&tree)
        .unwrap()
        .into_iter()
        .map(|action| vec![action])
        .collect();
    // An illegal reduce ranked first must be skipped, not fail the parse.
    script[0].insert(0, Action::Reduce(Form::NN, "bogus".to_string()));
    let parser = ShiftReduceParser::new(ScriptedModel::new(script), null_logger());
    let parsed = parser.parse(&doc).unwrap();
    assert_eq!(parsed.bracketing().unwrap(), tree.bracketing().unwrap());
}

#[test]
fn test_parse_fails_without_legal_action() {
    let (_, doc) = test_utils::mock_tree();
    // Only an illegal reduce on the empty stack, then nothing.
    let script = vec![vec![Action::Reduce(Form::NS, "elaboration".to_string())]];
    let parser = ShiftReduceParser::new(ScriptedModel::new(script), null_logger());
    match parser.parse(&doc) {
        Err(Error::NoAction) => {}
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_train_flattens_samples() {
    let (tree, doc) = test_utils::mock_tree();
    let mut parser = ShiftReduceParser::new(RecordingModel::default(), null_logger());
    parser.train(&[(&tree, &doc), (&tree, &doc)]).unwrap();
    assert_eq!(parser.model().num_samples, 14);
    assert_eq!(parser.model().num_actions, 14);
}

#[test]
fn test_save_and_load_model() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");
    let mut parser = ShiftReduceParser::new(WeightedModel { weight: 0.25 }, null_logger());
    parser.save_model(&path).unwrap();
    let mut other = ShiftReduceParser::new(WeightedModel { weight: 0.0 }, null_logger());
    other.load_model(&path).unwrap();
    assert_eq!(*other.model(), WeightedModel { weight: 0.25 });
}
