use std::fs::File;
use std::io::{Read as StdRead, Write as StdWrite};
use std::io::Result as IOResult;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use slog::Logger;

use dataset::Document;
use io::serialize::{self, Format};
use syntax::oracle::{self, SampleSet};
use syntax::transition::{Action, Error, Sample, State};
use tree::{RstTree, SpanNode};

/// The action-prediction model consumed by the parser.
///
/// `predict` returns candidate actions ranked best-first; the parser applies
/// the first legal one. The model stays opaque: `reset`/`restore` are hooks
/// invoked around persistence boundaries.
pub trait Model {
    fn predict(&self, sample: &Sample) -> Vec<Action>;

    fn train(&mut self, samples: &[Sample], actions: &[Action]);

    fn reset(&mut self) {}

    fn restore(&mut self) {}
}

/// Shift-reduce rhetorical structure parser.
#[derive(Debug)]
pub struct ShiftReduceParser<M> {
    model: M,
    logger: Logger,
}

impl<M: Model> ShiftReduceParser<M> {
    pub fn new(model: M, logger: Logger) -> Self {
        ShiftReduceParser {
            model: model,
            logger: logger,
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Trains the model on gold trees paired with their documents.
    pub fn train(&mut self, treebank: &[(&RstTree, &Document)]) -> Result<(), Error> {
        let mut sets: Vec<SampleSet> = Vec::with_capacity(treebank.len());
        for &(tree, _) in treebank {
            sets.push(oracle::generate_samples(tree)?);
        }
        let mut samples = vec![];
        let mut actions = vec![];
        for (set, &(_, doc)) in sets.iter().zip(treebank) {
            for index in 0..set.len() {
                match set.sample(index, doc) {
                    Some(sample) => samples.push(sample),
                    None => return Err(Error::Corrupted),
                }
                actions.push(set.actions()[index].clone());
            }
        }
        info!(
            self.logger, "training model";
            "trees" => treebank.len(), "samples" => samples.len()
        );
        self.model.train(&samples, &actions);
        Ok(())
    }

    /// Parses the document's EDUs into a tree, applying the first legal
    /// action of each ranked prediction until termination.
    pub fn parse(&self, doc: &Document) -> Result<RstTree, Error> {
        let leaves: Vec<SpanNode> = doc.edus()
            .iter()
            .map(|(&eduidx, tokens)| {
                let mut leaf = SpanNode::leaf(eduidx);
                leaf.text = tokens.clone();
                leaf
            })
            .collect();
        let mut state = State::new(leaves);
        while !state.is_terminal()? {
            let candidates = {
                let sample = state.sample(doc);
                self.model.predict(&sample)
            };
            let mut applied = false;
            for action in &candidates {
                match state.operate(action) {
                    Ok(()) => {
                        applied = true;
                        break;
                    }
                    Err(ref e) if e.is_recoverable() => {
                        debug!(
                            self.logger, "skipping illegal action";
                            "action" => %action, "reason" => e.as_str()
                        );
                    }
                    Err(e) => return Err(e),
                }
            }
            if !applied {
                error!(
                    self.logger, "no action could be performed";
                    "stack" => state.stack_size(), "queue" => state.queue_size(),
                    "candidates" => candidates.len(), "step" => state.actions().len()
                );
                return Err(Error::NoAction);
            }
        }
        state.into_tree()
    }

    /// Serializes the model to `path`, invoking its reset/restore hooks
    /// around the boundary.
    pub fn save_model<P: AsRef<Path>>(&mut self, path: P) -> IOResult<()>
    where
        M: Serialize,
    {
        debug!(self.logger, "saving model"; "path" => path.as_ref().to_str());
        self.model.reset();
        let bytes = serialize::serialize(&self.model, Format::Json)?;
        let mut file = File::create(path)?;
        file.write_all(&bytes)?;
        self.model.restore();
        Ok(())
    }

    /// Replaces the model with one deserialized from `path`.
    pub fn load_model<P: AsRef<Path>>(&mut self, path: P) -> IOResult<()>
    where
        M: DeserializeOwned,
    {
        debug!(self.logger, "loading model"; "path" => path.as_ref().to_str());
        let mut bytes = vec![];
        File::open(path)?.read_to_end(&mut bytes)?;
        self.model = serialize::deserialize(&bytes, Format::Json)?;
        self.model.restore();
        Ok(())
    }
}
