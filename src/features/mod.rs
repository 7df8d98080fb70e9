//! Turns transition-state snapshots into named feature sets.

use std::collections::HashMap;
use std::collections::hash_map::Iter;

use dataset::Document;
use syntax::transition::Sample;
use tree::SpanNode;

/// Which span of the snapshot a feature describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    Top1Stack,
    Top2Stack,
    FirstQueue,
}

/// Span pairs tested for sentence co-membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pair {
    Top12Stack,
    StackQueue,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Feature {
    StackEmpty,
    StackOneElem,
    StackMoreElem,
    QueueEmpty,
    QueueNonEmpty,
    /// Span length in EDUs; weighted by the length.
    EduLength(Position),
    /// Distance from the document start in EDUs; weighted.
    DistToBegin(Position),
    /// Distance to the document end in EDUs; weighted.
    DistToEnd(Position),
    /// Whether two spans start/end within the same source sentence.
    SameSent(Pair),
    /// Total number of EDUs in the document; weighted by the count.
    NumEdus,
    /// A lexical gram of the span: first/last word, first/last POS tag,
    /// first/last bigram.
    Gram(Position, String),
    /// A lemma drawn from the span's nucleus EDU.
    DisRep(Position, String),
}

/// A mapping from feature to numeric weight; indicators carry 1.0.
#[derive(Debug, Default)]
pub struct FeatureSet {
    feats: HashMap<Feature, f32>,
}

impl FeatureSet {
    pub fn new() -> Self {
        FeatureSet { feats: HashMap::new() }
    }

    pub fn insert(&mut self, feature: Feature, weight: f32) {
        self.feats.insert(feature, weight);
    }

    /// Inserts an indicator feature with weight 1.0.
    pub fn indicate(&mut self, feature: Feature) {
        self.feats.insert(feature, 1.0);
    }

    pub fn weight(&self, feature: &Feature) -> Option<f32> {
        self.feats.get(feature).map(|&w| w)
    }

    pub fn contains(&self, feature: &Feature) -> bool {
        self.feats.contains_key(feature)
    }

    pub fn len(&self) -> usize {
        self.feats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feats.is_empty()
    }

    pub fn iter(&self) -> Iter<Feature, f32> {
        self.feats.iter()
    }
}

/// Extracts the full feature set for one snapshot. A missing span skips
/// only its own features.
pub fn extract(sample: &Sample) -> FeatureSet {
    let mut feats = FeatureSet::new();
    extract_status_feats(&mut feats, sample);
    extract_struct_feats(&mut feats, sample);
    extract_lex_feats(&mut feats, sample);
    extract_edu_feats(&mut feats, sample);
    extract_distrib_feats(&mut feats, sample);
    feats
}

fn extract_status_feats(feats: &mut FeatureSet, sample: &Sample) {
    match (sample.stack1.is_some(), sample.stack2.is_some()) {
        (false, _) => feats.indicate(Feature::StackEmpty),
        (true, false) => feats.indicate(Feature::StackOneElem),
        (true, true) => feats.indicate(Feature::StackMoreElem),
    }
    if sample.queue1.is_some() {
        feats.indicate(Feature::QueueNonEmpty);
    } else {
        feats.indicate(Feature::QueueEmpty);
    }
}

fn extract_struct_feats(feats: &mut FeatureSet, sample: &Sample) {
    let doclen = sample.doc.num_edus();
    for &(position, node) in &[
        (Position::Top1Stack, sample.stack1),
        (Position::Top2Stack, sample.stack2),
    ]
    {
        let eduspan = match node.and_then(|n| n.eduspan) {
            Some(eduspan) => eduspan,
            None => continue,
        };
        feats.insert(
            Feature::EduLength(position),
            (eduspan.1 - eduspan.0 + 1) as f32,
        );
        feats.insert(Feature::DistToBegin(position), eduspan.0 as f32);
        feats.insert(
            Feature::DistToEnd(position),
            doclen as f32 - eduspan.1 as f32,
        );
    }
    if let Some(eduspan) = sample.queue1.and_then(|n| n.eduspan) {
        feats.insert(Feature::DistToBegin(Position::FirstQueue), eduspan.0 as f32);
    }
}

fn extract_edu_feats(feats: &mut FeatureSet, sample: &Sample) {
    feats.insert(Feature::NumEdus, sample.doc.num_edus() as f32);
    // Last token of the stack top against the first token of the span below
    // it, then the first token of the stack top against the last token of
    // the queue head.
    let top12 = same_sentence(
        sample.doc,
        sample.stack1.and_then(|n| n.text.last().map(|&g| g)),
        sample.stack2.and_then(|n| n.text.first().map(|&g| g)),
    );
    feats.insert(Feature::SameSent(Pair::Top12Stack), top12);
    let stack_queue = same_sentence(
        sample.doc,
        sample.stack1.and_then(|n| n.text.first().map(|&g| g)),
        sample.queue1.and_then(|n| n.text.last().map(|&g| g)),
    );
    feats.insert(Feature::SameSent(Pair::StackQueue), stack_queue);
}

fn same_sentence(doc: &Document, gidx1: Option<usize>, gidx2: Option<usize>) -> f32 {
    match (
        gidx1.and_then(|g| doc.token(g)),
        gidx2.and_then(|g| doc.token(g)),
    ) {
        (Some(token1), Some(token2)) if token1.sidx() == token2.sidx() => 1.0,
        _ => 0.0,
    }
}

fn extract_lex_feats(feats: &mut FeatureSet, sample: &Sample) {
    for &(position, node) in &[
        (Position::Top1Stack, sample.stack1),
        (Position::Top2Stack, sample.stack2),
        (Position::FirstQueue, sample.queue1),
    ]
    {
        if let Some(node) = node {
            for gram in grams(&node.text, sample.doc) {
                feats.indicate(Feature::Gram(position, gram));
            }
        }
    }
}

/// First/last word (lower-cased), first/last POS tag and the first and last
/// bigrams of the span's token sequence.
fn grams(text: &[usize], doc: &Document) -> Vec<String> {
    let mut grams = vec![];
    let n = text.len();
    if n >= 1 {
        if let Some(token) = doc.token(text[0]) {
            grams.push(token.word().to_lowercase());
            grams.push(token.postag().to_string());
        }
        if let Some(token) = doc.token(text[n - 1]) {
            grams.push(token.word().to_lowercase());
            grams.push(token.postag().to_string());
        }
    }
    if n >= 2 {
        if let (Some(first), Some(second)) = (doc.token(text[0]), doc.token(text[1])) {
            grams.push(format!(
                "{} {}",
                first.word().to_lowercase(),
                second.word().to_lowercase()
            ));
        }
        if let (Some(prev), Some(last)) = (doc.token(text[n - 2]), doc.token(text[n - 1])) {
            grams.push(format!(
                "{} {}",
                prev.word().to_lowercase(),
                last.word().to_lowercase()
            ));
        }
    }
    grams
}

fn extract_distrib_feats(feats: &mut FeatureSet, sample: &Sample) {
    for &(position, node) in &[
        (Position::Top1Stack, sample.stack1),
        (Position::Top2Stack, sample.stack2),
        (Position::FirstQueue, sample.queue1),
    ]
    {
        if let Some(nucedu) = node.and_then(|n: &SpanNode| n.nucedu) {
            if let Some(tokens) = sample.doc.edu(nucedu) {
                for &gidx in tokens {
                    if let Some(token) = sample.doc.token(gidx) {
                        feats.indicate(
                            Feature::DisRep(position, token.lemma().to_lowercase()),
                        );
                    }
                }
            }
        }
    }
}
