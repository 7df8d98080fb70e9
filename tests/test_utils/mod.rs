#![allow(dead_code)]

use std::io::BufReader;

use rhetoric::dataset::Document;
use rhetoric::logging::null_logger;
use rhetoric::tree::{RstTree, TreeBuilder};

pub static MOCK_DIS: &'static str = r#"
( Root (span 1 4)
  ( Nucleus (span 1 2) (rel2par span)
    ( Nucleus (leaf 1) (rel2par span) (text _!The cat sat on the mat_!) )
    ( Satellite (leaf 2) (rel2par elaboration) (text _!because it was warm ( very warm ) ._!) )
  )
  ( Satellite (span 3 4) (rel2par elaboration)
    ( Nucleus (leaf 3) (rel2par List) (text _!The dog barked ,_!) )
    ( Nucleus (leaf 4) (rel2par List) (text _!and the bird sang ._!) )
  )
)
"#;

// (in-sentence id, word, lemma, POS, head, deprel)
static MOCK_TOKENS: &'static [(usize, &'static str, &'static str, &'static str, usize, &'static str)] = &[
    (1, "The", "the", "DT", 2, "det"),
    (2, "cat", "cat", "NN", 3, "nsubj"),
    (3, "sat", "sit", "VBD", 0, "root"),
    (4, "on", "on", "IN", 3, "prep"),
    (5, "the", "the", "DT", 6, "det"),
    (6, "mat", "mat", "NN", 4, "pobj"),
    (7, "because", "because", "IN", 9, "mark"),
    (8, "it", "it", "PRP", 9, "nsubj"),
    (9, "was", "be", "VBD", 3, "advcl"),
    (10, "warm", "warm", "JJ", 9, "acomp"),
    (11, "(", "(", "-LRB-", 13, "punct"),
    (12, "very", "very", "RB", 13, "advmod"),
    (13, "warm", "warm", "JJ", 10, "dep"),
    (14, ")", ")", "-RRB-", 13, "punct"),
    (15, ".", ".", ".", 3, "punct"),
    (1, "The", "the", "DT", 2, "det"),
    (2, "dog", "dog", "NN", 3, "nsubj"),
    (3, "barked", "bark", "VBD", 0, "root"),
    (4, ",", ",", ",", 3, "punct"),
    (5, "and", "and", "CC", 3, "cc"),
    (6, "the", "the", "DT", 7, "det"),
    (7, "bird", "bird", "NN", 8, "nsubj"),
    (8, "sang", "sing", "VBD", 3, "conj"),
    (9, ".", ".", ".", 3, "punct"),
];

pub fn mock_conll_text() -> String {
    let mut lines = String::new();
    for &(id, word, lemma, pos, head, deprel) in MOCK_TOKENS {
        lines.push_str(&format!(
            "{}\t{}\t{}\t_\t{}\t_\t_\t_\t_\t{}\t_\t{}\n",
            id, word, lemma, pos, head, deprel
        ));
    }
    lines
}

pub fn mock_document() -> Document {
    Document::from_reader(BufReader::new(mock_conll_text().as_bytes())).unwrap()
}

/// Builds the mock gold tree together with its synchronized document.
pub fn mock_tree() -> (RstTree, Document) {
    let mut doc = mock_document();
    let builder = TreeBuilder::new(null_logger());
    let tree = builder.build(MOCK_DIS, &mut doc).unwrap();
    (tree, doc)
}
