use std::collections::BTreeMap;
use std::fmt;
use std::io as std_io;
use std::io::BufRead;
use std::mem;
use std::path::Path;

use io;
use io::{FromLine, Read};

static CONLL_FIELD_DELIMITER: &'static str = "\t";
static CONLL_COMMENT_MARKER: &'static str = "#";

/// A single token of the dependency-parsed document.
///
/// Fields follow the tab-separated layout of the preprocessed corpus:
/// column 0 carries the 1-based in-sentence id, 1 the surface form,
/// 2 the lemma, 4 the part-of-speech tag, 9 the 1-based head index and
/// 11 the dependency label.
#[derive(Debug, Clone)]
pub struct Token {
    sidx: usize,
    tidx: usize,
    word: String,
    lemma: String,
    postag: String,
    head: usize,
    deprel: String,
}

impl Token {
    /// Sentence index within the document.
    pub fn sidx(&self) -> usize {
        self.sidx
    }

    /// Token index within the sentence.
    pub fn tidx(&self) -> usize {
        self.tidx
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn lemma(&self) -> &str {
        &self.lemma
    }

    pub fn postag(&self) -> &str {
        &self.postag
    }

    pub fn head(&self) -> usize {
        self.head
    }

    pub fn deprel(&self) -> &str {
        &self.deprel
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "tidx: {}, word: {}", self.tidx, self.word)
    }
}

#[inline]
fn parse_required_usize_field(field: &str) -> Result<usize, std_io::Error> {
    field.trim().parse::<usize>().map_err(|e| {
        std_io::Error::new(std_io::ErrorKind::InvalidData, e)
    })
}

impl FromLine for Token {
    type Err = std_io::Error;

    fn from_line(line: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = line.trim_right().split(CONLL_FIELD_DELIMITER).collect();
        if fields.len() < 12 {
            return Err(std_io::Error::new(
                std_io::ErrorKind::InvalidData,
                format!("too few fields in line: {:?}", line),
            ));
        }
        let tidx = parse_required_usize_field(fields[0])?.checked_sub(1).ok_or_else(|| {
            std_io::Error::new(
                std_io::ErrorKind::InvalidData,
                format!("token id must be positive: {:?}", line),
            )
        })?;
        Ok(Token {
            sidx: 0,
            tidx: tidx,
            word: fields[1].to_string(),
            lemma: fields[2].to_string(),
            postag: fields[4].to_string(),
            head: parse_required_usize_field(fields[9])?.saturating_sub(1),
            deprel: fields[11].to_string(),
        })
    }
}

/// The token/EDU collection of one document.
///
/// Tokens are indexed by their global (document-level) position. The EDU
/// mapping is keyed by the 1-based EDU index of the discourse annotation and
/// is filled in by the tree builder while synchronizing the annotation with
/// this document.
#[derive(Debug, Default)]
pub struct Document {
    tokens: Vec<Token>,
    edus: BTreeMap<usize, Vec<usize>>,
}

impl Document {
    pub fn new() -> Self {
        Document {
            tokens: vec![],
            edus: BTreeMap::new(),
        }
    }

    /// Assembles a document from tokens in reading order, assigning sentence
    /// indices: a token whose in-sentence index is 0 starts a new sentence.
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        let mut tokens = tokens;
        let mut sidx = 0;
        for token in tokens.iter_mut() {
            if token.tidx == 0 {
                sidx += 1;
            }
            token.sidx = sidx;
        }
        Document {
            tokens: tokens,
            edus: BTreeMap::new(),
        }
    }

    /// Reads the first document of the file.
    pub fn load<P: AsRef<Path>>(path: P) -> std_io::Result<Self> {
        let mut docs = vec![];
        Reader::open(path)?.read_upto(1, &mut docs)?;
        Ok(docs.pop().unwrap_or_default())
    }

    /// Reads the first document from the reader.
    pub fn from_reader<R: BufRead>(mut reader: R) -> std_io::Result<Self> {
        let mut docs = vec![];
        read_upto(&mut reader, 1, &mut docs)?;
        Ok(docs.pop().unwrap_or_default())
    }

    pub fn num_tokens(&self) -> usize {
        self.tokens.len()
    }

    pub fn num_edus(&self) -> usize {
        self.edus.len()
    }

    pub fn token(&self, gidx: usize) -> Option<&Token> {
        self.tokens.get(gidx)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Token indices of the given EDU, in reading order.
    pub fn edu(&self, eduidx: usize) -> Option<&[usize]> {
        self.edus.get(&eduidx).map(|v| v.as_slice())
    }

    pub fn edus(&self) -> &BTreeMap<usize, Vec<usize>> {
        &self.edus
    }

    pub(crate) fn push_edu_token(&mut self, eduidx: usize, gidx: usize) {
        self.edus.entry(eduidx).or_insert_with(Vec::new).push(gidx);
    }
}

/// Reads up to `num` documents. Documents are separated by blank lines;
/// comment lines are skipped.
pub fn read_upto<R: std_io::BufRead>(
    reader: &mut R,
    num: usize,
    buf: &mut Vec<Document>,
) -> std_io::Result<usize> {
    let mut count = 0;
    let mut line = String::new();
    let mut tokens: Vec<Token> = vec![];
    while count < num {
        match reader.read_line(&mut line) {
            Ok(0) => {
                if !tokens.is_empty() {
                    buf.push(Document::from_tokens(tokens));
                    count += 1;
                }
                break;
            }
            Ok(_) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    if !tokens.is_empty() {
                        buf.push(Document::from_tokens(mem::replace(&mut tokens, vec![])));
                        count += 1;
                    }
                } else if !trimmed.starts_with(CONLL_COMMENT_MARKER) {
                    tokens.push(Token::from_line(trimmed).map_err(|e| {
                        std_io::Error::new(std_io::ErrorKind::InvalidData, e)
                    })?);
                }
            }
            Err(ref e) if e.kind() == std_io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
        line.clear();
    }
    Ok(count)
}

pub type Reader<R> = io::Reader<R, Document>;

impl<R: std_io::BufRead> Read for Reader<R> {
    type Item = Document;

    fn read_upto(&mut self, num: usize, buf: &mut Vec<Self::Item>) -> std_io::Result<usize> {
        read_upto(self.inner_mut(), num, buf)
    }
}
