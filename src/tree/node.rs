use std::fmt;
use std::ops;
use std::str::FromStr;

pub type NodeId = usize;

/// Role of a span with respect to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Prop {
    Root,
    Nucleus,
    Satellite,
}

impl Prop {
    pub fn as_str(&self) -> &'static str {
        match *self {
            Prop::Root => "Root",
            Prop::Nucleus => "Nucleus",
            Prop::Satellite => "Satellite",
        }
    }
}

impl fmt::Display for Prop {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Nuclearity pattern of a node's two children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Form {
    NN,
    NS,
    SN,
}

impl Form {
    pub fn as_str(&self) -> &'static str {
        match *self {
            Form::NN => "NN",
            Form::NS => "NS",
            Form::SN => "SN",
        }
    }
}

impl fmt::Display for Form {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Form {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NN" => Ok(Form::NN),
            "NS" => Ok(Form::NS),
            "SN" => Ok(Form::SN),
            _ => Err(format!("unrecognized form: {}", s)),
        }
    }
}

/// A node of an RST tree.
///
/// Child links own their subtrees through the enclosing [`Arena`]; `pnode` is
/// a non-owning back-reference. `nodelist` holds the children of a general
/// (n-ary) node and is drained by binarization, after which only
/// `lnode`/`rnode` are populated.
#[derive(Debug, Clone, Default)]
pub struct SpanNode {
    /// Inclusive (first, last) EDU index covered by this span.
    pub eduspan: Option<(usize, usize)>,
    /// EDU index range of the nucleus sub-span.
    pub nucspan: Option<(usize, usize)>,
    /// Single EDU index of this span's head nucleus.
    pub nucedu: Option<usize>,
    /// Global token indices covered by the span, in reading order.
    pub text: Vec<usize>,
    /// Literal text from the annotation; kept only for alignment checking.
    pub raw_text: Option<String>,
    pub prop: Option<Prop>,
    /// Discourse relation with respect to the parent node.
    pub relation: Option<String>,
    pub form: Option<Form>,
    pub lnode: Option<NodeId>,
    pub rnode: Option<NodeId>,
    pub pnode: Option<NodeId>,
    pub nodelist: Vec<NodeId>,
}

impl SpanNode {
    pub fn new(prop: Option<Prop>) -> Self {
        SpanNode {
            prop: prop,
            ..SpanNode::default()
        }
    }

    /// Creates a leaf covering the single EDU `eduidx`.
    pub fn leaf(eduidx: usize) -> Self {
        SpanNode {
            eduspan: Some((eduidx, eduidx)),
            nucspan: Some((eduidx, eduidx)),
            nucedu: Some(eduidx),
            ..SpanNode::default()
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.lnode.is_none() && self.rnode.is_none()
    }

    /// Number of EDUs covered by this span.
    pub fn num_edus(&self) -> Option<usize> {
        self.eduspan.map(|(b, e)| e - b + 1)
    }
}

/// Flat storage for span nodes; node links are indices into this arena.
#[derive(Debug, Default)]
pub struct Arena {
    nodes: Vec<SpanNode>,
}

impl Arena {
    pub fn new() -> Self {
        Arena { nodes: vec![] }
    }

    pub fn alloc(&mut self, node: SpanNode) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(node);
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&SpanNode> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SpanNode> {
        self.nodes.get_mut(id)
    }
}

impl ops::Index<NodeId> for Arena {
    type Output = SpanNode;

    #[inline]
    fn index(&self, id: NodeId) -> &SpanNode {
        &self.nodes[id]
    }
}

impl ops::IndexMut<NodeId> for Arena {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut SpanNode {
        &mut self.nodes[id]
    }
}
