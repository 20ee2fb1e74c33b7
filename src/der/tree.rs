use std::ops::Range;

use super::{DerError, Result, read_header, tag};

/// Nesting limit for constructed values
pub const MAX_DEPTH: usize = 64;

/// Arena size limit for one parse
pub const MAX_NODES: usize = 1 << 21;

/// Index of a node inside a [`DerTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// One decoded TLV
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerNode {
    pub tag: u8,
    pub length: usize,
    pub header_start: usize,
    pub value_start: usize,
    pub value_end: usize,
    /// Empty for primitive encodings
    pub children: Vec<NodeId>,
}

impl DerNode {
    pub fn is_constructed(&self) -> bool {
        tag::is_constructed(self.tag)
    }
}

/// Arena of nodes decoded from a single top-level TLV.
///
/// The tree borrows the input buffer; node payloads are slices into it.
#[derive(Debug)]
pub struct DerTree<'a> {
    data: &'a [u8],
    nodes: Vec<DerNode>,
    root: NodeId,
}

impl<'a> DerTree<'a> {
    /// Parses the TLV at the start of `data`.
    ///
    /// Bytes after the first complete TLV are not inspected.
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        Self::parse_at(data, 0)
    }

    pub fn parse_at(data: &'a [u8], offset: usize) -> Result<Self> {
        let mut nodes = Vec::new();
        let root = parse_node(data, offset, 0, &mut nodes)?;
        Ok(Self { data, nodes, root })
    }

    pub fn root(&self) -> NodeRef<'_, 'a> {
        self.node(self.root)
    }

    pub fn node(&self, id: NodeId) -> NodeRef<'_, 'a> {
        NodeRef { tree: self, id }
    }

    /// Number of nodes in the arena
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Bytes spanned by the root TLV, header included
    pub fn consumed(&self) -> usize {
        let root = &self.nodes[self.root.0];
        root.value_end - root.header_start
    }
}

fn parse_node(data: &[u8], offset: usize, depth: usize, nodes: &mut Vec<DerNode>) -> Result<NodeId> {
    if depth > MAX_DEPTH {
        return Err(DerError::DepthExceeded {
            offset,
            max: MAX_DEPTH,
        });
    }

    let header = read_header(data, offset)?;
    let value_start = header.value_start(offset);
    let value_end = header.value_end(offset);

    let mut children = Vec::new();
    if tag::is_constructed(header.tag) {
        let mut cursor = value_start;
        while cursor < value_end {
            let child = parse_node(data, cursor, depth + 1, nodes)?;
            let child_end = nodes[child.0].value_end;
            if child_end > value_end {
                return Err(DerError::ChildOverrun {
                    offset: cursor,
                    parent_end: value_end,
                });
            }
            children.push(child);
            cursor = child_end;
        }
    }

    if nodes.len() >= MAX_NODES {
        return Err(DerError::TooManyNodes {
            offset,
            max: MAX_NODES,
        });
    }
    let id = NodeId(nodes.len());
    nodes.push(DerNode {
        tag: header.tag,
        length: header.length,
        header_start: offset,
        value_start,
        value_end,
        children,
    });
    Ok(id)
}

/// Borrowed view of a node together with its tree
#[derive(Clone, Copy)]
pub struct NodeRef<'t, 'a> {
    tree: &'t DerTree<'a>,
    id: NodeId,
}

impl<'t, 'a> NodeRef<'t, 'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn raw(&self) -> &'t DerNode {
        &self.tree.nodes[self.id.0]
    }

    pub fn tag(&self) -> u8 {
        self.raw().tag
    }

    pub fn is_constructed(&self) -> bool {
        self.raw().is_constructed()
    }

    /// Value bytes, header excluded
    pub fn value(&self) -> &'a [u8] {
        let node = self.raw();
        &self.tree.data[node.value_start..node.value_end]
    }

    /// Byte range of the whole TLV, header included
    pub fn span(&self) -> Range<usize> {
        let node = self.raw();
        node.header_start..node.value_end
    }

    pub fn child_count(&self) -> usize {
        self.raw().children.len()
    }

    pub fn child(&self, index: usize) -> Option<NodeRef<'t, 'a>> {
        self.raw()
            .children
            .get(index)
            .map(|&id| NodeRef { tree: self.tree, id })
    }

    pub fn children(self) -> impl Iterator<Item = NodeRef<'t, 'a>> + 't {
        let tree = self.tree;
        self.raw()
            .children
            .iter()
            .map(move |&id| NodeRef { tree, id })
    }
}

impl std::fmt::Debug for NodeRef<'_, '_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef")
            .field("tag", &format_args!("{:#04x}", self.tag()))
            .field("span", &self.span())
            .field("children", &self.child_count())
            .finish()
    }
}
