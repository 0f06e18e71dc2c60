//! Hierarchy snapshot tree
//!
//! Snapshots are parsed once into an immutable arena. Node ids are assigned in
//! document order, so sorting ids sorts nodes the way a path query reports
//! them. Parents are stored as ids and only used for sibling lookups and
//! ancestor walks.

use std::collections::BTreeMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, warn};

use crate::errors::LocatorError;

/// Arena index of a node within one [`Tree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in document order
    pub fn index(self) -> usize {
        self.0
    }
}

/// One element of the hierarchy
#[derive(Debug, Clone)]
pub struct Node {
    tag: String,
    attributes: BTreeMap<String, String>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    path: String,
}

impl Node {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// All attributes, including empty ones
    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    /// Attribute value, treating empty values as absent
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Whether the attribute holds a `"true"` flag
    pub fn is_truthy(&self, name: &str) -> bool {
        self.attributes
            .get(name)
            .is_some_and(|value| value.eq_ignore_ascii_case("true"))
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Dot-separated child ordinals from the root; the root's path is empty
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Immutable arena of nodes built from one snapshot
#[derive(Debug, Clone, Default)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// The empty-tree sentinel
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a hierarchy snapshot.
    ///
    /// Malformed markup degrades to the empty tree so callers can treat it as
    /// "no locators possible".
    pub fn parse(markup: &str) -> Self {
        match parse_markup(markup) {
            Ok(tree) => {
                debug!(nodes = tree.len(), "parsed hierarchy snapshot");
                tree
            }
            Err(reason) => {
                warn!(%reason, "malformed hierarchy snapshot, using empty tree");
                Self::empty()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn root(&self) -> Option<NodeId> {
        if self.nodes.is_empty() {
            None
        } else {
            Some(NodeId(0))
        }
    }

    pub fn is_root(&self, id: NodeId) -> bool {
        id.0 == 0 && !self.nodes.is_empty()
    }

    /// Node lookup; panics on an id from another tree
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(Node::parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(Node::children).unwrap_or(&[])
    }

    /// All node ids in document order
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Resolve a dot-separated ordinal path
    pub fn find_by_path(&self, path: &str) -> Result<NodeId, LocatorError> {
        let mut current = self
            .root()
            .ok_or_else(|| LocatorError::NodeNotFound(path.to_string()))?;
        if path.is_empty() {
            return Ok(current);
        }
        for segment in path.split('.') {
            let index: usize = segment
                .parse()
                .map_err(|_| LocatorError::InvalidPath(path.to_string()))?;
            current = *self
                .children(current)
                .get(index)
                .ok_or_else(|| LocatorError::NodeNotFound(path.to_string()))?;
        }
        Ok(current)
    }

    /// 1-based ordinal among same-tag siblings, when the tag repeats
    pub fn sibling_ordinal(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        let tag = self.node(id).tag();
        let same_tag: Vec<NodeId> = self
            .children(parent)
            .iter()
            .copied()
            .filter(|sibling| self.node(*sibling).tag() == tag)
            .collect();
        if same_tag.len() < 2 {
            return None;
        }
        same_tag
            .iter()
            .position(|sibling| *sibling == id)
            .map(|pos| pos + 1)
    }

    /// Deep copy of the subtree under `id`, re-based so `id` becomes the root
    pub fn subtree(&self, id: NodeId) -> Result<Tree, LocatorError> {
        if self.get(id).is_none() {
            return Err(LocatorError::NodeNotFound(format!("#{}", id.0)));
        }

        let mut sub = Tree::empty();
        // (source node, parent in the new tree, ordinal under that parent)
        let mut stack = vec![(id, None, 0usize)];
        while let Some((source, parent, ordinal)) = stack.pop() {
            let node = self.node(source);
            let path = match parent {
                Some(parent_id) => child_path(sub.node(parent_id).path(), ordinal),
                None => String::new(),
            };
            let new_id = sub.push(node.tag.clone(), node.attributes.clone(), parent, path);
            for (index, child) in node.children.iter().enumerate().rev() {
                stack.push((*child, Some(new_id), index));
            }
        }
        Ok(sub)
    }

    /// Strip an ancestor's path prefix from `path`
    pub fn rebase_path(path: &str, ancestor: &str) -> Result<String, LocatorError> {
        if ancestor.is_empty() {
            return Ok(path.to_string());
        }
        if path == ancestor {
            return Ok(String::new());
        }
        path.strip_prefix(ancestor)
            .and_then(|rest| rest.strip_prefix('.'))
            .map(str::to_string)
            .ok_or_else(|| LocatorError::InvalidPath(format!("{path} is not under {ancestor}")))
    }

    fn push(
        &mut self,
        tag: String,
        attributes: BTreeMap<String, String>,
        parent: Option<NodeId>,
        path: String,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            tag,
            attributes,
            children: Vec::new(),
            parent,
            path,
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        id
    }
}

fn child_path(parent_path: &str, ordinal: usize) -> String {
    if parent_path.is_empty() {
        ordinal.to_string()
    } else {
        format!("{parent_path}.{ordinal}")
    }
}

fn parse_markup(markup: &str) -> Result<Tree, String> {
    let mut reader = Reader::from_str(markup);
    let mut tree = Tree::empty();
    let mut open: Vec<NodeId> = Vec::new();

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(err) => {
                return Err(format!("{err} (byte {})", reader.buffer_position()));
            }
        };
        match event {
            Event::Start(start) => {
                let id = open_element(&mut tree, open.last().copied(), &start)?;
                open.push(id);
            }
            Event::Empty(start) => {
                open_element(&mut tree, open.last().copied(), &start)?;
                if open.is_empty() {
                    break;
                }
            }
            Event::End(_) => {
                if open.pop().is_none() {
                    return Err("closing tag without matching element".to_string());
                }
                if open.is_empty() {
                    break;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(unclosed) = open.last() {
        return Err(format!("unclosed element <{}>", tree.node(*unclosed).tag()));
    }
    Ok(tree)
}

fn open_element(
    tree: &mut Tree,
    parent: Option<NodeId>,
    start: &BytesStart<'_>,
) -> Result<NodeId, String> {
    let tag = std::str::from_utf8(start.name().as_ref())
        .map_err(|err| format!("invalid tag name: {err}"))?
        .to_string();

    let mut attributes = BTreeMap::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|err| format!("invalid attribute on <{tag}>: {err}"))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|err| format!("invalid attribute name on <{tag}>: {err}"))?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|err| format!("invalid value for {key} on <{tag}>: {err}"))?
            .into_owned();
        attributes.insert(key, value);
    }

    let path = match parent {
        Some(parent_id) => {
            let node = tree.node(parent_id);
            child_path(node.path(), node.children().len())
        }
        None => String::new(),
    };
    Ok(tree.push(tag, attributes, parent, path))
}
