use std::collections::HashMap;

use crate::foundation::core::NodeIdx;
use crate::foundation::error::{LiltError, LiltResult};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Structural role of a document node.
pub enum NodeKind {
    /// Document root.
    Root,
    /// One screen of text.
    Page,
    /// A sentence, laid out as one or more lines.
    Sentence,
    /// A spoken word; the unit that highlights.
    #[default]
    Word,
    /// Inter-word material (spaces, punctuation); never highlighted.
    Text,
}

fn default_true() -> bool {
    true
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Owned tree form of a read-along document, as handed over by the host.
pub struct DocumentNode {
    /// Structural role.
    pub kind: NodeKind,
    /// Identifier referenced by cues.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Text content for words and text runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// `false` removes the node (and its subtree) from timing.
    #[serde(default = "default_true")]
    pub highlightable: bool,
    /// Children in reading order.
    #[serde(default)]
    pub children: Vec<DocumentNode>,
}

impl DocumentNode {
    /// An empty node of the given kind.
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            id: None,
            text: None,
            highlightable: true,
            children: Vec::new(),
        }
    }

    /// A word with id and text.
    pub fn word(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(NodeKind::Word).with_id(id).with_text(text)
    }

    /// An inter-word text run.
    pub fn text_run(text: impl Into<String>) -> Self {
        Self::new(NodeKind::Text).with_text(text)
    }

    /// Set the identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the text content.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Append a child.
    pub fn with_child(mut self, child: DocumentNode) -> Self {
        self.children.push(child);
        self
    }

    /// Mark the node as excluded from timing.
    pub fn not_highlightable(mut self) -> Self {
        self.highlightable = false;
        self
    }
}

#[derive(Clone, Debug)]
/// One node of a [`Document`] arena.
pub struct DocEntry {
    /// Structural role.
    pub kind: NodeKind,
    /// Identifier, if any.
    pub id: Option<String>,
    /// Text content, if any.
    pub text: Option<String>,
    /// Whether the node takes part in timing (inherited: false under a
    /// non-highlightable ancestor, always false for text runs).
    pub timed: bool,
    /// Parent index; `None` for the root.
    pub parent: Option<NodeIdx>,
    /// Children in reading order.
    pub children: Vec<NodeIdx>,
}

#[derive(Clone, Debug)]
/// Arena form of a document.
///
/// Nodes are stored in pre-order, so ascending indices are document order and every
/// child index is greater than its parent's.
pub struct Document {
    nodes: Vec<DocEntry>,
    ids: HashMap<String, NodeIdx>,
}

impl Document {
    /// Flatten an owned tree, rejecting duplicate ids.
    pub fn from_tree(root: DocumentNode) -> LiltResult<Self> {
        let mut doc = Self {
            nodes: Vec::new(),
            ids: HashMap::new(),
        };
        doc.push(root, None, true)?;
        Ok(doc)
    }

    /// Decode a JSON document tree.
    pub fn from_json_str(s: &str) -> LiltResult<Self> {
        let root: DocumentNode =
            serde_json::from_str(s).map_err(|e| LiltError::serde(e.to_string()))?;
        Self::from_tree(root)
    }

    fn push(
        &mut self,
        node: DocumentNode,
        parent: Option<NodeIdx>,
        parent_timed: bool,
    ) -> LiltResult<NodeIdx> {
        let idx = NodeIdx::from_usize(self.nodes.len());
        if let Some(id) = &node.id
            && self.ids.insert(id.clone(), idx).is_some()
        {
            return Err(LiltError::validation(format!("duplicate node id '{id}'")));
        }
        let timed = parent_timed && node.highlightable && node.kind != NodeKind::Text;
        self.nodes.push(DocEntry {
            kind: node.kind,
            id: node.id,
            text: node.text,
            timed,
            parent,
            children: Vec::new(),
        });
        let mut children = Vec::with_capacity(node.children.len());
        for child in node.children {
            children.push(self.push(child, Some(idx), timed)?);
        }
        self.nodes[idx.index()].children = children;
        Ok(idx)
    }

    /// The root node.
    pub fn root(&self) -> NodeIdx {
        NodeIdx(0)
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false; a document has at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node by index.
    pub fn node(&self, idx: NodeIdx) -> &DocEntry {
        &self.nodes[idx.index()]
    }

    /// Index of the node carrying `id`.
    pub fn find(&self, id: &str) -> Option<NodeIdx> {
        self.ids.get(id).copied()
    }

    /// All indices in document order.
    pub fn indices(&self) -> impl DoubleEndedIterator<Item = NodeIdx> {
        (0..self.nodes.len()).map(NodeIdx::from_usize)
    }

    /// Children of `idx`.
    pub fn children(&self, idx: NodeIdx) -> &[NodeIdx] {
        &self.nodes[idx.index()].children
    }

    /// Page nodes in order; the root stands in when there are none.
    pub fn pages(&self) -> Vec<NodeIdx> {
        let pages: Vec<NodeIdx> = self
            .indices()
            .filter(|i| self.node(*i).kind == NodeKind::Page)
            .collect();
        if pages.is_empty() {
            vec![self.root()]
        } else {
            pages
        }
    }

    /// Nodes of `kind` inside the subtree of `idx`, in document order.
    pub fn descendants_of_kind(&self, idx: NodeIdx, kind: NodeKind) -> Vec<NodeIdx> {
        let mut out = Vec::new();
        let mut stack = vec![idx];
        while let Some(i) = stack.pop() {
            if self.node(i).kind == kind {
                out.push(i);
            }
            stack.extend(self.children(i).iter().rev());
        }
        out
    }

    /// True when the node takes part in timing.
    pub fn is_timed(&self, idx: NodeIdx) -> bool {
        self.nodes[idx.index()].timed
    }

    /// True when the node has no timed children.
    pub fn is_timed_leaf(&self, idx: NodeIdx) -> bool {
        self.is_timed(idx) && !self.children(idx).iter().any(|c| self.is_timed(*c))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/document/model.rs"]
mod tests;
