/// Element kinds the converter distinguishes inside a property list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Dict,
    Array,
    Key,
    String,
    /// Any other element, keeping its tag name (`integer`, `true`, `plist`, ...).
    Other(String),
}

impl NodeKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "dict" => NodeKind::Dict,
            "array" => NodeKind::Array,
            "key" => NodeKind::Key,
            "string" => NodeKind::String,
            other => NodeKind::Other(other.to_string()),
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            NodeKind::Dict => "dict",
            NodeKind::Array => "array",
            NodeKind::Key => "key",
            NodeKind::String => "string",
            NodeKind::Other(tag) => tag,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, NodeKind::Dict | NodeKind::Array)
    }
}

/// A node of a parsed property list.
/// 屬性清單解析後的節點。
///
/// Containers carry ordered children; leaves carry an optional text payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    kind: NodeKind,
    text: Option<String>,
    children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            text: None,
            children: Vec::new(),
        }
    }

    pub fn dict(children: Vec<TreeNode>) -> Self {
        Self {
            kind: NodeKind::Dict,
            text: None,
            children,
        }
    }

    pub fn array(children: Vec<TreeNode>) -> Self {
        Self {
            kind: NodeKind::Array,
            text: None,
            children,
        }
    }

    pub fn key(text: impl Into<String>) -> Self {
        Self::leaf(NodeKind::Key, Some(text.into()))
    }

    pub fn string(text: impl Into<String>) -> Self {
        Self::leaf(NodeKind::String, Some(text.into()))
    }

    pub fn leaf(kind: NodeKind, text: Option<String>) -> Self {
        Self {
            kind,
            text,
            children: Vec::new(),
        }
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn children(&self) -> &[TreeNode] {
        &self.children
    }

    pub fn is_container(&self) -> bool {
        self.kind.is_container()
    }

    pub(crate) fn push_child(&mut self, child: TreeNode) {
        self.children.push(child);
    }

    pub(crate) fn push_text(&mut self, text: &str) {
        match &mut self.text {
            Some(existing) => existing.push_str(text),
            None => self.text = Some(text.to_string()),
        }
    }

    pub(crate) fn into_children(self) -> Vec<TreeNode> {
        self.children
    }
}
