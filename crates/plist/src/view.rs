use thiserror::Error;

use crate::node::{NodeKind, TreeNode};

/// Raised when the tree does not have the container shape the caller requires.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unexpected plist structure: expected {expected}, found {found}")]
pub struct StructureError {
    pub expected: &'static str,
    pub found: String,
}

impl StructureError {
    pub fn new(expected: &'static str, found: impl Into<String>) -> Self {
        Self {
            expected,
            found: found.into(),
        }
    }
}

/// Read-only structural view over a parsed property list.
/// 已解析屬性清單的唯讀結構檢視。
#[derive(Debug, Clone, Copy)]
pub struct PlistView<'a> {
    root: &'a TreeNode,
}

impl<'a> PlistView<'a> {
    pub fn new(root: &'a TreeNode) -> Result<Self, StructureError> {
        if !root.is_container() {
            return Err(StructureError::new("dict or array", root.kind().tag()));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &'a TreeNode {
        self.root
    }

    pub fn keys_of(&self, node: &'a TreeNode) -> Vec<&'a TreeNode> {
        children_of_kind(node, &NodeKind::Key)
    }

    pub fn strings_of(&self, node: &'a TreeNode) -> Vec<&'a TreeNode> {
        children_of_kind(node, &NodeKind::String)
    }

    pub fn dicts_of(&self, node: &'a TreeNode) -> Vec<&'a TreeNode> {
        children_of_kind(node, &NodeKind::Dict)
    }

    pub fn arrays_of(&self, node: &'a TreeNode) -> Vec<&'a TreeNode> {
        children_of_kind(node, &NodeKind::Array)
    }

    /// Pairs every key of a dictionary with the value node that follows it.
    ///
    /// A key followed directly by another key (or by nothing) is skipped.
    pub fn entries_of(&self, node: &'a TreeNode) -> Vec<(&'a str, &'a TreeNode)> {
        let mut entries = Vec::new();
        let mut pending: Option<&'a str> = None;
        for child in node.children() {
            if child.kind() == &NodeKind::Key {
                pending = Some(child.text().unwrap_or_default());
            } else if let Some(key) = pending.take() {
                entries.push((key, child));
            }
        }
        entries
    }

    /// Looks up the value stored under `key` in a dictionary node.
    pub fn value_of(&self, node: &'a TreeNode, key: &str) -> Option<&'a TreeNode> {
        self.entries_of(node)
            .into_iter()
            .find_map(|(name, value)| (name == key).then_some(value))
    }
}

fn children_of_kind<'a>(node: &'a TreeNode, kind: &NodeKind) -> Vec<&'a TreeNode> {
    node.children()
        .iter()
        .filter(|child| child.kind() == kind)
        .collect()
}
