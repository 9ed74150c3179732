use serde::{Deserialize, Serialize};

/// One entry of a flattened navigation tree, in document order.
///
/// The parent/child relation is implicit: a node's children are the nodes
/// that follow it with `level + 1`, up to the next node at `level` or less.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavNode {
    pub level: usize,
    pub label: String,
    pub url: String,
    pub has_children: bool,
}

impl NavNode {
    pub fn new(level: usize, label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            level,
            label: label.into(),
            url: url.into(),
            has_children: false,
        }
    }

    pub fn with_children(mut self, has_children: bool) -> Self {
        self.has_children = has_children;
        self
    }

    pub fn is_top_level(&self) -> bool {
        self.level <= 1
    }
}
