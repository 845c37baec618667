//! The on-screen tree: top-level nodes plus the expand state and selection.

use crate::tree::{Children, NodeKind, TreeNode};

/// Identity of a node across re-renders. Paths shift; this does not.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(super) struct NodeKey {
    object_id: Option<String>,
    kind: NodeKind,
    entity_id: Option<String>,
}

impl NodeKey {
    pub(super) fn of(node: &TreeNode) -> Self {
        Self {
            object_id: node.object_id.clone(),
            kind: node.kind.clone(),
            entity_id: node.entity_id.clone(),
        }
    }

    /// A group node under one application.
    pub(super) fn branch(object_id: &str, kind: NodeKind) -> Self {
        Self {
            object_id: Some(object_id.to_string()),
            kind,
            entity_id: None,
        }
    }

    fn matches(&self, node: &TreeNode) -> bool {
        node.kind == self.kind
            && node.object_id == self.object_id
            && node.entity_id == self.entity_id
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct Row {
    pub(super) path: Vec<usize>,
    pub(super) depth: usize,
}

#[derive(Debug, Default)]
pub(super) struct TreeView {
    roots: Vec<TreeNode>,
    selected: usize,
}

impl TreeView {
    pub(super) fn roots(&self) -> &[TreeNode] {
        &self.roots
    }

    /// Replace everything, keeping the selection on the same node when it survives.
    pub(super) fn set_roots(&mut self, nodes: Vec<TreeNode>) {
        let keep = self.selected().map(NodeKey::of);
        self.roots = nodes;
        self.selected = 0;
        if let Some(key) = keep {
            self.select(&key);
        }
    }

    /// Visible rows in display order.
    pub(super) fn rows(&self) -> Vec<Row> {
        fn walk(nodes: &[TreeNode], path: &mut Vec<usize>, out: &mut Vec<Row>) {
            for (i, node) in nodes.iter().enumerate() {
                path.push(i);
                out.push(Row {
                    path: path.clone(),
                    depth: path.len() - 1,
                });
                if node.expanded {
                    walk(node.loaded_children(), path, out);
                }
                path.pop();
            }
        }
        let mut out = Vec::new();
        walk(&self.roots, &mut Vec::new(), &mut out);
        out
    }

    pub(super) fn node(&self, path: &[usize]) -> Option<&TreeNode> {
        let (first, rest) = path.split_first()?;
        let mut node = self.roots.get(*first)?;
        for i in rest {
            node = node.loaded_children().get(*i)?;
        }
        Some(node)
    }

    fn node_mut(&mut self, path: &[usize]) -> Option<&mut TreeNode> {
        let (first, rest) = path.split_first()?;
        let mut node = self.roots.get_mut(*first)?;
        for i in rest {
            node = match &mut node.children {
                Children::Loaded(children) => children.get_mut(*i)?,
                Children::Leaf | Children::Lazy => return None,
            };
        }
        Some(node)
    }

    pub(super) fn selected_index(&self) -> usize {
        self.selected
    }

    pub(super) fn selected_path(&self) -> Option<Vec<usize>> {
        self.rows().into_iter().nth(self.selected).map(|r| r.path)
    }

    pub(super) fn selected(&self) -> Option<&TreeNode> {
        self.node(&self.selected_path()?)
    }

    pub(super) fn move_by(&mut self, delta: isize) {
        let n = self.rows().len();
        if n == 0 {
            self.selected = 0;
            return;
        }
        self.selected = self.selected.saturating_add_signed(delta).min(n - 1);
    }

    pub(super) fn move_to_end(&mut self) {
        self.selected = self.rows().len().saturating_sub(1);
    }

    pub(super) fn move_to_start(&mut self) {
        self.selected = 0;
    }

    /// Select the node with `key` if it is visible.
    pub(super) fn select(&mut self, key: &NodeKey) -> bool {
        let rows = self.rows();
        match rows
            .iter()
            .position(|r| self.node(&r.path).is_some_and(|n| key.matches(n)))
        {
            Some(i) => {
                self.selected = i;
                true
            }
            None => {
                self.selected = self.selected.min(rows.len().saturating_sub(1));
                false
            }
        }
    }

    /// Path of the first node with `key`, searching loaded nodes only.
    pub(super) fn locate(&self, key: &NodeKey) -> Option<Vec<usize>> {
        fn walk(nodes: &[TreeNode], key: &NodeKey, path: &mut Vec<usize>) -> bool {
            for (i, node) in nodes.iter().enumerate() {
                path.push(i);
                if key.matches(node) || walk(node.loaded_children(), key, path) {
                    return true;
                }
                path.pop();
            }
            false
        }
        let mut path = Vec::new();
        walk(&self.roots, key, &mut path).then_some(path)
    }

    pub(super) fn find(&self, key: &NodeKey) -> Option<&TreeNode> {
        self.node(&self.locate(key)?)
    }

    /// Show the already-loaded children of the node at `path`.
    /// False when the children still have to be fetched.
    pub(super) fn open(&mut self, path: &[usize]) -> bool {
        let Some(node) = self.node_mut(path) else {
            return false;
        };
        match node.children {
            Children::Loaded(_) => {
                node.expanded = true;
                true
            }
            Children::Leaf | Children::Lazy => false,
        }
    }

    pub(super) fn close(&mut self, path: &[usize]) {
        if let Some(node) = self.node_mut(path) {
            node.expanded = false;
        }
        let keep = self.node(path).map(NodeKey::of);
        if let Some(key) = keep {
            self.select(&key);
        }
    }

    /// Move the selection to the parent of the selected node.
    pub(super) fn select_parent(&mut self) {
        let Some(mut path) = self.selected_path() else {
            return;
        };
        if path.len() < 2 {
            return;
        }
        path.pop();
        let key = self.node(&path).map(NodeKey::of);
        if let Some(key) = key {
            self.select(&key);
        }
    }

    /// Adopt freshly fetched children under the node with `key` and expand it.
    pub(super) fn set_children(&mut self, key: &NodeKey, children: Vec<TreeNode>) -> bool {
        let keep = self.selected().map(NodeKey::of);
        let Some(path) = self.locate(key) else {
            return false;
        };
        let Some(node) = self.node_mut(&path) else {
            return false;
        };
        node.children = if children.is_empty() {
            Children::Leaf
        } else {
            Children::Loaded(children)
        };
        node.expanded = !matches!(node.children, Children::Leaf);
        if let Some(k) = keep {
            self.select(&k);
        }
        true
    }

    /// Swap one application's subtree, or drop it when `node` is `None`.
    pub(super) fn replace_application(&mut self, object_id: &str, node: Option<TreeNode>) {
        let keep = self.selected().map(NodeKey::of);
        let Some(i) = self
            .roots
            .iter()
            .position(|n| n.kind == NodeKind::Application && n.object_id.as_deref() == Some(object_id))
        else {
            return;
        };
        match node {
            Some(mut fresh) => {
                fresh.expanded = self.roots[i].expanded;
                self.roots[i] = fresh;
            }
            None => {
                self.roots.remove(i);
            }
        }
        self.selected = 0;
        match keep {
            Some(k) if self.select(&k) => {}
            _ => self.selected = i.min(self.rows().len().saturating_sub(1)),
        }
    }
}

#[cfg(test)]
#[path = "../tests/tui_shell/tree_view_tests.rs"]
mod tests;
