// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dryad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dryad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::fmt;

use super::ids::NodeId;
use super::node::MapNode;

/// The in-memory tree the TUI runs against.
///
/// This is a view model: node text, fold state, and ordering. Loading and
/// saving map documents is the concern of an outer layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MindMap {
    nodes: BTreeMap<NodeId, MapNode>,
    root_id: NodeId,
    next_seq: u64,
}

impl MindMap {
    pub fn new(root_text: impl Into<String>) -> Self {
        let root_id = NodeId::new("n:0").expect("root id");
        let mut nodes = BTreeMap::new();
        nodes.insert(root_id.clone(), MapNode::new(root_text, None));
        Self {
            nodes,
            root_id,
            next_seq: 1,
        }
    }

    pub fn root_id(&self) -> &NodeId {
        &self.root_id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, node_id: &NodeId) -> bool {
        self.nodes.contains_key(node_id)
    }

    pub fn node(&self, node_id: &NodeId) -> Result<&MapNode, MapError> {
        self.nodes
            .get(node_id)
            .ok_or_else(|| MapError::NodeNotFound {
                node_id: node_id.clone(),
            })
    }

    pub fn node_mut(&mut self, node_id: &NodeId) -> Result<&mut MapNode, MapError> {
        self.nodes
            .get_mut(node_id)
            .ok_or_else(|| MapError::NodeNotFound {
                node_id: node_id.clone(),
            })
    }

    pub fn nodes(&self) -> impl Iterator<Item = (&NodeId, &MapNode)> {
        self.nodes.iter()
    }

    fn fresh_node_id(&mut self) -> NodeId {
        loop {
            let candidate = NodeId::new(format!("n:{}", self.next_seq)).expect("node id");
            self.next_seq = self.next_seq.wrapping_add(1);
            if !self.nodes.contains_key(&candidate) {
                return candidate;
            }
        }
    }

    /// Appends a new child under `parent_id` and returns its id.
    pub fn add_child(
        &mut self,
        parent_id: &NodeId,
        text: impl Into<String>,
    ) -> Result<NodeId, MapError> {
        if !self.nodes.contains_key(parent_id) {
            return Err(MapError::NodeNotFound {
                node_id: parent_id.clone(),
            });
        }

        let child_id = self.fresh_node_id();
        self.nodes.insert(
            child_id.clone(),
            MapNode::new(text, Some(parent_id.clone())),
        );
        self.nodes
            .get_mut(parent_id)
            .expect("parent checked above")
            .children_mut()
            .push(child_id.clone());
        Ok(child_id)
    }

    /// Inserts a new sibling directly after `node_id` and returns its id.
    ///
    /// The root has no siblings; a sibling request on the root becomes a
    /// child of the root instead, matching how mind maps grow from the
    /// center outward.
    pub fn add_sibling_after(
        &mut self,
        node_id: &NodeId,
        text: impl Into<String>,
    ) -> Result<NodeId, MapError> {
        let parent_id = match self.node(node_id)?.parent() {
            Some(parent_id) => parent_id.clone(),
            None => return self.add_child(&self.root_id.clone(), text),
        };

        let sibling_id = self.fresh_node_id();
        self.nodes.insert(
            sibling_id.clone(),
            MapNode::new(text, Some(parent_id.clone())),
        );

        let parent = self
            .nodes
            .get_mut(&parent_id)
            .expect("parent of an existing node");
        let insert_at = parent
            .children()
            .iter()
            .position(|child| child == node_id)
            .map(|idx| idx + 1)
            .unwrap_or(parent.children().len());
        parent.children_mut().insert(insert_at, sibling_id.clone());
        Ok(sibling_id)
    }

    /// Removes `node_id` and its entire subtree.
    pub fn remove_subtree(&mut self, node_id: &NodeId) -> Result<(), MapError> {
        if node_id == &self.root_id {
            return Err(MapError::CannotRemoveRoot);
        }

        let parent_id = self
            .node(node_id)?
            .parent()
            .cloned()
            .expect("non-root node has a parent");

        let mut pending = vec![node_id.clone()];
        while let Some(current) = pending.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                pending.extend(node.children().iter().cloned());
            }
        }

        if let Some(parent) = self.nodes.get_mut(&parent_id) {
            parent.children_mut().retain(|child| child != node_id);
        }
        Ok(())
    }

    /// Moves `node_id` together with its subtree under `new_parent_id`,
    /// inserting at `insert_at` (clamped to the end of the child list).
    /// Moving the root or moving a node into its own subtree is rejected.
    pub fn move_subtree(
        &mut self,
        node_id: &NodeId,
        new_parent_id: &NodeId,
        insert_at: usize,
    ) -> Result<(), MapError> {
        if node_id == &self.root_id {
            return Err(MapError::CannotMoveRoot);
        }
        let old_parent_id = self
            .node(node_id)?
            .parent()
            .cloned()
            .expect("non-root node has a parent");
        if !self.nodes.contains_key(new_parent_id) {
            return Err(MapError::NodeNotFound {
                node_id: new_parent_id.clone(),
            });
        }

        // The destination must not lie inside the moved subtree.
        let mut current = new_parent_id.clone();
        loop {
            if &current == node_id {
                return Err(MapError::WouldCreateCycle {
                    node_id: node_id.clone(),
                });
            }
            match self.nodes.get(&current).and_then(|node| node.parent()) {
                Some(parent) => current = parent.clone(),
                None => break,
            }
        }

        if let Some(old_parent) = self.nodes.get_mut(&old_parent_id) {
            old_parent.children_mut().retain(|child| child != node_id);
        }
        let new_parent = self
            .nodes
            .get_mut(new_parent_id)
            .expect("new parent checked above");
        let insert_at = insert_at.min(new_parent.children().len());
        new_parent.children_mut().insert(insert_at, node_id.clone());
        self.node_mut(node_id)?
            .set_parent(Some(new_parent_id.clone()));
        Ok(())
    }

    pub fn set_text(&mut self, node_id: &NodeId, text: impl Into<String>) -> Result<(), MapError> {
        self.node_mut(node_id)?.set_text(text);
        Ok(())
    }

    pub fn toggle_folded(&mut self, node_id: &NodeId) -> Result<bool, MapError> {
        let node = self.node_mut(node_id)?;
        let folded = !node.folded();
        node.set_folded(folded);
        Ok(folded)
    }

    /// Walks the visible tree (children of folded nodes excluded) in
    /// depth-first order starting at the root.
    pub fn visible_nodes(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut pending = vec![self.root_id.clone()];
        while let Some(current) = pending.pop() {
            let Some(node) = self.nodes.get(&current) else {
                continue;
            };
            out.push(current);
            if !node.folded() {
                pending.extend(node.children().iter().rev().cloned());
            }
        }
        out
    }

    /// True when `node_id` is hidden behind a folded ancestor.
    pub fn is_hidden(&self, node_id: &NodeId) -> bool {
        let mut current = node_id.clone();
        while let Some(parent_id) = self.nodes.get(&current).and_then(|node| node.parent()) {
            match self.nodes.get(parent_id) {
                Some(parent) if parent.folded() => return true,
                Some(_) => current = parent_id.clone(),
                None => return false,
            }
        }
        false
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    NodeNotFound { node_id: NodeId },
    CannotRemoveRoot,
    CannotMoveRoot,
    WouldCreateCycle { node_id: NodeId },
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NodeNotFound { node_id } => write!(f, "node not found (id={node_id})"),
            Self::CannotRemoveRoot => f.write_str("the root node cannot be removed"),
            Self::CannotMoveRoot => f.write_str("the root node cannot be moved"),
            Self::WouldCreateCycle { node_id } => {
                write!(f, "cannot move {node_id} into its own subtree")
            }
        }
    }
}

impl std::error::Error for MapError {}
