// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dryad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dryad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use smallvec::SmallVec;

use crate::model::{MapNode, MindMap, NodeId};

/// Horizontal gap between a parent's right text edge and a child's left text
/// edge; leaves room for the connector elbow.
const HORIZONTAL_GAP: i32 = 4;
/// Blank rows between adjacent sibling subtrees.
const SIBLING_GAP: i32 = 1;

/// Which half of the map a node renders on. The root sits in the center;
/// every other node inherits the side of its top-level ancestor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
    Center,
}

impl Side {
    pub fn is_left(self) -> bool {
        matches!(self, Self::Left)
    }
}

/// Where a node's label landed on the canvas, in character cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodePlacement {
    node_id: NodeId,
    side: Side,
    text_x: i32,
    text_y: i32,
    text_width: u32,
    folded: bool,
    has_children: bool,
}

impl NodePlacement {
    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn text_x(&self) -> i32 {
        self.text_x
    }

    pub fn text_y(&self) -> i32 {
        self.text_y
    }

    pub fn text_width(&self) -> u32 {
        self.text_width
    }

    pub fn folded(&self) -> bool {
        self.folded
    }

    pub fn has_children(&self) -> bool {
        self.has_children
    }
}

/// Deterministic "coordinates-only" layout for a mind map.
///
/// Baseline rules:
/// - the root is centered between its two halves
/// - root children alternate right/left by child order; subtrees inherit
/// - rows are packed per side, parent centered over its visible subtree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeLayout {
    placements: BTreeMap<NodeId, NodePlacement>,
    width: u32,
    height: u32,
}

impl TreeLayout {
    pub fn placements(&self) -> &BTreeMap<NodeId, NodePlacement> {
        &self.placements
    }

    pub fn placement(&self, node_id: &NodeId) -> Option<&NodePlacement> {
        self.placements.get(node_id)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeLayoutError {
    MissingNode { node_id: NodeId },
}

impl std::fmt::Display for TreeLayoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingNode { node_id } => {
                write!(f, "layout references unknown node {node_id}")
            }
        }
    }
}

impl std::error::Error for TreeLayoutError {}

/// The label a node renders as: its text plus a fold marker when children
/// are hidden. Empty text still occupies one cell so the node stays
/// selectable and editable.
pub fn node_label(node: &MapNode) -> String {
    let mut label = if node.text().is_empty() {
        " ".to_owned()
    } else {
        node.text().to_owned()
    };
    if node.folded() && node.has_children() {
        label.push_str(" ⊕");
    }
    label
}

pub fn label_width(node: &MapNode) -> u32 {
    node_label(node).chars().count() as u32
}

pub fn layout_tree(map: &MindMap) -> Result<TreeLayout, TreeLayoutError> {
    let root_id = map.root_id().clone();
    let root = map
        .node(&root_id)
        .map_err(|_| TreeLayoutError::MissingNode {
            node_id: root_id.clone(),
        })?;
    let root_width = label_width(root);

    let mut right_children = SmallVec::<[NodeId; 8]>::new();
    let mut left_children = SmallVec::<[NodeId; 8]>::new();
    if !root.folded() {
        for (idx, child) in root.children().iter().enumerate() {
            if idx % 2 == 0 {
                right_children.push(child.clone());
            } else {
                left_children.push(child.clone());
            }
        }
    }

    let mut placements = BTreeMap::new();
    placements.insert(
        root_id.clone(),
        NodePlacement {
            node_id: root_id.clone(),
            side: Side::Center,
            text_x: 0,
            text_y: 0,
            text_width: root_width,
            folded: root.folded(),
            has_children: root.has_children(),
        },
    );

    place_side(
        map,
        &right_children,
        Side::Right,
        root_width as i32 + HORIZONTAL_GAP,
        &mut placements,
    )?;
    place_side(map, &left_children, Side::Left, -HORIZONTAL_GAP, &mut placements)?;

    Ok(normalize(placements))
}

/// Lays out one half of the map in its own frame and recenters the band on
/// the root row.
fn place_side(
    map: &MindMap,
    children: &[NodeId],
    side: Side,
    anchor_x: i32,
    placements: &mut BTreeMap<NodeId, NodePlacement>,
) -> Result<(), TreeLayoutError> {
    if children.is_empty() {
        return Ok(());
    }

    let mut total = 0i32;
    let mut heights = SmallVec::<[i32; 8]>::new();
    for child in children {
        let height = subtree_height(map, child)?;
        heights.push(height);
        total += height;
    }
    total += SIBLING_GAP * (children.len() as i32 - 1);

    // Center the band vertically on the root row (y = 0 before normalize).
    let mut top = -((total - 1) / 2);
    for (child, height) in children.iter().zip(heights) {
        place_subtree(map, child, side, anchor_x, top, placements)?;
        top += height + SIBLING_GAP;
    }
    Ok(())
}

fn subtree_height(map: &MindMap, node_id: &NodeId) -> Result<i32, TreeLayoutError> {
    let node = map.node(node_id).map_err(|_| TreeLayoutError::MissingNode {
        node_id: node_id.clone(),
    })?;
    if node.folded() || !node.has_children() {
        return Ok(1);
    }

    let mut total = 0i32;
    for child in node.children() {
        total += subtree_height(map, child)?;
    }
    total += SIBLING_GAP * (node.children().len() as i32 - 1);
    Ok(total.max(1))
}

/// Places `node_id` and its visible descendants. `anchor_x` is the label's
/// left edge on the right side and its right edge (exclusive) on the left
/// side, so the two halves mirror each other.
fn place_subtree(
    map: &MindMap,
    node_id: &NodeId,
    side: Side,
    anchor_x: i32,
    top: i32,
    placements: &mut BTreeMap<NodeId, NodePlacement>,
) -> Result<i32, TreeLayoutError> {
    let node = map.node(node_id).map_err(|_| TreeLayoutError::MissingNode {
        node_id: node_id.clone(),
    })?;
    let width = label_width(node);
    let text_x = match side {
        Side::Left => anchor_x - width as i32,
        _ => anchor_x,
    };

    let text_y = if node.folded() || !node.has_children() {
        top
    } else {
        let child_anchor_x = match side {
            Side::Left => text_x - HORIZONTAL_GAP,
            _ => text_x + width as i32 + HORIZONTAL_GAP,
        };

        let mut child_top = top;
        let mut first_row = None;
        let mut last_row = top;
        for child in node.children() {
            let height = subtree_height(map, child)?;
            let row = place_subtree(map, child, side, child_anchor_x, child_top, placements)?;
            first_row.get_or_insert(row);
            last_row = row;
            child_top += height + SIBLING_GAP;
        }

        let first_row = first_row.unwrap_or(top);
        (first_row + last_row) / 2
    };

    placements.insert(
        node_id.clone(),
        NodePlacement {
            node_id: node_id.clone(),
            side,
            text_x,
            text_y,
            text_width: width,
            folded: node.folded(),
            has_children: node.has_children(),
        },
    );
    Ok(text_y)
}

/// Shifts all placements into non-negative coordinates and derives the
/// bounding box.
fn normalize(mut placements: BTreeMap<NodeId, NodePlacement>) -> TreeLayout {
    let min_x = placements.values().map(|p| p.text_x).min().unwrap_or(0);
    let min_y = placements.values().map(|p| p.text_y).min().unwrap_or(0);
    let mut max_x = 0i32;
    let mut max_y = 0i32;

    for placement in placements.values_mut() {
        placement.text_x -= min_x;
        placement.text_y -= min_y;
        max_x = max_x.max(placement.text_x + placement.text_width as i32);
        max_y = max_y.max(placement.text_y + 1);
    }

    TreeLayout {
        placements,
        width: max_x.max(0) as u32,
        height: max_y.max(0) as u32,
    }
}
