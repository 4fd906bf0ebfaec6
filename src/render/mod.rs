// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dryad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dryad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Rendering for the mind-map canvas.
//!
//! The renderer produces Unicode text output plus a stable placement index
//! that the TUI uses for cell-accurate selection highlighting and for
//! anchoring the in-place edit overlay.

use std::collections::BTreeMap;
use std::fmt;

use crate::layout::{node_label, Side, TreeLayout, TreeLayoutError};
use crate::model::{MindMap, NodeId};

mod text;

pub(crate) use text::{text_len, truncate_with_ellipsis};

/// A contiguous span of cells within a single rendered line.
///
/// Coordinates are `(y, x0, x1)` in character-cell indices, inclusive,
/// relative to the rendered text lines.
pub type LineSpan = (usize, usize, usize);

/// Mapping from node ids to the label span rendered for that node.
pub type PlacementIndex = BTreeMap<NodeId, LineSpan>;

/// Render output plus an index suitable for stable, cell-accurate UI work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapRender {
    pub text: String,
    pub placement_index: PlacementIndex,
    pub width: usize,
    pub height: usize,
}

pub const UNICODE_BOX_HORIZONTAL: char = '─';
pub const UNICODE_BOX_VERTICAL: char = '│';
pub const UNICODE_BOX_TOP_LEFT: char = '┌';
pub const UNICODE_BOX_TOP_RIGHT: char = '┐';
pub const UNICODE_BOX_BOTTOM_LEFT: char = '└';
pub const UNICODE_BOX_BOTTOM_RIGHT: char = '┘';
pub const UNICODE_BOX_TEE_RIGHT: char = '├';
pub const UNICODE_BOX_TEE_LEFT: char = '┤';
pub const UNICODE_BOX_TEE_DOWN: char = '┬';
pub const UNICODE_BOX_TEE_UP: char = '┴';
pub const UNICODE_BOX_CROSS: char = '┼';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BoxEdges(u8);

impl BoxEdges {
    const NONE: Self = Self(0);
    const LEFT: Self = Self(1 << 0);
    const RIGHT: Self = Self(1 << 1);
    const UP: Self = Self(1 << 2);
    const DOWN: Self = Self(1 << 3);

    fn is_empty(self) -> bool {
        self.0 == 0
    }

    fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

fn box_char_from_edges(edges: BoxEdges) -> char {
    match edges.0 {
        // Empty shouldn't normally occur for box cells; treat as blank.
        0 => ' ',
        // Straight segments (including endpoints).
        1..=3 => UNICODE_BOX_HORIZONTAL,
        4 | 8 | 12 => UNICODE_BOX_VERTICAL,
        // Corners.
        10 => UNICODE_BOX_TOP_LEFT,
        9 => UNICODE_BOX_TOP_RIGHT,
        6 => UNICODE_BOX_BOTTOM_LEFT,
        5 => UNICODE_BOX_BOTTOM_RIGHT,
        // Tees.
        14 => UNICODE_BOX_TEE_RIGHT,
        13 => UNICODE_BOX_TEE_LEFT,
        11 => UNICODE_BOX_TEE_DOWN,
        7 => UNICODE_BOX_TEE_UP,
        // Cross.
        15 => UNICODE_BOX_CROSS,
        // Unreachable with 4 bits; keep a deterministic fallback.
        _ => UNICODE_BOX_CROSS,
    }
}

/// A fixed-size, bounds-checked character grid.
///
/// Collision behavior is deterministic:
/// - non-box characters overwrite (last writer wins)
/// - box-drawing edges merge into junctions (`┼`, `├`, `┬`, …) instead of
///   overwriting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: usize,
    height: usize,
    cells: Vec<char>,
    box_edges: Vec<BoxEdges>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Result<Self, CanvasError> {
        let len = width
            .checked_mul(height)
            .ok_or(CanvasError::AreaOverflow { width, height })?;

        Ok(Self {
            width,
            height,
            cells: vec![' '; len],
            box_edges: vec![BoxEdges::NONE; len],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<char> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some(self.cells[y * self.width + x])
    }

    /// Writes a plain character; overwrites whatever was there.
    pub fn set(&mut self, x: usize, y: usize, ch: char) -> Result<(), CanvasError> {
        if !self.in_bounds(x, y) {
            return Err(CanvasError::OutOfBounds { x, y });
        }
        let idx = y * self.width + x;
        self.cells[idx] = ch;
        self.box_edges[idx] = BoxEdges::NONE;
        Ok(())
    }

    /// Writes a string horizontally starting at `(x, y)`.
    pub fn set_text(&mut self, x: usize, y: usize, text: &str) -> Result<(), CanvasError> {
        for (offset, ch) in text.chars().enumerate() {
            self.set(x + offset, y, ch)?;
        }
        Ok(())
    }

    /// Merges box-drawing edges into the cell and rewrites its character.
    fn merge_box(&mut self, x: usize, y: usize, edges: BoxEdges) -> Result<(), CanvasError> {
        if !self.in_bounds(x, y) {
            return Err(CanvasError::OutOfBounds { x, y });
        }
        if edges.is_empty() {
            return Ok(());
        }
        let idx = y * self.width + x;
        let merged = self.box_edges[idx].union(edges);
        self.box_edges[idx] = merged;
        self.cells[idx] = box_char_from_edges(merged);
        Ok(())
    }

    pub fn to_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.height);
        for y in 0..self.height {
            let mut line = String::with_capacity(self.width);
            for x in 0..self.width {
                // (x, y) is in bounds by construction.
                line.push(self.get(x, y).expect("in bounds"));
            }
            lines.push(line.trim_end_matches(' ').to_owned());
        }
        lines
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanvasError {
    AreaOverflow { width: usize, height: usize },
    OutOfBounds { x: usize, y: usize },
}

impl fmt::Display for CanvasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AreaOverflow { width, height } => {
                write!(f, "canvas area overflows ({width}x{height})")
            }
            Self::OutOfBounds { x, y } => write!(f, "cell out of bounds ({x}, {y})"),
        }
    }
}

impl std::error::Error for CanvasError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapRenderError {
    Layout(TreeLayoutError),
    Canvas(CanvasError),
}

impl fmt::Display for MapRenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Layout(err) => write!(f, "layout failed: {err}"),
            Self::Canvas(err) => write!(f, "canvas write failed: {err}"),
        }
    }
}

impl From<TreeLayoutError> for MapRenderError {
    fn from(err: TreeLayoutError) -> Self {
        Self::Layout(err)
    }
}

impl From<CanvasError> for MapRenderError {
    fn from(err: CanvasError) -> Self {
        Self::Canvas(err)
    }
}

impl std::error::Error for MapRenderError {}

/// Renders the map as Unicode text with connector elbows between parents
/// and children, and returns the per-node label spans.
pub fn render_map(map: &MindMap, layout: &TreeLayout) -> Result<MapRender, MapRenderError> {
    let width = layout.width() as usize;
    let height = layout.height() as usize;
    let mut canvas = Canvas::new(width.max(1), height.max(1))?;
    let mut placement_index = PlacementIndex::new();

    // Connectors first; labels overwrite their own cells afterwards.
    for placement in layout.placements().values() {
        let node = match map.node(placement.node_id()) {
            Ok(node) => node,
            Err(_) => {
                return Err(TreeLayoutError::MissingNode {
                    node_id: placement.node_id().clone(),
                }
                .into())
            }
        };
        if node.folded() || !node.has_children() {
            continue;
        }

        let mut right_rows = Vec::new();
        let mut left_rows = Vec::new();
        for child_id in node.children() {
            let Some(child) = layout.placement(child_id) else {
                continue;
            };
            match child.side() {
                Side::Left => left_rows.push(child.text_y()),
                _ => right_rows.push(child.text_y()),
            }
        }

        let py = placement.text_y();
        if !right_rows.is_empty() {
            let stub_x = placement.text_x() + placement.text_width() as i32;
            draw_connector_group(&mut canvas, stub_x, py, &right_rows, Side::Right)?;
        }
        if !left_rows.is_empty() {
            let stub_x = placement.text_x() - 1;
            draw_connector_group(&mut canvas, stub_x, py, &left_rows, Side::Left)?;
        }
    }

    for placement in layout.placements().values() {
        let node = map
            .node(placement.node_id())
            .expect("placement nodes checked above");
        let label = node_label(node);
        let x = placement.text_x().max(0) as usize;
        let y = placement.text_y().max(0) as usize;
        canvas.set_text(x, y, &label)?;

        let span_width = placement.text_width().max(1) as usize;
        placement_index.insert(placement.node_id().clone(), (y, x, x + span_width - 1));
    }

    Ok(MapRender {
        text: canvas.to_lines().join("\n"),
        placement_index,
        width: canvas.width(),
        height: canvas.height(),
    })
}

/// Draws the elbow set between one parent stub and its child rows.
///
/// `stub_x` is the cell directly next to the parent label; the bus column
/// sits one cell beyond it, and each child row gets a short stub back
/// toward its label.
fn draw_connector_group(
    canvas: &mut Canvas,
    stub_x: i32,
    parent_y: i32,
    child_rows: &[i32],
    side: Side,
) -> Result<(), CanvasError> {
    let bus_x = match side {
        Side::Left => stub_x - 1,
        _ => stub_x + 1,
    };
    if stub_x < 0 || bus_x < 0 {
        return Ok(());
    }

    let min_row = child_rows.iter().copied().min().unwrap_or(parent_y).min(parent_y);
    let max_row = child_rows.iter().copied().max().unwrap_or(parent_y).max(parent_y);

    let toward_parent = match side {
        Side::Left => BoxEdges::RIGHT,
        _ => BoxEdges::LEFT,
    };
    let toward_child = match side {
        Side::Left => BoxEdges::LEFT,
        _ => BoxEdges::RIGHT,
    };

    canvas.merge_box(
        stub_x as usize,
        parent_y.max(0) as usize,
        BoxEdges::LEFT.union(BoxEdges::RIGHT),
    )?;

    for row in min_row..=max_row {
        let mut edges = BoxEdges::NONE;
        if row > min_row {
            edges = edges.union(BoxEdges::UP);
        }
        if row < max_row {
            edges = edges.union(BoxEdges::DOWN);
        }
        if row == parent_y {
            edges = edges.union(toward_parent);
        }
        if child_rows.contains(&row) {
            edges = edges.union(toward_child);
        }
        if !edges.is_empty() {
            canvas.merge_box(bus_x as usize, row.max(0) as usize, edges)?;
        }
    }

    for &row in child_rows {
        let child_stub = match side {
            Side::Left => bus_x - 1,
            _ => bus_x + 1,
        };
        for x in connector_stub_range(child_stub, side) {
            canvas.merge_box(
                x as usize,
                row.max(0) as usize,
                BoxEdges::LEFT.union(BoxEdges::RIGHT),
            )?;
        }
    }

    Ok(())
}

/// The two cells between the bus column and a child label.
fn connector_stub_range(start: i32, side: Side) -> std::ops::Range<i32> {
    match side {
        Side::Left => (start - 1).max(0)..start + 1,
        _ => start..start + 2,
    }
}
