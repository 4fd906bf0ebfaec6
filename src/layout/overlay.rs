// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dryad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dryad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::tree::{NodePlacement, Side};

/// Minimum sizes for the in-place edit overlay.
///
/// Defaults are tuned for pixel-based surfaces; `cells()` scales them for a
/// character-cell canvas. A leaf or folded node gets a wider input so short
/// labels stay comfortably editable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayMinima {
    pub leaf_min_width: u32,
    pub min_width: u32,
    pub min_height: u32,
    pub width_padding: u32,
    pub height_padding: u32,
}

impl Default for OverlayMinima {
    fn default() -> Self {
        Self {
            leaf_min_width: 150,
            min_width: 50,
            min_height: 20,
            width_padding: 3,
            height_padding: 2,
        }
    }
}

impl OverlayMinima {
    /// Minima for a character-cell canvas.
    pub fn cells() -> Self {
        Self {
            leaf_min_width: 16,
            min_width: 6,
            min_height: 1,
            width_padding: 0,
            height_padding: 0,
        }
    }
}

/// Text alignment inside the overlay input. Left-side nodes grow leftward
/// and align their text to the right edge, mirroring the tree symmetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalAlignment {
    Left,
    Right,
}

/// Render metrics of the node under edit, read-only input to the resolver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeRenderMetrics {
    pub text_x: i32,
    pub text_y: i32,
    pub text_width: u32,
    pub text_height: u32,
    pub side: Side,
    pub folded: bool,
    pub has_children: bool,
    pub zoom: f32,
}

impl NodeRenderMetrics {
    pub fn from_placement(placement: &NodePlacement, zoom: f32) -> Self {
        Self {
            text_x: placement.text_x(),
            text_y: placement.text_y(),
            text_width: placement.text_width(),
            text_height: 1,
            side: placement.side(),
            folded: placement.folded(),
            has_children: placement.has_children(),
            zoom,
        }
    }

    fn is_leaf_or_folded(&self) -> bool {
        self.folded || !self.has_children
    }
}

/// Computed overlay rectangle; immutable once a session starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayBounds {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub halign: HorizontalAlignment,
}

/// Computes the overlay rectangle for an edit session.
///
/// Starts from the node's rendered text box, pads small nodes up to the
/// applicable minimum (leaf minimum for leaf/folded nodes, generic minimum
/// otherwise), extending left when the node sits on the left half of the
/// map. Height is clamped to the minimum height. Total: every input yields
/// a valid, non-negative rectangle.
pub fn resolve_overlay_bounds(
    metrics: &NodeRenderMetrics,
    minima: &OverlayMinima,
) -> OverlayBounds {
    let zoom = if metrics.zoom.is_finite() && metrics.zoom > 0.0 {
        metrics.zoom
    } else {
        1.0
    };
    let scaled_text_width = (metrics.text_width as f32 * zoom).round() as u32;
    let scaled_text_height = (metrics.text_height as f32 * zoom).round() as u32;

    let mut width = scaled_text_width + minima.width_padding;
    let mut x = metrics.text_x;
    let mut halign = HorizontalAlignment::Left;

    let minimum = if metrics.is_leaf_or_folded() {
        minima.leaf_min_width
    } else {
        minima.min_width
    };
    if width < minimum {
        let extension = minimum - width;
        width = minimum;
        if metrics.side.is_left() {
            x -= extension as i32;
            halign = HorizontalAlignment::Right;
        }
    }

    let height = (scaled_text_height + minima.height_padding).max(minima.min_height);

    OverlayBounds {
        x,
        y: metrics.text_y,
        width,
        height,
        halign,
    }
}
