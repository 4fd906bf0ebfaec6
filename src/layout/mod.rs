// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dryad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dryad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Layout for the map canvas and the edit overlay.
//!
//! This module computes node placement for the mind-map tree and the bounds
//! of the in-place edit overlay.

pub mod overlay;
pub mod tree;

pub use overlay::{
    resolve_overlay_bounds, HorizontalAlignment, NodeRenderMetrics, OverlayBounds, OverlayMinima,
};
pub use tree::{
    label_width, layout_tree, node_label, NodePlacement, Side, TreeLayout, TreeLayoutError,
};
