// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dryad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dryad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core view model.
//!
//! A mind map is a tree of text nodes with fold state; the model carries no
//! document persistence.

pub mod ids;
pub mod map;
pub mod node;

pub use ids::{FieldId, Id, IdError, NodeId};
pub use map::{MapError, MindMap};
pub use node::MapNode;
