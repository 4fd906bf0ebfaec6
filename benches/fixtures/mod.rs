// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dryad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dryad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use dryad::model::MindMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    Small,
    WideFanout,
    DeepChain,
    LargeMixed,
}

impl Case {
    pub fn id(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::WideFanout => "wide_fanout",
            Self::DeepChain => "deep_chain",
            Self::LargeMixed => "large_mixed",
        }
    }
}

pub fn map(case: Case) -> MindMap {
    match case {
        Case::Small => build_map(3, 2, 1),
        Case::WideFanout => build_map(24, 1, 1),
        Case::DeepChain => build_map(1, 1, 24),
        Case::LargeMixed => build_map(8, 4, 3),
    }
}

/// Builds a deterministic map: `top` children under the root, each with
/// `fanout` children repeated to `depth` levels.
fn build_map(top: usize, fanout: usize, depth: usize) -> MindMap {
    let mut map = MindMap::new("bench root");
    let root = map.root_id().clone();

    for t in 0..top {
        let child = map
            .add_child(&root, format!("branch {t:03}"))
            .expect("bench child");
        grow(&mut map, &child, fanout, depth, t);
    }
    map
}

fn grow(
    map: &mut MindMap,
    parent: &dryad::model::NodeId,
    fanout: usize,
    depth: usize,
    seed: usize,
) {
    if depth == 0 {
        return;
    }
    for f in 0..fanout {
        let child = map
            .add_child(parent, format!("node {seed:03}-{depth:02}-{f:02}"))
            .expect("bench node");
        grow(map, &child, fanout, depth - 1, seed);
    }
}
