// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dryad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dryad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Dryad — terminal mind mapping (tree canvas + in-place node editing).

pub mod config;
pub mod edit;
pub mod i18n;
pub mod layout;
pub mod mapview;
pub mod model;
pub mod props;
pub mod render;
pub mod spell;
pub mod tui;
