// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dryad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dryad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! In-place node editing.
//!
//! An edit session floats a text overlay over the canvas, interprets input
//! into commit/cancel transitions, and reports the outcome to the editing
//! consumer exactly once. At most one session exists per node at a time;
//! whoever owns the session finalizes any prior one before starting the
//! next.

pub mod listener;
pub mod session;

pub use listener::{EditKey, EditTransition, InputEvent, InputListener, Modifiers};
pub use session::{EditConsumer, EditSession, EditState, OverlayHost};
