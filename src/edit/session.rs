// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dryad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dryad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::layout::{resolve_overlay_bounds, NodeRenderMetrics, OverlayBounds, OverlayMinima};
use crate::model::{FieldId, NodeId};
use crate::spell::{register_best_effort, SpellCheckConfig, SpellCheckService};

use super::listener::{EditTransition, InputEvent, InputListener};

/// Session lifecycle. `Committing` and `Cancelled` are terminal and set at
/// most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditState {
    Active,
    Committing,
    Cancelled,
}

impl EditState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Active)
    }
}

/// The editing consumer; each callback fires exactly once per session.
pub trait EditConsumer {
    fn commit(&mut self, text: &str);
    fn cancel(&mut self);
}

/// The surface the overlay lives on.
///
/// `release_listeners` is always called before `remove_overlay` so no
/// callback can fire into a torn-down session.
pub trait OverlayHost {
    fn attach_overlay(&mut self, bounds: &OverlayBounds);
    fn move_overlay(&mut self, bounds: &OverlayBounds);
    fn grant_focus(&mut self);
    fn release_listeners(&mut self);
    fn remove_overlay(&mut self);
}

/// A short-lived controller for editing one node's text in place.
///
/// Owns the overlay, the input listener, and the state machine; resolves to
/// either a committed value or a cancellation and then goes inert.
#[derive(Debug)]
pub struct EditSession {
    node_id: NodeId,
    field_id: FieldId,
    original_text: String,
    listener: InputListener,
    state: EditState,
    bounds: OverlayBounds,
    focus_pending: bool,
    spell_registered: bool,
}

impl EditSession {
    /// Attaches the overlay and starts the session.
    ///
    /// Focus is granted on the next [`pump`](Self::pump), one event-loop
    /// turn after attachment, so the overlay never races components that
    /// are still rendering. Spell-check registration is best-effort and
    /// cannot fail the session.
    pub fn begin(
        node_id: NodeId,
        text: impl Into<String>,
        metrics: &NodeRenderMetrics,
        minima: &OverlayMinima,
        spell_service: &mut dyn SpellCheckService,
        spell_config: &SpellCheckConfig,
        host: &mut dyn OverlayHost,
    ) -> Self {
        let text = text.into();
        let bounds = resolve_overlay_bounds(metrics, minima);
        host.attach_overlay(&bounds);

        let field_id = FieldId::new(format!("edit:{node_id}")).expect("field id from node id");
        let spell_registered = register_best_effort(spell_service, spell_config, &field_id);

        Self {
            node_id,
            field_id,
            original_text: text.clone(),
            listener: InputListener::new(text, spell_config.enabled),
            state: EditState::Active,
            bounds,
            focus_pending: true,
            spell_registered,
        }
    }

    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    pub fn field_id(&self) -> &FieldId {
        &self.field_id
    }

    /// The text the node had before editing started; a cancelled session
    /// leaves this value in place.
    pub fn original_text(&self) -> &str {
        &self.original_text
    }

    pub fn text(&self) -> &str {
        self.listener.text()
    }

    pub fn state(&self) -> EditState {
        self.state
    }

    pub fn bounds(&self) -> &OverlayBounds {
        &self.bounds
    }

    pub fn spell_registered(&self) -> bool {
        self.spell_registered
    }

    /// Drains deferred work; currently the attach-then-focus handoff.
    pub fn pump(&mut self, host: &mut dyn OverlayHost) {
        if self.focus_pending && self.state == EditState::Active {
            self.focus_pending = false;
            host.grant_focus();
        }
    }

    /// Feeds one event through the listener and applies the resulting
    /// transition. Events arriving after a terminal state are ignored.
    pub fn handle(
        &mut self,
        event: InputEvent,
        host: &mut dyn OverlayHost,
        consumer: &mut dyn EditConsumer,
    ) {
        if self.state.is_terminal() {
            return;
        }

        match self.listener.interpret(event) {
            EditTransition::Commit(text) => self.finalize(EditState::Committing, &text, host, consumer),
            EditTransition::Cancel => {
                let text = self.listener.text().to_owned();
                self.finalize(EditState::Cancelled, &text, host, consumer);
            }
            EditTransition::Reposition { dx, dy } => {
                self.bounds.x += dx;
                self.bounds.y += dy;
                host.move_overlay(&self.bounds);
            }
            EditTransition::Ignore => {}
        }
    }

    /// Commits the session as-is. Used when an outer invariant forces the
    /// session to end, e.g. a new session starting on the same node.
    pub fn force_commit(&mut self, host: &mut dyn OverlayHost, consumer: &mut dyn EditConsumer) {
        if self.state.is_terminal() {
            return;
        }
        let text = self.listener.text().to_owned();
        self.finalize(EditState::Committing, &text, host, consumer);
    }

    fn finalize(
        &mut self,
        outcome: EditState,
        text: &str,
        host: &mut dyn OverlayHost,
        consumer: &mut dyn EditConsumer,
    ) {
        debug_assert!(outcome.is_terminal());
        self.state = outcome;
        match outcome {
            EditState::Committing => consumer.commit(text),
            EditState::Cancelled => consumer.cancel(),
            EditState::Active => unreachable!("finalize is only called with terminal states"),
        }
        host.release_listeners();
        host.remove_overlay();
    }
}
