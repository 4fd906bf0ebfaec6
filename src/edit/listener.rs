// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dryad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dryad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Modifier keys held while a key event fired.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub alt: bool,
    pub ctrl: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        alt: false,
        ctrl: false,
        meta: false,
    };

    fn any(self) -> bool {
        self.alt || self.ctrl || self.meta
    }
}

/// Keys the editor cares about; everything else arrives as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKey {
    Enter,
    Escape,
    Backspace,
    Char(char),
    Other,
}

/// Toolkit-agnostic events fed into the listener. The app shell translates
/// terminal events into these; tests construct them directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Key { key: EditKey, modifiers: Modifiers },
    FocusGained,
    FocusLost,
    /// Right-click or menu key inside the overlay.
    ContextMenu,
    /// The context-menu interaction finished (mouse released / menu closed).
    MenuClosed,
    AnchorResized,
    AnchorMoved,
    AnchorHidden,
    /// The viewport scrolled or panned under the overlay.
    ViewScrolled { dx: i32, dy: i32 },
}

/// What an event means for the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditTransition {
    Commit(String),
    Cancel,
    Ignore,
    Reposition { dx: i32, dy: i32 },
}

/// Interprets key/mouse/focus/anchor events into session transitions and
/// owns the text buffer while a session is active.
///
/// Opening the context menu while spell-check is enabled suppresses the next
/// focus loss: the menu steals focus from the overlay, and committing on
/// that would end the edit under the user's pointer. The suppression is
/// re-armed when the menu interaction completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputListener {
    buffer: String,
    spell_check_enabled: bool,
    suppress_focus_commit: bool,
}

impl InputListener {
    pub fn new(initial_text: impl Into<String>, spell_check_enabled: bool) -> Self {
        Self {
            buffer: initial_text.into(),
            spell_check_enabled,
            suppress_focus_commit: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn interpret(&mut self, event: InputEvent) -> EditTransition {
        match event {
            InputEvent::Key { key, modifiers } => self.interpret_key(key, modifiers),
            InputEvent::FocusGained => EditTransition::Ignore,
            InputEvent::FocusLost => {
                if self.suppress_focus_commit {
                    EditTransition::Ignore
                } else {
                    EditTransition::Commit(self.buffer.clone())
                }
            }
            InputEvent::ContextMenu => {
                if self.spell_check_enabled {
                    self.suppress_focus_commit = true;
                }
                EditTransition::Ignore
            }
            InputEvent::MenuClosed => {
                self.suppress_focus_commit = false;
                EditTransition::Ignore
            }
            // Losing the anchor is the same commit-triggering class as
            // losing focus: the edit must not outlive the node it floats on.
            InputEvent::AnchorResized | InputEvent::AnchorMoved | InputEvent::AnchorHidden => {
                EditTransition::Commit(self.buffer.clone())
            }
            InputEvent::ViewScrolled { dx, dy } => EditTransition::Reposition { dx, dy },
        }
    }

    fn interpret_key(&mut self, key: EditKey, modifiers: Modifiers) -> EditTransition {
        // Alt/Ctrl/Meta chords belong to the OS or the outer shell.
        if modifiers.any() {
            return EditTransition::Ignore;
        }

        match key {
            EditKey::Enter => EditTransition::Commit(self.buffer.clone()),
            EditKey::Escape => EditTransition::Cancel,
            EditKey::Backspace => {
                self.buffer.pop();
                EditTransition::Ignore
            }
            EditKey::Char(ch) => {
                self.buffer.push(ch);
                EditTransition::Ignore
            }
            EditKey::Other => EditTransition::Ignore,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EditKey, EditTransition, InputEvent, InputListener, Modifiers};

    fn key(key: EditKey) -> InputEvent {
        InputEvent::Key {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    fn type_text(listener: &mut InputListener, text: &str) {
        for ch in text.chars() {
            assert_eq!(
                listener.interpret(key(EditKey::Char(ch))),
                EditTransition::Ignore
            );
        }
    }

    #[test]
    fn enter_commits_the_verbatim_buffer() {
        let mut listener = InputListener::new("draft", false);
        type_text(&mut listener, "!");
        assert_eq!(
            listener.interpret(key(EditKey::Enter)),
            EditTransition::Commit("draft!".to_owned())
        );
    }

    #[test]
    fn escape_cancels() {
        let mut listener = InputListener::new("draft", false);
        type_text(&mut listener, " changed");
        assert_eq!(listener.interpret(key(EditKey::Escape)), EditTransition::Cancel);
    }

    #[test]
    fn modifier_chords_are_not_intercepted() {
        let mut listener = InputListener::new("draft", false);
        for modifiers in [
            Modifiers { alt: true, ..Modifiers::NONE },
            Modifiers { ctrl: true, ..Modifiers::NONE },
            Modifiers { meta: true, ..Modifiers::NONE },
        ] {
            assert_eq!(
                listener.interpret(InputEvent::Key {
                    key: EditKey::Enter,
                    modifiers,
                }),
                EditTransition::Ignore
            );
            assert_eq!(
                listener.interpret(InputEvent::Key {
                    key: EditKey::Escape,
                    modifiers,
                }),
                EditTransition::Ignore
            );
        }
    }

    #[test]
    fn backspace_edits_the_buffer() {
        let mut listener = InputListener::new("abc", false);
        listener.interpret(key(EditKey::Backspace));
        assert_eq!(listener.text(), "ab");
    }

    #[test]
    fn focus_loss_commits() {
        let mut listener = InputListener::new("draft", false);
        assert_eq!(
            listener.interpret(InputEvent::FocusLost),
            EditTransition::Commit("draft".to_owned())
        );
    }

    #[test]
    fn context_menu_with_spell_check_suppresses_next_focus_loss() {
        let mut listener = InputListener::new("draft", true);
        listener.interpret(InputEvent::ContextMenu);
        assert_eq!(listener.interpret(InputEvent::FocusLost), EditTransition::Ignore);

        listener.interpret(InputEvent::MenuClosed);
        assert_eq!(
            listener.interpret(InputEvent::FocusLost),
            EditTransition::Commit("draft".to_owned())
        );
    }

    #[test]
    fn context_menu_without_spell_check_keeps_commit_on_blur() {
        let mut listener = InputListener::new("draft", false);
        listener.interpret(InputEvent::ContextMenu);
        assert_eq!(
            listener.interpret(InputEvent::FocusLost),
            EditTransition::Commit("draft".to_owned())
        );
    }

    #[test]
    fn anchor_loss_commits_like_focus_loss() {
        for event in [
            InputEvent::AnchorResized,
            InputEvent::AnchorMoved,
            InputEvent::AnchorHidden,
        ] {
            let mut listener = InputListener::new("draft", false);
            assert_eq!(
                listener.interpret(event),
                EditTransition::Commit("draft".to_owned())
            );
        }
    }

    #[test]
    fn scrolling_repositions_instead_of_finalizing() {
        let mut listener = InputListener::new("draft", false);
        assert_eq!(
            listener.interpret(InputEvent::ViewScrolled { dx: 3, dy: -1 }),
            EditTransition::Reposition { dx: 3, dy: -1 }
        );
    }
}
