// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dryad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dryad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Property-editor controls for the preferences panel.
//!
//! Controls expose a string-typed value surface so the panel can treat them
//! uniformly; each control keeps its own selection/validation rules.

use smol_str::SmolStr;

use crate::i18n::TextTranslator;

/// The uniform surface the preferences panel works against.
pub trait PropertyControl {
    fn label(&self) -> &str;
    fn description(&self) -> &str;
    /// The raw (un-translated) value, empty when nothing is selected.
    fn value(&self) -> String;
    fn set_value(&mut self, value: &str);
    fn set_enabled(&mut self, enabled: bool);
    fn is_enabled(&self) -> bool;
}

/// A combo-box style property: a fixed set of possible values, each with a
/// translated display entry.
///
/// Selection rules:
/// - setting an existing possible selects its index
/// - setting an unknown value on a non-empty set falls back to index 0
/// - setting anything on an empty set leaves the selection cleared
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComboProperty {
    description: String,
    label: String,
    possibles: Vec<SmolStr>,
    entries: Vec<String>,
    selected: Option<usize>,
    enabled: bool,
}

impl ComboProperty {
    pub fn new<P>(
        description: impl Into<String>,
        label: impl Into<String>,
        possibles: impl IntoIterator<Item = P>,
        translator: &dyn TextTranslator,
    ) -> Self
    where
        P: Into<SmolStr>,
    {
        let possibles: Vec<SmolStr> = possibles.into_iter().map(Into::into).collect();
        let entries = possibles
            .iter()
            .map(|possible| translator.get_text(possible))
            .collect();
        Self::from_parts(description.into(), label.into(), possibles, entries)
    }

    /// Builds the control from already-translated entries. A missing entry
    /// falls back to the raw possible.
    pub fn with_translations<P, T>(
        description: impl Into<String>,
        label: impl Into<String>,
        possibles: impl IntoIterator<Item = P>,
        translations: impl IntoIterator<Item = T>,
    ) -> Self
    where
        P: Into<SmolStr>,
        T: Into<String>,
    {
        let possibles: Vec<SmolStr> = possibles.into_iter().map(Into::into).collect();
        let mut translations = translations.into_iter().map(Into::into);
        let entries = possibles
            .iter()
            .map(|possible| {
                translations
                    .next()
                    .unwrap_or_else(|| possible.to_string())
            })
            .collect();
        Self::from_parts(description.into(), label.into(), possibles, entries)
    }

    fn from_parts(
        description: String,
        label: String,
        possibles: Vec<SmolStr>,
        entries: Vec<String>,
    ) -> Self {
        let selected = if possibles.is_empty() { None } else { Some(0) };
        Self {
            description,
            label,
            possibles,
            entries,
            selected,
            enabled: true,
        }
    }

    pub fn possibles(&self) -> &[SmolStr] {
        &self.possibles
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// The translated display entry of the current selection.
    pub fn selected_entry(&self) -> Option<&str> {
        self.selected.map(|idx| self.entries[idx].as_str())
    }

    pub fn selected_possible(&self) -> Option<&str> {
        self.selected.map(|idx| self.possibles[idx].as_str())
    }

    /// Advances the selection to the next possible, wrapping around. Used by
    /// keyboard-driven cycling in the preferences panel.
    pub fn select_next(&mut self) {
        if self.possibles.is_empty() {
            return;
        }
        self.selected = Some(match self.selected {
            Some(idx) => (idx + 1) % self.possibles.len(),
            None => 0,
        });
    }

    /// Replaces the option set. Selection resets to the first entry, or to
    /// nothing when the new set is empty.
    pub fn update_entries<P, T>(
        &mut self,
        possibles: impl IntoIterator<Item = P>,
        translations: impl IntoIterator<Item = T>,
    ) where
        P: Into<SmolStr>,
        T: Into<String>,
    {
        self.possibles = possibles.into_iter().map(Into::into).collect();
        let mut translations = translations.into_iter().map(Into::into);
        self.entries = self
            .possibles
            .iter()
            .map(|possible| {
                translations
                    .next()
                    .unwrap_or_else(|| possible.to_string())
            })
            .collect();
        self.selected = if self.possibles.is_empty() { None } else { Some(0) };
    }
}

impl PropertyControl for ComboProperty {
    fn label(&self) -> &str {
        &self.label
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn value(&self) -> String {
        self.selected_possible().unwrap_or_default().to_owned()
    }

    fn set_value(&mut self, value: &str) {
        if self.possibles.is_empty() {
            self.selected = None;
            return;
        }
        let found = self
            .possibles
            .iter()
            .position(|possible| possible == value);
        self.selected = Some(found.unwrap_or(0));
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// A two-state property; its value surface speaks "true"/"false".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BooleanProperty {
    description: String,
    label: String,
    value: bool,
    enabled: bool,
}

impl BooleanProperty {
    pub fn new(
        description: impl Into<String>,
        label: impl Into<String>,
        value: bool,
    ) -> Self {
        Self {
            description: description.into(),
            label: label.into(),
            value,
            enabled: true,
        }
    }

    pub fn is_set(&self) -> bool {
        self.value
    }

    pub fn toggle(&mut self) {
        self.value = !self.value;
    }
}

impl PropertyControl for BooleanProperty {
    fn label(&self) -> &str {
        &self.label
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn value(&self) -> String {
        if self.value { "true" } else { "false" }.to_owned()
    }

    fn set_value(&mut self, value: &str) {
        // Anything other than "true" clears the flag.
        self.value = value.trim().eq_ignore_ascii_case("true");
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(test)]
mod tests {
    use super::{BooleanProperty, ComboProperty, PropertyControl};
    use crate::i18n::{IdentityTranslator, MapTranslator};

    fn property() -> ComboProperty {
        ComboProperty::with_translations(
            "desc",
            "label",
            ["one", "two", "three"],
            ["translate one", "translate two", "translate three"],
        )
    }

    #[test]
    fn constructs_with_translator() {
        let translator = MapTranslator::from_pairs([
            ("one", "translate one"),
            ("two", "translate two"),
            ("three", "translate three"),
        ]);
        let property = ComboProperty::new("desc", "label", ["one", "two", "three"], &translator);

        assert_eq!(property.description(), "desc");
        assert_eq!(property.label(), "label");
        assert_eq!(property.entries(), ["translate one", "translate two", "translate three"]);
    }

    #[test]
    fn set_value_selects_matching_entry() {
        let mut property = property();
        property.set_value("two");
        assert_eq!(property.selected_index(), Some(1));
        assert_eq!(property.selected_entry(), Some("translate two"));
    }

    #[test]
    fn set_value_on_empty_set_clears_selection() {
        let mut property = ComboProperty::with_translations(
            "desc",
            "label",
            Vec::<&str>::new(),
            Vec::<&str>::new(),
        );
        property.set_value("two");
        assert_eq!(property.selected_index(), None);
    }

    #[test]
    fn set_value_not_in_set_falls_back_to_first() {
        let mut property = property();
        property.set_value("two");
        property.set_value("bad value");
        assert_eq!(property.selected_index(), Some(0));
        assert_eq!(property.selected_entry(), Some("translate one"));
    }

    #[test]
    fn value_returns_untranslated_possible() {
        let mut property = property();
        property.set_value("two");
        assert_eq!(property.value(), "two");
    }

    #[test]
    fn update_entries_resets_selection() {
        let mut property = property();
        property.set_value("three");
        property.update_entries(
            ["possible 1", "possible 2", "possible 3"],
            ["trans 1", "trans 2", "trans 3"],
        );
        assert_eq!(property.selected_index(), Some(0));
        assert_eq!(property.selected_entry(), Some("trans 1"));
    }

    #[test]
    fn update_entries_to_empty_clears_selection() {
        let mut property = property();
        property.update_entries(Vec::<&str>::new(), Vec::<&str>::new());
        assert_eq!(property.selected_index(), None);
    }

    #[test]
    fn missing_translations_fall_back_to_possibles() {
        let property = ComboProperty::with_translations(
            "desc",
            "label",
            ["one", "two"],
            ["translate one"],
        );
        assert_eq!(property.entries(), ["translate one", "two"]);
    }

    #[test]
    fn select_next_cycles_with_wraparound() {
        let mut property = property();
        property.select_next();
        assert_eq!(property.selected_index(), Some(1));
        property.select_next();
        property.select_next();
        assert_eq!(property.selected_index(), Some(0));
    }

    #[test]
    fn enable_disable_round_trips() {
        let mut property = property();
        assert!(property.is_enabled());
        property.set_enabled(false);
        assert!(!property.is_enabled());
    }

    #[test]
    fn boolean_property_parses_value_surface() {
        let mut property = BooleanProperty::new("desc", "label", false);
        property.set_value("TRUE");
        assert!(property.is_set());
        property.set_value("nope");
        assert!(!property.is_set());
        property.toggle();
        assert!(property.is_set());
    }

    #[test]
    fn combo_uses_identity_translator_as_passthrough() {
        let property = ComboProperty::new("desc", "label", ["left", "right"], &IdentityTranslator);
        assert_eq!(property.entries(), ["left", "right"]);
    }
}
