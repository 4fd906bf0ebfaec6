// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dryad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dryad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Display-text translation.
//!
//! Widgets resolve user-visible labels through [`TextTranslator`]; an
//! unknown key falls back to the key itself so missing catalog entries stay
//! visible instead of blank.

use std::collections::BTreeMap;

use smol_str::SmolStr;

pub trait TextTranslator {
    fn get_text(&self, key: &str) -> String;
}

/// A translator backed by an in-memory catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapTranslator {
    entries: BTreeMap<SmolStr, String>,
}

impl MapTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<SmolStr>,
        V: Into<String>,
    {
        let mut translator = Self::new();
        for (key, value) in pairs {
            translator.insert(key, value);
        }
        translator
    }

    pub fn insert(&mut self, key: impl Into<SmolStr>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TextTranslator for MapTranslator {
    fn get_text(&self, key: &str) -> String {
        self.entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_owned())
    }
}

/// Returns every key unchanged; useful in tests and headless contexts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdentityTranslator;

impl TextTranslator for IdentityTranslator {
    fn get_text(&self, key: &str) -> String {
        key.to_owned()
    }
}
