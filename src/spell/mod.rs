// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dryad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dryad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Spell-check collaborator seam.
//!
//! Dictionary loading and management live outside this crate; an edit
//! session only registers its text field with whatever service is wired in.
//! Registration is best-effort: a failing service degrades the session to
//! plain editing and is never surfaced to the editing consumer.

use std::fmt;

use crate::model::FieldId;

/// Per-session spell-check settings.
///
/// The locale travels with the session instead of living in process-wide
/// state, so concurrent sessions (and tests) can disagree about language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpellCheckConfig {
    pub enabled: bool,
    pub locale: String,
}

impl Default for SpellCheckConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            locale: "en".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpellCheckError {
    DictionaryUnavailable { locale: String },
    InvalidDictionarySource { source: String },
    Backend { message: String },
}

impl fmt::Display for SpellCheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DictionaryUnavailable { locale } => {
                write!(f, "no dictionary available for locale '{locale}'")
            }
            Self::InvalidDictionarySource { source } => {
                write!(f, "invalid dictionary source '{source}'")
            }
            Self::Backend { message } => write!(f, "spell-check backend failed: {message}"),
        }
    }
}

impl std::error::Error for SpellCheckError {}

pub trait SpellCheckService {
    /// Attaches checking to the given text field for the given locale.
    fn register(&mut self, locale: &str, field: &FieldId) -> Result<(), SpellCheckError>;

    /// Detaches checking from the given text field. Unknown fields are a
    /// no-op.
    fn unregister(&mut self, field: &FieldId);
}

/// The service used when no checker is wired in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoSpellCheck;

impl SpellCheckService for NoSpellCheck {
    fn register(&mut self, _locale: &str, _field: &FieldId) -> Result<(), SpellCheckError> {
        Ok(())
    }

    fn unregister(&mut self, _field: &FieldId) {}
}

/// Registers `field` with the service when checking is enabled.
///
/// Returns whether the field ended up registered. Failures are logged and
/// swallowed; the caller keeps editing without spell-check.
pub fn register_best_effort(
    service: &mut dyn SpellCheckService,
    config: &SpellCheckConfig,
    field: &FieldId,
) -> bool {
    if !config.enabled {
        return false;
    }

    match service.register(&config.locale, field) {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(
                error = %err,
                locale = %config.locale,
                field = %field,
                "spell-check registration failed; continuing without it"
            );
            false
        }
    }
}
