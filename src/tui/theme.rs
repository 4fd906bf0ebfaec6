// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dryad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dryad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::{env, error::Error, fmt};

use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Default)]
pub(crate) struct TuiTheme {
    palette: Option<TuiPalette>,
}

impl TuiTheme {
    pub(crate) fn from_env() -> Result<Self, ThemeError> {
        let palette = palette_override_from_env()?;
        Ok(Self { palette })
    }

    pub(crate) fn base_style(&self) -> Style {
        match &self.palette {
            Some(palette) => Style::default().fg(palette.fg).bg(palette.bg),
            None => Style::default(),
        }
    }

    fn slot_color(&self, slot: PaletteSlot) -> Color {
        match &self.palette {
            Some(palette) => palette.slot_color(slot),
            None => slot.into(),
        }
    }

    pub(crate) fn panel_border_style(&self, focused: bool) -> Style {
        if focused {
            self.base_style().fg(self.slot_color(PaletteSlot::BrightGreen))
        } else {
            self.base_style()
        }
    }

    /// Style of the selected node's label cells.
    pub(crate) fn selection_style(&self) -> Style {
        self.base_style()
            .add_modifier(Modifier::REVERSED | Modifier::BOLD)
    }

    /// Style of non-selected search hits.
    pub(crate) fn search_hit_style(&self) -> Style {
        self.base_style()
            .fg(self.slot_color(PaletteSlot::Black))
            .bg(self.slot_color(PaletteSlot::Yellow))
    }

    pub(crate) fn overlay_style(&self) -> Style {
        self.base_style()
            .fg(self.slot_color(PaletteSlot::Black))
            .bg(self.slot_color(PaletteSlot::BrightCyan))
    }

    pub(crate) fn footer_key_style(&self) -> Style {
        self.base_style().fg(self.slot_color(PaletteSlot::Cyan))
    }

    pub(crate) fn footer_label_style(&self) -> Style {
        self.base_style().fg(self.slot_color(PaletteSlot::White))
    }
}

/// The palette slots the UI renders with. Indices follow the ANSI-16 order
/// of the env CSV so a terminal palette can be pasted wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PaletteSlot {
    Black,
    Yellow,
    Cyan,
    White,
    BrightGreen,
    BrightCyan,
}

impl PaletteSlot {
    const fn idx(self) -> usize {
        match self {
            Self::Black => 0,
            Self::Yellow => 3,
            Self::Cyan => 6,
            Self::White => 7,
            Self::BrightGreen => 10,
            Self::BrightCyan => 14,
        }
    }
}

impl From<PaletteSlot> for Color {
    fn from(slot: PaletteSlot) -> Self {
        match slot {
            PaletteSlot::Black => Color::Black,
            PaletteSlot::Yellow => Color::Yellow,
            PaletteSlot::Cyan => Color::Cyan,
            PaletteSlot::White => Color::Gray,
            PaletteSlot::BrightGreen => Color::LightGreen,
            PaletteSlot::BrightCyan => Color::LightCyan,
        }
    }
}

#[derive(Debug, Clone)]
struct TuiPalette {
    fg: Color,
    bg: Color,
    ansi: [Color; 16],
}

impl TuiPalette {
    const CSV_LEN: usize = 18;

    /// Parses `fg,bg` plus the 16 ANSI colors, each as `#RRGGBB` (the
    /// leading `#` is optional).
    fn parse_csv(value: &str) -> Result<Self, String> {
        let colors = value
            .split(',')
            .map(parse_palette_color)
            .collect::<Result<Vec<_>, _>>()?;
        if colors.len() != Self::CSV_LEN {
            return Err(format!(
                "expected {} colors (fg, bg, then the 16 ANSI colors), got {}",
                Self::CSV_LEN,
                colors.len()
            ));
        }

        let mut ansi = [Color::Reset; 16];
        ansi.copy_from_slice(&colors[2..]);
        Ok(Self {
            fg: colors[0],
            bg: colors[1],
            ansi,
        })
    }

    fn slot_color(&self, slot: PaletteSlot) -> Color {
        self.ansi[slot.idx()]
    }
}

fn parse_palette_color(value: &str) -> Result<Color, String> {
    let trimmed = value.trim();
    let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if hex.len() != 6 || !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return Err(format!("invalid color '{trimmed}' (expected #RRGGBB)"));
    }

    let rgb = u32::from_str_radix(hex, 16).map_err(|_| format!("invalid color '{trimmed}'"))?;
    Ok(Color::Rgb(
        ((rgb >> 16) & 0xFF) as u8,
        ((rgb >> 8) & 0xFF) as u8,
        (rgb & 0xFF) as u8,
    ))
}

fn palette_override_from_env() -> Result<Option<TuiPalette>, ThemeError> {
    for name in ["DRYAD_TUI_PALETTE", "DRYAD_PALETTE"] {
        let value = match env::var(name) {
            Ok(value) => value,
            Err(env::VarError::NotPresent) => continue,
            Err(env::VarError::NotUnicode(_)) => {
                return Err(ThemeError::InvalidEnv {
                    name: name.to_string(),
                    value: "<non-unicode>".to_string(),
                });
            }
        };

        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        let parsed = TuiPalette::parse_csv(trimmed).map_err(|error| ThemeError::InvalidEnv {
            name: name.to_string(),
            value: format!("{trimmed} ({error})"),
        })?;
        return Ok(Some(parsed));
    }
    Ok(None)
}

#[derive(Debug, Clone)]
pub(crate) enum ThemeError {
    InvalidEnv { name: String, value: String },
}

impl fmt::Display for ThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEnv { name, value } => write!(f, "invalid env {name}={value}"),
        }
    }
}

impl Error for ThemeError {}

#[cfg(test)]
mod tests {
    use super::{PaletteSlot, TuiPalette};

    #[test]
    fn palette_override_parses_valid_csv() {
        let palette = TuiPalette::parse_csv(
            "#111111,#222222,#000000,#ff0000,#00ff00,#ffff00,#0000ff,#ff00ff,#00ffff,#ffffff,#1a1a1a,#ff1111,#11ff11,#ffff11,#1111ff,#ff11ff,#11ffff,#fefefe",
        )
        .expect("palette");

        assert_eq!(palette.fg, ratatui::style::Color::Rgb(0x11, 0x11, 0x11));
        assert_eq!(palette.bg, ratatui::style::Color::Rgb(0x22, 0x22, 0x22));
        assert_eq!(
            palette.slot_color(PaletteSlot::Black),
            ratatui::style::Color::Rgb(0, 0, 0)
        );
        assert_eq!(
            palette.slot_color(PaletteSlot::Yellow),
            ratatui::style::Color::Rgb(0xff, 0xff, 0)
        );
        assert_eq!(
            palette.slot_color(PaletteSlot::BrightCyan),
            ratatui::style::Color::Rgb(0x11, 0xff, 0xff)
        );
    }

    #[test]
    fn palette_colors_accept_bare_hex() {
        let palette = TuiPalette::parse_csv(
            "111111,222222,000000,ff0000,00ff00,ffff00,0000ff,ff00ff,00ffff,ffffff,1a1a1a,ff1111,11ff11,ffff11,1111ff,ff11ff,11ffff,fefefe",
        )
        .expect("palette");
        assert_eq!(palette.fg, ratatui::style::Color::Rgb(0x11, 0x11, 0x11));
    }

    #[test]
    fn palette_override_rejects_wrong_count() {
        let err = TuiPalette::parse_csv("#111111,#222222").unwrap_err();
        assert!(err.contains("expected"));
    }

    #[test]
    fn palette_override_rejects_non_hex_colors() {
        let err = TuiPalette::parse_csv("nope").unwrap_err();
        assert!(err.contains("invalid color"));
    }
}
