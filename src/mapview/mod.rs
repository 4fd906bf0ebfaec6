// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dryad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dryad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Map overlay pane.
//!
//! Georeferenced nodes render on a slippy-map style view. Tile sources and
//! marker plumbing are plugin territory; this module carries the viewer
//! abstraction, a tile-less graticule implementation, and the mouse
//! controller that drives either.

pub mod controller;

pub use controller::{MapController, MouseInput, PointerButton, UnsupportedButtonError};

pub const MAX_ZOOM: u8 = 18;

/// A geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// A position in pane cells, relative to the pane's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

impl ScreenPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// What the mouse controller drives: any pannable, zoomable view that can
/// convert pane cells to geographic positions and hold a cursor.
pub trait MapViewer {
    fn zoom(&self) -> u8;
    /// Changes the zoom level, keeping the position under `at` fixed.
    fn set_zoom_around(&mut self, zoom: u8, at: ScreenPoint);
    /// Pans by a cell delta (positive x moves the viewport content left).
    fn move_map(&mut self, dx: i32, dy: i32);
    fn position_at(&self, at: ScreenPoint) -> GeoPoint;
    fn set_cursor_position(&mut self, position: GeoPoint);
    fn cursor_position(&self) -> Option<GeoPoint>;
}

/// A tile-less map view: a lat/lon graticule with a center crosshair and an
/// optional cursor marker. Stands in wherever a real tile plugin is absent.
#[derive(Debug, Clone, PartialEq)]
pub struct GraticuleMap {
    center: GeoPoint,
    zoom: u8,
    cursor: Option<GeoPoint>,
    viewport_width: u16,
    viewport_height: u16,
}

impl GraticuleMap {
    pub fn new(center: GeoPoint, zoom: u8) -> Self {
        Self {
            center,
            zoom: zoom.min(MAX_ZOOM),
            cursor: None,
            viewport_width: 0,
            viewport_height: 0,
        }
    }

    pub fn center(&self) -> GeoPoint {
        self.center
    }

    /// The pane size in cells; the shell updates this every draw so
    /// screen/geo conversions track the layout.
    pub fn set_viewport(&mut self, width: u16, height: u16) {
        self.viewport_width = width;
        self.viewport_height = height;
    }

    /// Cells per degree of longitude at the current zoom.
    fn scale(&self) -> f64 {
        f64::from(1u32 << u32::from(self.zoom)) / 4.0
    }

    fn clamp_center(&mut self) {
        self.center.lat = self.center.lat.clamp(-85.0, 85.0);
        self.center.lon = wrap_longitude(self.center.lon);
    }

    /// Picks the smallest graticule spacing that keeps grid lines at least a
    /// few cells apart.
    fn graticule_spacing(&self) -> f64 {
        const CANDIDATES: [f64; 7] = [0.1, 0.5, 1.0, 5.0, 10.0, 30.0, 90.0];
        let scale = self.scale();
        for candidate in CANDIDATES {
            if candidate * scale >= 6.0 {
                return candidate;
            }
        }
        *CANDIDATES.last().expect("candidates non-empty")
    }

    /// Renders the pane as text lines. The cursor marker wins over grid
    /// cells; the center crosshair wins over everything.
    pub fn render(&self, width: u16, height: u16) -> Vec<String> {
        let width = usize::from(width);
        let height = usize::from(height);
        if width == 0 || height == 0 {
            return Vec::new();
        }

        let scale = self.scale();
        let spacing = self.graticule_spacing();
        let center_x = (width / 2) as i32;
        let center_y = (height / 2) as i32;

        let mut lines = Vec::with_capacity(height);
        for y in 0..height {
            let mut line = String::with_capacity(width);
            for x in 0..width {
                let lon = self.center.lon + f64::from(x as i32 - center_x) / scale;
                let lat = self.center.lat - f64::from(y as i32 - center_y) / scale;

                let on_meridian = is_near_multiple(lon, spacing, scale);
                let on_parallel = is_near_multiple(lat, spacing, scale);
                let ch = if x as i32 == center_x && y as i32 == center_y {
                    '+'
                } else if self.is_cursor_cell(lat, lon, scale) {
                    '✕'
                } else if on_meridian && on_parallel {
                    '┼'
                } else if on_meridian {
                    '│'
                } else if on_parallel {
                    '─'
                } else {
                    ' '
                };
                line.push(ch);
            }
            lines.push(line);
        }
        lines
    }

    fn is_cursor_cell(&self, lat: f64, lon: f64, scale: f64) -> bool {
        let Some(cursor) = self.cursor else {
            return false;
        };
        let half_cell = 0.5 / scale;
        (lat - cursor.lat).abs() <= half_cell && (lon - cursor.lon).abs() <= half_cell
    }

    /// One-line status for the pane footer.
    pub fn status_line(&self) -> String {
        let cursor = match self.cursor {
            Some(cursor) => format!(" cursor {:.2},{:.2}", cursor.lat, cursor.lon),
            None => String::new(),
        };
        format!(
            "center {:.2},{:.2} z{}{}",
            self.center.lat, self.center.lon, self.zoom, cursor
        )
    }
}

impl MapViewer for GraticuleMap {
    fn zoom(&self) -> u8 {
        self.zoom
    }

    fn set_zoom_around(&mut self, zoom: u8, at: ScreenPoint) {
        let zoom = zoom.min(MAX_ZOOM);
        if zoom == self.zoom {
            return;
        }

        let anchor = self.position_at(at);
        self.zoom = zoom;

        // Re-center so the position under the pointer stays put.
        let scale = self.scale();
        let center_x = i32::from(self.viewport_width / 2);
        let center_y = i32::from(self.viewport_height / 2);
        self.center.lon = anchor.lon - f64::from(at.x - center_x) / scale;
        self.center.lat = anchor.lat + f64::from(at.y - center_y) / scale;
        self.clamp_center();
    }

    fn move_map(&mut self, dx: i32, dy: i32) {
        let scale = self.scale();
        self.center.lon += f64::from(dx) / scale;
        self.center.lat -= f64::from(dy) / scale;
        self.clamp_center();
    }

    fn position_at(&self, at: ScreenPoint) -> GeoPoint {
        let scale = self.scale();
        let center_x = i32::from(self.viewport_width / 2);
        let center_y = i32::from(self.viewport_height / 2);
        GeoPoint {
            lat: self.center.lat - f64::from(at.y - center_y) / scale,
            lon: wrap_longitude(self.center.lon + f64::from(at.x - center_x) / scale),
        }
    }

    fn set_cursor_position(&mut self, position: GeoPoint) {
        self.cursor = Some(position);
    }

    fn cursor_position(&self) -> Option<GeoPoint> {
        self.cursor
    }
}

fn wrap_longitude(lon: f64) -> f64 {
    let mut lon = lon;
    while lon > 180.0 {
        lon -= 360.0;
    }
    while lon < -180.0 {
        lon += 360.0;
    }
    lon
}

/// True when `value` sits within half a cell of a multiple of `spacing`.
fn is_near_multiple(value: f64, spacing: f64, scale: f64) -> bool {
    let half_cell = 0.5 / scale;
    let remainder = (value / spacing).round() * spacing - value;
    remainder.abs() <= half_cell
}
