// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dryad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dryad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::time::{Duration, Instant};

use super::{MapViewer, ScreenPoint};

/// Two clicks on (nearly) the same cell within this window count as a
/// double click.
const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(400);
const DOUBLE_CLICK_SLOP: i32 = 1;

/// Mouse buttons the map pane distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Middle,
    Right,
}

impl PointerButton {
    /// Parses a configuration binding. Unknown names are a configuration
    /// contract violation and must fail the load, not fall back.
    pub fn from_name(name: &str) -> Result<Self, UnsupportedButtonError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "middle" => Ok(Self::Middle),
            "right" => Ok(Self::Right),
            _ => Err(UnsupportedButtonError {
                name: name.to_owned(),
            }),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Middle => "middle",
            Self::Right => "right",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedButtonError {
    pub name: String,
}

impl fmt::Display for UnsupportedButtonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unsupported mouse button '{}' (expected left, middle, or right)",
            self.name
        )
    }
}

impl std::error::Error for UnsupportedButtonError {}

/// Pointer events inside the map pane, in pane-relative cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseInput {
    ButtonDown { button: PointerButton, at: ScreenPoint },
    ButtonUp { button: PointerButton, at: ScreenPoint },
    Drag { button: PointerButton, at: ScreenPoint },
    ScrollUp { at: ScreenPoint },
    ScrollDown { at: ScreenPoint },
}

/// Mouse interaction for a [`MapViewer`]: pan by dragging the configured
/// movement button, zoom with the wheel or by double click, and place the
/// map cursor with a plain click.
#[derive(Debug)]
pub struct MapController<V> {
    viewer: V,
    pan_button: PointerButton,
    movement_enabled: bool,
    wheel_zoom_enabled: bool,
    double_click_zoom_enabled: bool,
    moving: bool,
    dragged: bool,
    last_drag_point: Option<ScreenPoint>,
    last_click: Option<(ScreenPoint, Instant)>,
}

impl<V: MapViewer> MapController<V> {
    pub fn new(viewer: V) -> Self {
        Self {
            viewer,
            pan_button: PointerButton::Left,
            movement_enabled: true,
            wheel_zoom_enabled: true,
            double_click_zoom_enabled: true,
            moving: false,
            dragged: false,
            last_drag_point: None,
            last_click: None,
        }
    }

    pub fn viewer(&self) -> &V {
        &self.viewer
    }

    pub fn viewer_mut(&mut self) -> &mut V {
        &mut self.viewer
    }

    pub fn pan_button(&self) -> PointerButton {
        self.pan_button
    }

    pub fn set_pan_button(&mut self, button: PointerButton) {
        self.pan_button = button;
    }

    pub fn is_movement_enabled(&self) -> bool {
        self.movement_enabled
    }

    pub fn set_movement_enabled(&mut self, enabled: bool) {
        self.movement_enabled = enabled;
    }

    pub fn is_wheel_zoom_enabled(&self) -> bool {
        self.wheel_zoom_enabled
    }

    pub fn set_wheel_zoom_enabled(&mut self, enabled: bool) {
        self.wheel_zoom_enabled = enabled;
    }

    pub fn is_double_click_zoom_enabled(&self) -> bool {
        self.double_click_zoom_enabled
    }

    pub fn set_double_click_zoom_enabled(&mut self, enabled: bool) {
        self.double_click_zoom_enabled = enabled;
    }

    /// Feeds one pointer event. `now` is injected so click timing is
    /// testable; the shell passes `Instant::now()`.
    pub fn handle_mouse(&mut self, input: MouseInput, now: Instant) {
        match input {
            MouseInput::ButtonDown { button, at: _ } => {
                if button == self.pan_button {
                    self.moving = true;
                    self.dragged = false;
                    self.last_drag_point = None;
                }
            }
            MouseInput::Drag { button, at } => {
                if !self.movement_enabled || !self.moving || button != self.pan_button {
                    return;
                }
                if let Some(last) = self.last_drag_point {
                    // The map moves opposite to the pointer.
                    self.viewer.move_map(last.x - at.x, last.y - at.y);
                    self.dragged = true;
                }
                self.last_drag_point = Some(at);
            }
            MouseInput::ButtonUp { button, at } => {
                let was_moving = self.moving;
                if button == self.pan_button {
                    self.moving = false;
                    self.last_drag_point = None;
                }
                if was_moving && button == self.pan_button && !self.dragged {
                    self.handle_click(at, now);
                }
                self.dragged = false;
            }
            MouseInput::ScrollUp { at } => {
                if self.wheel_zoom_enabled {
                    let zoom = self.viewer.zoom().saturating_add(1);
                    self.viewer.set_zoom_around(zoom, at);
                }
            }
            MouseInput::ScrollDown { at } => {
                if self.wheel_zoom_enabled {
                    let zoom = self.viewer.zoom().saturating_sub(1);
                    self.viewer.set_zoom_around(zoom, at);
                }
            }
        }
    }

    fn handle_click(&mut self, at: ScreenPoint, now: Instant) {
        let is_double = self.last_click.is_some_and(|(last_at, last_when)| {
            now.duration_since(last_when) <= DOUBLE_CLICK_WINDOW
                && (last_at.x - at.x).abs() <= DOUBLE_CLICK_SLOP
                && (last_at.y - at.y).abs() <= DOUBLE_CLICK_SLOP
        });

        if is_double {
            self.last_click = None;
            if self.double_click_zoom_enabled {
                let zoom = self.viewer.zoom().saturating_add(1);
                self.viewer.set_zoom_around(zoom, at);
            }
            return;
        }

        self.last_click = Some((at, now));
        let position = self.viewer.position_at(at);
        self.viewer.set_cursor_position(position);
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::{MapController, MouseInput, PointerButton, UnsupportedButtonError};
    use crate::mapview::{GeoPoint, MapViewer, ScreenPoint};

    #[derive(Debug, Default)]
    struct RecordingViewer {
        zoom: u8,
        moves: Vec<(i32, i32)>,
        zooms: Vec<(u8, ScreenPoint)>,
        cursor: Option<GeoPoint>,
    }

    impl MapViewer for RecordingViewer {
        fn zoom(&self) -> u8 {
            self.zoom
        }

        fn set_zoom_around(&mut self, zoom: u8, at: ScreenPoint) {
            self.zoom = zoom;
            self.zooms.push((zoom, at));
        }

        fn move_map(&mut self, dx: i32, dy: i32) {
            self.moves.push((dx, dy));
        }

        fn position_at(&self, at: ScreenPoint) -> GeoPoint {
            GeoPoint::new(f64::from(at.y), f64::from(at.x))
        }

        fn set_cursor_position(&mut self, position: GeoPoint) {
            self.cursor = Some(position);
        }

        fn cursor_position(&self) -> Option<GeoPoint> {
            self.cursor
        }
    }

    fn controller() -> MapController<RecordingViewer> {
        MapController::new(RecordingViewer {
            zoom: 4,
            ..RecordingViewer::default()
        })
    }

    fn at(x: i32, y: i32) -> ScreenPoint {
        ScreenPoint::new(x, y)
    }

    #[test]
    fn from_name_parses_known_buttons() {
        assert_eq!(PointerButton::from_name("left"), Ok(PointerButton::Left));
        assert_eq!(PointerButton::from_name(" Middle "), Ok(PointerButton::Middle));
        assert_eq!(PointerButton::from_name("RIGHT"), Ok(PointerButton::Right));
    }

    #[test]
    fn from_name_rejects_unknown_buttons() {
        assert_eq!(
            PointerButton::from_name("button4"),
            Err(UnsupportedButtonError {
                name: "button4".to_owned()
            })
        );
    }

    #[test]
    fn drag_with_pan_button_moves_opposite_to_pointer() {
        let mut controller = controller();
        let now = Instant::now();

        controller.handle_mouse(
            MouseInput::ButtonDown {
                button: PointerButton::Left,
                at: at(10, 10),
            },
            now,
        );
        // First drag sample only records the start point.
        controller.handle_mouse(
            MouseInput::Drag {
                button: PointerButton::Left,
                at: at(10, 10),
            },
            now,
        );
        controller.handle_mouse(
            MouseInput::Drag {
                button: PointerButton::Left,
                at: at(13, 8),
            },
            now,
        );

        assert_eq!(controller.viewer().moves, [(-3, 2)]);
    }

    #[test]
    fn drag_with_other_button_is_ignored() {
        let mut controller = controller();
        let now = Instant::now();

        controller.handle_mouse(
            MouseInput::ButtonDown {
                button: PointerButton::Right,
                at: at(0, 0),
            },
            now,
        );
        controller.handle_mouse(
            MouseInput::Drag {
                button: PointerButton::Right,
                at: at(5, 5),
            },
            now,
        );

        assert!(controller.viewer().moves.is_empty());
    }

    #[test]
    fn disabling_movement_stops_panning() {
        let mut controller = controller();
        controller.set_movement_enabled(false);
        let now = Instant::now();

        controller.handle_mouse(
            MouseInput::ButtonDown {
                button: PointerButton::Left,
                at: at(0, 0),
            },
            now,
        );
        controller.handle_mouse(
            MouseInput::Drag {
                button: PointerButton::Left,
                at: at(4, 4),
            },
            now,
        );
        controller.handle_mouse(
            MouseInput::Drag {
                button: PointerButton::Left,
                at: at(8, 8),
            },
            now,
        );

        assert!(controller.viewer().moves.is_empty());
    }

    #[test]
    fn rebinding_the_pan_button_takes_effect() {
        let mut controller = controller();
        controller.set_pan_button(PointerButton::Right);
        let now = Instant::now();

        controller.handle_mouse(
            MouseInput::ButtonDown {
                button: PointerButton::Right,
                at: at(2, 2),
            },
            now,
        );
        controller.handle_mouse(
            MouseInput::Drag {
                button: PointerButton::Right,
                at: at(2, 2),
            },
            now,
        );
        controller.handle_mouse(
            MouseInput::Drag {
                button: PointerButton::Right,
                at: at(0, 2),
            },
            now,
        );

        assert_eq!(controller.viewer().moves, [(2, 0)]);
    }

    #[test]
    fn plain_click_places_the_cursor() {
        let mut controller = controller();
        let now = Instant::now();

        controller.handle_mouse(
            MouseInput::ButtonDown {
                button: PointerButton::Left,
                at: at(7, 3),
            },
            now,
        );
        controller.handle_mouse(
            MouseInput::ButtonUp {
                button: PointerButton::Left,
                at: at(7, 3),
            },
            now,
        );

        assert_eq!(controller.viewer().cursor, Some(GeoPoint::new(3.0, 7.0)));
    }

    #[test]
    fn click_after_drag_does_not_place_the_cursor() {
        let mut controller = controller();
        let now = Instant::now();

        controller.handle_mouse(
            MouseInput::ButtonDown {
                button: PointerButton::Left,
                at: at(0, 0),
            },
            now,
        );
        controller.handle_mouse(
            MouseInput::Drag {
                button: PointerButton::Left,
                at: at(0, 0),
            },
            now,
        );
        controller.handle_mouse(
            MouseInput::Drag {
                button: PointerButton::Left,
                at: at(3, 3),
            },
            now,
        );
        controller.handle_mouse(
            MouseInput::ButtonUp {
                button: PointerButton::Left,
                at: at(3, 3),
            },
            now,
        );

        assert!(controller.viewer().cursor.is_none());
    }

    #[test]
    fn double_click_zooms_in_at_the_pointer() {
        let mut controller = controller();
        let start = Instant::now();

        for offset in [Duration::ZERO, Duration::from_millis(200)] {
            let now = start + offset;
            controller.handle_mouse(
                MouseInput::ButtonDown {
                    button: PointerButton::Left,
                    at: at(5, 5),
                },
                now,
            );
            controller.handle_mouse(
                MouseInput::ButtonUp {
                    button: PointerButton::Left,
                    at: at(5, 5),
                },
                now,
            );
        }

        assert_eq!(controller.viewer().zooms, [(5, at(5, 5))]);
    }

    #[test]
    fn slow_second_click_is_two_single_clicks() {
        let mut controller = controller();
        let start = Instant::now();

        for offset in [Duration::ZERO, Duration::from_millis(1_500)] {
            let now = start + offset;
            controller.handle_mouse(
                MouseInput::ButtonDown {
                    button: PointerButton::Left,
                    at: at(5, 5),
                },
                now,
            );
            controller.handle_mouse(
                MouseInput::ButtonUp {
                    button: PointerButton::Left,
                    at: at(5, 5),
                },
                now,
            );
        }

        assert!(controller.viewer().zooms.is_empty());
        assert!(controller.viewer().cursor.is_some());
    }

    #[test]
    fn wheel_zooms_when_enabled() {
        let mut controller = controller();
        let now = Instant::now();

        controller.handle_mouse(MouseInput::ScrollUp { at: at(1, 1) }, now);
        assert_eq!(controller.viewer().zoom, 5);

        controller.handle_mouse(MouseInput::ScrollDown { at: at(1, 1) }, now);
        assert_eq!(controller.viewer().zoom, 4);

        controller.set_wheel_zoom_enabled(false);
        controller.handle_mouse(MouseInput::ScrollUp { at: at(1, 1) }, now);
        assert_eq!(controller.viewer().zoom, 4);
    }

    #[test]
    fn double_click_zoom_can_be_disabled() {
        let mut controller = controller();
        controller.set_double_click_zoom_enabled(false);
        let start = Instant::now();

        for offset in [Duration::ZERO, Duration::from_millis(100)] {
            let now = start + offset;
            controller.handle_mouse(
                MouseInput::ButtonDown {
                    button: PointerButton::Left,
                    at: at(5, 5),
                },
                now,
            );
            controller.handle_mouse(
                MouseInput::ButtonUp {
                    button: PointerButton::Left,
                    at: at(5, 5),
                },
                now,
            );
        }

        assert!(controller.viewer().zooms.is_empty());
    }
}
