// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dryad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dryad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal UI.
//!
//! Provides the interactive TUI shell (ratatui + crossterm): the mind-map
//! canvas, the in-place edit overlay, search, the preferences popup, and the
//! optional map overlay pane. Includes a built-in demo map.

use std::{
    error::Error,
    io,
    time::{Duration, Instant},
};

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    style::Print,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};
use regex::Regex;

use crate::config::AppConfig;
use crate::edit::{
    EditConsumer, EditKey, EditSession, InputEvent, Modifiers as EditModifiers, OverlayHost,
};
use crate::i18n::{MapTranslator, TextTranslator};
use crate::layout::{
    layout_tree, HorizontalAlignment, NodeRenderMetrics, OverlayBounds, OverlayMinima, Side,
    TreeLayout,
};
use crate::mapview::{
    GeoPoint, GraticuleMap, MapController, MouseInput, PointerButton, ScreenPoint,
};
use crate::model::{MindMap, NodeId};
use crate::props::{BooleanProperty, ComboProperty, PropertyControl};
use crate::render::{render_map, truncate_with_ellipsis, MapRender};
use crate::spell::{NoSpellCheck, SpellCheckConfig, SpellCheckService};

mod theme;
use theme::TuiTheme;

const FOOTER_BRAND: &str = "🅳 🆁 🆈 🅰 🅳 ";
const TOAST_TTL: Duration = Duration::from_secs(2);
const PAN_STEP: i32 = 5;
const WHEEL_STEP: i32 = 2;

/// Runs the interactive terminal UI with the built-in demo map.
pub fn run(config: AppConfig) -> Result<(), Box<dyn Error>> {
    run_with_map(demo_map(), config)
}

pub fn run_with_map(map: MindMap, config: AppConfig) -> Result<(), Box<dyn Error>> {
    let mut terminal = TerminalSession::new()?;
    let mut app = App::new(map, config)?;

    while !app.should_quit {
        app.pump_edit_session();
        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                Event::Resize(_, _) => app.handle_resize(),
                _ => {}
            }
        }
    }

    Ok(())
}

/// A small map to explore the UI with.
pub fn demo_map() -> MindMap {
    let mut map = MindMap::new("Dryad");
    let root = map.root_id().clone();

    let ideas = map.add_child(&root, "Ideas").expect("demo node");
    map.add_child(&ideas, "Terminal mind maps").expect("demo node");
    map.add_child(&ideas, "Edit labels in place").expect("demo node");

    let errands = map.add_child(&root, "Errands").expect("demo node");
    let groceries = map.add_child(&errands, "Groceries").expect("demo node");
    map.add_child(&groceries, "Oat milk").expect("demo node");
    map.add_child(&groceries, "Rye bread").expect("demo node");
    let _ = map.toggle_folded(&groceries);
    map.add_child(&errands, "Post office").expect("demo node");

    let places = map.add_child(&root, "Places").expect("demo node");
    map.add_child(&places, "Munich").expect("demo node");
    map.add_child(&places, "Lisbon").expect("demo node");

    map.add_child(&root, "Reading list").expect("demo node");
    map
}

fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let area = frame.size();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    let main_area = layout[0];
    let status_area = layout[1];
    let compact_footer = footer_uses_compact_mode(main_area);

    let (canvas_area, map_area) = if app.map_visible {
        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(main_area);
        (panes[0], Some(panes[1]))
    } else {
        (main_area, None)
    };

    let selected_text = app
        .map
        .node(&app.selected)
        .map(|node| node.text().to_owned())
        .unwrap_or_default();
    let canvas_title = view_title(
        "Mind Map",
        '1',
        Some(&format!("— {}", truncate_with_ellipsis(&selected_text, 24))),
    );
    let canvas_block = Block::default()
        .borders(Borders::ALL)
        .title(canvas_title)
        .border_style(app.theme.panel_border_style(true));
    let canvas_inner = canvas_block.inner(canvas_area);
    app.canvas_inner = Some(canvas_inner);

    app.center_map_if_needed(canvas_inner.width, canvas_inner.height);
    let (scroll_x, scroll_y, left_pad, top_pad) = app.map_render_offsets();
    let mut canvas_text = app.styled_map_text();
    if left_pad > 0 || top_pad > 0 {
        canvas_text = pad_text(canvas_text, left_pad, top_pad);
    }
    let canvas = Paragraph::new(canvas_text)
        .block(canvas_block)
        .style(app.theme.base_style())
        .scroll((scroll_y, scroll_x));
    frame.render_widget(canvas, canvas_area);

    if let Some(map_area) = map_area {
        let status = app.map_controller.viewer().status_line();
        let map_block = Block::default()
            .borders(Borders::ALL)
            .title(view_title("Map", 'm', Some(&format!("— {status}"))))
            .border_style(app.theme.panel_border_style(false));
        let map_inner = map_block.inner(map_area);
        app.map_pane_inner = Some(map_inner);
        app.map_controller
            .viewer_mut()
            .set_viewport(map_inner.width, map_inner.height);

        let lines = app
            .map_controller
            .viewer()
            .render(map_inner.width, map_inner.height)
            .into_iter()
            .map(Line::from)
            .collect::<Vec<_>>();
        let pane = Paragraph::new(Text::from(lines))
            .block(map_block)
            .style(app.theme.base_style());
        frame.render_widget(pane, map_area);
    } else {
        app.map_pane_inner = None;
    }

    render_edit_overlay(frame, app, canvas_inner);
    render_prefs(frame, app, area);
    render_context_menu(frame, app, area);

    let toast_suffix = app.toast_suffix();
    if app.search_mode != SearchMode::Inactive {
        let status = Paragraph::new(search_footer_line(app, &toast_suffix));
        frame.render_widget(status, status_area);
        let brand = Paragraph::new(footer_brand_line()).alignment(Alignment::Right);
        frame.render_widget(brand, status_area);
        if app.search_mode == SearchMode::Editing {
            let cursor_x = status_area
                .x
                .saturating_add(1)
                .saturating_add(app.search_query.chars().count() as u16)
                .min(status_area.x.saturating_add(status_area.width.saturating_sub(1)));
            frame.set_cursor(cursor_x, status_area.y);
        }
    } else {
        let status = Paragraph::new(footer_help_line(app, &toast_suffix, compact_footer));
        frame.render_widget(status, status_area);
        let brand = Paragraph::new(footer_brand_line()).alignment(Alignment::Right);
        frame.render_widget(brand, status_area);
    }

    if app.show_help {
        render_help(frame, app, main_area);
    }
}

fn render_edit_overlay(frame: &mut Frame<'_>, app: &mut App, canvas_inner: Rect) {
    let Some(session) = &app.edit else {
        return;
    };
    let Some(bounds) = app.overlay.attached else {
        return;
    };

    let x = canvas_inner.x.saturating_add(clamp_positive_i32_to_u16(bounds.x));
    let y = canvas_inner.y.saturating_add(clamp_positive_i32_to_u16(bounds.y));
    if y >= canvas_inner.bottom() {
        return;
    }
    let width = (bounds.width as u16).min(canvas_inner.right().saturating_sub(x));
    if width == 0 {
        return;
    }
    let rect = Rect {
        x,
        y,
        width,
        height: (bounds.height as u16).max(1).min(canvas_inner.bottom() - y),
    };

    let visible = overlay_display_text(session.text(), width as usize);
    let alignment = match bounds.halign {
        HorizontalAlignment::Left => Alignment::Left,
        HorizontalAlignment::Right => Alignment::Right,
    };
    frame.render_widget(Clear, rect);
    let input = Paragraph::new(visible)
        .style(app.theme.overlay_style())
        .alignment(alignment);
    frame.render_widget(input, rect);

    if app.overlay.focused && app.context_menu.is_none() {
        let cursor_x = match bounds.halign {
            HorizontalAlignment::Left => {
                let len = session.text().chars().count() as u16;
                rect.x.saturating_add(len.min(width.saturating_sub(1)))
            }
            HorizontalAlignment::Right => rect.right().saturating_sub(1),
        };
        frame.set_cursor(cursor_x, rect.y);
    }
}

/// Keeps the tail of the buffer visible when it outgrows the overlay.
fn overlay_display_text(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len < width {
        return text.to_owned();
    }
    let keep = width.saturating_sub(1).max(1);
    let tail: String = text.chars().skip(len - keep).collect();
    format!("…{tail}")
}

// Extracted panel/footer/help/popup rendering helpers.
include!("chrome.rs");

#[derive(Debug, Clone)]
struct Toast {
    message: String,
    expires_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchMode {
    Inactive,
    Editing,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchKind {
    Regular,
    Fuzzy,
}

#[derive(Debug, Clone)]
struct SearchCandidate {
    node_id: NodeId,
    haystack: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuItem {
    Commit,
    Discard,
    CopyText,
    Spelling,
}

impl MenuItem {
    fn label(self) -> &'static str {
        match self {
            Self::Commit => "Commit text",
            Self::Discard => "Discard changes",
            Self::CopyText => "Copy text",
            Self::Spelling => "Spelling…",
        }
    }
}

#[derive(Debug, Clone)]
struct ContextMenu {
    items: Vec<MenuItem>,
    cursor: usize,
    at: (u16, u16),
}

/// The overlay surface the edit session drives. Rendering reads this state
/// every frame; the session mutates it through [`OverlayHost`].
#[derive(Debug, Clone, Copy, Default)]
struct OverlayState {
    attached: Option<OverlayBounds>,
    focused: bool,
    listeners_active: bool,
}

impl OverlayHost for OverlayState {
    fn attach_overlay(&mut self, bounds: &OverlayBounds) {
        self.attached = Some(*bounds);
        self.listeners_active = true;
    }

    fn move_overlay(&mut self, bounds: &OverlayBounds) {
        self.attached = Some(*bounds);
    }

    fn grant_focus(&mut self) {
        self.focused = true;
    }

    fn release_listeners(&mut self) {
        self.listeners_active = false;
    }

    fn remove_overlay(&mut self) {
        self.attached = None;
        self.focused = false;
    }
}

/// Collects the session outcome so the app can apply it to the model after
/// the borrow on the session ends.
#[derive(Debug, Default)]
struct EditOutcome {
    committed: Option<String>,
    cancelled: bool,
}

impl EditConsumer for EditOutcome {
    fn commit(&mut self, text: &str) {
        self.committed = Some(text.to_owned());
    }

    fn cancel(&mut self) {
        self.cancelled = true;
    }
}

/// The preferences popup: property controls bound to the app config.
#[derive(Debug, Clone)]
struct PrefsPanel {
    cursor: usize,
    check_spelling: BooleanProperty,
    spell_locale: ComboProperty,
    pan_button: ComboProperty,
}

impl PrefsPanel {
    const ROWS: usize = 3;

    fn new(config: &AppConfig, translator: &dyn TextTranslator) -> Self {
        let check_spelling = BooleanProperty::new(
            translator.get_text("prefs.check_spelling.desc"),
            translator.get_text("prefs.check_spelling"),
            config.check_spelling,
        );

        let mut spell_locale = ComboProperty::new(
            translator.get_text("prefs.spell_locale.desc"),
            translator.get_text("prefs.spell_locale"),
            ["en", "de", "es", "fr"],
            translator,
        );
        spell_locale.set_value(&config.spell_locale);

        let mut pan_button = ComboProperty::new(
            translator.get_text("prefs.pan_button.desc"),
            translator.get_text("prefs.pan_button"),
            ["left", "middle", "right"],
            translator,
        );
        pan_button.set_value(&config.map_pan_button);

        Self {
            cursor: 0,
            check_spelling,
            spell_locale,
            pan_button,
        }
    }

    fn rows(&self) -> Vec<(String, String)> {
        vec![
            (
                self.check_spelling.label().to_owned(),
                if self.check_spelling.is_set() { "on" } else { "off" }.to_owned(),
            ),
            (
                self.spell_locale.label().to_owned(),
                self.spell_locale.selected_entry().unwrap_or("—").to_owned(),
            ),
            (
                self.pan_button.label().to_owned(),
                self.pan_button.selected_entry().unwrap_or("—").to_owned(),
            ),
        ]
    }

    /// Returns true when the panel should close.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Esc | KeyCode::Char('p') => return true,
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor = self.cursor.checked_sub(1).unwrap_or(Self::ROWS - 1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.cursor = (self.cursor + 1) % Self::ROWS;
            }
            KeyCode::Enter | KeyCode::Char(' ') => match self.cursor {
                0 => self.check_spelling.toggle(),
                1 => self.spell_locale.select_next(),
                _ => self.pan_button.select_next(),
            },
            _ => {}
        }
        false
    }

    fn apply_to(&self, config: &mut AppConfig) {
        config.check_spelling = self.check_spelling.is_set();
        if let Some(locale) = self.spell_locale.selected_possible() {
            config.spell_locale = locale.to_owned();
        }
        if let Some(button) = self.pan_button.selected_possible() {
            config.map_pan_button = button.to_owned();
        }
    }
}

fn default_translator() -> MapTranslator {
    MapTranslator::from_pairs([
        ("prefs.check_spelling", "Check spelling"),
        (
            "prefs.check_spelling.desc",
            "Register edit fields with the spell-check service",
        ),
        ("prefs.spell_locale", "Dictionary language"),
        (
            "prefs.spell_locale.desc",
            "Locale passed to spell-check registration",
        ),
        ("prefs.pan_button", "Map pan button"),
        (
            "prefs.pan_button.desc",
            "Mouse button that drags the map overlay",
        ),
        ("en", "English"),
        ("de", "Deutsch"),
        ("es", "Español"),
        ("fr", "Français"),
        ("left", "Left button"),
        ("middle", "Middle button"),
        ("right", "Right button"),
    ])
}

struct App {
    map: MindMap,
    config: AppConfig,
    theme: TuiTheme,
    translator: MapTranslator,
    selected: NodeId,
    layout: TreeLayout,
    render: MapRender,
    pan_x: i32,
    pan_y: i32,
    center_on_next_draw: bool,
    canvas_inner: Option<Rect>,
    map_visible: bool,
    map_pane_inner: Option<Rect>,
    map_controller: MapController<GraticuleMap>,
    spell: Box<dyn SpellCheckService>,
    spell_config: SpellCheckConfig,
    edit: Option<EditSession>,
    overlay: OverlayState,
    context_menu: Option<ContextMenu>,
    prefs: Option<PrefsPanel>,
    search_mode: SearchMode,
    search_kind: SearchKind,
    search_query: String,
    search_candidates: Vec<SearchCandidate>,
    search_results: Vec<NodeId>,
    search_result_index: usize,
    toast: Option<Toast>,
    show_help: bool,
    help_scroll: u16,
    help_viewport_height: u16,
    should_quit: bool,
}

impl App {
    fn new(map: MindMap, config: AppConfig) -> Result<Self, Box<dyn Error>> {
        let theme = TuiTheme::from_env()?;
        let pan_button = config.pan_button()?;

        let selected = map.root_id().clone();
        let layout = layout_tree(&map)?;
        let render = render_map(&map, &layout)?;

        let mut map_controller = MapController::new(GraticuleMap::new(GeoPoint::new(48.14, 11.58), 5));
        map_controller.set_pan_button(pan_button);
        map_controller.set_wheel_zoom_enabled(config.map_wheel_zoom);
        map_controller.set_double_click_zoom_enabled(config.map_double_click_zoom);

        let spell_config = SpellCheckConfig {
            enabled: config.check_spelling,
            locale: config.spell_locale.clone(),
        };

        Ok(Self {
            map,
            config,
            theme,
            translator: default_translator(),
            selected,
            layout,
            render,
            pan_x: 0,
            pan_y: 0,
            center_on_next_draw: true,
            canvas_inner: None,
            map_visible: false,
            map_pane_inner: None,
            map_controller,
            spell: Box::new(NoSpellCheck),
            spell_config,
            edit: None,
            overlay: OverlayState::default(),
            context_menu: None,
            prefs: None,
            search_mode: SearchMode::Inactive,
            search_kind: SearchKind::Regular,
            search_query: String::new(),
            search_candidates: Vec::new(),
            search_results: Vec::new(),
            search_result_index: 0,
            toast: None,
            show_help: false,
            help_scroll: 0,
            help_viewport_height: 0,
            should_quit: false,
        })
    }

    fn set_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            expires_at: Instant::now() + TOAST_TTL,
        });
    }

    fn toast_suffix(&mut self) -> String {
        match &self.toast {
            Some(toast) if toast.expires_at > Instant::now() => {
                format!("  ·  {}", toast.message)
            }
            Some(_) => {
                self.toast = None;
                String::new()
            }
            None => String::new(),
        }
    }

    fn refresh_view(&mut self) {
        match layout_tree(&self.map) {
            Ok(layout) => {
                match render_map(&self.map, &layout) {
                    Ok(render) => {
                        self.layout = layout;
                        self.render = render;
                    }
                    Err(err) => self.set_toast(format!("Render failed: {err}")),
                }
            }
            Err(err) => self.set_toast(format!("Layout failed: {err}")),
        }

        if !self.map.contains(&self.selected) {
            self.selected = self.map.root_id().clone();
        }
    }

    fn center_map_if_needed(&mut self, viewport_width: u16, viewport_height: u16) {
        if !self.center_on_next_draw {
            return;
        }
        self.center_on_next_draw = false;
        self.pan_x = (self.render.width as i32 - i32::from(viewport_width)) / 2;
        self.pan_y = (self.render.height as i32 - i32::from(viewport_height)) / 2;
    }

    fn map_render_offsets(&self) -> (u16, u16, usize, usize) {
        let scroll_x = clamp_positive_i32_to_u16(self.pan_x);
        let scroll_y = clamp_positive_i32_to_u16(self.pan_y);
        let left_pad = (-self.pan_x).max(0) as usize;
        let top_pad = (-self.pan_y).max(0) as usize;
        (scroll_x, scroll_y, left_pad, top_pad)
    }

    /// The rendered canvas with selection and search-hit styling applied.
    fn styled_map_text(&self) -> Text<'static> {
        let selected_span = self.render.placement_index.get(&self.selected).copied();
        let search_hits = if self.search_mode == SearchMode::Inactive {
            Vec::new()
        } else {
            self.search_results
                .iter()
                .filter(|node_id| **node_id != self.selected)
                .filter_map(|node_id| self.render.placement_index.get(node_id).copied())
                .collect()
        };

        let mut lines = Vec::new();
        for (y, raw) in self.render.text.split('\n').enumerate() {
            let mut spans_here: Vec<(usize, usize, Style)> = Vec::new();
            if let Some((sy, x0, x1)) = selected_span {
                if sy == y {
                    spans_here.push((x0, x1, self.theme.selection_style()));
                }
            }
            for (hy, x0, x1) in &search_hits {
                if *hy == y {
                    spans_here.push((*x0, *x1, self.theme.search_hit_style()));
                }
            }
            lines.push(styled_line(raw, &spans_here));
        }
        Text::from(lines)
    }

    // --- edit session plumbing -------------------------------------------

    fn pump_edit_session(&mut self) {
        if let Some(session) = self.edit.as_mut() {
            session.pump(&mut self.overlay);
        }
    }

    /// Screen-space offset of content cell (0,0) inside the canvas pane.
    fn view_offset(&self) -> (i32, i32) {
        (-self.pan_x, -self.pan_y)
    }

    fn start_edit(&mut self, node_id: NodeId) {
        if !self.map.contains(&node_id) {
            return;
        }
        // At most one live session; a new edit finalizes the previous one.
        self.finalize_active_session_forced();

        self.unfold_to(&node_id);
        self.refresh_view();
        self.selected = node_id.clone();

        let Some(placement) = self.layout.placement(&node_id) else {
            return;
        };
        let (dx, dy) = self.view_offset();
        let mut metrics = NodeRenderMetrics::from_placement(placement, 1.0);
        metrics.text_x += dx;
        metrics.text_y += dy;

        let text = self
            .map
            .node(&node_id)
            .map(|node| node.text().to_owned())
            .unwrap_or_default();

        let session = EditSession::begin(
            node_id,
            text,
            &metrics,
            &OverlayMinima::cells(),
            self.spell.as_mut(),
            &self.spell_config,
            &mut self.overlay,
        );
        self.edit = Some(session);
    }

    fn finalize_active_session_forced(&mut self) {
        let Some(mut session) = self.edit.take() else {
            return;
        };
        let mut outcome = EditOutcome::default();
        session.force_commit(&mut self.overlay, &mut outcome);
        self.apply_edit_outcome(&session, outcome);
    }

    fn feed_edit(&mut self, event: InputEvent) {
        let Some(session) = self.edit.as_mut() else {
            return;
        };
        let mut outcome = EditOutcome::default();
        session.handle(event, &mut self.overlay, &mut outcome);
        if session.state().is_terminal() {
            let session = self.edit.take().expect("session present");
            self.context_menu = None;
            self.apply_edit_outcome(&session, outcome);
        }
    }

    fn apply_edit_outcome(&mut self, session: &EditSession, outcome: EditOutcome) {
        if let Some(text) = outcome.committed {
            if let Err(err) = self.map.set_text(session.node_id(), text) {
                self.set_toast(format!("Commit failed: {err}"));
            }
        } else if outcome.cancelled {
            self.set_toast("Edit cancelled");
        }
        self.spell.unregister(session.field_id());
        self.refresh_view();
    }

    // --- key handling -----------------------------------------------------

    fn handle_key(&mut self, key: KeyEvent) {
        if self.context_menu.is_some() {
            self.handle_menu_key(key.code);
            return;
        }
        if self.edit.is_some() {
            self.handle_edit_key(key);
            return;
        }
        if self.show_help {
            match key.code {
                KeyCode::Esc | KeyCode::Char('?') => self.show_help = false,
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Down | KeyCode::Char('j') => self.help_scroll_by(1),
                KeyCode::Up | KeyCode::Char('k') => self.help_scroll_by(-1),
                KeyCode::PageDown => self.help_scroll_page(1),
                KeyCode::PageUp => self.help_scroll_page(-1),
                KeyCode::Home => self.help_scroll = 0,
                KeyCode::End => self.help_scroll = u16::MAX,
                _ => {}
            }
            return;
        }
        if let Some(prefs) = self.prefs.as_mut() {
            if prefs.handle_key(key.code) {
                self.apply_prefs();
            }
            return;
        }

        match self.search_mode {
            SearchMode::Editing => {
                self.handle_search_edit_key(key.code);
                return;
            }
            SearchMode::Results => {
                if matches!(key.code, KeyCode::Esc) {
                    self.clear_search();
                    return;
                }
            }
            SearchMode::Inactive => {}
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('e') | KeyCode::F(2) => self.start_edit(self.selected.clone()),
            KeyCode::Enter => self.add_sibling_and_edit(),
            KeyCode::Tab => self.add_child_and_edit(),
            KeyCode::BackTab => self.promote_selected(),
            KeyCode::Delete => self.remove_selected(),
            KeyCode::Char(' ') => self.toggle_fold_selected(),
            KeyCode::Char('y') => self.yank_selected_text(),
            KeyCode::Char('m') => self.map_visible = !self.map_visible,
            KeyCode::Char('p') => {
                self.prefs = Some(PrefsPanel::new(&self.config, &self.translator));
            }
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('/') => self.enter_search_mode(SearchKind::Regular),
            KeyCode::Char('\\') => self.enter_search_mode(SearchKind::Fuzzy),
            KeyCode::Char('n') => self.search_next(),
            KeyCode::Char('N') => self.search_prev(),
            KeyCode::Left | KeyCode::Char('h') => self.nav_left(),
            KeyCode::Right | KeyCode::Char('l') => self.nav_right(),
            KeyCode::Up | KeyCode::Char('k') => self.nav_vertical(-1),
            KeyCode::Down | KeyCode::Char('j') => self.nav_vertical(1),
            KeyCode::Char('H') => self.pan_x -= PAN_STEP,
            KeyCode::Char('L') => self.pan_x += PAN_STEP,
            KeyCode::Char('K') => self.pan_y -= PAN_STEP,
            KeyCode::Char('J') => self.pan_y += PAN_STEP,
            KeyCode::Home | KeyCode::Char('c') => self.center_on_next_draw = true,
            _ => {}
        }
    }

    fn handle_edit_key(&mut self, key: KeyEvent) {
        let modifiers = EditModifiers {
            alt: key.modifiers.contains(KeyModifiers::ALT),
            ctrl: key.modifiers.contains(KeyModifiers::CONTROL),
            meta: key.modifiers.contains(KeyModifiers::META)
                || key.modifiers.contains(KeyModifiers::SUPER),
        };
        let edit_key = match key.code {
            KeyCode::Enter => EditKey::Enter,
            KeyCode::Esc => EditKey::Escape,
            KeyCode::Backspace => EditKey::Backspace,
            KeyCode::Char(ch) => EditKey::Char(ch),
            _ => EditKey::Other,
        };
        self.feed_edit(InputEvent::Key {
            key: edit_key,
            modifiers,
        });
    }

    fn handle_menu_key(&mut self, code: KeyCode) {
        let Some(menu) = self.context_menu.as_mut() else {
            return;
        };
        match code {
            KeyCode::Esc => {
                self.context_menu = None;
                self.feed_edit(InputEvent::MenuClosed);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                menu.cursor = menu.cursor.checked_sub(1).unwrap_or(menu.items.len() - 1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                menu.cursor = (menu.cursor + 1) % menu.items.len();
            }
            KeyCode::Enter => {
                let item = menu.items[menu.cursor];
                self.context_menu = None;
                self.feed_edit(InputEvent::MenuClosed);
                match item {
                    MenuItem::Commit => self.feed_edit(InputEvent::Key {
                        key: EditKey::Enter,
                        modifiers: EditModifiers::NONE,
                    }),
                    MenuItem::Discard => self.feed_edit(InputEvent::Key {
                        key: EditKey::Escape,
                        modifiers: EditModifiers::NONE,
                    }),
                    MenuItem::CopyText => {
                        let text = self
                            .edit
                            .as_ref()
                            .map(|session| session.text().to_owned())
                            .unwrap_or_default();
                        self.copy_text_to_clipboard(&text);
                    }
                    MenuItem::Spelling => {
                        self.set_toast("No spelling suggestions from the wired service");
                    }
                }
            }
            _ => {}
        }
    }

    fn open_context_menu(&mut self, at: (u16, u16)) {
        let Some(session) = &self.edit else {
            return;
        };
        let mut items = vec![MenuItem::Commit, MenuItem::Discard, MenuItem::CopyText];
        if session.spell_registered() {
            items.push(MenuItem::Spelling);
        }
        self.context_menu = Some(ContextMenu {
            items,
            cursor: 0,
            at,
        });
        self.feed_edit(InputEvent::ContextMenu);
    }

    fn apply_prefs(&mut self) {
        let Some(prefs) = self.prefs.take() else {
            return;
        };
        prefs.apply_to(&mut self.config);

        self.spell_config.enabled = self.config.check_spelling;
        self.spell_config.locale = self.config.spell_locale.clone();
        if let Ok(button) = self.config.pan_button() {
            self.map_controller.set_pan_button(button);
        }
        self.set_toast("Preferences applied");
    }

    // --- node operations --------------------------------------------------

    fn add_sibling_and_edit(&mut self) {
        let selected = self.selected.clone();
        match self.map.add_sibling_after(&selected, "") {
            Ok(node_id) => self.start_edit(node_id),
            Err(err) => self.set_toast(format!("Cannot add sibling: {err}")),
        }
    }

    fn add_child_and_edit(&mut self) {
        let selected = self.selected.clone();
        match self.map.add_child(&selected, "") {
            Ok(node_id) => self.start_edit(node_id),
            Err(err) => self.set_toast(format!("Cannot add child: {err}")),
        }
    }

    fn remove_selected(&mut self) {
        let selected = self.selected.clone();
        let parent = self
            .map
            .node(&selected)
            .ok()
            .and_then(|node| node.parent().cloned());
        match self.map.remove_subtree(&selected) {
            Ok(()) => {
                self.selected = parent.unwrap_or_else(|| self.map.root_id().clone());
                self.refresh_view();
            }
            Err(err) => self.set_toast(format!("Cannot remove: {err}")),
        }
    }

    /// Moves the selected node up one level: it becomes a sibling of its
    /// parent, placed directly after it.
    fn promote_selected(&mut self) {
        let selected = self.selected.clone();
        let Some(parent) = self
            .map
            .node(&selected)
            .ok()
            .and_then(|node| node.parent().cloned())
        else {
            self.set_toast("Cannot promote the root");
            return;
        };
        let Some(grandparent) = self
            .map
            .node(&parent)
            .ok()
            .and_then(|node| node.parent().cloned())
        else {
            self.set_toast("Already at the top level");
            return;
        };

        let insert_at = self
            .map
            .node(&grandparent)
            .ok()
            .and_then(|node| node.children().iter().position(|child| child == &parent))
            .map(|idx| idx + 1)
            .unwrap_or(usize::MAX);
        match self.map.move_subtree(&selected, &grandparent, insert_at) {
            Ok(()) => self.refresh_view(),
            Err(err) => self.set_toast(format!("Cannot promote: {err}")),
        }
    }

    fn toggle_fold_selected(&mut self) {
        let selected = self.selected.clone();
        match self.map.toggle_folded(&selected) {
            Ok(_) => self.refresh_view(),
            Err(err) => self.set_toast(format!("Cannot fold: {err}")),
        }
    }

    fn unfold_to(&mut self, node_id: &NodeId) {
        let mut current = node_id.clone();
        let mut to_unfold = Vec::new();
        while let Some(parent) = self
            .map
            .node(&current)
            .ok()
            .and_then(|node| node.parent().cloned())
        {
            to_unfold.push(parent.clone());
            current = parent;
        }
        for ancestor in to_unfold {
            if let Ok(node) = self.map.node_mut(&ancestor) {
                node.set_folded(false);
            }
        }
    }

    // --- navigation -------------------------------------------------------

    fn selected_side(&self) -> Side {
        self.layout
            .placement(&self.selected)
            .map(|placement| placement.side())
            .unwrap_or(Side::Center)
    }

    fn first_visible_child(&self, side_filter: Option<Side>) -> Option<NodeId> {
        let node = self.map.node(&self.selected).ok()?;
        if node.folded() {
            return None;
        }
        node.children()
            .iter()
            .find(|child| {
                let Some(placement) = self.layout.placement(child) else {
                    return false;
                };
                side_filter.map_or(true, |side| placement.side() == side)
            })
            .cloned()
    }

    fn select_parent(&mut self) {
        if let Ok(node) = self.map.node(&self.selected) {
            if let Some(parent) = node.parent().cloned() {
                self.selected = parent;
            }
        }
    }

    fn nav_right(&mut self) {
        match self.selected_side() {
            Side::Center | Side::Right => {
                let filter = if self.selected_side() == Side::Center {
                    Some(Side::Right)
                } else {
                    None
                };
                if let Some(child) = self.first_visible_child(filter) {
                    self.selected = child;
                }
            }
            Side::Left => self.select_parent(),
        }
    }

    fn nav_left(&mut self) {
        match self.selected_side() {
            Side::Center | Side::Left => {
                let filter = if self.selected_side() == Side::Center {
                    Some(Side::Left)
                } else {
                    None
                };
                if let Some(child) = self.first_visible_child(filter) {
                    self.selected = child;
                }
            }
            Side::Right => self.select_parent(),
        }
    }

    fn nav_vertical(&mut self, direction: i32) {
        let visible = self.map.visible_nodes();
        let Some(current) = visible.iter().position(|node| *node == self.selected) else {
            return;
        };
        let next = current as i32 + direction;
        if next < 0 || next >= visible.len() as i32 {
            return;
        }
        self.selected = visible[next as usize].clone();
    }

    // --- mouse ------------------------------------------------------------

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.map_visible {
            if let Some(inner) = self.map_pane_inner {
                if rect_contains(inner, mouse.column, mouse.row) {
                    if let Some(input) = map_mouse_input(&mouse, inner) {
                        self.map_controller.handle_mouse(input, Instant::now());
                    }
                    return;
                }
            }
        }

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Right) => {
                if self.edit.is_some() && self.overlay_contains(mouse.column, mouse.row) {
                    self.open_context_menu((mouse.column, mouse.row));
                }
            }
            MouseEventKind::Down(MouseButton::Left) => {
                if self.context_menu.is_some() {
                    return;
                }
                if self.edit.is_some() {
                    if self.overlay_contains(mouse.column, mouse.row) {
                        return;
                    }
                    // Clicking anywhere else steals focus; the edit commits.
                    self.feed_edit(InputEvent::FocusLost);
                }
                if let Some(node_id) = self.node_at_screen(mouse.column, mouse.row) {
                    self.selected = node_id;
                }
            }
            MouseEventKind::ScrollUp => self.scroll_canvas(0, -WHEEL_STEP),
            MouseEventKind::ScrollDown => self.scroll_canvas(0, WHEEL_STEP),
            _ => {}
        }
    }

    fn scroll_canvas(&mut self, dx: i32, dy: i32) {
        self.pan_x += dx;
        self.pan_y += dy;
        if self.edit.is_some() {
            self.feed_edit(InputEvent::ViewScrolled { dx: -dx, dy: -dy });
        }
    }

    fn overlay_contains(&self, column: u16, row: u16) -> bool {
        let (Some(inner), Some(bounds)) = (self.canvas_inner, self.overlay.attached) else {
            return false;
        };
        let x = i32::from(column) - i32::from(inner.x);
        let y = i32::from(row) - i32::from(inner.y);
        x >= bounds.x
            && x < bounds.x + bounds.width as i32
            && y >= bounds.y
            && y < bounds.y + bounds.height.max(1) as i32
    }

    fn node_at_screen(&self, column: u16, row: u16) -> Option<NodeId> {
        let inner = self.canvas_inner?;
        if !rect_contains(inner, column, row) {
            return None;
        }
        let content_x = i32::from(column) - i32::from(inner.x) + self.pan_x;
        let content_y = i32::from(row) - i32::from(inner.y) + self.pan_y;
        if content_x < 0 || content_y < 0 {
            return None;
        }
        let (x, y) = (content_x as usize, content_y as usize);

        self.render
            .placement_index
            .iter()
            .find(|(_, (py, x0, x1))| *py == y && (*x0..=*x1).contains(&x))
            .map(|(node_id, _)| node_id.clone())
    }

    fn handle_resize(&mut self) {
        // The edit never outlives its anchor; a reshaped surface commits it.
        self.feed_edit(InputEvent::AnchorResized);
        self.center_on_next_draw = true;
    }

    // --- search -----------------------------------------------------------

    fn enter_search_mode(&mut self, kind: SearchKind) {
        self.search_mode = SearchMode::Editing;
        self.search_kind = kind;
        self.search_query.clear();
        self.search_result_index = 0;
        self.search_results.clear();
        self.search_candidates = search_candidates_from_map(&self.map);
    }

    fn handle_search_edit_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.clear_search(),
            KeyCode::Enter => self.commit_search(),
            KeyCode::Backspace => {
                self.search_query.pop();
                self.update_search_results();
            }
            KeyCode::Char(ch) => {
                self.search_query.push(ch);
                self.update_search_results();
            }
            _ => {}
        }
    }

    fn commit_search(&mut self) {
        if self.search_results.len() > 1 {
            self.search_mode = SearchMode::Results;
        } else {
            self.search_mode = SearchMode::Inactive;
        }
    }

    fn clear_search(&mut self) {
        self.search_mode = SearchMode::Inactive;
        self.search_query.clear();
        self.search_candidates.clear();
        self.search_results.clear();
        self.search_result_index = 0;
    }

    fn update_search_results(&mut self) {
        self.search_results =
            ranked_search_results(&self.search_candidates, &self.search_query, self.search_kind);
        self.search_result_index = 0;
        self.jump_to_current_search_result();
    }

    fn search_prefix(&self) -> char {
        match self.search_kind {
            SearchKind::Regular => '/',
            SearchKind::Fuzzy => '\\',
        }
    }

    fn jump_to_current_search_result(&mut self) {
        let Some(node_id) = self.search_results.get(self.search_result_index).cloned() else {
            return;
        };
        self.unfold_to(&node_id);
        self.refresh_view();
        self.selected = node_id;
        self.center_on_next_draw = true;
    }

    fn search_next(&mut self) {
        let len = self.search_results.len();
        if len <= 1 {
            return;
        }
        self.search_result_index = (self.search_result_index + 1) % len;
        self.jump_to_current_search_result();
    }

    fn search_prev(&mut self) {
        let len = self.search_results.len();
        if len <= 1 {
            return;
        }
        self.search_result_index = match self.search_result_index {
            0 => len - 1,
            n => n - 1,
        };
        self.jump_to_current_search_result();
    }

    // --- clipboard --------------------------------------------------------

    fn yank_selected_text(&mut self) {
        let text = self
            .map
            .node(&self.selected)
            .map(|node| node.text().to_owned())
            .unwrap_or_default();
        self.copy_text_to_clipboard(&text);
    }

    fn copy_text_to_clipboard(&mut self, text: &str) {
        match copy_to_clipboard(text) {
            Ok(backend) => self.set_toast(format!("Yanked node text ({backend})")),
            Err(err) => {
                tracing::warn!(error = %err, "clipboard write failed");
                self.set_toast(format!("Clipboard error: {err}"));
            }
        }
    }

    // --- help -------------------------------------------------------------

    fn help_scroll_by(&mut self, delta: i32) {
        if delta < 0 {
            self.help_scroll = self.help_scroll.saturating_sub((-delta) as u16);
        } else {
            self.help_scroll = self.help_scroll.saturating_add(delta as u16);
        }
    }

    fn help_scroll_page(&mut self, direction: i32) {
        let page = self.help_viewport_height.max(1).saturating_sub(1) as i32;
        let step = page.max(1);
        self.help_scroll_by(direction.signum() * step);
    }
}

fn rect_contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x && column < rect.right() && row >= rect.y && row < rect.bottom()
}

fn map_mouse_input(mouse: &MouseEvent, pane: Rect) -> Option<MouseInput> {
    let at = ScreenPoint::new(
        i32::from(mouse.column) - i32::from(pane.x),
        i32::from(mouse.row) - i32::from(pane.y),
    );
    let button = |button: MouseButton| match button {
        MouseButton::Left => PointerButton::Left,
        MouseButton::Middle => PointerButton::Middle,
        MouseButton::Right => PointerButton::Right,
    };
    match mouse.kind {
        MouseEventKind::Down(b) => Some(MouseInput::ButtonDown { button: button(b), at }),
        MouseEventKind::Up(b) => Some(MouseInput::ButtonUp { button: button(b), at }),
        MouseEventKind::Drag(b) => Some(MouseInput::Drag { button: button(b), at }),
        MouseEventKind::ScrollUp => Some(MouseInput::ScrollUp { at }),
        MouseEventKind::ScrollDown => Some(MouseInput::ScrollDown { at }),
        _ => None,
    }
}

/// Splits a rendered line into styled spans. `spans` are `(x0, x1, style)`
/// in inclusive char-cell coordinates; the line is padded when a span
/// reaches past its end.
fn styled_line(raw: &str, spans: &[(usize, usize, Style)]) -> Line<'static> {
    if spans.is_empty() {
        return Line::from(raw.to_owned());
    }

    let mut chars: Vec<char> = raw.chars().collect();
    let needed = spans.iter().map(|(_, x1, _)| x1 + 1).max().unwrap_or(0);
    if chars.len() < needed {
        chars.resize(needed, ' ');
    }

    let mut sorted = spans.to_vec();
    sorted.sort_by_key(|(x0, _, _)| *x0);

    let mut out = Vec::new();
    let mut cursor = 0usize;
    for (x0, x1, style) in sorted {
        if x0 > cursor {
            out.push(Span::raw(chars[cursor..x0].iter().collect::<String>()));
        }
        let end = (x1 + 1).min(chars.len());
        if x0 < end {
            out.push(Span::styled(
                chars[x0..end].iter().collect::<String>(),
                style,
            ));
        }
        cursor = end.max(cursor);
    }
    if cursor < chars.len() {
        out.push(Span::raw(chars[cursor..].iter().collect::<String>()));
    }
    Line::from(out)
}

fn search_candidates_from_map(map: &MindMap) -> Vec<SearchCandidate> {
    map.nodes()
        .map(|(node_id, node)| SearchCandidate {
            node_id: node_id.clone(),
            haystack: node.text().to_lowercase(),
        })
        .collect()
}

fn ranked_search_results(
    candidates: &[SearchCandidate],
    query: &str,
    kind: SearchKind,
) -> Vec<NodeId> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let regex = match kind {
        SearchKind::Regular => Regex::new(&needle).ok(),
        SearchKind::Fuzzy => None,
    };
    let mut scored = candidates
        .iter()
        .filter_map(|candidate| {
            let score = match kind {
                SearchKind::Regular => {
                    regular_score(&needle, regex.as_ref(), &candidate.haystack)
                }
                SearchKind::Fuzzy => fuzzy_score(&needle, &candidate.haystack),
            }?;
            Some((score, candidate.node_id.clone()))
        })
        .collect::<Vec<_>>();

    scored.sort_by(|(score_a, id_a), (score_b, id_b)| {
        score_b.cmp(score_a).then_with(|| id_a.cmp(id_b))
    });
    scored.into_iter().map(|(_, node_id)| node_id).collect()
}

/// Regular search: the query is a regex when it compiles, a literal
/// substring otherwise. Earlier and whole-word matches rank higher.
fn regular_score(needle: &str, regex: Option<&Regex>, haystack: &str) -> Option<i64> {
    let (first, occurrences) = match regex {
        Some(re) => {
            let first = re.find(haystack)?.start();
            (first, re.find_iter(haystack).count() as i64)
        }
        None => {
            let first = haystack.find(needle)?;
            (first, haystack.match_indices(needle).count() as i64)
        }
    };

    let starts = first == 0;
    let start_boundary = if starts {
        true
    } else {
        haystack[..first].chars().last().is_some_and(is_boundary_char)
    };

    let mut score = 200_000i64.saturating_sub((first as i64) * 1000);
    score += occurrences * 200;
    score -= haystack.chars().count() as i64;
    if starts {
        score += 50_000;
    }
    if start_boundary {
        score += 20_000;
    }
    if haystack == needle {
        score += 100_000;
    }

    Some(score)
}

fn fuzzy_score(needle: &str, haystack: &str) -> Option<i64> {
    let subseq = subsequence_stats(needle, haystack)?;
    let ratio = rapidfuzz::fuzz::ratio(needle.chars(), haystack.chars());
    let ratio_score = (ratio * 1000.0).round() as i64;

    let mut score = ratio_score;
    score -= subseq.span as i64;
    score -= (subseq.first as i64) / 4;
    score += (subseq.consecutive as i64) * 40;
    if subseq.start_boundary {
        score += 150;
    }
    if haystack.contains(needle) {
        score += 2000;
    } else {
        score += 500;
    }

    Some(score)
}

struct SubsequenceStats {
    first: usize,
    span: usize,
    consecutive: usize,
    start_boundary: bool,
}

fn subsequence_stats(needle: &str, haystack: &str) -> Option<SubsequenceStats> {
    let mut needle_iter = needle.chars().peekable();
    let mut first: Option<usize> = None;
    let mut last: usize = 0;
    let mut prev_match: Option<usize> = None;
    let mut consecutive: usize = 0;
    let mut start_boundary = false;
    let mut prev_hay: Option<char> = None;

    for (idx, ch) in haystack.chars().enumerate() {
        let Some(&want) = needle_iter.peek() else {
            break;
        };

        if ch == want {
            needle_iter.next();

            if first.is_none() {
                first = Some(idx);
                start_boundary = prev_hay.map_or(true, is_boundary_char);
            }

            if let Some(prev) = prev_match {
                if idx == prev + 1 {
                    consecutive += 1;
                }
            }
            prev_match = Some(idx);
            last = idx;
        }

        prev_hay = Some(ch);
    }

    if needle_iter.peek().is_some() {
        return None;
    }

    let first = first?;
    Some(SubsequenceStats {
        first,
        span: last.saturating_sub(first).saturating_add(1),
        consecutive,
        start_boundary,
    })
}

fn is_boundary_char(ch: char) -> bool {
    matches!(ch, '/' | ':' | '-' | '_' | ' ')
}

fn copy_to_clipboard(text: &str) -> Result<&'static str, String> {
    let mut stdout = io::stdout();
    execute!(stdout, Print(osc52_sequence(text))).map_err(|err| err.to_string())?;
    Ok("osc52")
}

fn osc52_sequence(text: &str) -> String {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;

    let encoded = STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x1b\\")
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture).map_err(|err| {
            teardown_terminal();
            err
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, DisableMouseCapture, LeaveAlternateScreen);
}

#[cfg(test)]
mod tests;
