// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dryad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dryad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::{
    demo_map, osc52_sequence, overlay_display_text, ranked_search_results, styled_line, App,
    SearchCandidate, SearchKind, SearchMode,
};
use crate::config::AppConfig;
use crate::edit::EditState;
use crate::mapview::MapViewer;
use crate::model::{MindMap, NodeId};
use crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

fn app() -> App {
    let mut app = App::new(demo_map(), AppConfig::default()).expect("app");
    app.canvas_inner = Some(Rect::new(0, 0, 120, 40));
    app
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn type_text(app: &mut App, text: &str) {
    for ch in text.chars() {
        app.handle_key(key(KeyCode::Char(ch)));
    }
}

fn root_text(app: &App) -> String {
    app.map
        .node(app.map.root_id())
        .expect("root")
        .text()
        .to_owned()
}

fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
    MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }
}

#[test]
fn demo_map_has_a_folded_branch() {
    let map = demo_map();
    assert!(map.nodes().any(|(_, node)| node.folded()));
    assert!(map.len() > 8);
}

#[test]
fn edit_key_starts_a_session_with_deferred_focus() {
    let mut app = app();
    app.handle_key(key(KeyCode::Char('e')));

    assert!(app.edit.is_some());
    assert!(app.overlay.attached.is_some());
    assert!(!app.overlay.focused);

    app.pump_edit_session();
    assert!(app.overlay.focused);
}

#[test]
fn typed_text_commits_into_the_model_on_enter() {
    let mut app = app();
    app.handle_key(key(KeyCode::Char('e')));
    app.pump_edit_session();
    type_text(&mut app, "!");
    app.handle_key(key(KeyCode::Enter));

    assert!(app.edit.is_none());
    assert!(app.overlay.attached.is_none());
    assert!(!app.overlay.listeners_active);
    assert_eq!(root_text(&app), "Dryad!");
}

#[test]
fn escape_restores_the_previous_text() {
    let mut app = app();
    app.handle_key(key(KeyCode::Char('e')));
    type_text(&mut app, "scratch");
    app.handle_key(key(KeyCode::Esc));

    assert!(app.edit.is_none());
    assert_eq!(root_text(&app), "Dryad");
}

#[test]
fn terminal_resize_commits_the_active_edit() {
    let mut app = app();
    app.handle_key(key(KeyCode::Char('e')));
    type_text(&mut app, "?");
    app.handle_resize();

    assert!(app.edit.is_none());
    assert_eq!(root_text(&app), "Dryad?");
}

#[test]
fn starting_a_new_edit_finalizes_the_previous_session() {
    let mut app = app();
    app.handle_key(key(KeyCode::Char('e')));
    type_text(&mut app, "*");

    let other = app.map.root_id().clone();
    let first_child = app
        .map
        .node(&other)
        .expect("root")
        .children()
        .first()
        .expect("child")
        .clone();
    app.start_edit(first_child.clone());

    // The root edit auto-committed before the new session started.
    assert_eq!(root_text(&app), "Dryad*");
    let session = app.edit.as_ref().expect("new session");
    assert_eq!(session.node_id(), &first_child);
    assert_eq!(session.state(), EditState::Active);
}

#[test]
fn enter_adds_a_sibling_and_opens_its_editor() {
    let mut app = app();
    let root_id = app.map.root_id().clone();
    let first_child = app.map.node(&root_id).expect("root").children()[0].clone();
    app.selected = first_child.clone();
    let before = app.map.len();

    app.handle_key(key(KeyCode::Enter));
    assert_eq!(app.map.len(), before + 1);

    let session = app.edit.as_ref().expect("session");
    let new_node = app.map.node(session.node_id()).expect("new node");
    assert_eq!(new_node.parent(), Some(&root_id));
    assert_eq!(new_node.text(), "");
}

#[test]
fn tab_adds_a_child_and_opens_its_editor() {
    let mut app = app();
    let before = app.map.len();
    app.handle_key(key(KeyCode::Tab));

    assert_eq!(app.map.len(), before + 1);
    let session = app.edit.as_ref().expect("session");
    assert_eq!(
        app.map.node(session.node_id()).expect("new node").parent(),
        Some(app.map.root_id())
    );
}

#[test]
fn backtab_promotes_the_selected_node_one_level() {
    let mut app = app();
    let root_id = app.map.root_id().clone();
    let ideas = app.map.node(&root_id).expect("root").children()[0].clone();
    let target = app.map.node(&ideas).expect("ideas").children()[0].clone();
    app.selected = target.clone();

    app.handle_key(key(KeyCode::BackTab));
    assert_eq!(app.map.node(&target).expect("target").parent(), Some(&root_id));
    // Placed directly after its former parent.
    assert_eq!(app.map.node(&root_id).expect("root").children()[1], target);

    // A top-level node has nowhere to go.
    app.handle_key(key(KeyCode::BackTab));
    assert_eq!(app.map.node(&target).expect("target").parent(), Some(&root_id));
    assert!(app.toast.is_some());
}

#[test]
fn delete_removes_the_subtree_and_selects_the_parent() {
    let mut app = app();
    let root_id = app.map.root_id().clone();
    let branch = app.map.node(&root_id).expect("root").children()[0].clone();
    app.selected = branch.clone();
    let before = app.map.len();

    app.handle_key(key(KeyCode::Delete));
    assert!(app.map.len() < before);
    assert!(!app.map.contains(&branch));
    assert_eq!(app.selected, root_id);
}

#[test]
fn delete_on_root_is_rejected_with_a_toast() {
    let mut app = app();
    let before = app.map.len();
    app.handle_key(key(KeyCode::Delete));

    assert_eq!(app.map.len(), before);
    assert!(app.toast.is_some());
}

#[test]
fn click_outside_the_overlay_commits_the_edit() {
    let mut app = app();
    app.handle_key(key(KeyCode::Char('e')));
    type_text(&mut app, "+");

    app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 119, 39));
    assert!(app.edit.is_none());
    assert_eq!(root_text(&app), "Dryad+");
}

#[test]
fn click_selects_the_node_under_the_cursor() {
    let mut app = app();
    let target = app
        .map
        .nodes()
        .find(|(_, node)| node.text() == "Lisbon")
        .map(|(node_id, _)| node_id.clone())
        .expect("lisbon node");
    let (y, x0, _) = app.render.placement_index[&target];

    app.handle_mouse(mouse(
        MouseEventKind::Down(MouseButton::Left),
        x0 as u16,
        y as u16,
    ));
    assert_eq!(app.selected, target);
}

#[test]
fn context_menu_suppresses_the_blur_commit_until_closed() {
    let mut app = App::new(
        demo_map(),
        AppConfig {
            check_spelling: true,
            ..AppConfig::default()
        },
    )
    .expect("app");
    app.canvas_inner = Some(Rect::new(0, 0, 120, 40));

    app.handle_key(key(KeyCode::Char('e')));
    let session = app.edit.as_ref().expect("session");
    assert!(session.spell_registered());
    let bounds = app.overlay.attached.expect("overlay");

    app.handle_mouse(mouse(
        MouseEventKind::Down(MouseButton::Right),
        bounds.x.max(0) as u16,
        bounds.y.max(0) as u16,
    ));
    assert!(app.context_menu.is_some());

    // Menu open: the session survives what would otherwise be a blur.
    app.handle_key(key(KeyCode::Esc));
    assert!(app.context_menu.is_none());
    assert!(app.edit.is_some());

    app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 119, 39));
    assert!(app.edit.is_none());
}

#[test]
fn wheel_scroll_during_edit_repositions_the_overlay() {
    let mut app = app();
    app.handle_key(key(KeyCode::Char('e')));
    let before = app.overlay.attached.expect("overlay");

    app.handle_mouse(mouse(MouseEventKind::ScrollDown, 10, 10));
    let after = app.overlay.attached.expect("overlay");

    assert_eq!(after.y, before.y - super::WHEEL_STEP);
    assert!(app.edit.is_some());
}

#[test]
fn search_jumps_to_the_best_match_and_unfolds_it() {
    let mut app = app();
    // "Oat milk" hides behind the folded Groceries branch.
    app.handle_key(key(KeyCode::Char('/')));
    assert_eq!(app.search_mode, SearchMode::Editing);
    type_text(&mut app, "oat milk");
    app.handle_key(key(KeyCode::Enter));

    let selected_text = app
        .map
        .node(&app.selected)
        .expect("selected")
        .text()
        .to_owned();
    assert_eq!(selected_text, "Oat milk");
    assert!(!app.map.is_hidden(&app.selected));
}

#[test]
fn fuzzy_search_matches_subsequences() {
    let mut app = app();
    app.handle_key(key(KeyCode::Char('\\')));
    type_text(&mut app, "rdnglst");
    app.handle_key(key(KeyCode::Enter));

    let selected_text = app
        .map
        .node(&app.selected)
        .expect("selected")
        .text()
        .to_owned();
    assert_eq!(selected_text, "Reading list");
}

#[test]
fn ranked_search_prefers_prefix_matches() {
    let candidates = ["alpha beta", "beta alpha", "gamma"]
        .iter()
        .enumerate()
        .map(|(idx, text)| SearchCandidate {
            node_id: NodeId::new(format!("n:{idx}")).expect("id"),
            haystack: (*text).to_owned(),
        })
        .collect::<Vec<_>>();

    let results = ranked_search_results(&candidates, "beta", SearchKind::Regular);
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].as_str(), "n:1");
}

#[test]
fn regular_search_accepts_regex_queries() {
    let candidates = vec![SearchCandidate {
        node_id: NodeId::new("n:0").expect("id"),
        haystack: "release checklist".to_owned(),
    }];
    let results = ranked_search_results(&candidates, "rel.*list", SearchKind::Regular);
    assert_eq!(results.len(), 1);
}

#[test]
fn map_pane_mouse_routes_to_the_controller() {
    let mut app = app();
    app.map_visible = true;
    let pane = Rect::new(60, 0, 40, 20);
    app.map_pane_inner = Some(pane);
    app.map_controller.viewer_mut().set_viewport(pane.width, pane.height);
    let before = app.map_controller.viewer().zoom();

    app.handle_mouse(mouse(MouseEventKind::ScrollUp, 70, 5));
    assert_eq!(app.map_controller.viewer().zoom(), before + 1);

    // Outside the pane the event belongs to the canvas.
    app.handle_mouse(mouse(MouseEventKind::ScrollUp, 10, 5));
    assert_eq!(app.map_controller.viewer().zoom(), before + 1);
}

#[test]
fn prefs_panel_applies_to_config_and_spell_session() {
    let mut app = app();
    assert!(!app.spell_config.enabled);

    app.handle_key(key(KeyCode::Char('p')));
    assert!(app.prefs.is_some());

    // Toggle "check spelling" (first row), then close.
    app.handle_key(key(KeyCode::Enter));
    app.handle_key(key(KeyCode::Esc));

    assert!(app.prefs.is_none());
    assert!(app.config.check_spelling);
    assert!(app.spell_config.enabled);
}

#[test]
fn navigation_moves_between_parent_and_children() {
    let mut app = app();
    let root_id = app.map.root_id().clone();

    app.handle_key(key(KeyCode::Right));
    assert_ne!(app.selected, root_id);
    let child = app.selected.clone();
    assert_eq!(app.map.node(&child).expect("child").parent(), Some(&root_id));

    app.handle_key(key(KeyCode::Left));
    assert_eq!(app.selected, root_id);
}

#[test]
fn vertical_navigation_walks_visible_nodes() {
    let mut app = app();
    let order = app.map.visible_nodes();
    app.selected = order[0].clone();

    app.handle_key(key(KeyCode::Down));
    assert_eq!(app.selected, order[1]);

    app.handle_key(key(KeyCode::Up));
    assert_eq!(app.selected, order[0]);
}

#[test]
fn osc52_sequence_base64_encodes_the_payload() {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;

    let sequence = osc52_sequence("node text");
    assert!(sequence.starts_with("\x1b]52;c;"));
    assert!(sequence.ends_with("\x1b\\"));

    let encoded = &sequence[7..sequence.len() - 2];
    let decoded = STANDARD.decode(encoded).expect("base64");
    assert_eq!(decoded, b"node text");
}

#[test]
fn styled_line_pads_short_lines_to_the_span_end() {
    let style = Style::default().add_modifier(Modifier::REVERSED);
    let line = styled_line("ab", &[(1, 4, style)]);

    let rendered: String = line
        .spans
        .iter()
        .map(|span| span.content.as_ref())
        .collect();
    assert_eq!(rendered, "ab   ");
    assert_eq!(line.spans[1].style, style);
}

#[test]
fn overlay_display_text_keeps_the_tail_visible() {
    assert_eq!(overlay_display_text("short", 10), "short");
    assert_eq!(overlay_display_text("a long node label", 6), "…label");
}

#[test]
fn selection_falls_back_to_root_after_model_changes() {
    let mut app = app();
    let root_id = app.map.root_id().clone();
    let branch = app.map.node(&root_id).expect("root").children()[0].clone();
    app.selected = branch.clone();

    app.map.remove_subtree(&branch).expect("remove");
    app.refresh_view();
    assert_eq!(app.selected, root_id);
}

#[test]
fn center_request_recenters_on_next_draw() {
    let mut app = app();
    app.pan_x = 40;
    app.pan_y = 7;
    app.center_on_next_draw = true;
    app.center_map_if_needed(100, 30);

    assert_eq!(app.pan_x, (app.render.width as i32 - 100) / 2);
    assert_eq!(app.pan_y, (app.render.height as i32 - 30) / 2);
    assert!(!app.center_on_next_draw);
}

#[test]
fn search_candidates_cover_every_node() {
    let map: MindMap = demo_map();
    let candidates = super::search_candidates_from_map(&map);
    assert_eq!(candidates.len(), map.len());
}
