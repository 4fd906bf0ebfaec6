// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dryad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dryad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Layout, title, footer, help, and popup helpers used by TUI rendering.
fn footer_uses_compact_mode(area: Rect) -> bool {
    area.width < 90
}

fn view_title(label: &str, key: char, tail: Option<&str>) -> String {
    let mut title = format!("─[{key}]─ {label}");
    if let Some(tail) = tail {
        let tail = tail.trim();
        if !tail.is_empty() {
            title.push(' ');
            title.push_str(tail);
        }
    }
    title.push(' ');
    title
}

fn clamp_positive_i32_to_u16(value: i32) -> u16 {
    value.max(0).min(u16::MAX as i32) as u16
}

fn pad_text(mut text: Text<'static>, left_pad: usize, top_pad: usize) -> Text<'static> {
    if left_pad == 0 && top_pad == 0 {
        return text;
    }

    if left_pad > 0 {
        let pad = " ".repeat(left_pad);
        for line in &mut text.lines {
            line.spans.insert(0, Span::raw(pad.clone()));
        }
    }
    for _ in 0..top_pad {
        text.lines.insert(0, Line::default());
    }
    text
}

/// A centered popup rectangle clamped to the containing area.
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn footer_key_hints(app: &App, compact: bool) -> Vec<(&'static str, &'static str)> {
    if app.edit.is_some() {
        return vec![
            ("Enter", "commit"),
            ("Esc", "cancel"),
            ("RClick", "menu"),
        ];
    }
    if compact {
        return vec![("e", "edit"), ("/", "find"), ("?", "help"), ("q", "quit")];
    }
    vec![
        ("e", "edit"),
        ("Enter", "sibling"),
        ("Tab", "child"),
        ("Space", "fold"),
        ("/", "find"),
        ("y", "yank"),
        ("m", "map"),
        ("p", "prefs"),
        ("?", "help"),
        ("q", "quit"),
    ]
}

fn footer_help_line(app: &App, toast_suffix: &str, compact: bool) -> Line<'static> {
    let mut spans = Vec::new();
    for (idx, (key, label)) in footer_key_hints(app, compact).into_iter().enumerate() {
        if idx > 0 {
            spans.push(Span::styled(" · ".to_owned(), app.theme.footer_label_style()));
        }
        spans.push(Span::styled(key.to_owned(), app.theme.footer_key_style()));
        spans.push(Span::styled(format!(" {label}"), app.theme.footer_label_style()));
    }
    if !toast_suffix.is_empty() {
        spans.push(Span::styled(
            toast_suffix.to_owned(),
            app.theme.footer_label_style().add_modifier(Modifier::BOLD),
        ));
    }
    Line::from(spans)
}

fn search_footer_line(app: &App, toast_suffix: &str) -> Line<'static> {
    let counter = if app.search_results.is_empty() {
        String::new()
    } else {
        format!(" ({}/{})", app.search_result_index + 1, app.search_results.len())
    };
    let mut spans = vec![
        Span::styled(
            format!("{}{}", app.search_prefix(), app.search_query),
            app.theme.footer_label_style(),
        ),
        Span::styled(counter, app.theme.footer_key_style()),
    ];
    if !toast_suffix.is_empty() {
        spans.push(Span::styled(
            toast_suffix.to_owned(),
            app.theme.footer_label_style().add_modifier(Modifier::BOLD),
        ));
    }
    Line::from(spans)
}

fn footer_brand_line() -> Line<'static> {
    Line::from(Span::styled(
        FOOTER_BRAND.to_owned(),
        Style::default().fg(Color::White),
    ))
}

fn help_lines() -> Vec<&'static str> {
    vec![
        "Navigation",
        "  ←/→ h/l     toward parent / into children",
        "  ↑/↓ k/j     previous / next visible node",
        "  H J K L     pan the canvas",
        "  Home / c    center the map",
        "",
        "Editing",
        "  e / F2      edit the selected node in place",
        "  Enter       new sibling (opens the editor)",
        "  Tab         new child (opens the editor)",
        "  Shift-Tab   promote to the parent's level",
        "  Delete      remove the selected subtree",
        "  Space       fold / unfold",
        "",
        "While editing",
        "  Enter       commit",
        "  Esc         cancel (restores the previous text)",
        "  right-click context menu; clicking elsewhere commits",
        "",
        "Search",
        "  /           regular search (regex or literal)",
        "  \\           fuzzy search",
        "  n / N       next / previous match",
        "",
        "Other",
        "  y           yank node text to the clipboard (OSC52)",
        "  m           toggle the map overlay pane",
        "  p           preferences",
        "  q           quit",
    ]
}

fn render_help(frame: &mut Frame<'_>, app: &mut App, area: Rect) {
    let popup = centered_rect(area, 56, 24);
    frame.render_widget(Clear, popup);

    let lines = help_lines()
        .into_iter()
        .map(|line| Line::from(line.to_owned()))
        .collect::<Vec<_>>();
    app.help_viewport_height = popup.height.saturating_sub(2);

    let help = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(view_title("Help", '?', None))
                .border_style(app.theme.panel_border_style(true)),
        )
        .scroll((app.help_scroll, 0));
    frame.render_widget(help, popup);
}

fn render_context_menu(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let Some(menu) = &app.context_menu else {
        return;
    };

    let width = menu
        .items
        .iter()
        .map(|item| item.label().chars().count())
        .max()
        .unwrap_or(0) as u16
        + 4;
    let height = menu.items.len() as u16 + 2;
    let x = menu.at.0.min(area.right().saturating_sub(width));
    let y = menu.at.1.min(area.bottom().saturating_sub(height));
    let popup = Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    };
    frame.render_widget(Clear, popup);

    let items = menu
        .items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let style = if idx == menu.cursor {
                app.theme.selection_style()
            } else {
                app.theme.base_style()
            };
            ListItem::new(Line::from(Span::styled(item.label().to_owned(), style)))
        })
        .collect::<Vec<_>>();
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(app.theme.panel_border_style(true)),
    );
    frame.render_widget(list, popup);
}

fn render_prefs(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let Some(prefs) = &app.prefs else {
        return;
    };

    let popup = centered_rect(area, 52, 9);
    frame.render_widget(Clear, popup);

    let mut lines = Vec::new();
    for (idx, (label, value)) in prefs.rows().into_iter().enumerate() {
        let style = if idx == prefs.cursor {
            app.theme.selection_style()
        } else {
            app.theme.base_style()
        };
        lines.push(Line::from(vec![
            Span::styled(format!(" {label:<28}"), style),
            Span::styled(value, style),
        ]));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        " Space/Enter change · Esc apply & close".to_owned(),
        app.theme.footer_label_style(),
    )));

    let panel = Paragraph::new(Text::from(lines)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(view_title("Preferences", 'p', None))
            .border_style(app.theme.panel_border_style(true)),
    );
    frame.render_widget(panel, popup);
}
