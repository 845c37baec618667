use super::*;

pub(super) fn draw(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(4),
            Constraint::Length(if app.suggestions.is_empty() { 0 } else { 8 }),
            Constraint::Length(2),
        ])
        .split(area);

    draw_header(frame, app, chunks[0]);
    draw_tree(frame, app, chunks[1]);
    draw_status(frame, app, chunks[2]);
    if !app.suggestions.is_empty() {
        draw_suggestions(frame, app, chunks[3]);
    }

    let prompt = "›";
    let input_line = Line::from(vec![
        Span::styled(prompt, Style::default().fg(Color::Cyan)),
        Span::raw(" "),
        Span::raw(app.input.buf.as_str()),
    ]);
    frame.render_widget(
        Paragraph::new(input_line).block(Block::default().borders(Borders::TOP)),
        chunks[4],
    );

    if let Some(m) = &app.modal {
        dim_frame(frame);
        modal::draw_modal(frame, m);
        return;
    }

    let x = (prompt.chars().count() + 1 + app.input.before_cursor().chars().count()) as u16;
    frame.set_cursor_position((chunks[4].x + x, chunks[4].y + 1));
}

fn draw_header(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let mut spans = vec![
        Span::styled("appreg", Style::default().fg(Color::Black).bg(Color::White)),
        Span::raw("  "),
    ];
    let scope = if app.settings.show_all_applications {
        "all applications"
    } else {
        "owned applications"
    };
    spans.push(Span::raw(scope));
    if let Some(prefix) = app.session().filter() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("filter: {}*", prefix),
            Style::default().fg(Color::Yellow),
        ));
    }
    spans.push(Span::raw("  "));
    if app.rendering {
        spans.push(Span::styled(
            format!("{} refreshing", SPINNER[app.tick % SPINNER.len()]),
            Style::default().fg(Color::Cyan),
        ));
    } else if app.session().is_authenticated() {
        spans.push(Span::styled("signed in", Style::default().fg(Color::Green)));
    } else {
        spans.push(Span::styled("signed out", Style::default().fg(Color::Red)));
    }

    let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, area);
}

fn node_line<'a>(app: &'a App, node: &'a TreeNode, depth: usize) -> Line<'a> {
    let key = NodeKey::of(node);
    let busy = app.busy.get(&key);
    let working = busy.is_some() || app.loading.contains(&key);

    let arrow = if node.children.is_expandable() {
        if node.expanded { "▾ " } else { "▸ " }
    } else {
        "  "
    };
    let glyph = if working {
        SPINNER[app.tick % SPINNER.len()]
    } else {
        node.icon.glyph()
    };
    let icon_style = match node.icon {
        Icon::Expired => Style::default().fg(Color::Red),
        Icon::SignIn => Style::default().fg(Color::Cyan),
        Icon::Application => Style::default().fg(Color::Blue),
        _ => Style::default().fg(Color::Gray),
    };
    let label_style = if node.enabled == Some(false) {
        Style::default().add_modifier(Modifier::DIM)
    } else {
        Style::default()
    };

    let mut spans = vec![
        Span::raw("  ".repeat(depth)),
        Span::raw(arrow),
        Span::styled(format!("{} ", glyph), icon_style),
        Span::styled(node.label.as_str(), label_style),
    ];
    if let Some(label) = busy {
        spans.push(Span::styled(
            format!("  {}…", label),
            Style::default().fg(Color::Yellow),
        ));
    }
    Line::from(spans)
}

fn draw_tree(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let rows = app.tree.rows();
    let items: Vec<ListItem> = rows
        .iter()
        .filter_map(|r| app.tree.node(&r.path).map(|n| (n, r.depth)))
        .map(|(n, depth)| ListItem::new(node_line(app, n, depth)))
        .collect();

    if items.is_empty() {
        let text = if app.rendering { "Loading…" } else { "No applications" };
        frame.render_widget(
            Paragraph::new(Span::styled(text, Style::default().fg(Color::Gray))),
            area,
        );
        return;
    }

    let list = List::new(items)
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));
    let mut state = ListState::default();
    state.select(Some(app.tree.selected_index()));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_status(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let mut lines = Vec::new();
    if let Some(cmd) = &app.last_command {
        lines.push(Line::from(vec![
            Span::styled("> ", Style::default().fg(Color::Cyan)),
            Span::raw(cmd.as_str()),
        ]));
    }
    if let Some(r) = &app.last_result {
        let style = match r.level {
            Level::Info => Style::default().fg(Color::White),
            Level::Warn => Style::default().fg(Color::Yellow),
            Level::Error => Style::default().fg(Color::Red),
        };
        lines.push(Line::from(Span::styled(r.text.as_str(), style)));
    }
    if let Some(tip) = app.tree.selected().and_then(|n| n.tooltip.as_deref()) {
        lines.push(Line::from(Span::styled(
            tip,
            Style::default().fg(Color::Gray).add_modifier(Modifier::DIM),
        )));
    }
    if lines.is_empty() {
        lines.push(Line::from(""));
    }
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::TOP)),
        area,
    );
}

fn draw_suggestions(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let total = app.suggestions.len();
    let sel_idx = app.suggestion_selected.min(total.saturating_sub(1));
    let max_items = (area.height.saturating_sub(2) as usize).max(1);
    let start = if sel_idx >= max_items {
        sel_idx + 1 - max_items
    } else {
        0
    };
    let end = (start + max_items).min(total);

    let lines: Vec<Line> = app.suggestions[start..end]
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let style = if start + i == sel_idx {
                Style::default().bg(Color::DarkGray)
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::styled(format!("{: <20}", s.usage), style.fg(Color::Yellow)),
                Span::styled(s.help, style.fg(Color::White)),
            ])
        })
        .collect();
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::TOP | Borders::BOTTOM)
                .title(format!("{}/{}", sel_idx + 1, total)),
        ),
        area,
    );
}

fn dim_frame(frame: &mut ratatui::Frame) {
    let area = frame.area();
    let buf = frame.buffer_mut();
    for y in area.y..area.y.saturating_add(area.height) {
        for x in area.x..area.x.saturating_add(area.width) {
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.modifier |= Modifier::DIM;
            }
        }
    }
}
