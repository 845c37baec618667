use super::*;

pub(super) fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        app.drain_events();
        if app.needs_clear {
            terminal.clear().context("clear terminal")?;
            app.needs_clear = false;
        }

        terminal
            .draw(|f| super::render::draw(f, app))
            .context("draw")?;
        if app.quit {
            return Ok(());
        }

        if event::poll(Duration::from_millis(50)).context("poll")? {
            match event::read().context("read event")? {
                Event::Key(k) if k.kind == KeyEventKind::Press => handle_key(app, k),
                _ => {}
            }
        }
        app.tick = app.tick.wrapping_add(1);
    }
}

fn cycle(selected: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        0
    } else if forward {
        (selected + 1) % len
    } else {
        (selected + len - 1) % len
    }
}

pub(super) fn handle_key(app: &mut App, key: KeyEvent) {
    if let Some(m) = app.modal.as_mut() {
        if modal::handle_modal_key(m, key) {
            app.modal = None;
            app.open_pending_modal();
        }
        return;
    }

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit = true;
        return;
    }

    match key.code {
        KeyCode::Char('q') if app.input.buf.is_empty() => {
            app.quit = true;
        }

        KeyCode::Esc => {
            app.input.clear();
            app.recompute_suggestions();
        }

        KeyCode::Tab => {
            if !app.suggestions.is_empty() {
                app.apply_selected_suggestion();
            }
        }

        KeyCode::Enter => {
            if app.input.buf.is_empty() {
                app.run_default_action();
                return;
            }

            let sel = app
                .suggestion_selected
                .min(app.suggestions.len().saturating_sub(1));
            if let Some(def) = app.suggestions.get(sel) {
                let first = app.input.buf.split_whitespace().next().unwrap_or("");
                if !def.matches(first) {
                    app.apply_selected_suggestion();
                }
            }
            app.run_current_input();
        }

        KeyCode::Up => {
            if app.input.buf.is_empty() {
                app.tree.move_by(-1);
            } else if !app.suggestions.is_empty() {
                app.suggestion_selected =
                    cycle(app.suggestion_selected, app.suggestions.len(), false);
            } else {
                app.input.history_up();
                app.recompute_suggestions();
            }
        }
        KeyCode::Down => {
            if app.input.buf.is_empty() {
                app.tree.move_by(1);
            } else if !app.suggestions.is_empty() {
                app.suggestion_selected =
                    cycle(app.suggestion_selected, app.suggestions.len(), true);
            } else {
                app.input.history_down();
                app.recompute_suggestions();
            }
        }
        KeyCode::PageUp => app.tree.move_by(-10),
        KeyCode::PageDown => app.tree.move_by(10),
        KeyCode::Home if app.input.buf.is_empty() => app.tree.move_to_start(),
        KeyCode::End if app.input.buf.is_empty() => app.tree.move_to_end(),
        KeyCode::Home => app.input.home(),
        KeyCode::End => app.input.end(),

        KeyCode::Right => {
            if app.input.buf.is_empty() {
                app.expand_selected();
            } else {
                app.input.move_right();
            }
        }
        KeyCode::Left => {
            if app.input.buf.is_empty() {
                app.collapse_selected();
            } else {
                app.input.move_left();
            }
        }

        KeyCode::F(5) => app.refresh_all(),

        KeyCode::Backspace => {
            app.input.backspace();
            app.recompute_suggestions();
        }
        KeyCode::Delete => {
            app.input.delete();
            app.recompute_suggestions();
        }

        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.input.clear();
            app.recompute_suggestions();
        }
        KeyCode::Char('p') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.input.history_up();
            app.recompute_suggestions();
        }
        KeyCode::Char('n') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.input.history_down();
            app.recompute_suggestions();
        }

        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.input.insert_char(c);
            app.recompute_suggestions();
        }

        _ => {}
    }
}
