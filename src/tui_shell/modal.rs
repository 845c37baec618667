use std::sync::mpsc::Sender;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};

use crate::services::prompt::{InputRequest, PickRequest};

use super::{Input, PromptRequest};

pub(super) enum ModalKind {
    Viewer,
    Input {
        request: InputRequest,
        input: Input,
        reply: Sender<Option<String>>,
    },
    Pick {
        request: PickRequest,
        cursor: usize,
        chosen: Vec<bool>,
        reply: Sender<Option<Vec<usize>>>,
    },
    Confirm {
        accept: String,
        reply: Sender<bool>,
    },
}

pub(super) struct Modal {
    pub(super) title: String,
    pub(super) lines: Vec<String>,
    pub(super) scroll: usize,
    pub(super) kind: ModalKind,
}

impl Modal {
    pub(super) fn viewer(title: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            title: title.into(),
            lines,
            scroll: 0,
            kind: ModalKind::Viewer,
        }
    }

    pub(super) fn from_prompt(prompt: PromptRequest) -> Self {
        match prompt {
            PromptRequest::Input { request, reply } => {
                let mut lines = Vec::new();
                if let Some(err) = &request.error {
                    lines.push(err.clone());
                }
                Self {
                    title: request.title.clone(),
                    lines,
                    scroll: 0,
                    kind: ModalKind::Input {
                        input: Input::with_value(&request.value),
                        request,
                        reply,
                    },
                }
            }
            PromptRequest::Pick { request, reply } => Self {
                title: request.title.clone(),
                lines: Vec::new(),
                scroll: 0,
                kind: ModalKind::Pick {
                    chosen: vec![false; request.items.len()],
                    cursor: 0,
                    request,
                    reply,
                },
            },
            PromptRequest::Confirm {
                message,
                accept,
                reply,
            } => Self {
                title: "Confirm".to_string(),
                lines: vec![message],
                scroll: 0,
                kind: ModalKind::Confirm { accept, reply },
            },
        }
    }
}

fn centered(area: Rect) -> Rect {
    let w = area.width.saturating_sub(6).clamp(20, 90);
    let h = area.height.saturating_sub(6).clamp(8, 22);
    Rect {
        x: area.x + area.width.saturating_sub(w) / 2,
        y: area.y + area.height.saturating_sub(h) / 2,
        width: w.min(area.width),
        height: h.min(area.height),
    }
}

fn text_lines(modal: &Modal) -> Paragraph<'_> {
    let lines: Vec<Line> = modal.lines.iter().map(|s| Line::from(s.as_str())).collect();
    let scroll = modal.scroll.min(modal.lines.len().saturating_sub(1)) as u16;
    Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
}

fn footer(text: &str) -> Paragraph<'_> {
    Paragraph::new(Line::from(Span::styled(
        text,
        Style::default().fg(Color::Gray).add_modifier(Modifier::DIM),
    )))
}

pub(super) fn draw_modal(frame: &mut ratatui::Frame, modal: &Modal) {
    let box_area = centered(frame.area());
    frame.render_widget(Clear, box_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            modal.title.as_str(),
            Style::default().fg(Color::Yellow),
        ));
    let inner = block.inner(box_area);
    frame.render_widget(block, box_area);

    match &modal.kind {
        ModalKind::Viewer => {
            let parts = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(1)])
                .split(inner);
            frame.render_widget(text_lines(modal), parts[0]);
            frame.render_widget(footer("Esc close  ↑/↓ scroll"), parts[1]);
        }

        ModalKind::Confirm { accept, .. } => {
            let parts = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(1)])
                .split(inner);
            frame.render_widget(text_lines(modal), parts[0]);
            let hint = format!("y/Enter {}  n/Esc cancel", accept);
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    hint,
                    Style::default().fg(Color::Gray),
                ))),
                parts[1],
            );
        }

        ModalKind::Input { request, input, .. } => {
            let parts = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Min(0),
                    Constraint::Length(3),
                    Constraint::Length(1),
                ])
                .split(inner);

            let errors: Vec<Line> = modal
                .lines
                .iter()
                .map(|s| Line::from(Span::styled(s.as_str(), Style::default().fg(Color::Red))))
                .collect();
            frame.render_widget(Paragraph::new(errors).wrap(Wrap { trim: false }), parts[0]);

            let body = if input.buf.is_empty() {
                Line::from(Span::styled(
                    request.placeholder.as_deref().unwrap_or_default(),
                    Style::default().fg(Color::DarkGray),
                ))
            } else {
                Line::from(input.buf.as_str())
            };
            frame.render_widget(
                Paragraph::new(body).block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(request.prompt.as_str()),
                ),
                parts[1],
            );
            frame.render_widget(footer("Enter accept  Esc cancel"), parts[2]);

            let x = input.before_cursor().chars().count() as u16;
            frame.set_cursor_position((parts[1].x + 1 + x, parts[1].y + 1));
        }

        ModalKind::Pick {
            request,
            cursor,
            chosen,
            ..
        } => {
            let parts = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(1)])
                .split(inner);
            let items: Vec<ListItem> = request
                .items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    let mark = match (request.many, chosen.get(i).copied().unwrap_or(false)) {
                        (false, _) => "",
                        (true, true) => "[x] ",
                        (true, false) => "[ ] ",
                    };
                    let mut spans = vec![Span::raw(format!("{}{}", mark, item.label))];
                    if let Some(d) = &item.description {
                        spans.push(Span::styled(
                            format!("  {}", d),
                            Style::default().fg(Color::Gray),
                        ));
                    }
                    ListItem::new(Line::from(spans))
                })
                .collect();
            let mut state = ListState::default();
            state.select(Some(*cursor));
            frame.render_stateful_widget(
                List::new(items).highlight_style(Style::default().bg(Color::DarkGray)),
                parts[0],
                &mut state,
            );
            let hint = if request.many {
                "Space toggle  Enter accept  Esc cancel"
            } else {
                "Enter select  Esc cancel"
            };
            frame.render_widget(footer(hint), parts[1]);
        }
    }
}

/// Apply one key to the open modal. Returns true when the modal should close;
/// any pending prompt has been answered by then.
pub(super) fn handle_modal_key(modal: &mut Modal, key: KeyEvent) -> bool {
    match &mut modal.kind {
        ModalKind::Viewer => match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => true,
            KeyCode::Up => {
                modal.scroll = modal.scroll.saturating_sub(1);
                false
            }
            KeyCode::Down => {
                modal.scroll = (modal.scroll + 1).min(modal.lines.len().saturating_sub(1));
                false
            }
            KeyCode::PageUp => {
                modal.scroll = modal.scroll.saturating_sub(10);
                false
            }
            KeyCode::PageDown => {
                modal.scroll = (modal.scroll + 10).min(modal.lines.len().saturating_sub(1));
                false
            }
            _ => false,
        },

        ModalKind::Confirm { reply, .. } => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                let _ = reply.send(true);
                true
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                let _ = reply.send(false);
                true
            }
            _ => false,
        },

        ModalKind::Input { input, reply, .. } => match key.code {
            KeyCode::Esc => {
                let _ = reply.send(None);
                true
            }
            KeyCode::Enter => {
                let _ = reply.send(Some(input.buf.clone()));
                true
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                input.clear();
                false
            }
            KeyCode::Char(c) => {
                input.insert_char(c);
                false
            }
            KeyCode::Backspace => {
                input.backspace();
                false
            }
            KeyCode::Delete => {
                input.delete();
                false
            }
            KeyCode::Left => {
                input.move_left();
                false
            }
            KeyCode::Right => {
                input.move_right();
                false
            }
            KeyCode::Home => {
                input.home();
                false
            }
            KeyCode::End => {
                input.end();
                false
            }
            _ => false,
        },

        ModalKind::Pick {
            request,
            cursor,
            chosen,
            reply,
        } => {
            let n = request.items.len();
            match key.code {
                KeyCode::Esc => {
                    let _ = reply.send(None);
                    true
                }
                KeyCode::Up if n > 0 => {
                    *cursor = (*cursor + n - 1) % n;
                    false
                }
                KeyCode::Down if n > 0 => {
                    *cursor = (*cursor + 1) % n;
                    false
                }
                KeyCode::Char(' ') if request.many => {
                    if let Some(c) = chosen.get_mut(*cursor) {
                        *c = !*c;
                    }
                    false
                }
                KeyCode::Enter if n > 0 => {
                    let picked: Vec<usize> = if request.many {
                        let marked: Vec<usize> = chosen
                            .iter()
                            .enumerate()
                            .filter_map(|(i, c)| c.then_some(i))
                            .collect();
                        if marked.is_empty() { vec![*cursor] } else { marked }
                    } else {
                        vec![*cursor]
                    };
                    let _ = reply.send(Some(picked));
                    true
                }
                _ => false,
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/tui_shell/modal_tests.rs"]
mod tests;
