use super::app::{App, HistoryEntry};
use super::help::render_help;
use super::helpers::{highlight_expression, wrap_text};
use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use rpncalc::calc_engine::{format_expression, Variables};
use rpncalc::display::format_number;
use rpncalc::session::Entry;
use std::time::Duration;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

const MIN_TERMINAL_WIDTH: u16 = 50;
const MIN_TERMINAL_HEIGHT: u16 = 10;

pub fn run_ui_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| {
            if app.show_help {
                render_help(f, app);
            } else {
                ui(f, app);
            }
        })?;

        if app.should_quit {
            break;
        }

        if crossterm::event::poll(Duration::from_millis(50))? {
            match crossterm::event::read()? {
                Event::Key(KeyEvent { code, modifiers, kind, .. }) if kind == KeyEventKind::Press => {
                    handle_key_event(app, code, modifiers);
                }
                Event::Mouse(event) => handle_mouse_event(app, event.kind),
                _ => {}
            }
        }
    }
    Ok(())
}

fn handle_key_event(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    if app.show_help {
        match code {
            KeyCode::Down => app.help_scroll = app.help_scroll.saturating_add(1),
            KeyCode::Up => app.help_scroll = app.help_scroll.saturating_sub(1),
            KeyCode::PageDown => app.help_scroll = app.help_scroll.saturating_add(10),
            KeyCode::PageUp => app.help_scroll = app.help_scroll.saturating_sub(10),
            KeyCode::Esc | KeyCode::F(1) => {
                app.show_help = false;
                app.help_scroll = 0;
            }
            _ => {}
        }
        return;
    }

    let control = modifiers.contains(KeyModifiers::CONTROL);
    match code {
        KeyCode::Char('u') | KeyCode::Char('U') if control => app.clear_input(),
        KeyCode::Char('c') if control => app.should_quit = true,
        KeyCode::Char(c) if !control => app.insert_char(c),
        KeyCode::Backspace => app.delete_before_cursor(),
        KeyCode::Delete => app.delete_at_cursor(),
        KeyCode::Left if control => app.move_cursor_by_words(-1),
        KeyCode::Right if control => app.move_cursor_by_words(1),
        KeyCode::Left => app.move_cursor(-1),
        KeyCode::Right => app.move_cursor(1),
        KeyCode::Home => {
            app.cursor_position = 0;
            app.input_scroll = 0;
        }
        KeyCode::End => app.cursor_position = app.input_len(),
        KeyCode::Up => app.navigate_history(-1),
        KeyCode::Down => app.navigate_history(1),
        KeyCode::PageUp => app.scroll_history(-1),
        KeyCode::PageDown => app.scroll_history(1),
        KeyCode::Enter => app.submit(),
        KeyCode::F(1) => {
            app.show_help = true;
            app.help_scroll = 0;
        }
        _ => {}
    }
}

fn handle_mouse_event(app: &mut App, kind: MouseEventKind) {
    let scroll = if app.show_help {
        &mut app.help_scroll
    } else {
        &mut app.history_scroll
    };
    match kind {
        MouseEventKind::ScrollDown => *scroll = scroll.saturating_add(3),
        MouseEventKind::ScrollUp => *scroll = scroll.saturating_sub(3),
        _ => {}
    }
}

fn ui(frame: &mut Frame, app: &mut App) {
    let size = frame.size();

    app.terminal_too_small = size.width < MIN_TERMINAL_WIDTH || size.height < MIN_TERMINAL_HEIGHT;
    if app.terminal_too_small {
        render_resize_message(frame, size);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(3),
        ])
        .split(size);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Min(30), Constraint::Length(22)])
        .split(rows[2]);

    render_input(frame, app, rows[0]);
    render_status(frame, rows[1]);
    render_history(frame, app, columns[0]);
    render_variables(frame, app, columns[1]);
    app.list_height = columns[0].height as usize;
}

fn render_resize_message(frame: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(Span::styled(
            format!(
                "Terminal too small! Min size: {}x{}. Current: {}x{}",
                MIN_TERMINAL_WIDTH, MIN_TERMINAL_HEIGHT, area.width, area.height
            ),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Please resize your terminal window",
            Style::default().fg(Color::Yellow),
        )),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" Resize Required ")
        .title_alignment(Alignment::Center);

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

/// Indented detail lines under a history entry, wrapped to `width`.
fn push_detail(items: &mut Vec<ListItem<'static>>, text: &str, width: usize, style: Style) {
    for (i, line) in wrap_text(text, width).into_iter().enumerate() {
        let prefix = if i == 0 { "    - " } else { "      " };
        items.push(ListItem::new(Line::from(Span::styled(
            format!("{}{}", prefix, line),
            style,
        ))));
    }
}

fn entry_items(
    entry: &HistoryEntry,
    selected: bool,
    variables: &Variables,
    width: usize,
) -> Vec<ListItem<'static>> {
    let mut items = Vec::new();
    let base_style = Style::default().fg(if selected { Color::Yellow } else { Color::Cyan });
    let muted = Style::default().fg(Color::DarkGray);

    let shown = format_expression(&entry.input).unwrap_or_else(|_| entry.input.clone());
    for (line_idx, line) in wrap_text(&shown, width).into_iter().enumerate() {
        let marker = if line_idx == 0 { "> " } else { "  " };
        let mut spans = vec![Span::styled(marker, Style::default().fg(Color::Green))];
        spans.extend(highlight_expression(&line, base_style, variables));

        if line_idx == 0 {
            spans.push(Span::styled(" = ", Style::default().fg(Color::Gray)));
            spans.push(match &entry.result {
                Ok(Entry::Evaluation(eval)) => Span::styled(
                    format_number(eval.value),
                    Style::default().fg(Color::LightMagenta).add_modifier(Modifier::BOLD),
                ),
                Ok(Entry::Assignment { name, value }) => Span::styled(
                    format!("{} := {}", name, format_number(*value)),
                    Style::default().fg(Color::LightCyan).add_modifier(Modifier::BOLD),
                ),
                Ok(Entry::Listing(bindings)) if bindings.is_empty() => {
                    Span::styled("no variables bound", muted)
                }
                Ok(Entry::Listing(bindings)) => Span::styled(
                    bindings
                        .iter()
                        .map(|(name, value)| format!("{} = {}", name, format_number(*value)))
                        .collect::<Vec<_>>()
                        .join(", "),
                    Style::default().fg(Color::LightCyan),
                ),
                Err(e) => Span::styled(
                    format!("Error: {}", e),
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
            });
        }
        items.push(ListItem::new(Line::from(spans)));
    }

    if let Ok(Entry::Evaluation(eval)) = &entry.result {
        if !eval.defaulted.is_empty() {
            let text = format!("Unbound, read as 0: {}", eval.defaulted.join(", "));
            push_detail(&mut items, &text, width, Style::default().fg(Color::LightRed));
        }
        if entry.detailed_mode {
            if let Some(postfix) = &eval.postfix {
                push_detail(&mut items, &format!("RPN: {}", postfix), width, muted);
            }
            for (j, step) in eval.steps.iter().enumerate() {
                let text = format!("Step {}: {} = {}", j + 1, step.operation, format_number(step.result));
                push_detail(&mut items, &text, width, muted);
            }
        }
    }

    if entry.detailed_mode {
        let time = format!("Time: {:.6} ms", entry.duration.as_secs_f64() * 1000.0);
        push_detail(&mut items, &time, width, Style::default().fg(Color::Magenta));
    }
    items
}

fn render_history(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" History ")
        .title_alignment(Alignment::Center);

    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    if app.history.is_empty() {
        let empty_msg = Paragraph::new("No calculations yet. Try (2 + 3) * 4 or x = 2")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(empty_msg, inner_area);
        return;
    }

    let wrap_width = inner_area.width.saturating_sub(4) as usize;
    let mut items = Vec::new();
    app.item_start_indices.clear();

    for (i, entry) in app.history.iter().enumerate() {
        app.item_start_indices.push(items.len());
        let selected = i == app.cursor_history;
        items.extend(entry_items(entry, selected, app.session.variables(), wrap_width));

        if i + 1 < app.history.len() {
            items.push(ListItem::new(Line::from(Span::styled(
                "-".repeat(inner_area.width as usize),
                Style::default().fg(Color::DarkGray),
            ))));
        }
    }

    if app.scroll_to_bottom {
        app.history_scroll = items.len().saturating_sub(inner_area.height as usize);
        app.scroll_to_bottom = false;
    }

    let selected_index = app.item_start_indices.get(app.cursor_history).copied();
    let list = List::new(items)
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));
    let mut state = ListState::default()
        .with_selected(selected_index)
        .with_offset(app.history_scroll);

    frame.render_stateful_widget(list, inner_area, &mut state);
}

fn render_variables(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Variables ")
        .title_alignment(Alignment::Center);

    let bindings = app.session.bindings();
    let lines: Vec<Line> = if bindings.is_empty() {
        vec![Line::from(Span::styled("none (x = 2)", Style::default().fg(Color::DarkGray)))]
    } else {
        bindings
            .into_iter()
            .map(|(name, value)| {
                Line::from(vec![
                    Span::styled(name.to_string(), Style::default().fg(Color::LightCyan)),
                    Span::styled(" = ", Style::default().fg(Color::Gray)),
                    Span::raw(format_number(value)),
                ])
            })
            .collect()
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_status(frame: &mut Frame, area: Rect) {
    let keys = [
        ("Enter", "Calculate"),
        ("Up/Down", "Recall"),
        ("F1", "Help"),
        ("Ctrl+U", "Clear Input"),
        ("Ctrl+C", "Quit"),
    ];

    let spans: Vec<Span> = keys
        .iter()
        .flat_map(|(key, desc)| {
            vec![
                Span::styled(*key, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
                Span::styled(format!(" {} ", desc), Style::default().fg(Color::DarkGray)),
            ]
        })
        .collect();

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_input(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Expression ")
        .title_alignment(Alignment::Center);

    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let visible_width = inner_area.width.saturating_sub(2) as usize;
    app.adjust_input_scroll(visible_width);
    let total = app.input_len();

    let visible: Vec<&str> = app
        .input
        .graphemes(true)
        .skip(app.input_scroll)
        .take(visible_width)
        .collect();

    let mut spans = vec![Span::raw("> ")];
    spans.extend(highlight_expression(
        &visible.concat(),
        Style::default(),
        app.session.variables(),
    ));
    frame.render_widget(Paragraph::new(Line::from(spans)), inner_area);

    let before_cursor = app.cursor_position.saturating_sub(app.input_scroll);
    let prefix_width: usize = visible.iter().take(before_cursor).map(|g| g.width()).sum();
    frame.set_cursor(inner_area.x + 2 + prefix_width as u16, inner_area.y);

    let indicator = Style::default().fg(Color::DarkGray);
    if app.input_scroll > 0 {
        frame.render_widget(
            Paragraph::new("<").style(indicator),
            Rect::new(inner_area.x, inner_area.y, 1, 1),
        );
    }
    if total > app.input_scroll + visible_width {
        frame.render_widget(
            Paragraph::new(">").style(indicator),
            Rect::new(inner_area.x + inner_area.width - 1, inner_area.y, 1, 1),
        );
    }
}
