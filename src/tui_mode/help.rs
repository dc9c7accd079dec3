use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::app::App;

fn heading(text: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        text,
        Style::default().fg(Color::Cyan).add_modifier(Modifier::UNDERLINED),
    ))
}

pub fn render_help(frame: &mut Frame, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" RPN Calc Help ")
        .title_alignment(Alignment::Center)
        .style(Style::default().bg(Color::Black));

    let help_text = vec![
        Line::from(Span::styled(
            "RPN Calc - expressions through postfix notation",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        heading("Operators (highest binds first):"),
        Line::from("  ^     : Power, groups right  (2 ^ 3 ^ 2 = 512)"),
        Line::from("  * /   : Multiply, divide      (6 / 3 = 2)"),
        Line::from("  + -   : Add, subtract         (3 - 2 = 1)"),
        Line::from("  ( )   : Grouping              ((2 + 3) * 4 = 20)"),
        Line::from("  There is no unary minus: write 0 - x"),
        Line::from(""),
        heading("Functions (radians):"),
        Line::from("  sin(x)  cos(x)  sqrt(x)"),
        Line::from(""),
        heading("Variables:"),
        Line::from("  x = 2        : Bind a variable (the right side may be an expression)"),
        Line::from("  r = sqrt(x)  : Use earlier bindings"),
        Line::from("  Unbound names evaluate as 0 and are shown in red"),
        Line::from(""),
        heading("Commands:"),
        Line::from("  details <expression> : Show RPN, each stack step and timing"),
        Line::from("  vars  : List bound variables"),
        Line::from("  clear : Clear history and variables"),
        Line::from("  help  : Show this help screen"),
        Line::from("  quit  : Exit the calculator"),
        Line::from(""),
        heading("Navigation:"),
        Line::from("  ← →       : Move cursor, Ctrl for words"),
        Line::from("  Home/End  : Start/end of line"),
        Line::from("  ↑ ↓       : Recall history"),
        Line::from("  PgUp/PgDn : Page through history"),
        Line::from("  Ctrl+U    : Clear input"),
        Line::from("  Esc       : Close this screen"),
    ];

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false })
        .scroll((app.help_scroll as u16, 0));

    frame.render_widget(Clear, frame.size());
    frame.render_widget(paragraph, frame.size());
}
