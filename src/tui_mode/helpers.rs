use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use rpncalc::calc_engine::{Function, Operator, Variables};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Greedy word wrap by display width; words wider than `width` are split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![String::new()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in text.split_whitespace() {
        let word_width = word.width();

        if word_width > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let mut chunk = String::new();
            let mut chunk_width = 0;
            for c in word.chars() {
                let w = c.width().unwrap_or(1);
                if chunk_width + w > width && !chunk.is_empty() {
                    lines.push(std::mem::take(&mut chunk));
                    chunk_width = 0;
                }
                chunk.push(c);
                chunk_width += w;
            }
            current = chunk;
            current_width = chunk_width;
            continue;
        }

        if !current.is_empty() && current_width + 1 + word_width > width {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }
        if !current.is_empty() {
            current.push(' ');
            current_width += 1;
        }
        current.push_str(word);
        current_width += word_width;
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn word_style(word: &str, base: Style, variables: &Variables) -> Style {
    if word.starts_with(|c: char| c.is_numeric() || c == '.') {
        Style::default().fg(Color::LightGreen)
    } else if Function::from_name(word).is_some() {
        Style::default().fg(Color::LightBlue).add_modifier(Modifier::BOLD)
    } else if variables.contains_key(word) {
        Style::default().fg(Color::LightCyan)
    } else {
        // unbound: evaluates as 0
        base.fg(Color::LightRed).add_modifier(Modifier::ITALIC)
    }
}

/// Colors numbers, functions, operators and variables. Unbound variables
/// stand out since they silently read as 0.
pub fn highlight_expression(expr: &str, base: Style, variables: &Variables) -> Vec<Span<'static>> {
    let operator_style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);

    let mut spans = Vec::new();
    let mut word = String::new();

    for c in expr.chars() {
        if c.is_alphanumeric() || c == '.' {
            word.push(c);
            continue;
        }

        if !word.is_empty() {
            let style = word_style(&word, base, variables);
            spans.push(Span::styled(std::mem::take(&mut word), style));
        }

        let style = if Operator::from_char(c).is_some() {
            operator_style
        } else {
            base
        };
        spans.push(Span::styled(c.to_string(), style));
    }

    if !word.is_empty() {
        let style = word_style(&word, base, variables);
        spans.push(Span::styled(word, style));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("a bb ccc", 4), vec!["a bb", "ccc"]);
        assert_eq!(wrap_text("abcdefgh", 3), vec!["abc", "def", "gh"]);
        assert_eq!(wrap_text("", 10), Vec::<String>::new());
        assert_eq!(wrap_text("x", 0), vec![String::new()]);
    }

    #[test]
    fn test_highlight_expression() {
        let mut vars = Variables::new();
        vars.insert("x".to_string(), 1.0);
        let spans = highlight_expression("sin(x)+y*2", Style::default(), &vars);
        let texts: Vec<&str> = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(texts, vec!["sin", "(", "x", ")", "+", "y", "*", "2"]);

        assert_eq!(spans[0].style.fg, Some(Color::LightBlue));
        assert_eq!(spans[2].style.fg, Some(Color::LightCyan));
        assert_eq!(spans[5].style.fg, Some(Color::LightRed));
        assert_eq!(spans[7].style.fg, Some(Color::LightGreen));
    }
}
