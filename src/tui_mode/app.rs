use std::time::{Duration, Instant};

use rpncalc::display::split_details;
use rpncalc::session::{Entry, Session};
use unicode_segmentation::UnicodeSegmentation;

pub struct HistoryEntry {
    pub input: String,
    pub result: Result<Entry, String>,
    pub detailed_mode: bool,
    pub duration: Duration,
}

pub struct App {
    pub input: String,
    /// Cursor position in grapheme clusters.
    pub cursor_position: usize,
    pub input_scroll: usize,
    pub history: Vec<HistoryEntry>,
    pub cursor_history: usize,
    pub session: Session,
    pub details_default: bool,
    pub should_quit: bool,
    pub show_help: bool,
    pub help_scroll: usize,
    pub list_height: usize,
    pub item_start_indices: Vec<usize>,
    pub history_scroll: usize,
    pub scroll_to_bottom: bool,
    pub terminal_too_small: bool,
}

impl App {
    pub fn new(details_default: bool) -> Self {
        App {
            input: String::new(),
            cursor_position: 0,
            input_scroll: 0,
            history: Vec::new(),
            cursor_history: 0,
            session: Session::new(),
            details_default,
            should_quit: false,
            show_help: false,
            help_scroll: 0,
            list_height: 5,
            item_start_indices: Vec::new(),
            history_scroll: 0,
            scroll_to_bottom: false,
            terminal_too_small: false,
        }
    }

    pub fn input_len(&self) -> usize {
        self.input.graphemes(true).count()
    }

    fn byte_index(&self, grapheme_index: usize) -> usize {
        self.input
            .grapheme_indices(true)
            .nth(grapheme_index)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }

    pub fn insert_char(&mut self, c: char) {
        let idx = self.byte_index(self.cursor_position);
        self.input.insert(idx, c);
        // a combining mark merges into the previous grapheme
        self.cursor_position = self.input[..idx + c.len_utf8()].graphemes(true).count();
    }

    pub fn delete_before_cursor(&mut self) {
        if self.cursor_position == 0 {
            return;
        }
        self.cursor_position -= 1;
        self.delete_at_cursor();
    }

    pub fn delete_at_cursor(&mut self) {
        let start = self.byte_index(self.cursor_position);
        let end = self.byte_index(self.cursor_position + 1);
        self.input.drain(start..end);
    }

    pub fn adjust_input_scroll(&mut self, visible_width: usize) {
        let total = self.input_len();

        if self.cursor_position < self.input_scroll {
            self.input_scroll = self.cursor_position;
        } else if self.cursor_position >= self.input_scroll + visible_width {
            self.input_scroll = self.cursor_position + 1 - visible_width;
        }

        self.input_scroll = self.input_scroll.min(total.saturating_sub(visible_width));
    }

    fn reset_input(&mut self) {
        self.input.clear();
        self.cursor_position = 0;
        self.input_scroll = 0;
    }

    pub fn submit(&mut self) {
        let input = self.input.trim().to_string();
        if input.is_empty() {
            return;
        }

        match input.to_lowercase().as_str() {
            "quit" | "exit" | "q" => {
                self.should_quit = true;
                return;
            }
            "clear" | "reset" => {
                self.history.clear();
                self.session.clear();
                self.cursor_history = 0;
                self.history_scroll = 0;
                self.reset_input();
                return;
            }
            "help" => {
                self.show_help = true;
                self.reset_input();
                return;
            }
            _ => {}
        }

        let (details, expression) = split_details(&input);
        let detailed_mode = details || self.details_default;

        let start_time = Instant::now();
        let result = if expression.eq_ignore_ascii_case("vars") {
            Ok(self.session.listing())
        } else if expression.is_empty() {
            Err("Please enter a valid expression after 'details'".to_string())
        } else {
            self.session.run(expression, detailed_mode).map_err(|e| e.to_string())
        };

        self.history.push(HistoryEntry {
            input: expression.to_string(),
            result,
            detailed_mode,
            duration: start_time.elapsed(),
        });

        self.cursor_history = self.history.len().saturating_sub(1);
        self.scroll_to_bottom = true;
        self.reset_input();
    }

    pub fn move_cursor(&mut self, direction: i32) {
        match direction {
            -1 => self.cursor_position = self.cursor_position.saturating_sub(1),
            1 => self.cursor_position = (self.cursor_position + 1).min(self.input_len()),
            _ => {}
        }
    }

    pub fn move_cursor_by_words(&mut self, direction: i32) {
        let graphemes: Vec<&str> = self.input.graphemes(true).collect();
        let blank = |g: &str| g.chars().all(char::is_whitespace);
        let mut pos = self.cursor_position;

        if direction < 0 {
            while pos > 0 && blank(graphemes[pos - 1]) {
                pos -= 1;
            }
            while pos > 0 && !blank(graphemes[pos - 1]) {
                pos -= 1;
            }
        } else {
            while pos < graphemes.len() && !blank(graphemes[pos]) {
                pos += 1;
            }
            while pos < graphemes.len() && blank(graphemes[pos]) {
                pos += 1;
            }
        }
        self.cursor_position = pos;
    }

    fn recall(&mut self) {
        if let Some(entry) = self.history.get(self.cursor_history) {
            self.input = entry.input.clone();
        }
        self.cursor_position = self.input_len();
        self.input_scroll = 0;
        self.scroll_to_bottom = false;
    }

    pub fn navigate_history(&mut self, direction: i32) {
        if direction < 0 && self.cursor_history > 0 {
            self.cursor_history -= 1;
        } else if direction > 0 && self.cursor_history < self.history.len().saturating_sub(1) {
            self.cursor_history += 1;
        }
        self.recall();
    }

    pub fn scroll_history(&mut self, direction: i32) {
        let step = self.list_height.saturating_sub(1).max(1);
        self.cursor_history = if direction < 0 {
            self.cursor_history.saturating_sub(step)
        } else {
            (self.cursor_history + step).min(self.history.len().saturating_sub(1))
        };
        self.recall();
    }

    pub fn clear_input(&mut self) {
        self.reset_input();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> App {
        let mut app = App::new(false);
        for c in text.chars() {
            app.insert_char(c);
        }
        app
    }

    #[test]
    fn test_submit_assignment_and_expression() {
        let mut app = typed("x = 4");
        app.submit();
        for c in "sqrt(x) + 1".chars() {
            app.insert_char(c);
        }
        app.submit();

        assert_eq!(app.history.len(), 2);
        match &app.history[1].result {
            Ok(Entry::Evaluation(eval)) => assert_eq!(eval.value, 3.0),
            _ => panic!("expected an evaluation"),
        }
        assert!(app.input.is_empty());
        assert_eq!(app.cursor_history, 1);
    }

    #[test]
    fn test_submit_error_and_details() {
        let mut app = typed("details 2 + * 3");
        app.submit();
        let entry = &app.history[0];
        assert!(entry.detailed_mode);
        assert_eq!(entry.input, "2 + * 3");
        assert!(entry.result.as_ref().unwrap_err().contains("missing operand"));
    }

    #[test]
    fn test_clear_resets_variables() {
        let mut app = typed("y = 2");
        app.submit();
        for c in "clear".chars() {
            app.insert_char(c);
        }
        app.submit();
        assert!(app.history.is_empty());
        assert!(app.session.bindings().is_empty());
    }

    #[test]
    fn test_vars_lists_bindings() {
        let mut app = typed("vars");
        app.submit();
        assert_eq!(app.history[0].result, Ok(Entry::Listing(Vec::new())));

        for c in "x = 2".chars() {
            app.insert_char(c);
        }
        app.submit();
        for c in "VARS".chars() {
            app.insert_char(c);
        }
        app.submit();

        assert_eq!(app.history.len(), 3);
        assert_eq!(app.history[2].result, Ok(Entry::Listing(vec![("x".to_string(), 2.0)])));
        assert_eq!(app.session.bindings(), vec![("x", 2.0)]);
    }

    #[test]
    fn test_grapheme_editing() {
        let mut app = typed("e\u{301}+1");
        assert_eq!(app.input_len(), 3);
        assert_eq!(app.cursor_position, 3);

        app.move_cursor(-1);
        app.move_cursor(-1);
        app.delete_before_cursor();
        assert_eq!(app.input, "+1");
        assert_eq!(app.cursor_position, 0);
    }

    #[test]
    fn test_word_movement() {
        let mut app = typed("sin(x) + cos(y)");
        app.move_cursor_by_words(-1);
        assert_eq!(app.cursor_position, 9);
        app.move_cursor_by_words(-1);
        assert_eq!(app.cursor_position, 7);
        app.move_cursor_by_words(1);
        assert_eq!(app.cursor_position, 9);
    }

    #[test]
    fn test_history_navigation() {
        let mut app = typed("1 + 1");
        app.submit();
        for c in "2 * 2".chars() {
            app.insert_char(c);
        }
        app.submit();

        app.navigate_history(-1);
        assert_eq!(app.input, "1 + 1");
        app.navigate_history(1);
        assert_eq!(app.input, "2 * 2");
        assert_eq!(app.cursor_position, 5);
    }
}
