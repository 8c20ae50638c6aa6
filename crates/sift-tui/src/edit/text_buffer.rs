//! Multi-line draft buffer for editing a message in place.
//!
//! Cursor positions are `(row, col)` in char units. The buffer always holds
//! at least one (possibly empty) line.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    lines: Vec<String>,
    row: usize,
    col: usize,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self {
            lines: vec![String::new()],
            row: 0,
            col: 0,
        }
    }
}

impl TextBuffer {
    /// Creates a buffer holding `text` with the cursor at its end.
    pub fn from_text(text: &str) -> Self {
        let mut buf = Self::default();
        buf.set_text(text);
        buf
    }

    /// Replaces the contents and moves the cursor to the end.
    pub fn set_text(&mut self, text: &str) {
        self.lines = text.split('\n').map(str::to_string).collect();
        self.row = self.lines.len() - 1;
        self.col = char_len(&self.lines[self.row]);
    }

    /// The buffer contents joined with `\n`.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub fn insert_str(&mut self, text: &str) {
        let mut parts = text.split('\n');
        if let Some(first) = parts.next() {
            let at = byte_index(&self.lines[self.row], self.col);
            self.lines[self.row].insert_str(at, first);
            self.col += char_len(first);
        }
        for part in parts {
            self.split_line();
            let at = byte_index(&self.lines[self.row], self.col);
            self.lines[self.row].insert_str(at, part);
            self.col += char_len(part);
        }
    }

    pub fn insert_char(&mut self, ch: char) {
        if ch == '\n' {
            self.split_line();
        } else {
            let at = byte_index(&self.lines[self.row], self.col);
            self.lines[self.row].insert(at, ch);
            self.col += 1;
        }
    }

    /// Breaks the current line at the cursor.
    fn split_line(&mut self) {
        let at = byte_index(&self.lines[self.row], self.col);
        let tail = self.lines[self.row].split_off(at);
        self.lines.insert(self.row + 1, tail);
        self.row += 1;
        self.col = 0;
    }

    /// Backspace.
    pub fn delete_prev_char(&mut self) {
        if self.col > 0 {
            self.col -= 1;
            self.remove_char_at_cursor();
        } else if self.row > 0 {
            let line = self.lines.remove(self.row);
            self.row -= 1;
            self.col = char_len(&self.lines[self.row]);
            self.lines[self.row].push_str(&line);
        }
    }

    /// Delete.
    pub fn delete_next_char(&mut self) {
        if self.col < char_len(&self.lines[self.row]) {
            self.remove_char_at_cursor();
        } else if self.row + 1 < self.lines.len() {
            let next = self.lines.remove(self.row + 1);
            self.lines[self.row].push_str(&next);
        }
    }

    fn remove_char_at_cursor(&mut self) {
        let line = &mut self.lines[self.row];
        let start = byte_index(line, self.col);
        let end = byte_index(line, self.col + 1);
        line.replace_range(start..end, "");
    }

    /// Deletes the word (or punctuation run, or whitespace run) left of the
    /// cursor. At the start of a line, joins with the previous line.
    pub fn delete_word_left(&mut self) {
        if self.col == 0 {
            self.delete_prev_char();
            return;
        }
        let chars: Vec<char> = self.lines[self.row].chars().collect();
        let start = segment_start(&chars, self.col);
        let line = &mut self.lines[self.row];
        let from = byte_index(line, start);
        let to = byte_index(line, self.col);
        line.replace_range(from..to, "");
        self.col = start;
    }

    /// Deletes from the start of the line to the cursor.
    pub fn delete_to_line_start(&mut self) {
        let line = &mut self.lines[self.row];
        let to = byte_index(line, self.col);
        line.replace_range(..to, "");
        self.col = 0;
    }

    /// Deletes from the cursor to the end of the line.
    pub fn delete_to_line_end(&mut self) {
        let line = &mut self.lines[self.row];
        let from = byte_index(line, self.col);
        line.truncate(from);
    }

    pub fn move_left(&mut self) {
        if self.col > 0 {
            self.col -= 1;
        } else if self.row > 0 {
            self.row -= 1;
            self.col = char_len(&self.lines[self.row]);
        }
    }

    pub fn move_right(&mut self) {
        if self.col < char_len(&self.lines[self.row]) {
            self.col += 1;
        } else if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = 0;
        }
    }

    pub fn move_up(&mut self) {
        if self.row > 0 {
            self.row -= 1;
            self.col = self.col.min(char_len(&self.lines[self.row]));
        }
    }

    pub fn move_down(&mut self) {
        if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = self.col.min(char_len(&self.lines[self.row]));
        }
    }

    pub fn move_line_start(&mut self) {
        self.col = 0;
    }

    pub fn move_line_end(&mut self) {
        self.col = char_len(&self.lines[self.row]);
    }

    pub fn move_word_left(&mut self) {
        if self.col == 0 {
            self.move_left();
            return;
        }
        let chars: Vec<char> = self.lines[self.row].chars().collect();
        self.col = segment_start(&chars, self.col);
    }

    pub fn move_word_right(&mut self) {
        let chars: Vec<char> = self.lines[self.row].chars().collect();
        if self.col >= chars.len() {
            self.move_right();
            return;
        }
        self.col = segment_end(&chars, self.col);
    }

    /// Applies an editing key. Keys that are not editing keys are ignored.
    pub fn input(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        match key.code {
            KeyCode::Char('a') if ctrl => self.move_line_start(),
            KeyCode::Char('e') if ctrl => self.move_line_end(),
            KeyCode::Char('u') if ctrl => self.delete_to_line_start(),
            KeyCode::Char('k') if ctrl => self.delete_to_line_end(),
            KeyCode::Char('w') if ctrl => self.delete_word_left(),
            KeyCode::Char(ch) if !ctrl && !alt => self.insert_char(ch),
            KeyCode::Enter => self.insert_char('\n'),
            KeyCode::Tab => self.insert_str("    "),
            KeyCode::Backspace if alt || ctrl => self.delete_word_left(),
            KeyCode::Backspace => self.delete_prev_char(),
            KeyCode::Delete => self.delete_next_char(),
            KeyCode::Left if alt || ctrl => self.move_word_left(),
            KeyCode::Right if alt || ctrl => self.move_word_right(),
            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),
            KeyCode::Up => self.move_up(),
            KeyCode::Down => self.move_down(),
            KeyCode::Home => self.move_line_start(),
            KeyCode::End => self.move_line_end(),
            _ => {}
        }
    }
}

fn char_len(line: &str) -> usize {
    line.chars().count()
}

fn byte_index(line: &str, col: usize) -> usize {
    line.char_indices().nth(col).map_or(line.len(), |(i, _)| i)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Space,
    Word,
    Punct,
}

fn class_of(c: char) -> CharClass {
    if c.is_whitespace() {
        CharClass::Space
    } else if c.is_alphanumeric() || c == '_' {
        CharClass::Word
    } else {
        CharClass::Punct
    }
}

/// Start of the same-class run ending at `idx`.
fn segment_start(chars: &[char], mut idx: usize) -> usize {
    let class = class_of(chars[idx - 1]);
    while idx > 0 && class_of(chars[idx - 1]) == class {
        idx -= 1;
    }
    idx
}

/// End of the same-class run starting at `idx`.
fn segment_end(chars: &[char], mut idx: usize) -> usize {
    let class = class_of(chars[idx]);
    while idx < chars.len() && class_of(chars[idx]) == class {
        idx += 1;
    }
    idx
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_from_text_round_trips_newlines() {
        let buf = TextBuffer::from_text("first\nsecond\n");
        assert_eq!(buf.lines(), ["first", "second", ""]);
        assert_eq!(buf.text(), "first\nsecond\n");
        assert_eq!(buf.cursor(), (2, 0));
    }

    #[test]
    fn test_typing_and_enter() {
        let mut buf = TextBuffer::default();
        for ch in "hi".chars() {
            buf.input(key(KeyCode::Char(ch)));
        }
        buf.input(key(KeyCode::Enter));
        buf.input(key(KeyCode::Char('x')));
        assert_eq!(buf.text(), "hi\nx");
    }

    #[test]
    fn test_insert_in_middle_of_multibyte_line() {
        let mut buf = TextBuffer::from_text("café bar");
        for _ in 0..4 {
            buf.move_left();
        }
        buf.insert_str("!\n");
        assert_eq!(buf.lines(), ["café!", " bar"]);
        assert_eq!(buf.cursor(), (1, 0));
    }

    #[test]
    fn test_backspace_joins_lines() {
        let mut buf = TextBuffer::from_text("ab\ncd");
        buf.move_line_start();
        buf.input(key(KeyCode::Backspace));
        assert_eq!(buf.text(), "abcd");
        assert_eq!(buf.cursor(), (0, 2));
    }

    #[test]
    fn test_delete_joins_next_line() {
        let mut buf = TextBuffer::from_text("ab\ncd");
        buf.move_up();
        buf.move_line_end();
        buf.input(key(KeyCode::Delete));
        assert_eq!(buf.text(), "abcd");
    }

    #[test]
    fn test_delete_word_left_by_segment() {
        let mut buf = TextBuffer::from_text("see src/main.rs");
        buf.input(ctrl('w'));
        assert_eq!(buf.text(), "see src/main.");
        buf.input(ctrl('w'));
        assert_eq!(buf.text(), "see src/main");
        buf.input(ctrl('w'));
        assert_eq!(buf.text(), "see src/");
    }

    #[test]
    fn test_word_motion() {
        let mut buf = TextBuffer::from_text("hello world");
        buf.input(KeyEvent::new(KeyCode::Left, KeyModifiers::ALT));
        assert_eq!(buf.cursor(), (0, 6));
        buf.input(KeyEvent::new(KeyCode::Left, KeyModifiers::ALT));
        assert_eq!(buf.cursor(), (0, 5));
        buf.move_line_start();
        buf.input(KeyEvent::new(KeyCode::Right, KeyModifiers::ALT));
        assert_eq!(buf.cursor(), (0, 5));
    }

    #[test]
    fn test_line_kill_keys() {
        let mut buf = TextBuffer::from_text("keep this");
        for _ in 0..5 {
            buf.move_left();
        }
        buf.input(ctrl('k'));
        assert_eq!(buf.text(), "keep");
        buf.input(ctrl('u'));
        assert_eq!(buf.text(), "");
    }

    #[test]
    fn test_vertical_motion_clamps_column() {
        let mut buf = TextBuffer::from_text("a\nlonger line");
        buf.move_up();
        assert_eq!(buf.cursor(), (0, 1));
        buf.move_down();
        assert_eq!(buf.cursor(), (1, 1));
    }

    #[test]
    fn test_release_events_are_ignored() {
        let mut buf = TextBuffer::default();
        let mut release = key(KeyCode::Char('x'));
        release.kind = KeyEventKind::Release;
        buf.input(release);
        assert_eq!(buf.text(), "");
    }
}
