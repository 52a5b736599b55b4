//! Message display component

use chrono::{DateTime, Local};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};
use std::cell::Cell;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Normal,
    Info,
    Error,
}

/// A single line in the message display
#[derive(Debug, Clone)]
pub struct DisplayEntry {
    pub text: String,
    pub kind: EntryKind,
    pub at: DateTime<Local>,
}

/// Ordered, bottom-anchored list of display entries
#[derive(Debug, Clone)]
pub struct MessageDisplay {
    title: String,
    entries: VecDeque<DisplayEntry>,
    max_entries: Option<usize>,
    /// Lines scrolled back from the bottom. 0 follows new entries.
    scroll_offset: usize,
    /// Largest useful offset as of the last render.
    max_scroll: Cell<usize>,
}

impl MessageDisplay {
    pub fn new(title: impl Into<String>, max_entries: Option<usize>) -> Self {
        Self {
            title: title.into(),
            entries: VecDeque::new(),
            max_entries,
            scroll_offset: 0,
            max_scroll: Cell::new(0),
        }
    }

    /// Append an entry and jump back to the bottom
    pub fn push(&mut self, text: impl Into<String>, kind: EntryKind) {
        self.entries.push_back(DisplayEntry {
            text: text.into(),
            kind,
            at: Local::now(),
        });

        if let Some(max) = self.max_entries {
            while self.entries.len() > max {
                self.entries.pop_front();
            }
        }

        self.scroll_to_bottom();
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.scroll_offset = 0;
    }

    pub fn entries(&self) -> impl Iterator<Item = &DisplayEntry> {
        self.entries.iter()
    }

    /// Entry texts in display order
    pub fn texts(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.text.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Scroll towards older entries, stopping at the top of the last render.
    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll_offset = self
            .scroll_offset
            .saturating_add(lines)
            .min(self.max_scroll.get());
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = 0;
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    fn entry_style(kind: EntryKind) -> Style {
        match kind {
            EntryKind::Normal => Style::default(),
            EntryKind::Info => Style::default().add_modifier(Modifier::ITALIC),
            EntryKind::Error => Style::default().fg(Color::Red),
        }
    }

    fn render_entry(entry: &DisplayEntry, width: usize) -> Vec<Line<'static>> {
        let stamp = entry.at.format("%H:%M ").to_string();
        let indent = " ".repeat(stamp.chars().count());
        let style = Self::entry_style(entry.kind);

        wrap_text(&entry.text, width.saturating_sub(stamp.chars().count()))
            .into_iter()
            .enumerate()
            .map(|(i, text)| {
                let prefix = if i == 0 { stamp.clone() } else { indent.clone() };
                Line::from(vec![
                    Span::styled(prefix, Style::default().fg(Color::DarkGray)),
                    Span::styled(text, style),
                ])
            })
            .collect()
    }
}

impl Widget for &MessageDisplay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = Block::default().borders(Borders::ALL).inner(area);
        let height = inner.height as usize;

        let lines: Vec<Line> = self
            .entries
            .iter()
            .flat_map(|entry| MessageDisplay::render_entry(entry, inner.width as usize))
            .collect();

        let max_scroll = lines.len().saturating_sub(height);
        self.max_scroll.set(max_scroll);
        let offset = self.scroll_offset.min(max_scroll);

        let title = if offset > 0 {
            format!("{} (scrolled)", self.title)
        } else {
            self.title.clone()
        };
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .render(area, buf);

        if self.entries.is_empty() {
            let line = Line::from(vec![Span::styled(
                "No messages yet.",
                Style::default().fg(Color::DarkGray),
            )]);
            buf.set_line(inner.x, inner.y, &line, inner.width);
            return;
        }

        let end = lines.len() - offset;
        let start = end.saturating_sub(height);

        for (i, line) in lines[start..end].iter().enumerate() {
            buf.set_line(inner.x, inner.y + i as u16, line, inner.width);
        }
    }
}

/// Wrap text to fit within the given width, splitting words longer than a line
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        while word.len() > width {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        if current_len > 0 && current_len + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current_len += word.len();
        current.extend(word);
    }

    if current_len > 0 {
        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_text(buf: &Buffer) -> String {
        let area = buf.area;
        let mut out = String::new();
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                out.push_str(buf.get(x, y).symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn push_respects_cap() {
        let mut display = MessageDisplay::new("Messages", Some(2));
        display.push("one", EntryKind::Normal);
        display.push("two", EntryKind::Normal);
        display.push("three", EntryKind::Error);
        assert_eq!(display.texts(), vec!["two", "three"]);
    }

    fn draw(display: &MessageDisplay, width: u16, height: u16) -> String {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        display.render(area, &mut buf);
        buffer_text(&buf)
    }

    fn numbered(count: usize) -> MessageDisplay {
        let mut display = MessageDisplay::new("Messages", None);
        for i in 0..count {
            display.push(format!("line {i}"), EntryKind::Normal);
        }
        display
    }

    #[test]
    fn push_resets_scroll() {
        let mut display = numbered(10);
        draw(&display, 30, 5);
        display.scroll_up(5);
        assert_eq!(display.scroll_offset(), 5);
        display.push("new", EntryKind::Normal);
        assert_eq!(display.scroll_offset(), 0);
    }

    #[test]
    fn scroll_stops_at_the_oldest_entry() {
        let mut display = numbered(10);
        draw(&display, 30, 5);

        for _ in 0..10 {
            display.scroll_up(5);
        }
        assert_eq!(display.scroll_offset(), 7);
        let top = draw(&display, 30, 5);
        assert!(top.contains("line 0") && top.contains("line 2"));
        assert!(top.contains("(scrolled)"));

        display.scroll_down(5);
        let text = draw(&display, 30, 5);
        assert!(text.contains("line 5") && text.contains("line 7"));
        assert!(!text.contains("line 4") && !text.contains("line 8"));
    }

    #[test]
    fn short_history_does_not_scroll() {
        let mut display = numbered(2);
        draw(&display, 30, 5);
        display.scroll_up(5);
        assert_eq!(display.scroll_offset(), 0);
        assert!(!draw(&display, 30, 5).contains("(scrolled)"));
    }

    #[test]
    fn wrap_breaks_on_words() {
        assert_eq!(wrap_text("hello big world", 9), vec!["hello big", "world"]);
        assert_eq!(wrap_text("", 10), vec![""]);
    }

    #[test]
    fn wrap_splits_long_words() {
        assert_eq!(wrap_text("abcdefgh ij", 3), vec!["abc", "def", "gh", "ij"]);
        assert_eq!(wrap_text("ééééé", 2), vec!["éé", "éé", "é"]);
    }

    #[test]
    fn renders_newest_at_bottom() {
        let text = draw(&numbered(10), 30, 5);

        assert!(text.contains("line 9"));
        assert!(text.contains("line 7"));
        assert!(!text.contains("line 6"));
    }

    #[test]
    fn long_entries_wrap_under_the_timestamp() {
        let mut display = MessageDisplay::new("Messages", None);
        display.push("alpha beta gamma delta", EntryKind::Normal);

        // 20 columns minus borders and the "HH:MM " stamp leaves 12 for text.
        let text = draw(&display, 20, 6);
        let rows: Vec<&str> = text.lines().collect();

        assert!(rows[1].contains("alpha beta"));
        assert!(rows[2].contains("gamma delta"));
        assert!(rows[2].starts_with("│      gamma"));
    }

    #[test]
    fn renders_placeholder_when_empty() {
        let display = MessageDisplay::new("Messages", None);
        assert!(draw(&display, 30, 4).contains("No messages yet."));
    }
}
