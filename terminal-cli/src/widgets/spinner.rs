use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;

const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Loading spinner; the frame comes from the shell's tick counter.
pub struct Spinner<'a> {
    tick: u64,
    label: &'a str,
}

impl<'a> Spinner<'a> {
    pub fn new(tick: u64) -> Self {
        Self {
            tick,
            label: "Loading…",
        }
    }

    pub fn label(mut self, label: &'a str) -> Self {
        self.label = label;
        self
    }

    pub fn frame(tick: u64) -> &'static str {
        FRAMES[(tick % FRAMES.len() as u64) as usize]
    }
}

impl Widget for Spinner<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Line::from(vec![
            Span::styled(Self::frame(self.tick), Style::default().fg(Color::Cyan)),
            Span::raw(" "),
            Span::styled(self.label, Style::default().fg(Color::Gray)),
        ])
        .render(area, buf);
    }
}
