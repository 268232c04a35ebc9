use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Widget};

/// Bordered push button with a brushed-steel look; gold when focused.
pub struct MetallicButton<'a> {
    label: &'a str,
    focused: bool,
    disabled: bool,
}

impl<'a> MetallicButton<'a> {
    pub fn new(label: &'a str) -> Self {
        Self {
            label,
            focused: false,
            disabled: false,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    fn styles(&self) -> (Style, Style) {
        if self.disabled {
            let dim = Style::default().fg(Color::DarkGray);
            return (dim, dim);
        }
        if self.focused {
            (
                Style::default().fg(Color::Yellow),
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            (
                Style::default().fg(Color::Gray),
                Style::default().fg(Color::White).bg(Color::DarkGray),
            )
        }
    }
}

impl Widget for MetallicButton<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (border, face) = self.styles();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(if self.focused {
                BorderType::Double
            } else {
                BorderType::Rounded
            })
            .border_style(border);
        let inner = block.inner(area);
        block.render(area, buf);
        buf.set_style(inner, face);
        Paragraph::new(self.label)
            .alignment(Alignment::Center)
            .style(face)
            .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::testing::buffer_text;

    #[test]
    fn renders_label_and_focus_border() {
        let area = Rect::new(0, 0, 12, 3);
        let mut buf = Buffer::empty(area);
        MetallicButton::new("Play").focused(true).render(area, &mut buf);
        let text = buffer_text(&buf);
        assert!(text.contains("Play"));
        assert!(text.starts_with('╔'));
        assert_eq!(buf[(5, 1)].bg, Color::Yellow);

        let mut buf = Buffer::empty(area);
        MetallicButton::new("Play").render(area, &mut buf);
        assert!(buffer_text(&buf).starts_with('╭'));
    }
}
