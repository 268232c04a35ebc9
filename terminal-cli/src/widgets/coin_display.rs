use pcoin_types::Coins;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;

pub const COIN_GLYPH: &str = "◉";
pub const CURRENCY: &str = "P COIN";

/// `1234567.5` -> `1,234,567.50`
pub fn format_coins(amount: Coins) -> String {
    let whole = amount.whole().to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{grouped}.{:02}", amount.fraction())
}

/// Balance or amount badge, e.g. `◉ 1,250.00 P COIN`.
pub struct CoinDisplay {
    amount: Option<Coins>,
}

impl CoinDisplay {
    pub fn new(amount: Coins) -> Self {
        Self {
            amount: Some(amount),
        }
    }

    /// Placeholder shown while the balance is unknown.
    pub fn unknown() -> Self {
        Self { amount: None }
    }

    pub fn line(&self) -> Line<'static> {
        let value = match self.amount {
            Some(amount) => format_coins(amount),
            None => "---".to_string(),
        };
        Line::from(vec![
            Span::styled(
                format!("{COIN_GLYPH} "),
                Style::default().fg(Color::Yellow),
            ),
            Span::styled(
                value,
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" {CURRENCY}"), Style::default().fg(Color::Gray)),
        ])
    }
}

impl Widget for CoinDisplay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.line().render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(format_coins(Coins::from_hundredths(0)), "0.00");
        assert_eq!(format_coins(Coins::from_hundredths(99_950)), "999.50");
        assert_eq!(format_coins(Coins::from_hundredths(100_000)), "1,000.00");
        assert_eq!(format_coins(Coins::from_hundredths(123_456_789)), "1,234,567.89");
    }

    #[test]
    fn line_text() {
        let text = CoinDisplay::new(Coins::from_hundredths(125_000)).line().to_string();
        assert_eq!(text, "◉ 1,250.00 P COIN");
        let text = CoinDisplay::unknown().line().to_string();
        assert_eq!(text, "◉ --- P COIN");
    }
}
