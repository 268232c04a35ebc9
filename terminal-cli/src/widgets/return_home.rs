use super::MetallicButton;

pub const RETURN_HOME_LABEL: &str = "⌂ Home (Esc)";

/// The "back to the lobby" button shown on every page but the landing page.
pub fn return_home_button(focused: bool) -> MetallicButton<'static> {
    MetallicButton::new(RETURN_HOME_LABEL).focused(focused)
}
