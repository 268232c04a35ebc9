//! Small presentational pieces shared by the pages.

pub mod coin_display;
pub mod metallic_button;
pub mod return_home;
pub mod spinner;

pub use coin_display::CoinDisplay;
pub use metallic_button::MetallicButton;
pub use return_home::return_home_button;
pub use spinner::Spinner;
