//! Terminal front-end for the battle client.
//!
//! Renders the battle with ratatui, maps digit keys onto the selection state
//! machine, and implements the stage capabilities (sprite moods, floating
//! text, banner, sound cues) on a terminal surface.
pub mod app;
pub mod stage;
pub mod terminal;
pub mod ui;
pub mod widgets;

pub use app::CliApp;
pub use stage::TuiStage;
