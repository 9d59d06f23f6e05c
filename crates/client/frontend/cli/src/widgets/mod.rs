//! Battle screen widgets.
pub mod log;
pub mod menu;
pub mod party;
