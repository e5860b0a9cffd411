//! UI module - terminal front-end using ratatui

pub mod animations;
pub mod app;
mod render;
pub mod theme;

pub use animations::Spinner;
pub use app::App;
pub use theme::Theme;
