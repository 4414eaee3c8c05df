//! Ratatui front-end: a menu bar over the student table, modal dialogs for
//! each CRUD operation, and a status bar.

mod app;
mod forms;
mod helpers;
mod menu;
mod screens;
mod terminal;

pub use app::{App, WINDOW_TITLE};
pub use terminal::run_app;
