//! tiendactl terminal UI: one tab per store table
//!
//! - Normal/Edit/Filter mode switching (vim-style)
//! - Row selection loads the record into the form
//! - Notices from the data layer pop up as modals

pub mod app;
pub mod event;
pub mod mode;
pub mod terminal;
pub mod ui;

pub use app::App;
pub use mode::Mode;
pub use terminal::run;
