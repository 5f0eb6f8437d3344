// Versemark application library exports

pub mod app;
pub mod commands;
pub mod config;
pub mod file_manager;
pub mod reader;
pub mod status_manager;
pub mod text_width;
pub mod ui;

pub use app::{App, Mode};
pub use commands::{Cli, Command, CommandProcessor};
pub use config::Config;
pub use reader::{render_page, Page, ReaderStyle};
