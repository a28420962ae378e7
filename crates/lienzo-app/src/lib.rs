//! Lienzo Application
//!
//! Command-line shell that drives an editor session: imports files, lists the
//! resulting layers and exports the composition.

mod app;

pub use app::{App, AppConfig, AppError, CONFIG_ENV, load_editor_config};
