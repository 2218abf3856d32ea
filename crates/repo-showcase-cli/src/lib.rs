//! repo-showcase command-line front end.

pub mod config;
pub mod render;

pub use config::{build_config, build_config_with, Overrides};
pub use render::{render_json, render_text, ShowcaseReport};
