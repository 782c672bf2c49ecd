//! CLI module for the imgly-mask-editor library
//!
//! This module is only available when the "cli" feature is enabled.

mod config;
#[path = "main.rs"]
mod main_impl;
mod script;

pub use main_impl::{main, run, Cli, CliOutputFormat};
pub use script::{ReplaySummary, ScriptedStroke, StrokeScript};
