//! Command-line interface components
//!
//! This module contains CLI-specific code for the LKG Loader application,
//! including argument parsing, command handlers, and progress display.

pub mod args;
pub mod commands;
pub mod progress;

pub use args::{CacheAction, CacheArgs, Cli, Commands, GlobalArgs, HashArgs, LoadArgs};
pub use commands::{handle_cache, handle_hash, handle_load};
pub use progress::load_spinner;
