//! Command-line surface for the sticky notes store.

pub mod args;
pub mod handlers;

pub use args::Cli;
