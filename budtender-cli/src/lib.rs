//! # budtender-cli
//!
//! Argument parsing and product import for the `budtender` binary.

pub mod cli;
pub mod import;

pub use cli::{Cli, Commands};
pub use import::{parse_products, read_products};
