//! Build-time generation and maintenance commands for the prompt library.

pub mod cli;
pub mod commands;
pub mod utils;
