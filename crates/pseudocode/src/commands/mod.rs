//! Subcommands of the pseudocode CLI.

pub mod languages;
pub mod translate;
