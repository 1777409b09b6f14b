//! Subcommand implementations

pub mod serve;
pub mod sign;
pub mod verify;
