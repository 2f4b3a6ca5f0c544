pub mod commands;
pub mod serve;
pub mod validate;
pub mod challenges;

pub use commands::{Cli, Commands};
