pub mod allowlist;
pub mod exec;

pub use allowlist::{CommandSpec, CommandTable};
pub use exec::CommandGate;
