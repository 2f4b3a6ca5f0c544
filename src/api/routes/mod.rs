pub mod debug;
pub mod health;
pub mod snippets;
