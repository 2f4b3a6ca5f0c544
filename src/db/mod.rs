pub mod attempts;
pub mod connection;
pub mod schema;

pub use attempts::AttemptRow;
pub use connection::Database;
