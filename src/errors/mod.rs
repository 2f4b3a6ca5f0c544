pub mod types;
pub mod classification;

pub use types::VulnsnipError;
pub use classification::ErrorClassification;
