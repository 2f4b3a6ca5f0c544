pub mod catalog;
pub mod hints;
pub mod loader;
pub mod service;
pub mod snippet;
pub mod verdict;

pub use catalog::ChallengeCatalog;
pub use hints::{HintLookup, HintStore};
pub use service::{Submission, VerdictOutcome, VerificationService};
pub use snippet::SnippetRecord;
pub use verdict::evaluate;
