//! Service layer
//!
//! Services talk to the controller and to the results sink. Each takes its
//! collaborators as trait objects so they can be exercised in tests without
//! a controller.

mod reporter;
mod submission;

// Re-export traits
pub use reporter::ResultReporter;

// Re-export implementations
pub use reporter::TsvReporter;
pub use submission::{SubmissionClient, SubmitError};
