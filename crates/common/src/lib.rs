//! Shared types for the museum walkthrough crates.

mod types;

pub use types::{NodeId, Transform};
