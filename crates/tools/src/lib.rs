//! Developer tooling: read-only inspection of the museum state and the
//! settings file shared by the binaries.
//!
//! # Invariants
//! - Tools never mutate the museum.

mod config;
mod inspector;

pub use config::AppConfig;
pub use inspector::{BodyInfo, MuseumInspector, MuseumSummary, NodeInfo};

pub fn crate_info() -> &'static str {
    "museum-tools v0.1.0"
}
