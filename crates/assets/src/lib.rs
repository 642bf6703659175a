//! Asset pipeline for sculpture models: OBJ import, content-addressed
//! registry, and a background loader.
//!
//! Models are identified by the hash of their source bytes. The renderer
//! consumes them by id, never by path.
//!
//! # Invariants
//! - A failed load never stops the frame loop; it surfaces as a
//!   [`LoadEvent::Failed`] for the caller to log.
//! - Only the thread that owns the [`AssetStore`] mutates it.

mod loader;
mod model;

pub use loader::{AssetLoader, LoadEvent};
pub use model::ModelData;

use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Content-addressed asset ID computed from the asset's source bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetId(pub u64);

impl AssetId {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let digest = Sha256::digest(bytes);
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest[..8]);
        Self(u64::from_le_bytes(head))
    }
}

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("OBJ parse error in {path}: {source}")]
    Obj {
        path: String,
        #[source]
        source: tobj::LoadError,
    },
    #[error("{path} contains no triangles")]
    Empty { path: String },
    #[error("asset loader has shut down")]
    LoaderClosed,
}

/// Registry of loaded models keyed by content hash.
#[derive(Debug, Clone, Default)]
pub struct AssetStore {
    models: BTreeMap<AssetId, Arc<ModelData>>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a model. Returns `false` if the id was already present, in
    /// which case the stored model is kept.
    pub fn register_model(&mut self, id: AssetId, model: Arc<ModelData>) -> bool {
        if self.models.contains_key(&id) {
            return false;
        }
        self.models.insert(id, model);
        true
    }

    pub fn get_model(&self, id: AssetId) -> Option<&Arc<ModelData>> {
        self.models.get(&id)
    }

    pub fn models(&self) -> impl Iterator<Item = (AssetId, &Arc<ModelData>)> {
        self.models.iter().map(|(id, m)| (*id, m))
    }

    /// Number of registered assets.
    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

pub fn crate_info() -> &'static str {
    "museum-assets v0.1.0"
}
