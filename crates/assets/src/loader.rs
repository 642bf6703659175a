//! Background model loader.
//!
//! File reads and OBJ parsing happen on a worker thread. The frame loop
//! drains finished work with [`AssetLoader::poll`] and applies it itself, so
//! scene state is only ever touched from the main thread.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::Duration;

use crate::model::ModelData;
use crate::{AssetError, AssetId};

const READ_CHUNK: usize = 64 * 1024;

/// Request sent from the main thread to the worker.
enum LoadRequest {
    Model { slot: usize, path: String },
    Shutdown,
}

/// Progress and results reported back by the worker.
#[derive(Debug)]
pub enum LoadEvent {
    /// Bytes of `path` read so far.
    Progress {
        slot: usize,
        path: String,
        loaded: u64,
        total: u64,
    },
    Loaded {
        slot: usize,
        id: AssetId,
        model: Arc<ModelData>,
    },
    Failed {
        slot: usize,
        path: String,
        error: AssetError,
    },
}

pub struct AssetLoader {
    request_tx: mpsc::Sender<LoadRequest>,
    event_rx: mpsc::Receiver<LoadEvent>,
    thread: Option<JoinHandle<()>>,
}

impl AssetLoader {
    /// Start the worker. Paths passed to [`AssetLoader::load_model`] are
    /// resolved against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, AssetError> {
        let root = root.into();
        let (request_tx, request_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let thread = std::thread::Builder::new()
            .name("asset-loader".into())
            .spawn(move || worker(&root, request_rx, event_tx))
            .map_err(|source| AssetError::Io {
                path: "asset-loader thread".into(),
                source,
            })?;
        Ok(Self {
            request_tx,
            event_rx,
            thread: Some(thread),
        })
    }

    /// Queue a model load. The result arrives later through `poll`.
    pub fn load_model(&self, slot: usize, path: &str) -> Result<(), AssetError> {
        self.request_tx
            .send(LoadRequest::Model {
                slot,
                path: path.to_string(),
            })
            .map_err(|_| AssetError::LoaderClosed)
    }

    /// Everything the worker has reported since the last call. Never blocks.
    pub fn poll(&self) -> Vec<LoadEvent> {
        self.event_rx.try_iter().collect()
    }

    /// Block for the next event, up to `timeout`.
    pub fn wait(&self, timeout: Duration) -> Option<LoadEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

impl Drop for AssetLoader {
    fn drop(&mut self) {
        let _ = self.request_tx.send(LoadRequest::Shutdown);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::error!("asset loader thread panicked");
            }
        }
    }
}

fn worker(root: &Path, requests: mpsc::Receiver<LoadRequest>, events: mpsc::Sender<LoadEvent>) {
    while let Ok(request) = requests.recv() {
        let (slot, path) = match request {
            LoadRequest::Model { slot, path } => (slot, path),
            LoadRequest::Shutdown => break,
        };
        let event = match load(root, slot, &path, &events) {
            Ok((id, model)) => LoadEvent::Loaded {
                slot,
                id,
                model: Arc::new(model),
            },
            Err(error) => LoadEvent::Failed { slot, path, error },
        };
        if events.send(event).is_err() {
            break;
        }
    }
    tracing::debug!("asset loader stopped");
}

fn load(
    root: &Path,
    slot: usize,
    path: &str,
    events: &mpsc::Sender<LoadEvent>,
) -> Result<(AssetId, ModelData), AssetError> {
    let io_err = |source| AssetError::Io {
        path: path.to_string(),
        source,
    };
    let mut file = std::fs::File::open(root.join(path)).map_err(io_err)?;
    let total = file.metadata().map_err(io_err)?.len();

    let mut bytes = Vec::with_capacity(total as usize);
    let mut chunk = vec![0u8; READ_CHUNK];
    loop {
        let n = file.read(&mut chunk).map_err(io_err)?;
        if n == 0 {
            break;
        }
        bytes.extend_from_slice(&chunk[..n]);
        let _ = events.send(LoadEvent::Progress {
            slot,
            path: path.to_string(),
            loaded: bytes.len() as u64,
            total,
        });
    }

    let id = AssetId::from_bytes(&bytes);
    let model = ModelData::from_obj_bytes(path, &bytes)?;
    Ok((id, model))
}
