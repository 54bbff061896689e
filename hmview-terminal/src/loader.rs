/// Background heightmap loading
///
/// Decoding and mesh generation run on a worker thread. The finished mesh is
/// sent across as one value, so the render loop only ever swaps in a complete
/// mesh.
use crossbeam_channel::{Receiver, TryRecvError};
use hmview_core::{DecodeError, HeightField, Mesh};
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

/// Shown to the user whenever an image cannot be turned into terrain
pub const LOAD_FAILED_MESSAGE: &str = "The selected file could not be loaded as an image.";

/// Result of one background load
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded {
        path: PathBuf,
        width: usize,
        height: usize,
        mesh: Mesh,
    },
    Failed {
        path: PathBuf,
        reason: String,
    },
}

/// Decode an image file and build its terrain mesh
pub fn load_terrain(path: &Path) -> Result<(HeightField, Mesh), DecodeError> {
    let field = HeightField::open(path)?;
    let mesh = Mesh::from_heightfield(&field);
    Ok((field, mesh))
}

/// Handle to a load running on a worker thread
pub struct MeshLoader {
    receiver: Receiver<LoadOutcome>,
}

impl MeshLoader {
    pub fn spawn(path: PathBuf) -> io::Result<Self> {
        let (sender, receiver) = crossbeam_channel::bounded(1);

        thread::Builder::new()
            .name("heightmap-loader".to_string())
            .spawn(move || {
                let outcome = match load_terrain(&path) {
                    Ok((field, mesh)) => LoadOutcome::Loaded {
                        width: field.width(),
                        height: field.height(),
                        path,
                        mesh,
                    },
                    Err(e) => LoadOutcome::Failed {
                        path,
                        reason: e.to_string(),
                    },
                };
                // The app may have quit before the load finished.
                let _ = sender.send(outcome);
            })?;

        Ok(Self { receiver })
    }

    /// Non-blocking check for a finished load
    pub fn poll(&self) -> Option<LoadOutcome> {
        match self.receiver.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(LoadOutcome::Failed {
                path: PathBuf::new(),
                reason: "loader thread exited without a result".to_string(),
            }),
        }
    }

    /// Block until the load finishes or `timeout` elapses
    pub fn wait(&self, timeout: Duration) -> Option<LoadOutcome> {
        self.receiver.recv_timeout(timeout).ok()
    }
}
