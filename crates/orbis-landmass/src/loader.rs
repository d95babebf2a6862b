//! Background loading of the world map.
//!
//! Decoding a large equirectangular JPEG takes long enough to stall a frame,
//! so it runs on a dedicated worker and the result is collected by polling
//! from the main thread.

use std::path::PathBuf;

use crossbeam_channel::{Receiver, TryRecvError, bounded};

use crate::map_image::{MapImage, MapImageError};

/// Outcome of polling a [`MapLoad`].
#[derive(Debug)]
pub enum LoadState {
    /// The worker is still decoding.
    Pending,
    /// The load finished; the result is handed out exactly once.
    Ready(Result<MapImage, MapImageError>),
    /// The result was already taken by an earlier poll.
    Consumed,
}

/// One-shot handle to a map image being decoded on a worker thread.
pub struct MapLoad {
    path: PathBuf,
    receiver: Receiver<Result<MapImage, MapImageError>>,
    consumed: bool,
}

impl MapLoad {
    /// Start decoding `path` on a new worker thread.
    pub fn spawn(path: impl Into<PathBuf>) -> Result<Self, MapImageError> {
        let path = path.into();
        let (sender, receiver) = bounded(1);
        let worker_path = path.clone();

        std::thread::Builder::new()
            .name("map-loader".into())
            .spawn(move || {
                let start = std::time::Instant::now();
                let result = MapImage::open(&worker_path);
                tracing::debug!(
                    path = %worker_path.display(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    ok = result.is_ok(),
                    "map decode finished"
                );
                // The handle may have been dropped; nobody is left to notify.
                let _ = sender.send(result);
            })
            .map_err(|source| MapImageError::Io {
                path: path.clone(),
                source,
            })?;

        Ok(Self {
            path,
            receiver,
            consumed: false,
        })
    }

    /// A handle that is already resolved with `result`.
    pub fn ready(path: impl Into<PathBuf>, result: Result<MapImage, MapImageError>) -> Self {
        let (sender, receiver) = bounded(1);
        let _ = sender.send(result);
        Self {
            path: path.into(),
            receiver,
            consumed: false,
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    /// Non-blocking check for the decoded map.
    pub fn poll(&mut self) -> LoadState {
        if self.consumed {
            return LoadState::Consumed;
        }
        match self.receiver.try_recv() {
            Ok(result) => {
                self.consumed = true;
                LoadState::Ready(result)
            }
            Err(TryRecvError::Empty) => LoadState::Pending,
            Err(TryRecvError::Disconnected) => {
                self.consumed = true;
                LoadState::Ready(Err(MapImageError::WorkerGone))
            }
        }
    }

    /// Block until the worker delivers its result.
    pub fn wait(mut self) -> Result<MapImage, MapImageError> {
        if self.consumed {
            return Err(MapImageError::WorkerGone);
        }
        self.consumed = true;
        self.receiver
            .recv()
            .unwrap_or(Err(MapImageError::WorkerGone))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_handle_yields_once() {
        let map = MapImage::from_fn(2, 1, |_, _| [0, 0, 0, 255]).unwrap();
        let mut load = MapLoad::ready("inline", Ok(map.clone()));
        match load.poll() {
            LoadState::Ready(Ok(got)) => assert_eq!(got, map),
            other => panic!("expected a ready map, got {other:?}"),
        }
        assert!(matches!(load.poll(), LoadState::Consumed));
        assert!(load.is_consumed());
    }

    #[test]
    fn test_missing_file_resolves_to_error() {
        let dir = tempfile::tempdir().unwrap();
        let load = MapLoad::spawn(dir.path().join("absent.jpg")).unwrap();
        assert!(matches!(load.wait(), Err(MapImageError::Io { .. })));
    }
}
