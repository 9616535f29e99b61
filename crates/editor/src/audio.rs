//! Transient audio resources with scoped acquisition.
//!
//! Recorded or uploaded audio lives behind a transient object URL until the
//! entry is submitted. Each URL is tracked by a [`HandleRegistry`] and
//! revoked exactly once, when its [`AudioHandle`] drops -- superseding an
//! attachment releases the prior handle deterministically, and a recording
//! session releases the capture device on both the commit and the abort
//! path.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

/// Tracks live transient resources (object URLs, capture devices) so leaks
/// and double revocations are observable.
#[derive(Debug, Default)]
pub struct HandleRegistry {
    live: Mutex<HashSet<Uuid>>,
}

impl HandleRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(HandleRegistry::default())
    }

    /// Number of currently live handles.
    pub fn live_count(&self) -> usize {
        self.live.lock().expect("registry poisoned").len()
    }

    pub fn is_live(&self, id: Uuid) -> bool {
        self.live.lock().expect("registry poisoned").contains(&id)
    }

    fn acquire(self: &Arc<Self>) -> Uuid {
        let id = Uuid::new_v4();
        self.live.lock().expect("registry poisoned").insert(id);
        id
    }

    fn release(&self, id: Uuid) {
        self.live.lock().expect("registry poisoned").remove(&id);
    }
}

/// Ownership of one transient audio resource. Dropping the handle revokes
/// the underlying object URL.
#[derive(Debug)]
pub struct AudioHandle {
    id: Uuid,
    object_url: String,
    registry: Arc<HandleRegistry>,
}

impl AudioHandle {
    /// Register a new transient resource, e.g. an uploaded file's object URL.
    pub fn acquire(registry: &Arc<HandleRegistry>, object_url: impl Into<String>) -> Self {
        AudioHandle {
            id: registry.acquire(),
            object_url: object_url.into(),
            registry: Arc::clone(registry),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn object_url(&self) -> &str {
        &self.object_url
    }
}

impl Drop for AudioHandle {
    fn drop(&mut self) {
        self.registry.release(self.id);
    }
}

/// Abstraction over the microphone capture device. The real client binds
/// this to the platform media API; tests use a scripted fake.
pub trait CaptureDevice {
    /// Begin capturing. Fails when the device is denied or busy.
    fn start(&mut self) -> Result<(), CaptureError>;
    /// Stop capturing and hand back the recorded bytes.
    fn stop(&mut self) -> Result<Vec<u8>, CaptureError>;
    /// Release the device. Must be safe to call after a failed start.
    fn close(&mut self);
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CaptureError {
    #[error("Capture device unavailable: {0}")]
    Unavailable(String),

    #[error("Recording failed: {0}")]
    Failed(String),
}

/// A start/stop recording gesture bound to a capture device.
///
/// The session produces exactly one committed handle or none; the device is
/// closed on every exit path (commit, abort, drop).
#[derive(Debug)]
pub struct RecordingSession<D: CaptureDevice> {
    device: Option<D>,
    registry: Arc<HandleRegistry>,
}

impl<D: CaptureDevice> RecordingSession<D> {
    /// Acquire the capture device and start recording. On failure the device
    /// is released and prior state is left unchanged.
    pub fn start(mut device: D, registry: &Arc<HandleRegistry>) -> Result<Self, CaptureError> {
        if let Err(e) = device.start() {
            device.close();
            return Err(e);
        }
        Ok(RecordingSession { device: Some(device), registry: Arc::clone(registry) })
    }

    /// Stop recording and commit the captured audio as one transient handle.
    pub fn stop(mut self) -> Result<(AudioHandle, Vec<u8>), CaptureError> {
        let mut device = self.device.take().expect("session already finished");
        let result = device.stop();
        device.close();
        let bytes = result?;
        let handle = AudioHandle::acquire(&self.registry, format!("blob:recording-{}", Uuid::new_v4()));
        Ok((handle, bytes))
    }

    /// Abandon the recording without committing anything.
    pub fn abort(mut self) {
        if let Some(mut device) = self.device.take() {
            device.close();
        }
    }
}

impl<D: CaptureDevice> Drop for RecordingSession<D> {
    fn drop(&mut self) {
        if let Some(mut device) = self.device.take() {
            device.close();
        }
    }
}
