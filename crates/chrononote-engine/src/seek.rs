//! Outward seek notification for the external player collaborator.

use serde::Serialize;

/// One-shot seek payload: playback position in seconds
///
/// Delivered once per activation of an anchored line; no response is
/// awaited.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeekRequest {
    pub time: f64,
}

impl SeekRequest {
    pub fn from_millis(time_ms: u64) -> Self {
        Self {
            time: time_ms as f64 / 1000.0,
        }
    }
}

/// Consumer of seek requests (the player side of the boundary)
pub trait SeekSink {
    fn seek(&mut self, request: SeekRequest);
}

impl<F: FnMut(SeekRequest)> SeekSink for F {
    fn seek(&mut self, request: SeekRequest) {
        self(request)
    }
}
