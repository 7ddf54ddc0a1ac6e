//! Fire-and-forget model loading.
//!
//! Rooms request their decorative models when built. The host resolves each
//! request whenever the asset arrives and hands the result back through
//! `FloorEngine::resolve_model`; by then the room may already be gone.

use liminal_logic::geometry::Vec3;
use liminal_logic::zone::RoomId;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Identifies the model slot a load result belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelTicket {
    pub room: RoomId,
    pub slot: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRequest {
    pub ticket: ModelTicket,
    pub path: String,
}

/// What a successful load reports back.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadedModel {
    /// Bounding box size at scale 1.
    pub size: Vec3,
    /// Offset of the bounding box centre from the model origin.
    pub center_offset: Vec3,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoadError {
    #[error("model not found: {0}")]
    NotFound(String),
    #[error("failed to parse {path}: {reason}")]
    Parse { path: String, reason: String },
}

pub trait ModelLoader {
    fn request(&mut self, request: ModelRequest);
}

/// Loader that queues requests for the caller to resolve later.
#[derive(Debug, Clone, Default)]
pub struct QueuedModelLoader {
    queue: VecDeque<ModelRequest>,
}

impl QueuedModelLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn pending(&self) -> impl Iterator<Item = &ModelRequest> {
        self.queue.iter()
    }

    pub fn pop(&mut self) -> Option<ModelRequest> {
        self.queue.pop_front()
    }

    pub fn drain(&mut self) -> Vec<ModelRequest> {
        self.queue.drain(..).collect()
    }
}

impl ModelLoader for QueuedModelLoader {
    fn request(&mut self, request: ModelRequest) {
        log::debug!("queued model {} for {}", request.path, request.ticket.room);
        self.queue.push_back(request);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_come_out_in_order() {
        let mut loader = QueuedModelLoader::new();
        for slot in 0..3 {
            loader.request(ModelRequest {
                ticket: ModelTicket {
                    room: RoomId(1),
                    slot,
                },
                path: format!("models/{slot}.glb"),
            });
        }
        assert_eq!(loader.len(), 3);
        assert_eq!(loader.pop().unwrap().ticket.slot, 0);
        let rest = loader.drain();
        assert_eq!(rest.len(), 2);
        assert!(loader.is_empty());
    }

    #[test]
    fn load_error_messages() {
        let err = LoadError::NotFound("models/x.glb".into());
        assert_eq!(err.to_string(), "model not found: models/x.glb");
    }
}
