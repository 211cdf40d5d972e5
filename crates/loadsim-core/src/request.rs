//! Requests — the units of work admitted into the queue.

use serde::{Deserialize, Serialize};

/// Caller-assigned request identifier. Uniqueness is not enforced.
pub type RequestId = u64;

/// One unit of work. Immutable once created.
///
/// `tag_a` and `tag_b` are descriptive only and never influence
/// scheduling; they are carried so runs can be inspected and replayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Request {
    id: RequestId,
    processing_time: u32,
    tag_a: u8,
    tag_b: u8,
}

impl Request {
    pub fn new(id: RequestId, processing_time: u32, tag_a: u8, tag_b: u8) -> Self {
        Self {
            id,
            processing_time,
            tag_a,
            tag_b,
        }
    }

    /// A request with both tags zeroed.
    pub fn with_duration(id: RequestId, processing_time: u32) -> Self {
        Self::new(id, processing_time, 0, 0)
    }

    pub fn id(&self) -> RequestId {
        self.id
    }

    /// Ticks of server time this request needs.
    pub fn processing_time(&self) -> u32 {
        self.processing_time
    }

    pub fn tag_a(&self) -> u8 {
        self.tag_a
    }

    pub fn tag_b(&self) -> u8 {
        self.tag_b
    }
}
