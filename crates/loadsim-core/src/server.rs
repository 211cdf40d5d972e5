//! Server — a single worker with an idle/busy state and a countdown.

use serde::{Deserialize, Serialize};

use crate::request::{Request, RequestId};

/// Stable server identifier, never reused within a pool.
pub type ServerId = u64;

/// Whether a server can take new work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerState {
    Idle,
    Busy,
}

/// A worker slot in the [`ServerPool`](crate::ServerPool).
///
/// Servers are plain values and can be copied for inspection, but only the
/// pool mutates them. Processing a request copies its duration into
/// `remaining_time`; the request itself is not retained beyond its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Server {
    id: ServerId,
    state: ServerState,
    remaining_time: u32,
    request: Option<RequestId>,
}

impl Server {
    /// Create an idle server.
    pub fn new(id: ServerId) -> Self {
        Self {
            id,
            state: ServerState::Idle,
            remaining_time: 0,
            request: None,
        }
    }

    pub fn id(&self) -> ServerId {
        self.id
    }

    pub fn state(&self) -> ServerState {
        self.state
    }

    /// Ticks left on the current request. Always 0 when idle.
    pub fn remaining_time(&self) -> u32 {
        self.remaining_time
    }

    /// Id of the request being processed, if busy.
    pub fn current_request(&self) -> Option<RequestId> {
        self.request
    }

    pub fn is_idle(&self) -> bool {
        self.state == ServerState::Idle
    }

    pub fn is_busy(&self) -> bool {
        self.state == ServerState::Busy
    }

    /// Start processing `request`.
    pub(crate) fn assign(&mut self, request: &Request) {
        debug_assert!(self.is_idle(), "assigning to busy server {}", self.id);
        self.state = ServerState::Busy;
        self.remaining_time = request.processing_time();
        self.request = Some(request.id());
    }

    /// Age the server by one tick.
    ///
    /// Returns `true` if the server finished its request on this call. A
    /// busy server whose counter reaches 0 goes idle in the same call,
    /// including one that was assigned a zero-length request.
    pub(crate) fn advance(&mut self) -> bool {
        if self.is_idle() {
            return false;
        }
        self.remaining_time = self.remaining_time.saturating_sub(1);
        if self.remaining_time == 0 {
            self.state = ServerState::Idle;
            self.request = None;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_server_is_idle() {
        let s = Server::new(3);
        assert_eq!(s.id(), 3);
        assert!(s.is_idle());
        assert_eq!(s.remaining_time(), 0);
        assert_eq!(s.current_request(), None);
    }

    #[test]
    fn assign_copies_duration() {
        let mut s = Server::new(0);
        s.assign(&Request::with_duration(9, 4));
        assert!(s.is_busy());
        assert_eq!(s.remaining_time(), 4);
        assert_eq!(s.current_request(), Some(9));
    }

    #[test]
    fn advance_counts_down_then_goes_idle() {
        let mut s = Server::new(0);
        s.assign(&Request::with_duration(1, 2));

        assert!(!s.advance());
        assert_eq!(s.remaining_time(), 1);
        assert!(s.is_busy());

        assert!(s.advance());
        assert_eq!(s.remaining_time(), 0);
        assert!(s.is_idle());
        assert_eq!(s.current_request(), None);
    }

    #[test]
    fn zero_length_request_finishes_on_first_advance() {
        let mut s = Server::new(0);
        s.assign(&Request::with_duration(1, 0));
        assert!(s.is_busy());
        assert!(s.advance());
        assert!(s.is_idle());
    }

    #[test]
    fn advance_on_idle_is_noop() {
        let mut s = Server::new(0);
        assert!(!s.advance());
        assert!(s.is_idle());
        assert_eq!(s.remaining_time(), 0);
    }
}
