//! Server pool — the ordered, resizable set of servers.
//!
//! The pool is the single owner of server state. Callers address servers
//! by slot index (position in pool order) for mutation and by
//! [`ServerId`] for lookup; neither hands out mutable references.

use tracing::{debug, warn};

use crate::request::Request;
use crate::server::{Server, ServerId};

/// An ordered collection of servers that grows and shrinks at the tail.
#[derive(Debug, Clone, Default)]
pub struct ServerPool {
    servers: Vec<Server>,
    /// Next id handed out by `grow`.
    next_id: ServerId,
}

impl ServerPool {
    /// Create a pool of `initial` idle servers with ids `0..initial`.
    pub fn new(initial: u32) -> Self {
        let initial = ServerId::from(initial);
        Self {
            servers: (0..initial).map(Server::new).collect(),
            next_id: initial,
        }
    }

    /// Append one idle server with a fresh id.
    ///
    /// No ceiling is enforced here; capping the pool is a resize policy
    /// concern.
    pub fn grow(&mut self) -> ServerId {
        let id = self.next_id;
        self.next_id += 1;
        self.servers.push(Server::new(id));
        debug!(server = id, size = self.servers.len(), "server added");
        id
    }

    /// Remove the last server in pool order, whatever its state.
    ///
    /// Returns the removed server, or `None` if the pool is empty. If the
    /// server was busy its request is lost: it is not returned to the
    /// queue. The caller can read the abandoned request id from the
    /// returned value.
    pub fn shrink(&mut self) -> Option<Server> {
        let server = self.servers.pop()?;
        if let Some(request) = server.current_request() {
            warn!(
                server = server.id(),
                request,
                remaining = server.remaining_time(),
                "removed busy server, in-flight request abandoned"
            );
        } else {
            debug!(server = server.id(), size = self.servers.len(), "server removed");
        }
        Some(server)
    }

    /// First idle server in pool order.
    pub fn find_idle(&self) -> Option<ServerId> {
        self.servers.iter().find(|s| s.is_idle()).map(Server::id)
    }

    /// Hand `request` to the server in `slot`.
    ///
    /// Returns the server's id, or `None` if the slot is out of range or
    /// the server there is busy.
    pub fn assign(&mut self, slot: usize, request: &Request) -> Option<ServerId> {
        let server = self.servers.get_mut(slot).filter(|s| s.is_idle())?;
        server.assign(request);
        Some(server.id())
    }

    /// Age every busy server by one tick.
    ///
    /// Servers whose countdown reaches 0 go idle during this call. Returns
    /// how many servers finished.
    pub fn tick(&mut self) -> usize {
        self.servers
            .iter_mut()
            .map(Server::advance)
            .filter(|finished| *finished)
            .count()
    }

    pub fn count_idle(&self) -> usize {
        self.servers.iter().filter(|s| s.is_idle()).count()
    }

    pub fn count_busy(&self) -> usize {
        self.servers.iter().filter(|s| s.is_busy()).count()
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    /// Read-only view in pool order.
    pub fn servers(&self) -> &[Server] {
        &self.servers
    }

    /// Look up a server by id.
    pub fn get(&self, id: ServerId) -> Option<&Server> {
        self.servers.iter().find(|s| s.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Server> {
        self.servers.iter()
    }
}
