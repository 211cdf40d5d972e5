//! Request queue — strict FIFO of requests awaiting a server.

use std::collections::VecDeque;

use crate::request::Request;

/// Pending requests in admission order.
///
/// There is no prioritisation: neither processing time nor tags reorder
/// the queue, and duplicate ids are accepted.
#[derive(Debug, Clone, Default)]
pub struct RequestQueue {
    pending: VecDeque<Request>,
}

impl RequestQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append to the tail.
    pub fn enqueue(&mut self, request: Request) {
        self.pending.push_back(request);
    }

    /// Remove and return the head, or `None` if empty.
    pub fn dequeue(&mut self) -> Option<Request> {
        self.pending.pop_front()
    }

    /// The head without removing it.
    pub fn peek(&self) -> Option<&Request> {
        self.pending.front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Pending requests, head first.
    pub fn iter(&self) -> impl Iterator<Item = &Request> {
        self.pending.iter()
    }
}

impl Extend<Request> for RequestQueue {
    fn extend<T: IntoIterator<Item = Request>>(&mut self, iter: T) {
        self.pending.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dequeue_follows_enqueue_order() {
        let mut q = RequestQueue::new();
        q.enqueue(Request::with_duration(1, 50));
        q.enqueue(Request::with_duration(2, 1));
        q.enqueue(Request::with_duration(3, 99));

        let ids: Vec<_> = std::iter::from_fn(|| q.dequeue()).map(|r| r.id()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn empty_queue_returns_none() {
        let mut q = RequestQueue::new();
        assert!(q.peek().is_none());
        assert!(q.dequeue().is_none());
        assert_eq!(q.len(), 0);
    }

    #[test]
    fn peek_does_not_remove() {
        let mut q = RequestQueue::new();
        q.enqueue(Request::with_duration(5, 1));
        assert_eq!(q.peek().map(Request::id), Some(5));
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn duplicate_ids_are_kept() {
        let mut q = RequestQueue::new();
        q.extend([Request::with_duration(0, 1), Request::with_duration(0, 2)]);
        assert_eq!(q.len(), 2);
        assert_eq!(q.dequeue().map(|r| r.processing_time()), Some(1));
        assert_eq!(q.dequeue().map(|r| r.processing_time()), Some(2));
    }
}
