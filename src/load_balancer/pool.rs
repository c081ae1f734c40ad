//! Backend pool management.
//!
//! # Responsibilities
//! - Hold the configured backends in insertion order
//! - Pick the next live backend in round-robin order
//! - Update a backend's liveness by address

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use url::Url;

use crate::load_balancer::backend::Backend;

/// Ordered backends plus the shared round-robin cursor.
#[derive(Debug, Default)]
pub struct ServerPool {
    backends: Vec<Arc<Backend>>,
    current: AtomicUsize,
}

impl ServerPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a backend. Configuration time only.
    pub fn add_backend(&mut self, backend: Arc<Backend>) {
        self.backends.push(backend);
    }

    /// All configured backends, in insertion order.
    pub fn backends(&self) -> &[Arc<Backend>] {
        &self.backends
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    /// Advance the cursor and map it onto the backend list.
    ///
    /// Every caller observes a distinct cursor value. Returns `None` for an
    /// empty pool.
    pub fn next_index(&self) -> Option<usize> {
        if self.backends.is_empty() {
            return None;
        }
        let cursor = self.current.fetch_add(1, Ordering::SeqCst).wrapping_add(1);
        Some(cursor % self.backends.len())
    }

    /// Return the first live backend at or after the next cursor position.
    ///
    /// When live backends had to be skipped over, the cursor jumps to the
    /// one returned so the following call starts right after it.
    pub fn next_peer(&self) -> Option<Arc<Backend>> {
        let next = self.next_index()?;
        let len = self.backends.len();

        for i in next..next + len {
            let index = i % len;
            let backend = &self.backends[index];
            if backend.is_alive() {
                if i != next {
                    self.current.store(index, Ordering::SeqCst);
                }
                return Some(backend.clone());
            }
        }

        tracing::debug!(backend_count = len, "No live backends in pool");
        None
    }

    /// Set the liveness of the backend whose address equals `url`.
    ///
    /// Unknown addresses are ignored.
    pub fn mark_backend_status(&self, url: &Url, alive: bool) {
        if let Some(backend) = self.backends.iter().find(|b| b.url().as_str() == url.as_str()) {
            backend.set_alive(alive);
        }
    }
}
