//! Epoch tokens for discarding superseded asynchronous results.
//!
//! A view owns an [`Epoch`]. Each load takes a [`Ticket`] before it starts;
//! when the result arrives it is applied only if the ticket is still
//! current. Starting a new load, changing the view's input, or tearing the
//! view down advances the epoch and turns every outstanding ticket stale.
//! In-flight requests are not aborted, their results are simply dropped.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic generation counter shared between a view and its loads.
#[derive(Debug, Clone, Default)]
pub struct Epoch {
    current: Arc<AtomicU64>,
}

/// Marker captured when a load starts.
#[derive(Debug, Clone)]
pub struct Ticket {
    generation: u64,
    current: Arc<AtomicU64>,
}

impl Epoch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation, invalidating all earlier tickets.
    pub fn begin(&self) -> Ticket {
        let generation = self.current.fetch_add(1, Ordering::AcqRel) + 1;
        Ticket {
            generation,
            current: Arc::clone(&self.current),
        }
    }

    /// Invalidate every outstanding ticket without starting a load.
    pub fn invalidate(&self) {
        self.current.fetch_add(1, Ordering::AcqRel);
    }

    /// Whether `ticket` belongs to this epoch's latest generation.
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        Arc::ptr_eq(&self.current, &ticket.current)
            && self.current.load(Ordering::Acquire) == ticket.generation
    }
}

impl Ticket {
    /// Whether no newer generation has started since this ticket was taken.
    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::Acquire) == self.generation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

static_assertions::assert_impl_all!(Epoch: Send, Sync);
static_assertions::assert_impl_all!(Ticket: Send, Sync);
