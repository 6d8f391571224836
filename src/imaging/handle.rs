//! Scoped decode handles.
//!
//! Decoding reads the candidate's bytes through a [`DecodeHandle`] obtained
//! from a [`HandleRegistry`]. The handle is released when it is dropped, so
//! every exit from a decode (surface loaded, decoder error, panic unwinding)
//! balances its acquisition without explicit cleanup calls.
//!
//! The registry only counts. It is shared by every invocation of a
//! [`Reencoder`](crate::reencode::Reencoder) and uses atomics, so concurrent
//! invocations never contend on a lock.

use std::sync::atomic::{AtomicU64, Ordering};

/// Tracks decode handles handed out and returned.
#[derive(Debug, Default)]
pub struct HandleRegistry {
    acquired: AtomicU64,
    released: AtomicU64,
}

impl HandleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `bytes` to a fresh handle. Released on drop.
    pub fn acquire<'a>(&'a self, bytes: &'a [u8]) -> DecodeHandle<'a> {
        let id = self.acquired.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::trace!(handle = id, bytes = bytes.len(), "acquired decode handle");
        DecodeHandle {
            id,
            bytes,
            registry: self,
        }
    }

    /// Total handles ever acquired.
    pub fn acquired(&self) -> u64 {
        self.acquired.load(Ordering::Acquire)
    }

    /// Total handles ever released.
    pub fn released(&self) -> u64 {
        self.released.load(Ordering::Acquire)
    }

    /// Handles currently alive.
    pub fn outstanding(&self) -> u64 {
        self.acquired().saturating_sub(self.released())
    }
}

/// Read-only binding of raw image bytes for the duration of one decode.
#[derive(Debug)]
pub struct DecodeHandle<'a> {
    id: u64,
    bytes: &'a [u8],
    registry: &'a HandleRegistry,
}

impl DecodeHandle<'_> {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn bytes(&self) -> &[u8] {
        self.bytes
    }
}

impl Drop for DecodeHandle<'_> {
    fn drop(&mut self) {
        self.registry.released.fetch_add(1, Ordering::AcqRel);
        tracing::trace!(handle = self.id, "released decode handle");
    }
}
