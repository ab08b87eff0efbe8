//! Single-slot frame handoff between capture and inference.
//!
//! The gate is the drop-if-busy boundary with a single-producer,
//! single-consumer contract: `submit` never blocks and never queues. A
//! frame is accepted only when no inference is in flight; the in-flight
//! flag is set on accept and cleared by the worker via `finish`, so a
//! frame arriving mid-inference is dropped even though the slot itself is
//! already empty. At most one inference runs at any time.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Condvar, Mutex};

use crate::frame::Frame;

pub struct InferenceGate {
    state: Mutex<GateState>,
    available: Condvar,
    accepted: AtomicU64,
    dropped: AtomicU64,
}

struct GateState {
    slot: Option<Frame>,
    in_flight: bool,
    closed: bool,
}

impl InferenceGate {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(GateState {
                slot: None,
                in_flight: false,
                closed: false,
            }),
            available: Condvar::new(),
            accepted: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
        }
    }

    /// Offer a frame. Returns false (frame dropped) when an inference is in
    /// flight or the gate is closed. Never blocks, never queues.
    pub fn submit(&self, frame: Frame) -> bool {
        let Ok(mut state) = self.state.lock() else {
            return false;
        };
        if state.closed {
            return false;
        }
        if state.in_flight {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }
        state.in_flight = true;
        state.slot = Some(frame);
        self.accepted.fetch_add(1, Ordering::Relaxed);
        self.available.notify_one();
        true
    }

    /// Wait for the next accepted frame. Returns None once the gate is
    /// closed and the slot is drained.
    pub fn recv(&self) -> Option<Frame> {
        let Ok(mut state) = self.state.lock() else {
            return None;
        };
        loop {
            if let Some(frame) = state.slot.take() {
                return Some(frame);
            }
            if state.closed {
                return None;
            }
            state = self.available.wait(state).ok()?;
        }
    }

    /// Mark the in-flight inference finished, reopening the gate.
    pub fn finish(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.in_flight = false;
        }
    }

    /// Close the gate: pending `recv` returns None, later submits are
    /// refused.
    pub fn close(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.closed = true;
        }
        self.available.notify_all();
    }

    /// Frames accepted for inference.
    pub fn accepted(&self) -> u64 {
        self.accepted.load(Ordering::Relaxed)
    }

    /// Frames dropped because an inference was in flight.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl Default for InferenceGate {
    fn default() -> Self {
        Self::new()
    }
}
