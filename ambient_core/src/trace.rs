// Copyright 2026 the Ambient Decor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing hooks for the decoration scheduler.
//!
//! This module provides a [`TraceSink`] trait with per-event methods the
//! scheduler calls as a generation moves through its phases. All method
//! bodies default to no-ops, so implementing only the events you care about
//! is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching.
//!
//! Superseded steps are absorbed silently and have no event.

use crate::epoch::Epoch;
use crate::stage::{Phase, TeardownReason};

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a new generation has been generated and partitioned.
#[derive(Clone, Copy, Debug)]
pub struct GenerationEvent<'a> {
    /// Epoch minted for the generation.
    pub epoch: Epoch,
    /// Theme the generation was built for.
    pub theme: &'a str,
    /// Page height the items were spread over.
    pub page_height: f64,
    /// Total item count.
    pub items: u32,
    /// Items revealed synchronously.
    pub immediate: u32,
    /// Items left for idle-time batches.
    pub deferred: u32,
}

/// Emitted on every scheduler phase transition.
#[derive(Clone, Copy, Debug)]
pub struct PhaseEvent {
    /// Epoch current after the transition.
    pub epoch: Epoch,
    /// Phase before the transition.
    pub from: Phase,
    /// Phase after the transition.
    pub to: Phase,
}

/// Emitted after a deferred batch became visible.
#[derive(Clone, Copy, Debug)]
pub struct BatchEvent {
    /// Epoch of the generation.
    pub epoch: Epoch,
    /// Zero-based batch index.
    pub batch: u32,
    /// Items revealed by this batch.
    pub revealed: u32,
    /// Deferred items still hidden.
    pub remaining: u32,
}

/// Emitted when the scheduler drops its generation and goes idle.
#[derive(Clone, Copy, Debug)]
pub struct TeardownEvent {
    /// Epoch minted by the teardown.
    pub epoch: Epoch,
    /// Why decorations were switched off.
    pub reason: TeardownReason,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the scheduler.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a generation was created and partitioned.
    fn on_generation(&mut self, e: &GenerationEvent<'_>) {
        _ = e;
    }

    /// Called on every phase transition.
    fn on_phase(&mut self, e: &PhaseEvent) {
        _ = e;
    }

    /// Called after a deferred batch was revealed.
    fn on_batch(&mut self, e: &BatchEvent) {
        _ = e;
    }

    /// Called when the scheduler tears down to idle.
    fn on_teardown(&mut self, e: &TeardownEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`GenerationEvent`].
    #[inline]
    pub fn generation(&mut self, e: &GenerationEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_generation(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PhaseEvent`].
    #[inline]
    pub fn phase(&mut self, e: &PhaseEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_phase(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`BatchEvent`].
    #[inline]
    pub fn batch(&mut self, e: &BatchEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_batch(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`TeardownEvent`].
    #[inline]
    pub fn teardown(&mut self, e: &TeardownEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_teardown(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
