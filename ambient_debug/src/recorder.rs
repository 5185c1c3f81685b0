// Copyright 2026 the Ambient Decor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as little-endian records, each stamped with the time read from
//! the sink's clock. [`decode`] reads them back as an iterator of [`Record`].
//!
//! The scheduler itself never looks at a clock, so the recorder brings its
//! own: [`RecorderSink::new`] measures from its creation with
//! [`Instant`](std::time::Instant), and [`RecorderSink::with_clock`] accepts
//! any source of microsecond timestamps (a test counter, `performance.now()`).

use std::time::Instant;

use ambient_core::epoch::Epoch;
use ambient_core::stage::{Phase, TeardownReason};
use ambient_core::trace::{BatchEvent, GenerationEvent, PhaseEvent, TeardownEvent, TraceSink};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_GENERATION: u8 = 1;
const TAG_PHASE: u8 = 2;
const TAG_BATCH: u8 = 3;
const TAG_TEARDOWN: u8 = 4;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// Source of microsecond timestamps for recorded events.
pub type Clock = Box<dyn FnMut() -> u64>;

/// A [`TraceSink`] that encodes events into a compact binary buffer.
pub struct RecorderSink {
    buf: Vec<u8>,
    clock: Clock,
}

impl std::fmt::Debug for RecorderSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecorderSink")
            .field("len", &self.buf.len())
            .finish_non_exhaustive()
    }
}

impl Default for RecorderSink {
    fn default() -> Self {
        Self::new()
    }
}

impl RecorderSink {
    /// Creates an empty recorder timed from now.
    #[must_use]
    pub fn new() -> Self {
        let start = Instant::now();
        Self::with_clock(Box::new(move || {
            u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX)
        }))
    }

    /// Creates an empty recorder that stamps events with `clock`.
    #[must_use]
    pub fn with_clock(clock: Clock) -> Self {
        Self {
            buf: Vec::new(),
            clock,
        }
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn begin(&mut self, tag: u8, epoch: Epoch) {
        let at = (self.clock)();
        self.write_u8(tag);
        self.write_u64(at);
        self.write_u64(epoch.0);
    }

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    fn write_str(&mut self, s: &str) {
        let len = u32::try_from(s.len()).unwrap_or(u32::MAX);
        self.write_u32(len);
        self.buf.extend_from_slice(&s.as_bytes()[..len as usize]);
    }

    fn write_phase(&mut self, p: Phase) {
        self.write_u8(match p {
            Phase::Idle => 0,
            Phase::Generating => 1,
            Phase::ImmediateRevealed => 2,
            Phase::BatchDraining => 3,
            Phase::Complete => 4,
        });
    }

    fn write_reason(&mut self, r: TeardownReason) {
        self.write_u8(match r {
            TeardownReason::NoDecor => 0,
            TeardownReason::NoHeight => 1,
            TeardownReason::ReducedPresentation => 2,
            TeardownReason::Unmount => 3,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_generation(&mut self, e: &GenerationEvent<'_>) {
        self.begin(TAG_GENERATION, e.epoch);
        self.write_str(e.theme);
        self.write_f64(e.page_height);
        self.write_u32(e.items);
        self.write_u32(e.immediate);
        self.write_u32(e.deferred);
    }

    fn on_phase(&mut self, e: &PhaseEvent) {
        self.begin(TAG_PHASE, e.epoch);
        self.write_phase(e.from);
        self.write_phase(e.to);
    }

    fn on_batch(&mut self, e: &BatchEvent) {
        self.begin(TAG_BATCH, e.epoch);
        self.write_u32(e.batch);
        self.write_u32(e.revealed);
        self.write_u32(e.remaining);
    }

    fn on_teardown(&mut self, e: &TeardownEvent) {
        self.begin(TAG_TEARDOWN, e.epoch);
        self.write_reason(e.reason);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// An owned [`GenerationEvent`].
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationRecord {
    /// Epoch minted for the generation.
    pub epoch: Epoch,
    /// Theme the generation was built for.
    pub theme: String,
    /// Page height the items were spread over.
    pub page_height: f64,
    /// Total item count.
    pub items: u32,
    /// Items revealed synchronously.
    pub immediate: u32,
    /// Items left for idle-time batches.
    pub deferred: u32,
}

/// A decoded event from a binary recording.
#[derive(Clone, Debug)]
pub enum RecordedEvent {
    /// A [`GenerationEvent`].
    Generation(GenerationRecord),
    /// A [`PhaseEvent`].
    Phase(PhaseEvent),
    /// A [`BatchEvent`].
    Batch(BatchEvent),
    /// A [`TeardownEvent`].
    Teardown(TeardownEvent),
}

/// A decoded event and the time it was recorded.
#[derive(Clone, Debug)]
pub struct Record {
    /// Clock reading when the event was recorded, microseconds.
    pub at_us: u64,
    /// The event.
    pub event: RecordedEvent,
}

/// Decodes a byte slice produced by [`RecorderSink`].
///
/// Decoding stops at the first truncated or unknown record.
#[must_use]
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded records.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_bytes(&mut self, n: usize) -> Option<&[u8]> {
        if self.remaining() < n {
            return None;
        }
        let v = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Some(v)
    }

    fn read_u8(&mut self) -> Option<u8> {
        Some(self.read_bytes(1)?[0])
    }

    fn read_u32(&mut self) -> Option<u32> {
        Some(u32::from_le_bytes(self.read_bytes(4)?.try_into().ok()?))
    }

    fn read_u64(&mut self) -> Option<u64> {
        Some(u64::from_le_bytes(self.read_bytes(8)?.try_into().ok()?))
    }

    fn read_f64(&mut self) -> Option<f64> {
        Some(f64::from_bits(self.read_u64()?))
    }

    fn read_string(&mut self) -> Option<String> {
        let len = self.read_u32()? as usize;
        let bytes = self.read_bytes(len)?;
        Some(String::from_utf8_lossy(bytes).into_owned())
    }

    fn read_phase(&mut self) -> Option<Phase> {
        Some(match self.read_u8()? {
            0 => Phase::Idle,
            1 => Phase::Generating,
            2 => Phase::ImmediateRevealed,
            3 => Phase::BatchDraining,
            4 => Phase::Complete,
            _ => return None,
        })
    }

    fn read_reason(&mut self) -> Option<TeardownReason> {
        Some(match self.read_u8()? {
            0 => TeardownReason::NoDecor,
            1 => TeardownReason::NoHeight,
            2 => TeardownReason::ReducedPresentation,
            3 => TeardownReason::Unmount,
            _ => return None,
        })
    }

    fn decode_generation(&mut self, epoch: Epoch) -> Option<RecordedEvent> {
        Some(RecordedEvent::Generation(GenerationRecord {
            epoch,
            theme: self.read_string()?,
            page_height: self.read_f64()?,
            items: self.read_u32()?,
            immediate: self.read_u32()?,
            deferred: self.read_u32()?,
        }))
    }

    fn decode_phase(&mut self, epoch: Epoch) -> Option<RecordedEvent> {
        Some(RecordedEvent::Phase(PhaseEvent {
            epoch,
            from: self.read_phase()?,
            to: self.read_phase()?,
        }))
    }

    fn decode_batch(&mut self, epoch: Epoch) -> Option<RecordedEvent> {
        Some(RecordedEvent::Batch(BatchEvent {
            epoch,
            batch: self.read_u32()?,
            revealed: self.read_u32()?,
            remaining: self.read_u32()?,
        }))
    }

    fn decode_teardown(&mut self, epoch: Epoch) -> Option<RecordedEvent> {
        Some(RecordedEvent::Teardown(TeardownEvent {
            epoch,
            reason: self.read_reason()?,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = Record;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        let at_us = self.read_u64()?;
        let epoch = Epoch(self.read_u64()?);
        let event = match tag {
            TAG_GENERATION => self.decode_generation(epoch),
            TAG_PHASE => self.decode_phase(epoch),
            TAG_BATCH => self.decode_batch(epoch),
            TAG_TEARDOWN => self.decode_teardown(epoch),
            _ => None,
        }?;
        Some(Record { at_us, event })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
