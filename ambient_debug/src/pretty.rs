// Copyright 2026 the Ambient Decor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use ambient_core::stage::{Phase, TeardownReason};
use ambient_core::trace::{BatchEvent, GenerationEvent, PhaseEvent, TeardownEvent, TraceSink};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns the destination.
    #[must_use]
    pub fn into_writer(self) -> W {
        self.writer
    }
}

fn phase_name(phase: Phase) -> &'static str {
    match phase {
        Phase::Idle => "idle",
        Phase::Generating => "generating",
        Phase::ImmediateRevealed => "immediate",
        Phase::BatchDraining => "draining",
        Phase::Complete => "complete",
    }
}

fn reason_name(reason: TeardownReason) -> &'static str {
    match reason {
        TeardownReason::NoDecor => "no-decor",
        TeardownReason::NoHeight => "no-height",
        TeardownReason::ReducedPresentation => "reduced",
        TeardownReason::Unmount => "unmount",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_generation(&mut self, e: &GenerationEvent<'_>) {
        let _ = writeln!(
            self.writer,
            "[generation] epoch={} theme={} height={:.0}px items={} immediate={} deferred={}",
            e.epoch.0, e.theme, e.page_height, e.items, e.immediate, e.deferred,
        );
    }

    fn on_phase(&mut self, e: &PhaseEvent) {
        let _ = writeln!(
            self.writer,
            "[phase] epoch={} {} -> {}",
            e.epoch.0,
            phase_name(e.from),
            phase_name(e.to),
        );
    }

    fn on_batch(&mut self, e: &BatchEvent) {
        let _ = writeln!(
            self.writer,
            "[batch] epoch={} #{} revealed={} remaining={}",
            e.epoch.0, e.batch, e.revealed, e.remaining,
        );
    }

    fn on_teardown(&mut self, e: &TeardownEvent) {
        let _ = writeln!(
            self.writer,
            "[teardown] epoch={} reason={}",
            e.epoch.0,
            reason_name(e.reason),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ambient_core::epoch::Epoch;

    #[test]
    fn pretty_print_generation() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_generation(&GenerationEvent {
            epoch: Epoch(1),
            theme: "daisy",
            page_height: 6_000.0,
            items: 75,
            immediate: 15,
            deferred: 60,
        });
        let output = String::from_utf8(sink.into_writer()).unwrap();
        assert!(output.starts_with("[generation]"), "got: {output}");
        assert!(output.contains("theme=daisy"), "got: {output}");
        assert!(output.contains("height=6000px"), "got: {output}");
    }

    #[test]
    fn pretty_print_phase_and_teardown() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_phase(&PhaseEvent {
            epoch: Epoch(3),
            from: Phase::BatchDraining,
            to: Phase::Complete,
        });
        sink.on_teardown(&TeardownEvent {
            epoch: Epoch(4),
            reason: TeardownReason::ReducedPresentation,
        });
        let output = String::from_utf8(sink.into_writer()).unwrap();
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(
            lines,
            [
                "[phase] epoch=3 draining -> complete",
                "[teardown] epoch=4 reason=reduced",
            ]
        );
    }
}
