// Copyright 2026 the Ambient Decor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][format] JSON to the given writer.
//!
//! Phases become duration slices (`B`/`E` pairs), so a generation shows up as
//! consecutive slices from `Generating` to `Complete`. Generations, batches
//! and teardowns are instant events.
//!
//! [format]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use ambient_core::stage::Phase;

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
///
/// # Errors
///
/// Returns any error from `writer`.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();

    for record in decode(bytes) {
        let ts = record.at_us;
        match record.event {
            RecordedEvent::Generation(g) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Generation",
                    "cat": "Scheduler",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "epoch": g.epoch.0,
                        "theme": g.theme,
                        "page_height": g.page_height,
                        "items": g.items,
                        "immediate": g.immediate,
                        "deferred": g.deferred,
                    }
                }));
            }
            RecordedEvent::Phase(e) => {
                if e.from != Phase::Idle {
                    events.push(json!({
                        "ph": "E",
                        "name": format!("{:?}", e.from),
                        "cat": "Phase",
                        "ts": ts,
                        "pid": 0,
                        "tid": 0,
                    }));
                }
                if e.to != Phase::Idle {
                    events.push(json!({
                        "ph": "B",
                        "name": format!("{:?}", e.to),
                        "cat": "Phase",
                        "ts": ts,
                        "pid": 0,
                        "tid": 0,
                        "args": {
                            "epoch": e.epoch.0,
                        }
                    }));
                }
            }
            RecordedEvent::Batch(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Batch",
                    "cat": "Scheduler",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "epoch": e.epoch.0,
                        "batch": e.batch,
                        "revealed": e.revealed,
                        "remaining": e.remaining,
                    }
                }));
            }
            RecordedEvent::Teardown(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Teardown",
                    "cat": "Scheduler",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "epoch": e.epoch.0,
                        "reason": format!("{:?}", e.reason),
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use ambient_core::epoch::Epoch;
    use ambient_core::stage::TeardownReason;
    use ambient_core::trace::{BatchEvent, PhaseEvent, TeardownEvent, TraceSink};

    fn recorder() -> RecorderSink {
        let mut now = 0_u64;
        RecorderSink::with_clock(Box::new(move || {
            now += 100;
            now
        }))
    }

    #[test]
    fn export_produces_valid_json() {
        let mut rec = recorder();
        rec.on_phase(&PhaseEvent {
            epoch: Epoch(1),
            from: Phase::Idle,
            to: Phase::Generating,
        });
        rec.on_phase(&PhaseEvent {
            epoch: Epoch(1),
            from: Phase::Generating,
            to: Phase::ImmediateRevealed,
        });
        rec.on_batch(&BatchEvent {
            epoch: Epoch(1),
            batch: 0,
            revealed: 20,
            remaining: 0,
        });

        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();

        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed.len(), 4);

        // Leaving Idle opens a slice without closing one.
        assert_eq!(parsed[0]["ph"], "B");
        assert_eq!(parsed[0]["name"], "Generating");
        assert_eq!(parsed[0]["ts"], 100);

        assert_eq!(parsed[1]["ph"], "E");
        assert_eq!(parsed[1]["name"], "Generating");
        assert_eq!(parsed[2]["ph"], "B");
        assert_eq!(parsed[2]["name"], "ImmediateRevealed");

        assert_eq!(parsed[3]["ph"], "i");
        assert_eq!(parsed[3]["name"], "Batch");
        assert_eq!(parsed[3]["args"]["revealed"], 20);
    }

    #[test]
    fn teardown_closes_the_open_slice() {
        let mut rec = recorder();
        rec.on_phase(&PhaseEvent {
            epoch: Epoch(2),
            from: Phase::Complete,
            to: Phase::Idle,
        });
        rec.on_teardown(&TeardownEvent {
            epoch: Epoch(2),
            reason: TeardownReason::NoDecor,
        });

        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0]["ph"], "E");
        assert_eq!(parsed[0]["name"], "Complete");
        assert_eq!(parsed[1]["name"], "Teardown");
        assert_eq!(parsed[1]["args"]["reason"], "NoDecor");
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert!(parsed.is_empty());
    }
}
