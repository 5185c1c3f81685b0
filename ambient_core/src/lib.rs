// Copyright 2026 the Ambient Decor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Procedural placement and idle-time reveal of ambient page decorations.
//!
//! `ambient_core` decides where a theme's decorative images go on a page and
//! when they become visible. It is `no_std` compatible (with `alloc`) and
//! never touches a clock or an event loop itself: deferred work is handed to
//! a host-provided [`StepPort`](port::StepPort) and delivered back later.
//!
//! # Architecture
//!
//! ```text
//!   theme id ──► ThemeRegistry::resolve() ──► DecorConfig
//!                                                 │
//!   PageMetrics ──► HeightTracker ──► height ─────┤
//!                                                 ▼
//!                              StagedScheduler::begin()  (new Epoch)
//!                                   │        │
//!                     above the fold│        │below the fold
//!                                   ▼        ▼
//!                               visible   StepPort::schedule(ticket)
//!                                   ▲        │
//!                                   │        ▼ (idle time)
//!                                   └── StagedScheduler::run_step()
//!                                   │
//!                                   ▼
//!                         DecorSurface::present()
//! ```
//!
//! **[`config`]**: Decoration parameters, per-theme overrides and their
//! resolution against the baseline.
//!
//! **[`presets`]**: The built-in themes that ship with decorations.
//!
//! **[`generate`]**: Seeded, sectioned placement of decoration items.
//!
//! **[`height`]**: Page height derivation and change detection.
//!
//! **[`stage`]**: The phase machine that reveals a generation in an
//! immediate band and idle-time batches.
//!
//! **[`epoch`]** and **[`port`]**: Generation epochs, step tickets and the
//! scheduling port they travel through.
//!
//! **[`decor`]**: [`AmbientDecor`](decor::AmbientDecor), which reacts to
//! theme, height and mode changes and owns everything above.
//!
//! **[`surface`]**: The [`DecorSurface`](surface::DecorSurface) trait that
//! platform backends implement.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! scheduler instrumentation, with a zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod config;
pub mod decor;
pub mod epoch;
pub mod generate;
pub mod height;
pub mod port;
pub mod presets;
pub mod stage;
pub mod surface;
pub mod trace;
