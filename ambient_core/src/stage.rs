// Copyright 2026 the Ambient Decor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Staged reveal of a generation's items.
//!
//! The [`StagedScheduler`] owns the current generation and the set of items
//! visible to the surface. Starting a generation reveals every item above the
//! fold synchronously, so the first paint already has decorations near the
//! viewport; the rest are revealed in fixed-size batches as a
//! [`StepPort`] finds idle time.
//!
//! # Phases
//!
//! ```text
//!   Idle ──► Generating ──► ImmediateRevealed ──► BatchDraining ──► Complete
//!              ▲                                        │               │
//!              └────────────── restart ─────────────────┴───────────────┘
//! ```
//!
//! `Generating` and `ImmediateRevealed` are passed through inside a single
//! [`begin`](StagedScheduler::begin) call; callers observe `BatchDraining` or
//! `Complete` when it returns.
//!
//! # Cancellation
//!
//! Every [`begin`](StagedScheduler::begin) and
//! [`teardown`](StagedScheduler::teardown) mints a new [`Epoch`] *before*
//! anything else, then asks the port to cancel what it has pending. A step
//! that still arrives for an older epoch is ignored by
//! [`run_step`](StagedScheduler::run_step), so nothing from a superseded
//! generation ever reaches the visible set.

use alloc::string::String;
use alloc::vec::Vec;

use rand::Rng;

use crate::config::DecorConfig;
use crate::epoch::{Epoch, StepTicket};
use crate::generate::{DecorationItem, generate};
use crate::port::StepPort;
use crate::trace::{BatchEvent, GenerationEvent, PhaseEvent, TeardownEvent, Tracer};

/// Configuration for the [`StagedScheduler`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StagerConfig {
    /// Items whose `top` is above this offset are revealed immediately.
    pub above_fold_height: f64,
    /// Deferred items revealed per step. Treated as 1 if set to 0.
    pub batch_size: u32,
}

impl StagerConfig {
    /// Default configuration for a scrolling web page.
    #[must_use]
    pub const fn web() -> Self {
        Self {
            above_fold_height: 1200.0,
            batch_size: 20,
        }
    }
}

impl Default for StagerConfig {
    fn default() -> Self {
        Self::web()
    }
}

/// Scheduler lifecycle phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// No generation; nothing visible.
    Idle,
    /// Items are being generated.
    Generating,
    /// The above-fold items are visible.
    ImmediateRevealed,
    /// Deferred batches are being revealed.
    BatchDraining,
    /// Every item of the generation is visible.
    Complete,
}

/// Why the scheduler went idle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TeardownReason {
    /// The active theme has no decorations.
    NoDecor,
    /// The page height is not known yet, or is not positive.
    NoHeight,
    /// A reduced-presentation mode switched decorations off.
    ReducedPresentation,
    /// The host removed the decoration layer.
    Unmount,
}

/// Result of [`StagedScheduler::run_step`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// A batch was revealed and another step was scheduled.
    Revealed {
        /// Items revealed by this step.
        count: u32,
        /// Deferred items still hidden.
        remaining: u32,
    },
    /// The final batch was revealed; the generation is complete.
    Completed {
        /// Items revealed by this step.
        count: u32,
    },
    /// The ticket belongs to a superseded generation and was ignored.
    Stale,
}

/// The inputs one generation is built from.
#[derive(Clone, Debug)]
pub struct GenerationRequest<'a> {
    /// Active theme id.
    pub theme: &'a str,
    /// Page height to spread items over.
    pub page_height: f64,
    /// Resolved decoration config for `theme`.
    pub config: DecorConfig,
}

/// One complete, immutable decoration layout.
#[derive(Clone, Debug)]
pub struct Generation {
    epoch: Epoch,
    theme: String,
    page_height: f64,
    config: DecorConfig,
    items: Vec<DecorationItem>,
}

impl Generation {
    /// Epoch the generation was minted under.
    #[must_use]
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// Theme the generation belongs to.
    #[must_use]
    pub fn theme(&self) -> &str {
        &self.theme
    }

    /// Page height the items were spread over.
    #[must_use]
    pub fn page_height(&self) -> f64 {
        self.page_height
    }

    /// Resolved config the items were drawn from.
    #[must_use]
    pub fn config(&self) -> &DecorConfig {
        &self.config
    }

    /// Every item of the generation, in placement order.
    #[must_use]
    pub fn items(&self) -> &[DecorationItem] {
        &self.items
    }
}

/// Reveals a generation's items in an immediate band and deferred batches.
///
/// # Usage
///
/// ```rust,ignore
/// stager.begin(request, &mut rng, &mut port, &mut tracer);
/// // ... later, whenever the port fires:
/// stager.run_step(ticket, &mut port, &mut tracer);
/// surface.present(stager.visible());
/// ```
#[derive(Debug)]
pub struct StagedScheduler {
    config: StagerConfig,
    epoch: Epoch,
    phase: Phase,
    generation: Option<Generation>,
    visible: Vec<DecorationItem>,
    deferred: Vec<DecorationItem>,
    cursor: usize,
    next_batch: u32,
}

impl StagedScheduler {
    /// Creates an idle scheduler.
    #[must_use]
    pub fn new(config: StagerConfig) -> Self {
        Self {
            config,
            epoch: Epoch::default(),
            phase: Phase::Idle,
            generation: None,
            visible: Vec::new(),
            deferred: Vec::new(),
            cursor: 0,
            next_batch: 0,
        }
    }

    /// Starts a new generation, superseding whatever was in flight.
    ///
    /// On return the above-fold items are visible and the phase is
    /// [`Phase::BatchDraining`] (a step is scheduled) or [`Phase::Complete`].
    pub fn begin<R: Rng + ?Sized>(
        &mut self,
        request: GenerationRequest<'_>,
        rng: &mut R,
        port: &mut dyn StepPort,
        tracer: &mut Tracer<'_>,
    ) {
        // Epoch first: from here on every ticket already handed out is stale,
        // whether or not the port manages to cancel it.
        self.epoch = self.epoch.next();
        port.cancel_pending();
        self.reset_reveal();
        self.transition(Phase::Generating, tracer);

        let items = generate(&request.config, request.page_height, self.epoch, rng);
        let fold = self.config.above_fold_height;
        let (immediate, deferred): (Vec<_>, Vec<_>) =
            items.iter().cloned().partition(|item| item.top < fold);

        tracer.generation(&GenerationEvent {
            epoch: self.epoch,
            theme: request.theme,
            page_height: request.page_height,
            items: count(items.len()),
            immediate: count(immediate.len()),
            deferred: count(deferred.len()),
        });

        self.visible = immediate;
        self.deferred = deferred;
        self.generation = Some(Generation {
            epoch: self.epoch,
            theme: String::from(request.theme),
            page_height: request.page_height,
            config: request.config,
            items,
        });
        self.transition(Phase::ImmediateRevealed, tracer);

        if self.deferred.is_empty() {
            self.transition(Phase::Complete, tracer);
        } else {
            self.transition(Phase::BatchDraining, tracer);
            port.schedule(StepTicket {
                epoch: self.epoch,
                batch: 0,
            });
        }
    }

    /// Reveals the next deferred batch if `ticket` is still current.
    ///
    /// A ticket from a superseded epoch, a duplicate delivery, or a step
    /// arriving outside [`Phase::BatchDraining`] changes nothing and returns
    /// [`StepOutcome::Stale`].
    pub fn run_step(
        &mut self,
        ticket: StepTicket,
        port: &mut dyn StepPort,
        tracer: &mut Tracer<'_>,
    ) -> StepOutcome {
        if ticket.epoch != self.epoch
            || ticket.batch != self.next_batch
            || self.phase != Phase::BatchDraining
        {
            return StepOutcome::Stale;
        }

        let batch_size = self.config.batch_size.max(1) as usize;
        let end = (self.cursor + batch_size).min(self.deferred.len());
        self.visible
            .extend_from_slice(&self.deferred[self.cursor..end]);
        let revealed = count(end - self.cursor);
        let remaining = count(self.deferred.len() - end);
        self.cursor = end;

        tracer.batch(&BatchEvent {
            epoch: self.epoch,
            batch: ticket.batch,
            revealed,
            remaining,
        });

        self.next_batch += 1;
        if remaining > 0 {
            port.schedule(StepTicket {
                epoch: self.epoch,
                batch: self.next_batch,
            });
            StepOutcome::Revealed {
                count: revealed,
                remaining,
            }
        } else {
            self.transition(Phase::Complete, tracer);
            StepOutcome::Completed { count: revealed }
        }
    }

    /// Drops the current generation and goes idle.
    ///
    /// Does nothing if already idle.
    pub fn teardown(
        &mut self,
        reason: TeardownReason,
        port: &mut dyn StepPort,
        tracer: &mut Tracer<'_>,
    ) {
        if self.phase == Phase::Idle {
            return;
        }
        self.epoch = self.epoch.next();
        port.cancel_pending();
        self.reset_reveal();
        self.generation = None;
        self.transition(Phase::Idle, tracer);
        tracer.teardown(&TeardownEvent {
            epoch: self.epoch,
            reason,
        });
    }

    /// Returns the current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the current epoch.
    #[must_use]
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// Returns the current generation, if any.
    #[must_use]
    pub fn generation(&self) -> Option<&Generation> {
        self.generation.as_ref()
    }

    /// Returns the items currently revealed to the surface.
    #[must_use]
    pub fn visible(&self) -> &[DecorationItem] {
        &self.visible
    }

    /// Returns how many deferred items are still hidden.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.deferred.len() - self.cursor
    }

    /// Returns the scheduler configuration.
    #[must_use]
    pub fn config(&self) -> &StagerConfig {
        &self.config
    }

    /// Replaces the scheduler configuration. The current epoch is kept, so
    /// tickets handed out earlier stay stale. Takes effect at the next
    /// [`begin`](Self::begin).
    pub fn set_config(&mut self, config: StagerConfig) {
        self.config = config;
    }

    fn reset_reveal(&mut self) {
        self.visible.clear();
        self.deferred.clear();
        self.cursor = 0;
        self.next_batch = 0;
    }

    fn transition(&mut self, to: Phase, tracer: &mut Tracer<'_>) {
        let from = self.phase;
        self.phase = to;
        tracer.phase(&PhaseEvent {
            epoch: self.epoch,
            from,
            to,
        });
    }
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AssetSet;
    use crate::port::QueuedPort;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn config(min_items: u32) -> DecorConfig {
        let mut config = DecorConfig::with_assets(AssetSet::raster(["/a.png", "/b.png"]).unwrap());
        config.min_items = min_items;
        config
    }

    fn request(theme: &str, page_height: f64, min_items: u32) -> GenerationRequest<'_> {
        GenerationRequest {
            theme,
            page_height,
            config: config(min_items),
        }
    }

    /// Delivers queued tickets until the port is empty.
    fn drain(stager: &mut StagedScheduler, port: &mut QueuedPort) -> u32 {
        let mut steps = 0;
        while let Some(ticket) = port.pop() {
            stager.run_step(ticket, port, &mut Tracer::none());
            steps += 1;
        }
        steps
    }

    #[test]
    fn new_scheduler_is_idle_and_empty() {
        let stager = StagedScheduler::new(StagerConfig::web());
        assert_eq!(stager.phase(), Phase::Idle);
        assert!(stager.visible().is_empty());
        assert!(stager.generation().is_none());
    }

    #[test]
    fn set_config_keeps_the_epoch_moving_forward() {
        let mut stager = StagedScheduler::new(StagerConfig::web());
        let mut port = QueuedPort::new();
        port.leak_cancelled(true);
        let mut rng = SmallRng::seed_from_u64(4);

        stager.begin(request("emo", 9_000.0, 200), &mut rng, &mut port, &mut Tracer::none());
        let old = port.pop().unwrap();
        stager.teardown(TeardownReason::Unmount, &mut port, &mut Tracer::none());
        stager.set_config(StagerConfig {
            batch_size: 5,
            ..StagerConfig::web()
        });
        assert_eq!(stager.config().batch_size, 5);

        stager.begin(request("emo", 9_500.0, 200), &mut rng, &mut port, &mut Tracer::none());
        assert!(stager.epoch() > old.epoch);
        let visible = stager.visible().len();
        assert_eq!(stager.run_step(old, &mut port, &mut Tracer::none()), StepOutcome::Stale);
        assert_eq!(stager.visible().len(), visible);
    }

    #[test]
    fn begin_reveals_exactly_the_above_fold_items() {
        let mut stager = StagedScheduler::new(StagerConfig::web());
        let mut port = QueuedPort::new();
        let mut rng = SmallRng::seed_from_u64(1);

        stager.begin(request("daisy", 12_000.0, 75), &mut rng, &mut port, &mut Tracer::none());

        let items = stager.generation().unwrap().items();
        let expected: Vec<_> = items.iter().filter(|i| i.top < 1200.0).cloned().collect();
        assert!(!expected.is_empty());
        assert_eq!(stager.visible(), expected.as_slice());
        assert_eq!(stager.phase(), Phase::BatchDraining);
        assert_eq!(port.len(), 1);
        assert_eq!(stager.pending(), items.len() - expected.len());
    }

    #[test]
    fn batches_drain_in_order_until_complete() {
        let mut stager = StagedScheduler::new(StagerConfig::web());
        let mut port = QueuedPort::new();
        let mut rng = SmallRng::seed_from_u64(2);

        stager.begin(request("emo", 20_000.0, 200), &mut rng, &mut port, &mut Tracer::none());
        let immediate = stager.visible().len();
        let deferred = 200 - immediate;

        let first = port.pop().unwrap();
        assert_eq!(
            stager.run_step(first, &mut port, &mut Tracer::none()),
            StepOutcome::Revealed {
                count: 20,
                remaining: count(deferred - 20),
            }
        );
        assert_eq!(stager.visible().len(), immediate + 20);

        let steps = drain(&mut stager, &mut port);
        assert_eq!(steps as usize, deferred.div_ceil(20) - 1);
        assert_eq!(stager.phase(), Phase::Complete);
        assert_eq!(stager.visible(), stager.generation().unwrap().items());
        assert!(port.is_empty());
    }

    #[test]
    fn short_page_completes_without_scheduling() {
        let mut stager = StagedScheduler::new(StagerConfig::web());
        let mut port = QueuedPort::new();
        let mut rng = SmallRng::seed_from_u64(3);

        stager.begin(request("rainbow", 1_000.0, 12), &mut rng, &mut port, &mut Tracer::none());
        assert_eq!(stager.phase(), Phase::Complete);
        assert_eq!(stager.visible().len(), 12);
        assert!(port.is_empty());
    }

    #[test]
    fn restart_mid_drain_never_leaks_old_items() {
        let mut stager = StagedScheduler::new(StagerConfig::web());
        let mut port = QueuedPort::new();
        // Cancellation is ineffective, like a callback that already fired.
        port.leak_cancelled(true);
        let mut rng = SmallRng::seed_from_u64(4);

        stager.begin(request("emo", 20_000.0, 200), &mut rng, &mut port, &mut Tracer::none());
        let old = stager.epoch();
        let t = port.pop().unwrap();
        stager.run_step(t, &mut port, &mut Tracer::none());
        assert_eq!(port.len(), 1, "next old-epoch step is queued");

        stager.begin(request("daisy", 10_000.0, 75), &mut rng, &mut port, &mut Tracer::none());
        let new = stager.epoch();
        assert_ne!(old, new);
        assert!(stager.visible().iter().all(|i| i.epoch == new));

        // The leaked old ticket fires first, then the new generation drains.
        let stale = port.pop().unwrap();
        assert_eq!(stale.epoch, old);
        let before = stager.visible().len();
        assert_eq!(
            stager.run_step(stale, &mut port, &mut Tracer::none()),
            StepOutcome::Stale
        );
        assert_eq!(stager.visible().len(), before);

        drain(&mut stager, &mut port);
        assert_eq!(stager.phase(), Phase::Complete);
        assert!(stager.visible().iter().all(|i| i.epoch == new));
        assert_eq!(stager.visible().len(), 75);
    }

    #[test]
    fn duplicate_ticket_is_stale() {
        let mut stager = StagedScheduler::new(StagerConfig::web());
        let mut port = QueuedPort::new();
        let mut rng = SmallRng::seed_from_u64(5);

        stager.begin(request("emo", 20_000.0, 200), &mut rng, &mut port, &mut Tracer::none());
        let t = port.pop().unwrap();
        assert!(matches!(
            stager.run_step(t, &mut port, &mut Tracer::none()),
            StepOutcome::Revealed { .. }
        ));
        let len = stager.visible().len();
        assert_eq!(
            stager.run_step(t, &mut port, &mut Tracer::none()),
            StepOutcome::Stale
        );
        assert_eq!(stager.visible().len(), len);
    }

    #[test]
    fn teardown_clears_and_invalidates() {
        let mut stager = StagedScheduler::new(StagerConfig::web());
        let mut port = QueuedPort::new();
        port.leak_cancelled(true);
        let mut rng = SmallRng::seed_from_u64(6);

        stager.begin(request("emo", 20_000.0, 200), &mut rng, &mut port, &mut Tracer::none());
        stager.teardown(TeardownReason::NoDecor, &mut port, &mut Tracer::none());
        assert_eq!(stager.phase(), Phase::Idle);
        assert!(stager.visible().is_empty());
        assert!(stager.generation().is_none());

        drain(&mut stager, &mut port);
        assert!(stager.visible().is_empty());
        assert_eq!(stager.phase(), Phase::Idle);
    }

    #[test]
    fn teardown_when_idle_is_a_no_op() {
        let mut stager = StagedScheduler::new(StagerConfig::web());
        let mut port = QueuedPort::new();
        let epoch = stager.epoch();
        stager.teardown(TeardownReason::Unmount, &mut port, &mut Tracer::none());
        assert_eq!(stager.epoch(), epoch);
        assert_eq!(port.cancellations(), 0);
    }

    #[test]
    fn zero_batch_size_still_makes_progress() {
        let mut stager = StagedScheduler::new(StagerConfig {
            above_fold_height: 0.0,
            batch_size: 0,
        });
        let mut port = QueuedPort::new();
        let mut rng = SmallRng::seed_from_u64(7);

        stager.begin(request("x", 1_000.0, 4), &mut rng, &mut port, &mut Tracer::none());
        assert!(stager.visible().is_empty());
        assert_eq!(drain(&mut stager, &mut port), 4);
        assert_eq!(stager.visible().len(), 4);
    }

    #[test]
    fn batches_are_revealed_in_list_order() {
        let mut stager = StagedScheduler::new(StagerConfig {
            above_fold_height: 1200.0,
            batch_size: 7,
        });
        let mut port = QueuedPort::new();
        let mut rng = SmallRng::seed_from_u64(8);

        stager.begin(request("emo", 30_000.0, 100), &mut rng, &mut port, &mut Tracer::none());
        drain(&mut stager, &mut port);
        let ids: Vec<u32> = stager.visible().iter().map(|i| i.id).collect();
        let sorted: Vec<u32> = (0..100).collect();
        assert_eq!(ids, sorted);
    }
}
