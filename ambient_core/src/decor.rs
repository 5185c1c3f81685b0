// Copyright 2026 the Ambient Decor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reactive orchestration of the decoration layer.
//!
//! [`AmbientDecor`] is what hosts hold on to. It is fed the three signals the
//! layer depends on (active theme, page height, reduced-presentation mode),
//! decides after each change whether a new generation is needed, and owns the
//! [`StagedScheduler`], the [`StepPort`] and the RNG that generation uses.
//!
//! Decorations are on when the theme resolves to a config, the page height
//! is positive, and reduced presentation is off. Any change of theme or
//! height while on restarts the generation; switching off tears it down.

use alloc::boxed::Box;
use alloc::string::String;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::config::{DecorConfig, ThemeRegistry};
use crate::epoch::StepTicket;
use crate::stage::{
    GenerationRequest, Phase, StagedScheduler, StagerConfig, StepOutcome, TeardownReason,
};
use crate::surface::DecorView;
use crate::trace::{TraceSink, Tracer};

/// Decoration layer state for one page.
pub struct AmbientDecor<R, P> {
    registry: R,
    port: P,
    stager: StagedScheduler,
    rng: SmallRng,
    theme: String,
    config: Option<DecorConfig>,
    page_height: f64,
    reduced: bool,
    sink: Option<Box<dyn TraceSink>>,
}

impl<R, P> core::fmt::Debug for AmbientDecor<R, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AmbientDecor")
            .field("theme", &self.theme)
            .field("page_height", &self.page_height)
            .field("reduced", &self.reduced)
            .field("phase", &self.stager.phase())
            .field("epoch", &self.stager.epoch())
            .field("visible", &self.stager.visible().len())
            .finish_non_exhaustive()
    }
}

impl<R: ThemeRegistry, P: crate::port::StepPort> AmbientDecor<R, P> {
    /// Creates an idle layer for `theme`.
    ///
    /// Nothing is generated until a positive page height arrives. `seed`
    /// seeds placement randomness.
    pub fn new(registry: R, port: P, theme: &str, seed: u64) -> Self {
        let config = registry.resolve(theme);
        Self {
            registry,
            port,
            stager: StagedScheduler::new(StagerConfig::web()),
            rng: SmallRng::seed_from_u64(seed),
            theme: String::from(theme),
            config,
            page_height: 0.0,
            reduced: false,
            sink: None,
        }
    }

    /// Replaces the scheduler configuration. An in-flight generation is torn
    /// down; epochs keep counting, so its tickets stay stale.
    #[must_use]
    pub fn with_stager_config(mut self, config: StagerConfig) -> Self {
        let mut tracer = tracer(&mut self.sink);
        self.stager
            .teardown(TeardownReason::Unmount, &mut self.port, &mut tracer);
        self.stager.set_config(config);
        self
    }

    /// Routes scheduler trace events to `sink`.
    ///
    /// Events are only emitted with the `trace` feature enabled.
    pub fn set_trace_sink(&mut self, sink: Box<dyn TraceSink>) {
        self.sink = Some(sink);
    }

    /// Switches the active theme.
    pub fn set_theme(&mut self, theme: &str) {
        if theme == self.theme {
            return;
        }
        self.theme = String::from(theme);
        self.config = self.registry.resolve(theme);
        self.reconcile();
    }

    /// Records a new page height.
    pub fn set_page_height(&mut self, page_height: f64) {
        if page_height == self.page_height {
            return;
        }
        self.page_height = page_height;
        self.reconcile();
    }

    /// Switches reduced-presentation mode on or off.
    pub fn set_reduced_presentation(&mut self, reduced: bool) {
        if reduced == self.reduced {
            return;
        }
        self.reduced = reduced;
        self.reconcile();
    }

    /// Delivers a step the port scheduled earlier.
    pub fn step(&mut self, ticket: StepTicket) -> StepOutcome {
        let mut tracer = tracer(&mut self.sink);
        self.stager.run_step(ticket, &mut self.port, &mut tracer)
    }

    /// Tears the layer down; it stays idle until the next input change.
    pub fn unmount(&mut self) {
        let mut tracer = tracer(&mut self.sink);
        self.stager
            .teardown(TeardownReason::Unmount, &mut self.port, &mut tracer);
    }

    /// Returns what the surface should show right now.
    #[must_use]
    pub fn view(&self) -> DecorView<'_> {
        let disabled = self.is_disabled();
        match (&self.config, self.stager.generation()) {
            (Some(config), Some(generation)) if !disabled => DecorView {
                epoch: generation.epoch(),
                items: self.stager.visible(),
                z_index: config.z_index,
                page_height: generation.page_height(),
                disabled,
            },
            _ => DecorView::empty(self.stager.epoch(), disabled),
        }
    }

    /// Returns `true` when the active theme or mode has decorations off.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.reduced || self.config.is_none()
    }

    /// Returns the scheduler phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.stager.phase()
    }

    /// Returns the staged scheduler.
    #[must_use]
    pub fn stager(&self) -> &StagedScheduler {
        &self.stager
    }

    /// Returns the active theme id.
    #[must_use]
    pub fn theme(&self) -> &str {
        &self.theme
    }

    /// Returns the scheduling port.
    #[must_use]
    pub fn port(&self) -> &P {
        &self.port
    }

    /// Returns the scheduling port mutably, e.g. to pump a queued port.
    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    fn reconcile(&mut self) {
        let mut tracer = tracer(&mut self.sink);
        let off = if self.reduced {
            Some(TeardownReason::ReducedPresentation)
        } else if self.config.is_none() {
            Some(TeardownReason::NoDecor)
        } else if !self.page_height.is_finite() || self.page_height <= 0.0 {
            Some(TeardownReason::NoHeight)
        } else {
            None
        };

        if let Some(reason) = off {
            self.stager.teardown(reason, &mut self.port, &mut tracer);
            return;
        }
        let Some(config) = &self.config else {
            return;
        };
        if let Some(current) = self.stager.generation()
            && current.theme() == self.theme
            && current.page_height() == self.page_height
        {
            return;
        }
        self.stager.begin(
            GenerationRequest {
                theme: &self.theme,
                page_height: self.page_height,
                config: config.clone(),
            },
            &mut self.rng,
            &mut self.port,
            &mut tracer,
        );
    }
}

fn tracer(sink: &mut Option<Box<dyn TraceSink>>) -> Tracer<'_> {
    match sink {
        Some(sink) => Tracer::new(&mut **sink),
        None => Tracer::none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::epoch::Epoch;
    use crate::port::QueuedPort;
    use crate::presets::BuiltinThemes;

    fn decor(theme: &str) -> AmbientDecor<BuiltinThemes, QueuedPort> {
        AmbientDecor::new(BuiltinThemes::new(), QueuedPort::new(), theme, 0x5eed)
    }

    fn pump(decor: &mut AmbientDecor<BuiltinThemes, QueuedPort>) {
        while let Some(ticket) = decor.port_mut().pop() {
            decor.step(ticket);
        }
    }

    #[test]
    fn waits_for_page_height() {
        let decor = decor("emo");
        assert_eq!(decor.phase(), Phase::Idle);
        assert!(decor.view().items.is_empty());
        assert!(!decor.view().disabled);
    }

    #[test]
    fn height_starts_generation_and_pump_completes_it() {
        let mut decor = decor("emo");
        decor.set_page_height(9_000.0);
        assert_eq!(decor.phase(), Phase::BatchDraining);
        let view = decor.view();
        assert!(view.items.iter().all(|i| i.top < 1200.0));
        assert_eq!(view.z_index, 1);
        assert_eq!(view.page_height, 9_000.0);

        pump(&mut decor);
        assert_eq!(decor.phase(), Phase::Complete);
        assert_eq!(decor.view().items.len(), 200);
    }

    #[test]
    fn theme_without_decor_is_disabled() {
        let mut decor = decor("midnight");
        decor.set_page_height(5_000.0);
        assert_eq!(decor.phase(), Phase::Idle);
        assert!(decor.view().disabled);
        assert!(decor.view().items.is_empty());
    }

    #[test]
    fn switching_to_undecorated_theme_mid_drain_goes_idle() {
        let mut decor = decor("emo");
        decor.port_mut().leak_cancelled(true);
        decor.set_page_height(9_000.0);
        let first = decor.port_mut().pop().unwrap();
        decor.step(first);
        assert_eq!(decor.phase(), Phase::BatchDraining);

        decor.set_theme("midnight");
        assert_eq!(decor.phase(), Phase::Idle);
        assert!(decor.view().items.is_empty());
        assert!(decor.view().disabled);

        // The old step still fires but changes nothing.
        let leaked = decor.port_mut().pop().unwrap();
        assert_eq!(decor.step(leaked), StepOutcome::Stale);
        assert!(decor.view().items.is_empty());
        assert_eq!(decor.phase(), Phase::Idle);
    }

    #[test]
    fn height_change_restarts_with_new_epoch() {
        let mut decor = decor("daisy");
        decor.set_page_height(8_000.0);
        let first = decor.view().epoch;

        decor.set_page_height(12_000.0);
        let second = decor.view().epoch;
        assert_ne!(first, second);
        pump(&mut decor);
        let view = decor.view();
        assert!(view.items.iter().all(|i| i.epoch == second));
        assert!(view.items.iter().all(|i| i.top < 12_000.0));
        assert_eq!(view.items.len(), 75);
    }

    #[test]
    fn unchanged_inputs_do_not_restart() {
        let mut decor = decor("daisy");
        decor.set_page_height(8_000.0);
        let epoch = decor.view().epoch;
        decor.set_page_height(8_000.0);
        decor.set_theme("daisy");
        assert_eq!(decor.view().epoch, epoch);
    }

    #[test]
    fn reduced_presentation_tears_down_and_restores() {
        let mut decor = decor("rainbow");
        decor.set_page_height(4_000.0);
        pump(&mut decor);
        assert_eq!(decor.phase(), Phase::Complete);

        decor.set_reduced_presentation(true);
        assert_eq!(decor.phase(), Phase::Idle);
        assert!(decor.view().disabled);
        assert!(decor.view().items.is_empty());

        decor.set_reduced_presentation(false);
        pump(&mut decor);
        assert_eq!(decor.phase(), Phase::Complete);
        assert_eq!(decor.view().items.len(), 12);
    }

    #[test]
    fn zero_height_after_generation_tears_down() {
        let mut decor = decor("rainbow");
        decor.set_page_height(4_000.0);
        decor.set_page_height(0.0);
        assert_eq!(decor.phase(), Phase::Idle);
        assert!(!decor.view().disabled);
        assert!(decor.view().items.is_empty());
    }

    #[test]
    fn infinite_height_is_no_height() {
        let mut decor = decor("emo");
        decor.set_page_height(f64::INFINITY);
        assert_eq!(decor.phase(), Phase::Idle);
        assert!(decor.port().is_empty());
        assert!(decor.view().items.is_empty());

        decor.set_page_height(9_000.0);
        decor.set_page_height(f64::INFINITY);
        assert_eq!(decor.phase(), Phase::Idle);
        assert!(decor.view().items.is_empty());
    }

    #[test]
    fn replacing_stager_config_keeps_old_tickets_stale() {
        let mut decor = decor("emo");
        decor.port_mut().leak_cancelled(true);
        decor.set_page_height(9_000.0);
        let old = decor.port_mut().pop().unwrap();
        let old_epoch = decor.view().epoch;

        let mut decor = decor.with_stager_config(StagerConfig::web());
        decor.set_page_height(9_500.0);
        assert_ne!(decor.view().epoch, old_epoch);
        let visible = decor.view().items.len();

        assert_eq!(decor.step(old), StepOutcome::Stale);
        assert_eq!(decor.view().items.len(), visible);
        assert_eq!(decor.phase(), Phase::BatchDraining);
    }

    #[test]
    fn unmount_cancels_pending_steps() {
        let mut decor = decor("emo");
        decor.set_page_height(9_000.0);
        assert_eq!(decor.port().len(), 1);
        decor.unmount();
        assert!(decor.port().is_empty());
        assert_eq!(decor.phase(), Phase::Idle);
        assert_ne!(decor.view().epoch, Epoch(1));
    }
}
