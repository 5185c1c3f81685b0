// Copyright 2026 the Ambient Decor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Generation epochs and step tickets.

use core::fmt;

/// Identifies one generation of decorations.
///
/// The scheduler mints a fresh epoch every time it starts or tears down a
/// generation. Work tagged with an older epoch is inert.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Epoch(pub u64);

impl Epoch {
    /// Returns the epoch that follows this one.
    #[inline]
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Debug for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Epoch({})", self.0)
    }
}

/// A deferred batch step handed to a [`StepPort`](crate::port::StepPort).
///
/// The port hands the ticket back to
/// [`StagedScheduler::run_step`](crate::stage::StagedScheduler::run_step)
/// when it fires. Tickets from a superseded epoch do nothing.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct StepTicket {
    /// Epoch the step was scheduled under.
    pub epoch: Epoch,
    /// Zero-based index of the batch this step reveals.
    pub batch: u32,
}

impl fmt::Debug for StepTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StepTicket({}#{})", self.epoch.0, self.batch)
    }
}
