// Copyright 2026 the Ambient Decor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The scheduling port deferred batches run through.
//!
//! The [`StagedScheduler`](crate::stage::StagedScheduler) never waits or
//! sleeps. When it wants the next batch revealed it hands a [`StepTicket`] to
//! a [`StepPort`]; when the port decides the moment has come (the browser is
//! idle, a timer elapsed, a test pumped the queue) the host passes the ticket
//! back to [`run_step`](crate::stage::StagedScheduler::run_step).
//!
//! Ports are chosen once at startup. Browser backends provide an
//! idle-callback port and a fixed-delay timer fallback; [`QueuedPort`] is for
//! hosts that drive steps themselves.
//!
//! Cancellation through [`StepPort::cancel_pending`] is best effort. A
//! platform callback may already be queued when the cancel arrives, which is
//! why the scheduler also checks each ticket's epoch.

use alloc::collections::VecDeque;

use crate::epoch::StepTicket;

/// Defers batch steps until the host has spare time.
pub trait StepPort {
    /// Arranges for `ticket` to be delivered back to the scheduler later.
    ///
    /// Must not deliver synchronously from inside this call.
    fn schedule(&mut self, ticket: StepTicket);

    /// Cancels every step scheduled so far that has not fired yet.
    fn cancel_pending(&mut self);
}

impl<P: StepPort + ?Sized> StepPort for &mut P {
    fn schedule(&mut self, ticket: StepTicket) {
        (**self).schedule(ticket);
    }

    fn cancel_pending(&mut self) {
        (**self).cancel_pending();
    }
}

/// A [`StepPort`] that queues tickets for the host to pump.
///
/// Useful for native hosts without an idle primitive and as a test double.
/// [`leak_cancelled`](Self::leak_cancelled) makes cancellation ineffective,
/// modelling a platform callback that was already in flight.
#[derive(Clone, Debug, Default)]
pub struct QueuedPort {
    queue: VecDeque<StepTicket>,
    leak_cancelled: bool,
    cancellations: u32,
}

impl QueuedPort {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes [`cancel_pending`](StepPort::cancel_pending) keep queued
    /// tickets, so they still fire after a restart.
    pub fn leak_cancelled(&mut self, leak: bool) {
        self.leak_cancelled = leak;
    }

    /// Removes and returns the oldest pending ticket.
    pub fn pop(&mut self) -> Option<StepTicket> {
        self.queue.pop_front()
    }

    /// Returns the number of pending tickets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns `true` if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns how many times pending steps were cancelled.
    #[must_use]
    pub fn cancellations(&self) -> u32 {
        self.cancellations
    }
}

impl StepPort for QueuedPort {
    fn schedule(&mut self, ticket: StepTicket) {
        self.queue.push_back(ticket);
    }

    fn cancel_pending(&mut self) {
        self.cancellations += 1;
        if !self.leak_cancelled {
            self.queue.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::epoch::Epoch;

    #[test]
    fn queue_is_fifo_and_cancellable() {
        let mut port = QueuedPort::new();
        port.schedule(StepTicket { epoch: Epoch(1), batch: 0 });
        port.schedule(StepTicket { epoch: Epoch(1), batch: 1 });
        assert_eq!(port.len(), 2);
        assert_eq!(port.pop().map(|t| t.batch), Some(0));

        port.cancel_pending();
        assert!(port.is_empty());
        assert_eq!(port.cancellations(), 1);
    }

    #[test]
    fn leaky_queue_keeps_cancelled_tickets() {
        let mut port = QueuedPort::new();
        port.leak_cancelled(true);
        port.schedule(StepTicket { epoch: Epoch(1), batch: 0 });
        port.cancel_pending();
        assert_eq!(port.len(), 1);
    }
}
