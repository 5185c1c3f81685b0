// Copyright 2026 the Ambient Decor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Idle-time scheduling port.
//!
//! [`IdlePort`] defers each batch step with [`requestIdleCallback`][mdn] where the
//! browser has it, and with a fixed `setTimeout` delay where it does not. The
//! choice is made once, by [`IdleSupport::detect`], when the port is built.
//!
//! The first step of a generation always waits one timer delay, so the
//! immediate band gets a chance to paint before any batch competes with it.
//!
//! [mdn]: https://developer.mozilla.org/en-US/docs/Web/API/Window/requestIdleCallback

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::Cell;

use ambient_core::epoch::StepTicket;
use ambient_core::port::StepPort;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

// Direct global bindings, as with `performance.now()`: no Window lookup per
// scheduled step.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = "requestIdleCallback")]
    fn request_idle_callback(callback: &JsValue, options: &JsValue) -> u32;

    #[wasm_bindgen(js_name = "cancelIdleCallback")]
    fn cancel_idle_callback(id: u32);

    #[wasm_bindgen(js_name = "setTimeout")]
    fn set_timeout(callback: &JsValue, delay_ms: u32) -> i32;

    #[wasm_bindgen(js_name = "clearTimeout")]
    fn clear_timeout(id: i32);
}

/// Delays used by [`IdlePort`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PortTiming {
    /// Timer delay between steps when idle callbacks are unavailable, and
    /// before the first step of every generation.
    pub batch_delay_ms: u32,
    /// Longest the browser may hold back an idle callback.
    pub idle_timeout_ms: u32,
}

impl PortTiming {
    /// Default timing for a content page.
    #[must_use]
    pub const fn web() -> Self {
        Self {
            batch_delay_ms: 50,
            idle_timeout_ms: 100,
        }
    }
}

impl Default for PortTiming {
    fn default() -> Self {
        Self::web()
    }
}

/// Which deferral primitive the host offers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdleSupport {
    /// `requestIdleCallback` is available.
    IdleCallback,
    /// Only `setTimeout` is available.
    Timer,
}

impl IdleSupport {
    /// Probes the global object for `requestIdleCallback`.
    #[must_use]
    pub fn detect() -> Self {
        let global = js_sys::global();
        match js_sys::Reflect::has(&global, &JsValue::from_str("requestIdleCallback")) {
            Ok(true) => Self::IdleCallback,
            _ => Self::Timer,
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Handle {
    Idle(u32),
    Timeout(i32),
}

struct Pending {
    handle: Handle,
    fired: Rc<Cell<bool>>,
    _closure: Closure<dyn FnMut()>,
}

/// Receives step tickets when their callback fires.
pub type Dispatch = Rc<dyn Fn(StepTicket)>;

/// A [`StepPort`] backed by browser idle callbacks or timers.
///
/// Every scheduled step owns a JS closure. Closures whose callback has run
/// are released on the next [`schedule`](StepPort::schedule); the rest are
/// released by [`cancel_pending`](StepPort::cancel_pending) or on drop.
pub struct IdlePort {
    support: IdleSupport,
    timing: PortTiming,
    dispatch: Dispatch,
    pending: Vec<Pending>,
}

impl core::fmt::Debug for IdlePort {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IdlePort")
            .field("support", &self.support)
            .field("timing", &self.timing)
            .field("pending", &self.pending.len())
            .finish_non_exhaustive()
    }
}

impl IdlePort {
    /// Creates a port that hands fired tickets to `dispatch`.
    #[must_use]
    pub fn new(support: IdleSupport, timing: PortTiming, dispatch: Dispatch) -> Self {
        Self {
            support,
            timing,
            dispatch,
            pending: Vec::new(),
        }
    }

    /// Returns the primitive this port schedules with.
    #[must_use]
    pub fn support(&self) -> IdleSupport {
        self.support
    }

    /// Returns the number of steps scheduled that have not run yet.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.iter().filter(|p| !p.fired.get()).count()
    }

    fn idle_options(&self) -> JsValue {
        let options = js_sys::Object::new();
        _ = js_sys::Reflect::set(
            &options,
            &JsValue::from_str("timeout"),
            &JsValue::from(self.timing.idle_timeout_ms),
        );
        options.into()
    }
}

impl StepPort for IdlePort {
    fn schedule(&mut self, ticket: StepTicket) {
        self.pending.retain(|p| !p.fired.get());

        let fired = Rc::new(Cell::new(false));
        let dispatch = Rc::clone(&self.dispatch);
        let flag = Rc::clone(&fired);
        let closure = Closure::wrap(Box::new(move || {
            // Marked only after dispatch returns: the step may schedule the
            // next one, and this closure must survive that prune.
            dispatch(ticket);
            flag.set(true);
        }) as Box<dyn FnMut()>);

        let callback: &JsValue = closure.as_ref();
        let handle = match self.support {
            IdleSupport::IdleCallback if ticket.batch > 0 => {
                Handle::Idle(request_idle_callback(callback, &self.idle_options()))
            }
            _ => Handle::Timeout(set_timeout(callback, self.timing.batch_delay_ms)),
        };

        self.pending.push(Pending {
            handle,
            fired,
            _closure: closure,
        });
    }

    fn cancel_pending(&mut self) {
        for pending in self.pending.drain(..) {
            if pending.fired.get() {
                continue;
            }
            match pending.handle {
                Handle::Idle(id) => cancel_idle_callback(id),
                Handle::Timeout(id) => clear_timeout(id),
            }
        }
    }
}

impl Drop for IdlePort {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
