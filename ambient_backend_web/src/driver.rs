// Copyright 2026 the Ambient Decor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wires the decoration core to a browser page.
//!
//! [`DecorDriver`] owns an [`AmbientDecor`] using an [`IdlePort`], a
//! [`DomSurface`] and a [`PageHeightObserver`]. Every input change and every
//! fired step ends with the surface being brought up to date.

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use core::cell::RefCell;

use ambient_core::config::ThemeRegistry;
use ambient_core::decor::AmbientDecor;
use ambient_core::epoch::StepTicket;
use ambient_core::stage::{Phase, StagerConfig, StepOutcome};
use ambient_core::surface::DecorSurface;
use ambient_core::trace::TraceSink;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Window};

use crate::height::PageHeightObserver;
use crate::port::{Dispatch, IdlePort, IdleSupport, PortTiming};
use crate::reduced_presentation_from_hash;
use crate::surface::{DomSurface, SurfaceConfig};

/// Settings for [`DecorDriver::mount`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DriverOptions {
    /// Reveal staging.
    pub stager: StagerConfig,
    /// Step delays.
    pub timing: PortTiming,
    /// Container presentation.
    pub surface: SurfaceConfig,
    /// Placement seed. Drawn from `Math.random()` when `None`.
    pub seed: Option<u64>,
}

struct Inner<R> {
    decor: AmbientDecor<R, IdlePort>,
    surface: DomSurface,
}

impl<R: ThemeRegistry> Inner<R> {
    fn step(&mut self, ticket: StepTicket) {
        if self.decor.step(ticket) != StepOutcome::Stale {
            self.present();
        }
    }

    fn present(&mut self) {
        let view = self.decor.view();
        self.surface.present(&view);
    }
}

/// A mounted decoration layer.
///
/// Dropping the driver cancels pending steps, removes every listener and
/// detaches the container.
pub struct DecorDriver<R: ThemeRegistry + 'static> {
    window: Window,
    inner: Rc<RefCell<Inner<R>>>,
    height: PageHeightObserver,
    on_resize: Closure<dyn FnMut()>,
    on_hash_change: Closure<dyn FnMut()>,
}

impl<R: ThemeRegistry + 'static> core::fmt::Debug for DecorDriver<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut d = f.debug_struct("DecorDriver");
        if let Ok(inner) = self.inner.try_borrow() {
            d.field("decor", &inner.decor).field("surface", &inner.surface);
        }
        d.field("height", &self.height).finish_non_exhaustive()
    }
}

impl<R: ThemeRegistry + 'static> DecorDriver<R> {
    /// Mounts a decoration layer for `theme` under `parent`.
    ///
    /// Reduced presentation starts from the current URL hash and follows
    /// `hashchange` afterwards. The page is measured once before returning.
    ///
    /// # Errors
    ///
    /// Fails if there is no `window` or document body, or if the browser
    /// rejects element creation or listener registration.
    pub fn mount(
        registry: R,
        theme: &str,
        parent: &Element,
        options: DriverOptions,
    ) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let surface = DomSurface::new(&window, parent, options.surface)?;
        let support = IdleSupport::detect();
        let seed = options
            .seed
            .unwrap_or_else(|| js_sys::Math::random().to_bits());

        let inner = Rc::new_cyclic(|weak: &Weak<RefCell<Inner<R>>>| {
            let weak = weak.clone();
            let dispatch: Dispatch = Rc::new(move |ticket: StepTicket| {
                if let Some(inner) = weak.upgrade()
                    && let Ok(mut inner) = inner.try_borrow_mut()
                {
                    inner.step(ticket);
                }
            });
            let port = IdlePort::new(support, options.timing, dispatch);
            RefCell::new(Inner {
                decor: AmbientDecor::new(registry, port, theme, seed)
                    .with_stager_config(options.stager),
                surface,
            })
        });

        let hash = window.location().hash()?;
        {
            let mut inner = inner.borrow_mut();
            inner
                .decor
                .set_reduced_presentation(reduced_presentation_from_hash(&hash));
            inner.present();
        }

        let weak = Rc::downgrade(&inner);
        let height = PageHeightObserver::new(&window, move |page_height| {
            with_inner(&weak, |inner| {
                inner.decor.set_page_height(page_height);
                inner.present();
            });
        })?;

        // Viewport width decides container visibility even when the height
        // stays put.
        let on_resize = {
            let weak = Rc::downgrade(&inner);
            Closure::wrap(Box::new(move || with_inner(&weak, Inner::present)) as Box<dyn FnMut()>)
        };
        window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;

        let on_hash_change = {
            let weak = Rc::downgrade(&inner);
            let window = window.clone();
            Closure::wrap(Box::new(move || {
                let Ok(hash) = window.location().hash() else {
                    return;
                };
                with_inner(&weak, |inner| {
                    inner
                        .decor
                        .set_reduced_presentation(reduced_presentation_from_hash(&hash));
                    inner.present();
                });
            }) as Box<dyn FnMut()>)
        };
        window.add_event_listener_with_callback(
            "hashchange",
            on_hash_change.as_ref().unchecked_ref(),
        )?;

        height.refresh();

        Ok(Self {
            window,
            inner,
            height,
            on_resize,
            on_hash_change,
        })
    }

    /// Switches the active theme.
    pub fn set_theme(&self, theme: &str) {
        self.update(|inner| inner.decor.set_theme(theme));
    }

    /// Forces reduced presentation on or off, overriding the URL hash until
    /// the next `hashchange`.
    pub fn set_reduced_presentation(&self, reduced: bool) {
        self.update(|inner| inner.decor.set_reduced_presentation(reduced));
    }

    /// Re-measures the page height.
    pub fn refresh_height(&self) {
        self.height.refresh();
    }

    /// Routes scheduler trace events to `sink`.
    ///
    /// Events are only emitted with this crate's `trace` feature enabled.
    pub fn set_trace_sink(&self, sink: Box<dyn TraceSink>) {
        if let Ok(mut inner) = self.inner.try_borrow_mut() {
            inner.decor.set_trace_sink(sink);
        }
    }

    /// Returns the scheduler phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.inner
            .try_borrow()
            .map_or(Phase::Idle, |inner| inner.decor.phase())
    }

    fn update(&self, f: impl FnOnce(&mut Inner<R>)) {
        if let Ok(mut inner) = self.inner.try_borrow_mut() {
            f(&mut inner);
            inner.present();
        }
    }
}

impl<R: ThemeRegistry + 'static> Drop for DecorDriver<R> {
    fn drop(&mut self) {
        _ = self
            .window
            .remove_event_listener_with_callback("resize", self.on_resize.as_ref().unchecked_ref());
        _ = self.window.remove_event_listener_with_callback(
            "hashchange",
            self.on_hash_change.as_ref().unchecked_ref(),
        );
        if let Ok(mut inner) = self.inner.try_borrow_mut() {
            inner.decor.unmount();
            inner.surface.detach();
        }
    }
}

fn with_inner<R: ThemeRegistry>(weak: &Weak<RefCell<Inner<R>>>, f: impl FnOnce(&mut Inner<R>)) {
    if let Some(inner) = weak.upgrade()
        && let Ok(mut inner) = inner.try_borrow_mut()
    {
        f(&mut inner);
    }
}
