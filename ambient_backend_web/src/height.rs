// Copyright 2026 the Ambient Decor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM page height observation.
//!
//! [`PageHeightObserver`] re-measures the page on window `resize` and
//! whenever a `ResizeObserver` reports that `document.body` changed size. A
//! measurement is a [`PageMetrics`] snapshot; the core [`HeightTracker`]
//! filters out the ones that did not move the height.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::RefCell;

use ambient_core::height::{HeightTracker, PageMetrics};
use kurbo::Rect;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{ResizeObserver, Window};

/// Takes a [`PageMetrics`] snapshot of the window's document.
///
/// The landmark is the first `<footer>` in the document. Returns `None` if
/// the window has no document.
#[must_use]
pub fn measure(window: &Window) -> Option<PageMetrics> {
    let document = window.document()?;
    let landmark = document
        .query_selector("footer")
        .ok()
        .flatten()
        .map(|footer| {
            let r = footer.get_bounding_client_rect();
            Rect::new(r.left(), r.top(), r.right(), r.bottom())
        });
    let scroll_y = window.scroll_y().unwrap_or(0.0);
    let body_height = document
        .body()
        .map_or(0.0, |body| f64::from(body.offset_height()));
    Some(PageMetrics {
        landmark,
        scroll_y,
        body_height,
    })
}

struct ObserverState {
    window: Window,
    tracker: HeightTracker,
    on_change: Box<dyn FnMut(f64)>,
}

impl ObserverState {
    fn refresh(&mut self) {
        let Some(metrics) = measure(&self.window) else {
            return;
        };
        if let Some(height) = self.tracker.observe(&metrics) {
            (self.on_change)(height);
        }
    }
}

/// Watches the page and reports page height changes.
///
/// Listeners are removed and the `ResizeObserver` disconnected on drop.
pub struct PageHeightObserver {
    state: Rc<RefCell<ObserverState>>,
    resize_observer: ResizeObserver,
    on_resize: Closure<dyn FnMut()>,
    _on_observe: Closure<dyn FnMut()>,
}

impl core::fmt::Debug for PageHeightObserver {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PageHeightObserver")
            .field("height", &self.height())
            .finish_non_exhaustive()
    }
}

impl PageHeightObserver {
    /// Subscribes to resize notifications for `window`.
    ///
    /// `on_change` receives each new height. Nothing is measured until the
    /// first notification or [`refresh`](Self::refresh).
    ///
    /// # Errors
    ///
    /// Fails if the window has no document body, or if the browser rejects
    /// the listener or the `ResizeObserver`.
    pub fn new(window: &Window, on_change: impl FnMut(f64) + 'static) -> Result<Self, JsValue> {
        let body = window
            .document()
            .and_then(|d| d.body())
            .ok_or_else(|| JsValue::from_str("no document body"))?;

        let state = Rc::new(RefCell::new(ObserverState {
            window: window.clone(),
            tracker: HeightTracker::new(),
            on_change: Box::new(on_change),
        }));

        let on_resize = refresh_closure(&state);
        window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;

        let on_observe = refresh_closure(&state);
        let resize_observer = ResizeObserver::new(on_observe.as_ref().unchecked_ref())?;
        resize_observer.observe(&body);

        Ok(Self {
            state,
            resize_observer,
            on_resize,
            _on_observe: on_observe,
        })
    }

    /// Measures now, reporting the height if it changed.
    pub fn refresh(&self) {
        if let Ok(mut state) = self.state.try_borrow_mut() {
            state.refresh();
        }
    }

    /// Returns the last reported height, or 0 before the first measurement.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.state
            .try_borrow()
            .map_or(0.0, |state| state.tracker.height())
    }
}

impl Drop for PageHeightObserver {
    fn drop(&mut self) {
        self.resize_observer.disconnect();
        if let Ok(state) = self.state.try_borrow() {
            _ = state.window.remove_event_listener_with_callback(
                "resize",
                self.on_resize.as_ref().unchecked_ref(),
            );
        }
    }
}

fn refresh_closure(state: &Rc<RefCell<ObserverState>>) -> Closure<dyn FnMut()> {
    let state = Rc::clone(state);
    Closure::wrap(Box::new(move || {
        // A notification that arrives while a measurement is being reported
        // is dropped; the in-flight one already saw the latest layout.
        if let Ok(mut state) = state.try_borrow_mut() {
            state.refresh();
        }
    }) as Box<dyn FnMut()>)
}
