// Copyright 2026 the Ambient Decor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM decoration surface.
//!
//! Renders a [`DecorView`] as absolutely positioned children of a single
//! container `<div>` that spans the page behind the content.

use alloc::format;
use alloc::string::String;

use ambient_core::epoch::Epoch;
use ambient_core::generate::DecorationItem;
use ambient_core::surface::{DecorSurface, DecorView};
use wasm_bindgen::JsCast as _;
use wasm_bindgen::JsValue;
use web_sys::{Document, Element, HtmlElement, Window};

/// Presentation settings for [`DomSurface`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceConfig {
    /// Below this viewport width, in CSS pixels, the layer is hidden.
    ///
    /// Only the container is hidden; items keep being revealed so the layer
    /// is complete if the viewport widens.
    pub min_viewport_width: f64,
}

impl SurfaceConfig {
    /// Default settings for a content page.
    #[must_use]
    pub const fn web() -> Self {
        Self {
            min_viewport_width: 768.0,
        }
    }
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self::web()
    }
}

/// Keeps a container element in sync with the visible decorations.
///
/// Within an epoch the visible list only grows, so each
/// [`present`](DecorSurface::present) appends just the items it has not drawn
/// yet. A new epoch empties the container first.
pub struct DomSurface {
    window: Window,
    document: Document,
    container: HtmlElement,
    config: SurfaceConfig,
    epoch: Option<Epoch>,
    drawn: usize,
}

impl core::fmt::Debug for DomSurface {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomSurface")
            .field("container", &"HtmlElement")
            .field("config", &self.config)
            .field("epoch", &self.epoch)
            .field("drawn", &self.drawn)
            .finish_non_exhaustive()
    }
}

impl DomSurface {
    /// Creates the decoration container and appends it to `parent`.
    ///
    /// `parent` should be the positioned ancestor the page content lives in,
    /// usually `document.body`.
    ///
    /// # Errors
    ///
    /// Fails if `window` has no document or the container cannot be created
    /// or attached.
    pub fn new(window: &Window, parent: &Element, config: SurfaceConfig) -> Result<Self, JsValue> {
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let container: HtmlElement = document.create_element("div")?.unchecked_into();
        container.set_attribute("aria-hidden", "true")?;
        let s = container.style();
        let _ = s.set_property("position", "absolute");
        let _ = s.set_property("top", "0");
        let _ = s.set_property("left", "0");
        let _ = s.set_property("width", "100%");
        let _ = s.set_property("height", "0");
        let _ = s.set_property("overflow", "hidden");
        let _ = s.set_property("pointer-events", "none");
        let _ = s.set_property("display", "none");
        parent.append_child(&container)?;

        Ok(Self {
            window: window.clone(),
            document,
            container,
            config,
            epoch: None,
            drawn: 0,
        })
    }

    /// Returns the container element.
    #[must_use]
    pub fn container(&self) -> &HtmlElement {
        &self.container
    }

    /// Returns how many items are currently drawn.
    #[must_use]
    pub fn drawn(&self) -> usize {
        self.drawn
    }

    /// Removes the container from the document.
    pub fn detach(&mut self) {
        self.clear();
        self.container.remove();
    }

    fn clear(&mut self) {
        self.container.set_inner_html("");
        self.epoch = None;
        self.drawn = 0;
    }

    fn wide_enough(&self) -> bool {
        self.window
            .inner_width()
            .ok()
            .and_then(|w| w.as_f64())
            .is_none_or(|w| w >= self.config.min_viewport_width)
    }

    fn create_item(&self, item: &DecorationItem) -> Result<HtmlElement, JsValue> {
        let el: HtmlElement = self.document.create_element("div")?.unchecked_into();
        el.set_attribute("data-decor-key", &render_key(item))?;
        let s = el.style();
        let _ = s.set_property("position", "absolute");
        let _ = s.set_property("top", &format!("{}px", item.top));
        let _ = s.set_property("left", &format!("{}%", item.left));
        let _ = s.set_property("width", &format!("{}px", item.size));
        let _ = s.set_property("height", &format!("{}px", item.size));
        let _ = s.set_property("opacity", &format!("{}", item.opacity));
        let _ = s.set_property("transform", &format!("rotate({}deg)", item.rotation));

        match &item.color {
            // Vector assets are single-color shapes: paint the color through
            // the asset as a mask.
            Some(color) => {
                let mask = format!("url(\"{}\") center / contain no-repeat", item.asset);
                let _ = s.set_property("background-color", color);
                let _ = s.set_property("mask", &mask);
                let _ = s.set_property("-webkit-mask", &mask);
            }
            None => {
                let img: HtmlElement = self.document.create_element("img")?.unchecked_into();
                img.set_attribute("src", &item.asset)?;
                img.set_attribute("alt", "")?;
                img.set_attribute("draggable", "false")?;
                img.set_attribute("decoding", "async")?;
                let is = img.style();
                let _ = is.set_property("width", "100%");
                let _ = is.set_property("height", "100%");
                let _ = is.set_property("object-fit", "contain");
                el.append_child(&img)?;
            }
        }
        Ok(el)
    }
}

impl DecorSurface for DomSurface {
    fn present(&mut self, view: &DecorView<'_>) {
        let s = self.container.style();
        if view.disabled || view.items.is_empty() {
            self.clear();
            let _ = s.set_property("display", "none");
            return;
        }

        if self.epoch != Some(view.epoch) || self.drawn > view.items.len() {
            self.clear();
            self.epoch = Some(view.epoch);
        }

        let _ = s.set_property("z-index", &format!("{}", view.z_index));
        let _ = s.set_property("height", &format!("{}px", view.page_height));
        let _ = s.set_property("display", if self.wide_enough() { "block" } else { "none" });

        for item in &view.items[self.drawn..] {
            // Stop at the first failure; the next present retries from here.
            let Ok(el) = self.create_item(item) else {
                break;
            };
            if self.container.append_child(&el).is_err() {
                break;
            }
            self.drawn += 1;
        }
    }
}

fn render_key(item: &DecorationItem) -> String {
    let (epoch, id) = item.key();
    format!("{}-{id}", epoch.0)
}
