// Copyright 2026 the Ambient Decor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Presentation contract for decoration layers.

use crate::epoch::Epoch;
use crate::generate::DecorationItem;

/// What a surface should currently show.
#[derive(Clone, Copy, Debug)]
pub struct DecorView<'a> {
    /// Epoch of the items in `items`.
    pub epoch: Epoch,
    /// Revealed items. Within one epoch this only ever grows, by appending.
    pub items: &'a [DecorationItem],
    /// Paint order of the layer.
    pub z_index: i32,
    /// Height the layer spans.
    pub page_height: f64,
    /// `true` when decorations are off for the active theme or mode; the
    /// surface should render nothing at all.
    pub disabled: bool,
}

impl DecorView<'_> {
    /// A view with nothing to show.
    #[must_use]
    pub const fn empty(epoch: Epoch, disabled: bool) -> DecorView<'static> {
        DecorView {
            epoch,
            items: &[],
            z_index: 0,
            page_height: 0.0,
            disabled,
        }
    }
}

/// Renders a [`DecorView`] onto a platform presentation tree.
///
/// Surfaces are told the whole visible list every time; since the list only
/// grows within an epoch, an implementation can diff by length and rebuild
/// only when the epoch changes.
pub trait DecorSurface {
    /// Brings the presentation in line with `view`.
    fn present(&mut self, view: &DecorView<'_>);
}
