// Copyright 2026 the Ambient Decor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Constrained random placement of decoration items.
//!
//! [`generate`] divides the page into equal-height sections, one per item, and
//! drops each item somewhere in the upper 60% of its own section. Items
//! alternate between the left and right horizontal bands, so the layout stays
//! evenly spread down both margins no matter how the dice fall.
//!
//! The item count is deterministic ([`item_count`]); everything else is drawn
//! from the supplied RNG.

use alloc::sync::Arc;
use alloc::vec::Vec;

use rand::Rng;

use crate::config::{AssetSet, DecorConfig};
use crate::epoch::Epoch;

/// Height, in logical pixels, that `items_per_section` is measured against.
pub const SECTION_HEIGHT: f64 = 400.0;

/// Upper bound on the items of one generation, whatever the page height.
pub const MAX_ITEMS: u32 = 4_096;

/// Fraction of each item's section its `top` may fall in.
const PLACEMENT_BIAS: f64 = 0.6;

/// A placed decoration.
#[derive(Clone, Debug, PartialEq)]
pub struct DecorationItem {
    /// Position in the generation's item list; stable within a generation.
    pub id: u32,
    /// Generation this item belongs to.
    pub epoch: Epoch,
    /// Asset reference.
    pub asset: Arc<str>,
    /// Recolor value, for vector assets only.
    pub color: Option<Arc<str>>,
    /// Offset from the top of the page, logical pixels.
    pub top: f64,
    /// Offset from the left edge, percent of viewport width.
    pub left: f64,
    /// Edge length, logical pixels.
    pub size: f64,
    /// Rotation, degrees.
    pub rotation: f64,
    /// Opacity, 0–1.
    pub opacity: f64,
}

impl DecorationItem {
    /// Returns the key a surface should render this item under.
    ///
    /// Keys are unique across generations, so a surface never mistakes an
    /// item of a new layout for one it already drew.
    #[must_use]
    pub const fn key(&self) -> (Epoch, u32) {
        (self.epoch, self.id)
    }
}

/// Which horizontal band an item is placed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// Even-indexed items.
    Left,
    /// Odd-indexed items.
    Right,
}

impl Side {
    /// Returns the side for the item at `index`.
    #[inline]
    #[must_use]
    pub const fn for_index(index: u32) -> Self {
        if index % 2 == 0 { Self::Left } else { Self::Right }
    }
}

/// Returns how many items a page of `page_height` gets.
///
/// `max(min_items, floor(page_height / (400 / items_per_section)))`, capped at
/// [`MAX_ITEMS`]. Heights that are zero, negative, NaN or infinite fall back to
/// `min_items`.
#[must_use]
pub fn item_count(config: &DecorConfig, page_height: f64) -> u32 {
    if !page_height.is_finite() {
        return config.min_items.min(MAX_ITEMS);
    }
    let band = SECTION_HEIGHT / config.items_per_section;
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "float-to-int casts saturate; truncation is the floor for non-negative values"
    )]
    let by_height = (page_height / band) as u32;
    by_height.max(config.min_items).min(MAX_ITEMS)
}

/// Generates the full item list for one generation.
///
/// Items come back in ascending `top` order. With a non-positive or
/// non-finite `page_height` every item sits at `top == 0`.
#[must_use]
pub fn generate<R: Rng + ?Sized>(
    config: &DecorConfig,
    page_height: f64,
    epoch: Epoch,
    rng: &mut R,
) -> Vec<DecorationItem> {
    let count = item_count(config, page_height);
    if count == 0 {
        return Vec::new();
    }
    let section = if page_height.is_finite() {
        (page_height / f64::from(count)).max(0.0)
    } else {
        0.0
    };

    (0..count)
        .map(|i| {
            let band = match Side::for_index(i) {
                Side::Left => config.left_edge,
                Side::Right => config.right_edge,
            };
            let section_start = f64::from(i) * section;
            let (asset, color) = pick_asset(&config.assets, rng);
            DecorationItem {
                id: i,
                epoch,
                asset,
                color,
                top: section_start + unit(rng) * section * PLACEMENT_BIAS,
                left: band.lerp(unit(rng)),
                size: config.size.lerp(unit(rng)),
                rotation: config.rotation.lerp(unit(rng)),
                opacity: config.opacity.lerp(unit(rng)),
            }
        })
        .collect()
}

/// Draws a uniform sample from `[0, 1)`.
#[inline]
fn unit<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.random::<f64>()
}

fn pick_asset<R: Rng + ?Sized>(set: &AssetSet, rng: &mut R) -> (Arc<str>, Option<Arc<str>>) {
    match set {
        AssetSet::Raster { assets } => (pick(assets, rng), None),
        // Asset and color are drawn independently.
        AssetSet::Vector { assets, colors } => (pick(assets, rng), Some(pick(colors, rng))),
    }
}

/// Picks one element of a non-empty list.
fn pick<R: Rng + ?Sized>(list: &[Arc<str>], rng: &mut R) -> Arc<str> {
    Arc::clone(&list[rng.random_range(0..list.len())])
}
