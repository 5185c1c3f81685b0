// Copyright 2026 the Ambient Decor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decoration configuration and per-theme resolution.
//!
//! A theme opts into decorations by publishing a [`PartialDecorConfig`]: an
//! asset set plus whichever numeric parameters it wants to override.
//! [`resolve`] merges those overrides over [`DecorConfig::BASELINE`] and
//! produces the immutable [`DecorConfig`] a generation is built from.
//!
//! Themes reach the resolver through the [`ThemeRegistry`] trait, so the
//! registry can be the [built-in presets](crate::presets), a map loaded at
//! startup, or anything else the host keeps around.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

/// An inclusive `[min, max]` range a randomized attribute is drawn from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Span {
    /// Lower bound (inclusive).
    pub min: f64,
    /// Upper bound (inclusive).
    pub max: f64,
}

impl Span {
    /// Creates a span, swapping the bounds if they are given in reverse.
    #[must_use]
    pub const fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    /// Creates a span that always yields `value`.
    #[must_use]
    pub const fn fixed(value: f64) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    /// Returns `true` if `value` lies within the span.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    /// Maps a unit sample `t ∈ [0, 1)` into the span.
    #[inline]
    #[must_use]
    pub fn lerp(&self, t: f64) -> f64 {
        self.min + t * (self.max - self.min)
    }
}

/// The artwork a theme scatters, and how it is painted.
///
/// Both variants hold at least one asset, and vector sets at least one
/// recolor value; the constructors return `None` otherwise.
#[derive(Clone, Debug, PartialEq)]
pub enum AssetSet {
    /// Bitmap images drawn as-is.
    Raster {
        /// Image references (URLs or paths).
        assets: Vec<Arc<str>>,
    },
    /// Vector images recolored per item.
    Vector {
        /// Vector image references (URLs or paths).
        assets: Vec<Arc<str>>,
        /// CSS color values an item's fill is drawn from.
        colors: Vec<Arc<str>>,
    },
}

impl AssetSet {
    /// Creates a raster set, or `None` if `assets` is empty.
    #[must_use]
    pub fn raster<I, S>(assets: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        let assets: Vec<Arc<str>> = assets.into_iter().map(Into::into).collect();
        (!assets.is_empty()).then_some(Self::Raster { assets })
    }

    /// Creates a vector set, or `None` if either list is empty.
    #[must_use]
    pub fn vector<I, S, C, T>(assets: I, colors: C) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
        C: IntoIterator<Item = T>,
        T: Into<Arc<str>>,
    {
        let assets: Vec<Arc<str>> = assets.into_iter().map(Into::into).collect();
        let colors: Vec<Arc<str>> = colors.into_iter().map(Into::into).collect();
        (!assets.is_empty() && !colors.is_empty()).then_some(Self::Vector { assets, colors })
    }

    /// Returns the asset references.
    #[must_use]
    pub fn assets(&self) -> &[Arc<str>] {
        match self {
            Self::Raster { assets } | Self::Vector { assets, .. } => assets,
        }
    }

    /// Returns the recolor values (empty for raster sets).
    #[must_use]
    pub fn colors(&self) -> &[Arc<str>] {
        match self {
            Self::Raster { .. } => &[],
            Self::Vector { colors, .. } => colors,
        }
    }

    /// Returns `true` for vector sets.
    #[must_use]
    pub fn is_vector(&self) -> bool {
        matches!(self, Self::Vector { .. })
    }
}

/// Resolved decoration parameters for one theme.
///
/// Produced by [`resolve`] and never mutated afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct DecorConfig {
    /// Items per 400 logical pixels of page height.
    pub items_per_section: f64,
    /// Minimum item count regardless of page height.
    pub min_items: u32,
    /// Edge length in logical pixels.
    pub size: Span,
    /// Opacity, 0 (invisible) to 1 (opaque).
    pub opacity: Span,
    /// Rotation in degrees.
    pub rotation: Span,
    /// Horizontal band for even-indexed items, percent of viewport width.
    ///
    /// Values below 0 or above 100 place items partly off-screen.
    pub left_edge: Span,
    /// Horizontal band for odd-indexed items, percent of viewport width.
    pub right_edge: Span,
    /// Paint order of the decoration layer.
    pub z_index: i32,
    /// What gets drawn.
    pub assets: AssetSet,
}

/// The numeric part of [`DecorConfig`] shared by every theme.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Baseline {
    /// See [`DecorConfig::items_per_section`].
    pub items_per_section: f64,
    /// See [`DecorConfig::min_items`].
    pub min_items: u32,
    /// See [`DecorConfig::size`].
    pub size: Span,
    /// See [`DecorConfig::opacity`].
    pub opacity: Span,
    /// See [`DecorConfig::rotation`].
    pub rotation: Span,
    /// See [`DecorConfig::left_edge`].
    pub left_edge: Span,
    /// See [`DecorConfig::right_edge`].
    pub right_edge: Span,
    /// See [`DecorConfig::z_index`].
    pub z_index: i32,
}

impl DecorConfig {
    /// Values used for every parameter a theme does not override.
    pub const BASELINE: Baseline = Baseline {
        items_per_section: 1.0,
        min_items: 15,
        size: Span::new(80.0, 180.0),
        opacity: Span::new(0.08, 0.16),
        rotation: Span::new(-30.0, 30.0),
        left_edge: Span::new(0.0, 15.0),
        right_edge: Span::new(80.0, 95.0),
        z_index: 1,
    };

    /// Creates a config from the baseline with the given assets.
    #[must_use]
    pub fn with_assets(assets: AssetSet) -> Self {
        let b = Self::BASELINE;
        Self {
            items_per_section: b.items_per_section,
            min_items: b.min_items,
            size: b.size,
            opacity: b.opacity,
            rotation: b.rotation,
            left_edge: b.left_edge,
            right_edge: b.right_edge,
            z_index: b.z_index,
            assets,
        }
    }
}

/// A theme's decoration declaration: assets plus optional overrides.
///
/// Every `None` field falls back to [`DecorConfig::BASELINE`].
#[derive(Clone, Debug, PartialEq)]
pub struct PartialDecorConfig {
    /// What the theme draws. An empty list disables decorations.
    pub assets: PartialAssets,
    /// Override for [`DecorConfig::items_per_section`].
    pub items_per_section: Option<f64>,
    /// Override for [`DecorConfig::min_items`].
    pub min_items: Option<u32>,
    /// Override for [`DecorConfig::size`].
    pub size: Option<Span>,
    /// Override for [`DecorConfig::opacity`].
    pub opacity: Option<Span>,
    /// Override for [`DecorConfig::rotation`].
    pub rotation: Option<Span>,
    /// Override for [`DecorConfig::left_edge`].
    pub left_edge: Option<Span>,
    /// Override for [`DecorConfig::right_edge`].
    pub right_edge: Option<Span>,
    /// Override for [`DecorConfig::z_index`].
    pub z_index: Option<i32>,
}

/// Unvalidated asset lists as a theme declares them.
#[derive(Clone, Debug, PartialEq)]
pub enum PartialAssets {
    /// Bitmap image references.
    Raster(Vec<Arc<str>>),
    /// Vector image references and the colors to recolor them with.
    Vector(Vec<Arc<str>>, Vec<Arc<str>>),
}

impl PartialDecorConfig {
    /// A declaration with the given assets and no overrides.
    #[must_use]
    pub fn new(assets: PartialAssets) -> Self {
        Self {
            assets,
            items_per_section: None,
            min_items: None,
            size: None,
            opacity: None,
            rotation: None,
            left_edge: None,
            right_edge: None,
            z_index: None,
        }
    }
}

/// Merges a theme declaration over [`DecorConfig::BASELINE`].
///
/// Returns `None` when the theme declares no decoration (`partial` is `None`)
/// or declares an empty asset or color list. Absence is not an error: it
/// simply means the theme has no decoration layer.
#[must_use]
pub fn resolve(partial: Option<&PartialDecorConfig>) -> Option<DecorConfig> {
    let p = partial?;
    let assets = match &p.assets {
        PartialAssets::Raster(assets) => AssetSet::raster(assets.iter().cloned())?,
        PartialAssets::Vector(assets, colors) => {
            AssetSet::vector(assets.iter().cloned(), colors.iter().cloned())?
        }
    };
    let b = DecorConfig::BASELINE;
    // Span::new normalizes reversed bounds on the way in; re-normalize in case
    // the fields were assigned directly.
    let span = |o: Option<Span>, d: Span| o.map_or(d, |s| Span::new(s.min, s.max));
    Some(DecorConfig {
        items_per_section: p.items_per_section.unwrap_or(b.items_per_section),
        min_items: p.min_items.unwrap_or(b.min_items),
        size: span(p.size, b.size),
        opacity: span(p.opacity, b.opacity),
        rotation: span(p.rotation, b.rotation),
        left_edge: span(p.left_edge, b.left_edge),
        right_edge: span(p.right_edge, b.right_edge),
        z_index: p.z_index.unwrap_or(b.z_index),
        assets,
    })
}

/// Source of per-theme decoration declarations.
///
/// This is the boundary to the host's theme registry: the scheduler only asks
/// which declaration, if any, belongs to a theme id.
pub trait ThemeRegistry {
    /// Returns the decoration declaration for `theme`, or `None` if the theme
    /// has no decorations.
    fn decor_config(&self, theme: &str) -> Option<&PartialDecorConfig>;

    /// Resolves the declaration for `theme` into a full [`DecorConfig`].
    fn resolve(&self, theme: &str) -> Option<DecorConfig> {
        resolve(self.decor_config(theme))
    }
}

impl ThemeRegistry for BTreeMap<String, PartialDecorConfig> {
    fn decor_config(&self, theme: &str) -> Option<&PartialDecorConfig> {
        self.get(theme)
    }
}

impl<R: ThemeRegistry + ?Sized> ThemeRegistry for &R {
    fn decor_config(&self, theme: &str) -> Option<&PartialDecorConfig> {
        (**self).decor_config(theme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn raster(n: usize) -> PartialAssets {
        PartialAssets::Raster((0..n).map(|i| Arc::from(alloc::format!("/a/{i}.png"))).collect())
    }

    #[test]
    fn missing_theme_resolves_to_none() {
        assert_eq!(resolve(None), None);
    }

    #[test]
    fn empty_assets_resolve_to_none() {
        assert_eq!(resolve(Some(&PartialDecorConfig::new(raster(0)))), None);

        let no_colors = PartialAssets::Vector(vec![Arc::from("/x.svg")], vec![]);
        assert_eq!(resolve(Some(&PartialDecorConfig::new(no_colors))), None);
    }

    #[test]
    fn unset_fields_take_baseline() {
        let config = resolve(Some(&PartialDecorConfig::new(raster(2)))).unwrap();
        let b = DecorConfig::BASELINE;
        assert_eq!(config.min_items, b.min_items);
        assert_eq!(config.size, b.size);
        assert_eq!(config.right_edge, b.right_edge);
        assert_eq!(config.z_index, 1);
        assert_eq!(config.assets.assets().len(), 2);
        assert!(config.assets.colors().is_empty());
    }

    #[test]
    fn overrides_win_over_baseline() {
        let mut partial = PartialDecorConfig::new(raster(1));
        partial.min_items = Some(75);
        partial.rotation = Some(Span::new(-180.0, 180.0));
        partial.opacity = Some(Span::fixed(0.7));
        let config = resolve(Some(&partial)).unwrap();
        assert_eq!(config.min_items, 75);
        assert_eq!(config.rotation, Span::new(-180.0, 180.0));
        assert_eq!(config.opacity.min, 0.7);
        assert_eq!(config.opacity.max, 0.7);
        // Untouched.
        assert_eq!(config.size, DecorConfig::BASELINE.size);
    }

    #[test]
    fn reversed_override_is_normalized() {
        let mut partial = PartialDecorConfig::new(raster(1));
        partial.size = Some(Span { min: 300.0, max: 100.0 });
        let config = resolve(Some(&partial)).unwrap();
        assert_eq!(config.size, Span { min: 100.0, max: 300.0 });
    }

    #[test]
    fn map_registry_looks_up_by_theme_id() {
        let mut registry = BTreeMap::new();
        registry.insert(String::from("daisy"), PartialDecorConfig::new(raster(3)));
        assert!(registry.resolve("daisy").is_some());
        assert!(registry.resolve("dark").is_none());
    }

    #[test]
    fn span_lerp_stays_inside() {
        let s = Span::new(-30.0, 30.0);
        assert_eq!(s.lerp(0.0), -30.0);
        assert!(s.contains(s.lerp(0.999_999)));
        assert_eq!(Span::fixed(5.0).lerp(0.5), 5.0);
    }
}
