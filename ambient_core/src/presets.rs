// Copyright 2026 the Ambient Decor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Built-in theme decorations.
//!
//! Three themes ship with a decoration layer; every other theme id has none.
//!
//! | Theme     | Assets                     | Notable overrides                         |
//! |-----------|----------------------------|-------------------------------------------|
//! | `daisy`   | pressed flowers (raster)   | 75 minimum, 50–500 px, full rotation      |
//! | `rainbow` | kid drawings (raster)      | 12 minimum, fixed 0.7 opacity             |
//! | `emo`     | icons (vector, 4 recolors) | 200 minimum, 40–120 px                    |

use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::config::{PartialAssets, PartialDecorConfig, Span, ThemeRegistry};

const FLOWERS: &[&str] = &[
    "/decor/pngs/flowers/pressed-1.png",
    "/decor/pngs/flowers/pressed-2.png",
    "/decor/pngs/flowers/pressed-3.png",
    "/decor/pngs/flowers/pressed-4.png",
    "/decor/pngs/flowers/pressed-5.png",
    "/decor/pngs/flowers/pressed-6.png",
    "/decor/pngs/flowers/pressed-7.png",
    "/decor/pngs/flowers/pressed-8.png",
    "/decor/pngs/flowers/pressed-9.png",
    "/decor/pngs/flowers/pressed-10.png",
    "/decor/pngs/flowers/pressed-12.png",
    "/decor/pngs/flowers/pressed-13.png",
    "/decor/pngs/flowers/pressed-14.png",
];

const DRAWINGS: &[&str] = &[
    "/decor/pngs/drawings/drawing-cat.png",
    "/decor/pngs/drawings/drawing-dino.png",
    "/decor/pngs/drawings/drawing-dragon.png",
    "/decor/pngs/drawings/drawing-sun.png",
];

const EMO_ICONS: &[&str] = &[
    "/decor/svgs/emo/heart.svg",
    "/decor/svgs/emo/heart3.svg",
    "/decor/svgs/emo/heart4.svg",
    "/decor/svgs/emo/heart5.svg",
    "/decor/svgs/emo/heart6.svg",
    "/decor/svgs/emo/star.svg",
    "/decor/svgs/emo/star2.svg",
    "/decor/svgs/emo/star3.svg",
    "/decor/svgs/emo/star4.svg",
    "/decor/svgs/emo/star5.svg",
    "/decor/svgs/emo/x.svg",
    "/decor/svgs/emo/lightening.svg",
    "/decor/svgs/emo/vampire.svg",
    "/decor/svgs/emo/alien.svg",
    "/decor/svgs/emo/face.svg",
    "/decor/svgs/emo/face2.svg",
    "/decor/svgs/emo/face3.svg",
    "/decor/svgs/emo/ice-cream.svg",
    "/decor/svgs/emo/crown.svg",
];

const EMO_COLORS: &[&str] = &["#7CFF00", "#FF2F92", "#00E5FF", "#ad2fff"];

fn refs(paths: &[&str]) -> Vec<Arc<str>> {
    paths.iter().map(|&p| Arc::from(p)).collect()
}

/// Pressed flowers scattered close to the page edges.
#[must_use]
pub fn daisy() -> PartialDecorConfig {
    PartialDecorConfig {
        min_items: Some(75),
        size: Some(Span::new(50.0, 500.0)),
        rotation: Some(Span::new(-180.0, 180.0)),
        left_edge: Some(Span::new(-5.0, 5.0)),
        right_edge: Some(Span::new(70.0, 82.0)),
        ..PartialDecorConfig::new(PartialAssets::Raster(refs(FLOWERS)))
    }
}

/// A handful of large, clearly visible crayon drawings.
#[must_use]
pub fn rainbow() -> PartialDecorConfig {
    PartialDecorConfig {
        min_items: Some(12),
        size: Some(Span::new(100.0, 250.0)),
        opacity: Some(Span::fixed(0.7)),
        rotation: Some(Span::new(-15.0, 15.0)),
        ..PartialDecorConfig::new(PartialAssets::Raster(refs(DRAWINGS)))
    }
}

/// A dense field of small neon icons.
#[must_use]
pub fn emo() -> PartialDecorConfig {
    PartialDecorConfig {
        min_items: Some(200),
        size: Some(Span::new(40.0, 120.0)),
        opacity: Some(Span::new(0.25, 0.35)),
        ..PartialDecorConfig::new(PartialAssets::Vector(refs(EMO_ICONS), refs(EMO_COLORS)))
    }
}

/// The [`ThemeRegistry`] of built-in theme decorations.
#[derive(Clone, Debug)]
pub struct BuiltinThemes {
    daisy: PartialDecorConfig,
    rainbow: PartialDecorConfig,
    emo: PartialDecorConfig,
}

impl BuiltinThemes {
    /// Builds the registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            daisy: daisy(),
            rainbow: rainbow(),
            emo: emo(),
        }
    }
}

impl Default for BuiltinThemes {
    fn default() -> Self {
        Self::new()
    }
}

impl ThemeRegistry for BuiltinThemes {
    fn decor_config(&self, theme: &str) -> Option<&PartialDecorConfig> {
        match theme {
            "daisy" => Some(&self.daisy),
            "rainbow" => Some(&self.rainbow),
            "emo" => Some(&self.emo),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_themes_resolve() {
        let themes = BuiltinThemes::new();

        let daisy = themes.resolve("daisy").unwrap();
        assert_eq!(daisy.min_items, 75);
        assert!(!daisy.assets.is_vector());
        assert_eq!(daisy.assets.assets().len(), 13);

        let rainbow = themes.resolve("rainbow").unwrap();
        assert_eq!(rainbow.opacity, Span::fixed(0.7));

        let emo = themes.resolve("emo").unwrap();
        assert!(emo.assets.is_vector());
        assert_eq!(emo.assets.colors().len(), 4);
        assert_eq!(emo.min_items, 200);
    }

    #[test]
    fn other_themes_have_no_decor() {
        let themes = BuiltinThemes::new();
        assert!(themes.resolve("midnight").is_none());
        assert!(themes.resolve("").is_none());
    }
}
