// Copyright 2026 the Ambient Decor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Page height measurement.
//!
//! The height decorations are spread over is the bottom of the page's last
//! structural landmark (its footer) in document coordinates. Measuring the
//! document itself would count the absolutely positioned decorations toward
//! the height they are placed in, and every generation would stretch the page
//! for the next one. Only when no landmark exists does the measurement fall
//! back to the body's own height.
//!
//! Backends collect a [`PageMetrics`] snapshot from the host document and feed
//! it to a [`HeightTracker`], which reports a new height only when it actually
//! changed.

use kurbo::Rect;

/// A snapshot of the layout facts the page height is derived from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageMetrics {
    /// Bounding box of the footer landmark in viewport coordinates, if any.
    pub landmark: Option<Rect>,
    /// Current vertical scroll offset of the viewport.
    pub scroll_y: f64,
    /// Layout height of the document body.
    pub body_height: f64,
}

impl PageMetrics {
    /// Returns the height decorations should be spread over.
    #[must_use]
    pub fn page_height(&self) -> f64 {
        match self.landmark {
            // Viewport-relative bottom plus scroll = document-relative bottom.
            Some(rect) => rect.y1 + self.scroll_y,
            None => self.body_height,
        }
    }
}

/// Deduplicates page height measurements.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeightTracker {
    current: Option<f64>,
}

impl HeightTracker {
    /// Creates a tracker that has not measured anything yet.
    #[must_use]
    pub const fn new() -> Self {
        Self { current: None }
    }

    /// Records a measurement and returns the new height if it changed.
    pub fn observe(&mut self, metrics: &PageMetrics) -> Option<f64> {
        let height = metrics.page_height();
        if self.current == Some(height) {
            return None;
        }
        self.current = Some(height);
        Some(height)
    }

    /// Returns the last height reported, or 0 before the first measurement.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.current.unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn footer_bottom_plus_scroll() {
        let m = PageMetrics {
            landmark: Some(Rect::new(0.0, 300.0, 1280.0, 700.0)),
            scroll_y: 5_000.0,
            body_height: 9_999.0,
        };
        assert_eq!(m.page_height(), 5_700.0);
    }

    #[test]
    fn falls_back_to_body_without_footer() {
        let m = PageMetrics {
            landmark: None,
            scroll_y: 1_000.0,
            body_height: 4_200.0,
        };
        assert_eq!(m.page_height(), 4_200.0);
    }

    #[test]
    fn emits_only_on_change() {
        let mut tracker = HeightTracker::new();
        assert_eq!(tracker.height(), 0.0);

        let mut m = PageMetrics {
            landmark: Some(Rect::new(0.0, 0.0, 100.0, 3_000.0)),
            scroll_y: 0.0,
            body_height: 0.0,
        };
        assert_eq!(tracker.observe(&m), Some(3_000.0));
        assert_eq!(tracker.observe(&m), None);

        // Scrolling moves the rect but not the document-relative bottom.
        m.landmark = Some(Rect::new(0.0, -500.0, 100.0, 2_500.0));
        m.scroll_y = 500.0;
        assert_eq!(tracker.observe(&m), None);

        m.scroll_y = 900.0;
        assert_eq!(tracker.observe(&m), Some(3_400.0));
        assert_eq!(tracker.height(), 3_400.0);
    }
}
