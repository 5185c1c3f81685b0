// Copyright 2026 the Ambient Decor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web backend for ambient decorations.
//!
//! This crate provides integration with browser APIs:
//!
//! - [`IdlePort`]: `requestIdleCallback` / `setTimeout` scheduling port
//! - [`PageHeightObserver`]: page height from the footer landmark, kept
//!   current through `resize` and `ResizeObserver`
//! - [`DomSurface`]: DOM element management for the decoration layer
//! - [`DecorDriver`]: mounts all of the above around an
//!   [`AmbientDecor`](ambient_core::decor::AmbientDecor)

#![no_std]

extern crate alloc;

mod driver;
mod height;
mod port;
mod surface;

pub use ambient_core::surface::DecorSurface;
pub use driver::{DecorDriver, DriverOptions};
pub use height::{PageHeightObserver, measure};
pub use port::{Dispatch, IdlePort, IdleSupport, PortTiming};
pub use surface::{DomSurface, SurfaceConfig};

/// URL fragment that switches the page into its reduced presentation.
pub const REDUCED_PRESENTATION_HASH: &str = "#recruiter";

/// Returns `true` if `hash` (as read from `location.hash`) asks for the
/// reduced presentation, which has no decorations.
#[must_use]
pub fn reduced_presentation_from_hash(hash: &str) -> bool {
    hash == REDUCED_PRESENTATION_HASH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recruiter_hash_reduces_presentation() {
        assert!(reduced_presentation_from_hash("#recruiter"));
    }

    #[test]
    fn other_hashes_do_not() {
        assert!(!reduced_presentation_from_hash(""));
        assert!(!reduced_presentation_from_hash("#"));
        assert!(!reduced_presentation_from_hash("#story"));
        assert!(!reduced_presentation_from_hash("recruiter"));
        assert!(!reduced_presentation_from_hash("#recruiter/extra"));
    }

    #[test]
    fn web_presets() {
        assert_eq!(PortTiming::web().batch_delay_ms, 50);
        assert_eq!(
            PortTiming::web().idle_timeout_ms,
            2 * PortTiming::web().batch_delay_ms
        );
        assert_eq!(SurfaceConfig::web().min_viewport_width, 768.0);
        assert_eq!(DriverOptions::default().stager.batch_size, 20);
    }
}
