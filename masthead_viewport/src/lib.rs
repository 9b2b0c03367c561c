// Copyright 2025 the Masthead Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Masthead Viewport: viewport-derived layout metrics.
//!
//! Mobile browsers report `100vh` inconsistently while their toolbars animate
//! in and out, so layouts that want "one percent of what is actually visible"
//! derive the unit from the measured viewport height instead. This crate
//! computes that unit; the host publishes it (typically as a CSS custom
//! property) on initialization and on every resize.
//!
//! The computation is a pure function of the current viewport height — there
//! is nothing to cache and no state to invalidate.
//!
//! ```rust
//! use masthead_viewport::small_viewport_unit;
//!
//! assert_eq!(small_viewport_unit(812.0), 8.12);
//! assert_eq!(small_viewport_unit(0.0), 0.0);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

/// One percent of the given viewport height, in pixels.
///
/// Negative heights are treated as zero; the input is expected to be finite.
#[must_use]
pub fn small_viewport_unit(viewport_height: f64) -> f64 {
    if viewport_height <= 0.0 {
        0.0
    } else {
        viewport_height * 0.01
    }
}
