// Copyright 2025 the Masthead Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Color-scheme preference boundary.
//!
//! The preference itself lives outside the core, behind a get/set store the
//! host implements (browser hosts typically back it with local storage). The
//! ambient scheme — what the system currently prefers — is read by the host
//! and passed in, so an unset store defaults to the environment at read time
//! rather than to a hardcoded value.

use masthead_effects::ColorScheme;

/// Host-implemented persistence for the two-valued scheme preference.
pub trait PreferenceStore {
    /// The stored preference, or `None` if the user never chose one.
    fn load(&self) -> Option<ColorScheme>;
    /// Persist a preference.
    fn store(&mut self, scheme: ColorScheme);
}

/// Flip the effective scheme and persist the result.
///
/// The effective scheme is the stored preference, falling back to `ambient`
/// when unset; the inverse is stored and returned for the host to apply.
pub fn toggle<S: PreferenceStore>(prefs: &mut S, ambient: ColorScheme) -> ColorScheme {
    let next = prefs.load().unwrap_or(ambient).inverted();
    prefs.store(next);
    next
}
