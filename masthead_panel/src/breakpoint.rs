// Copyright 2025 the Masthead Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Breakpoint reconciliation: forcing the panel into the correct state when
//! the viewport crosses the configured width threshold.

use crate::PanelController;
use masthead_effects::EffectBatch;

/// Layout mode of the panel relative to the breakpoint.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PanelMode {
    /// At or above the breakpoint the panel is part of the inline layout:
    /// always visible, never an overlay.
    Inline,
    /// Below the breakpoint the panel is a collapsible overlay.
    Collapsible,
}

/// Reconciles the panel against the viewport width.
///
/// Runs on initialization and on every resize notification. The last
/// committed [`PanelMode`] makes reconciliation idempotent: repeated calls at
/// a stable width emit nothing after the first.
#[derive(Clone, Debug)]
pub struct BreakpointReconciler {
    threshold: f64,
    mode: Option<PanelMode>,
}

impl BreakpointReconciler {
    /// Create a reconciler for the given width threshold, in pixels.
    #[must_use]
    pub const fn new(threshold: f64) -> Self {
        Self {
            threshold,
            mode: None,
        }
    }

    /// The configured width threshold.
    #[must_use]
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Last committed mode, `None` before the first reconciliation.
    #[must_use]
    pub const fn mode(&self) -> Option<PanelMode> {
        self.mode
    }

    /// Reconcile the panel against the current viewport width.
    ///
    /// Crossing up into [`PanelMode::Inline`] force-closes an open panel (so
    /// trap and settle state are cleared through the ordinary close path) and
    /// then removes `aria-hidden` entirely — an absent attribute, not a
    /// `false` one, marks the panel as permanently visible. Crossing down
    /// into [`PanelMode::Collapsible`] re-initializes `aria-hidden` to `true`
    /// if the attribute is absent, so the panel starts hidden in the overlay
    /// layout.
    pub fn reconcile<K: Copy + Eq>(
        &mut self,
        width: f64,
        panel: &mut PanelController<K>,
    ) -> EffectBatch<K> {
        let next = if width >= self.threshold {
            PanelMode::Inline
        } else {
            PanelMode::Collapsible
        };
        if self.mode == Some(next) {
            return EffectBatch::new();
        }
        self.mode = Some(next);

        match next {
            PanelMode::Inline => {
                let mut out = panel.close();
                out.extend(panel.detach_aria_hidden());
                out
            }
            PanelMode::Collapsible => panel.reinit_aria_hidden(),
        }
    }
}
