// Copyright 2025 the Masthead Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Masthead Effects: the shared output vocabulary of the Masthead crates.
//!
//! Masthead's state machines never mutate the environment themselves. Every
//! operation returns a batch of [`Effect`] values — presentation *intents*
//! such as "hide this node", "set `aria-expanded` on that control", or "move
//! focus here" — and the host applies them to its document however it sees
//! fit. Class names, attribute spellings, and the actual DOM (or any other
//! render target) stay on the host's side of the boundary.
//!
//! Effects are intent-level on purpose: the same core drives pages whose
//! styling conventions differ, and a test host can apply batches to a plain
//! in-memory map.
//!
//! ## Minimal example
//!
//! ```rust
//! use masthead_effects::{Effect, EffectBatch};
//!
//! let mut batch: EffectBatch<u32> = EffectBatch::new();
//! batch.push(Effect::SetHidden { node: 7, hidden: false });
//! batch.push(Effect::SetAriaExpanded { node: 3, expanded: true });
//!
//! for effect in &batch {
//!     match effect {
//!         Effect::SetHidden { node, hidden } => {
//!             assert_eq!((*node, *hidden), (7, false));
//!         }
//!         Effect::SetAriaExpanded { node, expanded } => {
//!             assert_eq!((*node, *expanded), (3, true));
//!         }
//!         _ => unreachable!("only two effects were pushed"),
//!     }
//! }
//! ```
//!
//! Key-event handlers additionally need to tell the host whether the
//! environment's default action should be suppressed; [`Response`] carries a
//! batch together with that flag. Higher-level semantics like
//! default-prevention belong on the payload a host inspects, not inside the
//! effect stream itself.
//!
//! The node identifier type `K` is caller-chosen — any small `Copy + Eq`
//! handle the host uses to address its elements.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use smallvec::SmallVec;

/// A single presentation intent addressed to the host.
///
/// Every variant is a complete instruction: applying the same effect twice is
/// harmless, and no effect can fail or report a result.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect<K> {
    /// Set or clear the hidden flag of a node.
    SetHidden {
        /// Node to mutate.
        node: K,
        /// `true` removes the node from presentation entirely.
        hidden: bool,
    },
    /// Set `aria-hidden` to an explicit value.
    SetAriaHidden {
        /// Node to mutate.
        node: K,
        /// Value the attribute is set to.
        hidden: bool,
    },
    /// Remove the `aria-hidden` attribute entirely.
    ///
    /// Distinct from `SetAriaHidden { hidden: false }`: an absent attribute
    /// marks a node that assistive technology should treat as permanently
    /// visible, not as a panel that happens to be open.
    ClearAriaHidden {
        /// Node to mutate.
        node: K,
    },
    /// Set `aria-expanded` on a control element.
    SetAriaExpanded {
        /// Control to mutate.
        node: K,
        /// Whether the controlled panel is expanded.
        expanded: bool,
    },
    /// Make a node a temporary tab stop, or clear that again.
    ///
    /// Used by the forced-focus settle protocol: a panel container must be
    /// focusable for the moment it receives programmatic focus.
    SetTabStop {
        /// Node to mutate.
        node: K,
        /// `true` inserts the node into the tab order.
        stop: bool,
    },
    /// Move programmatic focus to a node.
    Focus {
        /// Node to focus.
        node: K,
    },
    /// Release programmatic focus from a node.
    Blur {
        /// Node to blur.
        node: K,
    },
    /// Mark a navigation link as the active one, or restore its default
    /// styling.
    SetActive {
        /// Link to mutate.
        node: K,
        /// Whether this link corresponds to the section in view.
        active: bool,
    },
    /// Toggle the navbar's scrolled chrome (border styling once the page is
    /// scrolled away from the top).
    SetScrolled {
        /// Navbar node.
        node: K,
        /// Whether the page is scrolled past the threshold.
        scrolled: bool,
    },
    /// Lock or unlock document scrolling while an overlay is open.
    SetScrollLock {
        /// `true` while the panel overlay is open.
        locked: bool,
    },
    /// Publish the small-viewport unit (1% of the viewport height), in pixels.
    PublishViewportUnit {
        /// Current value of the unit.
        px: f64,
    },
    /// Apply a color-scheme preference to the document.
    ApplyColorScheme {
        /// Scheme to apply.
        scheme: ColorScheme,
    },
}

/// A batch of effects produced by one operation.
///
/// Batches are built whole and returned by value, so observers never see a
/// partially applied transition. Most batches hold a handful of entries and
/// stay inline.
pub type EffectBatch<K> = SmallVec<[Effect<K>; 8]>;

/// Result of handling an input event: effects to apply plus whether the
/// environment's default action for the event should be suppressed.
#[derive(Clone, Debug, PartialEq)]
pub struct Response<K> {
    /// Effects the host should apply.
    pub effects: EffectBatch<K>,
    /// `true` if the host must suppress the event's default action (for
    /// example, native Tab traversal leaving a trapped panel).
    pub default_prevented: bool,
}

impl<K> Response<K> {
    /// An empty response: no effects, default action untouched.
    #[must_use]
    pub fn pass() -> Self {
        Self {
            effects: EffectBatch::new(),
            default_prevented: false,
        }
    }

    /// Wrap a batch without suppressing the default action.
    #[must_use]
    pub fn of(effects: EffectBatch<K>) -> Self {
        Self {
            effects,
            default_prevented: false,
        }
    }

    /// Returns `true` if the response carries no effects and leaves the
    /// default action alone.
    #[must_use]
    pub fn is_pass(&self) -> bool {
        self.effects.is_empty() && !self.default_prevented
    }
}

impl<K> Default for Response<K> {
    fn default() -> Self {
        Self::pass()
    }
}

/// Two-valued color-scheme preference.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ColorScheme {
    /// Light scheme.
    Light,
    /// Dark scheme.
    Dark,
}

impl ColorScheme {
    /// Returns the opposite scheme.
    #[must_use]
    pub const fn inverted(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Returns `true` for [`ColorScheme::Dark`].
    #[must_use]
    pub const fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }
}
