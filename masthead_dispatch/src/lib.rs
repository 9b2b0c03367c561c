// Copyright 2025 the Masthead Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Masthead Dispatch: top-level routing of environment events.
//!
//! The host registers exactly one listener per environment event type —
//! click, keydown, scroll, resize — and forwards each notification to the
//! matching [`Dispatcher`] entry point. Which component reacts is decided
//! here by *target-based dispatch*: the interacting element's identity is
//! resolved against a declared control relation instead of attaching a
//! listener to every interactive element. Listener count stays O(event
//! types), not O(elements).
//!
//! ## Control relation
//!
//! [`Bindings`] maps control handles to a [`ControlRole`] and is declared
//! once at construction. Click targets are resolved against it along their
//! ancestor chain (a click on an icon inside the toggle button still counts),
//! using the host's [`ParentLookup`]. An open panel treats any click that
//! resolves to neither a bound control nor a node inside the panel as a
//! dismissal.
//!
//! ## Minimal example
//!
//! ```rust
//! use masthead_dispatch::scheme::PreferenceStore;
//! use masthead_dispatch::{Bindings, ControlRole, Dispatcher, NoParent};
//! use masthead_effects::{ColorScheme, Effect};
//! use masthead_panel::PanelController;
//!
//! struct NoPrefs;
//! impl PreferenceStore for NoPrefs {
//!     fn load(&self) -> Option<ColorScheme> {
//!         None
//!     }
//!     fn store(&mut self, _scheme: ColorScheme) {}
//! }
//!
//! let mut bindings = Bindings::new();
//! bindings.bind(20_u32, ControlRole::PanelToggle);
//!
//! let panel = PanelController::new(Some(10), vec![20]);
//! let mut dispatcher = Dispatcher::new(NoParent, bindings, panel, 1024.0, None);
//!
//! // Below the breakpoint the panel starts hidden.
//! let _ = dispatcher.initialize(800.0, 600.0);
//!
//! // A click on the toggle opens it.
//! let batch = dispatcher.on_click(Some(20), &mut NoPrefs, ColorScheme::Light, 0);
//! assert!(batch.iter().any(|e| matches!(
//!     e,
//!     Effect::SetHidden { node: 10, hidden: false }
//! )));
//! assert!(dispatcher.controller().is_open());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod scheme;

use core::hash::Hash;

use hashbrown::HashMap;

use masthead_effects::{ColorScheme, Effect, EffectBatch, Response};
use masthead_panel::{BreakpointReconciler, Key, PanelController, PanelMode, TrapSpace};
use masthead_scrollspy::{NavbarChrome, SectionView, mark_active};
use masthead_viewport::small_viewport_unit;

use crate::scheme::PreferenceStore;

/// Source of parent links for ancestry walks.
///
/// The dispatcher walks from a click target toward the root to resolve bound
/// controls and panel containment. Callers ensure the ancestry is acyclic.
pub trait ParentLookup<K> {
    /// Parent of `node`, or `None` at the root.
    fn parent_of(&self, node: &K) -> Option<K>;
}

/// A [`ParentLookup`] with no parent links: every node is its own root.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoParent;

impl<K> ParentLookup<K> for NoParent {
    fn parent_of(&self, _node: &K) -> Option<K> {
        None
    }
}

/// A [`ParentLookup`] backed by an explicit child → parent map.
#[derive(Clone, Debug)]
pub struct MapParent<K> {
    edges: HashMap<K, K>,
}

impl<K> Default for MapParent<K> {
    fn default() -> Self {
        Self {
            edges: HashMap::new(),
        }
    }
}

impl<K: Copy + Eq + Hash> MapParent<K> {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self {
            edges: HashMap::new(),
        }
    }

    /// Record `parent` as the parent of `child`.
    pub fn insert(&mut self, child: K, parent: K) {
        self.edges.insert(child, parent);
    }
}

impl<K: Copy + Eq + Hash> ParentLookup<K> for MapParent<K> {
    fn parent_of(&self, node: &K) -> Option<K> {
        self.edges.get(node).copied()
    }
}

/// What a bound control does when activated.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ControlRole {
    /// Toggles the navigation panel.
    PanelToggle,
    /// Toggles the color-scheme preference.
    SchemeToggle,
}

/// The declared control relation: control handle → role.
///
/// Declared once at construction from the host's wiring; never re-queried.
#[derive(Clone, Debug)]
pub struct Bindings<K> {
    map: HashMap<K, ControlRole>,
}

impl<K> Default for Bindings<K> {
    fn default() -> Self {
        Self {
            map: HashMap::new(),
        }
    }
}

impl<K: Copy + Eq + Hash> Bindings<K> {
    /// Create an empty relation.
    #[must_use]
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Declare `control` as having `role`.
    pub fn bind(&mut self, control: K, role: ControlRole) {
        self.map.insert(control, role);
    }

    /// Role of a node, if it is a bound control.
    #[must_use]
    pub fn role_of(&self, node: &K) -> Option<ControlRole> {
        self.map.get(node).copied()
    }

    /// Number of bound controls.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if no controls are bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Routes environment events to the panel controller, breakpoint reconciler,
/// and scroll classifier.
///
/// One value of this type backs all top-level listeners; every entry point
/// takes `&mut self`, so events of a type are processed strictly in arrival
/// order.
#[derive(Clone, Debug)]
pub struct Dispatcher<K, P> {
    parent: P,
    bindings: Bindings<K>,
    panel: PanelController<K>,
    reconciler: BreakpointReconciler,
    chrome: NavbarChrome<K>,
}

impl<K, P> Dispatcher<K, P>
where
    K: Copy + Eq + Hash,
    P: ParentLookup<K>,
{
    /// Wire a dispatcher from already-resolved collaborators.
    ///
    /// `breakpoint` is the viewport width threshold separating the inline and
    /// collapsible panel layouts; `navbar` is the handle carrying the
    /// scrolled chrome, if the page has one.
    #[must_use]
    pub fn new(
        parent: P,
        bindings: Bindings<K>,
        panel: PanelController<K>,
        breakpoint: f64,
        navbar: Option<K>,
    ) -> Self {
        Self {
            parent,
            bindings,
            panel,
            reconciler: BreakpointReconciler::new(breakpoint),
            chrome: NavbarChrome::new(navbar),
        }
    }

    /// The panel controller.
    #[must_use]
    pub const fn controller(&self) -> &PanelController<K> {
        &self.panel
    }

    /// The panel controller, mutably (for programmatic open/close).
    pub fn controller_mut(&mut self) -> &mut PanelController<K> {
        &mut self.panel
    }

    /// Last committed layout mode, `None` before initialization.
    #[must_use]
    pub const fn mode(&self) -> Option<PanelMode> {
        self.reconciler.mode()
    }

    /// Run the initialization pass: publish the viewport unit and reconcile
    /// the panel against the initial viewport width.
    pub fn initialize(&mut self, width: f64, height: f64) -> EffectBatch<K> {
        let mut out = EffectBatch::new();
        out.push(Effect::PublishViewportUnit {
            px: small_viewport_unit(height),
        });
        out.extend(self.reconciler.reconcile(width, &mut self.panel));
        out
    }

    /// Handle a document-level click.
    ///
    /// `target` is the clicked node (`None` when the click landed on no
    /// element). The innermost bound control on the target's ancestor chain
    /// wins; otherwise an open panel is dismissed unless the click was inside
    /// it.
    pub fn on_click<S: PreferenceStore>(
        &mut self,
        target: Option<K>,
        prefs: &mut S,
        ambient: ColorScheme,
        now: u64,
    ) -> EffectBatch<K> {
        let Some(target) = target else {
            return if self.panel.is_open() {
                self.panel.close()
            } else {
                EffectBatch::new()
            };
        };

        if let Some(role) = self.bound_role(target) {
            return match role {
                ControlRole::PanelToggle => self.panel.toggle(now),
                ControlRole::SchemeToggle => {
                    let scheme = scheme::toggle(prefs, ambient);
                    let mut out = EffectBatch::new();
                    out.push(Effect::ApplyColorScheme { scheme });
                    out
                }
            };
        }

        if self.panel.is_open() && !self.within_panel(target) {
            return self.panel.close();
        }
        EffectBatch::new()
    }

    /// Handle a document-level keydown.
    ///
    /// `focused` is the currently focused node (`None` = none or the body);
    /// `space` is the focusable snapshot of the panel, recomputed by the host
    /// for this press. The host must honor `default_prevented` on the
    /// returned [`Response`].
    pub fn on_key(
        &mut self,
        key: Key,
        focused: Option<K>,
        space: &TrapSpace<'_, K>,
    ) -> Response<K> {
        self.panel.on_key(key, focused, space)
    }

    /// Handle a scroll notification.
    ///
    /// `view` is a freshly measured section snapshot; `chrome_threshold` is
    /// the navbar's border extent for the scrolled-chrome check.
    pub fn on_scroll(
        &mut self,
        scroll_y: f64,
        view: &SectionView<'_, K>,
        chrome_threshold: f64,
    ) -> EffectBatch<K> {
        let mut out = EffectBatch::new();
        if let Some(effect) = self.chrome.update(scroll_y, chrome_threshold) {
            out.push(effect);
        }
        out.extend(mark_active(view, scroll_y));
        out
    }

    /// Handle a resize notification: republish the viewport unit, reconcile
    /// the breakpoint, and re-run scroll classification against the reflowed
    /// layout.
    pub fn on_resize(
        &mut self,
        width: f64,
        height: f64,
        scroll_y: f64,
        view: &SectionView<'_, K>,
    ) -> EffectBatch<K> {
        let mut out = EffectBatch::new();
        out.push(Effect::PublishViewportUnit {
            px: small_viewport_unit(height),
        });
        out.extend(self.reconciler.reconcile(width, &mut self.panel));
        out.extend(mark_active(view, scroll_y));
        out
    }

    /// Deadline of the next pending panel settle phase, if any.
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        self.panel.next_deadline()
    }

    /// Fire panel settle phases that are due at `now`.
    pub fn poll(&mut self, now: u64) -> EffectBatch<K> {
        self.panel.poll(now)
    }

    /// Innermost bound control on the ancestor chain of `node`, if any.
    fn bound_role(&self, node: K) -> Option<ControlRole> {
        let mut current = node;
        // Walk to root; caller ensures acyclic ancestry.
        loop {
            if let Some(role) = self.bindings.role_of(&current) {
                return Some(role);
            }
            match self.parent.parent_of(&current) {
                Some(parent) => current = parent,
                None => return None,
            }
        }
    }

    /// Returns `true` if `node` is the panel or one of its descendants.
    fn within_panel(&self, node: K) -> bool {
        let Some(panel) = self.panel.panel_node() else {
            return false;
        };
        let mut current = node;
        loop {
            if current == panel {
                return true;
            }
            match self.parent.parent_of(&current) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }
}
