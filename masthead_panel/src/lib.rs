// Copyright 2025 the Masthead Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Masthead Panel: the navigation panel state machine.
//!
//! This crate owns the open/close lifecycle of the collapsible navigation
//! panel: the single [`PanelState`], the consistency of the panel's
//! externally observable attributes with that state, keyboard focus
//! containment while open, and reconciliation against the responsive
//! breakpoint.
//!
//! ## Model
//!
//! [`PanelController`] is constructed once at startup with already-resolved
//! element handles (any `Copy + Eq` key type the host uses). It never touches
//! the environment: every operation returns an
//! [`EffectBatch`](masthead_effects::EffectBatch) of presentation intents,
//! built whole so observers never see a half-applied transition. A missing
//! panel handle turns every operation into a silent no-op — the same wiring
//! is reused on pages without a panel.
//!
//! Time is supplied by the host as millisecond timestamps on the calls that
//! need it; the controller never reads a clock. The forced-focus settle that
//! accompanies `open()` is therefore a pair of recorded deadlines the host
//! drives through [`PanelController::next_deadline`] and
//! [`PanelController::poll`], which tests execute synchronously with
//! fabricated times.
//!
//! ## Minimal example
//!
//! ```rust
//! use masthead_effects::Effect;
//! use masthead_panel::{FORCE_FOCUS_DELAY_MS, PanelController, PanelState};
//!
//! // Panel handle 10, one toggle button (handle 20) declared as controlling it.
//! let mut panel = PanelController::new(Some(10_u32), vec![20]);
//! assert_eq!(panel.state(), PanelState::Closed);
//!
//! let batch = panel.open(1_000);
//! assert!(batch.iter().any(|e| matches!(
//!     e,
//!     Effect::SetAriaExpanded { node: 20, expanded: true }
//! )));
//!
//! // The forced-focus phase fires once its deadline arrives.
//! assert_eq!(panel.next_deadline(), Some(1_000 + FORCE_FOCUS_DELAY_MS));
//! let settle = panel.poll(1_000 + FORCE_FOCUS_DELAY_MS);
//! assert!(settle.iter().any(|e| matches!(e, Effect::Focus { node: 10 })));
//! ```
//!
//! ## Focus containment
//!
//! While open, the controller holds a [`TrapSession`] and intercepts Tab and
//! Escape through [`PanelController::on_key`]. The host recomputes the
//! ordered focusable snapshot per keydown (see [`TrapSpace`]); the session
//! itself carries only lifecycle state. Because the session and the settle
//! deadlines live in single `Option` fields cleared by `close()`, repeated
//! open/close cycles cannot accumulate interception state.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;

use masthead_effects::{Effect, EffectBatch, Response};

mod breakpoint;
mod trap;

pub use breakpoint::{BreakpointReconciler, PanelMode};
pub use trap::{Focusable, FocusableFlags, TrapSession, TrapSpace, tab_target};

/// Delay before the panel container is force-focused, in milliseconds after
/// `open()`.
///
/// Focusing the container immediately, before layout and paint settle, is
/// unreliable in browsers; the value is calibrated empirically against layout
/// timing and is approximate, not a scheduling guarantee.
pub const FORCE_FOCUS_DELAY_MS: u64 = 50;

/// Delay before the temporary tab stop and forced focus are released, in
/// milliseconds after `open()`.
pub const FOCUS_RELEASE_DELAY_MS: u64 = 100;

/// Visibility state of the navigation panel.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PanelState {
    /// Panel is hidden and not intercepting input.
    Closed,
    /// Panel is visible, scroll is locked, and focus is contained.
    Open,
}

/// Keyboard input routed to the panel while it is open.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Tab traversal, forward or backward.
    Tab {
        /// `true` for Shift+Tab.
        shift: bool,
    },
    /// Escape dismisses the open panel.
    Escape,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum SettlePhase {
    Force,
    Release,
}

#[derive(Copy, Clone, Debug)]
struct Settle {
    opened_at: u64,
    phase: SettlePhase,
}

impl Settle {
    const fn due(&self) -> u64 {
        match self.phase {
            SettlePhase::Force => self.opened_at + FORCE_FOCUS_DELAY_MS,
            SettlePhase::Release => self.opened_at + FOCUS_RELEASE_DELAY_MS,
        }
    }
}

/// Owner of the panel's open/closed state and its observable consistency.
///
/// The externally observable attributes — the hidden flag, the `aria-hidden`
/// attribute, and `aria-expanded` on every declared control — are only ever
/// emitted as a complete batch alongside a state transition, so they can
/// never disagree with [`PanelState`].
#[derive(Clone, Debug)]
pub struct PanelController<K> {
    state: PanelState,
    panel: Option<K>,
    controls: Vec<K>,
    /// Shadow of the `aria-hidden` attribute: `None` means absent. The
    /// controller owns every mutation of the attribute, so the shadow is
    /// authoritative.
    aria_hidden: Option<bool>,
    trap: Option<TrapSession>,
    settle: Option<Settle>,
}

impl<K: Copy + Eq> PanelController<K> {
    /// Create a controller for the given panel handle and the controls
    /// declared as controlling it.
    ///
    /// The controls relation is resolved once, here; it is never re-queried.
    #[must_use]
    pub fn new(panel: Option<K>, controls: Vec<K>) -> Self {
        Self {
            state: PanelState::Closed,
            panel,
            controls,
            aria_hidden: None,
            trap: None,
            settle: None,
        }
    }

    /// Current panel state.
    #[must_use]
    pub const fn state(&self) -> PanelState {
        self.state
    }

    /// Returns `true` while the panel is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state == PanelState::Open
    }

    /// The panel handle this controller was wired to, if any.
    #[must_use]
    pub const fn panel_node(&self) -> Option<K> {
        self.panel
    }

    /// Shadow of the `aria-hidden` attribute (`None` = attribute absent).
    #[must_use]
    pub const fn aria_hidden(&self) -> Option<bool> {
        self.aria_hidden
    }

    /// The active trap session, while open.
    #[must_use]
    pub const fn trap(&self) -> Option<&TrapSession> {
        self.trap.as_ref()
    }

    /// Open the panel.
    ///
    /// No-op if already open or if no panel handle was wired. Otherwise
    /// transitions to [`PanelState::Open`], emits the full visibility batch,
    /// activates the focus trap, and arms the two-phase forced-focus settle
    /// relative to `now` (host milliseconds).
    pub fn open(&mut self, now: u64) -> EffectBatch<K> {
        let mut out = EffectBatch::new();
        if self.state == PanelState::Open {
            return out;
        }
        let Some(panel) = self.panel else {
            return out;
        };

        self.state = PanelState::Open;
        out.push(Effect::SetHidden {
            node: panel,
            hidden: false,
        });
        out.push(Effect::SetAriaHidden {
            node: panel,
            hidden: false,
        });
        self.aria_hidden = Some(false);
        for &control in &self.controls {
            out.push(Effect::SetAriaExpanded {
                node: control,
                expanded: true,
            });
        }
        out.push(Effect::SetScrollLock { locked: true });

        self.trap = Some(TrapSession { opened_at: now });
        self.settle = Some(Settle {
            opened_at: now,
            phase: SettlePhase::Force,
        });
        out
    }

    /// Close the panel.
    ///
    /// No-op if already closed. The inverse of [`PanelController::open`]:
    /// emits the hidden batch, drops the trap session, and cancels any
    /// pending settle phase so a deadline armed by an earlier `open()` cannot
    /// act after this close.
    pub fn close(&mut self) -> EffectBatch<K> {
        let mut out = EffectBatch::new();
        if self.state == PanelState::Closed {
            return out;
        }
        let Some(panel) = self.panel else {
            return out;
        };

        self.state = PanelState::Closed;
        out.push(Effect::SetHidden {
            node: panel,
            hidden: true,
        });
        out.push(Effect::SetAriaHidden {
            node: panel,
            hidden: true,
        });
        self.aria_hidden = Some(true);
        for &control in &self.controls {
            out.push(Effect::SetAriaExpanded {
                node: control,
                expanded: false,
            });
        }
        out.push(Effect::SetScrollLock { locked: false });

        self.trap = None;
        self.settle = None;
        out
    }

    /// Open if closed, close if open.
    pub fn toggle(&mut self, now: u64) -> EffectBatch<K> {
        match self.state {
            PanelState::Closed => self.open(now),
            PanelState::Open => self.close(),
        }
    }

    /// Handle a key press while the panel may be intercepting input.
    ///
    /// Ignored entirely while closed. While open, Escape closes the panel and
    /// Tab runs the containment rule over the host-provided snapshot:
    /// `focused` is the currently focused node (`None` = no element or the
    /// document body), and a wrap suppresses the environment's default
    /// traversal.
    pub fn on_key(
        &mut self,
        key: Key,
        focused: Option<K>,
        space: &TrapSpace<'_, K>,
    ) -> Response<K> {
        debug_assert_eq!(
            self.trap.is_some(),
            self.state == PanelState::Open,
            "trap session must exist exactly while open"
        );
        if self.trap.is_none() {
            return Response::pass();
        }
        match key {
            Key::Escape => Response::of(self.close()),
            Key::Tab { shift } => match tab_target(space, focused, shift) {
                Some(node) => {
                    let mut effects = EffectBatch::new();
                    effects.push(Effect::Focus { node });
                    Response {
                        effects,
                        default_prevented: true,
                    }
                }
                None => Response::pass(),
            },
        }
    }

    /// Deadline of the next pending settle phase, if any.
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        self.settle.as_ref().map(Settle::due)
    }

    /// Fire settle phases that are due at `now`.
    ///
    /// The settle delays are approximate by design (they paper over layout
    /// timing, see [`FORCE_FOCUS_DELAY_MS`]); the only hard requirement is
    /// the state guard here — a deadline armed by an `open()` that has since
    /// been closed must emit nothing, which also covers a `close()` racing a
    /// pending phase.
    pub fn poll(&mut self, now: u64) -> EffectBatch<K> {
        let mut out = EffectBatch::new();
        if self.state != PanelState::Open {
            self.settle = None;
            return out;
        }
        let Some(panel) = self.panel else {
            return out;
        };
        while let Some(settle) = self.settle {
            if now < settle.due() {
                break;
            }
            match settle.phase {
                SettlePhase::Force => {
                    // Make the container focusable for a moment and focus it:
                    // assistive technology needs the panel itself announced
                    // before focus can settle on an inner element.
                    out.push(Effect::SetTabStop {
                        node: panel,
                        stop: true,
                    });
                    out.push(Effect::Focus { node: panel });
                    self.settle = Some(Settle {
                        opened_at: settle.opened_at,
                        phase: SettlePhase::Release,
                    });
                }
                SettlePhase::Release => {
                    out.push(Effect::SetTabStop {
                        node: panel,
                        stop: false,
                    });
                    out.push(Effect::Blur { node: panel });
                    self.settle = None;
                }
            }
        }
        out
    }

    /// Remove the `aria-hidden` attribute entirely (inline layout).
    pub(crate) fn detach_aria_hidden(&mut self) -> EffectBatch<K> {
        let mut out = EffectBatch::new();
        let Some(panel) = self.panel else {
            return out;
        };
        if self.aria_hidden.is_some() {
            out.push(Effect::ClearAriaHidden { node: panel });
            self.aria_hidden = None;
        }
        out
    }

    /// Re-initialize `aria-hidden` to `true` if the attribute is absent
    /// (returning to collapsible layout).
    pub(crate) fn reinit_aria_hidden(&mut self) -> EffectBatch<K> {
        let mut out = EffectBatch::new();
        let Some(panel) = self.panel else {
            return out;
        };
        if self.aria_hidden.is_none() {
            out.push(Effect::SetAriaHidden {
                node: panel,
                hidden: true,
            });
            self.aria_hidden = Some(true);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use kurbo::Rect;

    const PANEL: u32 = 10;
    const TOGGLE: u32 = 20;

    fn controller() -> PanelController<u32> {
        PanelController::new(Some(PANEL), vec![TOGGLE])
    }

    fn candidates(ids: &[u32]) -> alloc::vec::Vec<Focusable<u32>> {
        ids.iter()
            .map(|&node| Focusable {
                node,
                bounds: Rect::new(0.0, 0.0, 100.0, 20.0),
                flags: FocusableFlags::default(),
            })
            .collect()
    }

    #[test]
    fn open_emits_the_full_visibility_batch() {
        let mut panel = controller();
        let batch = panel.open(0);

        assert_eq!(panel.state(), PanelState::Open);
        assert_eq!(
            batch.as_slice(),
            &[
                Effect::SetHidden {
                    node: PANEL,
                    hidden: false
                },
                Effect::SetAriaHidden {
                    node: PANEL,
                    hidden: false
                },
                Effect::SetAriaExpanded {
                    node: TOGGLE,
                    expanded: true
                },
                Effect::SetScrollLock { locked: true },
            ]
        );
        assert_eq!(panel.aria_hidden(), Some(false));
        assert!(panel.trap().is_some());
    }

    #[test]
    fn close_is_the_exact_inverse() {
        let mut panel = controller();
        let _ = panel.open(0);
        let batch = panel.close();

        assert_eq!(panel.state(), PanelState::Closed);
        assert_eq!(
            batch.as_slice(),
            &[
                Effect::SetHidden {
                    node: PANEL,
                    hidden: true
                },
                Effect::SetAriaHidden {
                    node: PANEL,
                    hidden: true
                },
                Effect::SetAriaExpanded {
                    node: TOGGLE,
                    expanded: false
                },
                Effect::SetScrollLock { locked: false },
            ]
        );
        assert_eq!(panel.aria_hidden(), Some(true));
        assert!(panel.trap().is_none());
        assert!(panel.next_deadline().is_none());
    }

    #[test]
    fn open_and_close_are_idempotent() {
        let mut panel = controller();
        let first = panel.open(0);
        assert!(!first.is_empty());
        // Second open changes nothing observable.
        assert!(panel.open(5).is_empty());
        assert_eq!(panel.state(), PanelState::Open);

        let first = panel.close();
        assert!(!first.is_empty());
        assert!(panel.close().is_empty());
        assert_eq!(panel.state(), PanelState::Closed);
    }

    #[test]
    fn toggle_alternates() {
        let mut panel = controller();
        let _ = panel.toggle(0);
        assert!(panel.is_open());
        let _ = panel.toggle(10);
        assert!(!panel.is_open());
    }

    #[test]
    fn missing_panel_makes_every_operation_a_no_op() {
        let mut panel: PanelController<u32> = PanelController::new(None, vec![TOGGLE]);
        assert!(panel.open(0).is_empty());
        assert_eq!(panel.state(), PanelState::Closed);
        assert!(panel.close().is_empty());
        assert!(panel.toggle(0).is_empty());
        assert_eq!(panel.state(), PanelState::Closed);
        assert!(panel.poll(1_000).is_empty());
    }

    #[test]
    fn settle_runs_in_two_phases() {
        let mut panel = controller();
        let _ = panel.open(1_000);

        assert_eq!(panel.next_deadline(), Some(1_000 + FORCE_FOCUS_DELAY_MS));
        // Nothing fires early.
        assert!(panel.poll(1_000 + FORCE_FOCUS_DELAY_MS - 1).is_empty());

        let force = panel.poll(1_000 + FORCE_FOCUS_DELAY_MS);
        assert_eq!(
            force.as_slice(),
            &[
                Effect::SetTabStop {
                    node: PANEL,
                    stop: true
                },
                Effect::Focus { node: PANEL },
            ]
        );

        assert_eq!(panel.next_deadline(), Some(1_000 + FOCUS_RELEASE_DELAY_MS));
        let release = panel.poll(1_000 + FOCUS_RELEASE_DELAY_MS);
        assert_eq!(
            release.as_slice(),
            &[
                Effect::SetTabStop {
                    node: PANEL,
                    stop: false
                },
                Effect::Blur { node: PANEL },
            ]
        );
        assert!(panel.next_deadline().is_none());
    }

    #[test]
    fn late_poll_fires_both_phases_in_order() {
        let mut panel = controller();
        let _ = panel.open(0);

        let batch = panel.poll(FOCUS_RELEASE_DELAY_MS + 500);
        assert_eq!(
            batch.as_slice(),
            &[
                Effect::SetTabStop {
                    node: PANEL,
                    stop: true
                },
                Effect::Focus { node: PANEL },
                Effect::SetTabStop {
                    node: PANEL,
                    stop: false
                },
                Effect::Blur { node: PANEL },
            ]
        );
    }

    #[test]
    fn close_cancels_a_pending_settle() {
        let mut panel = controller();
        let _ = panel.open(0);
        let _ = panel.close();

        // The deadline from the earlier open() must not resurrect anything.
        assert!(panel.poll(FOCUS_RELEASE_DELAY_MS + 1).is_empty());
        assert!(panel.next_deadline().is_none());
        assert!(panel.trap().is_none());
    }

    #[test]
    fn reopen_rearms_the_settle_from_the_new_timestamp() {
        let mut panel = controller();
        let _ = panel.open(0);
        let _ = panel.close();
        let _ = panel.open(10_000);

        assert_eq!(panel.next_deadline(), Some(10_000 + FORCE_FOCUS_DELAY_MS));
        // The stale phase from the first open() does not fire.
        assert!(panel.poll(FORCE_FOCUS_DELAY_MS).is_empty());
    }

    #[test]
    fn escape_closes_only_while_open() {
        let mut panel = controller();
        let nodes = candidates(&[1, 2]);
        let space = TrapSpace { nodes: &nodes };

        // Closed: ignored.
        assert!(panel.on_key(Key::Escape, None, &space).is_pass());

        let _ = panel.open(0);
        let response = panel.on_key(Key::Escape, Some(1), &space);
        assert!(!response.default_prevented);
        assert!(
            response
                .effects
                .iter()
                .any(|e| matches!(e, Effect::SetHidden { hidden: true, .. })),
            "escape must close the panel"
        );
        assert_eq!(panel.state(), PanelState::Closed);
    }

    #[test]
    fn tab_wraps_and_suppresses_default_at_the_edges() {
        let mut panel = controller();
        let _ = panel.open(0);
        let nodes = candidates(&[1, 2, 3]);
        let space = TrapSpace { nodes: &nodes };

        let response = panel.on_key(Key::Tab { shift: false }, Some(3), &space);
        assert!(response.default_prevented);
        assert_eq!(response.effects.as_slice(), &[Effect::Focus { node: 1 }]);

        let response = panel.on_key(Key::Tab { shift: true }, Some(1), &space);
        assert!(response.default_prevented);
        assert_eq!(response.effects.as_slice(), &[Effect::Focus { node: 3 }]);

        // Interior presses follow native tab order.
        assert!(panel.on_key(Key::Tab { shift: false }, Some(2), &space).is_pass());
    }

    #[test]
    fn trap_session_never_accumulates_across_cycles() {
        let mut panel = controller();
        for cycle in 0..10_u64 {
            let now = cycle * 1_000;
            let _ = panel.open(now);
            assert!(panel.trap().is_some());
            assert_eq!(panel.trap().map(TrapSession::opened_at), Some(now));
            let _ = panel.close();
            assert!(panel.trap().is_none());
        }
    }
}
