// Copyright 2025 the Masthead Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Focus containment: candidate snapshots and the Tab-cycling rule.
//!
//! While the panel is open, keyboard focus must cycle strictly within it.
//! The host recomputes the ordered list of focusable descendants on every Tab
//! keydown (layout and visibility can change while the panel is open) and
//! passes it in as a [`TrapSpace`]; [`tab_target`] decides whether the press
//! wraps focus around or passes through to native traversal.

use kurbo::Rect;

bitflags::bitflags! {
    /// Focusability of a trap candidate.
    ///
    /// Hosts derive these from the element's presentation state: anything
    /// `display: none`/`hidden` or `visibility: hidden` clears
    /// [`FocusableFlags::VISIBLE`], and a negative tab index clears
    /// [`FocusableFlags::TAB_STOP`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct FocusableFlags: u8 {
        /// Candidate is rendered and visible.
        const VISIBLE  = 0b0000_0001;
        /// Candidate participates in the document tab order.
        const TAB_STOP = 0b0000_0010;
    }
}

impl Default for FocusableFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::TAB_STOP
    }
}

/// One focusable descendant of the panel.
#[derive(Clone, Debug)]
pub struct Focusable<K> {
    /// Identifier of this candidate.
    pub node: K,
    /// Bounds in document space. Zero-area candidates are treated as
    /// invisible regardless of their flags — collapsed elements measure
    /// nothing.
    pub bounds: Rect,
    /// Focusability flags.
    pub flags: FocusableFlags,
}

impl<K> Focusable<K> {
    fn eligible(&self) -> bool {
        self.flags
            .contains(FocusableFlags::VISIBLE | FocusableFlags::TAB_STOP)
            && self.bounds.width() > 0.0
            && self.bounds.height() > 0.0
    }
}

/// A read-only snapshot of trap candidates, in document tab order.
///
/// Rebuilt by the host per keydown; the trap never holds onto it.
#[derive(Clone, Debug)]
pub struct TrapSpace<'a, K> {
    /// Focusable descendants of the panel.
    pub nodes: &'a [Focusable<K>],
}

/// Lifecycle marker for an active focus trap.
///
/// Exists exactly while the panel is open; dropping it on close is what
/// deregisters key interception, so a session can never outlive its panel
/// state and repeated open/close cycles cannot accumulate listeners.
#[derive(Clone, Copy, Debug)]
pub struct TrapSession {
    pub(crate) opened_at: u64,
}

impl TrapSession {
    /// Timestamp (host milliseconds) at which the trap was activated.
    #[must_use]
    pub const fn opened_at(&self) -> u64 {
        self.opened_at
    }
}

/// Where a Tab press inside the trap should move focus, if anywhere.
///
/// `focused` is the currently focused node, or `None` when focus rests on no
/// element or on the document body.
///
/// - Shift+Tab on the first eligible candidate (or on no element) wraps to
///   the last.
/// - Tab on the last eligible candidate wraps to the first.
/// - Every other press returns `None` and native traversal proceeds.
#[must_use]
pub fn tab_target<K: Copy + Eq>(
    space: &TrapSpace<'_, K>,
    focused: Option<K>,
    shift: bool,
) -> Option<K> {
    let mut first = None;
    let mut last = None;
    for candidate in space.nodes.iter().filter(|c| c.eligible()) {
        if first.is_none() {
            first = Some(candidate.node);
        }
        last = Some(candidate.node);
    }
    let (first, last) = (first?, last?);

    if shift {
        match focused {
            None => Some(last),
            Some(node) if node == first => Some(last),
            Some(_) => None,
        }
    } else {
        match focused {
            Some(node) if node == last => Some(first),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(node: u32) -> Focusable<u32> {
        Focusable {
            node,
            bounds: Rect::new(0.0, 0.0, 100.0, 20.0),
            flags: FocusableFlags::default(),
        }
    }

    #[test]
    fn tab_from_last_wraps_to_first() {
        let nodes = [candidate(1), candidate(2), candidate(3)];
        let space = TrapSpace { nodes: &nodes };

        assert_eq!(tab_target(&space, Some(3), false), Some(1));
    }

    #[test]
    fn shift_tab_from_first_or_body_wraps_to_last() {
        let nodes = [candidate(1), candidate(2), candidate(3)];
        let space = TrapSpace { nodes: &nodes };

        assert_eq!(tab_target(&space, Some(1), true), Some(3));
        assert_eq!(tab_target(&space, None, true), Some(3));
    }

    #[test]
    fn interior_presses_pass_through() {
        let nodes = [candidate(1), candidate(2), candidate(3)];
        let space = TrapSpace { nodes: &nodes };

        assert_eq!(tab_target(&space, Some(2), false), None);
        assert_eq!(tab_target(&space, Some(2), true), None);
        // Forward Tab from the body uses native traversal to enter the order.
        assert_eq!(tab_target(&space, None, false), None);
    }

    #[test]
    fn ineligible_candidates_are_skipped() {
        let mut hidden = candidate(2);
        hidden.flags = FocusableFlags::TAB_STOP;
        let mut untabbable = candidate(3);
        untabbable.flags = FocusableFlags::VISIBLE;
        let mut collapsed = candidate(4);
        collapsed.bounds = Rect::new(0.0, 0.0, 0.0, 0.0);

        let nodes = [candidate(1), hidden, untabbable, collapsed, candidate(5)];
        let space = TrapSpace { nodes: &nodes };

        // Eligible order is [1, 5]: wrap happens between those two.
        assert_eq!(tab_target(&space, Some(5), false), Some(1));
        assert_eq!(tab_target(&space, Some(1), true), Some(5));
        // A skipped candidate behaves like an interior element.
        assert_eq!(tab_target(&space, Some(2), false), None);
    }

    #[test]
    fn empty_space_traps_nothing() {
        let space: TrapSpace<'_, u32> = TrapSpace { nodes: &[] };
        assert_eq!(tab_target(&space, None, true), None);
        assert_eq!(tab_target(&space, Some(1), false), None);
    }

    #[test]
    fn single_candidate_cycles_onto_itself() {
        let nodes = [candidate(1)];
        let space = TrapSpace { nodes: &nodes };

        assert_eq!(tab_target(&space, Some(1), false), Some(1));
        assert_eq!(tab_target(&space, Some(1), true), Some(1));
    }
}
