// Copyright 2025 the Masthead Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Masthead Scrollspy: scroll-position classification for a section list.
//!
//! Given the current scroll offset and a snapshot of page sections, this
//! crate determines which section is "in view" and emits the active-link
//! styling for the navigation list bound to those sections.
//!
//! ## Snapshots
//!
//! Sections are described by [`Section`] values — the bound navigation link,
//! the section's bounding box in document space, and its top margin — and are
//! borrowed per evaluation through a [`SectionView`]. Snapshots are
//! deliberately *not* cached across calls: responsive reflow can move every
//! section between two scroll events, so the host measures fresh bounds each
//! time it asks for a classification.
//!
//! ## Classification
//!
//! [`active_section`] evaluates sections in sequence order. A section matches
//! when the scroll offset falls inside its adjusted range (top shifted up by
//! the fixed navbar height and the section's own top margin, height extended
//! by that margin). When adjacent ranges momentarily overlap during fast
//! scrolling or reflow, the **last** matching section wins — later sections
//! are checked after earlier ones and overwrite them. That ordering is part
//! of the observable contract and is preserved as-is.
//!
//! ```rust
//! use kurbo::Rect;
//! use masthead_scrollspy::{Section, SectionView, active_section};
//!
//! let sections = [
//!     Section { link: 1_u32, bounds: Rect::new(0.0, 0.0, 800.0, 100.0), margin_top: 0.0 },
//!     Section { link: 2_u32, bounds: Rect::new(0.0, 100.0, 800.0, 200.0), margin_top: 0.0 },
//! ];
//! let view = SectionView { navbar_height: 0.0, sections: &sections };
//!
//! assert_eq!(active_section(&view, 50.0), Some(0));
//! assert_eq!(active_section(&view, 150.0), Some(1));
//! assert_eq!(active_section(&view, 250.0), None);
//! ```
//!
//! [`mark_active`] turns a classification into effects: exactly the winning
//! link is marked active, every other link gets its default styling back.
//!
//! [`NavbarChrome`] additionally tracks whether the page is scrolled away
//! from the top at all, emitting a [`Effect::SetScrolled`] intent on
//! transitions so the host can swap the navbar's border styling.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use kurbo::Rect;
use masthead_effects::{Effect, EffectBatch};

/// One page section and the navigation link bound to it.
///
/// Bounds are in document space (the same space as the scroll offset), with
/// `y0` at the section's top edge.
#[derive(Clone, Debug)]
pub struct Section<K> {
    /// Navigation link associated with this section.
    pub link: K,
    /// Bounding box of the section in document space.
    pub bounds: Rect,
    /// Top margin of the section, folded into the classification range so a
    /// section becomes active as its margin scrolls under the navbar.
    pub margin_top: f64,
}

/// A read-only snapshot of the section list for one evaluation.
///
/// Hosts rebuild this view per scroll/resize notification from freshly
/// measured layout; classification never holds onto it.
#[derive(Clone, Debug)]
pub struct SectionView<'a, K> {
    /// Height of the fixed navbar, subtracted from every section top.
    pub navbar_height: f64,
    /// Sections in page order.
    pub sections: &'a [Section<K>],
}

/// Index of the section containing the scroll offset, if any.
///
/// Evaluates sections in order; the last match wins when ranges overlap.
#[must_use]
pub fn active_section<K>(view: &SectionView<'_, K>, scroll_y: f64) -> Option<usize> {
    let mut active = None;
    for (i, section) in view.sections.iter().enumerate() {
        let top = section.bounds.y0 - view.navbar_height - section.margin_top;
        let height = section.bounds.height() + section.margin_top;
        if top <= scroll_y && scroll_y < top + height {
            active = Some(i);
        }
    }
    active
}

/// Classify and emit active-link styling for every section link.
///
/// Exactly the link of the active section (if any) is marked active; all
/// other links are reset to default styling. An empty section list yields an
/// empty batch.
#[must_use]
pub fn mark_active<K: Copy>(view: &SectionView<'_, K>, scroll_y: f64) -> EffectBatch<K> {
    let active = active_section(view, scroll_y);
    let mut out = EffectBatch::new();
    for (i, section) in view.sections.iter().enumerate() {
        out.push(Effect::SetActive {
            node: section.link,
            active: active == Some(i),
        });
    }
    out
}

/// Tracks the navbar's scrolled chrome and emits changes.
///
/// The navbar swaps its border styling once the page is scrolled past a small
/// threshold (the navbar's own border extent, measured by the host per
/// event). The tracker remembers the last committed value and emits only on
/// transitions, so a stream of scroll events at a stable position produces no
/// redundant mutations.
#[derive(Clone, Debug)]
pub struct NavbarChrome<K> {
    navbar: Option<K>,
    scrolled: Option<bool>,
}

impl<K: Copy> NavbarChrome<K> {
    /// Create a tracker for the given navbar handle.
    ///
    /// An absent handle makes [`NavbarChrome::update`] a silent no-op; pages
    /// without a navbar reuse the same wiring.
    #[must_use]
    pub fn new(navbar: Option<K>) -> Self {
        Self {
            navbar,
            scrolled: None,
        }
    }

    /// Re-evaluate the scrolled state and return the chrome change, if any.
    pub fn update(&mut self, scroll_y: f64, threshold: f64) -> Option<Effect<K>> {
        let navbar = self.navbar?;
        let scrolled = scroll_y > threshold;
        if self.scrolled == Some(scrolled) {
            return None;
        }
        self.scrolled = Some(scrolled);
        Some(Effect::SetScrolled {
            node: navbar,
            scrolled,
        })
    }

    /// Last committed scrolled state, `None` before the first update.
    #[must_use]
    pub const fn scrolled(&self) -> Option<bool> {
        self.scrolled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    fn two_sections() -> Vec<Section<u32>> {
        vec![
            Section {
                link: 1,
                bounds: Rect::new(0.0, 0.0, 800.0, 100.0),
                margin_top: 0.0,
            },
            Section {
                link: 2,
                bounds: Rect::new(0.0, 100.0, 800.0, 200.0),
                margin_top: 0.0,
            },
        ]
    }

    #[test]
    fn classification_is_deterministic_at_boundaries() {
        let sections = two_sections();
        let view = SectionView {
            navbar_height: 0.0,
            sections: &sections,
        };

        assert_eq!(active_section(&view, 50.0), Some(0));
        assert_eq!(active_section(&view, 150.0), Some(1));
        // Ranges are half-open: the shared boundary belongs to the later section.
        assert_eq!(active_section(&view, 100.0), Some(1));
        // Past the last section nothing is active.
        assert_eq!(active_section(&view, 250.0), None);
    }

    #[test]
    fn navbar_height_and_margin_shift_the_range() {
        let sections = vec![Section {
            link: 1_u32,
            bounds: Rect::new(0.0, 200.0, 800.0, 300.0),
            margin_top: 20.0,
        }];
        let view = SectionView {
            navbar_height: 60.0,
            sections: &sections,
        };

        // top = 200 - 60 - 20 = 120, height = 100 + 20 = 120.
        assert_eq!(active_section(&view, 119.9), None);
        assert_eq!(active_section(&view, 120.0), Some(0));
        assert_eq!(active_section(&view, 239.9), Some(0));
        assert_eq!(active_section(&view, 240.0), None);
    }

    #[test]
    fn overlapping_ranges_resolve_to_the_last_match() {
        let sections = vec![
            Section {
                link: 1_u32,
                bounds: Rect::new(0.0, 0.0, 800.0, 150.0),
                margin_top: 0.0,
            },
            // Overlaps the first section's range from 100 to 150.
            Section {
                link: 2,
                bounds: Rect::new(0.0, 100.0, 800.0, 250.0),
                margin_top: 0.0,
            },
        ];
        let view = SectionView {
            navbar_height: 0.0,
            sections: &sections,
        };

        assert_eq!(active_section(&view, 120.0), Some(1));
    }

    #[test]
    fn mark_active_styles_exactly_one_link() {
        let sections = two_sections();
        let view = SectionView {
            navbar_height: 0.0,
            sections: &sections,
        };

        let batch = mark_active(&view, 150.0);
        assert_eq!(
            batch.as_slice(),
            &[
                Effect::SetActive {
                    node: 1,
                    active: false
                },
                Effect::SetActive {
                    node: 2,
                    active: true
                },
            ]
        );

        // No section active: every link reverts to default styling.
        let batch = mark_active(&view, 250.0);
        assert!(
            batch
                .iter()
                .all(|e| matches!(e, Effect::SetActive { active: false, .. })),
            "no link may stay active outside every section"
        );
    }

    #[test]
    fn chrome_emits_only_on_transitions() {
        let mut chrome = NavbarChrome::new(Some(9_u32));

        // First evaluation commits the initial state.
        assert_eq!(
            chrome.update(0.0, 2.0),
            Some(Effect::SetScrolled {
                node: 9,
                scrolled: false
            })
        );
        // Stable position: nothing to emit.
        assert_eq!(chrome.update(1.0, 2.0), None);
        // Crossing the threshold emits once.
        assert_eq!(
            chrome.update(10.0, 2.0),
            Some(Effect::SetScrolled {
                node: 9,
                scrolled: true
            })
        );
        assert_eq!(chrome.update(400.0, 2.0), None);
        assert_eq!(chrome.scrolled(), Some(true));
    }

    #[test]
    fn chrome_without_navbar_is_a_no_op() {
        let mut chrome: NavbarChrome<u32> = NavbarChrome::new(None);
        assert_eq!(chrome.update(100.0, 2.0), None);
        assert_eq!(chrome.scrolled(), None);
    }
}
