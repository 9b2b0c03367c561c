// Copyright 2025 the Masthead Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end walkthrough: wiring the Masthead crates to a mock host.
//!
//! This example plays the role of the environment: it owns a tiny in-memory
//! "document", applies every effect batch the core emits, and drives the
//! dispatcher through a realistic session — initialization, opening the
//! panel, the forced-focus settle, Tab cycling, Escape, a breakpoint
//! crossing, and scrolling through the page sections.
//!
//! Run:
//! - `cargo run -p masthead_demos --example site_header`

use std::collections::HashMap;

use kurbo::Rect;
use masthead_dispatch::scheme::PreferenceStore;
use masthead_dispatch::{Bindings, ControlRole, Dispatcher, MapParent};
use masthead_effects::{ColorScheme, Effect, EffectBatch};
use masthead_panel::{Focusable, FocusableFlags, Key, PanelController, TrapSpace};
use masthead_scrollspy::{Section, SectionView};

const NAVBAR: u32 = 1;
const PANEL: u32 = 2;
const TOGGLE: u32 = 3;
const SCHEME_TOGGLE: u32 = 4;
const LINK_HOME: u32 = 10;
const LINK_ABOUT: u32 = 11;
const LINK_CONTACT: u32 = 12;

/// A minimal document: per-node attribute state plus a few globals.
#[derive(Default)]
struct MockHost {
    attrs: HashMap<u32, HashMap<&'static str, String>>,
    focused: Option<u32>,
    scroll_locked: bool,
    viewport_unit: f64,
    scheme: Option<ColorScheme>,
}

impl MockHost {
    fn apply(&mut self, batch: &EffectBatch<u32>) {
        for effect in batch {
            match *effect {
                Effect::SetHidden { node, hidden } => {
                    self.set(node, "hidden", hidden.to_string());
                }
                Effect::SetAriaHidden { node, hidden } => {
                    self.set(node, "aria-hidden", hidden.to_string());
                }
                Effect::ClearAriaHidden { node } => {
                    if let Some(attrs) = self.attrs.get_mut(&node) {
                        attrs.remove("aria-hidden");
                    }
                }
                Effect::SetAriaExpanded { node, expanded } => {
                    self.set(node, "aria-expanded", expanded.to_string());
                }
                Effect::SetTabStop { node, stop } => {
                    if stop {
                        self.set(node, "tabindex", "0".to_owned());
                    } else if let Some(attrs) = self.attrs.get_mut(&node) {
                        attrs.remove("tabindex");
                    }
                }
                Effect::Focus { node } => self.focused = Some(node),
                Effect::Blur { node } => {
                    if self.focused == Some(node) {
                        self.focused = None;
                    }
                }
                Effect::SetActive { node, active } => {
                    self.set(node, "active", active.to_string());
                }
                Effect::SetScrolled { node, scrolled } => {
                    self.set(node, "scrolled", scrolled.to_string());
                }
                Effect::SetScrollLock { locked } => self.scroll_locked = locked,
                Effect::PublishViewportUnit { px } => self.viewport_unit = px,
                Effect::ApplyColorScheme { scheme } => self.scheme = Some(scheme),
            }
        }
    }

    fn set(&mut self, node: u32, key: &'static str, value: String) {
        self.attrs.entry(node).or_default().insert(key, value);
    }

    fn describe(&self, node: u32) -> String {
        match self.attrs.get(&node) {
            Some(attrs) => {
                let mut pairs: Vec<_> =
                    attrs.iter().map(|(k, v)| format!("{k}={v}")).collect();
                pairs.sort();
                pairs.join(" ")
            }
            None => "(no attributes)".to_owned(),
        }
    }
}

#[derive(Default)]
struct MemoryPrefs(Option<ColorScheme>);

impl PreferenceStore for MemoryPrefs {
    fn load(&self) -> Option<ColorScheme> {
        self.0
    }

    fn store(&mut self, scheme: ColorScheme) {
        self.0 = Some(scheme);
    }
}

fn sections() -> Vec<Section<u32>> {
    vec![
        Section {
            link: LINK_HOME,
            bounds: Rect::new(0.0, 0.0, 800.0, 600.0),
            margin_top: 0.0,
        },
        Section {
            link: LINK_ABOUT,
            bounds: Rect::new(0.0, 600.0, 800.0, 1400.0),
            margin_top: 40.0,
        },
        Section {
            link: LINK_CONTACT,
            bounds: Rect::new(0.0, 1400.0, 800.0, 2000.0),
            margin_top: 40.0,
        },
    ]
}

fn trap_nodes() -> Vec<Focusable<u32>> {
    [LINK_HOME, LINK_ABOUT, LINK_CONTACT]
        .iter()
        .map(|&node| Focusable {
            node,
            bounds: Rect::new(0.0, 0.0, 200.0, 24.0),
            flags: FocusableFlags::default(),
        })
        .collect()
}

fn main() {
    // Element wiring: the panel and the toggle live in the navbar; the links
    // live in the panel.
    let mut parent = MapParent::new();
    parent.insert(PANEL, NAVBAR);
    parent.insert(TOGGLE, NAVBAR);
    parent.insert(SCHEME_TOGGLE, NAVBAR);
    for link in [LINK_HOME, LINK_ABOUT, LINK_CONTACT] {
        parent.insert(link, PANEL);
    }

    let mut bindings = Bindings::new();
    bindings.bind(TOGGLE, ControlRole::PanelToggle);
    bindings.bind(SCHEME_TOGGLE, ControlRole::SchemeToggle);

    let controller = PanelController::new(Some(PANEL), vec![TOGGLE]);
    let mut dispatcher = Dispatcher::new(parent, bindings, controller, 1024.0, Some(NAVBAR));

    let mut host = MockHost::default();
    let mut prefs = MemoryPrefs::default();

    println!("== initialize at 800x600 (mobile layout) ==");
    let batch = dispatcher.initialize(800.0, 600.0);
    host.apply(&batch);
    println!("viewport unit: {}px", host.viewport_unit);
    println!("panel: {}", host.describe(PANEL));

    println!("\n== click the toggle at t=1000 ==");
    let batch = dispatcher.on_click(Some(TOGGLE), &mut prefs, ColorScheme::Light, 1_000);
    host.apply(&batch);
    println!("panel:  {}", host.describe(PANEL));
    println!("toggle: {}", host.describe(TOGGLE));
    println!("scroll locked: {}", host.scroll_locked);

    // Drive the forced-focus settle to completion.
    while let Some(deadline) = dispatcher.next_deadline() {
        let batch = dispatcher.poll(deadline);
        host.apply(&batch);
        println!("t={deadline}: focused={:?}", host.focused);
    }

    println!("\n== Tab from the last link wraps to the first ==");
    let nodes = trap_nodes();
    let space = TrapSpace { nodes: &nodes };
    host.focused = Some(LINK_CONTACT);
    let response = dispatcher.on_key(Key::Tab { shift: false }, host.focused, &space);
    host.apply(&response.effects);
    println!(
        "focused={:?} (default prevented: {})",
        host.focused, response.default_prevented
    );

    println!("\n== Escape dismisses the panel ==");
    let response = dispatcher.on_key(Key::Escape, host.focused, &space);
    host.apply(&response.effects);
    println!("panel: {}", host.describe(PANEL));
    println!("scroll locked: {}", host.scroll_locked);

    println!("\n== resize to 1280x720 (inline layout) ==");
    let sections = sections();
    let view = SectionView {
        navbar_height: 64.0,
        sections: &sections,
    };
    let batch = dispatcher.on_resize(1280.0, 720.0, 0.0, &view);
    host.apply(&batch);
    println!("panel: {}", host.describe(PANEL));

    println!("\n== scroll through the page ==");
    for scroll_y in [0.0, 700.0, 1500.0] {
        let batch = dispatcher.on_scroll(scroll_y, &view, 1.0);
        host.apply(&batch);
        let active: Vec<u32> = [LINK_HOME, LINK_ABOUT, LINK_CONTACT]
            .into_iter()
            .filter(|&link| {
                host.attrs
                    .get(&link)
                    .and_then(|attrs| attrs.get("active"))
                    .is_some_and(|v| v == "true")
            })
            .collect();
        println!(
            "scroll_y={scroll_y}: active links {active:?}, navbar {}",
            host.describe(NAVBAR)
        );
    }

    println!("\n== toggle the color scheme ==");
    let batch = dispatcher.on_click(Some(SCHEME_TOGGLE), &mut prefs, ColorScheme::Light, 9_000);
    host.apply(&batch);
    println!("applied scheme: {:?}", host.scheme);
}
