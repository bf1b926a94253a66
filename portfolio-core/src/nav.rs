//! Navigation: mobile menu state machine, section tracking, scroll plans.

use crate::config::SiteConfig;
use crate::device::ViewportTier;
use crate::timing::{ScrollMode, ScrollPlan};

/// Mobile menu states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    /// Menu collapsed; page scrolls normally.
    Closed,
    /// Menu expanded; page scroll is suspended.
    Open,
}

/// Inputs the menu reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuInput {
    /// The toggle control was activated.
    ToggleActivated,
    /// An explicit open request.
    OpenRequested,
    /// A click landed outside the navigation container.
    OutsideClick,
    /// Escape was pressed.
    EscapeKey,
    /// The classification changed to desktop.
    BecameDesktop,
    /// A navigation link was activated.
    LinkActivated,
}

/// State changes the host mirrors onto the DOM.
///
/// `Opened` means: lock page scroll, mark the toggle active, show the
/// container, set `aria-expanded=true`/`aria-hidden=false`. `Closed` is
/// the exact inverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuTransition {
    /// The menu just opened.
    Opened,
    /// The menu just closed.
    Closed,
}

/// The expandable mobile menu.
#[derive(Debug, Default)]
pub struct MobileMenu {
    state: MenuState,
}

impl Default for MenuState {
    fn default() -> Self {
        Self::Closed
    }
}

impl MobileMenu {
    /// Create a closed menu.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> MenuState {
        self.state
    }

    /// Whether the menu is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state == MenuState::Open
    }

    /// Feed an input; `None` means no state change (and no effects).
    pub fn handle(&mut self, input: MenuInput) -> Option<MenuTransition> {
        let next = match (self.state, input) {
            (MenuState::Closed, MenuInput::ToggleActivated | MenuInput::OpenRequested) => {
                MenuState::Open
            }
            (
                MenuState::Open,
                MenuInput::ToggleActivated
                | MenuInput::OutsideClick
                | MenuInput::EscapeKey
                | MenuInput::BecameDesktop
                | MenuInput::LinkActivated,
            ) => MenuState::Closed,
            _ => return None,
        };

        self.state = next;
        tracing::debug!(?input, ?next, "mobile menu transition");
        Some(match next {
            MenuState::Open => MenuTransition::Opened,
            MenuState::Closed => MenuTransition::Closed,
        })
    }
}

/// Measured geometry of one page section.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionGeometry {
    /// The section's stable identifier (its DOM id).
    pub id: String,
    /// Document-relative top (px).
    pub top: f64,
    /// Height (px).
    pub height: f64,
}

impl SectionGeometry {
    fn contains(&self, position: f64) -> bool {
        position >= self.top && position < self.top + self.height
    }
}

/// Tracks which section the viewport is in, for nav-link highlighting.
///
/// Tracking is observational only; there is no forward/back navigation
/// over the section index.
#[derive(Debug)]
pub struct SectionTracker {
    sections: Vec<SectionGeometry>,
    scroll_offset: f64,
    active: Option<usize>,
}

impl SectionTracker {
    /// Create a tracker with the configured match offset.
    #[must_use]
    pub fn new(config: &SiteConfig) -> Self {
        Self {
            sections: Vec::new(),
            scroll_offset: config.scroll_offset,
            active: None,
        }
    }

    /// Replace the measured sections (startup, and again after resize).
    pub fn set_sections(&mut self, sections: Vec<SectionGeometry>) {
        self.sections = sections;
        // Stale index from a previous layout is meaningless.
        self.active = None;
    }

    /// The measured sections, in page order.
    #[must_use]
    pub fn sections(&self) -> &[SectionGeometry] {
        &self.sections
    }

    /// Update the active section for the given scroll position.
    ///
    /// Returns the newly active section id when the highlight should move.
    /// When no section contains the probe position the previous highlight
    /// is kept; there is no "none active" state once a section has matched.
    pub fn update(&mut self, scroll_y: f64) -> Option<&str> {
        let probe = scroll_y + self.scroll_offset;
        let hit = self.sections.iter().position(|s| s.contains(probe))?;
        if self.active == Some(hit) {
            return None;
        }
        self.active = Some(hit);
        Some(&self.sections[hit].id)
    }

    /// Index of the currently highlighted section.
    #[must_use]
    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// Id of the currently highlighted section.
    #[must_use]
    pub fn active_id(&self) -> Option<&str> {
        self.active.map(|i| self.sections[i].id.as_str())
    }
}

/// Plan a scroll to a section: target is the section top minus the header
/// height, instant on mobile, animated otherwise, with the fragment pushed
/// onto the history.
#[must_use]
pub fn section_scroll_plan(
    section: &SectionGeometry,
    header_height: f64,
    tier: ViewportTier,
) -> ScrollPlan {
    ScrollPlan {
        target: section.top - header_height,
        mode: ScrollMode::for_tier(tier),
        fragment: Some(section.id.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sections() -> Vec<SectionGeometry> {
        vec![
            SectionGeometry {
                id: "inicio".to_string(),
                top: 0.0,
                height: 600.0,
            },
            SectionGeometry {
                id: "sobre".to_string(),
                top: 600.0,
                height: 800.0,
            },
            SectionGeometry {
                id: "contato".to_string(),
                top: 1400.0,
                height: 500.0,
            },
        ]
    }

    fn tracker() -> SectionTracker {
        let mut tracker = SectionTracker::new(&SiteConfig::default());
        tracker.set_sections(sections());
        tracker
    }

    #[test]
    fn menu_opens_on_toggle_and_closes_on_escape() {
        let mut menu = MobileMenu::new();
        assert_eq!(menu.handle(MenuInput::ToggleActivated), Some(MenuTransition::Opened));
        assert!(menu.is_open());
        assert_eq!(menu.handle(MenuInput::EscapeKey), Some(MenuTransition::Closed));
        assert!(!menu.is_open());
    }

    #[test]
    fn menu_ignores_close_inputs_while_closed() {
        let mut menu = MobileMenu::new();
        assert_eq!(menu.handle(MenuInput::OutsideClick), None);
        assert_eq!(menu.handle(MenuInput::EscapeKey), None);
        assert_eq!(menu.handle(MenuInput::BecameDesktop), None);
        assert_eq!(menu.state(), MenuState::Closed);
    }

    #[test]
    fn menu_closes_on_desktop_transition_and_link_activation() {
        let mut menu = MobileMenu::new();
        menu.handle(MenuInput::OpenRequested);
        assert_eq!(menu.handle(MenuInput::BecameDesktop), Some(MenuTransition::Closed));

        menu.handle(MenuInput::ToggleActivated);
        assert_eq!(menu.handle(MenuInput::LinkActivated), Some(MenuTransition::Closed));
    }

    #[test]
    fn toggle_while_open_closes() {
        let mut menu = MobileMenu::new();
        menu.handle(MenuInput::ToggleActivated);
        assert_eq!(menu.handle(MenuInput::ToggleActivated), Some(MenuTransition::Closed));
    }

    #[test]
    fn tracker_matches_section_containing_offset_probe() {
        let mut tracker = tracker();
        // scroll 0 + offset 80 lands in "inicio".
        assert_eq!(tracker.update(0.0), Some("inicio"));
        // 550 + 80 = 630 lands in "sobre".
        assert_eq!(tracker.update(550.0), Some("sobre"));
        assert_eq!(tracker.active_index(), Some(1));
    }

    #[test]
    fn tracker_reports_only_changes() {
        let mut tracker = tracker();
        assert_eq!(tracker.update(0.0), Some("inicio"));
        assert_eq!(tracker.update(100.0), None);
        assert_eq!(tracker.update(1400.0), Some("contato"));
    }

    #[test]
    fn tracker_keeps_previous_highlight_past_the_last_section() {
        let mut tracker = tracker();
        tracker.update(1400.0);
        // Past every section: highlight stays where it was.
        assert_eq!(tracker.update(10_000.0), None);
        assert_eq!(tracker.active_id(), Some("contato"));
    }

    #[test]
    fn scroll_plan_subtracts_header_and_picks_mode_by_tier() {
        let section = &sections()[1];
        let desktop = section_scroll_plan(section, 72.0, ViewportTier::Desktop);
        assert!((desktop.target - 528.0).abs() < f64::EPSILON);
        assert_eq!(desktop.mode, ScrollMode::Smooth);
        assert_eq!(desktop.fragment.as_deref(), Some("sobre"));

        let mobile = section_scroll_plan(section, 72.0, ViewportTier::Mobile);
        assert_eq!(mobile.mode, ScrollMode::Instant);
    }
}
