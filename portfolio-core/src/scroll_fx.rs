//! Scroll-position effects: header appearance, back-to-top, viewport unit.

use crate::device::ViewportTier;
use crate::timing::{ScrollMode, ScrollPlan};

/// Scroll depth past which the header takes its "scrolled" style (px).
const HEADER_SCROLLED_AT: f64 = 50.0;

/// Scroll depth past which downward motion hides the header (px, desktop).
const HEADER_HIDE_AT: f64 = 200.0;

/// Scroll depth past which the back-to-top control shows (px).
const BACK_TO_TOP_AT: f64 = 300.0;

/// DOM mutations produced by a scroll frame. Only changes are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollEffect {
    /// Toggle the header's "scrolled" class.
    SetHeaderScrolled(bool),
    /// Translate the header out of / back into view.
    SetHeaderHidden(bool),
    /// Toggle the back-to-top control.
    SetBackToTopVisible(bool),
}

/// DOM mutations produced by a resize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResizeEffect {
    /// Set the `--vh` custom property (1% of the inner height, px).
    SetVhUnit(f64),
    /// Clear any header hide transform.
    ResetHeaderTransform,
}

/// Per-frame scroll effect state.
#[derive(Debug, Default)]
pub struct ScrollFx {
    last_scroll_y: f64,
    scrolled: bool,
    hidden: bool,
    back_to_top: bool,
}

impl ScrollFx {
    /// Create with everything in its top-of-page state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Process one animation-frame scroll sample.
    ///
    /// The header hides only on desktop, only past the hide depth, and
    /// only while the delta since the last sample is positive; any upward
    /// motion shows it again. Mobile and tablet never hide the header.
    pub fn on_frame(&mut self, scroll_y: f64, tier: ViewportTier) -> Vec<ScrollEffect> {
        let mut effects = Vec::new();

        let scrolled = scroll_y > HEADER_SCROLLED_AT;
        if scrolled != self.scrolled {
            self.scrolled = scrolled;
            effects.push(ScrollEffect::SetHeaderScrolled(scrolled));
        }

        if tier == ViewportTier::Desktop {
            let hidden = scroll_y > self.last_scroll_y && scroll_y > HEADER_HIDE_AT;
            if hidden != self.hidden {
                self.hidden = hidden;
                effects.push(ScrollEffect::SetHeaderHidden(hidden));
            }
        } else if self.hidden {
            self.hidden = false;
            effects.push(ScrollEffect::SetHeaderHidden(false));
        }

        let back_to_top = scroll_y > BACK_TO_TOP_AT;
        if back_to_top != self.back_to_top {
            self.back_to_top = back_to_top;
            effects.push(ScrollEffect::SetBackToTopVisible(back_to_top));
        }

        self.last_scroll_y = scroll_y;
        effects
    }

    /// Process a resize: recompute the mobile viewport unit and reset any
    /// header transform left over from a tier change.
    pub fn on_resize(&mut self, inner_height: f64, tier: ViewportTier) -> Vec<ResizeEffect> {
        self.hidden = false;
        let mut effects = vec![ResizeEffect::ResetHeaderTransform];
        if tier == ViewportTier::Mobile {
            effects.push(ResizeEffect::SetVhUnit(viewport_unit(inner_height)));
        }
        effects
    }

    /// Last scroll position sampled.
    #[must_use]
    pub fn last_scroll_y(&self) -> f64 {
        self.last_scroll_y
    }
}

/// 1% of the viewport inner height, the `--vh` unit value (px).
///
/// Compensates for mobile browser chrome resizing the visual viewport.
#[must_use]
pub fn viewport_unit(inner_height: f64) -> f64 {
    inner_height * 0.01
}

/// The back-to-top control's scroll plan: offset 0, instant on mobile.
#[must_use]
pub fn back_to_top_plan(tier: ViewportTier) -> ScrollPlan {
    ScrollPlan {
        target: 0.0,
        mode: ScrollMode::for_tier(tier),
        fragment: None,
    }
}
