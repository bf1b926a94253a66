//! Scroll-triggered one-shot reveal animations.
//!
//! Each observed element is classified once at setup into a [`RevealKind`];
//! on first viewport entry at sufficient ratio the ledger emits a
//! [`Timeline`] of effects the host applies as the delays come due. An
//! element, once revealed, is never re-animated.

use std::collections::HashSet;

use crate::device::ViewportTier;
use crate::timing::Timeline;

/// Minimum intersection ratio that counts as "entered".
pub const REVEAL_THRESHOLD: f64 = 0.1;

/// Number of discrete frames in a counter animation.
const COUNTER_STEPS: u32 = 60;

/// Delay before the code box appears (ms).
const CODE_BOX_DELAY_MS: f64 = 200.0;

/// Delay before the first benefit item appears (ms).
const BENEFIT_BASE_DELAY_MS: f64 = 400.0;

/// Per-benefit stagger step (ms).
const BENEFIT_STEP_MS: f64 = 100.0;

fn is_mobile(tier: ViewportTier) -> bool {
    tier == ViewportTier::Mobile
}

/// Element role, assigned once at setup; drives the effect dispatch table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealKind {
    /// Generic container: visibility class toggle only.
    Container,
    /// Timeline entry: delayed transform reset.
    TimelineEntry,
    /// Gallery entry: per-sibling staggered lift.
    GalleryEntry {
        /// Position among siblings, drives the stagger.
        sibling_index: usize,
    },
    /// Testimonial card: per-sibling staggered scale+translate reset.
    TestimonialCard {
        /// Position among siblings, drives the stagger.
        sibling_index: usize,
    },
    /// Statistic counter: animated count-up to the displayed value.
    StatCounter {
        /// The target text as displayed (e.g. `"1500+"`).
        display: String,
    },
    /// The code section: staged box-then-benefits reveal.
    CodeSection {
        /// Number of benefit items to stagger in after the box.
        benefit_count: usize,
    },
}

/// One DOM-facing step of a reveal.
#[derive(Debug, Clone, PartialEq)]
pub enum RevealEffect {
    /// Add the revealed marker class (always first, never removed).
    MarkVisible,
    /// Timeline entry: opacity 1, `translateX(0)`.
    ResetTransform,
    /// Gallery entry: opacity 1, `translateY(0)`.
    LiftIn,
    /// Testimonial card: opacity 1, `scale(1) translateY(0)`.
    PopIn,
    /// Statistic counter frame: set the displayed text.
    SetCounterText(String),
    /// Code section: show the code box (opacity 1, `scale(1)`).
    ShowCodeBox,
    /// Code section: show benefit item `0..n` (opacity 1, `translateX(0)`).
    ShowBenefit(usize),
}

/// Hero entry steps, played once at startup rather than on intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeroEffect {
    /// Add the entry class to the hero text block.
    ShowText,
    /// Add the entry class to the hero image block.
    ShowImage,
}

/// The hero entry animation: text at 100 ms, image at 200/300 ms.
#[must_use]
pub fn hero_entry_plan(tier: ViewportTier) -> Timeline<HeroEffect> {
    let mut timeline = Timeline::new();
    timeline.push(100.0, HeroEffect::ShowText);
    timeline.push(
        if is_mobile(tier) { 200.0 } else { 300.0 },
        HeroEffect::ShowImage,
    );
    timeline
}

/// Animated count-up from 0 to a target parsed from the displayed text.
///
/// Runs in [`COUNTER_STEPS`] discrete frames; the final frame always snaps
/// to the exact original text so step rounding can never drift the result.
#[derive(Debug, Clone)]
pub struct CounterAnimation {
    display: String,
    target: u64,
    plus: bool,
    percent: bool,
    duration_ms: f64,
}

impl CounterAnimation {
    /// Parse the displayed text; `None` when it holds no digits.
    #[must_use]
    pub fn new(display: &str, tier: ViewportTier) -> Option<Self> {
        let digits: String = display.chars().filter(char::is_ascii_digit).collect();
        let target = digits.parse().ok()?;
        Some(Self {
            display: display.to_string(),
            target,
            plus: display.contains('+'),
            percent: display.contains('%'),
            duration_ms: if is_mobile(tier) { 1000.0 } else { 1500.0 },
        })
    }

    /// Total animation duration (ms).
    #[must_use]
    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    /// Displayed text for the given frame, `1..=COUNTER_STEPS`.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn frame_text(&self, step: u32) -> String {
        if step >= COUNTER_STEPS {
            return self.display.clone();
        }
        let raw = (self.target as f64 / f64::from(COUNTER_STEPS) * f64::from(step)).floor();
        let value = (raw as u64).min(self.target);
        let mut text = value.to_string();
        if self.plus {
            text.push('+');
        }
        if self.percent {
            text.push('%');
        }
        text
    }

    /// All frames as `(delay, text)` entries, offset by `base_delay_ms`.
    fn frames_into(&self, base_delay_ms: f64, timeline: &mut Timeline<RevealEffect>) {
        let step_ms = self.duration_ms / f64::from(COUNTER_STEPS);
        for step in 1..=COUNTER_STEPS {
            timeline.push(
                base_delay_ms + step_ms * f64::from(step),
                RevealEffect::SetCounterText(self.frame_text(step)),
            );
        }
    }
}

/// Build the effect timeline for one element entering the viewport.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn reveal_plan(kind: &RevealKind, tier: ViewportTier) -> Timeline<RevealEffect> {
    let base_delay = if is_mobile(tier) { 100.0 } else { 150.0 };
    let mut timeline = Timeline::new();
    timeline.push(0.0, RevealEffect::MarkVisible);

    match kind {
        RevealKind::Container => {}
        RevealKind::TimelineEntry => {
            timeline.push(base_delay, RevealEffect::ResetTransform);
        }
        RevealKind::GalleryEntry { sibling_index } => {
            let step = if is_mobile(tier) { 50.0 } else { 100.0 };
            timeline.push(*sibling_index as f64 * step, RevealEffect::LiftIn);
        }
        RevealKind::TestimonialCard { sibling_index } => {
            let step = if is_mobile(tier) { 100.0 } else { 150.0 };
            timeline.push(*sibling_index as f64 * step, RevealEffect::PopIn);
        }
        RevealKind::StatCounter { display } => {
            if let Some(counter) = CounterAnimation::new(display, tier) {
                counter.frames_into(base_delay, &mut timeline);
            }
        }
        RevealKind::CodeSection { benefit_count } => {
            timeline.push(CODE_BOX_DELAY_MS, RevealEffect::ShowCodeBox);
            for index in 0..*benefit_count {
                timeline.push(
                    BENEFIT_BASE_DELAY_MS + index as f64 * BENEFIT_STEP_MS,
                    RevealEffect::ShowBenefit(index),
                );
            }
        }
    }

    timeline
}

/// Write-once record of revealed elements, with a visibility-driven pause.
#[derive(Debug, Default)]
pub struct RevealLedger {
    revealed: HashSet<String>,
    paused: bool,
}

impl RevealLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Process an intersection sample for the keyed element.
    ///
    /// Returns the element's effect timeline exactly once: on its first
    /// entry at ratio ≥ [`REVEAL_THRESHOLD`] while not paused. Repeat
    /// intersections, sub-threshold ratios, and paused samples are no-ops.
    pub fn observe(
        &mut self,
        key: &str,
        ratio: f64,
        kind: &RevealKind,
        tier: ViewportTier,
    ) -> Option<Timeline<RevealEffect>> {
        if self.paused || ratio < REVEAL_THRESHOLD || self.revealed.contains(key) {
            return None;
        }
        self.revealed.insert(key.to_string());
        tracing::debug!(key, ?kind, "element revealed");
        Some(reveal_plan(kind, tier))
    }

    /// Whether the keyed element has been revealed.
    #[must_use]
    pub fn is_revealed(&self, key: &str) -> bool {
        self.revealed.contains(key)
    }

    /// Mark every key revealed without animation.
    ///
    /// The fallback when intersection observation is unavailable or the
    /// user prefers reduced motion: content must still become visible.
    pub fn reveal_all<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for key in keys {
            self.revealed.insert(key.into());
        }
    }

    /// Suspend new reveal processing (page hidden).
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume reveal processing (page visible again).
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Whether reveal processing is suspended.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESKTOP: ViewportTier = ViewportTier::Desktop;
    const MOBILE: ViewportTier = ViewportTier::Mobile;

    #[test]
    fn reveal_is_one_shot() {
        let mut ledger = RevealLedger::new();
        let kind = RevealKind::Container;

        assert!(ledger.observe("sobre", 0.4, &kind, DESKTOP).is_some());
        // Leaves and re-enters any number of times: never re-animated.
        for _ in 0..5 {
            assert!(ledger.observe("sobre", 0.9, &kind, DESKTOP).is_none());
        }
        assert!(ledger.is_revealed("sobre"));
    }

    #[test]
    fn sub_threshold_ratio_does_not_reveal() {
        let mut ledger = RevealLedger::new();
        assert!(ledger.observe("x", 0.05, &RevealKind::Container, DESKTOP).is_none());
        assert!(!ledger.is_revealed("x"));
        assert!(ledger.observe("x", 0.1, &RevealKind::Container, DESKTOP).is_some());
    }

    #[test]
    fn paused_ledger_defers_without_discarding_prior_reveals() {
        let mut ledger = RevealLedger::new();
        ledger.observe("a", 0.5, &RevealKind::Container, DESKTOP);

        ledger.pause();
        assert!(ledger.observe("b", 0.5, &RevealKind::Container, DESKTOP).is_none());
        assert!(ledger.is_revealed("a"));

        ledger.resume();
        assert!(ledger.observe("b", 0.5, &RevealKind::Container, DESKTOP).is_some());
    }

    #[test]
    fn reveal_all_marks_everything_without_animation() {
        let mut ledger = RevealLedger::new();
        ledger.reveal_all(["a", "b", "c"]);
        assert!(ledger.is_revealed("b"));
        assert!(ledger.observe("c", 0.9, &RevealKind::Container, DESKTOP).is_none());
    }

    #[test]
    fn container_plan_is_visibility_only() {
        let mut plan = reveal_plan(&RevealKind::Container, DESKTOP);
        assert_eq!(plan.drain_due(0.0), vec![RevealEffect::MarkVisible]);
        assert!(plan.is_empty());
    }

    #[test]
    fn timeline_entry_resets_transform_after_tier_delay() {
        let mut desktop = reveal_plan(&RevealKind::TimelineEntry, DESKTOP);
        desktop.drain_due(0.0);
        assert_eq!(desktop.next_delay(), Some(150.0));

        let mut mobile = reveal_plan(&RevealKind::TimelineEntry, MOBILE);
        mobile.drain_due(0.0);
        assert_eq!(mobile.next_delay(), Some(100.0));
    }

    #[test]
    fn gallery_stagger_scales_with_sibling_index() {
        let mut plan = reveal_plan(&RevealKind::GalleryEntry { sibling_index: 3 }, DESKTOP);
        plan.drain_due(0.0);
        assert_eq!(plan.next_delay(), Some(300.0));

        let mut mobile = reveal_plan(&RevealKind::GalleryEntry { sibling_index: 3 }, MOBILE);
        mobile.drain_due(0.0);
        assert_eq!(mobile.next_delay(), Some(150.0));
    }

    #[test]
    fn testimonial_stagger_uses_its_own_step() {
        let mut plan = reveal_plan(&RevealKind::TestimonialCard { sibling_index: 2 }, DESKTOP);
        plan.drain_due(0.0);
        assert_eq!(plan.drain_due(300.0), vec![RevealEffect::PopIn]);
    }

    #[test]
    fn code_section_staggers_box_then_benefits() {
        let mut plan = reveal_plan(&RevealKind::CodeSection { benefit_count: 3 }, DESKTOP);
        assert_eq!(plan.drain_due(0.0), vec![RevealEffect::MarkVisible]);
        assert_eq!(plan.drain_due(200.0), vec![RevealEffect::ShowCodeBox]);
        assert_eq!(plan.drain_due(400.0), vec![RevealEffect::ShowBenefit(0)]);
        assert_eq!(
            plan.drain_due(600.0),
            vec![RevealEffect::ShowBenefit(1), RevealEffect::ShowBenefit(2)]
        );
    }

    #[test]
    fn counter_final_frame_snaps_to_exact_original_text() {
        let counter = CounterAnimation::new("1500+", DESKTOP).unwrap();
        assert_eq!(counter.frame_text(60), "1500+");
        // Intermediate frames carry the suffix too.
        assert_eq!(counter.frame_text(30), "750+");
    }

    #[test]
    fn counter_preserves_percent_suffix() {
        let counter = CounterAnimation::new("98%", MOBILE).unwrap();
        assert!((counter.duration_ms() - 1000.0).abs() < f64::EPSILON);
        assert_eq!(counter.frame_text(60), "98%");
        let mid = counter.frame_text(30);
        assert!(mid.ends_with('%'), "mid frame {mid} should keep the suffix");
    }

    #[test]
    fn counter_intermediate_frames_never_overshoot() {
        let counter = CounterAnimation::new("7+", DESKTOP).unwrap();
        for step in 1..=60 {
            let text = counter.frame_text(step);
            let value: u64 = text.trim_end_matches('+').parse().unwrap();
            assert!(value <= 7);
        }
    }

    #[test]
    fn non_numeric_stat_yields_no_counter() {
        assert!(CounterAnimation::new("∞", DESKTOP).is_none());
        let mut plan = reveal_plan(
            &RevealKind::StatCounter {
                display: "—".to_string(),
            },
            DESKTOP,
        );
        assert_eq!(plan.drain_due(0.0), vec![RevealEffect::MarkVisible]);
        assert!(plan.is_empty());
    }

    #[test]
    fn stat_counter_plan_ends_with_exact_text() {
        let mut plan = reveal_plan(
            &RevealKind::StatCounter {
                display: "1500+".to_string(),
            },
            DESKTOP,
        );
        // Base delay 150 + full 1500ms run.
        let effects = plan.drain_due(150.0 + 1500.0);
        let last = effects.last().unwrap();
        assert_eq!(*last, RevealEffect::SetCounterText("1500+".to_string()));
        assert!(plan.is_empty());
    }

    #[test]
    fn hero_plan_orders_text_before_image() {
        let mut plan = hero_entry_plan(DESKTOP);
        assert_eq!(plan.drain_due(100.0), vec![HeroEffect::ShowText]);
        assert_eq!(plan.drain_due(300.0), vec![HeroEffect::ShowImage]);

        let mobile = hero_entry_plan(MOBILE);
        assert_eq!(mobile.next_delay(), Some(100.0));
    }
}
