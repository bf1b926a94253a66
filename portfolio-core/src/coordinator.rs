//! The composition root.
//!
//! [`Portfolio`] owns every component plus the shared device classifier,
//! and turns browser events into effect plans. The browser host feeds it
//! snapshots and applies what comes back; nothing here touches a document.

use url::Url;

use crate::analytics::{AnalyticsEvent, AnalyticsSink};
use crate::config::SiteConfig;
use crate::contact::{Field, FieldError, FormNotice, Submission};
use crate::device::{
    Classification, DeviceClassifier, DeviceSignals, ViewportTier, ALL_MARKER_CLASSES,
};
use crate::error::PortfolioResult;
use crate::interaction::{copy_feedback, CopyFeedback};
use crate::lazy::LazyImages;
use crate::nav::{MenuInput, MenuTransition, MobileMenu, SectionGeometry, SectionTracker};
use crate::reveal::{hero_entry_plan, HeroEffect, RevealEffect, RevealKind, RevealLedger};
use crate::scroll_fx::{back_to_top_plan, viewport_unit, ResizeEffect, ScrollEffect, ScrollFx};
use crate::timing::{FrameGate, ScrollPlan, Timeline};

/// Delay before a resize pass runs after an orientation change (ms),
/// letting the viewport settle first.
pub const ORIENTATION_SETTLE_MS: f64 = 100.0;

/// Document-root class update mirroring the classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyClassUpdate {
    /// Stale marker classes to remove first.
    pub remove: &'static [&'static str],
    /// Markers for the current classification.
    pub add: Vec<&'static str>,
    /// Value for the `data-viewport` attribute.
    pub viewport_attr: &'static str,
}

impl BodyClassUpdate {
    fn for_classification(classification: &Classification) -> Self {
        Self {
            remove: &ALL_MARKER_CLASSES,
            add: classification.css_classes(),
            viewport_attr: classification.tier.attr_value(),
        }
    }
}

/// Everything the host applies during one-time startup.
///
/// After applying the plan the host fires the document-level page-ready
/// signal, carrying a reference to the coordinator.
#[derive(Debug)]
pub struct StartupPlan {
    /// The initial classification.
    pub classification: Classification,
    /// Document-root markers.
    pub body_classes: BodyClassUpdate,
    /// Initial `--vh` value, mobile only.
    pub vh_unit: Option<f64>,
    /// The hero entry animation. Empty under reduced motion.
    pub hero: Timeline<HeroEffect>,
    /// Whether to set up the reveal observer. `false` (reduced motion)
    /// means the host reveals every observed element eagerly instead.
    pub use_reveal_observer: bool,
    /// Section to highlight for the initial scroll position.
    pub active_section: Option<String>,
}

/// Everything the host applies after a (debounced) resize.
#[derive(Debug)]
pub struct ResizePlan {
    /// The recomputed classification.
    pub classification: Classification,
    /// Document-root markers.
    pub body_classes: BodyClassUpdate,
    /// Menu transition forced by the tier change, if any.
    pub menu: Option<MenuTransition>,
    /// Header/viewport-unit effects.
    pub effects: Vec<ResizeEffect>,
}

/// Everything the host applies on one scroll animation frame.
#[derive(Debug)]
pub struct ScrollFramePlan {
    /// Newly active section id, when the nav highlight should move.
    pub active_section: Option<String>,
    /// Header and back-to-top changes.
    pub effects: Vec<ScrollEffect>,
}

/// Outcome of a contact form submission.
#[derive(Debug)]
pub enum SubmissionOutcome {
    /// Validation passed: open the link in a new browsing context, show
    /// the notice, reset the form.
    Accepted {
        /// The messaging deep link.
        link: Url,
        /// Success notice to flash.
        notice: FormNotice,
    },
    /// Validation failed: mark each field, block the handoff.
    Rejected {
        /// Every failing field with its inline message.
        errors: Vec<FieldError>,
        /// Error notice to flash.
        notice: FormNotice,
        /// First failing field, to move focus to. Desktop only; focus
        /// stealing is hostile on touch keyboards.
        focus: Option<Field>,
    },
}

/// Owns all components and drives one-time startup plus event fan-in.
pub struct Portfolio {
    config: SiteConfig,
    classifier: DeviceClassifier,
    classification: Option<Classification>,
    menu: MobileMenu,
    sections: SectionTracker,
    ledger: RevealLedger,
    scroll_fx: ScrollFx,
    frame_gate: FrameGate,
    lazy: LazyImages,
    analytics: Option<Box<dyn AnalyticsSink>>,
    started: bool,
}

impl Portfolio {
    /// Create a coordinator with the given configuration.
    #[must_use]
    pub fn new(config: SiteConfig) -> Self {
        let classifier = DeviceClassifier::new(&config);
        let sections = SectionTracker::new(&config);
        Self {
            config,
            classifier,
            classification: None,
            menu: MobileMenu::new(),
            sections,
            ledger: RevealLedger::new(),
            scroll_fx: ScrollFx::new(),
            frame_gate: FrameGate::new(),
            lazy: LazyImages::new(),
            analytics: None,
            started: false,
        }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// The current classification. Defaults to desktop behavior before
    /// startup has classified anything.
    #[must_use]
    pub fn classification(&self) -> Option<Classification> {
        self.classification
    }

    fn tier(&self) -> ViewportTier {
        self.classification
            .map_or(ViewportTier::Desktop, |c| c.tier)
    }

    /// Install an analytics sink. Absent sink: events are dropped.
    pub fn set_analytics_sink(&mut self, sink: Box<dyn AnalyticsSink>) {
        self.analytics = Some(sink);
    }

    /// One-time startup sequencing. Returns `None` on repeat calls.
    pub fn startup(
        &mut self,
        signals: &DeviceSignals,
        sections: Vec<SectionGeometry>,
        scroll_y: f64,
    ) -> Option<StartupPlan> {
        if self.started {
            return None;
        }
        self.started = true;

        let classification = self.classifier.classify(signals);
        self.classification = Some(classification);
        self.sections.set_sections(sections);
        let active_section = self.sections.update(scroll_y).map(str::to_string);

        tracing::info!(
            tier = classification.tier.attr_value(),
            touch = classification.has_touch,
            width = signals.viewport_width,
            height = signals.viewport_height,
            "portfolio initialized"
        );

        Some(StartupPlan {
            classification,
            body_classes: BodyClassUpdate::for_classification(&classification),
            vh_unit: classification
                .is_mobile()
                .then(|| viewport_unit(signals.viewport_height)),
            hero: if classification.prefers_reduced_motion {
                Timeline::new()
            } else {
                hero_entry_plan(classification.tier)
            },
            use_reveal_observer: !classification.prefers_reduced_motion,
            active_section,
        })
    }

    /// Whether startup has run.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Debounced resize (and orientation-settle) pass.
    ///
    /// The classifier cache is invalidated synchronously before any
    /// dependent component is consulted, so nothing observes a stale
    /// classification.
    pub fn on_resize(
        &mut self,
        signals: &DeviceSignals,
        sections: Vec<SectionGeometry>,
    ) -> ResizePlan {
        self.classifier.invalidate();
        let classification = self.classifier.classify(signals);
        self.classification = Some(classification);
        self.sections.set_sections(sections);

        let menu = if classification.is_desktop() {
            self.menu.handle(MenuInput::BecameDesktop)
        } else {
            None
        };

        ResizePlan {
            classification,
            body_classes: BodyClassUpdate::for_classification(&classification),
            menu,
            effects: self
                .scroll_fx
                .on_resize(signals.viewport_height, classification.tier),
        }
    }

    /// Replace the measured section geometry.
    ///
    /// Layout shifts after startup (a lazy image resolving from its
    /// placeholder, fonts swapping in) move document offsets; hosts call
    /// this with fresh measurements before planning against them.
    pub fn update_sections(&mut self, sections: Vec<SectionGeometry>) {
        self.sections.set_sections(sections);
    }

    /// Gate a raw scroll event; `true` admits one frame of work.
    pub fn request_scroll_frame(&mut self) -> bool {
        self.frame_gate.request()
    }

    /// The admitted animation-frame scroll pass.
    pub fn on_scroll_frame(&mut self, scroll_y: f64) -> ScrollFramePlan {
        self.frame_gate.complete();
        let tier = self.tier();
        ScrollFramePlan {
            active_section: self.sections.update(scroll_y).map(str::to_string),
            effects: self.scroll_fx.on_frame(scroll_y, tier),
        }
    }

    /// Feed a menu input.
    pub fn menu_input(&mut self, input: MenuInput) -> Option<MenuTransition> {
        self.menu.handle(input)
    }

    /// Whether the mobile menu is open.
    #[must_use]
    pub fn menu_is_open(&self) -> bool {
        self.menu.is_open()
    }

    /// Scroll plan for a nav link to the identified section.
    ///
    /// `None` when no such section was measured (feature silently skips).
    #[must_use]
    pub fn section_plan(&self, section_id: &str, header_height: f64) -> Option<ScrollPlan> {
        let section = self
            .sections
            .sections()
            .iter()
            .find(|s| s.id == section_id)?;
        Some(crate::nav::section_scroll_plan(
            section,
            header_height,
            self.tier(),
        ))
    }

    /// Scroll plan for the back-to-top control.
    #[must_use]
    pub fn back_to_top(&self) -> ScrollPlan {
        back_to_top_plan(self.tier())
    }

    /// Intersection sample for a reveal-observed element.
    pub fn observe_reveal(
        &mut self,
        key: &str,
        ratio: f64,
        kind: &RevealKind,
    ) -> Option<Timeline<RevealEffect>> {
        let tier = self.tier();
        self.ledger.observe(key, ratio, kind, tier)
    }

    /// Mark every observed element revealed without animation (observer
    /// unavailable, or reduced motion).
    pub fn reveal_all_eagerly<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ledger.reveal_all(keys);
    }

    /// Page visibility flipped.
    pub fn on_visibility_change(&mut self, hidden: bool) {
        if hidden {
            self.ledger.pause();
        } else {
            self.ledger.resume();
        }
    }

    /// The lazy image registry.
    pub fn lazy_images(&mut self) -> &mut LazyImages {
        &mut self.lazy
    }

    /// Validate and plan a contact form submission.
    ///
    /// # Errors
    ///
    /// Returns an error only when the configured recipient cannot form a
    /// valid URL; validation failures are a normal [`SubmissionOutcome`].
    pub fn handle_submission(
        &self,
        submission: &Submission,
    ) -> PortfolioResult<SubmissionOutcome> {
        let errors = submission.validate();
        if errors.is_empty() {
            Ok(SubmissionOutcome::Accepted {
                link: submission.deep_link(&self.config)?,
                notice: FormNotice::Redirecting,
            })
        } else {
            let focus = if self.classification.is_some_and(|c| c.is_desktop()) {
                errors.first().map(|e| e.field)
            } else {
                None
            };
            Ok(SubmissionOutcome::Rejected {
                errors,
                notice: FormNotice::ValidationFailed,
                focus,
            })
        }
    }

    /// Copy feedback for the current classification.
    #[must_use]
    pub fn copy_feedback(&self) -> CopyFeedback {
        copy_feedback(self.classification.is_some_and(|c| c.has_touch))
    }

    /// Report an analytics event; silent no-op without a sink.
    pub fn track(&self, category: &str, action: &str, label: &str) {
        if let Some(sink) = &self.analytics {
            sink.record(&AnalyticsEvent {
                category: category.to_string(),
                action: action.to_string(),
                label: label.to_string(),
                device: self.tier(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::ScrollMode;

    fn desktop_signals() -> DeviceSignals {
        DeviceSignals {
            viewport_width: 1920.0,
            viewport_height: 1080.0,
            user_agent: "Mozilla/5.0 (X11; Linux x86_64)".to_string(),
            touch_points: 0,
            touch_events: false,
            prefers_reduced_motion: false,
        }
    }

    fn mobile_signals() -> DeviceSignals {
        DeviceSignals {
            viewport_width: 390.0,
            viewport_height: 844.0,
            user_agent: "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0)".to_string(),
            touch_points: 5,
            touch_events: true,
            prefers_reduced_motion: false,
        }
    }

    fn sections() -> Vec<SectionGeometry> {
        vec![
            SectionGeometry {
                id: "inicio".to_string(),
                top: 0.0,
                height: 700.0,
            },
            SectionGeometry {
                id: "contato".to_string(),
                top: 700.0,
                height: 900.0,
            },
        ]
    }

    #[test]
    fn startup_runs_once() {
        let mut portfolio = Portfolio::new(SiteConfig::default());
        let plan = portfolio.startup(&desktop_signals(), sections(), 0.0);
        assert!(plan.is_some());
        assert!(portfolio.is_started());
        assert!(portfolio.startup(&desktop_signals(), sections(), 0.0).is_none());
    }

    #[test]
    fn startup_plan_reflects_classification() {
        let mut portfolio = Portfolio::new(SiteConfig::default());
        let plan = portfolio.startup(&mobile_signals(), sections(), 0.0).unwrap();
        assert!(plan.classification.is_mobile());
        assert!(plan.vh_unit.is_some());
        assert!(plan.use_reveal_observer);
        assert!(plan.body_classes.add.contains(&"is-mobile"));
        assert_eq!(plan.body_classes.viewport_attr, "mobile");
        assert_eq!(plan.active_section.as_deref(), Some("inicio"));
    }

    #[test]
    fn reduced_motion_disables_the_reveal_observer() {
        let mut portfolio = Portfolio::new(SiteConfig::default());
        let mut signals = desktop_signals();
        signals.prefers_reduced_motion = true;
        let plan = portfolio.startup(&signals, sections(), 0.0).unwrap();
        assert!(!plan.use_reveal_observer);
        // No hero entry animation either.
        assert!(plan.hero.is_empty());
    }

    #[test]
    fn updated_sections_replace_stale_geometry() {
        let mut portfolio = Portfolio::new(SiteConfig::default());
        portfolio.startup(&desktop_signals(), sections(), 0.0);

        let plan = portfolio.section_plan("contato", 64.0).unwrap();
        assert!((plan.target - 636.0).abs() < f64::EPSILON);

        // An image resolving below "inicio" pushed everything down.
        let mut shifted = sections();
        shifted[1].top = 1100.0;
        portfolio.update_sections(shifted);

        let plan = portfolio.section_plan("contato", 64.0).unwrap();
        assert!((plan.target - 1036.0).abs() < f64::EPSILON);
        // The highlight follows the fresh offsets too.
        let frame = portfolio.on_scroll_frame(1050.0);
        assert_eq!(frame.active_section.as_deref(), Some("contato"));
    }

    #[test]
    fn resize_reclassifies_before_dependents_run() {
        let mut portfolio = Portfolio::new(SiteConfig::default());
        portfolio.startup(&mobile_signals(), sections(), 0.0);
        // Menu opened while mobile.
        portfolio.menu_input(MenuInput::ToggleActivated);

        let plan = portfolio.on_resize(&desktop_signals(), sections());
        assert!(plan.classification.is_desktop());
        // Becoming desktop force-closes the menu.
        assert_eq!(plan.menu, Some(MenuTransition::Closed));
        assert!(!portfolio.menu_is_open());
    }

    #[test]
    fn scroll_frames_are_gated_per_frame() {
        let mut portfolio = Portfolio::new(SiteConfig::default());
        portfolio.startup(&desktop_signals(), sections(), 0.0);

        assert!(portfolio.request_scroll_frame());
        // A second scroll event before the frame runs is swallowed.
        assert!(!portfolio.request_scroll_frame());
        let _ = portfolio.on_scroll_frame(100.0);
        assert!(portfolio.request_scroll_frame());
    }

    #[test]
    fn section_plan_is_tier_aware_and_tolerates_unknown_ids() {
        let mut portfolio = Portfolio::new(SiteConfig::default());
        portfolio.startup(&mobile_signals(), sections(), 0.0);

        let plan = portfolio.section_plan("contato", 64.0).unwrap();
        assert_eq!(plan.mode, ScrollMode::Instant);
        assert!((plan.target - 636.0).abs() < f64::EPSILON);
        assert!(portfolio.section_plan("missing", 64.0).is_none());
    }

    #[test]
    fn visibility_pause_suspends_reveals() {
        let mut portfolio = Portfolio::new(SiteConfig::default());
        portfolio.startup(&desktop_signals(), sections(), 0.0);

        portfolio.on_visibility_change(true);
        assert!(portfolio
            .observe_reveal("sobre", 0.5, &RevealKind::Container)
            .is_none());
        portfolio.on_visibility_change(false);
        assert!(portfolio
            .observe_reveal("sobre", 0.5, &RevealKind::Container)
            .is_some());
    }

    #[test]
    fn valid_submission_is_accepted_with_deep_link() {
        let mut portfolio = Portfolio::new(SiteConfig::default());
        portfolio.startup(&desktop_signals(), sections(), 0.0);

        let submission = Submission {
            name: "Jo".to_string(),
            email: "x@y.com".to_string(),
            phone: String::new(),
            message: "0123456789".to_string(),
        };
        match portfolio.handle_submission(&submission).unwrap() {
            SubmissionOutcome::Accepted { link, notice } => {
                assert_eq!(link.host_str(), Some("wa.me"));
                assert!(notice.is_success());
            }
            SubmissionOutcome::Rejected { .. } => panic!("submission should pass"),
        }
    }

    #[test]
    fn invalid_submission_is_rejected_without_a_link() {
        let portfolio = Portfolio::new(SiteConfig::default());
        let submission = Submission {
            name: "J".to_string(),
            email: "x@y.com".to_string(),
            phone: String::new(),
            message: "0123456789".to_string(),
        };
        match portfolio.handle_submission(&submission).unwrap() {
            SubmissionOutcome::Rejected { errors, notice, focus } => {
                assert_eq!(errors.len(), 1);
                assert!(!notice.is_success());
                // Not yet classified: nothing to focus.
                assert_eq!(focus, None);
            }
            SubmissionOutcome::Accepted { .. } => panic!("short name must be rejected"),
        }
    }

    #[test]
    fn rejection_focuses_the_first_failing_field_on_desktop_only() {
        let mut portfolio = Portfolio::new(SiteConfig::default());
        portfolio.startup(&desktop_signals(), sections(), 0.0);
        match portfolio.handle_submission(&Submission::default()).unwrap() {
            SubmissionOutcome::Rejected { focus, .. } => {
                assert_eq!(focus, Some(Field::Name));
            }
            SubmissionOutcome::Accepted { .. } => panic!("empty form must be rejected"),
        }

        let mut portfolio = Portfolio::new(SiteConfig::default());
        portfolio.startup(&mobile_signals(), sections(), 0.0);
        match portfolio.handle_submission(&Submission::default()).unwrap() {
            SubmissionOutcome::Rejected { focus, .. } => assert_eq!(focus, None),
            SubmissionOutcome::Accepted { .. } => panic!("empty form must be rejected"),
        }
    }

    #[test]
    fn copy_feedback_pulses_on_touch_devices() {
        let mut portfolio = Portfolio::new(SiteConfig::default());
        portfolio.startup(&mobile_signals(), sections(), 0.0);
        assert!(portfolio.copy_feedback().haptic_ms.is_some());
    }
}
