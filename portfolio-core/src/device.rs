//! Viewport classification and capability detection.

use serde::{Deserialize, Serialize};

use crate::config::SiteConfig;

/// User-agent fragments that force the mobile tier regardless of width.
const MOBILE_UA_MARKERS: [&str; 7] = [
    "android",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "iemobile",
    "opera mini",
];

/// Every marker class the classifier may have put on the document root.
pub const ALL_MARKER_CLASSES: [&str; 6] = [
    "is-mobile",
    "is-tablet",
    "is-desktop",
    "has-touch",
    "no-touch",
    "reduced-motion",
];

/// Width tier of the browsing context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewportTier {
    /// Width at or below the mobile breakpoint, or a mobile user agent.
    Mobile,
    /// Width between the mobile and tablet breakpoints.
    Tablet,
    /// Width above the tablet breakpoint.
    Desktop,
}

impl ViewportTier {
    /// The `data-viewport` attribute value for this tier.
    #[must_use]
    pub fn attr_value(self) -> &'static str {
        match self {
            Self::Mobile => "mobile",
            Self::Tablet => "tablet",
            Self::Desktop => "desktop",
        }
    }
}

/// Raw browser signals the classification is derived from.
///
/// The host snapshots these once per read; the classifier never reaches
/// into the browser itself.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceSignals {
    /// `window.innerWidth`.
    pub viewport_width: f64,
    /// `window.innerHeight`.
    pub viewport_height: f64,
    /// `navigator.userAgent`.
    pub user_agent: String,
    /// `navigator.maxTouchPoints`.
    pub touch_points: u32,
    /// Whether touch events are exposed on the window.
    pub touch_events: bool,
    /// `(prefers-reduced-motion: reduce)` media query result.
    pub prefers_reduced_motion: bool,
}

/// Derived device classification.
///
/// Exactly one tier holds for any signal set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Width tier.
    pub tier: ViewportTier,
    /// Whether any touch input is available.
    pub has_touch: bool,
    /// Whether the user asked for reduced motion.
    pub prefers_reduced_motion: bool,
    /// Whether the viewport is wider than it is tall.
    pub is_landscape: bool,
}

impl Classification {
    /// Marker classes to put on the document root for this classification.
    #[must_use]
    pub fn css_classes(&self) -> Vec<&'static str> {
        let mut classes = vec![match self.tier {
            ViewportTier::Mobile => "is-mobile",
            ViewportTier::Tablet => "is-tablet",
            ViewportTier::Desktop => "is-desktop",
        }];
        classes.push(if self.has_touch { "has-touch" } else { "no-touch" });
        if self.prefers_reduced_motion {
            classes.push("reduced-motion");
        }
        classes
    }

    /// Convenience tier checks.
    #[must_use]
    pub fn is_mobile(&self) -> bool {
        self.tier == ViewportTier::Mobile
    }

    /// Whether the tablet tier holds.
    #[must_use]
    pub fn is_tablet(&self) -> bool {
        self.tier == ViewportTier::Tablet
    }

    /// Whether the desktop tier holds.
    #[must_use]
    pub fn is_desktop(&self) -> bool {
        self.tier == ViewportTier::Desktop
    }
}

/// Explicit classification cache.
///
/// The classification is computed on the first read and returned unchanged
/// until [`DeviceClassifier::invalidate`] is called. Callers must
/// invalidate before re-reading after any viewport-affecting event.
#[derive(Debug)]
pub struct DeviceClassifier {
    mobile_breakpoint: f64,
    tablet_breakpoint: f64,
    cached: Option<Classification>,
}

impl DeviceClassifier {
    /// Create a classifier using the configured breakpoints.
    #[must_use]
    pub fn new(config: &SiteConfig) -> Self {
        Self {
            mobile_breakpoint: config.mobile_breakpoint,
            tablet_breakpoint: config.tablet_breakpoint,
            cached: None,
        }
    }

    /// Classify the given signals, memoizing the result.
    ///
    /// A cached classification is returned as-is; `signals` are only
    /// consulted when the cache is empty.
    pub fn classify(&mut self, signals: &DeviceSignals) -> Classification {
        if let Some(cached) = self.cached {
            return cached;
        }

        let mobile_agent = is_mobile_agent(&signals.user_agent);
        let tier = if signals.viewport_width <= self.mobile_breakpoint || mobile_agent {
            ViewportTier::Mobile
        } else if signals.viewport_width <= self.tablet_breakpoint {
            ViewportTier::Tablet
        } else {
            ViewportTier::Desktop
        };

        let classification = Classification {
            tier,
            has_touch: signals.touch_events || signals.touch_points > 0,
            prefers_reduced_motion: signals.prefers_reduced_motion,
            is_landscape: signals.viewport_width > signals.viewport_height,
        };

        tracing::debug!(?tier, width = signals.viewport_width, "device classified");
        self.cached = Some(classification);
        classification
    }

    /// The memoized classification, if any.
    #[must_use]
    pub fn cached(&self) -> Option<Classification> {
        self.cached
    }

    /// Clear the memoized classification.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}

fn is_mobile_agent(user_agent: &str) -> bool {
    let lowered = user_agent.to_lowercase();
    MOBILE_UA_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals(width: f64) -> DeviceSignals {
        DeviceSignals {
            viewport_width: width,
            viewport_height: 900.0,
            user_agent: "Mozilla/5.0 (X11; Linux x86_64)".to_string(),
            touch_points: 0,
            touch_events: false,
            prefers_reduced_motion: false,
        }
    }

    fn classifier() -> DeviceClassifier {
        DeviceClassifier::new(&SiteConfig::default())
    }

    #[test]
    fn exactly_one_tier_holds_across_widths() {
        for width in [1.0, 320.0, 768.0, 769.0, 1024.0, 1025.0, 2560.0] {
            let mut classifier = classifier();
            let c = classifier.classify(&signals(width));
            let tiers = [c.is_mobile(), c.is_tablet(), c.is_desktop()];
            assert_eq!(
                tiers.iter().filter(|t| **t).count(),
                1,
                "width {width} must land in exactly one tier"
            );
        }
    }

    #[test]
    fn tier_boundaries_match_breakpoints() {
        let mut classifier = classifier();
        assert_eq!(classifier.classify(&signals(768.0)).tier, ViewportTier::Mobile);
        classifier.invalidate();
        assert_eq!(classifier.classify(&signals(769.0)).tier, ViewportTier::Tablet);
        classifier.invalidate();
        assert_eq!(classifier.classify(&signals(1024.0)).tier, ViewportTier::Tablet);
        classifier.invalidate();
        assert_eq!(classifier.classify(&signals(1025.0)).tier, ViewportTier::Desktop);
    }

    #[test]
    fn mobile_user_agent_overrides_width() {
        let mut classifier = classifier();
        let mut wide = signals(1920.0);
        wide.user_agent = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)".to_string();
        assert_eq!(classifier.classify(&wide).tier, ViewportTier::Mobile);
    }

    #[test]
    fn classification_is_cached_until_invalidated() {
        let mut classifier = classifier();
        let first = classifier.classify(&signals(1920.0));
        // Different signals, same cache: no re-derivation happens.
        let second = classifier.classify(&signals(320.0));
        assert_eq!(first, second);

        classifier.invalidate();
        assert!(classifier.cached().is_none());
        let third = classifier.classify(&signals(320.0));
        assert_eq!(third.tier, ViewportTier::Mobile);
    }

    #[test]
    fn touch_comes_from_either_signal() {
        let mut classifier = classifier();
        let mut s = signals(1920.0);
        s.touch_points = 5;
        assert!(classifier.classify(&s).has_touch);

        classifier.invalidate();
        s.touch_points = 0;
        s.touch_events = true;
        assert!(classifier.classify(&s).has_touch);

        classifier.invalidate();
        s.touch_events = false;
        assert!(!classifier.classify(&s).has_touch);
    }

    #[test]
    fn css_classes_cover_tier_touch_and_motion() {
        let mut classifier = classifier();
        let mut s = signals(320.0);
        s.touch_points = 1;
        s.prefers_reduced_motion = true;
        let classes = classifier.classify(&s).css_classes();
        assert_eq!(classes, vec!["is-mobile", "has-touch", "reduced-motion"]);
    }

    #[test]
    fn landscape_tracks_aspect() {
        let mut classifier = classifier();
        let mut s = signals(320.0);
        s.viewport_height = 800.0;
        assert!(!classifier.classify(&s).is_landscape);
    }
}
