//! Rate limiting, easing, and staggered-effect timelines.
//!
//! Everything here is driven by injected millisecond timestamps so the
//! behavior is testable against a virtual clock; the host supplies
//! `performance.now()` in production.

use crate::device::ViewportTier;

/// Duration of the manual smooth-scroll fallback (ms).
pub const TWEEN_DURATION_MS: f64 = 500.0;

/// Leading-edge rate limiter.
///
/// The first call fires immediately; further calls are swallowed until the
/// interval has elapsed. Handlers behind a throttle observe a coalesced
/// final state rather than every intermediate event.
#[derive(Debug)]
pub struct Throttle {
    interval_ms: f64,
    last_fired: Option<f64>,
}

impl Throttle {
    /// Create a throttle with the given minimum interval.
    #[must_use]
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            last_fired: None,
        }
    }

    /// Whether a call at `now` is admitted.
    pub fn fire(&mut self, now: f64) -> bool {
        match self.last_fired {
            Some(last) if now - last < self.interval_ms => false,
            _ => {
                self.last_fired = Some(now);
                true
            }
        }
    }
}

/// Trailing-edge quiescence detector.
///
/// Each [`Debounce::poke`] pushes the deadline out; [`Debounce::ready`]
/// fires once when the input has been quiet for the full delay.
#[derive(Debug)]
pub struct Debounce {
    delay_ms: f64,
    deadline: Option<f64>,
}

impl Debounce {
    /// Create a debounce with the given quiescence delay.
    #[must_use]
    pub fn new(delay_ms: f64) -> Self {
        Self {
            delay_ms,
            deadline: None,
        }
    }

    /// Note an input event at `now`.
    pub fn poke(&mut self, now: f64) {
        self.deadline = Some(now + self.delay_ms);
    }

    /// Whether the deadline has passed. Fires at most once per burst.
    pub fn ready(&mut self, now: f64) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// The per-frame "ticking" flag.
///
/// Admits one unit of work per animation frame: [`FrameGate::request`]
/// returns `true` only while no frame is pending, and
/// [`FrameGate::complete`] re-opens the gate when the frame callback runs.
#[derive(Debug, Default)]
pub struct FrameGate {
    ticking: bool,
}

impl FrameGate {
    /// Create an open gate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to schedule a frame; `false` means one is already pending.
    pub fn request(&mut self) -> bool {
        if self.ticking {
            false
        } else {
            self.ticking = true;
            true
        }
    }

    /// Mark the pending frame as done.
    pub fn complete(&mut self) {
        self.ticking = false;
    }
}

/// Quadratic ease-in-out over `duration` from `start`, covering `delta`.
#[must_use]
pub fn ease_in_out_quad(elapsed: f64, start: f64, delta: f64, duration: f64) -> f64 {
    let mut t = elapsed / (duration / 2.0);
    if t < 1.0 {
        return delta / 2.0 * t * t + start;
    }
    t -= 1.0;
    -delta / 2.0 * (t * (t - 2.0) - 1.0) + start
}

/// Manual smooth-scroll animation for hosts without native support.
///
/// The final sample always lands exactly on the target.
#[derive(Debug, Clone, Copy)]
pub struct ScrollTween {
    start: f64,
    target: f64,
    duration_ms: f64,
}

impl ScrollTween {
    /// Plan a tween from the current position to the target.
    #[must_use]
    pub fn new(start: f64, target: f64) -> Self {
        Self {
            start,
            target,
            duration_ms: TWEEN_DURATION_MS,
        }
    }

    /// Scroll position `elapsed` ms into the animation.
    #[must_use]
    pub fn position_at(&self, elapsed: f64) -> f64 {
        if elapsed >= self.duration_ms {
            return self.target;
        }
        ease_in_out_quad(elapsed, self.start, self.target - self.start, self.duration_ms)
    }

    /// Whether the animation has run its course.
    #[must_use]
    pub fn finished(&self, elapsed: f64) -> bool {
        elapsed >= self.duration_ms
    }
}

/// How a scroll jump should be performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollMode {
    /// Non-animated jump (mobile: natural scrolling wins).
    Instant,
    /// Animated scroll (native smooth, or [`ScrollTween`] fallback).
    Smooth,
}

impl ScrollMode {
    /// Mode for the given tier: instant on mobile, smooth elsewhere.
    #[must_use]
    pub fn for_tier(tier: ViewportTier) -> Self {
        match tier {
            ViewportTier::Mobile => Self::Instant,
            ViewportTier::Tablet | ViewportTier::Desktop => Self::Smooth,
        }
    }
}

/// A planned in-page scroll.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollPlan {
    /// Document-relative target offset (px).
    pub target: f64,
    /// Jump or animate.
    pub mode: ScrollMode,
    /// Fragment identifier to push onto the history, if any.
    pub fragment: Option<String>,
}

/// An ordered list of `(delay, effect)` pairs.
///
/// Staggered animations are planned up front as data and drained against a
/// clock, instead of scattering fire-and-forget timers.
#[derive(Debug, Clone)]
pub struct Timeline<E> {
    entries: Vec<(f64, E)>,
}

impl<E> Default for Timeline<E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<E> Timeline<E> {
    /// Create an empty timeline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `effect` at `delay_ms` after the timeline starts.
    pub fn push(&mut self, delay_ms: f64, effect: E) {
        let at = self
            .entries
            .partition_point(|(delay, _)| *delay <= delay_ms);
        self.entries.insert(at, (delay_ms, effect));
    }

    /// Remove and return every effect due at `elapsed_ms`, in delay order.
    pub fn drain_due(&mut self, elapsed_ms: f64) -> Vec<E> {
        let due = self
            .entries
            .partition_point(|(delay, _)| *delay <= elapsed_ms);
        self.entries.drain(..due).map(|(_, effect)| effect).collect()
    }

    /// Delay of the next pending effect, if any.
    #[must_use]
    pub fn next_delay(&self) -> Option<f64> {
        self.entries.first().map(|(delay, _)| *delay)
    }

    /// Whether every effect has been drained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of pending effects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// An axis-aligned rectangle in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Distance from the viewport top (px).
    pub top: f64,
    /// Distance from the viewport left (px).
    pub left: f64,
    /// Bottom edge (px).
    pub bottom: f64,
    /// Right edge (px).
    pub right: f64,
}

/// Whether the rectangle lies entirely inside the viewport.
#[must_use]
pub fn rect_fully_visible(rect: Rect, viewport_width: f64, viewport_height: f64) -> bool {
    rect.top >= 0.0 && rect.left >= 0.0 && rect.bottom <= viewport_height && rect.right <= viewport_width
}
