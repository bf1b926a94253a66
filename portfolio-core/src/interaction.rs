//! Copy-to-clipboard flow, decorative pointer math, keyboard shortcuts.

use crate::timing::Rect;

/// How long copy feedback (button swap and toast) stays up (ms).
pub const COPY_FEEDBACK_MS: f64 = 2000.0;

/// Haptic pulse length on touch devices (ms).
pub const HAPTIC_PULSE_MS: u32 = 50;

/// Maximum hero translate magnitude on either axis (px).
const PARALLAX_RANGE: f64 = 20.0;

/// Divisor turning pointer distance into tilt degrees.
const TILT_DIVISOR: f64 = 10.0;

/// Which copy path succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyPath {
    /// The platform clipboard API.
    Clipboard,
    /// The hidden-textarea select+copy legacy path.
    LegacyFallback,
}

/// Uniform feedback after a successful copy, whichever path ran.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CopyFeedback {
    /// Restore the button and dismiss the toast after this long (ms).
    pub dismiss_ms: f64,
    /// Haptic pulse to fire, touch devices only.
    pub haptic_ms: Option<u32>,
}

/// Feedback plan for a successful copy.
#[must_use]
pub fn copy_feedback(has_touch: bool) -> CopyFeedback {
    CopyFeedback {
        dismiss_ms: COPY_FEEDBACK_MS,
        haptic_ms: has_touch.then_some(HAPTIC_PULSE_MS),
    }
}

/// Hero image translate offsets for a pointer position.
///
/// Purely cosmetic; registered only under desktop classification.
#[must_use]
pub fn hero_parallax(client_x: f64, client_y: f64, viewport_width: f64, viewport_height: f64) -> (f64, f64) {
    let x = (client_x / viewport_width - 0.5) * PARALLAX_RANGE;
    let y = (client_y / viewport_height - 0.5) * PARALLAX_RANGE;
    (x, y)
}

/// Card tilt angles (degrees) for a pointer position over the card.
///
/// Returns `(rotate_x, rotate_y)` for a perspective transform.
#[must_use]
pub fn card_tilt(client_x: f64, client_y: f64, card: Rect) -> (f64, f64) {
    let x = client_x - card.left;
    let y = client_y - card.top;
    let center_x = (card.right - card.left) / 2.0;
    let center_y = (card.bottom - card.top) / 2.0;
    let rotate_x = (y - center_y) / TILT_DIVISOR;
    let rotate_y = (center_x - x) / TILT_DIVISOR;
    (rotate_x, rotate_y)
}

/// Page edge a keyboard shortcut scrolls to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollEdge {
    /// Document top.
    Top,
    /// Document bottom.
    Bottom,
}

/// Resolve a keydown to a shortcut action.
///
/// Only Ctrl+Home / Ctrl+End count, and never while focus is inside an
/// input-like element.
#[must_use]
pub fn shortcut(key: &str, ctrl: bool, in_input: bool) -> Option<ScrollEdge> {
    if !ctrl || in_input {
        return None;
    }
    match key {
        "Home" => Some(ScrollEdge::Top),
        "End" => Some(ScrollEdge::Bottom),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_feedback_pulses_only_with_touch() {
        assert_eq!(copy_feedback(true).haptic_ms, Some(HAPTIC_PULSE_MS));
        assert_eq!(copy_feedback(false).haptic_ms, None);
        assert!((copy_feedback(false).dismiss_ms - 2000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn parallax_is_zero_at_center_and_bounded_at_corners() {
        let (x, y) = hero_parallax(960.0, 540.0, 1920.0, 1080.0);
        assert!(x.abs() < f64::EPSILON && y.abs() < f64::EPSILON);

        let (x, y) = hero_parallax(1920.0, 1080.0, 1920.0, 1080.0);
        assert!((x - 10.0).abs() < f64::EPSILON);
        assert!((y - 10.0).abs() < f64::EPSILON);

        let (x, y) = hero_parallax(0.0, 0.0, 1920.0, 1080.0);
        assert!((x + 10.0).abs() < f64::EPSILON);
        assert!((y + 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn tilt_is_flat_at_card_center() {
        let card = Rect {
            top: 100.0,
            left: 100.0,
            bottom: 300.0,
            right: 400.0,
        };
        let (rx, ry) = card_tilt(250.0, 200.0, card);
        assert!(rx.abs() < f64::EPSILON);
        assert!(ry.abs() < f64::EPSILON);
    }

    #[test]
    fn tilt_direction_follows_pointer() {
        let card = Rect {
            top: 0.0,
            left: 0.0,
            bottom: 200.0,
            right: 200.0,
        };
        // Pointer at the bottom-right corner: tips down-right.
        let (rx, ry) = card_tilt(200.0, 200.0, card);
        assert!((rx - 10.0).abs() < f64::EPSILON);
        assert!((ry + 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn shortcuts_require_ctrl_and_ignore_inputs() {
        assert_eq!(shortcut("Home", true, false), Some(ScrollEdge::Top));
        assert_eq!(shortcut("End", true, false), Some(ScrollEdge::Bottom));
        assert_eq!(shortcut("Home", false, false), None);
        assert_eq!(shortcut("Home", true, true), None);
        assert_eq!(shortcut("PageDown", true, false), None);
    }
}
