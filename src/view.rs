//! Pure render projection
//!
//! Everything the page displays is computed here from `CounterState` alone,
//! so rendering is testable without a DOM. Persisting the state is a separate
//! explicit step owned by the shell.

use crate::clamp_count;
use crate::state::CounterState;

/// Projection of one preset button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetView {
    /// Button label with explicit sign ("+5", "-10")
    pub label: String,
    pub enabled: bool,
}

/// Everything the page needs to display one counter state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterView {
    pub count_label: String,
    pub goal_label: String,
    /// Floored completion percentage, 0-100; mirrored to the progress bar
    /// width and the ARIA value
    pub percent: u8,
    pub percent_label: String,
    pub plus: [PresetView; 4],
    pub minus: [PresetView; 2],
}

impl CounterView {
    /// Project display state. The count is clamped before use so an
    /// out-of-band persisted value can never render outside `[0, goal]`.
    pub fn project(state: &CounterState) -> Self {
        let count = clamp_count(state.count, state.goal);
        let percent = percent_of(count, state.goal);
        Self {
            count_label: group_digits(count),
            goal_label: group_digits(state.goal),
            percent,
            percent_label: format!("{percent}%"),
            plus: state.plus.map(|p| PresetView {
                label: signed_label(p),
                enabled: !(p > 0 && count >= state.goal),
            }),
            minus: state.minus.map(|p| PresetView {
                label: signed_label(p),
                enabled: !(p < 0 && count <= 0),
            }),
        }
    }
}

/// Floored percentage of goal completion, clamped to 0-100; 0 when the goal
/// is not positive. Computed through f64 so saturated persisted values can't
/// overflow the intermediate product.
pub fn percent_of(count: i64, goal: i64) -> u8 {
    if goal <= 0 {
        return 0;
    }
    ((count as f64 / goal as f64) * 100.0).clamp(0.0, 100.0).floor() as u8
}

/// Preset label with an explicit sign prefix
fn signed_label(preset: i64) -> String {
    if preset >= 0 {
        format!("+{preset}")
    } else {
        preset.to_string()
    }
}

/// Format with nl-BE digit grouping: thousands separated by '.'
pub fn group_digits(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_floors() {
        assert_eq!(percent_of(333, 1000), 33);
        assert_eq!(percent_of(999, 1000), 99);
        assert_eq!(percent_of(1000, 1000), 100);
        assert_eq!(percent_of(0, 1000), 0);
    }

    #[test]
    fn test_percent_degenerate_goal() {
        assert_eq!(percent_of(50, 0), 0);
        assert_eq!(percent_of(50, -10), 0);
    }

    #[test]
    fn test_group_digits() {
        assert_eq!(group_digits(0), "0");
        assert_eq!(group_digits(333), "333");
        assert_eq!(group_digits(1000), "1.000");
        assert_eq!(group_digits(1234567), "1.234.567");
        assert_eq!(group_digits(-10500), "-10.500");
    }

    #[test]
    fn test_project_labels() {
        let state = CounterState {
            count: 333,
            ..Default::default()
        };
        let view = CounterView::project(&state);
        assert_eq!(view.count_label, "333");
        assert_eq!(view.goal_label, "1.000");
        assert_eq!(view.percent, 33);
        assert_eq!(view.percent_label, "33%");
        assert_eq!(view.plus[0].label, "+5");
        assert_eq!(view.minus[1].label, "-100");
    }

    #[test]
    fn test_project_clamps_overshoot() {
        // A persisted count above the goal renders clamped
        let state = CounterState {
            count: 2000,
            ..Default::default()
        };
        let view = CounterView::project(&state);
        assert_eq!(view.count_label, "1.000");
        assert_eq!(view.percent, 100);
    }

    #[test]
    fn test_project_saturated_persisted_state() {
        // A hostile payload saturating both fields to i64::MAX must render,
        // not overflow
        let state = CounterState::from_json(r#"{"count": 1e300, "goal": 1e300}"#);
        let view = CounterView::project(&state);
        assert_eq!(view.percent, 100);
        assert!(view.plus.iter().all(|p| !p.enabled));
    }

    #[test]
    fn test_plus_disabled_exactly_at_goal() {
        let mut state = CounterState {
            count: 999,
            ..Default::default()
        };
        assert!(CounterView::project(&state).plus.iter().all(|p| p.enabled));

        state.bump(1);
        let view = CounterView::project(&state);
        assert!(view.plus.iter().all(|p| !p.enabled));
        // Minus buttons stay live at the top
        assert!(view.minus.iter().all(|p| p.enabled));

        // Any decrement re-enables the plus buttons
        state.bump(-10);
        assert!(CounterView::project(&state).plus.iter().all(|p| p.enabled));
    }

    #[test]
    fn test_minus_disabled_at_zero() {
        let state = CounterState::default();
        let view = CounterView::project(&state);
        assert!(view.minus.iter().all(|p| !p.enabled));
        assert!(view.plus.iter().all(|p| p.enabled));
    }

    #[test]
    fn test_nonnegative_minus_preset_stays_enabled() {
        // A zero or positive value in a minus slot never disables its button
        let state = CounterState {
            minus: [0, 25],
            ..Default::default()
        };
        let view = CounterView::project(&state);
        assert!(view.minus.iter().all(|p| p.enabled));
        assert_eq!(view.minus[0].label, "+0");
        assert_eq!(view.minus[1].label, "+25");
    }
}
