//! Counter state and persistence
//!
//! All state that must survive a page reload lives here. Loading is tolerant
//! field by field: a missing or malformed field falls back to its default
//! without disturbing the other fields, and nothing here ever errors outward.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::clamp_count;
use crate::consts::{DEFAULT_GOAL, DEFAULT_MINUS, DEFAULT_PLUS};

/// Raw numeric inputs from the settings form, pre-validation
#[derive(Debug, Clone, Copy)]
pub struct SettingsInput {
    pub goal: f64,
    pub plus: [f64; 4],
    pub minus: [f64; 2],
}

/// The persisted counter state (the sole persisted entity)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterState {
    /// Running count, kept in `[0, goal]`
    pub count: i64,
    /// Completion threshold, always positive
    pub goal: i64,
    /// Increment presets, one per plus button
    pub plus: [i64; 4],
    /// Decrement presets, one per minus button
    pub minus: [i64; 2],
}

impl Default for CounterState {
    fn default() -> Self {
        Self {
            count: 0,
            goal: DEFAULT_GOAL,
            plus: DEFAULT_PLUS,
            minus: DEFAULT_MINUS,
        }
    }
}

impl CounterState {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "goal_tally_state";

    /// Parse persisted JSON, validating each field independently.
    /// An unparseable payload yields the full default.
    pub fn from_json(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => Self::from_value(&value),
            Err(_) => Self::default(),
        }
    }

    fn from_value(value: &Value) -> Self {
        let default = Self::default();
        Self {
            count: number_field(value, "count")
                .map(|n| n.floor() as i64)
                .unwrap_or(default.count),
            goal: number_field(value, "goal")
                .filter(|n| *n > 0.0)
                .map(|n| n.floor() as i64)
                .unwrap_or(default.goal),
            plus: list_field(value, "plus").unwrap_or(default.plus),
            minus: list_field(value, "minus").unwrap_or(default.minus),
        }
    }

    /// Apply a signed delta, clamped to `[0, goal]`. Saturating so a count
    /// near `i64::MAX` from hostile storage cannot overflow.
    pub fn bump(&mut self, delta: i64) {
        self.count = clamp_count(self.count.saturating_add(delta), self.goal);
    }

    /// Re-clamp the count into the valid band (render-time defense against
    /// out-of-band persisted values)
    pub fn clamp(&mut self) {
        self.count = clamp_count(self.count, self.goal);
    }

    /// Apply settings-form input.
    ///
    /// An invalid goal keeps its prior value; an invalid preset becomes 0.
    /// The asymmetry is deliberate.
    pub fn apply_settings(&mut self, input: &SettingsInput) {
        if input.goal.is_finite() && input.goal > 0.0 {
            self.goal = input.goal.floor() as i64;
        }
        for (slot, v) in self.plus.iter_mut().zip(input.plus) {
            *slot = sanitize_preset(v);
        }
        for (slot, v) in self.minus.iter_mut().zip(input.minus) {
            *slot = sanitize_preset(v);
        }
    }

    /// True once the count has reached (or passed) the goal
    pub fn goal_reached(&self) -> bool {
        self.count >= self.goal
    }

    /// Zero the count (manual reset and post-celebration auto-reset)
    pub fn reset_count(&mut self) {
        self.count = 0;
    }

    /// Restore goal and both preset lists to the defaults; the count is
    /// untouched. Not persisted until the caller's next render cycle.
    pub fn reset_to_defaults(&mut self) {
        self.goal = DEFAULT_GOAL;
        self.plus = DEFAULT_PLUS;
        self.minus = DEFAULT_MINUS;
    }

    /// Load counter state from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded counter state from LocalStorage");
                return Self::from_json(&json);
            }
        }

        log::info!("No saved state, using defaults");
        Self::default()
    }

    /// Save counter state to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

fn sanitize_preset(v: f64) -> i64 {
    if v.is_finite() { v.floor() as i64 } else { 0 }
}

fn number_field(value: &Value, key: &str) -> Option<f64> {
    value.get(key)?.as_f64()
}

/// Exact-arity preset list; non-numeric elements become 0, wrong arity or a
/// non-array rejects the whole list
fn list_field<const N: usize>(value: &Value, key: &str) -> Option<[i64; N]> {
    let items = value.get(key)?.as_array()?;
    if items.len() != N {
        return None;
    }
    let mut out = [0i64; N];
    for (slot, item) in out.iter_mut().zip(items) {
        *slot = item.as_f64().map(|n| n.floor() as i64).unwrap_or(0);
    }
    Some(out)
}
