//! Goal Tally - a goal-tracking tap counter widget
//!
//! Core modules:
//! - `state`: Counter state, validating load/merge, persistence
//! - `view`: Pure render projection (no DOM or storage access)
//! - `confetti`: Deterministic particle simulation for the celebration burst
//!
//! The browser shell (DOM wiring, canvas loop, timers) lives in `main.rs` and
//! only compiles for wasm32; everything in the library is host-testable.

pub mod confetti;
pub mod state;
pub mod view;

pub use confetti::Burst;
pub use state::CounterState;
pub use view::CounterView;

/// Widget configuration constants
pub mod consts {
    /// Default completion goal
    pub const DEFAULT_GOAL: i64 = 1000;
    /// Default increment presets (four buttons)
    pub const DEFAULT_PLUS: [i64; 4] = [5, 10, 15, 20];
    /// Default decrement presets (two buttons)
    pub const DEFAULT_MINUS: [i64; 2] = [-10, -100];

    /// Particles per celebration burst
    pub const BURST_PARTICLES: usize = 300;
    /// Celebration duration; the auto-reset timer uses the same value
    pub const BURST_DURATION_MS: f64 = 4000.0;
    /// Downward acceleration per frame (canvas pixels)
    pub const CONFETTI_GRAVITY: f32 = 0.12;
    /// Nominal 60 Hz frame length, the unit for particle integration
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
}

/// Clamp a count into the valid `[0, goal]` band
#[inline]
pub fn clamp_count(count: i64, goal: i64) -> i64 {
    count.clamp(0, goal.max(0))
}
