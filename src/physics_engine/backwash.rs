//! Backwash triggering policy
//!
//! A backwash fires when the current pressure reaches the threshold and more
//! than [`COOLDOWN_STEPS`] steps have passed since the previous one. Run start
//! counts as a trigger at step -1, so the earliest possible backwash is step 4.
//!
//! Applying an event always halves the pressure. With trend feedback enabled
//! (single-curve engine) it also damps the running trend by the backwash
//! effectiveness, compounding across triggers, and takes a further 5% off the
//! pressure for very effective backwashes.

use super::noise::NoiseSource;
use crate::types::{BackwashEvent, FoulingStatus, ParameterSet, BACKWASH_REASON};

/// Allowed backwash durations (seconds).
pub const BACKWASH_DURATIONS_SECS: [u32; 4] = [140, 220, 360, 460];

/// Fraction of pressure removed by a backwash.
pub const PRESSURE_DROP_FACTOR: f64 = 0.5;

/// Steps that must strictly be exceeded between two triggers.
pub const COOLDOWN_STEPS: i64 = 4;

/// `last_backwash_step` before any trigger.
pub const NO_BACKWASH_YET: i64 = -1;

/// Effectiveness above which the extra pressure reduction applies.
const HIGH_EFFECTIVENESS: f64 = 1.2;

/// Pressure floor (PSIG) enforced after every step.
pub const MIN_PRESSURE: f64 = 2.0;

/// Pressure (PSIG) intensity is measured from. Independent of the trigger
/// threshold, so a backwash fired below it has negative intensity.
pub const INTENSITY_REFERENCE_PRESSURE: f64 = 7.0;

// ============================================================================
// Simulation State
// ============================================================================

/// Mutable state of one simulation run. Created per run, never shared.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    pub current_pressure: f64,
    pub trend: f64,
    pub last_backwash_step: i64,
}

impl SimulationState {
    pub const fn new(initial_pressure: f64, trend: f64) -> Self {
        Self {
            current_pressure: initial_pressure,
            trend,
            last_backwash_step: NO_BACKWASH_YET,
        }
    }

    /// Move pressure one step along the trend, then clamp to the floor.
    pub fn advance(&mut self, perturbation: f64) {
        self.current_pressure = (self.current_pressure + self.trend + perturbation).max(MIN_PRESSURE);
    }

    fn cooled_down(&self, step_index: usize) -> bool {
        let step = i64::try_from(step_index).unwrap_or(i64::MAX);
        step - self.last_backwash_step > COOLDOWN_STEPS
    }
}

// ============================================================================
// Policy
// ============================================================================

/// Trigger rule plus the effect a backwash has on the running state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackwashPolicy {
    /// Pressure (PSIG) at or above which a backwash is considered
    pub threshold: f64,
    /// Whether a backwash damps the trend and can apply the extra reduction
    pub trend_feedback: bool,
}

impl BackwashPolicy {
    pub const fn new(threshold: f64, trend_feedback: bool) -> Self {
        Self {
            threshold,
            trend_feedback,
        }
    }

    /// Evaluate the trigger rule for `step_index` and, if it fires, build the event.
    ///
    /// Does not touch `state`; pair with [`BackwashPolicy::apply_event`].
    pub fn maybe_trigger(
        &self,
        state: &SimulationState,
        parameters: &ParameterSet,
        fouling: &FoulingStatus,
        step_index: usize,
        noise: &mut dyn NoiseSource,
    ) -> Option<BackwashEvent> {
        if state.current_pressure < self.threshold || !state.cooled_down(step_index) {
            return None;
        }

        let intensity = self.intensity(state.current_pressure, parameters, fouling);
        let duration = noise.choose_duration(&BACKWASH_DURATIONS_SECS);

        Some(BackwashEvent {
            time_step: step_index,
            pressure: state.current_pressure,
            intensity: round_to(intensity, 1),
            duration,
            reason: BACKWASH_REASON.to_string(),
        })
    }

    /// Apply a triggered event to the running state.
    pub fn apply_event(&self, state: &mut SimulationState, event: &BackwashEvent) {
        state.current_pressure *= 1.0 - PRESSURE_DROP_FACTOR;

        if self.trend_feedback {
            let effectiveness = effectiveness(event.intensity, event.duration);
            state.trend *= 0.9 - effectiveness * 0.2;
            if effectiveness > HIGH_EFFECTIVENESS {
                state.current_pressure *= 0.95;
            }
        }

        state.last_backwash_step = i64::try_from(event.time_step).unwrap_or(i64::MAX);
    }

    /// Unrounded backwash intensity (W), measured from
    /// [`INTENSITY_REFERENCE_PRESSURE`] rather than the trigger threshold.
    pub fn intensity(&self, pressure: f64, parameters: &ParameterSet, fouling: &FoulingStatus) -> f64 {
        let turbidity_factor = (parameters.turbidity / 0.5) * 0.2 + 0.8;
        (pressure - INTENSITY_REFERENCE_PRESSURE)
            * 1.5
            * fouling.factor()
            * parameters.ph_factor()
            * parameters.temperature_factor()
            * turbidity_factor
    }
}

/// Combined intensity/duration effectiveness of a backwash.
pub fn effectiveness(intensity: f64, duration: u32) -> f64 {
    (intensity / 10.0 + f64::from(duration) / 300.0) / 2.0
}

/// Round to `decimals` places, exact ties to even.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round_ties_even() / scale
}
