//! Water-quality inputs: constant parameter sets and time-varying curves

use serde::{Deserialize, Serialize};

// ============================================================================
// Parameter Set
// ============================================================================

/// Feed water quality and operating point for one simulation step.
///
/// Values are expected to be range-checked by `validation` before they
/// reach the engine; the engine itself never rejects a parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    /// Turbidity (NTU), 0-2
    pub turbidity: f64,
    /// pH, 4-10
    pub ph: f64,
    /// Feed temperature (°C), 15-35
    pub temperature: f64,
    /// Feed flow rate (GPM), 10-50
    pub flow_rate: f64,
    /// Inlet pressure (PSIG), 20-80
    pub inlet_pressure: f64,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            turbidity: 0.5,
            ph: 7.0,
            temperature: 25.0,
            flow_rate: 20.0,
            inlet_pressure: 40.0,
        }
    }
}

impl ParameterSet {
    /// Distance from neutral pH scaled into a multiplier (1.0 at pH 7).
    pub fn ph_factor(&self) -> f64 {
        (self.ph - 7.0).abs() * 0.1 + 1.0
    }

    /// Temperature relative to the 25 °C reference.
    pub fn temperature_factor(&self) -> f64 {
        self.temperature / 25.0
    }

    /// Returns a copy with the three curve-driven fields replaced.
    #[must_use]
    pub const fn with_water_quality(self, turbidity: f64, ph: f64, temperature: f64) -> Self {
        Self {
            turbidity,
            ph,
            temperature,
            ..self
        }
    }
}

// ============================================================================
// Curve Set
// ============================================================================

/// Per-step turbidity, pH and temperature sequences for the curve-driven engine.
///
/// A curve shorter than the horizon is right-padded with the base parameter
/// value; a longer one is truncated. An empty (or absent) curve therefore
/// holds the base value for the whole run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurveSet {
    #[serde(default)]
    pub turbidity_curve: Vec<f64>,
    #[serde(default)]
    pub ph_curve: Vec<f64>,
    #[serde(default)]
    pub temperature_curve: Vec<f64>,
}

impl CurveSet {
    pub const TURBIDITY: &'static str = "turbidity_curve";
    pub const PH: &'static str = "ph_curve";
    pub const TEMPERATURE: &'static str = "temperature_curve";

    /// Curve names accepted by the advanced prediction endpoint.
    pub const NAMES: [&'static str; 3] = [Self::TURBIDITY, Self::PH, Self::TEMPERATURE];

    /// Expand the curves into exactly `time_steps` parameter sets.
    ///
    /// Flow rate and inlet pressure are not curve-driven and always come
    /// from `base`.
    pub fn resample(&self, base: &ParameterSet, time_steps: usize) -> Vec<ParameterSet> {
        let turbidity = pad_curve(&self.turbidity_curve, base.turbidity, time_steps);
        let ph = pad_curve(&self.ph_curve, base.ph, time_steps);
        let temperature = pad_curve(&self.temperature_curve, base.temperature, time_steps);

        turbidity
            .into_iter()
            .zip(ph)
            .zip(temperature)
            .map(|((t, p), temp)| base.with_water_quality(t, p, temp))
            .collect()
    }
}

/// Right-pad `curve` with `fill` up to `length`, or truncate it to `length`.
pub fn pad_curve(curve: &[f64], fill: f64, length: usize) -> Vec<f64> {
    curve
        .iter()
        .copied()
        .chain(std::iter::repeat(fill))
        .take(length)
        .collect()
}
