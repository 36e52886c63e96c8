//! Request validation for the prediction engine
//!
//! The engine trusts its inputs. Everything arriving from outside (HTTP
//! bodies, CLI flags) goes through these checks first so that a bad value is
//! reported with the field name, the provided value and the valid range.

use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::types::{CurveSet, FoulingStatus, ParameterSet};

// ============================================================================
// Ranges
// ============================================================================

/// Inclusive valid range for a numeric input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterRange {
    pub name: &'static str,
    pub min: f64,
    pub max: f64,
    pub unit: &'static str,
}

impl ParameterRange {
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Water-quality parameters, in request order.
pub const PARAMETER_RANGES: [ParameterRange; 5] = [
    ParameterRange { name: "turbidity", min: 0.0, max: 2.0, unit: "NTU" },
    ParameterRange { name: "ph", min: 4.0, max: 10.0, unit: "" },
    ParameterRange { name: "temperature", min: 15.0, max: 35.0, unit: "°C" },
    ParameterRange { name: "flow_rate", min: 10.0, max: 50.0, unit: "GPM" },
    ParameterRange { name: "inlet_pressure", min: 20.0, max: 80.0, unit: "PSIG" },
];

pub const PRESSURE_THRESHOLD_RANGE: ParameterRange =
    ParameterRange { name: "pressure_threshold", min: 1.0, max: 15.0, unit: "PSIG" };

pub const MIN_TIME_STEPS: i64 = 1;

/// Hard upper bound on the simulation horizon. Config may lower it.
pub const MAX_TIME_STEPS: usize = 50;

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    #[error("Parameter {field} must be numeric")]
    NotNumeric { field: String, value: String, kind: &'static str },

    #[error("Parameter {} value {value} is out of range", .range.name)]
    OutOfRange { range: ParameterRange, value: f64 },

    #[error("Time steps must be an integer")]
    TimeStepsNotInteger { value: String, kind: &'static str },

    #[error("Time steps {value} is out of range")]
    TimeStepsOutOfRange { value: i64, max: usize },

    #[error("Invalid fouling status: {0}")]
    UnknownFoulingStatus(String),

    #[error("Unknown curve: {0}")]
    UnknownCurve(String),

    #[error("Curve {curve} contains non-numeric value at index {index}")]
    NonNumericCurveValue { curve: String, index: usize, value: String, kind: &'static str },

    #[error("Curve {0} is empty")]
    EmptyCurve(String),
}

impl ValidationError {
    /// Structured description of the failure for API error bodies.
    pub fn details(&self) -> Value {
        match self {
            Self::MissingParameter(p) => json!({ "parameter": p, "required": true }),
            Self::UnknownParameter(p) => json!({
                "parameter": p,
                "valid_parameters": PARAMETER_RANGES.iter().map(|r| r.name).collect::<Vec<_>>(),
            }),
            Self::NotNumeric { field, value, kind } => {
                json!({ "parameter": field, "value": value, "type": kind })
            }
            Self::OutOfRange { range, value } => json!({
                "parameter": range.name,
                "value": value,
                "valid_range": [range.min, range.max],
                "unit": range.unit,
            }),
            Self::TimeStepsNotInteger { value, kind } => {
                json!({ "value": value, "provided_type": kind, "required_type": "int" })
            }
            Self::TimeStepsOutOfRange { value, max } => {
                json!({ "value": value, "valid_range": [MIN_TIME_STEPS, max] })
            }
            Self::UnknownFoulingStatus(s) => json!({
                "provided_status": s,
                "valid_statuses": FoulingStatus::KNOWN_LABELS,
            }),
            Self::UnknownCurve(c) => json!({ "provided_curve": c, "valid_curves": CurveSet::NAMES }),
            Self::NonNumericCurveValue { curve, index, value, kind } => {
                json!({ "curve": curve, "index": index, "value": value, "type": kind })
            }
            Self::EmptyCurve(c) => json!({ "curve": c, "length": 0 }),
        }
    }
}

/// JSON type name used in error details.
fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Finite f64 from a JSON number, `None` for anything else.
fn finite_number(value: &Value) -> Option<f64> {
    value.as_f64().filter(|v| v.is_finite())
}

// ============================================================================
// Parameters
// ============================================================================

/// Check one value against its range.
pub fn check_range(range: &ParameterRange, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() && range.contains(value) {
        Ok(value)
    } else {
        Err(ValidationError::OutOfRange { range: *range, value })
    }
}

/// Range-check an already typed parameter set (CLI path).
pub fn validate_parameter_set(params: &ParameterSet) -> Result<(), ValidationError> {
    let values = [
        params.turbidity,
        params.ph,
        params.temperature,
        params.flow_rate,
        params.inlet_pressure,
    ];
    for (range, value) in PARAMETER_RANGES.iter().zip(values) {
        check_range(range, value)?;
    }
    Ok(())
}

/// Build a [`ParameterSet`] from a raw JSON object.
///
/// Checks run in this order: every required name present, no unknown names,
/// each value numeric, each value in range.
pub fn parse_parameters(raw: &Map<String, Value>) -> Result<ParameterSet, ValidationError> {
    if let Some(missing) = PARAMETER_RANGES.iter().find(|r| !raw.contains_key(r.name)) {
        return Err(ValidationError::MissingParameter(missing.name.to_string()));
    }

    let mut values = [0.0; PARAMETER_RANGES.len()];
    for (name, value) in raw {
        let Some(idx) = PARAMETER_RANGES.iter().position(|r| r.name == name) else {
            return Err(ValidationError::UnknownParameter(name.clone()));
        };
        let number = finite_number(value).ok_or_else(|| ValidationError::NotNumeric {
            field: name.clone(),
            value: value.to_string(),
            kind: json_kind(value),
        })?;
        values[idx] = check_range(&PARAMETER_RANGES[idx], number)?;
    }

    let [turbidity, ph, temperature, flow_rate, inlet_pressure] = values;
    Ok(ParameterSet {
        turbidity,
        ph,
        temperature,
        flow_rate,
        inlet_pressure,
    })
}

// ============================================================================
// Horizon and threshold
// ============================================================================

/// Horizon must be within `1..=max` (`max` itself capped at [`MAX_TIME_STEPS`]).
pub fn validate_time_steps(value: i64, max: usize) -> Result<usize, ValidationError> {
    let max = max.min(MAX_TIME_STEPS);
    match usize::try_from(value) {
        Ok(n) if value >= MIN_TIME_STEPS && n <= max => Ok(n),
        _ => Err(ValidationError::TimeStepsOutOfRange { value, max }),
    }
}

/// [`validate_time_steps`] for an untyped JSON value. Integral floats such
/// as `20.0` are rejected like any other non-integer.
pub fn parse_time_steps(value: &Value, max: usize) -> Result<usize, ValidationError> {
    let n = value.as_i64().ok_or_else(|| ValidationError::TimeStepsNotInteger {
        value: value.to_string(),
        kind: json_kind(value),
    })?;
    validate_time_steps(n, max)
}

pub fn validate_pressure_threshold(value: f64) -> Result<f64, ValidationError> {
    check_range(&PRESSURE_THRESHOLD_RANGE, value)
}

pub fn parse_pressure_threshold(value: &Value) -> Result<f64, ValidationError> {
    let threshold = finite_number(value).ok_or_else(|| ValidationError::NotNumeric {
        field: PRESSURE_THRESHOLD_RANGE.name.to_string(),
        value: value.to_string(),
        kind: json_kind(value),
    })?;
    validate_pressure_threshold(threshold)
}

// ============================================================================
// Fouling status and curves
// ============================================================================

/// Strict check: only the five known labels are accepted.
pub fn validate_fouling_status(label: &str) -> Result<FoulingStatus, ValidationError> {
    let status = FoulingStatus::from_label(label);
    if status.is_known() {
        Ok(status)
    } else {
        Err(ValidationError::UnknownFoulingStatus(label.to_string()))
    }
}

/// Build a [`CurveSet`] from a raw JSON object of named arrays.
///
/// A `null` curve is treated as absent. Curve values are not range-checked.
pub fn parse_curves(raw: &Map<String, Value>) -> Result<CurveSet, ValidationError> {
    let mut curves = CurveSet::default();

    for (name, value) in raw {
        let slot = match name.as_str() {
            CurveSet::TURBIDITY => &mut curves.turbidity_curve,
            CurveSet::PH => &mut curves.ph_curve,
            CurveSet::TEMPERATURE => &mut curves.temperature_curve,
            _ => return Err(ValidationError::UnknownCurve(name.clone())),
        };

        let items = match value {
            Value::Null => continue,
            Value::Array(items) => items,
            other => {
                return Err(ValidationError::NonNumericCurveValue {
                    curve: name.clone(),
                    index: 0,
                    value: other.to_string(),
                    kind: json_kind(other),
                })
            }
        };

        if items.is_empty() {
            return Err(ValidationError::EmptyCurve(name.clone()));
        }

        *slot = items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                finite_number(item).ok_or_else(|| ValidationError::NonNumericCurveValue {
                    curve: name.clone(),
                    index,
                    value: item.to_string(),
                    kind: json_kind(item),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
    }

    Ok(curves)
}
