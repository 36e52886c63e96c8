//! Membrane fouling classification

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Fouling classification supplied by the operator for a prediction run.
///
/// Labels are matched case-sensitively. Anything outside the five known
/// labels becomes [`FoulingStatus::Unknown`], which carries the raw label
/// and behaves exactly like `clean` (factor 1.0).
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub enum FoulingStatus {
    #[default]
    Clean,
    Mild,
    Moderate,
    Severe,
    Critical,
    Unknown(String),
}

impl FoulingStatus {
    /// The five labels the model knows, in escalating order.
    pub const KNOWN_LABELS: [&'static str; 5] = ["clean", "mild", "moderate", "severe", "critical"];

    /// Parse a label. Never fails.
    pub fn from_label(label: &str) -> Self {
        match label {
            "clean" => Self::Clean,
            "mild" => Self::Mild,
            "moderate" => Self::Moderate,
            "severe" => Self::Severe,
            "critical" => Self::Critical,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Multiplicative factor applied to the pressure trend and backwash intensity.
    pub fn factor(&self) -> f64 {
        match self {
            Self::Clean | Self::Unknown(_) => 1.0,
            Self::Mild => 1.2,
            Self::Moderate => 1.5,
            Self::Severe => 1.8,
            Self::Critical => 2.0,
        }
    }

    /// Severe or critical fouling warrants chemical cleaning.
    pub fn needs_chemical_cleaning(&self) -> bool {
        matches!(self, Self::Severe | Self::Critical)
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Clean => "clean",
            Self::Mild => "mild",
            Self::Moderate => "moderate",
            Self::Severe => "severe",
            Self::Critical => "critical",
            Self::Unknown(raw) => raw,
        }
    }
}

impl std::fmt::Display for FoulingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for FoulingStatus {
    fn from(label: &str) -> Self {
        Self::from_label(label)
    }
}

impl Serialize for FoulingStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FoulingStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Self::from_label(&label))
    }
}
