//! Vertical displacement curve for the grapple leap.

use bevy::math::curve::{Curve, UnevenSampleAutoCurve};
use serde::{Deserialize, Serialize};

use super::error::GrappleConfigError;

/// Maps normalized flight time `[0, 1]` to a vertical arc scale.
///
/// Keys are `(time, value)` pairs, linearly interpolated and clamped to the
/// first/last key outside their range. No keys means a straight flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<(f32, f32)>", into = "Vec<(f32, f32)>")]
pub struct VerticalArcCurve {
    keys: Vec<(f32, f32)>,
    curve: Option<UnevenSampleAutoCurve<f32>>,
}

impl VerticalArcCurve {
    /// Gentle hump peaking at mid-flight.
    pub const DEFAULT_KEYS: [(f32, f32); 3] = [(0.0, 0.0), (0.5, 0.25), (1.0, 0.0)];

    pub fn from_keys(
        keys: impl IntoIterator<Item = (f32, f32)>,
    ) -> Result<Self, GrappleConfigError> {
        let keys: Vec<(f32, f32)> = keys.into_iter().collect();
        if let Some(&(time, value)) = keys
            .iter()
            .find(|(time, value)| !time.is_finite() || !value.is_finite())
        {
            return Err(GrappleConfigError::NonFiniteKey { time, value });
        }

        if keys.is_empty() {
            return Ok(Self::flat());
        }

        let curve = UnevenSampleAutoCurve::new(keys.iter().copied())
            .map_err(|_| GrappleConfigError::DegenerateArc { keys: keys.len() })?;

        Ok(Self {
            keys,
            curve: Some(curve),
        })
    }

    pub fn flat() -> Self {
        Self {
            keys: Vec::new(),
            curve: None,
        }
    }

    pub fn keys(&self) -> &[(f32, f32)] {
        &self.keys
    }

    pub fn sample(&self, t: f32) -> f32 {
        self.curve
            .as_ref()
            .map_or(0.0, |curve| curve.sample_clamped(t))
    }
}

impl Default for VerticalArcCurve {
    fn default() -> Self {
        Self::from_keys(Self::DEFAULT_KEYS).unwrap_or_else(|_| Self::flat())
    }
}

impl TryFrom<Vec<(f32, f32)>> for VerticalArcCurve {
    type Error = GrappleConfigError;

    fn try_from(keys: Vec<(f32, f32)>) -> Result<Self, Self::Error> {
        Self::from_keys(keys)
    }
}

impl From<VerticalArcCurve> for Vec<(f32, f32)> {
    fn from(curve: VerticalArcCurve) -> Self {
        curve.keys
    }
}
