// ─────────────────────────────────────────────────────────────────────
// SCPN Brainweb Phantom — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::error::{PhantomError, PhantomResult};
use crate::geometry::CoordinateSystem;
use serde::{Deserialize, Serialize};

/// What to do when a resampled volume is larger than the target grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OversizePolicy {
    /// Centered crop, using the same floor split as padding.
    #[default]
    Crop,
    /// Fail with `ShapeMismatch`.
    Error,
}

/// Top-level synthesis configuration.
/// Every field is optional in JSON; missing fields take the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisConfig {
    /// Target coordinate system: "mMR", "MR" or "brainweb".
    #[serde(default)]
    pub target: CoordinateSystem,
    /// Zero-pad resampled volumes to the full target shape.
    #[serde(default = "default_pad")]
    pub pad: bool,
    #[serde(default)]
    pub oversize: OversizePolicy,
    /// Optional multiplicative noise applied to the PET volume.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noise: Option<NoiseConfig>,
}

/// Noise injection parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseConfig {
    /// Fractional amplitude, >= 0.
    pub fraction: f64,
    /// Gaussian smoothing width (voxels). Default: 1.0
    #[serde(default = "default_sigma")]
    pub sigma: f64,
    /// RNG seed; entropy-seeded when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_pad() -> bool {
    true
}
fn default_sigma() -> f64 {
    1.0
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        SynthesisConfig {
            target: CoordinateSystem::default(),
            pad: default_pad(),
            oversize: OversizePolicy::default(),
            noise: None,
        }
    }
}

impl SynthesisConfig {
    /// Load from a JSON file and validate.
    pub fn from_file(path: &str) -> PhantomResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> PhantomResult<()> {
        if let Some(noise) = &self.noise {
            if !noise.fraction.is_finite() || noise.fraction < 0.0 {
                return Err(PhantomError::ConfigError(format!(
                    "noise.fraction must be finite and >= 0, got {}",
                    noise.fraction
                )));
            }
            if !noise.sigma.is_finite() || noise.sigma < 0.0 {
                return Err(PhantomError::ConfigError(format!(
                    "noise.sigma must be finite and >= 0, got {}",
                    noise.sigma
                )));
            }
        }
        Ok(())
    }
}
