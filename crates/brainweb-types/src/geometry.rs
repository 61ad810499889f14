// ─────────────────────────────────────────────────────────────────────
// SCPN Brainweb Phantom — Geometry
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Voxel grids of the supported coordinate systems.
//!
//! Axis order is (z, y, x) throughout. Only the Siemens mMR grid has a
//! native shape; the other grids cover the same field of view, so their
//! shapes are the mMR extent rescaled by the resolution ratio.

use crate::error::{PhantomError, PhantomResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// mMR PET voxel size (mm).
pub const MMR_RESOLUTION: [f64; 3] = [2.0312, 2.0863, 2.0863];

/// Isotropic MR voxel size (mm).
pub const MR_RESOLUTION: [f64; 3] = [1.0, 1.0, 1.0];

/// Brainweb phantom voxel size (mm).
pub const BRAINWEB_RESOLUTION: [f64; 3] = [0.5, 0.5, 0.5];

/// mMR PET image shape (voxels).
pub const MMR_SHAPE: [usize; 3] = [127, 344, 344];

/// A named voxel grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CoordinateSystem {
    /// Siemens Biograph mMR PET grid.
    #[default]
    #[serde(rename = "mMR")]
    Mmr,
    /// 1 mm isotropic MR grid.
    #[serde(rename = "MR")]
    Mr,
    /// Native brainweb phantom grid.
    #[serde(rename = "brainweb")]
    Brainweb,
}

impl CoordinateSystem {
    pub const ALL: [CoordinateSystem; 3] = [
        CoordinateSystem::Mmr,
        CoordinateSystem::Mr,
        CoordinateSystem::Brainweb,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CoordinateSystem::Mmr => "mMR",
            CoordinateSystem::Mr => "MR",
            CoordinateSystem::Brainweb => "brainweb",
        }
    }

    /// Voxel size in mm, (z, y, x).
    pub fn resolution(self) -> [f64; 3] {
        match self {
            CoordinateSystem::Mmr => MMR_RESOLUTION,
            CoordinateSystem::Mr => MR_RESOLUTION,
            CoordinateSystem::Brainweb => BRAINWEB_RESOLUTION,
        }
    }

    /// Real-valued shape covering the mMR field of view.
    pub fn extent(self) -> [f64; 3] {
        let res = self.resolution();
        std::array::from_fn(|i| MMR_SHAPE[i] as f64 * MMR_RESOLUTION[i] / res[i])
    }

    /// Integer shape: `extent()` rounded half-to-even.
    pub fn shape(self) -> [usize; 3] {
        self.extent().map(|e| e.round_ties_even() as usize)
    }

    /// Field of view in mm.
    pub fn field_of_view_mm(self) -> [f64; 3] {
        let res = self.resolution();
        let shape = self.shape();
        std::array::from_fn(|i| shape[i] as f64 * res[i])
    }
}

impl fmt::Display for CoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CoordinateSystem {
    type Err = PhantomError;

    fn from_str(s: &str) -> PhantomResult<Self> {
        CoordinateSystem::ALL
            .into_iter()
            .find(|cs| cs.name() == s)
            .ok_or_else(|| PhantomError::UnknownGeometry(s.to_string()))
    }
}

/// Shape of a `shape`-sized volume on the `from` grid once resampled to
/// the `to` grid, rounded half-to-even per axis.
pub fn rescaled_shape(shape: [usize; 3], from: CoordinateSystem, to: CoordinateSystem) -> [usize; 3] {
    let src = from.resolution();
    let dst = to.resolution();
    std::array::from_fn(|i| (shape[i] as f64 * src[i] / dst[i]).round_ties_even() as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mmr_shape_is_native() {
        assert_eq!(CoordinateSystem::Mmr.shape(), MMR_SHAPE);
        assert_eq!(CoordinateSystem::Mmr.extent(), [127.0, 344.0, 344.0]);
    }

    #[test]
    fn test_derived_shapes() {
        let mr = CoordinateSystem::Mr.extent();
        assert!((mr[0] - 257.9624).abs() < 1e-9, "MR z extent = {}", mr[0]);
        assert!((mr[1] - 717.6872).abs() < 1e-9, "MR y extent = {}", mr[1]);
        assert_eq!(CoordinateSystem::Mr.shape(), [258, 718, 718]);
        assert_eq!(CoordinateSystem::Brainweb.shape(), [516, 1435, 1435]);
    }

    #[test]
    fn test_parse_names() {
        for cs in CoordinateSystem::ALL {
            assert_eq!(cs.name().parse::<CoordinateSystem>().unwrap(), cs);
            assert_eq!(cs.to_string(), cs.name());
        }
        match "PET".parse::<CoordinateSystem>() {
            Err(PhantomError::UnknownGeometry(name)) => assert_eq!(name, "PET"),
            other => panic!("expected UnknownGeometry, got {other:?}"),
        }
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&CoordinateSystem::Brainweb).unwrap();
        assert_eq!(json, "\"brainweb\"");
        let cs: CoordinateSystem = serde_json::from_str("\"mMR\"").unwrap();
        assert_eq!(cs, CoordinateSystem::Mmr);
    }

    #[test]
    fn test_rescaled_shape_brainweb_to_mmr() {
        let shape = rescaled_shape(
            [362, 434, 362],
            CoordinateSystem::Brainweb,
            CoordinateSystem::Mmr,
        );
        assert_eq!(shape, [89, 104, 87]);
    }

    #[test]
    fn test_rescaled_shape_identity() {
        let shape = rescaled_shape([10, 20, 30], CoordinateSystem::Mr, CoordinateSystem::Mr);
        assert_eq!(shape, [10, 20, 30]);
    }
}
