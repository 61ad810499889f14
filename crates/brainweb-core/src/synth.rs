// ─────────────────────────────────────────────────────────────────────
// SCPN Brainweb Phantom — Modality Synthesizer
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Labeled phantom -> PET, mu-map, T1 and T2 on a scanner grid.
//!
//! Pipeline per output: paint on the native 0.5 mm grid, trilinear
//! resize to `round(shape * 0.5 / target_res)`, zero-pad (or crop) to the
//! target shape, cast to the output element type.

use crate::profile::{Modality, ModalityProfile};
use crate::tissue::TissueRegistry;
use brainweb_math::pad::{is_oversize, pad_to_shape};
use brainweb_math::resize::resize_trilinear;
use brainweb_types::config::{OversizePolicy, SynthesisConfig};
use brainweb_types::constants::{MU_BONE_1_CM, MU_TISSUE_1_CM, U16_RESCALE};
use brainweb_types::error::{PhantomError, PhantomResult};
use brainweb_types::geometry::{rescaled_shape, CoordinateSystem};
use brainweb_types::voxel::Voxel;
use ndarray::{Array3, ArrayD, Ix3, Zip};
use tracing::{info, warn};

/// Options for [`to_pet_mmr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SynthesisOptions {
    /// Zero-pad to the full target shape.
    pub pad: bool,
    pub target: CoordinateSystem,
    pub oversize: OversizePolicy,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            pad: true,
            target: CoordinateSystem::Mmr,
            oversize: OversizePolicy::Crop,
        }
    }
}

impl From<&SynthesisConfig> for SynthesisOptions {
    fn from(cfg: &SynthesisConfig) -> Self {
        Self {
            pad: cfg.pad,
            target: cfg.target,
            oversize: cfg.oversize,
        }
    }
}

/// Modality maps on the native phantom grid, before resampling.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeMaps {
    pub pet: Array3<u16>,
    pub mu_map: Array3<f64>,
    pub t1: Array3<u16>,
    pub t2: Array3<u16>,
}

/// Synthesized volumes on the target grid.
#[derive(Debug, Clone, PartialEq)]
pub struct ModalityVolumes<T> {
    pub pet: Array3<T>,
    pub mu_map: Array3<T>,
    pub t1: Array3<T>,
    pub t2: Array3<T>,
}

impl<T> ModalityVolumes<T> {
    /// Names in output order.
    pub const NAMES: [&'static str; 4] = ["PET", "uMap", "T1", "T2"];

    /// `[PET, muMap, T1, T2]`.
    pub fn into_vec(self) -> Vec<Array3<T>> {
        vec![self.pet, self.mu_map, self.t1, self.t2]
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Array3<T>)> {
        Self::NAMES
            .into_iter()
            .zip([&self.pet, &self.mu_map, &self.t1, &self.t2])
    }

    pub fn shape(&self) -> [usize; 3] {
        let (nz, ny, nx) = self.pet.dim();
        [nz, ny, nx]
    }
}

/// Attenuation map: mu tissue on every nonzero voxel, then mu bone on
/// bone voxels.
pub fn mu_map(registry: &TissueRegistry, labels: &Array3<u16>) -> PhantomResult<Array3<f64>> {
    let mut mu = labels.mapv(|v| if v != 0 { MU_TISSUE_1_CM } else { 0.0 });
    let bone = registry.mask(labels, "bone")?;
    Zip::from(&mut mu).and(&bone).for_each(|m, &hit| {
        if hit {
            *m = MU_BONE_1_CM;
        }
    });
    Ok(mu)
}

/// Paint all four modality maps on the native grid.
pub fn paint_native(labels: &Array3<u16>) -> PhantomResult<NativeMaps> {
    check_volume(labels.dim())?;
    let registry = TissueRegistry::brainweb()?;
    Ok(NativeMaps {
        pet: ModalityProfile::for_modality(Modality::Pet).paint(&registry, labels)?,
        mu_map: mu_map(&registry, labels)?,
        t1: ModalityProfile::for_modality(Modality::T1).paint(&registry, labels)?,
        t2: ModalityProfile::for_modality(Modality::T2).paint(&registry, labels)?,
    })
}

fn check_volume((nz, ny, nx): (usize, usize, usize)) -> PhantomResult<()> {
    if nz == 0 || ny == 0 || nx == 0 {
        return Err(PhantomError::ShapeMismatch(format!(
            "labeled volume must be non-empty, got ({nz}, {ny}, {nx})"
        )));
    }
    Ok(())
}

/// Grid geometry shared by the four outputs of one synthesis call.
struct Regrid {
    resampled: [usize; 3],
    target: Option<[usize; 3]>,
    oversize: OversizePolicy,
}

impl Regrid {
    fn new(input: [usize; 3], options: &SynthesisOptions) -> PhantomResult<Self> {
        let resampled = rescaled_shape(input, CoordinateSystem::Brainweb, options.target);
        if resampled.contains(&0) {
            return Err(PhantomError::ShapeMismatch(format!(
                "input shape {input:?} resamples to empty grid {resampled:?} on {}",
                options.target
            )));
        }
        let target = options.pad.then(|| options.target.shape());
        if let Some(shape) = target {
            if is_oversize(resampled, shape) {
                match options.oversize {
                    OversizePolicy::Crop => warn!(
                        "resampled shape {resampled:?} exceeds {} shape {shape:?}, cropping",
                        options.target
                    ),
                    OversizePolicy::Error => {
                        return Err(PhantomError::ShapeMismatch(format!(
                            "resampled shape {resampled:?} exceeds {} shape {shape:?}",
                            options.target
                        )))
                    }
                }
            }
        }
        Ok(Self {
            resampled,
            target,
            oversize: options.oversize,
        })
    }

    /// Resize, pad, then scale and cast each voxel.
    fn apply<T: Voxel>(&self, volume: &Array3<f64>, scale: f64) -> PhantomResult<Array3<T>> {
        let mut out = resize_trilinear(volume, self.resampled)?;
        if let Some(shape) = self.target {
            out = pad_to_shape(&out, shape, self.oversize)?;
        }
        Ok(out.mapv(|v| T::from_f64(v * scale)))
    }

    /// `u16` maps are resampled normalized to [0, 1) and rescaled after.
    fn apply_u16<T: Voxel>(&self, volume: &Array3<u16>) -> PhantomResult<Array3<T>> {
        let normalized = volume.mapv(|v| f64::from(v) / U16_RESCALE);
        self.apply(&normalized, U16_RESCALE)
    }
}

/// Synthesize PET, mu-map, T1 and T2 volumes on `options.target`.
///
/// Each output has the target shape when `options.pad` is set, otherwise
/// the resampled shape. Either all four volumes are produced or the call
/// fails.
pub fn to_pet_mmr<T: Voxel>(
    labels: &Array3<u16>,
    options: &SynthesisOptions,
) -> PhantomResult<ModalityVolumes<T>> {
    let (nz, ny, nx) = labels.dim();
    check_volume((nz, ny, nx))?;
    let regrid = Regrid::new([nz, ny, nx], options)?;

    let native = paint_native(labels)?;
    let volumes = ModalityVolumes {
        pet: regrid.apply_u16(&native.pet)?,
        mu_map: regrid.apply(&native.mu_map, 1.0)?,
        t1: regrid.apply_u16(&native.t1)?,
        t2: regrid.apply_u16(&native.t2)?,
    };

    info!(
        "synthesized {} volumes {:?} -> {:?} ({}, {})",
        options.target,
        [nz, ny, nx],
        volumes.shape(),
        T::DTYPE,
        if options.pad { "padded" } else { "unpadded" }
    );
    Ok(volumes)
}

/// [`to_pet_mmr`] for dynamically-shaped input, e.g. read from npz.
pub fn to_pet_mmr_dyn<T: Voxel>(
    labels: ArrayD<u16>,
    options: &SynthesisOptions,
) -> PhantomResult<ModalityVolumes<T>> {
    let ndim = labels.ndim();
    let labels = labels.into_dimensionality::<Ix3>().map_err(|_| {
        PhantomError::ShapeMismatch(format!("labeled volume must be 3-D, got {ndim}-D"))
    })?;
    to_pet_mmr(&labels, options)
}
