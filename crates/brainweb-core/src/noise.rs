// ─────────────────────────────────────────────────────────────────────
// SCPN Brainweb Phantom — Noise Injection
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Smoothed multiplicative noise.
//!
//! `out = v * (1 + n * (2r - 1))` where `r` is uniform [0, 1) noise
//! smoothed by a Gaussian of width `sigma`. Every voxel therefore stays
//! within `[1 - n, 1 + n]` times its input value.

use brainweb_math::gaussian::gaussian_filter_3d;
use brainweb_types::config::NoiseConfig;
use brainweb_types::error::{PhantomError, PhantomResult};
use brainweb_types::voxel::Voxel;
use ndarray::{Array3, Zip};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::warn;

/// Add `fraction` x 100% smoothed noise to `volume`.
///
/// `fraction == 0` returns the input unchanged (with a warning when
/// `warn_zero` is set). Negative or non-finite `fraction` is rejected.
pub fn noise<T: Voxel, R: Rng + ?Sized>(
    volume: &Array3<T>,
    fraction: f64,
    sigma: f64,
    warn_zero: bool,
    rng: &mut R,
) -> PhantomResult<Array3<T>> {
    if !fraction.is_finite() || fraction < 0.0 {
        return Err(PhantomError::InvalidArgument(format!(
            "noise fraction must be finite and >= 0, got {fraction}"
        )));
    }
    if fraction == 0.0 {
        if warn_zero {
            warn!("zero noise");
        }
        return Ok(volume.clone());
    }

    let uniform = Array3::from_shape_simple_fn(volume.raw_dim(), || rng.gen::<f64>());
    let field = gaussian_filter_3d(&uniform, sigma)?;

    Ok(Zip::from(volume)
        .and(&field)
        .map_collect(|&v, &r| T::from_f64(v.to_f64() * (1.0 + fraction * (2.0 * r - 1.0)))))
}

/// Apply a [`NoiseConfig`], seeding from `cfg.seed` or from OS entropy.
pub fn noise_from_config<T: Voxel>(volume: &Array3<T>, cfg: &NoiseConfig) -> PhantomResult<Array3<T>> {
    let mut rng = match cfg.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    noise(volume, cfg.fraction, cfg.sigma, true, &mut rng)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> Array3<f64> {
        Array3::from_shape_fn((6, 7, 8), |(k, j, i)| 1.0 + (k * 56 + j * 8 + i) as f64)
    }

    #[test]
    fn test_zero_noise_identity() {
        let vol = ramp();
        let mut rng = StdRng::seed_from_u64(1);
        let out = noise(&vol, 0.0, 1.0, true, &mut rng).unwrap();
        assert_eq!(out, vol);
    }

    #[test]
    fn test_negative_noise_rejected() {
        let vol = ramp();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            noise(&vol, -0.1, 1.0, false, &mut rng),
            Err(PhantomError::InvalidArgument(_))
        ));
        assert!(matches!(
            noise(&vol, f64::NAN, 1.0, false, &mut rng),
            Err(PhantomError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_ratio_bounds() {
        let vol = ramp();
        let mut rng = StdRng::seed_from_u64(7);
        let n = 0.25;
        let out = noise(&vol, n, 1.0, false, &mut rng).unwrap();
        for (o, v) in out.iter().zip(vol.iter()) {
            let ratio = o / v;
            assert!(
                ratio >= 1.0 - n - 1e-12 && ratio <= 1.0 + n + 1e-12,
                "ratio {ratio} outside [{}, {}]",
                1.0 - n,
                1.0 + n
            );
        }
        assert_ne!(out, vol, "Nonzero noise should perturb the volume");
    }

    #[test]
    fn test_seeded_reproducible() {
        let vol = ramp();
        let a = noise(&vol, 0.1, 1.0, false, &mut StdRng::seed_from_u64(99)).unwrap();
        let b = noise(&vol, 0.1, 1.0, false, &mut StdRng::seed_from_u64(99)).unwrap();
        let c = noise(&vol, 0.1, 1.0, false, &mut StdRng::seed_from_u64(100)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_smoothing_reduces_spread() {
        // Wider kernel -> noise field closer to 0.5 -> ratios closer to 1.
        let vol = Array3::from_elem((12, 12, 12), 1.0_f64);
        let spread = |sigma: f64| {
            let out = noise(&vol, 0.5, sigma, false, &mut StdRng::seed_from_u64(3)).unwrap();
            out.iter().map(|v| (v - 1.0).abs()).fold(0.0_f64, f64::max)
        };
        assert!(spread(2.0) < spread(0.0));
    }

    #[test]
    fn test_tiny_sigma_stays_finite() {
        let vol = ramp();
        let out = noise(&vol, 0.1, 1e-200, false, &mut StdRng::seed_from_u64(8)).unwrap();
        assert!(out.iter().all(|v| v.is_finite()), "Underflowing sigma produced NaN");
        for (&o, &v) in out.iter().zip(vol.iter()) {
            assert!((o - v).abs() <= 0.1 * v + 1e-12);
        }
    }

    #[test]
    fn test_f32_volume() {
        let vol = Array3::from_elem((3, 3, 3), 10.0_f32);
        let out = noise(&vol, 0.1, 1.0, false, &mut StdRng::seed_from_u64(5)).unwrap();
        assert!(out.iter().all(|&v| (9.0..=11.0).contains(&v)));
    }

    #[test]
    fn test_from_config_seeded() {
        let vol = ramp();
        let cfg = NoiseConfig {
            fraction: 0.2,
            sigma: 1.0,
            seed: Some(11),
        };
        let a = noise_from_config(&vol, &cfg).unwrap();
        let b = noise_from_config(&vol, &cfg).unwrap();
        assert_eq!(a, b);
    }
}
