//! Separable Gaussian smoothing of 3D volumes.
//!
//! Kernel radius is `round(GAUSSIAN_TRUNCATE * sigma)`, weights are
//! normalized to unit sum and edges replicate the nearest voxel.

use brainweb_types::constants::GAUSSIAN_TRUNCATE;
use brainweb_types::error::{PhantomError, PhantomResult};
use ndarray::{Array3, Axis};

/// Normalized 1D Gaussian kernel of length `2 * radius + 1`.
///
/// A width whose square underflows to zero gives the identity kernel `[1.0]`.
pub fn gaussian_kernel(sigma: f64) -> Vec<f64> {
    if sigma * sigma == 0.0 {
        return vec![1.0];
    }
    let radius = (GAUSSIAN_TRUNCATE * sigma + 0.5) as usize;
    let inv_two_var = 0.5 / (sigma * sigma);
    let mut kernel: Vec<f64> = (0..=2 * radius)
        .map(|k| {
            let x = k as f64 - radius as f64;
            (-x * x * inv_two_var).exp()
        })
        .collect();
    let sum: f64 = kernel.iter().sum();
    kernel.iter_mut().for_each(|w| *w /= sum);
    kernel
}

fn convolve_axis(data: &mut Array3<f64>, axis: usize, kernel: &[f64]) {
    let radius = (kernel.len() / 2) as isize;
    let mut line = Vec::new();

    for mut lane in data.lanes_mut(Axis(axis)) {
        line.clear();
        line.extend(lane.iter().copied());
        let last = line.len() as isize - 1;

        for (i, out) in lane.iter_mut().enumerate() {
            let mut acc = 0.0;
            for (k, w) in kernel.iter().enumerate() {
                let j = (i as isize + k as isize - radius).clamp(0, last) as usize;
                acc += w * line[j];
            }
            *out = acc;
        }
    }
}

/// Smooth `input` with an isotropic Gaussian of width `sigma` (voxels).
///
/// `sigma == 0` (or a width too small to square) returns a copy. Negative or non-finite `sigma` is rejected.
pub fn gaussian_filter_3d(input: &Array3<f64>, sigma: f64) -> PhantomResult<Array3<f64>> {
    if !sigma.is_finite() || sigma < 0.0 {
        return Err(PhantomError::InvalidArgument(format!(
            "Gaussian sigma must be finite and >= 0, got {sigma}"
        )));
    }
    let mut out = input.clone();
    if sigma * sigma == 0.0 || out.is_empty() {
        return Ok(out);
    }

    let kernel = gaussian_kernel(sigma);
    for axis in 0..3 {
        convolve_axis(&mut out, axis, &kernel);
    }
    Ok(out)
}
