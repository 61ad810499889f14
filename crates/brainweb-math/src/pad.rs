//! Symmetric zero-padding (and centered cropping) onto a target grid.

use brainweb_types::config::OversizePolicy;
use brainweb_types::error::{PhantomError, PhantomResult};
use ndarray::{s, Array3};

/// Per-axis `(left, right)` amounts taking `current` to `target`.
///
/// `(left, rem) = divmod(target - current, 2)` with floor division,
/// right = left + rem, so an odd deficit puts the extra voxel on the
/// right. Negative amounts mean voxels must be removed.
pub fn pad_amounts(current: [usize; 3], target: [usize; 3]) -> [(isize, isize); 3] {
    std::array::from_fn(|i| {
        let deficit = target[i] as isize - current[i] as isize;
        let left = deficit.div_euclid(2);
        let rem = deficit.rem_euclid(2);
        (left, left + rem)
    })
}

/// True when any axis of `current` exceeds `target`.
pub fn is_oversize(current: [usize; 3], target: [usize; 3]) -> bool {
    current.iter().zip(target.iter()).any(|(c, t)| c > t)
}

/// Zero-pad `input` to exactly `target`.
///
/// Axes longer than the target are cropped around the centre under
/// `OversizePolicy::Crop` or rejected with `ShapeMismatch` under
/// `OversizePolicy::Error`.
pub fn pad_to_shape(
    input: &Array3<f64>,
    target: [usize; 3],
    policy: OversizePolicy,
) -> PhantomResult<Array3<f64>> {
    let (nz, ny, nx) = input.dim();
    let current = [nz, ny, nx];

    if policy == OversizePolicy::Error && is_oversize(current, target) {
        return Err(PhantomError::ShapeMismatch(format!(
            "resampled shape {current:?} exceeds target shape {target:?}"
        )));
    }

    let amounts = pad_amounts(current, target);
    // (source start, destination start, length) per axis
    let windows: [(usize, usize, usize); 3] = std::array::from_fn(|i| {
        let (left, right) = amounts[i];
        let src_start = (-left).max(0) as usize;
        let src_end = current[i] - (-right).max(0) as usize;
        let dst_start = left.max(0) as usize;
        (src_start, dst_start, src_end - src_start)
    });

    let mut out = Array3::zeros((target[0], target[1], target[2]));
    let [(sz, dz, lz), (sy, dy, ly), (sx, dx, lx)] = windows;
    out.slice_mut(s![dz..dz + lz, dy..dy + ly, dx..dx + lx])
        .assign(&input.slice(s![sz..sz + lz, sy..sy + ly, sx..sx + lx]));
    Ok(out)
}
