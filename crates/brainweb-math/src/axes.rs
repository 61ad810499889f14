//! Axis reordering for export to column-major consumers.

use brainweb_types::error::{PhantomError, PhantomResult};
use brainweb_types::voxel::Voxel;
use ndarray::Array3;

/// Full axis reversal, (z, y, x) -> (x, y, z).
pub const REVERSED_AXES: [usize; 3] = [2, 1, 0];

/// Permute the axes of `volume` and convert its elements to `B`.
///
/// `permutation` defaults to [`REVERSED_AXES`]. The result is in
/// standard (row-major) layout.
pub fn matify<A: Voxel, B: Voxel>(
    volume: &Array3<A>,
    permutation: Option<[usize; 3]>,
) -> PhantomResult<Array3<B>> {
    let perm = permutation.unwrap_or(REVERSED_AXES);
    let mut seen = [false; 3];
    for &axis in &perm {
        if axis >= 3 || seen[axis] {
            return Err(PhantomError::InvalidArgument(format!(
                "{perm:?} is not a permutation of the 3 axes"
            )));
        }
        seen[axis] = true;
    }

    let permuted = volume.view().permuted_axes(perm);
    let converted = permuted.mapv(|v| B::from_f64(v.to_f64()));
    Ok(converted.as_standard_layout().into_owned())
}
