//! Trilinear resampling of 3D volumes.
//!
//! Sample positions follow the pixel-centre convention: output index `o`
//! on an axis maps to source coordinate `(o + 0.5) * n_in / n_out - 0.5`.
//! No anti-aliasing prefilter is applied. Samples whose source coordinate
//! falls outside `[0, n_in - 1]` on any axis take the fill value 0.

use brainweb_types::error::{PhantomError, PhantomResult};
use ndarray::Array3;

/// Slack on the source extent, absorbs rounding in the coordinate map.
const EDGE_EPS: f64 = 1e-9;

/// Interpolation stencil along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
struct AxisSample {
    lo: usize,
    hi: usize,
    /// Weight of `hi`; `lo` gets `1 - t`.
    t: f64,
    inside: bool,
}

fn axis_samples(n_in: usize, n_out: usize) -> Vec<AxisSample> {
    let scale = n_in as f64 / n_out as f64;
    let last = (n_in - 1) as f64;

    (0..n_out)
        .map(|o| {
            let c = (o as f64 + 0.5) * scale - 0.5;
            if c < -EDGE_EPS || c > last + EDGE_EPS {
                return AxisSample {
                    lo: 0,
                    hi: 0,
                    t: 0.0,
                    inside: false,
                };
            }
            let c = c.clamp(0.0, last);
            let lo = (c.floor() as usize).min(n_in - 1);
            let hi = (lo + 1).min(n_in - 1);
            AxisSample {
                lo,
                hi,
                t: c - lo as f64,
                inside: true,
            }
        })
        .collect()
}

/// Resize `input` to `shape` with trilinear interpolation.
///
/// Fails with `ShapeMismatch` if either shape has a zero-length axis.
pub fn resize_trilinear(input: &Array3<f64>, shape: [usize; 3]) -> PhantomResult<Array3<f64>> {
    let (nz, ny, nx) = input.dim();
    if nz == 0 || ny == 0 || nx == 0 {
        return Err(PhantomError::ShapeMismatch(format!(
            "cannot resize empty volume of shape ({nz}, {ny}, {nx})"
        )));
    }
    if shape.contains(&0) {
        return Err(PhantomError::ShapeMismatch(format!(
            "cannot resize to empty shape {shape:?}"
        )));
    }

    let sz = axis_samples(nz, shape[0]);
    let sy = axis_samples(ny, shape[1]);
    let sx = axis_samples(nx, shape[2]);

    let out = Array3::from_shape_fn((shape[0], shape[1], shape[2]), |(k, j, i)| {
        let (a, b, c) = (sz[k], sy[j], sx[i]);
        if !(a.inside && b.inside && c.inside) {
            return 0.0;
        }
        let lerp_x = |z: usize, y: usize| {
            (1.0 - c.t) * input[[z, y, c.lo]] + c.t * input[[z, y, c.hi]]
        };
        let plane = |z: usize| (1.0 - b.t) * lerp_x(z, b.lo) + b.t * lerp_x(z, b.hi);
        (1.0 - a.t) * plane(a.lo) + a.t * plane(a.hi)
    });

    Ok(out)
}
