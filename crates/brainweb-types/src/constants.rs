// ─────────────────────────────────────────────────────────────────────
// SCPN Brainweb Phantom — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
/// Linear attenuation of cortical bone at 511 keV (1/cm).
pub const MU_BONE_1_CM: f64 = 0.13;

/// Linear attenuation of soft tissue at 511 keV (1/cm).
pub const MU_TISSUE_1_CM: f64 = 0.0975;

/// Bit offset between consecutive base tissue codes.
/// Codes are `i << LABEL_SHIFT`, leaving the low nibble for flag bits.
pub const LABEL_SHIFT: u32 = 4;

/// Shape (z, y, x) of a raw brainweb phantom file.
pub const RAW_SHAPE: [usize; 3] = [362, 434, 362];

/// Scale used to normalize `u16` volumes before resampling and to
/// restore them afterwards. A power of two, so the round trip is exact.
pub const U16_RESCALE: f64 = 65536.0;

/// Gaussian kernel support in standard deviations.
pub const GAUSSIAN_TRUNCATE: f64 = 4.0;

/// Label match tolerance: `|voxel - code| < LABEL_TOLERANCE`.
pub const LABEL_TOLERANCE: f64 = 1.0;
