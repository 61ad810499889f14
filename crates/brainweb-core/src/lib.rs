//! Brainweb phantom synthesis.
//!
//! Label registry and modality profiles, PET/mu-map/MR synthesis onto
//! scanner grids, noise injection, raw and npz I/O.

pub mod io;
pub mod noise;
pub mod profile;
pub mod synth;
pub mod tissue;
