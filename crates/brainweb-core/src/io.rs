// ─────────────────────────────────────────────────────────────────────
// SCPN Brainweb Phantom — Phantom I/O
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Raw and npz phantom files.
//!
//! Raw brainweb files are flat little-endian `u16` arrays in (z, y, x)
//! order. Subject archives are NumPy `.npz` files named `subject_*.npz`.

use crate::synth::ModalityVolumes;
use brainweb_types::constants::RAW_SHAPE;
use brainweb_types::error::{PhantomError, PhantomResult};
use brainweb_types::voxel::Voxel;
use byteorder::{ByteOrder, LittleEndian};
use ndarray::{Array3, ArrayD, Ix3};
use ndarray_npy::{NpzReader, NpzWriter, WritableElement};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default array name inside a subject archive (`np.savez` positional).
pub const DEFAULT_NPZ_KEY: &str = "arr_0";

const SUBJECT_PREFIX: &str = "subject_";
const SUBJECT_SUFFIX: &str = ".npz";

/// Read a raw brainweb phantom of shape (362, 434, 362).
pub fn load_raw(path: impl AsRef<Path>) -> PhantomResult<Array3<u16>> {
    load_raw_with_shape(path, RAW_SHAPE)
}

/// Read a raw little-endian `u16` volume of the given (z, y, x) shape.
pub fn load_raw_with_shape(path: impl AsRef<Path>, shape: [usize; 3]) -> PhantomResult<Array3<u16>> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let n_voxels: usize = shape.iter().product();
    if bytes.len() != 2 * n_voxels {
        return Err(PhantomError::ShapeMismatch(format!(
            "'{}' holds {} bytes, shape {shape:?} needs {}",
            path.display(),
            bytes.len(),
            2 * n_voxels
        )));
    }

    let mut data = vec![0u16; n_voxels];
    LittleEndian::read_u16_into(&bytes, &mut data);
    debug!("read raw phantom '{}' {:?}", path.display(), shape);

    Array3::from_shape_vec((shape[0], shape[1], shape[2]), data)
        .map_err(|e| PhantomError::ShapeMismatch(e.to_string()))
}

/// Write a `u16` volume in the raw brainweb layout.
pub fn save_raw(path: impl AsRef<Path>, volume: &Array3<u16>) -> PhantomResult<()> {
    let values: Vec<u16> = volume.iter().copied().collect();
    let mut bytes = vec![0u8; 2 * values.len()];
    LittleEndian::write_u16_into(&values, &mut bytes);
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Sorted `subject_*.npz` files in `dir`.
pub fn list_subjects(dir: impl AsRef<Path>) -> PhantomResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_subject = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with(SUBJECT_PREFIX) && name.ends_with(SUBJECT_SUFFIX));
        if is_subject && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Read the labeled volume stored under `key` in an npz archive.
pub fn load_subject_npz(path: impl AsRef<Path>, key: &str) -> PhantomResult<Array3<u16>> {
    let path = path.as_ref();
    let mut npz = NpzReader::new(File::open(path)?)?;
    let array: ArrayD<u16> = npz.by_name(key)?;
    let ndim = array.ndim();
    array.into_dimensionality::<Ix3>().map_err(|_| {
        PhantomError::ShapeMismatch(format!(
            "'{}'[{key}] is {ndim}-D, expected a 3-D labeled volume",
            path.display()
        ))
    })
}

/// Write synthesized volumes as `PET`, `uMap`, `T1`, `T2` arrays.
pub fn save_volumes_npz<T>(path: impl AsRef<Path>, volumes: &ModalityVolumes<T>) -> PhantomResult<()>
where
    T: Voxel + WritableElement,
{
    let mut npz = NpzWriter::new_compressed(File::create(path.as_ref())?);
    for (name, volume) in volumes.iter() {
        npz.add_array(name, volume)?;
    }
    npz.finish()?;
    Ok(())
}
