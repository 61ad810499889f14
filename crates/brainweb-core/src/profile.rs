// ─────────────────────────────────────────────────────────────────────
// SCPN Brainweb Phantom — Modality Profiles
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Per-modality intensity tables.
//!
//! Each profile is an independent table of label name -> intensity plus
//! the ordered list of labels it paints. Painting follows that order, so
//! a later label overwrites an earlier one where regions overlap (`bone`
//! covers `skull` and `marrow`).

use crate::tissue::TissueRegistry;
use brainweb_types::error::{PhantomError, PhantomResult};
use ndarray::{Array3, Zip};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// PET white-matter activity; grey matter and skin derive from it.
const PET_WHITE_MATTER: u16 = 32;

/// Labels painted by both MR profiles, in paint order.
const MR_ATTRS: [&str; 7] = [
    "whiteMatter",
    "greyMatter",
    "skin",
    "skull",
    "marrow",
    "bone",
    "csf",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modality {
    Pet,
    T1,
    T2,
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Modality::Pet => "PET",
            Modality::T1 => "T1",
            Modality::T2 => "T2",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModalityProfile {
    modality: Modality,
    values: BTreeMap<&'static str, u16>,
    attrs: Vec<&'static str>,
}

impl ModalityProfile {
    fn from_table(modality: Modality, table: &[(&'static str, u16)], attrs: &[&'static str]) -> Self {
        Self {
            modality,
            values: table.iter().copied().collect(),
            attrs: attrs.to_vec(),
        }
    }

    /// Relative FDG-like uptake: grey matter 4x, skin 1/2 of white matter.
    pub fn pet() -> Self {
        let white = PET_WHITE_MATTER;
        Self::from_table(
            Modality::Pet,
            &[
                ("whiteMatter", white),
                ("greyMatter", white * 4),
                ("skin", white / 2),
            ],
            &["whiteMatter", "greyMatter", "skin"],
        )
    }

    pub fn t1() -> Self {
        Self::from_table(
            Modality::T1,
            &[
                ("whiteMatter", 154),
                ("greyMatter", 106),
                ("skin", 92),
                ("skull", 48),
                ("marrow", 180),
                ("bone", 48),
                ("csf", 48),
            ],
            &MR_ATTRS,
        )
    }

    pub fn t2() -> Self {
        Self::from_table(
            Modality::T2,
            &[
                ("whiteMatter", 70),
                ("greyMatter", 100),
                ("skin", 70),
                ("skull", 100),
                ("marrow", 250),
                ("bone", 200),
                ("csf", 250),
            ],
            &MR_ATTRS,
        )
    }

    pub fn for_modality(modality: Modality) -> Self {
        match modality {
            Modality::Pet => Self::pet(),
            Modality::T1 => Self::t1(),
            Modality::T2 => Self::t2(),
        }
    }

    /// Labels painted by this profile, in paint order.
    pub fn attrs(&self) -> &[&'static str] {
        &self.attrs
    }

    pub fn value(&self, name: &str) -> PhantomResult<u16> {
        self.values
            .get(name)
            .copied()
            .ok_or_else(|| PhantomError::UnknownLabel(format!("{name} (not in {} profile)", self.modality)))
    }

    /// Paint this profile's intensities over a labeled volume.
    /// Voxels of labels not in `attrs` stay 0.
    pub fn paint(&self, registry: &TissueRegistry, labels: &Array3<u16>) -> PhantomResult<Array3<u16>> {
        let mut out = Array3::zeros(labels.raw_dim());
        for &attr in &self.attrs {
            let value = self.value(attr)?;
            let mask = registry.mask(labels, attr)?;
            debug!("{}:{}:{}", self.modality, attr, value);
            Zip::from(&mut out).and(&mask).for_each(|o, &hit| {
                if hit {
                    *o = value;
                }
            });
        }
        Ok(out)
    }
}
