// ─────────────────────────────────────────────────────────────────────
// SCPN Brainweb Phantom — Tissue Code Registry
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Brainweb tissue class codes.
//!
//! Base labels sit on disjoint nibbles (`i << 4`), so voxels may carry
//! extra flag bits in the low nibble. A voxel matches a base label when
//! `|voxel - code| < 1`. Composite labels match any of their members.

use brainweb_types::constants::{LABEL_SHIFT, LABEL_TOLERANCE};
use brainweb_types::error::{PhantomError, PhantomResult};
use ndarray::Array3;
use std::collections::BTreeMap;

/// Base labels in code order: label `i` has code `i << LABEL_SHIFT`.
pub const BASE_LABELS: [&str; 12] = [
    "background",
    "csf",
    "greyMatter",
    "whiteMatter",
    "fat",
    "muscle",
    "skin",
    "skull",
    "vessels",
    "aroundFat",
    "dura",
    "marrow",
];

/// Members of the composite `bone` label.
pub const BONE_MEMBERS: [&str; 3] = ["skull", "marrow", "dura"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelDescriptor {
    /// A single tissue code.
    Base(u16),
    /// Union of other labels (base or composite).
    Composite(Vec<String>),
}

/// Validated label table. Composites are flattened to base codes on
/// construction, so lookups never recurse.
#[derive(Debug, Clone)]
pub struct TissueRegistry {
    descriptors: BTreeMap<String, LabelDescriptor>,
    resolved: BTreeMap<String, Vec<u16>>,
}

#[inline]
fn code_matches(voxel: u16, code: u16) -> bool {
    (f64::from(voxel) - f64::from(code)).abs() < LABEL_TOLERANCE
}

impl TissueRegistry {
    /// Build a registry, rejecting duplicate names, composites that name
    /// unknown labels, and composite cycles.
    pub fn new<I, S>(entries: I) -> PhantomResult<Self>
    where
        I: IntoIterator<Item = (S, LabelDescriptor)>,
        S: Into<String>,
    {
        let mut descriptors = BTreeMap::new();
        for (name, descriptor) in entries {
            let name = name.into();
            if descriptors.contains_key(&name) {
                return Err(PhantomError::Registry(format!("duplicate label '{name}'")));
            }
            descriptors.insert(name, descriptor);
        }

        let mut resolved = BTreeMap::new();
        for name in descriptors.keys() {
            let mut stack = Vec::new();
            let mut codes = resolve(&descriptors, name, &mut stack)?;
            codes.sort_unstable();
            codes.dedup();
            resolved.insert(name.clone(), codes);
        }

        Ok(Self {
            descriptors,
            resolved,
        })
    }

    /// The 12 brainweb base labels plus `bone = skull | marrow | dura`.
    pub fn brainweb() -> PhantomResult<Self> {
        let base = BASE_LABELS
            .iter()
            .enumerate()
            .map(|(i, &name)| (name.to_string(), LabelDescriptor::Base((i as u16) << LABEL_SHIFT)));
        let bone = std::iter::once((
            "bone".to_string(),
            LabelDescriptor::Composite(BONE_MEMBERS.iter().map(|s| s.to_string()).collect()),
        ));
        Self::new(base.chain(bone))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.descriptors.contains_key(name)
    }

    /// Base codes matched by `name`, sorted.
    pub fn base_codes(&self, name: &str) -> PhantomResult<&[u16]> {
        self.resolved
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| PhantomError::UnknownLabel(name.to_string()))
    }

    /// Numeric code: the base code, or the bitwise OR of a composite's
    /// base codes (`bone` = 0xF0).
    pub fn code(&self, name: &str) -> PhantomResult<u16> {
        Ok(self.base_codes(name)?.iter().fold(0, |acc, &c| acc | c))
    }

    pub fn matches(&self, name: &str, voxel: u16) -> PhantomResult<bool> {
        Ok(self
            .base_codes(name)?
            .iter()
            .any(|&code| code_matches(voxel, code)))
    }

    /// Boolean mask of the voxels belonging to `name`.
    pub fn mask(&self, volume: &Array3<u16>, name: &str) -> PhantomResult<Array3<bool>> {
        let codes = self.base_codes(name)?;
        Ok(volume.mapv(|v| codes.iter().any(|&code| code_matches(v, code))))
    }

    /// First base label matching `voxel`, if any.
    pub fn classify(&self, voxel: u16) -> Option<&str> {
        self.descriptors.iter().find_map(|(name, d)| match d {
            LabelDescriptor::Base(code) if code_matches(voxel, *code) => Some(name.as_str()),
            _ => None,
        })
    }
}

fn resolve(
    descriptors: &BTreeMap<String, LabelDescriptor>,
    name: &str,
    stack: &mut Vec<String>,
) -> PhantomResult<Vec<u16>> {
    if stack.iter().any(|s| s == name) {
        return Err(PhantomError::Registry(format!(
            "composite cycle: {} -> {name}",
            stack.join(" -> ")
        )));
    }
    let descriptor = descriptors.get(name).ok_or_else(|| {
        PhantomError::Registry(format!(
            "'{}' refers to unknown label '{name}'",
            stack.last().map(String::as_str).unwrap_or("?")
        ))
    })?;

    match descriptor {
        LabelDescriptor::Base(code) => Ok(vec![*code]),
        LabelDescriptor::Composite(members) => {
            stack.push(name.to_string());
            let mut codes = Vec::new();
            for member in members {
                codes.extend(resolve(descriptors, member, stack)?);
            }
            stack.pop();
            Ok(codes)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    fn registry() -> TissueRegistry {
        TissueRegistry::brainweb().unwrap()
    }

    #[test]
    fn test_base_codes() {
        let reg = registry();
        assert_eq!(reg.code("background").unwrap(), 0);
        assert_eq!(reg.code("csf").unwrap(), 16);
        assert_eq!(reg.code("whiteMatter").unwrap(), 48);
        assert_eq!(reg.code("skull").unwrap(), 112);
        assert_eq!(reg.code("dura").unwrap(), 160);
        assert_eq!(reg.code("marrow").unwrap(), 176);
    }

    #[test]
    fn test_bone_code_is_union() {
        let reg = registry();
        assert_eq!(reg.code("bone").unwrap(), 112 | 176 | 160);
        assert_eq!(reg.base_codes("bone").unwrap(), &[112, 160, 176]);
    }

    #[test]
    fn test_exact_match_only() {
        let reg = registry();
        assert!(reg.matches("whiteMatter", 48).unwrap());
        assert!(!reg.matches("whiteMatter", 49).unwrap());
        assert!(!reg.matches("whiteMatter", 47).unwrap());
        assert!(!reg.matches("greyMatter", 48).unwrap());
    }

    #[test]
    fn test_bone_mask_union() {
        let reg = registry();
        let labels = [0u16, 16, 48, 112, 160, 176, 96, 128];
        let vol = Array3::from_shape_fn((2, 2, 2), |(k, j, i)| labels[k * 4 + j * 2 + i]);
        let bone = reg.mask(&vol, "bone").unwrap();
        let skull = reg.mask(&vol, "skull").unwrap();
        let marrow = reg.mask(&vol, "marrow").unwrap();
        let dura = reg.mask(&vol, "dura").unwrap();
        for idx in ndarray::indices((2, 2, 2)) {
            assert_eq!(bone[idx], skull[idx] || marrow[idx] || dura[idx]);
        }
        assert_eq!(bone.iter().filter(|&&b| b).count(), 3);
    }

    #[test]
    fn test_unknown_label() {
        let reg = registry();
        let vol = Array3::<u16>::zeros((1, 1, 1));
        match reg.mask(&vol, "cartilage") {
            Err(PhantomError::UnknownLabel(name)) => assert_eq!(name, "cartilage"),
            other => panic!("expected UnknownLabel, got {other:?}"),
        }
        assert!(matches!(reg.code("cartilage"), Err(PhantomError::UnknownLabel(_))));
    }

    #[test]
    fn test_classify() {
        let reg = registry();
        assert_eq!(reg.classify(48), Some("whiteMatter"));
        assert_eq!(reg.classify(0), Some("background"));
        assert_eq!(reg.classify(49), None);
        assert_eq!(reg.classify(240), None);
    }

    #[test]
    fn test_nested_composite() {
        let reg = TissueRegistry::new(vec![
            ("a", LabelDescriptor::Base(16)),
            ("b", LabelDescriptor::Base(32)),
            ("c", LabelDescriptor::Base(64)),
            ("ab", LabelDescriptor::Composite(vec!["a".into(), "b".into()])),
            ("abc", LabelDescriptor::Composite(vec!["ab".into(), "c".into(), "a".into()])),
        ])
        .unwrap();
        assert_eq!(reg.base_codes("abc").unwrap(), &[16, 32, 64]);
        assert_eq!(reg.code("abc").unwrap(), 112);
    }

    #[test]
    fn test_cycle_rejected() {
        let result = TissueRegistry::new(vec![
            ("a", LabelDescriptor::Base(16)),
            ("x", LabelDescriptor::Composite(vec!["a".into(), "y".into()])),
            ("y", LabelDescriptor::Composite(vec!["x".into()])),
        ]);
        assert!(matches!(result, Err(PhantomError::Registry(_))));

        let result = TissueRegistry::new(vec![(
            "self",
            LabelDescriptor::Composite(vec!["self".into()]),
        )]);
        assert!(matches!(result, Err(PhantomError::Registry(_))));
    }

    #[test]
    fn test_dangling_member_rejected() {
        let result = TissueRegistry::new(vec![(
            "bone",
            LabelDescriptor::Composite(vec!["skull".into()]),
        )]);
        assert!(matches!(result, Err(PhantomError::Registry(_))));
    }

    #[test]
    fn test_duplicate_rejected() {
        let result = TissueRegistry::new(vec![
            ("a", LabelDescriptor::Base(16)),
            ("a", LabelDescriptor::Base(32)),
        ]);
        assert!(matches!(result, Err(PhantomError::Registry(_))));
    }
}
