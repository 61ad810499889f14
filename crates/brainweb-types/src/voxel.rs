//! Element types a volume may be stored in.

use std::fmt::Debug;

/// Numeric voxel element convertible to and from `f64`.
///
/// Conversion to integer types truncates toward zero and saturates at the
/// type bounds (`as` cast semantics).
pub trait Voxel: Copy + Default + PartialEq + Debug + Send + Sync + 'static {
    /// NumPy-style dtype name, used in log messages.
    const DTYPE: &'static str;

    fn to_f64(self) -> f64;
    fn from_f64(value: f64) -> Self;
}

macro_rules! impl_voxel {
    ($($t:ty => $name:literal),* $(,)?) => {
        $(
            impl Voxel for $t {
                const DTYPE: &'static str = $name;

                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }

                #[inline]
                fn from_f64(value: f64) -> Self {
                    value as $t
                }
            }
        )*
    };
}

impl_voxel!(
    u8 => "uint8",
    u16 => "uint16",
    i16 => "int16",
    i32 => "int32",
    u32 => "uint32",
    f32 => "float32",
    f64 => "float64",
);
