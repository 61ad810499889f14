//! Mathematical primitives for brainweb phantom synthesis.

pub mod axes;
pub mod gaussian;
pub mod pad;
pub mod resize;
