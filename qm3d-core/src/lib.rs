/// QM3D Core Library - Vectors, matrices, quaternions and meshes
///
/// This library provides the numeric primitives for 3D work: variable-length
/// vectors, dense matrices with LU solving, quaternion rotations, nested
/// coordinate frames, and indexed triangle meshes with STL input and output.

pub mod coordinate_sys;
pub mod error;
pub mod math_util;
pub mod matrix;
pub mod quaternion;
pub mod stl;
pub mod triangle_group;
pub mod vector;

// Re-export commonly used types
pub use coordinate_sys::CoordinateSys;
pub use error::{MathError, Result};
pub use matrix::{LuPivots, Matrix, MatrixOptions};
pub use quaternion::Quaternion;
pub use triangle_group::TriangleGroup;
pub use vector::{NumericSequence, Vector, VectorOptions};
