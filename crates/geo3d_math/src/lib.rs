//! 3D Mathematics Library
//!
//! Value types for 3D graphics transforms. Vectors are row vectors
//! (`v' = v * M`), all angles are radians, and all equality is tolerant
//! (see [`utils::float_cmp`]).
//!
//! ## Core Types
//!
//! - [`Matrix`] - 4x4 transform with projection, view and TRS constructors
//! - [`Vector`] - homogeneous (x, y, z, w) vector
//! - [`Quaternion`] - unit quaternion rotation
//! - [`Plane`] - plane equation used by reflection and shadow matrices
//! - [`MathError`] - the failures those operations can report

mod math_error;
pub mod matrix;
mod plane;
mod quaternion;
pub mod utils;
mod vector;

pub use math_error::{MathError, MathResult};
pub use matrix::Matrix;
pub use plane::Plane;
pub use quaternion::Quaternion;
pub use vector::Vector;
