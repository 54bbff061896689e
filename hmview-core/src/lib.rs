/// HMView Core Library - heightmap terrain geometry and camera transforms
///
/// This library provides the stateless core of the heightmap viewer: decoding
/// images into height fields, turning height fields into flat vertex buffers,
/// and building the model-view and projection matrices for each frame.

pub mod controls;
pub mod error;
pub mod geometry;
pub mod heightfield;
pub mod projection;
pub mod terrain;
pub mod transform;

// Re-export commonly used types
pub use error::DecodeError;
pub use geometry::{Mesh, Primitive};
pub use heightfield::HeightField;
pub use projection::{compute_frame, Camera, Frame, ProjectionMode};
pub use terrain::generate;
pub use transform::{CameraParams, Transform};
