//! The planet renderer core: camera control, ray generation and shading.

pub mod arcball;
pub mod frame;
pub mod intersect;
pub mod projection;
pub mod shading;

pub use arcball::{ArcballController, CameraState, MAX_RADIUS, MIN_RADIUS};
pub use frame::{render, CameraTransform};
pub use shading::SceneUniforms;
