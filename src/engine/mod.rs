// Engine module - procedural scene generators and the scene graph they feed
// Generators are pure: they return geometry and never touch the scene themselves

pub mod city;
pub mod components;
pub mod config;
pub mod error;
pub mod mesh;
pub mod primitives;
pub mod rig;
pub mod scene;
pub mod systems;
pub mod terrain;

// Re-export commonly used items
pub use components::*;
pub use error::Error;
