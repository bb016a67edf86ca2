pub mod camera;
pub mod entity;
pub mod glyph;
pub mod light;
pub mod loader;
pub mod material;
pub mod mesh;
pub mod registry;
