//! Block, face, material, and block-type directory crate.
#![forbid(unsafe_code)]

pub mod config;
pub mod material;
pub mod registry;
pub mod types;

pub use material::{MaterialCatalog, TextureAtlas, TextureRect};
pub use registry::{BlockRegistry, BlockType, FaceTextures};
pub use types::{Block, BlockId, Face, FaceMask, MaterialId};
