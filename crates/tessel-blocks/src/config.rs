use serde::Deserialize;
use std::collections::HashMap;

use crate::material::TextureRect;

// Top-level blocks config file
#[derive(Deserialize, Debug)]
pub struct BlocksConfig {
    pub atlas: AtlasConfig,
    #[serde(default)]
    pub textures: HashMap<String, TextureRect>,
    #[serde(default)]
    pub blocks: Vec<BlockDef>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AtlasConfig {
    pub width: u32,
    pub height: u32,
    /// Backing images, all `width` x `height`; textures pick one by index.
    #[serde(default)]
    pub pages: Vec<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct BlockDef {
    pub name: String,
    pub id: u16,
    pub textures: FaceTexturesDef,
}

// Texture per face: explicit face keys win over top/bottom/side, which win over all
#[derive(Deserialize, Debug, Clone, Default)]
pub struct FaceTexturesDef {
    #[serde(default)]
    pub all: Option<String>,
    #[serde(default)]
    pub top: Option<String>,
    #[serde(default)]
    pub bottom: Option<String>,
    #[serde(default)]
    pub side: Option<String>,
    #[serde(default)]
    pub up: Option<String>,
    #[serde(default)]
    pub north: Option<String>,
    #[serde(default)]
    pub east: Option<String>,
    #[serde(default)]
    pub south: Option<String>,
    #[serde(default)]
    pub west: Option<String>,
    #[serde(default)]
    pub down: Option<String>,
}
