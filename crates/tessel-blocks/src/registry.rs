use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use tessel_geom::Vec2;

use super::config::{BlocksConfig, FaceTexturesDef};
use super::material::{MaterialCatalog, TextureAtlas};
use super::types::{BlockId, Face, MaterialId};

/// Texture name for each face, indexed by [`Face::index`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FaceTextures {
    pub faces: [String; 6],
}

impl FaceTextures {
    pub fn all(texture: &str) -> Self {
        Self {
            faces: std::array::from_fn(|_| texture.to_string()),
        }
    }

    pub fn top_bottom_side(top: &str, bottom: &str, side: &str) -> Self {
        Self {
            faces: Face::ALL.map(|f| match f {
                Face::Up => top.to_string(),
                Face::Down => bottom.to_string(),
                _ => side.to_string(),
            }),
        }
    }

    #[inline]
    pub fn texture(&self, face: Face) -> &str {
        &self.faces[face.index()]
    }

    /// Resolves a config entry: explicit face > top/bottom/side > all.
    pub fn from_def(block: &str, def: &FaceTexturesDef) -> Result<Self, Box<dyn Error>> {
        let mut faces: [String; 6] = Default::default();
        for face in Face::ALL {
            let (specific, role) = match face {
                Face::Up => (&def.up, &def.top),
                Face::Down => (&def.down, &def.bottom),
                Face::North => (&def.north, &def.side),
                Face::East => (&def.east, &def.side),
                Face::South => (&def.south, &def.side),
                Face::West => (&def.west, &def.side),
            };
            let pick = specific.as_ref().or(role.as_ref()).or(def.all.as_ref());
            match pick {
                Some(t) => faces[face.index()] = t.clone(),
                None => {
                    return Err(
                        format!("block '{}' has no texture for face {}", block, face.name())
                            .into(),
                    );
                }
            }
        }
        Ok(Self { faces })
    }
}

#[derive(Clone, Debug)]
pub struct BlockType {
    pub id: BlockId,
    pub name: String,
    // Per-face material and UV corners, precomputed once at registration
    pub face_materials: [MaterialId; 6],
    pub face_uvs: [[Vec2; 4]; 6],
}

impl BlockType {
    #[inline]
    pub fn material(&self, face: Face) -> MaterialId {
        self.face_materials[face.index()]
    }

    #[inline]
    pub fn uvs(&self, face: Face) -> &[Vec2; 4] {
        &self.face_uvs[face.index()]
    }
}

/// Block-type directory queried by the mesher once per visible face.
#[derive(Default, Clone, Debug)]
pub struct BlockRegistry {
    pub materials: MaterialCatalog,
    pub atlas: TextureAtlas,
    pub blocks: Vec<Option<BlockType>>,
    pub by_name: HashMap<String, BlockId>,
}

impl BlockRegistry {
    pub fn new(atlas: TextureAtlas) -> Self {
        Self {
            materials: MaterialCatalog::new(),
            atlas,
            blocks: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    #[inline]
    pub fn get(&self, id: BlockId) -> Option<&BlockType> {
        self.blocks.get(id as usize).and_then(Option::as_ref)
    }

    /// Looks up a registered block type. An unregistered id is a configuration
    /// error and aborts.
    #[inline]
    pub fn block(&self, id: BlockId) -> &BlockType {
        match self.get(id) {
            Some(ty) => ty,
            None => panic!("block id {id} is not registered in the block directory"),
        }
    }

    pub fn id_by_name(&self, name: &str) -> Option<BlockId> {
        self.by_name.get(name).copied()
    }

    /// Number of registered block types (air excluded).
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Registers a block type, interning one material per atlas page it samples.
    pub fn register(
        &mut self,
        id: BlockId,
        name: &str,
        textures: &FaceTextures,
    ) -> Result<BlockId, Box<dyn Error>> {
        if id == 0 {
            return Err(format!("block '{name}': id 0 is reserved for air").into());
        }
        if let Some(existing) = self.get(id) {
            return Err(format!(
                "block '{}' reuses id {} already taken by '{}'",
                name, id, existing.name
            )
            .into());
        }
        if self.by_name.contains_key(name) {
            return Err(format!("duplicate block name '{name}'").into());
        }

        let mut face_uvs = [[Vec2::ZERO; 4]; 6];
        for face in Face::ALL {
            let tex = textures.texture(face);
            let rect = self.atlas.rect(tex).ok_or_else(|| {
                format!(
                    "block '{}' face {} references unknown texture '{}'",
                    name,
                    face.name(),
                    tex
                )
            })?;
            if self.atlas.page_name(rect.page).is_none() {
                return Err(format!(
                    "texture '{}' is on page {} but the atlas has {} page(s)",
                    tex,
                    rect.page,
                    self.atlas.pages().len()
                )
                .into());
            }
            face_uvs[face.index()] = rect.uv_corners(self.atlas.width, self.atlas.height);
        }
        // Intern only once every face resolved, so a rejected block leaves no materials
        let mut face_materials = [MaterialId(0); 6];
        for face in Face::ALL {
            let tex = textures.texture(face);
            let Some(image) = self.atlas.page_of(tex) else {
                continue;
            };
            let (mid, created) = self.materials.intern(image);
            if created {
                log::debug!("material {:?} created for atlas page '{}'", mid, image);
            }
            face_materials[face.index()] = mid;
        }

        if self.blocks.len() <= id as usize {
            self.blocks.resize(id as usize + 1, None);
        }
        self.blocks[id as usize] = Some(BlockType {
            id,
            name: name.to_string(),
            face_materials,
            face_uvs,
        });
        self.by_name.insert(name.to_string(), id);
        Ok(id)
    }

    pub fn from_config(cfg: BlocksConfig) -> Result<Self, Box<dyn Error>> {
        let mut atlas =
            TextureAtlas::with_pages(cfg.atlas.width, cfg.atlas.height, cfg.atlas.pages);
        for (name, rect) in cfg.textures {
            if !rect.fits(atlas.width, atlas.height) {
                return Err(format!(
                    "texture '{}' ({}x{} at {},{}) lies outside the {}x{} atlas",
                    name, rect.w, rect.h, rect.x, rect.y, atlas.width, atlas.height
                )
                .into());
            }
            if atlas.page_name(rect.page).is_none() {
                return Err(format!(
                    "texture '{}' names page {} but the atlas lists {} page(s)",
                    name,
                    rect.page,
                    atlas.pages().len()
                )
                .into());
            }
            atlas.insert(name, rect);
        }
        let mut reg = BlockRegistry::new(atlas);
        // Config order drives MaterialId assignment, keeping ids stable across runs.
        for def in &cfg.blocks {
            let textures = FaceTextures::from_def(&def.name, &def.textures)?;
            reg.register(def.id, &def.name, &textures)?;
        }
        Ok(reg)
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: BlocksConfig = toml::from_str(toml_str)?;
        Self::from_config(cfg)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let path = path.as_ref();
        let s = fs::read_to_string(path)
            .map_err(|e| format!("reading block directory {}: {}", path.display(), e))?;
        let reg = Self::from_toml_str(&s)?;
        log::info!(
            "loaded {} block type(s), {} material(s) from {}",
            reg.len(),
            reg.materials.len(),
            path.display()
        );
        Ok(reg)
    }
}
