use std::collections::HashMap;

use serde::Deserialize;
use tessel_geom::Vec2;

use super::types::MaterialId;

/// Pixel rectangle of a texture inside one atlas page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct TextureRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
    /// Index into the atlas page list.
    #[serde(default)]
    pub page: u16,
}

impl TextureRect {
    pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h, page: 0 }
    }

    pub const fn on_page(mut self, page: u16) -> Self {
        self.page = page;
        self
    }

    /// True when the rect lies inside a `width` x `height` page. Overflowing
    /// extents never fit.
    pub fn fits(&self, width: u32, height: u32) -> bool {
        let right = self.x.checked_add(self.w);
        let bottom = self.y.checked_add(self.h);
        matches!((right, bottom), (Some(r), Some(b)) if r <= width && b <= height)
    }

    /// Normalized UV corners in quad winding order:
    /// bottom-left, top-left, top-right, bottom-right.
    pub fn uv_corners(&self, atlas_w: u32, atlas_h: u32) -> [Vec2; 4] {
        let aw = atlas_w.max(1) as f32;
        let ah = atlas_h.max(1) as f32;
        let x_min = self.x as f32 / aw;
        let x_max = (self.x as f32 + self.w as f32) / aw;
        let y_min = self.y as f32 / ah;
        let y_max = (self.y as f32 + self.h as f32) / ah;
        [
            Vec2::new(x_min, y_min),
            Vec2::new(x_min, y_max),
            Vec2::new(x_max, y_max),
            Vec2::new(x_max, y_min),
        ]
    }
}

pub const DEFAULT_PAGE: &str = "atlas";

/// Named texture rectangles packed into one or more same-sized atlas pages.
/// Each page is a separate backing image.
#[derive(Clone, Debug, Default)]
pub struct TextureAtlas {
    pub width: u32,
    pub height: u32,
    pages: Vec<String>,
    rects: HashMap<String, TextureRect>,
}

impl TextureAtlas {
    /// Single-page atlas.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_pages(width, height, [DEFAULT_PAGE])
    }

    pub fn with_pages<I, S>(width: u32, height: u32, pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut pages: Vec<String> = pages.into_iter().map(Into::into).collect();
        if pages.is_empty() {
            pages.push(DEFAULT_PAGE.to_string());
        }
        Self {
            width,
            height,
            pages,
            rects: HashMap::new(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, rect: TextureRect) {
        self.rects.insert(name.into(), rect);
    }

    pub fn rect(&self, name: &str) -> Option<TextureRect> {
        self.rects.get(name).copied()
    }

    pub fn uv_corners(&self, name: &str) -> Option<[Vec2; 4]> {
        self.rect(name)
            .map(|r| r.uv_corners(self.width, self.height))
    }

    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    pub fn page_name(&self, page: u16) -> Option<&str> {
        self.pages.get(page as usize).map(String::as_str)
    }

    /// Backing image of a named texture.
    pub fn page_of(&self, name: &str) -> Option<&str> {
        self.rect(name).and_then(|r| self.page_name(r.page))
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}

#[derive(Clone, Debug)]
pub struct Material {
    pub id: MaterialId,
    /// Atlas page (backing image) the material samples.
    pub image: String,
}

/// Materials keyed by their backing image: every face whose texture lives on
/// the same atlas page resolves to the same `MaterialId` and so lands in the
/// same submesh. The texture rect only drives UVs.
#[derive(Default, Clone, Debug)]
pub struct MaterialCatalog {
    pub materials: Vec<Material>,
    pub by_image: HashMap<String, MaterialId>,
}

impl MaterialCatalog {
    pub fn new() -> Self {
        Self {
            materials: Vec::new(),
            by_image: HashMap::new(),
        }
    }

    pub fn get_id(&self, image: &str) -> Option<MaterialId> {
        self.by_image.get(image).copied()
    }

    pub fn get(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0 as usize)
    }

    /// Returns the material for `image`, creating it on first use.
    /// The flag is `true` when the material was created by this call.
    pub fn intern(&mut self, image: &str) -> (MaterialId, bool) {
        if let Some(id) = self.get_id(image) {
            return (id, false);
        }
        let id = MaterialId(self.materials.len() as u16);
        self.by_image.insert(image.to_string(), id);
        self.materials.push(Material {
            id,
            image: image.to_string(),
        });
        (id, true)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}
