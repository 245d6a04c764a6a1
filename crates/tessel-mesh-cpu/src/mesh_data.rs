use hashbrown::HashMap;
use tessel_blocks::MaterialId;
use tessel_geom::{Aabb, Vec2, Vec3};

use crate::face::QUAD_INDICES;
use crate::upload::MeshUpload;

/// Growable multi-material mesh: positions, parallel UVs, and one triangle
/// list per material. Submesh order is the order materials were first used.
#[derive(Default, Clone, Debug)]
pub struct MeshData {
    vertices: Vec<Vec3>,
    uvs: Vec<Vec2>,
    materials: Vec<MaterialId>,
    // May hold more lists than `materials`; the spares are kept for reuse after clear
    triangles: Vec<Vec<u32>>,
    submesh_of: HashMap<MaterialId, usize>,
}

impl MeshData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(quads: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(quads * 4),
            uvs: Vec::with_capacity(quads * 4),
            ..Self::default()
        }
    }

    #[inline]
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    #[inline]
    pub fn uvs(&self) -> &[Vec2] {
        &self.uvs
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Materials in submesh order.
    #[inline]
    pub fn materials(&self) -> &[MaterialId] {
        &self.materials
    }

    #[inline]
    pub fn submesh_count(&self) -> usize {
        self.materials.len()
    }

    pub fn submesh_index(&self, material: MaterialId) -> Option<usize> {
        self.submesh_of.get(&material).copied()
    }

    /// Triangle list of a submesh.
    #[inline]
    pub fn triangles(&self, submesh: usize) -> &[u32] {
        &self.triangles[submesh][..]
    }

    pub fn index_count(&self) -> usize {
        self.triangles[..self.materials.len()]
            .iter()
            .map(Vec::len)
            .sum()
    }

    /// Triangle list for `material`, creating the submesh on first use.
    pub fn triangles_mut(&mut self, material: MaterialId) -> &mut Vec<u32> {
        let next = self.materials.len();
        let ix = *self.submesh_of.entry(material).or_insert(next);
        if ix == next {
            self.materials.push(material);
            if self.triangles.len() == next {
                self.triangles.push(Vec::new());
            }
        }
        &mut self.triangles[ix]
    }

    /// Appends one quad: four corners, their UVs and two triangles.
    pub fn push_quad(&mut self, material: MaterialId, corners: [Vec3; 4], uvs: &[Vec2; 4]) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&corners);
        self.uvs.extend_from_slice(uvs);
        self.triangles_mut(material)
            .extend(QUAD_INDICES.iter().map(|i| base + i));
    }

    /// Appends `other` translated by `offset`. Its indices are shifted by this
    /// buffer's vertex count before the append.
    pub fn append_mesh(&mut self, other: &MeshData, offset: Vec3) {
        let base = self.vertices.len() as u32;
        self.vertices
            .extend(other.vertices.iter().map(|v| *v + offset));
        self.uvs.extend_from_slice(&other.uvs);
        for (submesh, material) in other.materials.iter().enumerate() {
            let src = other.triangles(submesh);
            self.triangles_mut(*material)
                .extend(src.iter().map(|i| base + i));
        }
    }

    /// Empties the buffer but keeps every allocation.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.uvs.clear();
        self.materials.clear();
        self.submesh_of.clear();
        for list in &mut self.triangles {
            list.clear();
        }
    }

    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(&self.vertices)
    }

    /// Pushes the whole buffer to a render-side mesh resource.
    pub fn upload_to(&self, target: &mut impl MeshUpload) {
        target.clear();
        target.set_materials(&self.materials);
        target.set_vertices(&self.vertices);
        target.set_uvs(&self.uvs);
        for submesh in 0..self.submesh_count() {
            target.set_triangles(submesh, self.triangles(submesh));
        }
        target.recalculate_derived();
    }
}
