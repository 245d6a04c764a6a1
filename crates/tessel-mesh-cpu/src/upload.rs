use tessel_blocks::MaterialId;
use tessel_geom::{Aabb, Vec2, Vec3};

/// A render-side mesh resource that accepts a finished [`crate::MeshData`].
pub trait MeshUpload {
    fn clear(&mut self);
    fn set_materials(&mut self, materials: &[MaterialId]);
    fn set_vertices(&mut self, vertices: &[Vec3]);
    fn set_uvs(&mut self, uvs: &[Vec2]);
    fn set_triangles(&mut self, submesh: usize, indices: &[u32]);
    /// Normals, bounds and similar data derived from the uploaded arrays.
    fn recalculate_derived(&mut self);
}

/// Owned copy of an uploaded mesh, used by headless runs.
#[derive(Default, Clone, Debug)]
pub struct CpuMesh {
    pub materials: Vec<MaterialId>,
    pub vertices: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub submeshes: Vec<Vec<u32>>,
    pub bounds: Option<Aabb>,
}

impl CpuMesh {
    pub fn triangle_count(&self) -> usize {
        self.submeshes.iter().map(|s| s.len() / 3).sum()
    }
}

impl MeshUpload for CpuMesh {
    fn clear(&mut self) {
        self.materials.clear();
        self.vertices.clear();
        self.uvs.clear();
        self.submeshes.clear();
        self.bounds = None;
    }

    fn set_materials(&mut self, materials: &[MaterialId]) {
        self.materials.clear();
        self.materials.extend_from_slice(materials);
        self.submeshes.resize(materials.len(), Vec::new());
    }

    fn set_vertices(&mut self, vertices: &[Vec3]) {
        self.vertices.clear();
        self.vertices.extend_from_slice(vertices);
    }

    fn set_uvs(&mut self, uvs: &[Vec2]) {
        self.uvs.clear();
        self.uvs.extend_from_slice(uvs);
    }

    fn set_triangles(&mut self, submesh: usize, indices: &[u32]) {
        if self.submeshes.len() <= submesh {
            self.submeshes.resize(submesh + 1, Vec::new());
        }
        let dst = &mut self.submeshes[submesh];
        dst.clear();
        dst.extend_from_slice(indices);
    }

    fn recalculate_derived(&mut self) {
        self.bounds = Aabb::from_points(&self.vertices);
    }
}
