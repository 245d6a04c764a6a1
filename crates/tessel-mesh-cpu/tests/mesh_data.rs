use tessel_blocks::MaterialId;
use tessel_geom::{Vec2, Vec3};
use tessel_mesh_cpu::{MeshData, face_corners};

const UVS: [Vec2; 4] = [
    Vec2::new(0.0, 0.0),
    Vec2::new(0.0, 1.0),
    Vec2::new(1.0, 1.0),
    Vec2::new(1.0, 0.0),
];

fn quad_at(p: Vec3) -> [Vec3; 4] {
    let mut q = *face_corners(tessel_blocks::Face::Up);
    for c in &mut q {
        *c += p;
    }
    q
}

#[test]
fn submesh_order_is_first_use_order() {
    let mut m = MeshData::new();
    m.push_quad(MaterialId(7), quad_at(Vec3::ZERO), &UVS);
    m.push_quad(MaterialId(2), quad_at(Vec3::ZERO), &UVS);
    m.push_quad(MaterialId(7), quad_at(Vec3::ZERO), &UVS);
    assert_eq!(m.materials(), &[MaterialId(7), MaterialId(2)]);
    assert_eq!(m.submesh_index(MaterialId(2)), Some(1));
    assert_eq!(m.triangles(0), &[0, 1, 2, 0, 2, 3, 8, 9, 10, 8, 10, 11]);
    assert_eq!(m.triangles(1), &[4, 5, 6, 4, 6, 7]);
}

#[test]
fn append_mesh_offsets_and_remaps() {
    let mut a = MeshData::new();
    a.push_quad(MaterialId(1), quad_at(Vec3::ZERO), &UVS);

    let mut b = MeshData::new();
    b.push_quad(MaterialId(3), quad_at(Vec3::ZERO), &UVS);
    b.push_quad(MaterialId(1), quad_at(Vec3::new(1.0, 0.0, 0.0)), &UVS);

    a.append_mesh(&b, Vec3::new(16.0, 0.0, 0.0));
    assert_eq!(a.vertex_count(), 12);
    // UVs appended exactly once per vertex, no per-material duplication
    assert_eq!(a.uvs().len(), 12);
    assert_eq!(a.materials(), &[MaterialId(1), MaterialId(3)]);
    assert_eq!(a.triangles(0), &[0, 1, 2, 0, 2, 3, 8, 9, 10, 8, 10, 11]);
    assert_eq!(a.triangles(1), &[4, 5, 6, 4, 6, 7]);
    assert_eq!(a.vertices()[4], b.vertices()[0] + Vec3::new(16.0, 0.0, 0.0));
    assert_eq!(a.vertices()[8].x, 17.0);
}

#[test]
fn clear_keeps_capacity_and_resets_submeshes() {
    let mut m = MeshData::with_capacity(4);
    for i in 0..64 {
        m.push_quad(MaterialId(i % 3), quad_at(Vec3::ZERO), &UVS);
    }
    let cap = m.vertices().as_ptr();
    m.clear();
    assert!(m.is_empty());
    assert_eq!(m.submesh_count(), 0);
    assert_eq!(m.index_count(), 0);
    assert!(m.bounds().is_none());

    // The first material after a clear becomes submesh 0 again
    m.push_quad(MaterialId(2), quad_at(Vec3::ZERO), &UVS);
    assert_eq!(m.materials(), &[MaterialId(2)]);
    assert_eq!(m.triangles(0), &[0, 1, 2, 0, 2, 3]);
    assert_eq!(m.vertices().as_ptr(), cap, "vertex storage is reused");
}

#[test]
fn bounds_cover_all_vertices() {
    let mut m = MeshData::new();
    m.push_quad(MaterialId(0), quad_at(Vec3::new(-2.0, 0.0, 3.0)), &UVS);
    m.push_quad(MaterialId(0), quad_at(Vec3::new(4.0, -1.0, 0.0)), &UVS);
    let bb = m.bounds().unwrap();
    assert_eq!(bb.min, Vec3::new(-2.0, 0.0, 0.0));
    assert_eq!(bb.max, Vec3::new(5.0, 1.0, 4.0));
}
