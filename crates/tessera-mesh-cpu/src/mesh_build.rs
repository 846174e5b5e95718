use tessera_geom::{Face, Vec3};

/// Flat vertex arrays for one texture bucket. Faces are two unindexed
/// triangles (6 vertices); `col` is RGBA per vertex.
#[derive(Default, Clone, Debug)]
pub struct MeshBuild {
    pub pos: Vec<f32>,
    pub norm: Vec<f32>,
    pub uv: Vec<f32>,
    pub col: Vec<u8>,
}

const QUAD_UV: [(f32, f32); 4] = [(0.0, 1.0), (1.0, 1.0), (1.0, 0.0), (0.0, 0.0)];

impl MeshBuild {
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.pos.len() / 3
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.vertex_count() / 6
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos.is_empty()
    }

    /// Appends the unit face of voxel `(x, y, z)` on side `face`, wound
    /// counter-clockwise when seen from outside.
    pub fn add_face(&mut self, x: f32, y: f32, z: f32, face: Face, rgba: [u8; 4]) {
        let corners = face_corners(face, Vec3::new(x, y, z));
        let n = face.normal();
        for i in [0usize, 1, 2, 0, 2, 3] {
            let p = corners[i];
            self.pos.extend_from_slice(&[p.x, p.y, p.z]);
            self.norm.extend_from_slice(&[n.x, n.y, n.z]);
            let (u, v) = QUAD_UV[i];
            self.uv.extend_from_slice(&[u, v]);
            self.col.extend_from_slice(&rgba);
        }
    }
}

fn face_corners(face: Face, o: Vec3) -> [Vec3; 4] {
    let v = |dx: f32, dy: f32, dz: f32| Vec3::new(o.x + dx, o.y + dy, o.z + dz);
    match face {
        Face::Up => [v(0.0, 1.0, 0.0), v(0.0, 1.0, 1.0), v(1.0, 1.0, 1.0), v(1.0, 1.0, 0.0)],
        Face::Down => [v(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0), v(1.0, 0.0, 1.0), v(0.0, 0.0, 1.0)],
        Face::East => [v(1.0, 0.0, 0.0), v(1.0, 1.0, 0.0), v(1.0, 1.0, 1.0), v(1.0, 0.0, 1.0)],
        Face::West => [v(0.0, 0.0, 0.0), v(0.0, 0.0, 1.0), v(0.0, 1.0, 1.0), v(0.0, 1.0, 0.0)],
        Face::South => [v(0.0, 0.0, 1.0), v(1.0, 0.0, 1.0), v(1.0, 1.0, 1.0), v(0.0, 1.0, 1.0)],
        Face::North => [v(0.0, 0.0, 0.0), v(0.0, 1.0, 0.0), v(1.0, 1.0, 0.0), v(1.0, 0.0, 0.0)],
    }
}
