use tessera_blocks::BlockId;
use tessera_geom::{Face, Vec3};

/// March step for [`crate::World::clip`], in voxels.
pub const CLIP_STEP: f32 = 0.05;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// The solid voxel that was hit.
    pub voxel: (i32, i32, i32),
    /// Face of `voxel` the ray entered through.
    pub face: Face,
    pub block: BlockId,
    pub distance: f32,
}

impl RayHit {
    /// The empty voxel in front of the hit face, where a new block would go.
    #[inline]
    pub fn adjacent(&self) -> (i32, i32, i32) {
        let (dx, dy, dz) = self.face.delta();
        (self.voxel.0 + dx, self.voxel.1 + dy, self.voxel.2 + dz)
    }
}

/// Fixed-step ray march. `hit` returns the block id for solid voxels and `None`
/// for anything the ray passes through.
pub(crate) fn march<F>(origin: Vec3, direction: Vec3, max_distance: f32, mut hit: F) -> Option<RayHit>
where
    F: FnMut(i32, i32, i32) -> Option<BlockId>,
{
    let len = direction.length();
    if len < 1e-6 || max_distance <= 0.0 {
        return None;
    }
    let dir = direction / len;
    let mut prev = origin.voxel();
    let mut t = 0.0f32;
    while t < max_distance {
        t = (t + CLIP_STEP).min(max_distance);
        let v = (origin + dir * t).voxel();
        if v == prev {
            continue;
        }
        if let Some(block) = hit(v.0, v.1, v.2) {
            let face = entry_face(origin, dir, prev, v);
            return Some(RayHit {
                voxel: v,
                face,
                block,
                distance: t,
            });
        }
        prev = v;
    }
    None
}

/// When a step crosses several voxel boundaries at once, the entry face is the
/// boundary crossed last along the ray.
fn entry_face(origin: Vec3, dir: Vec3, prev: (i32, i32, i32), v: (i32, i32, i32)) -> Face {
    let axes = [
        (v.0 - prev.0, origin.x, dir.x, v.0),
        (v.1 - prev.1, origin.y, dir.y, v.1),
        (v.2 - prev.2, origin.z, dir.z, v.2),
    ];
    let mut best = (f32::NEG_INFINITY, 0usize, 0i32);
    for (axis, &(moved, o, d, cell)) in axes.iter().enumerate() {
        if moved == 0 || d.abs() < 1e-8 {
            continue;
        }
        let boundary = if moved > 0 { cell as f32 } else { (cell + 1) as f32 };
        let t = (boundary - o) / d;
        if t > best.0 {
            best = (t, axis, moved.signum());
        }
    }
    let (_, axis, sign) = best;
    let mut n = [0i32; 3];
    n[axis] = -sign;
    Face::from_delta(n[0], n[1], n[2]).unwrap_or(Face::Up)
}
