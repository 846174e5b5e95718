//! CPU meshing: face-culled chunk geometry bucketed by texture.
#![forbid(unsafe_code)]

use std::collections::HashMap;

use tessera_blocks::{BlockRegistry, TextureId};
use tessera_chunk::{ChunkCoord, LightRgb, MAX_LIGHT, SIZE_X, SIZE_Y, SIZE_Z, VoxelGrid, resolve_local};
use tessera_geom::{Aabb, Face, Vec3};
use tessera_world::World;

mod mesh_build;

pub use mesh_build::MeshBuild;

// Visual-only lighting floor to avoid pitch-black faces in darkness.
// Does not affect logical light propagation.
pub const VISUAL_LIGHT_MIN: u8 = 18; // ~7% brightness floor

pub struct ChunkMesh {
    pub coord: ChunkCoord,
    pub bbox: Aabb,
    pub parts: HashMap<TextureId, MeshBuild>,
}

impl ChunkMesh {
    pub fn vertex_count(&self) -> usize {
        self.parts.values().map(MeshBuild::vertex_count).sum()
    }

    pub fn face_count(&self) -> usize {
        self.parts.values().map(MeshBuild::face_count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

/// Fixed ambient shade per face direction.
#[inline]
pub fn face_shade(face: Face) -> f32 {
    match face {
        Face::Up => 1.0,
        Face::North | Face::South => 0.8,
        Face::East | Face::West => 0.6,
        Face::Down => 0.5,
    }
}

/// Solidity of a voxel addressed relative to `coord`; local coordinates may
/// step outside the chunk. Unloaded chunks and anything above or below the
/// world read as air, so no wall is drawn against the render boundary.
pub fn is_solid(world: &World, reg: &BlockRegistry, coord: ChunkCoord, lx: i32, ly: i32, lz: i32) -> bool {
    let Some((c, x, y, z)) = resolve_local(coord, lx, ly, lz) else {
        return false;
    };
    world
        .chunk(c)
        .is_some_and(|g| reg.is_solid(g.block(x, y, z)))
}

/// Light used to shade a face, sampled from the voxel in front of it.
/// Above the world and in unloaded chunks this is open sky.
pub fn sample_light(world: &World, coord: ChunkCoord, lx: i32, ly: i32, lz: i32) -> LightRgb {
    if ly >= SIZE_Y as i32 {
        return LightRgb::splat(MAX_LIGHT);
    }
    let Some((c, x, y, z)) = resolve_local(coord, lx, ly, lz) else {
        return LightRgb::ZERO;
    };
    match world.chunk(c) {
        Some(g) => g.combined_light(x, y, z),
        None => LightRgb::splat(MAX_LIGHT),
    }
}

/// Vertex color for a face lit by `light`.
#[inline]
pub fn shade_color(light: LightRgb, face: Face) -> [u8; 4] {
    let shade = face_shade(face);
    let ch = |level: u8| -> u8 {
        let v = (u32::from(level.min(MAX_LIGHT)) * 255 / u32::from(MAX_LIGHT)) as u8;
        (f32::from(v.max(VISUAL_LIGHT_MIN)) * shade).round() as u8
    };
    [ch(light.r), ch(light.g), ch(light.b), 255]
}

#[inline]
fn in_chunk(x: i32, y: i32, z: i32) -> bool {
    (0..SIZE_X as i32).contains(&x) && (0..SIZE_Y as i32).contains(&y) && (0..SIZE_Z as i32).contains(&z)
}

fn neighbor_solid(world: &World, reg: &BlockRegistry, grid: &VoxelGrid, x: i32, y: i32, z: i32) -> bool {
    if in_chunk(x, y, z) {
        reg.is_solid(grid.block(x as usize, y as usize, z as usize))
    } else {
        is_solid(world, reg, grid.coord, x, y, z)
    }
}

fn neighbor_light(world: &World, grid: &VoxelGrid, x: i32, y: i32, z: i32) -> LightRgb {
    if in_chunk(x, y, z) {
        grid.combined_light(x as usize, y as usize, z as usize)
    } else {
        sample_light(world, grid.coord, x, y, z)
    }
}

/// Builds the mesh for one loaded chunk. Every solid voxel contributes each face
/// whose neighbor is not solid. Returns `None` if the chunk is not loaded.
pub fn build_chunk_mesh(world: &World, reg: &BlockRegistry, coord: ChunkCoord) -> Option<ChunkMesh> {
    let grid = world.chunk(coord)?;
    let (ox, oy, oz) = coord.origin();
    let mut parts: HashMap<TextureId, MeshBuild> = HashMap::new();
    let mut top: Option<usize> = None;

    for y in 0..SIZE_Y {
        for z in 0..SIZE_Z {
            for x in 0..SIZE_X {
                let id = grid.block(x, y, z);
                let Some(ty) = reg.get(id).filter(|ty| ty.solid) else {
                    continue;
                };
                for face in Face::ALL {
                    let (dx, dy, dz) = face.delta();
                    let (nx, ny, nz) = (x as i32 + dx, y as i32 + dy, z as i32 + dz);
                    if neighbor_solid(world, reg, grid, nx, ny, nz) {
                        continue;
                    }
                    let light = neighbor_light(world, grid, nx, ny, nz);
                    parts.entry(ty.texture(face)).or_default().add_face(
                        (ox + x as i32) as f32,
                        (oy + y as i32) as f32,
                        (oz + z as i32) as f32,
                        face,
                        shade_color(light, face),
                    );
                    top = Some(y);
                }
            }
        }
    }

    let height = top.map_or(0, |y| y + 1) as f32;
    let min = Vec3::new(ox as f32, oy as f32, oz as f32);
    let bbox = Aabb::new(min, min + Vec3::new(SIZE_X as f32, height, SIZE_Z as f32));
    log::trace!(
        target: "mesh",
        "meshed {:?}: {} buckets, {} faces",
        coord,
        parts.len(),
        parts.values().map(MeshBuild::face_count).sum::<usize>()
    );
    Some(ChunkMesh { coord, bbox, parts })
}
