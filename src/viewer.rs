use tessera_chunk::locate;
use tessera_geom::{Aabb, Vec3};
use tessera_world::World;

/// A scripted walker that follows the terrain surface along a slow curve.
pub struct Viewer {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    speed: f32,
}

impl Viewer {
    pub const EYE_HEIGHT: f32 = 1.62;
    pub const HALF_EXTENTS: Vec3 = Vec3::new(0.3, 0.9, 0.3);
    const TURN_RATE: f32 = 0.08;

    pub fn new(position: Vec3, speed: f32) -> Self {
        Self {
            position,
            yaw: 0.0,
            pitch: -0.6,
            speed,
        }
    }

    pub fn eye(&self) -> Vec3 {
        self.position + Vec3::new(0.0, Self::EYE_HEIGHT - Self::HALF_EXTENTS.y, 0.0)
    }

    pub fn forward(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        Vec3::new(cy * cp, sp, sy * cp)
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.position, Self::HALF_EXTENTS)
    }

    /// Advances along the walking curve. Holds still while the ground ahead
    /// is not loaded yet. Returns whether the viewer moved.
    pub fn step(&mut self, dt: f32, world: &World) -> bool {
        self.yaw += Self::TURN_RATE * dt;
        let (sy, cy) = self.yaw.sin_cos();
        let next = self.position + Vec3::new(cy, 0.0, sy) * (self.speed * dt);
        match ground_height(world, next) {
            Some(top) => {
                self.position = Vec3::new(next.x, top as f32 + 1.0 + Self::HALF_EXTENTS.y, next.z);
                true
            }
            None => false,
        }
    }

    /// Drops the viewer onto the ground under it once that column is loaded.
    pub fn settle(&mut self, world: &World) -> bool {
        match ground_height(world, self.position) {
            Some(top) => {
                self.position.y = top as f32 + 1.0 + Self::HALF_EXTENTS.y;
                true
            }
            None => false,
        }
    }
}

fn ground_height(world: &World, at: Vec3) -> Option<usize> {
    let (wx, _, wz) = at.voxel();
    let (coord, lx, _, lz) = locate(wx, 0, wz)?;
    world.chunk(coord)?.column_top(lx, lz)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tessera_blocks::config::{BlockDef, BlocksConfig};
    use tessera_blocks::{BlockRegistry, TextureCatalog};
    use tessera_chunk::{ChunkCoord, VoxelGrid};

    fn flat_world(height: usize) -> World {
        let blocks = vec![BlockDef::named("air"), BlockDef::named("stone")];
        let reg = Arc::new(BlockRegistry::from_configs(TextureCatalog::new(), BlocksConfig { blocks }).unwrap());
        let mut world = World::new(reg);
        let mut g = VoxelGrid::new(ChunkCoord::column(0, 0));
        for z in 0..16 {
            for x in 0..16 {
                for y in 0..=height {
                    g.set_block(x, y, z, 1);
                }
            }
        }
        world.insert_chunk(g);
        world
    }

    #[test]
    fn waits_for_unloaded_ground() {
        let world = flat_world(10);
        let mut v = Viewer::new(Vec3::new(40.0, 100.0, 40.0), 4.0);
        assert!(!v.settle(&world));
        assert!(!v.step(0.05, &world));
        assert_eq!(v.position, Vec3::new(40.0, 100.0, 40.0));
    }

    #[test]
    fn walks_on_the_surface() {
        let world = flat_world(10);
        let mut v = Viewer::new(Vec3::new(2.0, 100.0, 8.0), 4.0);
        assert!(v.settle(&world));
        assert!((v.position.y - 11.9).abs() < 1e-4);
        assert!(v.step(0.5, &world));
        assert!(v.position.x > 2.0);
        assert!(!world.intersects_block(&v.aabb()));
    }

    #[test]
    fn looks_down_and_ahead() {
        let v = Viewer::new(Vec3::ZERO, 1.0);
        let f = v.forward();
        assert!(f.x > 0.0 && f.y < 0.0);
        assert!((f.length() - 1.0).abs() < 1e-5);
    }
}
