use tessera_geom::{Aabb, Vec3};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

/// A box-shaped occupant of the world. Movement and collision response live
/// outside this crate; the world only stores and hands out entities.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    pub position: Vec3,
    pub half_extents: Vec3,
}

impl Entity {
    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.position, self.half_extents)
    }
}
