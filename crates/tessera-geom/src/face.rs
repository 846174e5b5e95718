use crate::Vec3;

/// Six axis-aligned voxel faces. `North` is -Z, `South` is +Z, `East` is +X, `West` is -X.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Face {
    Up = 0,
    Down = 1,
    East = 2,
    West = 3,
    South = 4,
    North = 5,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::Up,
        Face::Down,
        Face::East,
        Face::West,
        Face::South,
        Face::North,
    ];

    /// Returns the `[0..6)` index of this face.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Converts a face index back into a `Face`. Out-of-range indices map to `Up`.
    #[inline]
    pub fn from_index(i: usize) -> Face {
        Face::ALL.get(i).copied().unwrap_or(Face::Up)
    }

    /// Integer grid step `(dx, dy, dz)` when leaving a voxel through this face.
    #[inline]
    pub fn delta(self) -> (i32, i32, i32) {
        match self {
            Face::Up => (0, 1, 0),
            Face::Down => (0, -1, 0),
            Face::East => (1, 0, 0),
            Face::West => (-1, 0, 0),
            Face::South => (0, 0, 1),
            Face::North => (0, 0, -1),
        }
    }

    #[inline]
    pub fn normal(self) -> Vec3 {
        let (x, y, z) = self.delta();
        Vec3::new(x as f32, y as f32, z as f32)
    }

    #[inline]
    pub fn opposite(self) -> Face {
        match self {
            Face::Up => Face::Down,
            Face::Down => Face::Up,
            Face::East => Face::West,
            Face::West => Face::East,
            Face::South => Face::North,
            Face::North => Face::South,
        }
    }

    /// Face whose outward normal is `(dx, dy, dz)`, for unit axis steps.
    pub fn from_delta(dx: i32, dy: i32, dz: i32) -> Option<Face> {
        Face::ALL.into_iter().find(|f| f.delta() == (dx, dy, dz))
    }
}
