use crate::{SIZE_X, SIZE_Y, SIZE_Z};

/// Chunk-grid position. Chunks span the full world height, so `cy` is `0` for
/// every loaded chunk; it is kept so coordinates stay three-dimensional.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cy: i32,
    pub cz: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cy: i32, cz: i32) -> Self {
        Self { cx, cy, cz }
    }

    /// The chunk column at `(cx, cz)`.
    #[inline]
    pub const fn column(cx: i32, cz: i32) -> Self {
        Self { cx, cy: 0, cz }
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            cx: self.cx + dx,
            cy: self.cy + dy,
            cz: self.cz + dz,
        }
    }

    /// Squared distance on the XZ plane, used for streaming radius and priority.
    #[inline]
    pub fn planar_distance_sq(self, other: ChunkCoord) -> i64 {
        let dx = i64::from(self.cx - other.cx);
        let dz = i64::from(self.cz - other.cz);
        dx * dx + dz * dz
    }

    /// World position of local voxel `(0, 0, 0)`.
    #[inline]
    pub fn origin(self) -> (i32, i32, i32) {
        (
            self.cx * SIZE_X as i32,
            self.cy * SIZE_Y as i32,
            self.cz * SIZE_Z as i32,
        )
    }

    /// The four chunks sharing a vertical face with this one.
    #[inline]
    pub fn horizontal_neighbors(self) -> [ChunkCoord; 4] {
        [
            self.offset(1, 0, 0),
            self.offset(-1, 0, 0),
            self.offset(0, 0, 1),
            self.offset(0, 0, -1),
        ]
    }
}

impl From<(i32, i32, i32)> for ChunkCoord {
    fn from(value: (i32, i32, i32)) -> Self {
        Self::new(value.0, value.1, value.2)
    }
}

impl From<ChunkCoord> for (i32, i32, i32) {
    fn from(value: ChunkCoord) -> Self {
        (value.cx, value.cy, value.cz)
    }
}

/// Chunk containing a world voxel. Uses floor division so negative coordinates
/// land in the chunk to their west/north.
#[inline]
pub fn chunk_of(wx: i32, wy: i32, wz: i32) -> ChunkCoord {
    ChunkCoord::new(
        wx.div_euclid(SIZE_X as i32),
        wy.div_euclid(SIZE_Y as i32),
        wz.div_euclid(SIZE_Z as i32),
    )
}

/// Splits a world voxel into its chunk and local coordinates.
/// Returns `None` when `wy` is outside the world's vertical range.
#[inline]
pub fn locate(wx: i32, wy: i32, wz: i32) -> Option<(ChunkCoord, usize, usize, usize)> {
    if wy < 0 || wy >= SIZE_Y as i32 {
        return None;
    }
    let coord = chunk_of(wx, wy, wz);
    Some((
        coord,
        wx.rem_euclid(SIZE_X as i32) as usize,
        wy as usize,
        wz.rem_euclid(SIZE_Z as i32) as usize,
    ))
}

/// Resolves a possibly out-of-range local position relative to `coord`
/// (e.g. `x == SIZE_X` or `z == -1`) to the owning chunk and its local position.
#[inline]
pub fn resolve_local(
    coord: ChunkCoord,
    lx: i32,
    ly: i32,
    lz: i32,
) -> Option<(ChunkCoord, usize, usize, usize)> {
    let (ox, oy, oz) = coord.origin();
    locate(ox + lx, oy + ly, oz + lz)
}
