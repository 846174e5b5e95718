/// Index into the block registry. `0` is always air.
pub type BlockId = u32;

pub const AIR: BlockId = 0;

/// Opaque handle for a texture in the [`TextureCatalog`](crate::TextureCatalog).
/// `TextureId(0)` is reserved for the "missing" sentinel.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u16);

impl TextureId {
    pub const MISSING: TextureId = TextureId(0);
}
