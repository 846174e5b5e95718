use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use tessera_geom::Face;

use super::config::{BlockDef, BlocksConfig, FaceTextures, TextureSpec};
use super::texture::TextureCatalog;
use super::types::{AIR, BlockId, TextureId};

/// Default tint for emitters that do not specify `light_color`.
const WHITE: [u8; 3] = [255, 255, 255];

/// Largest id a block definition may claim. Ids index a dense table.
pub const MAX_BLOCK_ID: BlockId = u16::MAX as BlockId;

#[derive(Clone, Debug)]
pub struct BlockType {
    pub id: BlockId,
    pub name: String,
    pub solid: bool,
    pub emission: u8,
    pub light_color: [u8; 3],
    /// Indexed by [`Face::index`].
    pub textures: [TextureId; 6],
}

impl BlockType {
    fn placeholder(id: BlockId) -> Self {
        BlockType {
            id,
            name: String::new(),
            solid: false,
            emission: 0,
            light_color: WHITE,
            textures: [TextureId::MISSING; 6],
        }
    }

    #[inline]
    pub fn texture(&self, face: Face) -> TextureId {
        self.textures[face.index()]
    }

    #[inline]
    pub fn is_emitter(&self) -> bool {
        self.emission > 0
    }
}

/// Read-only lookup from [`BlockId`] to block properties.
#[derive(Clone, Debug, Default)]
pub struct BlockRegistry {
    pub textures: TextureCatalog,
    pub blocks: Vec<BlockType>,
    pub by_name: HashMap<String, BlockId>,
}

impl BlockRegistry {
    #[inline]
    pub fn get(&self, id: BlockId) -> Option<&BlockType> {
        self.blocks.get(id as usize)
    }

    pub fn id_by_name(&self, name: &str) -> Option<BlockId> {
        self.by_name.get(name).copied()
    }

    /// Unknown ids are treated as non-solid.
    #[inline]
    pub fn is_solid(&self, id: BlockId) -> bool {
        self.get(id).is_some_and(|ty| ty.solid)
    }

    #[inline]
    pub fn emission(&self, id: BlockId) -> u8 {
        self.get(id).map_or(0, |ty| ty.emission)
    }

    #[inline]
    pub fn light_color(&self, id: BlockId) -> [u8; 3] {
        self.get(id).map_or(WHITE, |ty| ty.light_color)
    }

    #[inline]
    pub fn texture(&self, id: BlockId, face: Face) -> TextureId {
        self.get(id).map_or(TextureId::MISSING, |ty| ty.texture(face))
    }

    pub fn load_from_paths(
        textures_path: impl AsRef<Path>,
        blocks_path: impl AsRef<Path>,
    ) -> Result<Self, Box<dyn Error>> {
        let textures = TextureCatalog::from_path(textures_path)?;
        let blocks_toml = fs::read_to_string(blocks_path)?;
        Self::from_toml_str(textures, &blocks_toml)
    }

    pub fn from_toml_str(textures: TextureCatalog, blocks_toml: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: BlocksConfig = toml::from_str(blocks_toml)?;
        Self::from_configs(textures, cfg)
    }

    pub fn from_configs(textures: TextureCatalog, cfg: BlocksConfig) -> Result<Self, Box<dyn Error>> {
        let mut reg = BlockRegistry {
            textures,
            blocks: Vec::new(),
            by_name: HashMap::new(),
        };
        let mut assigned: Vec<bool> = Vec::new();
        for def in cfg.blocks.into_iter() {
            let id = def.id.unwrap_or(reg.blocks.len() as BlockId);
            if id > MAX_BLOCK_ID {
                return Err(format!("block id {id} (`{}`) exceeds {MAX_BLOCK_ID}", def.name).into());
            }
            if reg.by_name.contains_key(&def.name) {
                return Err(format!("duplicate block name `{}`", def.name).into());
            }
            if assigned.get(id as usize).copied().unwrap_or(false) {
                return Err(format!("duplicate block id {id} (`{}`)", def.name).into());
            }
            let ty = compile_block(&mut reg.textures, id, def);
            if reg.blocks.len() <= id as usize {
                reg.blocks.resize(id as usize + 1, BlockType::placeholder(0));
                assigned.resize(id as usize + 1, false);
                for (i, b) in reg.blocks.iter_mut().enumerate() {
                    b.id = i as BlockId;
                }
            }
            reg.by_name.insert(ty.name.clone(), id);
            reg.blocks[id as usize] = ty;
            assigned[id as usize] = true;
        }
        match reg.get(AIR) {
            Some(air) if !air.solid && air.emission == 0 => {}
            Some(air) => {
                return Err(format!("block id 0 (`{}`) must be non-solid air", air.name).into());
            }
            None => return Err("registry must define block id 0 (air)".into()),
        }
        Ok(reg)
    }
}

fn compile_block(textures: &mut TextureCatalog, id: BlockId, def: BlockDef) -> BlockType {
    let solid = def.solid.unwrap_or(id != AIR);
    let faces = match def.textures {
        Some(TextureSpec::All(key)) => FaceTextures {
            all: Some(key),
            ..FaceTextures::default()
        },
        Some(TextureSpec::Faces(f)) => f,
        None => FaceTextures::default(),
    };
    let mut out = [TextureId::MISSING; 6];
    if solid {
        for face in Face::ALL {
            let specific = match face {
                Face::North => faces.north.as_ref(),
                Face::South => faces.south.as_ref(),
                Face::East => faces.east.as_ref(),
                Face::West => faces.west.as_ref(),
                Face::Up | Face::Down => None,
            };
            let role = match face {
                Face::Up => faces.top.as_ref(),
                Face::Down => faces.bottom.as_ref(),
                _ => faces.side.as_ref(),
            };
            let key = specific.or(role).or(faces.all.as_ref()).unwrap_or(&def.name);
            out[face.index()] = textures.intern(key);
        }
    }
    BlockType {
        id,
        name: def.name,
        solid,
        emission: def.emission.unwrap_or(0),
        light_color: def.light_color.unwrap_or(WHITE),
        textures: out,
    }
}
