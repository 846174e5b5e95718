use serde::Deserialize;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct BlocksConfig {
    #[serde(default)]
    pub blocks: Vec<BlockDef>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct BlockDef {
    pub name: String,
    #[serde(default)]
    pub id: Option<u32>,
    #[serde(default)]
    pub solid: Option<bool>,
    /// Raw emission strength; scaled per channel by `light_color` and clamped by the light engine.
    #[serde(default)]
    pub emission: Option<u8>,
    #[serde(default)]
    pub light_color: Option<[u8; 3]>,
    #[serde(default)]
    pub textures: Option<TextureSpec>,
}

impl BlockDef {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            id: None,
            solid: None,
            emission: None,
            light_color: None,
            textures: None,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum TextureSpec {
    /// `textures = "stone"`
    All(String),
    /// `textures = { top = "grass_top", bottom = "dirt", side = "grass_side" }`
    Faces(FaceTextures),
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct FaceTextures {
    pub all: Option<String>,
    pub top: Option<String>,
    pub bottom: Option<String>,
    pub side: Option<String>,
    pub north: Option<String>,
    pub south: Option<String>,
    pub east: Option<String>,
    pub west: Option<String>,
}
