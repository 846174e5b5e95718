use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::types::TextureId;

#[derive(Clone, Debug)]
pub struct Texture {
    pub id: TextureId,
    pub key: String,
    pub paths: Vec<PathBuf>,
}

/// Key → [`TextureId`] table. Only names and candidate paths are tracked here;
/// decoding and GPU upload belong to the renderer.
#[derive(Clone, Debug)]
pub struct TextureCatalog {
    pub textures: Vec<Texture>,
    pub by_key: HashMap<String, TextureId>,
}

impl Default for TextureCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl TextureCatalog {
    pub fn new() -> Self {
        Self {
            textures: vec![Texture {
                id: TextureId::MISSING,
                key: String::new(),
                paths: Vec::new(),
            }],
            by_key: HashMap::new(),
        }
    }

    pub fn get_id(&self, key: &str) -> Option<TextureId> {
        self.by_key.get(key).copied()
    }

    pub fn get(&self, id: TextureId) -> Option<&Texture> {
        self.textures.get(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.len() <= 1
    }

    /// Returns the id for `key`, registering it without paths if unseen.
    pub fn intern(&mut self, key: &str) -> TextureId {
        if let Some(id) = self.get_id(key) {
            return id;
        }
        self.push(key.to_string(), Vec::new())
    }

    fn push(&mut self, key: String, paths: Vec<PathBuf>) -> TextureId {
        let id = TextureId(self.textures.len() as u16);
        self.by_key.insert(key.clone(), id);
        self.textures.push(Texture { id, key, paths });
        id
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: TexturesConfig = toml::from_str(toml_str)?;
        let mut catalog = TextureCatalog::new();
        let mut entries: Vec<(String, Vec<String>)> = cfg.textures.into_iter().collect();
        // HashMap order is unstable; sort so ids are reproducible between runs.
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        for (key, paths) in entries {
            catalog.push(key, paths.into_iter().map(PathBuf::from).collect());
        }
        Ok(catalog)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }
}

#[derive(Deserialize)]
pub struct TexturesConfig {
    #[serde(default)]
    pub textures: HashMap<String, Vec<String>>,
}
