use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct WorldGenConfig {
    #[serde(default)]
    pub height: HeightLayers,
    #[serde(default)]
    pub caves: Caves,
    #[serde(default)]
    pub bedrock: Bedrock,
    #[serde(default)]
    pub biomes: Biomes,
    #[serde(default)]
    pub palette: PaletteNames,
}

impl WorldGenConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        Ok(toml::from_str(s)?)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }
}

/// One octave stack of 2D noise. `amplitude` is in voxels.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct NoiseLayer {
    pub frequency: f32,
    pub amplitude: f32,
    #[serde(default)]
    pub fractal: Fractal,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Fractal {
    #[serde(default = "d_oct")]
    pub octaves: i32,
    #[serde(default = "d_pers")]
    pub persistence: f32,
    #[serde(default = "d_lac")]
    pub lacunarity: f32,
}
fn d_oct() -> i32 {
    3
}
fn d_pers() -> f32 {
    0.5
}
fn d_lac() -> f32 {
    2.0
}
impl Default for Fractal {
    fn default() -> Self {
        Self {
            octaves: d_oct(),
            persistence: d_pers(),
            lacunarity: d_lac(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct HeightLayers {
    #[serde(default = "default_base_level")]
    pub base_level: f32,
    #[serde(default = "default_continental")]
    pub continental: NoiseLayer,
    #[serde(default = "default_hills")]
    pub hills: NoiseLayer,
    #[serde(default = "default_ridges")]
    pub ridges: NoiseLayer,
    #[serde(default = "default_peaks")]
    pub peaks: NoiseLayer,
    /// Domain warp; `amplitude` is the maximum horizontal offset.
    #[serde(default = "default_warp")]
    pub warp: NoiseLayer,
    /// Voxels under the surface that are never carved by caves.
    #[serde(default = "default_surface_shell")]
    pub surface_shell: i32,
    /// Filler (dirt, sand) band below the top block.
    #[serde(default = "default_filler_depth")]
    pub filler_depth: i32,
}
fn default_base_level() -> f32 {
    64.0
}
fn default_continental() -> NoiseLayer {
    NoiseLayer {
        frequency: 0.0016,
        amplitude: 24.0,
        fractal: Fractal {
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
        },
    }
}
fn default_hills() -> NoiseLayer {
    NoiseLayer {
        frequency: 0.011,
        amplitude: 8.0,
        fractal: Fractal::default(),
    }
}
fn default_ridges() -> NoiseLayer {
    NoiseLayer {
        frequency: 0.0055,
        amplitude: 20.0,
        fractal: Fractal {
            octaves: 2,
            persistence: 0.5,
            lacunarity: 2.0,
        },
    }
}
fn default_peaks() -> NoiseLayer {
    NoiseLayer {
        frequency: 0.0035,
        amplitude: 48.0,
        fractal: Fractal {
            octaves: 2,
            persistence: 0.45,
            lacunarity: 2.1,
        },
    }
}
fn default_warp() -> NoiseLayer {
    NoiseLayer {
        frequency: 0.004,
        amplitude: 24.0,
        fractal: Fractal {
            octaves: 1,
            persistence: 0.5,
            lacunarity: 2.0,
        },
    }
}
fn default_surface_shell() -> i32 {
    6
}
fn default_filler_depth() -> i32 {
    3
}
impl Default for HeightLayers {
    fn default() -> Self {
        Self {
            base_level: default_base_level(),
            continental: default_continental(),
            hills: default_hills(),
            ridges: default_ridges(),
            peaks: default_peaks(),
            warp: default_warp(),
            surface_shell: default_surface_shell(),
            filler_depth: default_filler_depth(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Caves {
    #[serde(default = "default_caves_enable")]
    pub enable: bool,
    #[serde(default = "default_cave_freq")]
    pub frequency: f32,
    /// Vertical squash; caves stretch horizontally when > 1.
    #[serde(default = "default_cave_y_scale")]
    pub y_scale: f32,
    /// Density above which a voxel is carved, near the surface shell.
    #[serde(default = "default_cave_threshold")]
    pub threshold: f32,
    /// Threshold reduction at full depth, widening caves lower down.
    #[serde(default = "default_cave_depth_bonus")]
    pub depth_bonus: f32,
    /// Depth (voxels below the surface) where the full bonus applies.
    #[serde(default = "default_cave_depth_range")]
    pub depth_range: f32,
    /// No carving at or below this y.
    #[serde(default = "default_cave_floor_margin")]
    pub floor_margin: i32,
}
fn default_caves_enable() -> bool {
    true
}
fn default_cave_freq() -> f32 {
    0.045
}
fn default_cave_y_scale() -> f32 {
    1.6
}
fn default_cave_threshold() -> f32 {
    0.62
}
fn default_cave_depth_bonus() -> f32 {
    0.12
}
fn default_cave_depth_range() -> f32 {
    48.0
}
fn default_cave_floor_margin() -> i32 {
    4
}
impl Default for Caves {
    fn default() -> Self {
        Self {
            enable: default_caves_enable(),
            frequency: default_cave_freq(),
            y_scale: default_cave_y_scale(),
            threshold: default_cave_threshold(),
            depth_bonus: default_cave_depth_bonus(),
            depth_range: default_cave_depth_range(),
            floor_margin: default_cave_floor_margin(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Bedrock {
    /// Highest y the noisy partial bedrock layer can reach. y = 0 is always bedrock.
    #[serde(default = "default_bedrock_ceiling")]
    pub ceiling: i32,
    #[serde(default = "default_bedrock_freq")]
    pub frequency: f32,
}
fn default_bedrock_ceiling() -> i32 {
    4
}
fn default_bedrock_freq() -> f32 {
    0.35
}
impl Default for Bedrock {
    fn default() -> Self {
        Self {
            ceiling: default_bedrock_ceiling(),
            frequency: default_bedrock_freq(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Biomes {
    #[serde(default = "default_temp_freq")]
    pub temperature_frequency: f32,
    #[serde(default = "default_humidity_freq")]
    pub humidity_frequency: f32,
}
fn default_temp_freq() -> f32 {
    0.0018
}
fn default_humidity_freq() -> f32 {
    0.0024
}
impl Default for Biomes {
    fn default() -> Self {
        Self {
            temperature_frequency: default_temp_freq(),
            humidity_frequency: default_humidity_freq(),
        }
    }
}

/// Block names for the parts of the terrain not decided by biome.
#[derive(Clone, Debug, Deserialize)]
pub struct PaletteNames {
    #[serde(default = "default_stone")]
    pub stone: String,
    #[serde(default = "default_bedrock")]
    pub bedrock: String,
}
fn default_stone() -> String {
    "stone".into()
}
fn default_bedrock() -> String {
    "bedrock".into()
}
impl Default for PaletteNames {
    fn default() -> Self {
        Self {
            stone: default_stone(),
            bedrock: default_bedrock(),
        }
    }
}
