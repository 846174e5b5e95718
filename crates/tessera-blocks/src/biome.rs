//! Biome kinds as a closed enum with a static property table.

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum BiomeKind {
    #[default]
    Plains,
    Desert,
    Mountains,
    Tundra,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BiomeDef {
    pub name: &'static str,
    pub top_block: &'static str,
    pub filler_block: &'static str,
    /// Surface height offset added to the terrain base level.
    pub base_height: i32,
    /// Nominal climate in `[0, 1]`; selection picks the nearest biome.
    pub temperature: f32,
    pub humidity: f32,
}

const BIOMES: [BiomeDef; 4] = [
    BiomeDef {
        name: "plains",
        top_block: "grass",
        filler_block: "dirt",
        base_height: 0,
        temperature: 0.55,
        humidity: 0.6,
    },
    BiomeDef {
        name: "desert",
        top_block: "sand",
        filler_block: "sand",
        base_height: -4,
        temperature: 0.9,
        humidity: 0.1,
    },
    BiomeDef {
        name: "mountains",
        top_block: "stone",
        filler_block: "stone",
        base_height: 24,
        temperature: 0.35,
        humidity: 0.35,
    },
    BiomeDef {
        name: "tundra",
        top_block: "snow",
        filler_block: "dirt",
        base_height: 6,
        temperature: 0.05,
        humidity: 0.5,
    },
];

impl BiomeKind {
    pub const ALL: [BiomeKind; 4] = [
        BiomeKind::Plains,
        BiomeKind::Desert,
        BiomeKind::Mountains,
        BiomeKind::Tundra,
    ];

    #[inline]
    pub fn def(self) -> &'static BiomeDef {
        &BIOMES[self as usize]
    }

    /// Nearest biome in (temperature, humidity) space. Ties resolve to the earlier kind.
    pub fn select(temperature: f32, humidity: f32) -> BiomeKind {
        let mut best = BiomeKind::Plains;
        let mut best_d = f32::INFINITY;
        for kind in BiomeKind::ALL {
            let d = kind.def();
            let dt = d.temperature - temperature;
            let dh = d.humidity - humidity;
            let dist = dt * dt + dh * dh;
            if dist < best_d {
                best_d = dist;
                best = kind;
            }
        }
        best
    }
}
