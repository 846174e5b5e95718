use std::sync::Arc;

use proptest::prelude::*;
use tessera_blocks::config::{BlockDef, BlocksConfig};
use tessera_blocks::{BlockRegistry, TextureCatalog};
use tessera_chunk::SIZE_Y;
use tessera_worldgen::{TerrainGenerator, WorldGenConfig};

fn generator(seed: i32) -> TerrainGenerator {
    let names = ["air", "stone", "bedrock", "grass", "dirt", "sand", "snow"];
    let blocks = names.iter().map(|n| BlockDef::named(n)).collect();
    let reg = BlockRegistry::from_configs(TextureCatalog::new(), BlocksConfig { blocks }).unwrap();
    TerrainGenerator::from_registry(seed, Arc::new(WorldGenConfig::default()), &reg).unwrap()
}

#[test]
fn config_defaults_fill_missing_fields() {
    let cfg = WorldGenConfig::from_toml_str(
        r#"
        [height]
        base_level = 80.0
        hills = { frequency = 0.02, amplitude = 4.0 }

        [caves]
        enable = false
        "#,
    )
    .unwrap();
    assert_eq!(cfg.height.base_level, 80.0);
    assert_eq!(cfg.height.hills.amplitude, 4.0);
    assert_eq!(cfg.height.hills.fractal.octaves, 3);
    assert_eq!(cfg.height.filler_depth, 3);
    assert!(!cfg.caves.enable);
    assert_eq!(cfg.caves.floor_margin, 4);
    assert_eq!(cfg.palette.bedrock, "bedrock");
}

#[test]
fn malformed_config_is_an_error() {
    assert!(WorldGenConfig::from_toml_str("[height]\nbase_level = \"high\"").is_err());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn surface_height_is_bounded_and_stable(wx in -200_000i32..200_000, wz in -200_000i32..200_000) {
        let g = generator(99);
        let h = g.surface_height(wx, wz);
        prop_assert!(h >= WorldGenConfig::default().bedrock.ceiling + 2);
        prop_assert!(h <= SIZE_Y as i32 - 2);
        prop_assert_eq!(h, generator(99).surface_height(wx, wz));
    }

    // Caves stay clear of the floor margin and the surface shell
    #[test]
    fn caves_respect_margins(wx in -5_000i32..5_000, wz in -5_000i32..5_000, wy in 0i32..256) {
        let g = generator(3);
        let surface = g.surface_height(wx, wz);
        let cfg = WorldGenConfig::default();
        if wy <= cfg.caves.floor_margin || wy >= surface - cfg.height.surface_shell {
            prop_assert!(!g.is_cave(wx, wy, wz, surface));
        }
    }
}
