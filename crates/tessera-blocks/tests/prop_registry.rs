use proptest::prelude::*;
use tessera_blocks::config::{BlockDef, BlocksConfig};
use tessera_blocks::{BiomeKind, BlockRegistry, MAX_BLOCK_ID, TextureCatalog, TextureId};
use tessera_geom::Face;

const BLOCKS: &str = r#"
[[blocks]]
name = "air"
id = 0
solid = false

[[blocks]]
name = "stone"
id = 1
textures = "stone"

[[blocks]]
name = "grass"
id = 2
textures = { top = "grass_top", bottom = "dirt", side = "grass_side" }

[[blocks]]
name = "glowstone"
id = 3
emission = 20
light_color = [255, 200, 120]

[[blocks]]
name = "furnace"
id = 4
textures = { all = "furnace_side", north = "furnace_front" }
"#;

#[test]
fn loads_blocks_and_resolves_textures_by_face() {
    let reg = BlockRegistry::from_toml_str(TextureCatalog::new(), BLOCKS).unwrap();
    assert_eq!(reg.id_by_name("grass"), Some(2));
    assert!(!reg.is_solid(0));
    assert!(reg.is_solid(1));

    let tex = |k: &str| reg.textures.get_id(k).unwrap();
    assert_eq!(reg.texture(2, Face::Up), tex("grass_top"));
    assert_eq!(reg.texture(2, Face::Down), tex("dirt"));
    assert_eq!(reg.texture(2, Face::East), tex("grass_side"));
    assert_eq!(reg.texture(4, Face::North), tex("furnace_front"));
    assert_eq!(reg.texture(4, Face::South), tex("furnace_side"));
    // No explicit textures: falls back to the block name as key.
    assert_eq!(reg.texture(3, Face::Up), tex("glowstone"));
    // Air never owns a texture.
    assert_eq!(reg.texture(0, Face::Up), TextureId::MISSING);
}

#[test]
fn emitter_properties_and_unknown_ids() {
    let reg = BlockRegistry::from_toml_str(TextureCatalog::new(), BLOCKS).unwrap();
    assert_eq!(reg.emission(3), 20);
    assert_eq!(reg.light_color(3), [255, 200, 120]);
    assert!(reg.get(3).unwrap().is_emitter());
    assert!(!reg.is_solid(999));
    assert_eq!(reg.emission(999), 0);
    assert_eq!(reg.texture(999, Face::Up), TextureId::MISSING);
}

#[test]
fn texture_catalog_reserves_zero_and_sorts_keys() {
    let cat = TextureCatalog::from_toml_str(
        r#"
        [textures]
        stone = ["assets/stone.png"]
        dirt = ["assets/dirt.png"]
    "#,
    )
    .unwrap();
    assert!(cat.textures[0].key.is_empty());
    assert_eq!(cat.get_id("dirt"), Some(TextureId(1)));
    assert_eq!(cat.get_id("stone"), Some(TextureId(2)));
    // Preloaded keys are reused by the registry instead of re-interned.
    let reg = BlockRegistry::from_toml_str(cat, BLOCKS).unwrap();
    assert_eq!(reg.texture(1, Face::Up), TextureId(2));
}

#[test]
fn rejects_duplicates_and_solid_air() {
    let dup = BlocksConfig {
        blocks: vec![BlockDef::named("air"), BlockDef::named("air")],
    };
    assert!(BlockRegistry::from_configs(TextureCatalog::new(), dup).is_err());

    let mut solid_air = BlockDef::named("air");
    solid_air.solid = Some(true);
    let cfg = BlocksConfig {
        blocks: vec![solid_air],
    };
    assert!(BlockRegistry::from_configs(TextureCatalog::new(), cfg).is_err());

    let cfg = BlocksConfig { blocks: vec![] };
    assert!(BlockRegistry::from_configs(TextureCatalog::new(), cfg).is_err());
}

#[test]
fn rejects_ids_past_the_table_bound() {
    let mut huge = BlockDef::named("huge");
    huge.id = Some(4_000_000_000);
    let cfg = BlocksConfig {
        blocks: vec![BlockDef::named("air"), huge],
    };
    let err = BlockRegistry::from_configs(TextureCatalog::new(), cfg).unwrap_err();
    assert!(err.to_string().contains("huge"));

    let mut last = BlockDef::named("last");
    last.id = Some(MAX_BLOCK_ID);
    let cfg = BlocksConfig {
        blocks: vec![BlockDef::named("air"), last],
    };
    let reg = BlockRegistry::from_configs(TextureCatalog::new(), cfg).unwrap();
    assert!(reg.is_solid(MAX_BLOCK_ID));
}

#[test]
fn sparse_ids_leave_non_solid_placeholders() {
    let mut stone = BlockDef::named("stone");
    stone.id = Some(5);
    let cfg = BlocksConfig {
        blocks: vec![BlockDef::named("air"), stone],
    };
    let reg = BlockRegistry::from_configs(TextureCatalog::new(), cfg).unwrap();
    assert_eq!(reg.blocks.len(), 6);
    for id in 1..5 {
        assert!(!reg.is_solid(id));
        assert_eq!(reg.get(id).unwrap().id, id);
    }
    assert!(reg.is_solid(5));
}

proptest! {
    // Biome selection returns the biome whose own climate point is nearest
    #[test]
    fn biome_select_is_nearest(t in 0.0f32..1.0, h in 0.0f32..1.0) {
        let chosen = BiomeKind::select(t, h);
        let dist = |k: BiomeKind| {
            let d = k.def();
            (d.temperature - t).powi(2) + (d.humidity - h).powi(2)
        };
        for k in BiomeKind::ALL {
            prop_assert!(dist(chosen) <= dist(k));
        }
    }
}

#[test]
fn biome_table_points_select_themselves() {
    for k in BiomeKind::ALL {
        let d = k.def();
        assert_eq!(BiomeKind::select(d.temperature, d.humidity), k);
    }
}
