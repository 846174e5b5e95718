use super::*;
use tessera_blocks::config::{BlockDef, BlocksConfig};
use tessera_blocks::{AIR, TextureCatalog};

const STONE: BlockId = 1;
const GLOWSTONE: BlockId = 2;
const RED_LAMP: BlockId = 3;
const TORCH: BlockId = 4;

fn make_test_registry() -> BlockRegistry {
    let mut air = BlockDef::named("air");
    air.solid = Some(false);
    let stone = BlockDef::named("stone");
    let mut glowstone = BlockDef::named("glowstone");
    glowstone.emission = Some(20);
    let mut red_lamp = BlockDef::named("red_lamp");
    red_lamp.emission = Some(15);
    red_lamp.light_color = Some([255, 0, 0]);
    let mut torch = BlockDef::named("torch");
    torch.solid = Some(false);
    torch.emission = Some(14);
    BlockRegistry::from_configs(
        TextureCatalog::new(),
        BlocksConfig {
            blocks: vec![air, stone, glowstone, red_lamp, torch],
        },
    )
    .unwrap()
}

type Chunks = HashMap<ChunkCoord, VoxelGrid>;

fn air_world(radius: i32) -> Chunks {
    let mut chunks = Chunks::new();
    for cz in -radius..=radius {
        for cx in -radius..=radius {
            let c = ChunkCoord::column(cx, cz);
            chunks.insert(c, VoxelGrid::new(c));
        }
    }
    chunks
}

fn relight_all(chunks: &mut Chunks, reg: &BlockRegistry) {
    let coords: Vec<ChunkCoord> = chunks.keys().copied().collect();
    for g in chunks.values_mut() {
        rebuild_chunk(g, reg);
    }
    for c in coords {
        stitch_chunk_borders(chunks, reg, c);
    }
}

fn put(chunks: &mut Chunks, p: Pos, id: BlockId) {
    let (c, x, y, z) = locate(p.0, p.1, p.2).unwrap();
    chunks.get_mut(&c).unwrap().set_block(x, y, z, id);
}

fn edit(chunks: &mut Chunks, reg: &BlockRegistry, p: Pos, id: BlockId) -> TouchedChunks {
    put(chunks, p, id);
    update_from(chunks, reg, p.0, p.1, p.2)
}

fn sky(chunks: &Chunks, p: Pos) -> u8 {
    sky_at(chunks, p).unwrap()
}

fn blk(chunks: &Chunks, p: Pos) -> LightRgb {
    block_light_at(chunks, p).unwrap()
}

fn assert_same_light(a: &Chunks, b: &Chunks) {
    for (c, ga) in a.iter() {
        let gb = &b[c];
        for y in 0..SIZE_Y {
            for z in 0..SIZE_Z {
                for x in 0..SIZE_X {
                    assert_eq!(
                        ga.sky_light(x, y, z),
                        gb.sky_light(x, y, z),
                        "sky mismatch in {c:?} at ({x}, {y}, {z})"
                    );
                    assert_eq!(
                        ga.block_light(x, y, z),
                        gb.block_light(x, y, z),
                        "block light mismatch in {c:?} at ({x}, {y}, {z})"
                    );
                }
            }
        }
    }
}

#[test]
fn emitter_light_scales_and_clamps() {
    let reg = make_test_registry();
    assert_eq!(emitter_light(&reg, GLOWSTONE), LightRgb::splat(15));
    assert_eq!(emitter_light(&reg, RED_LAMP), LightRgb::new(15, 0, 0));
    assert_eq!(emitter_light(&reg, STONE), LightRgb::ZERO);
    assert_eq!(emitter_light(&reg, 999), LightRgb::ZERO);
}

#[test]
fn open_air_column_is_fully_sunlit() {
    let reg = make_test_registry();
    let mut w = air_world(1);
    relight_all(&mut w, &reg);
    for p in [(0, 0, 0), (-1, 200, -1), (15, 64, 16), (-16, 255, 31)] {
        assert_eq!(sky(&w, p), 15, "at {p:?}");
    }
}

#[test]
fn lone_block_removes_direct_sunlight_below() {
    let reg = make_test_registry();
    let mut w = air_world(1);
    relight_all(&mut w, &reg);
    edit(&mut w, &reg, (0, 64, 0), STONE);
    assert_eq!(sky(&w, (0, 64, 0)), 0);
    // Lit sideways by the open columns around it.
    assert_eq!(sky(&w, (0, 63, 0)), 14);
    assert_eq!(sky(&w, (0, 0, 0)), 14);
    assert_eq!(sky(&w, (2, 64, 0)), 15);
    assert_eq!(sky(&w, (0, 65, 0)), 15);
    assert_eq!(sky(&w, (-1, 63, 0)), 15);
}

#[test]
fn enclosed_cell_goes_dark() {
    let reg = make_test_registry();
    let mut w = air_world(1);
    relight_all(&mut w, &reg);
    for p in [
        (0, 64, 0),
        (1, 63, 0),
        (-1, 63, 0),
        (0, 63, 1),
        (0, 63, -1),
        (0, 62, 0),
    ] {
        edit(&mut w, &reg, p, STONE);
    }
    assert_eq!(sky(&w, (0, 63, 0)), 0);
    assert_eq!(sky(&w, (0, 61, 0)), 14);
}

#[test]
fn removing_block_restores_sunlight() {
    let reg = make_test_registry();
    let mut w = air_world(1);
    relight_all(&mut w, &reg);
    let reference = w.clone();
    edit(&mut w, &reg, (5, 100, 5), STONE);
    edit(&mut w, &reg, (5, 100, 5), AIR);
    assert_eq!(sky(&w, (5, 99, 5)), 15);
    assert_same_light(&w, &reference);
}

fn build_pocket(w: &mut Chunks) {
    // Hollow stone box spanning the chunk corner at the origin.
    for y in 8..=18 {
        for z in -5i32..=5 {
            for x in -5i32..=5 {
                let shell = x.abs() == 5 || z.abs() == 5 || y == 8 || y == 18;
                if shell {
                    put(w, (x, y, z), STONE);
                }
            }
        }
    }
}

#[test]
fn emitter_removal_leaves_no_residual_light() {
    let reg = make_test_registry();
    let mut reference = air_world(1);
    build_pocket(&mut reference);
    relight_all(&mut reference, &reg);

    let mut w = air_world(1);
    build_pocket(&mut w);
    put(&mut w, (0, 13, 0), GLOWSTONE);
    relight_all(&mut w, &reg);
    assert_eq!(blk(&w, (0, 13, 0)), LightRgb::splat(15));
    assert_eq!(blk(&w, (3, 13, 0)), LightRgb::splat(12));
    assert_eq!(blk(&w, (-3, 13, 0)), LightRgb::splat(12));
    assert_eq!(sky(&w, (3, 13, 0)), 0);

    edit(&mut w, &reg, (0, 13, 0), AIR);
    assert_eq!(blk(&w, (3, 13, 0)), LightRgb::ZERO);
    assert_same_light(&w, &reference);
}

#[test]
fn placing_emitter_incrementally_matches_rebuild() {
    let reg = make_test_registry();
    let mut w = air_world(1);
    build_pocket(&mut w);
    relight_all(&mut w, &reg);
    edit(&mut w, &reg, (2, 10, -2), TORCH);

    let mut reference = air_world(1);
    build_pocket(&mut reference);
    put(&mut reference, (2, 10, -2), TORCH);
    relight_all(&mut reference, &reg);
    assert_same_light(&w, &reference);
}

#[test]
fn colored_channels_are_removed_independently() {
    let reg = make_test_registry();
    let mut w = air_world(1);
    build_pocket(&mut w);
    put(&mut w, (-3, 13, 0), RED_LAMP);
    put(&mut w, (3, 13, 0), GLOWSTONE);
    relight_all(&mut w, &reg);
    assert_eq!(blk(&w, (0, 13, 0)), LightRgb::new(12, 12, 12));

    edit(&mut w, &reg, (3, 13, 0), AIR);
    assert_eq!(blk(&w, (0, 13, 0)), LightRgb::new(12, 0, 0));
    assert_eq!(blk(&w, (3, 13, 0)), LightRgb::new(9, 0, 0));
}

#[test]
fn opening_wall_lets_light_flow_in() {
    let reg = make_test_registry();
    let mut w = air_world(1);
    build_pocket(&mut w);
    relight_all(&mut w, &reg);
    assert_eq!(sky(&w, (0, 13, 0)), 0);

    // Punch a hole in the roof: sunlight falls straight through.
    edit(&mut w, &reg, (0, 18, 0), AIR);
    assert_eq!(sky(&w, (0, 9, 0)), 15);
    assert_eq!(sky(&w, (1, 9, 0)), 14);
}

#[test]
fn edits_report_touched_neighbor_chunks() {
    let reg = make_test_registry();
    let mut w = air_world(1);
    relight_all(&mut w, &reg);
    let touched = edit(&mut w, &reg, (-1, 64, 0), GLOWSTONE);
    assert!(touched.contains(&ChunkCoord::column(-1, 0)));
    assert!(touched.contains(&ChunkCoord::column(0, 0)));
}

#[test]
fn edits_outside_loaded_chunks_are_noops() {
    let reg = make_test_registry();
    let mut w = air_world(0);
    relight_all(&mut w, &reg);
    assert!(update_from(&mut w, &reg, 100, 64, 100).is_empty());
    assert!(update_from(&mut w, &reg, 0, -1, 0).is_empty());
    assert!(update_from(&mut w, &reg, 0, SIZE_Y as i32, 0).is_empty());
}

#[test]
fn stitching_carries_light_across_borders() {
    let reg = make_test_registry();
    let a = ChunkCoord::column(0, 0);
    let b = ChunkCoord::column(1, 0);
    let mut ga = VoxelGrid::new(a);
    // Roof over everything so only block light matters.
    for z in 0..SIZE_Z {
        for x in 0..SIZE_X {
            ga.set_block(x, 100, z, STONE);
        }
    }
    let mut gb = ga.clone();
    gb.coord = b;
    ga.set_block(14, 50, 8, GLOWSTONE);
    rebuild_chunk(&mut ga, &reg);
    rebuild_chunk(&mut gb, &reg);
    assert_eq!(gb.block_light(0, 50, 8), LightRgb::ZERO);

    let mut w = Chunks::new();
    w.insert(a, ga);
    w.insert(b, gb);
    let touched = stitch_chunk_borders(&mut w, &reg, a);
    assert!(touched.contains(&b));
    assert_eq!(blk(&w, (16, 50, 8)), LightRgb::splat(13));
    assert_eq!(blk(&w, (18, 50, 8)), LightRgb::splat(11));
}

#[test]
fn single_grid_access_sees_only_itself() {
    let g = VoxelGrid::new(ChunkCoord::column(2, 2));
    assert!(g.chunk(ChunkCoord::column(2, 2)).is_some());
    assert!(g.chunk(ChunkCoord::column(2, 3)).is_none());
}
