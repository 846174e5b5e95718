//! Incremental relighting after a single block edit: remove light that may have
//! depended on the old block, then re-flood from every surviving source.

use std::collections::VecDeque;

use tessera_blocks::{BlockId, BlockRegistry};
use tessera_chunk::{LightRgb, MAX_LIGHT, SIZE_Y, locate};
use tessera_geom::Face;

use crate::{
    ChunkAccess, Pos, TouchedChunks, block_id_at, block_light_at, emitter_light, propagate_block,
    propagate_sky, set_block_light, set_sky, sky_at, sky_step, step,
};

/// Relights around world voxel `(wx, wy, wz)` after its block changed. The new
/// block must already be stored. Returns every chunk whose light was written.
/// Edits in unloaded chunks or outside the vertical range do nothing.
pub fn update_from<A: ChunkAccess + ?Sized>(
    a: &mut A,
    reg: &BlockRegistry,
    wx: i32,
    wy: i32,
    wz: i32,
) -> TouchedChunks {
    let mut touched = TouchedChunks::new();
    let Some((coord, _, _, _)) = locate(wx, wy, wz) else {
        return touched;
    };
    let Some(id) = block_id_at(a, (wx, wy, wz)) else {
        return touched;
    };
    touched.insert(coord);
    let solid = reg.is_solid(id);
    update_sky(a, reg, (wx, wy, wz), solid, &mut touched);
    update_block_light(a, reg, (wx, wy, wz), id, solid, &mut touched);
    log::trace!(
        target: "light",
        "relit around ({wx}, {wy}, {wz}); {} chunks touched",
        touched.len()
    );
    touched
}

fn update_sky<A: ChunkAccess + ?Sized>(
    a: &mut A,
    reg: &BlockRegistry,
    p: Pos,
    solid: bool,
    touched: &mut TouchedChunks,
) {
    let (wx, wy, wz) = p;
    let mut removal: VecDeque<(Pos, u8)> = VecDeque::new();

    // Column light at and below the edit no longer has a known source.
    for y in (0..=wy).rev() {
        let q = (wx, y, wz);
        let Some(level) = sky_at(a, q) else { break };
        if level == 0 {
            if y < wy {
                break;
            }
            continue;
        }
        set_sky(a, q, 0, touched);
        removal.push_back((q, level));
    }

    let mut readd: VecDeque<Pos> = VecDeque::new();
    while let Some((q, level)) = removal.pop_front() {
        for face in Face::ALL {
            let n = step(q, face);
            let Some(nl) = sky_at(a, n) else { continue };
            if nl == 0 {
                continue;
            }
            if nl <= sky_step(level, face) {
                set_sky(a, n, 0, touched);
                removal.push_back((n, nl));
            } else {
                readd.push_back(n);
            }
        }
    }

    if !solid {
        if wy + 1 >= SIZE_Y as i32 {
            set_sky(a, p, MAX_LIGHT, touched);
            readd.push_back(p);
        }
        for face in Face::ALL {
            readd.push_back(step(p, face));
        }
    }
    propagate_sky(a, reg, &mut readd, touched);
}

fn update_block_light<A: ChunkAccess + ?Sized>(
    a: &mut A,
    reg: &BlockRegistry,
    p: Pos,
    id: BlockId,
    solid: bool,
    touched: &mut TouchedChunks,
) {
    let old = block_light_at(a, p).unwrap_or(LightRgb::ZERO);
    set_block_light(a, p, LightRgb::ZERO, touched);

    let mut removal: VecDeque<(Pos, LightRgb)> = VecDeque::new();
    if !old.is_dark() {
        removal.push_back((p, old));
    }

    let mut readd: VecDeque<Pos> = VecDeque::new();
    while let Some((q, old)) = removal.pop_front() {
        let old = old.channels();
        for face in Face::ALL {
            let n = step(q, face);
            let Some(cur) = block_light_at(a, n) else { continue };
            let mut kept = cur.channels();
            let mut removed = [0u8; 3];
            let mut independent = false;
            for ch in 0..3 {
                let v = kept[ch];
                if v == 0 {
                    continue;
                }
                if v < old[ch] {
                    removed[ch] = v;
                    kept[ch] = 0;
                } else {
                    independent = true;
                }
            }
            if removed != [0; 3] {
                // An emitter keeps its own light even when a brighter source is gone.
                let emitted = block_id_at(a, n).map_or(LightRgb::ZERO, |nid| emitter_light(reg, nid));
                set_block_light(a, n, LightRgb::from_channels(kept).max(emitted), touched);
                removal.push_back((n, LightRgb::from_channels(removed)));
                independent |= !emitted.is_dark();
            }
            if independent {
                readd.push_back(n);
            }
        }
    }

    let emitted = emitter_light(reg, id);
    if !emitted.is_dark() {
        let cur = block_light_at(a, p).unwrap_or(LightRgb::ZERO);
        set_block_light(a, p, cur.max(emitted), touched);
        readd.push_back(p);
    }
    if !solid {
        for face in Face::ALL {
            readd.push_back(step(p, face));
        }
    }
    propagate_block(a, reg, &mut readd, touched);
}
