use std::path::{Path, PathBuf};

const MARKER: &str = "assets/blocks.toml";

pub fn resolve_assets_root(cli: Option<String>) -> PathBuf {
    // CLI flag, then TESSERA_ASSETS, then nearby dirs, then CWD
    if let Some(p) = cli {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return pb;
        }
    }
    if let Ok(p) = std::env::var("TESSERA_ASSETS") {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return pb;
        }
    }
    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        candidates.push(cwd);
    }
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            candidates.push(dir.to_path_buf());
        }
    }
    candidates.push(PathBuf::from(env!("CARGO_MANIFEST_DIR")));

    for base in candidates {
        if let Some(found) = search_up(&base, 5) {
            return found;
        }
    }
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

fn search_up(base: &Path, depth: usize) -> Option<PathBuf> {
    let mut cur = base.to_path_buf();
    for _ in 0..depth {
        if cur.join(MARKER).exists() {
            return Some(cur);
        }
        cur = cur.parent()?.to_path_buf();
    }
    None
}

pub fn blocks_path(root: &Path) -> PathBuf {
    root.join("assets/blocks.toml")
}

pub fn textures_path(root: &Path) -> PathBuf {
    root.join("assets/textures.toml")
}

pub fn worldgen_path(root: &Path) -> PathBuf {
    root.join("assets/worldgen.toml")
}
