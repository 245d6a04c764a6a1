use std::path::{Path, PathBuf};

const BLOCKS_REL: &str = "assets/voxels/blocks.toml";

pub fn resolve_assets_root(cli: Option<&Path>) -> PathBuf {
    // Precedence: CLI flag -> TESSEL_ASSETS env -> search nearby dirs -> CWD
    if let Some(p) = cli {
        if p.exists() {
            return p.to_path_buf();
        }
        log::warn!("assets root {:?} does not exist; searching", p);
    }
    if let Ok(p) = std::env::var("TESSEL_ASSETS") {
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
        if let Some(found) = base
            .ancestors()
            .take(5)
            .find(|dir| dir.join(BLOCKS_REL).exists())
        {
            return found.to_path_buf();
        }
    }
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

pub fn blocks_path(root: &Path) -> PathBuf {
    root.join(BLOCKS_REL)
}
