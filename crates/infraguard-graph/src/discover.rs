use camino::{Utf8Path, Utf8PathBuf};
use walkdir::WalkDir;

/// Find snapshot files below `dir`: every `*.json` file, in sorted path order.
pub fn discover_snapshots(dir: &Utf8Path) -> Vec<Utf8PathBuf> {
    let mut out: Vec<Utf8PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| Utf8PathBuf::from_path_buf(e.into_path()).ok())
        .filter(|p| p.extension() == Some("json"))
        .collect();

    // Stable order.
    out.sort();
    out
}
