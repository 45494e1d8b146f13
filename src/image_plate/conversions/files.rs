//! Scan file discovery.
//!
//! A scan is stored as `<stem>.inf` plus `<stem>.img`. Users may name either file, both,
//! or the bare stem; all of these collapse to one stem.

use std::collections::BTreeSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

const DESCRIPTOR_EXTENSION: &str = "inf";
const RAW_EXTENSION: &str = "img";

/// Reduces `paths` to unique scan stems in sorted order.
pub fn scan_stems<P: AsRef<Path>>(paths: &[P]) -> Vec<PathBuf> {
    paths
        .iter()
        .map(|path| {
            let path = path.as_ref();
            match path.extension().and_then(|e| e.to_str()) {
                Some(ext)
                    if ext.eq_ignore_ascii_case(DESCRIPTOR_EXTENSION)
                        || ext.eq_ignore_ascii_case(RAW_EXTENSION) =>
                {
                    path.with_extension("")
                }
                _ => path.to_path_buf(),
            }
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn with_suffix(stem: &Path, extension: &str) -> PathBuf {
    let mut name: OsString = stem.as_os_str().to_owned();
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

/// Descriptor and raw payload paths of a stem.
pub fn companion_paths(stem: &Path) -> (PathBuf, PathBuf) {
    (
        with_suffix(stem, DESCRIPTOR_EXTENSION),
        with_suffix(stem, RAW_EXTENSION),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_stems_deduplicates_pairs() {
        let stems = scan_stems(&[
            "plate-2.img",
            "plate-1.inf",
            "plate-2.inf",
            "plate-1.img",
            "plate-3",
        ]);
        assert_eq!(
            stems,
            vec![
                PathBuf::from("plate-1"),
                PathBuf::from("plate-2"),
                PathBuf::from("plate-3"),
            ]
        );
    }

    #[test]
    fn test_scan_stems_keeps_inner_dots() {
        let stems = scan_stems(&["data/shot.42.IMG", "data/shot.42.inf"]);
        assert_eq!(stems, vec![PathBuf::from("data/shot.42")]);
    }

    #[test]
    fn test_companion_paths_append_extension() {
        let (inf, img) = companion_paths(Path::new("data/shot.42"));
        assert_eq!(inf, PathBuf::from("data/shot.42.inf"));
        assert_eq!(img, PathBuf::from("data/shot.42.img"));
    }
}
