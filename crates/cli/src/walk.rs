use anyhow::{Context, Result};
use std::collections::{HashSet, VecDeque};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Breadth-first walk from `root` collecting files the front end supports.
///
/// Symlinks are never followed and unreadable entries are skipped. A
/// `root` that is itself a file is returned as long as it is not excluded,
/// whatever its extension, so the caller can report it as unsupported.
pub fn collect_sources<F>(root: &Path, excluded: &F) -> Result<Vec<PathBuf>>
where
    F: Fn(&Path) -> bool,
{
    let mut sources = Vec::new();
    let root_meta = fs::metadata(root)
        .with_context(|| format!("cannot access {}", root.display()))?;
    if root_meta.is_file() {
        if !excluded(root) {
            sources.push(root.to_path_buf());
        }
        return Ok(sources);
    }

    let mut pending: VecDeque<PathBuf> = VecDeque::from([root.to_path_buf()]);
    let mut visited: HashSet<PathBuf> = HashSet::new();
    while let Some(current) = pending.pop_front() {
        if !visited.insert(current.clone()) {
            continue;
        }
        if excluded(&current) {
            debug!(path = %current.display(), "Path excluded");
            continue;
        }
        let metadata = match fs::symlink_metadata(&current) {
            Ok(m) => m,
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                debug!(path = %current.display(), "Permission denied");
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        let file_type = metadata.file_type();
        if file_type.is_symlink() {
            debug!(path = %current.display(), "Symlink skipped");
        } else if file_type.is_file() {
            if parsers::detect_type(&current).is_some() {
                sources.push(current);
            }
        } else if file_type.is_dir() {
            debug!(path = %current.display(), "Entering directory");
            let entries = match fs::read_dir(&current) {
                Ok(e) => e,
                Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                    debug!(path = %current.display(), "Permission denied");
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            let mut children = Vec::new();
            for entry in entries {
                match entry {
                    Ok(e) => children.push(e.path()),
                    Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                        debug!(path = %current.display(), "Permission denied");
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            children.sort();
            pending.extend(children);
        }
    }
    sources.sort();
    Ok(sources)
}
