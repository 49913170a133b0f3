//! Storage helpers shared by the evaluation and account stores.

use crate::error::{StoreError, StoreResult};
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Creates `entity_dir` exclusively and writes `value` as YAML to `entity_dir/filename`.
///
/// The document is written to a temporary sibling first and renamed into place, so readers
/// never observe a partial file. If writing fails, the freshly created directory is removed
/// again.
///
/// # Errors
///
/// Returns [`StoreError::AlreadyExists`] if `entity_dir` already exists, or a directory,
/// serialisation or write error.
pub(crate) fn create_yaml_entity<T: Serialize>(
    entity_dir: &Path,
    filename: &str,
    value: &T,
) -> StoreResult<PathBuf> {
    let content = serde_yaml::to_string(value).map_err(StoreError::YamlSerialization)?;

    if let Some(parent) = entity_dir.parent() {
        fs::create_dir_all(parent).map_err(StoreError::DirCreation)?;
    }

    match fs::create_dir(entity_dir) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            return Err(StoreError::AlreadyExists(entity_dir.display().to_string()));
        }
        Err(e) => return Err(StoreError::DirCreation(e)),
    }

    let path = entity_dir.join(filename);
    let tmp_path = entity_dir.join(format!(".{filename}.tmp"));
    let written = fs::write(&tmp_path, content).and_then(|()| fs::rename(&tmp_path, &path));

    if let Err(e) = written {
        if let Err(cleanup) = fs::remove_dir_all(entity_dir) {
            tracing::error!(
                "failed to clean up {} after write error: {cleanup}",
                entity_dir.display()
            );
        }
        return Err(StoreError::FileWrite(e));
    }

    Ok(path)
}

/// Reads and parses a YAML document.
pub(crate) fn read_yaml<T: DeserializeOwned>(path: &Path) -> StoreResult<T> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(StoreError::NotFound(path.display().to_string()));
        }
        Err(e) => return Err(StoreError::FileRead(e)),
    };
    serde_yaml::from_str(&content).map_err(StoreError::YamlDeserialization)
}

/// Lists the leaf directories of a `<s1>/<s2>/<id>/` sharded tree.
///
/// A missing base directory yields an empty list; unreadable levels are skipped.
pub(crate) fn sharded_leaf_dirs(base_dir: &Path) -> Vec<PathBuf> {
    fn subdirs(dir: &Path) -> Vec<PathBuf> {
        match fs::read_dir(dir) {
            Ok(entries) => entries
                .flatten()
                .map(|entry| entry.path())
                .filter(|path| path.is_dir())
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    subdirs(base_dir)
        .iter()
        .flat_map(|s1| subdirs(s1))
        .flat_map(|s2| subdirs(&s2))
        .collect()
}
